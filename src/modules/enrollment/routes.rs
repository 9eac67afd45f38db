use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{cancel, conflict_precheck, enroll, roster};
use crate::app_state::AppState;

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/classes/{class_id}/enrollments", get(roster).post(enroll))
        .route(
            "/classes/{class_id}/enrollments/{participant_id}/cancel",
            post(cancel),
        )
        .route("/enrollments/conflict-check", post(conflict_precheck))
}
