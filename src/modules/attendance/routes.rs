use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{backfill, instructor_confirm, mark, participant_report, self_confirm};
use crate::app_state::AppState;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/classes/{class_id}/attendance/self-confirm",
            post(self_confirm),
        )
        .route(
            "/classes/{class_id}/attendance/instructor-confirm",
            post(instructor_confirm),
        )
        .route("/classes/{class_id}/attendance/backfill", post(backfill))
        .route("/classes/{class_id}/attendance/mark", post(mark))
        .route(
            "/classes/{class_id}/participants/{participant_id}/attendance",
            get(participant_report),
        )
}
