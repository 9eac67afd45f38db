use axum::{routing::get, Router};

use super::handlers::eligibility;
use crate::app_state::AppState;

pub fn eligibility_routes() -> Router<AppState> {
    Router::new().route(
        "/classes/{class_id}/participants/{participant_id}/eligibility",
        get(eligibility),
    )
}
