use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::service;
use crate::app_state::AppState;
use crate::error::AppResult;

pub async fn eligibility(
    State(state): State<AppState>,
    Path((class_id, participant_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let state = service::evaluate(&state.db, participant_id, class_id).await?;
    Ok(Json(state))
}
