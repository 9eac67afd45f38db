use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::service;
use crate::app_state::AppState;
use crate::db::models::{CancelEnrollment, NewEnrollment};
use crate::error::AppResult;
use crate::scheduling::overlap::conflicts_lenient;

pub async fn enroll(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<NewEnrollment>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let enrollment = service::enroll(&state.db, payload.participant_id, class_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path((class_id, participant_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CancelEnrollment>,
) -> AppResult<StatusCode> {
    payload.validate()?;
    service::cancel(&state.db, participant_id, class_id, payload.acting_user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn roster(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let enrollments = service::roster(&state.db, class_id).await?;
    Ok(Json(enrollments))
}

#[derive(Debug, Deserialize)]
pub struct SchedulePayload {
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Deserialize)]
pub struct ConflictCheckPayload {
    pub first: SchedulePayload,
    pub second: SchedulePayload,
}

/// Advisory conflict pre-check for UI hinting. Read-only and lenient:
/// malformed input reports "no conflict". The authoritative check runs
/// inside the enroll transaction regardless.
pub async fn conflict_precheck(
    Json(payload): Json<ConflictCheckPayload>,
) -> Json<serde_json::Value> {
    let conflict = conflicts_lenient(
        &payload.first.start_date,
        &payload.first.end_date,
        &payload.first.start_time,
        &payload.first.end_time,
        &payload.second.start_date,
        &payload.second.end_date,
        &payload.second.start_time,
        &payload.second.end_time,
    );
    Json(json!({ "conflict": conflict }))
}
