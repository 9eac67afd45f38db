use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::service;
use crate::app_state::AppState;
use crate::db::models::{
    BackfillPayload, InstructorConfirmPayload, MarkPayload, SelfConfirmPayload,
};
use crate::error::AppResult;

pub async fn self_confirm(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<SelfConfirmPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let attendance = service::self_confirm(&state.db, payload.participant_id, class_id).await?;
    Ok(Json(attendance))
}

pub async fn instructor_confirm(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<InstructorConfirmPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let attendance = service::instructor_confirm(
        &state.db,
        payload.instructor_id,
        payload.participant_id,
        class_id,
        payload.session_date,
    )
    .await?;
    Ok(Json(attendance))
}

pub async fn backfill(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<BackfillPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let attendance = service::administrative_backfill(
        &state.db,
        payload.acting_user_id,
        payload.participant_id,
        class_id,
        payload.session_date,
        payload.present,
    )
    .await?;
    Ok(Json(attendance))
}

pub async fn participant_report(
    State(state): State<AppState>,
    Path((class_id, participant_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let rows = service::participant_report(&state.db, participant_id, class_id).await?;
    Ok(Json(rows))
}

/// Unconditional mark: present or the explicit pending placeholder.
pub async fn mark(
    State(state): State<AppState>,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<MarkPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let attendance = if payload.present {
        service::mark_present(&state.db, payload.participant_id, class_id, payload.session_date)
            .await?
    } else {
        service::mark_pending(&state.db, payload.participant_id, class_id, payload.session_date)
            .await?
    };
    Ok(Json(attendance))
}
