use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

/// One present/absent mark per (participant, class, session date).
/// Created lazily on first write; later writes upsert in place.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub class_id: Uuid,
    pub session_date: Date,
    pub present: bool,
    pub confirmed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SelfConfirmPayload {
    pub participant_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InstructorConfirmPayload {
    pub instructor_id: Uuid,
    pub participant_id: Uuid,
    pub session_date: Date,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BackfillPayload {
    pub acting_user_id: Uuid,
    pub participant_id: Uuid,
    pub session_date: Date,
    pub present: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MarkPayload {
    pub participant_id: Uuid,
    pub session_date: Date,
    pub present: bool,
}
