use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub class_id: Uuid,
    pub participant_id: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewEnrollment {
    pub participant_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CancelEnrollment {
    /// The user requesting the cancellation: the participant themselves
    /// or an administrator.
    pub acting_user_id: Uuid,
}
