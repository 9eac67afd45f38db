use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, Time};
use validator::Validate;

/// One concrete dated occurrence of a class. At most one per calendar day.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ClassSession {
    pub id: Uuid,
    pub class_id: Uuid,
    pub session_date: Date,
    pub start_time: Time,
    pub end_time: Time,
}

#[derive(Debug, Deserialize, Validate)]
#[allow(unused)]
pub struct NewClassSession {
    pub class_id: Uuid,
    pub session_date: Date,
    pub start_time: Time,
    pub end_time: Time,
}
