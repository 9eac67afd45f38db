use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

use super::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "event_kind", rename_all = "snake_case")]
pub enum EventKind {
    Ordinary,
    Congress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "restriction_mode", rename_all = "snake_case")]
pub enum RestrictionMode {
    ByRole,
    ByUnit,
    ByExternalList,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub kind: EventKind,
    pub restricted: bool,
    pub restriction_mode: Option<RestrictionMode>,
    pub allowed_role: Option<UserRole>,
    pub allowed_unit: Option<String>,
    pub created_at: OffsetDateTime,
}

impl Event {
    /// Congress-kind events permit a participant to hold several
    /// non-overlapping class enrollments within the same event.
    pub fn allows_multiple_tracks(&self) -> bool {
        self.kind == EventKind::Congress
    }
}

#[derive(Debug, Deserialize, Validate)]
#[allow(unused)]
pub struct NewEvent {
    #[validate(length(min = 1))]
    pub title: String,
    pub kind: EventKind,
    pub restricted: bool,
    pub restriction_mode: Option<RestrictionMode>,
    pub allowed_role: Option<UserRole>,
    pub allowed_unit: Option<String>,
}
