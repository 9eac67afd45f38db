//! Access-check collaborator consulted at enrollment time for
//! restricted events.

use sqlx::{Postgres, Transaction};

use crate::db::models::{Event, RestrictionMode, User};
use crate::db::repositories::UserRepository;
use crate::db::DatabaseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDecision {
    pub ok: bool,
    pub reason: Option<String>,
}

impl AccessDecision {
    fn allow() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    fn deny(reason: &str) -> Self {
        Self {
            ok: false,
            reason: Some(reason.to_string()),
        }
    }
}

pub async fn can_access(
    tx: &mut Transaction<'_, Postgres>,
    user: &User,
    event: &Event,
) -> Result<AccessDecision, DatabaseError> {
    if !event.restricted {
        return Ok(AccessDecision::allow());
    }
    let external_allowed = match (&event.restriction_mode, &user.external_id) {
        (Some(RestrictionMode::ByExternalList), Some(external_id)) => {
            UserRepository::is_external_allowed(&mut **tx, event.id, external_id).await?
        }
        _ => false,
    };
    Ok(decide(user, event, external_allowed))
}

/// Pure restriction decision. `external_allowed` carries the allow-list
/// lookup result so the rule itself stays side-effect free.
pub fn decide(user: &User, event: &Event, external_allowed: bool) -> AccessDecision {
    if !event.restricted {
        return AccessDecision::allow();
    }
    match event.restriction_mode {
        Some(RestrictionMode::ByRole) => {
            if event.allowed_role == Some(user.role) {
                AccessDecision::allow()
            } else {
                AccessDecision::deny("event is restricted to a specific role")
            }
        }
        Some(RestrictionMode::ByUnit) => {
            let matches = matches!(
                (&event.allowed_unit, &user.organizational_unit),
                (Some(allowed), Some(unit)) if allowed == unit
            );
            if matches {
                AccessDecision::allow()
            } else {
                AccessDecision::deny("event is restricted to an organizational unit")
            }
        }
        Some(RestrictionMode::ByExternalList) => {
            if external_allowed {
                AccessDecision::allow()
            } else {
                AccessDecision::deny("participant is not on the event allow-list")
            }
        }
        // Restricted with no mode configured: fail closed.
        None => AccessDecision::deny("event access is restricted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{EventKind, UserRole};
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(role: UserRole, unit: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "u".into(),
            email: "u@example.com".into(),
            role,
            organizational_unit: unit.map(String::from),
            external_id: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn event(mode: Option<RestrictionMode>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "e".into(),
            kind: EventKind::Ordinary,
            restricted: true,
            restriction_mode: mode,
            allowed_role: Some(UserRole::Instructor),
            allowed_unit: Some("engineering".into()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn unrestricted_event_always_allows() {
        let mut e = event(None);
        e.restricted = false;
        let d = decide(&user(UserRole::Participant, None), &e, false);
        assert!(d.ok);
    }

    #[test]
    fn role_restriction_matches_role() {
        let e = event(Some(RestrictionMode::ByRole));
        assert!(decide(&user(UserRole::Instructor, None), &e, false).ok);
        assert!(!decide(&user(UserRole::Participant, None), &e, false).ok);
    }

    #[test]
    fn unit_restriction_matches_unit() {
        let e = event(Some(RestrictionMode::ByUnit));
        assert!(decide(&user(UserRole::Participant, Some("engineering")), &e, false).ok);
        assert!(!decide(&user(UserRole::Participant, Some("sales")), &e, false).ok);
        assert!(!decide(&user(UserRole::Participant, None), &e, false).ok);
    }

    #[test]
    fn external_list_restriction_uses_lookup_result() {
        let e = event(Some(RestrictionMode::ByExternalList));
        assert!(decide(&user(UserRole::Participant, None), &e, true).ok);
        assert!(!decide(&user(UserRole::Participant, None), &e, false).ok);
    }

    #[test]
    fn restricted_without_mode_fails_closed() {
        let e = event(None);
        let d = decide(&user(UserRole::Admin, None), &e, false);
        assert!(!d.ok);
    }
}
