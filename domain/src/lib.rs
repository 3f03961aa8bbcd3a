//! Business layer for the noticeboard: per-resource mutation handlers that
//! check authorization, write through `entity_api`, and publish exactly one
//! broadcast event after each acknowledged store write.
//!
//! Entity modules are re-exported so that consumers of the `domain` crate do
//! not need to depend on `entity_api` directly; the `web` layer sees one
//! consistent surface here.

pub use entity_api::{announcements, campus_events, timetable_entries, users, Id};

pub mod announcement;
pub mod campus_event;
pub mod error;
pub mod timetable_entry;
pub mod user;

use entity::users::{Model as User, Role};
use error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};

/// Only staff and admins may mutate board content. Students read.
fn require_staff(user: &User) -> Result<(), Error> {
    match user.role {
        Role::Staff | Role::Admin => Ok(()),
        Role::Student => Err(forbidden()),
    }
}

/// Record-level ownership check: the original author may edit, and an admin
/// may edit anything.
fn require_owner_or_admin(user: &User, owner_id: Id) -> Result<(), Error> {
    if user.id == owner_id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(forbidden())
    }
}

fn forbidden() -> Error {
    Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Forbidden,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> User {
        let now = chrono::Utc::now();
        User {
            id: Id::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.edu".to_string(),
            password: "hash".to_string(),
            role,
            department: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn students_may_not_mutate_board_content() {
        assert!(require_staff(&user_with_role(Role::Student)).is_err());
        assert!(require_staff(&user_with_role(Role::Staff)).is_ok());
        assert!(require_staff(&user_with_role(Role::Admin)).is_ok());
    }

    #[test]
    fn only_the_owner_or_an_admin_may_edit_a_record() {
        let staff = user_with_role(Role::Staff);
        let admin = user_with_role(Role::Admin);

        assert!(require_owner_or_admin(&staff, staff.id).is_ok());
        assert!(require_owner_or_admin(&staff, Id::new_v4()).is_err());
        assert!(require_owner_or_admin(&admin, Id::new_v4()).is_ok());
    }

    #[test]
    fn forbidden_maps_to_the_entity_forbidden_kind() {
        let err = forbidden();
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Forbidden))
        );
    }
}
