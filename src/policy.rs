//! Role hierarchy checks.
//!
//! A monotone capability check over the total order
//! `viewer < admin < superadmin`. Unknown roles rank below everything and
//! never pass a check. Decisions are re-evaluated on every request.

use crate::error::ApiError;
use crate::session::Session;

pub const VIEWER: &str = "viewer";
pub const ADMIN: &str = "admin";
pub const SUPERADMIN: &str = "superadmin";

/// Privilege level of a role name; unrecognized roles map to 0.
pub fn rank(role: &str) -> u8 {
    match role {
        SUPERADMIN => 3,
        ADMIN => 2,
        VIEWER => 1,
        _ => 0,
    }
}

/// True when the session exists and its role meets `required`.
pub fn has_role(session: Option<&Session>, required: &str) -> bool {
    match session {
        Some(session) => rank(&session.role) >= rank(required),
        None => false,
    }
}

pub fn is_superadmin(session: Option<&Session>) -> bool {
    matches!(session, Some(s) if s.role == SUPERADMIN)
}

/// Handler guard: 403 unless the session's role meets `required`.
pub fn require_role(session: &Session, required: &str) -> Result<(), ApiError> {
    if has_role(Some(session), required) {
        Ok(())
    } else {
        Err(ApiError::forbidden("forbidden"))
    }
}

/// Handler guard: 403 unless the session is a superadmin.
pub fn require_superadmin(session: &Session) -> Result<(), ApiError> {
    if is_superadmin(Some(session)) {
        Ok(())
    } else {
        Err(ApiError::forbidden("forbidden"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: &str) -> Session {
        Session::new("test-token", "testuser", role)
    }

    #[test]
    fn no_session_never_passes() {
        assert!(!has_role(None, VIEWER));
        assert!(!has_role(None, ADMIN));
        assert!(!has_role(None, SUPERADMIN));
    }

    #[test]
    fn rank_is_monotone_over_the_hierarchy() {
        let roles = [VIEWER, ADMIN, SUPERADMIN];
        for (i, user) in roles.iter().enumerate() {
            for (j, required) in roles.iter().enumerate() {
                assert_eq!(
                    has_role(Some(&session(user)), required),
                    i >= j,
                    "{user} vs {required}"
                );
            }
        }
    }

    #[test]
    fn unknown_roles_fail_every_check() {
        for required in [VIEWER, ADMIN, SUPERADMIN] {
            assert!(!has_role(Some(&session("operator")), required));
            assert!(!has_role(Some(&session("")), required));
        }
    }

    #[test]
    fn unknown_required_role_is_granted_to_known_roles() {
        // rank 0 requirement: any recognized role clears it
        assert!(has_role(Some(&session(VIEWER)), "nonexistent"));
    }

    #[test]
    fn superadmin_check_is_exact() {
        assert!(is_superadmin(Some(&session(SUPERADMIN))));
        assert!(!is_superadmin(Some(&session(ADMIN))));
        assert!(!is_superadmin(Some(&session(VIEWER))));
        assert!(!is_superadmin(None));
    }

    #[test]
    fn guards_map_to_forbidden() {
        assert!(require_role(&session(ADMIN), ADMIN).is_ok());
        let err = require_role(&session(VIEWER), ADMIN).unwrap_err();
        assert_eq!(err.status_code(), 403);

        assert!(require_superadmin(&session(SUPERADMIN)).is_ok());
        let err = require_superadmin(&session(ADMIN)).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
