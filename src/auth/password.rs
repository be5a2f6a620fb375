//! Admin password check
//!
//! Single shared password, compared directly against the configured value.
//! The comparison is not constant-time; this mirrors the original deployment
//! and is a known, documented weakness rather than an oversight. See
//! DESIGN.md before "fixing" it — hardening here without coordinating with
//! operators changes a documented contract.

use tracing::warn;

/// Check a login candidate against the configured admin password.
///
/// Returns false when no password is configured, regardless of candidate,
/// and logs a configuration warning so the misdeployment is visible.
pub fn check_password(candidate: &str, configured: Option<&str>) -> bool {
    match configured {
        Some(expected) => candidate == expected,
        None => {
            warn!("Admin password not configured; rejecting all logins");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_succeeds() {
        assert!(check_password("hunter2", Some("hunter2")));
    }

    #[test]
    fn mismatch_fails() {
        assert!(!check_password("hunter", Some("hunter2")));
        assert!(!check_password("hunter22", Some("hunter2")));
        assert!(!check_password("", Some("hunter2")));
        assert!(!check_password("HUNTER2", Some("hunter2")));
    }

    #[test]
    fn unconfigured_password_rejects_everything() {
        assert!(!check_password("hunter2", None));
        assert!(!check_password("", None));
    }
}
