//! Access gate in front of the dashboard.
//!
//! The identity provider and role directory are external; this module only
//! turns their answers into a decision the presentation layer acts on.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::auth::{ACCESS_DENIED_NOTICE, MANAGER_ROLE, ROLE_CHECK_FAILED_NOTICE};
use crate::errors::DashboardError;
use crate::types::{NoticeText, RoleName, UserId};

/// Signed-in user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider user id.
    pub uid: UserId,
    /// Sign-in email, when the provider exposes one.
    pub email: Option<String>,
}

/// Role lookup keyed by user id.
pub trait RoleDirectory {
    /// Role assigned to `uid`, or `None` when the user has no role entry.
    fn role_for(&self, uid: &str) -> Result<Option<RoleName>, DashboardError>;
}

/// What the presentation layer must do after an auth-state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    /// Nobody is signed in: go to the login page.
    RedirectToLogin,
    /// Show the notice and force a sign-out.
    Denied {
        /// Message shown before signing out.
        notice: NoticeText,
    },
    /// Access granted; load the first page.
    Granted {
        /// The signed-in manager.
        identity: Identity,
    },
}

impl AccessDecision {
    /// `true` for `Granted`.
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    /// Convert a denial into an error for callers that propagate with `?`.
    pub fn into_result(self) -> Result<Option<Identity>, DashboardError> {
        match self {
            AccessDecision::RedirectToLogin => Ok(None),
            AccessDecision::Denied { notice } => Err(DashboardError::AccessDenied(notice)),
            AccessDecision::Granted { identity } => Ok(Some(identity)),
        }
    }
}

/// Decide access for the current identity. Only the `manager` role is admitted.
pub fn check_access<D: RoleDirectory + ?Sized>(
    identity: Option<Identity>,
    directory: &D,
) -> AccessDecision {
    let Some(identity) = identity else {
        return AccessDecision::RedirectToLogin;
    };
    match directory.role_for(&identity.uid) {
        Ok(Some(role)) if role == MANAGER_ROLE => {
            info!(uid = %identity.uid, "[leads:auth] manager access granted");
            AccessDecision::Granted { identity }
        }
        Ok(role) => {
            warn!(uid = %identity.uid, ?role, "[leads:auth] access denied");
            AccessDecision::Denied {
                notice: ACCESS_DENIED_NOTICE.to_string(),
            }
        }
        Err(err) => {
            warn!(uid = %identity.uid, error = %err, "[leads:auth] role lookup failed");
            AccessDecision::Denied {
                notice: ROLE_CHECK_FAILED_NOTICE.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticRoles(HashMap<String, String>);

    impl RoleDirectory for StaticRoles {
        fn role_for(&self, uid: &str) -> Result<Option<RoleName>, DashboardError> {
            Ok(self.0.get(uid).cloned())
        }
    }

    struct BrokenRoles;

    impl RoleDirectory for BrokenRoles {
        fn role_for(&self, uid: &str) -> Result<Option<RoleName>, DashboardError> {
            Err(DashboardError::RoleLookup {
                user_id: uid.to_string(),
                reason: "offline".into(),
            })
        }
    }

    fn identity(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            email: Some(format!("{uid}@example.com")),
        }
    }

    fn roles() -> StaticRoles {
        StaticRoles(HashMap::from([
            ("boss".to_string(), "manager".to_string()),
            ("clerk".to_string(), "staff".to_string()),
        ]))
    }

    #[test]
    fn missing_identity_redirects() {
        assert_eq!(check_access(None, &roles()), AccessDecision::RedirectToLogin);
    }

    #[test]
    fn manager_is_granted() {
        let decision = check_access(Some(identity("boss")), &roles());
        assert!(decision.is_granted());
        assert_eq!(
            decision.into_result().unwrap().map(|identity| identity.uid),
            Some("boss".to_string())
        );
    }

    #[test]
    fn other_roles_and_missing_roles_are_denied() {
        for uid in ["clerk", "stranger"] {
            let decision = check_access(Some(identity(uid)), &roles());
            assert_eq!(
                decision,
                AccessDecision::Denied {
                    notice: ACCESS_DENIED_NOTICE.to_string()
                }
            );
        }
    }

    #[test]
    fn lookup_failure_is_denied_with_its_own_notice() {
        let decision = check_access(Some(identity("boss")), &BrokenRoles);
        assert!(matches!(
            decision.clone().into_result(),
            Err(DashboardError::AccessDenied(_))
        ));
        assert_eq!(
            decision,
            AccessDecision::Denied {
                notice: ROLE_CHECK_FAILED_NOTICE.to_string()
            }
        );
    }
}
