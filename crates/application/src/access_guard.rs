use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use bella_core::{AppError, UserRole};

use crate::screen_ports::{NotificationKind, Notifier, SessionStore};

/// Route of the login page.
pub const LOGIN_ROUTE: &str = "/login";

/// How a session without a readable role is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingRolePolicy {
    /// Deny role-restricted routes.
    #[default]
    Deny,
    /// Treat the session as having this role.
    Assume(UserRole),
}

impl FromStr for MissingRolePolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if normalized == "deny" {
            return Ok(Self::Deny);
        }

        match normalized.strip_prefix("assume:") {
            Some(role) => Ok(Self::Assume(role.parse()?)),
            None => Err(AppError::Validation(format!(
                "missing role policy must be 'deny' or 'assume:<role>', got '{value}'"
            ))),
        }
    }
}

/// Outcome of a route-entry check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Entry allowed.
    Granted,
    /// No session; go to the login page.
    RedirectToLogin,
    /// Session lacks a required role; go elsewhere.
    Denied {
        /// Route to navigate to instead.
        redirect: String,
    },
}

/// Route-entry check over the session store.
#[derive(Clone)]
pub struct AccessGuard {
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    missing_role: MissingRolePolicy,
}

impl AccessGuard {
    /// Creates a guard.
    #[must_use]
    pub fn new(
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        missing_role: MissingRolePolicy,
    ) -> Self {
        Self {
            session,
            notifier,
            missing_role,
        }
    }

    /// Checks entry to a route restricted to `allowed` roles. An empty list
    /// only requires a session.
    pub fn check(&self, allowed: &[UserRole]) -> AccessDecision {
        if !self.session.is_authenticated() {
            self.notifier.notify(
                "Please log in to access this page",
                NotificationKind::Error,
                Some("Authentication Required"),
            );
            return AccessDecision::RedirectToLogin;
        }

        if allowed.is_empty() {
            return AccessDecision::Granted;
        }

        let role = match self.session_role() {
            Some(role) => Some(role),
            None => match self.missing_role {
                MissingRolePolicy::Assume(role) => Some(role),
                MissingRolePolicy::Deny => None,
            },
        };

        if let Some(role) = role
            && allowed.contains(&role)
        {
            return AccessDecision::Granted;
        }

        self.notifier.notify(
            "You do not have permission to access this page",
            NotificationKind::Error,
            Some("Access Denied"),
        );
        let redirect = role.map_or(LOGIN_ROUTE, |role| role.dashboard_route());
        AccessDecision::Denied {
            redirect: redirect.to_owned(),
        }
    }

    fn session_role(&self) -> Option<UserRole> {
        let stored = self.session.current_role()?;
        match stored.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(error) => {
                warn!(role = %stored, error = %error, "ignoring unreadable session role");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, PoisonError};

    use bella_core::UserRole;

    use super::{AccessDecision, AccessGuard, LOGIN_ROUTE, MissingRolePolicy};
    use crate::screen_ports::{NotificationKind, Notifier, SessionStore};

    struct FixedSession {
        token: Option<String>,
        role: Option<String>,
    }

    impl SessionStore for FixedSession {
        fn is_authenticated(&self) -> bool {
            self.token.is_some()
        }

        fn current_role(&self) -> Option<String> {
            self.role.clone()
        }

        fn token(&self) -> Option<String> {
            self.token.clone()
        }
    }

    #[derive(Default)]
    struct TitleRecorder {
        titles: Mutex<Vec<Option<String>>>,
    }

    impl Notifier for TitleRecorder {
        fn notify(&self, _message: &str, _kind: NotificationKind, title: Option<&str>) {
            self.titles
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(title.map(str::to_owned));
        }
    }

    fn guard(
        token: Option<&str>,
        role: Option<&str>,
        policy: MissingRolePolicy,
    ) -> (AccessGuard, Arc<TitleRecorder>) {
        let notifier = Arc::new(TitleRecorder::default());
        let session = Arc::new(FixedSession {
            token: token.map(str::to_owned),
            role: role.map(str::to_owned),
        });
        (AccessGuard::new(session, notifier.clone(), policy), notifier)
    }

    #[test]
    fn anonymous_sessions_go_to_login() {
        let (guard, notifier) = guard(None, Some("admin"), MissingRolePolicy::Deny);
        assert_eq!(guard.check(&[UserRole::Admin]), AccessDecision::RedirectToLogin);
        assert_eq!(
            *notifier.titles.lock().unwrap_or_else(PoisonError::into_inner),
            vec![Some("Authentication Required".to_owned())]
        );
    }

    #[test]
    fn wrong_role_is_sent_to_its_dashboard() {
        let (guard, _) = guard(Some("t"), Some("staff"), MissingRolePolicy::Deny);
        assert_eq!(
            guard.check(&[UserRole::Admin]),
            AccessDecision::Denied {
                redirect: "/staff/dashboard".to_owned()
            }
        );
        assert_eq!(
            guard.check(&[UserRole::Admin, UserRole::Staff]),
            AccessDecision::Granted
        );
    }

    #[test]
    fn missing_role_follows_the_configured_policy() {
        let (deny, _) = guard(Some("t"), None, MissingRolePolicy::Deny);
        assert_eq!(
            deny.check(&[UserRole::Customer]),
            AccessDecision::Denied {
                redirect: LOGIN_ROUTE.to_owned()
            }
        );
        assert_eq!(deny.check(&[]), AccessDecision::Granted);

        let (assume, _) = guard(
            Some("t"),
            Some("owner"),
            MissingRolePolicy::Assume(UserRole::Customer),
        );
        assert_eq!(assume.check(&[UserRole::Customer]), AccessDecision::Granted);
    }

    #[test]
    fn policies_parse_from_configuration_text() {
        assert_eq!("deny".parse::<MissingRolePolicy>().ok(), Some(MissingRolePolicy::Deny));
        assert_eq!(
            "assume:Customer".parse::<MissingRolePolicy>().ok(),
            Some(MissingRolePolicy::Assume(UserRole::Customer))
        );
        assert!("allow".parse::<MissingRolePolicy>().is_err());
        assert!("assume:owner".parse::<MissingRolePolicy>().is_err());
    }
}
