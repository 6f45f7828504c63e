use std::sync::{PoisonError, RwLock};

use bella_application::SessionStore;
use bella_core::UserRole;

#[derive(Debug, Default, Clone)]
struct Session {
    token: Option<String>,
    role: Option<String>,
}

/// Process-local session holding a bearer token and role.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Session>,
}

impl InMemorySessionStore {
    /// Creates a store from a token and a raw stored role.
    #[must_use]
    pub fn new(token: Option<String>, role: Option<String>) -> Self {
        Self {
            session: RwLock::new(Session {
                token: token.filter(|token| !token.trim().is_empty()),
                role: role.filter(|role| !role.trim().is_empty()),
            }),
        }
    }

    /// Creates a store without a session.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Stores the session of a successful login.
    pub fn login(&self, token: impl Into<String>, role: UserRole) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.token = Some(token.into());
        session.role = Some(role.as_str().to_owned());
    }

    /// Drops the session.
    pub fn logout(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
    }

    fn snapshot(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for InMemorySessionStore {
    fn is_authenticated(&self) -> bool {
        self.snapshot().token.is_some()
    }

    fn current_role(&self) -> Option<String> {
        self.snapshot().role
    }

    fn token(&self) -> Option<String> {
        self.snapshot().token
    }
}

#[cfg(test)]
mod tests {
    use bella_application::SessionStore;
    use bella_core::UserRole;

    use super::InMemorySessionStore;

    #[test]
    fn blank_tokens_are_not_sessions() {
        let store = InMemorySessionStore::new(Some("  ".to_owned()), Some("admin".to_owned()));
        assert!(!store.is_authenticated());
        assert_eq!(store.current_role().as_deref(), Some("admin"));
    }

    #[test]
    fn login_and_logout_replace_the_session() {
        let store = InMemorySessionStore::anonymous();
        store.login("jwt-token", UserRole::Staff);
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("jwt-token"));
        assert_eq!(store.current_role().as_deref(), Some("staff"));

        store.logout();
        assert!(!store.is_authenticated());
        assert_eq!(store.current_role(), None);
    }
}
