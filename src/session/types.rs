//! Session value types. A `Session` is always read as a whole snapshot; no
//! field is ever patched in place.

use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserIdentity {
    /// Name shown in the navigation bar; falls back to the email address.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Whether the identity provider has reported at least once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingState {
    Initializing,
    Ready,
}

/// Sign-in state. `Initializing` is kept apart from `SignedOut` so "no user
/// yet" can never be mistaken for "not signed in".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Initializing,
    SignedOut,
    SignedIn(UserIdentity),
}

/// Process-wide record of the current sign-in state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    state: AuthState,
}

impl Session {
    pub fn initializing() -> Self {
        Self::default()
    }

    pub fn signed_out() -> Self {
        Self {
            state: AuthState::SignedOut,
        }
    }

    pub fn signed_in(identity: UserIdentity) -> Self {
        Self {
            state: AuthState::SignedIn(identity),
        }
    }

    /// Builds the session that follows a provider notification.
    pub fn from_notification(identity: Option<UserIdentity>) -> Self {
        identity.map_or_else(Self::signed_out, Self::signed_in)
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn loading_state(&self) -> LoadingState {
        match self.state {
            AuthState::Initializing => LoadingState::Initializing,
            AuthState::SignedOut | AuthState::SignedIn(_) => LoadingState::Ready,
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        match &self.state {
            AuthState::SignedIn(identity) => Some(identity),
            AuthState::Initializing | AuthState::SignedOut => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.loading_state() == LoadingState::Ready
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity().is_some()
    }
}

/// Outcome of a successful account creation. The account exists even when
/// the display name could not be applied.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub display_name_error: Option<super::AuthError>,
}

impl Registration {
    pub fn display_name_applied(&self) -> bool {
        self.display_name_error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserIdentity {
        UserIdentity {
            uid: "uid-alice".to_string(),
            email: "a@x.com".to_string(),
            display_name: Some("Alice".to_string()),
            avatar_url: None,
        }
    }

    #[test]
    fn new_session_is_initializing_without_identity() {
        let session = Session::initializing();
        assert_eq!(session.loading_state(), LoadingState::Initializing);
        assert!(session.identity().is_none());
        assert!(!session.is_ready());
    }

    #[test]
    fn notification_without_user_is_ready_and_signed_out() {
        let session = Session::from_notification(None);
        assert_eq!(session.state(), &AuthState::SignedOut);
        assert!(session.is_ready());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn notification_with_user_carries_identity() {
        let session = Session::from_notification(Some(alice()));
        assert_eq!(session.identity().map(|i| i.email.as_str()), Some("a@x.com"));
        assert_eq!(session.loading_state(), LoadingState::Ready);
    }

    #[test]
    fn label_falls_back_to_email() {
        let mut identity = alice();
        assert_eq!(identity.label(), "Alice");
        identity.display_name = Some("  ".to_string());
        assert_eq!(identity.label(), "a@x.com");
        identity.display_name = None;
        assert_eq!(identity.label(), "a@x.com");
    }
}
