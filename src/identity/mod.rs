//! Identity provider seam. The session store only sees this trait: every
//! operation is an opaque asynchronous call with a success or an `AuthError`,
//! and state changes arrive through `subscribe`. Providers must never log
//! passwords or tokens.

pub mod firebase;
pub mod memory;
mod notifier;

pub use notifier::{AuthNotification, AuthNotifier, AuthSubscription};

use crate::session::{AuthError, UserIdentity};
use async_trait::async_trait;
use secrecy::SecretString;

/// External service verifying credentials and issuing user identities.
///
/// Sign-in style operations publish the resulting state through the
/// provider's notifier before they resolve; callers must not treat the
/// returned identity as the session state.
#[async_trait(?Send)]
pub trait IdentityProvider: Send + Sync {
    /// Registers for auth-state notifications. Once the provider knows its
    /// initial state the first notification is delivered immediately.
    fn subscribe(&self) -> AuthSubscription;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError>;

    /// Runs the provider-hosted consent flow.
    async fn sign_in_with_federated(&self) -> Result<UserIdentity, AuthError>;

    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError>;

    /// Sets the display name of the currently signed-in user.
    async fn update_display_name(&self, display_name: &str) -> Result<UserIdentity, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}
