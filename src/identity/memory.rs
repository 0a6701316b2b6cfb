//! In-process identity provider with scripted failures. Used by the test
//! suites and for local runs without a configured Firebase project.

use super::{AuthNotifier, AuthSubscription, IdentityProvider};
use crate::session::{AuthError, UserIdentity};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Provider operation that a scripted failure can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    SignIn,
    Federated,
    CreateAccount,
    UpdateDisplayName,
    SignOut,
}

struct Account {
    uid: String,
    password: SecretString,
    display_name: Option<String>,
}

impl Account {
    fn identity(&self, email: &str) -> UserIdentity {
        UserIdentity {
            uid: self.uid.clone(),
            email: email.to_string(),
            display_name: self.display_name.clone(),
            avatar_url: None,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct MemoryProvider {
    notifier: AuthNotifier,
    accounts: Mutex<HashMap<String, Account>>,
    failures: Mutex<HashMap<Operation, AuthError>>,
    federated: Mutex<Option<UserIdentity>>,
}

impl MemoryProvider {
    /// Creates a provider that has not resolved its initial state yet.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        lock(&self.accounts).insert(
            email.to_string(),
            Account {
                uid: format!("local-{email}"),
                password: SecretString::from(password.to_string()),
                display_name: display_name.map(str::to_string),
            },
        );
        self
    }

    /// Resolves the initial state, the way a provider does once it has
    /// checked for a persisted session.
    pub fn initialize(&self, identity: Option<UserIdentity>) {
        self.notifier.publish(identity);
    }

    /// Makes the next call of `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: AuthError) {
        lock(&self.failures).insert(operation, error);
    }

    /// Identity granted by the next federated consent. `None` behaves like a
    /// dismissed consent window.
    pub fn set_federated_identity(&self, identity: Option<UserIdentity>) {
        *lock(&self.federated) = identity;
    }

    /// Pushes an arbitrary transition, as a provider-side sign-in or
    /// sign-out would.
    pub fn emit(&self, identity: Option<UserIdentity>) {
        self.notifier.publish(identity);
    }

    pub fn notifier(&self) -> &AuthNotifier {
        &self.notifier
    }

    fn scripted_failure(&self, operation: Operation) -> Result<(), AuthError> {
        match lock(&self.failures).remove(&operation) {
            Some(error) => {
                debug!(?operation, reason = %error.reason, "scripted failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryProvider {
    fn subscribe(&self) -> AuthSubscription {
        self.notifier.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError> {
        self.scripted_failure(Operation::SignIn)?;

        let identity = {
            let accounts = lock(&self.accounts);
            let account = accounts
                .get(email)
                .filter(|account| account.password.expose_secret() == password.expose_secret())
                .ok_or_else(AuthError::invalid_credentials)?;
            account.identity(email)
        };

        self.notifier.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_with_federated(&self) -> Result<UserIdentity, AuthError> {
        self.scripted_failure(Operation::Federated)?;

        let identity = lock(&self.federated)
            .clone()
            .ok_or_else(AuthError::popup_closed)?;

        self.notifier.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn create_account(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthError> {
        self.scripted_failure(Operation::CreateAccount)?;

        let identity = {
            let mut accounts = lock(&self.accounts);
            if accounts.contains_key(email) {
                return Err(AuthError::invalid_credentials().with_detail("EMAIL_EXISTS"));
            }
            let account = Account {
                uid: format!("local-{email}"),
                password: SecretString::from(password.expose_secret().to_string()),
                display_name: None,
            };
            let identity = account.identity(email);
            accounts.insert(email.to_string(), account);
            identity
        };

        self.notifier.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn update_display_name(&self, display_name: &str) -> Result<UserIdentity, AuthError> {
        self.scripted_failure(Operation::UpdateDisplayName)?;

        let current = self
            .notifier
            .current_identity()
            .ok_or_else(|| AuthError::unknown().with_detail("no signed-in user"))?;

        let identity = {
            let mut accounts = lock(&self.accounts);
            let account = accounts
                .get_mut(&current.email)
                .ok_or_else(|| AuthError::unknown().with_detail("USER_NOT_FOUND"))?;
            account.display_name = Some(display_name.to_string());
            account.identity(&current.email)
        };

        self.notifier.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.scripted_failure(Operation::SignOut)?;
        self.notifier.publish(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AuthErrorReason;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn sign_in_publishes_identity_before_resolving() {
        let provider = MemoryProvider::new().with_account("a@x.com", "pw", Some("Alice"));
        let mut subscription = provider.subscribe();

        let identity = provider
            .sign_in_with_password("a@x.com", &secret("pw"))
            .await
            .expect("sign in");

        assert_eq!(identity.display_name.as_deref(), Some("Alice"));
        assert_eq!(subscription.try_next(), Some(Some(identity)));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let provider = MemoryProvider::new().with_account("a@x.com", "pw", None);
        let err = provider
            .sign_in_with_password("a@x.com", &secret("nope"))
            .await
            .expect_err("must fail");
        assert_eq!(err.reason, AuthErrorReason::InvalidCredentials);
        assert!(provider.notifier().current().is_none());
    }

    #[tokio::test]
    async fn scripted_failure_applies_once() {
        let provider = MemoryProvider::new();
        provider.initialize(None);
        provider.fail_next(Operation::SignOut, AuthError::network_failure());

        assert!(provider.sign_out().await.is_err());
        assert!(provider.sign_out().await.is_ok());
    }

    #[tokio::test]
    async fn federated_without_identity_is_popup_closed() {
        let provider = MemoryProvider::new();
        let err = provider.sign_in_with_federated().await.expect_err("closed");
        assert_eq!(err.reason, AuthErrorReason::PopupClosed);
    }

    #[tokio::test]
    async fn duplicate_account_is_rejected() {
        let provider = MemoryProvider::new().with_account("a@x.com", "pw", None);
        let err = provider
            .create_account("a@x.com", &secret("pw"))
            .await
            .expect_err("exists");
        assert_eq!(err.detail.as_deref(), Some("EMAIL_EXISTS"));
    }
}
