//! Session store: the single writer of the process-wide `Session`. Views and
//! the route guard only ever read snapshots through `snapshot` or `watch`;
//! every write comes from the provider subscription or from `logout`.
//!
//! Flow Overview: `subscribe` registers with the identity provider and hands
//! back a `SessionListener`, which the host drives on its event loop. The
//! first notification moves the session out of `Initializing`. `login`,
//! `login_with_federated_provider` and `register` resolve once the provider
//! has answered, but the session only changes when the matching notification
//! is applied by the listener.

mod error;
mod types;

pub use error::{AuthError, AuthErrorReason};
pub use types::{AuthState, LoadingState, Registration, Session, UserIdentity};

use crate::identity::{AuthNotification, AuthSubscription, IdentityProvider};
use secrecy::SecretString;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<watch::Sender<Session>>,
    listeners: Arc<Listeners>,
}

/// Live-listener bookkeeping. The store counts as torn down once it has been
/// subscribed and every listener has been dropped since.
#[derive(Default)]
struct Listeners {
    live: AtomicUsize,
    subscribed: AtomicBool,
}

impl Listeners {
    fn acquire(&self) {
        self.live.fetch_add(1, Ordering::AcqRel);
        self.subscribed.store(true, Ordering::Release);
    }

    fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }

    fn torn_down(&self) -> bool {
        self.subscribed.load(Ordering::Acquire) && self.live.load(Ordering::Acquire) == 0
    }
}

impl SessionStore {
    /// Creates the store in `Initializing`.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            provider,
            state: Arc::new(state),
            listeners: Arc::new(Listeners::default()),
        }
    }

    /// Consistent copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Read-only observer; `changed()` fires after every write.
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Registers for identity-change notifications. The returned listener
    /// must be driven (`run` or `next`) for notifications to reach the
    /// session; dropping it releases the provider registration.
    pub fn subscribe(&self) -> SessionListener {
        self.listeners.acquire();
        SessionListener {
            subscription: self.provider.subscribe(),
            state: Arc::downgrade(&self.state),
            listeners: Arc::clone(&self.listeners),
        }
    }

    /// # Errors
    ///
    /// Returns the provider's `AuthError`; the session is left untouched.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), AuthError> {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(identity) => {
                info!(uid = %identity.uid, "signed in");
                Ok(())
            }
            Err(err) => {
                warn!(reason = %err.reason, "sign-in failed");
                Err(err)
            }
        }
    }

    /// # Errors
    ///
    /// Returns the provider's `AuthError`, `popup-closed` when the consent
    /// window is dismissed.
    #[instrument(skip(self))]
    pub async fn login_with_federated_provider(&self) -> Result<(), AuthError> {
        match self.provider.sign_in_with_federated().await {
            Ok(identity) => {
                info!(uid = %identity.uid, "signed in with federated provider");
                Ok(())
            }
            Err(err) => {
                warn!(reason = %err.reason, "federated sign-in failed");
                Err(err)
            }
        }
    }

    /// Creates the account, then applies the display name best-effort. A
    /// display-name failure is reported in the `Registration`, never by
    /// undoing the account.
    ///
    /// # Errors
    ///
    /// Returns the provider's `AuthError` when the account cannot be created.
    #[instrument(skip(self, email, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &SecretString,
        display_name: &str,
    ) -> Result<Registration, AuthError> {
        let identity = self
            .provider
            .create_account(email, password)
            .await
            .inspect_err(|err| warn!(reason = %err.reason, "account creation failed"))?;
        info!(uid = %identity.uid, "account created");

        let display_name_error = match self.provider.update_display_name(display_name).await {
            Ok(_) => None,
            Err(err) => {
                warn!(reason = %err.reason, "display name was not applied");
                Some(err)
            }
        };

        Ok(Registration { display_name_error })
    }

    /// Signs out and clears the identity. On failure the previous identity
    /// stays in place.
    ///
    /// # Errors
    ///
    /// Returns the provider's `AuthError`.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.provider
            .sign_out()
            .await
            .inspect_err(|err| warn!(reason = %err.reason, "sign-out failed"))?;

        if self.listeners.torn_down() {
            debug!("listener released; ignoring sign-out response");
            return Ok(());
        }

        self.state.send_replace(Session::signed_out());
        info!("signed out");
        Ok(())
    }
}

/// Live registration with the identity provider. Applies notifications to
/// the session in delivery order.
pub struct SessionListener {
    subscription: AuthSubscription,
    state: Weak<watch::Sender<Session>>,
    listeners: Arc<Listeners>,
}

impl SessionListener {
    /// Waits for and applies one notification. Returns `false` once the
    /// provider or the store is gone.
    pub async fn next(&mut self) -> bool {
        match self.subscription.next().await {
            Some(notification) => self.apply(notification),
            None => false,
        }
    }

    /// Applies every notification already delivered, without waiting.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(notification) = self.subscription.try_next() {
            if !self.apply(notification) {
                break;
            }
            applied += 1;
        }
        applied
    }

    /// Drives the listener until the provider or the store goes away.
    pub async fn run(mut self) {
        while self.next().await {}
        debug!("session listener stopped");
    }

    pub fn unsubscribe(self) {}

    fn apply(&self, notification: AuthNotification) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };

        let session = Session::from_notification(notification);
        debug!(signed_in = session.is_signed_in(), "auth state changed");
        state.send_replace(session);
        true
    }
}

impl Drop for SessionListener {
    fn drop(&mut self) {
        self.listeners.release();
    }
}
