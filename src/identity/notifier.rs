//! Auth-state fan-out shared by identity providers. Each subscriber gets its
//! own ordered, unbounded queue so no transition is coalesced or reordered.

use crate::session::UserIdentity;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// One auth-state transition: `None` means no signed-in user.
pub type AuthNotification = Option<UserIdentity>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: BTreeMap<u64, UnboundedSender<AuthNotification>>,
    // `None` until the provider has resolved its initial state.
    current: Option<AuthNotification>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publishes auth-state transitions to every live subscription.
#[derive(Clone, Default)]
pub struct AuthNotifier {
    registry: Arc<Mutex<Registry>>,
}

impl AuthNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. When the initial state is already known it is
    /// queued immediately, so the first `next()` resolves without waiting.
    pub fn subscribe(&self) -> AuthSubscription {
        let (sender, events) = mpsc::unbounded_channel();
        let mut registry = lock(&self.registry);

        if let Some(current) = &registry.current {
            // The receiver is alive in this scope.
            let _ = sender.send(current.clone());
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.insert(id, sender);
        trace!(id, "auth subscription registered");

        AuthSubscription {
            id,
            events,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Records the new state and delivers it to every listener in order.
    pub fn publish(&self, notification: AuthNotification) {
        let mut registry = lock(&self.registry);
        registry.current = Some(notification.clone());
        registry
            .listeners
            .retain(|_, sender| sender.send(notification.clone()).is_ok());
    }

    /// Last published state, `None` while the provider is still resolving.
    pub fn current(&self) -> Option<AuthNotification> {
        lock(&self.registry).current.clone()
    }

    pub fn current_identity(&self) -> Option<UserIdentity> {
        self.current().flatten()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

/// Registration handle returned by `subscribe`. Dropping it releases the
/// registration, whichever path the owner leaves through.
pub struct AuthSubscription {
    id: u64,
    events: UnboundedReceiver<AuthNotification>,
    registry: Weak<Mutex<Registry>>,
}

impl AuthSubscription {
    /// Waits for the next transition. `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthNotification> {
        self.events.recv().await
    }

    /// Returns an already-queued transition without waiting.
    pub fn try_next(&mut self) -> Option<AuthNotification> {
        self.events.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).listeners.remove(&self.id);
            trace!(id = self.id, "auth subscription released");
        }
    }
}
