#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::{ensure, Result};
use billdesk::identity::memory::{MemoryProvider, Operation};
use billdesk::identity::IdentityProvider;
use billdesk::navigation::{routes, GuardDecision, RouteGuard};
use billdesk::session::{AuthError, AuthErrorReason, LoadingState, SessionStore, UserIdentity};
use secrecy::SecretString;
use std::sync::Arc;

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn user(uid: &str) -> UserIdentity {
    UserIdentity {
        uid: uid.to_string(),
        email: format!("{uid}@x.com"),
        display_name: None,
        avatar_url: None,
    }
}

fn store_with(provider: &Arc<MemoryProvider>) -> SessionStore {
    SessionStore::new(Arc::clone(provider) as Arc<dyn IdentityProvider>)
}

#[tokio::test]
async fn first_notification_leaves_initializing() -> Result<()> {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let mut listener = store.subscribe();

    ensure!(store.snapshot().loading_state() == LoadingState::Initializing);
    ensure!(listener.apply_pending() == 0);

    provider.initialize(None);
    ensure!(listener.apply_pending() == 1);
    ensure!(store.snapshot().loading_state() == LoadingState::Ready);
    ensure!(!store.snapshot().is_signed_in());
    Ok(())
}

#[tokio::test]
async fn guard_never_redirects_while_initializing() {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let _listener = store.subscribe();
    let guard = RouteGuard::default();

    for path in [routes::ADD_BILL, routes::MY_BILLS, "/my-bills/", "/add-bill?x=1"] {
        let decision = guard.evaluate(&store.snapshot(), path);
        assert_eq!(decision, GuardDecision::Suspend, "path {path}");
    }
}

#[tokio::test]
async fn identity_tracks_the_last_notification() {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let mut listener = store.subscribe();

    let sequence = [
        None,
        Some(user("a")),
        None,
        Some(user("b")),
        Some(user("c")),
        None,
        Some(user("a")),
    ];

    for (applied, notification) in sequence.iter().enumerate() {
        provider.emit(notification.clone());
        assert_eq!(listener.apply_pending(), 1, "notification {applied}");
        assert_eq!(store.snapshot().identity(), notification.as_ref());
    }
}

#[tokio::test]
async fn batched_notifications_apply_in_order() {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    let mut watcher = store.watch();

    provider.emit(Some(user("a")));
    provider.emit(None);
    provider.emit(Some(user("b")));

    assert_eq!(listener.apply_pending(), 3);
    assert!(watcher.has_changed().unwrap());
    assert_eq!(
        watcher.borrow_and_update().identity().map(|identity| identity.uid.as_str()),
        Some("b")
    );
}

#[tokio::test]
async fn login_is_visible_only_after_the_callback() -> Result<()> {
    let provider = Arc::new(MemoryProvider::new().with_account("a@x.com", "pw", Some("Alice")));
    provider.initialize(None);
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();
    let guard = RouteGuard::default();

    store.login("a@x.com", &secret("pw")).await?;
    ensure!(matches!(
        guard.evaluate(&store.snapshot(), routes::ADD_BILL),
        GuardDecision::Redirect(_)
    ));

    listener.apply_pending();
    ensure!(guard.evaluate(&store.snapshot(), routes::ADD_BILL) == GuardDecision::Allow);
    ensure!(store.snapshot().identity().and_then(|identity| identity.display_name.as_deref()) == Some("Alice"));
    Ok(())
}

#[tokio::test]
async fn failed_login_keeps_store_usable() {
    let provider = Arc::new(MemoryProvider::new().with_account("a@x.com", "pw", None));
    provider.initialize(None);
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    let err = store.login("a@x.com", &secret("wrong")).await.unwrap_err();
    assert_eq!(err.reason, AuthErrorReason::InvalidCredentials);

    provider.fail_next(Operation::SignIn, AuthError::network_failure());
    let err = store.login("a@x.com", &secret("pw")).await.unwrap_err();
    assert_eq!(err.reason, AuthErrorReason::NetworkFailure);
    assert_eq!(listener.apply_pending(), 0);
    assert!(!store.snapshot().is_signed_in());

    store.login("a@x.com", &secret("pw")).await.unwrap();
    listener.apply_pending();
    assert!(store.snapshot().is_signed_in());
}

#[tokio::test]
async fn failed_logout_keeps_identity() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(Some(user("a")));
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    provider.fail_next(Operation::SignOut, AuthError::network_failure());
    let err = store.logout().await.unwrap_err();

    assert_eq!(err.reason, AuthErrorReason::NetworkFailure);
    assert_eq!(listener.apply_pending(), 0);
    assert_eq!(store.snapshot().identity(), Some(&user("a")));
}

#[tokio::test]
async fn logout_clears_identity() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(Some(user("a")));
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    store.logout().await.unwrap();
    assert!(!store.snapshot().is_signed_in());

    listener.apply_pending();
    assert!(!store.snapshot().is_signed_in());
    assert!(store.snapshot().is_ready());
}

#[tokio::test]
async fn federated_popup_closed_is_reported() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(None);
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    let err = store.login_with_federated_provider().await.unwrap_err();
    assert_eq!(err.reason, AuthErrorReason::PopupClosed);

    provider.set_federated_identity(Some(user("g")));
    store.login_with_federated_provider().await.unwrap();
    listener.apply_pending();
    assert_eq!(store.snapshot().identity(), Some(&user("g")));
}

#[tokio::test]
async fn register_survives_display_name_failure() -> Result<()> {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(None);
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    provider.fail_next(Operation::UpdateDisplayName, AuthError::network_failure());
    let registration = store.register("a@x.com", &secret("pw"), "Alice").await?;

    ensure!(!registration.display_name_applied());
    listener.apply_pending();
    let session = store.snapshot();
    let identity = session.identity().expect("signed in after registration");
    ensure!(identity.email == "a@x.com");
    ensure!(identity.display_name.is_none());

    store.logout().await?;
    store.login("a@x.com", &secret("pw")).await?;
    listener.apply_pending();
    ensure!(store.snapshot().is_signed_in());
    Ok(())
}

#[tokio::test]
async fn register_applies_display_name() -> Result<()> {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(None);
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    let registration = store.register("a@x.com", &secret("pw"), "Alice").await?;

    ensure!(registration.display_name_applied());
    ensure!(listener.apply_pending() == 2);
    ensure!(store.snapshot().identity().map(UserIdentity::label) == Some("Alice"));
    Ok(())
}

#[tokio::test]
async fn late_logout_after_teardown_is_ignored() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(Some(user("a")));
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    listener.unsubscribe();
    store.logout().await.unwrap();

    assert_eq!(store.snapshot().identity(), Some(&user("a")));
}

#[tokio::test]
async fn unsubscribe_releases_the_provider_registration() {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let listener = store.subscribe();
    provider.initialize(None);
    assert_eq!(provider.notifier().listener_count(), 1);

    listener.unsubscribe();
    provider.emit(Some(user("a")));

    assert_eq!(provider.notifier().listener_count(), 0);
    assert!(!store.snapshot().is_ready());
}

#[tokio::test]
async fn listener_stops_when_store_is_dropped() {
    let provider = Arc::new(MemoryProvider::new());
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    drop(store);

    provider.emit(Some(user("a")));
    assert!(!listener.next().await);
}

#[tokio::test]
async fn logout_clears_identity_while_another_listener_is_live() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(Some(user("a")));
    let store = store_with(&provider);
    let mut listener = store.subscribe();
    listener.apply_pending();

    let second = store.subscribe();
    drop(second);

    store.logout().await.unwrap();
    assert!(!store.snapshot().is_signed_in());
    assert!(store.snapshot().is_ready());
}

#[tokio::test]
async fn resubscribing_after_teardown_restores_logout_writes() {
    let provider = Arc::new(MemoryProvider::new());
    provider.initialize(Some(user("a")));
    let store = store_with(&provider);
    store.subscribe().unsubscribe();

    let mut listener = store.subscribe();
    listener.apply_pending();
    store.logout().await.unwrap();

    assert!(!store.snapshot().is_signed_in());
}
