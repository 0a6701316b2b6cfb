//! Auth context for the views. The provider builds the identity adapter,
//! subscribes the session store and mirrors every store write into a signal.
//! Views read the signal and call the store; they never write the session.

use super::browser::{self, BrowserConsent, LocalStorageTokenStore};
use super::components::AlertKind;
use crate::bills::BillClient;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::http;
use crate::identity::{firebase::FirebaseProvider, memory::MemoryProvider, IdentityProvider};
use crate::navigation::Router;
use crate::session::{Session, SessionStore, UserIdentity};
use leptos::{leptos_dom::helpers::set_timeout, prelude::*, task::spawn_local};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const TOAST_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Clone, Copy)]
pub struct AuthContext {
    pub store: StoredValue<SessionStore>,
    pub session: RwSignal<Session>,
    /// Route guard plus the pending post-login intent.
    pub router: RwSignal<Router>,
    pub is_authenticated: Signal<bool>,
}

impl AuthContext {
    fn new(store: SessionStore, session: RwSignal<Session>) -> Self {
        let is_authenticated = Signal::derive(move || session.with(Session::is_signed_in));
        Self {
            store: StoredValue::new(store),
            session,
            router: RwSignal::new(Router::default()),
            is_authenticated,
        }
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        self.session.with(|session| session.identity().cloned())
    }

    pub fn email_untracked(&self) -> Option<String> {
        self.session
            .with_untracked(|session| session.identity().map(|identity| identity.email.clone()))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
}

/// Transient notifications shown above every view.
#[derive(Clone, Copy)]
pub struct Toasts {
    pub items: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, kind: AlertKind, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.items.update(|items| {
            items.push(Toast {
                id,
                kind,
                message: message.into(),
            });
        });

        let items = self.items;
        set_timeout(
            move || items.update(|items| items.retain(|toast| toast.id != id)),
            TOAST_TIMEOUT,
        );
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(AlertKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(AlertKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(AlertKind::Info, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|toast| toast.id != id));
    }
}

/// Builds the identity adapter: Firebase when an API key is configured,
/// otherwise in-memory accounts that last for the page lifetime.
fn identity_provider(config: &AppConfig) -> Arc<dyn IdentityProvider> {
    if config.has_identity_provider() {
        match FirebaseProvider::new(
            config.firebase_config(&browser::origin()),
            Arc::new(LocalStorageTokenStore),
            Arc::new(BrowserConsent),
        ) {
            Ok(provider) => {
                let provider = Arc::new(provider);
                let restore = Arc::clone(&provider);
                spawn_local(async move { restore.restore().await });
                return provider;
            }
            Err(err) => warn!("identity adapter unavailable: {err}"),
        }
    } else {
        warn!("no identity provider configured; accounts are kept in memory");
    }

    let provider = MemoryProvider::new();
    provider.initialize(None);
    Arc::new(provider)
}

/// Provides auth context and the toast queue, and starts the session listener.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let config = AppConfig::load();
    let store = SessionStore::new(identity_provider(&config));

    let session = RwSignal::new(store.snapshot());
    let listener = store.subscribe();
    let mut updates = store.watch();

    provide_context(AuthContext::new(store, session));
    provide_context(Toasts::new());

    spawn_local(listener.run());
    spawn_local(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            session.set(snapshot);
        }
    });

    view! { {children()} }
}

/// Returns the auth context or a fallback that stays initializing.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| {
        let provider = MemoryProvider::new();
        AuthContext::new(
            SessionStore::new(Arc::new(provider)),
            RwSignal::new(Session::initializing()),
        )
    })
}

pub fn use_toasts() -> Toasts {
    use_context::<Toasts>().unwrap_or_else(Toasts::new)
}

/// Bill-service client for the configured base URL.
pub fn bill_client() -> Result<BillClient, AppError> {
    let config = AppConfig::load();
    let client = http::client()
        .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;
    BillClient::new(client, &config.api_base_url)
}
