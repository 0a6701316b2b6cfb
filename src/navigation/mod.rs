//! Navigation model: route table, route guard and the post-login intent.
//!
//! The router composes the guard with the route table. A redirect records a
//! `NavigationIntent` (last write wins); `after_login` consumes it and yields
//! the destination, or the default landing path when none was recorded.

mod guard;
mod intent;
pub mod routes;

pub use guard::{GuardDecision, GuardedPaths, PathPattern, RouteGuard};
pub use intent::{IntentSlot, NavigationIntent};
pub use routes::Route;

use crate::session::Session;
use tracing::debug;

/// Render decision for one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Suspend,
    Redirect(NavigationIntent),
}

#[derive(Clone, Debug)]
pub struct Router {
    guard: RouteGuard,
    intent: IntentSlot,
    landing_path: String,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouteGuard::default())
    }
}

impl Router {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            intent: IntentSlot::default(),
            landing_path: routes::HOME.to_string(),
        }
    }

    #[must_use]
    pub fn with_landing_path(mut self, landing_path: impl Into<String>) -> Self {
        self.landing_path = landing_path.into();
        self
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn pending_intent(&self) -> Option<&NavigationIntent> {
        self.intent.peek()
    }

    /// Resolves `path` against `session`, recording the intent on redirect.
    pub fn navigate(&mut self, session: &Session, path: &str) -> Resolution {
        match self.guard.evaluate(session, path) {
            GuardDecision::Allow => Resolution::Render(Route::parse(path)),
            GuardDecision::Suspend => Resolution::Suspend,
            GuardDecision::Redirect(intent) => {
                debug!(origin = ?intent.origin_path, "redirecting to login");
                self.intent.record(intent.clone());
                Resolution::Redirect(intent)
            }
        }
    }

    /// Post-login destination; consumes the recorded intent.
    pub fn after_login(&mut self) -> String {
        self.intent.take_destination(&self.landing_path)
    }
}
