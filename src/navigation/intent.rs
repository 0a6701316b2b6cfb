use super::routes;

/// Where a redirected user should return after authenticating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationIntent {
    pub target_path: String,
    pub origin_path: Option<String>,
}

impl NavigationIntent {
    pub fn to_login(origin: &str) -> Self {
        Self {
            target_path: routes::LOGIN.to_string(),
            origin_path: Some(origin.to_string()),
        }
    }
}

/// Holds at most one intent. Recording overwrites; taking empties the slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntentSlot {
    intent: Option<NavigationIntent>,
}

impl IntentSlot {
    pub fn record(&mut self, intent: NavigationIntent) {
        self.intent = Some(intent);
    }

    pub fn peek(&self) -> Option<&NavigationIntent> {
        self.intent.as_ref()
    }

    /// Consumes the intent and returns the post-login destination, falling
    /// back to `default_path`.
    pub fn take_destination(&mut self, default_path: &str) -> String {
        self.intent
            .take()
            .and_then(|intent| intent.origin_path)
            .unwrap_or_else(|| default_path.to_string())
    }

    pub fn clear(&mut self) {
        self.intent = None;
    }
}
