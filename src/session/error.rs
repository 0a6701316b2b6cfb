use thiserror::Error;

/// Why an identity-provider call failed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AuthErrorReason {
    #[error("invalid-credentials")]
    InvalidCredentials,
    #[error("network-failure")]
    NetworkFailure,
    #[error("popup-closed")]
    PopupClosed,
    #[error("unknown")]
    Unknown,
}

/// Failure surfaced by session operations. Never fatal to the session store.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}", self.message())]
pub struct AuthError {
    pub reason: AuthErrorReason,
    pub detail: Option<String>,
}

impl AuthError {
    pub fn new(reason: AuthErrorReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn invalid_credentials() -> Self {
        Self::new(AuthErrorReason::InvalidCredentials)
    }

    pub fn network_failure() -> Self {
        Self::new(AuthErrorReason::NetworkFailure)
    }

    pub fn popup_closed() -> Self {
        Self::new(AuthErrorReason::PopupClosed)
    }

    pub fn unknown() -> Self {
        Self::new(AuthErrorReason::Unknown)
    }

    /// User-facing text for toasts.
    pub fn message(&self) -> String {
        let base = match self.reason {
            AuthErrorReason::InvalidCredentials => "Invalid email or password.",
            AuthErrorReason::NetworkFailure => "Unable to reach the sign-in service.",
            AuthErrorReason::PopupClosed => "Sign-in window was closed.",
            AuthErrorReason::Unknown => "Sign-in failed.",
        };
        match &self.detail {
            Some(detail) => format!("{base} ({detail})"),
            None => base.to_string(),
        }
    }
}
