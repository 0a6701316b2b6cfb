use thiserror::Error;

/// Errors surfaced by the bill client and the runtime configuration.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Report error: {0}")]
    Report(String),
    /// Form input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// True when the bill service answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else if err.is_builder() {
            Self::Serialization(format!("Failed to build request: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}
