//! Shared `reqwest` client construction for both targets.

use reqwest::Client;

/// Default request timeout applied on native targets; browsers enforce their own.
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Builds the HTTP client used by the identity adapter and the bill client.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
#[cfg(not(target_arch = "wasm32"))]
pub fn client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .build()
}

/// Builds the HTTP client used by the identity adapter and the bill client.
///
/// # Errors
///
/// Returns an error if the fetch client cannot be created.
#[cfg(target_arch = "wasm32")]
pub fn client() -> reqwest::Result<Client> {
    Client::builder().build()
}

/// Joins a base URL and a path without doubling or dropping slashes.
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
