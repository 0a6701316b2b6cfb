//! # Billdesk (Utility Bill Management)
//!
//! `billdesk` is a browser front end for browsing utility bills, adding new
//! ones, paying them and managing the resulting payment history. Persistence
//! lives behind two external collaborators: a REST bill service and an
//! identity provider.
//!
//! ## Authentication-Gated Navigation
//!
//! - **Session Store:** the single writer of the process-wide session. It
//!   starts in `Initializing` and only leaves that state when the identity
//!   provider reports for the first time.
//! - **Route Guard:** a pure decision over a session snapshot and a path:
//!   `Suspend` while initializing, `Allow` when signed in (or unguarded),
//!   `Redirect` to `/login` otherwise.
//! - **Router:** records the redirect as a single-use `NavigationIntent` and
//!   returns the user to the original path after login.
//!
//! ## Targets
//!
//! On `wasm32` the crate mounts the Leptos views (`web`). Natively it builds
//! the static host (`cli`, `server`) that serves the compiled bundle and its
//! runtime configuration.

pub mod bills;
pub mod config;
pub mod errors;
pub mod http;
pub mod identity;
pub mod navigation;
pub mod session;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use errors::AppError;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent() {
        assert!(APP_USER_AGENT.starts_with("billdesk/"));
    }
}
