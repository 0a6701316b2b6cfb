use crate::cli::actions::{server::Args, Action};
use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dist = matches
        .get_one::<String>("dist")
        .map(PathBuf::from)
        .context("missing required argument: --dist")?;

    let runtime = RuntimeConfig::from_values(
        matches.get_one::<String>("api-base-url").map(String::as_str),
        matches
            .get_one::<String>("firebase-api-key")
            .map(String::as_str),
        None,
        None,
    );

    Ok(Action::Server(Args {
        port,
        dist,
        runtime,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_builds_server_action() {
        temp_env::with_vars(
            [
                ("BILLDESK_API_BASE_URL", None::<&str>),
                ("BILLDESK_FIREBASE_API_KEY", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "billdesk",
                    "--port",
                    "3000",
                    "--api-base-url",
                    " https://bills.tld ",
                    "--firebase-api-key",
                    "   ",
                ]);
                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 3000);
                assert_eq!(args.dist, PathBuf::from("dist"));
                assert_eq!(
                    args.runtime.api_base_url.as_deref(),
                    Some("https://bills.tld")
                );
                assert_eq!(args.runtime.firebase_api_key, None);
            },
        );
    }
}
