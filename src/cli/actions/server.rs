use crate::{config::RuntimeConfig, server};
use anyhow::{bail, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dist: PathBuf,
    pub runtime: RuntimeConfig,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the bundle directory is missing or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    if !args.dist.join(server::INDEX_FILE).is_file() {
        bail!(
            "bundle not found: {} (build the web target first)",
            args.dist.join(server::INDEX_FILE).display()
        );
    }

    info!(
        port = args.port,
        dist = %args.dist.display(),
        api_base_url = args.runtime.api_base_url.as_deref().unwrap_or("<build default>"),
        identity = if args.runtime.firebase_api_key.is_some() { "firebase" } else { "build default" },
        "Starting static host"
    );

    let host = server::HostConfig {
        dist: args.dist,
        runtime: args.runtime,
    };

    server::new(args.port, host).await
}
