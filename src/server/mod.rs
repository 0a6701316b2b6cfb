//! Static host for the compiled web bundle.
//!
//! - `GET /health`: name, version and commit of the host
//! - `GET /config.js`: runtime overrides as `window.BILLDESK_CONFIG`
//! - anything else: files from the bundle directory, `index.html` otherwise,
//!   so client-side routes survive a reload

mod handlers;

use crate::config::RuntimeConfig;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::Extension,
    http::{header, HeaderValue, Request},
    routing::get,
    Router,
};
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};

pub const INDEX_FILE: &str = "index.html";

#[derive(Clone, Debug)]
pub struct HostConfig {
    pub dist: PathBuf,
    pub runtime: RuntimeConfig,
}

/// Rendered `/config.js` body, shared by every request.
#[derive(Clone, Debug)]
pub(crate) struct ConfigScript(pub(crate) Arc<str>);

/// Builds the host router.
/// # Errors
/// Returns an error if the runtime config cannot be rendered.
pub fn router(host: &HostConfig) -> Result<Router> {
    let script = host
        .runtime
        .to_script()
        .context("Failed to render runtime config")?;

    let bundle = ServeDir::new(&host.dist)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(host.dist.join(INDEX_FILE)));

    Ok(Router::new()
        .route("/health", get(handlers::health).head(handlers::health))
        .route("/config.js", get(handlers::config_js))
        .fallback_service(bundle)
        .layer(Extension(ConfigScript(Arc::from(script))))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(TraceLayer::new_for_http().make_span_with(make_span)))
}

/// Serves the bundle until ctrl-c.
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16, host: HostConfig) -> Result<()> {
    let app = router(&host)?;

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Gracefully shutdown");
            }
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let method = request.method().as_str();

    debug_span!("http-request", method, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, http::StatusCode};
    use std::fs;
    use tower::ServiceExt;

    fn bundle() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INDEX_FILE), "<html>billdesk</html>").unwrap();
        fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();
        dir
    }

    fn host(dir: &tempfile::TempDir, runtime: RuntimeConfig) -> HostConfig {
        HostConfig {
            dist: dir.path().to_path_buf(),
            runtime,
        }
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn serves_bundle_files() {
        let dir = bundle();
        let app = router(&host(&dir, RuntimeConfig::default())).unwrap();
        let (status, body) = get_body(app, "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "console.log(1);");
    }

    #[tokio::test]
    async fn client_routes_fall_back_to_index() {
        let dir = bundle();
        for uri in ["/", "/my-bills", "/bills/42"] {
            let app = router(&host(&dir, RuntimeConfig::default())).unwrap();
            let (status, body) = get_body(app, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, "<html>billdesk</html>", "{uri}");
        }
    }

    #[tokio::test]
    async fn config_js_renders_runtime_overrides() {
        let dir = bundle();
        let runtime = RuntimeConfig::from_values(Some("https://bills.tld"), None, None, None);
        let app = router(&host(&dir, runtime)).unwrap();
        let response = app
            .oneshot(Request::get("/config.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            "window.BILLDESK_CONFIG = {\"api_base_url\":\"https://bills.tld\"};\n"
        );
    }
}
