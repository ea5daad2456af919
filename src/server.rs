//! Inbound HTTP server.
//!
//! Routes:
//! - `/`                 landing page with build info
//! - `{telemetry path}`  one collection pass, Prometheus text format
//! - `/-/ready`          readiness check

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::collector::exporter::Exporter;
use crate::util;

/// Shared router state.
#[derive(Clone)]
pub struct AppState {
    pub exporter: Arc<Exporter>,
    pub telemetry_path: String,
}

/// Builds the router. `telemetry_path` must start with `/`.
pub fn create_router(exporter: Arc<Exporter>, telemetry_path: &str) -> Router {
    let state = AppState {
        exporter,
        telemetry_path: telemetry_path.to_string(),
    };

    Router::new()
        .route("/", get(landing_handler))
        .route(telemetry_path, get(metrics_handler))
        .route("/-/ready", get(ready_handler))
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.exporter.render().await {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            log::error!("Error encoding metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn ready_handler() -> &'static str {
    "ok"
}

async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<html>
<head><title>{name}</title></head>
<body>
<h1>{name}</h1>
<p><a href='{path}'>Metrics</a></p>
<h2>Build</h2>
<pre>{build}</pre>
</body>
</html>"#,
        name = util::NAME,
        path = state.telemetry_path,
        build = util::version_info(),
    ))
}
