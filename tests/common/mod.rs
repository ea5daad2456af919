//! Shared helpers: a fake Pulumi Service API and exporter builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::Query,
    http::{HeaderMap, StatusCode, header},
    routing::get,
};
use tokio::net::TcpListener;

use pulumiservice_exporter::{Exporter, Metrics, ServiceClient, ServiceOpts, scrapers};

pub const ORG: &str = "acme";
pub const TOKEN: &str = "secret-token";
pub const USER_AGENT: &str = "pulumiservice_exporter_test";

pub const SUMMARY_BODY: &str = r#"{"summary":[{"year":2024,"month":1,"day":1,"hour":3,"resources":7},{"year":2024,"month":1,"day":1,"hour":4,"resources":11}]}"#;

pub const STACKS_BODY: &str = r#"{"stacks":[
    {"orgName":"acme","projectName":"web","stackName":"dev","lastUpdate":1700000000,"resourceCount":4},
    {"orgName":"acme","projectName":"web","stackName":"prod","lastUpdate":1700000100,"resourceCount":9},
    {"orgName":"acme","projectName":"api","stackName":"dev"}
]}"#;

/// Canned answers of the fake API.
#[derive(Clone, Copy)]
pub struct MockApi {
    /// Status of `/api/user` when the request is authorized
    pub user_status: StatusCode,
    pub summary_body: &'static str,
    pub stacks_body: &'static str,

    /// `organization` value the stacks endpoint expects
    pub org: &'static str,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            user_status: StatusCode::OK,
            summary_body: SUMMARY_BODY,
            stacks_body: STACKS_BODY,
            org: ORG,
        }
    }
}

/// True when the request carries the headers the client must send.
fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("token {TOKEN}");
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some(expected.as_str())
        && headers.get(header::ACCEPT).and_then(|v| v.to_str().ok())
            == Some("application/vnd.pulumi+8")
        && headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
            == Some("application/json")
        && headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) == Some(USER_AGENT)
}

/// Starts the fake API on a random port and returns its base URL.
pub async fn start_mock_api(api: MockApi) -> String {
    let summary_path = format!("/api/orgs/{ORG}/resources/summary");

    let router = Router::new()
        .route(
            "/api/user",
            get(move |headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED;
                }
                api.user_status
            }),
        )
        .route(
            &summary_path,
            get(
                move |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return (StatusCode::UNAUTHORIZED, "");
                    }
                    if q.get("granularity").map(String::as_str) != Some("hourly")
                        || q.get("lookbackDays").map(String::as_str) != Some("1")
                    {
                        return (StatusCode::BAD_REQUEST, "");
                    }
                    (StatusCode::OK, api.summary_body)
                },
            ),
        )
        .route(
            "/api/user/stacks",
            get(
                move |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return (StatusCode::UNAUTHORIZED, "");
                    }
                    if q.get("organization").map(String::as_str) != Some(api.org) {
                        return (StatusCode::BAD_REQUEST, "");
                    }
                    (StatusCode::OK, api.stacks_body)
                },
            ),
        );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Returns a base URL nothing listens on.
pub async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn opts(base_url: &str, token: &str) -> ServiceOpts {
    pulumiservice_exporter::util::install_crypto_provider();
    ServiceOpts {
        url: base_url.to_string(),
        access_token: token.to_string(),
        user_agent: USER_AGENT.to_string(),
        timeout: Duration::from_secs(2),
        insecure: false,
        org: ORG.to_string(),
    }
}

pub fn client(base_url: &str) -> ServiceClient {
    ServiceClient::new(opts(base_url, TOKEN)).unwrap()
}

/// Exporter with every built-in scraper enabled.
pub fn exporter(base_url: &str) -> Arc<Exporter> {
    let enabled = scrapers::registry().into_iter().map(|(s, _)| s).collect();
    Arc::new(Exporter::new(client(base_url), Metrics::new().unwrap(), enabled).unwrap())
}
