//! ServiceClient against a fake Pulumi Service API.

mod common;

use axum::http::StatusCode;
use common::{MockApi, ORG};
use pulumiservice_exporter::{ClientError, ServiceClient};

#[tokio::test]
async fn ping_ok_on_200() {
    let base_url = common::start_mock_api(MockApi::default()).await;
    let client = common::client(&base_url);

    assert!(client.ping().await.is_ok());
}

#[tokio::test]
async fn ping_auth_error_on_401() {
    let base_url = common::start_mock_api(MockApi::default()).await;
    let client = ServiceClient::new(common::opts(&base_url, "wrong-token")).unwrap();

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Auth));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let base_url = common::start_mock_api(MockApi::default()).await;

    let mut opts = common::opts(&base_url, common::TOKEN);
    assert!(ServiceClient::new(opts.clone()).unwrap().ping().await.is_ok());

    opts.user_agent = "some-other-agent".to_string();
    let err = ServiceClient::new(opts).unwrap().ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Auth));
}

#[tokio::test]
async fn ping_transport_error_on_500() {
    let base_url = common::start_mock_api(MockApi {
        user_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..MockApi::default()
    })
    .await;
    let client = common::client(&base_url);

    let err = client.ping().await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(
        err,
        ClientError::UnexpectedStatus { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn ping_transport_error_when_unreachable() {
    let client = common::client(&common::closed_url().await);

    let err = client.ping().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { .. }));
}

#[tokio::test]
async fn request_returns_body_on_200() {
    let base_url = common::start_mock_api(MockApi::default()).await;
    let client = common::client(&base_url);

    let body = client
        .request(&format!("/user/stacks?organization={ORG}"))
        .await
        .unwrap();
    assert_eq!(body, common::STACKS_BODY.as_bytes());
}

#[tokio::test]
async fn request_unexpected_status_on_non_200() {
    let base_url = common::start_mock_api(MockApi::default()).await;
    let client = common::client(&base_url);

    let err = client.request("/does/not/exist").await.unwrap_err();
    match err {
        ClientError::UnexpectedStatus { endpoint, status } => {
            assert_eq!(endpoint, "/does/not/exist");
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn base_url_without_scheme_is_reachable() {
    let base_url = common::start_mock_api(MockApi::default()).await;
    let without_scheme = base_url.trim_start_matches("http://");
    let client = ServiceClient::new(common::opts(without_scheme, common::TOKEN)).unwrap();

    assert_eq!(client.base_url(), base_url);
    assert!(client.ping().await.is_ok());
}
