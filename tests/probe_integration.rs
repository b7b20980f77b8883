//! Integration tests for the reqwest probe client with Wiremock
//!
//! Tests HEAD probing and error classification against mock servers.

use latency_router::{ProbeClient, ProbeClientConfig, ProbeError, ReqwestProbeClient};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> ReqwestProbeClient {
    ReqwestProbeClient::new(&ProbeClientConfig::default()).unwrap()
}

/// Test a healthy endpoint answers the HEAD probe
#[tokio::test]
async fn test_head_probe_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client()
        .head(&format!("{}/", mock_server.uri()), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.is_success());
    assert!(response.elapsed < Duration::from_secs(1));
}

/// Test probing only ever uses HEAD
#[tokio::test]
async fn test_probe_uses_head_method() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client()
        .head(&mock_server.uri(), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(response.status, 204);
    assert!(response.is_success());
}

/// Test a non-2xx status is reported, not turned into an error
#[tokio::test]
async fn test_head_probe_unhealthy_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client()
        .head(&mock_server.uri(), Duration::from_secs(1))
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
}

/// Test a slow endpoint times out
#[tokio::test]
async fn test_head_probe_timeout() {
    let mock_server = MockServer::start().await;

    // Mock with delay longer than probe timeout
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let result = client()
        .head(&mock_server.uri(), Duration::from_millis(100))
        .await;

    assert_eq!(result, Err(ProbeError::Timeout));
}

/// Test repeated probes keep working against the shared pool
#[tokio::test]
async fn test_repeated_probes_reuse_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ignored"))
        .expect(50)
        .mount(&mock_server)
        .await;

    let client = client();
    for _ in 0..50 {
        let response = client
            .head(&mock_server.uri(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }
}

/// Test a URL that cannot become a request is rejected up front
#[tokio::test]
async fn test_head_probe_invalid_request() {
    let result = client().head("://nowhere", Duration::from_millis(100)).await;
    assert!(matches!(result, Err(ProbeError::InvalidRequest(_))));
}
