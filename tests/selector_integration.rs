//! Integration tests for the latency selector with Wiremock
//!
//! Every region is served by one mock server and told apart by the
//! `region` query parameter; the "local" region answers at once while the
//! others are delayed.

use latency_router::{
    EndpointSet, LatencySelector, ProbeClientConfig, ReqwestProbeClient, Router, SelectorConfig,
    SelectorState,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const REMOTE_DELAY: Duration = Duration::from_millis(50);

/// Answers immediately for the local region, after `REMOTE_DELAY` otherwise.
struct RegionLatency {
    local: Arc<Mutex<String>>,
}

impl Respond for RegionLatency {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let region = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "region")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default();

        if region == *self.local.lock() {
            ResponseTemplate::new(200)
        } else {
            ResponseTemplate::new(200).set_delay(REMOTE_DELAY)
        }
    }
}

async fn start_server(local: &Arc<Mutex<String>>) -> MockServer {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(RegionLatency {
            local: local.clone(),
        })
        .mount(&mock_server)
        .await;

    mock_server
}

fn endpoints(base: &str) -> EndpointSet {
    EndpointSet {
        asia_pacific: format!("{}/?region=apac", base),
        europe: format!("{}/?region=eu", base),
        universal: format!("{}/?region=universal", base),
        us_east: format!("{}/?region=us-east", base),
        us_west: format!("{}/?region=us-west", base),
        fallback: format!("{}/?region=fallback", base),
    }
}

fn probe_client() -> Arc<ReqwestProbeClient> {
    Arc::new(ReqwestProbeClient::new(&ProbeClientConfig::default()).unwrap())
}

/// Test the selector picks whichever region answers first
#[tokio::test]
async fn test_picks_local_region() {
    for local in ["us-east", "us-west", "apac", "eu"] {
        let local_region = Arc::new(Mutex::new(local.to_string()));
        let mock_server = start_server(&local_region).await;

        let selector = LatencySelector::with_client(
            endpoints(&mock_server.uri()),
            SelectorConfig::default(),
            probe_client(),
        )
        .await
        .unwrap();

        let current = selector.current_endpoint();
        assert!(
            current.ends_with(&format!("region={}", local)),
            "got {} wanted an endpoint for {}",
            current,
            local
        );
        assert_eq!(selector.state(), SelectorState::Static);
    }
}

/// Test the default reqwest client is used when none is supplied
#[tokio::test]
async fn test_default_client() {
    let local_region = Arc::new(Mutex::new("eu".to_string()));
    let mock_server = start_server(&local_region).await;

    let selector = LatencySelector::new(endpoints(&mock_server.uri()), SelectorConfig::default())
        .await
        .unwrap();

    assert!(selector.current_endpoint().ends_with("region=eu"));
}

/// Test the previous choice survives a round where every endpoint fails
#[tokio::test]
async fn test_total_failure_keeps_previous_endpoint() {
    let local_region = Arc::new(Mutex::new("eu".to_string()));
    let mock_server = start_server(&local_region).await;

    let selector = LatencySelector::with_client(
        endpoints(&mock_server.uri()),
        SelectorConfig::default(),
        probe_client(),
    )
    .await
    .unwrap();
    let chosen = selector.current_endpoint();
    assert!(chosen.ends_with("region=eu"));

    mock_server.reset().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let results = selector.probe_now().await;

    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| !r.is_reachable()));
    assert_eq!(selector.current_endpoint(), chosen);
}

/// Test unreachable endpoints leave the seeded endpoint in place
#[tokio::test]
async fn test_connection_errors_keep_seed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{}", addr);
    let config = SelectorConfig::default()
        .probe_timeout(Duration::from_millis(300))
        .region("us-west-2");

    let selector = LatencySelector::with_client(endpoints(&base), config, probe_client())
        .await
        .unwrap();

    assert_eq!(selector.current_endpoint(), format!("{}/?region=us-west", base));
}

/// Test a bad status loses even if it is the quickest answer
#[tokio::test]
async fn test_bad_status_loses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(wiremock::matchers::query_param("region", "eu"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(REMOTE_DELAY))
        .mount(&mock_server)
        .await;

    let selector = LatencySelector::with_client(
        endpoints(&mock_server.uri()),
        SelectorConfig::default(),
        probe_client(),
    )
    .await
    .unwrap();

    let current = selector.current_endpoint();
    assert!(!current.ends_with("region=eu"));
    assert!(!current.ends_with("region=fallback"));
}

/// Test periodic refresh follows the fastest endpoint as it moves
#[tokio::test]
async fn test_refresh_switches_endpoint() {
    let local_region = Arc::new(Mutex::new("us-east".to_string()));
    let mock_server = start_server(&local_region).await;

    let config = SelectorConfig::default().ping_interval(Duration::from_millis(500));
    let selector =
        LatencySelector::with_client(endpoints(&mock_server.uri()), config, probe_client())
            .await
            .unwrap();

    assert!(selector.current_endpoint().ends_with("region=us-east"));
    assert!(selector.is_refreshing());

    *local_region.lock() = "eu".to_string();
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert!(selector.current_endpoint().ends_with("region=eu"));

    // initial round plus at least two refresh rounds, five probes each
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.len() >= 15, "only {} probes seen", requests.len());

    selector.stop();
}

/// Test constructing and stopping repeatedly leaves no refresh task behind
#[tokio::test]
async fn test_construct_and_stop_leaves_no_task() {
    let local_region = Arc::new(Mutex::new("eu".to_string()));
    let mock_server = start_server(&local_region).await;
    let client = probe_client();

    let mut selectors = Vec::new();
    for _ in 0..10 {
        let config = SelectorConfig::default().ping_interval(Duration::from_millis(20));
        let selector =
            LatencySelector::with_client(endpoints(&mock_server.uri()), config, client.clone())
                .await
                .unwrap();
        selector.stop();
        selectors.push(selector);
    }

    // grace period
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(selectors.iter().all(|s| !s.is_refreshing()));
    assert!(selectors.iter().all(|s| s.state() == SelectorState::Stopped));

    let seen = mock_server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(mock_server.received_requests().await.unwrap().len(), seen);
}

/// Test stop can be called more than once
#[tokio::test]
async fn test_stop_twice() {
    let local_region = Arc::new(Mutex::new("eu".to_string()));
    let mock_server = start_server(&local_region).await;

    let config = SelectorConfig::default().ping_interval(Duration::from_millis(100));
    let selector =
        LatencySelector::with_client(endpoints(&mock_server.uri()), config, probe_client())
            .await
            .unwrap();

    selector.stop();
    selector.stop();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!selector.is_refreshing());
    assert!(selector.current_endpoint().ends_with("region=eu"));
}

/// Test the selector plugs into a router as its modifier
#[tokio::test]
async fn test_router_with_selector_modifier() {
    let local_region = Arc::new(Mutex::new("apac".to_string()));
    let mock_server = start_server(&local_region).await;

    let router = Router::new(endpoints(&mock_server.uri()), Some("us-east-1".to_string())).unwrap();
    assert!(router.router_url().ends_with("region=us-east"));
    assert!(router.modifier_url().ends_with("region=us-east"));

    let selector = LatencySelector::with_client(
        router.endpoints().clone(),
        SelectorConfig::default(),
        probe_client(),
    )
    .await
    .unwrap();
    router.add_modifier(Arc::new(selector));

    assert!(router.modifier_url().ends_with("region=apac"));
}
