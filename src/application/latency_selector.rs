//! Latency Selector
//!
//! Owns the currently preferred endpoint and keeps it up to date by
//! probing every candidate at construction and then on a fixed interval.

use crate::adapters::outbound::{ProbeClientConfig, ReqwestProbeClient};
use crate::domain::entities::{EndpointSet, ProbeResult};
use crate::domain::errors::EndpointError;
use crate::domain::ports::{EndpointSource, ProbeClient};
use crate::domain::services::{resolve_region_endpoint, LatencyProbe};
use crate::domain::value_objects::EndpointRegion;
use crate::infrastructure::{RefreshScheduler, StopSignal};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Selector configuration.
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Interval between probe rounds. `None` or zero disables refreshing.
    pub ping_interval: Option<Duration>,
    /// Shared deadline for all probes of one round
    pub probe_timeout: Duration,
    /// Log every probe outcome and selection
    pub debug: bool,
    /// Deployment region used to seed the choice (e.g. "us-east-1")
    pub region: Option<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            ping_interval: None,
            probe_timeout: Duration::from_millis(1000),
            debug: false,
            region: None,
        }
    }
}

impl SelectorConfig {
    /// Set the refresh interval.
    pub fn ping_interval(mut self, interval: Duration) -> Self {
        self.ping_interval = Some(interval);
        self
    }

    /// Set the per-round probe deadline.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Enable or disable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the deployment region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    fn refresh_interval(&self) -> Option<Duration> {
        self.ping_interval.filter(|interval| !interval.is_zero())
    }
}

/// Errors building a selector with the default probe client.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("failed to build probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Lifecycle state of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    /// Holds the region / universal / fallback seed, no round finished yet
    Seeded,
    /// A probe round is in flight
    Probing,
    /// Waiting for the next refresh tick
    Idle,
    /// Refresh disabled; the choice made at construction is kept
    Static,
    /// Stop requested; no further rounds will run
    Stopped,
}

impl SelectorState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Seeded,
            1 => Self::Probing,
            2 => Self::Idle,
            3 => Self::Static,
            _ => Self::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Seeded => 0,
            Self::Probing => 1,
            Self::Idle => 2,
            Self::Static => 3,
            Self::Stopped => 4,
        }
    }
}

impl std::fmt::Display for SelectorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectorState::Seeded => write!(f, "seeded"),
            SelectorState::Probing => write!(f, "probing"),
            SelectorState::Idle => write!(f, "idle"),
            SelectorState::Static => write!(f, "static"),
            SelectorState::Stopped => write!(f, "stopped"),
        }
    }
}

/// State shared with the refresh task.
struct Shared {
    endpoints: EndpointSet,
    client: Arc<dyn ProbeClient>,
    probe_timeout: Duration,
    debug: bool,
    /// Currently preferred endpoint, always one of `endpoints`
    best: RwLock<String>,
    /// Encoded [`SelectorState`]
    state: AtomicU8,
    /// Serializes rounds
    round_lock: tokio::sync::Mutex<()>,
    stop: StopSignal,
}

impl Shared {
    fn state(&self) -> SelectorState {
        if self.stop.is_stopped() {
            return SelectorState::Stopped;
        }
        SelectorState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn transition(&self, from: SelectorState, to: SelectorState) -> bool {
        self.state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Run one probe round and record the winner, if any.
    async fn run_round(&self) -> Vec<ProbeResult> {
        let _round = self.round_lock.lock().await;
        if self.stop.is_stopped() {
            return Vec::new();
        }

        let entered = self.transition(SelectorState::Seeded, SelectorState::Probing)
            || self.transition(SelectorState::Idle, SelectorState::Probing);

        let results = LatencyProbe::probe_all(
            self.client.as_ref(),
            &self.endpoints,
            self.probe_timeout,
            self.debug,
        )
        .await;

        match LatencyProbe::pick_fastest(&results) {
            Some(fastest) => {
                let mut best = self.best.write();
                if *best != fastest.url {
                    tracing::info!(
                        "fastest endpoint changed from {} to {} ({}, {:?})",
                        best,
                        fastest.url,
                        fastest.region,
                        fastest.elapsed
                    );
                    *best = fastest.url.clone();
                } else if self.debug {
                    tracing::debug!("fastest endpoint is still {} ({:?})", best, fastest.elapsed);
                }
            }
            None => {
                if self.debug {
                    tracing::debug!(
                        "no endpoint answered within {:?}, keeping {}",
                        self.probe_timeout,
                        self.best.read()
                    );
                }
            }
        }

        if entered {
            self.transition(SelectorState::Probing, SelectorState::Idle);
        }
        results
    }
}

/// Latency-based endpoint selector.
///
/// Construction validates the endpoints, seeds the choice from the
/// deployment region (else universal, else fallback) and runs one probe
/// round before returning. With a ping interval configured, a background
/// task re-probes on every tick until [`stop`](Self::stop) is called or the
/// selector is dropped.
///
/// # Example
/// ```no_run
/// use latency_router::{EndpointSet, LatencySelector, SelectorConfig};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let endpoints = EndpointSet {
///     us_east: "https://us-east.api.example.com".to_string(),
///     europe: "https://eu.api.example.com".to_string(),
///     fallback: "https://api.example.com".to_string(),
///     ..Default::default()
/// };
///
/// let config = SelectorConfig::default().ping_interval(Duration::from_secs(60));
/// let selector = LatencySelector::new(endpoints, config).await?;
///
/// let base_url = selector.current_endpoint();
/// # let _ = base_url;
/// selector.stop();
/// # Ok(())
/// # }
/// ```
pub struct LatencySelector {
    shared: Arc<Shared>,
    refresher: Option<JoinHandle<()>>,
}

impl LatencySelector {
    /// Create a selector probing through a default reqwest client whose
    /// timeouts follow `config.probe_timeout`.
    pub async fn new(
        endpoints: EndpointSet,
        config: SelectorConfig,
    ) -> Result<Self, SelectorError> {
        let client_config = ProbeClientConfig {
            connect_timeout: config.probe_timeout,
            timeout: config.probe_timeout,
            ..Default::default()
        };
        let client = ReqwestProbeClient::new(&client_config)?;

        Ok(Self::with_client(endpoints, config, Arc::new(client)).await?)
    }

    /// Create a selector probing through `client`.
    pub async fn with_client(
        endpoints: EndpointSet,
        config: SelectorConfig,
        client: Arc<dyn ProbeClient>,
    ) -> Result<Self, EndpointError> {
        let endpoints = endpoints.validate()?;

        let seed = config
            .region
            .as_deref()
            .and_then(|region| resolve_region_endpoint(region, &endpoints))
            .or_else(|| endpoints.get(EndpointRegion::Universal).map(str::to_string))
            .unwrap_or_else(|| endpoints.fallback.clone());

        if config.debug {
            tracing::debug!("seeded endpoint {} (region {:?})", seed, config.region);
        }

        let shared = Arc::new(Shared {
            endpoints,
            client,
            probe_timeout: config.probe_timeout,
            debug: config.debug,
            best: RwLock::new(seed),
            state: AtomicU8::new(SelectorState::Seeded.as_u8()),
            round_lock: tokio::sync::Mutex::new(()),
            stop: StopSignal::new(),
        });

        shared.run_round().await;

        let refresher = match config.refresh_interval() {
            Some(period) => {
                tracing::info!("refreshing fastest endpoint every {:?}", period);
                let round_shared = shared.clone();
                Some(RefreshScheduler::spawn(period, shared.stop.clone(), move || {
                    let shared = round_shared.clone();
                    async move {
                        if shared.debug {
                            tracing::debug!("pinging endpoints for latency");
                        }
                        shared.run_round().await;
                    }
                }))
            }
            None => {
                shared.transition(SelectorState::Idle, SelectorState::Static);
                None
            }
        };

        Ok(Self { shared, refresher })
    }

    /// Endpoint to use right now. Never blocks on network I/O.
    pub fn current_endpoint(&self) -> String {
        self.shared.best.read().clone()
    }

    /// Validated endpoints this selector chooses from.
    pub fn endpoints(&self) -> &EndpointSet {
        &self.shared.endpoints
    }

    pub fn state(&self) -> SelectorState {
        self.shared.state()
    }

    /// Whether the background refresh task is still alive.
    pub fn is_refreshing(&self) -> bool {
        self.refresher
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Run a probe round now and return its results.
    ///
    /// Waits for any scheduled round in flight. Returns an empty list once
    /// the selector is stopped.
    pub async fn probe_now(&self) -> Vec<ProbeResult> {
        self.shared.run_round().await
    }

    /// Stop refreshing.
    ///
    /// Idempotent and non-blocking: a round already in flight completes,
    /// no further round is scheduled and the refresh task exits.
    pub fn stop(&self) {
        if self.shared.stop.stop() && self.refresher.is_some() {
            tracing::info!("stopped pinging endpoints");
        }
    }

    /// Handle that stops this selector when fired, e.g. from a signal handler.
    pub fn stop_signal(&self) -> StopSignal {
        self.shared.stop.clone()
    }
}

impl EndpointSource for LatencySelector {
    fn current_endpoint(&self) -> String {
        LatencySelector::current_endpoint(self)
    }
}

impl Drop for LatencySelector {
    fn drop(&mut self) {
        self.stop();
    }
}
