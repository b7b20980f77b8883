//! Reqwest Probe Client
//!
//! Implements ProbeClient with a pooled reqwest client issuing HEAD requests.

use crate::domain::errors::ProbeError;
use crate::domain::ports::{ProbeClient, ProbeResponse};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Transport settings for the probe client.
#[derive(Debug, Clone)]
pub struct ProbeClientConfig {
    /// Timeout for establishing a TCP connection
    pub connect_timeout: Duration,
    /// Timeout for a whole request, body included
    pub timeout: Duration,
    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// TCP keep-alive interval
    pub tcp_keepalive: Duration,
}

impl Default for ProbeClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(1000),
            timeout: Duration::from_millis(1000),
            pool_idle_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 100,
            tcp_keepalive: Duration::from_secs(30),
        }
    }
}

/// reqwest-backed probe client.
///
/// The underlying connection pool is shared by every probe and every round,
/// so clones of the inner client are cheap and reuse connections.
#[derive(Clone)]
pub struct ReqwestProbeClient {
    client: reqwest::Client,
}

impl ReqwestProbeClient {
    /// Build a client from transport settings.
    pub fn new(config: &ProbeClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .tcp_keepalive(config.tcp_keepalive)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProbeClient for ReqwestProbeClient {
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, ProbeError> {
        let url = reqwest::Url::parse(url).map_err(|e| ProbeError::InvalidRequest(e.to_string()))?;

        let start = Instant::now();
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_error)?;
        let elapsed = start.elapsed();
        let status = response.status().as_u16();

        // drain so the connection goes back to the pool
        let _ = response.bytes().await;

        Ok(ProbeResponse { status, elapsed })
    }
}

/// Map a reqwest failure to the probe error taxonomy.
fn classify_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::Timeout;
    }
    if err.is_builder() {
        return ProbeError::InvalidRequest(err.to_string());
    }

    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            match io.kind() {
                std::io::ErrorKind::ConnectionReset => return ProbeError::ConnectionReset,
                std::io::ErrorKind::TimedOut => return ProbeError::Timeout,
                _ => {}
            }
        }

        let message = cause.to_string();
        if message.contains("connection reset") {
            return ProbeError::ConnectionReset;
        }
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return ProbeError::NoSuchHost;
        }

        source = cause.source();
    }

    ProbeError::Transport(err.to_string())
}
