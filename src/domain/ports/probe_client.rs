//! Probe Client Port
//!
//! Defines the interface for issuing lightweight latency probes.
//! Implementations may use reqwest, hyper, or a scripted test double.

use crate::domain::errors::ProbeError;
use async_trait::async_trait;
use std::time::Duration;

/// Response to a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,
    /// Time from just before sending to response headers received
    pub elapsed: Duration,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Client used to measure endpoint latency.
///
/// This is an outbound port that abstracts the HTTP transport. The client
/// is shared across probe rounds and must support concurrent use. Any
/// response body must be fully drained before `head` returns.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Issue an idempotent, side-effect free request (HEAD) to `url`.
    async fn head(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, ProbeError>;
}
