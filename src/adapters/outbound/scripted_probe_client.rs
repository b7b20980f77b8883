//! Scripted Probe Client
//!
//! Implements ProbeClient from an in-memory table of canned outcomes.
//! Used to exercise selection logic without a network.

use crate::domain::errors::ProbeError;
use crate::domain::ports::{ProbeClient, ProbeResponse};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Canned outcome for one URL.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Answer with `status` after `latency`
    Respond { status: u16, latency: Duration },
    /// Fail immediately
    Fail(ProbeError),
}

impl ScriptedOutcome {
    /// 200 OK after `latency`.
    pub fn ok(latency: Duration) -> Self {
        Self::Respond {
            status: 200,
            latency,
        }
    }

    pub fn status(status: u16, latency: Duration) -> Self {
        Self::Respond { status, latency }
    }
}

/// In-memory probe client.
///
/// Outcomes can be rescripted at any time, which takes effect on the next
/// probe of that URL. Unscripted URLs fail with [`ProbeError::NoSuchHost`].
#[derive(Debug, Default)]
pub struct ScriptedProbeClient {
    outcomes: RwLock<HashMap<String, ScriptedOutcome>>,
    calls: RwLock<HashMap<String, usize>>,
}

impl ScriptedProbeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the outcome for `url`.
    pub fn script(&self, url: &str, outcome: ScriptedOutcome) {
        self.outcomes.write().insert(url.to_string(), outcome);
    }

    /// Set the same outcome for every URL currently scripted.
    pub fn script_all(&self, outcome: ScriptedOutcome) {
        for value in self.outcomes.write().values_mut() {
            *value = outcome.clone();
        }
    }

    /// Number of probes issued to `url`.
    pub fn calls(&self, url: &str) -> usize {
        self.calls.read().get(url).copied().unwrap_or(0)
    }

    /// Number of probes issued overall.
    pub fn total_calls(&self) -> usize {
        self.calls.read().values().sum()
    }
}

#[async_trait]
impl ProbeClient for ScriptedProbeClient {
    async fn head(&self, url: &str, _timeout: Duration) -> Result<ProbeResponse, ProbeError> {
        *self.calls.write().entry(url.to_string()).or_insert(0) += 1;

        let outcome = self.outcomes.read().get(url).cloned();
        match outcome {
            Some(ScriptedOutcome::Respond { status, latency }) => {
                let start = Instant::now();
                tokio::time::sleep(latency).await;
                Ok(ProbeResponse {
                    status,
                    elapsed: start.elapsed(),
                })
            }
            Some(ScriptedOutcome::Fail(err)) => Err(err),
            None => Err(ProbeError::NoSuchHost),
        }
    }
}
