//! Latency Probe Service
//!
//! Measures every candidate endpoint concurrently and picks the fastest one
//! that answered. All probes of a round share one deadline and the winner is
//! only chosen once every probe has reported or been cut off.

use crate::domain::entities::{EndpointSet, ProbeResult};
use crate::domain::errors::ProbeError;
use crate::domain::ports::ProbeClient;
use crate::domain::value_objects::{EndpointRegion, UNREACHABLE_LATENCY};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

/// Latency probe over an [`EndpointSet`].
pub struct LatencyProbe;

impl LatencyProbe {
    /// Probe every candidate of `endpoints` and wait for all of them.
    ///
    /// Results come back in candidate order. Candidates whose request could
    /// not be built are left out; failures, non-2xx answers and probes cut
    /// off by the shared deadline are reported as unreachable.
    pub async fn probe_all(
        client: &dyn ProbeClient,
        endpoints: &EndpointSet,
        timeout: Duration,
        debug: bool,
    ) -> Vec<ProbeResult> {
        let deadline = Instant::now() + timeout;

        let probes = endpoints
            .candidates()
            .into_iter()
            .map(|(region, url)| Self::probe_one(client, region, url, deadline, timeout, debug));

        join_all(probes).await.into_iter().flatten().collect()
    }

    /// Fastest reachable result. Ties go to the earliest result.
    pub fn pick_fastest(results: &[ProbeResult]) -> Option<&ProbeResult> {
        let mut fastest: Option<&ProbeResult> = None;
        let mut best = UNREACHABLE_LATENCY;

        for result in results {
            if result.elapsed < best {
                best = result.elapsed;
                fastest = Some(result);
            }
        }

        fastest
    }

    async fn probe_one(
        client: &dyn ProbeClient,
        region: EndpointRegion,
        url: &str,
        deadline: Instant,
        timeout: Duration,
        debug: bool,
    ) -> Option<ProbeResult> {
        let outcome = match tokio::time::timeout_at(deadline, client.head(url, timeout)).await {
            Ok(Ok(response)) if response.is_success() => {
                if debug {
                    tracing::debug!(
                        "probe {} ({}) answered {} in {:?}",
                        url,
                        region,
                        response.status,
                        response.elapsed
                    );
                }
                return Some(ProbeResult::reachable(region, url, response.elapsed));
            }
            Ok(Ok(response)) => ProbeError::BadStatus(response.status),
            Ok(Err(ProbeError::InvalidRequest(reason))) => {
                if debug {
                    tracing::debug!("probe {} ({}) skipped: {}", url, region, reason);
                }
                return None;
            }
            Ok(Err(e)) => e,
            Err(_) => ProbeError::Timeout,
        };

        if debug {
            tracing::debug!("probe {} ({}) failed: {}", url, region, outcome);
        }
        Some(ProbeResult::unreachable(region, url))
    }
}
