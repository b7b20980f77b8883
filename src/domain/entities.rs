//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the latency router domain.
//! They have no network dependencies and contain only business logic.

use crate::domain::errors::EndpointError;
use crate::domain::value_objects::{EndpointRegion, UNREACHABLE_LATENCY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints belonging to the API service that is being used.
///
/// Each field holds the base URL of one regional mirror. Empty fields are
/// not configured. Once [`validate`](Self::validate) succeeds the set is
/// never mutated again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    /// APAC
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub asia_pacific: String,
    /// EU
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub europe: String,
    /// Some APIs expose a single endpoint that is latency balanced by DNS
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub universal: String,
    /// us-east-1
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub us_east: String,
    /// us-west-1
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub us_west: String,
    /// Endpoint to fall back to in emergencies
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fallback: String,
}

impl EndpointSet {
    /// All slots paired with their configured value, in declaration order.
    pub fn entries(&self) -> [(EndpointRegion, &str); 6] {
        [
            (EndpointRegion::AsiaPacific, self.asia_pacific.as_str()),
            (EndpointRegion::Europe, self.europe.as_str()),
            (EndpointRegion::Universal, self.universal.as_str()),
            (EndpointRegion::UsEast, self.us_east.as_str()),
            (EndpointRegion::UsWest, self.us_west.as_str()),
            (EndpointRegion::Fallback, self.fallback.as_str()),
        ]
    }

    /// Configured endpoints that take part in a latency probe.
    ///
    /// Order is universal, us-east, us-west, europe, asia-pacific; ties in a
    /// probe round go to the earlier entry. The fallback is never probed.
    pub fn candidates(&self) -> Vec<(EndpointRegion, &str)> {
        [
            (EndpointRegion::Universal, self.universal.as_str()),
            (EndpointRegion::UsEast, self.us_east.as_str()),
            (EndpointRegion::UsWest, self.us_west.as_str()),
            (EndpointRegion::Europe, self.europe.as_str()),
            (EndpointRegion::AsiaPacific, self.asia_pacific.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .collect()
    }

    /// URL configured for a slot, if any.
    pub fn get(&self, region: EndpointRegion) -> Option<&str> {
        let url = match region {
            EndpointRegion::AsiaPacific => &self.asia_pacific,
            EndpointRegion::Europe => &self.europe,
            EndpointRegion::Universal => &self.universal,
            EndpointRegion::UsEast => &self.us_east,
            EndpointRegion::UsWest => &self.us_west,
            EndpointRegion::Fallback => &self.fallback,
        };
        (!url.is_empty()).then_some(url.as_str())
    }

    /// Whether `url` is one of the configured endpoints.
    pub fn contains(&self, url: &str) -> bool {
        !url.is_empty() && self.entries().iter().any(|(_, u)| *u == url)
    }

    /// Validate the set and derive the fallback when only a universal
    /// endpoint was supplied.
    pub fn validate(mut self) -> Result<Self, EndpointError> {
        let mut configured = 0usize;

        for (region, endpoint) in self.entries() {
            if endpoint.is_empty() {
                continue;
            }
            check_url(region, endpoint)?;
            configured += 1;
        }

        if configured == 0 {
            return Err(EndpointError::AtLeastOneMissing);
        }

        if configured == 1 && !self.universal.is_empty() {
            self.fallback = self.universal.clone();
        }

        if self.fallback.is_empty() {
            return Err(EndpointError::FallbackUnset);
        }

        Ok(self)
    }
}

fn check_url(region: EndpointRegion, endpoint: &str) -> Result<(), EndpointError> {
    match url::Url::parse(endpoint) {
        Ok(parsed) if parsed.scheme().is_empty() => Err(EndpointError::MissingProtocol {
            region,
            url: endpoint.to_string(),
        }),
        Ok(_) => Ok(()),
        // "eu.foobar.com" and "://eu.foobar.com" have no usable scheme
        Err(url::ParseError::RelativeUrlWithoutBase) => Err(EndpointError::MissingProtocol {
            region,
            url: endpoint.to_string(),
        }),
        Err(e) => Err(EndpointError::MalformedUrl {
            region,
            url: endpoint.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Outcome of probing one candidate.
///
/// Failed probes are kept with [`UNREACHABLE_LATENCY`] rather than dropped,
/// so selecting the winner is a plain minimum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Slot the URL belongs to
    pub region: EndpointRegion,
    /// Probed URL
    pub url: String,
    /// Time from send to response headers, or the sentinel on failure
    pub elapsed: Duration,
}

impl ProbeResult {
    /// Create a result for a probe that answered with a 2xx status.
    pub fn reachable(region: EndpointRegion, url: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            region,
            url: url.into(),
            elapsed,
        }
    }

    /// Create a result for a probe that failed or returned a bad status.
    pub fn unreachable(region: EndpointRegion, url: impl Into<String>) -> Self {
        Self {
            region,
            url: url.into(),
            elapsed: UNREACHABLE_LATENCY,
        }
    }

    /// Whether the endpoint answered below the sentinel.
    pub fn is_reachable(&self) -> bool {
        self.elapsed < UNREACHABLE_LATENCY
    }
}
