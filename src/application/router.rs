//! Router
//!
//! Static endpoint choice based on the deployment region, optionally
//! refined by a modifier such as a [`LatencySelector`](super::LatencySelector).

use crate::config::region_from_env;
use crate::domain::entities::EndpointSet;
use crate::domain::errors::EndpointError;
use crate::domain::ports::EndpointSource;
use crate::domain::services::resolve_region_endpoint;
use std::sync::{Arc, OnceLock};

/// Region-aware API router.
///
/// Without a modifier the router always answers with the endpoint closest
/// to the deployment region, else universal, else the fallback.
pub struct Router {
    region: Option<String>,
    endpoints: EndpointSet,
    closest: Option<String>,
    modifier: OnceLock<Arc<dyn EndpointSource>>,
}

impl Router {
    /// Create a router for `endpoints` deployed in `region`.
    pub fn new(endpoints: EndpointSet, region: Option<String>) -> Result<Self, EndpointError> {
        let endpoints = endpoints.validate()?;
        let region = region
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty());
        let closest = region
            .as_deref()
            .and_then(|r| resolve_region_endpoint(r, &endpoints));

        Ok(Self {
            region,
            endpoints,
            closest,
            modifier: OnceLock::new(),
        })
    }

    /// Create a router using the deployment region from the environment
    /// (`LATENCY_ROUTER_REGION`, then `AWS_REGION`).
    pub fn from_environment(endpoints: EndpointSet) -> Result<Self, EndpointError> {
        Self::new(endpoints, region_from_env())
    }

    /// Deployment region, lowercased.
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    /// Closest endpoint, else universal, else fallback.
    pub fn router_url(&self) -> &str {
        if let Some(closest) = &self.closest {
            return closest;
        }
        if !self.endpoints.universal.is_empty() {
            return &self.endpoints.universal;
        }
        &self.endpoints.fallback
    }

    /// Endpoint chosen by the modifier, or [`router_url`](Self::router_url)
    /// when there is no modifier or it has nothing to offer.
    pub fn modifier_url(&self) -> String {
        match self.modifier.get() {
            Some(modifier) => {
                let endpoint = modifier.current_endpoint();
                if endpoint.is_empty() {
                    self.router_url().to_string()
                } else {
                    endpoint
                }
            }
            None => self.router_url().to_string(),
        }
    }

    /// Attach a modifier. Only the first modifier is kept; returns whether
    /// this one was accepted.
    pub fn add_modifier(&self, modifier: Arc<dyn EndpointSource>) -> bool {
        let accepted = self.modifier.set(modifier).is_ok();
        if !accepted {
            tracing::warn!("router already has a modifier, ignoring");
        }
        accepted
    }
}
