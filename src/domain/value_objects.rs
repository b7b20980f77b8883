//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Slot of an endpoint within an [`EndpointSet`](crate::domain::entities::EndpointSet).
///
/// Each API mirror is registered under one slot. The probe races every slot
/// except `Fallback`, which is only ever used as a last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRegion {
    /// Asia Pacific mirror
    AsiaPacific,
    /// European mirror
    Europe,
    /// Single latency-balanced endpoint served from everywhere (DNS / anycast)
    Universal,
    /// US East mirror (us-east-1)
    UsEast,
    /// US West mirror (us-west-1)
    UsWest,
    /// Emergency endpoint, never probed
    Fallback,
}

impl EndpointRegion {
    /// Convert to the field name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AsiaPacific => "asia_pacific",
            Self::Europe => "europe",
            Self::Universal => "universal",
            Self::UsEast => "us_east",
            Self::UsWest => "us_west",
            Self::Fallback => "fallback",
        }
    }

    /// Map a cloud deployment region (e.g. `AWS_REGION`) to an endpoint slot.
    ///
    /// Matching ignores case and surrounding whitespace. Unknown regions
    /// return `None` so callers fall through to universal/fallback.
    ///
    /// # Examples
    /// ```
    /// use latency_router::EndpointRegion;
    ///
    /// assert_eq!(EndpointRegion::from_deployment_region("us-east-2"), Some(EndpointRegion::UsEast));
    /// assert_eq!(EndpointRegion::from_deployment_region("sa-east-1"), None);
    /// ```
    pub fn from_deployment_region(region: &str) -> Option<Self> {
        match region.trim().to_lowercase().as_str() {
            "us-east-1" | "us-east-2" => Some(Self::UsEast),
            "us-west-1" | "us-west-2" => Some(Self::UsWest),
            "ap-south-1" | "ap-southeast-1" | "ap-southeast-2" | "ap-northeast-1" => {
                Some(Self::AsiaPacific)
            }
            "eu-central-1" => Some(Self::Europe),
            _ => None,
        }
    }
}

impl std::fmt::Display for EndpointRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Elapsed time recorded for a probe that failed or returned a non-2xx status.
///
/// Worse than any real latency, so failed probes simply lose the comparison.
pub const UNREACHABLE_LATENCY: Duration = Duration::from_secs(60 * 60);
