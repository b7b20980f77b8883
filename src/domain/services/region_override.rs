//! Region Override Service
//!
//! Maps the deployment region of the running process to one of the
//! configured endpoints. Pure lookup, no network activity.

use crate::domain::entities::EndpointSet;
use crate::domain::value_objects::EndpointRegion;

/// Endpoint preferred for the deployment region `region_id`.
///
/// Returns `None` when the region is empty, unknown, or maps to a slot
/// that has no endpoint configured. Callers then fall through to the
/// universal endpoint and finally the fallback.
///
/// # Example
/// ```
/// use latency_router::{resolve_region_endpoint, EndpointSet};
///
/// let endpoints = EndpointSet {
///     us_east: "https://us-east.foobar.com".to_string(),
///     fallback: "https://fallback.foobar.com".to_string(),
///     ..Default::default()
/// };
///
/// assert_eq!(
///     resolve_region_endpoint("us-east-1", &endpoints),
///     Some("https://us-east.foobar.com".to_string())
/// );
/// assert_eq!(resolve_region_endpoint("eu-central-1", &endpoints), None);
/// ```
pub fn resolve_region_endpoint(region_id: &str, endpoints: &EndpointSet) -> Option<String> {
    let region = EndpointRegion::from_deployment_region(region_id)?;
    endpoints.get(region).map(str::to_string)
}
