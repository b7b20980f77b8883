//! latency-router Library
//!
//! Picks the fastest of a small set of regional mirrors of one API.
//! Endpoints are validated once, an initial choice is seeded from the
//! deployment region, and a latency probe keeps the choice current.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::outbound::{
    ProbeClientConfig, ReqwestProbeClient, ScriptedOutcome, ScriptedProbeClient,
};
pub use application::{LatencySelector, Router, SelectorConfig, SelectorError, SelectorState};
pub use config::{load_config, Config};
pub use domain::entities::{EndpointSet, ProbeResult};
pub use domain::errors::{EndpointError, ProbeError};
pub use domain::ports::{EndpointSource, ProbeClient, ProbeResponse};
pub use domain::services::{resolve_region_endpoint, LatencyProbe};
pub use domain::value_objects::{EndpointRegion, UNREACHABLE_LATENCY};
pub use infrastructure::{shutdown_signal, StopSignal};
