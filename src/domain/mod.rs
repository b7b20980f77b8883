//! Domain Layer
//!
//! Endpoint sets, probe results and the pure selection logic.
//! Network access only happens through the ports.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{EndpointSet, ProbeResult};
pub use errors::{EndpointError, ProbeError};
pub use value_objects::{EndpointRegion, UNREACHABLE_LATENCY};
