//! Application Layer
//!
//! Services that compose the domain with adapters and infrastructure.

mod latency_selector;
mod router;

pub use latency_selector::{LatencySelector, SelectorConfig, SelectorError, SelectorState};
pub use router::Router;
