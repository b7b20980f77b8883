mod latency_probe;
mod region_override;

pub use latency_probe::LatencyProbe;
pub use region_override::resolve_region_endpoint;
