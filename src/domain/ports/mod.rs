mod endpoint_source;
mod probe_client;

pub use endpoint_source::EndpointSource;
pub use probe_client::{ProbeClient, ProbeResponse};
