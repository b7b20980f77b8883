//! Domain Errors
//!
//! Configuration errors are surfaced to the caller at construction time.
//! Probe errors never leave the selector; they only decide who loses a round.

use crate::domain::value_objects::EndpointRegion;

/// Endpoint configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("at least one endpoint has to be passed in")]
    AtLeastOneMissing,

    #[error("missing http or https on {region}: {url}")]
    MissingProtocol { region: EndpointRegion, url: String },

    #[error("url parsing error on {region}: {url}: {reason}")]
    MalformedUrl {
        region: EndpointRegion,
        url: String,
        reason: String,
    },

    /// The fallback is the unconditional safety net and must always be set,
    /// even if it duplicates another endpoint.
    #[error("a fallback endpoint should be sent as a safety mechanism")]
    FallbackUnset,
}

/// Failure of a single probe request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The request could not be built (bad URL, bad method). No result is recorded.
    #[error("invalid probe request: {0}")]
    InvalidRequest(String),

    #[error("the network request timed out")]
    Timeout,

    #[error("the connection was reset by host")]
    ConnectionReset,

    #[error("the endpoint's host could not be found")]
    NoSuchHost,

    #[error("received a non 2xx status code: {0}")]
    BadStatus(u16),

    #[error("request failed: {0}")]
    Transport(String),
}
