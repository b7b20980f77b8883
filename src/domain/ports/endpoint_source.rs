//! Endpoint Source Port
//!
//! Defines the interface a router uses to ask for the endpoint to call.

/// Provider of the endpoint to use right now.
///
/// This is the seam a [`Router`](crate::application::Router) consults
/// before falling back to its static decision. Implementations must not
/// block on network I/O.
pub trait EndpointSource: Send + Sync {
    /// Current endpoint, or an empty string if none is known.
    fn current_endpoint(&self) -> String;
}
