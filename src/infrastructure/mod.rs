//! Infrastructure Layer
//!
//! Background scheduling and stop coordination.

pub mod refresh_scheduler;
pub mod shutdown;

pub use refresh_scheduler::RefreshScheduler;
pub use shutdown::{shutdown_signal, StopSignal};
