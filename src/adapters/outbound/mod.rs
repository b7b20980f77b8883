mod reqwest_probe_client;
mod scripted_probe_client;

pub use reqwest_probe_client::{ProbeClientConfig, ReqwestProbeClient};
pub use scripted_probe_client::{ScriptedOutcome, ScriptedProbeClient};
