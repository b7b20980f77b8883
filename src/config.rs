use crate::application::SelectorConfig;
use crate::domain::entities::EndpointSet;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Endpoints
    pub endpoints: EndpointSet,

    // Selection settings
    pub region: Option<String>,
    pub ping_interval_ms: u64,
    pub probe_timeout_ms: u64,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: EndpointSet::default(),
            region: None,
            ping_interval_ms: 0,
            probe_timeout_ms: 1000,
            debug: false,
        }
    }
}

impl Config {
    /// Build a config from a variable lookup (the process environment in
    /// [`load_config`]).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let endpoints = EndpointSet {
            asia_pacific: endpoint("LATENCY_ROUTER_ASIA_PACIFIC"),
            europe: endpoint("LATENCY_ROUTER_EUROPE"),
            universal: endpoint("LATENCY_ROUTER_UNIVERSAL"),
            us_east: endpoint("LATENCY_ROUTER_US_EAST"),
            us_west: endpoint("LATENCY_ROUTER_US_WEST"),
            fallback: endpoint("LATENCY_ROUTER_FALLBACK"),
        };

        let region = lookup("LATENCY_ROUTER_REGION")
            .filter(|v| !v.trim().is_empty())
            .or_else(|| lookup("AWS_REGION"))
            .map(|v| v.trim().to_lowercase())
            .filter(|v| !v.is_empty());

        let ping_interval_ms = lookup("LATENCY_ROUTER_PING_INTERVAL_MS")
            .unwrap_or_else(|| "0".to_string())
            .parse()
            .unwrap_or(0);

        let probe_timeout_ms = lookup("LATENCY_ROUTER_PROBE_TIMEOUT_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse()
            .unwrap_or(1000);

        let debug = lookup("DEBUG").is_some();

        Self {
            endpoints,
            region,
            ping_interval_ms,
            probe_timeout_ms,
            debug,
        }
    }

    /// Selector settings described by this config.
    pub fn selector_config(&self) -> SelectorConfig {
        let mut config = SelectorConfig::default()
            .probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .debug(self.debug);

        if self.ping_interval_ms > 0 {
            config = config.ping_interval(Duration::from_millis(self.ping_interval_ms));
        }
        if let Some(region) = &self.region {
            config = config.region(region.clone());
        }
        config
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    Ok(Config::from_lookup(|key| std::env::var(key).ok()))
}

/// Deployment region from `LATENCY_ROUTER_REGION`, then `AWS_REGION`.
pub fn region_from_env() -> Option<String> {
    Config::from_lookup(|key| std::env::var(key).ok()).region
}
