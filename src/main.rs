//! latency-router - pick the fastest regional API mirror
//!
//! Composition root: reads endpoints from the environment, keeps the
//! fastest one selected and logs it until interrupted.

use latency_router::{load_config, shutdown_signal, LatencySelector};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    tracing::info!(
        "starting latency-router region={} ping_interval_ms={}",
        cfg.region.as_deref().unwrap_or("-"),
        cfg.ping_interval_ms
    );

    let selector = LatencySelector::new(cfg.endpoints.clone(), cfg.selector_config()).await?;
    tracing::info!("selected endpoint {}", selector.current_endpoint());

    shutdown_signal(selector.stop_signal()).await;

    tracing::info!(
        "latency-router stopped, last endpoint {}",
        selector.current_endpoint()
    );

    Ok(())
}
