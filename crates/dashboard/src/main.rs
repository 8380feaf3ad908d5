//! ReservoirOS Dashboard
//!
//! Loads the landing summary and the three list views against the
//! configured API and prints them as JSON.
//! Handles:
//! - Configuration and logging setup
//! - Optional Prometheus exporter
//! - Concurrent view loading

mod snapshot;

use anyhow::Context;
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use reservoiros_common::{
    config::{AppConfig, ObservabilityConfig},
    metrics, Api,
};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting ReservoirOS dashboard v{}",
        reservoiros_common::VERSION
    );

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        install_exporter(config.observability.metrics_port)?;
    }

    let api = Api::from_config(&config.api)?;
    info!(backend = api.backend_name(), base_url = %config.api.base_url, "API client ready");

    let snapshot = snapshot::collect(api).await;
    info!(
        projects = snapshot.summary.project_count,
        reservoirs = snapshot.summary.reservoir_count,
        well_targets = snapshot.summary.well_target_count,
        "Views loaded"
    );

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Logs go to stderr so stdout stays valid JSON
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            metrics::LATENCY_BUCKETS,
        )?
        .install()
        .context("Failed to install Prometheus exporter")?;

    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
