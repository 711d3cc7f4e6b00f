//! Exclusion Stats - Main Application Entry Point
//!
//! Serves per-policy exclusion counts and process exclusion
//! threshold alerts for endpoint protection policies.

use anyhow::Context;
use exclusion_stats_api::{AppConfig, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,exclusion_stats=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    tracing::info!("Starting Exclusion Stats server on {}", config.bind_address());
    tracing::info!(
        "Process exclusion limit {} (caution from {})",
        config.thresholds.limit,
        config.thresholds.caution_floor()
    );

    // Create shared application state
    let app_state =
        Arc::new(AppState::from_config(&config).context("Failed to initialize policy source")?);

    // Build the first report from the configured source
    match app_state.refresh_report().await {
        Ok(report) => {
            if report.policy_count() > 0 {
                tracing::info!("Pre-loaded report with {} policies", report.policy_count());
            }
            for alert in &report.alerts {
                tracing::warn!("{}", alert);
            }
        }
        Err(e) => {
            tracing::warn!("Failed to build report on startup: {}", e);
        }
    }

    // Build our application with routes
    let app = exclusion_stats_api::create_router(app_state);

    // Run it
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
