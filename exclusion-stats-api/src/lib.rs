//! Exclusion Stats API Server
//!
//! REST API for analyzing policy exclusions and serving the resulting report.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Ad-hoc analysis
        .route("/api/analyze", post(handlers::analyze_policies))
        // Source report
        .route("/api/report", get(handlers::get_report))
        .route("/api/report/refresh", post(handlers::refresh_report))
        .route("/api/report/file-exclusions.csv", get(handlers::file_exclusions_csv))
        .route("/api/report/process-exclusions.csv", get(handlers::process_exclusions_csv))
        .route("/api/report/alerts", get(handlers::report_alerts))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
