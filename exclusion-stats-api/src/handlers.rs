//! API request handlers

use axum::{extract::State, http::header, response::IntoResponse, Json};
use exclusion_stats_core::{AnalyzeRequest, Columns};
use exclusion_stats_report::export::{render_alerts, to_delimited, DEFAULT_DELIMITER};
use std::sync::Arc;

use crate::{ApiError, AppState};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

// ==================== Analysis Handlers ====================

/// Analyze policy documents supplied in the request body
pub async fn analyze_policies(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let require_policies = req.require_policies;
    let documents = req.into_documents();

    let report = if require_policies {
        state.analyzer.analyze_non_empty(&documents)?
    } else {
        state.analyzer.analyze(&documents)
    };

    tracing::info!(
        "Analyzed {} submitted policies ({} alerts)",
        report.policy_count(),
        report.alerts.len()
    );

    Ok(Json(report))
}

// ==================== Report Handlers ====================

/// Get the cached report for the configured source
pub async fn get_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.report().await?;
    Ok(Json(report))
}

/// Rebuild the report from the configured source
pub async fn refresh_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.refresh_report().await?;
    Ok(Json(report))
}

/// File exclusion table as delimited text
pub async fn file_exclusions_csv(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.report().await?;
    let body = to_delimited(&report.file_exclusions, Columns::Persisted, DEFAULT_DELIMITER);
    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], body))
}

/// Process exclusion table as delimited text, child-process column included
pub async fn process_exclusions_csv(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.report().await?;
    let body = to_delimited(
        &report.process_exclusions,
        Columns::Persisted,
        DEFAULT_DELIMITER,
    );
    Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], body))
}

/// Threshold alerts, one per line
pub async fn report_alerts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.report().await?;
    Ok((
        [(header::CONTENT_TYPE, TEXT_CONTENT_TYPE)],
        render_alerts(&report.alerts),
    ))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "exclusion-stats"
    }))
}
