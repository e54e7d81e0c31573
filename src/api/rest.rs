// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. The service is a single-user analysis
// dashboard backend; no authentication.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::app_state::{AppState, ServiceStats};
use crate::error::AnalysisError;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/site", get(site))
        .route("/api/v1/analyze", get(analyze))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
    stats: ServiceStats,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
        stats: state.stats_snapshot(),
    };
    Json(resp)
}

// =============================================================================
// Site identity (dashboard header)
// =============================================================================

#[derive(Serialize)]
struct SiteResponse {
    name: String,
    description: String,
}

async fn site(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(SiteResponse {
        name: state.config.site_name.clone(),
        description: state.config.site_description.clone(),
    })
}

// =============================================================================
// Analyze
// =============================================================================

#[derive(Debug, Deserialize)]
struct AnalyzeQuery {
    symbol: String,
    /// Range start, `YYYYMMDD`.
    start: String,
    /// Range end, `YYYYMMDD`.
    end: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> impl IntoResponse {
    if let Err(msg) = validate_query(&query) {
        state.record_failure();
        return error_response(&AnalysisError::InvalidInput(msg));
    }

    match state
        .analyzer
        .analyze(&query.symbol, &query.start, &query.end)
        .await
    {
        Ok(report) => {
            state.record_success(report.origin);
            Json(report).into_response()
        }
        Err(e) => {
            warn!(symbol = %query.symbol, error = %e, "analysis request failed");
            state.record_failure();
            error_response(&e)
        }
    }
}

/// Map a pipeline error to an HTTP response: bad requests are the client's
/// fault, provider trouble is an upstream failure.
fn error_response(e: &AnalysisError) -> axum::response::Response {
    let status = match e {
        AnalysisError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalysisError::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// Check the query before touching cache or provider: non-empty alphanumeric
/// symbol, both dates valid `YYYYMMDD`, start not after end.
fn validate_query(query: &AnalyzeQuery) -> Result<(), String> {
    if query.symbol.is_empty() || !query.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("invalid symbol '{}'", query.symbol));
    }

    let start = parse_compact_date(&query.start)
        .ok_or_else(|| format!("invalid start date '{}' (expected YYYYMMDD)", query.start))?;
    let end = parse_compact_date(&query.end)
        .ok_or_else(|| format!("invalid end date '{}' (expected YYYYMMDD)", query.end))?;

    if start > end {
        return Err(format!(
            "start date {} is after end date {}",
            query.start, query.end
        ));
    }

    Ok(())
}

fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y%m%d").ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn query(symbol: &str, start: &str, end: &str) -> AnalyzeQuery {
        AnalyzeQuery {
            symbol: symbol.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_query() {
        assert!(validate_query(&query("000001", "20240101", "20250101")).is_ok());
        assert!(validate_query(&query("BTCUSDT", "20250101", "20250101")).is_ok());
    }

    #[test]
    fn rejects_empty_symbol() {
        assert!(validate_query(&query("", "20240101", "20250101")).is_err());
    }

    #[test]
    fn rejects_symbol_with_path_characters() {
        // The symbol becomes part of a cache file name; keep it alphanumeric.
        assert!(validate_query(&query("../etc", "20240101", "20250101")).is_err());
        assert!(validate_query(&query("00 01", "20240101", "20250101")).is_err());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(validate_query(&query("000001", "2024-01-01", "20250101")).is_err());
        assert!(validate_query(&query("000001", "20240101", "202501")).is_err());
        assert!(validate_query(&query("000001", "20241301", "20250101")).is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(validate_query(&query("000001", "20250102", "20250101")).is_err());
    }
}
