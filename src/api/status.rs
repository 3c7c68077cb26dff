//! Status Routes
//!
//! Health checks and metrics.
//!
//! Routes:
//! - GET /health - Basic health check
//! - GET /health/live - Liveness check (server responding)
//! - GET /metrics - Prometheus metrics endpoint
//!
//! The counters here are process-wide and only feed `/metrics`. The call
//! count reported in a migration response comes from that request's own
//! tracker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

// Global metrics (simple counters)
static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static MIGRATION_COUNT: AtomicU64 = AtomicU64::new(0);
static FAILED_MIGRATION_COUNT: AtomicU64 = AtomicU64::new(0);
static API_CALL_COUNT: AtomicU64 = AtomicU64::new(0);
static STARTUP_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize startup time. Call this once at server start.
pub fn init_startup_time() {
    let _ = STARTUP_TIME.get_or_init(Instant::now);
}

/// Get uptime in seconds since server start.
fn get_uptime_seconds() -> u64 {
    STARTUP_TIME.get().map(|start| start.elapsed().as_secs()).unwrap_or(0)
}

/// Increment request counter.
pub fn inc_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Increment error counter.
pub fn inc_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_migration_count() {
    MIGRATION_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_failed_migration_count() {
    FAILED_MIGRATION_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Increment the Management API call counter.
pub fn inc_api_call_count() {
    API_CALL_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Build status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/metrics", get(prometheus_metrics))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
}

// ============================================================================
// Handlers
// ============================================================================

/// Basic health check.
///
/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: get_uptime_seconds(),
        timestamp: Utc::now(),
    })
}

/// Liveness check.
///
/// GET /health/live
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus metrics.
///
/// GET /metrics
async fn prometheus_metrics() -> impl IntoResponse {
    let metrics = format!(
        r#"# HELP typeshift_requests_total Total number of API requests
# TYPE typeshift_requests_total counter
typeshift_requests_total {}

# HELP typeshift_errors_total Total number of failed API requests
# TYPE typeshift_errors_total counter
typeshift_errors_total {}

# HELP typeshift_migrations_total Total number of completed type migrations
# TYPE typeshift_migrations_total counter
typeshift_migrations_total {}

# HELP typeshift_migrations_failed_total Total number of aborted type migrations
# TYPE typeshift_migrations_failed_total counter
typeshift_migrations_failed_total {}

# HELP typeshift_management_api_calls_total Total number of Management API calls
# TYPE typeshift_management_api_calls_total counter
typeshift_management_api_calls_total {}

# HELP typeshift_uptime_seconds Server uptime in seconds
# TYPE typeshift_uptime_seconds gauge
typeshift_uptime_seconds {}
"#,
        REQUEST_COUNT.load(Ordering::Relaxed),
        ERROR_COUNT.load(Ordering::Relaxed),
        MIGRATION_COUNT.load(Ordering::Relaxed),
        FAILED_MIGRATION_COUNT.load(Ordering::Relaxed),
        API_CALL_COUNT.load(Ordering::Relaxed),
        get_uptime_seconds(),
    );

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics,
    )
}
