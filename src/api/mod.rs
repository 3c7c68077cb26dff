//! API Routes for Typeshift
//!
//! This module combines all API routes into a single router.

mod items;
pub mod status;

use axum::Router;

use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /items/:item_codename/types - Type listing
/// - /items/:item_codename/change-type - Type migration
/// - /element-compatibility - Advisory mapping compatibility
/// - /health, /metrics - Health checks (public)
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health and status endpoints
        .merge(status::routes())
        // Item type listing and migration
        .merge(items::routes())
}
