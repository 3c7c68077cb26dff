//! Item Routes
//!
//! Type listing and type migration for a single content item.
//!
//! Routes:
//! - GET /items/:item_codename/types - Current type and every other type
//! - POST /items/:item_codename/change-type - Migrate the item to another type
//! - GET /element-compatibility - Advisory element compatibility table

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::status;
use crate::models::{ElementKind, ElementMapping, MigrationResult, TypeListing};
use crate::{AppState, Error, Result};

/// Build item routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/items/:item_codename/types", get(list_types))
        .route("/items/:item_codename/change-type", post(change_type))
        .route("/element-compatibility", get(element_compatibility))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChangeTypeQuery {
    pub language: Option<String>,
    pub type_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// List content types for an item.
///
/// GET /items/:item_codename/types
async fn list_types(
    State(state): State<AppState>,
    Path(item_codename): Path<String>,
) -> Result<Json<TypeListing>> {
    status::inc_request_count();
    let listing = state.types.list_for_item(&item_codename).await.map_err(|e| {
        status::inc_error_count();
        e
    })?;
    Ok(Json(listing))
}

/// Migrate an item to another content type.
///
/// POST /items/:item_codename/change-type?language=<codename>&type_id=<id>
///
/// Body: JSON object mapping target element ids to source element ids. A
/// body of any other shape is a validation error.
async fn change_type(
    State(state): State<AppState>,
    Path(item_codename): Path<String>,
    Query(query): Query<ChangeTypeQuery>,
    body: std::result::Result<Json<ElementMapping>, JsonRejection>,
) -> Result<Json<MigrationResult>> {
    status::inc_request_count();

    let request = body
        .map_err(|rejection| {
            Error::Validation(format!("Invalid element mapping: {}", rejection.body_text()))
        })
        .and_then(|Json(mapping)| {
            state.migration.request(
                &item_codename,
                query.language.as_deref(),
                query.type_id.as_deref(),
                mapping,
            )
        });

    let outcome = match request {
        Ok(request) => state.migration.migrate(request).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => {
            status::inc_migration_count();
            Ok(Json(result))
        }
        Err(e) => {
            status::inc_error_count();
            status::inc_failed_migration_count();
            Err(e)
        }
    }
}

/// Element compatibility table: for each target element type, the source
/// element types offered when building a mapping.
///
/// GET /element-compatibility
async fn element_compatibility() -> Json<BTreeMap<ElementKind, Vec<ElementKind>>> {
    Json(
        ElementKind::ALL
            .iter()
            .map(|kind| (*kind, kind.compatible_sources().to_vec()))
            .collect(),
    )
}
