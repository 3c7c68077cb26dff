//! Request/response models for Typeshift.
//!
//! CMS entities come from the `typeshift-models` crate and are re-exported
//! here so handlers and services import from one place.

mod migration;

pub use migration::{ElementMapping, MappingEntry, MigrationRequest, MigrationResult, TypeListing};
pub use typeshift_models::*;
