//! Service layer for Typeshift.
//!
//! Contains the migration core and its collaborators:
//! - Repository (Management API access behind a trait)
//! - Tracker (request-scoped call counting and timing)
//! - Remap (field value remapping under an element mapping)
//! - Harvest (pending variants for every language of an item)
//! - Workflow (precondition / upsert / postcondition pipelines)
//! - Migration (the request driver)
//! - TypeCatalog (type listing with snippets inlined)

pub mod harvest;
mod migration;
pub mod remap;
pub mod repository;
mod tracker;
mod type_catalog;
pub mod workflow;

pub use migration::MigrationService;
pub use repository::{ContentRepository, KontentClient};
pub use tracker::UsageTracker;
pub use type_catalog::TypeCatalogService;
