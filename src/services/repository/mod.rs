//! Content repository abstraction.
//!
//! The migration core talks to the CMS only through [`ContentRepository`].
//! Every remote operation takes the request's [`UsageTracker`] and records
//! one call on it before the call goes out; every failure comes back as an
//! error, never as a silent success.

mod kontent;

pub use kontent::KontentClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    ContentItem, ContentType, ContentTypeSnippet, FieldValue, LanguageVariant, Reference,
    WorkflowStep,
};
use crate::services::UsageTracker;

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Get an item by reference.
    async fn get_item(&self, ctx: &UsageTracker, item: &Reference) -> Result<ContentItem>;

    /// Get one language variant of an item.
    async fn get_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<LanguageVariant>;

    /// List every language variant of an item.
    async fn list_variants(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
    ) -> Result<Vec<LanguageVariant>>;

    /// Create or update an item addressed by its external id.
    async fn upsert_item(&self, ctx: &UsageTracker, item: &ContentItem) -> Result<ContentItem>;

    /// Create or update a variant's element values.
    async fn upsert_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        elements: &[FieldValue],
    ) -> Result<LanguageVariant>;

    /// Clone a published variant into an editable draft version.
    async fn create_new_version(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<()>;

    /// Publish the current version of a variant.
    async fn publish(&self, ctx: &UsageTracker, item: &Reference, language: &Reference)
        -> Result<()>;

    /// Move a variant to another workflow step.
    async fn change_workflow_step(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        step: &Reference,
    ) -> Result<()>;

    async fn list_workflow_steps(&self, ctx: &UsageTracker) -> Result<Vec<WorkflowStep>>;

    async fn get_content_type(&self, ctx: &UsageTracker, content_type: &Reference)
        -> Result<ContentType>;

    async fn list_content_types(&self, ctx: &UsageTracker) -> Result<Vec<ContentType>>;

    async fn get_snippet(
        &self,
        ctx: &UsageTracker,
        snippet: &Reference,
    ) -> Result<ContentTypeSnippet>;

    /// Allocate a fresh external id for a new item. Local, not a remote call.
    fn allocate_external_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
