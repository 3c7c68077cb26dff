//! Content type migration.
//!
//! Moves an item onto another content type by creating a new item of the
//! target type and writing every language variant into it, remapped through
//! the request's element mapping and returned to its original workflow
//! classification.
//!
//! Operational risk: the remote mutations are not transactional. When a call
//! fails after the new item was created, the item and the variants already
//! transitioned are left in place. Repeating the request creates another new
//! item, so callers must not blindly retry.

use std::sync::Arc;

use tracing::info;

use crate::config::MigrationSettings;
use crate::error::{Error, Result};
use crate::models::{
    ContentType, ElementMapping, MigrationRequest, MigrationResult, Reference,
};
use crate::services::harvest::{harvest_variants, pending_variant};
use crate::services::type_catalog::{flatten_type, load_snippets, SnippetCache};
use crate::services::workflow::{ResolvedWorkflow, WorkflowOrchestrator};
use crate::services::{ContentRepository, UsageTracker};

/// Service driving type migrations against a content repository.
#[derive(Clone)]
pub struct MigrationService {
    repo: Arc<dyn ContentRepository>,
    settings: MigrationSettings,
}

impl MigrationService {
    pub fn new(repo: Arc<dyn ContentRepository>, settings: MigrationSettings) -> Self {
        Self { repo, settings }
    }

    pub fn settings(&self) -> &MigrationSettings {
        &self.settings
    }

    /// Build a request from the HTTP surface's identifiers.
    ///
    /// The item and language are codenames, the target type an id. A missing
    /// language falls back to the configured default.
    pub fn request(
        &self,
        item_codename: &str,
        language_codename: Option<&str>,
        type_id: Option<&str>,
        mapping: ElementMapping,
    ) -> Result<MigrationRequest> {
        let type_id = type_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Validation("A target type id is required".to_string()))?;

        let language = language_codename
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(self.settings.default_language.as_str());

        Ok(MigrationRequest {
            item: Reference::codename(item_codename),
            language: Reference::codename(language),
            target_type: Reference::id(type_id),
            mapping,
        })
    }

    /// Run one migration.
    ///
    /// All reads and all remapping happen before the first mutation, so a
    /// bad mapping, a missing element or a missing workflow step fails the
    /// request with nothing written.
    pub async fn migrate(&self, request: MigrationRequest) -> Result<MigrationResult> {
        let ctx = UsageTracker::start();
        let repo = self.repo.as_ref();

        request.mapping.validate()?;

        info!(
            item = %request.item,
            language = %request.language,
            target_type = %request.target_type,
            mappings = request.mapping.len(),
            "Starting type migration"
        );

        // Resolve
        let source_item = repo.get_item(&ctx, &request.item).await?;
        let source_variant = repo
            .get_variant(&ctx, &request.item, &request.language)
            .await?;
        let target_type = repo.get_content_type(&ctx, &request.target_type).await?;
        let mut snippets = SnippetCache::new();
        load_snippets(repo, &ctx, &target_type, &mut snippets).await?;
        let target_type = flatten_type(target_type, &snippets);
        check_targets(&target_type, &request.mapping)?;
        let workflow = ResolvedWorkflow::resolve(
            repo.list_workflow_steps(&ctx).await?,
            &self.settings.workflow_names,
        )?;

        // Remap and harvest
        let external_id = repo.allocate_external_id();
        let new_item_ref = Reference::external_id(external_id.as_str());
        let requested = pending_variant(&source_variant, &request.mapping, &new_item_ref)?;
        let source_item_ref = source_item.reference().unwrap_or_else(|| request.item.clone());
        let pending = harvest_variants(
            repo,
            &ctx,
            &source_item_ref,
            requested,
            &request.language,
            &request.mapping,
        )
        .await?;

        // Mutate
        let new_item = repo
            .upsert_item(
                &ctx,
                &source_item.retyped(&external_id, Reference::id(target_type.id.as_str())),
            )
            .await?;
        let updated_variants = WorkflowOrchestrator::new(repo, &ctx, &workflow)
            .transition_all(&pending)
            .await?;

        let result = MigrationResult {
            total_api_calls: ctx.calls(),
            total_milliseconds: ctx.elapsed_ms(),
            new_item,
            updated_variants,
        };

        info!(
            item = %request.item,
            new_external_id = %external_id,
            variants = result.updated_variants.len(),
            api_calls = result.total_api_calls,
            elapsed_ms = result.total_milliseconds,
            "Type migration complete"
        );

        Ok(result)
    }
}

/// Every mapped target must be a value element of the target type, snippet
/// elements included.
fn check_targets(target_type: &ContentType, mapping: &ElementMapping) -> Result<()> {
    for target in mapping.targets() {
        if !target_type.has_element(target) {
            return Err(Error::NotFound(format!(
                "Element '{}' does not exist on content type '{}'",
                target,
                target_type.codename.as_deref().unwrap_or(target_type.id.as_str())
            )));
        }
    }
    Ok(())
}
