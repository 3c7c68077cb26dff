//! Cross-variant harvesting.
//!
//! A migration moves every language of the source item, not only the one
//! the request named. The harvester lists the source item's variants and
//! turns each into a pending variant of the new item using the same element
//! mapping (element ids are shared across languages).

use std::collections::HashSet;

use tracing::debug;

use crate::error::Result;
use crate::models::{ElementMapping, LanguageVariant, Reference};
use crate::services::remap::remap_fields;
use crate::services::{ContentRepository, UsageTracker};

/// Turn a source variant into a pending variant of `new_item`.
///
/// Field values are remapped; the original workflow step is carried over
/// unchanged so it can be restored after the fields are written.
pub fn pending_variant(
    source: &LanguageVariant,
    mapping: &ElementMapping,
    new_item: &Reference,
) -> Result<LanguageVariant> {
    Ok(LanguageVariant {
        item: new_item.clone(),
        language: source.language.clone(),
        elements: remap_fields(&source.elements, mapping)?,
        workflow_step: source.workflow_step.clone(),
        last_modified: None,
    })
}

/// Collect one pending variant per language of the source item.
///
/// `requested` is the already-remapped variant for the language the request
/// named (`requested_language`). It comes first and appears exactly once;
/// the listing's copy of that language is skipped. The remaining languages
/// follow in listing order.
///
/// A failed listing fails the whole harvest: every pending variant drives a
/// later mutation, so a partial set is never returned.
pub async fn harvest_variants(
    repo: &dyn ContentRepository,
    ctx: &UsageTracker,
    source_item: &Reference,
    requested: LanguageVariant,
    requested_language: &Reference,
    mapping: &ElementMapping,
) -> Result<Vec<LanguageVariant>> {
    let listed = repo.list_variants(ctx, source_item).await?;
    let new_item = requested.item.clone();

    let mut seen: HashSet<Reference> = HashSet::new();
    seen.insert(requested.language.clone());
    seen.insert(requested_language.clone());

    let mut pending = Vec::with_capacity(listed.len().max(1));
    pending.push(requested);

    for variant in &listed {
        if !seen.insert(variant.language.clone()) {
            continue;
        }
        debug!(language = %variant.language, "Harvesting variant");
        pending.push(pending_variant(variant, mapping, &new_item)?);
    }

    debug!(
        source_item = %source_item,
        variants = pending.len(),
        "Harvested language variants"
    );

    Ok(pending)
}
