//! Content type listing for the type picker.
//!
//! Lists every content type with snippet elements spliced in where the
//! snippet sits, then strips the elements that hold no values (snippet and
//! guidelines), so the list shows exactly the elements a mapping can use.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{ContentType, ElementDefinition, Reference, TypeListing};
use crate::services::{ContentRepository, UsageTracker};

#[derive(Clone)]
pub struct TypeCatalogService {
    repo: Arc<dyn ContentRepository>,
}

impl TypeCatalogService {
    pub fn new(repo: Arc<dyn ContentRepository>) -> Self {
        Self { repo }
    }

    /// Current type of the item plus every other type.
    pub async fn list_for_item(&self, item_codename: &str) -> Result<TypeListing> {
        let ctx = UsageTracker::start();
        let repo = self.repo.as_ref();

        let item = repo
            .get_item(&ctx, &Reference::codename(item_codename))
            .await?;
        let types = repo.list_content_types(&ctx).await?;

        let mut snippets = SnippetCache::new();
        let mut flattened = Vec::with_capacity(types.len());
        for content_type in types {
            load_snippets(repo, &ctx, &content_type, &mut snippets).await?;
            flattened.push(flatten_type(content_type, &snippets));
        }

        let (current, others): (Vec<ContentType>, Vec<ContentType>) = flattened
            .into_iter()
            .partition(|content_type| content_type.is_addressed_by(&item.type_ref));

        let current_type = current.into_iter().next().ok_or_else(|| {
            Error::NotFound(format!(
                "Content type {} of item '{}' does not exist",
                item.type_ref, item_codename
            ))
        })?;

        info!(
            item = item_codename,
            current_type = %current_type.id,
            other_types = others.len(),
            api_calls = ctx.calls(),
            "Listed content types"
        );

        Ok(TypeListing {
            current_type,
            other_types: others,
        })
    }
}

/// Snippet elements by snippet reference value.
pub type SnippetCache = HashMap<String, Vec<ElementDefinition>>;

/// Fetch every snippet `content_type` refers to that is not cached yet.
pub async fn load_snippets(
    repo: &dyn ContentRepository,
    ctx: &UsageTracker,
    content_type: &ContentType,
    snippets: &mut SnippetCache,
) -> Result<()> {
    for element in &content_type.elements {
        let Some(snippet) = &element.snippet else {
            continue;
        };
        if !snippets.contains_key(snippet.value()) {
            debug!(snippet = %snippet, "Fetching snippet elements");
            let fetched = repo.get_snippet(ctx, snippet).await?;
            snippets.insert(snippet.value().to_string(), fetched.elements);
        }
    }
    Ok(())
}

/// Splice snippet elements in place of their snippet element, then drop
/// every supporting element.
///
/// `snippets` maps snippet reference values to their elements; a snippet
/// element without a known snippet contributes nothing.
pub fn flatten_type(mut content_type: ContentType, snippets: &SnippetCache) -> ContentType {
    let mut elements = Vec::with_capacity(content_type.elements.len());
    for element in content_type.elements {
        if let Some(inlined) = element
            .snippet
            .as_ref()
            .and_then(|snippet| snippets.get(snippet.value()))
        {
            elements.extend(inlined.iter().cloned());
        }
        elements.push(element);
    }

    elements.retain(|element| !element.kind.is_supporting());
    content_type.elements = elements;
    content_type
}
