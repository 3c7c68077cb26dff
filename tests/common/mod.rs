//! Common test utilities and helpers.
//!
//! `FakeRepository` is an in-memory content repository that records every
//! call it receives and keeps enough state (created items, variant workflow
//! steps) to check where a migration leaves things.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::{json, Map, Value};

use typeshift::error::{Error, Result};
use typeshift::models::{
    ContentItem, ContentType, ContentTypeSnippet, ElementDefinition, ElementKind, FieldValue,
    LanguageVariant, Reference, WorkflowStep,
};
use typeshift::services::{ContentRepository, UsageTracker};

pub const DRAFT: &str = "step-draft";
pub const REVIEW: &str = "step-review";
pub const PUBLISHED: &str = "step-published";
pub const ARCHIVED: &str = "step-archived";

pub const SOURCE_ITEM_ID: &str = "item-1";
pub const SOURCE_ITEM_CODENAME: &str = "article_1";
pub const TYPE_A: &str = "type-a";
pub const TYPE_B: &str = "type-b";

/// One repository call, as received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetItem(Reference),
    GetVariant(Reference, Reference),
    ListVariants(Reference),
    UpsertItem(ContentItem),
    UpsertVariant {
        item: Reference,
        language: Reference,
        elements: Vec<FieldValue>,
    },
    CreateNewVersion {
        item: Reference,
        language: Reference,
    },
    Publish {
        item: Reference,
        language: Reference,
    },
    ChangeStep {
        item: Reference,
        language: Reference,
        step: Reference,
    },
    ListWorkflowSteps,
    GetType(Reference),
    ListTypes,
    GetSnippet(Reference),
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::GetItem(_) => "get-item",
            Call::GetVariant(..) => "get-variant",
            Call::ListVariants(_) => "list-variants",
            Call::UpsertItem(_) => "upsert-item",
            Call::UpsertVariant { .. } => "upsert",
            Call::CreateNewVersion { .. } => "create-new-version",
            Call::Publish { .. } => "publish",
            Call::ChangeStep { .. } => "change-step",
            Call::ListWorkflowSteps => "list-workflow-steps",
            Call::GetType(_) => "get-type",
            Call::ListTypes => "list-types",
            Call::GetSnippet(_) => "get-snippet",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::UpsertItem(_)
                | Call::UpsertVariant { .. }
                | Call::CreateNewVersion { .. }
                | Call::Publish { .. }
                | Call::ChangeStep { .. }
        )
    }

    pub fn language(&self) -> Option<&Reference> {
        match self {
            Call::UpsertVariant { language, .. }
            | Call::CreateNewVersion { language, .. }
            | Call::Publish { language, .. }
            | Call::ChangeStep { language, .. } => Some(language),
            _ => None,
        }
    }
}

type FailWhen = Box<dyn Fn(&Call) -> bool + Send + Sync>;

#[derive(Default)]
struct FakeState {
    items: Vec<ContentItem>,
    variants: Vec<LanguageVariant>,
    types: Vec<ContentType>,
    snippets: Vec<ContentTypeSnippet>,
    steps: Vec<WorkflowStep>,
    /// (id, codename)
    languages: Vec<(String, String)>,
    /// New variants keyed by (item external id, language id).
    written: HashMap<(String, String), LanguageVariant>,
    /// Ids assigned to created items, by external id.
    created: HashMap<String, String>,
    log: Vec<Call>,
    next_id: usize,
}

pub struct FakeRepository {
    state: Mutex<FakeState>,
    fail_when: Option<FailWhen>,
}

impl FakeRepository {
    pub fn new() -> Self {
        let state = FakeState {
            steps: default_steps(),
            languages: vec![
                ("lang-en".to_string(), "en".to_string()),
                ("lang-es".to_string(), "es".to_string()),
                ("lang-de".to_string(), "de".to_string()),
            ],
            ..Default::default()
        };
        Self {
            state: Mutex::new(state),
            fail_when: None,
        }
    }

    /// Source item `article_1` of type A (`title` t1, `body` b1) and target
    /// type B (`heading` h1, `content` c1).
    pub fn with_article() -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.lock().unwrap();
            state.items.push(ContentItem {
                id: Some(SOURCE_ITEM_ID.to_string()),
                name: "Article 1".to_string(),
                codename: Some(SOURCE_ITEM_CODENAME.to_string()),
                external_id: None,
                type_ref: Reference::id(TYPE_A),
                collection: Some(Reference::id("default-collection")),
                last_modified: None,
            });
            state.types.push(content_type(
                TYPE_A,
                "article",
                vec![
                    ElementDefinition::new("t1", "title", ElementKind::Text),
                    ElementDefinition::new("b1", "body", ElementKind::RichText),
                ],
            ));
            state.types.push(content_type(
                TYPE_B,
                "page",
                vec![
                    ElementDefinition::new("h1", "heading", ElementKind::Text),
                    ElementDefinition::new("c1", "content", ElementKind::RichText),
                ],
            ));
        }
        repo
    }

    pub fn fail_when(mut self, predicate: impl Fn(&Call) -> bool + Send + Sync + 'static) -> Self {
        self.fail_when = Some(Box::new(predicate));
        self
    }

    pub fn add_variant(&self, language_id: &str, step: &str, elements: Vec<FieldValue>) {
        self.state.lock().unwrap().variants.push(LanguageVariant {
            item: Reference::id(SOURCE_ITEM_ID),
            language: Reference::id(language_id),
            elements,
            workflow_step: Reference::id(step),
            last_modified: Some("2024-01-01T00:00:00Z".to_string()),
        });
    }

    pub fn add_type(&self, content_type: ContentType) {
        self.state.lock().unwrap().types.push(content_type);
    }

    pub fn add_snippet(&self, snippet: ContentTypeSnippet) {
        self.state.lock().unwrap().snippets.push(snippet);
    }

    pub fn set_steps(&self, steps: Vec<WorkflowStep>) {
        self.state.lock().unwrap().steps = steps;
    }

    pub fn log(&self) -> Vec<Call> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.log().iter().map(Call::name).collect()
    }

    /// Calls touching one language of the new item, in order.
    pub fn calls_for_language(&self, language_id: &str) -> Vec<Call> {
        self.log()
            .into_iter()
            .filter(|call| call.language().map(Reference::value) == Some(language_id))
            .collect()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.log().into_iter().filter(Call::is_mutation).collect()
    }

    /// Workflow step a new variant currently sits in.
    pub fn written_step(&self, external_id: &str, language_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .written
            .get(&(external_id.to_string(), language_id.to_string()))
            .map(|variant| variant.workflow_step.value().to_string())
    }

    pub fn created_items(&self) -> Vec<ContentItem> {
        self.log()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpsertItem(item) => Some(item),
                _ => None,
            })
            .collect()
    }

    fn record(&self, ctx: &UsageTracker, call: Call) -> Result<()> {
        ctx.record_call();
        let fail = self.fail_when.as_ref().is_some_and(|f| f(&call));
        let name = call.name();
        self.state.lock().unwrap().log.push(call);
        if fail {
            return Err(Error::RemoteCall(format!("{} failed (injected)", name)));
        }
        Ok(())
    }

    fn language_id(state: &FakeState, language: &Reference) -> Option<String> {
        state
            .languages
            .iter()
            .find(|(id, codename)| language.matches(id, Some(codename)))
            .map(|(id, _)| id.clone())
    }

    fn item_matches(item: &ContentItem, reference: &Reference) -> bool {
        match reference {
            Reference::Id(v) => item.id.as_deref() == Some(v.as_str()),
            Reference::Codename(v) => item.codename.as_deref() == Some(v.as_str()),
            Reference::ExternalId(v) => item.external_id.as_deref() == Some(v.as_str()),
        }
    }

    fn set_written_step(&self, item: &Reference, language: &Reference, step: &str) {
        let mut state = self.state.lock().unwrap();
        let Some(language_id) = Self::language_id(&state, language) else {
            return;
        };
        let key = (item.value().to_string(), language_id.clone());
        let entry = state.written.entry(key).or_insert_with(|| LanguageVariant {
            item: item.clone(),
            language: Reference::id(language_id),
            elements: vec![],
            workflow_step: Reference::id(DRAFT),
            last_modified: None,
        });
        entry.workflow_step = Reference::id(step);
    }
}

#[async_trait]
impl ContentRepository for FakeRepository {
    async fn get_item(&self, ctx: &UsageTracker, item: &Reference) -> Result<ContentItem> {
        self.record(ctx, Call::GetItem(item.clone()))?;
        let state = self.state.lock().unwrap();
        state
            .items
            .iter()
            .find(|candidate| Self::item_matches(candidate, item))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("item {}", item)))
    }

    async fn get_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<LanguageVariant> {
        self.record(ctx, Call::GetVariant(item.clone(), language.clone()))?;
        let state = self.state.lock().unwrap();
        let source = state
            .items
            .iter()
            .find(|candidate| Self::item_matches(candidate, item))
            .and_then(|candidate| candidate.id.clone())
            .ok_or_else(|| Error::NotFound(format!("item {}", item)))?;
        let language_id = Self::language_id(&state, language)
            .ok_or_else(|| Error::NotFound(format!("language {}", language)))?;
        state
            .variants
            .iter()
            .find(|v| v.item.value() == source && v.language.value() == language_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("variant {} of {}", language, item)))
    }

    async fn list_variants(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
    ) -> Result<Vec<LanguageVariant>> {
        self.record(ctx, Call::ListVariants(item.clone()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .variants
            .iter()
            .filter(|v| v.item == *item)
            .cloned()
            .collect())
    }

    async fn upsert_item(&self, ctx: &UsageTracker, item: &ContentItem) -> Result<ContentItem> {
        self.record(ctx, Call::UpsertItem(item.clone()))?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let next_id = state.next_id;
        let id = format!("new-item-{}", next_id);
        let mut created = item.clone();
        created.id = Some(id.clone());
        created.codename = Some(format!("new_item_{}", next_id));
        if let Some(external_id) = &item.external_id {
            state.created.insert(external_id.clone(), id);
        }
        Ok(created)
    }

    async fn upsert_variant(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        elements: &[FieldValue],
    ) -> Result<LanguageVariant> {
        self.record(
            ctx,
            Call::UpsertVariant {
                item: item.clone(),
                language: language.clone(),
                elements: elements.to_vec(),
            },
        )?;
        let mut state = self.state.lock().unwrap();
        let language_id = Self::language_id(&state, language)
            .ok_or_else(|| Error::NotFound(format!("language {}", language)))?;
        let key = (item.value().to_string(), language_id.clone());
        if let Some(existing) = state.written.get(&key) {
            let step = existing.workflow_step.value();
            if step == PUBLISHED || step == ARCHIVED {
                return Err(Error::RemoteCall(format!(
                    "variant {} is in step {} and cannot be edited",
                    language, step
                )));
            }
        }
        let step = state
            .written
            .get(&key)
            .map(|v| v.workflow_step.clone())
            .unwrap_or_else(|| Reference::id(DRAFT));
        let owner = state
            .created
            .get(item.value())
            .map(|id| Reference::id(id.as_str()))
            .unwrap_or_else(|| item.clone());
        let variant = LanguageVariant {
            item: owner,
            language: Reference::id(language_id),
            elements: elements.to_vec(),
            workflow_step: step,
            last_modified: Some("2024-06-01T00:00:00Z".to_string()),
        };
        state.written.insert(key, variant.clone());
        Ok(variant)
    }

    async fn create_new_version(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
    ) -> Result<()> {
        self.record(
            ctx,
            Call::CreateNewVersion {
                item: item.clone(),
                language: language.clone(),
            },
        )?;
        self.set_written_step(item, language, DRAFT);
        Ok(())
    }

    async fn publish(&self, ctx: &UsageTracker, item: &Reference, language: &Reference) -> Result<()> {
        self.record(
            ctx,
            Call::Publish {
                item: item.clone(),
                language: language.clone(),
            },
        )?;
        self.set_written_step(item, language, PUBLISHED);
        Ok(())
    }

    async fn change_workflow_step(
        &self,
        ctx: &UsageTracker,
        item: &Reference,
        language: &Reference,
        step: &Reference,
    ) -> Result<()> {
        self.record(
            ctx,
            Call::ChangeStep {
                item: item.clone(),
                language: language.clone(),
                step: step.clone(),
            },
        )?;
        self.set_written_step(item, language, step.value());
        Ok(())
    }

    async fn list_workflow_steps(&self, ctx: &UsageTracker) -> Result<Vec<WorkflowStep>> {
        self.record(ctx, Call::ListWorkflowSteps)?;
        Ok(self.state.lock().unwrap().steps.clone())
    }

    async fn get_content_type(
        &self,
        ctx: &UsageTracker,
        content_type: &Reference,
    ) -> Result<ContentType> {
        self.record(ctx, Call::GetType(content_type.clone()))?;
        let state = self.state.lock().unwrap();
        state
            .types
            .iter()
            .find(|t| t.is_addressed_by(content_type))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("content type {}", content_type)))
    }

    async fn list_content_types(&self, ctx: &UsageTracker) -> Result<Vec<ContentType>> {
        self.record(ctx, Call::ListTypes)?;
        Ok(self.state.lock().unwrap().types.clone())
    }

    async fn get_snippet(
        &self,
        ctx: &UsageTracker,
        snippet: &Reference,
    ) -> Result<ContentTypeSnippet> {
        self.record(ctx, Call::GetSnippet(snippet.clone()))?;
        let state = self.state.lock().unwrap();
        state
            .snippets
            .iter()
            .find(|s| snippet.matches(&s.id, s.codename.as_deref()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("snippet {}", snippet)))
    }

    fn allocate_external_id(&self) -> String {
        "new-external-id".to_string()
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn default_steps() -> Vec<WorkflowStep> {
    vec![
        step(DRAFT, "Draft"),
        step(REVIEW, "Review"),
        step(PUBLISHED, "Published"),
        step(ARCHIVED, "Archived"),
    ]
}

pub fn step(id: &str, name: &str) -> WorkflowStep {
    WorkflowStep {
        id: id.to_string(),
        name: name.to_string(),
        codename: Some(name.to_lowercase()),
    }
}

pub fn content_type(id: &str, codename: &str, elements: Vec<ElementDefinition>) -> ContentType {
    ContentType {
        id: id.to_string(),
        codename: Some(codename.to_string()),
        name: Some(codename.to_string()),
        elements,
        extra: Map::new(),
    }
}

pub fn field(element_id: &str, value: Value) -> FieldValue {
    FieldValue::new(Reference::id(element_id), value)
}

pub fn article_fields(title: &str) -> Vec<FieldValue> {
    vec![
        field("t1", json!(title)),
        field("b1", json!(format!("<p>{}</p>", title))),
    ]
}

// ============================================================================
// HTTP helpers
// ============================================================================

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Create a GET request
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Create a POST request with a raw JSON body
pub fn post_raw_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
