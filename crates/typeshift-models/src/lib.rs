//! Data models for content type migration.
//!
//! Mirrors the Management API's view of a project: items, language
//! variants, content types with their elements, and workflow steps.

mod content_type;
mod item;
mod reference;
mod workflow;

pub use content_type::{ContentType, ContentTypeSnippet, ElementDefinition, ElementKind};
pub use item::{ContentItem, FieldValue, LanguageVariant};
pub use reference::Reference;
pub use workflow::{WorkflowCatalog, WorkflowClassification, WorkflowNames, WorkflowStep};
