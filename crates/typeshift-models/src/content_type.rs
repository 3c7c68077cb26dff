//! Content type schemas and their element definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Reference;

/// Element type tags known to the Management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Asset,
    Snippet,
    Custom,
    DateTime,
    Guidelines,
    ModularContent,
    Number,
    MultipleChoice,
    RichText,
    Taxonomy,
    Text,
    UrlSlug,
}

impl ElementKind {
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Asset,
        ElementKind::Snippet,
        ElementKind::Custom,
        ElementKind::DateTime,
        ElementKind::Guidelines,
        ElementKind::ModularContent,
        ElementKind::Number,
        ElementKind::MultipleChoice,
        ElementKind::RichText,
        ElementKind::Taxonomy,
        ElementKind::Text,
        ElementKind::UrlSlug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Asset => "asset",
            ElementKind::Snippet => "snippet",
            ElementKind::Custom => "custom",
            ElementKind::DateTime => "date_time",
            ElementKind::Guidelines => "guidelines",
            ElementKind::ModularContent => "modular_content",
            ElementKind::Number => "number",
            ElementKind::MultipleChoice => "multiple_choice",
            ElementKind::RichText => "rich_text",
            ElementKind::Taxonomy => "taxonomy",
            ElementKind::Text => "text",
            ElementKind::UrlSlug => "url_slug",
        }
    }

    /// Snippet and guidelines elements hold no value of their own.
    pub fn is_supporting(&self) -> bool {
        matches!(self, ElementKind::Snippet | ElementKind::Guidelines)
    }

    /// Source element kinds whose values can sensibly be mapped into an
    /// element of this kind.
    ///
    /// Advisory only: used when presenting mapping choices, never checked
    /// during a migration.
    pub fn compatible_sources(&self) -> &'static [ElementKind] {
        match self {
            ElementKind::Asset => &[ElementKind::Asset],
            ElementKind::Snippet => &[ElementKind::Snippet],
            ElementKind::Custom => &[ElementKind::Custom],
            ElementKind::DateTime => &[ElementKind::DateTime],
            ElementKind::Guidelines => &[ElementKind::Guidelines, ElementKind::Text],
            ElementKind::ModularContent => &[ElementKind::ModularContent],
            ElementKind::Number => &[ElementKind::Number],
            ElementKind::MultipleChoice => &[ElementKind::MultipleChoice],
            ElementKind::RichText => &[ElementKind::RichText],
            ElementKind::Taxonomy => &[ElementKind::Taxonomy],
            ElementKind::Text => &[
                ElementKind::Text,
                ElementKind::DateTime,
                ElementKind::Custom,
                ElementKind::Number,
                ElementKind::RichText,
            ],
            ElementKind::UrlSlug => &[ElementKind::Text, ElementKind::UrlSlug],
        }
    }

    pub fn accepts(&self, source: ElementKind) -> bool {
        self.compatible_sources().contains(&source)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, typed slot in a content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Set on snippet elements: the snippet whose elements get inlined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<Reference>,
    /// Remaining schema attributes (guidelines, validation rules, options...)
    /// passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementDefinition {
    pub fn new(id: impl Into<String>, codename: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            codename: Some(codename.into()),
            name: None,
            kind,
            snippet: None,
            extra: Map::new(),
        }
    }

    pub fn is_addressed_by(&self, reference: &Reference) -> bool {
        reference.matches(&self.id, self.codename.as_deref())
    }
}

/// A content type: an ordered set of element definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentType {
    pub fn element(&self, id: &str) -> Option<&ElementDefinition> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    pub fn is_addressed_by(&self, reference: &Reference) -> bool {
        reference.matches(&self.id, self.codename.as_deref())
    }
}

/// A reusable group of element definitions inlined into types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeSnippet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementDefinition>,
}
