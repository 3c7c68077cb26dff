//! Content items and their per-language variants.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Reference;

/// A language-independent content record of exactly one content type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(rename = "type")]
    pub type_ref: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl ContentItem {
    /// Reference to this item, preferring its internal id.
    pub fn reference(&self) -> Option<Reference> {
        self.id
            .clone()
            .map(Reference::Id)
            .or_else(|| self.codename.clone().map(Reference::Codename))
            .or_else(|| self.external_id.clone().map(Reference::ExternalId))
    }

    /// Copy of this item re-typed as a brand new record.
    ///
    /// The copy has no id and no codename (the server assigns fresh ones),
    /// carries the given external id, and points at the target type.
    pub fn retyped(&self, external_id: &str, target_type: Reference) -> Self {
        Self {
            id: None,
            name: self.name.clone(),
            codename: None,
            external_id: Some(external_id.to_string()),
            type_ref: target_type,
            collection: self.collection.clone(),
            last_modified: None,
        }
    }
}

/// One element value on a language variant.
///
/// `value` holds the element payload. Anything else the API attaches to the
/// value (rich text components, url slug mode, ...) lives in `extra` and is
/// carried along verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub element: Reference,
    #[serde(default)]
    pub value: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldValue {
    pub fn new(element: Reference, value: Value) -> Self {
        Self {
            element,
            value,
            extra: Map::new(),
        }
    }

    /// Deep copy of this value pointed at another element.
    pub fn retargeted(&self, element: Reference) -> Self {
        Self {
            element,
            ..self.clone()
        }
    }
}

/// Per-language field data and workflow state of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageVariant {
    pub item: Reference,
    pub language: Reference,
    #[serde(default)]
    pub elements: Vec<FieldValue>,
    pub workflow_step: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl LanguageVariant {
    pub fn field(&self, element_id: &str) -> Option<&FieldValue> {
        self.elements
            .iter()
            .find(|field| field.element.value() == element_id)
    }
}
