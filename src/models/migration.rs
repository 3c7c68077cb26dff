//! Request and response models for type migration and type listing.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use typeshift_models::{ContentItem, ContentType, LanguageVariant, Reference};

use crate::error::{Error, Result};

/// One mapping entry: copy the value of `source` into `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub target: String,
    pub source: String,
}

/// Ordered mapping from target element id to source element id.
///
/// Deserializes from a JSON object but keeps every key in document order,
/// duplicates included, so that [`ElementMapping::validate`] can reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMapping {
    entries: Vec<MappingEntry>,
}

impl ElementMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, T, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(target, source)| MappingEntry {
                    target: target.into(),
                    source: source.into(),
                })
                .collect(),
        }
    }

    pub fn push(&mut self, target: impl Into<String>, source: impl Into<String>) {
        self.entries.push(MappingEntry {
            target: target.into(),
            source: source.into(),
        });
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.target.as_str())
    }

    /// Structural check: every target element id appears once.
    ///
    /// Needs no remote data, so it runs before anything is fetched.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            if entry.target.trim().is_empty() || entry.source.trim().is_empty() {
                return Err(Error::Validation(
                    "Element ids in a mapping must not be empty".to_string(),
                ));
            }
            if !seen.insert(entry.target.as_str()) {
                return Err(Error::Validation(format!(
                    "Target element '{}' is mapped more than once",
                    entry.target
                )));
            }
        }
        Ok(())
    }
}

impl Serialize for ElementMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.target, &entry.source)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ElementMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = ElementMapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of target element id to source element id")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut mapping = ElementMapping::new();
                while let Some((target, source)) = access.next_entry::<String, String>()? {
                    mapping.push(target, source);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// A request to move an item onto another content type.
#[derive(Debug, Clone)]
pub struct MigrationRequest {
    pub item: Reference,
    pub language: Reference,
    pub target_type: Reference,
    pub mapping: ElementMapping,
}

/// Outcome of a successful migration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResult {
    pub total_api_calls: u64,
    pub total_milliseconds: u64,
    pub new_item: ContentItem,
    /// Every variant created and transitioned by the request, attributed to
    /// the new item.
    pub updated_variants: Vec<LanguageVariant>,
}

/// Type listing for an item: its current type and every other type, each
/// with snippet elements inlined and supporting elements removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeListing {
    pub current_type: ContentType,
    pub other_types: Vec<ContentType>,
}
