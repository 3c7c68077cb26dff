//! Identity references used by the Management API.
//!
//! Every entity (item, type, element, language, workflow step, snippet) can be
//! addressed by its internal id, its codename, or an external id. A reference
//! only identifies; it never carries the entity itself.

use serde::{Deserialize, Serialize};

/// A tagged identifier for a CMS entity.
///
/// Serializes as a single-key object: `{"id": "..."}`, `{"codename": "..."}`
/// or `{"external_id": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawReference")]
pub enum Reference {
    Id(String),
    Codename(String),
    ExternalId(String),
}

impl Reference {
    pub fn id(value: impl Into<String>) -> Self {
        Self::Id(value.into())
    }

    pub fn codename(value: impl Into<String>) -> Self {
        Self::Codename(value.into())
    }

    pub fn external_id(value: impl Into<String>) -> Self {
        Self::ExternalId(value.into())
    }

    /// The raw identifier string, whichever kind it is.
    pub fn value(&self) -> &str {
        match self {
            Self::Id(v) | Self::Codename(v) | Self::ExternalId(v) => v,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Codename(_) => "codename",
            Self::ExternalId(_) => "external_id",
        }
    }

    /// Whether this reference addresses an entity with the given identifiers.
    pub fn matches(&self, id: &str, codename: Option<&str>) -> bool {
        match self {
            Self::Id(v) => v == id,
            Self::Codename(v) => codename == Some(v.as_str()),
            Self::ExternalId(_) => false,
        }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// Wire shape accepted on input. The API sometimes returns both an id and a
/// codename for the same entity; the id wins.
#[derive(Deserialize)]
struct RawReference {
    id: Option<String>,
    codename: Option<String>,
    external_id: Option<String>,
}

impl TryFrom<RawReference> for Reference {
    type Error = String;

    fn try_from(raw: RawReference) -> Result<Self, Self::Error> {
        if let Some(id) = raw.id {
            return Ok(Self::Id(id));
        }
        if let Some(codename) = raw.codename {
            return Ok(Self::Codename(codename));
        }
        if let Some(external_id) = raw.external_id {
            return Ok(Self::ExternalId(external_id));
        }
        Err("reference must carry one of id, codename or external_id".to_string())
    }
}
