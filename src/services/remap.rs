//! Field remapping between content types.
//!
//! Produces one field value per mapping entry by deep-copying the source
//! value and pointing it at the target element. Source fields the mapping
//! does not name are dropped.

use crate::error::{Error, Result};
use crate::models::{ElementMapping, FieldValue, Reference};

/// Remap one variant's field values under `mapping`.
///
/// Fails with `NotFound` when an entry names a source element the variant
/// does not carry.
pub fn remap_fields(source: &[FieldValue], mapping: &ElementMapping) -> Result<Vec<FieldValue>> {
    mapping
        .entries()
        .iter()
        .map(|entry| {
            let field = source
                .iter()
                .find(|field| field.element.value() == entry.source)
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "Source element '{}' (mapped to '{}') has no value on the source variant",
                        entry.source, entry.target
                    ))
                })?;

            Ok(field.retargeted(Reference::id(entry.target.as_str())))
        })
        .collect()
}
