//! Attribute stripping policy.
//!
//! Fields listed here are removed from freshly fetched records before they
//! are compared against what has already been collected.

use monimport_types::{EntityKind, EntityRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-kind table of field names to strip. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeFilter(BTreeMap<EntityKind, Vec<String>>);

impl AttributeFilter {
    /// A filter that strips nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds fields to strip for a kind.
    #[must_use]
    pub fn strip<I, S>(mut self, kind: EntityKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(kind)
            .or_default()
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Fields stripped for a kind.
    #[must_use]
    pub fn fields_for(&self, kind: EntityKind) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if no kind has fields to strip.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Removes the configured fields from a record. Absent fields are ignored.
    pub fn apply(&self, kind: EntityKind, record: &mut EntityRecord) {
        for field in self.fields_for(kind) {
            record.remove(field);
        }
    }
}
