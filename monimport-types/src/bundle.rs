//! The merged configuration bundle handed to the consumer.

use crate::{EntityKind, EntityRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ordered record collection per entity kind.
///
/// Serialises as a JSON object keyed by [`EntityKind::key`], kinds in fetch
/// order. A finished bundle never carries the `servicestemplates` key; those
/// records live at the end of `services`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(BTreeMap<EntityKind, Vec<EntityRecord>>);

impl Bundle {
    /// A bundle with an empty collection for every post-merge kind.
    #[must_use]
    pub fn empty() -> Self {
        Self(
            EntityKind::FETCH_ORDER
                .into_iter()
                .filter(|kind| kind.in_bundle())
                .map(|kind| (kind, Vec::new()))
                .collect(),
        )
    }

    /// Wraps already-built collections.
    #[must_use]
    pub fn from_collections(collections: BTreeMap<EntityKind, Vec<EntityRecord>>) -> Self {
        Self(collections)
    }

    /// Records of a kind; empty if the kind is absent.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> &[EntityRecord] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns whether the bundle carries a key for the kind.
    #[must_use]
    pub fn contains_kind(&self, kind: EntityKind) -> bool {
        self.0.contains_key(&kind)
    }

    /// Kinds present in the bundle, in fetch order.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.0.keys().copied()
    }

    /// Total number of records across all kinds.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Returns true if no kind holds any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Per-kind record counts, in fetch order.
    #[must_use]
    pub fn counts(&self) -> Vec<(EntityKind, usize)> {
        self.0.iter().map(|(kind, records)| (*kind, records.len())).collect()
    }

    /// Consumes the bundle, returning its collections.
    #[must_use]
    pub fn into_collections(self) -> BTreeMap<EntityKind, Vec<EntityRecord>> {
        self.0
    }

    /// Serialises the bundle as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
