//! Run-wide accumulation of fetched records.

use crate::policy::AttributeFilter;
use monimport_types::{EntityKind, EntityRecord};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Grows one collection per kind across every resolved tag.
///
/// A record is appended only if no structurally equal record is already
/// present for its kind, so first-seen order is kept and duplicates never
/// move anything. Records with the same name but different fields are both
/// kept.
#[derive(Debug, Clone)]
pub struct Aggregator {
    filter: AttributeFilter,
    collections: BTreeMap<EntityKind, Vec<EntityRecord>>,
}

impl Aggregator {
    /// Creates an aggregator with an empty collection for every kind.
    #[must_use]
    pub fn new(filter: AttributeFilter) -> Self {
        Self {
            filter,
            collections: EntityKind::FETCH_ORDER
                .into_iter()
                .map(|kind| (kind, Vec::new()))
                .collect(),
        }
    }

    /// Strips, then appends the record unless an equal one is present.
    ///
    /// Returns whether the record was appended.
    pub fn insert(&mut self, kind: EntityKind, mut record: EntityRecord) -> bool {
        self.filter.apply(kind, &mut record);

        let collection = self.collections.entry(kind).or_default();
        if collection.contains(&record) {
            return false;
        }

        info!("New {}: {}", kind, record.display_name(kind));
        collection.push(record);
        true
    }

    /// Folds a batch of records for a kind, returning how many were new.
    pub fn accumulate(&mut self, kind: EntityKind, records: Vec<EntityRecord>) -> usize {
        let mut emitted = 0;
        for record in records {
            debug!("{} record: {:?}", kind, record);
            if self.insert(kind, record) {
                emitted += 1;
            }
        }
        emitted
    }

    /// Records collected so far for a kind.
    #[must_use]
    pub fn collection(&self, kind: EntityKind) -> &[EntityRecord] {
        self.collections.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of records collected across all kinds.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }

    /// Consumes the aggregator, returning its collections.
    #[must_use]
    pub fn into_collections(self) -> BTreeMap<EntityKind, Vec<EntityRecord>> {
        self.collections
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(AttributeFilter::default())
    }
}
