//! Folding service templates into services.

use monimport_types::{Bundle, EntityKind, EntityRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Appends every service template after the services and drops the
/// template collection.
///
/// Templates and services are never deduplicated against each other.
#[must_use]
pub fn merge(mut collections: BTreeMap<EntityKind, Vec<EntityRecord>>) -> Bundle {
    let templates = collections
        .remove(&EntityKind::ServiceTemplates)
        .unwrap_or_default();
    debug!("Merging {} service templates into services", templates.len());

    collections
        .entry(EntityKind::Services)
        .or_default()
        .extend(templates);

    Bundle::from_collections(collections)
}
