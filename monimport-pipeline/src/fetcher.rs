//! Per-tag entity retrieval.

use crate::error::ImportResult;
use crate::source::{RemoteSource, SessionToken};
use monimport_types::{EntityKind, EntityRecord, Tag};
use tracing::info;

/// Fetches the records of one kind under a tag.
///
/// Errors are not handled here; they end the run.
pub async fn fetch_kind<S>(
    source: &S,
    session: &SessionToken,
    tag: &Tag,
    kind: EntityKind,
) -> ImportResult<Vec<EntityRecord>>
where
    S: RemoteSource + ?Sized,
{
    let records = source.list_entities(session, kind, tag).await?;
    info!("Got {} {} for tag '{}'", records.len(), kind, tag);
    Ok(records)
}

/// Fetches every kind under a tag, one call at a time, in fetch order.
pub async fn fetch_all<S>(
    source: &S,
    session: &SessionToken,
    tag: &Tag,
) -> ImportResult<Vec<(EntityKind, Vec<EntityRecord>)>>
where
    S: RemoteSource + ?Sized,
{
    let mut batches = Vec::with_capacity(EntityKind::FETCH_ORDER.len());
    for kind in EntityKind::FETCH_ORDER {
        batches.push((kind, fetch_kind(source, session, tag, kind).await?));
    }
    Ok(batches)
}
