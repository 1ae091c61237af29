//! Expansion of configured root tags into the tags actually queried.

use crate::error::ImportResult;
use crate::source::{RemoteSource, SessionToken};
use monimport_types::Tag;
use tracing::{debug, info};

/// Replaces every root tag that has children with those children.
///
/// Expansion is one level deep. Output keeps root order, then child order;
/// duplicates across roots are kept. An empty root list resolves to nothing
/// without any remote call.
pub async fn resolve_tags<S>(
    source: &S,
    session: &SessionToken,
    roots: &[Tag],
) -> ImportResult<Vec<Tag>>
where
    S: RemoteSource + ?Sized,
{
    let mut resolved = Vec::with_capacity(roots.len());

    for root in roots {
        let children = source.child_tags(session, root).await?;
        if children.is_empty() {
            debug!("Tag '{}' has no children", root);
            resolved.push(root.clone());
        } else {
            debug!("Tag '{}' expands to {:?}", root, children);
            resolved.extend(children);
        }
    }

    info!("Resolved tags: {:?}", resolved);
    Ok(resolved)
}
