use quiver_core::{CallerIdentity, ItemKind, Result};

use crate::candidates::CandidateSetBuilder;
use crate::result::SearchResult;

/// Score assigned to every lexical match. A fixed constant signals
/// "non-ranked match" to consumers instead of claiming false precision.
pub const FALLBACK_SCORE: f32 = 0.5;

/// Substring search over the same authorization-filtered universe the
/// vector path uses. Matches case-insensitively against name,
/// description, and content; returns at most `limit` results.
pub async fn lexical_search(
    builder: &CandidateSetBuilder,
    kind: ItemKind,
    caller: CallerIdentity,
    query: &str,
    limit: usize,
) -> Result<Vec<SearchResult>> {
    let needle = query.trim().to_lowercase();
    let items = builder.eligible_items(kind, caller).await?;

    Ok(items
        .iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
                || item.content.to_lowercase().contains(&needle)
        })
        .take(limit)
        .map(|item| SearchResult::from_item(item, FALLBACK_SCORE))
        .collect())
}
