use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use quiver_catalog::{CatalogItem, CatalogSource};
use quiver_core::{CallerIdentity, ItemId, ItemKind, Result, Visibility};

/// An eligible item joined with its stored embedding, if one exists.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: CatalogItem,
    pub embedding: Option<Vec<f32>>,
}

/// Builds the authorization-filtered universe of items one caller may
/// search over. Every visibility and liveness predicate lives here —
/// the vector path and the lexical fallback share this code verbatim,
/// so the fallback can never be more permissive than the ranked path.
pub struct CandidateSetBuilder {
    source: Arc<dyn CatalogSource>,
}

impl CandidateSetBuilder {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// The items `caller` is allowed to search, deduplicated by id.
    ///
    /// Anonymous callers see live, public system items only. An
    /// authenticated caller sees the union of their own items (any
    /// visibility), live public system items, and system items they
    /// have referenced into their library (any visibility). The same
    /// visibility rule applies to workflows and skills alike.
    pub async fn eligible_items(
        &self,
        kind: ItemKind,
        caller: CallerIdentity,
    ) -> Result<Vec<CatalogItem>> {
        let Some(user) = caller.user_id() else {
            let items = self.source.system_items(kind).await?;
            let eligible: Vec<CatalogItem> = items
                .into_iter()
                .filter(|i| i.is_live() && i.visibility == Visibility::Public)
                .collect();
            debug!(%kind, count = eligible.len(), "anonymous candidate set");
            return Ok(eligible);
        };

        let mut seen: HashSet<ItemId> = HashSet::new();
        let mut eligible: Vec<CatalogItem> = Vec::new();

        for item in self.source.items_owned_by(kind, user).await? {
            if item.is_live() && seen.insert(item.id) {
                eligible.push(item);
            }
        }
        for item in self.source.system_items(kind).await? {
            if item.is_live() && item.visibility == Visibility::Public && seen.insert(item.id) {
                eligible.push(item);
            }
        }
        for item in self.source.referenced_system_items(kind, user).await? {
            if item.is_live() && seen.insert(item.id) {
                eligible.push(item);
            }
        }

        debug!(%kind, %user, count = eligible.len(), "candidate set");
        Ok(eligible)
    }

    /// Eligible items joined with their stored embeddings. Items whose
    /// embedding has not been computed yet carry `None`.
    pub async fn candidates(
        &self,
        kind: ItemKind,
        caller: CallerIdentity,
    ) -> Result<Vec<Candidate>> {
        let items = self.eligible_items(kind, caller).await?;
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        let mut embeddings = self.source.embeddings_for(&ids).await?;

        Ok(items
            .into_iter()
            .map(|item| {
                let embedding = embeddings.remove(&item.id);
                Candidate { item, embedding }
            })
            .collect())
    }
}
