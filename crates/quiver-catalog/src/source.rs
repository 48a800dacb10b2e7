use async_trait::async_trait;
use std::collections::HashMap;

use quiver_core::{ItemId, ItemKind, Result, UserId};

use crate::item::CatalogItem;

/// Read contract the search engine consumes. Implementations return
/// *scoped* rows (by kind, ownership, or reference) without applying
/// authorization policy — the candidate set builder owns every
/// visibility and liveness predicate, so the policy cannot diverge
/// between storage backends.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All system-curated items of the given kind.
    async fn system_items(&self, kind: ItemKind) -> Result<Vec<CatalogItem>>;

    /// All items of the given kind owned by `owner`.
    async fn items_owned_by(&self, kind: ItemKind, owner: UserId) -> Result<Vec<CatalogItem>>;

    /// System items of the given kind that `user` has referenced into
    /// their personal library.
    async fn referenced_system_items(
        &self,
        kind: ItemKind,
        user: UserId,
    ) -> Result<Vec<CatalogItem>>;

    /// Stored embedding vectors for the given items. Items with no
    /// stored vector are simply absent from the map.
    async fn embeddings_for(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Vec<f32>>>;
}
