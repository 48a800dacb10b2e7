use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, warn};

use quiver_catalog::CatalogSource;
use quiver_config::SearchConfig;
use quiver_core::{CallerIdentity, EventBus, ItemKind, Result, SearchEvent};
use quiver_embeddings::EmbeddingGateway;

use crate::candidates::CandidateSetBuilder;
use crate::lexical::lexical_search;
use crate::result::{SearchResponse, SearchResult};
use crate::score::cosine_similarity;

/// The semantic search orchestrator.
///
/// Each call embeds the query, ranks the caller's candidate set by
/// cosine similarity, and truncates to the limit. Any failure along the
/// vector path — provider, candidate query, embedding store — degrades
/// one level to the lexical matcher; only when the lexical path itself
/// fails does the caller receive an explicit empty-with-error response.
/// No error type ever crosses this boundary.
pub struct SearchEngine {
    gateway: EmbeddingGateway,
    builder: CandidateSetBuilder,
    events: EventBus,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(
        gateway: EmbeddingGateway,
        source: Arc<dyn CatalogSource>,
        events: EventBus,
        config: SearchConfig,
    ) -> Self {
        Self {
            gateway,
            builder: CandidateSetBuilder::new(source),
            events,
            config,
        }
    }

    /// Search workflows. `limit` of None uses the configured default.
    pub async fn search_workflows(
        &self,
        query: &str,
        limit: Option<usize>,
        caller: CallerIdentity,
    ) -> SearchResponse {
        let limit = limit.unwrap_or(self.config.workflow_limit);
        self.search(ItemKind::Workflow, query, limit, caller).await
    }

    /// Search skills. `limit` of None uses the configured default.
    pub async fn search_skills(
        &self,
        query: &str,
        limit: Option<usize>,
        caller: CallerIdentity,
    ) -> SearchResponse {
        let limit = limit.unwrap_or(self.config.skill_limit);
        self.search(ItemKind::Skill, query, limit, caller).await
    }

    async fn search(
        &self,
        kind: ItemKind,
        query: &str,
        limit: usize,
        caller: CallerIdentity,
    ) -> SearchResponse {
        let limit = limit.min(self.config.max_limit);

        if !self.gateway.is_configured() {
            debug!(%kind, "no embedding credential configured, using lexical path");
            return self.lexical(kind, query, limit, caller, "no provider configured").await;
        }

        let Some(query_vector) = self.gateway.embed_query(query).await else {
            self.events.publish(SearchEvent::EmbeddingUnavailable {
                item_kind: kind,
                reason: "provider returned no query vector".into(),
            });
            return self
                .lexical(kind, query, limit, caller, "embedding unavailable")
                .await;
        };

        match self.rank(kind, &query_vector, limit, caller).await {
            Ok(results) => SearchResponse::semantic(results),
            Err(e) => {
                warn!(%kind, error = %e, "vector path failed, falling back to lexical");
                self.events.publish(SearchEvent::CandidateQueryFailed {
                    item_kind: kind,
                    error: e.to_string(),
                });
                self.lexical(kind, query, limit, caller, "candidate query failed")
                    .await
            }
        }
    }

    /// Steps 3-6 of the vector path: candidates, score, sort, truncate.
    async fn rank(
        &self,
        kind: ItemKind,
        query_vector: &[f32],
        limit: usize,
        caller: CallerIdentity,
    ) -> Result<Vec<SearchResult>> {
        let candidates = self.builder.candidates(kind, caller).await?;

        // Candidates without a stored embedding are dropped from
        // ranking, not zero-scored into the output.
        let mut scored: Vec<(f32, SearchResult)> = candidates
            .iter()
            .filter_map(|c| {
                let embedding = c.embedding.as_ref()?;
                let similarity = cosine_similarity(query_vector, embedding);
                Some((similarity, SearchResult::from_item(&c.item, similarity)))
            })
            .collect();

        // Stable sort: ties keep their retrieval order.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(limit);

        Ok(scored.into_iter().map(|(_, result)| result).collect())
    }

    async fn lexical(
        &self,
        kind: ItemKind,
        query: &str,
        limit: usize,
        caller: CallerIdentity,
        reason: &str,
    ) -> SearchResponse {
        self.events.publish(SearchEvent::LexicalFallback {
            item_kind: kind,
            reason: reason.into(),
        });

        match lexical_search(&self.builder, kind, caller, query, limit).await {
            Ok(results) => SearchResponse::lexical(results),
            Err(e) => {
                error!(%kind, error = %e, "lexical path failed, returning empty error response");
                self.events.publish(SearchEvent::SearchFailed {
                    item_kind: kind,
                    error: e.to_string(),
                });
                SearchResponse::failed(e.to_string())
            }
        }
    }
}
