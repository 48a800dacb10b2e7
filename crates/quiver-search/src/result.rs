use serde::Serialize;

use quiver_catalog::CatalogItem;
use quiver_core::{ItemId, ItemKind, Provenance};

/// One ranked search hit — a flat record ready for direct serialization
/// by tool-call handlers and UI endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Cosine similarity in [0, 1], or [`crate::FALLBACK_SCORE`] for
    /// lexical matches. Comparable only within one response.
    pub similarity: f32,
    pub source: Provenance,
    #[serde(flatten)]
    pub detail: ResultDetail,
}

/// Kind-specific result fields.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResultDetail {
    Workflow { stage_count: u32 },
    Skill { attachment_count: u32 },
}

impl SearchResult {
    pub fn from_item(item: &CatalogItem, similarity: f32) -> Self {
        let detail = match item.kind {
            ItemKind::Workflow => ResultDetail::Workflow {
                stage_count: item.part_count,
            },
            ItemKind::Skill => ResultDetail::Skill {
                attachment_count: item.part_count,
            },
        };
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            tags: item.tags.clone(),
            // Cosine can dip below zero; reported scores never do.
            similarity: similarity.max(0.0),
            source: if item.is_system {
                Provenance::System
            } else {
                Provenance::User
            },
            detail,
        }
    }
}

/// Which path produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Semantic,
    Lexical,
}

/// The engine's answer. `error` is set only when both the vector and
/// lexical paths failed — the explicit "search failed" state, still a
/// returned value rather than a raised error.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn semantic(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            mode: SearchMode::Semantic,
            error: None,
        }
    }

    pub fn lexical(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            mode: SearchMode::Lexical,
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            results: Vec::new(),
            mode: SearchMode::Lexical,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_result_carries_stage_count() {
        let item = CatalogItem::new(ItemKind::Workflow, "release", "").with_part_count(4);
        let result = SearchResult::from_item(&item, 0.9);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stage_count"], 4);
        assert_eq!(json["source"], "user");
    }

    #[test]
    fn skill_result_carries_attachment_count() {
        let item = CatalogItem::new(ItemKind::Skill, "git", "")
            .with_part_count(2)
            .as_system();
        let result = SearchResult::from_item(&item, 0.5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["attachment_count"], 2);
        assert_eq!(json["source"], "system");
    }

    #[test]
    fn negative_similarity_is_clamped_to_zero() {
        let item = CatalogItem::new(ItemKind::Skill, "s", "");
        let result = SearchResult::from_item(&item, -0.4);
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn failed_response_is_empty_with_error() {
        let resp = SearchResponse::failed("catalog unreachable".into());
        assert!(resp.results.is_empty());
        assert_eq!(resp.error.as_deref(), Some("catalog unreachable"));
    }
}
