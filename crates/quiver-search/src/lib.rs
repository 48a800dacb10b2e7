//! # quiver-search
//!
//! The semantic retrieval engine behind "find the workflow/skill
//! relevant to this task". One entry point per item kind embeds the
//! query, ranks an authorization-scoped candidate set by cosine
//! similarity, and degrades to lexical substring matching whenever the
//! embedding path is unavailable — a search call never fails outright.
//!
//! Scores are comparable only within a single ranking call, never
//! across calls or across item kinds.

pub mod candidates;
pub mod engine;
pub mod lexical;
pub mod result;
pub mod score;

pub use candidates::{Candidate, CandidateSetBuilder};
pub use engine::SearchEngine;
pub use lexical::{lexical_search, FALLBACK_SCORE};
pub use result::{ResultDetail, SearchMode, SearchResponse, SearchResult};
pub use score::cosine_similarity;
