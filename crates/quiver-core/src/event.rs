use serde::{Deserialize, Serialize};

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::types::ItemKind;

/// Observability events emitted by the search engine. Failure visibility
/// is a subscriber concern — the engine publishes and moves on, it never
/// writes to stdout or a log file itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchEvent {
    /// The embedding provider could not produce a query vector
    /// (missing credential, call failed, timeout, malformed response).
    EmbeddingUnavailable { item_kind: ItemKind, reason: String },

    /// The vector path was abandoned and the lexical matcher answered
    /// the request instead.
    LexicalFallback { item_kind: ItemKind, reason: String },

    /// The candidate or embedding query against the catalog failed.
    CandidateQueryFailed { item_kind: ItemKind, error: String },

    /// Both the vector and lexical paths failed; the caller received an
    /// explicit empty-with-error response.
    SearchFailed { item_kind: ItemKind, error: String },
}

/// A broadcast-based event bus for search observability.
#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<SearchEvent>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn publish(&self, event: SearchEvent) {
        // Ignore send errors (no subscribers).
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_subscribe() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.publish(SearchEvent::LexicalFallback {
            item_kind: ItemKind::Workflow,
            reason: "provider offline".into(),
        });
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SearchEvent::LexicalFallback { .. }));
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = EventBus::default();
        bus.publish(SearchEvent::SearchFailed {
            item_kind: ItemKind::Skill,
            error: "db locked".into(),
        });
    }
}
