use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quiver_core::{ItemKind, UserId, Visibility};

/// A searchable catalog item — one row of the `items` table.
///
/// Workflows and skills share this shape; `part_count` is the stage
/// count for workflows and the bundled attachment count for skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub kind: ItemKind,
    pub name: String,
    pub description: Option<String>,
    /// Free-text body: workflow stage prompts, skill instructions.
    pub content: String,
    /// Owning user; None for items without an owner.
    pub owner_id: Option<UserId>,
    /// System-curated items are maintained by the platform, not a user.
    pub is_system: bool,
    pub is_active: bool,
    pub visibility: Visibility,
    pub tags: Vec<String>,
    /// Workflows: number of stages. Skills: number of attachments.
    pub part_count: u32,
    /// Soft-delete marker; deleted items stay in the table.
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Create a private, active, user-less item with the given body.
    pub fn new(kind: ItemKind, name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            description: None,
            content: content.into(),
            owner_id: None,
            is_system: false,
            is_active: true,
            visibility: Visibility::Private,
            tags: Vec::new(),
            part_count: 0,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner_id = Some(owner);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_part_count(mut self, count: u32) -> Self {
        self.part_count = count;
        self
    }

    /// Mark as a platform-curated system item.
    pub fn as_system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// Active and not soft-deleted.
    pub fn is_live(&self) -> bool {
        self.is_active && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let item = CatalogItem::new(ItemKind::Skill, "git-rebase", "How to rebase safely");
        assert_eq!(item.kind, ItemKind::Skill);
        assert!(!item.is_system);
        assert!(item.is_live());
        assert_eq!(item.visibility, Visibility::Private);
        assert!(item.owner_id.is_none());
    }

    #[test]
    fn is_live_requires_active_and_not_deleted() {
        let mut item = CatalogItem::new(ItemKind::Workflow, "w", "");
        assert!(item.is_live());
        item.is_active = false;
        assert!(!item.is_live());
        item.is_active = true;
        item.deleted_at = Some(Utc::now());
        assert!(!item.is_live());
    }

    #[test]
    fn item_serde_roundtrip() {
        let item = CatalogItem::new(ItemKind::Workflow, "release", "ship it")
            .with_tags(vec!["ci".into(), "release".into()])
            .as_system();
        let json = serde_json::to_string(&item).unwrap();
        let restored: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name, "release");
        assert_eq!(restored.tags.len(), 2);
        assert!(restored.is_system);
    }
}
