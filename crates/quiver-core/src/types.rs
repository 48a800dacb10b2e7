use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a catalog item (workflow or skill).
pub type ItemId = Uuid;

/// Unique identifier for a user account.
pub type UserId = Uuid;

/// The two kinds of searchable catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Workflow,
    Skill,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Workflow => "workflow",
            ItemKind::Skill => "skill",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who can see a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Where a search result originates: a system-curated item or a
/// user-owned one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    System,
    User,
}

/// The identity a search call runs under. Supplied per call by the
/// hosting application; the engine never validates tokens itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdentity {
    Anonymous,
    User(UserId),
}

impl CallerIdentity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, CallerIdentity::Anonymous)
    }

    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            CallerIdentity::Anonymous => None,
            CallerIdentity::User(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for CallerIdentity {
    fn from(id: Option<UserId>) -> Self {
        match id {
            Some(id) => CallerIdentity::User(id),
            None => CallerIdentity::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_identity_from_option() {
        let id = Uuid::new_v4();
        assert_eq!(CallerIdentity::from(Some(id)), CallerIdentity::User(id));
        assert_eq!(CallerIdentity::from(None), CallerIdentity::Anonymous);
        assert!(CallerIdentity::Anonymous.is_anonymous());
        assert_eq!(CallerIdentity::User(id).user_id(), Some(id));
    }

    #[test]
    fn item_kind_serde() {
        assert_eq!(serde_json::to_string(&ItemKind::Workflow).unwrap(), "\"workflow\"");
        assert_eq!(serde_json::to_string(&ItemKind::Skill).unwrap(), "\"skill\"");
    }
}
