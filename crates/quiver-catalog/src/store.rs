use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use quiver_core::{ItemId, ItemKind, QuiverError, Result, UserId, Visibility};

use crate::item::CatalogItem;
use crate::source::CatalogSource;

// Qualified so queries joining item_references stay unambiguous.
const ITEM_COLUMNS: &str = "items.id, items.kind, items.name, items.description, \
     items.content, items.owner_id, items.is_system, items.is_active, items.visibility, \
     items.tags, items.part_count, items.deleted_at, items.created_at, items.updated_at";

/// SQLite-backed catalog store: items, per-user references, and the
/// keyed embedding store written by the background embedding job.
pub struct CatalogStore {
    db: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Open or create the catalog database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        info!(?path, "opening catalog store");

        let conn = Connection::open(path).map_err(|e| QuiverError::Catalog(e.to_string()))?;

        // Enable WAL mode for concurrent reads
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                content TEXT NOT NULL DEFAULT '',
                owner_id TEXT,
                is_system INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                visibility TEXT NOT NULL DEFAULT 'private',
                tags TEXT NOT NULL DEFAULT '[]',
                part_count INTEGER NOT NULL DEFAULT 0,
                deleted_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS item_references (
                user_id TEXT NOT NULL,
                item_id TEXT NOT NULL REFERENCES items(id),
                created_at TEXT NOT NULL,
                PRIMARY KEY (user_id, item_id)
            );

            CREATE TABLE IF NOT EXISTS embeddings (
                item_id TEXT PRIMARY KEY REFERENCES items(id),
                model TEXT NOT NULL,
                dims INTEGER NOT NULL,
                vector BLOB NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_kind ON items(kind);
            CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner_id);
            CREATE INDEX IF NOT EXISTS idx_references_user ON item_references(user_id);
            ",
        )
        .map_err(|e| QuiverError::Catalog(e.to_string()))?;

        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::open(Path::new(":memory:"))
    }

    /// Insert or update an item (upsert by id).
    pub fn upsert_item(&self, item: &CatalogItem) -> Result<()> {
        let db = self.db.lock();
        let tags = serde_json::to_string(&item.tags)?;
        db.execute(
            "INSERT INTO items (id, kind, name, description, content, owner_id, is_system,
                                is_active, visibility, tags, part_count, deleted_at,
                                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                content = excluded.content,
                is_active = excluded.is_active,
                visibility = excluded.visibility,
                tags = excluded.tags,
                part_count = excluded.part_count,
                deleted_at = excluded.deleted_at,
                updated_at = excluded.updated_at",
            rusqlite::params![
                item.id.to_string(),
                item.kind.as_str(),
                item.name,
                item.description,
                item.content,
                item.owner_id.map(|o| o.to_string()),
                item.is_system as i32,
                item.is_active as i32,
                visibility_str(item.visibility),
                tags,
                item.part_count as i64,
                item.deleted_at.map(|t| t.to_rfc3339()),
                item.created_at.to_rfc3339(),
                item.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(())
    }

    /// Load a single item by id.
    pub fn get_item(&self, id: ItemId) -> Result<Option<CatalogItem>> {
        let rows = self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
            rusqlite::params![id.to_string()],
        )?;
        Ok(rows.into_iter().next())
    }

    /// Toggle an item's active flag. Returns false if the item is unknown.
    pub fn set_active(&self, id: ItemId, active: bool) -> Result<bool> {
        let db = self.db.lock();
        let rows = db
            .execute(
                "UPDATE items SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
                rusqlite::params![id.to_string(), active as i32, Utc::now().to_rfc3339()],
            )
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Soft-delete an item by stamping `deleted_at`. The row stays in the
    /// table; the candidate builder filters it out.
    pub fn soft_delete(&self, id: ItemId) -> Result<bool> {
        let db = self.db.lock();
        let now = Utc::now().to_rfc3339();
        let rows = db
            .execute(
                "UPDATE items SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                rusqlite::params![id.to_string(), now],
            )
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Record that `user` has adopted `item` into their personal library.
    pub fn add_reference(&self, user: UserId, item: ItemId) -> Result<()> {
        let db = self.db.lock();
        db.execute(
            "INSERT OR IGNORE INTO item_references (user_id, item_id, created_at)
             VALUES (?1, ?2, ?3)",
            rusqlite::params![user.to_string(), item.to_string(), Utc::now().to_rfc3339()],
        )
        .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(())
    }

    /// Remove a reference. Returns false if none existed.
    pub fn remove_reference(&self, user: UserId, item: ItemId) -> Result<bool> {
        let db = self.db.lock();
        let rows = db
            .execute(
                "DELETE FROM item_references WHERE user_id = ?1 AND item_id = ?2",
                rusqlite::params![user.to_string(), item.to_string()],
            )
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Store or overwrite an item's embedding vector. This is the keyed
    /// append/overwrite hook the external embedding job writes through.
    pub fn put_embedding(&self, id: ItemId, model: &str, vector: &[f32]) -> Result<()> {
        let db = self.db.lock();
        let blob = encode_vector(vector);
        db.execute(
            "INSERT INTO embeddings (item_id, model, dims, vector, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(item_id) DO UPDATE SET
                model = excluded.model,
                dims = excluded.dims,
                vector = excluded.vector,
                updated_at = excluded.updated_at",
            rusqlite::params![
                id.to_string(),
                model,
                vector.len() as i64,
                blob,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        Ok(())
    }

    /// Load a single stored embedding, if present and well-formed.
    pub fn get_embedding(&self, id: ItemId) -> Result<Option<Vec<f32>>> {
        let db = self.db.lock();
        let mut stmt = db
            .prepare("SELECT vector FROM embeddings WHERE item_id = ?1")
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        let blob: Option<Vec<u8>> = stmt
            .query_row(rusqlite::params![id.to_string()], |row| row.get(0))
            .ok();
        Ok(blob.and_then(|b| decode_vector(&b)))
    }

    fn query_items(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<CatalogItem>> {
        let db = self.db.lock();
        let mut stmt = db
            .prepare(sql)
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;
        let items = stmt
            .query_map(params, |row| {
                Ok(RawItemRow {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    content: row.get(4)?,
                    owner_id: row.get(5)?,
                    is_system: row.get::<_, i32>(6)? != 0,
                    is_active: row.get::<_, i32>(7)? != 0,
                    visibility: row.get(8)?,
                    tags: row.get(9)?,
                    part_count: row.get::<_, i64>(10)?,
                    deleted_at: row.get(11)?,
                    created_at: row.get(12)?,
                    updated_at: row.get(13)?,
                })
            })
            .map_err(|e| QuiverError::Catalog(e.to_string()))?
            .filter_map(|r| r.ok())
            .filter_map(RawItemRow::into_item)
            .collect();
        Ok(items)
    }
}

#[async_trait]
impl CatalogSource for CatalogStore {
    async fn system_items(&self, kind: ItemKind) -> Result<Vec<CatalogItem>> {
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE kind = ?1 AND is_system = 1"),
            rusqlite::params![kind.as_str()],
        )
    }

    async fn items_owned_by(&self, kind: ItemKind, owner: UserId) -> Result<Vec<CatalogItem>> {
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE kind = ?1 AND owner_id = ?2"),
            rusqlite::params![kind.as_str(), owner.to_string()],
        )
    }

    async fn referenced_system_items(
        &self,
        kind: ItemKind,
        user: UserId,
    ) -> Result<Vec<CatalogItem>> {
        self.query_items(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 JOIN item_references r ON r.item_id = items.id
                 WHERE items.kind = ?1 AND items.is_system = 1 AND r.user_id = ?2"
            ),
            rusqlite::params![kind.as_str(), user.to_string()],
        )
    }

    async fn embeddings_for(&self, ids: &[ItemId]) -> Result<HashMap<ItemId, Vec<f32>>> {
        let db = self.db.lock();
        let mut stmt = db
            .prepare("SELECT vector FROM embeddings WHERE item_id = ?1")
            .map_err(|e| QuiverError::Catalog(e.to_string()))?;

        let mut map = HashMap::with_capacity(ids.len());
        for id in ids {
            let blob: Option<Vec<u8>> = stmt
                .query_row(rusqlite::params![id.to_string()], |row| row.get(0))
                .ok();
            if let Some(vector) = blob.and_then(|b| decode_vector(&b)) {
                map.insert(*id, vector);
            }
        }
        Ok(map)
    }
}

/// A raw item row as read from SQLite, before type conversion.
struct RawItemRow {
    id: String,
    kind: String,
    name: String,
    description: Option<String>,
    content: String,
    owner_id: Option<String>,
    is_system: bool,
    is_active: bool,
    visibility: String,
    tags: String,
    part_count: i64,
    deleted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl RawItemRow {
    /// Convert to a typed item; rows with unparseable ids, kinds, or
    /// timestamps are dropped rather than failing the whole query.
    fn into_item(self) -> Option<CatalogItem> {
        let kind = match self.kind.as_str() {
            "workflow" => ItemKind::Workflow,
            "skill" => ItemKind::Skill,
            _ => return None,
        };
        let visibility = match self.visibility.as_str() {
            "public" => Visibility::Public,
            _ => Visibility::Private,
        };
        Some(CatalogItem {
            id: Uuid::parse_str(&self.id).ok()?,
            kind,
            name: self.name,
            description: self.description,
            content: self.content,
            owner_id: self
                .owner_id
                .as_deref()
                .and_then(|o| Uuid::parse_str(o).ok()),
            is_system: self.is_system,
            is_active: self.is_active,
            visibility,
            tags: serde_json::from_str(&self.tags).unwrap_or_default(),
            part_count: self.part_count.max(0) as u32,
            deleted_at: self.deleted_at.as_deref().and_then(parse_timestamp),
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn visibility_str(v: Visibility) -> &'static str {
    match v {
        Visibility::Public => "public",
        Visibility::Private => "private",
    }
}

/// Serialize an embedding as little-endian f32 bytes.
fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize an embedding from LE f32 bytes. Returns None for blobs
/// whose length is not a multiple of 4.
fn decode_vector(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }
    Some(
        blob.chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_roundtrip() {
        let vector = vec![0.25f32, -1.5, 3.75];
        let blob = encode_vector(&vector);
        assert_eq!(blob.len(), 12);
        assert_eq!(decode_vector(&blob).unwrap(), vector);
    }

    #[test]
    fn truncated_blob_is_rejected() {
        assert!(decode_vector(&[1, 2, 3]).is_none());
        assert_eq!(decode_vector(&[]).unwrap(), Vec::<f32>::new());
    }
}
