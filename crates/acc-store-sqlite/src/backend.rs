//! SQLite entry store implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use acc_config::{StoreConfig, IN_MEMORY};
use acc_protocols::{
    normalize_source_url, normalize_tags, normalize_title, EntryStore, ExcerptId, NewExcerpt,
    SavedExcerpt, StoreError,
};

use crate::schema::init_schema;

#[path = "backend_rows.rs"]
mod backend_rows;
use backend_rows::{load_excerpts, ExcerptRow};

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;

/// SQLite-based entry store.
pub struct SqliteEntryStore {
    conn: Connection,
}

impl SqliteEntryStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn).await
    }

    /// Create a new file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::StorageError(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(&path)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        info!("Opened excerpt store at {}", path.display());
        Self::with_connection(conn).await
    }

    /// Open the store described by `[store]` in the config.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        if config.path == IN_MEMORY {
            return Self::in_memory().await;
        }
        let path = config
            .resolved_path()
            .ok_or_else(|| StoreError::StorageError("store path is empty".to_string()))?;
        Self::open(path).await
    }

    async fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(Self { conn })
    }

    async fn load(
        &self,
        filter: Option<ExcerptId>,
    ) -> Result<Vec<SavedExcerpt>, StoreError> {
        let rows: Vec<ExcerptRow> = self
            .conn
            .call(move |conn| Ok(load_excerpts(conn, filter.as_deref())?))
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        rows.into_iter().map(ExcerptRow::into_excerpt).collect()
    }
}

fn timestamp(at: chrono::DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    fn id(&self) -> &str {
        "sqlite"
    }

    async fn create(&self, entry: NewExcerpt) -> Result<ExcerptId, StoreError> {
        if entry.content.trim().is_empty() {
            return Err(StoreError::InvalidRecord("content is empty".to_string()));
        }
        let source_url = normalize_source_url(&entry.source_url)?;
        let tags = normalize_tags(entry.tags);
        let title = normalize_title(entry.title.as_deref());
        let created = timestamp(entry.created_at.unwrap_or_else(Utc::now));
        let now = timestamp(Utc::now());
        let kind = entry.anchor.kind().as_str();
        let value = entry.anchor.value();
        let content = entry.content;

        let id = uuid::Uuid::new_v4().to_string();
        let id_clone = id.clone();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                tx.execute(
                    "INSERT INTO excerpts (id, content, created_at, source_url, anchor_kind, anchor_value)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![id_clone, content, created, source_url, kind, value],
                )?;

                for (position, tag) in tags.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO excerpt_tags (excerpt_id, tag, position) VALUES (?1, ?2, ?3)",
                        params![id_clone, tag, position as i64],
                    )?;
                }

                if let Some(title) = title {
                    tx.execute(
                        "INSERT INTO excerpt_titles (excerpt_id, title, updated_at) VALUES (?1, ?2, ?3)",
                        params![id_clone, title, now],
                    )?;
                }

                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        debug!(id = %id, kind, "Excerpt created");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<SavedExcerpt>, StoreError> {
        Ok(self.load(Some(id.to_string())).await?.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<SavedExcerpt>, StoreError> {
        self.load(None).await
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SavedExcerpt>, StoreError> {
        let all = self.load(None).await?;
        Ok(all
            .into_iter()
            .filter(|excerpt| excerpt.matches_keyword(keyword))
            .collect())
    }

    async fn delete_one(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM excerpts WHERE id = ?1", [&id])?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))
    }

    async fn delete_many(&self, ids: &[ExcerptId]) -> Result<(), StoreError> {
        let ids = ids.to_vec();
        let count = ids.len();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                for id in &ids {
                    tx.execute("DELETE FROM excerpts WHERE id = ?1", [id])?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        debug!(count, "Excerpts deleted");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.conn
            .call(|conn| {
                conn.execute("DELETE FROM excerpts", [])?;
                Ok(())
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        info!("Excerpt store cleared");
        Ok(())
    }

    async fn set_title(&self, id: &str, title: Option<&str>) -> Result<(), StoreError> {
        let id = id.to_string();
        let title = normalize_title(title);
        let now = timestamp(Utc::now());

        let id_clone = id.clone();
        let exists = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let exists = tx
                    .query_row("SELECT 1 FROM excerpts WHERE id = ?1", [&id_clone], |_| Ok(()))
                    .optional()?
                    .is_some();
                if exists {
                    match title {
                        Some(title) => {
                            tx.execute(
                                "INSERT INTO excerpt_titles (excerpt_id, title, updated_at)
                                 VALUES (?1, ?2, ?3)
                                 ON CONFLICT(excerpt_id) DO UPDATE
                                 SET title = excluded.title, updated_at = excluded.updated_at",
                                params![id_clone, title, now],
                            )?;
                        }
                        None => {
                            tx.execute(
                                "DELETE FROM excerpt_titles WHERE excerpt_id = ?1",
                                [&id_clone],
                            )?;
                        }
                    }
                }
                tx.commit()?;
                Ok(exists)
            })
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        if !exists {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}
