//! Entry store protocol definitions.
//!
//! The store owns persisted excerpts. The anchoring core depends only on the
//! descriptor carried by each record, never on how the store keeps it.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{ExcerptId, NewExcerpt, SavedExcerpt};

/// Core trait for excerpt stores.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Persist a new excerpt and return its assigned ID.
    async fn create(&self, entry: NewExcerpt) -> Result<ExcerptId, StoreError>;

    /// Fetch one excerpt.
    async fn get(&self, id: &str) -> Result<Option<SavedExcerpt>, StoreError>;

    /// All excerpts, newest first.
    async fn list_all(&self) -> Result<Vec<SavedExcerpt>, StoreError>;

    /// Excerpts whose content, tags or title contain `keyword`
    /// (case-insensitive), newest first. An empty keyword lists everything.
    async fn search(&self, keyword: &str) -> Result<Vec<SavedExcerpt>, StoreError>;

    /// Delete one excerpt. Deleting a missing ID is not an error.
    async fn delete_one(&self, id: &str) -> Result<(), StoreError>;

    /// Delete several excerpts atomically.
    async fn delete_many(&self, ids: &[ExcerptId]) -> Result<(), StoreError>;

    /// Remove every excerpt.
    async fn clear_all(&self) -> Result<(), StoreError>;

    /// Set or reset (blank / `None`) the user title of an excerpt.
    async fn set_title(&self, id: &str, title: Option<&str>) -> Result<(), StoreError>;
}
