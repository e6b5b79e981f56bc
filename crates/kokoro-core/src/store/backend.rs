use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;

use super::{DiaryDoc, ProfileDoc};

/// Trait for document storage backends.
///
/// Only primitive collection operations live here; get-or-create and
/// append-by-date logic belong to the services above.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the singleton profile document, if present.
    async fn load_profile(&self) -> Result<Option<ProfileDoc>, StoreError>;

    /// Write the singleton profile document (insert or replace).
    async fn save_profile(&self, doc: &ProfileDoc) -> Result<(), StoreError>;

    /// Find the diary entry for an exact date string.
    async fn find_diary_by_date(&self, date: &str) -> Result<Option<DiaryDoc>, StoreError>;

    /// Write a diary entry, replacing any entry with the same id.
    async fn save_diary(&self, doc: &DiaryDoc) -> Result<(), StoreError>;

    /// All diary entries ordered by date string descending, truncated to `limit`.
    async fn list_diary(&self, limit: usize) -> Result<Vec<DiaryDoc>, StoreError>;

    /// Delete an entry by id. Returns false when no entry matched.
    async fn delete_diary(&self, id: Uuid) -> Result<bool, StoreError>;
}
