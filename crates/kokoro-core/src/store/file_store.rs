use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::util::ensure_dir;

use super::backend::DocumentStore;
use super::{DiaryDoc, ProfileDoc};

/// File-based document store: one JSON file per document.
///
/// Layout under the store root:
/// `<root>/<database>/user_profile.json` for the profile singleton,
/// `<root>/<database>/diary/<id>.json` per diary entry.
pub struct FileDocumentStore {
    profile_path: PathBuf,
    diary_dir: PathBuf,
}

impl FileDocumentStore {
    /// Open the database directory, creating it if necessary.
    pub fn open(root: &Path, database: &str) -> Result<Self, StoreError> {
        let db_dir = root.join(database);
        let diary_dir = ensure_dir(&db_dir.join("diary"))?;
        Ok(Self {
            profile_path: db_dir.join("user_profile.json"),
            diary_dir,
        })
    }

    fn diary_path(&self, id: Uuid) -> PathBuf {
        self.diary_dir.join(format!("{}.json", id))
    }

    async fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_doc<T: Serialize>(path: &Path, doc: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Read every diary document in the collection directory.
    async fn read_all_diary(&self) -> Result<Vec<DiaryDoc>, StoreError> {
        let mut docs = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.diary_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(doc) = Self::read_doc::<DiaryDoc>(&path).await? {
                docs.push(doc);
            }
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn load_profile(&self) -> Result<Option<ProfileDoc>, StoreError> {
        Self::read_doc(&self.profile_path).await
    }

    async fn save_profile(&self, doc: &ProfileDoc) -> Result<(), StoreError> {
        Self::write_doc(&self.profile_path, doc).await
    }

    async fn find_diary_by_date(&self, date: &str) -> Result<Option<DiaryDoc>, StoreError> {
        let docs = self.read_all_diary().await?;
        Ok(docs.into_iter().find(|d| d.date == date))
    }

    async fn save_diary(&self, doc: &DiaryDoc) -> Result<(), StoreError> {
        Self::write_doc(&self.diary_path(doc.id), doc).await
    }

    async fn list_diary(&self, limit: usize) -> Result<Vec<DiaryDoc>, StoreError> {
        let mut docs = self.read_all_diary().await?;
        // Date strings compare lexicographically; correct for ISO dates only.
        docs.sort_by(|a, b| b.date.cmp(&a.date));
        docs.truncate(limit);
        Ok(docs)
    }

    async fn delete_diary(&self, id: Uuid) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(self.diary_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
