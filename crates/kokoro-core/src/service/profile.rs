use chrono::Utc;
use serde::Deserialize;

use crate::error::StoreError;
use crate::store::{ProfileDoc, SharedStore};
use crate::types::UserProfile;

/// Partial profile update. Missing or empty fields preserve stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub nickname: Option<String>,
    pub age: Option<String>,
    pub occupation: Option<String>,
    pub medical_conditions: Option<String>,
}

/// Get-or-create and merge-update for the singleton profile.
#[derive(Clone)]
pub struct ProfileService {
    store: SharedStore,
}

impl ProfileService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Look up the profile, inserting the default document if absent.
    pub async fn get_or_create(&self) -> Result<ProfileDoc, StoreError> {
        let store = self.store.lock().await;
        if let Some(doc) = store.load_profile().await? {
            return Ok(doc);
        }
        let doc = ProfileDoc::with_defaults();
        store.save_profile(&doc).await?;
        Ok(doc)
    }

    /// Public wire shape of the (possibly just created) profile.
    pub async fn read(&self) -> Result<UserProfile, StoreError> {
        Ok(self.get_or_create().await?.to_profile())
    }

    /// Merge non-empty incoming fields over the stored document.
    ///
    /// `updated_at` is refreshed on every call, even when no field changed.
    pub async fn update(&self, incoming: ProfileUpdate) -> Result<UserProfile, StoreError> {
        let store = self.store.lock().await;
        let mut doc = match store.load_profile().await? {
            Some(doc) => doc,
            None => ProfileDoc::with_defaults(),
        };

        merge_field(&mut doc.nickname, incoming.nickname);
        merge_field(&mut doc.age, incoming.age);
        merge_field(&mut doc.occupation, incoming.occupation);
        merge_field(&mut doc.medical_conditions, incoming.medical_conditions);
        doc.updated_at = Utc::now();

        store.save_profile(&doc).await?;
        Ok(doc.to_profile())
    }
}

fn merge_field(current: &mut String, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *current = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileDocumentStore;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn service(tmp: &tempfile::TempDir) -> ProfileService {
        let store = FileDocumentStore::open(tmp.path(), "testdb").unwrap();
        ProfileService::new(Arc::new(Mutex::new(Box::new(store))))
    }

    #[tokio::test]
    async fn test_read_creates_default_profile() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let profile = svc.read().await.unwrap();
        assert_eq!(profile, UserProfile::default());

        // The document now exists and is returned on subsequent reads.
        let doc = svc.get_or_create().await.unwrap();
        assert_eq!(doc.age, "select");
    }

    #[tokio::test]
    async fn test_update_keeps_falsy_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let updated = svc
            .update(ProfileUpdate {
                nickname: Some("Aki".to_string()),
                age: Some(String::new()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.nickname, "Aki");
        assert_eq!(updated.age, "select");
        assert_eq!(updated.medical_conditions, "None");

        let updated = svc
            .update(ProfileUpdate {
                age: Some("30s".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.nickname, "Aki");
        assert_eq!(updated.age, "30s");
    }

    #[tokio::test]
    async fn test_update_always_touches_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let before = svc.get_or_create().await.unwrap().updated_at;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let profile = svc.update(ProfileUpdate::default()).await.unwrap();
        assert_eq!(profile, UserProfile::default());

        let after = svc.get_or_create().await.unwrap().updated_at;
        assert!(after > before);
    }
}
