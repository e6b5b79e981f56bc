use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{DiaryDoc, SharedStore};
use crate::util::today_utc;

/// Delimiter inserted between same-day entry texts.
pub const ENTRY_SEPARATOR: &str = "\n\n---\n\n";

/// Create-or-append, list, and delete for diary entries.
#[derive(Clone)]
pub struct DiaryService {
    store: SharedStore,
}

impl DiaryService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Write an entry for `date`, defaulting to today (UTC).
    ///
    /// A second write for the same date appends to the existing entry
    /// instead of creating a new one; the entry id never changes. The store
    /// lock is held across the lookup and the write, so one document per
    /// date survives concurrent calls.
    pub async fn create_or_append(
        &self,
        date: Option<String>,
        text: String,
    ) -> Result<DiaryDoc, StoreError> {
        let date = date.filter(|d| !d.is_empty()).unwrap_or_else(today_utc);

        let store = self.store.lock().await;
        if let Some(mut existing) = store.find_diary_by_date(&date).await? {
            existing.text = format!("{}{}{}", existing.text, ENTRY_SEPARATOR, text);
            store.save_diary(&existing).await?;
            return Ok(existing);
        }

        let doc = DiaryDoc::new(date, text);
        store.save_diary(&doc).await?;
        Ok(doc)
    }

    /// Entries ordered by date string descending, truncated to `limit`.
    ///
    /// Ordering is lexicographic; it matches calendar order for ISO
    /// `YYYY-MM-DD` strings only, and nothing upstream enforces the format.
    pub async fn list(&self, limit: usize) -> Result<Vec<DiaryDoc>, StoreError> {
        self.store.lock().await.list_diary(limit).await
    }

    /// Delete an entry by id. Returns false when no entry matched.
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.store.lock().await.delete_diary(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileDocumentStore;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn service(tmp: &tempfile::TempDir) -> DiaryService {
        let store = FileDocumentStore::open(tmp.path(), "testdb").unwrap();
        DiaryService::new(Arc::new(Mutex::new(Box::new(store))))
    }

    #[tokio::test]
    async fn test_first_write_stores_text_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let doc = svc
            .create_or_append(Some("2025-03-01".to_string()), "slept badly".to_string())
            .await
            .unwrap();
        assert_eq!(doc.date, "2025-03-01");
        assert_eq!(doc.text, "slept badly");
    }

    #[tokio::test]
    async fn test_same_date_appends_with_separator() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let first = svc
            .create_or_append(Some("2025-03-01".to_string()), "morning walk".to_string())
            .await
            .unwrap();
        let second = svc
            .create_or_append(Some("2025-03-01".to_string()), "evening tea".to_string())
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.text, "morning walk\n\n---\n\nevening tea");
        assert_eq!(svc.list(50).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_date_defaults_to_today_utc() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let doc = svc.create_or_append(None, "no date given".to_string()).await.unwrap();
        assert_eq!(doc.date, today_utc());

        // An empty date string behaves like a missing one.
        let doc = svc
            .create_or_append(Some(String::new()), "also today".to_string())
            .await
            .unwrap();
        assert_eq!(doc.date, today_utc());
    }

    #[tokio::test]
    async fn test_list_orders_and_limits() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        for date in ["2025-01-05", "2025-02-01", "2025-01-20"] {
            svc.create_or_append(Some(date.to_string()), "entry".to_string())
                .await
                .unwrap();
        }

        let two = svc.list(2).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].date, "2025-02-01");
        assert_eq!(two[1].date, "2025-01-20");
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let doc = svc
            .create_or_append(Some("2025-03-01".to_string()), "entry".to_string())
            .await
            .unwrap();

        assert!(svc.delete(doc.id).await.unwrap());
        assert!(svc.list(50).await.unwrap().is_empty());
        assert!(!svc.delete(doc.id).await.unwrap());
    }

    // Two concurrent writes for one fresh date serialize on the store lock:
    // the result is always one of the two single-writer outcomes (one create,
    // one append, in either order), never a second document for the date.
    #[tokio::test]
    async fn test_concurrent_same_date_writes_yield_single_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = service(&tmp);

        let a = svc.create_or_append(Some("2025-03-01".to_string()), "A".to_string());
        let b = svc.create_or_append(Some("2025-03-01".to_string()), "B".to_string());
        let (a, b) = tokio::join!(a, b);
        a.unwrap();
        b.unwrap();

        let entries = svc.list(50).await.unwrap();
        assert_eq!(entries.len(), 1);
        let text = &entries[0].text;
        assert!(
            text == "A\n\n---\n\nB" || text == "B\n\n---\n\nA",
            "unexpected merged text: {text:?}"
        );
    }
}
