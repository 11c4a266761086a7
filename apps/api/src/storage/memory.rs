//! In-process adapters, used by tests and by `STORAGE_BACKEND=memory`.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{BlobStore, MetadataStore, ResumeId, ResumeMetadata, StoreError};

#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<Vec<ResumeMetadata>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn put(&self, record: &ResumeMetadata) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::failure(
                "metadata.put",
                format!("duplicate id {}", record.id),
            ));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ResumeMetadata>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &ResumeId) -> Result<Option<ResumeMetadata>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .cloned())
    }

    async fn delete(&self, id: &ResumeId) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        Ok(records.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ResumeId, Bytes>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        id: &ResumeId,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        self.blobs.write().await.insert(id.clone(), data);
        Ok(())
    }

    async fn get(&self, id: &ResumeId) -> Result<Option<Bytes>, StoreError> {
        Ok(self.blobs.read().await.get(id).cloned())
    }

    async fn delete(&self, id: &ResumeId) -> Result<(), StoreError> {
        self.blobs.write().await.remove(id);
        Ok(())
    }

    async fn exists(&self, id: &ResumeId) -> Result<bool, StoreError> {
        Ok(self.blobs.read().await.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::analysis::AnalysisResult;

    fn record(id: &str) -> ResumeMetadata {
        ResumeMetadata {
            id: ResumeId::parse(id).unwrap(),
            file_name: format!("{id}.pdf"),
            upload_date: Utc::now(),
            file_type: "application/pdf".to_string(),
            file_size: 1,
            analysis: AnalysisResult::default(),
        }
    }

    #[tokio::test]
    async fn test_metadata_keeps_insertion_order() {
        let store = InMemoryMetadataStore::new();
        for id in ["c", "a", "b"] {
            store.put(&record(id)).await.unwrap();
        }

        let ids: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_metadata_rejects_duplicate_id() {
        let store = InMemoryMetadataStore::new();
        store.put(&record("a")).await.unwrap();
        assert!(store.put(&record("a")).await.is_err());
    }

    #[tokio::test]
    async fn test_metadata_delete_reports_removal() {
        let store = InMemoryMetadataStore::new();
        store.put(&record("a")).await.unwrap();
        let id = ResumeId::parse("a").unwrap();

        assert!(store.delete(&id).await.unwrap());
        assert!(!store.delete(&id).await.unwrap());
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blob_round_trip_and_delete() {
        let store = InMemoryBlobStore::new();
        let id = ResumeId::parse("a").unwrap();

        store
            .put(&id, Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .unwrap();
        assert!(store.exists(&id).await.unwrap());
        assert_eq!(store.get(&id).await.unwrap().unwrap(), Bytes::from_static(b"%PDF"));

        store.delete(&id).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(!store.exists(&id).await.unwrap());
    }
}
