//! Consistent create/list/read/delete across the metadata index and the blob store.
//!
//! There is no cross-store transaction. Ordering plus compensation keep the invariant
//! that a listed résumé always has its file:
//! - save: blob first, then metadata; a failed metadata write removes the blob again.
//! - delete: metadata first, then blob; a failed blob removal puts the record back.
//!
//! A request dropped between the two steps can leave at most an unreachable blob, never
//! metadata without its file. `delete` clears such blobs; `check_consistency` reports any
//! record that still lacks its file.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::AnalysisResult;
use crate::storage::{
    BlobStore, InconsistencyKind, MetadataStore, ResumeId, ResumeMetadata, StoreError,
    UploadedDocument,
};

const MAX_ID_ATTEMPTS: usize = 8;

/// A stored résumé: its metadata and the original file.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub metadata: ResumeMetadata,
    pub file: bytes::Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub checked: usize,
    /// Ids whose metadata exists without a stored file.
    pub missing_blobs: Vec<ResumeId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_blobs.is_empty()
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    metadata: Arc<dyn MetadataStore>,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentStore {
    pub fn new(metadata: Arc<dyn MetadataStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { metadata, blobs }
    }

    /// Persists `document` with its analysis and returns the new id.
    pub async fn save(
        &self,
        document: &UploadedDocument,
        analysis: AnalysisResult,
    ) -> Result<ResumeId, StoreError> {
        let id = self.fresh_id().await?;
        let record = ResumeMetadata {
            id: id.clone(),
            file_name: document.file_name.clone(),
            upload_date: Utc::now(),
            file_type: document.content_type.clone(),
            file_size: document.bytes.len() as u64,
            analysis,
        };

        self.blobs
            .put(&id, document.bytes.clone(), &document.content_type)
            .await?;

        if let Err(e) = self.metadata.put(&record).await {
            warn!("Metadata write for {id} failed, removing stored file: {e}");
            if let Err(rollback) = self.blobs.delete(&id).await {
                warn!("Rollback of file {id} failed, leaving an unreachable blob: {rollback}");
            }
            return Err(e);
        }

        info!(
            "Stored resume {id} ({}, {} bytes)",
            record.file_type, record.file_size
        );
        Ok(id)
    }

    /// All stored résumés in the order they were saved.
    pub async fn list(&self) -> Result<Vec<ResumeMetadata>, StoreError> {
        self.metadata.list().await
    }

    /// `Ok(None)` when the id is unknown. Metadata without its file is an
    /// `Inconsistency`, unless the record vanished meanwhile (a racing delete).
    pub async fn get_by_id(&self, id: &ResumeId) -> Result<Option<StoredResume>, StoreError> {
        let Some(metadata) = self.metadata.get(id).await? else {
            return Ok(None);
        };

        match self.blobs.get(id).await? {
            Some(file) => Ok(Some(StoredResume { metadata, file })),
            None if self.metadata.get(id).await?.is_none() => Ok(None),
            None => Err(StoreError::Inconsistency {
                id: id.clone(),
                kind: InconsistencyKind::MissingBlob,
            }),
        }
    }

    /// Removes the résumé. Deleting an unknown id is a no-op; a file left without
    /// metadata is removed as well.
    ///
    /// A record put back after a failed blob removal moves to the end of `list`.
    pub async fn delete(&self, id: &ResumeId) -> Result<(), StoreError> {
        let record = self.metadata.get(id).await?;
        if record.is_some() {
            self.metadata.delete(id).await?;
        }

        if let Err(e) = self.blobs.delete(id).await {
            if let Some(record) = &record {
                warn!("File removal for {id} failed, restoring its metadata: {e}");
                if let Err(restore) = self.metadata.put(record).await {
                    warn!("Restoring metadata for {id} failed: {restore}");
                }
            }
            return Err(e);
        }

        match record {
            Some(_) => info!("Deleted resume {id}"),
            None => debug!("Delete of {id}: no metadata, cleared any leftover file"),
        }
        Ok(())
    }

    /// Lists every metadata record whose file is missing.
    pub async fn check_consistency(&self) -> Result<ConsistencyReport, StoreError> {
        let records = self.metadata.list().await?;
        let mut report = ConsistencyReport {
            checked: records.len(),
            ..Default::default()
        };
        for record in records {
            if !self.blobs.exists(&record.id).await? {
                warn!("Resume {} has metadata but no stored file", record.id);
                report.missing_blobs.push(record.id);
            }
        }
        if report.is_consistent() {
            info!("Consistency check passed for {} resume(s)", report.checked);
        }
        Ok(report)
    }

    async fn fresh_id(&self) -> Result<ResumeId, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ResumeId::generate();
            if self.metadata.get(&id).await?.is_none() && !self.blobs.exists(&id).await? {
                return Ok(id);
            }
        }
        Err(StoreError::failure(
            "save",
            format!("no unused id after {MAX_ID_ATTEMPTS} attempts"),
        ))
    }
}
