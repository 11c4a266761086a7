// Document persistence.
// A résumé is stored as two halves addressed by the same `ResumeId`: a metadata record
// in the `MetadataStore` (the source of truth for which résumés exist) and the original
// file in the `BlobStore`. `DocumentStore` keeps the two consistent.

pub mod document_store;
pub mod memory;
pub mod models;
pub mod redis_metadata;
pub mod s3_blob;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use document_store::{ConsistencyReport, DocumentStore};
pub use models::{InvalidResumeId, ResumeId, ResumeMetadata, UploadedDocument};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InconsistencyKind {
    /// Metadata exists but the blob store has no file for it.
    MissingBlob,
}

impl std::fmt::Display for InconsistencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InconsistencyKind::MissingBlob => f.write_str("metadata has no stored file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage inconsistency for {id}: {kind}")]
    Inconsistency { id: ResumeId, kind: InconsistencyKind },

    #[error("Storage failure during {operation}: {source}")]
    Failure {
        operation: &'static str,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub fn failure(operation: &'static str, source: impl Into<BoxError>) -> Self {
        StoreError::Failure {
            operation,
            source: source.into(),
        }
    }
}

/// Ordered index of résumé metadata records.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Appends a record. The id must not already be present.
    async fn put(&self, record: &ResumeMetadata) -> Result<(), StoreError>;

    /// All records in insertion order.
    async fn list(&self) -> Result<Vec<ResumeMetadata>, StoreError>;

    async fn get(&self, id: &ResumeId) -> Result<Option<ResumeMetadata>, StoreError>;

    /// Removes a record. Returns whether anything was removed.
    async fn delete(&self, id: &ResumeId) -> Result<bool, StoreError>;
}

/// Binary file storage addressed only by id.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, id: &ResumeId, data: Bytes, content_type: &str)
        -> Result<(), StoreError>;

    async fn get(&self, id: &ResumeId) -> Result<Option<Bytes>, StoreError>;

    /// Removing an absent blob is not an error.
    async fn delete(&self, id: &ResumeId) -> Result<(), StoreError>;

    async fn exists(&self, id: &ResumeId) -> Result<bool, StoreError>;
}
