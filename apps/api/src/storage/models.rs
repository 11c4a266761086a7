use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::AnalysisResult;

const MAX_ID_LEN: usize = 128;

/// Identifier of a stored résumé: `resume_<unix-millis>_<12 hex chars>`.
///
/// Ids from clients go through `parse`, which restricts them to `[A-Za-z0-9_-]`
/// so they are safe to use as object keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(String);

#[derive(Debug, Error)]
#[error("Invalid resume id: {0:?}")]
pub struct InvalidResumeId(pub String);

impl ResumeId {
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        ResumeId(format!(
            "resume_{}_{}",
            Utc::now().timestamp_millis(),
            &suffix[..12]
        ))
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidResumeId> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(ResumeId(raw.to_string()))
        } else {
            Err(InvalidResumeId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file as received from the client. Never persisted as such.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Persisted record describing one stored résumé.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMetadata {
    pub id: ResumeId,
    pub file_name: String,
    /// Serialized as RFC 3339.
    pub upload_date: DateTime<Utc>,
    pub file_type: String,
    pub file_size: u64,
    pub analysis: AnalysisResult,
}
