//! Ingestion pipeline: validate → extract → analyze → save.

use tracing::info;

use crate::analysis::MatchResult;
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentFormat, DOCX_MIME, PDF_MIME};
use crate::state::AppState;
use crate::storage::{ResumeId, UploadedDocument};

/// Picks the MIME type of an upload. A declared PDF/DOCX type wins; a missing or
/// generic declaration falls back to the file extension.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str) -> String {
    let declared = declared.map(str::trim).filter(|ct| !ct.is_empty());
    match declared {
        Some(ct) if ct != "application/octet-stream" => ct.to_string(),
        _ => {
            let lower = file_name.to_ascii_lowercase();
            if lower.ends_with(".pdf") {
                PDF_MIME.to_string()
            } else if lower.ends_with(".docx") {
                DOCX_MIME.to_string()
            } else {
                declared.unwrap_or("application/octet-stream").to_string()
            }
        }
    }
}

/// Size, emptiness and format checks. Runs before anything is extracted or stored.
pub fn validate_upload(
    document: &UploadedDocument,
    max_bytes: usize,
) -> Result<DocumentFormat, AppError> {
    if document.bytes.len() > max_bytes {
        return Err(AppError::PayloadTooLarge { limit: max_bytes });
    }
    if document.bytes.is_empty() {
        return Err(AppError::Validation(format!(
            "Uploaded file '{}' is empty",
            document.file_name
        )));
    }
    Ok(DocumentFormat::from_mime(&document.content_type)?)
}

/// Validates and extracts the text of `document` on the blocking pool.
pub async fn extract_upload(
    document: &UploadedDocument,
    max_bytes: usize,
) -> Result<(DocumentFormat, String), AppError> {
    let format = validate_upload(document, max_bytes)?;

    let bytes = document.bytes.clone();
    let content_type = document.content_type.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &content_type))
        .await
        .map_err(|e| anyhow::anyhow!("Extraction task failed: {e}"))??;

    info!(
        "Extracted {} chars from {format} '{}'",
        text.len(),
        document.file_name
    );
    Ok((format, text))
}

/// Runs the whole pipeline and returns the id of the stored résumé.
///
/// Nothing is stored unless extraction succeeds. The résumé analysis falls back to regex
/// extraction on provider failure; a requested job match has no fallback, and its failure
/// aborts the ingest before anything is saved.
pub async fn ingest_resume(
    state: &AppState,
    mut document: UploadedDocument,
    job_description: Option<&str>,
) -> Result<ResumeId, AppError> {
    let (format, text) = extract_upload(&document, state.config.max_upload_bytes).await?;
    document.content_type = format.mime_type().to_string();
    let analysis = state.analyzer.analyze(&text, job_description).await?;
    let source = analysis.source;
    let id = state.store.save(&document, analysis).await?;

    info!("Ingested '{}' as {id} (analysis: {source:?})", document.file_name);
    Ok(id)
}

/// Matches a stored résumé's text against `job_description`. The result is not persisted.
pub async fn match_stored_resume(
    state: &AppState,
    id: &ResumeId,
    job_description: &str,
) -> Result<MatchResult, AppError> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }

    let stored = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    Ok(state
        .analyzer
        .match_job(&stored.metadata.analysis.raw_text, job_description)
        .await?)
}
