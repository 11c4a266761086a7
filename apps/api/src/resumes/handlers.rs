use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::MatchResult;
use crate::errors::AppError;
use crate::resumes::{extract_upload, ingest_resume, match_stored_resume, resolve_content_type};
use crate::state::AppState;
use crate::storage::{ConsistencyReport, ResumeId, ResumeMetadata, UploadedDocument};

#[derive(Serialize)]
pub struct UploadResponse {
    pub id: ResumeId,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeMetadata>,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub text: String,
}

#[derive(Deserialize)]
pub struct MatchRequest {
    pub job_description: String,
}

/// Multipart form: `file` (required) and `job_description` (optional).
struct UploadForm {
    document: UploadedDocument,
    job_description: Option<String>,
}

async fn read_upload_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, AppError> {
    let form_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { limit: max_bytes }
        } else {
            AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
        }
    };

    let mut document = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = resolve_content_type(field.content_type(), &file_name);
                let bytes = field.bytes().await.map_err(form_error)?;
                document = Some(UploadedDocument {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some("job_description") => {
                job_description = Some(field.text().await.map_err(form_error)?);
            }
            _ => {}
        }
    }

    let document =
        document.ok_or_else(|| AppError::Validation("Missing 'file' form field".to_string()))?;
    Ok(UploadForm {
        document,
        job_description,
    })
}

fn parse_id(raw: &str) -> Result<ResumeId, AppError> {
    Ok(ResumeId::parse(raw)?)
}

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let id = ingest_resume(&state, form.document, form.job_description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { id })))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = state.store.list().await?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/v1/resumes/consistency
pub async fn handle_consistency(
    State(state): State<AppState>,
) -> Result<Json<ConsistencyReport>, AppError> {
    Ok(Json(state.store.check_consistency().await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResumeMetadata>, AppError> {
    let id = parse_id(&id)?;
    let stored = state
        .store
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(stored.metadata))
}

/// GET /api/v1/resumes/:id/file
pub async fn handle_get_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let stored = state
        .store
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        stored.metadata.file_name.replace(['"', '\\', '\r', '\n'], "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, stored.metadata.file_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        stored.file,
    )
        .into_response())
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.store.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/match
pub async fn handle_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let id = parse_id(&id)?;
    let result = match_stored_resume(&state, &id, &req.job_description).await?;
    Ok(Json(result))
}

/// POST /api/v1/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let (_, text) = extract_upload(&form.document, state.config.max_upload_bytes).await?;
    Ok(Json(ExtractResponse { text }))
}
