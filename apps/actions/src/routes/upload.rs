use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::actions::messages::upload_succeeded;
use crate::document::{validate_resume_bytes, UploadError, MAX_RESUME_BYTES};
use crate::errors::AppError;
use crate::models::conversation::ConversationState;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub sender_id: String,
    pub resume_uploaded: bool,
    pub text_length: usize,
    pub message: String,
}

/// POST /api/v1/sessions/:sender_id/resume
///
/// Accepts the resume as a multipart `file` field instead of a server-side path.
/// The upload is validated exactly like `/upload <path>`; on success it is
/// stored for the conversation so the next question finds it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(sender_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (file_name, data) = read_file_field(&mut multipart).await?;

    let text = validate_resume_bytes(data)
        .await
        .map_err(|e| AppError::UnprocessableEntity(e.user_message()))?;

    let resolved = ConversationState::uploaded(text);
    state
        .sessions
        .save(&sender_id, &resolved)
        .await
        .context("failed to store uploaded resume")?;

    info!(
        "Resume '{file_name}' stored for sender {sender_id}: {} chars",
        resolved.resume_text.chars().count()
    );

    Ok(Json(UploadResponse {
        text_length: resolved.resume_text.chars().count(),
        message: upload_succeeded(&file_name),
        sender_id,
        resume_uploaded: true,
    }))
}

/// DELETE /api/v1/sessions/:sender_id/resume
///
/// Drops the stored resume. Slots held by the runtime are not affected.
pub async fn handle_clear_resume(
    State(state): State<AppState>,
    Path(sender_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .sessions
        .clear(&sender_id)
        .await
        .context("failed to clear stored resume")?;

    if !removed {
        return Err(AppError::NotFound(format!(
            "No stored resume for sender '{sender_id}'"
        )));
    }
    info!("Stored resume cleared for sender {sender_id}");
    Ok(StatusCode::NO_CONTENT)
}

/// Reads the `file` field, stopping as soon as it grows past the resume limit.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(mut field) = multipart.next_field().await.map_err(reject_multipart)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(reject_multipart)? {
            data.extend_from_slice(&chunk);
            if data.len() as u64 > MAX_RESUME_BYTES {
                return Err(too_large(data.len() as u64));
            }
        }
        return Ok((file_name, data));
    }

    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}

/// A body cut off by the request size limit is reported like any oversized resume.
fn reject_multipart(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(MAX_RESUME_BYTES + 1)
    } else {
        AppError::Validation(e.body_text())
    }
}

fn too_large(size: u64) -> AppError {
    AppError::UnprocessableEntity(UploadError::TooLarge { size }.user_message())
}
