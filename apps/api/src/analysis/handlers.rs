//! Axum route handler for the audio analysis endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::info;

use crate::ai_client::AiBackend;
use crate::analysis::prompts::{build_user_prompt, COACHING_SYSTEM};
use crate::analysis::scorecard::{assemble_scorecard, Scorecard};
use crate::errors::AppError;
use crate::state::AppState;

/// Uploads above this size are rejected before any AI call.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

const UPLOAD_FIELD: &str = "audio";

/// POST /api/analyze-audio
///
/// Multipart upload (field `audio`) of one recording. Pipeline: transcribe
/// the audio, run the coaching completion over the transcript, parse the
/// response into a scorecard. Sparse model output is not an error; the
/// scorecard comes back default-filled where parsing found nothing.
pub async fn handle_analyze_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Scorecard>, AppError> {
    let upload = read_audio_field(&mut multipart).await?;
    validate_upload(&upload.content_type, upload.data.len())?;

    info!(
        "analyzing upload {:?} ({} bytes, {})",
        upload.filename,
        upload.data.len(),
        upload.content_type
    );

    let card = analyze_upload(state.ai.as_ref(), upload).await?;
    Ok(Json(card))
}

/// Transcribe, run the coaching completion, parse. Separated from the axum
/// extractor so it can run against a stubbed backend.
async fn analyze_upload(ai: &dyn AiBackend, upload: AudioUpload) -> Result<Scorecard, AppError> {
    let transcript = ai
        .transcribe(upload.data, &upload.content_type, &upload.filename)
        .await
        .map_err(|e| AppError::Ai(format!("transcription failed: {e}")))?;

    let user_prompt = build_user_prompt(&transcript);
    let response_text = ai
        .complete(COACHING_SYSTEM, &user_prompt)
        .await
        .map_err(|e| AppError::Ai(format!("completion failed: {e}")))?;

    Ok(assemble_scorecard(&response_text))
}

struct AudioUpload {
    data: bytes::Bytes,
    content_type: String,
    filename: String,
}

/// Pulls the `audio` field out of the multipart stream.
async fn read_audio_field(multipart: &mut Multipart) -> Result<AudioUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().unwrap_or("recording").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        return Ok(AudioUpload {
            data,
            content_type,
            filename,
        });
    }

    Err(AppError::Validation(format!(
        "missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Rejects non-audio content types and oversized payloads.
fn validate_upload(content_type: &str, size: usize) -> Result<(), AppError> {
    if !content_type.starts_with("audio/") {
        return Err(AppError::Validation(format!(
            "expected an audio upload, got content type '{content_type}'"
        )));
    }
    if size == 0 {
        return Err(AppError::Validation("uploaded file is empty".to_string()));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "file too large: {size} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit"
        )));
    }
    Ok(())
}
