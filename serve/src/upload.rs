//! `POST /upload`: multipart PDF upload.
//!
//! Validates the `pdf-file` field, writes it to a transient file, extracts its text on a
//! blocking thread, deletes the file, then replaces the session's document text. On any
//! failure the document text is left as it was.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use docchat::{is_pdf_filename, sanitize_filename};
use tracing::{info, warn};

use super::app::AppState;
use super::response::{ApiError, MessageResponse};
use super::session::SessionId;

/// Multipart field carrying the document.
pub(crate) const UPLOAD_FIELD: &str = "pdf-file";

struct UploadedFile {
    filename: String,
    data: axum::body::Bytes,
}

/// Over-limit bodies become a short 413; other multipart failures keep axum's status.
fn multipart_error(e: MultipartError) -> ApiError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::Status(status, "File too large".to_string());
    }
    ApiError::Status(status, e.body_text())
}

/// Reads multipart fields until a `pdf-file` file part is found. Other fields, and a plain
/// text field named `pdf-file` (no filename), are skipped.
async fn read_upload_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;
        let Some(field) = field else {
            return Ok(None);
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok(Some(UploadedFile { filename, data }));
    }
}

async fn remove_transient(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), "remove uploaded file: {}", e);
    }
}

pub(crate) async fn upload(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    // A body that is not multipart at all has no file part either.
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::bad_request("No file part"));
    };
    let file = read_upload_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::bad_request("No file part"))?;
    if file.filename.is_empty() {
        return Err(ApiError::bad_request("No selected file"));
    }
    if !is_pdf_filename(&file.filename) {
        return Err(ApiError::bad_request("Invalid file type"));
    }

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("create upload dir: {}", e)))?;
    let stored_name = format!(
        "{}-{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_filename(&file.filename)
    );
    let path = upload_dir.join(stored_name);
    tokio::fs::write(&path, &file.data)
        .await
        .map_err(|e| ApiError::Internal(format!("save upload: {}", e)))?;

    let extractor = Arc::clone(&state.extractor);
    let extract_path = path.clone();
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&extract_path)).await;
    remove_transient(&path).await;

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(filename = %file.filename, "extraction failed: {}", e);
            return Err(ApiError::Unprocessable(format!("Could not read PDF: {}", e)));
        }
        Err(e) => return Err(ApiError::Internal(format!("extraction task: {}", e))),
    };

    info!(
        session_id = %session.0,
        filename = %file.filename,
        bytes = file.data.len(),
        text_len = text.len(),
        "document uploaded"
    );
    let ctx = state.sessions.context(&session.0);
    ctx.lock().await.set_document(text);

    Ok(Json(MessageResponse {
        message: "File uploaded successfully".to_string(),
    }))
}
