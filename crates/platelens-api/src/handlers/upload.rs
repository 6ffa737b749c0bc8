//! Image upload handler
//!
//! Accepts a single multipart field named "file", validates the declared
//! content type against the image allow-list, and writes the bytes verbatim
//! to local storage under a generated collision-resistant name.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use platelens_core::AppError;
use platelens_storage::filename::generate_stored_filename;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Declared MIME types accepted for upload. Only the declared type is checked;
/// file bytes are not sniffed.
const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
    "image/gif",
];

/// Transient upload input; lives only for the duration of one request.
struct UploadedFile {
    data: Vec<u8>,
    original_filename: String,
    content_type: String,
}

/// Upload response carrying the public path under two equivalent keys for
/// caller compatibility.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub url: String,
}

/// Upload image handler
///
/// # Errors
/// - 400 when no "file" field is present or the declared type is not allowed
/// - 500 when the filesystem write fails (details logged, not returned)
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let file = extract_upload(multipart).await?;
    validate_content_type(&file.content_type)?;

    let filename = generate_stored_filename(&file.original_filename);
    let stored = state
        .storage
        .upload(&filename, &file.content_type, file.data)
        .await?;

    tracing::info!(
        original_filename = %file.original_filename,
        stored_filename = %stored.filename,
        url = %stored.url,
        "Image uploaded"
    );

    Ok(Json(UploadResponse {
        image_url: stored.url.clone(),
        url: stored.url,
    }))
}

/// Extract file data, filename, and content type from the multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
async fn extract_upload(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data.to_vec());
        }
    }

    let data = file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    Ok(UploadedFile {
        data,
        original_filename: filename.unwrap_or_else(|| "unknown".to_string()),
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
    })
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate the declared content type against the image allow-list.
fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !ALLOWED_CONTENT_TYPES.contains(&normalized.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported file type '{}'. Allowed types: {}",
            content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    Ok(())
}
