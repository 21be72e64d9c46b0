//! Image Upload Handler
//!
//! Accepts one image in the multipart field `image`, verifies it decodes,
//! and stores it under its content hash so identical uploads share a file.

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use http::StatusCode;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

use crate::audit_log;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Multipart field carrying the file
const FILE_FIELD: &str = "image";

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Lower-cased extension of a supported image file name
fn image_extension(filename: &str) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::UnsupportedFileFormat,
                format!("Invalid file extension for: {filename}"),
            )
        })?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{ext}'. Supported: {}",
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }
    Ok(ext)
}

fn file_too_large(max_size: usize) -> AppError {
    AppError::with_message(
        ErrorCode::FileTooLarge,
        format!(
            "File too large. Maximum size is {max_size} bytes ({}MB)",
            max_size / 1024 / 1024
        ),
    )
}

/// Body-limit failures surface while streaming fields
fn multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return file_too_large(max_size);
    }
    AppError::invalid_request(format!("Invalid multipart request: {}", err.body_text()))
}

/// Verify it's actually an image by trying to decode it
fn validate_image(data: &[u8], ext: &str) -> AppResult<()> {
    image::load_from_memory(data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext}): {e}"),
        )
    })?;
    Ok(())
}

/// Upload image handler
pub async fn upload(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|e| {
        AppError::invalid_request(format!("Invalid multipart request: {}", e.body_text()))
    })?;
    let max_size = state.config.max_upload_bytes;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_size))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();

        // Stop reading as soon as the limit is crossed
        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_size))?
        {
            if data.len() + chunk.len() > max_size {
                return Err(file_too_large(max_size));
            }
            data.extend_from_slice(&chunk);
        }
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::NoFileProvided,
            format!("No '{FILE_FIELD}' field found. Field name must be '{FILE_FIELD}'"),
        )
    })?;
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    let ext = image_extension(&filename)?;

    // Decoding is CPU-bound
    let data = {
        let ext = ext.clone();
        tokio::task::spawn_blocking(move || validate_image(&data, &ext).map(|_| data))
            .await
            .map_err(|e| AppError::internal(format!("Image validation task failed: {e}")))??
    };

    let stored_name = format!("{}.{ext}", calculate_hash(&data));
    let uploads_dir = state.config.uploads_dir();
    let file_path = uploads_dir.join(&stored_name);

    if tokio::fs::try_exists(&file_path).await.unwrap_or(false) {
        tracing::info!(
            original_name = %filename,
            existing_file = %stored_name,
            "Duplicate image detected, returning existing file"
        );
    } else {
        let storage_error = |e: std::io::Error| {
            AppError::with_message(
                ErrorCode::FileStorageFailed,
                format!("Failed to save file: {e}"),
            )
        };
        tokio::fs::create_dir_all(&uploads_dir)
            .await
            .map_err(storage_error)?;

        // Write then rename so readers never see a partial file
        let tmp_path = uploads_dir.join(format!(".{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&tmp_path, &data)
            .await
            .map_err(storage_error)?;
        tokio::fs::rename(&tmp_path, &file_path)
            .await
            .map_err(storage_error)?;

        audit_log!(
            "upload",
            format!("upload:{stored_name}"),
            format!("Uploaded image: {filename} -> {stored_name}")
        );
        tracing::info!(
            original_name = %filename,
            size = data.len(),
            file = %stored_name,
            "Image uploaded successfully"
        );
    }

    Ok(Json(UploadResponse {
        url: format!("/uploads/{stored_name}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("photo.JPG").unwrap(), "jpg");
        assert_eq!(image_extension("a.b.webp").unwrap(), "webp");

        let err = image_extension("notes.txt").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
        let err = image_extension("no-extension").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFileFormat);
    }

    #[test]
    fn test_hash_is_content_addressed() {
        assert_eq!(calculate_hash(b"abc"), calculate_hash(b"abc"));
        assert_ne!(calculate_hash(b"abc"), calculate_hash(b"abd"));
        assert_eq!(calculate_hash(b"").len(), 64);
    }

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = validate_image(b"definitely not a png", "png").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidImageFile);
    }
}
