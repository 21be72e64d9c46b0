//! Upload Routes
//!
//! Image upload for product and taxonomy forms, plus serving the stored files.

mod handler;

use axum::{
    Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::header;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Serve uploaded file handler
async fn serve_uploaded_file(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Security check: prevent path traversal
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(AppError::invalid_request("Invalid filename"));
    }

    let file_path = state.config.uploads_dir().join(&filename);
    let content = match tokio::fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(file = %filename, error = %e, "Uploaded file not found");
            return Err(AppError::not_found(format!("File {filename}")));
        }
    };

    let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            // Names are content hashes, so a file never changes
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        content,
    )
        .into_response())
}

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        .route("/uploads/{filename}", get(serve_uploaded_file))
}
