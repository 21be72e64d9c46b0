//! HTTP status code mapping for error codes

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    ///
    /// Uniqueness violations and blocked deletes are client errors (400),
    /// the panel shows their message verbatim.
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::ProductNotFound | Self::TaxonomyNodeNotFound => {
                StatusCode::NOT_FOUND
            }

            // 408 Request Timeout
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,

            // 500 Internal Server Error
            _ if self.category() == ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
            Self::FileStorageFailed | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
