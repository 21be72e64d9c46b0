//! Shared types for the catalog admin backend
//!
//! Error types, wire models and small serde/time helpers used by the
//! admin-server crate and its integration tests.

pub mod error;
pub mod models;
pub mod serde_helpers;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
