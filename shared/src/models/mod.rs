//! Data models
//!
//! Shared between admin-server and the admin panel (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod homepage;
pub mod product;
pub mod taxonomy;

// Re-exports
pub use homepage::*;
pub use product::*;
pub use taxonomy::*;
