//! Search tree API 模块
//!
//! Same surface as categories, separate entity.

use axum::Router;

use crate::api::taxonomy;
use crate::core::ServerState;
use crate::taxonomy::TaxonomyKind;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/search-tree", taxonomy::routes(TaxonomyKind::SearchTree))
}
