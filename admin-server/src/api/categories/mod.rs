//! Category API 模块

use axum::Router;

use crate::api::taxonomy;
use crate::core::ServerState;
use crate::taxonomy::TaxonomyKind;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/categories", taxonomy::routes(TaxonomyKind::Category))
}
