//! Taxonomy routes shared by `/api/categories` and `/api/search-tree`
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | / | GET | 嵌套列表 (带 `_count`) |
//! | / | POST | 创建节点 |
//! | /tree/root | GET | 根节点 + 完整子树 |
//! | /{id} | GET | 节点详情 (parent, children, products) |
//! | /{id} | PUT | 更新节点 (整体替换) |
//! | /{id} | DELETE | 删除节点 (无子节点、无商品时) |
//! | /{id}/products | GET | 节点及其所有后代下的商品 |

mod handler;

use axum::{Extension, Router, routing::get};

use crate::core::ServerState;
use crate::taxonomy::TaxonomyKind;

/// Routes for one taxonomy, to be nested under its prefix
pub fn routes(kind: TaxonomyKind) -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/tree/root", get(handler::root_tree))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/products", get(handler::products))
        .layer(Extension(kind))
}
