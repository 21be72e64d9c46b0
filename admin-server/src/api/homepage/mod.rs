//! Homepage API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/homepage | GET | 首页文案 (未保存时返回默认值) |
//! | /api/homepage | PUT | 保存首页文案 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/homepage", get(handler::get).put(handler::update))
}
