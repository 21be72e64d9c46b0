//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`homepage`] - 首页文案
//! - [`categories`] - 分类管理接口
//! - [`search_tree`] - 搜索树管理接口
//! - [`products`] - 商品管理接口
//! - [`upload`] - 图片上传

pub mod health;
pub mod homepage;
pub mod upload;

// Data models API
pub mod categories;
pub mod products;
pub mod search_tree;
mod taxonomy;

use serde::Serialize;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// `{"success": true}` body of delete endpoints
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
