//! 服务模块
//!
//! - [`router`] - 路由组装与 HTTP 中间件

pub mod router;

pub use router::{build_app, build_router};
