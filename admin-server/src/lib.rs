//! Catalog Admin Server - 电商后台管理服务
//!
//! # 架构概述
//!
//! 为管理面板提供 REST API：首页文案、商品、分类树与搜索树、图片上传。
//!
//! - **分类体系** (`taxonomy`): slug 生成、树组装、后代解析、删除保护
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移、仓储
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! admin-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── taxonomy/      # 分类 / 搜索树核心逻辑
//! ├── db/            # 数据库层
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 路由组装、中间件
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod services;
pub mod taxonomy;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use services::{build_app, build_router};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (如果存在)
/// 2. 读取配置并创建工作目录
/// 3. 初始化日志 (控制台 + work_dir/logs)
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.logs_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(log_dir.as_path()))?;

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}
