use sqlx::SqlitePool;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::taxonomy::{TaxonomyKind, TaxonomyService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价克隆 (连接池内部为 Arc)，axum 每个请求克隆一份。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | categories | TaxonomyService | 分类树 |
/// | search_tree | TaxonomyService | 搜索树 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 分类服务
    pub categories: TaxonomyService,
    /// 搜索树服务
    pub search_tree: TaxonomyService,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, db: DbService) -> Self {
        let depth = config.tree_max_depth;
        Self {
            categories: TaxonomyService::new(db.pool.clone(), TaxonomyKind::Category, depth),
            search_tree: TaxonomyService::new(db.pool.clone(), TaxonomyKind::SearchTree, depth),
            config,
            db,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/catalog.db) 及迁移
    /// 3. 各服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir_structure()?;

        let db = DbService::new(&config.database_path()).await?;

        Ok(Self::new(config.clone(), db))
    }

    /// 数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 按类型获取分类 / 搜索树服务
    pub fn taxonomy(&self, kind: TaxonomyKind) -> &TaxonomyService {
        match kind {
            TaxonomyKind::Category => &self.categories,
            TaxonomyKind::SearchTree => &self.search_tree,
        }
    }
}
