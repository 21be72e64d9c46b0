use std::path::PathBuf;
use std::str::FromStr;

/// 服务器配置 - 管理后台的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (启动时先加载 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./work_dir | 工作目录 (数据库、上传文件、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 默认日志级别 (RUST_LOG 优先) |
/// | LOG_JSON | production 下为 true | JSON 日志格式 |
/// | TREE_MAX_DEPTH | 4 | 分类列表的嵌套深度 |
/// | MAX_UPLOAD_BYTES | 5242880 | 上传文件大小上限 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/catalog HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、上传文件、日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 默认日志级别
    pub log_level: String,
    /// 是否输出 JSON 日志
    pub log_json: bool,
    /// 分类 / 搜索树列表的嵌套深度
    pub tree_max_depth: usize,
    /// 上传文件大小上限 (字节)
    pub max_upload_bytes: usize,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
}

/// Parse an optional raw value, falling back to `default` when absent or malformed
fn parse_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(std::env::var(key).ok(), default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let log_json = env_or("LOG_JSON", environment == "production");

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: env_or("HTTP_PORT", 3000),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json,
            tree_max_depth: env_or("TREE_MAX_DEPTH", 4),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
        }
    }

    /// 指定工作目录的配置
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("catalog.db")
    }

    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    ///
    /// ```text
    /// work_dir/
    /// ├── database/
    /// ├── uploads/
    /// └── logs/
    /// ```
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        for dir in [self.database_dir(), self.uploads_dir(), self.logs_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or::<u16>(None, 3000), 3000);
        assert_eq!(parse_or::<u16>(Some("8080".into()), 3000), 8080);
        assert_eq!(parse_or::<u16>(Some(" 8080 ".into()), 3000), 8080);
        assert_eq!(parse_or::<u16>(Some("not-a-port".into()), 3000), 3000);
        assert!(parse_or::<bool>(Some("true".into()), false));
    }

    #[test]
    fn test_work_dir_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_work_dir(dir.path().to_string_lossy());
        config.ensure_work_dir_structure().unwrap();

        assert!(config.database_dir().is_dir());
        assert!(config.uploads_dir().is_dir());
        assert!(config.logs_dir().is_dir());
        assert!(config.database_path().ends_with("database/catalog.db"));
    }
}
