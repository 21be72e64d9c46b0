//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments
//! Features:
//! - Console output, pretty in development and JSON in production
//! - Daily rotating application logs (deleted after 14 days)
//! - Daily rotating audit logs for catalog mutations (never deleted)

use chrono::{NaiveDate, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, filter::filter_fn, fmt, prelude::*};

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

/// Clean up old application log files
///
/// Files are named `app.YYYY-MM-DD.log`; anything dated before the cutoff is
/// removed. Audit logs live in a sibling directory and are never touched.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: i64) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = (Utc::now() - chrono::Duration::days(retention_days)).date_naive();
    let mut removed = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(date_part) = name
            .strip_prefix("app.")
            .and_then(|d| d.strip_suffix(".log"))
            && let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            && date < cutoff
        {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

fn daily_appender(dir: PathBuf, prefix: &str) -> anyhow::Result<RollingFileAppender> {
    fs::create_dir_all(&dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)?;
    Ok(appender)
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Default filter (e.g., "info", "debug"); `RUST_LOG` wins when set
/// * `json_format` - JSON console output (production) or pretty output (development)
/// * `log_dir` - Optional directory for file logging (e.g., `./work_dir/logs`)
///
/// # Examples
/// ```no_run
/// // Development setup (console only)
/// admin_server::init_logger_with_file("debug", false, None)?;
///
/// // Production setup (console + file)
/// admin_server::init_logger_with_file("info", true, Some(std::path::Path::new("./work_dir/logs")))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let mut file_layers = Vec::new();
    if let Some(dir) = log_dir {
        // Application logs: everything except the audit trail
        let app_log = daily_appender(dir.join("app"), "app")?;
        file_layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(filter_fn(|meta| meta.target() != "audit"))
                .boxed(),
        );

        // Audit logs: only the "audit" target
        let audit_log = daily_appender(dir.join("audit"), "audit")?;
        file_layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(audit_log))
                .with_filter(filter_fn(|meta| meta.target() == "audit"))
                .boxed(),
        );

        tokio::spawn(periodic_cleanup(dir.to_path_buf()));
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layers)
        .try_init()?;

    Ok(())
}

/// Periodic cleanup task - runs every hour to clean old logs
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir, APP_LOG_RETENTION_DAYS) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Audit log helper - records catalog mutations
///
/// Audit records go to `logs/audit/audit.YYYY-MM-DD.log` and are never
/// removed by the cleanup task.
///
/// # Examples
/// ```ignore
/// audit_log!("create", "category:12");
/// audit_log!("delete", "product:7", "Removed 'Widget'");
/// ```
#[macro_export]
macro_rules! audit_log {
    ($action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = %$resource,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
    ($action:expr, $resource:expr, $details:expr) => {
        tracing::info!(
            target: "audit",
            action = $action,
            resource = %$resource,
            details = %$details,
            timestamp = %chrono::Local::now().to_rfc3339(),
            "AUDIT"
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_removes_only_expired_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("app");
        let audit_dir = dir.path().join("audit");
        fs::create_dir_all(&app_dir).unwrap();
        fs::create_dir_all(&audit_dir).unwrap();

        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        fs::write(app_dir.join("app.2020-01-01.log"), "old").unwrap();
        fs::write(app_dir.join(format!("app.{today}.log")), "fresh").unwrap();
        fs::write(app_dir.join("notes.txt"), "unrelated").unwrap();
        fs::write(audit_dir.join("audit.2020-01-01.log"), "kept").unwrap();

        let removed = cleanup_old_logs(dir.path(), APP_LOG_RETENTION_DAYS).unwrap();

        assert_eq!(removed, 1);
        assert!(!app_dir.join("app.2020-01-01.log").exists());
        assert!(app_dir.join(format!("app.{today}.log")).exists());
        assert!(app_dir.join("notes.txt").exists());
        assert!(audit_dir.join("audit.2020-01-01.log").exists());
    }

    #[test]
    fn test_cleanup_without_log_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing"), 14).unwrap(), 0);
    }
}
