//! Homepage Repository (single row, id = 1)

use super::{RepoError, RepoResult};
use shared::models::{DEFAULT_HOMEPAGE_DESCRIPTION, DEFAULT_HOMEPAGE_TITLE, Homepage, HomepageUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

/// Stored homepage copy, `None` until first saved
pub async fn find(pool: &SqlitePool) -> RepoResult<Option<Homepage>> {
    let homepage = sqlx::query_as::<_, Homepage>(
        "SELECT id, title, description FROM homepage WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(homepage)
}

/// Insert or update row 1; omitted fields keep their value (or the default)
pub async fn upsert(pool: &SqlitePool, data: &HomepageUpdate) -> RepoResult<Homepage> {
    sqlx::query(
        "INSERT INTO homepage (id, title, description, updated_at) \
         VALUES (1, COALESCE(?1, ?3), COALESCE(?2, ?4), ?5) \
         ON CONFLICT(id) DO UPDATE SET \
             title = COALESCE(?1, title), \
             description = COALESCE(?2, description), \
             updated_at = ?5",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(DEFAULT_HOMEPAGE_TITLE)
    .bind(DEFAULT_HOMEPAGE_DESCRIPTION)
    .bind(now_millis())
    .execute(pool)
    .await?;

    find(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to save homepage".into()))
}
