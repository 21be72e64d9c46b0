//! Taxonomy Repository
//!
//! Shared by the `category` and `search_tree` tables; the table name comes
//! from [`TaxonomyKind`] and is always a static identifier.

use super::{MAX_IN_LIST, RepoResult};
use crate::taxonomy::TaxonomyKind;
use shared::models::TaxonomyNode;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

const COLUMNS: &str = "id, name, slug, description, icon, image, image_url, seo_title, \
                       seo_description, seo_keywords, parent_id, created_at, updated_at";

/// Normalized, validated column values for insert / update
#[derive(Debug, Clone, Default)]
pub struct NodeFields {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub parent_id: Option<i64>,
}

pub async fn find_all(conn: &mut SqliteConnection, kind: TaxonomyKind) -> RepoResult<Vec<TaxonomyNode>> {
    let sql = format!("SELECT {COLUMNS} FROM {} ORDER BY id", kind.table());
    let nodes = sqlx::query_as::<_, TaxonomyNode>(&sql)
        .fetch_all(conn)
        .await?;
    Ok(nodes)
}

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    id: i64,
) -> RepoResult<Option<TaxonomyNode>> {
    let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = ?", kind.table());
    let node = sqlx::query_as::<_, TaxonomyNode>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(node)
}

/// Direct children of one node
pub async fn find_children(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    parent_id: i64,
) -> RepoResult<Vec<TaxonomyNode>> {
    let sql = format!("SELECT {COLUMNS} FROM {} WHERE parent_id = ?", kind.table());
    let nodes = sqlx::query_as::<_, TaxonomyNode>(&sql)
        .bind(parent_id)
        .fetch_all(conn)
        .await?;
    Ok(nodes)
}

/// Ids of the direct children of any of `parents`
///
/// One query per [`MAX_IN_LIST`] parents.
pub async fn child_ids(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    parents: &[i64],
) -> RepoResult<Vec<i64>> {
    let mut ids = Vec::new();
    for chunk in parents.chunks(MAX_IN_LIST) {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT id FROM {} WHERE parent_id IN (", kind.table()));
        let mut separated = qb.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        ids.extend(qb.build_query_scalar::<i64>().fetch_all(&mut *conn).await?);
    }
    Ok(ids)
}

/// `None` if the node does not exist, `Some(parent_id)` otherwise
pub async fn parent_of(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    id: i64,
) -> RepoResult<Option<Option<i64>>> {
    let sql = format!("SELECT parent_id FROM {} WHERE id = ?", kind.table());
    let parent = sqlx::query_scalar::<_, Option<i64>>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(parent)
}

pub async fn exists(conn: &mut SqliteConnection, kind: TaxonomyKind, id: i64) -> RepoResult<bool> {
    Ok(parent_of(conn, kind, id).await?.is_some())
}

pub async fn count_children(conn: &mut SqliteConnection, kind: TaxonomyKind, id: i64) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE parent_id = ?", kind.table());
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn count_products(conn: &mut SqliteConnection, kind: TaxonomyKind, id: i64) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM product WHERE {} = ?", kind.product_column());
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Child count per parent id (parents without children are absent)
pub async fn child_counts(conn: &mut SqliteConnection, kind: TaxonomyKind) -> RepoResult<HashMap<i64, i64>> {
    let sql = format!(
        "SELECT parent_id, COUNT(*) FROM {} WHERE parent_id IS NOT NULL GROUP BY parent_id",
        kind.table()
    );
    let rows = sqlx::query_as::<_, (i64, i64)>(&sql).fetch_all(conn).await?;
    Ok(rows.into_iter().collect())
}

/// Product count per referenced node id
pub async fn product_counts(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
) -> RepoResult<HashMap<i64, i64>> {
    let column = kind.product_column();
    let sql = format!(
        "SELECT {column}, COUNT(*) FROM product WHERE {column} IS NOT NULL GROUP BY {column}"
    );
    let rows = sqlx::query_as::<_, (i64, i64)>(&sql).fetch_all(conn).await?;
    Ok(rows.into_iter().collect())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    fields: &NodeFields,
    now: i64,
) -> RepoResult<i64> {
    let sql = format!(
        "INSERT INTO {} (name, slug, description, icon, image, image_url, seo_title, \
         seo_description, seo_keywords, parent_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) RETURNING id",
        kind.table()
    );
    let id = sqlx::query_scalar::<_, i64>(&sql)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.description)
        .bind(&fields.icon)
        .bind(&fields.image)
        .bind(&fields.image_url)
        .bind(&fields.seo_title)
        .bind(&fields.seo_description)
        .bind(&fields.seo_keywords)
        .bind(fields.parent_id)
        .bind(now)
        .fetch_one(conn)
        .await?;
    Ok(id)
}

/// Replace every editable column; returns affected rows
pub async fn update(
    conn: &mut SqliteConnection,
    kind: TaxonomyKind,
    id: i64,
    fields: &NodeFields,
    now: i64,
) -> RepoResult<u64> {
    let sql = format!(
        "UPDATE {} SET name = ?1, slug = ?2, description = ?3, icon = ?4, image = ?5, \
         image_url = ?6, seo_title = ?7, seo_description = ?8, seo_keywords = ?9, \
         parent_id = ?10, updated_at = ?11 WHERE id = ?12",
        kind.table()
    );
    let rows = sqlx::query(&sql)
        .bind(&fields.name)
        .bind(&fields.slug)
        .bind(&fields.description)
        .bind(&fields.icon)
        .bind(&fields.image)
        .bind(&fields.image_url)
        .bind(&fields.seo_title)
        .bind(&fields.seo_description)
        .bind(&fields.seo_keywords)
        .bind(fields.parent_id)
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete(conn: &mut SqliteConnection, kind: TaxonomyKind, id: i64) -> RepoResult<u64> {
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
    let rows = sqlx::query(&sql).bind(id).execute(conn).await?;
    Ok(rows.rows_affected())
}
