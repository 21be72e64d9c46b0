//! Product Repository
//!
//! Products own their characteristics and images: writes replace both lists
//! inside the product's transaction, deletes cascade through the schema.

use super::{MAX_IN_LIST, RepoError, RepoResult, begin_write};
use crate::taxonomy::TaxonomyKind;
use shared::models::{Characteristic, Product, ProductImage};
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const COLUMNS: &str =
    "id, name, description, price, category_id, search_tree_id, created_at, updated_at";

/// Validated product values for insert / update
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    pub search_tree_id: Option<i64>,
    /// (name, value) pairs in display order
    pub characteristics: Vec<(String, String)>,
    /// Image URLs in display order
    pub images: Vec<String>,
}

#[derive(sqlx::FromRow)]
struct CharacteristicRow {
    product_id: i64,
    id: i64,
    name: String,
    value: String,
}

#[derive(sqlx::FromRow)]
struct ImageRow {
    product_id: i64,
    id: i64,
    url: String,
}

fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    qb.push("(");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

/// Load characteristics and images for a batch of products
///
/// Two queries per [`MAX_IN_LIST`] products.
async fn attach_relations(conn: &mut SqliteConnection, products: &mut [Product]) -> RepoResult<()> {
    let mut characteristics: HashMap<i64, Vec<Characteristic>> = HashMap::new();
    let mut images: HashMap<i64, Vec<ProductImage>> = HashMap::new();

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    for chunk in ids.chunks(MAX_IN_LIST) {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT product_id, id, name, value FROM product_characteristic WHERE product_id IN ",
        );
        push_id_list(&mut qb, chunk);
        qb.push(" ORDER BY product_id, sort_order, id");
        let rows: Vec<CharacteristicRow> = qb.build_query_as().fetch_all(&mut *conn).await?;
        for row in rows {
            characteristics
                .entry(row.product_id)
                .or_default()
                .push(Characteristic {
                    id: row.id,
                    name: row.name,
                    value: row.value,
                });
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT product_id, id, url FROM product_image WHERE product_id IN ",
        );
        push_id_list(&mut qb, chunk);
        qb.push(" ORDER BY product_id, sort_order, id");
        let rows: Vec<ImageRow> = qb.build_query_as().fetch_all(&mut *conn).await?;
        for row in rows {
            images.entry(row.product_id).or_default().push(ProductImage {
                id: row.id,
                url: row.url,
            });
        }
    }

    for product in products.iter_mut() {
        product.characteristics = characteristics.remove(&product.id).unwrap_or_default();
        product.images = images.remove(&product.id).unwrap_or_default();
    }
    Ok(())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let mut conn = pool.acquire().await?;
    let sql = format!("SELECT {COLUMNS} FROM product ORDER BY created_at DESC, id DESC");
    let mut products = sqlx::query_as::<_, Product>(&sql)
        .fetch_all(&mut *conn)
        .await?;
    attach_relations(&mut conn, &mut products).await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let mut conn = pool.acquire().await?;
    find_by_id_in(&mut conn, id).await
}

async fn find_by_id_in(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {COLUMNS} FROM product WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(product) = product else {
        return Ok(None);
    };
    let mut batch = [product];
    attach_relations(conn, &mut batch).await?;
    let [product] = batch;
    Ok(Some(product))
}

/// Products whose `kind` reference is any of `node_ids`, newest first
pub async fn find_by_nodes(
    pool: &SqlitePool,
    kind: TaxonomyKind,
    node_ids: &[i64],
) -> RepoResult<Vec<Product>> {
    if node_ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut conn = pool.acquire().await?;

    let mut products: Vec<Product> = Vec::new();
    for chunk in node_ids.chunks(MAX_IN_LIST) {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM product WHERE {} IN ",
            kind.product_column()
        ));
        push_id_list(&mut qb, chunk);
        products.extend(qb.build_query_as::<Product>().fetch_all(&mut *conn).await?);
    }
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    attach_relations(&mut conn, &mut products).await?;
    Ok(products)
}

async fn insert_relations(
    conn: &mut SqliteConnection,
    product_id: i64,
    fields: &ProductFields,
) -> RepoResult<()> {
    for (order, (name, value)) in fields.characteristics.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_characteristic (product_id, name, value, sort_order) VALUES (?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(name)
        .bind(value)
        .bind(order as i64)
        .execute(&mut *conn)
        .await?;
    }
    for (order, url) in fields.images.iter().enumerate() {
        sqlx::query("INSERT INTO product_image (product_id, url, sort_order) VALUES (?, ?, ?)")
            .bind(product_id)
            .bind(url)
            .bind(order as i64)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, fields: &ProductFields) -> RepoResult<Product> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product (name, description, price, category_id, search_tree_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING id",
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.category_id)
    .bind(fields.search_tree_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_relations(&mut tx, id, fields).await?;
    let product = find_by_id_in(&mut tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))?;

    tx.commit().await?;
    Ok(product)
}

/// Full replacement, characteristics and images included
pub async fn update(pool: &SqlitePool, id: i64, fields: &ProductFields) -> RepoResult<Product> {
    let now = now_millis();
    let mut tx = begin_write(pool).await?;

    let rows = sqlx::query(
        "UPDATE product SET name = ?1, description = ?2, price = ?3, category_id = ?4, \
         search_tree_id = ?5, updated_at = ?6 WHERE id = ?7",
    )
    .bind(&fields.name)
    .bind(&fields.description)
    .bind(fields.price)
    .bind(fields.category_id)
    .bind(fields.search_tree_id)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }

    sqlx::query("DELETE FROM product_characteristic WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM product_image WHERE product_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    insert_relations(&mut tx, id, fields).await?;

    let product = find_by_id_in(&mut tx, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    tx.commit().await?;
    Ok(product)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}
