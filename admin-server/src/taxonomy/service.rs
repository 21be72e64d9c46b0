//! Taxonomy Service
//!
//! Every mutation runs in one `BEGIN IMMEDIATE` transaction: validation
//! reads, the tree invariant checks and the write see the same snapshot.
//! The `RESTRICT` foreign keys back the delete guard.

use shared::models::{
    Product, TaxonomyNode, TaxonomyNodeDetail, TaxonomyNodeInput, TaxonomyTreeNode,
};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::{BTreeSet, HashSet};

use super::descendants::{SqlChildLookup, collect_descendants};
use super::slug::slugify;
use super::tree::{self, CountIndex};
use super::{TaxonomyError, TaxonomyKind, TaxonomyResult};
use crate::audit_log;
use crate::db::repository::taxonomy::{self as repo, NodeFields};
use crate::db::repository::{RepoError, begin_write, product};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    normalize_optional, validate_optional_text, validate_required_text,
};

/// Category / search tree operations
#[derive(Clone, Debug)]
pub struct TaxonomyService {
    pool: SqlitePool,
    kind: TaxonomyKind,
    max_depth: usize,
}

impl TaxonomyService {
    pub fn new(pool: SqlitePool, kind: TaxonomyKind, max_depth: usize) -> Self {
        Self {
            pool,
            kind,
            max_depth: max_depth.max(1),
        }
    }

    pub fn kind(&self) -> TaxonomyKind {
        self.kind
    }

    fn not_found(&self, id: i64) -> TaxonomyError {
        TaxonomyError::NotFound {
            kind: self.kind,
            id,
        }
    }

    /// Validate and normalize a payload, deriving the slug
    fn prepare(&self, input: TaxonomyNodeInput) -> TaxonomyResult<NodeFields> {
        let name = input.name.trim().to_string();
        let fields = NodeFields {
            slug: slugify(&name),
            name,
            description: normalize_optional(input.description),
            icon: normalize_optional(input.icon),
            image: normalize_optional(input.image),
            image_url: normalize_optional(input.image_url),
            seo_title: normalize_optional(input.seo_title),
            seo_description: normalize_optional(input.seo_description),
            seo_keywords: normalize_optional(input.seo_keywords),
            parent_id: input.parent_id,
        };

        validate_required_text(&fields.name, "name", MAX_NAME_LEN)
            .and_then(|_| validate_optional_text(&fields.description, "description", MAX_DESCRIPTION_LEN))
            .and_then(|_| validate_optional_text(&fields.icon, "icon", MAX_SHORT_TEXT_LEN))
            .and_then(|_| validate_optional_text(&fields.image, "image", MAX_URL_LEN))
            .and_then(|_| validate_optional_text(&fields.image_url, "imageUrl", MAX_URL_LEN))
            .and_then(|_| validate_optional_text(&fields.seo_title, "seoTitle", MAX_NAME_LEN))
            .and_then(|_| {
                validate_optional_text(&fields.seo_description, "seoDescription", MAX_NOTE_LEN)
            })
            .and_then(|_| validate_optional_text(&fields.seo_keywords, "seoKeywords", MAX_NOTE_LEN))
            .map_err(|e| TaxonomyError::Validation(e.message))?;

        Ok(fields)
    }

    async fn count_index(&self, conn: &mut SqliteConnection) -> TaxonomyResult<CountIndex> {
        Ok(CountIndex {
            children: repo::child_counts(conn, self.kind).await?,
            products: repo::product_counts(conn, self.kind).await?,
        })
    }

    /// Reject a parent that is missing, the node itself, or one of its descendants
    ///
    /// Walks up from the proposed parent; reaching `id` means the move would
    /// close a loop.
    async fn check_parent(
        &self,
        conn: &mut SqliteConnection,
        id: Option<i64>,
        parent_id: i64,
    ) -> TaxonomyResult<()> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id);

        while let Some(node_id) = current {
            if Some(node_id) == id {
                return Err(TaxonomyError::Cycle {
                    kind: self.kind,
                    id: node_id,
                    parent_id,
                });
            }
            if !seen.insert(node_id) {
                return Err(TaxonomyError::CorruptTree {
                    kind: self.kind,
                    id: node_id,
                });
            }
            current = match repo::parent_of(conn, self.kind, node_id).await? {
                Some(parent) => parent,
                None if node_id == parent_id => {
                    return Err(TaxonomyError::ParentNotFound {
                        kind: self.kind,
                        id: parent_id,
                    });
                }
                // Dangling link further up; the foreign keys make this unreachable
                None => None,
            };
        }
        Ok(())
    }

    // ==================== Reads ====================

    /// Forest of roots nested to the configured depth, each node with `_count`
    pub async fn list(&self) -> TaxonomyResult<Vec<TaxonomyTreeNode>> {
        let mut conn = self.pool.acquire().await?;
        let nodes = repo::find_all(&mut conn, self.kind).await?;
        let counts = self.count_index(&mut conn).await?;
        Ok(tree::assemble_forest(nodes, &counts, Some(self.max_depth)))
    }

    /// Roots with their complete subtrees
    pub async fn root_tree(&self) -> TaxonomyResult<Vec<TaxonomyTreeNode>> {
        let mut conn = self.pool.acquire().await?;
        let nodes = repo::find_all(&mut conn, self.kind).await?;
        let counts = self.count_index(&mut conn).await?;
        Ok(tree::assemble_forest(nodes, &counts, None))
    }

    pub async fn get(&self, id: i64) -> TaxonomyResult<TaxonomyNode> {
        let mut conn = self.pool.acquire().await?;
        repo::find_by_id(&mut conn, self.kind, id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Node with parent, sorted direct children and directly assigned products
    pub async fn detail(&self, id: i64) -> TaxonomyResult<TaxonomyNodeDetail> {
        let mut conn = self.pool.acquire().await?;
        let node = repo::find_by_id(&mut conn, self.kind, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;

        let parent = match node.parent_id {
            Some(parent_id) => repo::find_by_id(&mut conn, self.kind, parent_id).await?,
            None => None,
        };
        let children = repo::find_children(&mut conn, self.kind, id).await?;
        let counts = self.count_index(&mut conn).await?;
        drop(conn);

        let products = product::find_by_nodes(&self.pool, self.kind, &[id]).await?;

        Ok(TaxonomyNodeDetail {
            count: counts.get(id),
            children: tree::leaves(children, &counts),
            node,
            parent,
            products,
        })
    }

    /// `id` plus every node below it
    pub async fn descendants(&self, id: i64) -> TaxonomyResult<BTreeSet<i64>> {
        let mut conn = self.pool.acquire().await?;
        if !repo::exists(&mut conn, self.kind, id).await? {
            return Err(self.not_found(id));
        }
        let mut lookup = SqlChildLookup::new(&mut conn, self.kind);
        collect_descendants(&mut lookup, id).await
    }

    /// Products referencing `id` or any of its descendants
    pub async fn products_under(&self, id: i64) -> TaxonomyResult<Vec<Product>> {
        let ids: Vec<i64> = self.descendants(id).await?.into_iter().collect();
        Ok(product::find_by_nodes(&self.pool, self.kind, &ids).await?)
    }

    // ==================== Writes ====================

    pub async fn create(&self, input: TaxonomyNodeInput) -> TaxonomyResult<TaxonomyNode> {
        let fields = self.prepare(input)?;
        let mut tx = begin_write(&self.pool).await?;

        if let Some(parent_id) = fields.parent_id {
            self.check_parent(&mut tx, None, parent_id).await?;
        }

        let id = match repo::insert(&mut tx, self.kind, &fields, now_millis()).await {
            Ok(id) => id,
            Err(e) => return Err(self.classify_write_error(e, &fields)),
        };
        let node = repo::find_by_id(&mut tx, self.kind, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        tx.commit().await?;

        audit_log!("create", format!("{}:{}", self.kind.resource(), id), &node.name);
        tracing::info!(kind = ?self.kind, id, slug = %node.slug, "Taxonomy node created");
        Ok(node)
    }

    /// Full replacement: omitted optional fields are cleared, a missing
    /// `parentId` moves the node to the root
    pub async fn update(&self, id: i64, input: TaxonomyNodeInput) -> TaxonomyResult<TaxonomyNode> {
        let fields = self.prepare(input)?;
        let mut tx = begin_write(&self.pool).await?;

        if !repo::exists(&mut tx, self.kind, id).await? {
            return Err(self.not_found(id));
        }
        if let Some(parent_id) = fields.parent_id {
            self.check_parent(&mut tx, Some(id), parent_id).await?;
        }

        match repo::update(&mut tx, self.kind, id, &fields, now_millis()).await {
            Ok(0) => return Err(self.not_found(id)),
            Ok(_) => {}
            Err(e) => return Err(self.classify_write_error(e, &fields)),
        }
        let node = repo::find_by_id(&mut tx, self.kind, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        tx.commit().await?;

        audit_log!("update", format!("{}:{}", self.kind.resource(), id), &node.name);
        Ok(node)
    }

    /// Delete a node with no children and no products
    pub async fn delete(&self, id: i64) -> TaxonomyResult<()> {
        let mut tx = begin_write(&self.pool).await?;

        let node = repo::find_by_id(&mut tx, self.kind, id)
            .await?
            .ok_or_else(|| self.not_found(id))?;
        self.ensure_deletable(&mut tx, id).await?;

        match repo::delete(&mut tx, self.kind, id).await {
            Ok(_) => {}
            // A writer slipped in after the guard; recount to report why
            Err(RepoError::ForeignKey(msg)) => {
                self.ensure_deletable(&mut tx, id).await?;
                return Err(RepoError::ForeignKey(msg).into());
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        audit_log!("delete", format!("{}:{}", self.kind.resource(), id), &node.name);
        Ok(())
    }

    async fn ensure_deletable(&self, conn: &mut SqliteConnection, id: i64) -> TaxonomyResult<()> {
        let children = repo::count_children(conn, self.kind, id).await?;
        if children > 0 {
            return Err(TaxonomyError::HasChildren {
                kind: self.kind,
                id,
                count: children,
            });
        }
        let products = repo::count_products(conn, self.kind, id).await?;
        if products > 0 {
            return Err(TaxonomyError::HasProducts {
                kind: self.kind,
                id,
                count: products,
            });
        }
        Ok(())
    }

    fn classify_write_error(&self, err: RepoError, fields: &NodeFields) -> TaxonomyError {
        match err {
            RepoError::Duplicate(_) => TaxonomyError::DuplicateSlug {
                kind: self.kind,
                slug: fields.slug.clone(),
            },
            // Parent removed between the check and the write
            RepoError::ForeignKey(_) => match fields.parent_id {
                Some(parent_id) => TaxonomyError::ParentNotFound {
                    kind: self.kind,
                    id: parent_id,
                },
                None => TaxonomyError::Database(err),
            },
            other => TaxonomyError::Database(other),
        }
    }
}
