//! Taxonomy management
//!
//! Categories and the search tree are two independent forests with the same
//! shape and the same rules. Everything here is written once and
//! parameterized by [`TaxonomyKind`].
//!
//! - [`slug`] - name → URL-safe slug, with Cyrillic transliteration
//! - [`tree`] - adjacency list → nested forest, read-time only
//! - [`descendants`] - descendant id set by frontier expansion
//! - [`service`] - create / update / delete with the tree invariants

pub mod descendants;
pub mod service;
pub mod slug;
pub mod tree;

pub use descendants::{ChildLookup, SqlChildLookup, collect_descendants};
pub use service::TaxonomyService;
pub use slug::slugify;
pub use tree::{CountIndex, assemble_forest, compare_nodes};

use crate::db::repository::RepoError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Which taxonomy a service or query works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Category,
    SearchTree,
}

impl TaxonomyKind {
    /// Node table
    pub fn table(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::SearchTree => "search_tree",
        }
    }

    /// Column in `product` referencing this taxonomy
    pub fn product_column(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category_id",
            TaxonomyKind::SearchTree => "search_tree_id",
        }
    }

    /// Human-readable name used in error messages
    pub fn label(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "Category",
            TaxonomyKind::SearchTree => "Search tree node",
        }
    }

    /// Resource prefix used in audit records
    pub fn resource(self) -> &'static str {
        self.table()
    }
}

/// Taxonomy error
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("{0}")]
    Validation(String),

    #[error("{} with slug '{slug}' already exists", .kind.label())]
    DuplicateSlug { kind: TaxonomyKind, slug: String },

    #[error("{} has {count} child node(s); delete or move them first", .kind.label())]
    HasChildren { kind: TaxonomyKind, id: i64, count: i64 },

    #[error("{} is used by {count} product(s); reassign or delete them first", .kind.label())]
    HasProducts { kind: TaxonomyKind, id: i64, count: i64 },

    #[error("{} {id} not found", .kind.label())]
    NotFound { kind: TaxonomyKind, id: i64 },

    #[error("Parent {} {id} not found", .kind.label().to_lowercase())]
    ParentNotFound { kind: TaxonomyKind, id: i64 },

    #[error("{} {id} cannot be moved under {parent_id}: it is the node itself or one of its descendants", .kind.label())]
    Cycle {
        kind: TaxonomyKind,
        id: i64,
        parent_id: i64,
    },

    #[error("{} tree is corrupted: node {id} is reachable twice", .kind.label())]
    CorruptTree { kind: TaxonomyKind, id: i64 },

    #[error(transparent)]
    Database(#[from] RepoError),
}

impl From<sqlx::Error> for TaxonomyError {
    fn from(err: sqlx::Error) -> Self {
        TaxonomyError::Database(err.into())
    }
}

pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

impl From<TaxonomyError> for AppError {
    fn from(err: TaxonomyError) -> Self {
        let message = err.to_string();
        match err {
            TaxonomyError::Validation(_) => AppError::validation(message),
            TaxonomyError::DuplicateSlug { slug, .. } => {
                AppError::with_message(ErrorCode::DuplicateSlug, message).with_detail("slug", slug)
            }
            TaxonomyError::HasChildren { id, count, .. } => {
                AppError::with_message(ErrorCode::TaxonomyHasChildren, message)
                    .with_detail("id", id)
                    .with_detail("children", count)
            }
            TaxonomyError::HasProducts { id, count, .. } => {
                AppError::with_message(ErrorCode::TaxonomyHasProducts, message)
                    .with_detail("id", id)
                    .with_detail("products", count)
            }
            TaxonomyError::NotFound { id, .. } => {
                AppError::with_message(ErrorCode::TaxonomyNodeNotFound, message)
                    .with_detail("id", id)
            }
            TaxonomyError::ParentNotFound { id, .. } => {
                AppError::with_message(ErrorCode::ParentNotFound, message)
                    .with_detail("parentId", id)
            }
            TaxonomyError::Cycle { id, parent_id, .. } => {
                AppError::with_message(ErrorCode::TaxonomyCycle, message)
                    .with_detail("id", id)
                    .with_detail("parentId", parent_id)
            }
            TaxonomyError::CorruptTree { .. } => {
                AppError::with_message(ErrorCode::TreeIntegrity, message)
            }
            TaxonomyError::Database(e) => e.into(),
        }
    }
}
