//! Taxonomy Model
//!
//! Categories and search tree nodes share one shape; the server keeps them
//! in separate tables.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// Category / search tree node entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    pub id: i64,
    pub name: String,
    /// URL-safe identifier derived from `name`, unique per table
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    /// `None` for root nodes
    pub parent_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create / update payload
///
/// `name` defaults to empty so a missing name surfaces as a validation
/// error instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNodeInput {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<i64>,
}

impl TaxonomyNodeInput {
    /// Minimal payload, handy for tests and seeding
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Same payload placed under `parent_id`
    pub fn under(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Dependent counts shown next to every node (`_count` on the wire)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounts {
    pub products: i64,
    pub children: i64,
}

/// Node with its nested children, assembled at read time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTreeNode {
    #[serde(flatten)]
    pub node: TaxonomyNode,
    #[serde(default)]
    pub children: Vec<TaxonomyTreeNode>,
    #[serde(rename = "_count", default)]
    pub count: NodeCounts,
}

impl TaxonomyTreeNode {
    /// Total number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        let mut total = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children.iter());
        }
        total
    }
}

/// Single node with parent, direct children and directly assigned products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyNodeDetail {
    #[serde(flatten)]
    pub node: TaxonomyNode,
    pub parent: Option<TaxonomyNode>,
    pub children: Vec<TaxonomyTreeNode>,
    pub products: Vec<Product>,
    #[serde(rename = "_count")]
    pub count: NodeCounts,
}
