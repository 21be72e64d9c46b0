//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    /// Category reference
    pub category_id: Option<i64>,
    /// Search tree node reference
    pub search_tree_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --
    /// Name/value pairs owned by the product
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
    /// Image URLs owned by the product, in display order
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

/// Product characteristic (e.g. "Color" = "Black")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Characteristic {
    pub id: i64,
    pub name: String,
    pub value: String,
}

/// Product image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub id: i64,
    pub url: String,
}

/// Characteristic as sent by the panel (existing ids are ignored)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacteristicInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Image as sent by the panel (existing ids are ignored)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductImageInput {
    #[serde(default)]
    pub url: String,
}

/// Create / update product payload
///
/// Updates replace characteristics and images wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub characteristics: Vec<CharacteristicInput>,
    #[serde(default)]
    pub images: Vec<ProductImageInput>,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub category_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "crate::serde_helpers::flexible_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_tree_id: Option<i64>,
}

/// Query filters for the product list
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    /// Products under this category or any of its descendants
    pub category_id: Option<i64>,
    /// Products under this search tree node or any of its descendants
    pub search_tree_id: Option<i64>,
}
