//! Homepage Model

use serde::{Deserialize, Serialize};

pub const DEFAULT_HOMEPAGE_TITLE: &str = "Default Title";
pub const DEFAULT_HOMEPAGE_DESCRIPTION: &str = "Default Description";

/// Storefront homepage copy (single row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Homepage {
    /// Absent until the copy is saved for the first time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub description: String,
}

impl Default for Homepage {
    fn default() -> Self {
        Self {
            id: None,
            title: DEFAULT_HOMEPAGE_TITLE.to_string(),
            description: DEFAULT_HOMEPAGE_DESCRIPTION.to_string(),
        }
    }
}

/// Update homepage payload, omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomepageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}
