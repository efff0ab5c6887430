//! Column post entity - Editorial articles published on the marketing site.

use super::status::ColumnStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Column post database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "columns")]
pub struct Model {
    /// Unique identifier for the column
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Headline
    pub title: String,
    /// URL path segment, unique
    #[sea_orm(unique)]
    pub slug: String,
    /// One of the editorial categories
    pub category: String,
    /// HTML body
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Thumbnail image URL
    pub thumbnail_url: Option<String>,
    /// Whether the column is shown publicly
    pub status: ColumnStatus,
    /// Page view counter
    pub views: i64,
    /// When the column was written
    pub created_at: DateTimeUtc,
    /// When the column was last edited
    pub updated_at: DateTimeUtc,
}

/// Column posts stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
