//! Order entity - The post-selection work record.
//!
//! Orders only come into existence through contractor selection, one per
//! quotation (`quotation_id` is unique).

use super::status::OrderStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The winning quotation
    #[sea_orm(unique)]
    pub quotation_id: i64,
    /// Construction progress
    pub order_status: OrderStatus,
    /// Planned start, `None` while undetermined
    pub construction_start_date: Option<Date>,
    /// Planned end, `None` while undetermined
    pub construction_end_date: Option<Date>,
    /// Actual completion
    pub completion_date: Option<Date>,
    /// Notes from the contractor
    pub partner_memo: Option<String>,
    /// Notes from staff
    pub admin_memo: Option<String>,
    /// When the order was created
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one quotation
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id"
    )]
    Quotation,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
