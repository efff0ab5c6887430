//! Inquiry entity - Contact-form messages from customers.

use super::status::InquiryStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inquiry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inquiries")]
pub struct Model {
    /// Unique identifier for the inquiry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who wrote in
    pub customer_id: i64,
    /// Subject line
    pub subject: String,
    /// Message body
    pub inquiry_content: String,
    /// Handling state
    pub inquiry_status: InquiryStatus,
    /// Internal staff notes
    pub admin_memo: Option<String>,
    /// When the inquiry was received
    pub created_at: DateTimeUtc,
    /// When the inquiry was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Inquiry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each inquiry belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
