//! Customer entity - Homeowners who submit diagnosis requests.
//!
//! The review token fields are written when an admin issues a review link for a
//! completed order.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub customer_name: String,
    /// Contact email
    pub customer_email: String,
    /// Contact phone
    pub customer_phone: String,
    /// Address of the house to be painted
    pub construction_address: String,
    /// Token embedded in the review URL
    #[sea_orm(unique)]
    pub review_token: Option<String>,
    /// The review URL stops working after this instant
    pub review_token_expires_at: Option<DateTimeUtc>,
    /// When the customer was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many diagnosis requests
    #[sea_orm(has_many = "super::diagnosis_request::Entity")]
    DiagnosisRequests,
    /// One customer has many inquiries
    #[sea_orm(has_many = "super::inquiry::Entity")]
    Inquiries,
}

impl Related<super::diagnosis_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiagnosisRequests.def()
    }
}

impl Related<super::inquiry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inquiries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
