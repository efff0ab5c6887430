//! Quotation entity - A partner's priced bid against a diagnosis request.
//!
//! At most one quotation per diagnosis has `is_selected = true`, and each
//! partner quotes a given diagnosis at most once (enforced by a composite
//! unique index created alongside the table).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Quotation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    /// Unique identifier for the quotation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Diagnosis request being quoted
    pub diagnosis_request_id: i64,
    /// Partner submitting the bid
    pub partner_id: i64,
    /// Price in yen
    pub quotation_amount: i64,
    /// Free-text pitch shown to the admin
    pub appeal_text: String,
    /// Whether this bid won the diagnosis
    pub is_selected: bool,
    /// When the quotation was submitted
    pub created_at: DateTimeUtc,
    /// When the quotation was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Quotation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each quotation belongs to one diagnosis request
    #[sea_orm(
        belongs_to = "super::diagnosis_request::Entity",
        from = "Column::DiagnosisRequestId",
        to = "super::diagnosis_request::Column::Id",
        on_delete = "Cascade"
    )]
    DiagnosisRequest,
    /// Each quotation belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id"
    )]
    Partner,
    /// A selected quotation has exactly one order
    #[sea_orm(has_one = "super::order::Entity")]
    Order,
}

impl Related<super::diagnosis_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DiagnosisRequest.def()
    }
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
