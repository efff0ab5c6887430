//! Diagnosis request entity - A customer's job description awaiting quotes.
//!
//! `status` moves through the pipeline; once it reaches `DECIDED` or `CANCELLED`
//! the request is terminal. `diagnosis_code` is the stable display id
//! (`GH-00001`) and is stamped in the same transaction that inserts the row.

use super::status::{ConstructionType, CurrentSituation, DiagnosisStatus, FloorArea, Prefecture};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Diagnosis request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diagnosis_requests")]
pub struct Model {
    /// Unique identifier for the request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display id, e.g. `GH-00003`
    #[sea_orm(unique)]
    pub diagnosis_code: Option<String>,
    /// Customer who submitted the request
    pub customer_id: i64,
    /// Partner the customer asked for by name, if any
    pub designated_partner_id: Option<i64>,
    /// Where the house is
    pub prefecture: Prefecture,
    /// Floor-area bracket
    pub floor_area: FloorArea,
    /// Planning stage of the customer
    pub current_situation: CurrentSituation,
    /// Work requested
    pub construction_type: ConstructionType,
    /// Pipeline status
    pub status: DiagnosisStatus,
    /// When the request was submitted
    pub created_at: DateTimeUtc,
    /// When the request was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `DiagnosisRequest` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each request belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// Optional preferred partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::DesignatedPartnerId",
        to = "super::partner::Column::Id",
        on_delete = "SetNull"
    )]
    DesignatedPartner,
    /// One request has many quotations
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
