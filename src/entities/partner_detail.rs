//! Partner detail entity - The public company profile of a partner.

use super::status::PartnerDetailStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner detail database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_details")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning partner
    #[sea_orm(unique)]
    pub partner_id: i64,
    /// Company name
    pub company_name: String,
    /// Contact phone
    pub phone_number: String,
    /// Business address
    pub address: String,
    /// Representative of the company
    pub representative_name: String,
    /// Company website
    pub website_url: Option<String>,
    /// What the company does
    pub business_description: String,
    /// Pitch shown to customers
    pub appeal_text: String,
    /// e.g. `9:00-18:00`
    pub business_hours: String,
    /// e.g. `日曜・祝日`
    pub closed_days: String,
    /// Mirrors `partners.is_active`
    pub partners_status: PartnerDetailStatus,
    /// When the profile was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `PartnerDetail` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each profile belongs to one partner
    #[sea_orm(
        belongs_to = "super::partner::Entity",
        from = "Column::PartnerId",
        to = "super::partner::Column::Id",
        on_delete = "Cascade"
    )]
    Partner,
}

impl Related<super::partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
