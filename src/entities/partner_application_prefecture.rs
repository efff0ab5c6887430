//! Service area named in a partner application.

use super::status::Prefecture;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application prefecture database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_application_prefectures")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning application
    pub application_id: i64,
    /// Prefecture the applicant wants to serve
    pub supported_prefecture: Prefecture,
}

/// Defines relationships between `PartnerApplicationPrefecture` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each row belongs to one application
    #[sea_orm(
        belongs_to = "super::partner_application::Entity",
        from = "Column::ApplicationId",
        to = "super::partner_application::Column::Id",
        on_delete = "Cascade"
    )]
    Application,
}

impl Related<super::partner_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
