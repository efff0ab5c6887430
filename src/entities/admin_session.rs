//! Admin session entity - Opaque session tokens issued after login.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin session database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_sessions")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Admin the session belongs to
    pub admin_id: i64,
    /// Random hex token presented by the client
    #[sea_orm(unique)]
    pub token: String,
    /// The session is rejected after this instant
    pub expires_at: DateTimeUtc,
    /// When the session was opened
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `AdminSession` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each session belongs to one admin
    #[sea_orm(
        belongs_to = "super::admin::Entity",
        from = "Column::AdminId",
        to = "super::admin::Column::Id",
        on_delete = "Cascade"
    )]
    Admin,
}

impl Related<super::admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admin.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
