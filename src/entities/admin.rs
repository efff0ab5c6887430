//! Admin entity - Staff accounts that review applications and run the pipeline.

use super::status::AdminRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    /// Unique identifier for the admin
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name
    #[sea_orm(unique)]
    pub username: String,
    /// Contact address
    pub email: String,
    /// Privilege level
    pub role: AdminRole,
    /// Inactive admins cannot hold a session
    pub is_active: bool,
    /// Set whenever a session is opened
    pub last_login_at: Option<DateTimeUtc>,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Admin and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One admin has many sessions
    #[sea_orm(has_many = "super::admin_session::Entity")]
    Sessions,
}

impl Related<super::admin_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
