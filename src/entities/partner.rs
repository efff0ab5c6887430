//! Partner entity - Contractor accounts able to submit quotations.
//!
//! `is_active` is kept in lockstep with the detail row's `partners_status`.
//! `application_id` links a partner to the application it was provisioned
//! from, when there was one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    /// Unique identifier for the partner
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display login name
    pub username: String,
    /// Login email
    #[sea_orm(unique)]
    pub login_email: String,
    /// Credential hash produced by the authentication layer
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Shown to customers and allowed to quote
    pub is_active: bool,
    /// Application this partner was provisioned from
    #[sea_orm(unique)]
    pub application_id: Option<i64>,
    /// Last successful partner login
    pub last_login_at: Option<DateTimeUtc>,
    /// When the partner was created
    pub created_at: DateTimeUtc,
    /// When the partner was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Partner and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Company profile
    #[sea_orm(has_one = "super::partner_detail::Entity")]
    Detail,
    /// Supported prefectures
    #[sea_orm(has_many = "super::partner_prefecture::Entity")]
    Prefectures,
    /// Quotations submitted by this partner
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
}

impl Related<super::partner_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detail.def()
    }
}

impl Related<super::partner_prefecture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prefectures.def()
    }
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
