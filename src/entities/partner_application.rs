//! Partner application entity - A prospective contractor awaiting review.
//!
//! `reviewed_by` and `reviewed_at` are set if and only if the status is not
//! `UNDER_REVIEW`.

use super::status::ApplicationStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Partner application database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "partner_applications")]
pub struct Model {
    /// Unique identifier for the application
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Company applying
    pub company_name: String,
    /// Representative of the company
    pub representative_name: String,
    /// Business address
    pub address: String,
    /// Contact phone
    pub phone_number: String,
    /// Contact email
    pub email: String,
    /// Company website
    pub website_url: Option<String>,
    /// What the company does
    pub business_description: String,
    /// Self-introduction from the applicant
    pub self_pr: String,
    /// Internal staff notes
    pub admin_memo: Option<String>,
    /// Notes recorded while reviewing
    pub review_notes: Option<String>,
    /// Review state
    pub application_status: ApplicationStatus,
    /// Admin who last reviewed the application
    pub reviewed_by: Option<i64>,
    /// When the application was last reviewed
    pub reviewed_at: Option<DateTimeUtc>,
    /// When the application was submitted
    pub created_at: DateTimeUtc,
    /// When the application was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `PartnerApplication` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Service areas named in the application
    #[sea_orm(has_many = "super::partner_application_prefecture::Entity")]
    Prefectures,
}

impl Related<super::partner_application_prefecture::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prefectures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
