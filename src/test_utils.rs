//! Shared test utilities for the workflow core.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        application::{self, ApplicationSubmission},
        auth::{self, AdminIdentity},
        diagnosis::{self, CustomerInput, DiagnosisSubmission},
        partner::{self, PartnerCredentials, PartnerProfileInput},
    },
    entities::{
        DiagnosisRequest, PartnerApplication, customer, diagnosis_request, partner as partner_entity,
        partner_application, quotation,
        status::{
            AdminRole, ConstructionType, CurrentSituation, DiagnosisStatus, FloorArea, Prefecture,
        },
    },
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, PaginatorTrait, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An admin identity for calling mutating operations.
///
/// Operations only check that an identity is present, so it need not exist in
/// the database.
#[must_use]
pub fn test_identity() -> AdminIdentity {
    AdminIdentity {
        admin_id: 1,
        username: "admin".to_string(),
        role: AdminRole::SuperAdmin,
    }
}

/// Creates an admin account named `username` with the `ADMIN` role.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    username: &str,
) -> Result<crate::entities::admin::Model> {
    auth::create_admin(
        db,
        username.to_string(),
        format!("{username}@gaiheki.example"),
        AdminRole::Admin,
    )
    .await
}

/// Creates a customer with placeholder contact details.
pub async fn create_test_customer(db: &DatabaseConnection, name: &str) -> Result<customer::Model> {
    diagnosis::create_customer(
        db,
        CustomerInput {
            name: name.to_string(),
            email: "customer@example.com".to_string(),
            phone: "090-1234-5678".to_string(),
            construction_address: "東京都世田谷区1-2-3".to_string(),
        },
    )
    .await
}

/// Creates a visible partner.
///
/// # Defaults
/// * login email: `{slug}@partners.example`
/// * company name: `{slug}塗装`
/// * prefectures: Tokyo
pub async fn create_test_partner(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<partner_entity::Model> {
    let profile = partner::create_partner(
        db,
        Some(&test_identity()),
        PartnerCredentials {
            login_email: format!("{slug}@partners.example"),
            password_hash: "hashed".to_string(),
        },
        PartnerProfileInput {
            company_name: format!("{slug}塗装"),
            phone_number: "03-0000-0000".to_string(),
            address: "東京都新宿区".to_string(),
            representative_name: "代表".to_string(),
            prefectures: vec![Prefecture::Tokyo],
            ..PartnerProfileInput::default()
        },
        true,
    )
    .await?;
    Ok(profile.partner)
}

fn default_submission(customer_id: i64) -> DiagnosisSubmission {
    DiagnosisSubmission {
        customer_id,
        designated_partner_id: None,
        prefecture: Prefecture::Tokyo,
        floor_area: FloorArea::From80To100,
        current_situation: CurrentSituation::ComparingContractors,
        construction_type: ConstructionType::ExteriorPainting,
    }
}

/// Creates a `RECRUITING` diagnosis request for a customer.
pub async fn create_test_diagnosis(
    db: &DatabaseConnection,
    customer_id: i64,
) -> Result<diagnosis_request::Model> {
    diagnosis::submit_diagnosis_request(db, default_submission(customer_id)).await
}

/// Creates a `DESIGNATED` diagnosis request naming `partner_id`.
pub async fn create_designated_diagnosis(
    db: &DatabaseConnection,
    customer_id: i64,
    partner_id: i64,
) -> Result<diagnosis_request::Model> {
    diagnosis::submit_diagnosis_request(
        db,
        DiagnosisSubmission {
            designated_partner_id: Some(partner_id),
            ..default_submission(customer_id)
        },
    )
    .await
}

/// Overwrites a diagnosis status directly, bypassing the workflow.
pub async fn set_diagnosis_status(
    db: &DatabaseConnection,
    diagnosis_id: i64,
    status: DiagnosisStatus,
) -> Result<()> {
    let diagnosis = DiagnosisRequest::find_by_id(diagnosis_id)
        .one(db)
        .await?
        .ok_or(crate::errors::Error::DiagnosisNotFound { id: diagnosis_id })?;
    let mut active: diagnosis_request::ActiveModel = diagnosis.into();
    active.status = Set(status);
    active.update(db).await?;
    Ok(())
}

/// Inserts an unselected quotation directly, bypassing submission checks.
pub async fn create_test_quotation(
    db: &DatabaseConnection,
    diagnosis_id: i64,
    partner_id: i64,
    amount: i64,
) -> Result<quotation::Model> {
    let now = Utc::now();
    let quotation = quotation::ActiveModel {
        diagnosis_request_id: Set(diagnosis_id),
        partner_id: Set(partner_id),
        quotation_amount: Set(amount),
        appeal_text: Set("丁寧な施工をお約束します".to_string()),
        is_selected: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(quotation)
}

/// Submits an application serving Tokyo and Kanagawa.
pub async fn create_test_application(
    db: &DatabaseConnection,
    company_name: &str,
) -> Result<partner_application::Model> {
    let sequence = PartnerApplication::find().count(db).await? + 1;
    application::submit_application(
        db,
        ApplicationSubmission {
            company_name: company_name.to_string(),
            representative_name: "山本 健".to_string(),
            address: "神奈川県横浜市".to_string(),
            phone_number: "045-000-0000".to_string(),
            email: format!("applicant{sequence}@applicants.example"),
            website_url: None,
            business_description: "外壁・屋根塗装".to_string(),
            self_pr: "創業30年の実績".to_string(),
            service_areas: vec![Prefecture::Tokyo, Prefecture::Kanagawa],
        },
    )
    .await
}

/// A diagnosis in `COMPARING` with three competing quotations.
pub struct ComparingFixture {
    /// Database holding the fixture
    pub db: DatabaseConnection,
    /// Diagnosis `GH-00003`
    pub diagnosis: diagnosis_request::Model,
    /// Partner alpha, ¥1,200,000
    pub quotation_a: quotation::Model,
    /// Partner bravo, ¥980,000
    pub quotation_b: quotation::Model,
    /// Partner charlie, ¥1,350,000
    pub quotation_c: quotation::Model,
}

/// Sets up diagnosis `GH-00003` in `COMPARING` with quotations from partners
/// alpha (¥1,200,000), bravo (¥980,000) and charlie (¥1,350,000), none
/// selected. Two earlier `RECRUITING` requests occupy ids 1 and 2.
pub async fn setup_comparing_diagnosis() -> Result<ComparingFixture> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "木村 直樹").await?;

    create_test_diagnosis(&db, customer.id).await?;
    create_test_diagnosis(&db, customer.id).await?;
    let diagnosis = create_test_diagnosis(&db, customer.id).await?;
    set_diagnosis_status(&db, diagnosis.id, DiagnosisStatus::Comparing).await?;

    let alpha = create_test_partner(&db, "alpha").await?;
    let bravo = create_test_partner(&db, "bravo").await?;
    let charlie = create_test_partner(&db, "charlie").await?;

    let quotation_a = create_test_quotation(&db, diagnosis.id, alpha.id, 1_200_000).await?;
    let quotation_b = create_test_quotation(&db, diagnosis.id, bravo.id, 980_000).await?;
    let quotation_c = create_test_quotation(&db, diagnosis.id, charlie.id, 1_350_000).await?;

    let diagnosis = DiagnosisRequest::find_by_id(diagnosis.id)
        .one(&db)
        .await?
        .ok_or(crate::errors::Error::DiagnosisNotFound { id: diagnosis.id })?;

    Ok(ComparingFixture {
        db,
        diagnosis,
        quotation_a,
        quotation_b,
        quotation_c,
    })
}
