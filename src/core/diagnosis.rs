//! Customer and diagnosis request intake and lookup.
//!
//! Customers submit diagnosis requests through the public site. A request
//! starts in `RECRUITING`, or `DESIGNATED` when the customer named a partner,
//! and receives its display code in the same transaction that inserts it.
//! Status changes made by admins live in [`crate::core::decision`].

use crate::{
    entities::{
        Customer, DiagnosisRequest, Partner, customer, diagnosis_request,
        status::{ConstructionType, CurrentSituation, DiagnosisStatus, FloorArea, Prefecture},
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

const DIAGNOSIS_CODE_PREFIX: &str = "GH-";

/// Contact details of a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    /// Full name
    pub name: String,
    /// Contact address
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Address of the house to be painted
    pub construction_address: String,
}

/// A customer's description of the job.
#[derive(Debug, Clone)]
pub struct DiagnosisSubmission {
    /// The submitting customer
    pub customer_id: i64,
    /// Partner the customer asked for by name
    pub designated_partner_id: Option<i64>,
    /// Where the house is
    pub prefecture: Prefecture,
    /// Floor-area bracket
    pub floor_area: FloorArea,
    /// Planning stage
    pub current_situation: CurrentSituation,
    /// Requested work
    pub construction_type: ConstructionType,
}

/// Formats the display code of a diagnosis, e.g. `GH-00003`.
#[must_use]
pub fn format_diagnosis_code(id: i64) -> String {
    format!("{DIAGNOSIS_CODE_PREFIX}{id:05}")
}

/// Parses a display code (`GH-00003`) or a bare id (`3`) into a diagnosis id.
pub fn parse_diagnosis_code(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(DIAGNOSIS_CODE_PREFIX)
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_value("diagnosis code", raw));
    }

    match digits.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::invalid_value("diagnosis code", raw)),
    }
}

/// Registers a customer.
pub async fn create_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> Result<customer::Model> {
    if input.name.trim().is_empty() {
        return Err(Error::invalid_value("customer name", input.name));
    }
    if !input.email.contains('@') {
        return Err(Error::invalid_value("customer email", input.email));
    }

    let customer = customer::ActiveModel {
        customer_name: Set(input.name.trim().to_string()),
        customer_email: Set(input.email),
        customer_phone: Set(input.phone),
        construction_address: Set(input.construction_address),
        review_token: Set(None),
        review_token_expires_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(customer.insert(db).await?)
}

/// Records a new diagnosis request and stamps its display code.
///
/// # Errors
/// - [`Error::CustomerNotFound`] for an unknown customer
/// - [`Error::PartnerNotFound`] for an unknown designated partner
/// - [`Error::PartnerNotEligible`] when the designated partner is hidden
pub async fn submit_diagnosis_request(
    db: &DatabaseConnection,
    submission: DiagnosisSubmission,
) -> Result<diagnosis_request::Model> {
    let txn = db.begin().await?;

    Customer::find_by_id(submission.customer_id)
        .one(&txn)
        .await?
        .ok_or(Error::CustomerNotFound {
            id: submission.customer_id,
        })?;

    let status = match submission.designated_partner_id {
        Some(partner_id) => {
            let partner = Partner::find_by_id(partner_id)
                .one(&txn)
                .await?
                .ok_or(Error::PartnerNotFound { id: partner_id })?;
            if !partner.is_active {
                return Err(Error::PartnerNotEligible {
                    diagnosis_id: 0,
                    partner_id,
                });
            }
            DiagnosisStatus::Designated
        }
        None => DiagnosisStatus::Recruiting,
    };

    let now = Utc::now();
    let inserted = diagnosis_request::ActiveModel {
        diagnosis_code: Set(None),
        customer_id: Set(submission.customer_id),
        designated_partner_id: Set(submission.designated_partner_id),
        prefecture: Set(submission.prefecture),
        floor_area: Set(submission.floor_area),
        current_situation: Set(submission.current_situation),
        construction_type: Set(submission.construction_type),
        status: Set(status),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let code = format_diagnosis_code(inserted.id);
    let mut stamped: diagnosis_request::ActiveModel = inserted.into();
    stamped.diagnosis_code = Set(Some(code));
    let diagnosis = stamped.update(&txn).await?;

    txn.commit().await?;

    info!(
        diagnosis_id = diagnosis.id,
        code = diagnosis.diagnosis_code.as_deref().unwrap_or_default(),
        status = %diagnosis.status.to_value(),
        "Diagnosis request submitted"
    );
    Ok(diagnosis)
}

/// Gets a diagnosis request by id.
pub async fn get_diagnosis(
    db: &DatabaseConnection,
    diagnosis_id: i64,
) -> Result<Option<diagnosis_request::Model>> {
    Ok(DiagnosisRequest::find_by_id(diagnosis_id).one(db).await?)
}

/// Gets a diagnosis request by display code or bare id.
pub async fn get_diagnosis_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<diagnosis_request::Model>> {
    let id = parse_diagnosis_code(code)?;
    get_diagnosis(db, id).await
}

/// Lists diagnosis requests, newest first, optionally filtered by status.
pub async fn list_diagnoses(
    db: &DatabaseConnection,
    status: Option<DiagnosisStatus>,
) -> Result<Vec<diagnosis_request::Model>> {
    let mut query = DiagnosisRequest::find();
    if let Some(status) = status {
        query = query.filter(diagnosis_request::Column::Status.eq(status));
    }

    Ok(query
        .order_by_desc(diagnosis_request::Column::CreatedAt)
        .order_by_desc(diagnosis_request::Column::Id)
        .all(db)
        .await?)
}
