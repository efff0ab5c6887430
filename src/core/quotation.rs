//! Quotation submission and lookup.
//!
//! Partners quote open diagnosis requests, at most once per request. Selection
//! of a quotation is handled by [`crate::core::decision`], never here.

use crate::{
    entities::{DiagnosisRequest, Partner, Quotation, quotation, status::DiagnosisStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

const YEN_PER_MAN: i64 = 10_000;

/// Submits a partner's quotation for a diagnosis request.
///
/// # Errors
/// - [`Error::DiagnosisNotFound`] / [`Error::PartnerNotFound`]
/// - [`Error::DiagnosisAlreadyDecided`] / [`Error::DiagnosisCancelled`] for a
///   closed request
/// - [`Error::PartnerNotEligible`] for a hidden partner, or any partner other
///   than the designated one
/// - [`Error::DuplicateQuotation`] when the partner already quoted the request
/// - [`Error::InvalidValue`] for a non-positive amount
pub async fn submit_quotation(
    db: &DatabaseConnection,
    diagnosis_id: i64,
    partner_id: i64,
    amount: i64,
    appeal_text: String,
) -> Result<quotation::Model> {
    if amount <= 0 {
        return Err(Error::invalid_value("quotation amount", amount.to_string()));
    }

    let txn = db.begin().await?;

    let diagnosis = DiagnosisRequest::find_by_id(diagnosis_id)
        .one(&txn)
        .await?
        .ok_or(Error::DiagnosisNotFound { id: diagnosis_id })?;
    match diagnosis.status {
        DiagnosisStatus::Decided => {
            return Err(Error::DiagnosisAlreadyDecided { diagnosis_id });
        }
        DiagnosisStatus::Cancelled => {
            return Err(Error::DiagnosisCancelled { diagnosis_id });
        }
        DiagnosisStatus::Designated | DiagnosisStatus::Recruiting | DiagnosisStatus::Comparing => {}
    }

    let partner = Partner::find_by_id(partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;
    let designated_elsewhere = diagnosis
        .designated_partner_id
        .is_some_and(|designated| designated != partner_id);
    if !partner.is_active || designated_elsewhere {
        return Err(Error::PartnerNotEligible {
            diagnosis_id,
            partner_id,
        });
    }

    let existing = Quotation::find()
        .filter(quotation::Column::DiagnosisRequestId.eq(diagnosis_id))
        .filter(quotation::Column::PartnerId.eq(partner_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(Error::DuplicateQuotation {
            diagnosis_id,
            partner_id,
        });
    }

    let now = Utc::now();
    let quotation = quotation::ActiveModel {
        diagnosis_request_id: Set(diagnosis_id),
        partner_id: Set(partner_id),
        quotation_amount: Set(amount),
        appeal_text: Set(appeal_text),
        is_selected: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        quotation_id = quotation.id,
        diagnosis_id,
        partner_id,
        amount,
        "Quotation submitted"
    );
    Ok(quotation)
}

/// Gets a quotation by id.
pub async fn get_quotation(
    db: &DatabaseConnection,
    quotation_id: i64,
) -> Result<Option<quotation::Model>> {
    Ok(Quotation::find_by_id(quotation_id).one(db).await?)
}

/// Lists every quotation of a diagnosis request, newest first.
pub async fn list_quotations_for_diagnosis(
    db: &DatabaseConnection,
    diagnosis_id: i64,
) -> Result<Vec<quotation::Model>> {
    Ok(Quotation::find()
        .filter(quotation::Column::DiagnosisRequestId.eq(diagnosis_id))
        .order_by_desc(quotation::Column::CreatedAt)
        .order_by_desc(quotation::Column::Id)
        .all(db)
        .await?)
}

/// Renders a yen amount in 万円 units, e.g. `1_200_000` as `120万円`.
///
/// Amounts that are not a whole number of 万 keep one decimal place
/// (`985_000` as `98.5万円`).
#[must_use]
pub fn format_amount_man(amount: i64) -> String {
    let man = amount / YEN_PER_MAN;
    let remainder = amount % YEN_PER_MAN;
    if remainder == 0 {
        format!("{man}万円")
    } else {
        let tenths = remainder / (YEN_PER_MAN / 10);
        format!("{man}.{tenths}万円")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::*;

    #[test]
    fn test_format_amount_man() {
        assert_eq!(format_amount_man(1_200_000), "120万円");
        assert_eq!(format_amount_man(980_000), "98万円");
        assert_eq!(format_amount_man(1_350_000), "135万円");
        assert_eq!(format_amount_man(985_000), "98.5万円");
        assert_eq!(format_amount_man(0), "0万円");
    }

    #[tokio::test]
    async fn test_submit_and_list_quotations() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "伊藤").await?;
        let diagnosis = create_test_diagnosis(&db, customer.id).await?;
        let a = create_test_partner(&db, "alpha").await?;
        let b = create_test_partner(&db, "bravo").await?;

        let first = submit_quotation(&db, diagnosis.id, a.id, 1_200_000, "丁寧".into()).await?;
        let second = submit_quotation(&db, diagnosis.id, b.id, 980_000, "迅速".into()).await?;
        assert!(!first.is_selected);

        let listed = list_quotations_for_diagnosis(&db, diagnosis.id).await?;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);

        let fetched = get_quotation(&db, first.id).await?.unwrap();
        assert_eq!(fetched.quotation_amount, 1_200_000);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_quotation_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "渡辺").await?;
        let diagnosis = create_test_diagnosis(&db, customer.id).await?;
        let partner = create_test_partner(&db, "alpha").await?;

        submit_quotation(&db, diagnosis.id, partner.id, 900_000, String::new()).await?;
        let err = submit_quotation(&db, diagnosis.id, partner.id, 850_000, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateQuotation { .. }));
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        Ok(())
    }

    #[tokio::test]
    async fn test_quotation_preconditions() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "中村").await?;
        let diagnosis = create_test_diagnosis(&db, customer.id).await?;
        let partner = create_test_partner(&db, "alpha").await?;

        let err = submit_quotation(&db, diagnosis.id, partner.id, 0, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));

        let err = submit_quotation(&db, 999, partner.id, 100_000, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DiagnosisNotFound { id: 999 }));

        let err = submit_quotation(&db, diagnosis.id, 999, 100_000, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PartnerNotFound { id: 999 }));

        set_diagnosis_status(&db, diagnosis.id, DiagnosisStatus::Cancelled).await?;
        let err = submit_quotation(&db, diagnosis.id, partner.id, 100_000, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DiagnosisCancelled { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_designated_diagnosis_only_accepts_designated_partner() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "小林").await?;
        let chosen = create_test_partner(&db, "chosen").await?;
        let other = create_test_partner(&db, "other").await?;
        let diagnosis = create_designated_diagnosis(&db, customer.id, chosen.id).await?;

        let err = submit_quotation(&db, diagnosis.id, other.id, 700_000, String::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PartnerNotEligible { .. }));

        submit_quotation(&db, diagnosis.id, chosen.id, 700_000, String::new()).await?;
        Ok(())
    }
}
