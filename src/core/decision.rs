//! Contractor decision workflow.
//!
//! Selecting a quotation moves a diagnosis to `DECIDED`, marks the quotation
//! selected, and creates the order, all in one transaction. There are two entry
//! points, [`decide_contractor`] (by quotation id) and
//! [`change_diagnosis_status`] with a `DECIDED` target (by partner id); both
//! resolve to a quotation and run the same [`select_quotation`] step, which is
//! the only code path that creates orders.

use crate::{
    core::{
        auth::{AdminIdentity, require_admin},
        selection::can_select,
    },
    entities::{
        DiagnosisRequest, Quotation, diagnosis_request, order, quotation,
        status::{DiagnosisStatus, OrderStatus},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument, warn};

/// Outcome of a successful contractor decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractorDecision {
    /// The decided diagnosis
    pub diagnosis_id: i64,
    /// The winning quotation
    pub quotation_id: i64,
    /// The order created for the winning quotation
    pub order_id: i64,
    /// Status of the diagnosis after the decision, always `DECIDED`
    pub diagnosis_status: DiagnosisStatus,
}

/// Outcome of an admin status change on a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisStatusChange {
    /// The diagnosis that changed
    pub diagnosis_id: i64,
    /// Its new status
    pub status: DiagnosisStatus,
    /// Set when the change decided a contractor
    pub order_id: Option<i64>,
}

/// Selects `quotation_id` as the winning bid for `diagnosis_id`.
///
/// Either every effect is applied (diagnosis `DECIDED`, quotation selected,
/// order `ORDERED` created) or none is.
///
/// # Errors
/// - [`Error::Unauthorized`] without an admin
/// - [`Error::DiagnosisNotFound`] / [`Error::QuotationNotFound`]
/// - [`Error::QuotationNotInDiagnosis`] when the quotation quotes another diagnosis
/// - [`Error::DiagnosisAlreadyDecided`] / [`Error::DiagnosisCancelled`]
/// - [`Error::AnotherQuotationAlreadySelected`], including for the loser of a race
#[instrument(skip(db, admin))]
pub async fn decide_contractor(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    diagnosis_id: i64,
    quotation_id: i64,
) -> Result<ContractorDecision> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let decision = select_quotation(&txn, diagnosis_id, quotation_id).await?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        diagnosis_id,
        quotation_id,
        order_id = decision.order_id,
        "Contractor decided"
    );
    Ok(decision)
}

/// Applies an admin status change to a diagnosis.
///
/// A `DECIDED` target requires `selected_partner_id`; the partner's quotation
/// for the diagnosis is looked up and selected exactly as
/// [`decide_contractor`] would. Any other target is a plain status write,
/// allowed only while the diagnosis is not terminal and the status actually
/// changes.
#[instrument(skip(db, admin))]
pub async fn change_diagnosis_status(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    diagnosis_id: i64,
    target: DiagnosisStatus,
    selected_partner_id: Option<i64>,
) -> Result<DiagnosisStatusChange> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;

    let diagnosis = DiagnosisRequest::find_by_id(diagnosis_id)
        .one(&txn)
        .await?
        .ok_or(Error::DiagnosisNotFound { id: diagnosis_id })?;

    let change = if target == DiagnosisStatus::Decided {
        let partner_id = selected_partner_id
            .ok_or_else(|| Error::invalid_value("selected partner", "missing"))?;
        let quotation = Quotation::find()
            .filter(quotation::Column::DiagnosisRequestId.eq(diagnosis_id))
            .filter(quotation::Column::PartnerId.eq(partner_id))
            .one(&txn)
            .await?
            .ok_or(Error::PartnerQuotationNotFound {
                diagnosis_id,
                partner_id,
            })?;

        let decision = select_quotation(&txn, diagnosis_id, quotation.id).await?;
        DiagnosisStatusChange {
            diagnosis_id,
            status: decision.diagnosis_status,
            order_id: Some(decision.order_id),
        }
    } else {
        let unnamed_designation =
            target == DiagnosisStatus::Designated && diagnosis.designated_partner_id.is_none();
        if diagnosis.status.is_terminal() || diagnosis.status == target || unnamed_designation {
            return Err(Error::InvalidTransition {
                entity: "diagnosis",
                from: diagnosis.status.to_value(),
                to: target.to_value(),
            });
        }

        claim_diagnosis(&txn, diagnosis_id, diagnosis.status, target, None, Utc::now()).await?;

        DiagnosisStatusChange {
            diagnosis_id,
            status: target,
            order_id: None,
        }
    };

    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        diagnosis_id,
        from = %diagnosis.status.to_value(),
        to = %change.status.to_value(),
        "Diagnosis status changed"
    );
    Ok(change)
}

/// The shared selection step. Must run inside a transaction; on error the
/// caller drops the transaction and every write below is rolled back.
pub(crate) async fn select_quotation<C>(
    conn: &C,
    diagnosis_id: i64,
    quotation_id: i64,
) -> Result<ContractorDecision>
where
    C: ConnectionTrait,
{
    let diagnosis = DiagnosisRequest::find_by_id(diagnosis_id)
        .one(conn)
        .await?
        .ok_or(Error::DiagnosisNotFound { id: diagnosis_id })?;

    let quotation = Quotation::find_by_id(quotation_id)
        .one(conn)
        .await?
        .ok_or(Error::QuotationNotFound { id: quotation_id })?;

    let all_quotations = Quotation::find()
        .filter(quotation::Column::DiagnosisRequestId.eq(diagnosis_id))
        .all(conn)
        .await?;

    can_select(&diagnosis, &quotation, &all_quotations)
        .map_err(|rejection| rejection.into_error(&diagnosis, &quotation))?;

    let now = Utc::now();
    claim_diagnosis(
        conn,
        diagnosis_id,
        diagnosis.status,
        DiagnosisStatus::Decided,
        Some(quotation_id),
        now,
    )
    .await?;
    mark_selected(conn, diagnosis_id, quotation_id, now).await?;

    let order = order::ActiveModel {
        quotation_id: Set(quotation_id),
        order_status: Set(OrderStatus::Ordered),
        construction_start_date: Set(None),
        construction_end_date: Set(None),
        completion_date: Set(None),
        partner_memo: Set(None),
        admin_memo: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(ContractorDecision {
        diagnosis_id,
        quotation_id,
        order_id: order.id,
        diagnosis_status: DiagnosisStatus::Decided,
    })
}

/// Moves a diagnosis from `expected` to `target`.
///
/// The write is conditional on `expected`, the status the caller validated
/// against. When another writer got there first no row matches and the caller
/// gets the error describing what that writer did.
async fn claim_diagnosis<C>(
    conn: &C,
    diagnosis_id: i64,
    expected: DiagnosisStatus,
    target: DiagnosisStatus,
    quotation_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let claimed = DiagnosisRequest::update_many()
        .col_expr(diagnosis_request::Column::Status, Expr::value(target))
        .col_expr(diagnosis_request::Column::UpdatedAt, Expr::value(now))
        .filter(diagnosis_request::Column::Id.eq(diagnosis_id))
        .filter(diagnosis_request::Column::Status.eq(expected))
        .exec(conn)
        .await?;
    if claimed.rows_affected != 1 {
        return Err(lost_race(conn, diagnosis_id, quotation_id, target).await?);
    }
    Ok(())
}

/// Flips `is_selected` on a quotation that is not yet selected.
async fn mark_selected<C>(
    conn: &C,
    diagnosis_id: i64,
    quotation_id: i64,
    now: DateTime<Utc>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let marked = Quotation::update_many()
        .col_expr(quotation::Column::IsSelected, Expr::value(true))
        .col_expr(quotation::Column::UpdatedAt, Expr::value(now))
        .filter(quotation::Column::Id.eq(quotation_id))
        .filter(quotation::Column::IsSelected.eq(false))
        .exec(conn)
        .await?;
    if marked.rows_affected != 1 {
        return Err(
            lost_race(conn, diagnosis_id, Some(quotation_id), DiagnosisStatus::Decided).await?,
        );
    }
    Ok(())
}

/// Builds the error for a caller whose guarded write matched no rows.
///
/// `quotation_id` is the quotation the caller tried to select, if any.
async fn lost_race<C>(
    conn: &C,
    diagnosis_id: i64,
    quotation_id: Option<i64>,
    target: DiagnosisStatus,
) -> Result<Error>
where
    C: ConnectionTrait,
{
    warn!(diagnosis_id, "Diagnosis changed concurrently");

    let selected = Quotation::find()
        .filter(quotation::Column::DiagnosisRequestId.eq(diagnosis_id))
        .filter(quotation::Column::IsSelected.eq(true))
        .one(conn)
        .await?;
    if let Some(selected) = selected {
        return Ok(match quotation_id {
            Some(wanted) if wanted != selected.id => Error::AnotherQuotationAlreadySelected {
                diagnosis_id,
                selected_quotation_id: selected.id,
            },
            _ => Error::DiagnosisAlreadyDecided { diagnosis_id },
        });
    }

    let current = DiagnosisRequest::find_by_id(diagnosis_id)
        .one(conn)
        .await?
        .ok_or(Error::DiagnosisNotFound { id: diagnosis_id })?;
    Ok(match current.status {
        DiagnosisStatus::Decided => Error::DiagnosisAlreadyDecided { diagnosis_id },
        DiagnosisStatus::Cancelled => Error::DiagnosisCancelled { diagnosis_id },
        other => Error::InvalidTransition {
            entity: "diagnosis",
            from: other.to_value(),
            to: target.to_value(),
        },
    })
}
