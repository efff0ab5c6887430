//! Order lifecycle after a contractor has been decided.
//!
//! Orders are only ever created by [`crate::core::decision`]. This module moves
//! them forward through construction, keeps the schedule and memos, and mints
//! the customer's review link once the work is complete.

use crate::{
    config::settings::ReviewSettings,
    core::auth::{AdminIdentity, generate_token, require_admin},
    entities::{
        Customer, DiagnosisRequest, Order, PartnerDetail, Quotation, customer, diagnosis_request,
        order, partner_detail, quotation, status::OrderStatus,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{info, instrument};

/// Construction schedule and memos, written as a whole.
///
/// `None` dates mean "undetermined".
#[derive(Debug, Clone, Default)]
pub struct OrderSchedule {
    /// First day of construction
    pub construction_start_date: Option<NaiveDate>,
    /// Planned last day of construction
    pub construction_end_date: Option<NaiveDate>,
    /// Day the work was actually completed
    pub completion_date: Option<NaiveDate>,
    /// Note visible to the partner
    pub partner_memo: Option<String>,
    /// Internal admin note
    pub admin_memo: Option<String>,
}

/// A review link handed to the customer after completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLink {
    /// Full URL of the review form
    pub url: String,
    /// The token embedded in the URL
    pub token: String,
    /// When the link stops working
    pub expires_at: DateTime<Utc>,
}

/// An order with the context admins see in the order list.
#[derive(Debug, Clone)]
pub struct OrderOverview {
    /// The order itself
    pub order: order::Model,
    /// The selected quotation behind it
    pub quotation: quotation::Model,
    /// Display code of the diagnosis, e.g. `GH-00003`
    pub diagnosis_code: Option<String>,
    /// Company name of the contracted partner
    pub partner_company: Option<String>,
}

/// Whether an order may move from `from` to `to`.
///
/// Orders only move forward: `ORDERED → IN_PROGRESS → COMPLETED →
/// REVIEW_COMPLETED`, and may be cancelled before completion.
#[must_use]
pub const fn is_allowed_transition(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (
            OrderStatus::Ordered,
            OrderStatus::InProgress | OrderStatus::Cancelled
        ) | (
            OrderStatus::InProgress,
            OrderStatus::Completed | OrderStatus::Cancelled
        ) | (OrderStatus::Completed, OrderStatus::ReviewCompleted)
    )
}

/// Moves an order to `target`.
///
/// Reaching `COMPLETED` records today as the completion date unless one was
/// already entered.
#[instrument(skip(db, admin))]
pub async fn change_order_status(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    order_id: i64,
    target: OrderStatus,
) -> Result<order::Model> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let current = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if !is_allowed_transition(current.order_status, target) {
        return Err(Error::InvalidTransition {
            entity: "order",
            from: current.order_status.to_value(),
            to: target.to_value(),
        });
    }

    let mut update = Order::update_many()
        .col_expr(order::Column::OrderStatus, Expr::value(target))
        .col_expr(order::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(order::Column::Id.eq(order_id))
        .filter(order::Column::OrderStatus.eq(current.order_status));
    if target == OrderStatus::Completed && current.completion_date.is_none() {
        update = update.col_expr(
            order::Column::CompletionDate,
            Expr::value(Utc::now().date_naive()),
        );
    }
    let result = update.exec(&txn).await?;
    if result.rows_affected != 1 {
        return Err(Error::InvalidTransition {
            entity: "order",
            from: current.order_status.to_value(),
            to: target.to_value(),
        });
    }

    let updated = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        order_id,
        from = %current.order_status.to_value(),
        to = %target.to_value(),
        "Order status changed"
    );
    Ok(updated)
}

/// Replaces the schedule and memos of an order.
pub async fn update_order_schedule(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    order_id: i64,
    schedule: OrderSchedule,
) -> Result<order::Model> {
    let admin = require_admin(admin)?;

    if let Some((start, end)) = schedule
        .construction_start_date
        .zip(schedule.construction_end_date)
        .filter(|(start, end)| start > end)
    {
        return Err(Error::invalid_value(
            "construction period",
            format!("{start} > {end}"),
        ));
    }

    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let mut order: order::ActiveModel = order.into();
    order.construction_start_date = Set(schedule.construction_start_date);
    order.construction_end_date = Set(schedule.construction_end_date);
    order.completion_date = Set(schedule.completion_date);
    order.partner_memo = Set(schedule.partner_memo);
    order.admin_memo = Set(schedule.admin_memo);
    order.updated_at = Set(Utc::now());
    let updated = order.update(db).await?;

    info!(admin_id = admin.admin_id, order_id, "Order schedule updated");
    Ok(updated)
}

/// Mints a review link for the customer behind a completed order.
///
/// Issuing again replaces the previous token.
#[instrument(skip(db, admin, settings))]
pub async fn issue_review_link(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    order_id: i64,
    settings: &ReviewSettings,
) -> Result<ReviewLink> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;
    if order.order_status != OrderStatus::Completed {
        return Err(Error::InvalidTransition {
            entity: "order",
            from: order.order_status.to_value(),
            to: "REVIEW_LINK_ISSUED".to_string(),
        });
    }

    let quotation = Quotation::find_by_id(order.quotation_id)
        .one(&txn)
        .await?
        .ok_or(Error::QuotationNotFound {
            id: order.quotation_id,
        })?;
    let diagnosis = DiagnosisRequest::find_by_id(quotation.diagnosis_request_id)
        .one(&txn)
        .await?
        .ok_or(Error::DiagnosisNotFound {
            id: quotation.diagnosis_request_id,
        })?;
    let customer = Customer::find_by_id(diagnosis.customer_id)
        .one(&txn)
        .await?
        .ok_or(Error::CustomerNotFound {
            id: diagnosis.customer_id,
        })?;

    let token = generate_token();
    let expires_at = Utc::now()
        .checked_add_signed(settings.ttl()?)
        .ok_or_else(|| Error::invalid_value("review token ttl", settings.token_ttl_days.to_string()))?;

    let mut customer: customer::ActiveModel = customer.into();
    customer.review_token = Set(Some(token.clone()));
    customer.review_token_expires_at = Set(Some(expires_at));
    customer.update(&txn).await?;

    txn.commit().await?;

    info!(admin_id = admin.admin_id, order_id, "Review link issued");
    Ok(ReviewLink {
        url: format!("{}/review/{token}", settings.base_url.trim_end_matches('/')),
        token,
        expires_at,
    })
}

/// Lists orders with their quotation, diagnosis code and partner, newest first.
pub async fn list_orders(
    db: &DatabaseConnection,
    status: Option<OrderStatus>,
) -> Result<Vec<OrderOverview>> {
    let mut query = Order::find().find_also_related(Quotation);
    if let Some(status) = status {
        query = query.filter(order::Column::OrderStatus.eq(status));
    }
    let rows = query
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    let diagnosis_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, q)| q.as_ref().map(|q| q.diagnosis_request_id))
        .collect();
    let partner_ids: Vec<i64> = rows
        .iter()
        .filter_map(|(_, q)| q.as_ref().map(|q| q.partner_id))
        .collect();

    let codes: HashMap<i64, Option<String>> = DiagnosisRequest::find()
        .filter(diagnosis_request::Column::Id.is_in(diagnosis_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.diagnosis_code))
        .collect();
    let companies: HashMap<i64, String> = PartnerDetail::find()
        .filter(partner_detail::Column::PartnerId.is_in(partner_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|detail| (detail.partner_id, detail.company_name))
        .collect();

    Ok(rows
        .into_iter()
        .filter_map(|(order, quotation)| {
            let quotation = quotation?;
            Some(OrderOverview {
                diagnosis_code: codes
                    .get(&quotation.diagnosis_request_id)
                    .cloned()
                    .flatten(),
                partner_company: companies.get(&quotation.partner_id).cloned(),
                order,
                quotation,
            })
        })
        .collect())
}
