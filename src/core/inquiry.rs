//! Customer inquiries from the contact form.

use crate::{
    core::auth::{AdminIdentity, require_admin},
    entities::{Customer, Inquiry, inquiry, status::InquiryStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Records a new inquiry in `PENDING`.
pub async fn submit_inquiry(
    db: &DatabaseConnection,
    customer_id: i64,
    subject: String,
    content: String,
) -> Result<inquiry::Model> {
    if content.trim().is_empty() {
        return Err(Error::invalid_value("inquiry content", content));
    }

    Customer::find_by_id(customer_id)
        .one(db)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    let now = Utc::now();
    let inquiry = inquiry::ActiveModel {
        customer_id: Set(customer_id),
        subject: Set(subject),
        inquiry_content: Set(content),
        inquiry_status: Set(InquiryStatus::Pending),
        admin_memo: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(inquiry_id = inquiry.id, customer_id, "Inquiry received");
    Ok(inquiry)
}

/// Sets the handling status of an inquiry, optionally replacing the admin memo.
///
/// Inquiries may move freely between statuses; only a no-op write is rejected.
pub async fn change_inquiry_status(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    inquiry_id: i64,
    target: InquiryStatus,
    admin_memo: Option<String>,
) -> Result<inquiry::Model> {
    let admin = require_admin(admin)?;

    let inquiry = Inquiry::find_by_id(inquiry_id)
        .one(db)
        .await?
        .ok_or(Error::InquiryNotFound { id: inquiry_id })?;
    if inquiry.inquiry_status == target && admin_memo.is_none() {
        return Err(Error::InvalidTransition {
            entity: "inquiry",
            from: inquiry.inquiry_status.to_value(),
            to: target.to_value(),
        });
    }

    let mut active: inquiry::ActiveModel = inquiry.into();
    active.inquiry_status = Set(target);
    if admin_memo.is_some() {
        active.admin_memo = Set(admin_memo);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    info!(
        admin_id = admin.admin_id,
        inquiry_id,
        status = %target.to_value(),
        "Inquiry status changed"
    );
    Ok(updated)
}

/// Lists inquiries, newest first, optionally filtered by status.
pub async fn list_inquiries(
    db: &DatabaseConnection,
    status: Option<InquiryStatus>,
) -> Result<Vec<inquiry::Model>> {
    let mut query = Inquiry::find();
    if let Some(status) = status {
        query = query.filter(inquiry::Column::InquiryStatus.eq(status));
    }
    Ok(query
        .order_by_desc(inquiry::Column::CreatedAt)
        .order_by_desc(inquiry::Column::Id)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_inquiry_lifecycle() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = test_identity();
        let customer = create_test_customer(&db, "松本").await?;

        let inquiry = submit_inquiry(
            &db,
            customer.id,
            "見積もりについて".to_string(),
            "費用の内訳を知りたいです".to_string(),
        )
        .await?;
        assert_eq!(inquiry.inquiry_status, InquiryStatus::Pending);

        let handled = change_inquiry_status(
            &db,
            Some(&admin),
            inquiry.id,
            InquiryStatus::InProgress,
            Some("折り返し電話予定".to_string()),
        )
        .await?;
        assert_eq!(handled.inquiry_status, InquiryStatus::InProgress);
        assert_eq!(handled.admin_memo.as_deref(), Some("折り返し電話予定"));

        let err = change_inquiry_status(&db, Some(&admin), inquiry.id, InquiryStatus::InProgress, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));

        change_inquiry_status(&db, Some(&admin), inquiry.id, InquiryStatus::Completed, None).await?;
        let done = list_inquiries(&db, Some(InquiryStatus::Completed)).await?;
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].admin_memo.as_deref(), Some("折り返し電話予定"));
        assert!(list_inquiries(&db, Some(InquiryStatus::Pending)).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_inquiry_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "井上").await?;

        let err = submit_inquiry(&db, customer.id, String::new(), "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { .. }));

        let err = submit_inquiry(&db, 77, String::new(), "質問".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CustomerNotFound { id: 77 }));

        let err = change_inquiry_status(&db, None, 1, InquiryStatus::Completed, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        Ok(())
    }
}
