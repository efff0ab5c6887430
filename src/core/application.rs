//! Partner application review and provisioning.
//!
//! Contractors apply through the public site; admins review each application.
//! `reviewed_by` and `reviewed_at` are set exactly when the status is not
//! `UNDER_REVIEW`. Approving with [`approve_and_provision`] also creates the
//! partner account in the same transaction, and the partner remembers which
//! application it came from.

use crate::{
    core::{
        auth::{AdminIdentity, require_admin},
        partner::{PartnerCredentials, PartnerProfile, PartnerProfileInput, insert_partner},
    },
    entities::{
        Partner, PartnerApplication, PartnerApplicationPrefecture, partner, partner_application,
        partner_application_prefecture,
        status::{ApplicationStatus, Prefecture},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// A contractor's application as submitted.
#[derive(Debug, Clone, Default)]
pub struct ApplicationSubmission {
    /// Company name
    pub company_name: String,
    /// Representative's name
    pub representative_name: String,
    /// Head office address
    pub address: String,
    /// Contact phone number
    pub phone_number: String,
    /// Contact email
    pub email: String,
    /// Company website
    pub website_url: Option<String>,
    /// What the company does
    pub business_description: String,
    /// Self-introduction
    pub self_pr: String,
    /// Prefectures the company wants to serve
    pub service_areas: Vec<Prefecture>,
}

/// Result of a review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationReview {
    /// The reviewed application
    pub application_id: i64,
    /// Its new status
    pub status: ApplicationStatus,
    /// Reviewing admin; `None` once back under review
    pub reviewed_by: Option<i64>,
    /// Review time; `None` once back under review
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// An application with its requested service areas.
#[derive(Debug, Clone)]
pub struct ApplicationDetail {
    /// The application row
    pub application: partner_application::Model,
    /// Requested prefectures
    pub service_areas: Vec<Prefecture>,
}

/// What the admin supplies on top of the application when provisioning.
#[derive(Debug, Clone, Default)]
pub struct PartnerProvisioning {
    /// Login email; defaults to the application's contact email
    pub login_email: Option<String>,
    /// Already-hashed initial password
    pub password_hash: String,
    /// Customer-facing pitch; defaults to the application's self-introduction
    pub appeal_text: Option<String>,
    /// Opening hours
    pub business_hours: Option<String>,
    /// Closing days
    pub closed_days: Option<String>,
    /// Supported prefectures; defaults to the requested service areas
    pub prefectures: Option<Vec<Prefecture>>,
    /// Whether the partner is shown immediately
    pub visible: bool,
}

/// Outcome of [`approve_and_provision`].
#[derive(Debug, Clone)]
pub struct ProvisionedPartner {
    /// The approval
    pub review: ApplicationReview,
    /// The new partner
    pub partner: PartnerProfile,
}

/// Records a new application in `UNDER_REVIEW`.
pub async fn submit_application(
    db: &DatabaseConnection,
    submission: ApplicationSubmission,
) -> Result<partner_application::Model> {
    if submission.company_name.trim().is_empty() {
        return Err(Error::invalid_value("company name", submission.company_name));
    }
    if !submission.email.contains('@') {
        return Err(Error::invalid_value("email", submission.email));
    }

    let txn = db.begin().await?;
    let now = Utc::now();
    let application = partner_application::ActiveModel {
        company_name: Set(submission.company_name.trim().to_string()),
        representative_name: Set(submission.representative_name),
        address: Set(submission.address),
        phone_number: Set(submission.phone_number),
        email: Set(submission.email),
        website_url: Set(submission.website_url),
        business_description: Set(submission.business_description),
        self_pr: Set(submission.self_pr),
        admin_memo: Set(None),
        review_notes: Set(None),
        application_status: Set(ApplicationStatus::UnderReview),
        reviewed_by: Set(None),
        reviewed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut seen: Vec<Prefecture> = Vec::new();
    for prefecture in submission.service_areas {
        if seen.contains(&prefecture) {
            continue;
        }
        partner_application_prefecture::ActiveModel {
            application_id: Set(application.id),
            supported_prefecture: Set(prefecture),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        seen.push(prefecture);
    }
    txn.commit().await?;

    info!(application_id = application.id, "Partner application submitted");
    Ok(application)
}

/// Gets an application with its service areas.
pub async fn get_application(
    db: &DatabaseConnection,
    application_id: i64,
) -> Result<Option<ApplicationDetail>> {
    let Some(application) = PartnerApplication::find_by_id(application_id)
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    let service_areas = service_areas(db, application_id).await?;
    Ok(Some(ApplicationDetail {
        application,
        service_areas,
    }))
}

/// Lists applications, newest first, optionally filtered by status.
pub async fn list_applications(
    db: &DatabaseConnection,
    status: Option<ApplicationStatus>,
) -> Result<Vec<partner_application::Model>> {
    let mut query = PartnerApplication::find();
    if let Some(status) = status {
        query = query.filter(partner_application::Column::ApplicationStatus.eq(status));
    }
    Ok(query
        .order_by_desc(partner_application::Column::CreatedAt)
        .order_by_desc(partner_application::Column::Id)
        .all(db)
        .await?)
}

async fn service_areas<C>(conn: &C, application_id: i64) -> Result<Vec<Prefecture>>
where
    C: ConnectionTrait,
{
    Ok(PartnerApplicationPrefecture::find()
        .filter(partner_application_prefecture::Column::ApplicationId.eq(application_id))
        .order_by_asc(partner_application_prefecture::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.supported_prefecture)
        .collect())
}

async fn provisioned_partner<C>(conn: &C, application_id: i64) -> Result<Option<partner::Model>>
where
    C: ConnectionTrait,
{
    Ok(Partner::find()
        .filter(partner::Column::ApplicationId.eq(application_id))
        .one(conn)
        .await?)
}

/// Writes the review fields. Shared by both review entry points.
async fn apply_review<C>(
    conn: &C,
    application: partner_application::Model,
    target: ApplicationStatus,
    reviewer_id: i64,
) -> Result<ApplicationReview>
where
    C: ConnectionTrait,
{
    let (reviewed_by, reviewed_at) = if target == ApplicationStatus::UnderReview {
        (None, None)
    } else {
        (Some(reviewer_id), Some(Utc::now()))
    };

    let application_id = application.id;
    let mut active: partner_application::ActiveModel = application.into();
    active.application_status = Set(target);
    active.reviewed_by = Set(reviewed_by);
    active.reviewed_at = Set(reviewed_at);
    active.updated_at = Set(Utc::now());
    active.update(conn).await?;

    Ok(ApplicationReview {
        application_id,
        status: target,
        reviewed_by,
        reviewed_at,
    })
}

/// Sets the review status of an application.
///
/// Any status may follow any other, so a decision can be revised. Once a
/// partner has been provisioned from the application it stays `APPROVED`.
#[instrument(skip(db, admin))]
pub async fn review_application(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    application_id: i64,
    target: ApplicationStatus,
) -> Result<ApplicationReview> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let application = PartnerApplication::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    if target != ApplicationStatus::Approved
        && provisioned_partner(&txn, application_id).await?.is_some()
    {
        return Err(Error::InvalidTransition {
            entity: "partner application",
            from: application.application_status.to_value(),
            to: target.to_value(),
        });
    }

    let review = apply_review(&txn, application, target, admin.admin_id).await?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        application_id,
        status = %target.to_value(),
        "Partner application reviewed"
    );
    if target == ApplicationStatus::Approved {
        warn!(
            application_id,
            "Application approved without provisioning a partner"
        );
    }
    Ok(review)
}

/// Approves an application and creates its partner account in one step.
///
/// The partner's profile is pre-filled from the application. Either the
/// approval and every partner row are stored, or nothing is.
///
/// # Errors
/// [`Error::ApplicationAlreadyProvisioned`] when a partner already exists for
/// the application.
#[instrument(skip(db, admin, provisioning))]
pub async fn approve_and_provision(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    application_id: i64,
    provisioning: PartnerProvisioning,
) -> Result<ProvisionedPartner> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let application = PartnerApplication::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    if let Some(existing) = provisioned_partner(&txn, application_id).await? {
        return Err(Error::ApplicationAlreadyProvisioned {
            application_id,
            partner_id: existing.id,
        });
    }

    let prefectures = match provisioning.prefectures {
        Some(prefectures) => prefectures,
        None => service_areas(&txn, application_id).await?,
    };
    let credentials = PartnerCredentials {
        login_email: provisioning
            .login_email
            .unwrap_or_else(|| application.email.clone()),
        password_hash: provisioning.password_hash,
    };
    let profile = PartnerProfileInput {
        company_name: application.company_name.clone(),
        phone_number: application.phone_number.clone(),
        address: application.address.clone(),
        representative_name: application.representative_name.clone(),
        website_url: application.website_url.clone(),
        business_description: application.business_description.clone(),
        appeal_text: provisioning
            .appeal_text
            .unwrap_or_else(|| application.self_pr.clone()),
        business_hours: provisioning.business_hours,
        closed_days: provisioning.closed_days,
        prefectures,
    };

    let review = apply_review(
        &txn,
        application,
        ApplicationStatus::Approved,
        admin.admin_id,
    )
    .await?;
    let partner = insert_partner(
        &txn,
        credentials,
        profile,
        provisioning.visible,
        Some(application_id),
    )
    .await?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        application_id,
        partner_id = partner.partner.id,
        "Application approved and partner provisioned"
    );
    Ok(ProvisionedPartner { review, partner })
}

/// Approved applications that no partner was provisioned from.
pub async fn list_unprovisioned_approvals(
    db: &DatabaseConnection,
) -> Result<Vec<partner_application::Model>> {
    let provisioned: Vec<i64> = Partner::find()
        .filter(partner::Column::ApplicationId.is_not_null())
        .all(db)
        .await?
        .into_iter()
        .filter_map(|partner| partner.application_id)
        .collect();

    Ok(PartnerApplication::find()
        .filter(partner_application::Column::ApplicationStatus.eq(ApplicationStatus::Approved))
        .filter(partner_application::Column::Id.is_not_in(provisioned))
        .order_by_asc(partner_application::Column::Id)
        .all(db)
        .await?)
}

/// Replaces the admin memo and review notes of an application.
pub async fn update_application_notes(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    application_id: i64,
    admin_memo: Option<String>,
    review_notes: Option<String>,
) -> Result<partner_application::Model> {
    require_admin(admin)?;

    let application = PartnerApplication::find_by_id(application_id)
        .one(db)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    let mut active: partner_application::ActiveModel = application.into();
    active.admin_memo = Set(admin_memo);
    active.review_notes = Set(review_notes);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Permanently deletes an application and its service areas.
pub async fn delete_application(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    application_id: i64,
) -> Result<()> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    PartnerApplication::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    PartnerApplicationPrefecture::delete_many()
        .filter(partner_application_prefecture::Column::ApplicationId.eq(application_id))
        .exec(&txn)
        .await?;
    PartnerApplication::delete_by_id(application_id)
        .exec(&txn)
        .await?;
    txn.commit().await?;

    info!(admin_id = admin.admin_id, application_id, "Partner application deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::*;
    use sea_orm::PaginatorTrait;

    fn provisioning() -> PartnerProvisioning {
        PartnerProvisioning {
            password_hash: "hashed".to_string(),
            visible: true,
            ..PartnerProvisioning::default()
        }
    }

    #[tokio::test]
    async fn test_review_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let application = create_test_application(&db, "東塗装").await?;
        let first = AdminIdentity {
            admin_id: 7,
            ..test_identity()
        };
        let second = AdminIdentity {
            admin_id: 8,
            ..test_identity()
        };

        let approved =
            review_application(&db, Some(&first), application.id, ApplicationStatus::Approved)
                .await?;
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert_eq!(approved.reviewed_by, Some(7));
        let approved_at = approved.reviewed_at.unwrap();

        let rejected =
            review_application(&db, Some(&second), application.id, ApplicationStatus::Rejected)
                .await?;
        assert_eq!(rejected.status, ApplicationStatus::Rejected);
        assert_eq!(rejected.reviewed_by, Some(8));
        assert!(rejected.reviewed_at.unwrap() >= approved_at);

        let stored = PartnerApplication::find_by_id(application.id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(stored.application_status, ApplicationStatus::Rejected);
        assert_eq!(stored.reviewed_by, Some(8));
        assert!(stored.reviewed_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_back_under_review_clears_reviewer() -> Result<()> {
        let db = setup_test_db().await?;
        let application = create_test_application(&db, "西塗装").await?;
        let admin = test_identity();

        review_application(&db, Some(&admin), application.id, ApplicationStatus::Rejected).await?;
        let reopened =
            review_application(&db, Some(&admin), application.id, ApplicationStatus::UnderReview)
                .await?;
        assert_eq!(reopened.reviewed_by, None);
        assert_eq!(reopened.reviewed_at, None);

        let stored = PartnerApplication::find_by_id(application.id)
            .one(&db)
            .await?
            .unwrap();
        assert!(stored.reviewed_by.is_none());
        assert!(stored.reviewed_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_review_requires_admin_and_existing_application() -> Result<()> {
        let db = setup_test_db().await?;
        let application = create_test_application(&db, "南塗装").await?;

        let err = review_application(&db, None, application.id, ApplicationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        let err = review_application(&db, Some(&test_identity()), 404, ApplicationStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_and_provision_prefills_partner() -> Result<()> {
        let db = setup_test_db().await?;
        let application = create_test_application(&db, "中央塗装").await?;
        let admin = test_identity();

        let provisioned =
            approve_and_provision(&db, Some(&admin), application.id, provisioning()).await?;
        assert_eq!(provisioned.review.status, ApplicationStatus::Approved);
        assert_eq!(provisioned.review.reviewed_by, Some(admin.admin_id));

        let partner = &provisioned.partner;
        assert_eq!(partner.partner.application_id, Some(application.id));
        assert_eq!(partner.partner.login_email, application.email);
        assert_eq!(partner.company_name(), Some("中央塗装"));
        assert_eq!(
            partner.prefectures,
            vec![Prefecture::Tokyo, Prefecture::Kanagawa]
        );
        assert_eq!(partner.detail.as_ref().unwrap().appeal_text, application.self_pr);

        assert!(list_unprovisioned_approvals(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_second_provisioning_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let application = create_test_application(&db, "重複塗装").await?;
        let admin = test_identity();

        let first = approve_and_provision(&db, Some(&admin), application.id, provisioning()).await?;
        let err = approve_and_provision(
            &db,
            Some(&admin),
            application.id,
            PartnerProvisioning {
                login_email: Some("other@example.com".to_string()),
                ..provisioning()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ApplicationAlreadyProvisioned { partner_id, .. } if partner_id == first.partner.partner.id
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(Partner::find().count(&db).await?, 1);

        // A provisioned application cannot be rejected afterwards
        let err = review_application(&db, Some(&admin), application.id, ApplicationStatus::Rejected)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_provisioning_leaves_application_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        let taken = create_test_partner(&db, "taken").await?;
        let application = create_test_application(&db, "衝突塗装").await?;

        // Login email collides with an existing partner
        let err = approve_and_provision(
            &db,
            Some(&test_identity()),
            application.id,
            PartnerProvisioning {
                login_email: Some(taken.login_email.clone()),
                ..provisioning()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let stored = PartnerApplication::find_by_id(application.id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(stored.application_status, ApplicationStatus::UnderReview);
        assert!(stored.reviewed_by.is_none());
        assert_eq!(Partner::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unprovisioned_approvals_are_listed() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = test_identity();
        let manual = create_test_application(&db, "手動塗装").await?;
        let pending = create_test_application(&db, "保留塗装").await?;

        review_application(&db, Some(&admin), manual.id, ApplicationStatus::Approved).await?;

        let gaps = list_unprovisioned_approvals(&db).await?;
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].id, manual.id);

        let under_review = list_applications(&db, Some(ApplicationStatus::UnderReview)).await?;
        assert_eq!(under_review.len(), 1);
        assert_eq!(under_review[0].id, pending.id);

        approve_and_provision(&db, Some(&admin), manual.id, provisioning()).await?;
        assert!(list_unprovisioned_approvals(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_notes_and_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = test_identity();
        let application = create_test_application(&db, "削除塗装").await?;

        let noted = update_application_notes(
            &db,
            Some(&admin),
            application.id,
            Some("電話確認済み".to_string()),
            Some("施工実績を確認".to_string()),
        )
        .await?;
        assert_eq!(noted.admin_memo.as_deref(), Some("電話確認済み"));

        let detail = get_application(&db, application.id).await?.unwrap();
        assert_eq!(detail.service_areas.len(), 2);

        delete_application(&db, Some(&admin), application.id).await?;
        assert!(get_application(&db, application.id).await?.is_none());
        assert_eq!(PartnerApplicationPrefecture::find().count(&db).await?, 0);

        let err = delete_application(&db, Some(&admin), application.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ApplicationNotFound { .. }));
        Ok(())
    }
}
