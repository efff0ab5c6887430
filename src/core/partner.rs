//! Partner account management.
//!
//! A partner is an account row, a detail row holding the public company
//! profile, and a set of supported prefectures. Visibility is stored twice
//! (`partners.is_active` and `partner_details.partners_status`) and every write
//! here changes both together. Credential hashing happens upstream; this module
//! only stores the hash it is given.

use crate::{
    core::auth::{AdminIdentity, require_admin},
    entities::{
        Partner, PartnerDetail, PartnerPrefecture, Quotation, partner, partner_detail,
        partner_prefecture, quotation,
        status::{PartnerDetailStatus, Prefecture},
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

const DEFAULT_BUSINESS_HOURS: &str = "9:00-18:00";
const DEFAULT_CLOSED_DAYS: &str = "日曜・祝日";

/// Login credentials of a partner account.
#[derive(Debug, Clone)]
pub struct PartnerCredentials {
    /// Login email, unique across partners
    pub login_email: String,
    /// Already-hashed password
    pub password_hash: String,
}

/// Public company profile of a partner.
#[derive(Debug, Clone, Default)]
pub struct PartnerProfileInput {
    /// Company name
    pub company_name: String,
    /// Contact phone number
    pub phone_number: String,
    /// Head office address
    pub address: String,
    /// Representative's name
    pub representative_name: String,
    /// Company website
    pub website_url: Option<String>,
    /// What the company does
    pub business_description: String,
    /// Sales pitch shown to customers
    pub appeal_text: String,
    /// Opening hours; defaults to 9:00-18:00
    pub business_hours: Option<String>,
    /// Closing days; defaults to Sundays and holidays
    pub closed_days: Option<String>,
    /// Prefectures the partner works in
    pub prefectures: Vec<Prefecture>,
}

/// Changes applied by [`update_partner`].
#[derive(Debug, Clone, Default)]
pub struct PartnerUpdate {
    /// New login email
    pub login_email: Option<String>,
    /// New password hash
    pub password_hash: Option<String>,
    /// Replacement profile; prefectures are replaced as a set
    pub profile: PartnerProfileInput,
}

/// A partner with its detail row and supported prefectures.
#[derive(Debug, Clone)]
pub struct PartnerProfile {
    /// The account row
    pub partner: partner::Model,
    /// The company profile
    pub detail: Option<partner_detail::Model>,
    /// Supported prefectures
    pub prefectures: Vec<Prefecture>,
}

impl PartnerProfile {
    /// Company name from the detail row, if any.
    #[must_use]
    pub fn company_name(&self) -> Option<&str> {
        self.detail.as_ref().map(|detail| detail.company_name.as_str())
    }
}

fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn validate_profile(credentials_email: Option<&str>, profile: &PartnerProfileInput) -> Result<()> {
    if let Some(email) = credentials_email.filter(|email| !email.contains('@')) {
        return Err(Error::invalid_value("login email", email));
    }
    if profile.company_name.trim().is_empty() {
        return Err(Error::invalid_value("company name", &*profile.company_name));
    }
    Ok(())
}

/// Inserts the account, detail and prefecture rows of a new partner.
///
/// Shared with application provisioning, which runs it inside its own
/// transaction.
pub(crate) async fn insert_partner<C>(
    conn: &C,
    credentials: PartnerCredentials,
    profile: PartnerProfileInput,
    visible: bool,
    application_id: Option<i64>,
) -> Result<PartnerProfile>
where
    C: ConnectionTrait,
{
    validate_profile(Some(&credentials.login_email), &profile)?;

    let now = Utc::now();
    let partner = partner::ActiveModel {
        username: Set(username_from_email(&credentials.login_email)),
        login_email: Set(credentials.login_email),
        password_hash: Set(credentials.password_hash),
        is_active: Set(visible),
        application_id: Set(application_id),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let detail = partner_detail::ActiveModel {
        partner_id: Set(partner.id),
        company_name: Set(profile.company_name.trim().to_string()),
        phone_number: Set(profile.phone_number),
        address: Set(profile.address),
        representative_name: Set(profile.representative_name),
        website_url: Set(profile.website_url),
        business_description: Set(profile.business_description),
        appeal_text: Set(profile.appeal_text),
        business_hours: Set(profile
            .business_hours
            .unwrap_or_else(|| DEFAULT_BUSINESS_HOURS.to_string())),
        closed_days: Set(profile
            .closed_days
            .unwrap_or_else(|| DEFAULT_CLOSED_DAYS.to_string())),
        partners_status: Set(PartnerDetailStatus::from_visibility(visible)),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let prefectures = replace_prefectures(conn, partner.id, profile.prefectures).await?;

    Ok(PartnerProfile {
        partner,
        detail: Some(detail),
        prefectures,
    })
}

async fn replace_prefectures<C>(
    conn: &C,
    partner_id: i64,
    prefectures: Vec<Prefecture>,
) -> Result<Vec<Prefecture>>
where
    C: ConnectionTrait,
{
    PartnerPrefecture::delete_many()
        .filter(partner_prefecture::Column::PartnerId.eq(partner_id))
        .exec(conn)
        .await?;

    let mut kept: Vec<Prefecture> = Vec::with_capacity(prefectures.len());
    for prefecture in prefectures {
        if kept.contains(&prefecture) {
            continue;
        }
        partner_prefecture::ActiveModel {
            partner_id: Set(partner_id),
            supported_prefecture: Set(prefecture),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        kept.push(prefecture);
    }
    Ok(kept)
}

async fn load_profile<C>(conn: &C, partner_id: i64) -> Result<Option<PartnerProfile>>
where
    C: ConnectionTrait,
{
    let Some(partner) = Partner::find_by_id(partner_id).one(conn).await? else {
        return Ok(None);
    };

    let detail = PartnerDetail::find()
        .filter(partner_detail::Column::PartnerId.eq(partner_id))
        .one(conn)
        .await?;
    let prefectures = PartnerPrefecture::find()
        .filter(partner_prefecture::Column::PartnerId.eq(partner_id))
        .order_by_asc(partner_prefecture::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|row| row.supported_prefecture)
        .collect();

    Ok(Some(PartnerProfile {
        partner,
        detail,
        prefectures,
    }))
}

/// Creates a partner directly, without an application.
#[instrument(skip(db, admin, credentials, profile))]
pub async fn create_partner(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    credentials: PartnerCredentials,
    profile: PartnerProfileInput,
    visible: bool,
) -> Result<PartnerProfile> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let created = insert_partner(&txn, credentials, profile, visible, None).await?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        partner_id = created.partner.id,
        "Partner created"
    );
    Ok(created)
}

/// Gets a partner with its detail row and prefectures.
pub async fn get_partner_profile(
    db: &DatabaseConnection,
    partner_id: i64,
) -> Result<Option<PartnerProfile>> {
    load_profile(db, partner_id).await
}

/// Replaces a partner's profile and prefectures, and optionally credentials.
///
/// Visibility is left untouched; see [`set_partner_visibility`].
pub async fn update_partner(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    partner_id: i64,
    update: PartnerUpdate,
) -> Result<PartnerProfile> {
    let admin = require_admin(admin)?;
    validate_profile(update.login_email.as_deref(), &update.profile)?;

    let txn = db.begin().await?;
    let partner = Partner::find_by_id(partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;
    let now = Utc::now();

    let mut account: partner::ActiveModel = partner.clone().into();
    if let Some(email) = update.login_email {
        account.username = Set(username_from_email(&email));
        account.login_email = Set(email);
    }
    if let Some(hash) = update.password_hash {
        account.password_hash = Set(hash);
    }
    account.updated_at = Set(now);
    account.update(&txn).await?;

    let profile = update.profile;
    let existing = PartnerDetail::find()
        .filter(partner_detail::Column::PartnerId.eq(partner_id))
        .one(&txn)
        .await?;
    let mut detail = match existing {
        Some(detail) => detail.into(),
        None => partner_detail::ActiveModel {
            partner_id: Set(partner_id),
            partners_status: Set(PartnerDetailStatus::from_visibility(partner.is_active)),
            ..Default::default()
        },
    };
    detail.company_name = Set(profile.company_name.trim().to_string());
    detail.phone_number = Set(profile.phone_number);
    detail.address = Set(profile.address);
    detail.representative_name = Set(profile.representative_name);
    detail.website_url = Set(profile.website_url);
    detail.business_description = Set(profile.business_description);
    detail.appeal_text = Set(profile.appeal_text);
    detail.business_hours = Set(profile
        .business_hours
        .unwrap_or_else(|| DEFAULT_BUSINESS_HOURS.to_string()));
    detail.closed_days = Set(profile
        .closed_days
        .unwrap_or_else(|| DEFAULT_CLOSED_DAYS.to_string()));
    detail.updated_at = Set(now);
    detail.save(&txn).await?;

    replace_prefectures(&txn, partner_id, profile.prefectures).await?;

    let updated = load_profile(&txn, partner_id)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;
    txn.commit().await?;

    info!(admin_id = admin.admin_id, partner_id, "Partner updated");
    Ok(updated)
}

/// Shows or hides a partner, flipping the account flag and the detail status
/// together.
pub async fn set_partner_visibility(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    partner_id: i64,
    visible: bool,
) -> Result<PartnerProfile> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    let partner = Partner::find_by_id(partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;
    let now = Utc::now();

    let mut account: partner::ActiveModel = partner.into();
    account.is_active = Set(visible);
    account.updated_at = Set(now);
    account.update(&txn).await?;

    PartnerDetail::update_many()
        .col_expr(
            partner_detail::Column::PartnersStatus,
            Expr::value(PartnerDetailStatus::from_visibility(visible)),
        )
        .col_expr(
            partner_detail::Column::UpdatedAt,
            Expr::value(now),
        )
        .filter(partner_detail::Column::PartnerId.eq(partner_id))
        .exec(&txn)
        .await?;

    let updated = load_profile(&txn, partner_id)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;
    txn.commit().await?;

    info!(admin_id = admin.admin_id, partner_id, visible, "Partner visibility changed");
    Ok(updated)
}

/// Deletes a partner together with its detail and prefecture rows.
///
/// # Errors
/// [`Error::PartnerHasQuotations`] while any quotation references the partner.
pub async fn delete_partner(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    partner_id: i64,
) -> Result<()> {
    let admin = require_admin(admin)?;

    let txn = db.begin().await?;
    Partner::find_by_id(partner_id)
        .one(&txn)
        .await?
        .ok_or(Error::PartnerNotFound { id: partner_id })?;

    let quotations = Quotation::find()
        .filter(quotation::Column::PartnerId.eq(partner_id))
        .count(&txn)
        .await?;
    if quotations > 0 {
        return Err(Error::PartnerHasQuotations {
            partner_id,
            quotations,
        });
    }

    PartnerPrefecture::delete_many()
        .filter(partner_prefecture::Column::PartnerId.eq(partner_id))
        .exec(&txn)
        .await?;
    PartnerDetail::delete_many()
        .filter(partner_detail::Column::PartnerId.eq(partner_id))
        .exec(&txn)
        .await?;
    Partner::delete_by_id(partner_id).exec(&txn).await?;
    txn.commit().await?;

    info!(admin_id = admin.admin_id, partner_id, "Partner deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_partner_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_partner(
            &db,
            Some(&test_identity()),
            PartnerCredentials {
                login_email: "info@aoba-paint.example".to_string(),
                password_hash: "hashed".to_string(),
            },
            PartnerProfileInput {
                company_name: "青葉塗装".to_string(),
                prefectures: vec![Prefecture::Tokyo, Prefecture::Tokyo, Prefecture::Saitama],
                ..PartnerProfileInput::default()
            },
            true,
        )
        .await?;

        assert_eq!(created.partner.username, "info");
        assert!(created.partner.is_active);
        assert!(created.partner.application_id.is_none());
        assert_eq!(created.company_name(), Some("青葉塗装"));
        assert_eq!(created.prefectures, vec![Prefecture::Tokyo, Prefecture::Saitama]);

        let detail = created.detail.unwrap();
        assert_eq!(detail.partners_status, PartnerDetailStatus::Active);
        assert_eq!(detail.business_hours, DEFAULT_BUSINESS_HOURS);

        let loaded = get_partner_profile(&db, created.partner.id).await?.unwrap();
        assert_eq!(loaded.prefectures.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_partner_requires_admin_and_valid_input() -> Result<()> {
        let db = setup_test_db().await?;
        let credentials = PartnerCredentials {
            login_email: "info@example.com".to_string(),
            password_hash: "hashed".to_string(),
        };

        let err = create_partner(
            &db,
            None,
            credentials.clone(),
            PartnerProfileInput::default(),
            true,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Unauthorized));

        let err = create_partner(
            &db,
            Some(&test_identity()),
            credentials,
            PartnerProfileInput::default(),
            true,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_partner_replaces_prefectures() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "kita").await?;

        let updated = update_partner(
            &db,
            Some(&test_identity()),
            partner.id,
            PartnerUpdate {
                login_email: Some("sales@kita.example".to_string()),
                password_hash: None,
                profile: PartnerProfileInput {
                    company_name: "北塗装工業".to_string(),
                    closed_days: Some("水曜".to_string()),
                    prefectures: vec![Prefecture::Hokkaido],
                    ..PartnerProfileInput::default()
                },
            },
        )
        .await?;

        assert_eq!(updated.partner.login_email, "sales@kita.example");
        assert_eq!(updated.partner.username, "sales");
        assert_eq!(updated.company_name(), Some("北塗装工業"));
        assert_eq!(updated.prefectures, vec![Prefecture::Hokkaido]);
        assert_eq!(updated.detail.unwrap().closed_days, "水曜");
        Ok(())
    }

    #[tokio::test]
    async fn test_visibility_flips_both_flags() -> Result<()> {
        let db = setup_test_db().await?;
        let partner = create_test_partner(&db, "minami").await?;
        let admin = test_identity();

        let hidden = set_partner_visibility(&db, Some(&admin), partner.id, false).await?;
        assert!(!hidden.partner.is_active);
        assert_eq!(
            hidden.detail.unwrap().partners_status,
            PartnerDetailStatus::Inactive
        );

        let shown = set_partner_visibility(&db, Some(&admin), partner.id, true).await?;
        assert!(shown.partner.is_active);
        assert_eq!(
            shown.detail.unwrap().partners_status,
            PartnerDetailStatus::Active
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_partner() -> Result<()> {
        let db = setup_test_db().await?;
        let admin = test_identity();
        let idle = create_test_partner(&db, "idle").await?;
        let busy = create_test_partner(&db, "busy").await?;
        let customer = create_test_customer(&db, "加藤").await?;
        let diagnosis = create_test_diagnosis(&db, customer.id).await?;
        create_test_quotation(&db, diagnosis.id, busy.id, 800_000).await?;

        delete_partner(&db, Some(&admin), idle.id).await?;
        assert!(get_partner_profile(&db, idle.id).await?.is_none());
        assert_eq!(
            PartnerPrefecture::find()
                .filter(partner_prefecture::Column::PartnerId.eq(idle.id))
                .count(&db)
                .await?,
            0
        );

        let err = delete_partner(&db, Some(&admin), busy.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::PartnerHasQuotations { quotations: 1, .. }
        ));

        let err = delete_partner(&db, Some(&admin), idle.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PartnerNotFound { .. }));
        Ok(())
    }
}
