//! Admin identity and session lookup.
//!
//! Core operations never reach into ambient session state. Callers resolve the
//! current admin once per request with [`current_admin`] and pass the result
//! into every mutating operation, which gates on [`require_admin`]. Password
//! verification and cookie/JWT issuance belong to the HTTP layer.

use crate::{
    config::settings::AdminSeed,
    entities::{Admin, AdminSession, admin, admin_session, status::AdminRole},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// The authenticated administrator performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    /// Primary key of the admin account
    pub admin_id: i64,
    /// Login name
    pub username: String,
    /// Privilege level
    pub role: AdminRole,
}

impl From<&admin::Model> for AdminIdentity {
    fn from(model: &admin::Model) -> Self {
        Self {
            admin_id: model.id,
            username: model.username.clone(),
            role: model.role,
        }
    }
}

/// Per-request authentication input extracted by the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Value of the admin session cookie, if one was presented
    pub session_token: Option<String>,
}

impl RequestContext {
    /// A context carrying the given session token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
        }
    }
}

/// Rejects the call with [`Error::Unauthorized`] unless an admin is present.
pub fn require_admin(admin: Option<&AdminIdentity>) -> Result<&AdminIdentity> {
    admin.ok_or(Error::Unauthorized)
}

/// Generates a random 32-byte token, hex encoded.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Creates an active admin account.
pub async fn create_admin(
    db: &DatabaseConnection,
    username: String,
    email: String,
    role: AdminRole,
) -> Result<admin::Model> {
    if username.trim().is_empty() {
        return Err(Error::invalid_value("username", username));
    }

    let admin = admin::ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email),
        role: Set(role),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(admin.insert(db).await?)
}

/// Creates every seeded admin whose username does not exist yet.
///
/// Returns the number of accounts created.
pub async fn seed_admins(db: &DatabaseConnection, seeds: &[AdminSeed]) -> Result<usize> {
    let mut created = 0;
    for seed in seeds {
        let existing = Admin::find()
            .filter(admin::Column::Username.eq(seed.username.trim()))
            .one(db)
            .await?;
        if existing.is_some() {
            debug!(username = %seed.username, "Admin already present, skipping seed");
            continue;
        }
        create_admin(db, seed.username.clone(), seed.email.clone(), seed.role).await?;
        created += 1;
    }
    Ok(created)
}

/// Opens a session for an admin, replacing any session they already hold.
///
/// Records the login time on the admin account.
pub async fn open_admin_session(
    db: &DatabaseConnection,
    admin_id: i64,
    ttl: Duration,
) -> Result<admin_session::Model> {
    let txn = db.begin().await?;

    let admin = Admin::find_by_id(admin_id)
        .one(&txn)
        .await?
        .ok_or(Error::AdminNotFound { id: admin_id })?;
    if !admin.is_active {
        return Err(Error::Unauthorized);
    }

    AdminSession::delete_many()
        .filter(admin_session::Column::AdminId.eq(admin_id))
        .exec(&txn)
        .await?;

    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| Error::invalid_value("session ttl", ttl.to_string()))?;
    let session = admin_session::ActiveModel {
        admin_id: Set(admin_id),
        token: Set(generate_token()),
        expires_at: Set(expires_at),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut admin: admin::ActiveModel = admin.into();
    admin.last_login_at = Set(Some(now));
    admin.update(&txn).await?;

    txn.commit().await?;
    info!(admin_id, "Admin session opened");
    Ok(session)
}

/// Resolves the admin behind a request, or `None` when the request carries no
/// token, an unknown or expired token, or a token of a deactivated admin.
pub async fn current_admin(
    db: &DatabaseConnection,
    ctx: &RequestContext,
) -> Result<Option<AdminIdentity>> {
    let Some(token) = ctx.session_token.as_deref() else {
        return Ok(None);
    };

    let found = AdminSession::find()
        .filter(admin_session::Column::Token.eq(token))
        .filter(admin_session::Column::ExpiresAt.gt(Utc::now()))
        .find_also_related(Admin)
        .one(db)
        .await?;

    Ok(found
        .and_then(|(_, admin)| admin)
        .filter(|admin| admin.is_active)
        .map(|admin| AdminIdentity::from(&admin)))
}

/// Ends every session held by an admin. Returns how many were removed.
pub async fn close_admin_session(db: &DatabaseConnection, admin_id: i64) -> Result<u64> {
    let result = AdminSession::delete_many()
        .filter(admin_session::Column::AdminId.eq(admin_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes expired sessions. Returns how many were removed.
pub async fn purge_expired_sessions(db: &DatabaseConnection) -> Result<u64> {
    let result = AdminSession::delete_many()
        .filter(admin_session::Column::ExpiresAt.lt(Utc::now()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
