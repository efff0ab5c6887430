//! Editorial columns for the marketing site.
//!
//! Admins write, edit, publish and remove columns. The admin screens show the
//! status as `表示`/`非表示`; see [`crate::core::vocabulary`] for the mapping.
//! Thumbnail upload is handled elsewhere; only the resulting URL is stored.

use crate::{
    core::auth::{AdminIdentity, require_admin},
    entities::{ColumnPost, column_post, status::ColumnStatus},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Categories offered by the column editor.
pub const COLUMN_CATEGORIES: [&str; 8] = [
    "外壁塗装の基礎知識",
    "塗料の種類と特徴",
    "施工事例",
    "メンテナンス",
    "業者選びのポイント",
    "費用・見積もり",
    "トラブル対処法",
    "季節・天候",
];

/// A new column.
#[derive(Debug, Clone)]
pub struct ColumnInput {
    /// Headline
    pub title: String,
    /// One of [`COLUMN_CATEGORIES`]
    pub category: String,
    /// HTML body
    pub content: String,
    /// Thumbnail image URL
    pub thumbnail_url: Option<String>,
    /// Initial publication state
    pub status: ColumnStatus,
}

/// A partial edit; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    /// New headline
    pub title: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New body
    pub content: Option<String>,
    /// New thumbnail; `Some(None)` clears it
    pub thumbnail_url: Option<Option<String>>,
    /// New publication state
    pub status: Option<ColumnStatus>,
}

/// Derives the URL slug for a title: every character outside `[a-zA-Z0-9]`
/// becomes `-`, then the result is lowercased.
#[must_use]
pub fn slugify(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid_value("column title", title));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if !COLUMN_CATEGORIES.contains(&category) {
        return Err(Error::invalid_value("column category", category));
    }
    Ok(())
}

/// First free slug among `base`, `base-2`, `base-3`, ...
async fn unique_slug<C>(conn: &C, base: &str) -> Result<String>
where
    C: ConnectionTrait,
{
    let mut candidate = base.to_string();
    let mut suffix = 1;
    while ColumnPost::find()
        .filter(column_post::Column::Slug.eq(candidate.as_str()))
        .count(conn)
        .await?
        > 0
    {
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }
    Ok(candidate)
}

/// Writes a new column with zero views.
///
/// # Errors
/// - [`Error::Unauthorized`] without an admin
/// - [`Error::InvalidValue`] for a blank title or an unknown category
#[instrument(skip(db, admin, input), fields(title = %input.title))]
pub async fn create_column(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    input: ColumnInput,
) -> Result<column_post::Model> {
    let admin = require_admin(admin)?;
    validate_title(&input.title)?;
    validate_category(&input.category)?;

    let txn = db.begin().await?;
    let slug = unique_slug(&txn, &slugify(&input.title)).await?;

    let now = Utc::now();
    let column = column_post::ActiveModel {
        title: Set(input.title),
        slug: Set(slug),
        category: Set(input.category),
        content: Set(input.content),
        thumbnail_url: Set(input.thumbnail_url),
        status: Set(input.status),
        views: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(
        admin_id = admin.admin_id,
        column_id = column.id,
        slug = %column.slug,
        "Column created"
    );
    Ok(column)
}

/// Gets a column by id.
pub async fn get_column(db: &DatabaseConnection, column_id: i64) -> Result<column_post::Model> {
    ColumnPost::find_by_id(column_id)
        .one(db)
        .await?
        .ok_or(Error::ColumnNotFound { id: column_id })
}

/// Lists columns, newest first, optionally filtered by category and status.
pub async fn list_columns(
    db: &DatabaseConnection,
    category: Option<&str>,
    status: Option<ColumnStatus>,
) -> Result<Vec<column_post::Model>> {
    let mut query = ColumnPost::find();
    if let Some(category) = category {
        query = query.filter(column_post::Column::Category.eq(category));
    }
    if let Some(status) = status {
        query = query.filter(column_post::Column::Status.eq(status));
    }
    Ok(query
        .order_by_desc(column_post::Column::CreatedAt)
        .order_by_desc(column_post::Column::Id)
        .all(db)
        .await?)
}

/// Applies a partial edit. The slug stays as it was created.
pub async fn update_column(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    column_id: i64,
    update: ColumnUpdate,
) -> Result<column_post::Model> {
    let admin = require_admin(admin)?;
    if let Some(title) = &update.title {
        validate_title(title)?;
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }

    let column = get_column(db, column_id).await?;
    let mut active: column_post::ActiveModel = column.into();
    if let Some(title) = update.title {
        active.title = Set(title);
    }
    if let Some(category) = update.category {
        active.category = Set(category);
    }
    if let Some(content) = update.content {
        active.content = Set(content);
    }
    if let Some(thumbnail_url) = update.thumbnail_url {
        active.thumbnail_url = Set(thumbnail_url);
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    info!(admin_id = admin.admin_id, column_id, "Column updated");
    Ok(updated)
}

/// Deletes a column.
pub async fn delete_column(
    db: &DatabaseConnection,
    admin: Option<&AdminIdentity>,
    column_id: i64,
) -> Result<()> {
    let admin = require_admin(admin)?;

    let deleted = ColumnPost::delete_by_id(column_id).exec(db).await?;
    if deleted.rows_affected == 0 {
        return Err(Error::ColumnNotFound { id: column_id });
    }

    info!(admin_id = admin.admin_id, column_id, "Column deleted");
    Ok(())
}
