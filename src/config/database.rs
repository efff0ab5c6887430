//! Database configuration module.
//!
//! This module handles database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Tables are created parents-first because
//! `SQLite` enforces the foreign keys declared on the relations.

use crate::entities::{
    Admin, AdminSession, ColumnPost, Customer, DiagnosisRequest, Inquiry, Order, Partner,
    PartnerApplication, PartnerApplicationPrefecture, PartnerDetail, PartnerPrefecture, Quotation,
    QuotationColumn,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/gaiheki.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// returns the default local `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
///
/// For a file-backed `SQLite` URL the parent directory is created first.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if let Some(dir) = sqlite_parent_dir(&database_url) {
        std::fs::create_dir_all(dir)?;
    }
    Database::connect(&database_url).await.map_err(Into::into)
}

fn sqlite_parent_dir(url: &str) -> Option<&Path> {
    let path = url.strip_prefix("sqlite://")?.split('?').next()?;
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables and the composite quotation index if they do not exist.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, &schema, Admin).await?;
    create_table(db, &schema, AdminSession).await?;
    create_table(db, &schema, Customer).await?;
    create_table(db, &schema, PartnerApplication).await?;
    create_table(db, &schema, PartnerApplicationPrefecture).await?;
    create_table(db, &schema, Partner).await?;
    create_table(db, &schema, PartnerDetail).await?;
    create_table(db, &schema, PartnerPrefecture).await?;
    create_table(db, &schema, DiagnosisRequest).await?;
    create_table(db, &schema, Quotation).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, Inquiry).await?;
    create_table(db, &schema, ColumnPost).await?;

    // One quotation per partner per diagnosis
    let quotation_pair = Index::create()
        .name("idx_quotations_diagnosis_partner")
        .table(Quotation)
        .col(QuotationColumn::DiagnosisRequestId)
        .col(QuotationColumn::PartnerId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&quotation_pair)).await?;

    Ok(())
}
