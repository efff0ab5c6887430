use dotenvy::dotenv;
use gaiheki_workflow::{
    config::{database, settings},
    core::{auth, report},
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load application settings
    let settings = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load settings: {}", e))?;
    info!(
        admins = settings.admins.len(),
        review_ttl_days = settings.review.token_ttl_days,
        "Settings loaded"
    );

    // 4. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed admin accounts
    let seeded = auth::seed_admins(&db, &settings.admins).await?;
    info!(seeded, "Admin accounts seeded");

    // 6. Drop sessions that expired while the service was down
    let purged = auth::purge_expired_sessions(&db).await?;
    info!(purged, "Expired admin sessions purged");

    // 7. Report where the pipeline stands
    let summary = report::pipeline_summary(&db).await?;
    info!("Pipeline summary:\n{}", report::format_pipeline_summary(&summary));

    Ok(())
}
