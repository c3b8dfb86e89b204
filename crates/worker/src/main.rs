//! One-shot archival pass for deployments that schedule it externally
//! (cron, a Kubernetes CronJob) and run the API with `ARCHIVE_ENABLED=false`.

use anyhow::Context;
use slotbook_core::calendar::BookingCalendar;
use slotbook_core::types::Day;
use slotbook_db::repositories::BookingRepo;
use slotbook_db::{DbConfig, DbPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotbook_worker=debug,slotbook_db=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let calendar = BookingCalendar::from_env().context("Invalid calendar configuration")?;
    let database = DbConfig::from_env().context("Invalid database configuration")?;

    let pool = slotbook_db::create_pool(&database)
        .await
        .context("Failed to connect to database")?;
    slotbook_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let today = calendar.today();
    let result = archive(&pool, today).await;
    pool.close().await;

    let (archived, active, total_archived) = result?;
    tracing::info!(
        archived,
        active,
        total_archived,
        %today,
        timezone = %calendar.timezone(),
        "Archival pass complete"
    );
    Ok(())
}

/// Run one pass and report the table sizes afterwards.
async fn archive(pool: &DbPool, today: Day) -> anyhow::Result<(u64, i64, i64)> {
    let archived = BookingRepo::archive_before(pool, today)
        .await
        .context("Archival pass failed")?;
    let (active, total_archived) = BookingRepo::counts(pool)
        .await
        .context("Failed to count bookings")?;
    Ok((archived, active, total_archived))
}
