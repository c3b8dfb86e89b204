//! Nightly archival of past-day bookings.
//!
//! Once per day, at the calendar's run time in its timezone, every booking
//! whose day is before the current day moves to the archive table. A pass
//! also runs at startup so bookings left behind while the server was down
//! are archived before the first scheduled run.

use slotbook_core::calendar::BookingCalendar;
use slotbook_db::repositories::BookingRepo;
use slotbook_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Run the archival schedule until `cancel` is triggered.
///
/// A failed pass is logged and retried at the next scheduled run.
pub async fn run(pool: DbPool, calendar: BookingCalendar, cancel: CancellationToken) {
    tracing::info!(
        timezone = %calendar.timezone(),
        run_at = %calendar.run_at(),
        "Archival job started"
    );

    let _ = run_once(&pool, &calendar).await;

    loop {
        let wait = calendar.until_next_run(chrono::Utc::now());
        tracing::debug!(wait_secs = wait.as_secs(), "Archival: next run scheduled");

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Archival job stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                let _ = run_once(&pool, &calendar).await;
            }
        }
    }
}

/// Archive every booking dated before the calendar's current day.
///
/// Returns how many bookings were moved. Errors are logged before being
/// returned so scheduled callers can ignore them.
pub async fn run_once(pool: &DbPool, calendar: &BookingCalendar) -> Result<u64, sqlx::Error> {
    let today = calendar.today();
    match BookingRepo::archive_before(pool, today).await {
        Ok(archived) => {
            if archived > 0 {
                tracing::info!(archived, %today, "Archival: moved past bookings");
            } else {
                tracing::debug!(%today, "Archival: nothing to archive");
            }
            Ok(archived)
        }
        Err(e) => {
            tracing::error!(error = %e, %today, "Archival: pass failed");
            Err(e)
        }
    }
}
