//! Repository for the `bookings` and `booking_archive` tables.
//!
//! Every query filters on the explicit `booking_day` column. Callers decide
//! which day "today" is.

use sqlx::PgPool;
use slotbook_core::types::{DbId, Day, Timestamp};

use crate::models::booking::{ArchivedBooking, Booking, NewBooking};

/// Column list shared by both tables.
const COLUMNS: &str = "\
    id, section_id, slot_number, full_name, place, mobile, \
    booking_date, booking_day, created_at";

/// Provides data access for active and archived bookings.
pub struct BookingRepo;

impl BookingRepo {
    // -----------------------------------------------------------------------
    // Active bookings
    // -----------------------------------------------------------------------

    /// Whether an active booking exists for the slot on `day`.
    pub async fn is_slot_booked(
        pool: &PgPool,
        section_id: i32,
        slot_number: i32,
        day: Day,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM bookings \
                 WHERE section_id = $1 AND slot_number = $2 AND booking_day = $3 \
             )",
        )
        .bind(section_id)
        .bind(slot_number)
        .bind(day)
        .fetch_one(pool)
        .await
    }

    /// Insert a booking created at `booking_date` for `booking_day`.
    ///
    /// Fails with a unique violation on [`crate::UQ_BOOKING_SLOT_DAY`] when
    /// the slot is already taken that day.
    pub async fn create(
        pool: &PgPool,
        input: &NewBooking,
        booking_date: Timestamp,
        booking_day: Day,
    ) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                 (section_id, slot_number, full_name, place, mobile, booking_date, booking_day) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.section_id)
            .bind(input.slot_number)
            .bind(&input.full_name)
            .bind(&input.place)
            .bind(&input.mobile)
            .bind(booking_date)
            .bind(booking_day)
            .fetch_one(pool)
            .await
    }

    /// All active bookings for `day`, ordered by section then slot.
    pub async fn list_for_day(pool: &PgPool, day: Day) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE booking_day = $1 \
             ORDER BY section_id, slot_number"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(day)
            .fetch_all(pool)
            .await
    }

    /// Find an active booking by ID.
    ///
    /// No route exposes this; it backs verification in tests and tooling.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Archive
    // -----------------------------------------------------------------------

    /// Move every booking with `booking_day < day` into `booking_archive`.
    ///
    /// Delete and copy are one statement, so both act on exactly the rows
    /// the delete removed; a row committed while the pass runs is either
    /// moved whole or left for the next pass. The copy skips ids already in
    /// the archive, so concurrent or repeated runs never duplicate rows.
    /// Returns the number of rows removed from `bookings`.
    pub async fn archive_before(pool: &PgPool, day: Day) -> Result<u64, sqlx::Error> {
        let query = format!(
            "WITH moved AS ( \
                 DELETE FROM bookings WHERE booking_day < $1 RETURNING {COLUMNS} \
             ), copied AS ( \
                 INSERT INTO booking_archive ({COLUMNS}) \
                 SELECT {COLUMNS} FROM moved ORDER BY id \
                 ON CONFLICT (id) DO NOTHING \
                 RETURNING id \
             ) \
             SELECT (SELECT COUNT(*) FROM moved), (SELECT COUNT(*) FROM copied)"
        );
        let (removed, copied) = sqlx::query_as::<_, (i64, i64)>(&query)
            .bind(day)
            .fetch_one(pool)
            .await?;

        tracing::debug!(%day, copied, removed, "Archived bookings");
        Ok(removed as u64)
    }

    /// Archived bookings for `day`, ordered by section then slot.
    pub async fn list_archived_for_day(
        pool: &PgPool,
        day: Day,
    ) -> Result<Vec<ArchivedBooking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, archived_at FROM booking_archive \
             WHERE booking_day = $1 \
             ORDER BY section_id, slot_number"
        );
        sqlx::query_as::<_, ArchivedBooking>(&query)
            .bind(day)
            .fetch_all(pool)
            .await
    }

    /// Count rows in the active and archive tables, in that order.
    ///
    /// Reported by the one-shot archival worker after its pass.
    pub async fn counts(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM bookings), (SELECT COUNT(*) FROM booking_archive)",
        )
        .fetch_one(pool)
        .await
    }
}
