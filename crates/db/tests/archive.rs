//! Integration tests for moving past bookings into `booking_archive`.

use chrono::{Duration, NaiveDate, Utc};
use slotbook_db::models::booking::NewBooking;
use slotbook_db::repositories::BookingRepo;
use sqlx::PgPool;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 14).unwrap()
}

fn new_booking(section_id: i32, slot_number: i32) -> NewBooking {
    NewBooking {
        section_id,
        slot_number,
        full_name: "Ravi".to_string(),
        place: "Hassan".to_string(),
        mobile: "1234567890".to_string(),
    }
}

async fn seed(pool: &PgPool, section_id: i32, slot_number: i32, day: NaiveDate) -> i64 {
    BookingRepo::create(pool, &new_booking(section_id, slot_number), Utc::now(), day)
        .await
        .unwrap()
        .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn past_bookings_move_to_archive(pool: PgPool) {
    let yesterday = today() - Duration::days(1);
    let last_week = today() - Duration::days(7);

    let old_id = seed(&pool, 1, 1, yesterday).await;
    seed(&pool, 2, 2, last_week).await;
    seed(&pool, 1, 1, today()).await;

    let moved = BookingRepo::archive_before(&pool, today()).await.unwrap();
    assert_eq!(moved, 2);

    let (active, archived) = BookingRepo::counts(&pool).await.unwrap();
    assert_eq!((active, archived), (1, 2));

    let archived_rows = BookingRepo::list_archived_for_day(&pool, yesterday)
        .await
        .unwrap();
    assert_eq!(archived_rows.len(), 1);
    assert_eq!(archived_rows[0].id, old_id);
    assert_eq!(archived_rows[0].full_name, "Ravi");

    assert!(BookingRepo::find_by_id(&pool, old_id).await.unwrap().is_none());
    assert!(BookingRepo::is_slot_booked(&pool, 1, 1, today()).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archiving_twice_is_a_no_op(pool: PgPool) {
    seed(&pool, 3, 4, today() - Duration::days(1)).await;
    seed(&pool, 3, 4, today()).await;

    assert_eq!(BookingRepo::archive_before(&pool, today()).await.unwrap(), 1);
    let after_first = BookingRepo::counts(&pool).await.unwrap();

    assert_eq!(BookingRepo::archive_before(&pool, today()).await.unwrap(), 0);
    let after_second = BookingRepo::counts(&pool).await.unwrap();

    assert_eq!(after_first, (1, 1));
    assert_eq!(after_first, after_second);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_archive_runs_do_not_duplicate(pool: PgPool) {
    for slot in 1..=5 {
        seed(&pool, 4, slot, today() - Duration::days(1)).await;
    }

    let (a, b) = tokio::join!(
        BookingRepo::archive_before(&pool, today()),
        BookingRepo::archive_before(&pool, today()),
    );
    assert_eq!(a.unwrap() + b.unwrap(), 5);

    let (active, archived) = BookingRepo::counts(&pool).await.unwrap();
    assert_eq!((active, archived), (0, 5));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archived_row_already_present_is_not_copied_again(pool: PgPool) {
    let id = seed(&pool, 5, 1, today() - Duration::days(2)).await;

    // Simulate a copy that landed without the matching delete.
    sqlx::query(
        "INSERT INTO booking_archive \
             (id, section_id, slot_number, full_name, place, mobile, booking_date, booking_day, created_at) \
         SELECT id, section_id, slot_number, full_name, place, mobile, booking_date, booking_day, created_at \
         FROM bookings WHERE id = $1",
    )
    .bind(id)
    .execute(&pool)
    .await
    .unwrap();

    assert_eq!(BookingRepo::archive_before(&pool, today()).await.unwrap(), 1);
    assert_eq!(BookingRepo::counts(&pool).await.unwrap(), (0, 1));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn nothing_to_archive(pool: PgPool) {
    seed(&pool, 1, 1, today()).await;
    assert_eq!(BookingRepo::archive_before(&pool, today()).await.unwrap(), 0);
    assert_eq!(BookingRepo::counts(&pool).await.unwrap(), (1, 0));
}

/// Wait until some other session in this database is blocked on a lock.
async fn wait_for_lock_waiter(pool: &PgPool) {
    for _ in 0..200 {
        let waiting: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pg_stat_activity \
             WHERE datname = current_database() AND wait_event_type = 'Lock'",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        if waiting > 0 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }
    panic!("no session ever waited on a lock");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn row_committed_during_a_pass_is_never_lost(pool: PgPool) {
    let yesterday = today() - Duration::days(1);
    let early_id = seed(&pool, 1, 1, yesterday).await;

    // An open transaction books another past-day slot and also archives the
    // early row, so the pass blocks on its archive insert until this commits.
    let mut tx = pool.begin().await.unwrap();
    let late_id: i64 = sqlx::query_scalar(
        "INSERT INTO bookings \
             (section_id, slot_number, full_name, place, mobile, booking_date, booking_day) \
         VALUES (2, 2, 'Late', 'Hassan', '1234567890', NOW(), $1) \
         RETURNING id",
    )
    .bind(yesterday)
    .fetch_one(&mut *tx)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO booking_archive \
             (id, section_id, slot_number, full_name, place, mobile, booking_date, booking_day, created_at) \
         SELECT id, section_id, slot_number, full_name, place, mobile, booking_date, booking_day, created_at \
         FROM bookings WHERE id = $1",
    )
    .bind(early_id)
    .execute(&mut *tx)
    .await
    .unwrap();

    let pass = tokio::spawn({
        let pool = pool.clone();
        async move { BookingRepo::archive_before(&pool, today()).await }
    });

    wait_for_lock_waiter(&pool).await;
    tx.commit().await.unwrap();
    pass.await.unwrap().unwrap();

    let late_active = BookingRepo::find_by_id(&pool, late_id).await.unwrap().is_some();
    let late_archived: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_archive WHERE id = $1")
            .bind(late_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(
        late_active || late_archived == 1,
        "booking {late_id} left the active table without reaching the archive"
    );

    let early_archived: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM booking_archive WHERE id = $1")
            .bind(early_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(early_archived, 1);
    assert!(BookingRepo::find_by_id(&pool, early_id).await.unwrap().is_none());

    // The next pass picks up whatever the first one could not see.
    BookingRepo::archive_before(&pool, today()).await.unwrap();
    assert_eq!(BookingRepo::counts(&pool).await.unwrap(), (0, 2));
}
