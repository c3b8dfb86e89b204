/// Booking primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All stored instants are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar day in the booking timezone.
pub type Day = chrono::NaiveDate;
