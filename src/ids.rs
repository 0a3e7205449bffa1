use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Generates a fresh record id
///
/// Every entity in every collection is keyed by one of these. Ids are
/// UUID v4 strings, so uniqueness within a collection holds without any
/// coordination between writers.
///
/// ### Returns
///
/// A new UUID v4 rendered as a string
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns the current instant used for entity timestamps
///
/// All `createdAt` / `lastModified` / `updatedAt` stamps in the crate go
/// through this one function so they share a clock.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Returns today's date as a `YYYY-MM-DD` string
///
/// Deadline, exam date, and target date fields are stored as plain date
/// strings; import and suggestion flows default them to today.
pub fn today_string() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Formats a date as the `YYYY-MM-DD` string used by date fields
pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
