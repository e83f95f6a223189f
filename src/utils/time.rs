use chrono::{DateTime, Local, NaiveDate, Utc};

/// Calendar day a timestamp falls on in the user's timezone. Streaks and
/// daily windows are defined in terms of local days, not UTC days.
pub fn local_day(time: DateTime<Utc>) -> NaiveDate {
    time.with_timezone(&Local).date_naive()
}

/// Short date used in report headers, e.g. "Jan 2".
pub fn short_date(date: &DateTime<Local>) -> String {
    date.format("%b %-d").to_string()
}

/// Long date used in the daily report header, e.g. "Friday, January 2, 2026".
pub fn long_date(date: &DateTime<Local>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
