//! Report date computation.
//!
//! Every dated request asks for the previous calendar day, computed in the
//! local timezone of the machine running the dashboard.

use chrono::{Local, NaiveDate};

/// Date format expected by the proxy (`YYYY-MM-DD`).
const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns the calendar day before `today`.
pub fn previous_day(today: NaiveDate) -> NaiveDate {
    // Only NaiveDate::MIN has no predecessor
    today.pred_opt().unwrap_or(today)
}

/// Formats a date the way the proxy expects it.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

/// The report date for a given "now": yesterday, zero-padded.
pub fn report_date(today: NaiveDate) -> String {
    format_report_date(previous_day(today))
}

/// Yesterday's date in the local timezone.
pub fn yesterday_local() -> String {
    report_date(Local::now().date_naive())
}

/// Parse a user-supplied report date (`--date`).
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), REPORT_DATE_FORMAT).ok()
}
