//! Expiry calculation - day offsets between calendar dates.
//!
//! All comparisons happen on calendar days. Time-of-day is discarded before any
//! subtraction, so an item expiring later today is "0 days" away and one
//! expiring at any hour tomorrow is "1 day" away.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

/// Items at or below this many days left count as expiring (expired included).
pub const EXPIRING_THRESHOLD_DAYS: i64 = 3;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Returns today's calendar day in the local timezone.
#[must_use]
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Number of days from `today` to `expiry`: negative if past, zero if today,
/// positive if in the future.
///
/// Both inputs are midnight-normalized calendar days, so the ceiling of the
/// elapsed-time quotient is exactly the whole-day difference.
#[must_use]
pub fn days_until(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Parses a date string and returns its day offset from `today`.
///
/// Accepts plain dates (`2025-06-01`), local date-times with or without seconds
/// (`2025-06-01T23:59`) and RFC 3339 timestamps, which are converted to the
/// local calendar day first. Malformed input yields `None` rather than an
/// error; callers treat that as "not urgent".
#[must_use]
pub fn days_until_expiry(expiry: &str, today: NaiveDate) -> Option<i64> {
    parse_calendar_day(expiry).map(|day| days_until(day, today))
}

/// Extracts the calendar day from any accepted date representation.
#[must_use]
pub fn parse_calendar_day(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(datetime) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(datetime.date());
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Whether an item with `days` left belongs in the "expiring" set.
#[must_use]
pub const fn is_expiring(days: i64) -> bool {
    days <= EXPIRING_THRESHOLD_DAYS
}

/// Freshness badge shown next to each listed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// Past its expiry date
    Expired,
    /// Two days or fewer left
    Urgent,
    /// Five days or fewer left
    Soon,
    /// Everything else
    Fresh,
}

impl ExpiryStatus {
    /// Classifies a day offset into a badge.
    #[must_use]
    pub const fn from_days(days: i64) -> Self {
        if days < 0 {
            Self::Expired
        } else if days <= 2 {
            Self::Urgent
        } else if days <= 5 {
            Self::Soon
        } else {
            Self::Fresh
        }
    }

    /// Short label with an emoji marker.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "❌ Expired",
            Self::Urgent => "🔥 Urgent",
            Self::Soon => "⏳ Soon",
            Self::Fresh => "✅ Fresh",
        }
    }
}

/// Human-readable countdown used in listings.
#[must_use]
pub fn describe_days_left(days: i64) -> String {
    match days {
        d if d < 0 => format!("Expired {} days ago", d.unsigned_abs()),
        0 => "Expires today!".to_string(),
        d => format!("{d} days remaining"),
    }
}
