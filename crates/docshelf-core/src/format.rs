//! Display formatting helpers
//!
//! Pure functions used by front-ends to render sizes, durations and
//! timestamps. None of these are used for comparisons or sorting.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Format a byte count using binary (1024-based) units
///
/// The unit is picked from the raw byte count, so values just below a
/// threshold may round up within the smaller unit (`1048575` is
/// `"1024.0 KB"`).
pub fn format_file_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{} B", bytes)
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else if bytes < GIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    }
}

/// Format seconds as `M:SS`
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format a timestamp as a long date with time, e.g. `March 5, 2024, 02:07 PM`
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%B %-d, %Y, %I:%M %p").to_string()
}

/// Format a timestamp as a short date, e.g. `3/5/2024`
pub fn format_short_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%-m/%-d/%Y").to_string()
}
