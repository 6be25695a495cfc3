//! Permissive calendar-date parsing for uploaded `Date` cells.
//!
//! Accepts the spread of formats spreadsheet exports produce (ISO 8601,
//! RFC 2822, slash/dash/dot separated, month names, ordinals, trailing
//! times) and reduces every successful parse to a [`NaiveDate`].

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use regex::Regex;
use tracing::warn;

/// `1st`, `22nd`, `3rd`, `4th` → bare day number.
static ORDINAL_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("regex is valid")
});

/// Date layouts tried in order. Month-first wins for ambiguous slash dates.
///
/// Four-digit-year layouts come first; `%Y` also reads one or two digits, so
/// matches below [`MIN_FULL_YEAR`] are rejected and left to the `%y` layouts.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A %B %d %Y",
    "%A %d %B %Y",
    "%Y %B %d",
    "%d-%B-%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%B %d %y",
    "%d %B %y",
    "%d-%B-%y",
];

/// Smallest year a `%Y` layout may yield.
const MIN_FULL_YEAR: i32 = 1000;

/// Time-of-day layouts accepted after a date. The time itself is discarded.
const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M:%S",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a user-supplied timezone name, mapping `"auto"` to the system zone.
///
/// Unrecognised names fall back to UTC with a warning.
pub fn resolve_timezone(tz_name: &str) -> Tz {
    let name = if tz_name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        tz_name.to_string()
    };
    name.parse::<Tz>().unwrap_or_else(|_| {
        warn!("unrecognised timezone \"{}\", falling back to UTC", name);
        Tz::UTC
    })
}

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses date cells into calendar days.
///
/// Every timestamp keeps the calendar day it was written with, offset
/// included. A parser built with [`DateParser::new`] instead converts
/// offset-aware timestamps into its timezone before the time is discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateParser {
    tz: Option<Tz>,
}

impl DateParser {
    /// Create a parser that buckets offset-aware timestamps into `tz_name`.
    pub fn new(tz_name: &str) -> Self {
        Self {
            tz: Some(resolve_timezone(tz_name)),
        }
    }

    /// Parser that takes each timestamp's day as written.
    pub fn as_written() -> Self {
        Self { tz: None }
    }

    /// Timezone offset-aware timestamps are converted into, if any.
    pub fn timezone(&self) -> Option<Tz> {
        self.tz
    }

    /// Parse one cell. Returns `None` when no accepted layout matches.
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        if let Some(dt) = parse_with_offset(s) {
            return Some(match self.tz {
                Some(tz) => dt.with_timezone(&tz).date_naive(),
                None => dt.date_naive(),
            });
        }

        if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
            return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
        }

        let cleaned = normalise_text(s);

        // Month and year only, e.g. "January 2024" → first of the month.
        if let Some(date) = NaiveDate::parse_from_str(&format!("1 {cleaned}"), "%d %B %Y")
            .ok()
            .filter(|d| d.year() >= MIN_FULL_YEAR)
        {
            return Some(date);
        }

        parse_date_prefix(&cleaned)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// RFC 3339 / ISO 8601 with offset (`Z` or `±hh:mm`), then RFC 2822.
fn parse_with_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = s.parse::<DateTime<FixedOffset>>() {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt);
    }
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%d %H:%M:%S%z"];
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
}

/// Drop ordinal suffixes and commas, collapse whitespace.
fn normalise_text(s: &str) -> String {
    let without_ordinals = ORDINAL_SUFFIX.replace_all(s, "$1");
    without_ordinals
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Match a date layout at the start of `s`; whatever follows must be a time.
fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|fmt| {
        let (date, rest) = NaiveDate::parse_and_remainder(s, fmt).ok()?;
        if fmt.contains("%Y") && date.year() < MIN_FULL_YEAR {
            return None;
        }
        is_time_remainder(rest).then_some(date)
    })
}

fn is_time_remainder(rest: &str) -> bool {
    if rest.trim().is_empty() {
        return true;
    }
    let Some(time) = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' ')) else {
        return false;
    };
    let time = time.trim();
    let time = time
        .strip_suffix('Z')
        .or_else(|| time.strip_suffix(" UTC"))
        .unwrap_or(time)
        .trim();
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(time, fmt).is_ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
