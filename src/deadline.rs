//! Day-first, fuzzy deadline parsing and the inclusion-window filter.

use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Textual fallback formats, tried after the numeric patterns.
const TEXTUAL_FORMATS: &[&str] = &["%d %B %Y", "%B %d, %Y"];

fn iso_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("iso date pattern"))
}

fn numeric_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})[/\.\-](\d{1,2})[/\.\-](\d{2,4})").expect("numeric date pattern")
    })
}

/// Day-first, fuzzy date parsing.
///
/// ISO dates win over day-first ones so that `2025-05-31T23:59` is not read
/// as day 25. Otherwise the first date-shaped token found anywhere in the
/// text is interpreted day-first; two-digit years are 2000-based. Ambiguous
/// numeric dates stay day-first: all covered sources publish that way.
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = iso_date_re().captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = numeric_date_re().captures(text) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for fmt in TEXTUAL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }

    None
}

/// Pure form of the window check so callers can pin `today`.
///
/// Absent and unreadable deadlines are included: no known deadline means
/// "assume still open". Past deadlines are included as well; the check only
/// bounds how far into the future a deadline may lie.
pub fn within_window_on(candidate: &str, window_days: i64, today: NaiveDate) -> bool {
    match parse_deadline(candidate) {
        Some(date) => date <= today + Duration::days(window_days),
        None => true,
    }
}

/// Decides whether a candidate deadline falls inside the inclusion window.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineFilter {
    pub window_days: i64,
}

impl DeadlineFilter {
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    pub fn includes(&self, candidate: &str) -> bool {
        within_window_on(candidate, self.window_days, Utc::now().date_naive())
    }
}
