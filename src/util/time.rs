use anyhow::{bail, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

// Parse a day string like "1d" (days ago), "YYYY-MM-DD", or RFC3339 into a UTC calendar date.
// Returns Some(day) on success; None if unparseable.
pub fn parse_day_str(s: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    let s = s.trim();
    // "1d" -> yesterday
    if let Some(stripped) = s.strip_suffix('d') {
        if let Ok(days) = stripped.parse::<i64>() {
            if days < 0 { return None; }
            // out-of-range offsets are unparseable, not a panic
            return Duration::try_days(days)
                .and_then(|d| now.checked_sub_signed(d))
                .map(|dt| dt.date_naive());
        }
    }
    // "YYYY-MM-DD"
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(nd);
    }
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    None
}

// Helper for the --date flag: current UTC date when absent
pub fn resolve_day_opt(day: &Option<String>, now: DateTime<Utc>) -> Result<NaiveDate> {
    let Some(s) = day.as_ref() else { return Ok(now.date_naive()) };
    match parse_day_str(s, now) {
        Some(d) => Ok(d),
        None => bail!("unrecognized date {s:?} (expected YYYY-MM-DD, RFC3339, or Nd)"),
    }
}
