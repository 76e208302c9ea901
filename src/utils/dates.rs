use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses the date shapes the portal API emits: plain `YYYY-MM-DD`,
/// RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Calendar-date view of [`parse_timestamp`]; time of day is dropped.
/// Offset timestamps keep the date of their own offset, not of UTC.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(ts.date_naive());
    }
    parse_timestamp(raw).map(|ts| ts.date_naive())
}

/// Sort key where unparseable dates order as the oldest possible value.
pub fn sort_key(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
