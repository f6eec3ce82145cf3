//! Tolerant timestamp handling for source dates.
//!
//! The Sejm API mixes plain dates, `T`-separated and space-separated
//! timestamps, sometimes with a UTC suffix. Everything is treated as UTC
//! wall-clock time.

use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

/// Parse one of the accepted timestamp shapes:
///
/// - `YYYY-MM-DDTHH:MM:SS`
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DD HH:MM:SS`
///
/// A trailing `Z` or `+00:00` is ignored. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let s = strip_utc_suffix(raw.trim());

    if let Ok(dt) = PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(dt);
    }
    if let Ok(date) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Some(date.midnight());
    }
    PrimitiveDateTime::parse(
        s,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
}

fn strip_utc_suffix(s: &str) -> &str {
    if let Some(rest) = s.strip_suffix('Z') {
        return rest;
    }
    s.strip_suffix("+00:00").unwrap_or(s)
}

/// Whole days from `from` to `to`, rounded towards negative infinity.
///
/// `None` if either side fails to parse.
pub fn days_between(from: &str, to: &str) -> Option<i64> {
    let start = parse_timestamp(from)?;
    let end = parse_timestamp(to)?;
    Some((end - start).whole_seconds().div_euclid(SECONDS_PER_DAY))
}

/// Render a timestamp as `DD.MM.YYYY`, or `None` if it does not parse.
pub fn format_day(raw: &str) -> Option<String> {
    parse_timestamp(raw)?
        .format(format_description!("[day].[month].[year]"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn accepts_all_supported_shapes() {
        for raw in [
            "2024-01-23T22:01:02",
            "2024-01-23",
            "2024-01-23 22:01:02",
            "2024-01-23T22:01:02Z",
            "2024-01-23T22:01:02+00:00",
        ] {
            let parsed = parse_timestamp(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert_eq!(parsed.date(), date!(2024 - 01 - 23), "{raw}");
        }
    }

    #[test]
    fn plain_date_is_midnight() {
        let parsed = parse_timestamp("2023-11-18").unwrap();
        assert_eq!(parsed.date(), date!(2023 - 11 - 18));
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("23.01.2024").is_none());
    }

    #[test]
    fn days_between_counts_full_days() {
        assert_eq!(days_between("2024-01-01", "2024-01-31"), Some(30));
        assert_eq!(days_between("2024-01-01T10:00:00", "2024-01-02 09:00:00"), Some(0));
        assert_eq!(days_between("2023-11-18", "2024-01-23T22:01:02Z"), Some(66));
    }

    #[test]
    fn days_between_floors_negative_spans() {
        assert_eq!(days_between("2024-01-02T12:00:00", "2024-01-02T06:00:00"), Some(-1));
    }

    #[test]
    fn days_between_unparseable_is_unavailable() {
        assert_eq!(days_between("not-a-date", "2024-01-01"), None);
        assert_eq!(days_between("2024-01-01", "not-a-date"), None);
    }

    #[test]
    fn format_day_uses_dotted_layout() {
        assert_eq!(format_day("2024-03-05T08:00:00Z").as_deref(), Some("05.03.2024"));
        assert_eq!(format_day("soon"), None);
    }
}
