// ── State/time formatting ──
//
// Renders the status line shown under each door:
// "Closed as of Jan 2nd, 2024, 3:04 PM".

use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Rendered in place of a time that is missing or out of range.
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a state label and change time in the host's local time zone.
pub fn format_state(state: &str, changed_at: Option<i64>) -> String {
    format_state_in(state, changed_at, &Local)
}

/// Format a state label and change time in an explicit time zone.
pub fn format_state_in<Tz>(state: &str, changed_at: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = capitalize_first(state);
    out.push_str(" as of ");
    out.push_str(&format_time_in(changed_at, tz));
    out
}

/// `"Jan 2nd, 2024, 3:04 PM"`, or [`INVALID_DATE`].
pub fn format_time_in<Tz>(changed_at: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(utc) = changed_at.and_then(|secs| DateTime::from_timestamp(secs, 0)) else {
        return INVALID_DATE.to_owned();
    };
    let local = utc.with_timezone(tz);
    let day = local.day();
    let (pm, hour) = local.hour12();
    format!(
        "{} {day}{}, {}, {hour}:{:02} {}",
        local.format("%b"),
        ordinal_suffix(day),
        local.year(),
        local.minute(),
        if pm { "PM" } else { "AM" },
    )
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    // 2024-01-02 15:04:00 UTC
    const JAN_2: i64 = 1_704_207_840;

    #[test]
    fn formats_open_in_utc() {
        assert_eq!(
            format_state_in("open", Some(JAN_2), &Utc),
            "Open as of Jan 2nd, 2024, 3:04 PM"
        );
    }

    #[test]
    fn keeps_rest_of_label() {
        assert_eq!(
            format_state_in("cLOSING", Some(JAN_2), &Utc),
            "CLOSING as of Jan 2nd, 2024, 3:04 PM"
        );
    }

    #[test]
    fn empty_label() {
        assert_eq!(
            format_state_in("", Some(JAN_2), &Utc),
            " as of Jan 2nd, 2024, 3:04 PM"
        );
    }

    #[test]
    fn respects_time_zone() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_state_in("closed", Some(JAN_2), &plus_two),
            "Closed as of Jan 2nd, 2024, 5:04 PM"
        );
    }

    #[test]
    fn midnight_and_noon() {
        // 2024-01-01 00:30 UTC
        assert_eq!(
            format_time_in(Some(1_704_069_000), &Utc),
            "Jan 1st, 2024, 12:30 AM"
        );
        // 2024-03-12 12:30 UTC
        assert_eq!(
            format_time_in(Some(1_710_246_600), &Utc),
            "Mar 12th, 2024, 12:30 PM"
        );
    }

    #[test]
    fn ordinals() {
        let cases = [
            (1_710_115_500, "Mar 11th, 2024, 12:05 AM"),
            (1_710_320_400, "Mar 13th, 2024, 9:00 AM"),
            (1_711_065_540, "Mar 21st, 2024, 11:59 PM"),
            (1_711_069_200, "Mar 22nd, 2024, 1:00 AM"),
            (1_711_188_600, "Mar 23rd, 2024, 10:10 AM"),
            (1_735_642_800, "Dec 31st, 2024, 11:00 AM"),
        ];
        for (ts, expected) in cases {
            assert_eq!(format_time_in(Some(ts), &Utc), expected, "ts={ts}");
        }
    }

    #[test]
    fn missing_or_out_of_range_time() {
        assert_eq!(
            format_state_in("open", None, &Utc),
            "Open as of Invalid Date"
        );
        assert_eq!(format_time_in(Some(i64::MAX), &Utc), INVALID_DATE);
    }

    #[test]
    fn is_pure() {
        let a = format_state("open", Some(JAN_2));
        let b = format_state("open", Some(JAN_2));
        assert_eq!(a, b);
        assert!(a.starts_with("Open as of "));
    }
}
