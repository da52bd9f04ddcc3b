//! ISO 8601 date/time string recognition.
//!
//! Accepted shapes (date part, then optional time and zone):
//! - calendar: `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYYMMDD`
//! - ordinal: `YYYY-DDD`
//! - week: `YYYY-Www` or `YYYY-Www-D`
//! - time: `T` or a space, then `hh`, `hh:mm`, `hh:mm:ss` (colons optional),
//!   optional `.fff`/`,fff` fraction
//! - zone: `Z`, `±hh`, `±hh:mm`, `±hhmm`
//!
//! Shape is matched by regex; calendar validity (leap days, week 53, etc.) is
//! checked with `chrono`.

use chrono::{NaiveDate, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ISO_8601_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?:
            (?P<y>[0-9]{4})-(?P<m>[0-9]{2})-(?P<d>[0-9]{2})
          | (?P<by>[0-9]{4})(?P<bm>[0-9]{2})(?P<bd>[0-9]{2})
          | (?P<oy>[0-9]{4})-(?P<o>[0-9]{3})
          | (?P<wy>[0-9]{4})-W(?P<w>[0-9]{2})(?:-(?P<wd>[1-7]))?
          | (?P<my>[0-9]{4})-(?P<mm>[0-9]{2})
          | (?P<yo>[0-9]{4})
        )
        (?:
            [T\x20]
            (?P<h>[0-9]{2})(?::?(?P<mi>[0-9]{2})(?::?(?P<s>[0-9]{2}))?)?
            (?P<frac>[.,][0-9]+)?
            (?P<tz>[zZ]|[+-](?P<tzh>[0-9]{2})(?::?(?P<tzm>[0-9]{2}))?)?
        )?$",
    )
    .expect("valid ISO 8601 regex")
});

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns whether `value` is a valid ISO 8601 date or date-time string.
pub fn is_iso8601(value: &str) -> bool {
    let Some(caps) = ISO_8601_RE.captures(value) else {
        return false;
    };
    date_is_valid(&caps) && time_is_valid(&caps) && zone_is_valid(&caps)
}

fn date_is_valid(caps: &Captures<'_>) -> bool {
    if let (Some(y), Some(m), Some(d)) = (num(caps, "y"), num(caps, "m"), num(caps, "d")) {
        return NaiveDate::from_ymd_opt(y as i32, m, d).is_some();
    }
    if let (Some(y), Some(m), Some(d)) = (num(caps, "by"), num(caps, "bm"), num(caps, "bd")) {
        return NaiveDate::from_ymd_opt(y as i32, m, d).is_some();
    }
    if let (Some(y), Some(ordinal)) = (num(caps, "oy"), num(caps, "o")) {
        return NaiveDate::from_yo_opt(y as i32, ordinal).is_some();
    }
    if let (Some(y), Some(week)) = (num(caps, "wy"), num(caps, "w")) {
        let day = num(caps, "wd").unwrap_or(1);
        return NaiveDate::from_isoywd_opt(y as i32, week, WEEKDAYS[(day - 1) as usize])
            .is_some();
    }
    if let Some(month) = num(caps, "mm") {
        return (1..=12).contains(&month);
    }
    caps.name("yo").is_some()
}

fn time_is_valid(caps: &Captures<'_>) -> bool {
    let Some(hour) = num(caps, "h") else {
        return true;
    };
    let minute = num(caps, "mi").unwrap_or(0);
    let second = num(caps, "s").unwrap_or(0);

    // 24:00 is the end-of-day instant; nothing may follow it.
    if hour == 24 {
        return minute == 0 && second == 0 && caps.name("frac").is_none();
    }
    NaiveTime::from_hms_opt(hour, minute, second).is_some()
}

fn zone_is_valid(caps: &Captures<'_>) -> bool {
    let hours_ok = num(caps, "tzh").map_or(true, |hours| hours <= 23);
    let minutes_ok = num(caps, "tzm").map_or(true, |minutes| minutes <= 59);
    hours_ok && minutes_ok
}

fn num(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::is_iso8601;

    #[test]
    fn accepts_common_date_and_date_time_shapes() {
        for value in [
            "2024",
            "2024-02",
            "2024-02-29",
            "20240229",
            "2024-060",
            "2024-W09",
            "2024-W09-4",
            "2024-02-29T10:15",
            "2024-02-29 10:15:30",
            "2024-02-29T10:15:30Z",
            "2024-02-29T10:15:30.123+02:00",
            "2024-02-29T101530,5-0530",
            "2024-02-29T24:00",
        ] {
            assert!(is_iso8601(value), "expected `{value}` to be accepted");
        }
    }

    #[test]
    fn rejects_malformed_or_impossible_values() {
        for value in [
            "",
            "not a date",
            "2023-02-29",
            "2024-13-01",
            "2024-00",
            "2023-366",
            "2021-W53",
            "2024-02-29T",
            "2024-02-29T25:00",
            "2024-02-29T10:60",
            "2024-02-29T24:00:01",
            "2024-02-29T10:15:00+24:00",
            "29/02/2024",
            "٢٠٢٤",
            "2024-02-29T١٠:١٥",
            "2024-02-29T10:15+٠٢",
            "２０２４-02-29",
            " 2024-02-29",
        ] {
            assert!(!is_iso8601(value), "expected `{value}` to be rejected");
        }
    }
}
