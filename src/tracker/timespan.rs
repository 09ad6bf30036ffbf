use chrono::DateTime;
use chrono::Duration;
use chrono::Months;
use chrono::Utc;

/// A parsed reporting window: how far back to look and the cleaned-up,
/// unabbreviated phrase describing it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeSpan {
    pub duration: Duration,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Accepted spellings per unit, checked in this order. Matching is by
/// substring, so "weeks", "wks" and plain "w" all land on Week.
const UNITS: &[(Unit, &str, &[&str])] = &[
    (Unit::Hour, "hour", &["hour", "hr", "h"]),
    (Unit::Day, "day", &["day", "dy", "d"]),
    (Unit::Week, "week", &["week", "wk", "w"]),
    (Unit::Month, "month", &["month", "mo", "m"]),
    (Unit::Year, "year", &["year", "yr", "y"]),
];

/// Converts a free-form phrase like "1w3d", "4 weeks" or "14 weeks 2 hours"
/// into a duration counted back from `now`, plus a canonical label. A bare
/// unit word means one of that unit; anything unrecognized (or nothing at
/// all) falls back to a week.
pub fn parse_time_span(text: &str, now: DateTime<Utc>) -> TimeSpan {
    let text = text.trim().to_ascii_lowercase();

    if !text.chars().any(|c| c.is_ascii_digit()) {
        let (unit, label) = match_unit(&text).unwrap_or((Unit::Week, "week"));
        return TimeSpan {
            duration: unit_span(unit, now),
            label: label.to_string(),
        };
    }

    let mut chars = text.chars().peekable();
    let mut total = Duration::zero();
    let mut fragments: Vec<String> = Vec::new();

    loop {
        // Text before the first number may itself name a unit ("week 2
        // hours"); it counts as one of that unit.
        let lead: String = take_while(&mut chars, |c| !c.is_ascii_digit());
        if let Some((unit, label)) = match_unit(&lead) {
            total = total + unit_span(unit, now);
            fragments.push(format!("1 {label}"));
        }
        if chars.peek().is_none() {
            break;
        }

        let digits: String = take_while(&mut chars, |c| c.is_ascii_digit());
        let multiplier: i32 = digits.parse().unwrap_or(0);

        let unit_text: String = take_while(&mut chars, |c| !c.is_ascii_digit());
        let (unit, label) = match_unit(&unit_text).unwrap_or((Unit::Week, "week"));

        total = total + unit_span(unit, now) * multiplier;
        if multiplier > 1 {
            fragments.push(format!("{multiplier} {label}s"));
        } else {
            fragments.push(format!("{multiplier} {label}"));
        }
    }

    TimeSpan {
        duration: total,
        label: fragments.join(" "),
    }
}

fn take_while(chars: &mut std::iter::Peekable<std::str::Chars>, keep: impl Fn(char) -> bool) -> String {
    let mut taken = String::new();
    while let Some(&c) = chars.peek() {
        if !keep(c) {
            break;
        }
        taken.push(c);
        chars.next();
    }
    taken
}

fn match_unit(text: &str) -> Option<(Unit, &'static str)> {
    for (unit, label, spellings) in UNITS {
        if spellings.iter().any(|s| text.contains(s)) {
            return Some((*unit, label));
        }
    }
    None
}

/// Length of one unit, counted back from `now`. Months and years go through
/// calendar arithmetic so their length follows the calendar rather than a
/// fixed constant.
fn unit_span(unit: Unit, now: DateTime<Utc>) -> Duration {
    match unit {
        Unit::Hour => Duration::hours(1),
        Unit::Day => Duration::days(1),
        Unit::Week => Duration::days(7),
        Unit::Month => now - (now - Months::new(1)),
        Unit::Year => now - (now - Months::new(12)),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::parse_time_span;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_compact_units() {
        let span = parse_time_span("1w3d", now());
        assert_eq!(span.duration, Duration::days(10));
        assert_eq!(span.label, "1 week 3 days");
    }

    #[test]
    fn test_spelled_out_units() {
        let span = parse_time_span("4 weeks", now());
        assert_eq!(span.duration, Duration::days(28));
        assert_eq!(span.label, "4 weeks");
    }

    #[test]
    fn test_mixed_units() {
        let span = parse_time_span("14 weeks 2 hours", now());
        assert_eq!(span.duration, Duration::days(98) + Duration::hours(2));
        assert_eq!(span.label, "14 weeks 2 hours");
    }

    #[test]
    fn test_bare_unit_word() {
        let span = parse_time_span("week", now());
        assert_eq!(span.duration, Duration::days(7));
        assert_eq!(span.label, "week");

        let span = parse_time_span("hr", now());
        assert_eq!(span.duration, Duration::hours(1));
        assert_eq!(span.label, "hour");
    }

    #[test]
    fn test_empty_and_unrecognized_default_to_a_week() {
        let span = parse_time_span("", now());
        assert_eq!(span.duration, Duration::days(7));
        assert_eq!(span.label, "week");

        let span = parse_time_span("???", now());
        assert_eq!(span.duration, Duration::days(7));
        assert_eq!(span.label, "week");
    }

    #[test]
    fn test_leading_unit_without_digits_counts_once() {
        let span = parse_time_span("week 2 hours", now());
        assert_eq!(span.duration, Duration::days(7) + Duration::hours(2));
        assert_eq!(span.label, "1 week 2 hours");
    }

    #[test]
    fn test_month_follows_the_calendar() {
        // One month back from mid-March 2026 is mid-February: 28 days.
        let span = parse_time_span("1 month", now());
        assert_eq!(span.duration, Duration::days(28));

        // From mid-April a month spans 31 days of March.
        let april = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        assert_eq!(parse_time_span("1 month", april).duration, Duration::days(31));
    }

    #[test]
    fn test_year_accounts_for_leap_days() {
        let after_leap = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let span = parse_time_span("1 year", after_leap);
        assert_eq!(span.duration, Duration::days(366));

        let plain = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_time_span("year", plain).duration, Duration::days(365));
    }

    #[test]
    fn test_case_insensitive() {
        let span = parse_time_span("2 Weeks", now());
        assert_eq!(span.duration, Duration::days(14));
        assert_eq!(span.label, "2 weeks");
    }
}
