//! Relative-time phrases ("7 minutes ago", "in a day").
//!
//! The elapsed time is split into whole calendar months plus a millisecond
//! remainder, then each unit is rounded independently and the first
//! threshold that fits picks the phrase.

use chrono::{DateTime, Datelike, Months, Utc};

const SS_THRESHOLD: f64 = 44.0;
const S_THRESHOLD: f64 = 45.0;
const M_THRESHOLD: f64 = 45.0;
const H_THRESHOLD: f64 = 22.0;
const D_THRESHOLD: f64 = 26.0;
const MONTH_THRESHOLD: f64 = 11.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Describe `this` relative to `base`: past instants end in "ago", future
/// ones start with "in".
pub(crate) fn relative(this: DateTime<Utc>, base: DateTime<Utc>) -> String {
    let future = this > base;
    let elapsed = if future {
        Elapsed::between(base, this)
    } else {
        Elapsed::between(this, base)
    };

    let phrase = elapsed.phrase();
    if future {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Elapsed {
    months: i64,
    millis: i64,
}

impl Elapsed {
    /// `from` must not be after `to`
    fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        let mut months = i64::from(to.year() - from.year()) * 12
            + i64::from(to.month0())
            - i64::from(from.month0());

        let anchor = |months: i64| {
            u32::try_from(months)
                .ok()
                .and_then(|m| from.checked_add_months(Months::new(m)))
        };

        let mut start = anchor(months);
        if start.map_or(true, |s| s > to) {
            months -= 1;
            start = anchor(months);
        }

        match start {
            Some(start) if months >= 0 => Self {
                months,
                millis: (to - start).num_milliseconds(),
            },
            _ => Self {
                months: 0,
                millis: (to - from).num_milliseconds(),
            },
        }
    }

    fn as_months(&self) -> f64 {
        self.months as f64 + (self.millis as f64 / MS_PER_DAY) * 4800.0 / 146_097.0
    }

    fn whole_days(&self) -> f64 {
        (self.months as f64 * 146_097.0 / 4800.0).round()
    }

    fn as_days(&self) -> f64 {
        self.whole_days() + self.millis as f64 / MS_PER_DAY
    }

    fn as_hours(&self) -> f64 {
        self.whole_days() * 24.0 + self.millis as f64 / 3_600_000.0
    }

    fn as_minutes(&self) -> f64 {
        self.whole_days() * 1440.0 + self.millis as f64 / 60_000.0
    }

    fn as_seconds(&self) -> f64 {
        self.whole_days() * 86_400.0 + self.millis as f64 / 1000.0
    }

    fn phrase(&self) -> String {
        let seconds = self.as_seconds().round();
        let minutes = self.as_minutes().round();
        let hours = self.as_hours().round();
        let days = self.as_days().round();
        let months = self.as_months().round();
        let years = (self.as_months() / 12.0).round();

        if seconds <= SS_THRESHOLD {
            "a few seconds".to_string()
        } else if seconds < S_THRESHOLD {
            format!("{} seconds", seconds as i64)
        } else if minutes <= 1.0 {
            "a minute".to_string()
        } else if minutes < M_THRESHOLD {
            format!("{} minutes", minutes as i64)
        } else if hours <= 1.0 {
            "an hour".to_string()
        } else if hours < H_THRESHOLD {
            format!("{} hours", hours as i64)
        } else if days <= 1.0 {
            "a day".to_string()
        } else if days < D_THRESHOLD {
            format!("{} days", days as i64)
        } else if months <= 1.0 {
            "a month".to_string()
        } else if months < MONTH_THRESHOLD {
            format!("{} months", months as i64)
        } else if years <= 1.0 {
            "a year".to_string()
        } else {
            format!("{} years", years as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 12, 12, 0, 0).unwrap()
    }

    fn ago(delta: Duration) -> String {
        relative(base() - delta, base())
    }

    #[test]
    fn test_small_deltas() {
        assert_eq!(ago(Duration::zero()), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(7)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(44)), "a few seconds ago");
        assert_eq!(ago(Duration::seconds(60)), "a minute ago");
        assert_eq!(ago(Duration::minutes(7)), "7 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "an hour ago");
        assert_eq!(ago(Duration::hours(5)), "5 hours ago");
        assert_eq!(ago(Duration::hours(23)), "a day ago");
        assert_eq!(ago(Duration::days(7)), "7 days ago");
    }

    #[test]
    fn test_calendar_deltas() {
        let now = base();
        let four_months = Utc.with_ymd_and_hms(2022, 5, 12, 12, 0, 0).unwrap();
        assert_eq!(relative(four_months, now), "4 months ago");

        let one_year = Utc.with_ymd_and_hms(2021, 9, 12, 12, 0, 0).unwrap();
        assert_eq!(relative(one_year, now), "a year ago");

        let two_years = Utc.with_ymd_and_hms(2020, 9, 12, 12, 0, 0).unwrap();
        assert_eq!(relative(two_years, now), "2 years ago");
    }

    #[test]
    fn test_future() {
        assert_eq!(relative(base() + Duration::minutes(3), base()), "in 3 minutes");
        assert_eq!(relative(base() + Duration::days(1), base()), "in a day");
    }

    #[test]
    fn test_month_end_clamping() {
        let from = Utc.with_ymd_and_hms(2022, 1, 31, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();
        let elapsed = Elapsed::between(from, to);
        assert_eq!(elapsed.months, 0);
        assert_eq!(elapsed.millis, 86_400_000);
    }
}
