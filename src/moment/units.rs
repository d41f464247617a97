use std::str::FromStr;

use crate::error::UtilsError;

/// Calendar unit accepted by the add/subtract/set/start_of/end_of family
///
/// Short keys are case-sensitive (`M` is month, `m` is minute); long keys
/// are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Year,
    Quarter,
    Month,
    Week,
    IsoWeek,
    WeekYear,
    IsoWeekYear,
    /// Day of week when setting, calendar day when adding
    Day,
    /// Day of month
    Date,
    DayOfYear,
    Weekday,
    IsoWeekday,
    Hour,
    Minute,
    Second,
    Millisecond,
    Nanosecond,
}

impl FromStr for Unit {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s {
            "y" => Unit::Year,
            "Q" => Unit::Quarter,
            "M" => Unit::Month,
            "w" => Unit::Week,
            "W" => Unit::IsoWeek,
            "gg" => Unit::WeekYear,
            "GG" => Unit::IsoWeekYear,
            "d" => Unit::Day,
            "D" => Unit::Date,
            "DDD" => Unit::DayOfYear,
            "e" => Unit::Weekday,
            "E" => Unit::IsoWeekday,
            "h" => Unit::Hour,
            "m" => Unit::Minute,
            "s" => Unit::Second,
            "ms" => Unit::Millisecond,
            "ns" => Unit::Nanosecond,
            _ => match s.to_lowercase().as_str() {
                "year" | "years" => Unit::Year,
                "quarter" | "quarters" => Unit::Quarter,
                "month" | "months" => Unit::Month,
                "week" | "weeks" => Unit::Week,
                "isoweek" | "isoweeks" => Unit::IsoWeek,
                "weekyear" | "weekyears" => Unit::WeekYear,
                "isoweekyear" | "isoweekyears" => Unit::IsoWeekYear,
                "day" | "days" => Unit::Day,
                "date" | "dates" => Unit::Date,
                "dayofyear" | "dayofyears" => Unit::DayOfYear,
                "weekday" | "weekdays" => Unit::Weekday,
                "isoweekday" | "isoweekdays" => Unit::IsoWeekday,
                "hour" | "hours" => Unit::Hour,
                "minute" | "minutes" => Unit::Minute,
                "second" | "seconds" => Unit::Second,
                "millisecond" | "milliseconds" => Unit::Millisecond,
                "nanosecond" | "nanoseconds" => Unit::Nanosecond,
                _ => return Err(UtilsError::invalid_date(format!("unknown unit: {}", s))),
            },
        };

        Ok(unit)
    }
}
