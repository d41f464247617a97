//! Date wrapper with Portalnesia presentation rules.
//!
//! [`Moment`] owns a single chrono date-time, always normalized to UTC on
//! construction. Mutators change it in place and return `&mut Self` so calls
//! chain; presentation methods (`time_ago`, `pn_format`, `range_format`)
//! never mutate.

mod format;
mod relative;
mod units;

pub use format::ISO_8601;
pub use units::Unit;

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Local, Months, NaiveDate, NaiveDateTime,
    Offset, TimeZone, Timelike, Utc, Weekday,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{UtilsError, UtilsResult};

static YEARS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"years? ago$").expect("years-ago pattern is valid"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Relative time paired with the epoch seconds it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAgo {
    pub format: String,
    pub timestamp: i64,
}

/// Named output patterns used across Portalnesia pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPreset {
    /// `DD MMM YYYY`
    Minimal,
    /// `DD MMMM YYYY`
    FullDate,
    /// `DD MMMM YYYY, HH:mm`
    Full,
    /// `YYYY-MM-DD HH:mm:ss`
    #[default]
    Iso8601,
}

impl FormatPreset {
    /// Look up a preset by name; unknown names fall back to ISO 8601
    pub fn from_name(name: &str) -> Self {
        match name {
            "minimal" => FormatPreset::Minimal,
            "fulldate" => FormatPreset::FullDate,
            "full" => FormatPreset::Full,
            _ => FormatPreset::Iso8601,
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            FormatPreset::Minimal => "DD MMM YYYY",
            FormatPreset::FullDate => "DD MMMM YYYY",
            FormatPreset::Full => "DD MMMM YYYY, HH:mm",
            FormatPreset::Iso8601 => "YYYY-MM-DD HH:mm:ss",
        }
    }
}

/// Everything a [`Moment`] can be built from
#[derive(Debug, Clone, PartialEq)]
pub enum MomentInput {
    Now,
    /// ISO-8601-like text; inputs without an offset are read as UTC
    Text(String),
    /// Text read with a moment-style pattern such as `DD/MM/YYYY`
    Pattern { text: String, pattern: String },
    /// Seconds since the Unix epoch
    Unix(i64),
    DateTime(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    /// `[year, month, day, hour, minute, second, millisecond]`, month 1-based.
    /// Missing trailing components default to the start of the period.
    Parts(Vec<i64>),
}

impl From<()> for MomentInput {
    fn from(_: ()) -> Self {
        MomentInput::Now
    }
}

impl From<&str> for MomentInput {
    fn from(text: &str) -> Self {
        MomentInput::Text(text.to_string())
    }
}

impl From<String> for MomentInput {
    fn from(text: String) -> Self {
        MomentInput::Text(text)
    }
}

impl From<(&str, &str)> for MomentInput {
    fn from((text, pattern): (&str, &str)) -> Self {
        MomentInput::Pattern {
            text: text.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

impl From<i64> for MomentInput {
    fn from(seconds: i64) -> Self {
        MomentInput::Unix(seconds)
    }
}

impl From<i32> for MomentInput {
    fn from(seconds: i32) -> Self {
        MomentInput::Unix(i64::from(seconds))
    }
}

impl From<DateTime<Utc>> for MomentInput {
    fn from(dt: DateTime<Utc>) -> Self {
        MomentInput::DateTime(dt.with_timezone(&zero_offset()))
    }
}

impl From<DateTime<FixedOffset>> for MomentInput {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        MomentInput::DateTime(dt)
    }
}

impl From<NaiveDateTime> for MomentInput {
    fn from(naive: NaiveDateTime) -> Self {
        MomentInput::Naive(naive)
    }
}

impl From<Vec<i64>> for MomentInput {
    fn from(parts: Vec<i64>) -> Self {
        MomentInput::Parts(parts)
    }
}

impl From<&[i64]> for MomentInput {
    fn from(parts: &[i64]) -> Self {
        MomentInput::Parts(parts.to_vec())
    }
}

/// A mutable point in time with Portalnesia formatting rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Moment {
    dt: DateTime<FixedOffset>,
}

impl Moment {
    /// Build a moment from any supported input, normalized to UTC.
    ///
    /// Integers are epoch *seconds*.
    pub fn new(input: impl Into<MomentInput>) -> UtilsResult<Self> {
        let dt = match input.into() {
            MomentInput::Now => Utc::now().with_timezone(&zero_offset()),
            MomentInput::Text(text) => parse_text(&text)?,
            MomentInput::Pattern { text, pattern } => parse_with_pattern(&text, &pattern)?,
            MomentInput::Unix(seconds) => Utc
                .timestamp_opt(seconds, 0)
                .single()
                .ok_or_else(|| {
                    UtilsError::invalid_date(format!("timestamp out of range: {}", seconds))
                })?
                .with_timezone(&zero_offset()),
            MomentInput::DateTime(dt) => dt,
            MomentInput::Naive(naive) => from_naive(naive),
            MomentInput::Parts(parts) => from_parts(&parts)?,
        };

        let mut moment = Self { dt };
        moment.utc();
        Ok(moment)
    }

    /// The current instant in UTC
    pub fn now() -> Self {
        Self {
            dt: Utc::now().with_timezone(&zero_offset()),
        }
    }

    // Presentation

    /// Render with a moment-style pattern, e.g. `DD MMMM YYYY, HH:mm`
    pub fn format(&self, pattern: &str) -> String {
        format::format(&self.dt, pattern)
    }

    /// Relative time from now, e.g. "7 minutes ago"
    pub fn from_now(&self) -> String {
        relative::relative(self.dt.with_timezone(&Utc), Utc::now())
    }

    /// Relative time from another moment
    pub fn from(&self, other: &Moment) -> String {
        relative::relative(self.dt.with_timezone(&Utc), other.dt.with_timezone(&Utc))
    }

    /// Relative time from now, with year-scale phrases replaced by an
    /// absolute `DD MMM YYYY` date unless `keep_years` is set.
    pub fn time_ago(&self, keep_years: bool) -> TimeAgo {
        let mut format = self.from_now();

        if !keep_years && YEARS_AGO.is_match(&format) {
            debug!(relative = %format, "Replacing year-scale relative time with absolute date");
            format = self.format(FormatPreset::Minimal.pattern());
        }

        TimeAgo {
            format,
            timestamp: self.to_unix(),
        }
    }

    /// Render with a named preset (`minimal`, `fulldate`, `full`); anything
    /// else, including `None`, renders `YYYY-MM-DD HH:mm:ss`.
    pub fn pn_format(&self, preset: Option<&str>) -> String {
        let preset = preset.map(FormatPreset::from_name).unwrap_or_default();
        self.format_preset(preset)
    }

    pub fn format_preset(&self, preset: FormatPreset) -> String {
        self.format(preset.pattern())
    }

    /// Describe the interval from `self` to `end` at the coarsest useful
    /// granularity:
    ///
    /// - `15:00 - 18:00, 02 January 2020`
    /// - `02 January 2020 - 05 January 2021`
    /// - `02 January - 05 February 2020`
    /// - `02 - 05 January 2020`
    pub fn range_format(&self, end: &Moment) -> String {
        let start_date = self.format("YYYY-MM-DD");
        let end_date = end.format("YYYY-MM-DD");
        let start_time = self.format("HH:mm");
        let end_time = end.format("HH:mm");

        if start_date == end_date && start_time != end_time {
            return format!("{} - {}, {}", start_time, end_time, self.format("DD MMMM YYYY"));
        }
        if self.year() != end.year() {
            return format!("{} - {}", self.format("DD MMMM YYYY"), end.format("DD MMMM YYYY"));
        }
        if self.month() != end.month() {
            return format!("{} - {} {}", self.format("DD MMMM"), end.format("DD MMMM"), self.year());
        }
        format!("{} - {} {}", self.format("DD"), end.format("DD"), self.format("MMMM YYYY"))
    }

    // Mutation

    /// Add `amount` of `unit` (`"hours"`, `"M"`, `"years"`, ...)
    pub fn add(&mut self, amount: i64, unit: &str) -> &mut Self {
        self.offset_by(amount, unit, "add")
    }

    /// Subtract `amount` of `unit`
    pub fn subtract(&mut self, amount: i64, unit: &str) -> &mut Self {
        self.offset_by(amount.saturating_neg(), unit, "subtract")
    }

    /// Move to the first instant of the enclosing `unit`
    pub fn start_of(&mut self, unit: &str) -> &mut Self {
        match unit.parse::<Unit>() {
            Ok(parsed) => {
                let next = start_of(&self.dt, parsed);
                self.apply(next, "start_of")
            }
            Err(_) => {
                warn!(unit, "Ignoring start_of with unknown unit");
                self
            }
        }
    }

    /// Move to the last nanosecond of the enclosing `unit`
    pub fn end_of(&mut self, unit: &str) -> &mut Self {
        match unit.parse::<Unit>() {
            Ok(parsed) => {
                let next = start_of(&self.dt, parsed)
                    .and_then(|start| shift(&start, 1, parsed))
                    .and_then(|next| next.checked_sub_signed(Duration::nanoseconds(1)));
                self.apply(next, "end_of")
            }
            Err(_) => {
                warn!(unit, "Ignoring end_of with unknown unit");
                self
            }
        }
    }

    /// Switch to UTC, keeping the instant
    pub fn utc(&mut self) -> &mut Self {
        self.dt = self.dt.with_timezone(&zero_offset());
        self
    }

    /// Switch to the system local offset, keeping the instant
    pub fn local(&mut self) -> &mut Self {
        let offset = Local.offset_from_utc_datetime(&self.dt.naive_utc());
        self.dt = self.dt.with_timezone(&offset);
        self
    }

    /// Generic setter keyed by unit name
    pub fn set(&mut self, unit: &str, value: i64) -> &mut Self {
        match unit.parse::<Unit>() {
            Ok(Unit::Year) => self.set_year(value),
            Ok(Unit::Quarter) => self.set_quarter(value),
            Ok(Unit::Month) => self.set_month(value),
            Ok(Unit::Week) => self.set_week(value),
            Ok(Unit::IsoWeek) => self.set_iso_week(value),
            Ok(Unit::WeekYear) => self.set_week_year(value),
            Ok(Unit::IsoWeekYear) => self.set_iso_week_year(value),
            Ok(Unit::Day) => self.set_day(value),
            Ok(Unit::Date) => self.set_date(value),
            Ok(Unit::DayOfYear) => self.set_day_of_year(value),
            Ok(Unit::Weekday) => self.set_weekday(value),
            Ok(Unit::IsoWeekday) => self.set_iso_weekday(value),
            Ok(Unit::Hour) => self.set_hour(value),
            Ok(Unit::Minute) => self.set_minute(value),
            Ok(Unit::Second) => self.set_second(value),
            Ok(Unit::Millisecond) => self.set_millisecond(value),
            Ok(Unit::Nanosecond) => self.set_nanosecond(value),
            Err(_) => {
                warn!(unit, value, "Ignoring set with unknown unit");
                self
            }
        }
    }

    /// Set the year. Feb 29 becomes Feb 28 in a non-leap year.
    pub fn set_year(&mut self, year: i64) -> &mut Self {
        let next = i32::try_from(year).ok().and_then(|year| {
            let day = self.date().min(days_in_month(year, self.month()));
            self.with_date(NaiveDate::from_ymd_opt(year, self.month(), day)?)
        });
        self.apply(next, "set_year")
    }

    /// Set the month (January = 1). Out-of-range values roll into adjacent
    /// years; the day is pinned to the end of a shorter target month.
    pub fn set_month(&mut self, month: i64) -> &mut Self {
        let next = self.shift_to(month, self.month(), Unit::Month);
        self.apply(next, "set_month")
    }

    /// Set the quarter (1 to 4), keeping the position within the quarter
    pub fn set_quarter(&mut self, quarter: i64) -> &mut Self {
        let offset = i64::from(self.dt.month0() % 3) + 1;
        match quarter
            .checked_sub(1)
            .and_then(|q| q.checked_mul(3))
            .and_then(|m| m.checked_add(offset))
        {
            Some(month) => self.set_month(month),
            None => self.apply(None, "set_quarter"),
        }
    }

    /// Set the day of the month, clamped to the days the month has
    pub fn set_date(&mut self, date: i64) -> &mut Self {
        let last = i64::from(self.days_in_month());
        let day = date.clamp(1, last) as u32;
        let next = self.dt.date_naive().with_day(day).and_then(|d| self.with_date(d));
        self.apply(next, "set_date")
    }

    /// Set the day of the week (Sunday = 0). Values outside 0..=6 move into
    /// adjacent weeks.
    pub fn set_day(&mut self, day: i64) -> &mut Self {
        let next = self.shift_to(day, self.day(), Unit::Day);
        self.apply(next, "set_day")
    }

    /// Set the day of the week from an English name such as `"tuesday"` or `"tue"`
    pub fn set_day_by_name(&mut self, name: &str) -> &mut Self {
        match name.parse::<Weekday>() {
            Ok(weekday) => self.set_day(i64::from(weekday.num_days_from_sunday())),
            Err(_) => {
                warn!(name, "Ignoring set_day with unknown day name");
                self
            }
        }
    }

    /// Set the day of the year, clamped to the days the year has
    pub fn set_day_of_year(&mut self, day_of_year: i64) -> &mut Self {
        let target = day_of_year.clamp(1, i64::from(days_in_year(self.year())));
        let next = self.shift_to(target, self.day_of_year(), Unit::Day);
        self.apply(next, "set_day_of_year")
    }

    pub fn set_hour(&mut self, hour: i64) -> &mut Self {
        let next = self.shift_to(hour, self.hour(), Unit::Hour);
        self.apply(next, "set_hour")
    }

    pub fn set_minute(&mut self, minute: i64) -> &mut Self {
        let next = self.shift_to(minute, self.minute(), Unit::Minute);
        self.apply(next, "set_minute")
    }

    pub fn set_second(&mut self, second: i64) -> &mut Self {
        let next = self.shift_to(second, self.second(), Unit::Second);
        self.apply(next, "set_second")
    }

    /// Set the milliseconds; values past 999 carry into seconds
    pub fn set_millisecond(&mut self, millisecond: i64) -> &mut Self {
        let next = self.shift_to(millisecond, self.millisecond(), Unit::Millisecond);
        self.apply(next, "set_millisecond")
    }

    /// Set the nanoseconds; values past 999,999,999 carry into seconds
    pub fn set_nanosecond(&mut self, nanosecond: i64) -> &mut Self {
        let next = self.shift_to(nanosecond, self.nanosecond(), Unit::Nanosecond);
        self.apply(next, "set_nanosecond")
    }

    /// Set the week of the year (weeks start on Sunday, week 1 holds Jan 1)
    pub fn set_week(&mut self, week: i64) -> &mut Self {
        let next = self.shift_to(week, self.week(), Unit::Week);
        self.apply(next, "set_week")
    }

    /// Set the week-year, keeping the week number and the day of the week
    pub fn set_week_year(&mut self, week_year: i64) -> &mut Self {
        let next = i32::try_from(week_year).ok().and_then(|year| {
            let week = self.week().min(weeks_in_year(year));
            let saturday = first_saturday(year)?.checked_add_days(Days::new(u64::from(week - 1) * 7))?;
            let date = saturday.checked_sub_days(Days::new(u64::from(6 - self.day())))?;
            self.with_date(date)
        });
        self.apply(next, "set_week_year")
    }

    /// Set the day of the week; weeks start on Sunday (= 0)
    pub fn set_weekday(&mut self, weekday: i64) -> &mut Self {
        self.set_day(weekday)
    }

    /// Set the ISO week of the year
    pub fn set_iso_week(&mut self, week: i64) -> &mut Self {
        let next = self.shift_to(week, self.iso_week(), Unit::Week);
        self.apply(next, "set_iso_week")
    }

    /// Set the ISO week-year, keeping the ISO week and weekday
    pub fn set_iso_week_year(&mut self, week_year: i64) -> &mut Self {
        let next = i32::try_from(week_year).ok().and_then(|year| {
            let week = self.iso_week().min(iso_weeks_in_year(year));
            self.with_date(NaiveDate::from_isoywd_opt(year, week, self.dt.weekday())?)
        });
        self.apply(next, "set_iso_week_year")
    }

    /// Set the ISO day of the week (Monday = 1 ... Sunday = 7)
    pub fn set_iso_weekday(&mut self, weekday: i64) -> &mut Self {
        let next = self.shift_to(weekday, self.iso_weekday(), Unit::Day);
        self.apply(next, "set_iso_weekday")
    }

    /// Set the UTC offset in minutes, keeping the instant. Values in -15..=15
    /// are read as hours.
    pub fn set_utc_offset(&mut self, offset: i32) -> &mut Self {
        let minutes = match offset.checked_abs() {
            Some(hours) if hours < 16 => offset * 60,
            _ => offset,
        };

        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => self.dt = self.dt.with_timezone(&offset),
            None => warn!(offset, "Ignoring out-of-range UTC offset"),
        }
        self
    }

    // Accessors

    pub fn year(&self) -> i32 {
        self.dt.year()
    }

    /// Month of the year, January = 1
    pub fn month(&self) -> u32 {
        self.dt.month()
    }

    /// Day of the month
    pub fn date(&self) -> u32 {
        self.dt.day()
    }

    /// Day of the week, Sunday = 0
    pub fn day(&self) -> u32 {
        self.dt.weekday().num_days_from_sunday()
    }

    pub fn day_of_year(&self) -> u32 {
        self.dt.ordinal()
    }

    pub fn hour(&self) -> u32 {
        self.dt.hour()
    }

    pub fn minute(&self) -> u32 {
        self.dt.minute()
    }

    pub fn second(&self) -> u32 {
        self.dt.second()
    }

    pub fn millisecond(&self) -> u32 {
        self.dt.nanosecond() / 1_000_000 % 1000
    }

    pub fn nanosecond(&self) -> u32 {
        self.dt.nanosecond()
    }

    /// Week of the year; weeks start on Sunday and week 1 contains Jan 1
    pub fn week(&self) -> u32 {
        locale_week(self.dt.date_naive()).1
    }

    pub fn week_year(&self) -> i32 {
        locale_week(self.dt.date_naive()).0
    }

    /// Day of the week, Sunday = 0
    pub fn weekday(&self) -> u32 {
        self.day()
    }

    pub fn iso_week(&self) -> u32 {
        self.dt.iso_week().week()
    }

    pub fn iso_week_year(&self) -> i32 {
        self.dt.iso_week().year()
    }

    /// Monday = 1 ... Sunday = 7
    pub fn iso_weekday(&self) -> u32 {
        self.dt.weekday().number_from_monday()
    }

    pub fn quarter(&self) -> u32 {
        self.dt.month0() / 3 + 1
    }

    /// Offset from UTC in minutes
    pub fn utc_offset(&self) -> i32 {
        self.dt.offset().local_minus_utc() / 60
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Seconds since the Unix epoch
    pub fn to_unix(&self) -> i64 {
        self.dt.timestamp()
    }

    pub fn to_unix_millis(&self) -> i64 {
        self.dt.timestamp_millis()
    }

    pub fn to_date_time(&self) -> DateTime<FixedOffset> {
        self.dt
    }

    pub fn is_before(&self, other: &Moment) -> bool {
        self.dt < other.dt
    }

    pub fn is_after(&self, other: &Moment) -> bool {
        self.dt > other.dt
    }

    /// Same instant, regardless of offset
    pub fn is_same(&self, other: &Moment) -> bool {
        self.dt == other.dt
    }

    // Internals

    fn offset_by(&mut self, amount: i64, unit: &str, operation: &'static str) -> &mut Self {
        match unit.parse::<Unit>() {
            Ok(parsed) => {
                let next = shift(&self.dt, amount, parsed);
                self.apply(next, operation)
            }
            Err(_) => {
                warn!(unit, operation, "Ignoring unknown unit");
                self
            }
        }
    }

    /// Shift by the distance from `current` to `target`
    fn shift_to(&self, target: i64, current: u32, unit: Unit) -> Option<DateTime<FixedOffset>> {
        let delta = target.checked_sub(i64::from(current))?;
        shift(&self.dt, delta, unit)
    }

    fn apply(&mut self, next: Option<DateTime<FixedOffset>>, operation: &'static str) -> &mut Self {
        match next {
            Some(dt) => self.dt = dt,
            None => warn!(operation, "Date out of range, value left unchanged"),
        }
        self
    }

    /// Same wall-clock time and offset on another calendar day
    fn with_date(&self, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        self.dt
            .offset()
            .from_local_datetime(&date.and_time(self.dt.time()))
            .single()
    }
}

impl Default for Moment {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(ISO_8601))
    }
}

impl FromStr for Moment {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Moment::new(s)
    }
}

fn zero_offset() -> FixedOffset {
    Utc.fix()
}

fn from_naive(naive: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&naive).with_timezone(&zero_offset())
}

fn parse_text(text: &str) -> UtilsResult<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt);
    }
    for layout in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Ok(from_naive(naive));
        }
    }
    for layout in DATE_FORMATS {
        if let Some(naive) = NaiveDate::parse_from_str(text, layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return Ok(from_naive(naive));
        }
    }

    debug!(input = text, "Unable to parse date");
    Err(UtilsError::date_parse(text))
}

fn parse_with_pattern(text: &str, pattern: &str) -> UtilsResult<DateTime<FixedOffset>> {
    let layout = format::to_strftime(pattern).ok_or_else(|| {
        UtilsError::invalid_date(format!("pattern cannot be used for parsing: {}", pattern))
    })?;

    if let Ok(dt) = DateTime::parse_from_str(text, &layout) {
        return Ok(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, &layout) {
        return Ok(from_naive(naive));
    }
    if let Some(naive) = NaiveDate::parse_from_str(text, &layout)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(from_naive(naive));
    }

    debug!(input = text, pattern, "Unable to parse date with pattern");
    Err(UtilsError::date_parse(text))
}

fn from_parts(parts: &[i64]) -> UtilsResult<DateTime<FixedOffset>> {
    if parts.is_empty() {
        return Ok(Utc::now().with_timezone(&zero_offset()));
    }

    let invalid = || UtilsError::invalid_date(format!("invalid date components: {:?}", parts));
    let part = |index: usize, default: i64| parts.get(index).copied().unwrap_or(default);
    let field = |index: usize, default: i64| u32::try_from(part(index, default)).map_err(|_| invalid());

    let year = i32::try_from(part(0, 0)).map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, field(1, 1)?, field(2, 1)?).ok_or_else(|| invalid())?;
    let naive = date
        .and_hms_milli_opt(field(3, 0)?, field(4, 0)?, field(5, 0)?, field(6, 0)?)
        .ok_or_else(|| invalid())?;

    Ok(from_naive(naive))
}

fn shift(dt: &DateTime<FixedOffset>, amount: i64, unit: Unit) -> Option<DateTime<FixedOffset>> {
    match unit {
        Unit::Year | Unit::WeekYear | Unit::IsoWeekYear => shift_months(dt, amount.checked_mul(12)?),
        Unit::Quarter => shift_months(dt, amount.checked_mul(3)?),
        Unit::Month => shift_months(dt, amount),
        Unit::Week | Unit::IsoWeek => dt.checked_add_signed(Duration::try_weeks(amount)?),
        Unit::Day | Unit::Date | Unit::DayOfYear | Unit::Weekday | Unit::IsoWeekday => {
            dt.checked_add_signed(Duration::try_days(amount)?)
        }
        Unit::Hour => dt.checked_add_signed(Duration::try_hours(amount)?),
        Unit::Minute => dt.checked_add_signed(Duration::try_minutes(amount)?),
        Unit::Second => dt.checked_add_signed(Duration::try_seconds(amount)?),
        Unit::Millisecond => dt.checked_add_signed(Duration::try_milliseconds(amount)?),
        Unit::Nanosecond => dt.checked_add_signed(Duration::nanoseconds(amount)),
    }
}

fn shift_months(dt: &DateTime<FixedOffset>, months: i64) -> Option<DateTime<FixedOffset>> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        dt.checked_add_months(magnitude)
    } else {
        dt.checked_sub_months(magnitude)
    }
}

fn start_of(dt: &DateTime<FixedOffset>, unit: Unit) -> Option<DateTime<FixedOffset>> {
    let date = dt.date_naive();
    let time = dt.time();

    let naive = match unit {
        Unit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        Unit::Quarter => {
            NaiveDate::from_ymd_opt(date.year(), date.month0() / 3 * 3 + 1, 1)?.and_hms_opt(0, 0, 0)?
        }
        Unit::Month => date.with_day(1)?.and_hms_opt(0, 0, 0)?,
        Unit::Week => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_sunday())))?
            .and_hms_opt(0, 0, 0)?,
        Unit::IsoWeek => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))?
            .and_hms_opt(0, 0, 0)?,
        Unit::Day | Unit::Date => date.and_hms_opt(0, 0, 0)?,
        Unit::Hour => date.and_hms_opt(time.hour(), 0, 0)?,
        Unit::Minute => date.and_hms_opt(time.hour(), time.minute(), 0)?,
        Unit::Second => date.and_hms_opt(time.hour(), time.minute(), time.second())?,
        Unit::Millisecond => date.and_hms_nano_opt(
            time.hour(),
            time.minute(),
            time.second(),
            time.nanosecond() / 1_000_000 * 1_000_000,
        )?,
        _ => {
            debug!(?unit, "Unit has no start or end");
            return None;
        }
    };

    dt.offset().from_local_datetime(&naive).single()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// `(week_year, week)` for Sunday-start weeks where week 1 holds Jan 1.
///
/// A week belongs to the year its Saturday falls in.
fn locale_week(date: NaiveDate) -> (i32, u32) {
    let to_saturday = 6 - date.weekday().num_days_from_sunday();
    let saturday = date
        .checked_add_days(Days::new(u64::from(to_saturday)))
        .unwrap_or(date);
    (saturday.year(), (saturday.ordinal() - 1) / 7 + 1)
}

fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31).map_or(52, |dec31| match locale_week(dec31) {
        (week_year, week) if week_year == year => week,
        _ => dec31
            .checked_sub_days(Days::new(7))
            .map_or(52, |day| locale_week(day).1),
    })
}

fn first_saturday(year: i32) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    jan1.checked_add_days(Days::new(u64::from(6 - jan1.weekday().num_days_from_sunday())))
}

fn iso_weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28).map_or(52, |day| day.iso_week().week())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRING_FORMAT: &str = "2020-02-02 12:00:00";
    const UNIX_FORMAT: i64 = 1_580_644_800;

    fn fixed(text: &str) -> Moment {
        Moment::new(text).unwrap()
    }

    #[test]
    fn test_new_from_string() {
        let a = fixed(STRING_FORMAT);
        assert_eq!(a.format("YYYY-MM-DD HH:mm:ss"), STRING_FORMAT);
        assert_eq!(a.to_unix(), UNIX_FORMAT);
        assert_eq!(a.utc_offset(), 0);
    }

    #[test]
    fn test_new_from_unix_seconds() {
        let a = Moment::new(UNIX_FORMAT).unwrap();
        assert_eq!(a.format("YYYY-MM-DD HH:mm:ss"), STRING_FORMAT);
        assert_eq!(a.to_unix(), UNIX_FORMAT);

        let b = Moment::new(1_580_644_800i32).unwrap();
        assert_eq!(b, a);
    }

    #[test]
    fn test_new_normalizes_to_utc() {
        let a = fixed("2020-02-02T19:00:00+07:00");
        assert_eq!(a.utc_offset(), 0);
        assert_eq!(a.format("YYYY-MM-DD HH:mm:ss"), STRING_FORMAT);
    }

    #[test]
    fn test_new_other_inputs() {
        assert_eq!(fixed("2022-09-12").format("YYYY-MM-DD HH:mm"), "2022-09-12 00:00");
        assert_eq!(fixed("2022-09-12T08:30").hour(), 8);

        let parts = Moment::new(vec![2020i64, 2, 2, 12]).unwrap();
        assert_eq!(parts.to_unix(), UNIX_FORMAT);

        let pattern = Moment::new(("02/02/2020 12:00", "DD/MM/YYYY HH:mm")).unwrap();
        assert_eq!(pattern.to_unix(), UNIX_FORMAT);

        let naive = NaiveDate::from_ymd_opt(2020, 2, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(Moment::new(naive).unwrap().to_unix(), UNIX_FORMAT);
    }

    #[test]
    fn test_new_parse_failures() {
        assert!(Moment::new("not a date").is_err());
        assert!(Moment::new("2020-13-45").is_err());
        assert!(Moment::new(vec![2020i64, 2, 30]).is_err());
        assert!(Moment::new(("2020", "Do YYYY")).is_err());
        assert!("garbage".parse::<Moment>().is_err());
    }

    #[test]
    fn test_time_ago_year_uses_absolute_date() {
        let mut a = Moment::now();
        a.subtract(2, "years");

        let result = a.time_ago(false);
        assert_eq!(result.format, a.format("DD MMM YYYY"));
        assert_eq!(result.timestamp, a.to_unix());

        assert_eq!(a.time_ago(true).format, "2 years ago");
    }

    #[test]
    fn test_time_ago_below_a_year() {
        let mut a = Moment::now();
        a.subtract(4, "month");
        assert_eq!(a.time_ago(false).format, "4 months ago");

        let mut b = Moment::now();
        b.subtract(7, "days");
        assert_eq!(b.time_ago(false).format, "7 days ago");

        let mut c = Moment::now();
        c.subtract(7, "minutes");
        assert_eq!(c.time_ago(false).format, "7 minutes ago");

        let mut d = Moment::now();
        d.subtract(7, "seconds");
        assert_eq!(d.time_ago(false).format, "a few seconds ago");
    }

    #[test]
    fn test_time_ago_serializes() {
        let result = TimeAgo {
            format: "7 days ago".to_string(),
            timestamp: UNIX_FORMAT,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["format"], "7 days ago");
        assert_eq!(json["timestamp"], UNIX_FORMAT);
    }

    #[test]
    fn test_pn_format_presets() {
        let a = fixed(STRING_FORMAT);
        assert_eq!(a.pn_format(Some("minimal")), "02 Feb 2020");
        assert_eq!(a.pn_format(Some("fulldate")), "02 February 2020");
        assert_eq!(a.pn_format(Some("full")), "02 February 2020, 12:00");
        assert_eq!(a.pn_format(None), STRING_FORMAT);
        assert_eq!(a.pn_format(Some("unknown")), STRING_FORMAT);
        assert_eq!(a.format_preset(FormatPreset::Iso8601), STRING_FORMAT);
    }

    #[test]
    fn test_range_format_same_day() {
        let start = fixed("2020-01-02 15:00:00");
        let end = fixed("2020-01-02 18:00:00");
        assert_eq!(start.range_format(&end), "15:00 - 18:00, 02 January 2020");
    }

    #[test]
    fn test_range_format_year() {
        let start = fixed("2020-01-02");
        let end = fixed("2021-01-05");
        assert_eq!(start.range_format(&end), "02 January 2020 - 05 January 2021");
    }

    #[test]
    fn test_range_format_month() {
        let start = fixed("2020-01-02");
        let end = fixed("2020-02-05");
        assert_eq!(start.range_format(&end), "02 January - 05 February 2020");
    }

    #[test]
    fn test_range_format_day() {
        let start = fixed("2020-01-02");
        let end = fixed("2020-01-05");
        assert_eq!(start.range_format(&end), "02 - 05 January 2020");
    }

    #[test]
    fn test_range_format_identical_instants_fall_through() {
        let start = fixed("2020-01-02 15:00:00");
        assert_eq!(start.range_format(&start.clone()), "02 - 02 January 2020");
    }

    #[test]
    fn test_range_format_does_not_mutate() {
        let start = fixed("2020-01-02");
        let end = fixed("2021-01-05");
        let _ = start.range_format(&end);
        assert_eq!(start, fixed("2020-01-02"));
        assert_eq!(end, fixed("2021-01-05"));
    }

    #[test]
    fn test_add_and_subtract() {
        let mut a = fixed("2022-05-05 12:00:00");
        assert_eq!(a.add(6, "hours").hour(), 18);

        let mut b = fixed("2022-05-05 12:00:00");
        assert_eq!(b.subtract(6, "hours").hour(), 6);

        let mut c = fixed("2020-01-31 00:00:00");
        assert_eq!(c.add(1, "M").format("YYYY-MM-DD"), "2020-02-29");
    }

    #[test]
    fn test_unknown_unit_is_ignored() {
        let mut a = fixed(STRING_FORMAT);
        a.add(3, "fortnights").set("eons", 4).start_of("epoch");
        assert_eq!(a.to_unix(), UNIX_FORMAT);
    }

    #[test]
    fn test_chaining() {
        let mut a = fixed("2022-05-05 12:34:56");
        a.subtract(2, "hours").start_of("day");
        assert_eq!(a.format("YYYY-MM-DD HH:mm:ss"), "2022-05-05 00:00:00");
    }

    #[test]
    fn test_clone_is_independent() {
        let a = Moment::now();
        let mut b = a.clone();
        b.subtract(2, "hours");
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_start_and_end_of() {
        let mut a = fixed("2022-09-12 12:00:00");
        assert_eq!(a.end_of("month").date(), 30);
        assert_eq!(a.format("HH:mm:ss.SSS"), "23:59:59.999");

        let mut b = fixed("2022-09-12 12:00:00");
        assert_eq!(b.start_of("month").date(), 1);

        let mut week = fixed("2022-09-14 12:00:00");
        assert_eq!(week.start_of("week").format("YYYY-MM-DD"), "2022-09-11");

        let mut iso_week = fixed("2022-09-14 12:00:00");
        assert_eq!(iso_week.start_of("isoWeek").format("YYYY-MM-DD"), "2022-09-12");

        let mut quarter = fixed("2022-09-14 12:00:00");
        assert_eq!(quarter.end_of("quarter").format("YYYY-MM-DD HH:mm"), "2022-09-30 23:59");
    }

    #[test]
    fn test_set_by_units() {
        let mut a = fixed("2022-09-12 12:00:00");

        assert_eq!(a.set("y", 2016).year(), 2016);
        assert_eq!(a.set("year", 2017).year(), 2017);
        assert_eq!(a.set("years", 2018).year(), 2018);
        assert_eq!(a.set("M", 9).month(), 9);
        assert_eq!(a.set("month", 10).month(), 10);
        assert_eq!(a.set("months", 11).month(), 11);
        assert_eq!(a.set("D", 8).date(), 8);
        assert_eq!(a.set("date", 9).date(), 9);
        assert_eq!(a.set("dates", 10).date(), 10);
        assert_eq!(a.set("h", 14).hour(), 14);
        assert_eq!(a.set("hour", 15).hour(), 15);
        assert_eq!(a.set("hours", 16).hour(), 16);
        assert_eq!(a.set("m", 17).minute(), 17);
        assert_eq!(a.set("minute", 18).minute(), 18);
        assert_eq!(a.set("minutes", 19).minute(), 19);
        assert_eq!(a.set("s", 20).second(), 20);
        assert_eq!(a.set("second", 21).second(), 21);
        assert_eq!(a.set("seconds", 22).second(), 22);
        assert_eq!(a.set("ms", 230).millisecond(), 230);
        assert_eq!(a.set("millisecond", 240).millisecond(), 240);
        assert_eq!(a.set("milliseconds", 250).millisecond(), 250);
        assert_eq!(a.set("ns", 100_000).nanosecond(), 100_000);
        assert_eq!(a.set("nanosecond", 100_001).nanosecond(), 100_001);
        assert_eq!(a.set("nanoseconds", 100_002).nanosecond(), 100_002);
    }

    #[test]
    fn test_set_day() {
        let mut a = fixed("2022-09-12 12:00:00");

        assert_eq!(a.set_day(0).day(), 0);
        assert_eq!(a.set_day_by_name("tuesday").day(), 2);
        assert_eq!(a.format("YYYY-MM-DD"), "2022-09-13");
        assert_eq!(a.set_day_by_name("someday").day(), 2);
    }

    #[test]
    fn test_setters() {
        let base = fixed("2022-09-12 12:00:00");

        assert_eq!(base.clone().set_year(2016).year(), 2016);
        assert_eq!(base.clone().set_month(5).month(), 5);
        assert_eq!(base.clone().set_date(5).date(), 5);
        assert_eq!(base.clone().set_day_of_year(300).day_of_year(), 300);
        assert_eq!(base.clone().set_hour(12).hour(), 12);
        assert_eq!(base.clone().set_minute(12).minute(), 12);
        assert_eq!(base.clone().set_second(12).second(), 12);
        assert_eq!(base.clone().set_millisecond(100).millisecond(), 100);
        assert_eq!(base.clone().set_nanosecond(1_000_000).nanosecond(), 1_000_000);
        assert_eq!(base.clone().set_week(12).week(), 12);
        assert_eq!(base.clone().set_week_year(2020).week_year(), 2020);
        assert_eq!(base.clone().set_weekday(2).weekday(), 2);
        assert_eq!(base.clone().set_quarter(1).quarter(), 1);
        assert_eq!(base.clone().set_iso_week(12).iso_week(), 12);
        assert_eq!(base.clone().set_iso_week_year(2022).iso_week_year(), 2022);
        assert_eq!(base.clone().set_iso_weekday(2).iso_weekday(), 2);
    }

    #[test]
    fn test_set_pins_to_month_end() {
        let mut a = fixed("2020-01-31 08:00:00");
        assert_eq!(a.set_month(2).format("YYYY-MM-DD HH:mm"), "2020-02-29 08:00");
        assert_eq!(a.set_date(31).date(), 29);
        assert_eq!(a.set_year(2021).format("YYYY-MM-DD"), "2021-02-28");
    }

    #[test]
    fn test_set_overflow_bubbles() {
        let mut a = fixed("2022-09-12 12:00:00");
        assert_eq!(a.set_hour(25).format("YYYY-MM-DD HH:mm"), "2022-09-13 01:00");
        assert_eq!(a.set_month(13).format("YYYY-MM"), "2023-01");
        assert_eq!(a.set_millisecond(1000).millisecond(), 0);
    }

    #[test]
    fn test_extreme_setter_values_leave_value_unchanged() {
        let original = fixed("2022-09-12 12:00:00");
        let mut a = original.clone();

        a.set_hour(i64::MIN)
            .set_minute(i64::MIN)
            .set_second(i64::MAX)
            .set_millisecond(i64::MIN)
            .set_month(i64::MIN)
            .set_quarter(i64::MIN)
            .set_quarter(i64::MAX)
            .set_day(i64::MIN)
            .set_week(i64::MIN)
            .set_iso_week(i64::MIN)
            .set_iso_weekday(i64::MIN)
            .set_year(i64::MAX)
            .set("M", i64::MIN);
        assert_eq!(a, original);

        a.set_utc_offset(i32::MIN).set_utc_offset(i32::MAX);
        assert_eq!(a.utc_offset(), 0);
        assert!(a.is_same(&original));
    }

    #[test]
    fn test_extreme_add_and_subtract() {
        let original = fixed("2022-09-12 12:00:00");
        let mut a = original.clone();
        a.add(i64::MAX, "years").subtract(i64::MIN, "days").add(i64::MIN, "ms");
        assert_eq!(a, original);
    }

    #[test]
    fn test_set_quarter_keeps_position() {
        let mut a = fixed("2022-09-12 12:00:00");
        assert_eq!(a.set_quarter(1).format("YYYY-MM-DD"), "2022-03-12");
    }

    #[test]
    fn test_week_numbers() {
        assert_eq!(fixed("2022-01-01").week(), 1);
        assert_eq!(fixed("2021-12-26").week(), 1);
        assert_eq!(fixed("2021-12-26").week_year(), 2022);
        assert_eq!(fixed("2022-12-31").week(), 53);
        assert_eq!(weeks_in_year(2022), 53);
        assert_eq!(weeks_in_year(2021), 52);
    }

    #[test]
    fn test_set_week_year_keeps_week_and_day() {
        let mut a = fixed("2022-09-12 12:00:00");
        let (week, day) = (a.week(), a.day());
        a.set_week_year(2020);
        assert_eq!((a.week_year(), a.week(), a.day()), (2020, week, day));
        assert_eq!(a.hour(), 12);
    }

    #[test]
    fn test_set_utc_offset() {
        let mut a = fixed("2022-09-12 12:00:00");
        assert_eq!(a.set_utc_offset(7).utc_offset(), 7 * 60);
        assert_eq!(a.hour(), 19);
        assert_eq!(a.to_unix(), fixed("2022-09-12 12:00:00").to_unix());

        assert_eq!(a.set_utc_offset(-90).utc_offset(), -90);
        assert_eq!(a.set_utc_offset(100_000).utc_offset(), -90);
        assert_eq!(a.utc().utc_offset(), 0);
    }

    #[test]
    fn test_comparisons() {
        let a = fixed("2020-01-02");
        let b = fixed("2020-01-03");
        assert!(a.is_before(&b));
        assert!(b.is_after(&a));

        let mut shifted = a.clone();
        shifted.set_utc_offset(7);
        assert!(a.is_same(&shifted));
    }

    #[test]
    fn test_display_and_from() {
        let a = fixed(STRING_FORMAT);
        assert_eq!(a.to_string(), "2020-02-02T12:00:00+00:00");

        let b = fixed("2020-02-02 12:07:00");
        assert_eq!(a.from(&b), "7 minutes ago");
        assert_eq!(b.from(&a), "in 7 minutes");
    }
}
