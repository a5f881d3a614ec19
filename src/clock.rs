//! Clock source and calendar arithmetic
//!
//! Everything here is a pure function of a local wall-clock instant,
//! except for the `Clock` implementations that produce that instant.

use crate::types::Progress;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};

const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_WEEK: f64 = 604_800.0;
const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The real wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Everything the clock panel shows for one instant
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSnapshot {
    pub time: String,
    pub date: String,
    pub week: u32,
    pub day: Progress,
    pub week_progress: Progress,
    pub month: Progress,
    pub year: Progress,
}

impl CalendarSnapshot {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            time: time_string(now),
            date: date_string(now),
            week: week_number(now),
            day: day_progress(now),
            week_progress: week_progress(now),
            month: month_progress(now),
            year: year_progress(now),
        }
    }

    /// Labelled progress rows in display order
    pub fn progress_rows(&self) -> [(&'static str, Progress); 4] {
        [
            ("Day", self.day),
            ("Week", self.week_progress),
            ("Month", self.month),
            ("Year", self.year),
        ]
    }
}

/// 12-hour clock, e.g. "09:05:03 PM"
pub fn time_string(now: NaiveDateTime) -> String {
    now.format("%I:%M:%S %p").to_string()
}

/// Long date, e.g. "Monday, January 1, 2024"
pub fn date_string(now: NaiveDateTime) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// Week of the year counted from the weekday of January 1st.
///
/// Not ISO-8601: there is no Thursday anchoring, so the first days of
/// January can land in week 1 or 2 depending on the time of day.
pub fn week_number(now: NaiveDateTime) -> u32 {
    let days_since_jan1 = now.ordinal0() as f64 + seconds_of_day(now) / SECONDS_PER_DAY;
    let jan1_weekday = jan1_weekday(now) as f64;
    ((days_since_jan1 + jan1_weekday + 1.0) / 7.0).ceil() as u32
}

pub fn day_progress(now: NaiveDateTime) -> Progress {
    Progress::from_fraction(seconds_of_day(now) / SECONDS_PER_DAY)
}

/// Weeks start on Sunday
pub fn week_progress(now: NaiveDateTime) -> Progress {
    let weekday = now.weekday().num_days_from_sunday() as f64;
    Progress::from_fraction((weekday * SECONDS_PER_DAY + seconds_of_day(now)) / SECONDS_PER_WEEK)
}

pub fn month_progress(now: NaiveDateTime) -> Progress {
    let elapsed = now.day0() as f64 + seconds_of_day(now) / SECONDS_PER_DAY;
    Progress::from_fraction(elapsed / days_in_month(now.date()) as f64)
}

pub fn year_progress(now: NaiveDateTime) -> Progress {
    let elapsed = now.ordinal0() as f64 + seconds_of_day(now) / SECONDS_PER_DAY;
    Progress::from_fraction(elapsed / days_in_year(now.date()) as f64)
}

/// Milliseconds until the minutes next roll over to zero
pub fn millis_until_next_hour(now: NaiveDateTime) -> i64 {
    let into_hour = now.minute() as i64 * 60_000
        + now.second() as i64 * 1_000
        + (now.nanosecond() / 1_000_000).min(999) as i64;
    MILLIS_PER_HOUR - into_hour
}

/// Length of the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(31, |last| last.day())
}

/// Length of the year containing `date`
pub fn days_in_year(date: NaiveDate) -> u32 {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |last| last.ordinal())
}

fn seconds_of_day(now: NaiveDateTime) -> f64 {
    now.num_seconds_from_midnight() as f64
}

/// 0 = Sunday
fn jan1_weekday(now: NaiveDateTime) -> u32 {
    let weekday = now.weekday().num_days_from_sunday();
    (weekday + 7 - now.ordinal0() % 7) % 7
}

/// Clock pinned to a settable instant
#[cfg(test)]
pub struct FixedClock {
    now: std::sync::Mutex<DateTime<Local>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn at(naive: NaiveDateTime) -> Self {
        use chrono::TimeZone;
        let now = Local.from_local_datetime(&naive).earliest().unwrap();
        Self { now: std::sync::Mutex::new(now) }
    }

    pub fn advance(&self, millis: i64) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::milliseconds(millis);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}
