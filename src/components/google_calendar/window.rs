//! Time windows used to filter event queries.
//!
//! Every window is half-open, `[start, end)`, in UTC. Year spans use calendar
//! arithmetic, so stepping a year back from Feb 29 lands on Feb 28.

use crate::error::{invalid_argument, CalendarResult};
use chrono::{DateTime, Days, Duration, Months, NaiveDate, Utc};

/// Smallest span any policy may accept, in years
pub const MIN_SPAN_YEARS: u32 = 1;

/// Half-open instant range `[start, end)`; `end == None` is unbounded above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Create a bounded window, rejecting an end before the start
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarResult<Self> {
        if end < start {
            return Err(invalid_argument(&format!(
                "Window end {} is before its start {}",
                end.to_rfc3339(),
                start.to_rfc3339()
            )));
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Create a window with no upper bound
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Length of the window, `None` when unbounded
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

/// Which way a relative span extends from its reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanDirection {
    Past,
    Future,
}

/// Minimum number of years accepted by relative span queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanPolicy {
    min_past_years: u32,
    min_future_years: u32,
}

impl Default for SpanPolicy {
    fn default() -> Self {
        Self {
            min_past_years: MIN_SPAN_YEARS,
            min_future_years: MIN_SPAN_YEARS,
        }
    }
}

impl SpanPolicy {
    /// Create a policy; neither minimum may drop below one year
    pub fn new(min_past_years: u32, min_future_years: u32) -> CalendarResult<Self> {
        if min_past_years < MIN_SPAN_YEARS || min_future_years < MIN_SPAN_YEARS {
            return Err(invalid_argument(&format!(
                "Span minimums must be at least {} year",
                MIN_SPAN_YEARS
            )));
        }
        Ok(Self {
            min_past_years,
            min_future_years,
        })
    }

    pub fn min_years_past(&self) -> u32 {
        self.min_past_years
    }

    pub fn min_years_future(&self) -> u32 {
        self.min_future_years
    }

    /// Minimum for the given direction
    pub fn min_years(&self, direction: SpanDirection) -> u32 {
        match direction {
            SpanDirection::Past => self.min_past_years,
            SpanDirection::Future => self.min_future_years,
        }
    }
}

/// A whole year, a month of a year, or a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarDate {
    WholeYear { year: i32 },
    YearMonth { year: i32, month: u32 },
    ExactDate { year: i32, month: u32, day: u32 },
}

impl CalendarDate {
    /// Build from positional parts where `0` means the part was omitted.
    ///
    /// A day cannot be given without a month.
    pub fn from_parts(year: i32, month: i32, day: i32) -> CalendarResult<Self> {
        if !(0..=12).contains(&month) {
            return Err(invalid_argument(&format!("Invalid month: {}", month)));
        }
        if !(0..=31).contains(&day) {
            return Err(invalid_argument(&format!("Invalid day: {}", day)));
        }

        let date = match (month as u32, day as u32) {
            (0, 0) => CalendarDate::WholeYear { year },
            (0, _) => return Err(invalid_argument("A day requires a month")),
            (month, 0) => CalendarDate::YearMonth { year, month },
            (month, day) => CalendarDate::ExactDate { year, month, day },
        };
        date.validate()?;
        Ok(date)
    }

    pub fn year(&self) -> i32 {
        match *self {
            CalendarDate::WholeYear { year }
            | CalendarDate::YearMonth { year, .. }
            | CalendarDate::ExactDate { year, .. } => year,
        }
    }

    /// Check ranges and that the date actually exists
    pub fn validate(&self) -> CalendarResult<()> {
        self.first_day().map(|_| ())
    }

    /// First day covered by this date
    fn first_day(&self) -> CalendarResult<NaiveDate> {
        let (year, month, day) = match *self {
            CalendarDate::WholeYear { year } => (year, 1, 1),
            CalendarDate::YearMonth { year, month } => (year, month, 1),
            CalendarDate::ExactDate { year, month, day } => (year, month, day),
        };

        if year <= 0 {
            return Err(invalid_argument(&format!("Invalid year: {}", year)));
        }
        if !(1..=12).contains(&month) {
            return Err(invalid_argument(&format!("Invalid month: {}", month)));
        }
        if !(1..=31).contains(&day) {
            return Err(invalid_argument(&format!("Invalid day: {}", day)));
        }

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            invalid_argument(&format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                year, month, day
            ))
        })
    }
}

/// Window for the next `count` events from `from`.
///
/// The count limits the query itself; the window has no upper bound.
pub fn upcoming_window(from: DateTime<Utc>, count: i64) -> CalendarResult<TimeWindow> {
    if count < 1 {
        return Err(invalid_argument("Number of events must be at least 1"));
    }
    Ok(TimeWindow::starting_at(from))
}

/// Window covering `years` calendar years before or after `from`
pub fn relative_span_window(
    from: DateTime<Utc>,
    years: i32,
    direction: SpanDirection,
    policy: &SpanPolicy,
) -> CalendarResult<TimeWindow> {
    let minimum = policy.min_years(direction);
    if years < 0 || (years as u32) < minimum {
        return Err(invalid_argument(&format!(
            "Number of years must be at least {}",
            minimum
        )));
    }

    let months = (years as u32)
        .checked_mul(12)
        .map(Months::new)
        .ok_or_else(|| invalid_argument(&format!("Span of {} years is too large", years)))?;

    match direction {
        SpanDirection::Past => {
            let start = from
                .checked_sub_months(months)
                .ok_or_else(|| invalid_argument(&format!("Span of {} years is out of range", years)))?;
            TimeWindow::new(start, from)
        }
        SpanDirection::Future => {
            let end = from
                .checked_add_months(months)
                .ok_or_else(|| invalid_argument(&format!("Span of {} years is out of range", years)))?;
            TimeWindow::new(from, end)
        }
    }
}

/// Window covering exactly the given year, month or day
pub fn calendar_date_window(date: CalendarDate) -> CalendarResult<TimeWindow> {
    let first = date.first_day()?;

    let next = match date {
        CalendarDate::WholeYear { .. } => first.checked_add_months(Months::new(12)),
        CalendarDate::YearMonth { .. } => first.checked_add_months(Months::new(1)),
        CalendarDate::ExactDate { .. } => first.checked_add_days(Days::new(1)),
    }
    .ok_or_else(|| invalid_argument(&format!("Year {} is out of range", date.year())))?;

    TimeWindow::new(midnight_utc(first)?, midnight_utc(next)?)
}

fn midnight_utc(date: NaiveDate) -> CalendarResult<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| invalid_argument(&format!("Cannot build midnight for {}", date)))
}
