//! Event calendar - month grid construction and the event list

pub mod events;

pub use events::{demo_events, CalendarEvent, EventCategory, EventDraft, EventList};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for calendar operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Year out of range: {0}")]
    OutOfRange(i32),
}

/// First column of each week row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    /// Column headers in display order
    pub fn labels(self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
        }
    }
}

/// One day in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,

    /// False for padding days from the previous or next month
    pub in_month: bool,

    pub is_today: bool,

    /// Events on this day, in list order
    pub events: Vec<CalendarEvent>,
}

/// Weeks x 7 day cells covering one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    week_start: WeekStart,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Build the grid for `year`-`month`
    ///
    /// Leading cells are filled from the previous month and trailing cells from
    /// the next, so every row has seven days.
    pub fn build(year: i32, month: u32, week_start: WeekStart) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::OutOfRange(year))?;
        let days = days_in_month(year, month)?;

        let lead = ((first.weekday().num_days_from_monday() + 7
            - week_start.weekday().num_days_from_monday())
            % 7) as i64;
        let total = (lead + days as i64 + 6) / 7 * 7;
        let start = first
            .checked_sub_signed(Duration::days(lead))
            .ok_or(CalendarError::OutOfRange(year))?;

        let cells = (0..total)
            .map(|offset| {
                let date = start
                    .checked_add_signed(Duration::days(offset))
                    .ok_or(CalendarError::OutOfRange(year))?;
                Ok(DayCell {
                    date,
                    in_month: date.month() == month && date.year() == year,
                    is_today: false,
                    events: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, CalendarError>>()?;

        Ok(Self {
            year,
            month,
            week_start,
            cells,
        })
    }

    /// Grid for the month containing `date`
    pub fn containing(date: NaiveDate, week_start: WeekStart) -> Result<Self, CalendarError> {
        Self::build(date.year(), date.month(), week_start)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// e.g. "March 2026"
    pub fn title(&self) -> String {
        self.cells
            .iter()
            .find(|cell| cell.in_month)
            .map(|cell| cell.date.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Rows of seven cells
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    /// Flag the cell for `today`, if it is on the grid
    pub fn mark_today(mut self, today: NaiveDate) -> Self {
        for cell in &mut self.cells {
            cell.is_today = cell.date == today;
        }
        self
    }

    /// Attach events to their cells; events off the grid are skipped
    pub fn with_events<'a>(mut self, events: impl IntoIterator<Item = &'a CalendarEvent>) -> Self {
        for event in events {
            if let Some(cell) = self.cells.iter_mut().find(|cell| cell.date == event.date) {
                cell.events.push(event.clone());
            }
        }
        self
    }

    /// Events attached to `date`
    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        self.cell(date).map(|cell| cell.events.as_slice()).unwrap_or_default()
    }

    /// Empty grid for the following month
    pub fn next(&self) -> Result<Self, CalendarError> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        Self::build(year, month, self.week_start)
    }

    /// Empty grid for the preceding month
    pub fn prev(&self) -> Result<Self, CalendarError> {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        Self::build(year, month, self.week_start)
    }
}

/// Number of days in a month
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }

    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next =
        NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or(CalendarError::OutOfRange(year))?;
    first_of_next
        .pred_opt()
        .map(|last| last.day())
        .ok_or(CalendarError::OutOfRange(year))
}
