use serde::{Deserialize, Serialize};

use crate::day::CalendarDay;
use crate::habit::CompletionLog;

/// Week columns in the year view.
pub const YEAR_GRID_WEEKS: usize = 53;
/// Weekday rows in the year view.
pub const YEAR_GRID_ROWS: usize = 7;

/// Days of history shown before the reference day. The remainder of the
/// 53x7 grid extends forward from there; the offset formula is a fixed
/// contract and must not be re-anchored.
const HISTORY_DAYS: i64 = 28;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearCell {
    pub day: CalendarDay,
    pub completed: bool,
}

/// Fixed-shape 53x7 matrix for the contribution-style year view, indexed
/// as `(week column, weekday row)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearGrid {
    pub weeks: Vec<Vec<YearCell>>,
}

impl YearGrid {
    pub fn cell(&self, week: usize, row: usize) -> Option<&YearCell> {
        self.weeks.get(week).and_then(|column| column.get(row))
    }
}

fn year_cell_day(reference: CalendarDay, week: usize, row: usize) -> CalendarDay {
    let offset = -HISTORY_DAYS + (week * YEAR_GRID_ROWS + row) as i64;
    reference.add_days(offset)
}

pub fn year_grid(completions: &CompletionLog, reference: CalendarDay) -> YearGrid {
    let weeks = (0..YEAR_GRID_WEEKS)
        .map(|week| {
            (0..YEAR_GRID_ROWS)
                .map(|row| {
                    let day = year_cell_day(reference, week, row);
                    YearCell {
                        day,
                        completed: completions.is_completed(day),
                    }
                })
                .collect()
        })
        .collect();
    YearGrid { weeks }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthLabel {
    /// Calendar month number, 1-12.
    pub month: u32,
    /// Week column at which the month is first visible.
    pub week: usize,
}

impl MonthLabel {
    pub fn name(self) -> &'static str {
        const NAMES: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        NAMES[(self.month as usize + 11) % 12]
    }
}

/// One label per calendar month visible in the year grid, keyed by each
/// week's row-0 date: first-occurrence order over weeks 0..53, then the
/// whole list reversed.
pub fn month_labels(reference: CalendarDay) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();
    for week in 0..YEAR_GRID_WEEKS {
        let month = year_cell_day(reference, week, 0).month();
        if !labels.iter().any(|label| label.month == month) {
            labels.push(MonthLabel { month, week });
        }
    }
    labels.reverse();
    labels
}

/// A calendar month, navigable one month at a time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(day: CalendarDay) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn first_day(self) -> Option<CalendarDay> {
        CalendarDay::from_ymd(self.year, self.month, 1)
    }

    pub fn day_count(self) -> i64 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => {
                next.date().signed_duration_since(first.date()).num_days()
            }
            _ => 0,
        }
    }

    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthCell {
    pub day: CalendarDay,
    pub completed: bool,
    pub is_today: bool,
}

/// Monday-first month view: leading `None` placeholders align the first day
/// of the month into its weekday column, then one entry per day in order.
/// No trailing padding. An unrepresentable month yields an empty sequence.
pub fn month_grid(
    completions: &CompletionLog,
    month: YearMonth,
    today: CalendarDay,
) -> Vec<Option<MonthCell>> {
    let Some(first) = month.first_day() else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Option<MonthCell>> = vec![None; leading];

    for offset in 0..month.day_count() {
        let day = first.add_days(offset);
        cells.push(Some(MonthCell {
            day,
            completed: completions.is_completed(day),
            is_today: day == today,
        }));
    }

    cells
}
