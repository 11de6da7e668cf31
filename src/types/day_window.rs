//! Time-of-day and day-of-week partitions of hourly records.

use crate::types::traffic_record::{COL_DAY_OF_WEEK, COL_HOUR};
use polars::prelude::{col, lit, Expr};
use serde::Serialize;
use std::fmt;

/// First hour (inclusive) of the day window.
pub const DAY_START_HOUR: i32 = 7;
/// Hour (exclusive) at which the night window starts.
pub const DAY_END_HOUR: i32 = 19;
/// Last day-of-week index counted as a weekday (0 = Monday, 4 = Friday).
pub const LAST_WEEKDAY: i32 = 4;

/// One of the two disjoint hour-of-day windows.
///
/// Every hour belongs to exactly one window: `Day` covers 07:00 up to but excluding
/// 19:00, `Night` covers 19:00 through 06:59, wrapping past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayWindow {
    Day,
    Night,
}

impl DayWindow {
    /// Classifies an hour of the day (0–23).
    ///
    /// ```
    /// use datastory::DayWindow;
    ///
    /// assert_eq!(DayWindow::from_hour(6), DayWindow::Night);
    /// assert_eq!(DayWindow::from_hour(7), DayWindow::Day);
    /// assert_eq!(DayWindow::from_hour(18), DayWindow::Day);
    /// assert_eq!(DayWindow::from_hour(19), DayWindow::Night);
    /// ```
    pub fn from_hour(hour: u32) -> Self {
        let hour = hour as i32;
        if (DAY_START_HOUR..DAY_END_HOUR).contains(&hour) {
            DayWindow::Day
        } else {
            DayWindow::Night
        }
    }

    pub fn contains(&self, hour: u32) -> bool {
        Self::from_hour(hour) == *self
    }

    /// Polars predicate selecting the rows of this window from the derived `hour` column.
    pub fn predicate(&self) -> Expr {
        match self {
            DayWindow::Day => col(COL_HOUR)
                .gt_eq(lit(DAY_START_HOUR))
                .and(col(COL_HOUR).lt(lit(DAY_END_HOUR))),
            DayWindow::Night => col(COL_HOUR)
                .gt_eq(lit(DAY_END_HOUR))
                .or(col(COL_HOUR).lt(lit(DAY_START_HOUR))),
        }
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayWindow::Day => write!(f, "day"),
            DayWindow::Night => write!(f, "night"),
        }
    }
}

/// Business day or weekend, by day-of-week index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    /// Classifies a day-of-week index where 0 is Monday and 6 is Sunday.
    pub fn from_day_of_week(day_of_week: u32) -> Self {
        if day_of_week as i32 <= LAST_WEEKDAY {
            DayKind::Weekday
        } else {
            DayKind::Weekend
        }
    }

    pub fn predicate(&self) -> Expr {
        match self {
            DayKind::Weekday => col(COL_DAY_OF_WEEK).lt_eq(lit(LAST_WEEKDAY)),
            DayKind::Weekend => col(COL_DAY_OF_WEEK).gt(lit(LAST_WEEKDAY)),
        }
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKind::Weekday => write!(f, "weekday"),
            DayKind::Weekend => write!(f, "weekend"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hour_in_exactly_one_window() {
        let day: Vec<u32> = (0..24).filter(|h| DayWindow::Day.contains(*h)).collect();
        let night: Vec<u32> = (0..24).filter(|h| DayWindow::Night.contains(*h)).collect();

        assert_eq!(day, (7..19).collect::<Vec<u32>>());
        assert_eq!(night.len(), 12);
        assert!(day.iter().all(|h| !night.contains(h)));
        assert_eq!(day.len() + night.len(), 24);
    }

    #[test]
    fn test_night_wraps_past_midnight() {
        for hour in [19, 20, 23, 0, 3, 6] {
            assert_eq!(DayWindow::from_hour(hour), DayWindow::Night, "hour {hour}");
        }
    }

    #[test]
    fn test_day_kind_boundary() {
        assert_eq!(DayKind::from_day_of_week(0), DayKind::Weekday);
        assert_eq!(DayKind::from_day_of_week(4), DayKind::Weekday);
        assert_eq!(DayKind::from_day_of_week(5), DayKind::Weekend);
        assert_eq!(DayKind::from_day_of_week(6), DayKind::Weekend);
    }
}
