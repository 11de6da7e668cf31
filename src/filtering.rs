use crate::types::day_window::{DayKind, DayWindow};
use polars::prelude::{col, lit, LazyFrame};

pub trait StoryFrameFilterExt {
    /// Keeps the rows whose derived `hour` column falls in `window`.
    /// Assumes the frame carries an integer `hour` column.
    fn filter_window(self, window: DayWindow) -> LazyFrame;

    /// Keeps weekday (Monday–Friday) or weekend rows.
    /// Assumes the frame carries an integer `dayofweek` column, 0 being Monday.
    fn filter_day_kind(self, kind: DayKind) -> LazyFrame;

    /// Keeps rows whose `date_column` lies in calendar year `year`.
    ///
    /// # Arguments
    /// * `date_column`: Name of a `Date` or `Datetime` column.
    /// * `year`: The calendar year to keep.
    fn filter_year(self, date_column: &str, year: i32) -> LazyFrame;

    /// Keeps rows whose `date_column` lies in a calendar year within `start_year..=end_year`.
    fn filter_year_range(self, date_column: &str, start_year: i32, end_year: i32) -> LazyFrame;
}

impl StoryFrameFilterExt for LazyFrame {
    fn filter_window(self, window: DayWindow) -> LazyFrame {
        self.filter(window.predicate())
    }

    fn filter_day_kind(self, kind: DayKind) -> LazyFrame {
        self.filter(kind.predicate())
    }

    fn filter_year(self, date_column: &str, year: i32) -> LazyFrame {
        self.filter(col(date_column).dt().year().eq(lit(year)))
    }

    fn filter_year_range(self, date_column: &str, start_year: i32, end_year: i32) -> LazyFrame {
        self.filter(
            col(date_column)
                .dt()
                .year()
                .gt_eq(lit(start_year))
                .and(col(date_column).dt().year().lt_eq(lit(end_year))),
        )
    }
}
