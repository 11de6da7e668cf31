//! Fixed chart geometry: axis bounds, tick labels and the year-panel grid.
//!
//! The panel mapping is presentation data, not a computed layout: story year `i`
//! always lands in grid cell `i` (row-major) of a 4 × 2 grid, leaving the last cell empty.

use chrono::NaiveDate;
use serde::Serialize;

/// Inclusive bounds of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Volume axis shared by the overall, day and night histograms.
pub const VOLUME_HISTOGRAM_X: AxisRange = AxisRange::new(-100.0, 7500.0);
/// Frequency axis shared by the day and night histograms.
pub const VOLUME_HISTOGRAM_Y: AxisRange = AxisRange::new(0.0, 8000.0);
pub const VOLUME_SCATTER_X: AxisRange = AxisRange::new(0.0, 7500.0);
/// Kelvin. A couple of 0 K readings in the source would otherwise flatten the scatter.
pub const TEMPERATURE_RANGE: AxisRange = AxisRange::new(230.0, 320.0);

/// A y-axis shared by every panel so years can be compared at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SharedYAxis {
    pub range: AxisRange,
    pub ticks: &'static [f64],
    pub labels: &'static [&'static str],
}

pub const RATE_Y_AXIS: SharedYAxis = SharedYAxis {
    range: AxisRange::new(0.8, 1.7),
    ticks: &[1.0, 1.2, 1.4, 1.6],
    labels: &["1.0", "1.2", "1.4", "1.6"],
};

/// Rolling-mean line colour of the year panels.
pub const PANEL_LINE_RGB: (u8, u8, u8) = (0xBF, 0x5F, 0xFF);

pub const QUARTER_LABELS: [&str; 4] = ["Jan-Mar", "Apr-Jun", "Jul-Sept", "Oct-Dec"];

/// Quarter labels placed mid-quarter for a panel covering `year`.
pub fn quarter_ticks(year: i32) -> Vec<(NaiveDate, &'static str)> {
    [2, 5, 8, 11]
        .into_iter()
        .zip(QUARTER_LABELS)
        .filter_map(|(month, label)| Some((NaiveDate::from_ymd_opt(year, month, 15)?, label)))
        .collect()
}

/// One year of the exchange-rate story and the event that year is remembered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoryPanel {
    pub year: i32,
    pub caption: &'static str,
}

impl StoryPanel {
    /// Panel heading, e.g. `2017: Article 50 is Invoked`.
    pub fn title(&self) -> String {
        format!("{}: {}", self.year, self.caption)
    }
}

pub const STORY_PANELS: [StoryPanel; 7] = [
    StoryPanel { year: 2015, caption: "Year Before Brexit Introduced" },
    StoryPanel { year: 2016, caption: "Brexit Idea Introduced" },
    StoryPanel { year: 2017, caption: "Article 50 is Invoked" },
    StoryPanel { year: 2018, caption: "Brexit Withdrawal Agreement Published" },
    StoryPanel { year: 2019, caption: "Brexit Controversy Battle" },
    StoryPanel { year: 2020, caption: "Brexit Agreement Passes" },
    StoryPanel { year: 2021, caption: "Year After UK Withdrawal" },
];

/// Fixed grid of chart panels filled row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelGrid {
    pub rows: usize,
    pub columns: usize,
}

pub const STORY_GRID: PanelGrid = PanelGrid { rows: 4, columns: 2 };

impl PanelGrid {
    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }

    /// Zero-based `(row, column)` of the panel at `index`, `None` past the last cell.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.cells()).then(|| (index / self.columns, index % self.columns))
    }

    /// Cells left empty once `panels` panels are placed.
    pub fn unused_cells(&self, panels: usize) -> Vec<(usize, usize)> {
        (panels..self.cells()).filter_map(|i| self.position(i)).collect()
    }
}
