//! End-to-end analysis of the hourly I-94 traffic file.

use crate::analysis::write_json;
use crate::error::DataStoryError;
use crate::loader::csv_loader::{CsvOptions, DatasetLoader};
use crate::types::aggregates::{GroupMean, WeatherCorrelation};
use crate::types::day_window::{DayKind, DayWindow};
use crate::types::describe::Describe;
use crate::types::frames::traffic_frame::TrafficLazyFrame;
use crate::types::traffic_record::{CategoricalWeather, TRAFFIC_COLUMNS};
use bon::bon;
use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Loads a traffic file and summarises it.
///
/// ```no_run
/// use datastory::TrafficAnalysis;
///
/// # fn main() -> Result<(), datastory::DataStoryError> {
/// let report = TrafficAnalysis::builder()
///     .path("Metro_Interstate_Traffic_Volume.csv")
///     .build()
///     .run()?;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TrafficAnalysis {
    path: PathBuf,
}

#[bon]
impl TrafficAnalysis {
    #[builder]
    pub fn new(#[builder(into)] path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the file and derives the hour, month and day-of-week columns.
    ///
    /// Every record must carry a timestamp; a record without one could be placed in
    /// neither the day nor the night window, so the file is rejected with
    /// [`DataStoryError::MissingTimestamp`].
    pub fn load(&self) -> Result<TrafficLazyFrame, DataStoryError> {
        let raw = DatasetLoader::load(&self.path, &CsvOptions::new(&TRAFFIC_COLUMNS))?;
        let traffic = TrafficLazyFrame::from_raw(raw);
        match traffic.missing_timestamps()? {
            0 => Ok(traffic),
            rows => Err(DataStoryError::MissingTimestamp {
                path: self.path.clone(),
                rows,
            }),
        }
    }

    pub fn run(&self) -> Result<TrafficReport, DataStoryError> {
        TrafficReport::from_frame(&self.load()?)
    }
}

/// Everything the traffic analysis computes.
///
/// Apart from the totals and the overall and night distributions, every figure is
/// computed over the day window (07:00 to 18:59) only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub total_rows: usize,
    pub day_rows: usize,
    pub night_rows: usize,
    pub overall: Option<Describe>,
    pub day: Option<Describe>,
    pub night: Option<Describe>,
    pub day_by_month: Vec<GroupMean<u32>>,
    pub day_by_day_of_week: Vec<GroupMean<u32>>,
    pub weekday_by_hour: Vec<GroupMean<u32>>,
    pub weekend_by_hour: Vec<GroupMean<u32>>,
    pub correlations: Vec<WeatherCorrelation>,
    pub by_weather_main: Vec<GroupMean<String>>,
    pub by_weather_description: Vec<GroupMean<String>>,
}

impl TrafficReport {
    pub fn from_frame(traffic: &TrafficLazyFrame) -> Result<Self, DataStoryError> {
        let total_rows = traffic.row_count()?;
        let (day_rows, night_rows) = traffic.window_counts()?;
        info!(
            "{} traffic records: {} during the day, {} at night",
            total_rows, day_rows, night_rows
        );
        if night_rows < day_rows {
            // Night hours are under-recorded in the source; reported, not corrected
            warn!(
                "Night window holds {} fewer records than the day window",
                day_rows - night_rows
            );
        }

        let day = traffic.window(DayWindow::Day);
        Ok(Self {
            total_rows,
            day_rows,
            night_rows,
            overall: traffic.describe_volume()?,
            day: day.describe_volume()?,
            night: traffic.window(DayWindow::Night).describe_volume()?,
            day_by_month: day.mean_by_month()?,
            day_by_day_of_week: day.mean_by_day_of_week()?,
            weekday_by_hour: day.day_kind(DayKind::Weekday).mean_by_hour()?,
            weekend_by_hour: day.day_kind(DayKind::Weekend).mean_by_hour()?,
            correlations: day.weather_correlations()?,
            by_weather_main: day.mean_by_category(CategoricalWeather::Main)?,
            by_weather_description: day.mean_by_category(CategoricalWeather::Description)?,
        })
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DataStoryError> {
        write_json(self, path.as_ref())
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, title: &str, summary: &Option<Describe>) -> fmt::Result {
    writeln!(f, "{title}")?;
    match summary {
        Some(summary) => write!(f, "{summary}"),
        None => writeln!(f, "(no records)"),
    }
}

impl fmt::Display for TrafficReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records ({} day, {} night)",
            self.total_rows, self.day_rows, self.night_rows
        )?;
        write_summary(f, "\nTraffic volume", &self.overall)?;
        write_summary(f, "\nDay (07:00-19:00)", &self.day)?;
        write_summary(f, "\nNight (19:00-07:00)", &self.night)?;

        writeln!(f, "\nDaytime mean by month")?;
        for group in &self.day_by_month {
            writeln!(f, "{:>4}{:>12.1}", group.key, group.mean)?;
        }
        writeln!(f, "\nDaytime mean by day of week")?;
        for group in &self.day_by_day_of_week {
            let name = DAY_NAMES.get(group.key as usize).copied().unwrap_or("?");
            writeln!(f, "{:<10}{:>12.1}", name, group.mean)?;
        }
        writeln!(f, "\nDaytime mean by hour (weekday / weekend)")?;
        for (label, groups) in [("weekday", &self.weekday_by_hour), ("weekend", &self.weekend_by_hour)] {
            for group in groups {
                writeln!(f, "{:<8}{:>4}{:>12.1}", label, group.key, group.mean)?;
            }
        }

        writeln!(f, "\nCorrelation with traffic volume")?;
        for correlation in &self.correlations {
            match correlation.coefficient {
                Some(r) => writeln!(f, "{:<12}{:>10.6}", correlation.field.column(), r)?,
                None => writeln!(f, "{:<12}{:>10}", correlation.field.column(), "NaN")?,
            }
        }

        writeln!(f, "\nDaytime mean by weather_main")?;
        for group in &self.by_weather_main {
            writeln!(f, "{:<14}{:>12.1}", group.key, group.mean)?;
        }
        writeln!(f, "\nDaytime mean by weather_description")?;
        for group in &self.by_weather_description {
            writeln!(f, "{:<36}{:>12.1}", group.key, group.mean)?;
        }
        Ok(())
    }
}
