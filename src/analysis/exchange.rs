//! The euro exchange-rate story: clean one currency's daily series, smooth it and cut
//! it into one panel per story year.

use crate::analysis::write_json;
use crate::chart::layout::{StoryPanel, STORY_GRID, STORY_PANELS};
use crate::error::DataStoryError;
use crate::loader::csv_loader::{CsvOptions, DatasetLoader};
use crate::types::exchange_rate::{
    Currency, RatePoint, DEFAULT_ROLLING_WINDOW, SOURCE_DATE_COLUMN,
};
use crate::types::frames::rate_frame::{ExchangeRateFrame, RawRateFrame};
use bon::bon;
use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Builds the exchange-rate story from the ECB history file.
///
/// ```no_run
/// use datastory::{Currency, ExchangeRateStory};
///
/// # fn main() -> Result<(), datastory::DataStoryError> {
/// let story = ExchangeRateStory::builder()
///     .path("euro-daily-hist_1999_2020.csv")
///     .currency(Currency::us_dollar())
///     .build()
///     .run()?;
/// for panel in &story.panels {
///     println!("{}: {:?}", panel.title, panel.change_pct);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeRateStory {
    path: PathBuf,
    currency: Currency,
    rolling_window: usize,
}

#[bon]
impl ExchangeRateStory {
    /// `currency` defaults to the US dollar and `rolling_window` to 30 rows. A window of
    /// zero rows has no mean, so it is raised to one row: every point is its own mean.
    #[builder]
    pub fn new(
        #[builder(into)] path: PathBuf,
        currency: Option<Currency>,
        rolling_window: Option<usize>,
    ) -> Self {
        Self {
            path,
            currency: currency.unwrap_or_default(),
            rolling_window: rolling_window.unwrap_or(DEFAULT_ROLLING_WINDOW).max(1),
        }
    }

    /// Loads the file with every column as text. The missing-value marker keeps the
    /// currency columns from being numeric, so nothing is inferred.
    fn load_raw(&self) -> Result<RawRateFrame, DataStoryError> {
        let currency_column = self.currency.source_column();
        let options = CsvOptions::new(&[SOURCE_DATE_COLUMN, currency_column.as_str()]).all_text();
        let raw = DatasetLoader::load(&self.path, &options)?;
        Ok(RawRateFrame::new(raw, self.currency.clone()))
    }

    pub fn run(&self) -> Result<RateStory, DataStoryError> {
        let dated = self.load_raw()?.rename_columns().sort_by_date();
        let source_rows = dated.row_count()?;
        let missing_rows = dated.missing_count()?;
        info!(
            "{} of {} {} rows hold no observation",
            missing_rows,
            source_rows,
            self.currency.name()
        );

        let rates = dated
            .drop_missing()
            .to_numeric()
            .with_rolling_mean(self.rolling_window)?;
        let series = rates.collect_points()?;

        let (first_year, last_year) = story_years();
        let story_rows = rates.story_window(first_year, last_year).row_count()?;

        let panels = STORY_PANELS
            .iter()
            .zip((0..).map_while(|i| STORY_GRID.position(i)))
            .map(|(panel, cell)| YearPanel::from_rates(&rates, panel, cell))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RateStory {
            currency: rates.currency().name().to_string(),
            source_rows,
            missing_rows,
            clean_rows: series.len(),
            story_rows,
            rolling_window: self.rolling_window,
            series,
            panels,
        })
    }
}

fn story_years() -> (i32, i32) {
    let years = STORY_PANELS.iter().map(|p| p.year);
    (
        years.clone().min().unwrap_or_default(),
        years.max().unwrap_or_default(),
    )
}

/// One calendar year of the cleaned series and where it sits in the panel grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPanel {
    pub year: i32,
    pub title: String,
    pub row: usize,
    pub column: usize,
    pub points: Vec<RatePoint>,
    /// First-to-last change of the rate within the year, in percent.
    pub change_pct: Option<f64>,
}

impl YearPanel {
    fn from_rates(
        rates: &ExchangeRateFrame,
        panel: &StoryPanel,
        (row, column): (usize, usize),
    ) -> Result<Self, DataStoryError> {
        let points = rates.year_slice(panel.year).collect_points()?;
        debug!("{}: {} points", panel.title(), points.len());
        Ok(Self {
            year: panel.year,
            title: panel.title(),
            row,
            column,
            change_pct: rates.year_change_pct(panel.year)?,
            points,
        })
    }

    /// Mean of the rolling-mean values inside this year.
    pub fn mean_rolling(&self) -> Option<f64> {
        let values: Vec<f64> = self.points.iter().filter_map(|p| p.rolling_mean).collect();
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Result of [`ExchangeRateStory::run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateStory {
    pub currency: String,
    /// Rows in the source file.
    pub source_rows: usize,
    /// Rows dropped because they held the `-` marker.
    pub missing_rows: usize,
    pub clean_rows: usize,
    /// Clean rows dated within the story years.
    pub story_rows: usize,
    pub rolling_window: usize,
    pub series: Vec<RatePoint>,
    pub panels: Vec<YearPanel>,
}

impl RateStory {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DataStoryError> {
        write_json(self, path.as_ref())
    }
}

impl fmt::Display for RateStory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EUR to {}", self.currency)?;
        writeln!(
            f,
            "{} rows, {} without observation, {} clean ({} in story years)",
            self.source_rows, self.missing_rows, self.clean_rows, self.story_rows
        )?;
        if let (Some(first), Some(last)) = (self.series.first(), self.series.last()) {
            writeln!(
                f,
                "{} to {}, {}-day rolling mean",
                first.date, last.date, self.rolling_window
            )?;
        }
        for panel in &self.panels {
            write!(f, "\n[{},{}] {:<48}", panel.row, panel.column, panel.title)?;
            write!(f, "{:>5} days", panel.points.len())?;
            if let Some(mean) = panel.mean_rolling() {
                write!(f, "  mean {mean:.4}")?;
            }
            if let Some(change) = panel.change_pct {
                write!(f, "  {change:+.2}%")?;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::exchange_rate::DATE_FORMAT;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Writes an ECB-style file, most recent day first.
    fn rates_file(rows: &[(NaiveDate, &str)]) -> Result<NamedTempFile, std::io::Error> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Period\\Unit:,[Australian dollar ],[US dollar ]")?;
        for (date, usd) in rows.iter().rev() {
            writeln!(file, "{},1.6000,{}", date.format(DATE_FORMAT), usd)?;
        }
        Ok(file)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_story_panels_cover_each_year() -> Result<(), Box<dyn std::error::Error>> {
        let mut rows = Vec::new();
        for year in 2014..=2022 {
            rows.push((date(year, 1, 5), "1.1000"));
            rows.push((date(year, 6, 1), "-"));
            rows.push((date(year, 12, 20), "1.2100"));
        }
        let file = rates_file(&rows)?;

        let story = ExchangeRateStory::builder()
            .path(file.path())
            .rolling_window(2)
            .build()
            .run()?;

        assert_eq!(story.currency, "US dollar");
        assert_eq!(story.source_rows, 27);
        assert_eq!(story.missing_rows, 9);
        assert_eq!(story.clean_rows, 18);
        assert_eq!(story.story_rows, 14);
        assert!(story.series.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(story.series[0].rolling_mean, None);

        let years: Vec<i32> = story.panels.iter().map(|p| p.year).collect();
        assert_eq!(years, (2015..=2021).collect::<Vec<_>>());
        let last = &story.panels[6];
        assert_eq!(last.title, "2021: Year After UK Withdrawal");
        assert_eq!((last.row, last.column), (3, 0));

        let panel = &story.panels[0];
        assert_eq!(panel.points.len(), 2);
        assert!(panel.points.iter().all(|p| p.date.format("%Y").to_string() == "2015"));
        // Rolling values carry over the year boundary
        assert!((panel.points[0].rolling_mean.unwrap() - 1.155).abs() < 1e-9);
        assert!((panel.change_pct.unwrap() - 10.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_default_window_and_display() -> Result<(), Box<dyn std::error::Error>> {
        let rows: Vec<(NaiveDate, &str)> = (0..45)
            .map(|i| (date(2020, 1, 1) + chrono::Duration::days(i), "1.1000"))
            .collect();
        let file = rates_file(&rows)?;

        let story = ExchangeRateStory::builder().path(file.path()).build().run()?;
        assert_eq!(story.rolling_window, DEFAULT_ROLLING_WINDOW);
        assert_eq!(story.series.iter().filter(|p| p.rolling_mean.is_some()).count(), 16);
        assert!(story.panels[0].points.is_empty());
        let mean = story.panels[5].mean_rolling().unwrap();
        assert!((mean - 1.1).abs() < 1e-9);

        let text = story.to_string();
        assert!(text.starts_with("EUR to US dollar"));
        assert!(text.contains("2020: Brexit Agreement Passes"));

        let dir = tempfile::tempdir()?;
        let target = dir.path().join("story.json");
        story.write_json(&target)?;
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&target)?)?;
        assert_eq!(json["panels"].as_array().map(Vec::len), Some(7));
        Ok(())
    }

    #[test]
    fn test_zero_window_is_raised_to_one_row() -> Result<(), Box<dyn std::error::Error>> {
        let file = rates_file(&[(date(2019, 3, 28), "1.1236"), (date(2019, 3, 29), "1.1235")])?;
        let story = ExchangeRateStory::builder()
            .path(file.path())
            .rolling_window(0)
            .build()
            .run()?;
        assert_eq!(story.rolling_window, 1);
        assert!(story.series.iter().all(|p| p.rolling_mean == Some(p.rate)));
        Ok(())
    }

    #[test]
    fn test_other_currency() -> Result<(), Box<dyn std::error::Error>> {
        let file = rates_file(&[(date(2016, 6, 23), "1.1300")])?;
        let story = ExchangeRateStory::builder()
            .path(file.path())
            .currency(Currency::new("Australian dollar"))
            .build()
            .run()?;
        assert_eq!(story.series[0].rate, 1.6);
        Ok(())
    }

    #[test]
    fn test_unknown_currency_is_missing_column() -> Result<(), Box<dyn std::error::Error>> {
        let file = rates_file(&[(date(2016, 6, 23), "1.1300")])?;
        let result = ExchangeRateStory::builder()
            .path(file.path())
            .currency(Currency::new("Japanese yen"))
            .build()
            .run();
        assert!(matches!(result, Err(DataStoryError::Load(_))));
        Ok(())
    }
}
