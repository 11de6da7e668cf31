// rate_frame.rs

//! Cleaning pipeline and lazy operations for daily euro exchange rates.
//!
//! The source file is cleaned in four stages, each a separate type so the stages can only
//! run in order:
//!
//! 1. [`RawRateFrame::rename_columns`]: `Period\Unit:` becomes `Time` and the currency
//!    header (`[US dollar ]`) becomes its underscored name (`US_dollar`).
//! 2. [`RenamedRateFrame::sort_by_date`]: `Time` is parsed as a date, rows are sorted
//!    chronologically and numbered with a dense zero-based `index`.
//! 3. [`DatedRateFrame::drop_missing`]: only `index`, `Time` and the currency are kept and
//!    rows holding the `-` marker are dropped.
//! 4. [`FilteredRateFrame::to_numeric`]: the remaining values are cast to `f64` and rows
//!    whose value is not finite (`NaN`, `inf`) are dropped.
//!
//! A value that is neither a number nor exactly `-` makes the final cast fail; it is not
//! treated as missing. Every rate left after cleaning is a finite float.

use crate::error::DataStoryError;
use crate::filtering::StoryFrameFilterExt;
use crate::stats::{percent_change, rolling_mean};
use crate::types::exchange_rate::*;
use chrono::NaiveDate;
use log::{debug, info};
use polars::prelude::*;

/// Days between 0001-01-01 and the Unix epoch, the origin of Polars `Date` values.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Exchange rates exactly as loaded, every column still text.
pub struct RawRateFrame {
    frame: LazyFrame,
    currency: Currency,
}

impl RawRateFrame {
    pub fn new(frame: LazyFrame, currency: Currency) -> Self {
        Self { frame, currency }
    }

    pub fn rename_columns(self) -> RenamedRateFrame {
        debug!(
            "Renaming '{}' to '{}' and '{}' to '{}'",
            SOURCE_DATE_COLUMN,
            COL_TIME,
            self.currency.source_column(),
            self.currency.column()
        );
        let frame = self.frame.rename(
            [SOURCE_DATE_COLUMN.to_string(), self.currency.source_column()],
            [COL_TIME.to_string(), self.currency.column()],
            true,
        );
        RenamedRateFrame {
            frame,
            currency: self.currency,
        }
    }
}

pub struct RenamedRateFrame {
    frame: LazyFrame,
    currency: Currency,
}

impl RenamedRateFrame {
    pub fn sort_by_date(self) -> DatedRateFrame {
        let frame = self
            .frame
            .with_column(col(COL_TIME).str().to_date(StrptimeOptions {
                format: Some(DATE_FORMAT.into()),
                ..Default::default()
            }))
            .sort([COL_TIME], SortMultipleOptions::default())
            .with_row_index(COL_INDEX, None);
        DatedRateFrame {
            frame,
            currency: self.currency,
        }
    }
}

pub struct DatedRateFrame {
    frame: LazyFrame,
    currency: Currency,
}

impl DatedRateFrame {
    /// Number of rows holding the missing-observation marker for the target currency.
    pub fn missing_count(&self) -> Result<usize, DataStoryError> {
        let rate = self.currency.column();
        let df = self
            .frame
            .clone()
            .select([col(rate.as_str()).cast(DataType::String)])
            .filter(col(rate.as_str()).eq(lit(MISSING_MARKER)))
            .collect()?;
        Ok(df.height())
    }

    pub fn row_count(&self) -> Result<usize, DataStoryError> {
        Ok(self.frame.clone().select([col(COL_INDEX)]).collect()?.height())
    }

    pub fn drop_missing(self) -> FilteredRateFrame {
        let rate = self.currency.column();
        let frame = self
            .frame
            .select([
                col(COL_INDEX),
                col(COL_TIME),
                col(rate.as_str()).cast(DataType::String),
            ])
            .filter(col(rate.as_str()).neq(lit(MISSING_MARKER)));
        FilteredRateFrame {
            frame,
            currency: self.currency,
        }
    }
}

pub struct FilteredRateFrame {
    frame: LazyFrame,
    currency: Currency,
}

impl FilteredRateFrame {
    pub fn to_numeric(self) -> ExchangeRateFrame {
        let rate = self.currency.column();
        let frame = self
            .frame
            .with_column(col(rate.as_str()).strict_cast(DataType::Float64))
            .filter(col(rate.as_str()).is_finite());
        ExchangeRateFrame::new(frame, self.currency)
    }
}

/// A cleaned daily series of one currency's rate against the euro.
///
/// Columns: `index` (position after the chronological sort, with gaps where rows were
/// dropped), `Time` (date), the currency column (`f64`) and, once
/// [`ExchangeRateFrame::with_rolling_mean`] has run, `rolling_mean`.
#[derive(Clone)]
pub struct ExchangeRateFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
    currency: Currency,
}

impl ExchangeRateFrame {
    pub fn new(frame: LazyFrame, currency: Currency) -> Self {
        Self { frame, currency }
    }

    /// Runs all four cleaning stages on a frame loaded with every column as text.
    pub fn clean(raw: LazyFrame, currency: Currency) -> Self {
        RawRateFrame::new(raw, currency)
            .rename_columns()
            .sort_by_date()
            .drop_missing()
            .to_numeric()
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Name of the numeric rate column.
    pub fn rate_column(&self) -> String {
        self.currency.column()
    }

    pub fn row_count(&self) -> Result<usize, DataStoryError> {
        Ok(self.frame.clone().select([col(COL_TIME)]).collect()?.height())
    }

    /// Adds a `rolling_mean` column: the mean of the current and preceding `window - 1` rows.
    ///
    /// The window counts rows, not calendar days, so dates missing from the series are not
    /// filled in. The first `window - 1` rows have no value.
    pub fn with_rolling_mean(self, window: usize) -> Result<ExchangeRateFrame, DataStoryError> {
        let mut df = self.frame.collect()?;
        let rates: Vec<f64> = df
            .column(self.currency.column().as_str())?
            .f64()?
            .into_iter()
            .map(|rate| rate.unwrap_or(f64::NAN))
            .collect();
        let rolled = rolling_mean(&rates, window);
        info!(
            "Computed {}-row rolling mean over {} {} rates",
            window,
            rates.len(),
            self.currency.name()
        );
        df.with_column(Series::new(COL_ROLLING_MEAN.into(), rolled))?;
        Ok(ExchangeRateFrame::new(df.lazy(), self.currency))
    }

    /// Rows dated within calendar year `year`.
    pub fn year_slice(&self, year: i32) -> ExchangeRateFrame {
        ExchangeRateFrame::new(
            self.frame.clone().filter_year(COL_TIME, year),
            self.currency.clone(),
        )
    }

    /// Rows dated within the calendar years `start_year..=end_year`.
    pub fn story_window(&self, start_year: i32, end_year: i32) -> ExchangeRateFrame {
        ExchangeRateFrame::new(
            self.frame
                .clone()
                .filter_year_range(COL_TIME, start_year, end_year),
            self.currency.clone(),
        )
    }

    /// Collects the series into dated points, in chronological order.
    pub fn collect_points(&self) -> Result<Vec<RatePoint>, DataStoryError> {
        let df = self.frame.clone().collect()?;
        let dates = df.column(COL_TIME)?.date()?;
        let rates = df.column(self.currency.column().as_str())?.f64()?;
        let rolling: Vec<Option<f64>> = match df.column(COL_ROLLING_MEAN) {
            Ok(column) => column.f64()?.into_iter().collect(),
            Err(_) => vec![None; df.height()],
        };

        Ok(dates
            .into_iter()
            .zip(rates.into_iter())
            .zip(rolling)
            .filter_map(|((days, rate), rolling_mean)| {
                Some(RatePoint {
                    date: NaiveDate::from_num_days_from_ce_opt(days? + EPOCH_DAYS_FROM_CE)?,
                    rate: rate?,
                    rolling_mean,
                })
            })
            .collect())
    }

    /// Percentage change from the first to the last rate observed in `year`.
    pub fn year_change_pct(&self, year: i32) -> Result<Option<f64>, DataStoryError> {
        let points = self.year_slice(year).collect_points()?;
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => percent_change(first.rate, last.rate),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_rates(dates: &[&str], usd: &[&str]) -> PolarsResult<LazyFrame> {
        let df = df!(
            SOURCE_DATE_COLUMN => dates,
            "[Japanese yen ]" => vec!["130.0"; dates.len()],
            "[US dollar ]" => usd,
        )?;
        Ok(df.lazy())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clean_drops_marker_and_sorts() -> Result<(), Box<dyn std::error::Error>> {
        // Source files list the most recent day first
        let raw = raw_rates(
            &["2021-01-07", "2021-01-06", "2021-01-05", "2021-01-04"],
            &["1.15", "1.12", "-", "1.10"],
        )?;
        let rates = ExchangeRateFrame::clean(raw, Currency::us_dollar());
        let points = rates.collect_points()?;

        let values: Vec<f64> = points.iter().map(|p| p.rate).collect();
        assert_eq!(values, vec![1.10, 1.12, 1.15]);
        assert!(values.iter().all(|v| v.is_finite()));
        assert_eq!(
            points.iter().map(|p| p.date).collect::<Vec<_>>(),
            vec![date(2021, 1, 4), date(2021, 1, 6), date(2021, 1, 7)]
        );

        let df = rates.frame.collect()?;
        let index: Vec<u32> = df
            .column(COL_INDEX)?
            .cast(&DataType::UInt32)?
            .u32()?
            .into_no_null_iter()
            .collect();
        assert_eq!(index, vec![0, 2, 3]);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec![COL_INDEX, COL_TIME, "US_dollar"]
        );
        Ok(())
    }

    #[test]
    fn test_stages_can_be_inspected() -> Result<(), Box<dyn std::error::Error>> {
        let raw = raw_rates(
            &["2020-03-02", "2020-03-03", "2020-03-04"],
            &["-", "-", "1.1162"],
        )?;
        let dated = RawRateFrame::new(raw, Currency::us_dollar())
            .rename_columns()
            .sort_by_date();

        assert_eq!(dated.row_count()?, 3);
        assert_eq!(dated.missing_count()?, 2);

        let clean = dated.drop_missing().to_numeric();
        assert_eq!(clean.row_count()?, 1);
        Ok(())
    }

    #[test]
    fn test_other_currency_column() -> Result<(), Box<dyn std::error::Error>> {
        let raw = raw_rates(&["2020-03-02"], &["1.1"])?;
        let yen = ExchangeRateFrame::clean(raw, Currency::new("Japanese yen"));
        assert_eq!(yen.rate_column(), "Japanese_yen");
        assert_eq!(yen.collect_points()?[0].rate, 130.0);
        Ok(())
    }

    #[test]
    fn test_unknown_token_is_not_treated_as_missing() -> Result<(), Box<dyn std::error::Error>> {
        let raw = raw_rates(&["2020-03-02", "2020-03-03"], &["1.1", "n/a"])?;
        let result = ExchangeRateFrame::clean(raw, Currency::us_dollar()).collect_points();
        assert!(matches!(result, Err(DataStoryError::Polars(_))));
        Ok(())
    }

    #[test]
    fn test_non_finite_tokens_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let dates: Vec<String> = (0..40)
            .map(|i| (date(2017, 3, 1) + chrono::Duration::days(i)).format(DATE_FORMAT).to_string())
            .collect();
        let mut values = vec!["1.10"; 40];
        values[1] = "NaN";
        values[7] = "inf";
        let date_refs: Vec<&str> = dates.iter().map(String::as_str).collect();

        let rates = ExchangeRateFrame::clean(raw_rates(&date_refs, &values)?, Currency::us_dollar());
        let points = rates.with_rolling_mean(5)?.collect_points()?;

        assert_eq!(points.len(), 38);
        assert!(points.iter().all(|p| p.rate.is_finite()));
        assert!(!points.iter().any(|p| p.date == date(2017, 3, 2) || p.date == date(2017, 3, 8)));
        let last = points[37].rolling_mean.unwrap();
        assert!((last - 1.10).abs() < 1e-9);
        assert!(points[4..].iter().all(|p| p.rolling_mean.is_some()));
        Ok(())
    }

    #[test]
    fn test_rolling_mean_leaves_leading_rows_empty() -> Result<(), Box<dyn std::error::Error>> {
        let dates: Vec<String> = (0..40)
            .map(|i| (date(2016, 1, 1) + chrono::Duration::days(i)).format(DATE_FORMAT).to_string())
            .collect();
        let values: Vec<String> = (0..40).map(|i| format!("{:.2}", 1.0 + i as f64 / 100.0)).collect();
        let date_refs: Vec<&str> = dates.iter().map(String::as_str).collect();
        let value_refs: Vec<&str> = values.iter().map(String::as_str).collect();

        let points = ExchangeRateFrame::clean(raw_rates(&date_refs, &value_refs)?, Currency::us_dollar())
            .with_rolling_mean(DEFAULT_ROLLING_WINDOW)?
            .collect_points()?;

        assert_eq!(points.len(), 40);
        assert!(points[..29].iter().all(|p| p.rolling_mean.is_none()));
        for i in 29..40 {
            let expected = points[i - 29..=i].iter().map(|p| p.rate).sum::<f64>() / 30.0;
            let actual = points[i].rolling_mean.unwrap();
            assert!((actual - expected).abs() < 1e-9, "row {i}: {actual} != {expected}");
        }
        Ok(())
    }

    #[test]
    fn test_year_slices_split_at_new_year() -> Result<(), Box<dyn std::error::Error>> {
        let raw = raw_rates(
            &["2020-01-02", "2020-01-01", "2019-12-31", "2019-12-30"],
            &["1.1193", "1.1234", "1.1234", "1.1189"],
        )?;
        let rates = ExchangeRateFrame::clean(raw, Currency::us_dollar());

        let y2019: Vec<NaiveDate> = rates.year_slice(2019).collect_points()?.iter().map(|p| p.date).collect();
        let y2020: Vec<NaiveDate> = rates.year_slice(2020).collect_points()?.iter().map(|p| p.date).collect();

        assert_eq!(y2019, vec![date(2019, 12, 30), date(2019, 12, 31)]);
        assert_eq!(y2020, vec![date(2020, 1, 1), date(2020, 1, 2)]);
        assert_eq!(rates.story_window(2019, 2020).row_count()?, 4);
        Ok(())
    }

    #[test]
    fn test_year_change_pct() -> Result<(), Box<dyn std::error::Error>> {
        let raw = raw_rates(
            &["2020-01-02", "2020-06-30", "2020-12-31"],
            &["1.1000", "1.1198", "1.2100"],
        )?;
        let rates = ExchangeRateFrame::clean(raw, Currency::us_dollar());

        let change = rates.year_change_pct(2020)?.unwrap();
        assert!((change - 10.0).abs() < 1e-9);
        assert_eq!(rates.year_change_pct(2021)?, None);
        Ok(())
    }
}
