// traffic_frame.rs

//! Contains the `TrafficLazyFrame` structure for lazy operations on hourly traffic records.

use crate::error::DataStoryError;
use crate::filtering::StoryFrameFilterExt;
use crate::stats::{describe, pearson};
use crate::types::aggregates::{GroupMean, WeatherCorrelation};
use crate::types::day_window::{DayKind, DayWindow};
use crate::types::describe::Describe;
use crate::types::traffic_record::*;
use chrono::DateTime;
use polars::prelude::*;

/// A wrapper around a Polars `LazyFrame` holding hourly traffic records.
///
/// Besides the source columns, the frame carries three integer columns derived from the
/// parsed `date_time`: `hour` (0–23), `month` (1–12) and `dayofweek` (0 = Monday,
/// 6 = Sunday). Filtering methods return a *new* `TrafficLazyFrame`; nothing is
/// computed until one of the summarising methods collects the frame.
///
/// # Errors
///
/// Summarising methods return [`DataStoryError::Polars`] when the underlying query fails,
/// for example when a `date_time` value does not match `%Y-%m-%d %H:%M:%S`.
#[derive(Clone)]
pub struct TrafficLazyFrame {
    /// The underlying Polars LazyFrame.
    pub frame: LazyFrame,
}

impl TrafficLazyFrame {
    /// Wraps a frame that already carries the derived `hour`, `month` and `dayofweek` columns.
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// Parses the textual `date_time` column and derives the hour, month and day-of-week
    /// columns from it.
    pub fn from_raw(raw: LazyFrame) -> Self {
        let frame = raw
            .with_column(
                col(COL_DATE_TIME)
                    .str()
                    .to_datetime(
                        Some(TimeUnit::Milliseconds),
                        None,
                        StrptimeOptions {
                            format: Some(TIMESTAMP_FORMAT.into()),
                            ..Default::default()
                        },
                        lit("raise"),
                    )
                    .alias(COL_DATE_TIME),
            )
            .with_columns([
                col(COL_DATE_TIME)
                    .dt()
                    .hour()
                    .cast(DataType::Int32)
                    .alias(COL_HOUR),
                col(COL_DATE_TIME)
                    .dt()
                    .month()
                    .cast(DataType::Int32)
                    .alias(COL_MONTH),
                // Polars numbers weekdays 1 (Monday) to 7 (Sunday)
                (col(COL_DATE_TIME).dt().weekday().cast(DataType::Int32) - lit(1))
                    .alias(COL_DAY_OF_WEEK),
            ]);
        Self::new(frame)
    }

    /// Records whose hour falls in the given day or night window.
    pub fn window(&self, window: DayWindow) -> TrafficLazyFrame {
        TrafficLazyFrame::new(self.frame.clone().filter_window(window))
    }

    /// Records falling on a weekday or on a weekend.
    pub fn day_kind(&self, kind: DayKind) -> TrafficLazyFrame {
        TrafficLazyFrame::new(self.frame.clone().filter_day_kind(kind))
    }

    pub fn row_count(&self) -> Result<usize, DataStoryError> {
        let df = self
            .frame
            .clone()
            .select([col(COL_TRAFFIC_VOLUME)])
            .collect()?;
        Ok(df.height())
    }

    /// Records whose `date_time` is missing. Such records have no hour, so they fall in
    /// neither the day nor the night window.
    pub fn missing_timestamps(&self) -> Result<usize, DataStoryError> {
        let df = self
            .frame
            .clone()
            .select([col(COL_DATE_TIME)])
            .filter(col(COL_DATE_TIME).is_null())
            .collect()?;
        Ok(df.height())
    }

    /// Row counts of the day and night windows, in that order.
    pub fn window_counts(&self) -> Result<(usize, usize), DataStoryError> {
        Ok((
            self.window(DayWindow::Day).row_count()?,
            self.window(DayWindow::Night).row_count()?,
        ))
    }

    /// All non-null traffic volumes as floats, in frame order.
    pub fn volumes(&self) -> Result<Vec<f64>, DataStoryError> {
        let df = self
            .frame
            .clone()
            .select([col(COL_TRAFFIC_VOLUME).cast(DataType::Float64)])
            .collect()?;
        Ok(df
            .column(COL_TRAFFIC_VOLUME)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Distribution statistics of the traffic volume, `None` when the frame is empty.
    pub fn describe_volume(&self) -> Result<Option<Describe>, DataStoryError> {
        Ok(describe(&self.volumes()?))
    }

    /// Mean volume per calendar month, sorted by month.
    pub fn mean_by_month(&self) -> Result<Vec<GroupMean<u32>>, DataStoryError> {
        self.int_group_means(COL_MONTH)
    }

    /// Mean volume per day of the week (0 = Monday), sorted by day.
    pub fn mean_by_day_of_week(&self) -> Result<Vec<GroupMean<u32>>, DataStoryError> {
        self.int_group_means(COL_DAY_OF_WEEK)
    }

    /// Mean volume per hour of the day, sorted by hour.
    pub fn mean_by_hour(&self) -> Result<Vec<GroupMean<u32>>, DataStoryError> {
        self.int_group_means(COL_HOUR)
    }

    /// Mean volume per distinct value of a categorical weather column, sorted by value.
    ///
    /// The set of categories is whatever occurs in the frame; rows with a missing
    /// category are left out.
    pub fn mean_by_category(
        &self,
        field: CategoricalWeather,
    ) -> Result<Vec<GroupMean<String>>, DataStoryError> {
        let key = field.column();
        let df = self.group_means(key)?;
        let keys = df.column(key)?.str()?;
        let means = df.column(COL_TRAFFIC_VOLUME)?.f64()?;
        Ok(keys
            .into_iter()
            .zip(means.into_iter())
            .filter_map(|(k, m)| Some(GroupMean::new(k?.to_string(), m?)))
            .collect())
    }

    /// Pearson correlation of traffic volume against each numeric weather column.
    ///
    /// Each coefficient uses the rows where both the volume and that attribute are present.
    pub fn weather_correlations(&self) -> Result<Vec<WeatherCorrelation>, DataStoryError> {
        let selection: Vec<Expr> = std::iter::once(COL_TRAFFIC_VOLUME)
            .chain(NumericWeather::ALL.iter().map(|field| field.column()))
            .map(|name| col(name).cast(DataType::Float64))
            .collect();
        let df = self.frame.clone().select(selection).collect()?;
        let volume = df.column(COL_TRAFFIC_VOLUME)?.f64()?;

        NumericWeather::ALL
            .iter()
            .map(|field| -> Result<WeatherCorrelation, DataStoryError> {
                let values = df.column(field.column())?.f64()?;
                let (xs, ys): (Vec<f64>, Vec<f64>) = volume
                    .into_iter()
                    .zip(values.into_iter())
                    .filter_map(|(v, w)| Some((v?, w?)))
                    .unzip();
                Ok(WeatherCorrelation {
                    field: *field,
                    coefficient: pearson(&xs, &ys),
                })
            })
            .collect()
    }

    /// Collects the frame into typed records. Rows without a timestamp or volume are skipped.
    pub fn collect_records(&self) -> Result<Vec<TrafficRecord>, DataStoryError> {
        let df = self
            .frame
            .clone()
            .select([
                col(COL_DATE_TIME),
                col(COL_TRAFFIC_VOLUME).cast(DataType::UInt32),
                col(COL_TEMP).cast(DataType::Float64),
                col(COL_RAIN_1H).cast(DataType::Float64),
                col(COL_SNOW_1H).cast(DataType::Float64),
                col(COL_CLOUDS_ALL).cast(DataType::Float64),
                col(COL_WEATHER_MAIN).cast(DataType::String),
                col(COL_WEATHER_DESCRIPTION).cast(DataType::String),
            ])
            .collect()?;

        let timestamps = df.column(COL_DATE_TIME)?.datetime()?;
        let volumes = df.column(COL_TRAFFIC_VOLUME)?.u32()?;
        let temps = df.column(COL_TEMP)?.f64()?;
        let rain = df.column(COL_RAIN_1H)?.f64()?;
        let snow = df.column(COL_SNOW_1H)?.f64()?;
        let clouds = df.column(COL_CLOUDS_ALL)?.f64()?;
        let mains = df.column(COL_WEATHER_MAIN)?.str()?;
        let descriptions = df.column(COL_WEATHER_DESCRIPTION)?.str()?;

        Ok((0..df.height())
            .filter_map(|i| {
                let timestamp = DateTime::from_timestamp_millis(timestamps.get(i)?)?.naive_utc();
                Some(TrafficRecord {
                    timestamp,
                    traffic_volume: volumes.get(i)?,
                    temp: temps.get(i),
                    rain_1h: rain.get(i),
                    snow_1h: snow.get(i),
                    clouds_all: clouds.get(i),
                    weather_main: mains.get(i).map(str::to_string),
                    weather_description: descriptions.get(i).map(str::to_string),
                })
            })
            .collect())
    }

    fn group_means(&self, key: &str) -> PolarsResult<DataFrame> {
        self.frame
            .clone()
            .group_by([col(key)])
            .agg([col(COL_TRAFFIC_VOLUME)
                .cast(DataType::Float64)
                .mean()
                .alias(COL_TRAFFIC_VOLUME)])
            .sort([key], SortMultipleOptions::default())
            .collect()
    }

    fn int_group_means(&self, key: &str) -> Result<Vec<GroupMean<u32>>, DataStoryError> {
        let df = self.group_means(key)?;
        let keys = df.column(key)?.i32()?;
        let means = df.column(COL_TRAFFIC_VOLUME)?.f64()?;
        Ok(keys
            .into_iter()
            .zip(means.into_iter())
            .filter_map(|(k, m)| Some(GroupMean::new(u32::try_from(k?).ok()?, m?)))
            .collect())
    }
}
