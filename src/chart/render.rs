//! HTML figures for both flows, one file per chart.
//!
//! plotlars has no subplot grid, so grids are expressed through file names: a figure that
//! belongs in cell `(row, column)` of a grid is written as `<name>_r<row>c<column>.html`, and
//! every figure of one grid uses the same axes.

use crate::analysis::exchange::{RateStory, YearPanel};
use crate::analysis::traffic::TrafficReport;
use crate::chart::layout::*;
use crate::error::DataStoryError;
use crate::types::aggregates::GroupMean;
use crate::types::day_window::DayWindow;
use crate::types::frames::traffic_frame::TrafficLazyFrame;
use crate::types::traffic_record::{COL_TEMP, COL_TRAFFIC_VOLUME};
use crate::utils::ensure_dir_exists;
use chrono::Datelike;
use log::info;
use plotlars::{
    Axis, BarPlot, Histogram, Legend, LinePlot, Orientation, Plot, Rgb, ScatterPlot, Text,
    TimeSeriesPlot,
};
use polars::prelude::*;
use std::path::{Path, PathBuf};

const COL_DATE: &str = "date";
const COL_RATE: &str = "rate";
const COL_ROLLING: &str = "rolling_mean";
const COL_DAY_OF_YEAR: &str = "day_of_year";

fn axis(range: AxisRange) -> Axis {
    Axis::new().value_range(vec![range.min, range.max])
}

fn panel_color() -> Rgb {
    let (r, g, b) = PANEL_LINE_RGB;
    Rgb(r, g, b)
}

/// Collects written figures into `out_dir`.
struct FigureWriter {
    out_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FigureWriter {
    fn new(out_dir: &Path) -> Result<Self, DataStoryError> {
        ensure_dir_exists(out_dir)?;
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            written: Vec::new(),
        })
    }

    fn write(&mut self, name: &str, plot: impl Plot) {
        let path = self.out_dir.join(format!("{name}.html"));
        plot.write_html(path.display().to_string());
        info!("Wrote chart {}", path.display());
        self.written.push(path);
    }
}

fn group_frame(key: &str, groups: &[GroupMean<u32>]) -> PolarsResult<DataFrame> {
    df!(
        key => groups.iter().map(|g| g.key).collect::<Vec<u32>>(),
        COL_TRAFFIC_VOLUME => groups.iter().map(|g| g.mean).collect::<Vec<f64>>(),
    )
}

fn category_frame(key: &str, groups: &[GroupMean<String>]) -> PolarsResult<DataFrame> {
    df!(
        key => groups.iter().map(|g| g.key.clone()).collect::<Vec<String>>(),
        COL_TRAFFIC_VOLUME => groups.iter().map(|g| g.mean).collect::<Vec<f64>>(),
    )
}

fn volume_histogram(data: &DataFrame, title: &str, shared_y: bool) -> impl Plot {
    let y_axis = if shared_y {
        axis(VOLUME_HISTOGRAM_Y)
    } else {
        Axis::new()
    };
    Histogram::builder()
        .data(data)
        .x(COL_TRAFFIC_VOLUME)
        .plot_title(Text::from(title))
        .x_title("Traffic Volume")
        .y_title("Frequency")
        .x_axis(&axis(VOLUME_HISTOGRAM_X))
        .y_axis(&y_axis)
        .build()
}

fn group_line(data: &DataFrame, key: &str, title: &str, y_range: Option<AxisRange>) -> impl Plot {
    let y_axis = y_range.map(axis).unwrap_or_else(Axis::new);
    LinePlot::builder()
        .data(data)
        .x(key)
        .y(COL_TRAFFIC_VOLUME)
        .plot_title(Text::from(title))
        .y_title("Average traffic volume")
        .y_axis(&y_axis)
        .build()
}

fn category_bars(data: &DataFrame, key: &str, title: &str) -> impl Plot {
    BarPlot::builder()
        .data(data)
        .labels(key)
        .values(COL_TRAFFIC_VOLUME)
        .orientation(Orientation::Horizontal)
        .plot_title(Text::from(title))
        .build()
}

/// Shared y-range for the weekday and weekend hourly lines.
fn hourly_range(report: &TrafficReport) -> Option<AxisRange> {
    let means = report
        .weekday_by_hour
        .iter()
        .chain(&report.weekend_by_hour)
        .map(|g| g.mean);
    let max = means.fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))?;
    Some(AxisRange::new(0.0, max * 1.05))
}

/// Writes every traffic chart into `out_dir` and returns the written paths.
pub fn render_traffic(
    traffic: &TrafficLazyFrame,
    report: &TrafficReport,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, DataStoryError> {
    let mut figures = FigureWriter::new(out_dir)?;
    let day = traffic.window(DayWindow::Day);
    let night = traffic.window(DayWindow::Night);

    let overall = df!(COL_TRAFFIC_VOLUME => traffic.volumes()?)?;
    figures.write(
        "traffic_volume",
        volume_histogram(&overall, "Traffic Volume", false),
    );
    for (window, frame) in [(DayWindow::Day, &day), (DayWindow::Night, &night)] {
        let data = df!(COL_TRAFFIC_VOLUME => frame.volumes()?)?;
        figures.write(
            &format!("traffic_volume_{window}"),
            volume_histogram(&data, &format!("Traffic Volume: {window}"), true),
        );
    }

    let by_month = group_frame("month", &report.day_by_month)?;
    figures.write(
        "day_by_month",
        group_line(&by_month, "month", "Traffic volume by month", None),
    );
    let by_day = group_frame("dayofweek", &report.day_by_day_of_week)?;
    figures.write(
        "day_by_day_of_week",
        group_line(&by_day, "dayofweek", "Traffic volume by day of week", None),
    );

    let shared = hourly_range(report);
    for (index, (label, groups)) in [
        ("Business Days", &report.weekday_by_hour),
        ("Weekend", &report.weekend_by_hour),
    ]
    .into_iter()
    .enumerate()
    {
        let data = group_frame("hour", groups)?;
        figures.write(
            &format!("day_by_hour_r0c{index}"),
            group_line(&data, "hour", label, shared),
        );
    }

    let scatter = day
        .frame
        .clone()
        .select([
            col(COL_TEMP).cast(DataType::Float64),
            col(COL_TRAFFIC_VOLUME).cast(DataType::Float64),
        ])
        .collect()?;
    figures.write(
        "volume_vs_temperature",
        ScatterPlot::builder()
            .data(&scatter)
            .x(COL_TRAFFIC_VOLUME)
            .y(COL_TEMP)
            .opacity(0.5)
            .plot_title(Text::from("Traffic volume vs temperature"))
            .x_axis(&axis(VOLUME_SCATTER_X))
            .y_axis(&axis(TEMPERATURE_RANGE))
            .build(),
    );

    let by_main = category_frame("weather_main", &report.by_weather_main)?;
    figures.write(
        "day_by_weather_main",
        category_bars(&by_main, "weather_main", "Traffic volume by weather"),
    );
    let by_description = category_frame("weather_description", &report.by_weather_description)?;
    figures.write(
        "day_by_weather_description",
        category_bars(
            &by_description,
            "weather_description",
            "Traffic volume by weather description",
        ),
    );

    Ok(figures.written)
}

fn panel_frame(panel: &YearPanel) -> PolarsResult<DataFrame> {
    df!(
        COL_DAY_OF_YEAR => panel.points.iter().map(|p| p.date.ordinal() as f64).collect::<Vec<f64>>(),
        COL_ROLLING => panel.points.iter().map(|p| p.rolling_mean).collect::<Vec<Option<f64>>>(),
    )
}

fn panel_plot(panel: &YearPanel, data: &DataFrame) -> impl Plot {
    let (ticks, labels): (Vec<f64>, Vec<&str>) = quarter_ticks(panel.year)
        .into_iter()
        .map(|(date, label)| (date.ordinal() as f64, label))
        .unzip();
    LinePlot::builder()
        .data(data)
        .x(COL_DAY_OF_YEAR)
        .y(COL_ROLLING)
        .colors(vec![panel_color()])
        .plot_title(Text::from(panel.title.as_str()).size(14))
        .x_axis(&Axis::new().tick_values(ticks).tick_labels(labels))
        .y_axis(
            &axis(RATE_Y_AXIS.range)
                .tick_values(RATE_Y_AXIS.ticks.to_vec())
                .tick_labels(RATE_Y_AXIS.labels.to_vec()),
        )
        .build()
}

/// Writes the full-series charts and one figure per story panel, named by grid cell.
pub fn render_rate_story(story: &RateStory, out_dir: &Path) -> Result<Vec<PathBuf>, DataStoryError> {
    let mut figures = FigureWriter::new(out_dir)?;

    let series = df!(
        COL_DATE => story.series.iter().map(|p| p.date.to_string()).collect::<Vec<String>>(),
        COL_RATE => story.series.iter().map(|p| p.rate).collect::<Vec<f64>>(),
        COL_ROLLING => story.series.iter().map(|p| p.rolling_mean).collect::<Vec<Option<f64>>>(),
    )?;
    figures.write(
        "rates",
        TimeSeriesPlot::builder()
            .data(&series)
            .x(COL_DATE)
            .y(COL_RATE)
            .plot_title(Text::from(format!("EUR to {}", story.currency).as_str()))
            .build(),
    );
    figures.write(
        "rates_rolling",
        TimeSeriesPlot::builder()
            .data(&series)
            .x(COL_DATE)
            .y(COL_ROLLING)
            .colors(vec![panel_color()])
            .plot_title(Text::from(
                format!("EUR to {}, {}-day rolling mean", story.currency, story.rolling_window)
                    .as_str(),
            ))
            .legend(&Legend::new().x(0.05).y(0.9))
            .build(),
    );

    for panel in &story.panels {
        let data = panel_frame(panel)?;
        figures.write(
            &format!("story_{}_r{}c{}", panel.year, panel.row, panel.column),
            panel_plot(panel, &data),
        );
    }
    info!(
        "Panel grid {}x{}, {} cells left empty",
        STORY_GRID.rows,
        STORY_GRID.columns,
        STORY_GRID.unused_cells(story.panels.len()).len()
    );

    Ok(figures.written)
}
