use chrono::NaiveDateTime;
use serde::Serialize;

// Source columns
pub const COL_DATE_TIME: &str = "date_time";
pub const COL_TRAFFIC_VOLUME: &str = "traffic_volume";
pub const COL_TEMP: &str = "temp"; // Kelvin
pub const COL_RAIN_1H: &str = "rain_1h"; // mm in the hour
pub const COL_SNOW_1H: &str = "snow_1h"; // mm in the hour
pub const COL_CLOUDS_ALL: &str = "clouds_all"; // percentage cloud cover
pub const COL_WEATHER_MAIN: &str = "weather_main";
pub const COL_WEATHER_DESCRIPTION: &str = "weather_description";

// Derived from `date_time`
pub const COL_HOUR: &str = "hour";
pub const COL_MONTH: &str = "month";
pub const COL_DAY_OF_WEEK: &str = "dayofweek";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns a traffic file must provide.
pub const TRAFFIC_COLUMNS: [&str; 8] = [
    COL_DATE_TIME,
    COL_TRAFFIC_VOLUME,
    COL_TEMP,
    COL_RAIN_1H,
    COL_SNOW_1H,
    COL_CLOUDS_ALL,
    COL_WEATHER_MAIN,
    COL_WEATHER_DESCRIPTION,
];

/// One hourly observation of westbound traffic with the weather at that hour.
///
/// Timestamps are neither unique nor complete: hours are missing, more so at night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficRecord {
    pub timestamp: NaiveDateTime,
    pub traffic_volume: u32,
    pub temp: Option<f64>,
    pub rain_1h: Option<f64>,
    pub snow_1h: Option<f64>,
    pub clouds_all: Option<f64>,
    pub weather_main: Option<String>,
    pub weather_description: Option<String>,
}

/// Numeric weather attributes correlated against traffic volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NumericWeather {
    Temperature,
    Rainfall,
    Snowfall,
    CloudCover,
}

impl NumericWeather {
    pub const ALL: [NumericWeather; 4] = [
        NumericWeather::Temperature,
        NumericWeather::Rainfall,
        NumericWeather::Snowfall,
        NumericWeather::CloudCover,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            NumericWeather::Temperature => COL_TEMP,
            NumericWeather::Rainfall => COL_RAIN_1H,
            NumericWeather::Snowfall => COL_SNOW_1H,
            NumericWeather::CloudCover => COL_CLOUDS_ALL,
        }
    }
}

/// Categorical weather attributes whose values are used as group keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoricalWeather {
    Main,
    Description,
}

impl CategoricalWeather {
    pub fn column(&self) -> &'static str {
        match self {
            CategoricalWeather::Main => COL_WEATHER_MAIN,
            CategoricalWeather::Description => COL_WEATHER_DESCRIPTION,
        }
    }
}
