use crate::types::traffic_record::NumericWeather;
use serde::Serialize;

/// Mean traffic volume of one group, keyed by an hour, month, weekday index or category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: f64,
}

impl<K> GroupMean<K> {
    pub fn new(key: K, mean: f64) -> Self {
        Self { key, mean }
    }
}

/// Pearson coefficient between traffic volume and one numeric weather attribute.
///
/// `coefficient` is `None` when the correlation is undefined, for example when the
/// attribute never varies within the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherCorrelation {
    pub field: NumericWeather,
    pub coefficient: Option<f64>,
}
