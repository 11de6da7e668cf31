mod analysis;
pub mod chart;
mod error;
mod filtering;
mod loader;
pub mod stats;
mod types;
mod utils;

pub use error::DataStoryError;
pub use loader::csv_loader::{CsvOptions, DatasetLoader};
pub use loader::error::LoadError;

pub use analysis::exchange::{ExchangeRateStory, RateStory, YearPanel};
pub use analysis::traffic::{TrafficAnalysis, TrafficReport};

pub use filtering::StoryFrameFilterExt;

pub use types::aggregates::{GroupMean, WeatherCorrelation};
pub use types::day_window::{DayKind, DayWindow};
pub use types::describe::Describe;
pub use types::exchange_rate::*;
pub use types::traffic_record::*;

pub use types::frames::rate_frame::*;
pub use types::frames::traffic_frame::*;

