use chrono::NaiveDate;
use serde::Serialize;

/// Date column header as published in the ECB history file.
pub const SOURCE_DATE_COLUMN: &str = "Period\\Unit:";
/// Name of the date column after renaming.
pub const COL_TIME: &str = "Time";
/// Dense zero-based position assigned after sorting by date.
pub const COL_INDEX: &str = "index";
pub const COL_ROLLING_MEAN: &str = "rolling_mean";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Marker the source uses for "no observation on this date".
pub const MISSING_MARKER: &str = "-";
pub const DEFAULT_ROLLING_WINDOW: usize = 30;

/// A currency quoted against the euro, identified by its display name.
///
/// The source header for a currency is its name in brackets with a trailing space
/// (`[US dollar ]`); the cleaned frame uses the name with spaces replaced by underscores
/// (`US_dollar`).
///
/// ```
/// use datastory::Currency;
///
/// let usd = Currency::us_dollar();
/// assert_eq!(usd.source_column(), "[US dollar ]");
/// assert_eq!(usd.column(), "US_dollar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    name: String,
}

impl Currency {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn us_dollar() -> Self {
        Self::new("US dollar")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_column(&self) -> String {
        format!("[{} ]", self.name)
    }

    pub fn column(&self) -> String {
        self.name.trim().replace(' ', "_")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::us_dollar()
    }
}

/// One cleaned daily observation: the euro's rate in the target currency on `date`,
/// and the trailing rolling mean ending at that row when enough rows precede it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
    pub rolling_mean: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_columns() {
        let yen = Currency::new("Japanese yen");
        assert_eq!(yen.source_column(), "[Japanese yen ]");
        assert_eq!(yen.column(), "Japanese_yen");
        assert_eq!(Currency::default(), Currency::us_dollar());
    }
}
