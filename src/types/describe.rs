use serde::Serialize;
use std::fmt;

/// Distribution summary of a numeric column.
///
/// Produced by [`crate::stats::describe`]. `std` is `None` for a single observation, where
/// the sample standard deviation is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Renders the summary as a two-column table, one statistic per line.
///
/// # Examples
///
/// ```
/// use datastory::stats::describe;
///
/// let summary = describe(&[100.0, 200.0, 300.0]).unwrap();
/// let table = summary.to_string();
/// assert!(table.starts_with("count"));
/// assert!(table.contains("50%"));
/// ```
impl fmt::Display for Describe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6}{:>16.6}", "count", self.count as f64)?;
        writeln!(f, "{:<6}{:>16.6}", "mean", self.mean)?;
        match self.std {
            Some(std) => writeln!(f, "{:<6}{:>16.6}", "std", std)?,
            None => writeln!(f, "{:<6}{:>16}", "std", "NaN")?,
        }
        writeln!(f, "{:<6}{:>16.6}", "min", self.min)?;
        writeln!(f, "{:<6}{:>16.6}", "25%", self.q25)?;
        writeln!(f, "{:<6}{:>16.6}", "50%", self.median)?;
        writeln!(f, "{:<6}{:>16.6}", "75%", self.q75)?;
        write!(f, "{:<6}{:>16.6}", "max", self.max)
    }
}
