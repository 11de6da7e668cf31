//! Descriptive statistics used by both analyses.
//!
//! Quartiles follow the linear-interpolation convention: the `q` quantile of `n` sorted
//! values sits at fractional position `q * (n - 1)` and is interpolated between its two
//! neighbours. Standard deviation and covariance use the sample (`n - 1`) denominator.

use crate::types::describe::Describe;
use statrs::statistics::Statistics;

/// Linear-interpolated quantile of an ascending slice. `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Count, mean, standard deviation, min, quartiles and max of `values`.
///
/// Returns `None` when `values` is empty. NaN values are ignored.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let std = if sorted.len() > 1 {
        Some(sorted.iter().std_dev())
    } else {
        None
    };

    Some(Describe {
        count: sorted.len(),
        mean: sorted.iter().mean(),
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q75: quantile(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}

/// Pearson correlation coefficient of two equally long samples.
///
/// `None` when fewer than two pairs are given or either sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let covariance = xs.iter().covariance(ys.iter());
    let r = covariance / (xs.iter().std_dev() * ys.iter().std_dev());
    r.is_finite().then_some(r)
}

/// Trailing arithmetic mean over a fixed number of rows.
///
/// Position `i` holds the mean of `values[i + 1 - window..=i]`; the first `window - 1`
/// positions have no value. A window holding a non-finite value has no mean, and only
/// the windows that contain it are affected. A zero window yields no values at all.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 {
        return result;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(|v| v.is_finite()) {
            result[i] = Some(slice.iter().sum::<f64>() / window as f64);
        }
    }
    result
}

/// Change from `first` to `last` in percent of `first`.
pub fn percent_change(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        return None;
    }
    let change = (last - first) / first * 100.0;
    change.is_finite().then_some(change)
}
