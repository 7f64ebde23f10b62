use crate::models::{DataPoint, RollingPoint};

/// Below this a standard deviation is treated as zero.
pub const ZERO_STD_EPSILON: f64 = 1e-12;

/// Calculate Mean and sample Standard Deviation (n - 1)
pub fn calculate_mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let mean = sum / values.len() as f64;

    let variance: f64 = values
        .iter()
        .map(|value| {
            let diff = mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;

    Some((mean, variance.sqrt()))
}

pub fn sample_std(values: &[f64]) -> Option<f64> {
    calculate_mean_std(values).map(|(_, std)| std)
}

/// Applies `f` to every trailing window of `window` values.
///
/// Output is aligned with `points`: index i holds `f(values[i+1-window..=i])`,
/// or `None` while fewer than `window` observations are available.
pub fn rolling<F>(points: &[DataPoint], window: usize, f: F) -> Vec<RollingPoint>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let values: Vec<f64> = points.iter().map(|dp| dp.value).collect();

    points
        .iter()
        .enumerate()
        .map(|(i, dp)| {
            let value = if window > 0 && i + 1 >= window {
                f(&values[i + 1 - window..=i])
            } else {
                None
            };
            RollingPoint { date: dp.date(), value }
        })
        .collect()
}

/// Z-Score of the last value of `window` against the whole window.
/// `None` when the window has (numerically) zero variance.
pub fn window_zscore(window: &[f64]) -> Option<f64> {
    let latest = *window.last()?;
    let (mean, std) = calculate_mean_std(window)?;

    if std < ZERO_STD_EPSILON {
        return None;
    }

    Some((latest - mean) / std)
}

/// Rolling Z-Score: (x_i - mean) / std over the trailing `window`, current value included.
pub fn rolling_zscore(points: &[DataPoint], window: usize) -> Vec<RollingPoint> {
    rolling(points, window, window_zscore)
}
