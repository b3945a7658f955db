//! Descriptive statistics shared by the pipeline stages.
//!
//! All estimators are population estimators (divide by `n`), and every
//! function is total: empty input yields `0.0`.

/// Arithmetic mean
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation
pub fn std_dev(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}

/// Root-mean-square magnitude
pub fn rms(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    (data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64).sqrt()
}

/// Coefficient of variation in percent; `0.0` when the mean is not positive
pub fn coefficient_of_variation(data: &[f64]) -> f64 {
    let m = mean(data);
    if m > 0.0 {
        std_dev(data) / m * 100.0
    } else {
        0.0
    }
}

/// Left/right parity score in `[0, 100]`, where 100 means identical values.
///
/// `epsilon` keeps the ratio finite when both values are zero.
pub fn symmetry_index(a: f64, b: f64, epsilon: f64) -> f64 {
    (1.0 - (a - b).abs() / (a + b + epsilon)) * 100.0
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` evaluated at `x`
pub fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}
