use statrs::statistics::Statistics;

/// Signed Pearson's r over the pairs where both values are finite.
///
/// Returns `None` when the lengths differ, fewer than two complete pairs
/// remain, or either side has no variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .unzip();
    if xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;

    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let numerator: f64 =
        xs.iter().zip(ys.iter()).map(|(&xi, &yi)| (xi - mean_x) * (yi - mean_y)).sum();

    let denominator_x: f64 = xs.iter().map(|&xi| (xi - mean_x).powi(2)).sum();
    let denominator_y: f64 = ys.iter().map(|&yi| (yi - mean_y).powi(2)).sum();

    let denominator = (denominator_x * denominator_y).sqrt();

    if denominator == 0.0 {
        None
    } else {
        Some((numerator / denominator).clamp(-1.0, 1.0))
    }
}

/// Largest finite value, NaN if there is none.
pub fn finite_max(data: &[f64]) -> f64 {
    Statistics::max(data.iter().filter(|v| v.is_finite()))
}

/// Smallest finite value, NaN if there is none.
pub fn finite_min(data: &[f64]) -> f64 {
    Statistics::min(data.iter().filter(|v| v.is_finite()))
}

pub fn mse(y: &[f64], y_hat: &[f64]) -> Option<f64> {
    if y.len() != y_hat.len() || y.is_empty() {
        return None;
    }

    let sum_sq: f64 = y.iter().zip(y_hat.iter()).map(|(&yi, &yhi)| (yi - yhi).powi(2)).sum();

    Some(sum_sq / y.len() as f64)
}

pub fn rmse(y: &[f64], y_hat: &[f64]) -> Option<f64> {
    mse(y, y_hat).map(f64::sqrt)
}
