//! Derived metrics from two independently sampled series.

use crate::TimeSeries;

/// Fewer samples than this counts as "insufficient data".
pub const MIN_SERIES_POINTS: usize = 2;

/// Linear interpolation of `(xp, fp)` at `x`.
///
/// `xp` is expected to be increasing. Outside the sampled range the nearest
/// end value is held. Returns NaN for empty input or a NaN `x`.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // n >= 2 here, and j + 1 stays in bounds even for unsorted xp
    let j = xp[..n]
        .partition_point(|&t| t <= x)
        .saturating_sub(1)
        .min(n - 2);
    let (x0, x1) = (xp[j], xp[j + 1]);
    let (y0, y1) = (fp[j], fp[j + 1]);
    let dx = x1 - x0;
    if dx <= 0.0 {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / dx
}

/// `a - b` on `a`'s time grid, with `b` interpolated onto it.
///
/// `None` when either side is missing or has fewer than
/// [`MIN_SERIES_POINTS`] samples.
pub fn diff_series(a: Option<&TimeSeries>, b: Option<&TimeSeries>) -> Option<TimeSeries> {
    let a = a.filter(|s| s.len() >= MIN_SERIES_POINTS)?;
    let b = b.filter(|s| s.len() >= MIN_SERIES_POINTS)?;

    Some(TimeSeries::from_points(a.points().map(|(t, v)| {
        (t, v - interp(t, b.times(), b.values()))
    })))
}

/// Scalar difference of two final values.
pub fn diff_final(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}
