//! Mathematical utility functions for acoustic analysis.
//!
//! Level measurements and the least-squares fit used by the decay-time
//! estimator. All functions accumulate in f64 and are allocation-free, so
//! they are suitable for `no_std`.

use libm::{log10, sqrt};

/// Floor applied before taking logarithms, expressed in dB.
///
/// Level conversions clamp to this value instead of producing -inf for
/// silent input.
pub const DB_FLOOR: f32 = -120.0;

/// Convert a linear amplitude to decibels (`20*log10`), clamped to [`DB_FLOOR`].
#[inline]
pub fn amplitude_db(amplitude: f32) -> f32 {
    if amplitude <= 0.0 {
        return DB_FLOOR;
    }
    let db = 20.0 * log10(amplitude as f64) as f32;
    db.max(DB_FLOOR)
}

/// Convert a power ratio to decibels (`10*log10`), clamped to [`DB_FLOOR`].
#[inline]
pub fn power_db(power: f64) -> f32 {
    if power <= 0.0 {
        return DB_FLOOR;
    }
    let db = 10.0 * log10(power) as f32;
    db.max(DB_FLOOR)
}

/// Compute RMS (Root Mean Square) level of a signal.
///
/// Returns RMS in linear scale (not dB); 0.0 for empty input.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = signal.iter().map(|&x| (x as f64) * (x as f64)).sum();
    sqrt(sum_sq / signal.len() as f64) as f32
}

/// Compute peak level (maximum absolute value); 0.0 for empty input.
pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Result of a least-squares linear fit `y = slope*x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    /// Slope of the fitted line (y units per x unit).
    pub slope: f32,
    /// Intercept of the fitted line at x = 0.
    pub intercept: f32,
    /// Pearson correlation coefficient, in [-1, 1].
    pub r: f32,
}

/// Least-squares linear regression over paired samples.
///
/// Returns `None` when fewer than two points are supplied or the x values
/// are degenerate (zero variance). A flat y series yields `r = 0` rather
/// than an undefined correlation.
pub fn linear_regression(x: &[f32], y: &[f32]) -> Option<Regression> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_x = x[..n].iter().map(|&v| v as f64).sum::<f64>() / nf;
    let mean_y = y[..n].iter().map(|&v| v as f64).sum::<f64>() / nf;

    let mut cov = 0.0f64;
    let mut var_x = 0.0f64;
    let mut var_y = 0.0f64;
    for i in 0..n {
        let dx = x[i] as f64 - mean_x;
        let dy = y[i] as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 {
        return None;
    }

    let slope = cov / var_x;
    let intercept = mean_y - slope * mean_x;
    let r = if var_y > 0.0 {
        cov / sqrt(var_x * var_y)
    } else {
        0.0
    };

    Some(Regression {
        slope: slope as f32,
        intercept: intercept as f32,
        r: r as f32,
    })
}
