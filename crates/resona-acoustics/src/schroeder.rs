//! Schroeder backward integration.
//!
//! The reverse cumulative sum of the squared impulse response yields a
//! smooth, monotonic energy decay curve equivalent to the ensemble average
//! of squared noise decays. The curve is normalized to 0 dB at t = 0.

use resona_core::{linear_regression, power_db};

/// Levels below this are considered numerical floor and dropped.
pub const DECAY_FLOOR_DB: f32 = -80.0;

/// Maximum number of points kept in a decay curve; longer curves are
/// decimated before the regression stage.
pub const MAX_CURVE_POINTS: usize = 1000;

/// A normalized energy decay curve in dB.
///
/// `level_db` starts at 0 and is monotonically non-increasing down to the
/// numerical floor. The regression fields describe a least-squares line
/// over the whole curve; windowed fits for specific decay estimators are
/// recomputed by the estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayCurve {
    /// Time of each point in seconds, ascending.
    pub time_s: Vec<f32>,
    /// Level of each point in dB, starting at 0.
    pub level_db: Vec<f32>,
    /// Slope of the whole-curve fit in dB/s.
    pub slope_db_per_s: f32,
    /// Intercept of the whole-curve fit in dB.
    pub intercept_db: f32,
    /// Pearson correlation of the whole-curve fit.
    pub r: f32,
}

impl DecayCurve {
    /// An empty curve, produced when the input carries no energy.
    pub fn empty() -> Self {
        Self {
            time_s: Vec::new(),
            level_db: Vec::new(),
            slope_db_per_s: 0.0,
            intercept_db: 0.0,
            r: 0.0,
        }
    }

    /// Number of points in the curve.
    pub fn len(&self) -> usize {
        self.level_db.len()
    }

    /// Whether the curve has no points.
    pub fn is_empty(&self) -> bool {
        self.level_db.is_empty()
    }
}

/// Integrate a band-filtered impulse response into a decay curve.
///
/// Energy is accumulated in f64 from the tail forward, normalized to the
/// total energy `S[0]`, converted to dB, cut at [`DECAY_FLOOR_DB`], and
/// decimated to at most [`MAX_CURVE_POINTS`] points.
pub fn schroeder_decay(samples: &[f32], sample_rate_hz: u32) -> DecayCurve {
    if samples.is_empty() || sample_rate_hz == 0 {
        return DecayCurve::empty();
    }

    // Reverse running total of squared samples: integral[n] holds the
    // energy remaining from n to the end.
    let mut integral = vec![0.0f64; samples.len()];
    let mut total = 0.0f64;
    for (i, &x) in samples.iter().enumerate().rev() {
        total += (x as f64) * (x as f64);
        integral[i] = total;
    }

    let total_energy = integral[0];
    if total_energy <= 0.0 {
        return DecayCurve::empty();
    }

    let step = samples.len().div_ceil(MAX_CURVE_POINTS);
    let mut time_s = Vec::with_capacity(samples.len() / step + 1);
    let mut level_db = Vec::with_capacity(samples.len() / step + 1);

    for n in (0..samples.len()).step_by(step) {
        let level = power_db(integral[n] / total_energy);
        if level < DECAY_FLOOR_DB {
            // Monotonic: every later point is below the floor as well
            break;
        }
        time_s.push(n as f32 / sample_rate_hz as f32);
        level_db.push(level);
    }

    let (slope_db_per_s, intercept_db, r) = match linear_regression(&time_s, &level_db) {
        Some(fit) => (fit.slope, fit.intercept, fit.r),
        None => (0.0, 0.0, 0.0),
    };

    DecayCurve {
        time_s,
        level_db,
        slope_db_per_s,
        intercept_db,
        r,
    }
}
