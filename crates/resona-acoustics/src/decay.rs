//! Decay-time estimation from Schroeder curves.
//!
//! Each estimator locates its dB evaluation range on the curve, fits a
//! least-squares line over that range, gates on correlation quality, and
//! extrapolates the slope to the full 60 dB decay.

use resona_core::{amplitude_db, linear_regression, peak, rms};

use crate::error::{EngineError, Result};
use crate::schroeder::DecayCurve;

/// Shortest decay time accepted as plausible, in seconds.
pub const MIN_DECAY_S: f32 = 0.05;

/// Longest decay time accepted as plausible, in seconds.
pub const MAX_DECAY_S: f32 = 15.0;

/// Minimum |Pearson correlation| for an accepted fit.
pub const MIN_CORRELATION: f32 = 0.9;

/// Evaluation range for the early decay time.
pub const EDT_RANGE: (f32, f32) = (0.0, -10.0);

/// Evaluation range for T20.
pub const T20_RANGE: (f32, f32) = (-5.0, -25.0);

/// Evaluation range for T30.
pub const T30_RANGE: (f32, f32) = (-5.0, -35.0);

/// Evaluation range for the direct (non-extrapolated) RT60. Rarely
/// reachable above the noise floor; T30 is the expected primary estimator.
pub const RT60_DIRECT_RANGE: (f32, f32) = (-5.0, -65.0);

/// Decay times recovered for one band, each already extrapolated to the
/// full 60 dB decay. Absent values failed a threshold search, the
/// correlation gate, or the plausibility check.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecayTimes {
    /// Early decay time (0 to -10 dB), in seconds.
    pub edt_s: Option<f32>,
    /// T20 (-5 to -25 dB), in seconds.
    pub t20_s: Option<f32>,
    /// T30 (-5 to -35 dB), in seconds.
    pub t30_s: Option<f32>,
    /// Direct RT60 (-5 to -65 dB), in seconds.
    pub rt60_direct_s: Option<f32>,
}

impl DecayTimes {
    /// The single measured RT60 for the band.
    ///
    /// Priority: direct measurement, then T30, T20, EDT.
    pub fn measured_rt60_s(&self) -> Option<f32> {
        self.rt60_direct_s
            .or(self.t30_s)
            .or(self.t20_s)
            .or(self.edt_s)
    }

    /// Whether any estimator produced a value.
    pub fn any(&self) -> bool {
        self.measured_rt60_s().is_some()
    }
}

/// Estimate the 60 dB decay time from the curve segment between
/// `start_db` and `end_db` (both non-positive, `start_db > end_db`).
///
/// The slope of a least-squares fit over the inclusive segment is
/// extrapolated as `RT = 60 / |slope|`. Fails with:
///
/// - [`EngineError::InvalidDecayRange`] when the curve never reaches one of
///   the thresholds (or does not actually decay over the segment),
/// - [`EngineError::LowCorrelation`] when |r| is below [`MIN_CORRELATION`],
/// - [`EngineError::ImplausibleResult`] when the extrapolated time leaves
///   [[`MIN_DECAY_S`], [`MAX_DECAY_S`]].
pub fn decay_time(curve: &DecayCurve, start_db: f32, end_db: f32) -> Result<f32> {
    debug_assert!(start_db > end_db && start_db <= 0.0);

    let out_of_range = || EngineError::InvalidDecayRange { start_db, end_db };

    let start_index = curve
        .level_db
        .iter()
        .position(|&l| l <= start_db)
        .ok_or_else(out_of_range)?;
    let end_index = curve.level_db[start_index..]
        .iter()
        .position(|&l| l <= end_db)
        .map(|offset| start_index + offset)
        .ok_or_else(out_of_range)?;

    if end_index <= start_index {
        return Err(out_of_range());
    }

    let times = &curve.time_s[start_index..=end_index];
    let levels = &curve.level_db[start_index..=end_index];
    let fit = linear_regression(times, levels).ok_or(EngineError::InsufficientData {
        needed: 2,
        got: levels.len(),
    })?;

    if fit.r.abs() < MIN_CORRELATION {
        return Err(EngineError::LowCorrelation { r: fit.r });
    }
    if fit.slope >= 0.0 {
        return Err(out_of_range());
    }

    let rt = 60.0 / fit.slope.abs();
    if !(MIN_DECAY_S..=MAX_DECAY_S).contains(&rt) {
        return Err(EngineError::ImplausibleResult { seconds: rt });
    }

    Ok(rt)
}

/// Early decay time: 0 to -10 dB, extrapolated.
pub fn edt(curve: &DecayCurve) -> Result<f32> {
    decay_time(curve, EDT_RANGE.0, EDT_RANGE.1)
}

/// T20: -5 to -25 dB, extrapolated.
pub fn t20(curve: &DecayCurve) -> Result<f32> {
    decay_time(curve, T20_RANGE.0, T20_RANGE.1)
}

/// T30: -5 to -35 dB, extrapolated.
pub fn t30(curve: &DecayCurve) -> Result<f32> {
    decay_time(curve, T30_RANGE.0, T30_RANGE.1)
}

/// Direct RT60: -5 to -65 dB.
pub fn rt60_direct(curve: &DecayCurve) -> Result<f32> {
    decay_time(curve, RT60_DIRECT_RANGE.0, RT60_DIRECT_RANGE.1)
}

/// Peak level of a band-filtered impulse response, in dB (clamped to the
/// -120 dB floor).
pub fn peak_level_db(samples: &[f32]) -> f32 {
    amplitude_db(peak(samples))
}

/// Noise-floor estimate: RMS level over the final 10% of the buffer, in dB
/// (clamped to the -120 dB floor).
pub fn noise_floor_db(samples: &[f32]) -> f32 {
    let tail_start = samples.len() - samples.len() / 10;
    amplitude_db(rms(&samples[tail_start..]))
}
