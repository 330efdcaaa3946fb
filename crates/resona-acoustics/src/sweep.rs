//! Exponential sine sweep excitation and matched inverse filter.
//!
//! Uses the Farina method: the room is excited with a logarithmic sweep and
//! the recording is convolved with a time-reversed, amplitude-equalized copy
//! of the sweep to recover the linear impulse response while pushing
//! distortion harmonics ahead of the main peak.

use std::f32::consts::PI;

use crate::error::{EngineError, Result};

/// Peak amplitude of the generated excitation. Kept below full scale so the
/// playback chain has headroom.
pub const SWEEP_AMPLITUDE: f32 = 0.8;

/// Fraction of the sweep duration used for the linear fade at each end.
const FADE_FRACTION: f32 = 0.05;

/// Exponential sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Start frequency in Hz.
    pub start_hz: f32,
    /// End frequency in Hz.
    pub end_hz: f32,
    /// Sweep duration in seconds.
    pub duration_s: f32,
}

impl Default for SweepParams {
    fn default() -> Self {
        Self {
            start_hz: 20.0,
            end_hz: 20_000.0,
            duration_s: 3.0,
        }
    }
}

impl SweepParams {
    /// Validate the parameters against a sample rate.
    pub fn validate(&self, sample_rate_hz: u32) -> Result<()> {
        if sample_rate_hz == 0 {
            return Err(EngineError::DeconvolutionFailed("sample rate is zero"));
        }
        if !(self.start_hz > 0.0 && self.end_hz > self.start_hz) {
            return Err(EngineError::DeconvolutionFailed(
                "sweep frequencies must satisfy 0 < start < end",
            ));
        }
        if self.end_hz > sample_rate_hz as f32 / 2.0 {
            return Err(EngineError::DeconvolutionFailed(
                "sweep end frequency above Nyquist",
            ));
        }
        if self.duration_s <= 0.0 {
            return Err(EngineError::DeconvolutionFailed("sweep duration must be positive"));
        }
        Ok(())
    }

    /// Number of samples in the generated sweep.
    pub fn num_samples(&self, sample_rate_hz: u32) -> usize {
        (self.duration_s * sample_rate_hz as f32) as usize
    }

    /// Exponential rate `R = ln(end/start) / duration`, in 1/s.
    fn rate(&self) -> f32 {
        (self.end_hz / self.start_hz).ln() / self.duration_s
    }
}

/// Generate the exponential sine sweep excitation.
///
/// Instantaneous frequency grows as `f(t) = f1 * exp(R*t)`; the phase is its
/// integral `2*pi*f1/R * (exp(R*t) - 1)`. A linear fade over 5% of the
/// duration at each end avoids spectral splatter from hard edges.
pub fn generate_sweep(sample_rate_hz: u32, params: &SweepParams) -> Result<Vec<f32>> {
    params.validate(sample_rate_hz)?;

    let num_samples = params.num_samples(sample_rate_hz);
    let rate = params.rate();
    let phase_scale = 2.0 * PI * params.start_hz / rate;
    let fade_len = (num_samples as f32 * FADE_FRACTION) as usize;

    let sweep = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate_hz as f32;
            let phase = phase_scale * ((rate * t).exp() - 1.0);
            let envelope = SWEEP_AMPLITUDE * fade_gain(i, num_samples, fade_len);
            envelope * phase.sin()
        })
        .collect();

    Ok(sweep)
}

/// Generate the matched inverse filter for deconvolution.
///
/// The inverse is the time-reversed sweep modulated by `f1 / f(t)`, which
/// compensates the -3 dB/octave energy tilt of the exponential sweep, then
/// normalized to unit peak.
pub fn generate_inverse(sample_rate_hz: u32, params: &SweepParams) -> Result<Vec<f32>> {
    let sweep = generate_sweep(sample_rate_hz, params)?;
    let rate = params.rate();
    let num_samples = sweep.len();

    let mut inverse: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate_hz as f32;
            // f1 / f(t) = exp(-R*t): unity at the high-frequency head of
            // the reversed sweep, f1/f2 at its low-frequency tail.
            sweep[num_samples - 1 - i] * (-rate * t).exp()
        })
        .collect();

    let peak = inverse.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    if peak > 0.0 {
        let scale = 1.0 / peak;
        for sample in &mut inverse {
            *sample *= scale;
        }
    }

    Ok(inverse)
}

/// Linear fade-in/fade-out gain for sample `i` of `n`.
fn fade_gain(i: usize, n: usize, fade_len: usize) -> f32 {
    if fade_len == 0 {
        return 1.0;
    }
    if i < fade_len {
        i as f32 / fade_len as f32
    } else if i >= n - fade_len {
        (n - 1 - i) as f32 / fade_len as f32
    } else {
        1.0
    }
}
