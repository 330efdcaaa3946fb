//! FFT-based deconvolution of a recorded sweep response.
//!
//! The recording is linearly convolved with the matched inverse filter; for
//! a correct sweep/inverse pair the result collapses the excitation into an
//! impulse at the tail of the kernel, leaving the room's impulse response.

use crate::cancel::CancelToken;
use crate::error::{EngineError, Result};
use crate::fft::Fft;

/// Samples preserved ahead of the located peak.
///
/// Keeps pre-echo and direct-sound structure that would otherwise be cut
/// off by windowing exactly at the peak.
pub const PRE_PEAK_MARGIN: usize = 1000;

/// Outcome of a deconvolution pass.
#[derive(Debug, Clone)]
pub struct Deconvolution {
    /// The recovered impulse response, windowed around the main peak.
    pub ir: Vec<f32>,
    /// Index of the peak in the full (un-windowed) convolution output.
    pub peak_index: usize,
    /// Whether non-finite values were encountered and zeroed during
    /// scaling. Reported to the caller as a warning, not an error.
    pub precision_loss: bool,
}

/// Convolve `recording` with `inverse` and window the result around its
/// peak.
///
/// The returned window spans `[peak - PRE_PEAK_MARGIN, peak + window_s]`
/// (clipped to the output bounds), where `window_s` is typically the sweep
/// duration.
///
/// Fails with [`EngineError::DeconvolutionFailed`] only when FFT setup is
/// impossible (an empty input); any other recording still produces an
/// impulse response, possibly of low quality.
pub fn deconvolve(
    recording: &[f32],
    inverse: &[f32],
    sample_rate_hz: u32,
    window_s: f32,
    cancel: &CancelToken,
) -> Result<Deconvolution> {
    if sample_rate_hz == 0 {
        return Err(EngineError::DeconvolutionFailed("sample rate is zero"));
    }

    let (output, precision_loss) = fft_convolve(recording, inverse, sample_rate_hz, cancel)?;
    let peak_index = peak_position(&output);

    let start = peak_index.saturating_sub(PRE_PEAK_MARGIN);
    let window_len = (window_s * sample_rate_hz as f32) as usize;
    let end = (peak_index + window_len).min(output.len());
    let ir = output[start..end].to_vec();

    Ok(Deconvolution {
        ir,
        peak_index,
        precision_loss,
    })
}

/// Linear FFT convolution of two signals.
///
/// Returns the full convolution (length `a + b - 1`, zero-padded to the
/// FFT size) and whether any non-finite values had to be zeroed. Fails
/// with [`EngineError::DeconvolutionFailed`] on an empty input and with
/// [`EngineError::Cancelled`] mid-pass for inputs of a second or more.
pub fn fft_convolve(
    a: &[f32],
    b: &[f32],
    sample_rate_hz: u32,
    cancel: &CancelToken,
) -> Result<(Vec<f32>, bool)> {
    if a.is_empty() || b.is_empty() {
        return Err(EngineError::DeconvolutionFailed("empty input buffer"));
    }

    let fft_size = (a.len() + b.len()).next_power_of_two();
    let fft = Fft::new(fft_size);

    let mut a_spectrum = fft.complex_buffer(a);
    let mut b_spectrum = fft.complex_buffer(b);

    fft.forward_complex(&mut a_spectrum);
    if a.len() >= sample_rate_hz as usize {
        cancel.check()?;
    }
    fft.forward_complex(&mut b_spectrum);

    for (x, y) in a_spectrum.iter_mut().zip(b_spectrum.iter()) {
        *x *= *y;
    }

    fft.inverse_complex(&mut a_spectrum);

    let mut precision_loss = false;
    let output: Vec<f32> = a_spectrum
        .iter()
        .map(|c| {
            if c.re.is_finite() {
                c.re
            } else {
                precision_loss = true;
                0.0
            }
        })
        .collect();

    Ok((output, precision_loss))
}

/// Index of the maximum-magnitude sample.
fn peak_position(samples: &[f32]) -> usize {
    samples
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.abs().partial_cmp(&b.abs()).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
