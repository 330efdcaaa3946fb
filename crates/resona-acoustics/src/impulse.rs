//! Impulse locator for clap and balloon-pop captures.
//!
//! When the excitation is an acoustic event rather than a sweep, the
//! impulse response is the recording itself; all that is needed is finding
//! the event and windowing around it.

use std::ops::Range;

/// Default absolute amplitude below which no impulse is recognized.
pub const DEFAULT_THRESHOLD: f32 = 0.3;

/// Fraction of the peak used when walking backward to the impulse onset.
const ONSET_FRACTION: f32 = 0.1;

/// Maximum impulse-response length in seconds.
const MAX_IR_SECONDS: u32 = 5;

/// Locate the primary impulse in `samples` and return the window around it.
///
/// The peak must reach `threshold` (absolute amplitude) to count as an
/// impulse; `None` means no impulse was detected and the caller may fall
/// back to the raw buffer. The window starts where the signal last rose
/// through a tenth of the peak and is capped at five seconds.
pub fn locate_impulse(samples: &[f32], threshold: f32, sample_rate_hz: u32) -> Option<Range<usize>> {
    if samples.is_empty() {
        return None;
    }

    let peak_index = samples
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            a.abs()
                .partial_cmp(&b.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)?;
    let peak = samples[peak_index].abs();

    if peak < threshold {
        return None;
    }

    let onset_level = peak * ONSET_FRACTION;
    let mut start = 0;
    for i in (0..peak_index).rev() {
        if samples[i].abs() < onset_level {
            start = i;
            break;
        }
    }

    let max_len = (MAX_IR_SECONDS * sample_rate_hz) as usize;
    let end = samples.len().min(start + max_len.max(1));

    Some(start..end)
}
