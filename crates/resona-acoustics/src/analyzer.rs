//! Analysis orchestration.
//!
//! `analyze` resolves the impulse response from the capture mode, runs the
//! per-band pipeline (bandpass, Schroeder integration, decay estimation),
//! computes the model predictions, and assembles the final [`Analysis`].
//!
//! Band-level problems never abort a run; they surface as absent values.
//! Only invalid rooms, failed deconvolution, cancellation, and numerical
//! faults propagate to the caller.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::band::{BandMap, FrequencyBand, OctaveBandFilter};
use crate::cancel::CancelToken;
use crate::decay::{self, DecayTimes};
use crate::deconvolve::deconvolve;
use crate::error::{EngineError, Result};
use crate::impulse::{self, locate_impulse};
use crate::predict::predicted_rt60;
use crate::report::{quality_description, Analysis, RoomSnapshot};
use crate::room::RoomModel;
use crate::schroeder::{schroeder_decay, DecayCurve};
use crate::sweep::{generate_inverse, SweepParams};

/// How the recording excited the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Exponential sweep playback; the recording is deconvolved with the
    /// matched inverse filter.
    Ess(SweepParams),
    /// Direct acoustic event (clap, balloon); the impulse is located and
    /// windowed in the raw recording.
    Impulse {
        /// Minimum absolute peak amplitude accepted as an impulse.
        threshold: f32,
    },
    /// The buffer already is an impulse response.
    Raw,
}

impl Mode {
    /// Impulse mode with the default detection threshold.
    pub fn impulse() -> Self {
        Mode::Impulse {
            threshold: impulse::DEFAULT_THRESHOLD,
        }
    }
}

/// Per-run options.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Estimators to run per band.
    pub estimators: EstimatorSelection,
    /// Decompose into octave bands (on by default). When off, every band
    /// slot receives the unfiltered broadband result.
    pub skip_band_filter: bool,
    /// Leave the air-absorption term out of the predictions.
    pub skip_air_absorption: bool,
    /// Cooperative cancellation handle.
    pub cancel: CancelToken,
}

/// Which decay-time estimators to evaluate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorSelection {
    /// Early decay time (0 to -10 dB).
    pub edt: bool,
    /// T20 (-5 to -25 dB).
    pub t20: bool,
    /// T30 (-5 to -35 dB).
    pub t30: bool,
    /// Direct RT60 (-5 to -65 dB).
    pub rt60_direct: bool,
}

impl Default for EstimatorSelection {
    fn default() -> Self {
        Self {
            edt: true,
            t20: true,
            t30: true,
            rt60_direct: true,
        }
    }
}

/// A validated single-channel impulse response.
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    samples: Vec<f32>,
    sample_rate_hz: u32,
}

impl ImpulseResponse {
    /// Minimum length as a fraction of the sample rate (0.1 s).
    const MIN_LENGTH_DIVISOR: u32 = 10;

    /// Wrap samples, rejecting buffers shorter than 0.1 s with
    /// [`EngineError::InsufficientData`].
    pub fn new(samples: Vec<f32>, sample_rate_hz: u32) -> Result<Self> {
        let needed = (sample_rate_hz / Self::MIN_LENGTH_DIVISOR).max(1) as usize;
        if sample_rate_hz == 0 || samples.len() < needed {
            return Err(EngineError::InsufficientData {
                needed,
                got: samples.len(),
            });
        }
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    /// The time-domain samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Duration in seconds.
    pub fn duration_s(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz as f32
    }
}

/// Analysis outcome for one octave band.
#[derive(Debug, Clone)]
pub struct BandResult {
    /// The band this result describes.
    pub band: FrequencyBand,
    /// Normalized Schroeder decay curve.
    pub decay_curve: DecayCurve,
    /// Decay-time estimates that survived the quality gates.
    pub decay_times: DecayTimes,
    /// Peak level of the band-filtered signal, in dB.
    pub peak_db: f32,
    /// Noise-floor estimate of the band-filtered signal, in dB.
    pub noise_floor_db: f32,
    /// Whether at least one decay time was recovered.
    pub valid: bool,
}

impl BandResult {
    fn excluded(band: FrequencyBand) -> Self {
        Self {
            band,
            decay_curve: DecayCurve::empty(),
            decay_times: DecayTimes::default(),
            peak_db: resona_core::math::DB_FLOOR,
            noise_floor_db: resona_core::math::DB_FLOOR,
            valid: false,
        }
    }
}

/// Analyze one octave band of an impulse response.
///
/// Band-local estimator failures are reduced to absent values here; the
/// only error this returns is [`EngineError::Cancelled`].
pub fn analyze_band(
    ir: &ImpulseResponse,
    band: FrequencyBand,
    options: &AnalyzeOptions,
) -> Result<BandResult> {
    let filtered;
    let samples: &[f32] = if options.skip_band_filter {
        ir.samples()
    } else {
        match OctaveBandFilter::new(band, ir.sample_rate_hz()) {
            Some(filter) => {
                filtered = filter.apply(ir.samples(), &options.cancel)?;
                &filtered
            }
            // Band center at or above Nyquist: excluded from analysis
            None => return Ok(BandResult::excluded(band)),
        }
    };

    let decay_curve = schroeder_decay(samples, ir.sample_rate_hz());
    let decay_times = estimate_times(&decay_curve, &options.estimators)?;

    Ok(BandResult {
        band,
        peak_db: decay::peak_level_db(samples),
        noise_floor_db: decay::noise_floor_db(samples),
        valid: decay_times.any(),
        decay_times,
        decay_curve,
    })
}

/// Run the selected estimators, reducing band-local failures to absent
/// values and propagating anything else.
fn estimate_times(curve: &DecayCurve, selection: &EstimatorSelection) -> Result<DecayTimes> {
    let run = |enabled: bool, f: fn(&DecayCurve) -> Result<f32>| -> Result<Option<f32>> {
        if !enabled {
            return Ok(None);
        }
        match f(curve) {
            Ok(seconds) => Ok(Some(seconds)),
            Err(err) if err.is_band_local() => Ok(None),
            Err(err) => Err(err),
        }
    };

    Ok(DecayTimes {
        edt_s: run(selection.edt, decay::edt)?,
        t20_s: run(selection.t20, decay::t20)?,
        t30_s: run(selection.t30, decay::t30)?,
        rt60_direct_s: run(selection.rt60_direct, decay::rt60_direct)?,
    })
}

/// Run a full analysis.
///
/// `samples` is the mono recording at `sample_rate_hz`; `mode` states how
/// the room was excited. The room is validated first and snapshotted into
/// the result.
pub fn analyze(
    samples: &[f32],
    sample_rate_hz: u32,
    mode: Mode,
    room: &RoomModel,
    options: &AnalyzeOptions,
) -> Result<Analysis> {
    room.validate()?;
    options.cancel.check()?;

    let mut warnings = Vec::new();
    let ir_samples = resolve_impulse_response(samples, sample_rate_hz, mode, options, &mut warnings)?;

    let band_results = match ImpulseResponse::new(ir_samples, sample_rate_hz) {
        Ok(ir) => {
            let mut results: Vec<BandResult> = Vec::with_capacity(FrequencyBand::ALL.len());
            for band in FrequencyBand::ALL {
                options.cancel.check()?;
                results.push(analyze_band(&ir, band, options)?);
            }
            Some(results)
        }
        Err(err) if err.is_band_local() => {
            warnings.push(format!("band analysis skipped: {err}"));
            None
        }
        Err(other) => return Err(other),
    };

    let (sabine, eyring) = predicted_rt60(room, !options.skip_air_absorption)?;

    let per_band = |f: &dyn Fn(&BandResult) -> Option<f32>| {
        BandMap::from_fn(|band| {
            band_results
                .as_ref()
                .and_then(|results| f(&results[band.index()]))
        })
    };

    let measured = per_band(&|r| r.decay_times.measured_rt60_s());
    let average_measured = measured.average();
    let average_sabine = sabine.average();
    let average_eyring = eyring.average();

    let quality = quality_description(average_measured.unwrap_or(average_sabine)).to_string();

    Ok(Analysis {
        timestamp_unix_seconds: unix_timestamp(),
        room: RoomSnapshot::from(room),
        measured_rt60_seconds: measured,
        edt_seconds: per_band(&|r| r.decay_times.edt_s),
        t20_seconds: per_band(&|r| r.decay_times.t20_s),
        t30_seconds: per_band(&|r| r.decay_times.t30_s),
        peak_db: per_band(&|r| r.valid.then_some(r.peak_db)),
        noise_floor_db: per_band(&|r| r.valid.then_some(r.noise_floor_db)),
        sabine_rt60_seconds: sabine,
        eyring_rt60_seconds: eyring,
        average_measured_rt60_seconds: average_measured,
        average_sabine_rt60_seconds: average_sabine,
        average_eyring_rt60_seconds: average_eyring,
        quality,
        warnings,
    })
}

/// Dispatch on the capture mode exactly once, producing the IR buffer.
fn resolve_impulse_response(
    samples: &[f32],
    sample_rate_hz: u32,
    mode: Mode,
    options: &AnalyzeOptions,
    warnings: &mut Vec<String>,
) -> Result<Vec<f32>> {
    match mode {
        Mode::Ess(params) => {
            let inverse = generate_inverse(sample_rate_hz, &params)?;
            let result = deconvolve(
                samples,
                &inverse,
                sample_rate_hz,
                params.duration_s,
                &options.cancel,
            )?;
            if result.precision_loss {
                warnings.push("precision loss during deconvolution scaling".to_string());
            }
            Ok(result.ir)
        }
        Mode::Impulse { threshold } => match locate_impulse(samples, threshold, sample_rate_hz) {
            Some(window) => Ok(samples[window].to_vec()),
            None => {
                warnings.push("no impulse detected, falling back to raw buffer".to_string());
                Ok(samples.to_vec())
            }
        },
        Mode::Raw => Ok(samples.to_vec()),
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_room() -> RoomModel {
        RoomModel {
            name: "test".into(),
            width_m: 5.0,
            length_m: 7.0,
            height_m: 3.0,
            surfaces: Vec::new(),
            temperature_c: 20.0,
            humidity_pct: 50.0,
        }
    }

    /// Amplitude envelope dropping 60 dB over `rt60_s`.
    fn exponential_ir(rt60_s: f32, duration_s: f32, sample_rate: u32) -> Vec<f32> {
        let k = (1e3f32).ln() / rt60_s;
        (0..(duration_s * sample_rate as f32) as usize)
            .map(|n| (-k * n as f32 / sample_rate as f32).exp())
            .collect()
    }

    #[test]
    fn test_impulse_response_rejects_short_buffers() {
        assert!(ImpulseResponse::new(vec![0.0; 100], 44_100).is_err());
        assert!(ImpulseResponse::new(vec![0.0; 4410], 44_100).is_ok());
        assert!(ImpulseResponse::new(vec![0.0; 100], 0).is_err());
    }

    #[test]
    fn test_broadband_exponential_recovery() {
        let sample_rate = 44_100;
        let ir = exponential_ir(0.5, 2.0, sample_rate);
        let options = AnalyzeOptions {
            skip_band_filter: true,
            ..Default::default()
        };

        let analysis = analyze(&ir, sample_rate, Mode::Raw, &test_room(), &options).unwrap();

        let measured = analysis
            .measured_rt60_seconds
            .get(FrequencyBand::Khz1)
            .expect("broadband measurement");
        assert_abs_diff_eq!(measured, 0.5, epsilon = 0.025);

        // All slots carry the same broadband value
        for (_, value) in analysis.measured_rt60_seconds.iter() {
            assert_abs_diff_eq!(value.unwrap(), measured, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_short_buffer_keeps_predictions() {
        // 50 ms buffer: no band measurements, predictions still present
        let sample_rate = 44_100;
        let short = vec![0.5f32; (sample_rate / 20) as usize];

        let analysis = analyze(
            &short,
            sample_rate,
            Mode::Raw,
            &test_room(),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert!(analysis.average_measured_rt60_seconds.is_none());
        assert!(analysis
            .measured_rt60_seconds
            .values()
            .all(|v| v.is_none()));
        assert!(analysis.average_sabine_rt60_seconds > 0.0);
        assert!(analysis.average_eyring_rt60_seconds > 0.0);
        assert!(!analysis.warnings.is_empty());
        // Quality text falls back to the Sabine average
        assert!(!analysis.quality.is_empty());
    }

    #[test]
    fn test_invalid_room_is_fatal() {
        let mut room = test_room();
        room.height_m = -1.0;

        let result = analyze(
            &vec![0.0; 44_100],
            44_100,
            Mode::Raw,
            &room,
            &AnalyzeOptions::default(),
        );
        assert!(matches!(result, Err(EngineError::InvalidRoom(_))));
    }

    #[test]
    fn test_cancellation_before_work() {
        let options = AnalyzeOptions::default();
        options.cancel.cancel();

        let result = analyze(
            &vec![0.0; 44_100],
            44_100,
            Mode::Raw,
            &test_room(),
            &options,
        );
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }

    #[test]
    fn test_impulse_mode_falls_back_with_warning() {
        // Nothing above the threshold: locator fails, raw buffer is used
        let sample_rate = 8000;
        let quiet = vec![0.01f32; sample_rate as usize];

        let analysis = analyze(
            &quiet,
            sample_rate,
            Mode::impulse(),
            &test_room(),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.contains("no impulse detected")));
    }

    #[test]
    fn test_ess_mode_empty_recording_is_fatal() {
        let result = analyze(
            &[],
            44_100,
            Mode::Ess(SweepParams::default()),
            &test_room(),
            &AnalyzeOptions::default(),
        );
        assert!(matches!(result, Err(EngineError::DeconvolutionFailed(_))));
    }

    #[test]
    fn test_band_excluded_above_nyquist() {
        // 6 kHz sample rate: the 4 kHz band has no room below Nyquist
        let sample_rate = 6000;
        let ir = exponential_ir(0.5, 2.0, sample_rate);

        let analysis = analyze(
            &ir,
            sample_rate,
            Mode::Raw,
            &test_room(),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert!(analysis
            .measured_rt60_seconds
            .get(FrequencyBand::Khz4)
            .is_none());
        // Predictions still cover every band
        assert!(*analysis.sabine_rt60_seconds.get(FrequencyBand::Khz4) > 0.0);
    }

    #[test]
    fn test_estimator_selection_respected() {
        let sample_rate = 44_100;
        let ir = exponential_ir(0.5, 2.0, sample_rate);
        let options = AnalyzeOptions {
            estimators: EstimatorSelection {
                edt: false,
                t20: true,
                t30: false,
                rt60_direct: false,
            },
            skip_band_filter: true,
            ..Default::default()
        };

        let analysis = analyze(&ir, sample_rate, Mode::Raw, &test_room(), &options).unwrap();

        assert!(analysis.edt_seconds.values().all(|v| v.is_none()));
        assert!(analysis.t30_seconds.values().all(|v| v.is_none()));
        assert!(analysis
            .t20_seconds
            .get(FrequencyBand::Khz1)
            .is_some());
    }

    #[test]
    fn test_mode_dispatch_raw_equals_input() {
        let mut warnings = Vec::new();
        let samples = vec![0.25f32; 128];
        let out = resolve_impulse_response(
            &samples,
            8000,
            Mode::Raw,
            &AnalyzeOptions::default(),
            &mut warnings,
        )
        .unwrap();
        assert_eq!(out, samples);
        assert!(warnings.is_empty());
    }
}
