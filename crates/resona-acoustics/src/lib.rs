//! Resona Acoustics - room impulse response analysis
//!
//! This crate turns a captured (or deconvolved) room impulse response into
//! per-octave-band reverberation figures and checks them against geometric
//! model predictions:
//!
//! - [`sweep`] - Exponential sine sweep excitation and inverse filter
//! - [`deconvolve`] - FFT deconvolution of a recorded sweep response
//! - [`impulse`] - Impulse locator for clap/balloon captures
//! - [`band`] - ISO octave bands and zero-phase bandpass filtering
//! - [`schroeder`] - Backward energy integration into decay curves
//! - [`decay`] - EDT/T20/T30/RT60 estimation with quality gating
//! - [`room`] - Room geometry, surfaces, and material absorption
//! - [`predict`] - Sabine and Eyring reverberation prediction
//! - [`analyzer`] - Orchestration of a full measurement run
//! - [`report`] - The JSON-serializable analysis result
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use resona_acoustics::{analyze, AnalyzeOptions, Mode, SweepParams};
//!
//! // 1. Synthesize the excitation for playback (external audio stack)
//! let sweep = resona_acoustics::generate_sweep(48_000, &SweepParams::default())?;
//!
//! // 2. Record the room's response while the sweep plays (external)
//!
//! // 3. Analyze the recording against the room description
//! let analysis = analyze(
//!     &recording,
//!     48_000,
//!     Mode::Ess(SweepParams::default()),
//!     &room,
//!     &AnalyzeOptions::default(),
//! )?;
//! println!("RT60 at 1 kHz: {:?}", analysis.measured_rt60_seconds);
//! ```
//!
//! The engine is batch/offline and single-channel: one call analyzes one
//! measurement. Independent analyses may run on parallel threads; nothing
//! in the crate holds process-wide state.

pub mod analyzer;
pub mod band;
pub mod cancel;
pub mod decay;
pub mod deconvolve;
pub mod error;
pub mod fft;
pub mod impulse;
pub mod predict;
pub mod report;
pub mod room;
pub mod schroeder;
pub mod sweep;

// Re-export main types at crate root
pub use analyzer::{
    analyze, analyze_band, AnalyzeOptions, BandResult, EstimatorSelection, ImpulseResponse, Mode,
};
pub use band::{BandMap, FrequencyBand, OctaveBandFilter};
pub use cancel::CancelToken;
pub use decay::DecayTimes;
pub use deconvolve::{deconvolve, fft_convolve, Deconvolution};
pub use error::{EngineError, Result};
pub use impulse::locate_impulse;
pub use predict::{air_attenuation, eyring_rt60, predicted_rt60, sabine_rt60};
pub use report::{quality_description, Analysis, RoomSnapshot};
pub use room::{materials, AcousticMaterial, RoomModel, Surface};
pub use schroeder::{schroeder_decay, DecayCurve};
pub use sweep::{generate_inverse, generate_sweep, SweepParams};
