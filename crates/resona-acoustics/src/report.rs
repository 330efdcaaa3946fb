//! The terminal analysis result.
//!
//! `Analysis` is a self-contained value object: it snapshots the room, the
//! per-band scalars, and the averages, but never holds sample buffers or
//! decay curves, so storing it keeps nothing large alive.

use serde::Serialize;

use crate::band::BandMap;
use crate::room::RoomModel;

/// Immutable copy of the room taken at analysis time, so later edits to the
/// source room do not alter stored results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSnapshot {
    /// Room label.
    pub name: String,
    /// Width in meters.
    pub width_m: f32,
    /// Length in meters.
    pub length_m: f32,
    /// Height in meters.
    pub height_m: f32,
    /// Interior volume in cubic meters.
    pub volume_m3: f32,
    /// Total boundary area in square meters.
    pub surface_area_m2: f32,
    /// Number of declared surfaces (zero means default absorption).
    pub surface_count: usize,
    /// Air temperature in degrees Celsius.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_pct: f32,
    /// Speed of sound at the room temperature, in m/s.
    pub speed_of_sound_mps: f32,
}

impl From<&RoomModel> for RoomSnapshot {
    fn from(room: &RoomModel) -> Self {
        Self {
            name: room.name.clone(),
            width_m: room.width_m,
            length_m: room.length_m,
            height_m: room.height_m,
            volume_m3: room.volume_m3(),
            surface_area_m2: room.total_surface_area_m2(),
            surface_count: room.surfaces.len(),
            temperature_c: room.temperature_c,
            humidity_pct: room.humidity_pct,
            speed_of_sound_mps: room.speed_of_sound_mps(),
        }
    }
}

/// The complete result of one analysis run.
///
/// Optional per-band values are absent when the band failed its quality
/// gates; absent serializes as `null`, never as a sentinel number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Wall-clock time of the run, seconds since the Unix epoch.
    pub timestamp_unix_seconds: u64,
    /// Snapshot of the analyzed room.
    pub room: RoomSnapshot,
    /// Measured RT60 per band, by estimator priority.
    pub measured_rt60_seconds: BandMap<Option<f32>>,
    /// Early decay time per band.
    pub edt_seconds: BandMap<Option<f32>>,
    /// T20 per band.
    pub t20_seconds: BandMap<Option<f32>>,
    /// T30 per band.
    pub t30_seconds: BandMap<Option<f32>>,
    /// Peak level of the band-filtered impulse response, in dB.
    pub peak_db: BandMap<Option<f32>>,
    /// Noise-floor estimate of the band-filtered impulse response, in dB.
    pub noise_floor_db: BandMap<Option<f32>>,
    /// Sabine prediction per band.
    pub sabine_rt60_seconds: BandMap<f32>,
    /// Eyring prediction per band.
    pub eyring_rt60_seconds: BandMap<f32>,
    /// Mean of the measured values over populated bands.
    pub average_measured_rt60_seconds: Option<f32>,
    /// Mean Sabine prediction over all bands.
    pub average_sabine_rt60_seconds: f32,
    /// Mean Eyring prediction over all bands.
    pub average_eyring_rt60_seconds: f32,
    /// Human-readable room character, from the measured average when
    /// available, otherwise from the Sabine average.
    pub quality: String,
    /// Non-fatal conditions encountered during the run.
    pub warnings: Vec<String>,
}

/// Map an average RT60 onto one of six human-readable categories.
pub fn quality_description(rt60_seconds: f32) -> &'static str {
    match rt60_seconds {
        t if t < 0.3 => "very dry (studio-like)",
        t if t < 0.5 => "dry, well damped",
        t if t < 0.8 => "balanced, comfortable for everyday rooms",
        t if t < 1.2 => "live, noticeably reverberant",
        t if t < 2.0 => "reverberant, speech clarity suffers",
        _ => "very reverberant (hall-like)",
    }
}
