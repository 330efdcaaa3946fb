//! Model-based reverberation prediction: Sabine and Eyring.
//!
//! Both formulas predict RT60 from the room volume, the equivalent
//! absorption area, and an air-attenuation term. Eyring's logarithmic
//! correction tracks measured rooms better once mean absorption gets high;
//! for small mean absorption the two converge.

use crate::band::{BandMap, FrequencyBand};
use crate::error::{EngineError, Result};
use crate::room::RoomModel;

/// The Sabine constant 0.161 s/m (24 ln10 / c at room temperature).
pub const SABINE_COEFFICIENT: f32 = 0.161;

/// Predictions are clamped into this range to keep downstream quality
/// assessment meaningful.
pub const MIN_PREDICTED_S: f32 = 0.1;
pub const MAX_PREDICTED_S: f32 = 10.0;

/// Mean absorption is capped here so the Eyring logarithm stays finite.
const MAX_MEAN_ABSORPTION: f32 = 0.99;

/// Air attenuation coefficient `m` in 1/m for a band.
///
/// Parametric fit `m = 5.5e-4 * sqrt(50/h) * (f/1000)^1.7` with `h` the
/// relative humidity as a fraction. Grows with frequency and with dryness;
/// the `4*m*V` term in the predictors models the resulting air loss. This
/// is a deliberate simplification, not the ISO 9613-1 model.
pub fn air_attenuation(band: FrequencyBand, humidity_pct: f32) -> f32 {
    let humidity_fraction = humidity_pct / 100.0;
    let frequency_khz = band.center_hz() / 1000.0;
    5.5e-4 * (50.0 / humidity_fraction).sqrt() * frequency_khz.powf(1.7)
}

/// Sabine prediction for one band:
/// `T = 0.161 * V / (A + 4*m*V)`.
pub fn sabine_rt60(room: &RoomModel, band: FrequencyBand, use_air_absorption: bool) -> Result<f32> {
    let volume = room.volume_m3();
    let absorption = room.absorption_area_m2(band);
    let air = air_term(room, band, use_air_absorption);

    let rt = SABINE_COEFFICIENT * volume / (absorption + air);
    finalize(rt, "sabine prediction")
}

/// Eyring prediction for one band:
/// `T = 0.161 * V / (-S * ln(1 - mean_alpha) + 4*m*V)`.
///
/// As mean absorption approaches 1 the denominator diverges and the
/// prediction correctly collapses toward zero (then clamps at the floor).
pub fn eyring_rt60(room: &RoomModel, band: FrequencyBand, use_air_absorption: bool) -> Result<f32> {
    let volume = room.volume_m3();
    let total_area = room.total_surface_area_m2();
    let mean_alpha = room.mean_absorption(band).min(MAX_MEAN_ABSORPTION);
    let air = air_term(room, band, use_air_absorption);

    let rt = SABINE_COEFFICIENT * volume / (-total_area * (1.0 - mean_alpha).ln() + air);
    finalize(rt, "eyring prediction")
}

/// Sabine and Eyring maps over all six bands.
pub fn predicted_rt60(
    room: &RoomModel,
    use_air_absorption: bool,
) -> Result<(BandMap<f32>, BandMap<f32>)> {
    let mut sabine = BandMap::splat(0.0f32);
    let mut eyring = BandMap::splat(0.0f32);
    for band in FrequencyBand::ALL {
        *sabine.get_mut(band) = sabine_rt60(room, band, use_air_absorption)?;
        *eyring.get_mut(band) = eyring_rt60(room, band, use_air_absorption)?;
    }
    Ok((sabine, eyring))
}

fn air_term(room: &RoomModel, band: FrequencyBand, use_air_absorption: bool) -> f32 {
    if use_air_absorption {
        4.0 * air_attenuation(band, room.humidity_pct) * room.volume_m3()
    } else {
        0.0
    }
}

/// Clamp into the presentable range; a NaN or infinity here means the
/// inputs violated the validated-room contract.
fn finalize(rt: f32, context: &'static str) -> Result<f32> {
    if !rt.is_finite() {
        return Err(EngineError::ComputationFault(context));
    }
    Ok(rt.clamp(MIN_PREDICTED_S, MAX_PREDICTED_S))
}
