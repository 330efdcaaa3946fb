//! Geometric room description: materials, surfaces, and the room itself.
//!
//! These are plain value objects supplied by the caller (or parsed from a
//! room description file) and snapshotted into the analysis result. All
//! validation happens up front through [`RoomModel::validate`]; the
//! predictor assumes a validated room.

use serde::{Deserialize, Serialize};

use crate::band::{BandMap, FrequencyBand};
use crate::error::{EngineError, Result};

/// Absorption coefficient used when a room declares no surfaces.
pub const DEFAULT_ALPHA: f32 = 0.1;

/// A named absorption profile: one coefficient per octave band.
///
/// The `BandMap` representation makes the mapping total by construction;
/// deserialization rejects profiles with missing bands. In room description
/// files a material may also be given as a bare preset name string, e.g.
/// `"material": "carpet"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MaterialSpec")]
pub struct AcousticMaterial {
    /// Human-readable material name.
    pub name: String,
    /// Absorption coefficient per band, each in [0, 1].
    pub absorption: BandMap<f32>,
}

/// Wire form of a material: either a preset name or a full profile.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaterialSpec {
    Preset(String),
    Full {
        name: String,
        absorption: BandMap<f32>,
    },
}

impl TryFrom<MaterialSpec> for AcousticMaterial {
    type Error = String;

    fn try_from(spec: MaterialSpec) -> std::result::Result<Self, String> {
        match spec {
            MaterialSpec::Preset(name) => materials::by_name(&name)
                .ok_or_else(|| format!("unknown material preset '{name}'")),
            MaterialSpec::Full { name, absorption } => Ok(Self { name, absorption }),
        }
    }
}

impl AcousticMaterial {
    /// Create a material from per-band coefficients.
    pub fn new(name: impl Into<String>, absorption: BandMap<f32>) -> Self {
        Self {
            name: name.into(),
            absorption,
        }
    }

    /// A material with the same coefficient at every band.
    pub fn uniform(name: impl Into<String>, alpha: f32) -> Self {
        Self::new(name, BandMap::splat(alpha))
    }

    /// Absorption coefficient at a band.
    pub fn alpha(&self, band: FrequencyBand) -> f32 {
        *self.absorption.get(band)
    }
}

/// Built-in absorption presets.
///
/// Coefficients are rounded values from published octave-band absorption
/// tables, ordered 125 Hz to 4 kHz.
pub mod materials {
    use super::AcousticMaterial;
    use crate::band::BandMap;

    fn material(name: &str, alphas: [f32; 6]) -> AcousticMaterial {
        AcousticMaterial::new(name, BandMap::from_fn(|b| alphas[b.index()]))
    }

    /// Painted concrete.
    pub fn concrete() -> AcousticMaterial {
        material("concrete", [0.01, 0.01, 0.015, 0.02, 0.02, 0.02])
    }

    /// Unglazed brick.
    pub fn brick() -> AcousticMaterial {
        material("brick", [0.03, 0.03, 0.03, 0.04, 0.05, 0.07])
    }

    /// Plaster on lath.
    pub fn plaster() -> AcousticMaterial {
        material("plaster", [0.14, 0.10, 0.06, 0.05, 0.04, 0.03])
    }

    /// Gypsum board on studs.
    pub fn gypsum_board() -> AcousticMaterial {
        material("gypsum board", [0.29, 0.10, 0.05, 0.04, 0.07, 0.09])
    }

    /// Wood flooring on joists.
    pub fn wood_floor() -> AcousticMaterial {
        material("wood floor", [0.15, 0.11, 0.10, 0.07, 0.06, 0.07])
    }

    /// Heavy carpet on concrete.
    pub fn carpet() -> AcousticMaterial {
        material("carpet", [0.02, 0.06, 0.14, 0.37, 0.60, 0.65])
    }

    /// Ordinary window glass.
    pub fn glass() -> AcousticMaterial {
        material("glass", [0.35, 0.25, 0.18, 0.12, 0.07, 0.04])
    }

    /// Heavy draped curtain.
    pub fn curtain() -> AcousticMaterial {
        material("curtain", [0.14, 0.35, 0.55, 0.72, 0.70, 0.65])
    }

    /// 50 mm mineral-wool acoustic panel.
    pub fn acoustic_panel() -> AcousticMaterial {
        material("acoustic panel", [0.15, 0.75, 0.90, 0.90, 0.85, 0.80])
    }

    /// The fallback profile used for rooms with no declared surfaces.
    pub fn default_material() -> AcousticMaterial {
        AcousticMaterial::uniform("default", super::DEFAULT_ALPHA)
    }

    /// All presets, for listings.
    pub fn all() -> Vec<AcousticMaterial> {
        vec![
            concrete(),
            brick(),
            plaster(),
            gypsum_board(),
            wood_floor(),
            carpet(),
            glass(),
            curtain(),
            acoustic_panel(),
            default_material(),
        ]
    }

    /// Look up a preset by its name.
    pub fn by_name(name: &str) -> Option<AcousticMaterial> {
        all().into_iter().find(|m| m.name == name)
    }
}

/// A bounded surface inside the room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Label, e.g. "floor" or "north wall".
    pub name: String,
    /// Surface area in square meters; must be positive.
    pub area_m2: f32,
    /// Absorption profile of the surface finish.
    pub material: AcousticMaterial,
}

impl Surface {
    /// Create a surface.
    pub fn new(name: impl Into<String>, area_m2: f32, material: AcousticMaterial) -> Self {
        Self {
            name: name.into(),
            area_m2,
            material,
        }
    }

    /// Equivalent absorption area `area * alpha(band)` in square meters.
    pub fn absorption_area_m2(&self, band: FrequencyBand) -> f32 {
        self.area_m2 * self.material.alpha(band)
    }
}

fn default_temperature_c() -> f32 {
    20.0
}

fn default_humidity_pct() -> f32 {
    50.0
}

/// A rectangular room with a list of absorbing surfaces.
///
/// The surface list may be empty, in which case the whole boundary is
/// assigned [`DEFAULT_ALPHA`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomModel {
    /// Room label.
    pub name: String,
    /// Width in meters.
    pub width_m: f32,
    /// Length in meters.
    pub length_m: f32,
    /// Height in meters.
    pub height_m: f32,
    /// Absorbing surfaces, in declaration order.
    #[serde(default)]
    pub surfaces: Vec<Surface>,
    /// Air temperature in degrees Celsius.
    #[serde(default = "default_temperature_c")]
    pub temperature_c: f32,
    /// Relative humidity in percent, in (0, 100].
    #[serde(default = "default_humidity_pct")]
    pub humidity_pct: f32,
}

impl RoomModel {
    /// Check the geometric invariants.
    ///
    /// Fails with [`EngineError::InvalidRoom`] on non-positive dimensions,
    /// humidity outside (0, 100], a non-positive surface area, or an
    /// absorption coefficient outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        if !(self.width_m > 0.0 && self.length_m > 0.0 && self.height_m > 0.0) {
            return Err(EngineError::InvalidRoom(format!(
                "dimensions must be positive, got {} x {} x {} m",
                self.width_m, self.length_m, self.height_m
            )));
        }
        if !(self.humidity_pct > 0.0 && self.humidity_pct <= 100.0) {
            return Err(EngineError::InvalidRoom(format!(
                "humidity must be in (0, 100] percent, got {}",
                self.humidity_pct
            )));
        }
        for surface in &self.surfaces {
            if !(surface.area_m2 > 0.0) {
                return Err(EngineError::InvalidRoom(format!(
                    "surface '{}' has non-positive area {} m2",
                    surface.name, surface.area_m2
                )));
            }
            for (band, &alpha) in surface.material.absorption.iter() {
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(EngineError::InvalidRoom(format!(
                        "material '{}' has absorption {} outside [0, 1] at {}",
                        surface.material.name, alpha, band
                    )));
                }
            }
        }
        Ok(())
    }

    /// Interior volume in cubic meters.
    pub fn volume_m3(&self) -> f32 {
        self.width_m * self.length_m * self.height_m
    }

    /// Total boundary area (floor, ceiling, four walls) in square meters.
    pub fn total_surface_area_m2(&self) -> f32 {
        2.0 * (self.width_m * self.length_m
            + self.width_m * self.height_m
            + self.length_m * self.height_m)
    }

    /// Speed of sound at the room temperature, in m/s.
    pub fn speed_of_sound_mps(&self) -> f32 {
        331.3 * (1.0 + self.temperature_c / 273.15).sqrt()
    }

    /// Equivalent absorption area at a band, in square meters.
    ///
    /// Sums over the declared surfaces; with no surfaces, the full
    /// boundary absorbs at [`DEFAULT_ALPHA`].
    pub fn absorption_area_m2(&self, band: FrequencyBand) -> f32 {
        if self.surfaces.is_empty() {
            self.total_surface_area_m2() * DEFAULT_ALPHA
        } else {
            self.surfaces
                .iter()
                .map(|s| s.absorption_area_m2(band))
                .sum()
        }
    }

    /// Mean absorption coefficient at a band (absorption area over total
    /// boundary area), as used by the Eyring formula.
    pub fn mean_absorption(&self, band: FrequencyBand) -> f32 {
        self.absorption_area_m2(band) / self.total_surface_area_m2()
    }
}
