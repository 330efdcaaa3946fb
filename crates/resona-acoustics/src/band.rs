//! ISO octave bands and per-band containers.
//!
//! The engine works on six octave bands centered 125 Hz to 4 kHz. A
//! [`BandMap`] is a total mapping from band to value: every band always has
//! an entry, which is what lets missing measurements be modeled as
//! `BandMap<Option<T>>` instead of sparse maps.

use std::f64::consts::SQRT_2;
use std::fmt;

use resona_core::{bandpass_coefficients, Biquad};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cancel::CancelToken;
use crate::error::Result;

/// Octave-band center frequencies covered by the analysis, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrequencyBand {
    /// 125 Hz octave band
    Hz125,
    /// 250 Hz octave band
    Hz250,
    /// 500 Hz octave band
    Hz500,
    /// 1 kHz octave band
    Khz1,
    /// 2 kHz octave band
    Khz2,
    /// 4 kHz octave band
    Khz4,
}

impl FrequencyBand {
    /// All bands in ascending frequency order.
    pub const ALL: [FrequencyBand; 6] = [
        FrequencyBand::Hz125,
        FrequencyBand::Hz250,
        FrequencyBand::Hz500,
        FrequencyBand::Khz1,
        FrequencyBand::Khz2,
        FrequencyBand::Khz4,
    ];

    /// Band center frequency in Hz.
    pub fn center_hz(self) -> f32 {
        match self {
            FrequencyBand::Hz125 => 125.0,
            FrequencyBand::Hz250 => 250.0,
            FrequencyBand::Hz500 => 500.0,
            FrequencyBand::Khz1 => 1000.0,
            FrequencyBand::Khz2 => 2000.0,
            FrequencyBand::Khz4 => 4000.0,
        }
    }

    /// Lower band edge, `fc / sqrt(2)`.
    pub fn lower_hz(self) -> f32 {
        self.center_hz() / std::f32::consts::SQRT_2
    }

    /// Upper band edge, `fc * sqrt(2)`.
    pub fn upper_hz(self) -> f32 {
        self.center_hz() * std::f32::consts::SQRT_2
    }

    /// Position in [`FrequencyBand::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Serialization key: `"125_hz"` .. `"4_khz"`.
    pub fn key(self) -> &'static str {
        match self {
            FrequencyBand::Hz125 => "125_hz",
            FrequencyBand::Hz250 => "250_hz",
            FrequencyBand::Hz500 => "500_hz",
            FrequencyBand::Khz1 => "1_khz",
            FrequencyBand::Khz2 => "2_khz",
            FrequencyBand::Khz4 => "4_khz",
        }
    }

    /// Parse a serialization key back into a band.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyBand::Hz125 => write!(f, "125 Hz"),
            FrequencyBand::Hz250 => write!(f, "250 Hz"),
            FrequencyBand::Hz500 => write!(f, "500 Hz"),
            FrequencyBand::Khz1 => write!(f, "1 kHz"),
            FrequencyBand::Khz2 => write!(f, "2 kHz"),
            FrequencyBand::Khz4 => write!(f, "4 kHz"),
        }
    }
}

/// A total mapping from [`FrequencyBand`] to a value.
///
/// Serializes as an object keyed `"125_hz"` .. `"4_khz"`; deserialization
/// requires all six keys, enforcing the "no missing bands" invariant at
/// parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandMap<T>([T; 6]);

impl<T> BandMap<T> {
    /// Build a map by evaluating `f` for every band, ascending.
    pub fn from_fn(f: impl FnMut(FrequencyBand) -> T) -> Self {
        Self(FrequencyBand::ALL.map(f))
    }

    /// Value for a band.
    pub fn get(&self, band: FrequencyBand) -> &T {
        &self.0[band.index()]
    }

    /// Mutable value for a band.
    pub fn get_mut(&mut self, band: FrequencyBand) -> &mut T {
        &mut self.0[band.index()]
    }

    /// Iterate `(band, value)` pairs in ascending frequency order.
    pub fn iter(&self) -> impl Iterator<Item = (FrequencyBand, &T)> {
        FrequencyBand::ALL.iter().copied().zip(self.0.iter())
    }

    /// Iterate values in ascending frequency order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// Apply `f` to every value, preserving band association.
    pub fn map<U>(&self, mut f: impl FnMut(FrequencyBand, &T) -> U) -> BandMap<U> {
        BandMap::from_fn(|band| f(band, self.get(band)))
    }
}

impl<T: Clone> BandMap<T> {
    /// A map holding the same value for every band.
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl BandMap<Option<f32>> {
    /// Arithmetic mean over the populated bands; `None` if all are absent.
    pub fn average(&self) -> Option<f32> {
        let present: Vec<f32> = self.values().filter_map(|v| *v).collect();
        if present.is_empty() {
            None
        } else {
            Some(present.iter().sum::<f32>() / present.len() as f32)
        }
    }
}

impl BandMap<f32> {
    /// Arithmetic mean over all six bands.
    pub fn average(&self) -> f32 {
        self.values().sum::<f32>() / 6.0
    }
}

impl<T: Serialize> Serialize for BandMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        for (band, value) in self.iter() {
            map.serialize_entry(band.key(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for BandMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BandMapVisitor<T>(std::marker::PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for BandMapVisitor<T> {
            type Value = BandMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with keys \"125_hz\" through \"4_khz\"")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut slots: [Option<T>; 6] = [None, None, None, None, None, None];
                while let Some(key) = access.next_key::<String>()? {
                    let band = FrequencyBand::from_key(&key)
                        .ok_or_else(|| de::Error::custom(format!("unknown band key '{key}'")))?;
                    if slots[band.index()].is_some() {
                        return Err(de::Error::custom(format!("duplicate band key '{key}'")));
                    }
                    slots[band.index()] = Some(access.next_value()?);
                }

                for band in FrequencyBand::ALL {
                    if slots[band.index()].is_none() {
                        return Err(de::Error::custom(format!(
                            "missing band key '{}'",
                            band.key()
                        )));
                    }
                }

                Ok(BandMap(slots.map(|s| s.expect("checked above"))))
            }
        }

        deserializer.deserialize_map(BandMapVisitor(std::marker::PhantomData))
    }
}

/// Q factor giving a one-octave passband for the RBJ bandpass.
pub const OCTAVE_Q: f64 = SQRT_2;

/// Zero-phase second-order bandpass for one octave band.
///
/// The filter is applied forward then backward, canceling group delay and
/// doubling the effective rolloff. Both transients are preserved (no
/// trimming) so Schroeder integration downstream sees the full decay.
#[derive(Debug, Clone)]
pub struct OctaveBandFilter {
    band: FrequencyBand,
    sample_rate_hz: u32,
    coefficients: (f64, f64, f64, f64, f64, f64),
}

impl OctaveBandFilter {
    /// Build a filter for `band` at the given sample rate.
    ///
    /// Returns `None` when the band center lies at or above the Nyquist
    /// frequency; such bands are excluded from analysis.
    pub fn new(band: FrequencyBand, sample_rate_hz: u32) -> Option<Self> {
        let nyquist = sample_rate_hz as f64 / 2.0;
        let center = band.center_hz() as f64;
        if center >= nyquist - 1.0 {
            return None;
        }

        Some(Self {
            band,
            sample_rate_hz,
            coefficients: bandpass_coefficients(center, OCTAVE_Q, sample_rate_hz as f64),
        })
    }

    /// The band this filter extracts.
    pub fn band(&self) -> FrequencyBand {
        self.band
    }

    /// Filter the input with zero phase (forward pass, then reverse pass).
    ///
    /// Inputs shorter than a tenth of a second are returned unchanged; the
    /// decay estimator downstream rejects them anyway, and filtering a
    /// handful of samples only smears what little energy there is.
    pub fn apply(&self, samples: &[f32], cancel: &CancelToken) -> Result<Vec<f32>> {
        if samples.len() < (self.sample_rate_hz / 10) as usize {
            return Ok(samples.to_vec());
        }

        let (b0, b1, b2, a0, a1, a2) = self.coefficients;
        let mut filter = Biquad::new();
        filter.set_coefficients(b0, b1, b2, a0, a1, a2);

        let mut output: Vec<f32> = samples.iter().map(|&x| filter.process(x)).collect();

        if samples.len() >= self.sample_rate_hz as usize {
            cancel.check()?;
        }

        filter.clear();
        for i in (0..output.len()).rev() {
            output[i] = filter.process(output[i]);
        }

        Ok(output)
    }
}
