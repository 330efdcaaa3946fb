//! Resona Core - DSP primitives for room-acoustics analysis
//!
//! This crate provides the numerical building blocks shared by the
//! analysis engine:
//!
//! - [`Biquad`] second-order IIR filter with RBJ cookbook coefficients
//! - Level conversions ([`amplitude_db`], [`power_db`], [`rms`], [`peak`])
//! - [`linear_regression`] least-squares fit with Pearson correlation
//!
//! ## no_std Support
//!
//! This crate is `no_std` compatible. Use `default-features = false` in your
//! `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! resona-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod math;

// Re-export main types at crate root
pub use biquad::{bandpass_coefficients, Biquad};
pub use math::{amplitude_db, linear_regression, peak, power_db, rms, Regression};
