//! Error types for the analysis engine.

use thiserror::Error;

/// Errors that can occur while analyzing a measurement.
///
/// Band-local kinds ([`EngineError::is_band_local`]) are caught inside the
/// analyzer and reduce to absent optional values in the result; the
/// remaining kinds abort the run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input too short for the requested computation.
    #[error("insufficient data: need at least {needed} samples, got {got}")]
    InsufficientData {
        /// Minimum number of samples required.
        needed: usize,
        /// Number of samples actually supplied.
        got: usize,
    },

    /// The decay curve never crosses a required dB threshold.
    #[error("decay curve never spans {start_db} dB to {end_db} dB")]
    InvalidDecayRange {
        /// Upper threshold of the requested evaluation range, in dB.
        start_db: f32,
        /// Lower threshold of the requested evaluation range, in dB.
        end_db: f32,
    },

    /// Least-squares fit quality below the acceptance gate.
    #[error("decay fit correlation {r:.3} below quality gate")]
    LowCorrelation {
        /// Pearson correlation of the rejected fit.
        r: f32,
    },

    /// Computed decay time outside the physically plausible range.
    #[error("decay time {seconds:.3} s outside plausible range")]
    ImplausibleResult {
        /// The rejected decay time in seconds.
        seconds: f32,
    },

    /// ESS run could not produce a usable impulse response.
    #[error("deconvolution failed: {0}")]
    DeconvolutionFailed(&'static str),

    /// Room geometry rejected before analysis started.
    #[error("invalid room: {0}")]
    InvalidRoom(String),

    /// Caller requested abort; no partial analysis is emitted.
    #[error("analysis cancelled")]
    Cancelled,

    /// Internal numerical invariant violated (NaN/Inf). Indicates a bug,
    /// not a data problem.
    #[error("numerical fault in {0}")]
    ComputationFault(&'static str),
}

impl EngineError {
    /// Whether this error is suppressed at band level (the band's values
    /// become absent) rather than aborting the whole run.
    pub fn is_band_local(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientData { .. }
                | EngineError::InvalidDecayRange { .. }
                | EngineError::LowCorrelation { .. }
                | EngineError::ImplausibleResult { .. }
        )
    }
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
