//! Audio file I/O for the Resona room-acoustics toolkit.
//!
//! The analysis engine is single-channel: every buffer it consumes or
//! produces is mono f32. This crate is the seam between that world and WAV
//! files on disk. Reading mixes any channel layout down to mono; writing
//! always emits mono 32-bit float, which is what the toolkit's artifacts
//! (sweeps, inverse filters, extracted impulse responses) are.

mod wav;

pub use wav::{read_mono, write_mono};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
