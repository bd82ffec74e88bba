//! Error types for generator operations.

use thiserror::Error;

/// Errors returned by [`Generator`](crate::Generator) and the
/// [`UniformRandom`](crate::UniformRandom) operations.
///
/// Argument errors are detected before any entropy is read, so a failed
/// call leaves the entropy buffer exactly as it was.
#[derive(Error, Debug)]
pub enum Error {
    /// Upper bound not strictly greater than the lower bound.
    #[error("invalid range: max ({max}) must be greater than min ({min})")]
    InvalidRange {
        /// Inclusive lower bound requested by the caller
        min: i64,
        /// Exclusive upper bound requested by the caller
        max: i64,
    },

    /// Modulus outside `1..=MAX_MODULUS`.
    #[error("invalid modulus {modulus}: must be between 1 and 2^56")]
    InvalidModulus {
        /// The rejected modulus
        modulus: u64,
    },

    /// The entropy source failed to deliver bytes.
    #[error("entropy source failed: {0}")]
    Source(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
