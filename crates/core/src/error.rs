//! Error types for U-Stability.

use crate::exact::SolutionStatus;
use thiserror::Error;

/// Errors raised while building or solving brick structures.
#[derive(Debug, Error)]
pub enum Error {
    /// Brick coordinates or dimensions violate the structure bounds.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The requested MIP engine cannot be constructed.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The MIP search finished without a proven optimum.
    #[error("solver terminated without a proven optimum ({status}): {message}")]
    NonOptimalTermination {
        /// Status reported for the terminated search.
        status: SolutionStatus,
        /// Backend or limit message.
        message: String,
    },

    /// A serialized structure could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result alias used across U-Stability crates.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}
