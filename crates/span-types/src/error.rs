//! Error types for span decoding.

use thiserror::Error;

/// Errors raised by span decoders.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed span payload: {0}")]
    Malformed(String),

    #[error("Truncated span payload: needed {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("Unsupported encoding: {0}")]
    Unsupported(String),
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
