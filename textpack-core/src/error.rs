//! Error types for bit-level operations.
//!
//! Every failure at this layer is a malformed or truncated byte buffer, or
//! a caller asking for a code width the packer never produces.

use thiserror::Error;

/// The error type for textpack core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The buffer ended before the requested bits were available.
    #[error("Unexpected end of data at bit position {position}")]
    UnexpectedEof {
        /// Bit position (from the start of the reader) where data ran out.
        position: u64,
    },

    /// A code width outside 1..=16 was requested.
    #[error("Invalid bit width: {0} (must be 1-16)")]
    InvalidBitWidth(u8),
}

/// Result type alias for textpack core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an unexpected EOF error.
    pub fn unexpected_eof(position: u64) -> Self {
        Self::UnexpectedEof { position }
    }
}
