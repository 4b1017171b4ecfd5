//! Packing and unpacking error types.

use textpack_core::CoreError;
use thiserror::Error;

/// Errors raised while packing strings or decoding a packed corpus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    /// A character is not part of the alphabet (checked after lowercasing).
    #[error("Character out of range: {ch:?}, pos:{position}")]
    CharOutOfRange {
        /// The offending character.
        ch: char,
        /// Character index inside the normalized string.
        position: usize,
    },

    /// The serialized corpus does not fit the configured address window.
    #[error(
        "Too much data: compressed data is too large: {size} bytes do not fit between addresses {start} and {end} ({window} bytes)"
    )]
    TooMuchData {
        /// Serialized size in bytes.
        size: usize,
        /// Window size in bytes.
        window: usize,
        /// Window start address.
        start: u32,
        /// Window end address (exclusive).
        end: u32,
    },

    /// A code does not name an existing table entry.
    #[error("Invalid LZW code: {code} (table has {table_len} entries)")]
    InvalidCode {
        /// The code read from the stream.
        code: u16,
        /// Table length at the time the code was read.
        table_len: usize,
    },

    /// An identifier token contains characters outside the identifier set,
    /// or its length is not a multiple of the token width.
    #[error("Invalid identifier token: {token:?}")]
    InvalidIdentifier {
        /// The rejected token text.
        token: String,
    },

    /// A record would start at an address that identifiers cannot express.
    #[error("Address {address:#x} does not fit in a 16-bit identifier")]
    AddressOverflow {
        /// The address that overflowed.
        address: u32,
    },

    /// A string is longer than a record header can count codes for.
    #[error("String of {len} characters exceeds the 65535-code record limit")]
    StringTooLong {
        /// Normalized length in characters.
        len: usize,
    },

    /// More distinct strings than the count prefix can hold.
    #[error("Too many strings (max 65535)")]
    TooManyStrings,

    /// An identifier points outside the packed data.
    #[error("Identifier address {address:#x} is outside the packed data")]
    OffsetOutOfRange {
        /// The decoded identifier address.
        address: u32,
    },

    /// A record header or code stream disagrees with the replayed table.
    #[error("Corrupt record at offset {offset}: {message}")]
    CorruptRecord {
        /// Byte offset of the record inside the packed data.
        offset: usize,
        /// Description of the mismatch.
        message: String,
    },

    /// The packing configuration is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bit-level failure from the core bitstream.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;

impl PackError {
    /// Create a corrupt record error.
    pub fn corrupt(offset: usize, message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            offset,
            message: message.into(),
        }
    }
}
