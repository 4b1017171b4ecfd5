//! # textpack Core
//!
//! Core components for the textpack string packer.
//!
//! This crate provides the fundamental building blocks shared by the
//! encoder and the decoder:
//!
//! - [`bitstream`]: LSB-first bit-level I/O for variable-width codes
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: Command line                                        │
//! │     textpack pack / lookup / lua / stats                │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Shared-dictionary LZW, record assembly, identifiers │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter                                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use textpack_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(100, 7).unwrap();
//! writer.write_bits(200, 8).unwrap();
//! let data = writer.into_vec();
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(7).unwrap(), 100);
//! assert_eq!(reader.read_bits(8).unwrap(), 200);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter, MAX_CODE_BITS};
pub use error::{CoreError, Result};
