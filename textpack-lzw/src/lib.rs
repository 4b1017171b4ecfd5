//! # textpack-lzw: Shared-Dictionary String Packing
//!
//! This crate packs a corpus of short strings into one compact blob meant
//! to be embedded in a fixed memory region, and hands back a 3-character
//! identifier per string that a matching decoder resolves at lookup time.
//!
//! ## Features
//!
//! - **One dictionary per corpus**: every string extends the same LZW code
//!   table, so phrases shared across strings compress together
//! - **Variable-width codes**: 7 bits to start, one more each time the
//!   table fills the current code space; LSB-first bit packing
//! - **Random access**: each string is its own byte-aligned record,
//!   addressed by its identifier
//! - **Companion decoder**: a Rust decoder plus a generated Pico-8 Lua
//!   unpacker that replay the identical growth rule
//!
//! ## Data Layout
//!
//! ```text
//! u16 LE  string count
//! then per string:
//!   u16 LE  code count
//!   u16 LE  table size when the string was encoded
//!   u8      code width when the string was encoded
//!   ...     packed codes
//! ```
//!
//! Decoding needs the whole dictionary, which is never stored: it is
//! rebuilt once by replaying every record ([`bootstrap`]), after which any
//! record can be decoded directly.
//!
//! ## Example
//!
//! ```rust
//! use textpack_lzw::{PackConfig, TextPacker, bootstrap};
//!
//! let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
//! let cat = packer.assign_identifier("The cat sat").unwrap();
//! let dog = packer.assign_identifier("the  dog sat").unwrap();
//! let data = packer.as_bytes().unwrap();
//!
//! let table = bootstrap(&data, &PackConfig::PICO8).unwrap();
//! let text = table.decode(&data, &format!("{cat}{dog}")).unwrap();
//! assert_eq!(text, "the cat satthe dog sat");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod alphabet;
pub mod assembler;
mod config;
mod decoder;
pub mod dictionary;
mod encoder;
mod error;
pub mod identifier;
pub mod lua;

pub use alphabet::{Alphabet, normalize};
pub use config::{ADDRESS_SPACE, MAX_TABLE_LIMIT, PackConfig};
pub use decoder::{DecodeTable, Decoder, bootstrap};
pub use encoder::{PackStats, TextPacker};
pub use error::{PackError, Result};
pub use lua::generate_lua;

/// Pack `strings` in order and return their identifiers and the serialized
/// corpus.
///
/// # Example
///
/// ```rust
/// use textpack_lzw::{PackConfig, pack, unpack};
///
/// let (ids, data) = pack(&["Hello, world!", "hello world"], PackConfig::PICO8).unwrap();
/// assert_eq!(unpack(&data, &ids[0], PackConfig::PICO8).unwrap(), "hello, world!");
/// ```
pub fn pack<S: AsRef<str>>(strings: &[S], config: PackConfig) -> Result<(Vec<String>, Vec<u8>)> {
    let mut packer = TextPacker::new(config)?;
    let ids = strings
        .iter()
        .map(|s| packer.assign_identifier(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    let data = packer.as_bytes()?;
    Ok((ids, data))
}

/// Bootstrap `data` and decode the identifiers in `tokens`.
///
/// Convenience for one-off lookups; keep a [`DecodeTable`] or [`Decoder`]
/// around to avoid replaying the corpus each time.
pub fn unpack(data: &[u8], tokens: &str, config: PackConfig) -> Result<String> {
    bootstrap(data, &config)?.decode(data, tokens)
}
