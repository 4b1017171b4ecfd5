//! Bit-level I/O for variable-width LZW codes.
//!
//! This module provides `BitWriter` and `BitReader`, the one bit-packing
//! abstraction shared by the encoder and both decoder phases.
//!
//! # Bit Ordering
//!
//! Codes are packed LSB-first: the least significant bit of a code lands in
//! the lowest unused bit of the current byte, and a fresh byte is started
//! whenever eight bits have been filled. A packed run of codes therefore
//! occupies exactly `ceil(total_bits / 8)` bytes, with the unused high bits
//! of the last byte left at zero.
//!
//! # Example
//!
//! ```
//! use textpack_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b1100, 4).unwrap();
//! let packed = writer.into_vec();
//! assert_eq!(packed, vec![0b0110_0101]);
//!
//! let mut reader = BitReader::new(&packed);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! assert_eq!(reader.bytes_consumed(), 1);
//! ```

use crate::error::{CoreError, Result};

/// Widest code either side will ever move in one call.
pub const MAX_CODE_BITS: u8 = 16;

#[inline]
fn check_width(count: u8) -> Result<()> {
    if count == 0 || count > MAX_CODE_BITS {
        return Err(CoreError::InvalidBitWidth(count));
    }
    Ok(())
}

/// An LSB-first bit reader over a borrowed byte slice.
///
/// The reader never looks past the end of the slice; asking for bits that
/// are not there yields [`CoreError::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Index of the byte holding the next unread bit.
    byte_pos: usize,
    /// Bit offset (0-7) inside `data[byte_pos]`.
    bit_pos: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` starting at the first bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
            total_bits_read: 0,
        }
    }

    /// Get the total number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bytes touched so far, counting a partially read byte.
    ///
    /// This is the length of the packed run that produced the bits read,
    /// so callers use it to step to the next byte-aligned record.
    pub fn bytes_consumed(&self) -> usize {
        self.byte_pos + usize::from(self.bit_pos != 0)
    }

    /// Read `count` bits (1-16), first bit read in the LSB position.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        check_width(count)?;

        let available = (self.data.len() - self.byte_pos.min(self.data.len())) as u64 * 8
            - u64::from(self.bit_pos);
        if available < u64::from(count) {
            return Err(CoreError::unexpected_eof(self.total_bits_read));
        }

        let mut value = 0u32;
        let mut filled = 0u8;
        while filled < count {
            let byte = u32::from(self.data[self.byte_pos]) >> self.bit_pos;
            let take = (8 - self.bit_pos).min(count - filled);
            let mask = (1u32 << take) - 1;
            value |= (byte & mask) << filled;

            filled += take;
            self.bit_pos += take;
            if self.bit_pos == 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
        }

        self.total_bits_read += u64::from(count);
        Ok(value)
    }
}

/// An LSB-first bit writer that accumulates into an owned buffer.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// Output buffer; the last byte may be partially filled.
    output: Vec<u8>,
    /// Number of bits already used in the last byte (0 means start a new one).
    bit_pos: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new, empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Write the low `count` bits (1-16) of `value`, LSB first.
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        check_width(count)?;

        let mut value = value & ((1u32 << count) - 1);
        let mut remaining = count;
        while remaining > 0 {
            if self.bit_pos == 0 {
                self.output.push(0);
            }
            let take = (8 - self.bit_pos).min(remaining);
            let chunk = (value & ((1u32 << take) - 1)) as u8;
            if let Some(last) = self.output.last_mut() {
                *last |= chunk << self.bit_pos;
            }

            value >>= take;
            remaining -= take;
            self.bit_pos = (self.bit_pos + take) % 8;
        }

        self.total_bits_written += u64::from(count);
        Ok(())
    }

    /// Number of bytes produced so far, including a partial last byte.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    /// Check whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Finish writing and return the packed bytes.
    ///
    /// Unused high bits of the final byte are zero.
    pub fn into_vec(self) -> Vec<u8> {
        self.output
    }
}
