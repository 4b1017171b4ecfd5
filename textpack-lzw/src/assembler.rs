//! Record layout and corpus assembly.
//!
//! ```text
//! offset 0..1   string_count     u16 LE
//! offset 2..    string_count records:
//!                 code_count     u16 LE
//!                 table_snapshot u16 LE
//!                 start_width    u8
//!                 packed codes   LSB-first, ceil(bits / 8) bytes
//! ```

use crate::error::{PackError, Result};

/// Size of the corpus-wide string count prefix.
pub const COUNT_PREFIX_LEN: usize = 2;

/// Size of a record header.
pub const RECORD_HEADER_LEN: usize = 5;

/// Per-string header written ahead of the packed codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Number of codes in the record.
    pub code_count: u16,
    /// Dictionary length when encoding of the string began.
    pub table_snapshot: u16,
    /// Code width when encoding of the string began.
    pub start_width: u8,
}

impl RecordHeader {
    /// Serialize to the on-disk layout.
    pub fn to_bytes(&self) -> [u8; RECORD_HEADER_LEN] {
        let [c0, c1] = self.code_count.to_le_bytes();
        let [t0, t1] = self.table_snapshot.to_le_bytes();
        [c0, c1, t0, t1, self.start_width]
    }

    /// Parse the header at `offset`, which is relative to the start of the
    /// serialized data and only used for error reporting.
    pub fn parse(bytes: &[u8], offset: usize) -> Result<Self> {
        match bytes {
            [c0, c1, t0, t1, width, ..] => Ok(Self {
                code_count: u16::from_le_bytes([*c0, *c1]),
                table_snapshot: u16::from_le_bytes([*t0, *t1]),
                start_width: *width,
            }),
            _ => Err(PackError::corrupt(offset, "truncated record header")),
        }
    }
}

/// Read the string count prefix of a serialized corpus.
pub fn read_count(data: &[u8]) -> Result<u16> {
    match data {
        [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(PackError::corrupt(0, "missing string count")),
    }
}

/// Accumulates records in assignment order.
#[derive(Debug, Default, Clone)]
pub struct Assembler {
    /// Concatenated records, without the count prefix.
    records: Vec<u8>,
    /// Number of records pushed.
    count: u16,
}

impl Assembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next record will have within the serialized data.
    pub fn next_offset(&self) -> usize {
        COUNT_PREFIX_LEN + self.records.len()
    }

    /// Append one record and return its offset within the serialized data.
    pub fn push(&mut self, header: RecordHeader, packed: &[u8]) -> Result<usize> {
        let count = self.count.checked_add(1).ok_or(PackError::TooManyStrings)?;
        let offset = self.next_offset();
        self.records.extend_from_slice(&header.to_bytes());
        self.records.extend_from_slice(packed);
        self.count = count;
        Ok(offset)
    }

    /// Number of records.
    pub fn count(&self) -> u16 {
        self.count
    }

    /// Serialized size: count prefix plus every record.
    pub fn serialized_len(&self) -> usize {
        COUNT_PREFIX_LEN + self.records.len()
    }

    /// Serialize the corpus, failing if it exceeds `window` bytes.
    ///
    /// `start` and `end` only describe the window in the error. Nothing is
    /// returned on failure.
    pub fn finalize(&self, start: u32, end: u32) -> Result<Vec<u8>> {
        let window = end.saturating_sub(start) as usize;
        let size = self.serialized_len();
        if size > window {
            return Err(PackError::TooMuchData {
                size,
                window,
                start,
                end,
            });
        }

        let mut data = Vec::with_capacity(size);
        data.extend_from_slice(&self.count.to_le_bytes());
        data.extend_from_slice(&self.records);
        Ok(data)
    }
}
