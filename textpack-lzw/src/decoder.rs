//! Two-phase decoding of a packed corpus.
//!
//! A record can only be decoded once the dictionary it was encoded against
//! exists, and that dictionary is never stored: it is rebuilt by replaying
//! every record in order ([`bootstrap`]). The resulting [`DecodeTable`] is
//! frozen and serves any number of random-access lookups
//! ([`DecodeTable::decode`]). [`Decoder`] memoizes the bootstrap so it runs
//! exactly once per corpus, however many threads ask first.

use crate::assembler::{COUNT_PREFIX_LEN, RECORD_HEADER_LEN, RecordHeader, read_count};
use crate::config::PackConfig;
use crate::dictionary::CodeGrowth;
use crate::error::{PackError, Result};
use crate::identifier::decode_tokens;
use std::sync::{Arc, Mutex, PoisonError};
use textpack_core::BitReader;

/// The complete dictionary of a corpus, rebuilt by [`bootstrap`].
#[derive(Debug, Clone)]
pub struct DecodeTable {
    /// Parameters the corpus was packed with.
    config: PackConfig,
    /// Code table: code -> alphabet codes.
    entries: Vec<Vec<u8>>,
}

/// Rebuild the dictionary by replaying every record of `data` in order.
///
/// Each record header must agree with the replayed table length and code
/// width; a mismatch means the data was not produced with `config` and is
/// reported as [`PackError::CorruptRecord`].
pub fn bootstrap(data: &[u8], config: &PackConfig) -> Result<DecodeTable> {
    config.validate()?;

    let count = read_count(data)?;
    let mut entries: Vec<Vec<u8>> = (0..config.alphabet.len()).map(|c| vec![c as u8]).collect();
    let mut growth = CodeGrowth::new(config);
    let mut pos = COUNT_PREFIX_LEN;

    for _ in 0..count {
        let header = RecordHeader::parse(data.get(pos..).unwrap_or_default(), pos)?;
        if usize::from(header.table_snapshot) != entries.len() {
            return Err(PackError::corrupt(
                pos,
                format!(
                    "table snapshot {} but replay has {} entries",
                    header.table_snapshot,
                    entries.len()
                ),
            ));
        }
        if header.start_width != growth.width() {
            return Err(PackError::corrupt(
                pos,
                format!(
                    "start width {} but replay is at {}",
                    header.start_width,
                    growth.width()
                ),
            ));
        }

        let mut reader = BitReader::new(&data[pos + RECORD_HEADER_LEN..]);
        let mut prev: Option<Vec<u8>> = None;
        let mut pending: Option<u16> = None;

        for k in 0..header.code_count {
            let code = reader.read_bits(growth.width())? as u16;

            let current = match (&prev, pending) {
                // The code names the entry this very step completes.
                (Some(p), Some(index)) if code == index => {
                    let mut seq = p.clone();
                    seq.push(p[0]);
                    seq
                }
                _ => entries
                    .get(usize::from(code))
                    .cloned()
                    .ok_or(PackError::InvalidCode {
                        code,
                        table_len: entries.len(),
                    })?,
            };

            if let (Some(mut seq), Some(index)) = (prev.take(), pending.take()) {
                debug_assert_eq!(usize::from(index), entries.len());
                seq.push(current[0]);
                entries.push(seq);
            }

            pending = if k + 1 < header.code_count {
                growth.reserve()
            } else {
                None
            };
            growth.commit(pending);
            prev = Some(current);
        }

        pos += RECORD_HEADER_LEN + reader.bytes_consumed();
    }

    tracing::debug!(
        records = count,
        entries = entries.len(),
        width = growth.width(),
        bytes = pos,
        "dictionary bootstrapped"
    );

    Ok(DecodeTable {
        config: *config,
        entries,
    })
}

impl DecodeTable {
    /// Decode every identifier in `tokens` (concatenated 3-character
    /// tokens) and concatenate the strings.
    pub fn decode(&self, data: &[u8], tokens: &str) -> Result<String> {
        let mut text = String::new();
        for address in decode_tokens(&self.config.alphabet, tokens)? {
            text.push_str(&self.decode_address(data, address)?);
        }
        Ok(text)
    }

    /// Decode the single record at absolute `address`.
    ///
    /// The table is not modified; width growth within the record is replayed
    /// from the header's table snapshot and start width.
    pub fn decode_address(&self, data: &[u8], address: u16) -> Result<String> {
        let out_of_range = PackError::OffsetOutOfRange {
            address: u32::from(address),
        };
        let offset = u32::from(address)
            .checked_sub(self.config.start_addr)
            .ok_or_else(|| out_of_range.clone())? as usize;
        if offset < COUNT_PREFIX_LEN || offset >= data.len() {
            return Err(out_of_range);
        }

        let header = RecordHeader::parse(&data[offset..], offset)?;
        if usize::from(header.table_snapshot) > self.entries.len() {
            return Err(PackError::corrupt(
                offset,
                format!(
                    "table snapshot {} beyond the {} bootstrapped entries",
                    header.table_snapshot,
                    self.entries.len()
                ),
            ));
        }

        let mut growth = CodeGrowth::resume(
            header.table_snapshot,
            header.start_width,
            self.config.max_entries,
        );
        let mut reader = BitReader::new(&data[offset + RECORD_HEADER_LEN..]);
        let mut codes = Vec::new();

        for k in 0..header.code_count {
            let code = reader.read_bits(growth.width())? as u16;
            let seq = self.get(code).ok_or(PackError::InvalidCode {
                code,
                table_len: self.entries.len(),
            })?;
            codes.extend_from_slice(seq);

            let reserved = if k + 1 < header.code_count {
                growth.reserve()
            } else {
                None
            };
            growth.commit(reserved);
        }

        self.config
            .alphabet
            .decode(&codes)
            .ok_or_else(|| PackError::corrupt(offset, "decoded symbol outside the alphabet"))
    }

    /// Get the sequence for a code.
    pub fn get(&self, code: u16) -> Option<&[u8]> {
        self.entries.get(usize::from(code)).map(Vec::as_slice)
    }

    /// Number of entries, base alphabet included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a bootstrapped table.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A corpus plus a lazily bootstrapped table.
///
/// The first lookup replays the corpus under a lock; later lookups share the
/// frozen table and may run concurrently.
#[derive(Debug)]
pub struct Decoder {
    /// Packing parameters.
    config: PackConfig,
    /// Serialized corpus.
    data: Vec<u8>,
    /// Bootstrapped table, once built.
    table: Mutex<Option<Arc<DecodeTable>>>,
}

impl Decoder {
    /// Wrap a serialized corpus. Nothing is decoded yet.
    pub fn new(data: Vec<u8>, config: PackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            data,
            table: Mutex::new(None),
        })
    }

    /// The bootstrapped table, building it on first use.
    ///
    /// A failed bootstrap is not cached; the next call retries.
    pub fn table(&self) -> Result<Arc<DecodeTable>> {
        let mut guard = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = guard.as_ref() {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(bootstrap(&self.data, &self.config)?);
        *guard = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Check whether the table has been built.
    pub fn is_bootstrapped(&self) -> bool {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Decode and concatenate the strings named by `tokens`.
    pub fn decode(&self, tokens: &str) -> Result<String> {
        self.table()?.decode(&self.data, tokens)
    }

    /// The serialized corpus.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
