//! Shared dictionary (code table) and the code-width growth rule.
//!
//! The encoder, the bootstrap replay and random-access decoding all drive
//! the same [`CodeGrowth`] state machine, so every side agrees on when an
//! entry index is allocated and when the code width increases:
//!
//! 1. Every code of a record except the last one allocates the next entry
//!    index, unless the table already holds `max_entries` entries.
//! 2. The code is written (or read) at the current width.
//! 3. If the allocated index equals `2^width - 1`, the width grows by one.
//!
//! The last code of a record never allocates: the encoder only adds an
//! entry when a match fails to extend, which needs a following character.

use crate::config::PackConfig;
use std::collections::HashMap;

/// Entry allocation and code-width state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeGrowth {
    /// Index the next allocated entry receives (= current table length).
    next_index: u16,
    /// Current code width in bits.
    width: u8,
    /// Allocation stops once `next_index` reaches this.
    max_entries: u16,
}

impl CodeGrowth {
    /// Growth state for a fresh table holding only the base alphabet.
    pub fn new(config: &PackConfig) -> Self {
        Self::resume(
            config.alphabet.len() as u16,
            config.initial_width,
            config.max_entries,
        )
    }

    /// Growth state as it stood when a record began.
    ///
    /// Random-access decoding uses the record header's table snapshot and
    /// start width here.
    pub fn resume(next_index: u16, width: u8, max_entries: u16) -> Self {
        Self {
            next_index,
            width,
            max_entries,
        }
    }

    /// Allocate the next entry index, or `None` once the table is full.
    pub fn reserve(&mut self) -> Option<u16> {
        if self.is_full() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(index)
    }

    /// Apply the width rule after the code that accompanied `reserved` has
    /// been written or read.
    pub fn commit(&mut self, reserved: Option<u16>) {
        if let Some(index) = reserved
            && u32::from(index) == (1u32 << self.width) - 1
        {
            self.width += 1;
            tracing::trace!(index, width = self.width, "code width grew");
        }
    }

    /// Current code width in bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Index the next allocation will receive.
    pub fn next_index(&self) -> u16 {
        self.next_index
    }

    /// Check whether allocation has stopped.
    pub fn is_full(&self) -> bool {
        self.next_index >= self.max_entries
    }
}

/// Append-only table of code sequences, global across a corpus.
///
/// Sequences are stored as alphabet codes; entry `i < alphabet.len()` is the
/// single code `[i]`. Multi-code entries are appended in strict insertion
/// order and never removed.
#[derive(Debug, Clone)]
pub struct SharedDictionary {
    /// Code table: code -> sequence.
    table: Vec<Vec<u8>>,
    /// Reverse lookup: sequence -> code.
    reverse: HashMap<Vec<u8>, u16>,
    /// Allocation and width state.
    growth: CodeGrowth,
}

impl SharedDictionary {
    /// Create a dictionary seeded with the configured alphabet.
    pub fn new(config: &PackConfig) -> Self {
        let base = config.alphabet.len();
        let mut table = Vec::with_capacity(usize::from(config.max_entries));
        let mut reverse = HashMap::with_capacity(usize::from(config.max_entries));
        for code in 0..base {
            let seq = vec![code as u8];
            table.push(seq.clone());
            reverse.insert(seq, code as u16);
        }

        Self {
            table,
            reverse,
            growth: CodeGrowth::new(config),
        }
    }

    /// Find the code for a sequence.
    pub fn find_code(&self, seq: &[u8]) -> Option<u16> {
        self.reverse.get(seq).copied()
    }

    /// Append `seq` under the next index, unless the table is full.
    ///
    /// The caller must pass the returned index to [`SharedDictionary::commit`]
    /// once the accompanying code has been written.
    pub fn insert(&mut self, seq: Vec<u8>) -> Option<u16> {
        let code = self.growth.reserve()?;
        self.table.push(seq.clone());
        self.reverse.insert(seq, code);
        Some(code)
    }

    /// Apply the width rule for the entry returned by the last `insert`.
    pub fn commit(&mut self, inserted: Option<u16>) {
        self.growth.commit(inserted);
    }

    /// Get the sequence for a code.
    pub fn get(&self, code: u16) -> Option<&[u8]> {
        self.table.get(usize::from(code)).map(Vec::as_slice)
    }

    /// Iterate over all sequences in code order.
    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        self.table.iter().map(Vec::as_slice)
    }

    /// Number of entries, base alphabet included.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always false: the base alphabet is never empty once validated.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current code width in bits.
    pub fn width(&self) -> u8 {
        self.growth.width()
    }

    /// Check whether the dictionary has stopped growing.
    pub fn is_full(&self) -> bool {
        self.growth.is_full()
    }
}
