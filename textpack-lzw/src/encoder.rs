//! Adaptive shared-dictionary encoder.

use crate::alphabet::normalize;
use crate::assembler::{Assembler, RecordHeader};
use crate::config::PackConfig;
use crate::dictionary::SharedDictionary;
use crate::error::{PackError, Result};
use crate::identifier::encode_offset;
use std::collections::HashMap;
use std::sync::Arc;
use textpack_core::BitWriter;

/// Summary of a packed corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackStats {
    /// Distinct normalized strings.
    pub string_count: usize,
    /// Total characters across those strings.
    pub total_string_size: usize,
    /// Dictionary entries, base alphabet included.
    pub table_entries: usize,
    /// Total characters across all dictionary entries.
    pub table_size: usize,
    /// Serialized size in bytes, count prefix included.
    pub compressed_size: usize,
}

/// Packs strings into one corpus sharing a single growing dictionary.
///
/// The dictionary, code width and record list are global to the packer and
/// never reset between strings. Each distinct normalized string becomes one
/// record and receives a 3-character identifier naming its address.
#[derive(Debug, Clone)]
pub struct TextPacker {
    /// Packing parameters.
    config: PackConfig,
    /// Shared code table.
    dict: SharedDictionary,
    /// Serialized records.
    assembler: Assembler,
    /// `(normalized string, identifier token)` in assignment order.
    assigned: Vec<(Arc<str>, String)>,
    /// Normalized string -> position in `assigned`; shares its key.
    index: HashMap<Arc<str>, usize>,
}

impl TextPacker {
    /// Create a packer with the given configuration.
    pub fn new(config: PackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dict: SharedDictionary::new(&config),
            assembler: Assembler::new(),
            assigned: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Return the identifier for `raw`, packing it if it is new.
    ///
    /// `raw` is normalized first (lowercased, whitespace runs collapsed to
    /// one space), so inputs differing only in case or spacing share an
    /// identifier. Repeated strings return the cached identifier without
    /// touching the dictionary or the record list.
    ///
    /// On error nothing is changed.
    pub fn assign_identifier(&mut self, raw: &str) -> Result<String> {
        let normalized = normalize(raw);
        if let Some(&i) = self.index.get(normalized.as_str()) {
            return Ok(self.assigned[i].1.clone());
        }

        let codes = self.config.alphabet.encode(&normalized)?;
        if codes.len() > usize::from(u16::MAX) {
            return Err(PackError::StringTooLong { len: codes.len() });
        }
        if self.assembler.count() == u16::MAX {
            return Err(PackError::TooManyStrings);
        }
        let address = self.config.start_addr + self.assembler.next_offset() as u32;
        let address = u16::try_from(address).map_err(|_| PackError::AddressOverflow { address })?;

        let header = RecordHeader {
            code_count: 0,
            table_snapshot: self.dict.len() as u16,
            start_width: self.dict.width(),
        };
        let (packed, code_count) = self.encode_codes(&codes)?;
        let header = RecordHeader {
            code_count,
            ..header
        };
        self.assembler.push(header, &packed)?;

        let token = encode_offset(&self.config.alphabet, address);
        tracing::debug!(
            token = %token,
            chars = codes.len(),
            codes = code_count,
            bytes = packed.len(),
            table = self.dict.len(),
            width = self.dict.width(),
            "packed string"
        );
        let key: Arc<str> = normalized.into();
        self.index.insert(Arc::clone(&key), self.assigned.len());
        self.assigned.push((key, token.clone()));
        Ok(token)
    }

    /// Greedy longest-match encoding of one string against the shared
    /// dictionary, growing it as matches fail to extend.
    ///
    /// Returns the packed codes and how many there are.
    fn encode_codes(&mut self, input: &[u8]) -> Result<(Vec<u8>, u16)> {
        let mut writer = BitWriter::new();
        let mut code_count = 0u16;
        let mut start = 0;

        while start < input.len() {
            // Base entries share their alphabet code.
            let mut code = u16::from(input[start]);
            let mut end = start + 1;
            let mut inserted = None;

            while end < input.len() {
                match self.dict.find_code(&input[start..=end]) {
                    Some(longer) => {
                        code = longer;
                        end += 1;
                    }
                    None => {
                        inserted = self.dict.insert(input[start..=end].to_vec());
                        break;
                    }
                }
            }

            writer.write_bits(u32::from(code), self.dict.width())?;
            self.dict.commit(inserted);

            code_count += 1;
            start = end;
        }

        Ok((writer.into_vec(), code_count))
    }

    /// Serialize the corpus, failing if it does not fit the address window.
    ///
    /// Calling this repeatedly without new strings yields identical bytes.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        let stats = self.stats();
        tracing::debug!(
            string_count = stats.string_count,
            total_string_size = stats.total_string_size,
            table_entries = stats.table_entries,
            compressed_size = stats.compressed_size,
            table_size = stats.table_size,
            "corpus statistics"
        );
        self.assembler
            .finalize(self.config.start_addr, self.config.end_addr)
    }

    /// Statistics for the corpus packed so far.
    pub fn stats(&self) -> PackStats {
        PackStats {
            string_count: self.assigned.len(),
            total_string_size: self.assigned.iter().map(|(s, _)| s.chars().count()).sum(),
            table_entries: self.dict.len(),
            table_size: self.dict.entries().map(<[u8]>::len).sum(),
            compressed_size: self.assembler.serialized_len(),
        }
    }

    /// Identifier previously assigned to `raw`, if any.
    pub fn identifier(&self, raw: &str) -> Option<&str> {
        self.index
            .get(normalize(raw).as_str())
            .map(|&i| self.assigned[i].1.as_str())
    }

    /// `(normalized string, identifier)` pairs in assignment order.
    pub fn identifiers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assigned
            .iter()
            .map(|(s, id)| (s.as_ref(), id.as_str()))
    }

    /// The shared dictionary.
    pub fn dictionary(&self) -> &SharedDictionary {
        &self.dict
    }

    /// The packing configuration.
    pub fn config(&self) -> &PackConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::read_count;

    fn seq(packer: &TextPacker, s: &str) -> Vec<u8> {
        packer.config().alphabet.encode(s).unwrap()
    }

    #[test]
    fn test_first_string_codes() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        let id = packer.assign_identifier("the cat sat").unwrap();
        assert_eq!(id, encode_offset(&packer.config().alphabet, 2));

        // 10 codes: t h e ' ' c a t ' ' s "at", 9 insertions.
        let data = packer.as_bytes().unwrap();
        assert_eq!(read_count(&data).unwrap(), 1);
        let header = RecordHeader::parse(&data[2..], 2).unwrap();
        assert_eq!(header.code_count, 10);
        assert_eq!(header.table_snapshot, 63);
        assert_eq!(header.start_width, 7);
        // 10 codes * 7 bits = 70 bits = 9 bytes
        assert_eq!(data.len(), 2 + 5 + 9);

        let dict = packer.dictionary();
        assert_eq!(dict.len(), 72);
        assert_eq!(dict.find_code(&seq(&packer, "th")), Some(63));
        assert_eq!(dict.find_code(&seq(&packer, "at")), Some(68));
        assert_eq!(dict.find_code(&seq(&packer, "sa")), Some(71));
    }

    #[test]
    fn test_second_string_reuses_entries() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        let first = packer.assign_identifier("the cat sat").unwrap();
        let second = packer.assign_identifier("the dog sat").unwrap();
        assert_ne!(first, second);

        // "th" "e " "d" "o" "g" " s" "at": 7 codes for 11 characters.
        let data = packer.as_bytes().unwrap();
        let header = RecordHeader::parse(&data[16..], 16).unwrap();
        assert_eq!(header.code_count, 7);
        assert_eq!(header.table_snapshot, 72);

        let dict = packer.dictionary();
        assert!(dict.find_code(&seq(&packer, "the")).is_some());
        assert!(dict.find_code(&seq(&packer, " sa")).is_some());
        assert_eq!(dict.len(), 78);
    }

    #[test]
    fn test_idempotent_assignment() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        let id = packer.assign_identifier("Hello  World").unwrap();
        let before = (packer.dictionary().len(), packer.as_bytes().unwrap());

        assert_eq!(packer.assign_identifier("hello\nworld").unwrap(), id);
        assert_eq!(packer.assign_identifier("HELLO WORLD").unwrap(), id);
        assert_eq!((packer.dictionary().len(), packer.as_bytes().unwrap()), before);
        assert_eq!(packer.identifier("hello world"), Some(id.as_str()));
    }

    #[test]
    fn test_char_out_of_range_leaves_state() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        packer.assign_identifier("ok").unwrap();
        let before = packer.as_bytes().unwrap();

        let err = packer.assign_identifier("price: $5").unwrap_err();
        assert_eq!(
            err,
            PackError::CharOutOfRange {
                ch: '$',
                position: 7
            }
        );
        assert_eq!(packer.as_bytes().unwrap(), before);
        assert_eq!(packer.stats().string_count, 1);
    }

    #[test]
    fn test_identifier_addresses_follow_records() {
        let config = PackConfig::PICO8.with_window(0x1000, 0x4300);
        let mut packer = TextPacker::new(config).unwrap();
        let alphabet = config.alphabet;

        let a = packer.assign_identifier("a").unwrap();
        // "a": header 5 + one 7-bit code = 6 bytes
        let b = packer.assign_identifier("b").unwrap();
        assert_eq!(a, encode_offset(&alphabet, 0x1002));
        assert_eq!(b, encode_offset(&alphabet, 0x1008));
    }

    #[test]
    fn test_empty_string_record() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        packer.assign_identifier("").unwrap();
        let data = packer.as_bytes().unwrap();
        assert_eq!(data, vec![1, 0, 0, 0, 63, 0, 7]);
    }

    #[test]
    fn test_window_enforced() {
        let config = PackConfig::PICO8.with_window(0, 10);
        let mut packer = TextPacker::new(config).unwrap();
        packer.assign_identifier("a fairly long sentence").unwrap();
        assert!(matches!(
            packer.as_bytes(),
            Err(PackError::TooMuchData { window: 10, .. })
        ));
        // Identifiers stay valid for a retry with a bigger window.
        assert!(packer.identifier("a fairly long sentence").is_some());
    }

    #[test]
    fn test_address_overflow() {
        let config = PackConfig::PICO8.with_window(0xFFF0, 0x10000);
        let mut packer = TextPacker::new(config).unwrap();
        packer.assign_identifier("first string").unwrap();
        let err = packer.assign_identifier("second string").unwrap_err();
        assert!(matches!(err, PackError::AddressOverflow { .. }));
        assert_eq!(packer.stats().string_count, 1);
    }

    #[test]
    fn test_stats() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        packer.assign_identifier("the cat sat").unwrap();
        packer.assign_identifier("the dog sat").unwrap();
        let stats = packer.stats();
        assert_eq!(stats.string_count, 2);
        assert_eq!(stats.total_string_size, 22);
        assert_eq!(stats.table_entries, 78);
        assert_eq!(stats.compressed_size, packer.as_bytes().unwrap().len());

        let order: Vec<_> = packer.identifiers().map(|(s, _)| s).collect();
        assert_eq!(order, vec!["the cat sat", "the dog sat"]);
    }

    #[test]
    fn test_normalized_string_stored_once() {
        let mut packer = TextPacker::new(PackConfig::PICO8).unwrap();
        packer.assign_identifier("The cat sat").unwrap();
        packer.assign_identifier("the  DOG sat").unwrap();
        packer.assign_identifier("the cat  sat").unwrap();
        assert_eq!(packer.assigned.len(), 2);
        assert_eq!(packer.index.len(), 2);

        for (i, (text, token)) in packer.assigned.iter().enumerate() {
            let (key, &slot) = packer.index.get_key_value(text.as_ref()).unwrap();
            assert_eq!(slot, i);
            assert!(Arc::ptr_eq(key, text));
            assert_eq!(packer.identifier(text), Some(token.as_str()));
        }
    }
}
