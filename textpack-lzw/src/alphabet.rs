//! The fixed character set strings are packed over.
//!
//! Each supported character's position in the alphabet is its base code;
//! those codes double as the first entries of the shared dictionary. One
//! extra padding symbol completes a 64-symbol set for identifier tokens.

use crate::error::{PackError, Result};

/// Number of symbols an identifier character must be able to express (6 bits).
pub const IDENTIFIER_RADIX: usize = 64;

/// An ordered set of printable ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    symbols: &'static str,
    padding: char,
}

impl Alphabet {
    /// The Pico-8 "pscii" set: every character the target's font renders,
    /// lowercase only. Identifier tokens pad it with `@`.
    pub const PSCII: Self = Self {
        symbols: " !\"#%'()*+,-./0123456789:;<=>?abcdefghijklmnopqrstuvwxyz[]^_{~}",
        padding: '@',
    };

    /// Create an alphabet from its symbols and an identifier padding symbol.
    ///
    /// Call [`Alphabet::validate`] before packing with a custom set.
    pub const fn new(symbols: &'static str, padding: char) -> Self {
        Self { symbols, padding }
    }

    /// Check that the set is ASCII, duplicate-free, and that symbols plus
    /// padding make exactly one 6-bit identifier digit.
    pub fn validate(&self) -> Result<()> {
        if !self.symbols.is_ascii() || !self.padding.is_ascii() {
            return Err(PackError::InvalidConfig(
                "alphabet must be ASCII".to_string(),
            ));
        }
        if self.symbols.len() + 1 != IDENTIFIER_RADIX {
            return Err(PackError::InvalidConfig(format!(
                "alphabet has {} symbols, identifiers need {}",
                self.symbols.len(),
                IDENTIFIER_RADIX - 1
            )));
        }
        let bytes = self.symbols.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if bytes[i + 1..].contains(&b) || b == self.padding as u8 {
                return Err(PackError::InvalidConfig(format!(
                    "duplicate alphabet symbol {:?}",
                    b as char
                )));
            }
            if b.is_ascii_uppercase() {
                return Err(PackError::InvalidConfig(format!(
                    "alphabet symbol {:?} is not lowercase",
                    b as char
                )));
            }
        }
        Ok(())
    }

    /// Number of symbols (and therefore base dictionary entries).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check whether the alphabet is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The symbols as a string, in code order.
    pub fn symbols(&self) -> &'static str {
        self.symbols
    }

    /// The identifier padding symbol.
    pub fn padding(&self) -> char {
        self.padding
    }

    /// Code for a single character, lowercasing ASCII letters first.
    pub fn code_of(&self, ch: char) -> Option<u8> {
        let ch = ch.to_ascii_lowercase();
        if !ch.is_ascii() {
            return None;
        }
        self.symbols
            .bytes()
            .position(|b| b == ch as u8)
            .map(|p| p as u8)
    }

    /// Character for a base code.
    pub fn char_of(&self, code: u8) -> Option<char> {
        self.symbols.as_bytes().get(code as usize).map(|&b| b as char)
    }

    /// Encode a string to base codes.
    ///
    /// Fails on the first character outside the set, reporting its
    /// character index.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        s.chars()
            .enumerate()
            .map(|(position, ch)| {
                self.code_of(ch)
                    .ok_or(PackError::CharOutOfRange { ch, position })
            })
            .collect()
    }

    /// Decode base codes back to text.
    pub fn decode(&self, codes: &[u8]) -> Option<String> {
        codes.iter().map(|&c| self.char_of(c)).collect()
    }

    /// Identifier digit for a 6-bit value: symbols first, then padding.
    pub fn identifier_symbol(&self, value: u8) -> char {
        self.char_of(value).unwrap_or(self.padding)
    }

    /// 6-bit value of an identifier digit.
    pub fn identifier_value(&self, ch: char) -> Option<u8> {
        if ch == self.padding {
            return Some(self.symbols.len() as u8);
        }
        if !ch.is_ascii() {
            return None;
        }
        self.symbols
            .bytes()
            .position(|b| b == ch as u8)
            .map(|p| p as u8)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::PSCII
    }
}

/// Lowercase `raw` and collapse every whitespace run (newlines included)
/// to a single space.
///
/// Two inputs that normalize identically share one identifier.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
