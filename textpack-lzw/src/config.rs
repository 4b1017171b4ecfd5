//! Packing configuration shared by encoder and decoder.
//!
//! Every field here is also a generated parameter of the companion decoder;
//! both sides must be given identical values.

use crate::alphabet::Alphabet;
use crate::error::{PackError, Result};

/// Largest `max_entries` accepted; keeps every code within 16 bits.
pub const MAX_TABLE_LIMIT: u16 = 1 << 15;

/// One past the highest address an identifier can name.
pub const ADDRESS_SPACE: u32 = 1 << 16;

/// Packing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackConfig {
    /// Character set; its symbols are the base dictionary entries.
    pub alphabet: Alphabet,
    /// Address the serialized data is loaded at.
    pub start_addr: u32,
    /// One past the last usable address.
    pub end_addr: u32,
    /// Code width in bits before any dictionary growth.
    pub initial_width: u8,
    /// Upper bound on dictionary entries, base entries included.
    pub max_entries: u16,
}

impl PackConfig {
    /// Pico-8 cart layout: data from the start of the graphics region up to
    /// the song/sfx region (`0x0000..0x4300`), 7-bit initial codes, 4096
    /// entries.
    pub const PICO8: Self = Self {
        alphabet: Alphabet::PSCII,
        start_addr: 0,
        end_addr: 0x4300,
        initial_width: 7,
        max_entries: 4096,
    };

    /// Return a copy using the address window `[start, end)`.
    pub fn with_window(self, start: u32, end: u32) -> Self {
        Self {
            start_addr: start,
            end_addr: end,
            ..self
        }
    }

    /// Size of the address window in bytes.
    pub fn window(&self) -> usize {
        self.end_addr.saturating_sub(self.start_addr) as usize
    }

    /// Check the parameters describe a usable encoder/decoder pair.
    pub fn validate(&self) -> Result<()> {
        self.alphabet.validate()?;

        if self.start_addr >= self.end_addr {
            return Err(PackError::InvalidConfig(format!(
                "empty address window {:#x}..{:#x}",
                self.start_addr, self.end_addr
            )));
        }
        if self.end_addr > ADDRESS_SPACE {
            return Err(PackError::InvalidConfig(format!(
                "end address {:#x} is beyond the 16-bit address space",
                self.end_addr
            )));
        }
        if self.initial_width == 0
            || self.initial_width > 16
            || self.alphabet.len() >= 1usize << self.initial_width
        {
            return Err(PackError::InvalidConfig(format!(
                "initial width {} cannot hold {} base codes",
                self.initial_width,
                self.alphabet.len()
            )));
        }
        if usize::from(self.max_entries) <= self.alphabet.len() || self.max_entries > MAX_TABLE_LIMIT {
            return Err(PackError::InvalidConfig(format!(
                "max entries {} must be in {}..={}",
                self.max_entries,
                self.alphabet.len() + 1,
                MAX_TABLE_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self::PICO8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pico8_config() {
        let config = PackConfig::PICO8;
        config.validate().unwrap();
        assert_eq!(config.initial_width, 7);
        assert_eq!(config.max_entries, 4096);
        assert_eq!(config.window(), 0x4300);
    }

    #[test]
    fn test_with_window() {
        let config = PackConfig::PICO8.with_window(0x1000, 0x3100);
        assert_eq!(config.start_addr, 0x1000);
        assert_eq!(config.window(), 0x2100);
        config.validate().unwrap();
    }

    #[test]
    fn test_invalid_configs() {
        let base = PackConfig::PICO8;
        assert!(base.with_window(10, 10).validate().is_err());
        assert!(base.with_window(0, 0x10001).validate().is_err());
        assert!(PackConfig { initial_width: 6, ..base }.validate().is_ok());
        assert!(PackConfig { initial_width: 5, ..base }.validate().is_err());
        assert!(PackConfig { max_entries: 63, ..base }.validate().is_err());
        assert!(PackConfig { max_entries: 40000, ..base }.validate().is_err());
    }
}
