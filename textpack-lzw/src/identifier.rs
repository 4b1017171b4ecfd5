//! String identifiers: record addresses rendered as 3-character tokens.
//!
//! An identifier is the absolute address of a record (`start_addr + 2 +`
//! bytes of all earlier records). It is written as three 6-bit digits from
//! the alphabet-plus-padding set, least significant digit first, so it can
//! travel through host code as an ordinary string literal. Concatenating
//! tokens concatenates the strings they name when decoded together.

use crate::alphabet::Alphabet;
use crate::error::{PackError, Result};

/// Characters per identifier token.
pub const TOKEN_LEN: usize = 3;

/// Value a permissive decode substitutes for an unknown character.
pub const SENTINEL_DIGIT: u8 = 63;

/// Render a 16-bit address as a token.
pub fn encode_offset(alphabet: &Alphabet, address: u16) -> String {
    (0..TOKEN_LEN)
        .map(|i| alphabet.identifier_symbol(((address >> (6 * i)) & 0x3F) as u8))
        .collect()
}

/// Decode a single token, substituting [`SENTINEL_DIGIT`] for characters
/// outside the identifier set.
///
/// This mirrors the companion Lua decoder, which never fails on lookup.
/// Missing trailing characters count as sentinels too.
pub fn decode_token(alphabet: &Alphabet, token: &str) -> u16 {
    let mut chars = token.chars();
    (0..TOKEN_LEN).fold(0u16, |acc, i| {
        let digit = chars
            .next()
            .and_then(|ch| alphabet.identifier_value(ch))
            .unwrap_or(SENTINEL_DIGIT);
        acc | (u16::from(digit) << (6 * i))
    })
}

/// Decode a single token, failing on anything but exactly three valid
/// identifier characters naming a 16-bit address.
pub fn decode_token_strict(alphabet: &Alphabet, token: &str) -> Result<u16> {
    let invalid = || PackError::InvalidIdentifier {
        token: token.to_string(),
    };

    let mut value = 0u16;
    let mut count = 0;
    for (i, ch) in token.chars().enumerate() {
        if i >= TOKEN_LEN {
            return Err(invalid());
        }
        let digit = alphabet.identifier_value(ch).ok_or_else(invalid)?;
        // The top digit only carries 4 bits.
        if i == TOKEN_LEN - 1 && digit > 0xF {
            return Err(invalid());
        }
        value |= u16::from(digit) << (6 * i);
        count += 1;
    }
    if count != TOKEN_LEN {
        return Err(invalid());
    }
    Ok(value)
}

/// Split a run of concatenated tokens and strictly decode each one.
pub fn decode_tokens(alphabet: &Alphabet, tokens: &str) -> Result<Vec<u16>> {
    let chars: Vec<char> = tokens.chars().collect();
    if chars.len() % TOKEN_LEN != 0 {
        return Err(PackError::InvalidIdentifier {
            token: tokens.to_string(),
        });
    }
    chars
        .chunks(TOKEN_LEN)
        .map(|chunk| decode_token_strict(alphabet, &chunk.iter().collect::<String>()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let alphabet = Alphabet::PSCII;
        assert_eq!(encode_offset(&alphabet, 0), "   ");
        // 2 = '"', least significant digit first
        assert_eq!(encode_offset(&alphabet, 2), "\"  ");
        // 0xFFFF = 63, 63, 15 -> '@', '@', '1'
        assert_eq!(encode_offset(&alphabet, 0xFFFF), "@@1");
    }

    #[test]
    fn test_strict_inverts_encode() {
        let alphabet = Alphabet::PSCII;
        for address in [0u16, 1, 2, 63, 64, 4095, 4096, 0x4300, 0xFFFF] {
            let token = encode_offset(&alphabet, address);
            assert_eq!(token.len(), TOKEN_LEN);
            assert_eq!(decode_token_strict(&alphabet, &token).unwrap(), address);
            assert_eq!(decode_token(&alphabet, &token), address);
        }
    }

    #[test]
    fn test_permissive_uses_sentinel() {
        let alphabet = Alphabet::PSCII;
        // '$' is not an identifier digit.
        assert_eq!(decode_token(&alphabet, "$  "), 63);
        assert_eq!(decode_token(&alphabet, " $ "), 63 << 6);
        // Excess high bits of the last digit fall off the 16-bit value.
        assert_eq!(decode_token(&alphabet, ""), 0xFFFF);
    }

    #[test]
    fn test_strict_rejects() {
        let alphabet = Alphabet::PSCII;
        assert!(decode_token_strict(&alphabet, "$  ").is_err());
        assert!(decode_token_strict(&alphabet, "ab").is_err());
        assert!(decode_token_strict(&alphabet, "abcd").is_err());
        assert!(decode_token_strict(&alphabet, "@@@").is_err());
        assert_eq!(decode_token(&alphabet, "@@@"), 0xFFFF);
    }

    #[test]
    fn test_decode_tokens() {
        let alphabet = Alphabet::PSCII;
        let joined = format!(
            "{}{}",
            encode_offset(&alphabet, 2),
            encode_offset(&alphabet, 300)
        );
        assert_eq!(decode_tokens(&alphabet, &joined).unwrap(), vec![2, 300]);
        assert!(decode_tokens(&alphabet, "abcd").is_err());
        assert_eq!(decode_tokens(&alphabet, "").unwrap(), Vec::<u16>::new());
    }
}
