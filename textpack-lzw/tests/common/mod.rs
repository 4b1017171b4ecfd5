//! Corpus generators shared by the integration tests.

#![allow(dead_code)]

use textpack_lzw::PackConfig;

/// Deterministic pseudo-random strings over the Pico-8 alphabet.
pub fn random_corpus(seed: u64, count: usize, max_len: usize) -> Vec<String> {
    let symbols: Vec<char> = PackConfig::PICO8.alphabet.symbols().chars().collect();
    let mut state = seed;
    let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    (0..count)
        .map(|_| {
            let len = 1 + next() % max_len;
            (0..len)
                .map(|_| {
                    // Bias toward letters and spaces so phrases repeat.
                    match next() % 4 {
                        0 => ' ',
                        1 | 2 => (b'a' + (next() % 8) as u8) as char,
                        _ => symbols[next() % symbols.len()],
                    }
                })
                .collect()
        })
        .collect()
}

/// Unique two-character strings; each adds exactly one dictionary entry.
pub fn pair_strings(count: usize) -> Vec<String> {
    ('a'..='z')
        .flat_map(|a| ('0'..='9').map(move |b| format!("{a}{b}")))
        .take(count)
        .collect()
}

/// Lowercase hex rendering of packed data.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}
