//! Utility functions for the CLI.

use std::fs;
use std::io;
use std::path::Path;
use textpack_lzw::PackConfig;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks the level.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse a decimal or `0x`-prefixed hexadecimal address.
pub fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

/// Pico-8 parameters with the given window.
pub fn window_config(start: u32, end: u32) -> PackConfig {
    PackConfig::PICO8.with_window(start, end)
}

/// Non-blank lines of `text`, in order.
pub fn split_strings(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the strings of an input file.
pub fn read_strings(path: &Path) -> io::Result<Vec<String>> {
    Ok(split_strings(&fs::read_to_string(path)?))
}

/// Percentage saved by `compressed` relative to `original`.
pub fn savings(original: usize, compressed: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}
