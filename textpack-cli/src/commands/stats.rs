//! Stats command implementation.

use crate::utils::{read_strings, savings, window_config};
use serde::{Deserialize, Serialize};
use std::path::Path;
use textpack_lzw::{PackStats, TextPacker};

/// JSON serializable corpus statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsJson {
    pub string_count: usize,
    pub total_string_size: usize,
    pub table_entries: usize,
    pub table_size: usize,
    pub compressed_size: usize,
    pub window: usize,
    pub fits: bool,
}

impl StatsJson {
    pub fn new(stats: &PackStats, window: usize) -> Self {
        Self {
            string_count: stats.string_count,
            total_string_size: stats.total_string_size,
            table_entries: stats.table_entries,
            table_size: stats.table_size,
            compressed_size: stats.compressed_size,
            window,
            fits: stats.compressed_size <= window,
        }
    }
}

/// Print statistics in human-readable form.
pub fn print_stats(stats: &StatsJson) {
    println!("Strings: {}", stats.string_count);
    println!("Total string size: {} chars", stats.total_string_size);
    println!("Table entries: {}", stats.table_entries);
    println!("Table size: {} chars", stats.table_size);
    println!(
        "Compressed size: {} bytes ({:.1}% saved)",
        stats.compressed_size,
        savings(stats.total_string_size, stats.compressed_size)
    );
    println!(
        "Window: {} bytes ({})",
        stats.window,
        if stats.fits { "fits" } else { "too small" }
    );
}

pub fn cmd_stats(
    input: &Path,
    start: u32,
    end: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = window_config(start, end);
    let strings = read_strings(input)?;

    let mut packer = TextPacker::new(config)?;
    for s in &strings {
        packer.assign_identifier(s)?;
    }

    let stats = StatsJson::new(&packer.stats(), config.window());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Input: {} ({} lines)", input.display(), strings.len());
        println!();
        print_stats(&stats);
    }
    Ok(())
}
