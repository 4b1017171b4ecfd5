//! Lookup command implementation.

use crate::utils::window_config;
use std::fs;
use std::path::Path;
use textpack_lzw::{ADDRESS_SPACE, bootstrap};

pub fn cmd_lookup(blob: &Path, tokens: &str, start: u32) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(blob)?;
    // Lookups never write, so the window only has to hold the start address.
    let config = window_config(start, ADDRESS_SPACE);

    let table = bootstrap(&data, &config)?;
    tracing::debug!(entries = table.len(), "table ready");

    println!("{}", table.decode(&data, tokens)?);
    Ok(())
}
