//! Lua command implementation.

use crate::utils::window_config;
use textpack_lzw::generate_lua;

pub fn cmd_lua(start: u32, end: u32) -> Result<(), Box<dyn std::error::Error>> {
    let config = window_config(start, end);
    config.validate()?;
    print!("{}", generate_lua(&config));
    Ok(())
}
