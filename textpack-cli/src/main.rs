//! textpack CLI - pack short strings into one shared-dictionary blob
//!
//! Every string of a corpus is LZW-encoded against a single growing
//! dictionary and addressed by a 3-character identifier.

mod commands;
mod utils;

use clap::{ArgAction, Args, Parser, Subcommand};
use commands::{cmd_lookup, cmd_lua, cmd_pack, cmd_stats};
use std::path::PathBuf;
use utils::{init_logging, parse_address};

#[derive(Parser)]
#[command(name = "textpack")]
#[command(
    author,
    version,
    about = "Pack short strings into a shared-dictionary LZW blob"
)]
#[command(long_about = "
textpack packs a corpus of short strings (one per input line) into a compact
blob sharing a single LZW dictionary, and assigns each string a 3-character
identifier. The blob is decoded by the companion Pico-8 Lua unpacker.

Examples:
  textpack pack dialogue.txt -o dialogue.bin --lua unpack.lua
  textpack pack dialogue.txt -o dialogue.bin --start 0x1000 --json
  textpack lookup dialogue.bin 'b !'
  textpack lua --start 0x1000
  textpack stats dialogue.txt
")]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Address window the blob is loaded into.
#[derive(Args, Clone, Copy)]
struct WindowArgs {
    /// First address of the blob (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_address, default_value = "0")]
    start: u32,

    /// One past the last usable address
    #[arg(long, value_parser = parse_address, default_value = "0x4300")]
    end: u32,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack every non-blank line of a text file
    #[command(alias = "p")]
    Pack {
        /// Input text file, one string per line
        input: PathBuf,

        /// Output blob file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Also write the identifier map as JSON
        #[arg(long)]
        ids: Option<PathBuf>,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// Also write the Lua unpacker
        #[arg(long)]
        lua: Option<PathBuf>,
    },

    /// Decode identifiers from a packed blob
    #[command(alias = "l")]
    Lookup {
        /// Packed blob file
        blob: PathBuf,

        /// One or more concatenated 3-character identifiers
        tokens: String,

        /// Address the blob was packed for
        #[arg(long, value_parser = parse_address, default_value = "0")]
        start: u32,
    },

    /// Print the Pico-8 Lua unpacker
    Lua {
        #[command(flatten)]
        window: WindowArgs,
    },

    /// Pack in memory and report statistics
    #[command(alias = "s")]
    Stats {
        /// Input text file, one string per line
        input: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Pack {
            input,
            output,
            window,
            ids,
            json,
            lua,
        } => cmd_pack(
            &input,
            &output,
            window.start,
            window.end,
            ids.as_deref(),
            json,
            lua.as_deref(),
        ),
        Commands::Lookup {
            blob,
            tokens,
            start,
        } => cmd_lookup(&blob, &tokens, start),
        Commands::Lua { window } => cmd_lua(window.start, window.end),
        Commands::Stats {
            input,
            window,
            json,
        } => cmd_stats(&input, window.start, window.end, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
