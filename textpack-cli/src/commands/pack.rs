//! Pack command implementation.

use super::stats::StatsJson;
use crate::utils::{read_strings, window_config};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use textpack_lzw::{TextPacker, generate_lua};

/// JSON serializable identifier assignment.
#[derive(Debug, Serialize, Deserialize)]
struct IdJson {
    token: String,
    text: String,
}

/// JSON output for a pack run.
#[derive(Debug, Serialize, Deserialize)]
struct PackJson {
    output: String,
    start: u32,
    end: u32,
    ids: Vec<IdJson>,
    stats: StatsJson,
}

pub fn cmd_pack(
    input: &Path,
    output: &Path,
    start: u32,
    end: u32,
    ids_path: Option<&Path>,
    json: bool,
    lua_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = window_config(start, end);
    let strings = read_strings(input)?;

    let mut packer = TextPacker::new(config)?;
    for (line, s) in strings.iter().enumerate() {
        packer
            .assign_identifier(s)
            .map_err(|e| format!("{}: string {}: {}", input.display(), line + 1, e))?;
    }

    let data = packer.as_bytes()?;
    fs::write(output, &data)?;
    tracing::info!(path = %output.display(), bytes = data.len(), "wrote blob");

    let ids: Vec<IdJson> = packer
        .identifiers()
        .map(|(text, token)| IdJson {
            token: token.to_string(),
            text: text.to_string(),
        })
        .collect();

    if let Some(path) = ids_path {
        fs::write(path, serde_json::to_string_pretty(&ids)?)?;
        tracing::info!(path = %path.display(), count = ids.len(), "wrote identifier map");
    }

    if let Some(path) = lua_path {
        fs::write(path, generate_lua(&config))?;
        tracing::info!(path = %path.display(), "wrote lua unpacker");
    }

    let stats = StatsJson::new(&packer.stats(), config.window());
    if json {
        let report = PackJson {
            output: output.display().to_string(),
            start,
            end,
            ids,
            stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for id in &ids {
            println!("{}\t{}", id.token, id.text);
        }
        eprintln!();
        eprintln!("Packed {} -> {}", input.display(), output.display());
        print_stats_to_stderr(&stats);
    }
    Ok(())
}

/// Keep stdout to the identifier lines so it can be piped.
fn print_stats_to_stderr(stats: &StatsJson) {
    eprintln!(
        "{} strings, {} chars -> {} bytes, {} table entries",
        stats.string_count, stats.total_string_size, stats.compressed_size, stats.table_entries
    );
}
