use crate::{
    sources::{parse_deb822, parse_deb_line, SourcesBuilder},
    types::config::{ConvertArgs, SourcesFormat},
    warn,
};

use anyhow::{bail, Context, Result};
use std::io::Read;

pub fn convert(args: &ConvertArgs) -> Result<()> {
    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .context(format!("Failed to read {}", path.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin()
                .read_to_string(&mut s)
                .context("Failed to read sources from stdin")?;
            s
        }
    };

    println!("{}", convert_sources(&content, args.to)?);
    Ok(())
}

/// Convert one-line sources to deb822, or deb822 sources to one-line
fn convert_sources(content: &str, to: SourcesFormat) -> Result<String> {
    let mut builder = SourcesBuilder::new();
    match to {
        SourcesFormat::Deb822 => {
            let mut errors = 0;
            for (no, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match parse_deb_line(line) {
                    Some(entry) => builder.add_entry(entry),
                    None => {
                        errors += 1;
                        warn!("Skipping malformed source at line {}: {}", no + 1, trimmed);
                    }
                }
            }
            if errors > 0 {
                warn!("{} line(s) could not be converted.", errors);
            }
        }
        SourcesFormat::Oneline => {
            for entry in parse_deb822(content) {
                if entry.options.has_embedded_key() {
                    warn!(
                        "Embedded key of {} {} has no one-line form, signed-by is left out.",
                        entry.url, entry.suite
                    );
                }
                builder.add_entry(entry);
            }
        }
    }

    if builder.entries().is_empty() {
        bail!("No source entry found in input");
    }

    Ok(match to {
        SourcesFormat::Deb822 => builder.build_deb822(),
        SourcesFormat::Oneline => builder.build_one_line().join("\n"),
    })
}
