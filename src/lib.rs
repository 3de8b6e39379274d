pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cli::{Command, Config};
use model::{Point, TileId};
use processor::ProcessError;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Check { input, strict } => {
            let config = Config::new(strict, Vec::new());
            if !check(&input, &config, &mut stdout)? {
                bail!("{} failed validation", input.display());
            }
        }
        Command::Export {
            input,
            output,
            formats,
            strict,
        } => {
            let config = Config::new(strict, formats);
            for path in export(&input, &output, &config)? {
                writeln!(stdout, "wrote {}", path.display())?;
            }
        }
        Command::Query { input, id, at } => query(&input, id, at, &mut stdout)?,
    }
    Ok(())
}

/// Validates `input` and prints the report. Returns whether it passed.
pub fn check(input: &Path, config: &Config, out: &mut impl Write) -> anyhow::Result<bool> {
    let tileset =
        parser::load_file(input).with_context(|| format!("Parsing {}", input.display()))?;
    let report = processor::validate(&tileset);
    writer::text::write_report(out, &tileset.name, &report)
        .with_context(|| "Writing report")?;
    Ok(!report.fails(config.strict))
}

/// Runs the whole pipeline and returns the files written.
pub fn export(input: &Path, out_dir: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    // 1. ── Parse ──────────────────────────────────────────────────────
    let raw = parser::load_file(input).with_context(|| format!("Parsing {}", input.display()))?;

    // 2. ── Process ────────────────────────────────────────────────────
    let processed = processor::process(&raw, config.strict)
        .with_context(|| format!("Processing tileset `{}`", raw.name))?;

    // 3. ── Write outputs ──────────────────────────────────────────────
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Creating {}", out_dir.display()))?;

    let mut written = Vec::new();
    for format in &config.formats {
        let paths = format
            .emit(&processed, out_dir)
            .with_context(|| format!("Writing {format:?} artifacts"))?;
        written.extend(paths);
    }
    info!("Exported `{}` to {}", processed.name, out_dir.display());
    Ok(written)
}

/// Prints what tile `id` is, optionally only the regions under `at`.
pub fn query(
    input: &Path,
    id: TileId,
    at: Option<Point>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let raw = parser::load_file(input).with_context(|| format!("Parsing {}", input.display()))?;
    let processed = match processor::process(&raw, false) {
        Ok(processed) => processed,
        Err(ProcessError::Invalid { report, .. }) => {
            writer::text::write_report(out, &raw.name, &report)?;
            bail!("{} failed validation", input.display());
        }
        Err(err) => return Err(err).with_context(|| format!("Processing tileset `{}`", raw.name)),
    };

    let Some(info) = processed.lookup(id) else {
        bail!(
            "tile {id} is outside 0..{} of `{}`",
            processed.tile_count,
            processed.name
        );
    };
    let regions = match at {
        Some(point) => processed.regions_at(id, point),
        None => info.regions.iter().collect(),
    };
    writer::text::write_tile(out, &info, &regions).with_context(|| "Writing tile")?;
    Ok(())
}
