use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::model::{Point, TileId};
use crate::writer::Format;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a .tsx tileset and print every diagnostic
    Check {
        /// Input .tsx tileset
        input: PathBuf,
        /// Fail on warnings too
        #[arg(long)]
        strict: bool,
    },
    /// Validate, process and write the flag tables
    Export {
        /// Input .tsx tileset
        input: PathBuf,
        /// Output directory
        output: PathBuf,
        /// Output format, repeatable (default: all)
        #[arg(long = "format", value_enum)]
        formats: Vec<Format>,
        /// Refuse to export when there are warnings
        #[arg(long)]
        strict: bool,
    },
    /// Print the flags and regions of one tile
    Query {
        /// Input .tsx tileset
        input: PathBuf,
        /// Local tile id
        id: TileId,
        /// Only list regions containing this tile-local point, e.g. `8,8`
        #[arg(long, value_parser = parse_point)]
        at: Option<Point>,
    },
}

/// Settings shared by the pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub strict: bool,
    pub formats: Vec<Format>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            formats: Format::ALL.to_vec(),
        }
    }
}

impl Config {
    /// An empty format list means every format; duplicates are dropped.
    pub fn new(strict: bool, mut formats: Vec<Format>) -> Self {
        if formats.is_empty() {
            formats = Format::ALL.to_vec();
        }
        formats.sort();
        formats.dedup();
        Self { strict, formats }
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    s.parse()
}
