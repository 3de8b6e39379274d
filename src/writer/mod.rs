//! Output stages. Every writer takes the processed tileset and an existing
//! output directory and returns the paths it wrote.

pub mod bin;
pub mod c;
pub mod json;
pub mod text;

use clap::ValueEnum;
use std::io;
use std::path::{Path, PathBuf};

use crate::processor::ProcessedTileset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
pub enum Format {
    Json,
    Bin,
    C,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Bin, Format::C];

    pub fn emit(self, tileset: &ProcessedTileset, out_dir: &Path) -> io::Result<Vec<PathBuf>> {
        match self {
            Format::Json => json::emit(tileset, out_dir).map(|path| vec![path]),
            Format::Bin => bin::emit(tileset, out_dir).map(|path| vec![path]),
            Format::C => c::emit(tileset, out_dir),
        }
    }
}

/// Tileset name made safe for a file name.
pub(crate) fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.trim().is_empty() {
        String::from("tileset")
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("simple-grass"), "simple-grass");
        assert_eq!(file_stem("a/b:c"), "a_b_c");
        assert_eq!(file_stem(""), "tileset");
    }
}
