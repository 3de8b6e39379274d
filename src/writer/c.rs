//! Emit a C header/source pair with the per-tile flag tables.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::{Edges, TileFlags};
use crate::processor::ProcessedTileset;

/// Values per line in the generated arrays.
const ROW: usize = 16;

pub fn emit(tileset: &ProcessedTileset, out_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let ident = c_ident(&tileset.name);
    let header = format!("{ident}_tiles.h");
    let header_path = out_dir.join(&header);
    let source_path = out_dir.join(format!("{ident}_tiles.c"));

    let mut h = BufWriter::new(File::create(&header_path)?);
    write_header(&mut h, tileset, &ident)?;
    h.flush()?;

    let mut c = BufWriter::new(File::create(&source_path)?);
    write_source(&mut c, tileset, &ident, &header)?;
    c.flush()?;

    Ok(vec![header_path, source_path])
}

pub fn write_header(h: &mut impl Write, tileset: &ProcessedTileset, ident: &str) -> io::Result<()> {
    let upper = ident.to_ascii_uppercase();
    writeln!(h, "#pragma once")?;
    writeln!(h, "#include <stdint.h>")?;
    writeln!(h, "// Auto-generated from tileset `{}` - DO NOT EDIT\n", tileset.name)?;

    writeln!(h, "#define {upper}_TILE_WIDTH  {}", tileset.tile_width)?;
    writeln!(h, "#define {upper}_TILE_HEIGHT {}", tileset.tile_height)?;
    writeln!(h, "#define {upper}_COLUMNS     {}", tileset.columns)?;
    writeln!(h, "#define {upper}_TILE_COUNT  {}\n", tileset.tile_count)?;

    writeln!(h, "#ifndef TILE_FLAGS_DEFINED")?;
    writeln!(h, "#define TILE_FLAGS_DEFINED")?;
    writeln!(h, "enum TileFlag {{")?;
    for (name, flag) in TileFlags::all().iter_names() {
        writeln!(h, "    TILE_FLAG_{name} = 0x{:04X},", flag.bits())?;
    }
    writeln!(h, "}};\n")?;
    writeln!(h, "enum TileEdge {{")?;
    for (name, edge) in Edges::all().iter_names() {
        writeln!(h, "    TILE_EDGE_{name} = 0x{:02X},", edge.bits())?;
    }
    writeln!(h, "}};")?;
    writeln!(h, "#endif\n")?;

    writeln!(h, "// Tile-level flags.")?;
    writeln!(h, "extern const uint16_t {ident}_tile_flags[{upper}_TILE_COUNT];")?;
    writeln!(h, "// Tile flags together with every region's flags.")?;
    writeln!(h, "extern const uint16_t {ident}_tile_combined[{upper}_TILE_COUNT];")?;
    writeln!(h, "extern const uint8_t  {ident}_tile_edges[{upper}_TILE_COUNT];")?;
    Ok(())
}

pub fn write_source(
    c: &mut impl Write,
    tileset: &ProcessedTileset,
    ident: &str,
    header: &str,
) -> io::Result<()> {
    writeln!(c, "#include \"{header}\"")?;
    writeln!(c, "// Auto-generated from tileset `{}` - DO NOT EDIT", tileset.name)?;

    let upper = ident.to_ascii_uppercase();
    let flags: Vec<String> = tileset
        .tiles
        .iter()
        .map(|tile| format!("0x{:04X}", tile.flags.bits()))
        .collect();
    let combined: Vec<String> = tileset
        .tiles
        .iter()
        .map(|tile| format!("0x{:04X}", tile.combined.bits()))
        .collect();
    let edges: Vec<String> = tileset
        .tiles
        .iter()
        .map(|tile| format!("0x{:02X}", tile.edges.bits()))
        .collect();

    write_array(c, "uint16_t", &format!("{ident}_tile_flags"), &upper, &flags)?;
    write_array(c, "uint16_t", &format!("{ident}_tile_combined"), &upper, &combined)?;
    write_array(c, "uint8_t ", &format!("{ident}_tile_edges"), &upper, &edges)?;
    Ok(())
}

fn write_array(
    c: &mut impl Write,
    ty: &str,
    name: &str,
    upper: &str,
    values: &[String],
) -> io::Result<()> {
    writeln!(c, "\nconst {ty} {name}[{upper}_TILE_COUNT] = {{")?;
    for row in values.chunks(ROW) {
        writeln!(c, "    {},", row.join(", "))?;
    }
    writeln!(c, "}};")?;
    Ok(())
}

/// Turns a tileset name into a C identifier: `simple-grass` -> `simple_grass`.
pub fn c_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
