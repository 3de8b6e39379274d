//! Compact little-endian flag table for runtimes that don't want to parse JSON.
//!
//! ```text
//! "TFLG" u16 version u16 tilewidth u16 tileheight u16 columns u32 tilecount
//! per tile:     u16 flags u16 combined u8 edges u8 colliders
//! per collider: u8 kind u16 flags f32 rotation u16 points (f32 x, f32 y)*
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::file_stem;
use crate::model::{Point, Shape};
use crate::processor::{Collider, ProcessedTileset};

pub const MAGIC: &[u8; 4] = b"TFLG";
pub const VERSION: u16 = 1;

pub fn emit(tileset: &ProcessedTileset, out_dir: &Path) -> io::Result<PathBuf> {
    let path = out_dir.join(format!("{}.tiles.bin", file_stem(&tileset.name)));
    fs::write(&path, encode(tileset)?)?;
    Ok(path)
}

/// Shape tag stored in front of every collider.
pub fn shape_kind(shape: &Shape) -> u8 {
    match shape {
        Shape::Rectangle { .. } => 0,
        Shape::Ellipse { .. } => 1,
        Shape::Point { .. } => 2,
        Shape::Polygon { .. } => 3,
        Shape::Polyline { .. } => 4,
    }
}

pub fn encode(tileset: &ProcessedTileset) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(16 + tileset.tiles.len() * 6);
    out.extend_from_slice(MAGIC);
    put_u16(&mut out, VERSION);
    put_u16(&mut out, narrow(tileset.tile_width, "tilewidth")?);
    put_u16(&mut out, narrow(tileset.tile_height, "tileheight")?);
    put_u16(&mut out, narrow(tileset.columns, "columns")?);
    out.extend_from_slice(&tileset.tile_count.to_le_bytes());

    for tile in &tileset.tiles {
        put_u16(&mut out, tile.flags.bits());
        put_u16(&mut out, tile.combined.bits());
        out.push(tile.edges.bits());
        out.push(narrow(tile.colliders.len(), "collider count")?);
        for collider in &tile.colliders {
            encode_collider(&mut out, collider)?;
        }
    }
    Ok(out)
}

fn encode_collider(out: &mut Vec<u8>, collider: &Collider) -> io::Result<()> {
    let points = match &collider.shape {
        Shape::Rectangle { rect } | Shape::Ellipse { rect } => vec![rect.min, rect.max],
        Shape::Point { at } => vec![*at],
        Shape::Polygon { points } | Shape::Polyline { points } => points.clone(),
    };
    out.push(shape_kind(&collider.shape));
    put_u16(out, collider.flags.bits());
    out.extend_from_slice(&collider.rotation.to_le_bytes());
    put_u16(out, narrow(points.len(), "point count")?);
    for Point { x, y } in points {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
    }
    Ok(())
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn narrow<T, U>(value: T, what: &str) -> io::Result<U>
where
    T: Copy + std::fmt::Display + TryInto<U>,
{
    value.try_into().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{what} {value} does not fit the binary format"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Object, ObjectGroup, ObjectShape, Property, Tile, Tileset};
    use crate::processor::process;

    fn tileset() -> ProcessedTileset {
        let mut path = Object {
            id: 4,
            x: 8.0,
            y: 8.0,
            shape: ObjectShape::Polyline(vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0)]),
            ..Default::default()
        };
        path.properties
            .insert("flags", Property::String("PATH|RIGHT".into()));
        let raw = Tileset {
            name: "paths".into(),
            tile_width: 16,
            tile_height: 16,
            columns: 2,
            tile_count: 2,
            tiles: vec![Tile {
                id: 1,
                object_group: Some(ObjectGroup {
                    objects: vec![path],
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        process(&raw, false).unwrap()
    }

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn f32_at(bytes: &[u8], at: usize) -> f32 {
        f32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn test_header() {
        let bytes = encode(&tileset()).unwrap();
        assert_eq!(&bytes[0..4], b"TFLG");
        assert_eq!(u16_at(&bytes, 4), 1);
        assert_eq!(u16_at(&bytes, 6), 16);
        assert_eq!(u16_at(&bytes, 8), 16);
        assert_eq!(u16_at(&bytes, 10), 2);
        assert_eq!(&bytes[12..16], &2u32.to_le_bytes());
    }

    #[test]
    fn test_tile_records() {
        let bytes = encode(&tileset()).unwrap();
        // Tile 0 has nothing.
        assert_eq!(&bytes[16..22], &[0, 0, 0, 0, 0, 0]);

        // Tile 1: no own flags, one PATH|RIGHT polyline reaching the right edge.
        let tile = 22;
        assert_eq!(u16_at(&bytes, tile), 0);
        assert_eq!(u16_at(&bytes, tile + 2), 0b1010_0000);
        assert_eq!(bytes[tile + 4], 0b1000);
        assert_eq!(bytes[tile + 5], 1);

        let collider = tile + 6;
        assert_eq!(bytes[collider], 4);
        assert_eq!(u16_at(&bytes, collider + 1), 0b1010_0000);
        assert_eq!(f32_at(&bytes, collider + 3), 0.0);
        assert_eq!(u16_at(&bytes, collider + 7), 2);
        assert_eq!(f32_at(&bytes, collider + 9), 8.0);
        assert_eq!(f32_at(&bytes, collider + 17), 16.0);
        assert_eq!(bytes.len(), collider + 9 + 16);
    }

    #[test]
    fn test_oversized_dimension_is_rejected() {
        let mut tileset = tileset();
        tileset.tile_width = 70_000;
        let err = encode(&tileset).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = emit(&tileset(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "paths.tiles.bin");
        assert_eq!(fs::read(path).unwrap(), encode(&tileset()).unwrap());
    }
}
