//! Pretty-printed JSON dump of the processed tileset.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::file_stem;
use crate::processor::ProcessedTileset;

pub fn emit(tileset: &ProcessedTileset, out_dir: &Path) -> io::Result<PathBuf> {
    let path = out_dir.join(format!("{}.tiles.json", file_stem(&tileset.name)));
    let mut out = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut out, tileset)?;
    writeln!(out)?;
    out.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Object, ObjectGroup, Property, Tile, Tileset};
    use crate::processor::process;
    use serde_json::Value;

    fn tileset() -> ProcessedTileset {
        let mut wall = Object {
            id: 1,
            width: 16.0,
            height: 4.0,
            ..Default::default()
        };
        wall.properties
            .insert("flags", Property::String("WALL".into()));
        let mut tile = Tile {
            id: 1,
            kind: Some("a".into()),
            object_group: Some(ObjectGroup {
                objects: vec![wall],
                ..Default::default()
            }),
            ..Default::default()
        };
        tile.properties
            .insert("flags", Property::String("CLIFF".into()));
        let raw = Tileset {
            name: "cliffs".into(),
            tile_width: 16,
            tile_height: 16,
            columns: 2,
            tile_count: 2,
            tiles: vec![tile],
            ..Default::default()
        };
        process(&raw, false).unwrap()
    }

    #[test]
    fn test_json_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = emit(&tileset(), dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "cliffs.tiles.json");

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["name"], "cliffs");
        assert_eq!(json["tiles"].as_array().unwrap().len(), 2);

        let tile = &json["tiles"][1];
        assert_eq!(tile["kind"], "a");
        // Flag sets are written the way the `flags` property spells them.
        assert_eq!(tile["flags"], "CLIFF");
        assert_eq!(tile["combined"], "WALL|CLIFF");
        assert_eq!(tile["colliders"][0]["shape"]["kind"], "rectangle");
        assert_eq!(tile["colliders"][0]["shape"]["rect"]["max"]["x"], 16.0);
        assert!(tile["colliders"][0].get("edges").is_none());
        assert!(json["tiles"][0].get("kind").is_none());
    }
}
