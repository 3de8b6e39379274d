use std::fs;
use std::path::Path;

use tileflags::cli::Config;
use tileflags::model::{Edges, Point, TileFlags};
use tileflags::parser::load_file;
use tileflags::processor::{ProcessedTileset, process, validate};
use tileflags::writer::Format;

const FIXTURE: &str = "tests/simple-grass.tsx";

fn processed() -> ProcessedTileset {
    let tileset = load_file(Path::new(FIXTURE)).unwrap();
    process(&tileset, true).expect("fixture is clean")
}

#[test]
fn fixture_validates_clean() {
    let tileset = load_file(Path::new(FIXTURE)).unwrap();
    let report = validate(&tileset);
    assert!(report.is_clean(), "{:#?}", report.diagnostics);
}

#[test]
fn lookup_returns_authored_flags() {
    let tileset = processed();
    assert_eq!(tileset.tiles.len(), 128);
    assert_eq!(tileset.rows, 8);

    let null = tileset.lookup(0).unwrap();
    assert_eq!(null.flags, TileFlags::NULL);
    assert_eq!(null.symbols(), vec!["NULL"]);

    let ladder = tileset.lookup(23).unwrap();
    assert!(ladder.flags.is_empty());
    assert_eq!(ladder.combined, TileFlags::LADDER | TileFlags::WALL);
    let regions: Vec<TileFlags> = ladder.regions.iter().map(|r| r.flags).collect();
    assert_eq!(
        regions,
        vec![TileFlags::LADDER, TileFlags::WALL, TileFlags::WALL]
    );

    let cliff = tileset.lookup(7).unwrap();
    assert_eq!(cliff.regions[2].flags, TileFlags::LADDER | TileFlags::CLIFF);
    assert!(cliff.regions[2].sensor);

    let plain = tileset.lookup(2).unwrap();
    assert!(plain.combined.is_empty() && plain.regions.is_empty());

    assert!(tileset.lookup(128).is_none());
}

#[test]
fn path_tiles_connect_their_edges() {
    let tileset = processed();
    assert_eq!(tileset.tile(49).unwrap().edges, Edges::LEFT | Edges::RIGHT);
    assert_eq!(tileset.tile(64).unwrap().edges, Edges::RIGHT | Edges::DOWN);
    assert_eq!(
        tileset.tile(65).unwrap().edges,
        Edges::LEFT | Edges::DOWN | Edges::RIGHT
    );
    assert_eq!(tileset.tile(83).unwrap().edges, Edges::UP | Edges::DOWN);
    assert_eq!(tileset.tiles_with(TileFlags::PATH), vec![49, 64, 65, 66, 83]);
}

#[test]
fn regions_at_point() {
    let tileset = processed();

    // Middle of tile 55: the upper ladder.
    let hits = tileset.regions_at(55, Point::new(8.0, 4.0));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].flags, TileFlags::LADDER);

    let hits = tileset.regions_at(55, Point::new(1.0, 12.0));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].flags, TileFlags::WALL | TileFlags::VOID);

    // Tile 24's region has no flags but still covers the tile.
    let hits = tileset.regions_at(24, Point::new(4.0, 4.0));
    assert_eq!(hits.len(), 1);
    assert!(hits[0].flags.is_empty());
}

#[test]
fn tiles_with_flag_queries() {
    let tileset = processed();
    assert_eq!(tileset.tiles_with(TileFlags::VOID), vec![53, 54, 55, 56]);
    assert_eq!(tileset.tiles_with(TileFlags::LADDER), vec![7, 23, 39, 51, 55]);
    assert_eq!(
        tileset.tiles_with(TileFlags::LADDER | TileFlags::VOID),
        vec![55]
    );
}

#[test]
fn grid_position_matches_id() {
    let tileset = processed();
    let tile = tileset.tile(23).unwrap();
    assert_eq!((tile.column, tile.row), (7, 1));
    assert_eq!((tile.source.x, tile.source.y), (119, 17));
}

#[test]
fn export_writes_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let written =
        tileflags::export(Path::new(FIXTURE), dir.path(), &Config::default()).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "simple-grass.tiles.json",
            "simple-grass.tiles.bin",
            "simple_grass_tiles.h",
            "simple_grass_tiles.c"
        ]
    );

    let bin = fs::read(dir.path().join("simple-grass.tiles.bin")).unwrap();
    assert_eq!(&bin[0..4], b"TFLG");
    assert_eq!(&bin[12..16], &128u32.to_le_bytes());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    assert_eq!(json["tiles"][23]["combined"], "WALL|LADDER");
    assert_eq!(json["tiles"][65]["edges"], "DOWN|LEFT|RIGHT");
}

#[test]
fn export_only_requested_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(false, vec![Format::Bin]);
    let written = tileflags::export(Path::new(FIXTURE), dir.path(), &config).unwrap();
    assert_eq!(written.len(), 1);
    assert!(!dir.path().join("simple-grass.tiles.json").exists());
}

#[test]
fn export_refuses_invalid_tileset() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.tsx");
    fs::write(
        &input,
        r#"<tileset name="broken" tilewidth="16" tileheight="16" tilecount="4" columns="2">
            <image source="broken.png" width="33" height="33"/>
            <tile id="1"><properties><property name="flags" value="NULL|LAVA"/></properties></tile>
           </tileset>"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    let err = tileflags::export(&input, &out, &Config::default()).unwrap_err();
    assert_eq!(err.to_string(), "Processing tileset `broken`");
    assert!(!out.exists());
}

#[test]
fn check_and_query_print_results() {
    let mut out = Vec::new();
    assert!(tileflags::check(Path::new(FIXTURE), &Config::new(true, vec![]), &mut out).unwrap());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "simple-grass: 0 error(s), 0 warning(s)\n"
    );

    let mut out = Vec::new();
    tileflags::query(Path::new(FIXTURE), 23, Some(Point::new(1.0, 8.0)), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("tile 23\n"));
    assert!(text.contains("  combined: WALL|LADDER\n"));
    assert!(text.contains("  region 2: WALL rectangle (0,0)..(3,16)\n"));
    assert!(!text.contains("region 1:"));

    let mut out = Vec::new();
    assert!(tileflags::query(Path::new(FIXTURE), 500, None, &mut out).is_err());
}
