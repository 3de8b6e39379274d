//! The functional core: validates a raw tileset and turns it into a dense,
//! read-only lookup table for the writers and for queries.

pub mod path;
pub mod validate;

pub use validate::{Diagnostic, Issue, Report, Severity, validate};

use log::{info, log};
use serde::Serialize;
use thiserror::Error;

use crate::model::{
    Edges, FlagParseError, Image, Object, PixelRect, Point, Property, Shape, Tile, TileFlags,
    TileGrid, TileId, Tileset,
};
use path::path_edge;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("tileset `{name}` failed validation with {errors} error(s) and {warnings} warning(s)")]
    Invalid {
        name: String,
        errors: usize,
        warnings: usize,
        report: Report,
    },
    #[error("tileset of {tile_count} tiles is too large to tabulate")]
    GridTooLarge { tile_count: u32 },
    #[error(transparent)]
    Flag(#[from] FlagParseError),
}

/// Validates the tileset and builds the processed table.
///
/// Warnings are logged and let through unless `strict` is set.
pub fn process(tileset: &Tileset, strict: bool) -> Result<ProcessedTileset, ProcessError> {
    let report = validate(tileset);
    let errors = report.errors().count();
    let warnings = report.warnings().count();
    info!(
        "Validated `{}`: {errors} error(s), {warnings} warning(s)",
        tileset.name
    );
    for diagnostic in &report.diagnostics {
        log!(diagnostic.severity.log_level(), "{diagnostic}");
    }
    if report.fails(strict) {
        return Err(ProcessError::Invalid {
            name: tileset.name.clone(),
            errors,
            warnings,
            report,
        });
    }

    let processed = ProcessedTileset::build(tileset)?;
    info!(
        "Processed `{}`: {} tiles, {} annotated",
        processed.name,
        processed.tiles.len(),
        processed.annotated().count()
    );
    Ok(processed)
}

/// Fully processed tileset handed to the writers.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub columns: u32,
    pub rows: u32,
    pub tile_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    /// One entry per tile id, `tiles[id].id == id`.
    pub tiles: Vec<ProcessedTile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedTile {
    pub id: TileId,
    pub column: u32,
    pub row: u32,
    pub source: PixelRect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Tile-level flags.
    pub flags: TileFlags,
    /// Tile-level flags together with every region's flags.
    pub combined: TileFlags,
    pub edges: Edges,
    pub colliders: Vec<Collider>,
}

/// A shape annotation with its own decoded flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collider {
    pub object_id: u32,
    pub shape: Shape,
    /// Rotation pivot, the object's `(x, y)`.
    pub origin: Point,
    /// Degrees, clockwise.
    pub rotation: f32,
    pub flags: TileFlags,
    pub sensor: bool,
    #[serde(skip_serializing_if = "Edges::is_empty")]
    pub edges: Edges,
}

impl Collider {
    fn from_object(object: &Object, tile_width: f32, tile_height: f32) -> Result<Self, FlagParseError> {
        let flags = decode_flags(object.flags_property())?;
        let shape = object.resolve_shape();

        let mut edges = Edges::empty();
        if flags.contains(TileFlags::PATH) {
            edges |= flags.directions();
            if let Shape::Polyline { points } = &shape {
                let rotated: Vec<Point> = points
                    .iter()
                    .map(|p| p.rotated_about(object.origin(), object.rotation))
                    .collect();
                if let Ok(edge) = path_edge(&rotated, tile_width, tile_height) {
                    edges |= edge;
                }
            }
        }

        Ok(Collider {
            object_id: object.id,
            shape,
            origin: object.origin(),
            rotation: object.rotation,
            flags,
            sensor: flags.is_sensor(),
            edges,
        })
    }

    /// Whether a tile-local point lies inside the region.
    pub fn contains(&self, point: Point) -> bool {
        let local = point.rotated_about(self.origin, -self.rotation);
        self.shape.contains(local)
    }
}

/// The answer to "what is tile `id`": its flag set and its flagged sub-regions.
#[derive(Debug, Clone, Copy)]
pub struct TileInfo<'a> {
    pub id: TileId,
    pub flags: TileFlags,
    pub combined: TileFlags,
    pub edges: Edges,
    pub regions: &'a [Collider],
}

impl TileInfo<'_> {
    /// Symbolic names of every flag on the tile or its regions.
    pub fn symbols(&self) -> Vec<&'static str> {
        self.combined.iter_names().map(|(name, _)| name).collect()
    }
}

impl ProcessedTileset {
    /// Builds the dense table. Expects a tileset that passed validation:
    /// tiles with out-of-range ids are skipped, a duplicated id keeps its first entry.
    pub fn build(tileset: &Tileset) -> Result<Self, ProcessError> {
        let grid = tileset.grid();
        let too_large = || ProcessError::GridTooLarge {
            tile_count: tileset.tile_count,
        };
        if !grid.is_tabulable() {
            return Err(too_large());
        }
        let mut tiles: Vec<ProcessedTile> = (0..tileset.tile_count)
            .map(|id| ProcessedTile::blank(id, &grid))
            .collect::<Option<_>>()
            .ok_or_else(too_large)?;
        let mut filled = vec![false; tiles.len()];

        let tile_size = (tileset.tile_width as f32, tileset.tile_height as f32);
        for raw in &tileset.tiles {
            let index = raw.id as usize;
            let Some(entry) = tiles.get_mut(index) else {
                continue;
            };
            if std::mem::replace(&mut filled[index], true) {
                continue;
            }
            entry.fill(raw, tile_size)?;
        }

        Ok(Self {
            name: tileset.name.clone(),
            tile_width: tileset.tile_width,
            tile_height: tileset.tile_height,
            spacing: tileset.spacing,
            margin: tileset.margin,
            columns: tileset.columns,
            rows: grid.rows(),
            tile_count: tileset.tile_count,
            image: tileset.image.clone(),
            tiles,
        })
    }

    pub fn tile(&self, id: TileId) -> Option<&ProcessedTile> {
        self.tiles.get(id as usize)
    }

    pub fn lookup(&self, id: TileId) -> Option<TileInfo<'_>> {
        self.tile(id).map(|tile| TileInfo {
            id: tile.id,
            flags: tile.flags,
            combined: tile.combined,
            edges: tile.edges,
            regions: &tile.colliders,
        })
    }

    /// Regions of tile `id` that contain the tile-local point.
    pub fn regions_at(&self, id: TileId, point: Point) -> Vec<&Collider> {
        self.tile(id)
            .map(|tile| {
                tile.colliders
                    .iter()
                    .filter(|collider| collider.contains(point))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ids whose combined flags include every bit of `flags`.
    pub fn tiles_with(&self, flags: TileFlags) -> Vec<TileId> {
        self.tiles
            .iter()
            .filter(|tile| tile.combined.contains(flags))
            .map(|tile| tile.id)
            .collect()
    }

    /// Tiles that carry any flag or region.
    pub fn annotated(&self) -> impl Iterator<Item = &ProcessedTile> {
        self.tiles
            .iter()
            .filter(|tile| !tile.combined.is_empty() || !tile.colliders.is_empty())
    }
}

impl ProcessedTile {
    fn blank(id: TileId, grid: &TileGrid) -> Option<Self> {
        let (column, row) = grid.position(id)?;
        Some(Self {
            id,
            column,
            row,
            source: grid.source_rect(id)?,
            kind: None,
            flags: TileFlags::empty(),
            combined: TileFlags::empty(),
            edges: Edges::empty(),
            colliders: Vec::new(),
        })
    }

    fn fill(&mut self, raw: &Tile, (tile_width, tile_height): (f32, f32)) -> Result<(), FlagParseError> {
        self.kind = raw.kind.clone();
        self.flags = decode_flags(raw.flags_property())?;
        self.colliders = raw
            .objects()
            .iter()
            .map(|object| Collider::from_object(object, tile_width, tile_height))
            .collect::<Result<_, _>>()?;

        self.combined = self
            .colliders
            .iter()
            .fold(self.flags, |acc, collider| acc | collider.flags);
        self.edges = self
            .colliders
            .iter()
            .fold(Edges::empty(), |acc, collider| acc | collider.edges);
        if self.flags.contains(TileFlags::PATH) {
            self.edges |= self.flags.directions();
        }
        Ok(())
    }
}

/// Non-string `flags` properties are a validation error and decode to nothing here.
fn decode_flags(property: Option<&Property>) -> Result<TileFlags, FlagParseError> {
    match property.and_then(Property::as_str) {
        Some(value) => TileFlags::parse_tokens(value),
        None => Ok(TileFlags::empty()),
    }
}
