//! Integrity checks over a raw tileset.
//!
//! Every problem found is collected into a [`Report`]; validation never
//! stops at the first one so authors can fix a file in one pass.

use std::collections::HashSet;
use std::fmt;

use log::{Level, debug};

use super::path::{PathIssue, path_edge};
use crate::model::flags::tokens;
use crate::model::{
    Edges, MAX_TILE_COUNT, Object, Point, Property, Shape, TileFlags, TileId, Tileset,
};

/// Slack allowed when comparing shape coordinates against the tile bounds.
const BOUNDS_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Level the diagnostic is logged at while processing.
    pub fn log_level(self) -> Level {
        match self {
            Severity::Warning => Level::Warn,
            Severity::Error => Level::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    ZeroDimension { attribute: &'static str },
    GridTooLarge { tile_count: u32 },
    MissingImage,
    ImageTooSmall { required: (u32, u32), actual: (u32, u32) },
    DuplicateTile,
    TileOutOfRange { tile_count: u32 },
    FlagsNotString { found: &'static str },
    UnknownFlag { token: String },
    NullCombined { value: String },
    DirectionWithoutPath { value: String },
    PathWithoutDirection { value: String },
    DegenerateShape { shape: &'static str, points: usize, required: usize },
    OutOfBounds { point: Point },
    PathOffCenter { start: Point },
    PathNotAtEdge { end: Point },
    PathDirectionMismatch { declared: Edges, actual: Edges },
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MissingImage
            | Issue::DirectionWithoutPath { .. }
            | Issue::PathWithoutDirection { .. }
            | Issue::PathOffCenter { .. }
            | Issue::PathNotAtEdge { .. }
            | Issue::PathDirectionMismatch { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::ZeroDimension { attribute } => write!(f, "`{attribute}` must be greater than zero"),
            Issue::GridTooLarge { tile_count } => write!(
                f,
                "tile grid of {tile_count} tiles is too large (at most {MAX_TILE_COUNT} tiles, pixel sizes within u32)"
            ),
            Issue::MissingImage => write!(f, "tileset has no <image>"),
            Issue::ImageTooSmall { required, actual } => write!(
                f,
                "image is {}x{} but the tile grid needs at least {}x{}",
                actual.0, actual.1, required.0, required.1
            ),
            Issue::DuplicateTile => write!(f, "duplicate tile id"),
            Issue::TileOutOfRange { tile_count } => {
                write!(f, "tile id is outside 0..{tile_count}")
            }
            Issue::FlagsNotString { found } => {
                write!(f, "`flags` property must be a string, found {found}")
            }
            Issue::UnknownFlag { token } => write!(f, "unknown flag token `{token}`"),
            Issue::NullCombined { value } => {
                write!(f, "NULL cannot be combined with other flags in `{value}`")
            }
            Issue::DirectionWithoutPath { value } => {
                write!(f, "direction qualifier without PATH in `{value}`")
            }
            Issue::PathWithoutDirection { value } => {
                write!(f, "PATH without a direction qualifier in `{value}`")
            }
            Issue::DegenerateShape {
                shape,
                points,
                required,
            } => write!(f, "{shape} has {points} point(s), needs at least {required}"),
            Issue::OutOfBounds { point } => {
                write!(f, "shape leaves the tile at ({}, {})", point.x, point.y)
            }
            Issue::PathOffCenter { start } => write!(
                f,
                "path starts at ({}, {}) instead of the tile centre",
                start.x, start.y
            ),
            Issue::PathNotAtEdge { end } => write!(
                f,
                "path ends at ({}, {}) which is not an edge midpoint",
                end.x, end.y
            ),
            Issue::PathDirectionMismatch { declared, actual } => write!(
                f,
                "path flags say {} but the polyline reaches {}",
                declared.to_tokens(),
                actual.to_tokens()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub tile: Option<TileId>,
    pub object: Option<u32>,
    pub issue: Issue,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        match (self.tile, self.object) {
            (Some(tile), Some(object)) => write!(f, "tile {tile} object {object}: ")?,
            (Some(tile), None) => write!(f, "tile {tile}: ")?,
            _ => write!(f, "tileset: ")?,
        }
        write!(f, "{}", self.issue)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn push(&mut self, tile: Option<TileId>, object: Option<u32>, issue: Issue) {
        let diagnostic = Diagnostic {
            severity: issue.severity(),
            tile,
            object,
            issue,
        };
        debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether the report should stop the pipeline. Strict mode fails on warnings too.
    pub fn fails(&self, strict: bool) -> bool {
        if strict {
            !self.is_clean()
        } else {
            self.has_errors()
        }
    }

    /// Diagnostics for one tile, tile-level and object-level alike.
    pub fn for_tile(&self, id: TileId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.tile == Some(id))
    }
}

/// Runs every integrity check over the tileset.
pub fn validate(tileset: &Tileset) -> Report {
    let mut report = Report::default();

    let dimensions = [
        ("tilewidth", tileset.tile_width),
        ("tileheight", tileset.tile_height),
        ("columns", tileset.columns),
        ("tilecount", tileset.tile_count),
    ];
    let mut grid_ok = true;
    for (attribute, value) in dimensions {
        if value == 0 {
            report.push(None, None, Issue::ZeroDimension { attribute });
            grid_ok = false;
        }
    }

    let grid = tileset.grid();
    if grid_ok && !grid.is_tabulable() {
        report.push(
            None,
            None,
            Issue::GridTooLarge {
                tile_count: tileset.tile_count,
            },
        );
        grid_ok = false;
    }

    match (&tileset.image, grid.required_image_size()) {
        (Some(image), Some(required)) if grid_ok => {
            if image.width < required.0 || image.height < required.1 {
                report.push(
                    None,
                    None,
                    Issue::ImageTooSmall {
                        required,
                        actual: (image.width, image.height),
                    },
                );
            }
        }
        (Some(_), _) => {}
        (None, _) => report.push(None, None, Issue::MissingImage),
    }

    let tile_size = (tileset.tile_width as f32, tileset.tile_height as f32);
    let mut seen = HashSet::new();
    for tile in &tileset.tiles {
        let id = Some(tile.id);
        if !seen.insert(tile.id) {
            report.push(id, None, Issue::DuplicateTile);
        }
        if tile.id >= tileset.tile_count {
            report.push(
                id,
                None,
                Issue::TileOutOfRange {
                    tile_count: tileset.tile_count,
                },
            );
        }

        check_flags(tile.flags_property(), id, None, &mut report);

        for object in tile.objects() {
            let flags = check_flags(object.flags_property(), id, Some(object.id), &mut report);
            if tileset.tile_width > 0 && tileset.tile_height > 0 {
                check_object(object, flags, tile_size, tile.id, &mut report);
            }
        }
    }

    report
}

/// Checks a `flags` property and returns the tokens that could be decoded.
fn check_flags(
    property: Option<&Property>,
    tile: Option<TileId>,
    object: Option<u32>,
    report: &mut Report,
) -> TileFlags {
    let Some(property) = property else {
        return TileFlags::empty();
    };
    let Some(value) = property.as_str() else {
        let found = property.type_name();
        report.push(tile, object, Issue::FlagsNotString { found });
        return TileFlags::empty();
    };

    let mut flags = TileFlags::empty();
    for token in tokens(value) {
        match TileFlags::from_token(token) {
            Some(flag) => flags |= flag,
            None => report.push(
                tile,
                object,
                Issue::UnknownFlag {
                    token: token.to_string(),
                },
            ),
        }
    }

    let owned = || value.to_string();
    if flags.contains(TileFlags::NULL) && flags != TileFlags::NULL {
        report.push(tile, object, Issue::NullCombined { value: owned() });
    }
    if flags.intersects(TileFlags::DIRECTIONS) && !flags.contains(TileFlags::PATH) {
        report.push(tile, object, Issue::DirectionWithoutPath { value: owned() });
    }
    if flags.contains(TileFlags::PATH) && !flags.intersects(TileFlags::DIRECTIONS) {
        report.push(tile, object, Issue::PathWithoutDirection { value: owned() });
    }
    flags
}

fn check_object(
    object: &Object,
    flags: TileFlags,
    (tile_width, tile_height): (f32, f32),
    tile: TileId,
    report: &mut Report,
) {
    let ids = (Some(tile), Some(object.id));
    let shape = object.resolve_shape();

    let required = match &shape {
        Shape::Polygon { .. } => 3,
        Shape::Polyline { .. } => 2,
        _ => 0,
    };
    let outline: Vec<Point> = shape
        .outline()
        .into_iter()
        .map(|p| p.rotated_about(object.origin(), object.rotation))
        .collect();
    if outline.len() < required {
        let issue = Issue::DegenerateShape {
            shape: shape.name(),
            points: outline.len(),
            required,
        };
        report.push(ids.0, ids.1, issue);
        return;
    }

    // NaN compares false against everything, so check finiteness first.
    let outside = |p: &&Point| {
        !p.x.is_finite()
            || !p.y.is_finite()
            || p.x < -BOUNDS_EPSILON
            || p.y < -BOUNDS_EPSILON
            || p.x > tile_width + BOUNDS_EPSILON
            || p.y > tile_height + BOUNDS_EPSILON
    };
    if let Some(&point) = outline.iter().find(outside) {
        report.push(ids.0, ids.1, Issue::OutOfBounds { point });
    }

    if flags.contains(TileFlags::PATH) && matches!(shape, Shape::Polyline { .. }) {
        match path_edge(&outline, tile_width, tile_height) {
            Ok(actual) => {
                let declared = flags.directions();
                if !declared.is_empty() && declared != actual {
                    report.push(
                        ids.0,
                        ids.1,
                        Issue::PathDirectionMismatch { declared, actual },
                    );
                }
            }
            Err(PathIssue::OffCenter { start }) => {
                report.push(ids.0, ids.1, Issue::PathOffCenter { start })
            }
            Err(PathIssue::NotAtEdge { end }) => {
                report.push(ids.0, ids.1, Issue::PathNotAtEdge { end })
            }
            // Already reported as a degenerate shape.
            Err(PathIssue::TooShort) => {}
        }
    }
}
