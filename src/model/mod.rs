//! Tileset data as it comes out of the `.tsx` loader.
//!
//! We keep everything in "raw" form, 1-to-1 with the XML, so the
//! processor can report every integrity problem instead of the parser
//! rejecting the file at the first odd value.

pub mod flags;
pub mod grid;
pub mod shape;

pub use flags::{Edges, FlagParseError, TileFlags};
pub use grid::{MAX_TILE_COUNT, PixelRect, TileGrid};
pub use shape::{Point, Rect, Shape};

use serde::Serialize;
use std::collections::BTreeMap;

/// Local id of a tile inside its tileset.
pub type TileId = u32;

/// Name of the property carrying the pipe-delimited flag string.
pub const FLAGS_PROPERTY: &str = "flags";

#[derive(Debug, Clone, Default)]
pub struct Tileset {
    pub version: String,
    pub tiled_version: String,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: u32,
    pub columns: u32,
    pub tile_offset: Option<TileOffset>,
    pub image: Option<Image>,
    pub properties: Properties,
    /// In document order; ids are not guaranteed unique until validated.
    pub tiles: Vec<Tile>,
}

impl Tileset {
    pub fn grid(&self) -> TileGrid {
        TileGrid {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            spacing: self.spacing,
            margin: self.margin,
            columns: self.columns,
            tile_count: self.tile_count,
        }
    }

    /// First `<tile>` entry with the given id.
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    pub source: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Tile {
    pub id: TileId,
    /// The `type` attribute, e.g. `"a"`.
    pub kind: Option<String>,
    pub probability: Option<f32>,
    pub properties: Properties,
    pub object_group: Option<ObjectGroup>,
}

impl Tile {
    pub fn flags_property(&self) -> Option<&Property> {
        self.properties.get(FLAGS_PROPERTY)
    }

    pub fn objects(&self) -> &[Object] {
        self.object_group
            .as_ref()
            .map(|group| group.objects.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DrawOrder {
    Index,
    #[default]
    TopDown,
}

#[derive(Debug, Clone, Default)]
pub struct ObjectGroup {
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
}

/// A shape annotation attached to a tile.
#[derive(Debug, Clone)]
pub struct Object {
    pub id: u32,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise around `(x, y)`.
    pub rotation: f32,
    pub visible: bool,
    pub properties: Properties,
    pub shape: ObjectShape,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            id: 0,
            name: None,
            kind: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            visible: true,
            properties: Properties::default(),
            shape: ObjectShape::Rectangle,
        }
    }
}

impl Object {
    pub fn flags_property(&self) -> Option<&Property> {
        self.properties.get(FLAGS_PROPERTY)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Resolves the raw shape into tile-local coordinates (rotation not applied).
    pub fn resolve_shape(&self) -> Shape {
        let origin = self.origin();
        let absolute = |points: &[Point]| {
            points
                .iter()
                .map(|p| origin.offset(p.x, p.y))
                .collect::<Vec<_>>()
        };
        match &self.shape {
            ObjectShape::Rectangle => Shape::Rectangle {
                rect: Rect::from_origin_size(origin, self.width, self.height),
            },
            ObjectShape::Ellipse => Shape::Ellipse {
                rect: Rect::from_origin_size(origin, self.width, self.height),
            },
            ObjectShape::Point => Shape::Point { at: origin },
            ObjectShape::Polygon(points) => Shape::Polygon {
                points: absolute(points),
            },
            ObjectShape::Polyline(points) => Shape::Polyline {
                points: absolute(points),
            },
        }
    }
}

/// Shape as written in the file; polygon/polyline points are relative to the object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Point,
    Polygon(Vec<Point>),
    Polyline(Vec<Point>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    String(String),
    Int(i64),
    Float(f32),
    Bool(bool),
    Color(String),
    File(String),
}

impl Property {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Property::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Property::String(_) => "string",
            Property::Int(_) => "int",
            Property::Float(_) => "float",
            Property::Bool(_) => "bool",
            Property::Color(_) => "color",
            Property::File(_) => "file",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    pub properties: BTreeMap<String, Property>,
}

impl Properties {
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Property) {
        self.properties.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
