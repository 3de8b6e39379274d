//! `.tsx` loader: turns the Tiled `<tileset>` XML into a raw [`Tileset`].
//!
//! Attributes are walked one at a time and matched by name. Anything the
//! model has no slot for is skipped and logged at debug level.

mod properties;
mod tile;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, info};
use roxmltree::{Document, Node};
use thiserror::Error;

use crate::model::{Image, TileOffset, Tileset};

#[derive(Debug, Error)]
pub enum TsxParseError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected a <tileset> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{tag}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },
    #[error("<{tag}> attribute `{attribute}` has invalid value `{value}`")]
    InvalidValue {
        tag: &'static str,
        attribute: String,
        value: String,
    },
    #[error("invalid point list `{points}`: {reason}")]
    InvalidPoints { points: String, reason: String },
    #[error("property `{name}` has unknown type `{kind}`")]
    UnknownPropertyType { name: String, kind: String },
}

/// Reads and parses a `.tsx` file. The image source is resolved against
/// the directory holding the file.
pub fn load_file(path: &Path) -> Result<Tileset, TsxParseError> {
    let xml = std::fs::read_to_string(path).map_err(|source| TsxParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded {} ({} bytes)", path.display(), xml.len());
    parse_tileset(&xml, path.parent())
}

/// Parses a `.tsx` document held in memory.
pub fn parse_tileset(xml: &str, parent_path: Option<&Path>) -> Result<Tileset, TsxParseError> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    match root.tag_name().name() {
        "tileset" => {}
        other => return Err(TsxParseError::UnexpectedRoot(other.to_string())),
    }

    let tileset = parse_tileset_node(root, parent_path)?;
    info!(
        "Parsed tileset `{}`: {} tiles declared, {} annotated",
        tileset.name,
        tileset.tile_count,
        tileset.tiles.len()
    );
    Ok(tileset)
}

fn parse_tileset_node(node: Node, parent_path: Option<&Path>) -> Result<Tileset, TsxParseError> {
    const TAG: &str = "tileset";
    let mut tileset = Tileset::default();
    let mut tile_width = None;
    let mut tile_height = None;
    let mut tile_count = None;
    let mut columns = None;

    // Parses attributes
    for attribute in node.attributes() {
        let name = attribute.name();
        let value = attribute.value();
        match name {
            "version" => tileset.version = String::from(value),
            "tiledversion" => tileset.tiled_version = String::from(value),
            "name" => tileset.name = String::from(value),
            "tilewidth" => tile_width = Some(parse_value(TAG, name, value)?),
            "tileheight" => tile_height = Some(parse_value(TAG, name, value)?),
            "spacing" => tileset.spacing = parse_value(TAG, name, value)?,
            "margin" => tileset.margin = parse_value(TAG, name, value)?,
            "tilecount" => tile_count = Some(parse_value(TAG, name, value)?),
            "columns" => columns = Some(parse_value(TAG, name, value)?),
            _ => debug!("skipping <{TAG}> attribute `{name}`"),
        }
    }
    tileset.tile_width = required(TAG, "tilewidth", tile_width)?;
    tileset.tile_height = required(TAG, "tileheight", tile_height)?;
    tileset.tile_count = required(TAG, "tilecount", tile_count)?;
    tileset.columns = required(TAG, "columns", columns)?;

    // Parses children
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "image" => tileset.image = Some(parse_image(child, parent_path)?),
            "tileoffset" => tileset.tile_offset = Some(parse_tile_offset(child)?),
            "properties" => tileset.properties = properties::parse_properties(child)?,
            "tile" => tileset.tiles.push(tile::parse_tile(child)?),
            other => debug!("skipping <{other}> inside <{TAG}>"),
        }
    }
    Ok(tileset)
}

fn parse_image(node: Node, parent_path: Option<&Path>) -> Result<Image, TsxParseError> {
    const TAG: &str = "image";
    let mut image = Image::default();
    let mut source = None;
    for attribute in node.attributes() {
        let name = attribute.name();
        let value = attribute.value();
        match name {
            "source" => {
                let resolved = match parent_path {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        parent.join(value).to_string_lossy().into_owned()
                    }
                    _ => String::from(value),
                };
                source = Some(resolved);
            }
            "width" => image.width = parse_value(TAG, name, value)?,
            "height" => image.height = parse_value(TAG, name, value)?,
            "trans" => image.trans = Some(parse_trans(value)?),
            _ => debug!("skipping <{TAG}> attribute `{name}`"),
        }
    }
    image.source = required(TAG, "source", source)?;
    Ok(image)
}

fn parse_tile_offset(node: Node) -> Result<TileOffset, TsxParseError> {
    const TAG: &str = "tileoffset";
    let mut offset = TileOffset::default();
    for attribute in node.attributes() {
        let name = attribute.name();
        let value = attribute.value();
        match name {
            "x" => offset.x = parse_value(TAG, name, value)?,
            "y" => offset.y = parse_value(TAG, name, value)?,
            _ => debug!("skipping <{TAG}> attribute `{name}`"),
        }
    }
    Ok(offset)
}

/// Accepts `RGB`, `RRGGBB`, optionally prefixed with `#`, and normalises to `RRGGBB`.
fn parse_trans(value: &str) -> Result<String, TsxParseError> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || TsxParseError::InvalidValue {
        tag: "image",
        attribute: String::from("trans"),
        value: String::from(value),
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match hex.len() {
        6 => Ok(hex.to_ascii_uppercase()),
        3 => Ok(hex
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>()
            .to_ascii_uppercase()),
        _ => Err(invalid()),
    }
}

pub(crate) fn parse_value<T: FromStr>(
    tag: &'static str,
    attribute: &str,
    value: &str,
) -> Result<T, TsxParseError> {
    value.trim().parse().map_err(|_| TsxParseError::InvalidValue {
        tag,
        attribute: String::from(attribute),
        value: String::from(value),
    })
}

pub(crate) fn required<T>(
    tag: &'static str,
    attribute: &'static str,
    value: Option<T>,
) -> Result<T, TsxParseError> {
    value.ok_or(TsxParseError::MissingAttribute { tag, attribute })
}
