use log::debug;
use roxmltree::Node;

use super::properties::parse_properties;
use super::{TsxParseError, parse_value, required};
use crate::model::{DrawOrder, Object, ObjectGroup, ObjectShape, Point, Tile};

pub(super) fn parse_tile(node: Node) -> Result<Tile, TsxParseError> {
    const TAG: &str = "tile";
    let mut tile = Tile::default();
    let mut id = None;
    for attribute in node.attributes() {
        let name = attribute.name();
        let value = attribute.value();
        match name {
            "id" => id = Some(parse_value(TAG, name, value)?),
            "type" | "class" => tile.kind = Some(String::from(value)),
            "probability" => tile.probability = Some(parse_value(TAG, name, value)?),
            _ => debug!("skipping <{TAG}> attribute `{name}`"),
        }
    }
    tile.id = required(TAG, "id", id)?;

    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "properties" => tile.properties = parse_properties(child)?,
            "objectgroup" => tile.object_group = Some(parse_object_group(child)?),
            other => debug!("skipping <{other}> inside tile {}", tile.id),
        }
    }
    Ok(tile)
}

fn parse_object_group(node: Node) -> Result<ObjectGroup, TsxParseError> {
    let draw_order = match node.attribute("draworder") {
        Some("index") => DrawOrder::Index,
        Some("topdown") | None => DrawOrder::TopDown,
        Some(other) => {
            return Err(TsxParseError::InvalidValue {
                tag: "objectgroup",
                attribute: String::from("draworder"),
                value: String::from(other),
            });
        }
    };

    let mut objects = Vec::new();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "object" => objects.push(parse_object(child)?),
            other => debug!("skipping <{other}> inside <objectgroup>"),
        }
    }
    Ok(ObjectGroup {
        draw_order,
        objects,
    })
}

fn parse_object(node: Node) -> Result<Object, TsxParseError> {
    const TAG: &str = "object";
    let mut object = Object::default();
    let mut id = None;
    for attribute in node.attributes() {
        let name = attribute.name();
        let value = attribute.value();
        match name {
            "id" => id = Some(parse_value(TAG, name, value)?),
            "name" => object.name = Some(String::from(value)),
            "type" | "class" => object.kind = Some(String::from(value)),
            "x" => object.x = parse_value(TAG, name, value)?,
            "y" => object.y = parse_value(TAG, name, value)?,
            "width" => object.width = parse_value(TAG, name, value)?,
            "height" => object.height = parse_value(TAG, name, value)?,
            "rotation" => object.rotation = parse_value(TAG, name, value)?,
            "visible" => object.visible = value.trim() != "0",
            _ => debug!("skipping <{TAG}> attribute `{name}`"),
        }
    }
    object.id = required(TAG, "id", id)?;

    // Without a shape child the object is a rectangle.
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "properties" => object.properties = parse_properties(child)?,
            "ellipse" => object.shape = ObjectShape::Ellipse,
            "point" => object.shape = ObjectShape::Point,
            "polygon" => object.shape = ObjectShape::Polygon(parse_points_attr(child, "polygon")?),
            "polyline" => object.shape = ObjectShape::Polyline(parse_points_attr(child, "polyline")?),
            other => debug!("skipping <{other}> inside object {}", object.id),
        }
    }
    Ok(object)
}

fn parse_points_attr(node: Node, tag: &'static str) -> Result<Vec<Point>, TsxParseError> {
    let points = required(tag, "points", node.attribute("points"))?;
    parse_points(points)
}

/// Parses Tiled's `"x,y x,y ..."` point list.
pub(super) fn parse_points(points: &str) -> Result<Vec<Point>, TsxParseError> {
    points
        .split_whitespace()
        .map(|pair| {
            pair.parse::<Point>()
                .map_err(|reason| TsxParseError::InvalidPoints {
                    points: String::from(points),
                    reason,
                })
        })
        .collect()
}
