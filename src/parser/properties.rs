use log::debug;
use roxmltree::Node;

use super::{TsxParseError, parse_value, required};
use crate::model::{Properties, Property};

pub(super) fn parse_properties(node: Node) -> Result<Properties, TsxParseError> {
    let mut properties = Properties::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "property" => {
                let (name, value) = parse_property(child)?;
                properties.insert(name, value);
            }
            other => debug!("skipping <{other}> inside <properties>"),
        }
    }
    Ok(properties)
}

fn parse_property(node: Node) -> Result<(String, Property), TsxParseError> {
    const TAG: &str = "property";
    let name = required(TAG, "name", node.attribute("name"))?;
    let kind = node.attribute("type").unwrap_or("string");

    // Multi-line string values are stored as element text instead of `value`.
    let value = match node.attribute("value") {
        Some(value) => value,
        None if kind == "string" => node.text().unwrap_or(""),
        None => return Err(TsxParseError::MissingAttribute { tag: TAG, attribute: "value" }),
    };

    let property = match kind {
        "string" => Property::String(String::from(value)),
        "int" => Property::Int(parse_value(TAG, "value", value)?),
        "float" => Property::Float(parse_value(TAG, "value", value)?),
        "bool" => Property::Bool(parse_value(TAG, "value", value)?),
        "color" => Property::Color(String::from(value)),
        "file" => Property::File(String::from(value)),
        _ => {
            return Err(TsxParseError::UnknownPropertyType {
                name: String::from(name),
                kind: String::from(kind),
            });
        }
    };
    Ok((String::from(name), property))
}
