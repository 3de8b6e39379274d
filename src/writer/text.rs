//! Human-readable output for the command line.

use std::io::{self, Write};

use crate::model::{Point, Shape};
use crate::processor::{Collider, Report, TileInfo};

pub fn write_report(out: &mut impl Write, name: &str, report: &Report) -> io::Result<()> {
    for diagnostic in &report.diagnostics {
        writeln!(out, "{diagnostic}")?;
    }
    writeln!(
        out,
        "{name}: {} error(s), {} warning(s)",
        report.errors().count(),
        report.warnings().count()
    )
}

/// Prints a tile and the regions passed in, which may be a filtered subset of `info.regions`.
pub fn write_tile(out: &mut impl Write, info: &TileInfo, regions: &[&Collider]) -> io::Result<()> {
    writeln!(out, "tile {}", info.id)?;
    writeln!(out, "  flags:    {}", tokens_or_dash(info.flags.to_tokens()))?;
    writeln!(out, "  combined: {}", tokens_or_dash(info.symbols().join("|")))?;
    if !info.edges.is_empty() {
        writeln!(out, "  edges:    {}", info.edges.to_tokens())?;
    }
    for region in regions {
        writeln!(
            out,
            "  region {}: {} {}{}",
            region.object_id,
            tokens_or_dash(region.flags.to_tokens()),
            describe_shape(&region.shape),
            if region.rotation != 0.0 {
                format!(" rotated {}°", region.rotation)
            } else {
                String::new()
            }
        )?;
    }
    Ok(())
}

pub fn describe_shape(shape: &Shape) -> String {
    match shape {
        Shape::Rectangle { rect } | Shape::Ellipse { rect } => format!(
            "{} {}..{}",
            shape.name(),
            point(rect.min),
            point(rect.max)
        ),
        Shape::Point { at } => format!("point {}", point(*at)),
        Shape::Polygon { points } | Shape::Polyline { points } => {
            let points: Vec<String> = points.iter().copied().map(point).collect();
            format!("{} {}", shape.name(), points.join(" "))
        }
    }
}

fn point(p: Point) -> String {
    format!("({},{})", p.x, p.y)
}

fn tokens_or_dash(tokens: String) -> String {
    if tokens.is_empty() {
        String::from("-")
    } else {
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edges, Rect, TileFlags};

    fn ladder() -> Collider {
        Collider {
            object_id: 3,
            shape: Shape::Rectangle {
                rect: Rect::from_origin_size(Point::new(3.0, 13.0), 10.0, 3.0),
            },
            origin: Point::new(3.0, 13.0),
            rotation: 0.0,
            flags: TileFlags::LADDER | TileFlags::CLIFF,
            sensor: true,
            edges: Edges::empty(),
        }
    }

    #[test]
    fn test_write_tile() {
        let regions = [ladder()];
        let info = TileInfo {
            id: 7,
            flags: TileFlags::empty(),
            combined: TileFlags::LADDER | TileFlags::CLIFF,
            edges: Edges::empty(),
            regions: &regions,
        };
        let mut out = Vec::new();
        write_tile(&mut out, &info, &[&regions[0]]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "tile 7\n  flags:    -\n  combined: LADDER|CLIFF\n  region 3: LADDER|CLIFF rectangle (3,13)..(13,16)\n"
        );
    }

    #[test]
    fn test_describe_polyline() {
        let shape = Shape::Polyline {
            points: vec![Point::new(8.0, 8.0), Point::new(16.0, 8.0)],
        };
        assert_eq!(describe_shape(&shape), "polyline (8,8) (16,8)");
    }

    #[test]
    fn test_write_empty_report() {
        let mut out = Vec::new();
        write_report(&mut out, "grass", &Report::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "grass: 0 error(s), 0 warning(s)\n");
    }
}
