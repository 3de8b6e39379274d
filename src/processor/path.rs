//! Walkway polylines: a `PATH` region is a polyline drawn from the tile
//! centre to the midpoint of the edge it connects to.

use crate::model::{Edges, Point};

/// How far (in pixels) an endpoint may sit from the expected spot.
pub const PATH_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathIssue {
    TooShort,
    OffCenter { start: Point },
    NotAtEdge { end: Point },
}

/// Edge reached by a path polyline given in tile-local coordinates.
pub fn path_edge(points: &[Point], tile_width: f32, tile_height: f32) -> Result<Edges, PathIssue> {
    let (Some(&start), Some(&end)) = (points.first(), points.last()) else {
        return Err(PathIssue::TooShort);
    };
    if points.len() < 2 {
        return Err(PathIssue::TooShort);
    }

    let center = Point::new(tile_width * 0.5, tile_height * 0.5);
    if !start.approx_eq(center, PATH_TOLERANCE) {
        return Err(PathIssue::OffCenter { start });
    }

    let midpoints = [
        (Edges::UP, Point::new(center.x, 0.0)),
        (Edges::DOWN, Point::new(center.x, tile_height)),
        (Edges::LEFT, Point::new(0.0, center.y)),
        (Edges::RIGHT, Point::new(tile_width, center.y)),
    ];
    midpoints
        .iter()
        .find(|(_, midpoint)| end.approx_eq(*midpoint, PATH_TOLERANCE))
        .map(|(edge, _)| *edge)
        .ok_or(PathIssue::NotAtEdge { end })
}
