//! Tile-local geometry. Coordinates are pixels with the origin at the
//! top-left corner of the tile and y pointing down.

use serde::Serialize;
use std::str::FromStr;

/// Samples used when an ellipse has to be checked point by point.
const ELLIPSE_SEGMENTS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotates clockwise (screen space) around `origin`, the way Tiled
    /// applies an object's `rotation` attribute.
    pub fn rotated_about(self, origin: Point, degrees: f32) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;
        Self::new(
            origin.x + dx * cos - dy * sin,
            origin.y + dx * sin + dy * cos,
        )
    }

    pub fn approx_eq(self, other: Point, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl FromStr for Point {
    type Err = String;

    /// Parses `"x,y"`, the pair syntax of Tiled's `points` attribute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
        let x = x.trim().parse().map_err(|_| format!("invalid x in `{s}`"))?;
        let y = y.trim().parse().map_err(|_| format!("invalid y in `{s}`"))?;
        Ok(Self::new(x, y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Builds a rect from an origin and a size; negative sizes are normalised.
    pub fn from_origin_size(origin: Point, width: f32, height: f32) -> Self {
        let far = origin.offset(width, height);
        Self {
            min: Point::new(origin.x.min(far.x), origin.y.min(far.y)),
            max: Point::new(origin.x.max(far.x), origin.y.max(far.y)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A shape annotation resolved to tile-local coordinates, before rotation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rectangle { rect: Rect },
    Ellipse { rect: Rect },
    Point { at: Point },
    Polygon { points: Vec<Point> },
    Polyline { points: Vec<Point> },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Point { .. } => "point",
            Shape::Polygon { .. } => "polygon",
            Shape::Polyline { .. } => "polyline",
        }
    }

    /// Points that bound the shape. Ellipses are sampled.
    pub fn outline(&self) -> Vec<Point> {
        match self {
            Shape::Rectangle { rect } => rect.corners().to_vec(),
            Shape::Ellipse { rect } => {
                let center = rect.center();
                let rx = rect.width() * 0.5;
                let ry = rect.height() * 0.5;
                (0..ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                        center.offset(rx * t.cos(), ry * t.sin())
                    })
                    .collect()
            }
            Shape::Point { at } => vec![*at],
            Shape::Polygon { points } | Shape::Polyline { points } => points.clone(),
        }
    }

    /// Area containment. Points and polylines have no area and never contain anything.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Shape::Rectangle { rect } => rect.contains(p),
            Shape::Ellipse { rect } => {
                let rx = rect.width() * 0.5;
                let ry = rect.height() * 0.5;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let c = rect.center();
                let nx = (p.x - c.x) / rx;
                let ny = (p.y - c.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            Shape::Polygon { points } => polygon_contains(points, p),
            Shape::Point { .. } | Shape::Polyline { .. } => false,
        }
    }
}

// Even-odd ray casting.
fn polygon_contains(points: &[Point], p: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let cross_x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
