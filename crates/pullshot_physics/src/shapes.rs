//! Collision shapes and the geometry used to test them
//!
//! Shapes are stored relative to a body's center. World-space vertices are
//! derived on demand from the shape, the body's position and its size, so
//! there is never a second copy of the geometry to keep in sync.

use pullshot_math::{rotations, Vec2};
use serde::{Serialize, Deserialize};

/// The outline of a body
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Circle whose diameter is the body's size
    Circle,
    /// Axis-aligned square whose side is the body's size
    Square,
    /// Arbitrary polygon given as vertex offsets from the body's center
    Polygon(Vec<Vec2>),
}

impl Shape {
    /// Rectangle centered on the body, as a polygon
    ///
    /// Vertices run top-left, top-right, bottom-right, bottom-left, the same
    /// winding as [`Shape::Square`].
    pub fn rectangle(width: f32, height: f32) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Shape::Polygon(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Polygon from a flat `[x0, y0, x1, y1, ...]` offset path
    ///
    /// A trailing odd coordinate is ignored.
    pub fn from_flat_path(path: &[f32]) -> Self {
        Shape::Polygon(
            path.chunks_exact(2)
                .map(|pair| Vec2::new(pair[0], pair[1]))
                .collect(),
        )
    }

    /// Whether this shape is tested as a polygon (squares are polygons)
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Shape::Square | Shape::Polygon(_))
    }

    /// Whether this shape is tested as an exact circle
    pub fn is_circle(&self) -> bool {
        matches!(self, Shape::Circle)
    }
}

/// Scalar range covered by a shape projected onto an axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    /// Range that contains nothing; widening it with any value yields that value
    pub const EMPTY: Self = Self {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Create a projection range
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Range covered by a circle whose center projects to `center` on the axis
    pub fn of_circle(center: f32, radius: f32) -> Self {
        Self::new(center - radius, center + radius)
    }

    /// Amount by which two ranges overlap, never negative
    pub fn overlap(&self, other: &Self) -> f32 {
        (self.max.min(other.max) - self.min.max(other.min)).max(0.0)
    }

    /// `min + max`, twice the midpoint of the range
    ///
    /// Comparing these sums gives the side of the axis each shape sits on.
    pub fn midpoint_sum(&self) -> f32 {
        self.min + self.max
    }

    fn include(&mut self, value: f32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// World-space vertices for a shape centered at `position`
///
/// - Circles give an eight-point octagon. It is only an outline for drawing;
///   collision tests treat circles exactly.
/// - Squares give their four corners, clockwise on screen from the top-left.
/// - Polygons give `position + offset` for each stored offset.
pub fn vertices_of(shape: &Shape, position: Vec2, size: f32) -> Vec<Vec2> {
    let half = size / 2.0;
    match shape {
        Shape::Circle => rotations::COMPASS
            .iter()
            .map(|&angle| position + Vec2::from_angle(angle, half))
            .collect(),
        Shape::Square => vec![
            Vec2::new(position.x - half, position.y - half),
            Vec2::new(position.x + half, position.y - half),
            Vec2::new(position.x + half, position.y + half),
            Vec2::new(position.x - half, position.y + half),
        ],
        Shape::Polygon(offsets) => offsets.iter().map(|&offset| position + offset).collect(),
    }
}

/// Unit normal of every edge of a closed vertex loop
///
/// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping). Its normal is
/// `(ey, -ex) / |e|`, which points outward for loops wound clockwise on
/// screen, as squares are. A zero-length edge yields the zero vector. Fewer
/// than two vertices cannot enclose anything and yield no normals.
pub fn edge_normals(vertices: &[Vec2]) -> Vec<Vec2> {
    let count = vertices.len();
    if count < 2 {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let edge = vertices[(i + 1) % count] - vertices[i];
            let len = edge.length();
            if len == 0.0 {
                Vec2::ZERO
            } else {
                -edge.perpendicular() / len
            }
        })
        .collect()
}

/// Project a vertex set onto an axis
///
/// An empty vertex set gives [`Projection::EMPTY`], which overlaps nothing.
pub fn project_onto_axis(vertices: &[Vec2], axis: Vec2) -> Projection {
    let mut projection = Projection::EMPTY;
    for vertex in vertices {
        projection.include(axis.dot(*vertex));
    }
    projection
}
