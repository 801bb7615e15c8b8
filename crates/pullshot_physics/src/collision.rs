//! Collision detection between bodies
//!
//! Circles are tested exactly. Squares and polygons go through the Separating
//! Axis Theorem, taking the axis of least penetration as the resolution axis.
//! A circle against a polygon uses the center-to-center axis plus the
//! polygon's edge normals.

use pullshot_math::Vec2;

use crate::body::Body;
use crate::shapes::{edge_normals, project_onto_axis, Projection, Shape};

/// Result of an overlap between two bodies
///
/// `a` and `b` are the corrected absolute positions. Non-solid or immovable
/// bodies get their current position back unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collision {
    /// Corrected position for the first body
    pub a: Vec2,
    /// Corrected position for the second body
    pub b: Vec2,
    /// Unit resolution axis pointing from A toward B
    ///
    /// Zero when the side could not be determined (coincident projections).
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub depth: f32,
}

impl Collision {
    /// The same collision seen from the other body
    pub fn swapped(self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// Share of the correction each body takes
///
/// - Either body not solid: nobody moves.
/// - Both movable: half each.
/// - Otherwise the movable one takes all of it.
pub fn correction_shares(a: &Body, b: &Body) -> (f32, f32) {
    if !a.is_solid() || !b.is_solid() {
        (0.0, 0.0)
    } else if a.is_movable() && b.is_movable() {
        (0.5, 0.5)
    } else if a.is_movable() {
        (1.0, 0.0)
    } else if b.is_movable() {
        (0.0, 1.0)
    } else {
        (0.0, 0.0)
    }
}

/// Test two bodies for overlap
///
/// Returns `None` when they do not overlap or when both arguments are the
/// same body. Swapping the arguments swaps the result.
pub fn check_collision(a: &Body, b: &Body) -> Option<Collision> {
    if std::ptr::eq(a, b) {
        return None;
    }

    match (&a.shape, &b.shape) {
        (Shape::Circle, Shape::Circle) => circle_circle(a, b),
        (Shape::Circle, _) => circle_polygon(a, b),
        (_, Shape::Circle) => circle_polygon(b, a).map(Collision::swapped),
        _ => polygon_polygon(a, b),
    }
}

fn circle_circle(a: &Body, b: &Body) -> Option<Collision> {
    let delta = b.position - a.position;
    let dist = delta.length();
    let minimum = a.radius() + b.radius();
    if dist >= minimum {
        return None;
    }

    // atan2(0, 0) is 0, so concentric circles separate along the x axis
    let normal = Vec2::from_angle(delta.angle(), 1.0);
    Some(corrected(a, b, normal, minimum - dist))
}

fn polygon_polygon(a: &Body, b: &Body) -> Option<Collision> {
    let vertices_a = a.vertices();
    let vertices_b = b.vertices();

    let mut axes = edge_normals(&vertices_a);
    axes.extend(edge_normals(&vertices_b));

    let (normal, depth) = least_penetration(&axes, |axis| {
        (
            project_onto_axis(&vertices_a, axis),
            project_onto_axis(&vertices_b, axis),
        )
    })?;
    Some(corrected(a, b, normal, depth))
}

fn circle_polygon(circle: &Body, polygon: &Body) -> Option<Collision> {
    let vertices = polygon.vertices();
    let center_axis = (polygon.position - circle.position).normalized();

    let mut axes = vec![center_axis];
    axes.extend(edge_normals(&vertices));

    let radius = circle.radius();
    let (normal, depth) = least_penetration(&axes, |axis| {
        (
            Projection::of_circle(axis.dot(circle.position), radius),
            project_onto_axis(&vertices, axis),
        )
    })?;
    Some(corrected(circle, polygon, normal, depth))
}

/// Find the axis with the smallest overlap
///
/// Returns the signed unit normal (A toward B) and the overlap, or `None` if
/// any axis separates the shapes. Zero-length axes carry no information and
/// are skipped.
fn least_penetration<F>(axes: &[Vec2], project: F) -> Option<(Vec2, f32)>
where
    F: Fn(Vec2) -> (Projection, Projection),
{
    let mut best: Option<(Vec2, f32)> = None;

    for &axis in axes {
        if axis == Vec2::ZERO {
            continue;
        }

        let (pa, pb) = project(axis);
        let overlap = pa.overlap(&pb);
        if overlap <= 0.0 {
            return None;
        }

        if best.map_or(true, |(_, depth)| overlap < depth) {
            let side = sign(pb.midpoint_sum() - pa.midpoint_sum());
            best = Some((axis * side, overlap));
        }
    }

    best
}

/// Like `f32::signum`, but zero stays zero
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn corrected(a: &Body, b: &Body, normal: Vec2, depth: f32) -> Collision {
    let (share_a, share_b) = correction_shares(a, b);
    let correction = normal * depth;
    Collision {
        a: a.position - correction * share_a,
        b: b.position + correction * share_b,
        normal,
        depth,
    }
}
