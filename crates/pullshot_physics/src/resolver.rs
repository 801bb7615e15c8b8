//! Collision response: momentum exchange and bounces
//!
//! Results are written into push velocity only. Move velocity is a body's
//! own locomotion and survives bumps untouched.

use pullshot_math::Vec2;

use crate::body::Body;
use crate::collision::Collision;

/// Total velocities of two bodies after an elastic collision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostCollisionMotion {
    pub a: Vec2,
    pub b: Vec2,
}

/// New push velocities to apply after a collision
///
/// `None` leaves that body's push velocity as it was.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionChange {
    pub push_a: Option<Vec2>,
    pub push_b: Option<Vec2>,
}

impl MotionChange {
    /// Positional correction only
    pub const NONE: Self = Self {
        push_a: None,
        push_b: None,
    };

    /// Whether this change leaves both bodies alone
    pub fn is_none(&self) -> bool {
        self.push_a.is_none() && self.push_b.is_none()
    }
}

fn exchanges_momentum(body: &Body) -> bool {
    body.is_movable() && body.is_solid() && body.mass != 0.0
}

/// Elastic collision between two bodies
///
/// Works in one dimension along `normal`, using each body's combined
/// velocity and mass. Tangential components pass through unchanged. A zero
/// `normal` falls back to the line between the centers. Returns `None`
/// unless both bodies are movable, solid and have mass.
pub fn post_collision_motion(a: &Body, b: &Body, normal: Vec2) -> Option<PostCollisionMotion> {
    if !exchanges_momentum(a) || !exchanges_momentum(b) {
        return None;
    }
    let total_mass = a.mass + b.mass;
    if total_mass == 0.0 {
        return None;
    }

    let normal = if normal == Vec2::ZERO {
        Vec2::from_angle((b.position - a.position).angle(), 1.0)
    } else {
        normal.normalized()
    };
    let va = a.velocity();
    let vb = b.velocity();

    let along_a = va.dot(normal);
    let along_b = vb.dot(normal);
    let tangent_a = va - normal * along_a;
    let tangent_b = vb - normal * along_b;

    let after_a = (along_a * (a.mass - b.mass) + 2.0 * b.mass * along_b) / total_mass;
    let after_b = (along_b * (b.mass - a.mass) + 2.0 * a.mass * along_a) / total_mass;

    Some(PostCollisionMotion {
        a: normal * after_a + tangent_a,
        b: normal * after_b + tangent_b,
    })
}

/// Reflect a velocity off a surface with the given unit normal
///
/// Speed is preserved. Approximates an elastic bounce off an infinitely
/// heavy obstacle.
#[inline]
pub fn mirror_bounce(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - normal * (2.0 * velocity.dot(normal))
}

/// Decide how a detected collision changes the bodies' push velocities
///
/// - Two movable solid bodies with mass exchange momentum.
/// - A movable solid body striking an immovable solid one bounces off it,
///   when at least one of the two is a circle.
/// - Anything else gets positional correction only.
pub fn resolve(a: &Body, b: &Body, collision: &Collision) -> MotionChange {
    if let Some(motion) = post_collision_motion(a, b, collision.normal) {
        return MotionChange {
            push_a: Some(motion.a - a.move_velocity),
            push_b: Some(motion.b - b.move_velocity),
        };
    }

    if !a.is_solid() || !b.is_solid() {
        return MotionChange::NONE;
    }
    if a.shape.is_polygonal() && b.shape.is_polygonal() {
        return MotionChange::NONE;
    }

    let normal = collision.normal;
    match (a.is_movable(), b.is_movable()) {
        (true, false) if a.push_velocity.dot(normal) > 0.0 => MotionChange {
            push_a: Some(mirror_bounce(a.push_velocity, normal)),
            push_b: None,
        },
        (false, true) if b.push_velocity.dot(-normal) > 0.0 => MotionChange {
            push_a: None,
            push_b: Some(mirror_bounce(b.push_velocity, normal)),
        },
        _ => MotionChange::NONE,
    }
}
