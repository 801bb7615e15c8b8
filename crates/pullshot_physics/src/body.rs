//! Body types for 2D physics simulation

use bitflags::bitflags;
use pullshot_math::{normalize_angle, rotations, Direction, Vec2};
use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

use crate::shapes::{vertices_of, Shape};

// Define generational key type for bodies
new_key_type! {
    /// Key to a body in the physics world
    ///
    /// Uses generational indexing so a key held past its body's removal
    /// returns None instead of pointing at whatever reused the slot.
    pub struct BodyKey;
}

bitflags! {
    /// How a body takes part in collision response
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BodyFlags: u8 {
        /// Receives positional correction and bounces. Non-solid bodies
        /// still report overlaps (coins, goals).
        const SOLID = 1 << 0;
        /// May be moved by corrections and pushes
        const MOVABLE = 1 << 1;
    }
}

impl Default for BodyFlags {
    fn default() -> Self {
        BodyFlags::SOLID | BodyFlags::MOVABLE
    }
}

/// Frame rate the velocity units are defined against
pub const EXPECTED_FRAMES_PER_SECOND: f32 = 60.0;

/// Length of one baseline frame in milliseconds
///
/// A velocity of 2 moves a body 2 units per baseline frame, or 120 units per
/// second, whatever the real frame rate is.
pub const EXPECTED_TIMESTEP_MS: f32 = 1000.0 / EXPECTED_FRAMES_PER_SECOND;

/// Fixed ratios from body size to motion constants
///
/// Bigger bodies accelerate, brake and top out proportionally faster, so a
/// level plays the same at any tile size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionRatios {
    /// Move speed gained per second, per unit of size
    pub move_acceleration: f32,
    /// Move speed lost per second, per unit of size
    pub move_deceleration: f32,
    /// Move speed limit (units per baseline frame), per unit of size
    pub move_max_speed: f32,
    /// Push speed lost per second, per unit of size
    pub push_deceleration: f32,
    /// Push speed limit (units per baseline frame), per unit of size
    pub push_max_speed: f32,
}

impl Default for MotionRatios {
    fn default() -> Self {
        // At a 64 unit tile: accelerate 16/s, brake 1/s, top out at 16,
        // pushes brake 8/s and top out at 32.
        Self {
            move_acceleration: 0.25,
            move_deceleration: 1.0 / 64.0,
            move_max_speed: 0.25,
            push_deceleration: 0.125,
            push_max_speed: 0.5,
        }
    }
}

/// Per-body motion constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    pub move_acceleration: f32,
    pub move_deceleration: f32,
    /// Negative means unlimited
    pub move_max_speed: f32,
    pub push_deceleration: f32,
    /// Negative means unlimited
    pub push_max_speed: f32,
}

impl MotionTuning {
    /// Derive constants for a body of the given size
    pub fn from_size(size: f32, ratios: &MotionRatios) -> Self {
        Self {
            move_acceleration: size * ratios.move_acceleration,
            move_deceleration: size * ratios.move_deceleration,
            move_max_speed: size * ratios.move_max_speed,
            push_deceleration: size * ratios.push_deceleration,
            push_max_speed: size * ratios.push_max_speed,
        }
    }

    /// No braking and no speed limits
    pub fn frictionless() -> Self {
        Self {
            move_acceleration: 0.0,
            move_deceleration: 0.0,
            move_max_speed: -1.0,
            push_deceleration: 0.0,
            push_max_speed: -1.0,
        }
    }
}

/// A 2D body with position, two velocities, and a collision shape
#[derive(Clone, Debug)]
pub struct Body {
    /// Center of mass in world coordinates
    pub position: Vec2,
    /// Diameter for circles, side length for squares
    pub size: f32,
    /// Self-driven locomotion (units per baseline frame)
    pub move_velocity: Vec2,
    /// Motion imparted by collisions and impulses (units per baseline frame)
    pub push_velocity: Vec2,
    /// Collision outline
    pub shape: Shape,
    /// Collision participation
    pub flags: BodyFlags,
    /// Used only when both bodies in a collision are solid and movable
    pub mass: f32,
    /// Acceleration, deceleration and speed limits
    pub tuning: MotionTuning,
    /// Facing in radians, always in (-π, π]
    rotation: f32,
    /// Removed by the world at the end of the tick
    expired: bool,
}

impl Body {
    /// Default mass of a new body
    pub const DEFAULT_MASS: f32 = 2.0;

    /// Create a solid, movable body facing south
    pub fn new(shape: Shape, position: Vec2, size: f32) -> Self {
        Self {
            position,
            size,
            move_velocity: Vec2::ZERO,
            push_velocity: Vec2::ZERO,
            shape,
            flags: BodyFlags::default(),
            mass: Self::DEFAULT_MASS,
            tuning: MotionTuning::from_size(size, &MotionRatios::default()),
            rotation: rotations::SOUTH,
            expired: false,
        }
    }

    /// Create a circle body; `size` is the diameter
    pub fn circle(position: Vec2, size: f32) -> Self {
        Self::new(Shape::Circle, position, size)
    }

    /// Create an axis-aligned square body; `size` is the side length
    pub fn square(position: Vec2, size: f32) -> Self {
        Self::new(Shape::Square, position, size)
    }

    /// Create a polygon body from vertex offsets relative to `position`
    ///
    /// `size` still drives the bounding box and motion constants.
    pub fn polygon(position: Vec2, size: f32, offsets: Vec<Vec2>) -> Self {
        Self::new(Shape::Polygon(offsets), position, size)
    }

    /// Set the self-driven velocity
    pub fn with_move_velocity(mut self, velocity: Vec2) -> Self {
        self.move_velocity = velocity;
        self
    }

    /// Set the pushed velocity
    pub fn with_push_velocity(mut self, velocity: Vec2) -> Self {
        self.push_velocity = velocity;
        self
    }

    /// Set the mass (negative values become zero)
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(0.0);
        self
    }

    /// Set whether this body is solid
    pub fn with_solid(mut self, solid: bool) -> Self {
        self.flags.set(BodyFlags::SOLID, solid);
        self
    }

    /// Set whether this body is movable
    pub fn with_movable(mut self, movable: bool) -> Self {
        self.flags.set(BodyFlags::MOVABLE, movable);
        self
    }

    /// Set the facing (normalized)
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Replace the motion constants
    pub fn with_tuning(mut self, tuning: MotionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Re-derive the motion constants from this body's size
    pub fn with_ratios(mut self, ratios: &MotionRatios) -> Self {
        self.tuning = MotionTuning::from_size(self.size, ratios);
        self
    }

    // --- Flags ---

    /// Whether this body receives positional correction
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.flags.contains(BodyFlags::SOLID)
    }

    /// Whether collisions may move this body
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.flags.contains(BodyFlags::MOVABLE)
    }

    /// Whether this body is marked for removal
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Mark this body for removal at the end of the current tick
    pub fn expire(&mut self) {
        self.expired = true;
    }

    // --- Facing ---

    /// Facing in radians, in (-π, π]
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the facing, wrapping it into (-π, π]
    pub fn set_rotation(&mut self, rotation: f32) {
        let rotation = normalize_angle(rotation);
        if rotation.is_finite() {
            self.rotation = rotation;
        }
    }

    /// Cardinal direction of the facing
    pub fn direction(&self) -> Direction {
        Direction::from_rotation(self.rotation)
    }

    /// Face a cardinal direction
    pub fn set_direction(&mut self, direction: Direction) {
        self.rotation = direction.rotation();
    }

    // --- Derived geometry ---

    /// Half the size
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x - self.size / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.size / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.position.y - self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size / 2.0
    }

    /// Move the body so its left edge sits at `value`
    pub fn set_left(&mut self, value: f32) {
        self.position.x = value + self.size / 2.0;
    }

    /// Move the body so its right edge sits at `value`
    pub fn set_right(&mut self, value: f32) {
        self.position.x = value - self.size / 2.0;
    }

    /// Move the body so its top edge sits at `value`
    pub fn set_top(&mut self, value: f32) {
        self.position.y = value + self.size / 2.0;
    }

    /// Move the body so its bottom edge sits at `value`
    pub fn set_bottom(&mut self, value: f32) {
        self.position.y = value - self.size / 2.0;
    }

    /// World-space outline, computed from shape, position and size
    pub fn vertices(&self) -> Vec<Vec2> {
        vertices_of(&self.shape, self.position, self.size)
    }

    // --- Motion ---

    /// Combined move and push velocity
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.move_velocity + self.push_velocity
    }

    /// Speed of the combined velocity
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity().length()
    }

    /// Heading of the combined velocity (0 when stationary)
    #[inline]
    pub fn movement_angle(&self) -> f32 {
        self.velocity().angle()
    }

    /// Advance this body by one tick of `dt_ms` milliseconds
    ///
    /// Moves by both velocities, then brakes each one toward zero at its own
    /// deceleration, then clamps each one to its own speed limit.
    pub fn step(&mut self, dt_ms: f32) {
        let frames = dt_ms / EXPECTED_TIMESTEP_MS;
        self.position += self.velocity() * frames;

        let seconds = dt_ms / 1000.0;
        self.move_velocity = decelerate(self.move_velocity, self.tuning.move_deceleration * seconds);
        self.push_velocity = decelerate(self.push_velocity, self.tuning.push_deceleration * seconds);

        self.move_velocity = limit_speed(self.move_velocity, self.tuning.move_max_speed);
        self.push_velocity = limit_speed(self.push_velocity, self.tuning.push_max_speed);
    }
}

/// Reduce speed by `amount` without reversing direction
fn decelerate(velocity: Vec2, amount: f32) -> Vec2 {
    let speed = velocity.length();
    if speed == 0.0 {
        return velocity;
    }
    // NaN and negative amounts brake nothing
    let amount = amount.max(0.0);
    let new_speed = (speed - amount).max(0.0);
    velocity * (new_speed / speed)
}

/// Clamp speed to `max`; a negative limit means no limit
fn limit_speed(velocity: Vec2, max: f32) -> Vec2 {
    if max < 0.0 {
        velocity
    } else {
        velocity.clamp_length(max)
    }
}
