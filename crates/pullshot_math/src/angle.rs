//! Angle helpers
//!
//! Rotations are in radians, measured clockwise on screen (y grows downward),
//! and kept in the half-open range (-π, π].

use std::f32::consts::{PI, TAU};

use serde::{Serialize, Deserialize};

/// Named compass rotations in radians
pub mod rotations {
    use std::f32::consts::PI;

    pub const EAST: f32 = 0.0;
    pub const SOUTHEAST: f32 = PI * 0.25;
    pub const SOUTH: f32 = PI * 0.5;
    pub const SOUTHWEST: f32 = PI * 0.75;
    pub const WEST: f32 = PI;
    pub const NORTHWEST: f32 = PI * -0.75;
    pub const NORTH: f32 = PI * -0.5;
    pub const NORTHEAST: f32 = PI * -0.25;

    /// The eight compass rotations, starting east and turning clockwise
    pub const COMPASS: [f32; 8] = [
        EAST, SOUTHEAST, SOUTH, SOUTHWEST, WEST, NORTHWEST, NORTH, NORTHEAST,
    ];
}

/// Wrap an angle into (-π, π]
///
/// Non-finite input is returned unchanged.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Cardinal facing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    /// Cardinal direction closest to a rotation
    ///
    /// Exact diagonals resolve to East or West.
    pub fn from_rotation(rotation: f32) -> Self {
        let r = normalize_angle(rotation);
        if (-PI * 0.25..=PI * 0.25).contains(&r) {
            Direction::East
        } else if r > PI * 0.25 && r < PI * 0.75 {
            Direction::South
        } else if r < PI * -0.25 && r > PI * -0.75 {
            Direction::North
        } else {
            Direction::West
        }
    }

    /// Rotation pointing in this direction
    pub fn rotation(self) -> f32 {
        match self {
            Direction::East => rotations::EAST,
            Direction::South => rotations::SOUTH,
            Direction::West => rotations::WEST,
            Direction::North => rotations::NORTH,
        }
    }
}
