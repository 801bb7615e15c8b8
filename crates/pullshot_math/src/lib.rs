//! 2D Mathematics Library
//!
//! This crate provides the small amount of vector math the Pullshot engine needs.
//!
//! ## Core Types
//!
//! - [`Vec2`] - 2D vector with x, y components (screen space, y grows downward)
//! - [`Direction`] - Cardinal facing derived from a rotation
//!
//! ## Angles
//!
//! - [`normalize_angle`] - Wrap an angle into (-π, π]
//! - [`rotations`] - Named compass rotations

mod vec2;
pub mod angle;

pub use vec2::Vec2;
pub use angle::{normalize_angle, rotations, Direction};
