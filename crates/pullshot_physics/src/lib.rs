//! 2D Physics simulation for Pullshot
//!
//! This crate provides the physics core of the game, including:
//! - Body state with separate self-driven and pushed velocities
//! - Shape geometry (vertices, edge normals, axis projections)
//! - Collision detection (exact circle-circle, SAT for polygons)
//! - Collision response (positional correction and elastic momentum exchange)
//! - A physics world that steps every body and scans every pair once per tick

pub mod body;
pub mod collision;
pub mod resolver;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{Body, BodyFlags, BodyKey, MotionRatios, MotionTuning, EXPECTED_FRAMES_PER_SECOND, EXPECTED_TIMESTEP_MS};
pub use collision::{check_collision, correction_shares, Collision};
pub use resolver::{mirror_bounce, post_collision_motion, resolve, MotionChange, PostCollisionMotion};
pub use shapes::{edge_normals, project_onto_axis, vertices_of, Projection, Shape};
pub use world::{Contact, NoHooks, PhysicsWorld, StepHooks, StepReport};
