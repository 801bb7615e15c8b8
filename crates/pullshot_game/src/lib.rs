//! Gameplay for Pullshot
//!
//! This crate turns physics bodies into a playable level:
//!
//! - [`Game`] - A running session: bodies, behaviors, score and victory
//! - [`Level`] - Loadable/saveable level made of entity templates
//! - [`EntityTemplate`] - Serializable entity on the tile grid
//! - [`Behavior`] - Per-kind reactions to ticks and collisions
//! - [`Action`] - What an acting entity is doing (idle, moving, dashing)
//! - [`GameSettings`] - Tunables shared by every entity

mod action;
mod behavior;
mod behaviors;
mod entity;
mod game;
mod level;
mod settings;
mod timers;

pub use action::{Action, DashLimit, DashPhase, DashProfile, Intent};
pub use behavior::{Behavior, BehaviorContext, Encounter, GameEvent, WorldView};
pub use behaviors::{Coin, Enemy, Goal, Hero, Inert, Shot};
pub use entity::{tile_center, EntityKind, EntityTemplate};
pub use game::{Game, GameError, Outline};
pub use level::{Level, LevelLoadError, LevelSaveError};
pub use settings::GameSettings;
pub use timers::Countdown;

// Re-export physics types for convenient access through pullshot_game
pub use pullshot_math::Vec2;
pub use pullshot_physics::{Body, BodyKey, MotionRatios, PhysicsWorld};
