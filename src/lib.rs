//! Pullshot application layer
//!
//! Configuration loading and the frame-driven simulation system that feeds
//! clock deltas into a [`pullshot_game::Game`].

pub mod config;
pub mod systems;
