//! Entity kinds and serializable entity templates
//!
//! Levels are laid out on a tile grid. A template names a kind and a grid
//! cell; spawning turns it into a body plus a behavior.

use pullshot_math::Vec2;
use pullshot_physics::{Body, Shape};
use serde::{Serialize, Deserialize};

use crate::behavior::Behavior;
use crate::behaviors::{Coin, Enemy, Goal, Hero, Inert, Shot};
use crate::settings::GameSettings;

/// The kinds of entity a level can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player character
    Hero,
    /// Chases and rams the hero
    Enemy,
    /// Inert movable circle
    Ball,
    /// Collectible worth points
    Coin,
    /// Level exit
    Goal,
    /// Projectile
    Shot,
    /// Immovable rectangle of tiles
    Wall,
}

/// Center of grid cell (`col`, `row`)
pub fn tile_center(col: i32, row: i32, tile_size: f32) -> Vec2 {
    Vec2::new(
        col as f32 * tile_size + tile_size / 2.0,
        row as f32 * tile_size + tile_size / 2.0,
    )
}

fn one() -> u32 {
    1
}

/// A serializable entity template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub kind: EntityKind,
    /// Grid column of the top-left cell
    pub col: i32,
    /// Grid row of the top-left cell
    pub row: i32,
    /// Width in tiles (walls only)
    #[serde(default = "one")]
    pub cols: u32,
    /// Height in tiles (walls only)
    #[serde(default = "one")]
    pub rows: u32,
}

impl EntityTemplate {
    /// Create a single-cell template
    pub fn new(kind: EntityKind, col: i32, row: i32) -> Self {
        Self {
            kind,
            col,
            row,
            cols: 1,
            rows: 1,
        }
    }

    /// Create a wall spanning `cols` by `rows` tiles
    pub fn wall(col: i32, row: i32, cols: u32, rows: u32) -> Self {
        Self {
            kind: EntityKind::Wall,
            col,
            row,
            cols,
            rows,
        }
    }

    /// Build the physics body for this template
    pub fn to_body(&self, settings: &GameSettings) -> Body {
        let tile = settings.tile_size;
        let center = tile_center(self.col, self.row, tile);

        let body = match self.kind {
            EntityKind::Hero | EntityKind::Enemy | EntityKind::Ball => Body::circle(center, tile),
            EntityKind::Coin => Body::circle(center, tile).with_solid(false),
            EntityKind::Goal => Body::circle(center, tile * 2.0)
                .with_solid(false)
                .with_movable(false),
            EntityKind::Shot => return Shot::body(center, 0.0, 0.0, settings),
            EntityKind::Wall => {
                let width = self.cols.max(1) as f32 * tile;
                let height = self.rows.max(1) as f32 * tile;
                let center = Vec2::new(
                    self.col as f32 * tile + width / 2.0,
                    self.row as f32 * tile + height / 2.0,
                );
                Body::new(Shape::rectangle(width, height), center, width.max(height))
                    .with_movable(false)
            }
        };

        body.with_ratios(&settings.motion).with_mass(settings.mass)
    }

    /// Build the behavior for this template
    pub fn to_behavior(&self, settings: &GameSettings) -> Box<dyn Behavior> {
        match self.kind {
            EntityKind::Hero => Box::new(Hero::new(settings)),
            EntityKind::Enemy => Box::new(Enemy::new(settings)),
            EntityKind::Coin => Box::new(Coin::new()),
            EntityKind::Goal => Box::new(Goal),
            EntityKind::Shot => Box::new(Shot::new(None)),
            EntityKind::Ball | EntityKind::Wall => Box::new(Inert(self.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center() {
        assert_eq!(tile_center(0, 0, 64.0), Vec2::new(32.0, 32.0));
        assert_eq!(tile_center(11, 1, 64.0), Vec2::new(736.0, 96.0));
    }

    #[test]
    fn test_hero_body() {
        let settings = GameSettings::default();
        let body = EntityTemplate::new(EntityKind::Hero, 11, 1).to_body(&settings);
        assert!(body.shape.is_circle());
        assert_eq!(body.position, Vec2::new(736.0, 96.0));
        assert_eq!(body.size, 64.0);
        assert!(body.is_solid() && body.is_movable());
        assert_eq!(body.mass, 2.0);
        assert_eq!(body.tuning.move_max_speed, 16.0);
    }

    #[test]
    fn test_coin_and_goal_are_not_solid() {
        let settings = GameSettings::default();
        let coin = EntityTemplate::new(EntityKind::Coin, 0, 0).to_body(&settings);
        let goal = EntityTemplate::new(EntityKind::Goal, 19, 3).to_body(&settings);
        assert!(!coin.is_solid());
        assert!(!goal.is_solid());
        assert_eq!(goal.size, 128.0);
    }

    #[test]
    fn test_wall_spans_its_tiles() {
        let settings = GameSettings::default();
        let wall = EntityTemplate::wall(1, 0, 21, 1).to_body(&settings);

        assert!(!wall.is_movable());
        assert!(wall.is_solid());
        let vertices = wall.vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0], Vec2::new(64.0, 0.0));
        assert_eq!(vertices[2], Vec2::new(22.0 * 64.0, 64.0));
    }

    #[test]
    fn test_behavior_kind_matches_template() {
        let settings = GameSettings::default();
        for kind in [
            EntityKind::Hero,
            EntityKind::Enemy,
            EntityKind::Ball,
            EntityKind::Coin,
            EntityKind::Goal,
            EntityKind::Shot,
            EntityKind::Wall,
        ] {
            let behavior = EntityTemplate::new(kind, 0, 0).to_behavior(&settings);
            assert_eq!(behavior.kind(), kind);
        }
    }

    #[test]
    fn test_template_ron_defaults_span() {
        let template: EntityTemplate = ron::from_str("(kind: Coin, col: 4, row: 5)").unwrap();
        assert_eq!(template, EntityTemplate::new(EntityKind::Coin, 4, 5));
    }
}
