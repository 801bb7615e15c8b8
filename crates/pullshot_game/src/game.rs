//! Game session
//!
//! Owns the physics world and one behavior per body, and turns the events
//! those behaviors emit into score, damage and victory.

use std::path::Path;

use pullshot_math::Vec2;
use pullshot_physics::{Body, BodyKey, PhysicsWorld, StepHooks};
use slotmap::SecondaryMap;

use crate::action::Intent;
use crate::behavior::{Behavior, BehaviorContext, Encounter, GameEvent, WorldView};
use crate::behaviors::{Inert, Shot};
use crate::entity::{EntityKind, EntityTemplate};
use crate::level::{Level, LevelLoadError};
use crate::settings::GameSettings;
use crate::timers::Countdown;

/// Error from a game session operation
#[derive(Debug)]
pub enum GameError {
    /// The level has no hero, or the hero is gone
    NoHero,
    /// The level file could not be loaded
    LevelLoad(LevelLoadError),
}

impl From<LevelLoadError> for GameError {
    fn from(e: LevelLoadError) -> Self {
        GameError::LevelLoad(e)
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::NoHero => write!(f, "No hero in the level"),
            GameError::LevelLoad(e) => write!(f, "Level load error: {}", e),
        }
    }
}

impl std::error::Error for GameError {}

/// World-space outline of one entity, for drawing
#[derive(Clone, Debug, PartialEq)]
pub struct Outline {
    pub key: BodyKey,
    pub kind: EntityKind,
    pub vertices: Vec<Vec2>,
    pub solid: bool,
}

impl Outline {
    /// Vertices as raw bytes, ready for a vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Routes physics callbacks to the behavior attached to each body
struct BehaviorHooks<'a> {
    behaviors: &'a mut SecondaryMap<BodyKey, Box<dyn Behavior>>,
    hero: Option<BodyKey>,
    settings: &'a GameSettings,
    events: Vec<GameEvent>,
}

impl StepHooks for BehaviorHooks<'_> {
    fn on_step(&mut self, key: BodyKey, body: &mut Body, dt_ms: f32) {
        if let Some(behavior) = self.behaviors.get_mut(key) {
            let mut ctx = BehaviorContext::new(self.hero, self.settings, &mut self.events);
            behavior.on_step(body, dt_ms, &mut ctx);
        }
    }

    fn on_collision(
        &mut self,
        key: BodyKey,
        body: &mut Body,
        other_key: BodyKey,
        other: &Body,
        corrected: Vec2,
    ) {
        let (other_kind, other_source) = match self.behaviors.get(other_key) {
            Some(behavior) => (Some(behavior.kind()), behavior.source()),
            None => (None, None),
        };
        let encounter = Encounter {
            key,
            other_key,
            other,
            other_kind,
            other_source,
            corrected,
        };

        if let Some(behavior) = self.behaviors.get_mut(key) {
            let mut ctx = BehaviorContext::new(self.hero, self.settings, &mut self.events);
            behavior.on_collision(body, &encounter, &mut ctx);
        }
    }
}

/// A running game: one level, its bodies, and the scoreboard
pub struct Game {
    settings: GameSettings,
    physics: PhysicsWorld,
    behaviors: SecondaryMap<BodyKey, Box<dyn Behavior>>,
    level: Level,
    hero: Option<BodyKey>,
    score: i32,
    best_score: Option<i32>,
    victory: bool,
    victory_countdown: Countdown,
    defeated: bool,
    ticks: u64,
}

impl Game {
    /// Create a session with no level loaded
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            physics: PhysicsWorld::new(),
            behaviors: SecondaryMap::new(),
            level: Level::new("empty"),
            hero: None,
            score: 0,
            best_score: None,
            victory: false,
            victory_countdown: Countdown::IDLE,
            defeated: false,
            ticks: 0,
        }
    }

    /// Create a session and load a level into it
    pub fn with_level(settings: GameSettings, level: Level) -> Result<Self, GameError> {
        let mut game = Self::new(settings);
        game.load_level(level)?;
        Ok(game)
    }

    /// Replace the world with the contents of `level`
    ///
    /// Score, victory and menu state are reset. Fails if the level has no
    /// hero; the world is left empty and the previous level is kept for
    /// [`Game::reload`] in that case.
    pub fn load_level(&mut self, level: Level) -> Result<(), GameError> {
        self.physics.clear();
        self.physics.set_paused(false);
        self.behaviors.clear();
        self.hero = None;
        self.score = 0;
        self.victory = false;
        self.victory_countdown = Countdown::IDLE;
        self.defeated = false;
        self.ticks = 0;

        for template in &level.entities {
            self.spawn(template);
        }
        if self.hero.is_none() {
            self.physics.clear();
            self.behaviors.clear();
            log::warn!("Level '{}' has no hero", level.name);
            return Err(GameError::NoHero);
        }

        log::info!(
            "Loaded level '{}' with {} entities",
            level.name,
            self.physics.body_count()
        );
        self.level = level;
        Ok(())
    }

    /// Load a level from a RON file
    pub fn load_level_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GameError> {
        let level = Level::load(path)?;
        self.load_level(level)
    }

    /// Restart the current level from scratch
    pub fn reload(&mut self) -> Result<(), GameError> {
        self.load_level(self.level.clone())
    }

    /// Add one entity from a template and return its body key
    pub fn spawn(&mut self, template: &EntityTemplate) -> BodyKey {
        let key = self.physics.add_body(template.to_body(&self.settings));

        // Extra heroes keep their body but act as plain balls
        let behavior: Box<dyn Behavior> = match (template.kind, self.hero) {
            (EntityKind::Hero, None) => {
                self.hero = Some(key);
                template.to_behavior(&self.settings)
            }
            (EntityKind::Hero, Some(_)) => {
                log::warn!("Level has more than one hero, using the first");
                Box::new(Inert(EntityKind::Hero))
            }
            _ => template.to_behavior(&self.settings),
        };
        self.behaviors.insert(key, behavior);
        key
    }

    /// Fire a shot from the edge of `source` along `rotation`
    ///
    /// Returns `None` if the source body no longer exists.
    pub fn spawn_shot(&mut self, source: BodyKey, rotation: f32, speed: f32) -> Option<BodyKey> {
        let origin = self.physics.get_body(source)?;
        let offset = origin.radius() + self.settings.tile_size / 4.0;
        let position = origin.position + Vec2::from_angle(rotation, offset);

        let body = Shot::body(position, rotation, speed, &self.settings);
        let key = self.physics.add_body(body);
        self.behaviors.insert(key, Box::new(Shot::new(Some(source))));
        Some(key)
    }

    /// Pull-and-release launch of the hero
    ///
    /// `pull` runs from the hero to where the pointer was released. The hero
    /// is pushed the opposite way, at full move speed for a pull of
    /// `max_pull_tiles` or more and proportionally slower below that. Every
    /// launch costs a point.
    pub fn launch(&mut self, pull: Vec2) -> Result<(), GameError> {
        let hero_key = self.hero.ok_or(GameError::NoHero)?;
        let max_pull = self.settings.max_pull_distance();
        let hero = self.physics.get_body_mut(hero_key).ok_or(GameError::NoHero)?;

        let max_speed = hero.tuning.move_max_speed;
        let speed = if max_pull > 0.0 {
            (pull.length() / max_pull * max_speed).min(max_speed)
        } else {
            max_speed
        };
        hero.push_velocity = (-pull).with_length(speed);
        self.score -= 1;

        log::debug!("Launched hero at speed {:.2}, score {}", speed, self.score);
        Ok(())
    }

    /// Set the hero's intent for the coming ticks
    pub fn set_hero_intent(&mut self, intent: Option<Intent>) -> Result<(), GameError> {
        let hero_key = self.hero.ok_or(GameError::NoHero)?;
        let behavior = self.behaviors.get_mut(hero_key).ok_or(GameError::NoHero)?;
        behavior.set_intent(intent);
        Ok(())
    }

    /// Advance the game by `dt_ms` milliseconds
    ///
    /// Nothing happens while the menu is open. Returns the events raised
    /// during the tick.
    pub fn step(&mut self, dt_ms: f32) -> Vec<GameEvent> {
        if self.physics.is_paused() {
            return Vec::new();
        }
        self.ticks += 1;

        // Intents are chosen from where everything was before this tick
        let view = WorldView {
            hero: self.hero,
            hero_position: self.hero_body().map(|b| b.position),
            tile_size: self.settings.tile_size,
        };
        for (key, behavior) in self.behaviors.iter_mut() {
            if let Some(body) = self.physics.get_body(key) {
                behavior.compute_intent(body, &view);
            }
        }

        let mut hooks = BehaviorHooks {
            behaviors: &mut self.behaviors,
            hero: self.hero,
            settings: &self.settings,
            events: Vec::new(),
        };
        let report = self.physics.step_with(dt_ms, &mut hooks);
        let events = hooks.events;

        for key in report.removed {
            self.behaviors.remove(key);
            if self.hero == Some(key) {
                log::warn!("Hero body was removed");
                self.hero = None;
            }
        }

        for event in &events {
            self.apply_event(event);
        }

        if self.victory && self.victory_countdown.is_finished() {
            self.set_menu_open(true);
        }
        self.victory_countdown.tick(dt_ms);

        events
    }

    fn apply_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::CoinCollected { .. } => {
                self.score += self.settings.coin_value;
            }
            GameEvent::HeroDamaged { health } => {
                log::info!("Hero damaged, {} health left", health);
            }
            GameEvent::HeroDefeated => {
                if !self.defeated {
                    log::info!("Hero defeated");
                    self.defeated = true;
                    self.set_menu_open(true);
                }
            }
            GameEvent::GoalReached { .. } => self.celebrate_victory(),
        }
    }

    fn celebrate_victory(&mut self) {
        if self.victory {
            return;
        }
        self.victory = true;
        self.victory_countdown.reset(self.settings.victory_duration_ms());
        self.best_score = Some(self.best_score.map_or(self.score, |best| best.max(self.score)));
        log::info!("Victory with {} points", self.score);
    }

    // --- State ---

    /// Open or close the menu; the world is frozen while it is open
    pub fn set_menu_open(&mut self, open: bool) {
        self.physics.set_paused(open);
    }

    pub fn is_menu_open(&self) -> bool {
        self.physics.is_paused()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    /// Best score reached on any victory this session
    pub fn best_score(&self) -> Option<i32> {
        self.best_score
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    /// Time left before the victory menu opens
    pub fn victory_countdown(&self) -> Countdown {
        self.victory_countdown
    }

    /// Ticks run since the level was loaded
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn hero_key(&self) -> Option<BodyKey> {
        self.hero
    }

    pub fn hero_body(&self) -> Option<&Body> {
        self.hero.and_then(|key| self.physics.get_body(key))
    }

    pub fn hero_health(&self) -> Option<u32> {
        self.hero
            .and_then(|key| self.behaviors.get(key))
            .and_then(|behavior| behavior.health())
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    /// Behavior attached to a body
    pub fn behavior(&self, key: BodyKey) -> Option<&dyn Behavior> {
        self.behaviors.get(key).map(|b| b.as_ref())
    }

    pub fn entity_kind(&self, key: BodyKey) -> Option<EntityKind> {
        self.behaviors.get(key).map(|b| b.kind())
    }

    /// Outlines of every visible entity
    pub fn outlines(&self) -> Vec<Outline> {
        self.physics
            .bodies()
            .filter_map(|(key, body)| {
                let behavior = self.behaviors.get(key)?;
                if !behavior.is_visible() {
                    return None;
                }
                Some(Outline {
                    key,
                    kind: behavior.kind(),
                    vertices: body.vertices(),
                    solid: body.is_solid(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_level() -> Level {
        Level::new("tiny")
            .with_entity(EntityTemplate::new(EntityKind::Hero, 2, 2))
            .with_entity(EntityTemplate::new(EntityKind::Goal, 12, 2))
    }

    #[test]
    fn test_load_level_requires_hero() {
        let mut game = Game::new(GameSettings::default());
        let result = game.load_level(Level::new("empty").with_entity(EntityTemplate::wall(0, 0, 2, 1)));
        assert!(matches!(result, Err(GameError::NoHero)));
        assert_eq!(game.physics().body_count(), 0);
    }

    #[test]
    fn test_load_default_level() {
        let game = Game::with_level(GameSettings::default(), Level::default_level()).unwrap();
        assert_eq!(game.physics().body_count(), 8);
        assert_eq!(game.hero_health(), Some(3));
        assert_eq!(game.hero_body().unwrap().position, Vec2::new(736.0, 96.0));
        assert_eq!(game.score(), 0);
        assert!(!game.is_menu_open());
    }

    #[test]
    fn test_failed_load_keeps_previous_level() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();

        let result = game.load_level(Level::new("heroless").with_entity(EntityTemplate::wall(0, 0, 1, 1)));
        assert!(matches!(result, Err(GameError::NoHero)));
        assert_eq!(game.level().name, "tiny");

        game.reload().unwrap();
        assert_eq!(game.physics().body_count(), 2);
        assert!(game.hero_key().is_some());
    }

    #[test]
    fn test_extra_heroes_are_inert() {
        let level = tiny_level().with_entity(EntityTemplate::new(EntityKind::Hero, 6, 6));
        let game = Game::with_level(GameSettings::default(), level).unwrap();

        let extra = game
            .physics()
            .bodies()
            .map(|(key, _)| key)
            .find(|&key| key != game.hero_key().unwrap() && game.entity_kind(key) == Some(EntityKind::Hero))
            .unwrap();
        let behavior = game.behavior(extra).unwrap();
        assert_eq!(behavior.health(), None);
        assert_eq!(behavior.action(), None);
        assert_eq!(game.hero_health(), Some(3));
    }

    #[test]
    fn test_launch_pushes_opposite_the_pull() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();

        // Half the maximum pull, toward the west
        game.launch(Vec2::new(-192.0, 0.0)).unwrap();

        let hero = game.hero_body().unwrap();
        assert!((hero.push_velocity.x - 8.0).abs() < 1e-4);
        assert!(hero.push_velocity.y.abs() < 1e-4);
        assert_eq!(game.score(), -1);
    }

    #[test]
    fn test_launch_speed_is_capped() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();
        game.launch(Vec2::new(0.0, 5000.0)).unwrap();

        let hero = game.hero_body().unwrap();
        assert!((hero.push_velocity.y + 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_launch_without_hero() {
        let mut game = Game::new(GameSettings::default());
        assert!(matches!(game.launch(Vec2::X), Err(GameError::NoHero)));
        assert!(matches!(game.set_hero_intent(None), Err(GameError::NoHero)));
    }

    #[test]
    fn test_menu_freezes_the_world() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();
        game.launch(Vec2::new(-100.0, 0.0)).unwrap();
        game.set_menu_open(true);

        let before = game.hero_body().unwrap().position;
        assert!(game.step(1000.0).is_empty());
        assert_eq!(game.hero_body().unwrap().position, before);
        assert_eq!(game.ticks(), 0);

        game.set_menu_open(false);
        game.step(16.0);
        assert_ne!(game.hero_body().unwrap().position, before);
    }

    #[test]
    fn test_spawn_shot_from_source() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();
        let hero = game.hero_key().unwrap();

        let shot = game.spawn_shot(hero, 0.0, 8.0).unwrap();

        assert_eq!(game.entity_kind(shot), Some(EntityKind::Shot));
        assert_eq!(game.behavior(shot).unwrap().source(), Some(hero));
        let body = game.physics().get_body(shot).unwrap();
        assert_eq!(body.position, Vec2::new(160.0 + 48.0, 160.0));
    }

    #[test]
    fn test_outlines_skip_hidden_entities() {
        let level = tiny_level().with_entity(EntityTemplate::new(EntityKind::Coin, 2, 2));
        let mut game = Game::with_level(GameSettings::default(), level).unwrap();
        assert_eq!(game.outlines().len(), 3);

        // The coin shares the hero's tile and is picked up on the first tick
        let events = game.step(0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::CoinCollected { .. })));
        assert_eq!(game.outlines().len(), 2);

        let hero_outline = game
            .outlines()
            .into_iter()
            .find(|o| o.kind == EntityKind::Hero)
            .unwrap();
        assert_eq!(hero_outline.vertices.len(), 8);
        assert_eq!(hero_outline.vertex_bytes().len(), 8 * 8);
    }

    #[test]
    fn test_reload_restores_level() {
        let mut game = Game::with_level(GameSettings::default(), tiny_level()).unwrap();
        game.launch(Vec2::new(-100.0, 0.0)).unwrap();
        game.step(100.0);

        game.reload().unwrap();

        assert_eq!(game.score(), 0);
        assert_eq!(game.hero_body().unwrap().position, Vec2::new(160.0, 160.0));
        assert_eq!(game.hero_body().unwrap().push_velocity, Vec2::ZERO);
    }
}
