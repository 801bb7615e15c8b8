//! The per-kind behavior seam
//!
//! Every entity is a plain [`Body`] in the physics world plus a boxed
//! [`Behavior`] that reacts to ticks and collisions. Behaviors never see the
//! whole game; they get a read-only [`WorldView`] and an event sink.

use pullshot_math::Vec2;
use pullshot_physics::{Body, BodyKey};

use crate::action::{Action, Intent};
use crate::entity::EntityKind;
use crate::settings::GameSettings;

/// Something a behavior reports back to the game session
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// The hero touched a coin for the first time
    CoinCollected { coin: BodyKey },
    /// The hero lost a point of health
    HeroDamaged { health: u32 },
    /// The hero ran out of health
    HeroDefeated,
    /// The hero reached a goal
    GoalReached { goal: BodyKey },
}

/// Read-only snapshot used to choose intents
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldView {
    pub hero: Option<BodyKey>,
    pub hero_position: Option<Vec2>,
    pub tile_size: f32,
}

/// What a behavior may touch while the world steps
pub struct BehaviorContext<'a> {
    hero: Option<BodyKey>,
    settings: &'a GameSettings,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> BehaviorContext<'a> {
    pub fn new(hero: Option<BodyKey>, settings: &'a GameSettings, events: &'a mut Vec<GameEvent>) -> Self {
        Self {
            hero,
            settings,
            events,
        }
    }

    /// Whether `key` is the hero's body
    pub fn is_hero(&self, key: BodyKey) -> bool {
        self.hero == Some(key)
    }

    pub fn settings(&self) -> &GameSettings {
        self.settings
    }

    /// Report an event to the game session
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// The other side of a collision, as seen by one body
pub struct Encounter<'a> {
    /// This body's key
    pub key: BodyKey,
    pub other_key: BodyKey,
    /// The other body as it was when the pair was tested
    pub other: &'a Body,
    /// `None` for bodies with no behavior attached
    pub other_kind: Option<EntityKind>,
    /// Who fired the other body, if it is a projectile
    pub other_source: Option<BodyKey>,
    /// Where the collision put this body
    pub corrected: Vec2,
}

/// Per-kind reactions of an entity
///
/// All hooks default to doing nothing.
pub trait Behavior {
    fn kind(&self) -> EntityKind;

    /// Choose this tick's intent, before anything moves
    fn compute_intent(&mut self, _body: &Body, _view: &WorldView) {}

    /// Replace the intent from outside (player input)
    fn set_intent(&mut self, _intent: Option<Intent>) {}

    /// Called once per tick right after the body was integrated
    fn on_step(&mut self, _body: &mut Body, _dt_ms: f32, _ctx: &mut BehaviorContext) {}

    /// Called when this body overlaps another
    fn on_collision(&mut self, _body: &mut Body, _encounter: &Encounter, _ctx: &mut BehaviorContext) {}

    /// Current action, for kinds that act
    fn action(&self) -> Option<Action> {
        None
    }

    /// Remaining health, for kinds that can be hurt
    fn health(&self) -> Option<u32> {
        None
    }

    /// Who fired this body, for projectiles
    fn source(&self) -> Option<BodyKey> {
        None
    }

    /// Whether a renderer should draw this entity
    fn is_visible(&self) -> bool {
        true
    }
}
