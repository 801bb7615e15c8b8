//! Behaviors for each entity kind

use pullshot_math::Vec2;
use pullshot_physics::{Body, BodyKey};

use crate::action::{Action, DashProfile, Intent};
use crate::behavior::{Behavior, BehaviorContext, Encounter, GameEvent, WorldView};
use crate::entity::EntityKind;
use crate::settings::GameSettings;
use crate::timers::Countdown;

/// The player character
///
/// Acts on intents set from outside, gets hurt by enemies and other
/// bodies' shots, and is drawn into a goal while touching it.
#[derive(Debug)]
pub struct Hero {
    health: u32,
    intent: Option<Intent>,
    action: Action,
    invulnerable: Countdown,
    invulnerability_ms: f32,
}

impl Hero {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            health: settings.hero_health,
            intent: None,
            action: Action::Idle,
            invulnerable: Countdown::IDLE,
            invulnerability_ms: settings.invulnerability_ms,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable.is_running()
    }

    fn take_hit(&mut self, ctx: &mut BehaviorContext) {
        if self.health == 0 || self.invulnerable.is_running() {
            return;
        }
        self.health -= 1;
        self.invulnerable.reset(self.invulnerability_ms);
        log::debug!("Hero hit, {} health left", self.health);

        ctx.emit(GameEvent::HeroDamaged {
            health: self.health,
        });
        if self.health == 0 {
            ctx.emit(GameEvent::HeroDefeated);
        }
    }
}

impl Behavior for Hero {
    fn kind(&self) -> EntityKind {
        EntityKind::Hero
    }

    fn set_intent(&mut self, intent: Option<Intent>) {
        self.intent = intent;
    }

    fn on_step(&mut self, body: &mut Body, dt_ms: f32, _ctx: &mut BehaviorContext) {
        self.invulnerable.tick(dt_ms);
        self.action.process_intent(self.intent, body.rotation());
        self.action.perform(body, dt_ms, &DashProfile::HERO);
    }

    fn on_collision(&mut self, body: &mut Body, encounter: &Encounter, ctx: &mut BehaviorContext) {
        match encounter.other_kind {
            Some(EntityKind::Enemy) => self.take_hit(ctx),
            Some(EntityKind::Shot) if encounter.other_source != Some(encounter.key) => {
                self.take_hit(ctx)
            }
            Some(EntityKind::Goal) => {
                // Steer into the middle of the goal
                let to_goal = encounter.other.position - body.position;
                let max_speed = body.tuning.move_max_speed;
                body.move_velocity = if max_speed < 0.0 {
                    to_goal
                } else {
                    to_goal.clamp_length(max_speed)
                };
            }
            _ => {}
        }
    }

    fn action(&self) -> Option<Action> {
        Some(self.action)
    }

    fn health(&self) -> Option<u32> {
        Some(self.health)
    }
}

/// Chases the hero on sight and dashes when close
#[derive(Debug)]
pub struct Enemy {
    intent: Option<Intent>,
    action: Action,
    sight_tiles: f32,
    dash_tiles: f32,
}

impl Enemy {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            intent: None,
            action: Action::Idle,
            sight_tiles: settings.enemy_sight_tiles,
            dash_tiles: settings.enemy_dash_tiles,
        }
    }
}

impl Behavior for Enemy {
    fn kind(&self) -> EntityKind {
        EntityKind::Enemy
    }

    fn compute_intent(&mut self, body: &Body, view: &WorldView) {
        self.intent = view.hero_position.and_then(|hero| {
            let toward = hero - body.position;
            let distance = toward.length();
            if distance <= self.dash_tiles * view.tile_size {
                Some(Intent::Dash { direction: toward })
            } else if distance <= self.sight_tiles * view.tile_size {
                Some(Intent::Move { direction: toward })
            } else {
                None
            }
        });
    }

    fn set_intent(&mut self, intent: Option<Intent>) {
        self.intent = intent;
    }

    fn on_step(&mut self, body: &mut Body, dt_ms: f32, _ctx: &mut BehaviorContext) {
        self.action.process_intent(self.intent, body.rotation());
        self.action.perform(body, dt_ms, &DashProfile::ENEMY);
    }

    fn action(&self) -> Option<Action> {
        Some(self.action)
    }
}

/// Collectible that vanishes shortly after the hero touches it
#[derive(Debug, Default)]
pub struct Coin {
    picked_up: bool,
    expiry: Countdown,
}

impl Coin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up
    }
}

impl Behavior for Coin {
    fn kind(&self) -> EntityKind {
        EntityKind::Coin
    }

    fn on_step(&mut self, body: &mut Body, dt_ms: f32, _ctx: &mut BehaviorContext) {
        if self.picked_up && self.expiry.tick(dt_ms) {
            body.expire();
        }
    }

    fn on_collision(&mut self, body: &mut Body, encounter: &Encounter, ctx: &mut BehaviorContext) {
        if self.picked_up || !ctx.is_hero(encounter.other_key) {
            return;
        }
        self.picked_up = true;
        self.expiry.reset(ctx.settings().coin_expiry_ms);
        if self.expiry.is_finished() {
            body.expire();
        }
        log::debug!("Coin {:?} picked up", encounter.key);
        ctx.emit(GameEvent::CoinCollected { coin: encounter.key });
    }

    fn is_visible(&self) -> bool {
        !self.picked_up
    }
}

/// Level exit
#[derive(Debug)]
pub struct Goal;

impl Behavior for Goal {
    fn kind(&self) -> EntityKind {
        EntityKind::Goal
    }

    fn on_collision(&mut self, _body: &mut Body, encounter: &Encounter, ctx: &mut BehaviorContext) {
        if ctx.is_hero(encounter.other_key) {
            ctx.emit(GameEvent::GoalReached { goal: encounter.key });
        }
    }
}

/// Projectile that breaks on the first solid body it hits, other than
/// whoever fired it
#[derive(Debug)]
pub struct Shot {
    source: Option<BodyKey>,
}

impl Shot {
    pub fn new(source: Option<BodyKey>) -> Self {
        Self { source }
    }

    /// Half-tile circle at `position` flying along `rotation` at `speed`
    ///
    /// Shots do not slow down on their own.
    pub fn body(position: Vec2, rotation: f32, speed: f32, settings: &GameSettings) -> Body {
        let mut body = Body::circle(position, settings.tile_size / 2.0)
            .with_ratios(&settings.motion)
            .with_mass(settings.mass)
            .with_rotation(rotation)
            .with_move_velocity(Vec2::from_angle(rotation, speed));
        body.tuning.move_deceleration = 0.0;
        body.tuning.move_max_speed = settings.tile_size * settings.motion.move_max_speed;
        body
    }
}

impl Behavior for Shot {
    fn kind(&self) -> EntityKind {
        EntityKind::Shot
    }

    fn on_collision(&mut self, body: &mut Body, encounter: &Encounter, _ctx: &mut BehaviorContext) {
        if encounter.other.is_solid() && self.source != Some(encounter.other_key) {
            body.expire();
        }
    }

    fn source(&self) -> Option<BodyKey> {
        self.source
    }
}

/// Kinds that only take part in physics (balls and walls)
#[derive(Debug)]
pub struct Inert(pub EntityKind);

impl Behavior for Inert {
    fn kind(&self) -> EntityKind {
        self.0
    }
}
