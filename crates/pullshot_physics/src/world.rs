//! Physics world and simulation

use pullshot_math::Vec2;
use slotmap::SlotMap;

use crate::body::{Body, BodyKey};
use crate::collision::{check_collision, Collision};
use crate::resolver::resolve;

/// Callbacks invoked by [`PhysicsWorld::step_with`]
///
/// Every method has an empty default, so implementors only override what
/// they react to.
pub trait StepHooks {
    /// Called for each body right after it has been integrated
    fn on_step(&mut self, _key: BodyKey, _body: &mut Body, _dt_ms: f32) {}

    /// Called for each body of an overlapping pair
    ///
    /// By the time this runs `body` already sits at `corrected` and carries
    /// its post-collision push velocity. `other` is the other body as it was
    /// when the pair was tested.
    fn on_collision(
        &mut self,
        _key: BodyKey,
        _body: &mut Body,
        _other_key: BodyKey,
        _other: &Body,
        _corrected: Vec2,
    ) {
    }
}

/// Hooks that do nothing
pub struct NoHooks;

impl StepHooks for NoHooks {}

/// An overlap found during a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub a: BodyKey,
    pub b: BodyKey,
    pub collision: Collision,
}

/// What happened during one step
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Every overlapping pair, in scan order
    pub contacts: Vec<Contact>,
    /// Bodies removed because they expired during the step
    pub removed: Vec<BodyKey>,
}

/// The physics world containing all bodies
#[derive(Default)]
pub struct PhysicsWorld {
    /// All bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, Body>,
    /// While set, steps do nothing
    paused: bool,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: Body) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<Body> {
        self.bodies.remove(key)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all bodies with their keys
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter()
    }

    /// Remove every body
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Step the simulation forward by `dt_ms` milliseconds with no callbacks
    pub fn step(&mut self, dt_ms: f32) -> StepReport {
        self.step_with(dt_ms, &mut NoHooks)
    }

    /// Step the simulation forward by `dt_ms` milliseconds
    ///
    /// This performs:
    /// 1. Integration of every body, each followed by `on_step`
    /// 2. Pairwise collision detection and response
    /// 3. Removal of expired bodies
    ///
    /// Every pair in phase 2 is tested against the positions the bodies had
    /// when phase 1 finished. A correction applied to one pair is not seen
    /// by later pairs in the same step.
    pub fn step_with<H: StepHooks>(&mut self, dt_ms: f32, hooks: &mut H) -> StepReport {
        if self.paused {
            return StepReport::default();
        }

        // Phase 1: Integrate
        for (key, body) in &mut self.bodies {
            body.step(dt_ms);
            hooks.on_step(key, body, dt_ms);
        }

        // Phase 2: Collide
        let contacts = self.resolve_collisions(hooks);

        // Phase 3: Remove expired bodies
        let mut removed = Vec::new();
        self.bodies.retain(|key, body| {
            if body.is_expired() {
                removed.push(key);
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            log::debug!("Removed {} expired bodies", removed.len());
        }

        StepReport { contacts, removed }
    }

    fn resolve_collisions<H: StepHooks>(&mut self, hooks: &mut H) -> Vec<Contact> {
        // Pairs read from this snapshot, corrections go to the live bodies
        let snapshot: Vec<(BodyKey, Body)> = self
            .bodies
            .iter()
            .map(|(key, body)| (key, body.clone()))
            .collect();

        let mut contacts = Vec::new();
        for i in 0..snapshot.len() {
            for j in (i + 1)..snapshot.len() {
                let (key_a, ref body_a) = snapshot[i];
                let (key_b, ref body_b) = snapshot[j];

                let Some(collision) = check_collision(body_a, body_b) else {
                    continue;
                };
                let change = resolve(body_a, body_b, &collision);
                log::trace!(
                    "Contact {:?} / {:?}: depth {:.3}, normal {:?}",
                    key_a,
                    key_b,
                    collision.depth,
                    collision.normal
                );

                if let Some(live) = self.bodies.get_mut(key_a) {
                    live.position = collision.a;
                    if let Some(push) = change.push_a {
                        live.push_velocity = push;
                    }
                    hooks.on_collision(key_a, live, key_b, body_b, collision.a);
                }
                if let Some(live) = self.bodies.get_mut(key_b) {
                    live.position = collision.b;
                    if let Some(push) = change.push_b {
                        live.push_velocity = push;
                    }
                    hooks.on_collision(key_b, live, key_a, body_a, collision.b);
                }

                contacts.push(Contact {
                    a: key_a,
                    b: key_b,
                    collision,
                });
            }
        }
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{MotionTuning, EXPECTED_TIMESTEP_MS};

    fn frictionless_circle(position: Vec2) -> Body {
        Body::circle(position, 2.0).with_tuning(MotionTuning::frictionless())
    }

    #[derive(Default)]
    struct Recorder {
        steps: Vec<BodyKey>,
        collisions: Vec<(BodyKey, BodyKey, Vec2)>,
        expire_on_touch: Option<BodyKey>,
    }

    impl StepHooks for Recorder {
        fn on_step(&mut self, key: BodyKey, _body: &mut Body, _dt_ms: f32) {
            self.steps.push(key);
        }

        fn on_collision(
            &mut self,
            key: BodyKey,
            body: &mut Body,
            other_key: BodyKey,
            _other: &Body,
            corrected: Vec2,
        ) {
            self.collisions.push((key, other_key, corrected));
            if self.expire_on_touch == Some(key) {
                body.expire();
            }
        }
    }

    #[test]
    fn test_add_and_remove_bodies() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(Body::circle(Vec2::ZERO, 1.0));
        assert_eq!(world.body_count(), 1);
        assert!(world.get_body(key).is_some());

        let removed = world.remove_body(key);
        assert!(removed.is_some());
        assert_eq!(world.body_count(), 0);
        assert!(world.get_body(key).is_none());
    }

    #[test]
    fn test_step_integrates_bodies() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(frictionless_circle(Vec2::ZERO).with_move_velocity(Vec2::new(2.0, 0.0)));

        world.step(EXPECTED_TIMESTEP_MS);

        let body = world.get_body(key).unwrap();
        assert!((body.position.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_paused_world_does_nothing() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(frictionless_circle(Vec2::ZERO).with_move_velocity(Vec2::X));
        world.add_body(frictionless_circle(Vec2::new(0.5, 0.0)));
        world.set_paused(true);

        let mut hooks = Recorder::default();
        let report = world.step_with(1000.0, &mut hooks);

        assert!(report.contacts.is_empty());
        assert!(hooks.steps.is_empty());
        assert_eq!(world.get_body(a).unwrap().position, Vec2::ZERO);

        world.set_paused(false);
        assert!(!world.is_paused());
        assert_eq!(world.step(0.0).contacts.len(), 1);
    }

    #[test]
    fn test_overlapping_bodies_are_separated() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(frictionless_circle(Vec2::ZERO));
        let b = world.add_body(frictionless_circle(Vec2::new(1.5, 0.0)));

        let report = world.step(0.0);

        assert_eq!(report.contacts.len(), 1);
        assert_eq!(report.contacts[0].a, a);
        assert_eq!(report.contacts[0].b, b);
        assert!((world.get_body(a).unwrap().position.x + 0.25).abs() < 1e-4);
        assert!((world.get_body(b).unwrap().position.x - 1.75).abs() < 1e-4);
    }

    #[test]
    fn test_non_solid_bodies_are_never_moved() {
        let mut world = PhysicsWorld::new();
        let coin = world.add_body(Body::circle(Vec2::ZERO, 2.0).with_solid(false));
        let hero = world.add_body(
            frictionless_circle(Vec2::new(1.0, 0.0)).with_push_velocity(Vec2::new(-1.0, 0.0)),
        );

        let report = world.step(0.0);

        assert_eq!(report.contacts.len(), 1);
        assert_eq!(world.get_body(coin).unwrap().position, Vec2::ZERO);
        let hero = world.get_body(hero).unwrap();
        assert_eq!(hero.position, Vec2::new(1.0, 0.0));
        assert_eq!(hero.push_velocity, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_head_on_collision_swaps_push_velocities() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(frictionless_circle(Vec2::ZERO).with_push_velocity(Vec2::new(1.0, 0.0)));
        let b = world.add_body(
            frictionless_circle(Vec2::new(2.5, 0.0)).with_push_velocity(Vec2::new(-1.0, 0.0)),
        );

        // One baseline frame closes the gap to 0.5
        world.step(EXPECTED_TIMESTEP_MS);

        let a = world.get_body(a).unwrap();
        let b = world.get_body(b).unwrap();
        assert!((a.push_velocity.x + 1.0).abs() < 1e-4);
        assert!((b.push_velocity.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_pairs_use_positions_from_before_correction() {
        // B overlaps both A and C. A's correction moves B right, which would
        // deepen its overlap with C, but the B-C pair still sees the old B.
        let mut world = PhysicsWorld::new();
        let a = world.add_body(frictionless_circle(Vec2::ZERO).with_movable(false));
        let b = world.add_body(frictionless_circle(Vec2::new(1.5, 0.0)));
        let c = world.add_body(frictionless_circle(Vec2::new(3.0, 0.0)).with_movable(false));

        let report = world.step(0.0);

        assert_eq!(report.contacts.len(), 2);
        // A-B pushes B to 2.0, then B-C, computed from B at 1.5, sets it to 1.0
        let b_pos = world.get_body(b).unwrap().position;
        assert!((b_pos.x - 1.0).abs() < 1e-4, "b at {:?}", b_pos);
        assert_eq!(world.get_body(a).unwrap().position, Vec2::ZERO);
        assert_eq!(world.get_body(c).unwrap().position, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_hooks_called_in_order() {
        let mut world = PhysicsWorld::new();
        let a = world.add_body(frictionless_circle(Vec2::ZERO));
        let b = world.add_body(frictionless_circle(Vec2::new(1.5, 0.0)));

        let mut hooks = Recorder::default();
        world.step_with(0.0, &mut hooks);

        assert_eq!(hooks.steps, vec![a, b]);
        assert_eq!(hooks.collisions.len(), 2);
        assert_eq!(hooks.collisions[0].0, a);
        assert_eq!(hooks.collisions[0].1, b);
        assert_eq!(hooks.collisions[1].0, b);
        assert_eq!(hooks.collisions[1].1, a);
        assert!((hooks.collisions[0].2.x + 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_expired_bodies_removed_after_scan() {
        let mut world = PhysicsWorld::new();
        let coin = world.add_body(Body::circle(Vec2::ZERO, 2.0).with_solid(false));
        let hero = world.add_body(frictionless_circle(Vec2::new(1.0, 0.0)));
        let other = world.add_body(frictionless_circle(Vec2::new(-1.0, 0.0)));

        let mut hooks = Recorder {
            expire_on_touch: Some(coin),
            ..Default::default()
        };
        let report = world.step_with(0.0, &mut hooks);

        // The coin still takes part in every pair of the step it expires in
        assert_eq!(
            report.contacts.iter().filter(|c| c.a == coin || c.b == coin).count(),
            2
        );
        assert_eq!(report.removed, vec![coin]);
        assert!(world.get_body(coin).is_none());
        assert!(world.get_body(hero).is_some());
        assert!(world.get_body(other).is_some());
    }

    #[test]
    fn test_clear() {
        let mut world = PhysicsWorld::new();
        world.add_body(Body::circle(Vec2::ZERO, 1.0));
        world.add_body(Body::circle(Vec2::X, 1.0));
        world.clear();
        assert_eq!(world.body_count(), 0);
    }
}
