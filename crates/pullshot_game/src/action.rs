//! Intents and the action state machine
//!
//! An [`Intent`] is what a controller (player input or AI) wants this tick.
//! An [`Action`] is what the body is actually doing. Idle and move actions
//! give way to any new intent; a dash always plays through to the end.

use pullshot_math::Vec2;
use pullshot_physics::Body;
use serde::{Serialize, Deserialize};

/// What a controller wants a body to do
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Accelerate toward `direction`
    Move { direction: Vec2 },
    /// Lunge toward `direction` (keeps the current facing if zero)
    Dash { direction: Vec2 },
}

/// Stage of a dash
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashPhase {
    /// Direction is locked and the body turns to face it
    Windup,
    /// Push impulse is being applied
    Execution,
    /// Short recovery before going idle
    Winddown,
}

/// How far a dash runs before winding down
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DashLimit {
    /// Stop after covering this many body sizes of push
    Distance(f32),
    /// Stop after this many ticks
    Frames(u32),
}

/// Per-kind dash tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashProfile {
    /// Push added per second, per unit of body size
    pub impulse: f32,
    pub limit: DashLimit,
    pub winddown_ms: f32,
}

impl DashProfile {
    /// Half a body length at sixteen body lengths per second
    pub const HERO: Self = Self {
        impulse: 16.0,
        limit: DashLimit::Distance(0.5),
        winddown_ms: 100.0,
    };

    /// Four ticks at six body lengths per second
    pub const ENEMY: Self = Self {
        impulse: 6.0,
        limit: DashLimit::Frames(4),
        winddown_ms: 100.0,
    };
}

/// What a body is currently doing
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Action {
    #[default]
    Idle,
    Move {
        /// Milliseconds spent moving
        counter: f32,
        direction: Vec2,
    },
    Dash {
        phase: DashPhase,
        /// Distance or ticks covered in execution, milliseconds in winddown
        counter: f32,
        /// Locked dash heading
        rotation: f32,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Move { .. } => "move",
            Action::Dash { .. } => "dash",
        }
    }

    /// Whether a new intent may take over
    pub fn can_be_replaced(&self) -> bool {
        matches!(self, Action::Idle | Action::Move { .. })
    }

    /// Translate this tick's intent into the current action
    ///
    /// - No intent ends a move; other actions carry on.
    /// - A replaceable action takes the new intent. Moving again keeps the
    ///   move counter, only the direction changes.
    /// - A dash heading comes from the intent direction, or `facing` when
    ///   that direction is zero.
    pub fn process_intent(&mut self, intent: Option<Intent>, facing: f32) {
        let Some(intent) = intent else {
            if matches!(self, Action::Move { .. }) {
                *self = Action::Idle;
            }
            return;
        };

        if !self.can_be_replaced() {
            return;
        }

        *self = match intent {
            Intent::Move { direction } => {
                let counter = match *self {
                    Action::Move { counter, .. } => counter,
                    _ => 0.0,
                };
                Action::Move { counter, direction }
            }
            Intent::Dash { direction } => Action::Dash {
                phase: DashPhase::Windup,
                counter: 0.0,
                rotation: if direction == Vec2::ZERO {
                    facing
                } else {
                    direction.angle()
                },
            },
        };
    }

    /// Carry out one tick of the current action on `body`
    pub fn perform(&mut self, body: &mut Body, dt_ms: f32, dash: &DashProfile) {
        let mut finished = false;

        match self {
            Action::Idle => {}
            Action::Move { counter, direction } => {
                // A zero direction has no heading to accelerate along
                if *direction != Vec2::ZERO {
                    let rotation = direction.angle();
                    let acceleration = body.tuning.move_acceleration * dt_ms / 1000.0;
                    body.move_velocity += Vec2::from_angle(rotation, acceleration);
                    body.set_rotation(rotation);
                }
                *counter += dt_ms;
            }
            Action::Dash { phase, counter, rotation } => {
                if *phase == DashPhase::Windup {
                    body.set_rotation(*rotation);
                    *phase = DashPhase::Execution;
                }

                match *phase {
                    DashPhase::Execution => {
                        let full = dash.impulse * body.size * dt_ms / 1000.0;
                        let (power, done) = match dash.limit {
                            DashLimit::Distance(ratio) => {
                                let max = body.size * ratio;
                                let remaining = (max - *counter).max(0.0);
                                if full >= remaining {
                                    *counter = max;
                                    (remaining, true)
                                } else {
                                    *counter += full;
                                    (full, false)
                                }
                            }
                            DashLimit::Frames(frames) => {
                                *counter += 1.0;
                                (full, *counter >= frames as f32)
                            }
                        };
                        body.push_velocity += Vec2::from_angle(*rotation, power);
                        if done {
                            *phase = DashPhase::Winddown;
                            *counter = 0.0;
                        }
                    }
                    DashPhase::Winddown => {
                        *counter += dt_ms;
                        finished = *counter >= dash.winddown_ms;
                    }
                    DashPhase::Windup => {}
                }
            }
        }

        if finished {
            *self = Action::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullshot_math::rotations;
    use pullshot_physics::{MotionTuning, EXPECTED_TIMESTEP_MS};

    fn body() -> Body {
        let mut tuning = MotionTuning::frictionless();
        tuning.move_acceleration = 16.0;
        Body::circle(Vec2::ZERO, 64.0).with_tuning(tuning)
    }

    #[test]
    fn test_no_intent_ends_move_only() {
        let mut action = Action::Move {
            counter: 10.0,
            direction: Vec2::X,
        };
        action.process_intent(None, 0.0);
        assert_eq!(action, Action::Idle);

        let mut dash = Action::Dash {
            phase: DashPhase::Execution,
            counter: 0.0,
            rotation: 0.0,
        };
        dash.process_intent(None, 0.0);
        assert_eq!(dash.name(), "dash");
    }

    #[test]
    fn test_move_continuation_keeps_counter() {
        let mut action = Action::Move {
            counter: 50.0,
            direction: Vec2::X,
        };
        action.process_intent(Some(Intent::Move { direction: Vec2::Y }), 0.0);
        assert_eq!(
            action,
            Action::Move {
                counter: 50.0,
                direction: Vec2::Y
            }
        );

        let mut idle = Action::Idle;
        idle.process_intent(Some(Intent::Move { direction: Vec2::Y }), 0.0);
        assert_eq!(
            idle,
            Action::Move {
                counter: 0.0,
                direction: Vec2::Y
            }
        );
    }

    #[test]
    fn test_dash_plays_through() {
        let mut action = Action::Idle;
        action.process_intent(Some(Intent::Dash { direction: Vec2::Y }), 0.0);
        assert!(!action.can_be_replaced());

        action.process_intent(Some(Intent::Move { direction: Vec2::X }), 0.0);
        assert!(matches!(action, Action::Dash { .. }));
    }

    #[test]
    fn test_dash_without_direction_keeps_facing() {
        let mut action = Action::Idle;
        action.process_intent(Some(Intent::Dash { direction: Vec2::ZERO }), rotations::WEST);
        match action {
            Action::Dash { rotation, phase, .. } => {
                assert_eq!(rotation, rotations::WEST);
                assert_eq!(phase, DashPhase::Windup);
            }
            other => panic!("expected a dash, got {:?}", other),
        }
    }

    #[test]
    fn test_move_accelerates_and_faces_direction() {
        let mut body = body();
        let mut action = Action::Move {
            counter: 0.0,
            direction: Vec2::new(0.0, -3.0),
        };

        action.perform(&mut body, 500.0, &DashProfile::HERO);

        assert!(body.move_velocity.x.abs() < 1e-4);
        assert!((body.move_velocity.y + 8.0).abs() < 1e-4);
        assert!((body.rotation() - rotations::NORTH).abs() < 1e-5);
        assert_eq!(
            action,
            Action::Move {
                counter: 500.0,
                direction: Vec2::new(0.0, -3.0)
            }
        );
    }

    #[test]
    fn test_move_with_zero_direction_does_nothing() {
        let mut body = body();
        let mut action = Action::Move {
            counter: 0.0,
            direction: Vec2::ZERO,
        };
        action.perform(&mut body, 500.0, &DashProfile::HERO);
        assert_eq!(body.move_velocity, Vec2::ZERO);
        assert_eq!(body.rotation(), rotations::SOUTH);
    }

    #[test]
    fn test_hero_dash_covers_half_a_body() {
        let mut body = body();
        let mut action = Action::Idle;
        action.process_intent(Some(Intent::Dash { direction: Vec2::X }), 0.0);

        // 1024 per second is about 17 per baseline frame, so two frames
        // reach the 32 unit limit
        action.perform(&mut body, EXPECTED_TIMESTEP_MS, &DashProfile::HERO);
        assert!(matches!(
            action,
            Action::Dash {
                phase: DashPhase::Execution,
                ..
            }
        ));
        assert_eq!(body.rotation(), rotations::EAST);

        action.perform(&mut body, EXPECTED_TIMESTEP_MS, &DashProfile::HERO);
        assert!(matches!(
            action,
            Action::Dash {
                phase: DashPhase::Winddown,
                ..
            }
        ));
        assert!((body.push_velocity.x - 32.0).abs() < 1e-3);
        assert!(body.push_velocity.y.abs() < 1e-3);

        // Winddown runs its 100 ms then goes idle
        action.perform(&mut body, 60.0, &DashProfile::HERO);
        assert!(matches!(action, Action::Dash { .. }));
        action.perform(&mut body, 60.0, &DashProfile::HERO);
        assert_eq!(action, Action::Idle);
        assert!((body.push_velocity.x - 32.0).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_dash_lasts_four_ticks() {
        let mut body = body();
        let mut action = Action::Idle;
        action.process_intent(Some(Intent::Dash { direction: Vec2::Y }), 0.0);

        for _ in 0..3 {
            action.perform(&mut body, 10.0, &DashProfile::ENEMY);
            assert!(matches!(
                action,
                Action::Dash {
                    phase: DashPhase::Execution,
                    ..
                }
            ));
        }
        action.perform(&mut body, 10.0, &DashProfile::ENEMY);
        assert!(matches!(
            action,
            Action::Dash {
                phase: DashPhase::Winddown,
                ..
            }
        ));

        // 6 * 64 per second over 40 ms
        assert!((body.push_velocity.y - 15.36).abs() < 1e-3);
    }
}
