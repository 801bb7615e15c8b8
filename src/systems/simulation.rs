//! Game simulation system
//!
//! Manages the frame loop:
//! - Delta time measurement from a clock
//! - Game stepping
//! - Frame counting

use std::time::Instant;

use pullshot_game::{Game, GameEvent};

/// Monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since some fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

/// Result of a simulation update
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Time since the previous update (ms)
    pub dt_ms: f32,
    /// Events raised by the game during this frame
    pub events: Vec<GameEvent>,
}

/// Manages the game simulation loop
///
/// Each update measures the time since the previous one and steps the game
/// by exactly that much. The delta is not clamped, so a long stall shows up
/// as one long step.
pub struct SimulationSystem<C: Clock = SystemClock> {
    clock: C,
    last_frame_ms: f64,
    frames: u64,
}

impl SimulationSystem<SystemClock> {
    /// Create a simulation system on the wall clock
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for SimulationSystem<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SimulationSystem<C> {
    /// Create a simulation system on a given clock, starting now
    pub fn with_clock(clock: C) -> Self {
        let last_frame_ms = clock.now_ms();
        Self {
            clock,
            last_frame_ms,
            frames: 0,
        }
    }

    /// Run one simulation frame
    pub fn update(&mut self, game: &mut Game) -> SimulationResult {
        let now = self.clock.now_ms();
        let dt_ms = (now - self.last_frame_ms).max(0.0) as f32;
        self.last_frame_ms = now;
        self.frames += 1;

        let events = game.step(dt_ms);
        SimulationResult { dt_ms, events }
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullshot_game::{GameSettings, Level};
    use pullshot_math::Vec2;

    fn game() -> Game {
        Game::with_level(GameSettings::default(), Level::default_level()).unwrap()
    }

    #[test]
    fn test_delta_from_manual_clock() {
        let mut game = game();
        let mut sim = SimulationSystem::with_clock(ManualClock::new());

        sim.clock_mut().advance(16.0);
        let result = sim.update(&mut game);
        assert_eq!(result.dt_ms, 16.0);

        sim.clock_mut().advance(40.0);
        let result = sim.update(&mut game);
        assert_eq!(result.dt_ms, 40.0);
        assert_eq!(sim.frames(), 2);
        assert_eq!(game.ticks(), 2);
    }

    #[test]
    fn test_long_stall_is_not_clamped() {
        let mut game = game();
        game.launch(Vec2::new(0.0, -384.0)).unwrap();
        let start = game.hero_body().unwrap().position;
        let mut sim = SimulationSystem::with_clock(ManualClock::new());

        sim.clock_mut().advance(500.0);
        let result = sim.update(&mut game);

        assert_eq!(result.dt_ms, 500.0);
        // Roughly 30 baseline frames of travel in one step
        let travelled = game.hero_body().unwrap().position.y - start.y;
        assert!(travelled > 400.0);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock::new();
        let first = clock.now_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now_ms() >= first + 5.0);
    }

    #[test]
    fn test_default_construction() {
        let sim: SimulationSystem = SimulationSystem::default();
        assert_eq!(sim.frames(), 0);
        assert!(sim.clock().now_ms() < 100.0);
    }
}
