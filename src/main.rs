//! Headless Pullshot runner
//!
//! Loads the configured level, launches the hero once and runs a fixed
//! number of frames on the wall clock, logging what happens.

use std::process::ExitCode;
use std::time::Duration;

use pullshot::config::AppConfig;
use pullshot::systems::SimulationSystem;
use pullshot_game::{Game, GameError, GameEvent, Level};
use pullshot_math::Vec2;

fn run(config: &AppConfig) -> Result<(), GameError> {
    let level = match &config.level.path {
        Some(path) => Level::load(path)?,
        None => Level::default_level(),
    };
    let mut game = Game::with_level(config.to_game_settings(), level)?;

    let [x, y] = config.simulation.launch_pull;
    game.launch(Vec2::new(x, y))?;

    let frame_interval = Duration::from_millis(config.simulation.frame_interval_ms);
    let mut sim: SimulationSystem = SimulationSystem::new();

    for _ in 0..config.simulation.frames {
        std::thread::sleep(frame_interval);
        let result = sim.update(&mut game);

        for event in &result.events {
            match event {
                GameEvent::CoinCollected { .. } => log::info!("Coin collected, score {}", game.score()),
                GameEvent::HeroDamaged { health } => log::info!("Hero hit, {} health left", health),
                GameEvent::HeroDefeated => log::info!("Hero defeated"),
                GameEvent::GoalReached { .. } => log::debug!("Hero in the goal"),
            }
        }

        if game.is_menu_open() {
            log::info!("Menu opened after {} frames", sim.frames());
            break;
        }
    }

    if let Some(hero) = game.hero_body() {
        log::info!("Hero finished at ({:.1}, {:.1})", hero.position.x, hero.position.y);
    }
    log::info!(
        "Ran {} ticks: score {}, victory {}, defeated {}",
        game.ticks(),
        game.score(),
        game.is_victory(),
        game.is_defeated()
    );
    Ok(())
}

fn main() -> ExitCode {
    let loaded = AppConfig::load();
    let log_level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // RUST_LOG still wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting Pullshot");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
