//! Emotion Blaster headless runner
//!
//! Plays runs with a scripted pilot, persisting statistics, settings and the
//! leaderboard to a data directory. Useful for soak-testing balance changes.
//!
//! Environment:
//! - `EMOTION_BLASTER_DATA`: data directory (default `.emotion-blaster`)
//! - `EMOTION_BLASTER_FRAMES`: frame budget (default 5 minutes of play)
//! - `EMOTION_BLASTER_SEED`: RNG seed (default derived from the clock)
//! - `RUST_LOG`: log filter

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::cell::{Cell, RefCell};
    use std::env;
    use std::path::PathBuf;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use emotion_blaster::consts::*;
    use emotion_blaster::sim::{GamePhase, LevelSummary};
    use emotion_blaster::{
        Achievement, AchievementTracker, Engine, FileStore, GameHost, HighScores, Settings,
    };
    use glam::Vec2;

    /// Logs notifications and remembers how the run ended
    struct LogHost {
        final_score: Rc<Cell<Option<u64>>>,
    }

    impl GameHost for LogHost {
        fn on_achievements(&mut self, unlocked: &[&'static Achievement]) {
            for a in unlocked {
                log::info!("Achievement: {} - {} (+{} coins)", a.name, a.description, a.reward);
            }
        }

        fn on_health(&mut self, current: u32, max: u32) {
            log::debug!("Health {current}/{max}");
        }

        fn on_level_complete(&mut self, summary: LevelSummary) {
            log::info!(
                "Level {} cleared: score {}, coins {}",
                summary.level,
                summary.score,
                summary.coins
            );
        }

        fn on_game_over(&mut self, final_score: u64) {
            self.final_score.set(Some(final_score));
        }
    }

    fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        match env::var(name) {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unparseable {name}={raw:?}");
                default
            }),
            Err(_) => default,
        }
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Track the lowest enemy horizontally, or drift back to center
    fn steer(engine: &mut Engine) {
        let state = engine.state();
        let player = state.player.pos;
        let target_x = state
            .enemies
            .iter()
            .max_by(|a, b| a.motion.pos.y.total_cmp(&b.motion.pos.y))
            .map(|e| e.motion.pos.x)
            .unwrap_or(state.bounds.x / 2.0);
        engine.set_pointer(Some(Vec2::new(target_x, player.y)));
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let dir: PathBuf = env_or("EMOTION_BLASTER_DATA", PathBuf::from(".emotion-blaster"));
        let frames: u64 = env_or("EMOTION_BLASTER_FRAMES", 5 * 60 * u64::from(FRAMES_PER_SECOND));
        let seed: u64 = env_or("EMOTION_BLASTER_SEED", now_secs());

        let mut store = FileStore::open(&dir)?;
        log::info!("Data directory: {}", store.dir().display());

        let settings = Settings::load(&store);
        settings.save(&mut store);
        let tracker = Rc::new(RefCell::new(AchievementTracker::load(Box::new(
            FileStore::open(&dir)?,
        ))));
        let mut scores = HighScores::load(&store);

        let final_score = Rc::new(Cell::new(None));
        let host = LogHost {
            final_score: Rc::clone(&final_score),
        };
        let mut engine = Engine::new(settings, Rc::clone(&tracker), seed)?.with_host(Box::new(host));
        engine.start();

        let mut frame = 0;
        while frame < frames && engine.is_running() {
            steer(&mut engine);
            engine.tick();
            frame += 1;
        }
        // the run may have ended on the last frame; let the engine notice
        if engine.phase() == GamePhase::Playing {
            engine.tick();
        }

        let state = engine.state();
        let score = final_score.get().unwrap_or(state.score);
        log::info!(
            "Run finished after {:.1}s on level {} with score {score} and {} coins",
            emotion_blaster::frames_to_seconds(state.time_ticks),
            state.level,
            state.coins
        );
        if let Some(rank) = scores.add_score(score, state.level, now_secs()) {
            log::info!("New leaderboard entry at rank {rank}");
            scores.save(&mut store);
        }

        let tracker = tracker.borrow();
        let unlocked = tracker.progress().iter().filter(|p| p.unlocked).count();
        log::info!(
            "Lifetime: {} emotions released, high score {}, {unlocked} achievements",
            tracker.stats().enemies_defeated,
            tracker.stats().high_score
        );
        engine.stop();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Emotion Blaster (headless) starting...");
    if let Err(e) = runner::run() {
        log::error!("Runner failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}
