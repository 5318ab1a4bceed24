//! Frame-driven simulation engine
//!
//! The host calls [`Engine::tick`] once per display frame. Each tick steers
//! the player, fires, spawns, advances entities, resolves combat, ages
//! effects, checks terminal conditions and finally reports to the host.
//! All timers count frames, so pausing never skews cooldowns or spawns.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use glam::Vec2;

use super::collision::{CombatEvent, resolve_bullet_hits, resolve_enemy_fire, resolve_player_contacts};
use super::difficulty::DifficultyScaler;
use super::entity::{
    Enemy, EnemyKind, EntityError, FloatingAffirmation, Projectile, SpawnScaling, Steering,
};
use super::level::{LevelManager, SpawnDecision};
use super::movement::MoveContext;
use super::state::{BREATHER_DURATION_TICKS, GamePhase, GameState};
use crate::achievements::{Achievement, AchievementTracker};
use crate::consts::*;
use crate::settings::{Settings, Upgrades};

/// Buffered input, written by host events and read by the next tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer/touch position used as a movement target
    pub pointer: Option<Vec2>,
    /// Fire trigger held
    pub fire: bool,
}

impl TickInput {
    /// Keyboard direction, normalized so diagonals are not faster
    pub fn direction(&self) -> Vec2 {
        let x = f32::from(u8::from(self.right)) - f32::from(u8::from(self.left));
        let y = f32::from(u8::from(self.down)) - f32::from(u8::from(self.up));
        crate::normalize_direction(Vec2::new(x, y))
    }
}

/// Movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Reported when a level is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: u32,
    pub score: u64,
    pub coins: u64,
}

/// Host notifications. Every method is optional; none may stall the loop.
pub trait GameHost {
    fn on_score(&mut self, _score: u64) {}
    fn on_coins(&mut self, _coins: u64) {}
    fn on_health(&mut self, _current: u32, _max: u32) {}
    fn on_achievements(&mut self, _unlocked: &[&'static Achievement]) {}
    fn on_level_complete(&mut self, _summary: LevelSummary) {}
    fn on_game_over(&mut self, _final_score: u64) {}
}

/// Host that ignores every notification
pub struct NoopHost;

impl GameHost for NoopHost {}

/// Notifications gathered during a tick and delivered at its end
#[derive(Default)]
struct FrameReport {
    score: bool,
    coins: bool,
    health: bool,
    unlocked: Vec<&'static Achievement>,
    level_complete: Option<LevelSummary>,
    game_over: Option<u64>,
}

pub struct Engine {
    state: GameState,
    settings: Settings,
    upgrades: Upgrades,
    seed: u64,
    level: LevelManager,
    difficulty: DifficultyScaler,
    tracker: Rc<RefCell<AchievementTracker>>,
    host: Box<dyn GameHost>,
    input: TickInput,
    paused: bool,
    /// Frames since the player last took damage
    no_damage_frames: u64,
}

impl Engine {
    /// Build an idle engine; call [`Engine::start`] to begin a run
    pub fn new(
        settings: Settings,
        tracker: Rc<RefCell<AchievementTracker>>,
        seed: u64,
    ) -> Result<Self, EntityError> {
        let settings = settings.sanitized();
        let bounds = Vec2::new(settings.playfield_width, settings.playfield_height);
        let state = GameState::new(seed, bounds, settings.starting_health, Upgrades::default())?;
        Ok(Self {
            state,
            settings,
            upgrades: Upgrades::default(),
            seed,
            level: LevelManager::new(1),
            difficulty: DifficultyScaler::new(),
            tracker,
            host: Box::new(NoopHost),
            input: TickInput::default(),
            paused: false,
            no_damage_frames: 0,
        })
    }

    /// Attach the host that receives notifications
    pub fn with_host(mut self, host: Box<dyn GameHost>) -> Self {
        self.host = host;
        self
    }

    pub fn set_host(&mut self, host: Box<dyn GameHost>) {
        self.host = host;
    }

    // === Lifecycle ===

    /// Start a run with no upgrades
    pub fn start(&mut self) {
        self.start_with(Upgrades::default());
    }

    /// Start a fresh run: new player, level 1, empty field
    pub fn start_with(&mut self, upgrades: Upgrades) {
        if self.state.phase == GamePhase::Stopped {
            log::warn!("start() after stop() ignored");
            return;
        }
        let bounds = Vec2::new(self.settings.playfield_width, self.settings.playfield_height);
        // each run gets its own stream so consecutive runs differ
        let run_seed = self.seed.wrapping_add(self.state.time_ticks).wrapping_add(1);
        self.seed = run_seed;
        match GameState::new(run_seed, bounds, self.settings.starting_health, upgrades) {
            Ok(state) => self.state = state,
            Err(e) => {
                log::error!("Cannot start run: {e}");
                return;
            }
        }
        self.upgrades = upgrades;
        self.paused = false;
        self.no_damage_frames = 0;
        self.input = TickInput::default();
        self.state.phase = GamePhase::Playing;
        self.level = self.build_level(1);

        let mut report = FrameReport {
            score: true,
            coins: true,
            health: true,
            ..Default::default()
        };
        {
            let mut tracker = self.tracker.borrow_mut();
            report.unlocked.extend(tracker.track_game_start());
            report.unlocked.extend(tracker.track_level(1));
            tracker.reset_no_damage_time();
        }
        log::info!("Run started (seed {run_seed})");
        self.credit_rewards(&mut report);
        self.dispatch(report);
    }

    /// Suspend frame work without touching state
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Halt permanently; later ticks do nothing
    pub fn stop(&mut self) {
        if self.state.phase != GamePhase::Stopped {
            log::info!("Engine stopped");
        }
        self.state.phase = GamePhase::Stopped;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the host should keep scheduling frames
    pub fn is_running(&self) -> bool {
        matches!(self.state.phase, GamePhase::Playing | GamePhase::Breather)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn level_manager(&self) -> &LevelManager {
        &self.level
    }

    pub fn difficulty(&self) -> &DifficultyScaler {
        &self.difficulty
    }

    pub fn tracker(&self) -> Rc<RefCell<AchievementTracker>> {
        Rc::clone(&self.tracker)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // === Input ===

    pub fn set_key(&mut self, key: Direction, pressed: bool) {
        match key {
            Direction::Up => self.input.up = pressed,
            Direction::Down => self.input.down = pressed,
            Direction::Left => self.input.left = pressed,
            Direction::Right => self.input.right = pressed,
        }
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.input.pointer = pointer;
    }

    pub fn set_fire(&mut self, held: bool) {
        self.input.fire = held;
    }

    pub fn input(&self) -> &TickInput {
        &self.input
    }

    // === Frame loop ===

    /// Advance one frame
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        match self.state.phase {
            GamePhase::Playing => self.tick_playing(),
            GamePhase::Breather => self.tick_breather(),
            GamePhase::Ready | GamePhase::GameOver | GamePhase::Stopped => {}
        }
    }

    fn tick_playing(&mut self) {
        let mut report = FrameReport::default();

        // Health hit zero last frame: end the run now, exactly once
        if !self.state.player.is_alive() {
            self.finish_run(&mut report);
            self.dispatch(report);
            return;
        }

        self.state.time_ticks += 1;

        self.steer_player();
        self.fire(&mut report);
        self.spawn_enemies();
        self.advance_entities();
        self.resolve_combat(&mut report);
        self.state.update_effects();
        self.track_no_damage(&mut report);

        // a dead player ends the run next frame, even with the field clear
        if self.state.player.is_alive() && self.level.is_level_complete(self.state.enemies.len()) {
            self.complete_level(&mut report);
        }

        self.credit_rewards(&mut report);
        self.dispatch(report);
    }

    fn tick_breather(&mut self) {
        self.state.update_effects();
        self.state.breather_ticks = self.state.breather_ticks.saturating_sub(1);
        if self.state.breather_ticks > 0 {
            return;
        }

        let next = self.state.level + 1;
        self.state.level = next;
        self.level = self.build_level(next);
        self.state.phase = GamePhase::Playing;
        log::info!(
            "Level {next} begins ({} enemies, difficulty {:.2})",
            self.level.total_enemies(),
            self.difficulty.multiplier()
        );

        let mut report = FrameReport::default();
        report.unlocked.extend(self.tracker.borrow_mut().track_level(next));
        self.credit_rewards(&mut report);
        self.dispatch(report);
    }

    fn build_level(&self, level: u32) -> LevelManager {
        let mut manager = LevelManager::with_difficulty(level, &self.difficulty);
        if self.settings.min_enemies > 0 {
            manager.min_enemies = self.settings.min_enemies;
        }
        manager.keep_flowing_interval = self.settings.keep_flowing_interval;
        manager
    }

    /// (a) input → player movement
    fn steer_player(&mut self) {
        let steering = Steering {
            direction: self.input.direction(),
            pointer: self.input.pointer,
        };
        let bounds = self.state.bounds;
        self.state
            .player
            .update(steering, self.settings.movement_smoothing, bounds);
    }

    /// (b) auto-fire / fire trigger
    fn fire(&mut self, report: &mut FrameReport) {
        if !(self.settings.auto_fire || self.input.fire) {
            return;
        }
        if !self.state.player.try_fire() {
            return;
        }
        let muzzle = self.state.player.pos - Vec2::new(0.0, self.state.player.radius);
        match Projectile::player(muzzle) {
            Ok(bullet) => {
                self.state.bullets.push(bullet);
                report.unlocked.extend(self.tracker.borrow_mut().track_shot());
            }
            Err(e) => log::warn!("Dropped shot: {e}"),
        }
    }

    /// (c) materialize this frame's spawn decisions
    fn spawn_enemies(&mut self) {
        let decisions = self.level.update(self.state.enemies.len(), &mut self.state.rng);
        for decision in decisions {
            let result = match decision {
                SpawnDecision::Enemy(emotion) | SpawnDecision::Filler(emotion) => {
                    let stats = emotion.stats();
                    let level_health = stats.health + (self.state.level - 1) / 3;
                    let level_speed = stats.speed * (1.0 + 0.05 * (self.state.level - 1) as f32);
                    let scaling = SpawnScaling {
                        health: self.difficulty.scale_health(level_health),
                        speed: self.difficulty.scale_speed(level_speed),
                    };
                    let x = self.state.random_spawn_x(stats.radius);
                    let id = self.state.next_entity_id();
                    Enemy::new(id, emotion, Vec2::new(x, -stats.radius), scaling, &mut self.state.rng)
                }
                SpawnDecision::Boss(emotion) => {
                    let scaling = SpawnScaling {
                        health: self.difficulty.scale_health(20 + self.state.level * 5),
                        speed: self.difficulty.scale_speed(1.5),
                    };
                    let pos = Vec2::new(self.state.bounds.x / 2.0, -BOSS_RADIUS);
                    let id = self.state.next_entity_id();
                    Enemy::boss(id, emotion, pos, scaling)
                }
            };
            match result {
                Ok(enemy) => {
                    log::debug!("Spawned {:?} {} (id {})", enemy.kind, enemy.emotion.as_str(), enemy.id);
                    self.state.enemies.push(enemy);
                }
                Err(e) => log::warn!("Skipped spawn {decision:?}: {e}"),
            }
        }
    }

    /// (d) advance enemies and projectiles, dropping faulted or departed ones
    fn advance_entities(&mut self) {
        let bounds = self.state.bounds;
        let mut ctx = MoveContext {
            player_pos: self.state.player.pos,
            width: bounds.x,
            rng: &mut self.state.rng,
        };
        for enemy in &mut self.state.enemies {
            if let Some(shot) = enemy.update(&mut ctx) {
                self.state.enemy_bullets.push(shot);
            }
        }
        self.state.enemies.retain(|e| {
            if !e.motion.pos.is_finite() {
                log::warn!("Dropping enemy {} with non-finite position", e.id);
                return false;
            }
            !e.is_off_field(bounds)
        });

        for bullet in self
            .state
            .bullets
            .iter_mut()
            .chain(self.state.enemy_bullets.iter_mut())
        {
            bullet.update();
        }
        let keep = |b: &Projectile| b.pos.is_finite() && !b.is_off_field(bounds);
        self.state.bullets.retain(keep);
        self.state.enemy_bullets.retain(keep);
    }

    /// (e) bullets vs enemies, enemies vs player, enemy fire vs player
    fn resolve_combat(&mut self, report: &mut FrameReport) {
        let mut events = resolve_bullet_hits(&mut self.state.bullets, &mut self.state.enemies);
        events.extend(resolve_player_contacts(
            &mut self.state.player,
            &mut self.state.enemies,
        ));
        events.extend(resolve_enemy_fire(
            &mut self.state.player,
            &mut self.state.enemy_bullets,
        ));

        let cap = self.settings.max_particles();
        let mut tracker = self.tracker.borrow_mut();
        for event in events {
            match event {
                CombatEvent::Hit { pos, emotion } => {
                    report.unlocked.extend(tracker.track_shot_hit());
                    self.state.burst(pos, HIT_BURST, Some(emotion), cap);
                }
                CombatEvent::Kill {
                    pos,
                    emotion,
                    kind,
                    points,
                    coins,
                    affirmation,
                } => {
                    report.unlocked.extend(tracker.track_shot_hit());
                    self.state.score += points;
                    self.state.coins += coins;
                    report.score = true;
                    report.coins = true;

                    report.unlocked.extend(tracker.track_enemy_kill(emotion));
                    if kind == EnemyKind::Boss {
                        log::info!("Boss defeated on level {}", self.state.level);
                        report.unlocked.extend(tracker.track_boss_kill());
                    }
                    report.unlocked.extend(tracker.track_coins(coins));
                    report.unlocked.extend(tracker.track_score(self.state.score));

                    if self.state.affirmations.len() < self.settings.quality.max_affirmations() {
                        self.state
                            .affirmations
                            .push(FloatingAffirmation::new(affirmation, pos));
                    }
                    self.state.burst(pos, KILL_BURST, Some(emotion), cap);
                }
                CombatEvent::PlayerHit { pos, emotion, .. } => {
                    report.health = true;
                    self.no_damage_frames = 0;
                    tracker.reset_no_damage_time();
                    if self.settings.effective_screen_shake() {
                        self.state.screen_shake = 1.0;
                    }
                    self.state.burst(pos, KILL_BURST / 2, emotion, cap);
                }
            }
        }
    }

    /// Feed the no-damage streak to the tracker once per whole second
    fn track_no_damage(&mut self, report: &mut FrameReport) {
        self.no_damage_frames += 1;
        if self.no_damage_frames % FRAMES_PER_SECOND as u64 == 0 {
            let seconds = self.no_damage_frames / FRAMES_PER_SECOND as u64;
            report
                .unlocked
                .extend(self.tracker.borrow_mut().track_no_damage_time(seconds));
        }
    }

    /// (g) level cleared: bonus, sample, achievements, breather
    fn complete_level(&mut self, report: &mut FrameReport) {
        if !self.state.player.is_alive() {
            return;
        }
        let elapsed = self.level.elapsed_frames();
        let limit = u64::from(self.level.time_limit);
        if elapsed < limit {
            let bonus = (limit - elapsed) / FRAMES_PER_SECOND as u64 * 10;
            self.state.score += bonus;
            report.score = true;
        }

        let player = &self.state.player;
        let health_ratio = player.health as f32 / player.max_health.max(1) as f32;
        let mut tracker = self.tracker.borrow_mut();
        let session = *tracker.session();
        let accuracy = if session.shots_fired == 0 {
            0.0
        } else {
            session.shots_hit as f32 / session.shots_fired as f32
        };
        self.difficulty.record(0.5 * health_ratio + 0.5 * accuracy);

        report.unlocked.extend(tracker.track_score(self.state.score));
        report.unlocked.extend(tracker.track_level_complete());
        drop(tracker);

        let summary = LevelSummary {
            level: self.state.level,
            score: self.state.score,
            coins: self.state.coins,
        };
        log::info!(
            "Level {} complete (score {}, coins {})",
            summary.level,
            summary.score,
            summary.coins
        );
        report.level_complete = Some(summary);

        self.state.clear_field();
        self.state.breather_ticks = BREATHER_DURATION_TICKS;
        self.state.phase = GamePhase::Breather;
    }

    fn finish_run(&mut self, report: &mut FrameReport) {
        self.state.phase = GamePhase::GameOver;
        self.difficulty.record(0.0);
        report
            .unlocked
            .extend(self.tracker.borrow_mut().track_score(self.state.score));
        report.game_over = Some(self.state.score);
        log::info!(
            "Game over on level {} with score {}",
            self.state.level,
            self.state.score
        );
    }

    /// Credit coin rewards for achievements unlocked this frame
    fn credit_rewards(&mut self, report: &mut FrameReport) {
        let reward: u64 = report.unlocked.iter().map(|a| a.reward).sum();
        if reward > 0 {
            self.state.coins += reward;
            report.coins = true;
        }
    }

    /// (h) deliver notifications; a panicking host never takes the loop down
    fn dispatch(&mut self, report: FrameReport) {
        let state = &self.state;
        let host = &mut self.host;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            if report.score {
                host.on_score(state.score);
            }
            if report.coins {
                host.on_coins(state.coins);
            }
            if report.health {
                host.on_health(state.player.health, state.player.max_health);
            }
            if !report.unlocked.is_empty() {
                host.on_achievements(&report.unlocked);
            }
            if let Some(summary) = report.level_complete {
                host.on_level_complete(summary);
            }
            if let Some(final_score) = report.game_over {
                host.on_game_over(final_score);
            }
        }));
        if result.is_err() {
            log::error!("Host callback panicked; continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::emotion::EmotionType;

    #[derive(Debug, Clone, PartialEq)]
    enum HostEvent {
        Score(u64),
        Coins(u64),
        Health(u32, u32),
        Achievements(Vec<&'static str>),
        LevelComplete(LevelSummary),
        GameOver(u64),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<HostEvent>>>);

    impl GameHost for Recorder {
        fn on_score(&mut self, score: u64) {
            self.0.borrow_mut().push(HostEvent::Score(score));
        }
        fn on_coins(&mut self, coins: u64) {
            self.0.borrow_mut().push(HostEvent::Coins(coins));
        }
        fn on_health(&mut self, current: u32, max: u32) {
            self.0.borrow_mut().push(HostEvent::Health(current, max));
        }
        fn on_achievements(&mut self, unlocked: &[&'static Achievement]) {
            let ids = unlocked.iter().map(|a| a.id).collect();
            self.0.borrow_mut().push(HostEvent::Achievements(ids));
        }
        fn on_level_complete(&mut self, summary: LevelSummary) {
            self.0.borrow_mut().push(HostEvent::LevelComplete(summary));
        }
        fn on_game_over(&mut self, final_score: u64) {
            self.0.borrow_mut().push(HostEvent::GameOver(final_score));
        }
    }

    impl Recorder {
        fn events(&self) -> Vec<HostEvent> {
            self.0.borrow().clone()
        }
        fn clear(&self) {
            self.0.borrow_mut().clear();
        }
        fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
            self.0.borrow().iter().filter(|e| pred(e)).count()
        }
    }

    fn quiet_settings() -> Settings {
        Settings {
            auto_fire: false,
            ..Settings::default()
        }
    }

    fn engine_with(settings: Settings) -> (Engine, Recorder) {
        let tracker = Rc::new(RefCell::new(AchievementTracker::load(Box::new(
            MemoryStore::new(),
        ))));
        let recorder = Recorder::default();
        let engine = Engine::new(settings, tracker, 1234)
            .unwrap()
            .with_host(Box::new(recorder.clone()));
        (engine, recorder)
    }

    fn enemy_at(engine: &mut Engine, emotion: EmotionType, pos: Vec2, health: u32) -> Enemy {
        let state = engine.state_mut();
        let id = state.next_entity_id();
        Enemy::new(
            id,
            emotion,
            pos,
            SpawnScaling { health, speed: 0.1 },
            &mut state.rng,
        )
        .unwrap()
    }

    #[test]
    fn test_input_direction_normalized() {
        let input = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        let dir = input.direction();
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!((dir.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!(dir.y < 0.0);

        let opposed = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(opposed.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_start_reports_initial_state() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        assert_eq!(engine.phase(), GamePhase::Ready);
        engine.start();
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert!(engine.is_running());

        let events = recorder.events();
        assert!(events.contains(&HostEvent::Score(0)));
        assert!(events.contains(&HostEvent::Health(PLAYER_MAX_HEALTH, PLAYER_MAX_HEALTH)));
        assert_eq!(engine.tracker().borrow().stats().games_played, 1);
        assert_eq!(engine.tracker().borrow().stats().max_level, 1);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        engine.tick();
        assert_eq!(engine.state().time_ticks, 0);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_player_death_triggers_single_game_over_next_tick() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        engine.start();
        recorder.clear();

        engine.state_mut().player.health = 1;
        let pos = engine.state().player.pos;
        let enemy = enemy_at(&mut engine, EmotionType::Regret, pos, 3);
        engine.state_mut().enemies.push(enemy);

        engine.tick();
        assert_eq!(engine.state().player.health, 0);
        assert!(recorder.events().contains(&HostEvent::Health(0, PLAYER_MAX_HEALTH)));
        assert_eq!(recorder.count(|e| matches!(e, HostEvent::GameOver(_))), 0);
        assert_eq!(engine.phase(), GamePhase::Playing);

        engine.tick();
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(recorder.count(|e| matches!(e, HostEvent::GameOver(_))), 1);

        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(recorder.count(|e| matches!(e, HostEvent::GameOver(_))), 1);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_death_on_last_enemy_is_game_over_not_level_complete() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        engine.start();
        recorder.clear();

        let total = engine.level_manager().total_enemies();
        engine.level.enemies_spawned = total;
        engine.state_mut().player.health = 1;
        let pos = engine.state().player.pos;
        let enemy = enemy_at(&mut engine, EmotionType::Regret, pos, 3);
        engine.state_mut().enemies.push(enemy);

        engine.tick();
        assert!(engine.state().enemies.is_empty());
        assert_eq!(engine.state().player.health, 0);
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.difficulty().history().count(), 0);

        engine.tick();
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.state().level, 1);
        assert_eq!(engine.tracker().borrow().stats().max_level, 1);

        let events = recorder.events();
        assert!(!events.iter().any(|e| matches!(e, HostEvent::LevelComplete(_))));
        assert_eq!(recorder.count(|e| matches!(e, HostEvent::GameOver(0))), 1);
    }

    #[test]
    fn test_kill_credits_score_coins_and_affirmation() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        engine.start();
        recorder.clear();

        let target = Vec2::new(100.0, 200.0);
        let enemy = enemy_at(&mut engine, EmotionType::Fear, target, 1);
        let affirmation = enemy.affirmation();
        let points = enemy.point_value;
        let coins = enemy.coin_value;
        engine.state_mut().enemies.push(enemy);
        let bullet = Projectile::player(target + Vec2::new(0.0, 10.0)).unwrap();
        engine.state_mut().bullets.push(bullet);

        engine.tick();
        let state = engine.state();
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, points);
        // First Release rewards coins on top of the kill
        let reward = crate::achievements::find("first_release").unwrap().reward;
        assert_eq!(state.coins, coins + reward);
        assert_eq!(state.affirmations.len(), 1);
        assert_eq!(state.affirmations[0].text, affirmation);
        assert!(!state.particles.is_empty());

        assert!(recorder.events().contains(&HostEvent::Score(points)));
        assert!(
            recorder
                .events()
                .contains(&HostEvent::Achievements(vec!["first_release"]))
        );
        assert_eq!(engine.tracker().borrow().stats().kills(EmotionType::Fear), 1);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut engine, _recorder) = engine_with(Settings::default());
        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        let ticks = engine.state().time_ticks;
        let cooldown = engine.state().player.cooldown_timer;
        let elapsed = engine.level_manager().elapsed_frames();

        engine.pause();
        for _ in 0..100 {
            engine.tick();
        }
        assert_eq!(engine.state().time_ticks, ticks);
        assert_eq!(engine.state().player.cooldown_timer, cooldown);
        assert_eq!(engine.level_manager().elapsed_frames(), elapsed);

        engine.resume();
        engine.tick();
        assert_eq!(engine.state().time_ticks, ticks + 1);
    }

    #[test]
    fn test_stop_is_final() {
        let (mut engine, _recorder) = engine_with(Settings::default());
        engine.start();
        engine.tick();
        engine.stop();
        let ticks = engine.state().time_ticks;
        engine.tick();
        engine.start();
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Stopped);
        assert_eq!(engine.state().time_ticks, ticks);
        // stopping twice is harmless
        engine.stop();
    }

    #[test]
    fn test_auto_fire_cadence_and_shot_tracking() {
        let (mut engine, _recorder) = engine_with(Settings::default());
        engine.start();
        let interval = engine.state().player.fire_interval() as usize;
        for _ in 0..interval * 3 {
            engine.tick();
        }
        let shots = engine.tracker().borrow().stats().shots_fired;
        assert_eq!(shots, 3);
    }

    #[test]
    fn test_fire_trigger_without_auto_fire() {
        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        engine.tick();
        assert!(engine.state().bullets.is_empty());
        engine.set_fire(true);
        engine.tick();
        assert_eq!(engine.state().bullets.len(), 1);
    }

    #[test]
    fn test_keyboard_moves_player() {
        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        let start = engine.state().player.pos;
        engine.set_key(Direction::Left, true);
        for _ in 0..10 {
            engine.tick();
        }
        engine.set_key(Direction::Left, false);
        assert!(engine.state().player.pos.x < start.x);
        assert_eq!(engine.state().player.pos.y, start.y);
    }

    #[test]
    fn test_level_completes_and_next_level_starts() {
        let (mut engine, recorder) = engine_with(quiet_settings());
        engine.start();
        // Budget spent and field clear: the level ends this frame
        let total = engine.level_manager().total_enemies();
        engine.level.enemies_spawned = total;
        engine.tick();

        assert_eq!(engine.phase(), GamePhase::Breather);
        let completes: Vec<_> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::LevelComplete(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(completes.len(), 1);
        assert_eq!(completes[0].level, 1);
        // Finishing instantly earns the full time bonus
        assert!(completes[0].score > 0);
        assert_eq!(engine.difficulty().history().count(), 1);

        for _ in 0..BREATHER_DURATION_TICKS {
            engine.tick();
        }
        assert_eq!(engine.phase(), GamePhase::Playing);
        assert_eq!(engine.state().level, 2);
        assert_eq!(engine.level_manager().level, 2);
        assert_eq!(engine.tracker().borrow().stats().max_level, 2);
    }

    #[test]
    fn test_level_not_complete_with_live_enemies() {
        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        let total = engine.level_manager().total_enemies();
        engine.level.enemies_spawned = total;
        let enemy = enemy_at(&mut engine, EmotionType::Shame, Vec2::new(50.0, 50.0), 5);
        engine.state_mut().enemies.push(enemy);
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_faulted_enemy_is_dropped_without_stopping_frame() {
        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        let mut broken = enemy_at(&mut engine, EmotionType::Fear, Vec2::new(50.0, 50.0), 2);
        broken.motion.speed = f32::NAN;
        let healthy = enemy_at(&mut engine, EmotionType::Regret, Vec2::new(600.0, 50.0), 2);
        engine.state_mut().enemies.push(broken);
        engine.state_mut().enemies.push(healthy);

        engine.tick();
        let ids: Vec<u32> = engine.state().enemies.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 1);
        assert!(engine.state().enemies[0].motion.pos.is_finite());
        assert_eq!(engine.state().time_ticks, 1);
    }

    #[test]
    fn test_panicking_host_does_not_break_loop() {
        struct Grumpy;
        impl GameHost for Grumpy {
            fn on_health(&mut self, _current: u32, _max: u32) {
                panic!("host bug");
            }
        }
        let tracker = Rc::new(RefCell::new(AchievementTracker::load(Box::new(
            MemoryStore::new(),
        ))));
        let mut engine = Engine::new(quiet_settings(), tracker, 5)
            .unwrap()
            .with_host(Box::new(Grumpy));
        engine.start();
        engine.tick();
        assert_eq!(engine.state().time_ticks, 1);
    }

    #[test]
    fn test_enemies_spawn_over_time() {
        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        for _ in 0..200 {
            engine.tick();
        }
        assert!(engine.level_manager().enemies_spawned > 0);
        assert!(!engine.state().enemies.is_empty() || engine.phase() != GamePhase::Playing);
    }

    #[test]
    fn test_screen_shake_on_hit_respects_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..quiet_settings()
        };
        let (mut engine, _recorder) = engine_with(settings);
        engine.start();
        let pos = engine.state().player.pos;
        let enemy = enemy_at(&mut engine, EmotionType::Anger, pos, 1);
        engine.state_mut().enemies.push(enemy);
        engine.tick();
        assert_eq!(engine.state().screen_shake, 0.0);

        let (mut engine, _recorder) = engine_with(quiet_settings());
        engine.start();
        let pos = engine.state().player.pos;
        let enemy = enemy_at(&mut engine, EmotionType::Anger, pos, 1);
        engine.state_mut().enemies.push(enemy);
        engine.tick();
        assert!(engine.state().screen_shake > 0.5);
    }
}
