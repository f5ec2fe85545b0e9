//! Session state machine
//!
//! `Idle -> Running -> GameOver -> Idle`. The session owns the game state,
//! the spawn timer and the outstanding frame request, and talks to the host
//! only through the injected [`Services`].
//!
//! Two periodic callbacks drive a running session: [`Session::on_frame`]
//! (once per display frame) and [`Session::service_timers`] (on any cadence;
//! spawns follow the clock, not the frame rate). Both are guarded by the
//! running flag, so a callback arriving after the run stopped does nothing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, Cue};
use crate::highscores::{HighScore, Submission};
use crate::persistence::HighScoreStore;
use crate::platform::{Clock, FrameHandle, FrameScheduler};
use crate::render::{Canvas, draw_hud};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, SpawnScheduler, TickInput, spawn_enemy, tick};
use crate::tuning::{Difficulty, Tuning};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a difficulty to be picked
    Idle,
    /// Simulation advancing
    Running,
    /// Run over, results on display
    GameOver,
}

/// Results of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u64,
    /// Best score after this run was counted
    pub high_score: u64,
    pub new_high_score: bool,
    pub difficulty: Difficulty,
}

/// Host capabilities the session calls into
pub struct Services {
    pub clock: Box<dyn Clock>,
    pub frames: Box<dyn FrameScheduler>,
    pub audio: Box<dyn AudioSink>,
    pub store: Box<dyn HighScoreStore>,
}

/// One player's game, from difficulty pick to results screen and back
pub struct Session {
    phase: Phase,
    state: GameState,
    spawner: SpawnScheduler,
    /// Outstanding frame request, if the loop is live
    frame: Option<FrameHandle>,
    input: TickInput,
    rng: Pcg32,
    high_score: HighScore,
    settings: Settings,
    summary: Option<GameOverSummary>,
    /// Scratch buffer reused every tick
    events: Vec<GameEvent>,
    services: Services,
}

impl Session {
    pub fn new(tuning: Tuning, settings: Settings, mut services: Services, seed: u64) -> Self {
        services.audio.set_muted(settings.muted);
        let high_score = HighScore::load(services.store.as_ref());
        Self {
            phase: Phase::Idle,
            state: GameState::new(tuning, settings.difficulty),
            spawner: SpawnScheduler::new(),
            frame: None,
            input: TickInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            high_score,
            settings,
            summary: None,
            events: Vec::new(),
            services,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn summary(&self) -> Option<&GameOverSummary> {
        self.summary.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Whether a frame request is outstanding
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Replace the held movement input
    pub fn set_input(&mut self, input: TickInput) {
        self.input = input;
    }

    /// Begin a run at `difficulty`.
    ///
    /// Only from Idle: a running game keeps its difficulty, and the results
    /// screen must go through [`Session::restart`] first.
    pub fn start(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != Phase::Idle {
            log::debug!(
                "start({}) ignored while {:?}",
                difficulty.as_str(),
                self.phase
            );
            return false;
        }

        self.state.reset(difficulty);
        self.summary = None;
        self.phase = Phase::Running;

        if self.settings.difficulty != difficulty {
            self.settings.difficulty = difficulty;
            self.settings.save();
        }

        let now = self.services.clock.now_ms();
        self.spawner.start(now, self.state.params().spawn_rate_ms);
        if self.frame.is_none() {
            self.frame = Some(self.services.frames.request_frame());
        }

        self.services.audio.play(Cue::GameStart);
        log::info!("Run started on {}", difficulty.as_str());
        true
    }

    /// Fire a bullet from the player. Only while running.
    pub fn fire(&mut self) -> bool {
        if self.phase != Phase::Running || !self.state.running {
            return false;
        }
        self.state.fire_bullet();
        self.services.audio.play(Cue::Shoot);
        true
    }

    /// Run spawn timer firings that are due. Returns the number of enemies spawned.
    pub fn service_timers(&mut self) -> u32 {
        let now = self.services.clock.now_ms();
        let due = self.spawner.take_due(now);
        let mut spawned = 0;
        for _ in 0..due {
            if spawn_enemy(&mut self.state, &mut self.rng) {
                spawned += 1;
            }
        }
        spawned
    }

    /// Frame callback: tick, render, then ask for the next frame.
    pub fn on_frame(&mut self, canvas: &mut dyn Canvas) {
        // This frame's request has been served
        self.frame = None;
        if self.phase != Phase::Running || !self.state.running {
            return;
        }

        self.events.clear();
        tick(&mut self.state, &self.input, &mut self.events);

        let mut over = false;
        for event in &self.events {
            match event {
                GameEvent::EnemyDestroyed => self.services.audio.play(Cue::Hit),
                GameEvent::GameOver => over = true,
                _ => {}
            }
        }

        self.render(canvas);

        if over {
            self.end_game();
        } else {
            self.frame = Some(self.services.frames.request_frame());
        }
    }

    /// Draw entities and the HUD
    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear();
        self.state.player.draw(canvas);
        for bullet in &self.state.bullets {
            bullet.draw(canvas);
        }
        for enemy in &self.state.enemies {
            enemy.draw(canvas);
        }
        draw_hud(
            canvas,
            self.state.score,
            self.state.player.lives,
            self.state.player.health,
        );
    }

    /// End the current run as if the player had lost. No-op unless running.
    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.end_game();
        } else {
            self.teardown();
        }
    }

    /// Results screen back to difficulty selection
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.phase = Phase::Idle;
        self.summary = None;
        self.high_score = HighScore::load(self.services.store.as_ref());
        true
    }

    /// Flip the global mute flag; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.settings.toggle_mute();
        self.services.audio.set_muted(muted);
        self.settings.save();
        muted
    }

    /// Cancel the spawn timer and frame loop. Safe to repeat.
    fn teardown(&mut self) {
        self.state.running = false;
        self.spawner.cancel();
        if let Some(handle) = self.frame.take() {
            self.services.frames.cancel_frame(handle);
        }
    }

    fn end_game(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.teardown();
        self.phase = Phase::GameOver;

        self.services.audio.stop_all();
        self.services.audio.play(Cue::GameOver);

        let score = self.state.score;
        let new_high_score = matches!(
            self.high_score.submit(score, self.services.store.as_mut()),
            Submission::NewBest { .. }
        );
        self.summary = Some(GameOverSummary {
            final_score: score,
            high_score: self.high_score.best,
            new_high_score,
            difficulty: self.state.difficulty,
        });
        log::info!(
            "Game over: score {} (best {}{})",
            score,
            self.high_score.best,
            if new_high_score { ", new" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCall, CueLog, NullAudio};
    use crate::persistence::MemoryStore;
    use crate::platform::{ManualClock, ManualFrames};
    use crate::render::DrawList;
    use crate::sim::Enemy;
    use proptest::prelude::*;

    struct Harness {
        session: Session,
        clock: ManualClock,
        frames: ManualFrames,
        audio: CueLog,
        store: MemoryStore,
    }

    impl Harness {
        fn new(stored_high: u64) -> Self {
            let clock = ManualClock::new();
            let frames = ManualFrames::new();
            let audio = CueLog::new();
            let store = MemoryStore::with_value(stored_high);
            let services = Services {
                clock: Box::new(clock.clone()),
                frames: Box::new(frames.clone()),
                audio: Box::new(audio.clone()),
                store: Box::new(store.clone()),
            };
            let session = Session::new(Tuning::default(), Settings::default(), services, 42);
            Self {
                session,
                clock,
                frames,
                audio,
                store,
            }
        }

        /// Serve the pending frame, if any
        fn frame(&mut self) -> bool {
            if self.frames.take_pending().is_none() {
                return false;
            }
            self.session.on_frame(&mut DrawList::new());
            true
        }

        /// Drop an enemy right on top of the player
        fn ram_player(&mut self) {
            let pos = self.session.state.player.pos;
            let tuning = self.session.state.tuning.clone();
            self.session
                .state
                .enemies
                .push(Enemy::new(pos, 2.0, &tuning));
        }

        /// Put the player one hit from losing and take that hit
        fn lose(&mut self) {
            self.session.state.player.lives = 1;
            self.session.state.player.health = 20;
            self.ram_player();
            assert!(self.frame());
        }
    }

    #[test]
    fn test_starts_idle() {
        let h = Harness::new(0);
        assert_eq!(h.session.phase(), Phase::Idle);
        assert!(!h.session.state().running);
        assert!(!h.frames.is_pending());
    }

    #[test]
    fn test_plays_without_sound() {
        let clock = ManualClock::new();
        let frames = ManualFrames::new();
        let services = Services {
            clock: Box::new(clock.clone()),
            frames: Box::new(frames.clone()),
            audio: Box::new(NullAudio),
            store: Box::new(MemoryStore::new()),
        };
        let mut session = Session::new(Tuning::default(), Settings::default(), services, 7);
        assert!(session.start(Difficulty::Hard));
        assert!(session.fire());
        clock.advance(600.0);
        assert_eq!(session.service_timers(), 1);
        assert!(frames.take_pending().is_some());
        session.on_frame(&mut DrawList::new());
        assert_eq!(session.state().enemies.len(), 1);
        assert!(frames.is_pending());
    }

    #[test]
    fn test_start_runs_and_requests_frame() {
        let mut h = Harness::new(0);
        assert!(h.session.start(Difficulty::Easy));
        assert_eq!(h.session.phase(), Phase::Running);
        assert!(h.session.state().running);
        assert_eq!(h.session.state().player.lives, 3);
        assert!(h.frames.is_pending());
        assert_eq!(h.audio.played(), vec![Cue::GameStart]);
    }

    #[test]
    fn test_one_spawn_per_interval() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);

        h.clock.advance(1499.0);
        assert_eq!(h.session.service_timers(), 0);
        h.clock.advance(1.0);
        assert_eq!(h.session.service_timers(), 1);

        let enemies = &h.session.state().enemies;
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].pos.y, -40.0);
        assert_eq!(enemies[0].speed, 2.0);
    }

    #[test]
    fn test_spawns_follow_clock_not_frames() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Hard);
        for _ in 0..100 {
            assert!(h.frame());
        }
        assert!(h.session.state().enemies.is_empty());

        h.clock.advance(1800.0);
        assert_eq!(h.session.service_timers(), 3);
    }

    #[test]
    fn test_difficulty_locked_while_running() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);
        h.clock.advance(1000.0);
        assert!(!h.session.start(Difficulty::Hard));
        assert_eq!(h.session.state().difficulty, Difficulty::Easy);
        assert_eq!(h.session.settings().difficulty, Difficulty::Easy);

        // The original 1500 ms deadline still rules
        h.clock.set(1500.0);
        assert_eq!(h.session.service_timers(), 1);
        assert_eq!(h.session.state().enemies[0].speed, 2.0);
        assert_eq!(h.frames.requests(), 1);
        assert_eq!(h.audio.count(Cue::GameStart), 1);
    }

    #[test]
    fn test_start_records_difficulty_in_settings() {
        let mut h = Harness::new(0);
        assert_eq!(h.session.settings().difficulty, Difficulty::Medium);
        h.session.start(Difficulty::Hard);
        assert_eq!(h.session.settings().difficulty, Difficulty::Hard);
        assert_eq!(h.session.state().difficulty, Difficulty::Hard);

        h.lose();
        h.session.restart();
        h.session.start(Difficulty::Easy);
        assert_eq!(h.session.settings().difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_frame_loop_keeps_requesting() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Medium);
        for _ in 0..5 {
            assert!(h.frame());
        }
        assert_eq!(h.session.state().time_ticks, 5);
        assert_eq!(h.frames.requests(), 6);
    }

    #[test]
    fn test_fire_only_while_running() {
        let mut h = Harness::new(0);
        assert!(!h.session.fire());
        h.session.start(Difficulty::Medium);
        assert!(h.session.fire());
        assert_eq!(h.session.state().bullets.len(), 1);
        assert_eq!(h.audio.count(Cue::Shoot), 1);
    }

    #[test]
    fn test_shooting_enemy_plays_hit() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Medium);
        h.session.fire();
        let p = h.session.state.bullets[0].pos;
        let tuning = h.session.state.tuning.clone();
        h.session
            .state
            .enemies
            .push(Enemy::new(glam::Vec2::new(p.x - 10.0, p.y - 50.0), 4.0, &tuning));

        assert!(h.frame());
        assert_eq!(h.session.state().score, 10);
        assert_eq!(h.audio.count(Cue::Hit), 1);
    }

    #[test]
    fn test_last_hit_ends_run() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);
        h.lose();

        assert_eq!(h.session.phase(), Phase::GameOver);
        assert_eq!(h.session.state().player.lives, 0);
        assert!(!h.session.state().running);
        assert!(!h.frames.is_pending());
        assert!(h.session.summary().is_some());
    }

    #[test]
    fn test_game_over_silences_then_plays_cue() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);
        h.lose();
        let calls = h.audio.calls();
        let n = calls.len();
        assert_eq!(
            &calls[n - 2..],
            &[AudioCall::StopAll, AudioCall::Play(Cue::GameOver)]
        );
    }

    #[test]
    fn test_new_high_score_saved() {
        let mut h = Harness::new(100);
        h.session.start(Difficulty::Easy);
        h.session.state.score = 150;
        h.lose();

        let summary = *h.session.summary().unwrap();
        assert!(summary.new_high_score);
        assert_eq!(summary.final_score, 150);
        assert_eq!(summary.high_score, 150);
        assert_eq!(h.store.load(), 150);
        assert_eq!(h.session.high_score(), 150);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut h = Harness::new(100);
        h.session.start(Difficulty::Easy);
        h.session.state.score = 80;
        h.lose();

        let summary = *h.session.summary().unwrap();
        assert!(!summary.new_high_score);
        assert_eq!(summary.high_score, 100);
        assert_eq!(h.store.load(), 100);
        assert_eq!(h.store.saves(), 0);
    }

    #[test]
    fn test_stale_callbacks_after_game_over() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Hard);
        h.lose();
        let ticks = h.session.state().time_ticks;

        h.clock.advance(10_000.0);
        assert_eq!(h.session.service_timers(), 0);
        h.session.on_frame(&mut DrawList::new());
        assert_eq!(h.session.state().time_ticks, ticks);
        assert!(h.session.state().enemies.is_empty());
        assert!(!h.session.fire());
    }

    #[test]
    fn test_stop_twice_same_as_once() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Medium);
        h.session.state.score = 30;

        h.session.stop();
        let phase = h.session.phase();
        let summary = h.session.summary().copied();
        let calls = h.audio.calls();
        let saves = h.store.saves();

        h.session.stop();
        assert_eq!(h.session.phase(), phase);
        assert_eq!(h.session.summary().copied(), summary);
        assert_eq!(h.audio.calls(), calls);
        assert_eq!(h.store.saves(), saves);
        assert!(!h.frames.is_pending());
        assert!(!h.session.frame_pending());
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut h = Harness::new(0);
        h.session.stop();
        h.session.stop();
        assert_eq!(h.session.phase(), Phase::Idle);
        assert!(h.audio.calls().is_empty());
    }

    #[test]
    fn test_restart_returns_to_idle_without_reset() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);
        h.session.state.score = 40;
        h.lose();

        assert!(!h.session.start(Difficulty::Easy));
        assert!(h.session.restart());
        assert_eq!(h.session.phase(), Phase::Idle);
        assert!(h.session.summary().is_none());
        // Score is only cleared by the next start
        assert_eq!(h.session.state().score, 40);
        assert!(!h.session.restart());

        assert!(h.session.start(Difficulty::Hard));
        assert_eq!(h.session.state().score, 0);
        assert!(h.frames.is_pending());
    }

    #[test]
    fn test_mute_toggle() {
        let mut h = Harness::new(0);
        assert!(h.session.toggle_mute());
        assert!(h.audio.is_muted());
        assert!(h.session.settings().muted);
        h.session.start(Difficulty::Easy);
        h.session.fire();
        assert!(h.audio.played().is_empty());
        assert!(!h.session.toggle_mute());
        assert!(!h.audio.is_muted());
        h.session.fire();
        assert_eq!(h.audio.played(), vec![Cue::Shoot]);
    }

    #[test]
    fn test_render_draws_everything() {
        let mut h = Harness::new(0);
        h.session.start(Difficulty::Easy);
        h.session.fire();
        h.clock.advance(1500.0);
        h.session.service_timers();

        let mut list = DrawList::new();
        h.session.render(&mut list);
        use crate::render::Sprite;
        assert_eq!(list.count(Sprite::Player), 1);
        assert_eq!(list.count(Sprite::Bullet), 1);
        assert_eq!(list.count(Sprite::Enemy), 1);
        assert_eq!(list.texts(), vec!["Score: 0", "Lives: 3", "Health: 100%"]);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Frame { left: bool, right: bool },
        Fire,
        Wait(u16),
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            4 => (any::<bool>(), any::<bool>()).prop_map(|(left, right)| Action::Frame { left, right }),
            1 => Just(Action::Fire),
            2 => (0u16..400).prop_map(Action::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_and_health_invariants(actions in prop::collection::vec(action(), 1..400)) {
            let mut h = Harness::new(0);
            h.session.start(Difficulty::Hard);
            let mut last_score = 0;

            for action in actions {
                match action {
                    Action::Frame { left, right } => {
                        h.session.set_input(TickInput { move_left: left, move_right: right });
                        h.frame();
                    }
                    Action::Fire => {
                        h.session.fire();
                    }
                    Action::Wait(ms) => {
                        h.clock.advance(ms as f64);
                        h.session.service_timers();
                    }
                }

                let state = h.session.state();
                prop_assert!(state.score >= last_score);
                prop_assert_eq!(state.score % 10, 0);
                prop_assert!((0..=100).contains(&state.player.health));
                prop_assert!(state.player.lives <= 3);
                if state.player.lives == 0 {
                    prop_assert_eq!(h.session.phase(), Phase::GameOver);
                }
                last_score = state.score;
            }
        }
    }
}
