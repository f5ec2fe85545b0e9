//! Sky Shooter entry point
//!
//! Web: wires the canvas, DOM buttons and keyboard to a session.
//! Native: plays one deterministic headless run with an autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

    use sky_shooter::audio::web::WebAudio;
    use sky_shooter::persistence::LocalStorageStore;
    use sky_shooter::platform::web::{AnimationFrames, PerformanceClock};
    use sky_shooter::render::{Canvas, Sprite};
    use sky_shooter::sim::{Rect, TickInput};
    use sky_shooter::{Difficulty, Phase, Services, Session, Settings, Tuning};

    /// How often the spawn timer is serviced
    const TIMER_PUMP_MS: i32 = 10;

    /// Canvas 2D painter; coloured boxes stand in for sprite images
    struct Painter {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
    }

    impl Canvas for Painter {
        fn clear(&mut self) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
        }

        fn draw_sprite(&mut self, sprite: Sprite, rect: Rect, mirrored: bool) {
            let color = match sprite {
                Sprite::Player => "#4fc3f7",
                Sprite::Bullet => "#ffee58",
                Sprite::Enemy => "#ef5350",
            };
            let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            self.ctx.set_fill_style_str(color);
            self.ctx.fill_rect(x, y, w, h);

            // Cockpit marker shows which way the ship faces
            if sprite == Sprite::Player {
                let eye_x = if mirrored { x + w * 0.15 } else { x + w * 0.65 };
                self.ctx.set_fill_style_str("#0d47a1");
                self.ctx.fill_rect(eye_x, y + h * 0.2, w * 0.2, h * 0.2);
            }
        }

        fn draw_text(&mut self, text: &str, x: f32, y: f32) {
            self.ctx.set_fill_style_str("white");
            self.ctx.set_font("20px Arial");
            let _ = self.ctx.fill_text(text, x as f64, y as f64);
        }
    }

    /// Game instance holding the session and its painter
    struct Game {
        session: Session,
        painter: Painter,
        held: TickInput,
    }

    impl Game {
        fn frame(&mut self) {
            let before = self.session.phase();
            self.session.set_input(self.held);
            self.session.on_frame(&mut self.painter);
            if before == Phase::Running && self.session.phase() == Phase::GameOver {
                show_game_over(&self.session);
            }
        }

        fn start(&mut self, difficulty: Difficulty) {
            if self.session.start(difficulty) {
                set_display("startScreen", "none");
                set_display("gameOverScreen", "none");
                set_display("gameCanvas", "block");
            }
        }

        fn restart(&mut self) {
            if self.session.restart() {
                set_display("gameOverScreen", "none");
                set_display("startScreen", "block");
                update_high_score_display(self.session.high_score());
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn element(id: &str) -> Option<HtmlElement> {
        document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn set_display(id: &str, value: &str) {
        if let Some(el) = element(id) {
            let _ = el.style().set_property("display", value);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn update_high_score_display(high: u64) {
        set_text("highScoreDisplay", &format!("High Score: {}", high));
    }

    fn show_game_over(session: &Session) {
        let Some(summary) = session.summary() else { return };
        set_display(
            "newHighScore",
            if summary.new_high_score { "block" } else { "none" },
        );
        set_text("finalScore", &format!("Your Score: {}", summary.final_score));
        update_high_score_display(summary.high_score);
        set_display("gameCanvas", "none");
        set_display("gameOverScreen", "block");
    }

    fn on_click(id: &str, handler: impl FnMut() + 'static) {
        let Some(el) = element(id) else {
            log::warn!("Missing element #{}", id);
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: &Rc<RefCell<Game>>) {
        for (id, difficulty) in [
            ("easyBtn", Difficulty::Easy),
            ("mediumBtn", Difficulty::Medium),
            ("hardBtn", Difficulty::Hard),
        ] {
            let game = game.clone();
            on_click(id, move || game.borrow_mut().start(difficulty));
        }

        {
            let game = game.clone();
            on_click("restartBtn", move || game.borrow_mut().restart());
        }

        let game = game.clone();
        on_click("muteBtn", move || {
            let muted = game.borrow_mut().session.toggle_mute();
            set_text("muteBtn", if muted { "Unmute" } else { "Mute" });
        });
    }

    fn setup_keyboard(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowLeft" => g.held.move_left = true,
                    "ArrowRight" => g.held.move_right = true,
                    "Space" => {
                        event.prevent_default();
                        g.session.fire();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.code().as_str() {
                "ArrowLeft" => g.held.move_left = false,
                "ArrowRight" => g.held.move_right = false,
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_timer_pump(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let game = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().session.service_timers();
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_PUMP_MS,
        );
        closure.forget();
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Sky Shooter starting...");

        let tuning = Tuning::default();
        let Some(canvas) = document()
            .and_then(|d| d.get_element_by_id("gameCanvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        canvas.set_width(tuning.viewport_width as u32);
        canvas.set_height(tuning.viewport_height as u32);

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let settings = Settings::load();
        let mut audio = WebAudio::new();
        audio.set_volume(settings.cue_volume());
        let seed = js_sys::Date::now() as u64;

        let painter = Painter {
            ctx,
            width: tuning.viewport_width as f64,
            height: tuning.viewport_height as f64,
        };

        let game = Rc::new_cyclic(|weak: &Weak<RefCell<Game>>| {
            let weak = weak.clone();
            let frames = AnimationFrames::new(move |_time| {
                if let Some(game) = weak.upgrade() {
                    game.borrow_mut().frame();
                }
            });
            let services = Services {
                clock: Box::new(PerformanceClock),
                frames: Box::new(frames),
                audio: Box::new(audio),
                store: Box::new(LocalStorageStore),
            };
            RefCell::new(Game {
                session: Session::new(tuning, settings, services, seed),
                painter,
                held: TickInput::default(),
            })
        });

        {
            let g = game.borrow();
            update_high_score_display(g.session.high_score());
            set_text("muteBtn", if g.session.is_muted() { "Unmute" } else { "Mute" });
        }

        setup_buttons(&game);
        setup_keyboard(&game);
        setup_timer_pump(&game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Native headless run
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use sky_shooter::audio::CueLog;
    use sky_shooter::consts::FRAME_MS;
    use sky_shooter::persistence::JsonFileStore;
    use sky_shooter::platform::{ManualClock, ManualFrames};
    use sky_shooter::render::DrawList;
    use sky_shooter::sim::{GameState, TickInput};
    use sky_shooter::{Difficulty, Phase, Services, Session, Settings, Tuning};

    /// Stop after three minutes of game time even if the autopilot survives
    const MAX_FRAMES: u32 = 60 * 60 * 3;
    /// Bullets the autopilot allows in flight
    const MAX_BULLETS: usize = 3;
    const HIGH_SCORE_FILE: &str = "sky_shooter_highscore.json";
    const TUNING_ENV: &str = "SKY_SHOOTER_TUNING";
    const DIFFICULTY_ENV: &str = "SKY_SHOOTER_DIFFICULTY";

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var(TUNING_ENV) else {
            return Tuning::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// Chase the lowest enemy and shoot when under it
    fn autopilot(state: &GameState) -> (TickInput, bool) {
        let player = &state.player;
        let center = player.pos.x + player.size.x / 2.0;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.pos.y + e.size.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let Some(enemy) = target else {
            return (TickInput::default(), false);
        };
        let dx = enemy.pos.x + enemy.size.x / 2.0 - center;
        let input = TickInput {
            move_left: dx < -player.speed,
            move_right: dx > player.speed,
        };
        let fire = dx.abs() < enemy.size.x / 2.0 && state.bullets.len() < MAX_BULLETS;
        (input, fire)
    }

    pub fn run() {
        let tuning = load_tuning();
        let settings = Settings::load();
        let clock = ManualClock::new();
        let frames = ManualFrames::new();
        let audio = CueLog::new();
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        let store = JsonFileStore::new(HIGH_SCORE_FILE);
        log::info!("High scores kept in {}", store.path().display());
        let services = Services {
            clock: Box::new(clock.clone()),
            frames: Box::new(frames.clone()),
            audio: Box::new(audio.clone()),
            store: Box::new(store),
        };
        let difficulty = std::env::var(DIFFICULTY_ENV)
            .ok()
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or(settings.difficulty);
        let mut session = Session::new(tuning, settings, services, seed);
        log::info!("High score so far: {}", session.high_score());

        session.start(difficulty);
        let mut canvas = DrawList::new();
        let mut frame_count = 0;
        while session.phase() == Phase::Running && frame_count < MAX_FRAMES {
            clock.advance(FRAME_MS);
            session.service_timers();

            if frames.take_pending().is_some() {
                let (input, fire) = autopilot(session.state());
                session.set_input(input);
                if fire {
                    session.fire();
                }
                session.on_frame(&mut canvas);
            }
            frame_count += 1;
        }
        session.stop();

        log::info!(
            "Played {} frames, {} shots, {} hits",
            frame_count,
            audio.count(sky_shooter::audio::Cue::Shoot),
            audio.count(sky_shooter::audio::Cue::Hit)
        );
        for line in canvas.texts() {
            println!("{}", line);
        }
        if let Some(summary) = session.summary() {
            println!(
                "Your Score: {} | High Score: {}{}",
                summary.final_score,
                summary.high_score,
                if summary.new_high_score { " (new!)" } else { "" }
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Sky Shooter (native) starting...");
    headless::run();
}
