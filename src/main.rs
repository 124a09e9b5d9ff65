//! Orb Siege entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use orb_siege::consts::*;
    use orb_siege::platform::storage::LocalStorage;
    use orb_siege::platform::time::PerformanceClock;
    use orb_siege::platform::{Clock, InputState};
    use orb_siege::renderer::{CanvasRenderer, draw_scene};
    use orb_siege::sim::{Arena, GameEvent, GameState, tick};
    use orb_siege::{HighScores, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        input: InputState,
        clock: PerformanceClock,
        store: LocalStorage,
        highscores: HighScores,
        accumulator: f64,
        last_time: f64,
        /// Simulation clock, advanced in fixed steps
        sim_time: f64,
        /// Pending requestAnimationFrame, None while the loop is stopped
        frame_handle: Option<i32>,
    }

    impl Game {
        /// Begin a new run: reset state and input, clear the canvas
        fn start(&mut self) {
            self.accumulator = 0.0;
            self.last_time = self.clock.now_ms();
            self.input.release_all();
            self.state.start(self.sim_time);
            self.renderer.clear();
            set_text("score", "0");
            set_text("upgrade-status", "");
            set_display("popup", "none");
        }

        /// Run simulation steps for the time elapsed since the last frame
        fn update(&mut self, time: f64) {
            let dt = (time - self.last_time).clamp(0.0, 100.0);
            self.last_time = time;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                self.sim_time += SIM_DT_MS;
                let input = self.input.snapshot();
                tick(&mut self.state, &input, self.sim_time);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();

                if !self.state.is_running() {
                    self.accumulator = 0.0;
                    break;
                }
            }
        }

        /// React to simulation events and refresh HUD text
        fn update_hud(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ScoreChanged(score) => set_text("score", &score.to_string()),
                    GameEvent::GameOver { final_score } => self.game_over(final_score),
                    _ => {}
                }
            }
            if self.state.is_running() {
                set_text(
                    "upgrade-status",
                    &self.state.effects.countdown_text(self.sim_time),
                );
            }
        }

        fn game_over(&mut self, final_score: u64) {
            set_text("upgrade-status", "");
            set_text("popup-score", &final_score.to_string());
            set_display("popup", "flex");

            if self.highscores.qualifies(final_score) {
                let name = web_sys::window()
                    .and_then(|w| w.prompt_with_message("New high score! Your name (5 letters):").ok())
                    .flatten();
                if let Some(rank) = self.highscores.record(name.as_deref(), final_score) {
                    log::info!("High score recorded at rank {}", rank);
                    if let Err(e) = self.highscores.save(&mut self.store) {
                        log::warn!("Could not save high scores: {}", e);
                    }
                }
            }
            set_text("highscores", &self.highscores.display_lines().join("\n"));
        }

        fn render(&mut self) {
            if self.state.is_running() {
                draw_scene(&self.state, &mut self.renderer);
            }
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(id: &str, display: &str) {
        if let Some(el) = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = el.style().set_property("display", display);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Orb Siege starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas")
            .ok()
            .flatten()
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Canvas matches the viewport at load and is not resized afterwards
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| *v > 0.0)
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| *v > 0.0)
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let store = LocalStorage::new();
        let tuning = Tuning::load(&store);
        let highscores = HighScores::load(&store);
        set_text("highscores", &highscores.display_lines().join("\n"));

        let seed = js_sys::Date::now() as u64;
        let arena = Arena::new(width as f32, height as f32);
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(tuning, arena, seed),
            renderer: CanvasRenderer::new(ctx, width, height),
            input: InputState::new(),
            clock: PerformanceClock::new(),
            store,
            highscores,
            accumulator: 0.0,
            last_time: 0.0,
            sim_time: 0.0,
            frame_handle: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_start_button(game);

        log::info!("Orb Siege ready!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_down(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.pointer_moved(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().input.pointer_down(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: held keys would otherwise stay stuck
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("start-game-button")) else {
            log::warn!("No start button found");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let needs_loop = {
                let mut g = game.borrow_mut();
                g.start();
                g.frame_handle.is_none()
            };
            if needs_loop {
                request_animation_frame(game.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle_target = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        handle_target.borrow_mut().frame_handle = handle;
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            g.update(time);
            g.render();
            g.update_hud();
            g.state.is_running()
        };

        // The frame subscription ends with the run; the start button resumes it
        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orb_siege::platform::Clock;
    use orb_siege::platform::time::InstantClock;

    env_logger::init();
    log::info!("Orb Siege (native) starting...");
    log::info!("Native mode runs a headless autopilot - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let wall = InstantClock::new();
    let (score, survived_ms) = headless::run(seed, 180_000.0);
    log::info!("Headless run took {:.1}ms", wall.now_ms());
    println!(
        "Autopilot (seed {}) scored {} and survived {:.1}s",
        seed,
        score,
        survived_ms / 1000.0
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use orb_siege::consts::SIM_DT_MS;
    use orb_siege::platform::{Clock, InputState, ManualClock, MemoryStore};
    use orb_siege::sim::{Arena, GameEvent, GameState, tick};
    use orb_siege::{HighScores, Tuning};

    /// Play one run with a simple dodge-and-shoot bot; returns (score, time survived)
    pub fn run(seed: u64, limit_ms: f64) -> (u64, f64) {
        let mut store = MemoryStore::new();
        let tuning = Tuning::load(&store);
        let mut highscores = HighScores::load(&store);
        let clock = ManualClock::new(0.0);
        let mut input = InputState::new();

        let mut state = GameState::new(tuning, Arena::new(800.0, 600.0), seed);
        state.start(clock.now_ms());

        while state.is_running() && state.elapsed_ms() < limit_ms {
            steer(&state, &mut input);
            let now = clock.advance(SIM_DT_MS);
            tick(&mut state, &input.snapshot(), now);
            input.clear_one_shots();

            for event in state.drain_events() {
                match event {
                    GameEvent::BossSpawned { escalation } => {
                        log::info!("Escalation level {}", escalation)
                    }
                    GameEvent::UpgradeActivated { kind, .. } => log::info!("Picked up {:?}", kind),
                    GameEvent::GameOver { final_score } => {
                        if let Some(rank) = highscores.record(Some("BOT"), final_score) {
                            log::info!("Autopilot placed #{}", rank);
                        }
                        if let Err(e) = highscores.save(&mut store) {
                            log::warn!("Could not save high scores: {}", e);
                        }
                    }
                    _ => {}
                }
            }
        }

        (state.score.value(), state.elapsed_ms())
    }

    /// Aim at the closest enemy, keep firing, back away when it gets close
    fn steer(state: &GameState, input: &mut InputState) {
        let player = state.player.pos;
        let closest = state.enemies.iter().min_by(|a, b| {
            let da = a.pos.distance_squared(player);
            let db = b.pos.distance_squared(player);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

        for key in ["w", "a", "s", "d"] {
            input.key_up(key);
        }

        let Some(enemy) = closest else {
            input.pointer_up();
            return;
        };

        if state.frame % 10 == 0 {
            input.pointer_down(enemy.pos);
        } else {
            input.pointer_moved(enemy.pos);
        }

        let away = player - enemy.pos;
        if away.length() < enemy.radius + 120.0 {
            // Drift back toward the center while dodging so we don't leave the arena
            let dir = away.normalize_or_zero() + (state.arena.center() - player) / 400.0;
            press_toward(input, dir);
        }
    }

    fn press_toward(input: &mut InputState, dir: Vec2) {
        if dir.x > 0.2 {
            input.key_down("d");
        } else if dir.x < -0.2 {
            input.key_down("a");
        }
        if dir.y > 0.2 {
            input.key_down("s");
        } else if dir.y < -0.2 {
            input.key_down("w");
        }
    }
}
