//! Neon Bricks entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The
//! scheduler (requestAnimationFrame) lives out here; the simulation only
//! ever sees one `step` call per tick.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use neon_bricks::audio::{AudioManager, AudioSink, SoundEffect};
    use neon_bricks::renderer::{RenderState, build_frame};
    use neon_bricks::settings::Settings;
    use neon_bricks::sim::{GameEvent, GameState, InputEvent, PaddleDir, step};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        /// Scratch buffer reused across frames
        events: Vec<GameEvent>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state: GameState::new(),
                render_state: None,
                audio,
                settings,
                events: Vec::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance the simulation by one step and dispatch its events
        fn update(&mut self, time: f64) {
            self.events.clear();
            step(&mut self.state, &mut self.events);

            for event in &self.events {
                match event {
                    GameEvent::PaddleBounce => self.audio.play(SoundEffect::PaddleBounce),
                    GameEvent::BrickDestroyed { .. } => {
                        self.audio.play(SoundEffect::BrickDestroy)
                    }
                    GameEvent::LevelCleared => {
                        log::info!(
                            "Level cleared - now on level {} with score {}",
                            self.state.level,
                            self.state.score
                        );
                    }
                    GameEvent::BallLost => {
                        log::info!("Ball lost - score and level reset");
                    }
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_frame(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) =
                        document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Bricks starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_rules_panel();

        // Start game loop
        request_animation_frame(game);

        log::info!("Neon Bricks running!");
    }

    /// Map the two logical buttons onto the paddle velocity intent
    fn key_to_input(key: &str, pressed: bool) -> Option<InputEvent> {
        let dir = match key {
            "ArrowRight" | "d" | "D" => PaddleDir::Right,
            "ArrowLeft" | "a" | "A" => PaddleDir::Left,
            _ => return None,
        };
        Some(if pressed {
            InputEvent::Press(dir)
        } else {
            InputEvent::Release(dir)
        })
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(input) = key_to_input(&event.key(), true) {
                    let mut g = game.borrow_mut();
                    g.state.apply_input(input);
                    // Browsers keep audio suspended until a user gesture
                    g.audio.resume();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(input) = key_to_input(&event.key(), false) {
                    game.borrow_mut().state.apply_input(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Rules overlay open/close - pure DOM, independent of the simulation
    fn setup_rules_panel() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("rules-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(rules) = document.get_element_by_id("rules") {
                    let _ = rules.set_attribute("class", "rules show");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("close-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                if let Some(rules) = document.get_element_by_id("rules") {
                    let _ = rules.set_attribute("class", "rules");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_bricks::audio::{AudioSink, NullAudio, SoundEffect};
    use neon_bricks::sim::{GameEvent, GameState, InputEvent, PaddleDir, step};

    env_logger::init();
    log::info!("Neon Bricks (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Headless smoke run: hold right for a while, then let the ball play out
    let mut state = GameState::new();
    let mut events = Vec::new();
    let audio = NullAudio;
    state.apply_input(InputEvent::Press(PaddleDir::Right));

    let mut destroyed = 0u32;
    let mut bounces = 0u32;
    for frame in 0..600 {
        if frame == 120 {
            state.apply_input(InputEvent::Release(PaddleDir::Right));
        }
        events.clear();
        step(&mut state, &mut events);
        for event in &events {
            match event {
                GameEvent::BrickDestroyed { .. } => {
                    destroyed += 1;
                    audio.play(SoundEffect::BrickDestroy);
                }
                GameEvent::PaddleBounce => {
                    bounces += 1;
                    audio.play(SoundEffect::PaddleBounce);
                }
                _ => {}
            }
        }
    }

    println!(
        "600 frames: {} bricks destroyed, {} paddle bounces, score {}, level {}",
        destroyed, bounces, state.score, state.level
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
