//! Word Ninja entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlSelectElement, MouseEvent,
        TouchEvent,
    };

    use word_ninja::achievements::{Achievements, LocalStorageStore};
    use word_ninja::audio::AudioManager;
    use word_ninja::consts::*;
    use word_ninja::render;
    use word_ninja::settings::Settings;
    use word_ninja::sim::{
        self, Category, Difficulty, GameConfig, GameEvent, GamePhase, GameState, Mode, Theme,
        WordBank, stars_for, title_for,
    };

    /// Game instance holding all state
    struct Game {
        state: GameState,
        source: WordBank,
        achievements: Achievements,
        store: LocalStorageStore,
        audio: AudioManager,
        settings: Settings,
        render_ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
        // Track phase for overlay/summary edge detection
        last_phase: GamePhase,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, render_ctx: CanvasRenderingContext2d) -> Self {
            let seed = js_sys::Date::now() as u64;
            let settings = Settings::load();
            let store = LocalStorageStore;
            let achievements = Achievements::load_from(&store);

            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            Self {
                state: GameState::new(seed),
                source: WordBank,
                achievements,
                store,
                audio,
                settings,
                render_ctx,
                canvas,
                accumulator: 0.0,
                last_time: 0.0,
                last_phase: GamePhase::Menu,
            }
        }

        /// Match the backing buffer to the displayed size and keep the
        /// sim's viewport current
        fn sync_viewport(&mut self) {
            let w = self.canvas.client_width().max(1) as u32;
            let h = self.canvas.client_height().max(1) as u32;
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
            self.state.set_viewport(w as f32, h as f32);
        }

        /// Run simulation ticks for the elapsed wall time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                SIM_DT
            };
            self.last_time = time;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                sim::tick(&mut self.state, &mut self.source);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            self.drain_events();
        }

        /// Forward sim events to the audio and achievement collaborators
        fn drain_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play(cue),
                    GameEvent::RoundStarted => {}
                    GameEvent::GameOver => {
                        let newly = self.achievements.evaluate(&self.state.stats, &self.store);
                        for achievement in &newly {
                            log::info!("Unlocked: {} {}", achievement.icon, achievement.title);
                        }
                    }
                }
            }
        }

        /// Dispatch a press/tap in canvas coordinates
        fn pointer(&mut self, x: f32, y: f32) {
            self.audio.resume();
            sim::handle_pointer(&mut self.state, x, y);
            self.drain_events();
        }

        fn render(&self) {
            render::draw_frame(
                &self.render_ctx,
                &self.state,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
            );
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.stats.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-time") {
                let secs = self.state.time_left_secs();
                el.set_text_content(Some(&format!("{:02}:{:02}", secs / 60, secs % 60)));
            }

            // Combo indicator only shows for an actual streak
            if let Some(el) = document.get_element_by_id("hud-combo") {
                if self.state.stats.combo > 1 {
                    let _ = el.set_attribute("class", "combo");
                    el.set_text_content(Some(&format!("Combo x{}", self.state.stats.combo)));
                } else {
                    let _ = el.set_attribute("class", "combo hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hud-category") {
                el.set_text_content(Some(self.state.config.category.name()));
            }
        }

        /// Show/hide the menu, HUD and summary overlays on phase changes
        fn sync_overlays(&mut self, document: &Document) {
            let phase = self.state.phase;
            if phase == self.last_phase {
                return;
            }
            self.last_phase = phase;

            set_visible(document, "menu", phase == GamePhase::Menu);
            set_visible(
                document,
                "hud",
                phase == GamePhase::Loading || phase == GamePhase::Playing,
            );
            set_visible(document, "loading", phase == GamePhase::Loading);
            set_visible(document, "game-over", phase == GamePhase::GameOver);

            match phase {
                GamePhase::GameOver => self.fill_summary(document),
                GamePhase::Menu => render_medal_wall(document, &self.achievements),
                _ => {}
            }
        }

        /// Populate the game-over panel from the finished run
        fn fill_summary(&self, document: &Document) {
            let stats = &self.state.stats;

            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&stats.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-title") {
                el.set_text_content(Some(title_for(stats.score)));
            }
            if let Some(el) = document.get_element_by_id("final-stars") {
                let stars = stars_for(stats.score) as usize;
                el.set_text_content(Some(&format!(
                    "{}{}",
                    "★".repeat(stars),
                    "☆".repeat(3 - stars)
                )));
            }

            let breakdown = [
                ("bd-base", stats.breakdown.base.to_string()),
                ("bd-combo", format!("+{}", stats.breakdown.combo)),
                ("bd-speed", format!("+{}", stats.breakdown.speed)),
                ("bd-penalty", format!("-{}", stats.breakdown.penalty)),
            ];
            for (id, value) in breakdown {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(&value));
                }
            }

            render_medal_wall(document, &self.achievements);
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Rebuild the medal wall list from the achievement set
    fn render_medal_wall(document: &Document, achievements: &Achievements) {
        let Some(list) = document.get_element_by_id("medal-list") else {
            return;
        };
        list.set_text_content(None);

        for achievement in achievements.entries() {
            let Ok(item) = document.create_element("li") else {
                continue;
            };
            let _ = item.set_attribute(
                "class",
                if achievement.unlocked { "medal unlocked" } else { "medal" },
            );
            item.set_text_content(Some(&format!(
                "{} {} — {}",
                achievement.icon, achievement.title, achievement.description
            )));
            let _ = list.append_child(&item);
        }
    }

    /// Read the menu's select controls into a game config
    fn read_config(document: &Document) -> GameConfig {
        let value = |id: &str| -> Option<String> {
            document
                .get_element_by_id(id)?
                .dyn_into::<HtmlSelectElement>()
                .ok()
                .map(|sel| sel.value())
        };

        let defaults = GameConfig::default();
        GameConfig {
            category: value("sel-category")
                .and_then(|v| Category::from_name(&v))
                .unwrap_or(defaults.category),
            difficulty: value("sel-difficulty")
                .and_then(|v| Difficulty::from_name(&v))
                .unwrap_or(defaults.difficulty),
            mode: value("sel-mode")
                .and_then(|v| Mode::from_name(&v))
                .unwrap_or(defaults.mode),
            duration_secs: value("sel-duration")
                .and_then(|v| v.parse().ok())
                .filter(|secs| GAME_DURATIONS_SECS.contains(secs))
                .unwrap_or(defaults.duration_secs),
            theme: value("sel-theme")
                .and_then(|v| Theme::from_name(&v))
                .unwrap_or(defaults.theme),
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no #canvas element")
            .dyn_into()
            .expect("#canvas is not a canvas");
        let render_ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("unexpected context type");

        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), render_ctx)));
        game.borrow_mut().sync_viewport();
        render_medal_wall(&document, &game.borrow().achievements);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);
        log::info!("Word Ninja running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.pointer(event.offset_x() as f32, event.offset_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start maps to the same pointer contract
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer(x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start from the menu, reading the current selections
        if let Some(btn) = document.get_element_by_id("btn-start") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();
                let config = read_config(&document);
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.settings.theme = config.theme;
                g.settings.save();
                g.state.start_game(config);
                g.drain_events();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Replay with the same config
        if let Some(btn) = document.get_element_by_id("btn-replay") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let config = g.state.config;
                g.state.start_game(config);
                g.drain_events();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Quit to menu, from the HUD or the summary
        for id in ["btn-quit", "btn-menu"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().state.return_to_menu();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
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
            let document = web_sys::window().unwrap().document().unwrap();
            let mut g = game.borrow_mut();
            g.sync_viewport();
            g.update(time);
            g.render();
            g.update_hud(&document);
            g.sync_overlays(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Word Ninja (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    run_headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate a short game against the local word bank and print the outcome
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo() {
    use word_ninja::consts::TICKS_PER_SEC;
    use word_ninja::sim::{GameConfig, GamePhase, GameState, WordBank, handle_pointer, tick};

    let mut state = GameState::new(0xC0FFEE);
    state.set_viewport(1280.0, 720.0);
    let mut source = WordBank;
    state.start_game(GameConfig {
        duration_secs: 30,
        ..GameConfig::default()
    });

    // A perfect player with ~500 ms reactions
    while state.phase != GamePhase::GameOver {
        tick(&mut state, &mut source);
        if state.phase == GamePhase::Playing
            && state.pending_round.is_none()
            && state.round_elapsed_ticks() >= TICKS_PER_SEC / 2
        {
            if let Some(target) = state.bubbles.iter().find(|b| b.is_target && !b.popped) {
                let pos = target.pos;
                handle_pointer(&mut state, pos.x, pos.y);
            }
        }
        state.drain_events();
    }

    println!(
        "Demo run: score={} hits={} max_combo={} speed_bonuses={}",
        state.stats.score, state.stats.hits, state.stats.max_combo, state.stats.speed_bonus_count
    );
}
