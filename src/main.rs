//! Thief Run entry point
//!
//! In the browser this wires the page to a `Session` and drives it from
//! `requestAnimationFrame`; pages carrying `#leaderboard-cards` get the ranked
//! leaderboard instead. Natively it plays one seeded run on autopilot against
//! in-memory stores and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement, KeyboardEvent,
        Window,
    };

    use thief_run::audio::AudioManager;
    use thief_run::hud::{Celebration, GameOverSummary, Hud, IdentityHint, Screen, StartReadiness};
    use thief_run::leaderboard::{
        self, LeaderboardCard, LeaderboardView, REVEAL_COOLDOWN_MS, ScrollMetrics,
    };
    use thief_run::persistence::RankingStore;
    use thief_run::platform::KeyState;
    use thief_run::platform::input::is_scroll_key;
    use thief_run::platform::ranking::HttpRankingStore;
    use thief_run::platform::storage::WebStorage;
    use thief_run::renderer::{CanvasSurface, RedrawGate, draw_frame};
    use thief_run::sim::{Field, GameState};
    use thief_run::{Location, LocationStatus, Session, Tuning};

    const ASSET_DIR: &str = "assets";
    const DEFAULT_API_BASE: &str = "/api";

    /// Game instance holding all state
    struct Game {
        session: Session,
        surface: CanvasSurface,
        keys: KeyState,
        redraw: RedrawGate,
    }

    impl Game {
        /// One tick, then a draw if anything can have changed
        fn frame(&mut self) {
            let input = self.keys.tick_input();
            self.session.frame(&input);
            if self.redraw.should_draw(self.session.phase()) {
                draw_frame(&mut self.surface, self.session.state());
            }
        }

        fn resize(&mut self, width: f32, height: f32) {
            self.surface.resize(width as u32, height as u32);
            self.session.resize(width, height);
            // Resizing the canvas wipes it
            self.redraw.invalidate();
        }
    }

    /// Hud that writes into the page
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }
    }

    impl Hud for DomHud {
        fn show_screen(&mut self, screen: Screen) {
            self.set_hidden("start-screen", screen != Screen::Start);
            self.set_hidden("score-display", screen == Screen::Start);
            self.set_hidden("elite-overlay", screen != Screen::Celebration);
            self.set_hidden("game-over-screen", screen != Screen::GameOver);
        }

        fn set_score(&mut self, score: u64) {
            self.set_text("score", &score.to_string());
        }

        fn set_special_catches(&mut self, count: u32) {
            self.set_text("justin-count", &count.to_string());
        }

        fn set_high_score(&mut self, high_score: u64) {
            self.set_text("high-score", &high_score.to_string());
        }

        fn set_start_readiness(&mut self, readiness: StartReadiness) {
            if let Some(btn) = self
                .document
                .get_element_by_id("start-btn")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!readiness.enabled);
                let _ = btn.class_list().toggle_with_force("ready", readiness.enabled);
            }
            let hint = match readiness.hint {
                IdentityHint::Empty => "",
                IdentityHint::Valid => "✓",
                IdentityHint::TooShort => "✗ Min 3 chars",
            };
            self.set_text("username-status", hint);
        }

        fn celebrate(&mut self, celebration: &Celebration) {
            self.set_text("elite-username", &format!("Player: {}", celebration.player));
            self.set_text("elite-location", &format!("Location: {}", celebration.location));
        }

        fn show_game_over(&mut self, summary: &GameOverSummary) {
            self.set_text("final-score", &summary.score.to_string());
            self.set_text("final-justin-count", &summary.special_catches.to_string());
            self.set_text("final-high-score", &summary.high_score.to_string());
        }

        fn alert(&mut self, message: &str) {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
    }

    fn viewport(window: &Window) -> (f32, f32) {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (
            read(window.inner_width()) as f32,
            read(window.inner_height()) as f32,
        )
    }

    /// Base URL of the ranking API, from `<body data-api="...">`
    fn api_base(document: &Document) -> String {
        document
            .body()
            .and_then(|body| body.get_attribute("data-api"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    /// Balance overrides from an optional `<script id="tuning">` JSON block
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Using tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {e}");
                Tuning::default()
            }
        }
    }

    fn identity_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("username-input-start")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Thief Run starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        if document.get_element_by_id("leaderboard-cards").is_some() {
            run_leaderboard(&window, &document);
            return;
        }

        let Some(canvas) = document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game-canvas on the page");
            return;
        };
        let surface = match CanvasSurface::new(canvas, ASSET_DIR) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Canvas setup failed: {e:?}");
                return;
            }
        };

        let (width, height) = viewport(&window);
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, load_tuning(&document), Field::new(width, height));
        let ranking: Rc<dyn RankingStore> = Rc::new(HttpRankingStore::new(api_base(&document)));

        let mut session = Session::new(
            state,
            Box::new(WebStorage::new()),
            ranking,
            Box::new(AudioManager::new(&document)),
            Box::new(DomHud {
                document: document.clone(),
            }),
        );

        // Network lookup is not wired up; settle straight to the sentinel
        session.set_location(LocationStatus::Resolved(Location::unknown()));
        if let Some(el) = document.get_element_by_id("location-status") {
            el.set_text_content(Some(&format!("Location: {}", session.location().label())));
        }

        if let Some(input) = identity_input(&document) {
            input.set_value(session.player());
            session.identity_changed(&input.value());
        }

        let game = Rc::new(RefCell::new(Game {
            session,
            surface,
            keys: KeyState::new(),
            redraw: RedrawGate::default(),
        }));
        game.borrow_mut().resize(width, height);

        log::info!("Game initialized with seed: {seed}");

        setup_keyboard(&window, &document, game.clone());
        setup_identity_input(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&window, game.clone());

        request_animation_frame(game);

        log::info!("Thief Run running!");
    }

    fn setup_keyboard(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if is_scroll_key(&key) {
                    event.prevent_default();
                }
                game.borrow_mut().keys.key_down(&key);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never report keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.clear();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_identity_input(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(input) = identity_input(document) else {
            return;
        };
        let target = input.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().session.identity_changed(&target.value());
        });
        let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        action: impl Fn(&mut Game) + 'static,
    ) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let input = identity_input(document);
        on_click(document, "start-btn", game.clone(), move |g| {
            let name = input.as_ref().map(|i| i.value()).unwrap_or_default();
            // Refusals were already shown to the player
            if let Err(e) = g.session.start(&name) {
                log::info!("Start refused: {e}");
            }
        });

        on_click(document, "restart-btn", game.clone(), |g| {
            if let Err(e) = g.session.restart() {
                log::info!("Restart refused: {e}");
            }
        });

        on_click(document, "continue-btn", game.clone(), |g| g.session.continue_run());

        let unmute = document.get_element_by_id("unmute-btn");
        on_click(document, "unmute-btn", game, move |g| {
            g.session.enable_sound();
            if let Some(el) = &unmute {
                let _ = el.class_list().add_1("hidden");
            }
        });
    }

    fn setup_resize(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = viewport(&window);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Always re-arms, so a paused run resumes without restarting the loop
    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }

    /// Leaderboard page state
    struct Board {
        document: Document,
        store: Rc<dyn RankingStore>,
        view: LeaderboardView,
    }

    impl Board {
        fn container(&self) -> Option<Element> {
            self.document.get_element_by_id("leaderboard-cards")
        }

        /// Replace the container contents for the current view
        fn render(&mut self) {
            let Some(container) = self.container() else {
                return;
            };
            container.set_inner_html("");
            if let Some(message) = self.view.message() {
                let class = match self.view {
                    LeaderboardView::Loading => "loading-card",
                    LeaderboardView::Empty => "empty-card",
                    _ => "error-card",
                };
                if let Ok(el) = text_element(&self.document, "div", class, message) {
                    let _ = container.append_child(&el);
                }
                return;
            }
            let cards = match &mut self.view {
                LeaderboardView::Ready(pager) => pager.reveal_initial(),
                _ => Vec::new(),
            };
            self.append(&cards);
        }

        fn append(&self, cards: &[LeaderboardCard]) {
            let Some(container) = self.container() else {
                return;
            };
            for card in cards {
                match card_element(&self.document, card) {
                    Ok(el) => {
                        let _ = container.append_child(&el);
                    }
                    Err(e) => log::warn!("Card #{} not rendered: {e:?}", card.rank),
                }
            }
        }
    }

    fn text_element(
        document: &Document,
        tag: &str,
        class: &str,
        text: &str,
    ) -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        el.set_text_content(Some(text));
        Ok(el)
    }

    /// Build one card; all player text goes through `textContent`
    fn card_element(document: &Document, card: &LeaderboardCard) -> Result<Element, JsValue> {
        let root = document.create_element("div")?;
        root.set_class_name("leaderboard-card");
        if let Some(place) = card.podium() {
            root.class_list().add_1(&format!("rank-{place}"))?;
        }
        root.append_child(&text_element(document, "div", "card-rank", &card.rank_label())?)?;

        let content = document.create_element("div")?;
        content.set_class_name("card-content");
        content.append_child(&text_element(document, "div", "card-username", &card.player)?)?;
        content.append_child(&text_element(document, "div", "card-location", &card.location)?)?;

        let stats = document.create_element("div")?;
        stats.set_class_name("card-stats");
        for (label, value) in [
            ("Score", card.score.to_string()),
            ("Justin", card.special_catches.to_string()),
        ] {
            let stat = document.create_element("div")?;
            stat.set_class_name("card-stat");
            stat.append_child(&text_element(document, "span", "stat-label", label)?)?;
            stat.append_child(&text_element(document, "span", "stat-value", &value)?)?;
            stats.append_child(&stat)?;
        }
        content.append_child(&stats)?;
        root.append_child(&content)?;
        Ok(root)
    }

    fn run_leaderboard(window: &Window, document: &Document) {
        let board = Rc::new(RefCell::new(Board {
            document: document.clone(),
            store: Rc::new(HttpRankingStore::new(api_base(document))),
            view: LeaderboardView::Loading,
        }));

        load_board(board.clone());

        {
            let board = board.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                on_board_scroll(&board);
            });
            let _ = window
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click_board(document, "refresh-btn", board);
        log::info!("Leaderboard running!");
    }

    fn on_click_board(document: &Document, id: &str, board: Rc<RefCell<Board>>) {
        let Some(el) = document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            load_board(board.clone());
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Show the loading state, then fetch a fresh snapshot in the background
    fn load_board(board: Rc<RefCell<Board>>) {
        let store = {
            let mut b = board.borrow_mut();
            b.view = LeaderboardView::Loading;
            b.render();
            b.store.clone()
        };
        wasm_bindgen_futures::spawn_local(async move {
            let view = leaderboard::load(store.as_ref()).await;
            let mut b = board.borrow_mut();
            b.view = view;
            b.render();
        });
    }

    fn on_board_scroll(board: &Rc<RefCell<Board>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let content_height = board
            .borrow()
            .document
            .document_element()
            .map(|el| el.scroll_height() as f64)
            .unwrap_or(0.0);
        let metrics = ScrollMetrics {
            viewport_height: viewport(&window).1 as f64,
            scroll_y: window.scroll_y().unwrap_or(0.0),
            content_height,
        };

        let cards = match &mut board.borrow_mut().view {
            LeaderboardView::Ready(pager) => pager.on_scroll(metrics),
            _ => return,
        };
        if cards.is_empty() {
            return;
        }
        board.borrow().append(&cards);

        let board = board.clone();
        let end_cooldown = Closure::once_into_js(move || {
            if let LeaderboardView::Ready(pager) = &mut board.borrow_mut().view {
                pager.end_cooldown();
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            end_cooldown.unchecked_ref(),
            REVEAL_COOLDOWN_MS,
        );
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Thief Run (native) starting...");
    log::info!("Native mode is a headless autopilot run - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x7468_6965_6621);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use thief_run::audio::SilentAudio;
    use thief_run::consts::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH};
    use thief_run::hud::LogHud;
    use thief_run::leaderboard::LeaderboardPager;
    use thief_run::persistence::{MemoryRankingStore, MemoryStore, RankingStore};
    use thief_run::sim::{ActorKind, Field, GamePhase, GameState, TickInput};
    use thief_run::{Location, LocationStatus, Session, Tuning};

    /// Ten minutes at 60 frames per second
    const MAX_TICKS: u64 = 36_000;

    /// Steer toward the lowest catchable actor, dodging obstacles about to land
    fn autopilot(state: &GameState) -> TickInput {
        let thief = state.thief.bounds();
        let center = thief.min.x + thief.size.x / 2.0;

        let threat = state.actors.iter().find(|a| {
            matches!(a.kind, ActorKind::Obstacle)
                && a.pos.y + a.size.y > thief.min.y - 150.0
                && a.pos.x < thief.max().x + 20.0
                && a.pos.x + a.size.x > thief.min.x - 20.0
        });
        if let Some(obstacle) = threat {
            let obstacle_center = obstacle.pos.x + obstacle.size.x / 2.0;
            let flee_left = (obstacle_center > center && thief.min.x > 0.0)
                || thief.max().x >= state.field.width;
            return TickInput {
                left: flee_left,
                right: !flee_left,
            };
        }

        let target = state
            .actors
            .iter()
            .filter(|a| !matches!(a.kind, ActorKind::Obstacle))
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        match target {
            Some(actor) => {
                let goal = actor.pos.x + actor.size.x / 2.0;
                TickInput {
                    left: goal < center - state.thief.speed,
                    right: goal > center + state.thief.speed,
                }
            }
            None => TickInput::default(),
        }
    }

    pub fn run(seed: u64) {
        let store = MemoryStore::new();
        let ranking = MemoryRankingStore::new();
        let state = GameState::new(
            seed,
            Tuning::default(),
            Field::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
        );
        let mut session = Session::new(
            state,
            Box::new(store.clone()),
            Rc::new(ranking.clone()),
            Box::new(SilentAudio),
            Box::new(LogHud),
        );
        session.set_location(LocationStatus::Resolved(Location::unknown()));

        if let Err(e) = session.start("autopilot") {
            log::error!("Autopilot could not start: {e}");
            return;
        }

        let mut ticks = 0;
        while ticks < MAX_TICKS && session.phase() != GamePhase::Ended {
            let input = autopilot(session.state());
            session.frame(&input);
            if session.phase() == GamePhase::Paused {
                session.continue_run();
            }
            ticks += 1;
        }

        let state = session.state();
        log::info!(
            "Seed {seed}: {} after {ticks} ticks, score {}, {} specials, high score {}",
            if state.phase == GamePhase::Ended { "busted" } else { "survived" },
            state.score,
            state.special_catches,
            session.progress().high_score
        );

        match pollster::block_on(ranking.fetch_top(thief_run::consts::LEADERBOARD_FETCH_LIMIT)) {
            Ok(records) => {
                let mut pager = LeaderboardPager::new(records);
                for card in pager.reveal_initial() {
                    log::info!(
                        "{} {} {} ({})",
                        card.rank_label(),
                        card.player,
                        card.score,
                        card.location
                    );
                }
            }
            Err(e) => log::error!("Leaderboard unavailable: {e}"),
        }
        log::debug!("{} local entries written", store.len());
    }
}
