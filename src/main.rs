//! Arena Picker entry point
//!
//! Handles platform-specific initialization and runs the battle loop.
//! The browser build drives the simulation from `requestAnimationFrame`; the
//! native build runs one battle headless and prints the log.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

    use arena_picker::audio::AudioManager;
    use arena_picker::consts::*;
    use arena_picker::history::{self, BattleHistory};
    use arena_picker::sim::{
        Battle, BattleSnapshot, Collaborators, Contestant, EffectKind, EffectPhase, start_battle,
    };
    use arena_picker::{BattleMode, BattleSpeed, Preferences, Settings, Theme, logo, presets};

    /// App instance holding all state
    struct App {
        battle: Option<Battle>,
        audio: Rc<RefCell<AudioManager>>,
        history: Rc<RefCell<BattleHistory>>,
        prefs: Preferences,
        accumulator: f32,
        last_time: f64,
        /// Whether the winner overlay is up for the current battle
        winner_shown: bool,
    }

    impl App {
        fn new() -> Self {
            let prefs = Preferences::load();
            let mut audio = AudioManager::new();
            audio.set_muted(!prefs.sound_enabled);
            Self {
                battle: None,
                audio: Rc::new(RefCell::new(audio)),
                history: Rc::new(RefCell::new(BattleHistory::load())),
                prefs,
                accumulator: 0.0,
                last_time: 0.0,
                winner_shown: false,
            }
        }

        /// Run fixed movement ticks for the elapsed frame time
        fn update(&mut self, dt: f32) {
            let Some(battle) = self.battle.as_mut() else {
                return;
            };
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= MOVEMENT_DT && substeps < MAX_SUBSTEPS {
                battle.tick(MOVEMENT_DT);
                self.accumulator -= MOVEMENT_DT;
                substeps += 1;
            }
            // Events are consumed through the snapshot each frame
            battle.drain_events();
        }

        fn start(&mut self, document: &Document) {
            self.reset(document);

            let contestants = read_contestants(document);
            let settings = read_settings(document);
            let seed = js_sys::Date::now() as u64;

            let collaborators = Collaborators::default()
                .with_audio(self.audio.clone())
                .with_history(self.history.clone());

            match start_battle(contestants, settings, seed, collaborators) {
                Ok(battle) => {
                    self.audio.borrow().resume();
                    self.battle = Some(battle);
                    set_text(document, "setup-error", "");
                    show(document, "setup", false);
                    show(document, "battle", true);
                    log::info!("Battle started with seed: {}", seed);
                }
                Err(e) => {
                    log::warn!("Battle not started: {}", e);
                    set_text(document, "setup-error", &e.to_string());
                }
            }
        }

        fn reset(&mut self, document: &Document) {
            if let Some(mut battle) = self.battle.take() {
                battle.teardown();
            }
            self.accumulator = 0.0;
            self.winner_shown = false;
            show(document, "winner", false);
            show(document, "battle", false);
            show(document, "setup", true);
            render_leaderboard(document, &self.history.borrow());
        }

        fn toggle_sound(&mut self, document: &Document) {
            self.prefs.sound_enabled = !self.prefs.sound_enabled;
            self.audio.borrow_mut().set_muted(!self.prefs.sound_enabled);
            self.prefs.save();
            set_text(document, "sound-btn", if self.prefs.sound_enabled { "🔊" } else { "🔇" });
        }

        fn toggle_theme(&mut self, document: &Document) {
            self.prefs.theme = match self.prefs.theme {
                Theme::Dark => Theme::Light,
                Theme::Light => Theme::Dark,
            };
            self.prefs.save();
            apply_theme(document, self.prefs.theme);
        }

        fn render(&mut self, document: &Document) {
            let Some(battle) = self.battle.as_ref() else {
                return;
            };
            let snapshot = battle.snapshot();

            set_html(document, "arena", &arena_html(&snapshot));
            set_html(document, "battle-log", &log_html(&snapshot));

            let status = match snapshot.progress {
                Some(p) => format!("Round {} of {}", p.current_round, p.total_rounds),
                None => format!("{} fighters remaining", battle.alive_count()),
            };
            set_text(document, "battle-status", &status);

            if let Some(winner) = battle.final_winner()
                && !self.winner_shown
            {
                self.winner_shown = true;
                set_text(document, "winner-name", winner.name());
                let detail = format!(
                    "{} {} · {}s",
                    winner_icon(&snapshot, winner.id()),
                    winner.class_name(),
                    battle.elapsed_secs()
                );
                set_text(document, "winner-detail", &detail);
                show(document, "winner", true);
                render_leaderboard(document, &self.history.borrow());
            }
        }
    }

    fn winner_icon(snapshot: &BattleSnapshot<'_>, id: u32) -> &'static str {
        snapshot
            .fighters
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.class_icon)
            .unwrap_or("🏆")
    }

    fn read_contestants(document: &Document) -> Vec<Contestant> {
        let text = document
            .get_element_by_id("contestants-input")
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
            .map(|el| el.value())
            .unwrap_or_default();

        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .enumerate()
            .map(|(i, name)| {
                // "Name | https://logo" sets a custom image
                let (name, custom) = match name.split_once('|') {
                    Some((n, url)) => (n.trim(), Some(url.trim())),
                    None => (name, None),
                };
                Contestant::new(i as u32 + 1, name).with_image(logo::resolve_image(name, custom))
            })
            .collect()
    }

    fn select_value(document: &Document, id: &str) -> Option<String> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            .map(|el| el.value())
    }

    fn input_value(document: &Document, id: &str) -> Option<String> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|el| el.value())
    }

    fn read_settings(document: &Document) -> Settings {
        let mut settings = Settings::default();
        if let Some(mode) = select_value(document, "mode-select").and_then(|m| m.parse::<BattleMode>().ok()) {
            settings.mode = mode;
        }
        if let Some(ms) = select_value(document, "speed-select").and_then(|s| s.parse().ok()) {
            settings.battle_speed_ms = ms;
        }
        if let Some(hp) = input_value(document, "hp-input").and_then(|s| s.parse().ok()) {
            settings.starting_hp = hp;
        }
        if let Some(preset) = select_value(document, "arena-select") {
            settings.arena_preset = preset.parse().unwrap_or_default();
        }
        settings
    }

    fn escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }

    fn pct(v: f32, of: f32) -> f32 {
        v / of * 100.0
    }

    fn arena_html(s: &BattleSnapshot<'_>) -> String {
        let (w, h) = (s.arena.width, s.arena.height);
        let shaking = s
            .effects
            .iter()
            .any(|e| e.phase == EffectPhase::Shown && e.kind == EffectKind::ScreenShake);
        let mut html = String::new();
        let _ = write!(html, r#"<div class="arena-inner{}">"#, if shaking { " shake" } else { "" });

        for p in &s.arena.platforms {
            let _ = write!(
                html,
                r#"<div class="platform" style="left:{:.2}%;top:{:.2}%;width:{:.2}%;height:{:.2}%;background:{}"></div>"#,
                pct(p.x, w),
                pct(p.y, h),
                pct(p.width, w),
                pct(p.height, h),
                p.kind.color()
            );
        }
        for o in &s.arena.obstacles {
            let _ = write!(
                html,
                r#"<div class="obstacle" style="left:{:.2}%;top:{:.2}%;background:{}">{}</div>"#,
                pct(o.x, w),
                pct(o.y, h),
                o.kind.color(),
                o.kind.icon()
            );
        }

        for f in &s.fighters {
            let lunging = s.effects.iter().any(|e| {
                e.phase == EffectPhase::Shown && e.kind == EffectKind::Lunge { fighter: f.id }
            });
            let hit = s.effects.iter().any(|e| {
                e.phase == EffectPhase::Shown && e.kind == EffectKind::Knockback { fighter: f.id }
            });
            let mut class = String::from("fighter");
            for (on, name) in [
                (!f.is_alive, " dead"),
                (lunging, " lunge"),
                (hit, " knockback"),
                (f.facing == arena_picker::sim::Facing::Left, " face-left"),
            ] {
                if on {
                    class.push_str(name);
                }
            }
            let avatar = match f.image {
                Some(src) => format!(r#"<img src="{}" alt="">"#, escape(src)),
                None => format!(r#"<span class="initial" style="background:{}">{}</span>"#, f.color, f.initial),
            };
            let _ = write!(
                html,
                r#"<div class="{}" style="left:{:.2}%;top:{:.2}%">{}<div class="name">{} {}</div><div class="hp"><div class="hp-fill" style="width:{:.0}%"></div></div></div>"#,
                class,
                pct(f.pos.x, w),
                pct(f.pos.y, h),
                avatar,
                f.class_icon,
                escape(f.name),
                f.hp_percent
            );
        }

        for e in s.effects.iter().filter(|e| e.phase == EffectPhase::Shown) {
            match &e.kind {
                EffectKind::Projectile { to, icon, .. } => {
                    let _ = write!(
                        html,
                        r#"<div class="projectile" style="left:{:.2}%;top:{:.2}%">{}</div>"#,
                        pct(to.x, w),
                        pct(to.y, h),
                        icon
                    );
                }
                EffectKind::DamageNumber { pos, damage, critical, .. } => {
                    let _ = write!(
                        html,
                        r#"<div class="damage{}" style="left:{:.2}%;top:{:.2}%">-{}</div>"#,
                        if *critical { " crit" } else { "" },
                        pct(pos.x, w),
                        pct(pos.y, h),
                        damage
                    );
                }
                EffectKind::Particles { pos, critical, .. } => {
                    let _ = write!(
                        html,
                        r#"<div class="particles{}" style="left:{:.2}%;top:{:.2}%"></div>"#,
                        if *critical { " crit" } else { "" },
                        pct(pos.x, w),
                        pct(pos.y, h)
                    );
                }
                EffectKind::Lunge { .. } | EffectKind::Knockback { .. } | EffectKind::ScreenShake => {}
            }
        }

        html.push_str("</div>");
        html
    }

    fn log_html(s: &BattleSnapshot<'_>) -> String {
        let mut html = String::new();
        for line in s.log.iter().rev() {
            let _ = write!(html, r#"<div class="log-line">{}</div>"#, escape(&line.text));
        }
        html
    }

    fn render_leaderboard(document: &Document, store: &BattleHistory) {
        let mut html = String::new();
        for (rank, stats) in store.top_contestants(10).iter().enumerate() {
            let _ = write!(
                html,
                r#"<li><span class="rank">{}</span> {} <span class="record">{}W-{}L ({:.1}%)</span>{}</li>"#,
                rank + 1,
                escape(&stats.name),
                stats.wins,
                stats.losses,
                stats.win_rate,
                stats
                    .favorite_class()
                    .map(|c| format!(r#" <span class="class">{}</span>"#, escape(c)))
                    .unwrap_or_default()
            );
        }
        if let Some(last) = store.records.first() {
            let _ = write!(
                html,
                r#"<li class="last">Last battle: {} won {}</li>"#,
                escape(&last.winner.name),
                history::format_age(last.timestamp, history::now_ms())
            );
        }
        set_html(document, "leaderboard", &html);
    }

    fn set_html(document: &Document, id: &str, html: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_inner_html(html);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn apply_theme(document: &Document, theme: Theme) {
        if let Some(body) = document.body() {
            let class = match theme {
                Theme::Dark => "theme-dark",
                Theme::Light => "theme-light",
            };
            let _ = body.set_attribute("class", class);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Arena Picker starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let app = Rc::new(RefCell::new(App::new()));
        {
            let a = app.borrow();
            apply_theme(&document, a.prefs.theme);
            set_text(&document, "sound-btn", if a.prefs.sound_enabled { "🔊" } else { "🔇" });
            render_leaderboard(&document, &a.history.borrow());
        }
        fill_preset_select(&document);

        on_click(&document, "start-btn", app.clone(), |app, doc| app.start(doc));
        on_click(&document, "reset-btn", app.clone(), |app, doc| app.reset(doc));
        on_click(&document, "sound-btn", app.clone(), |app, doc| app.toggle_sound(doc));
        on_click(&document, "theme-btn", app.clone(), |app, doc| app.toggle_theme(doc));
        on_click(&document, "clear-history-btn", app.clone(), |app, doc| {
            app.history.borrow_mut().clear();
            render_leaderboard(doc, &app.history.borrow());
        });
        on_click(&document, "preset-btn", app.clone(), |_, doc| load_preset(doc));

        setup_hotkeys(app.clone());
        request_animation_frame(app);

        log::info!("Arena Picker running!");
    }

    fn on_click(
        document: &Document,
        id: &str,
        app: Rc<RefCell<App>>,
        handler: impl Fn(&mut App, &Document) + 'static,
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing element #{}", id);
            return;
        };
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            handler(&mut app.borrow_mut(), &doc);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn fill_preset_select(document: &Document) {
        let mut html = String::new();
        for cat in presets::categories() {
            let _ = write!(
                html,
                r#"<option value="{}">{} {} ({})</option>"#,
                cat.id, cat.icon, cat.name, cat.count
            );
        }
        set_html(document, "preset-select", &html);
    }

    fn load_preset(document: &Document) {
        let Some(id) = select_value(document, "preset-select") else {
            return;
        };
        let mut rng = rand::rng();
        let names = presets::random_from(&id, presets::DEFAULT_DRAW, &mut rng);
        if let Some(el) = document
            .get_element_by_id("contestants-input")
            .and_then(|el| el.dyn_into::<HtmlTextAreaElement>().ok())
        {
            el.set_value(&names.join("\n"));
        }
    }

    fn setup_hotkeys(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut a = app.borrow_mut();
            let Some(battle) = a.battle.as_mut() else {
                return;
            };
            if let Some(speed) = BattleSpeed::from_hotkey(&event.key()) {
                battle.set_battle_speed(speed.millis());
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                MOVEMENT_DT
            };
            a.last_time = time;

            a.update(dt);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.render(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::RefCell;
    use std::rc::Rc;

    use arena_picker::audio::AudioManager;
    use arena_picker::consts::MOVEMENT_DT;
    use arena_picker::sim::{Collaborators, Contestant, start_battle};
    use arena_picker::{BattleHistory, BattleMode, BattleSpeed, Settings, presets};

    env_logger::init();
    log::info!("Arena Picker (native) starting...");

    // Usage: arena-picker [mode] [name...]
    let mut args = std::env::args().skip(1);
    let mode = args
        .next()
        .and_then(|m| m.parse().ok())
        .unwrap_or(BattleMode::FreeForAll);
    let mut names: Vec<String> = args.collect();
    if names.is_empty() {
        let mut rng = rand::rng();
        names = presets::random_from("restaurants", presets::DEFAULT_DRAW, &mut rng)
            .into_iter()
            .map(String::from)
            .collect();
    }

    let contestants: Vec<Contestant> = names
        .iter()
        .enumerate()
        .map(|(i, n)| Contestant::new(i as u32 + 1, n.as_str()))
        .collect();
    let settings = Settings {
        battle_speed_ms: BattleSpeed::UltraFast.millis(),
        ..Settings::for_mode(mode)
    };
    let seed = arena_picker::history::now_ms() as u64;

    let history = Rc::new(RefCell::new(BattleHistory::new()));
    let collaborators = Collaborators::default()
        .with_audio(AudioManager::new())
        .with_history(history.clone());

    let mut battle = match start_battle(contestants, settings, seed, collaborators) {
        Ok(battle) => battle,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    // Ten virtual minutes is far beyond any real battle
    let max_ticks = (600.0 / MOVEMENT_DT) as u64;
    let mut next_line = 0;
    for _ in 0..max_ticks {
        battle.tick(MOVEMENT_DT);
        for line in battle.log_since(next_line) {
            println!("{}", line.text);
            next_line = line.id + 1;
        }
        if battle.is_finished() {
            break;
        }
    }

    match battle.final_winner() {
        Some(winner) => println!(
            "\nWinner: {} ({}) after {}s, {} matches recorded",
            winner.name(),
            winner.class_name(),
            battle.elapsed_secs(),
            history.borrow().records.len()
        ),
        None => println!("\nNo winner after {}s", battle.elapsed_secs()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
