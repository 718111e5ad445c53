//! Browser shell: canvas setup, input listeners and the animation-frame loop.
//!
//! All state lives in one thread-local [`App`]. Listeners write the input
//! snapshot; the frame callback steps the simulation, forwards events to the
//! sound board and high score, renders, and schedules the next frame while the
//! game is still playing. Pausing or losing simply stops scheduling.
//!
//! Sound cues are queued while `APP` is borrowed and dispatched only after the
//! borrow ends, since page listeners for them may call straight back into the
//! exports.

use std::cell::{Cell, RefCell};

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window, window};

use crate::audio::{Cue, CueQueue, DomCueSink, SoundBoard, dispatch};
use crate::config::{Difficulty, GameConfig};
use crate::error::{GameError, GameResult};
use crate::input::{InputState, KeyAction, scrolls_page};
use crate::render::render;
use crate::sim::{Simulation, Status};
use crate::storage::{AnyStore, HighScore, load_difficulty, save_difficulty};

pub const CANVAS_ID: &str = "rc-canvas";

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sim: Simulation,
    input: InputState,
    high_score: HighScore<AnyStore>,
    /// Cues wait here until [`flush_cues`] runs outside the borrow.
    sound: SoundBoard<CueQueue>,
    /// A frame request is outstanding.
    scheduled: bool,
}

impl App {
    fn tick(&mut self, now: f64) {
        let report = self.sim.step(now, &self.input);
        self.sound.play_events(&report.events);
        if self.sim.score() > self.high_score.best() && self.high_score.submit(self.sim.score()) {
            debug!("new best score {}", self.sim.score());
        }
        if report.game_over() {
            info!(
                "final score {} on {} (best {})",
                self.sim.score(),
                self.sim.difficulty(),
                self.high_score.best()
            );
        }
        self.draw();
    }

    fn draw(&self) {
        let muted = self.sound.is_muted();
        if let Err(e) = render(&self.ctx, &self.sim, self.high_score.best(), muted) {
            warn!("render failed: {}", GameError::from_js(&e));
        }
    }

    fn fit_to_window(&mut self, win: &Window) {
        let (w, h) = window_size(win);
        self.canvas.set_width(w as u32);
        self.canvas.set_height(h as u32);
        self.sim.resize(w, h);
    }
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    static LISTENERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn window_size(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
    (w, h)
}

fn find_or_create_canvas(doc: &Document) -> GameResult<HtmlCanvasElement> {
    if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        return el.dyn_into().map_err(|_| GameError::NoCanvas);
    }
    let c: HtmlCanvasElement = doc
        .create_element("canvas")
        .map_err(|e| GameError::from_js(&e))?
        .dyn_into()
        .map_err(|_| GameError::NoCanvas)?;
    c.set_id(CANVAS_ID);
    c.set_attribute(
        "style",
        "position:fixed; left:0; top:0; width:100vw; height:100vh; touch-action:none; z-index:10;",
    )
    .ok();
    let body = doc.body().ok_or(GameError::NoCanvas)?;
    body.append_child(&c).map_err(|e| GameError::from_js(&e))?;
    Ok(c)
}

/// Start (or restart) a game. `difficulty` overrides the stored preference.
pub fn start(difficulty: Option<Difficulty>, config: GameConfig) -> GameResult<()> {
    config.validate()?;
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let canvas = find_or_create_canvas(&doc)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| GameError::from_js(&e))?
        .ok_or(GameError::NoContext)?
        .dyn_into()
        .map_err(|_| GameError::NoContext)?;
    let (w, h) = window_size(&win);
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);

    APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(app) => {
                let tier = difficulty.unwrap_or_else(|| load_difficulty(app.high_score.store()));
                info!("restarting on {tier}");
                app.sim = Simulation::new(config, tier, w, h);
                app.input.clear();
                app.canvas = canvas.clone();
                app.ctx = ctx;
                app.sound.cue(Cue::Music);
            }
            None => {
                let high_score = HighScore::load(AnyStore::open());
                let tier = difficulty.unwrap_or_else(|| load_difficulty(high_score.store()));
                info!("starting on {tier} (best {})", high_score.best());
                let mut sound = SoundBoard::new(CueQueue::default());
                sound.cue(Cue::Music);
                *slot = Some(App {
                    canvas: canvas.clone(),
                    ctx,
                    sim: Simulation::new(config, tier, w, h),
                    input: InputState::default(),
                    high_score,
                    sound,
                    scheduled: false,
                });
            }
        }
    });

    if !LISTENERS_INSTALLED.with(Cell::get) {
        install_listeners(&win, &canvas)?;
        LISTENERS_INSTALLED.with(|c| c.set(true));
    }
    flush_cues();
    request_frame()
}

/// Dispatch queued cues. Must run with `APP` released.
fn flush_cues() {
    let cues = with_app(|app| app.sound.sink_mut().take()).unwrap_or_default();
    dispatch(&mut DomCueSink, cues);
}

fn on_frame(ts: f64) {
    with_app(|app| {
        app.scheduled = false;
        app.tick(ts);
    });
    flush_cues();
    // Cue listeners may have paused or restarted the game.
    let keep_going = with_app(|app| app.sim.status() == Status::Playing).unwrap_or(false);
    if keep_going {
        if let Err(e) = request_frame() {
            warn!("frame loop stopped: {e}");
        }
    }
}

fn request_frame() -> GameResult<()> {
    let already = with_app(|app| std::mem::replace(&mut app.scheduled, true)).unwrap_or(true);
    if already {
        return Ok(());
    }
    let win = window().ok_or(GameError::NoWindow)?;
    FRAME.with(|slot| {
        let mut slot = slot.borrow_mut();
        let cb = slot
            .get_or_insert_with(|| Closure::wrap(Box::new(on_frame) as Box<dyn FnMut(f64)>));
        win.request_animation_frame(cb.as_ref().unchecked_ref())
            .map(|_| ())
            .map_err(|e| GameError::from_js(&e))
    })
}

/// Flip pause. Returns `true` when the game is now paused.
pub fn toggle_pause() -> bool {
    let now = now_ms();
    let status = with_app(|app| {
        let status = app.sim.toggle_pause(now);
        if status == Status::Paused {
            app.input.clear();
            app.draw();
        }
        status
    });
    if status == Some(Status::Playing) {
        if let Err(e) = request_frame() {
            warn!("could not resume: {e}");
        }
    }
    status == Some(Status::Paused)
}

/// Flip mute. Returns `true` when sound is now muted.
pub fn toggle_mute() -> bool {
    with_app(|app| app.sound.toggle_mute()).unwrap_or(false)
}

/// Persist the preferred tier; it applies from the next start.
pub fn set_difficulty(difficulty: Difficulty) -> GameResult<()> {
    match with_app(|app| save_difficulty(app.high_score.store_mut(), difficulty)) {
        Some(result) => result,
        None => save_difficulty(&mut AnyStore::open(), difficulty),
    }
}

pub fn stored_difficulty() -> Difficulty {
    with_app(|app| load_difficulty(app.high_score.store()))
        .unwrap_or_else(|| load_difficulty(&AnyStore::open()))
}

pub fn high_score() -> u32 {
    with_app(|app| app.high_score.best())
        .unwrap_or_else(|| HighScore::load(AnyStore::open()).best())
}

pub fn current_score() -> u32 {
    with_app(|app| app.sim.score()).unwrap_or(0)
}

fn is_paused() -> bool {
    with_app(|app| app.sim.status() == Status::Paused).unwrap_or(false)
}

/// Keys only belong to the game while a round is running or paused.
fn game_has_keys() -> bool {
    with_app(|app| app.sim.status().is_active()).unwrap_or(false)
}

fn typing_into_field(evt: &web_sys::Event) -> bool {
    let Some(el) = evt.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) else {
        return false;
    };
    el.is_content_editable() || matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA" | "SELECT")
}

fn canvas_x(canvas: &HtmlCanvasElement, client_x: i32) -> f64 {
    f64::from(client_x - canvas.offset_left())
}

fn install_listeners(win: &Window, canvas: &HtmlCanvasElement) -> GameResult<()> {
    let listen = |target: &web_sys::EventTarget, name: &str, f: &JsValue| {
        target
            .add_event_listener_with_callback(name, f.unchecked_ref())
            .map_err(|e| GameError::from_js(&e))
    };

    // Keyboard: arrows steer, space/p pauses. Ignored after game over and
    // while the page has a text field focused.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if !game_has_keys() || typing_into_field(&evt) {
                return;
            }
            let key = evt.key();
            let Some(action) = KeyAction::from_key(&key) else {
                return;
            };
            if scrolls_page(&key) {
                evt.prevent_default();
            }
            if with_app(|app| app.input.key_down(action)).unwrap_or(false) && !evt.repeat() {
                toggle_pause();
            }
        }) as Box<dyn FnMut(_)>);
        listen(win, "keydown", closure.as_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if let Some(action) = KeyAction::from_key(&evt.key()) {
                with_app(|app| app.input.key_up(action));
            }
        }) as Box<dyn FnMut(_)>);
        listen(win, "keyup", closure.as_ref())?;
        closure.forget();
    }

    // Touch drag. A tap while paused resumes.
    for name in ["touchstart", "touchmove"] {
        let canvas_touch = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
            evt.prevent_default();
            if evt.type_() == "touchstart" && is_paused() {
                toggle_pause();
            }
            if let Some(touch) = evt.touches().get(0) {
                let x = canvas_x(&canvas_touch, touch.client_x());
                with_app(|app| app.input.pointer_moved(x));
            }
        }) as Box<dyn FnMut(_)>);
        listen(canvas, name, closure.as_ref())?;
        closure.forget();
    }
    for name in ["touchend", "touchcancel"] {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::TouchEvent| {
            with_app(|app| app.input.pointer_released());
        }) as Box<dyn FnMut(_)>);
        listen(canvas, name, closure.as_ref())?;
        closure.forget();
    }

    // Mouse drag mirrors touch. Offset coordinates are canvas-local already.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            if is_paused() {
                toggle_pause();
            }
            let x = f64::from(evt.offset_x());
            with_app(|app| app.input.pointer_moved(x));
        }) as Box<dyn FnMut(_)>);
        listen(canvas, "mousedown", closure.as_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            if evt.buttons() & 1 == 0 {
                return;
            }
            let x = f64::from(evt.offset_x());
            with_app(|app| app.input.pointer_moved(x));
        }) as Box<dyn FnMut(_)>);
        listen(canvas, "mousemove", closure.as_ref())?;
        closure.forget();
    }
    for name in ["mouseup", "mouseleave"] {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_app(|app| app.input.pointer_released());
        }) as Box<dyn FnMut(_)>);
        listen(canvas, name, closure.as_ref())?;
        closure.forget();
    }

    // Keep the play area matched to the viewport.
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            if let Some(win) = window() {
                with_app(|app| {
                    app.fit_to_window(&win);
                    app.draw();
                });
            }
        }) as Box<dyn FnMut(_)>);
        listen(win, "resize", closure.as_ref())?;
        closure.forget();
    }
    Ok(())
}
