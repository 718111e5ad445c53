//! Fire-and-forget sound cues.
//!
//! The game only names what should be heard; the host page decides how (or
//! whether) to play it. Cues are dispatched as `rainbow-catch:cue` DOM events
//! with the cue name in `detail`.

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit};

use crate::entities::Variant;
use crate::sim::GameEvent;

pub const CUE_EVENT: &str = "rainbow-catch:cue";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Collect,
    CollectGolden,
    Miss,
    Hazard,
    PowerUp,
    Heart,
    GameOver,
    Music,
}

impl Cue {
    pub const fn name(self) -> &'static str {
        match self {
            Cue::Collect => "collect",
            Cue::CollectGolden => "collect-golden",
            Cue::Miss => "miss",
            Cue::Hazard => "hazard",
            Cue::PowerUp => "power-up",
            Cue::Heart => "heart",
            Cue::GameOver => "game-over",
            Cue::Music => "music",
        }
    }

    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Caught { variant: Variant::Golden, .. } => Some(Cue::CollectGolden),
            GameEvent::Caught { .. } => Some(Cue::Collect),
            GameEvent::Missed => Some(Cue::Miss),
            GameEvent::HazardHit => Some(Cue::Hazard),
            GameEvent::PowerUp => Some(Cue::PowerUp),
            GameEvent::ExtraLife => Some(Cue::Heart),
            GameEvent::GameOver { .. } => Some(Cue::GameOver),
            GameEvent::MultiplierExpired => None,
        }
    }
}

/// Something that can make a cue audible.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Dispatches cues as DOM events on `window`. Without a window it stays silent.
#[derive(Default)]
pub struct DomCueSink;

impl AudioSink for DomCueSink {
    fn play(&mut self, cue: Cue) {
        let Some(win) = web_sys::window() else {
            return;
        };
        let init = CustomEventInit::new();
        init.set_detail(&JsValue::from_str(cue.name()));
        match CustomEvent::new_with_event_init_dict(CUE_EVENT, &init) {
            Ok(evt) => {
                let _ = win.dispatch_event(&evt);
            }
            Err(_) => debug!("cue '{}' dropped", cue.name()),
        }
    }
}

/// Buffers cues so they can be dispatched after the game state is released.
/// DOM listeners run synchronously inside `dispatch_event` and may call back
/// into the game.
#[derive(Debug, Default)]
pub struct CueQueue {
    pending: Vec<Cue>,
}

impl CueQueue {
    pub fn take(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.pending)
    }
}

impl AudioSink for CueQueue {
    fn play(&mut self, cue: Cue) {
        self.pending.push(cue);
    }
}

/// Play every cue in order on `sink`.
pub fn dispatch<S: AudioSink>(sink: &mut S, cues: Vec<Cue>) {
    for cue in cues {
        sink.play(cue);
    }
}

/// Sink plus a mute switch.
pub struct SoundBoard<S> {
    sink: S,
    muted: bool,
}

impl<S: AudioSink> SoundBoard<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, muted: false }
    }

    pub fn cue(&mut self, cue: Cue) {
        if !self.muted {
            self.sink.play(cue);
        }
    }

    pub fn play_events(&mut self, events: &[GameEvent]) {
        for cue in events.iter().filter_map(Cue::for_event) {
            self.cue(cue);
        }
    }

    /// Returns the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
