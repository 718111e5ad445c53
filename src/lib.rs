//! Rainbow Catch core crate.
//!
//! A flying unicorn sweeps along the bottom of the screen catching falling
//! friends, grabbing rainbows (double points) and hearts (extra lives) while
//! dodging hazards. The simulation in [`sim`] is plain Rust and runs natively;
//! [`app`] and [`render`] bind it to a browser canvas through `wasm-bindgen`.

use wasm_bindgen::prelude::*;

pub mod app;
pub mod audio;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod sim;
pub mod spawn;
pub mod storage;

pub use config::{Difficulty, GameConfig};
pub use error::GameError;
pub use sim::{FrameReport, GameEvent, Simulation, Status};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Start a game on the stored difficulty (medium when none is stored).
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    app::start(None, GameConfig::default()).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn start_game_with_difficulty(difficulty: &str) -> Result<(), JsValue> {
    let tier: Difficulty = difficulty.parse()?;
    app::start(Some(tier), GameConfig::default()).map_err(JsValue::from)
}

/// Start with a JSON overlay on the default [`GameConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    app::start(None, config).map_err(JsValue::from)
}

/// Store the preferred tier (`easy`, `medium`, `hard`) for the next start.
#[wasm_bindgen]
pub fn set_difficulty(difficulty: &str) -> Result<(), JsValue> {
    let tier: Difficulty = difficulty.parse()?;
    app::set_difficulty(tier).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn difficulty() -> String {
    app::stored_difficulty().to_string()
}

/// Returns `true` when the game is now paused.
#[wasm_bindgen]
pub fn toggle_pause() -> bool {
    app::toggle_pause()
}

/// Returns `true` when sound is now muted.
#[wasm_bindgen]
pub fn toggle_mute() -> bool {
    app::toggle_mute()
}

#[wasm_bindgen]
pub fn high_score() -> u32 {
    app::high_score()
}

#[wasm_bindgen]
pub fn current_score() -> u32 {
    app::current_score()
}
