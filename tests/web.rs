// Browser-only checks: run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use rainbow_catch::audio::{AudioSink, CUE_EVENT, Cue, DomCueSink};
use rainbow_catch::storage::{
    AnyStore, DIFFICULTY_KEY, HIGH_SCORE_KEY, HighScore, KeyValueStore, load_difficulty,
    save_difficulty,
};
use rainbow_catch::Difficulty;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

/// Start every test from an empty `localStorage`.
fn clear_keys() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item(HIGH_SCORE_KEY).unwrap();
    storage.remove_item(DIFFICULTY_KEY).unwrap();
}

#[wasm_bindgen_test]
fn local_storage_keeps_the_best_score() {
    clear_keys();
    let mut store = AnyStore::open();
    assert!(matches!(store, AnyStore::Browser(_)));
    store.set(HIGH_SCORE_KEY, "40").unwrap();
    let mut hs = HighScore::load(store);
    assert_eq!(hs.best(), 40);
    assert!(!hs.submit(10));
    assert!(hs.submit(70));
    assert_eq!(HighScore::load(AnyStore::open()).best(), 70);
}

#[wasm_bindgen_test]
fn difficulty_preference_persists() {
    clear_keys();
    assert_eq!(load_difficulty(&AnyStore::open()), Difficulty::Medium);
    let mut store = AnyStore::open();
    save_difficulty(&mut store, Difficulty::Hard).unwrap();
    assert_eq!(load_difficulty(&AnyStore::open()), Difficulty::Hard);
}

#[wasm_bindgen_test]
fn cue_dispatch_does_not_throw() {
    let mut sink = DomCueSink;
    sink.play(Cue::Collect);
    sink.play(Cue::GameOver);
}

#[wasm_bindgen_test]
fn cue_listeners_may_call_back_into_the_game() {
    clear_keys();
    let win = web_sys::window().unwrap();
    let heard = Rc::new(Cell::new(0u32));
    let counter = heard.clone();
    let listener = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        // Reads the running game from inside the cue handler.
        let _ = rainbow_catch::current_score();
        let _ = rainbow_catch::high_score();
        rainbow_catch::toggle_mute();
        rainbow_catch::toggle_mute();
        counter.set(counter.get() + 1);
    }) as Box<dyn FnMut(_)>);
    win.add_event_listener_with_callback(CUE_EVENT, listener.as_ref().unchecked_ref())
        .unwrap();

    rainbow_catch::start_game().unwrap();
    assert!(heard.get() >= 1);

    win.remove_event_listener_with_callback(CUE_EVENT, listener.as_ref().unchecked_ref())
        .unwrap();
}
