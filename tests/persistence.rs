// High score persistence across several play sessions sharing one store.

use rainbow_catch::input::InputState;
use rainbow_catch::storage::{
    HIGH_SCORE_KEY, HighScore, KeyValueStore, MemoryStore, load_difficulty, save_difficulty,
};
use rainbow_catch::{Difficulty, GameConfig, Simulation};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Play one session to the end, submitting every time the live score beats the best.
fn play_session(store: MemoryStore, seed: u64, chase: bool) -> (MemoryStore, u32) {
    let mut high_score = HighScore::load(store);
    let config = GameConfig { starting_lives: 1, ..GameConfig::default() };
    let mut sim = Simulation::with_seed(config, Difficulty::Hard, 800.0, 600.0, seed);
    for i in 0..50_000 {
        let input = if chase {
            let target = sim
                .falling()
                .iter()
                .filter(|e| !e.variant.is_hazard())
                .max_by(|a, b| a.y.total_cmp(&b.y))
                .map(|e| e.x + e.size / 2.0);
            InputState { pointer_x: target, direction: 0 }
        } else {
            InputState { pointer_x: Some(0.0), direction: 0 }
        };
        sim.step(i as f64 * FRAME_MS, &input);
        if sim.score() > high_score.best() {
            high_score.submit(sim.score());
        }
        if sim.is_over() {
            break;
        }
    }
    assert!(sim.is_over(), "session {seed} never ended");
    (high_score.into_store(), sim.score())
}

fn stored(store: &MemoryStore) -> u32 {
    store
        .get(HIGH_SCORE_KEY)
        .unwrap()
        .map(|v| v.parse().unwrap())
        .unwrap_or(0)
}

#[test]
fn stored_best_never_decreases_across_sessions() {
    let mut store = MemoryStore::new();
    let mut best_seen = 0;
    let mut previous = 0;
    for (seed, chase) in [(1, true), (2, false), (3, true), (4, false), (5, true)] {
        let (next, score) = play_session(store, seed, chase);
        store = next;
        best_seen = best_seen.max(score);
        let now = stored(&store);
        assert!(now >= previous, "best dropped from {previous} to {now}");
        assert_eq!(now, best_seen);
        previous = now;
    }
}

#[test]
fn reloaded_best_matches_what_was_stored() {
    let (store, score) = play_session(MemoryStore::new(), 11, true);
    let reloaded = HighScore::load(store);
    assert_eq!(reloaded.best(), score);
}

#[test]
fn difficulty_preference_survives_alongside_score() {
    let (mut store, _) = play_session(MemoryStore::new(), 12, true);
    let before = stored(&store);
    save_difficulty(&mut store, Difficulty::Easy).unwrap();
    assert_eq!(load_difficulty(&store), Difficulty::Easy);
    assert_eq!(stored(&store), before);
}
