//! Client-side persistence: the best score and the preferred difficulty.

use std::collections::HashMap;

use log::warn;

use crate::config::Difficulty;
use crate::error::{GameError, GameResult};

pub const HIGH_SCORE_KEY: &str = "rainbowCatchHighScore";
pub const DIFFICULTY_KEY: &str = "rainbowCatchDifficulty";

/// Minimal string key-value store (`localStorage` shaped).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// Process-local store, used natively and when the browser refuses storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// `window.localStorage`.
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    pub fn local() -> GameResult<Self> {
        let win = web_sys::window().ok_or(GameError::NoWindow)?;
        let inner = win
            .local_storage()
            .map_err(|e| GameError::from_js(&e))?
            .ok_or(GameError::StorageUnavailable)?;
        Ok(Self { inner })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        self.inner.get_item(key).map_err(|e| GameError::Storage(GameError::from_js(&e).to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| GameError::Storage(GameError::from_js(&e).to_string()))
    }
}

/// Either real browser storage or an in-memory stand-in.
pub enum AnyStore {
    Browser(BrowserStorage),
    Memory(MemoryStore),
}

impl AnyStore {
    /// Browser storage when available, otherwise memory (best score then lasts one page load).
    pub fn open() -> Self {
        match BrowserStorage::local() {
            Ok(s) => AnyStore::Browser(s),
            Err(e) => {
                warn!("falling back to in-memory storage: {e}");
                AnyStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for AnyStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        match self {
            AnyStore::Browser(s) => s.get(key),
            AnyStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        match self {
            AnyStore::Browser(s) => s.set(key, value),
            AnyStore::Memory(s) => s.set(key, value),
        }
    }
}

fn read_score<S: KeyValueStore>(store: &S) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring malformed high score {raw:?}");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            warn!("could not read high score: {e}");
            0
        }
    }
}

/// Best score across sessions. The stored value never decreases.
pub struct HighScore<S> {
    store: S,
    best: u32,
}

impl<S: KeyValueStore> HighScore<S> {
    pub fn load(store: S) -> Self {
        let best = read_score(&store);
        Self { store, best }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Record `score` if it beats the best (including anything another tab
    /// stored meanwhile). Returns `true` on a new record.
    pub fn submit(&mut self, score: u32) -> bool {
        self.best = self.best.max(read_score(&self.store));
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            warn!("could not persist high score: {e}");
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Stored difficulty preference; unknown or missing values fall back to the default tier.
pub fn load_difficulty<S: KeyValueStore>(store: &S) -> Difficulty {
    match store.get(DIFFICULTY_KEY) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
            warn!("{e}; using default");
            Difficulty::default()
        }),
        Ok(None) => Difficulty::default(),
        Err(e) => {
            warn!("could not read difficulty: {e}");
            Difficulty::default()
        }
    }
}

pub fn save_difficulty<S: KeyValueStore>(store: &mut S, difficulty: Difficulty) -> GameResult<()> {
    store.set(DIFFICULTY_KEY, difficulty.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(score: &str) -> MemoryStore {
        let mut s = MemoryStore::new();
        s.set(HIGH_SCORE_KEY, score).unwrap();
        s
    }

    #[test]
    fn missing_score_starts_at_zero() {
        assert_eq!(HighScore::load(MemoryStore::new()).best(), 0);
    }

    #[test]
    fn malformed_score_is_ignored() {
        assert_eq!(HighScore::load(store_with("lots")).best(), 0);
        assert_eq!(HighScore::load(store_with("-20")).best(), 0);
        assert_eq!(HighScore::load(store_with(" 120 ")).best(), 120);
    }

    #[test]
    fn only_higher_scores_are_written() {
        let mut hs = HighScore::load(store_with("100"));
        assert!(!hs.submit(90));
        assert!(!hs.submit(100));
        assert_eq!(hs.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("100"));
        assert!(hs.submit(130));
        assert_eq!(hs.best(), 130);
        assert_eq!(hs.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("130"));
    }

    #[test]
    fn record_from_elsewhere_is_respected() {
        let mut hs = HighScore::load(store_with("100"));
        hs.store_mut().set(HIGH_SCORE_KEY, "500").unwrap();
        assert!(!hs.submit(300));
        assert_eq!(hs.best(), 500);
        assert_eq!(hs.store().get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("500"));
    }

    #[test]
    fn difficulty_preference_round_trips() {
        let mut s = MemoryStore::new();
        assert_eq!(load_difficulty(&s), Difficulty::Medium);
        save_difficulty(&mut s, Difficulty::Hard).unwrap();
        assert_eq!(load_difficulty(&s), Difficulty::Hard);
        s.set(DIFFICULTY_KEY, "extreme").unwrap();
        assert_eq!(load_difficulty(&s), Difficulty::Medium);
    }
}
