//! Error taxonomy for the browser shell and persistence layer.
//!
//! The simulation itself cannot fail; everything here comes from talking to the
//! host page (window, canvas, storage) or from parsing user-supplied settings.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("canvas element unavailable")]
    NoCanvas,
    #[error("2d drawing context unavailable")]
    NoContext,
    #[error("local storage unavailable")]
    StorageUnavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl GameError {
    /// Wrap a thrown JS value, keeping its string form when it has one.
    pub fn from_js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(GameError::NoCanvas.to_string(), "canvas element unavailable");
        assert_eq!(
            GameError::UnknownDifficulty("insane".into()).to_string(),
            "unknown difficulty 'insane' (expected easy, medium or hard)"
        );
    }
}
