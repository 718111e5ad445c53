//! Player input snapshot. Listeners overwrite it; the next frame reads it.

/// What a keyboard key means to the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    TogglePause,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(KeyAction::Left),
            "ArrowRight" | "d" | "D" => Some(KeyAction::Right),
            " " | "Spacebar" | "p" | "P" => Some(KeyAction::TogglePause),
            _ => None,
        }
    }
}

/// Keys whose browser default (scrolling) the game suppresses. Letter keys are
/// never blocked so text fields elsewhere on the page keep working.
pub fn scrolls_page(key: &str) -> bool {
    matches!(key, " " | "Spacebar" | "ArrowLeft" | "ArrowRight")
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    /// Horizontal pointer/touch position in canvas px while dragging.
    pub pointer_x: Option<f64>,
    /// -1 left, 0 idle, 1 right.
    pub direction: i8,
}

impl InputState {
    /// Apply a key press. Returns `true` when it asks for a pause toggle.
    pub fn key_down(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Left => self.direction = -1,
            KeyAction::Right => self.direction = 1,
            KeyAction::TogglePause => return true,
        }
        false
    }

    /// Releasing either arrow stops keyboard motion.
    pub fn key_up(&mut self, action: KeyAction) {
        if matches!(action, KeyAction::Left | KeyAction::Right) {
            self.direction = 0;
        }
    }

    pub fn pointer_moved(&mut self, x: f64) {
        self.pointer_x = Some(x);
    }

    pub fn pointer_released(&mut self) {
        self.pointer_x = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(KeyAction::from_key("ArrowLeft"), Some(KeyAction::Left));
        assert_eq!(KeyAction::from_key("d"), Some(KeyAction::Right));
        assert_eq!(KeyAction::from_key(" "), Some(KeyAction::TogglePause));
        assert_eq!(KeyAction::from_key("Enter"), None);
    }

    #[test]
    fn only_scrolling_keys_are_suppressed() {
        for key in [" ", "ArrowLeft", "ArrowRight"] {
            assert!(scrolls_page(key), "{key:?}");
        }
        for key in ["a", "A", "d", "D", "p", "P", "Enter"] {
            assert!(!scrolls_page(key), "{key:?}");
        }
    }

    #[test]
    fn last_key_wins_and_release_stops() {
        let mut input = InputState::default();
        assert!(!input.key_down(KeyAction::Left));
        input.key_down(KeyAction::Right);
        assert_eq!(input.direction, 1);
        input.key_up(KeyAction::Left);
        assert_eq!(input.direction, 0);
    }

    #[test]
    fn pause_key_does_not_touch_direction() {
        let mut input = InputState { pointer_x: None, direction: -1 };
        assert!(input.key_down(KeyAction::TogglePause));
        input.key_up(KeyAction::TogglePause);
        assert_eq!(input.direction, -1);
    }

    #[test]
    fn pointer_drag_is_tracked_until_release() {
        let mut input = InputState::default();
        input.pointer_moved(120.0);
        input.pointer_moved(140.0);
        assert_eq!(input.pointer_x, Some(140.0));
        input.pointer_released();
        assert_eq!(input.pointer_x, None);
    }
}
