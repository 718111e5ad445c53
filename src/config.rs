//! Difficulty tiers and tunable game constants.
//!
//! Tier tables are plain `const` data; score-based ramps built on top of them
//! live in [`crate::spawn`].

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Named difficulty preset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Per-tier tuning table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierParams {
    /// Spawn interval at score zero (ms).
    pub base_interval_ms: f64,
    /// Milliseconds shaved off the interval per point scored.
    pub interval_ramp: f64,
    /// Interval never drops below this.
    pub interval_floor_ms: f64,
    /// Fall speed at score zero (px / frame).
    pub base_speed: f64,
    /// Points needed for +1 px / frame.
    pub speed_divisor: f64,
    pub max_speed_bonus: f64,
    pub hazard_base: f64,
    /// Hazard probability gained per point scored.
    pub hazard_ramp: f64,
    pub hazard_max: f64,
    /// Hazards allowed on screen at once.
    pub max_hazards: usize,
    pub golden_chance: f64,
    pub power_up_interval_ms: f64,
    pub bonus_life_interval_ms: f64,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn params(self) -> TierParams {
        match self {
            Difficulty::Easy => TierParams {
                base_interval_ms: 1700.0,
                interval_ramp: 4.0,
                interval_floor_ms: 1000.0,
                base_speed: 3.0,
                speed_divisor: 40.0,
                max_speed_bonus: 3.5,
                hazard_base: 0.0,
                hazard_ramp: 0.0002,
                hazard_max: 0.10,
                max_hazards: 1,
                golden_chance: 0.12,
                power_up_interval_ms: 12_000.0,
                bonus_life_interval_ms: 25_000.0,
            },
            Difficulty::Medium => TierParams {
                base_interval_ms: 1500.0,
                interval_ramp: 5.0,
                interval_floor_ms: 500.0,
                base_speed: 3.5,
                speed_divisor: 35.0,
                max_speed_bonus: 4.5,
                hazard_base: 0.05,
                hazard_ramp: 0.0003,
                hazard_max: 0.18,
                max_hazards: 2,
                golden_chance: 0.10,
                power_up_interval_ms: 15_000.0,
                bonus_life_interval_ms: 30_000.0,
            },
            Difficulty::Hard => TierParams {
                base_interval_ms: 1200.0,
                interval_ramp: 6.0,
                interval_floor_ms: 400.0,
                base_speed: 4.5,
                speed_divisor: 30.0,
                max_speed_bonus: 5.5,
                hazard_base: 0.10,
                hazard_ramp: 0.0004,
                hazard_max: 0.28,
                max_hazards: 3,
                golden_chance: 0.08,
                power_up_interval_ms: 18_000.0,
                bonus_life_interval_ms: 40_000.0,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Size and speed of a simple falling pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickupSpec {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

/// Tier-independent game constants. Frame counts assume ~60 fps.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub starting_lives: u32,
    pub max_lives: u32,
    pub actor_width: f64,
    pub actor_height: f64,
    /// Distance from the bottom edge to the actor's top.
    pub actor_bottom_offset: f64,
    /// Fraction of the remaining distance to target covered each frame.
    pub smoothing: f64,
    /// Target shift per frame while a direction key is held.
    pub key_step: f64,
    pub catch_animation_frames: u32,
    pub power_up_frames: u32,
    pub score_multiplier: u32,
    pub normal_points: u32,
    pub golden_points: u32,
    pub falling_size: f64,
    pub wobble_amplitude: f64,
    pub power_up: PickupSpec,
    pub bonus_life: PickupSpec,
    pub particle_burst: usize,
    pub particle_life: u32,
    pub particle_gravity: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            max_lives: 5,
            actor_width: 90.0,
            actor_height: 90.0,
            actor_bottom_offset: 140.0,
            smoothing: 0.25,
            key_step: 10.0,
            catch_animation_frames: 20,
            power_up_frames: 300,
            score_multiplier: 2,
            normal_points: 10,
            golden_points: 50,
            falling_size: 60.0,
            wobble_amplitude: 1.5,
            power_up: PickupSpec { width: 80.0, height: 40.0, speed: 3.0 },
            bonus_life: PickupSpec { width: 40.0, height: 40.0, speed: 2.0 },
            particle_burst: 15,
            particle_life: 40,
            particle_gravity: 0.3,
        }
    }
}

impl GameConfig {
    /// Reject settings that would break the loop's invariants.
    pub fn validate(&self) -> Result<(), GameError> {
        let bad = |msg: &str| Err(GameError::InvalidConfig(msg.to_owned()));
        if self.starting_lives == 0 {
            return bad("starting_lives must be at least 1");
        }
        if self.starting_lives > self.max_lives {
            return bad("starting_lives exceeds max_lives");
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return bad("smoothing must be in (0, 1]");
        }
        if self.golden_points <= self.normal_points {
            return bad("golden_points must exceed normal_points");
        }
        if self.score_multiplier == 0 {
            return bad("score_multiplier must be at least 1");
        }
        if self.actor_width <= 0.0 || self.actor_height <= 0.0 || self.falling_size <= 0.0 {
            return bad("sizes must be positive");
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON overlay on top of the defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("easy", Difficulty::Easy)]
    #[case("Medium", Difficulty::Medium)]
    #[case(" HARD ", Difficulty::Hard)]
    fn parses_tier_names(#[case] raw: &str, #[case] expected: Difficulty) {
        assert_eq!(raw.parse::<Difficulty>(), Ok(expected));
    }

    #[test]
    fn unknown_tier_is_an_error() {
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
    }

    #[test]
    fn harder_tiers_are_harder() {
        let [e, m, h] = Difficulty::ALL.map(Difficulty::params);
        assert!(e.base_interval_ms > m.base_interval_ms && m.base_interval_ms > h.base_interval_ms);
        assert!(e.base_speed < m.base_speed && m.base_speed < h.base_speed);
        assert!(e.hazard_max < m.hazard_max && m.hazard_max < h.hazard_max);
        assert!(e.max_hazards < m.max_hazards && m.max_hazards < h.max_hazards);
    }

    #[test]
    fn tier_weights_leave_room_for_normal_catches() {
        for d in Difficulty::ALL {
            let p = d.params();
            assert!(p.golden_chance + p.hazard_max < 1.0, "{d} weights overflow");
            assert!(p.interval_floor_ms > 0.0);
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_lives_above_max() {
        let cfg = GameConfig { starting_lives: 6, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_golden_not_above_normal() {
        let cfg = GameConfig { golden_points: 10, ..GameConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overlay_keeps_defaults_for_missing_fields() {
        let cfg = GameConfig::from_json(r#"{ "max_lives": 7, "starting_lives": 4 }"#).unwrap();
        assert_eq!(cfg.max_lives, 7);
        assert_eq!(cfg.starting_lives, 4);
        assert_eq!(cfg.golden_points, 50);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overlay_is_validated() {
        assert!(GameConfig::from_json(r#"{ "smoothing": 0.0 }"#).is_err());
        assert!(GameConfig::from_json("not json").is_err());
    }
}
