//! Spawn pacing: difficulty ramps, spawn clocks and the weighted variant sampler.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use crate::config::TierParams;
use crate::entities::Variant;

// --- Difficulty ramps ---------------------------------------------------------

/// Time between falling-entity spawns; shrinks with score down to the tier floor.
pub fn spawn_interval(score: u32, tier: &TierParams) -> f64 {
    (tier.base_interval_ms - f64::from(score) * tier.interval_ramp).max(tier.interval_floor_ms)
}

/// Fall speed for newly spawned entities.
pub fn fall_speed(score: u32, tier: &TierParams) -> f64 {
    tier.base_speed + (f64::from(score) / tier.speed_divisor).min(tier.max_speed_bonus)
}

pub fn hazard_probability(score: u32, tier: &TierParams) -> f64 {
    (tier.hazard_base + f64::from(score) * tier.hazard_ramp).min(tier.hazard_max)
}

// --- Weighted selection -------------------------------------------------------

/// Draw one entry from a `(value, weight)` table. Non-positive weights never win;
/// `None` when nothing has weight.
pub fn pick_weighted<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(T, f64)]) -> Option<T> {
    let dist = WeightedIndex::new(table.iter().map(|&(_, w)| w.max(0.0))).ok()?;
    table.get(dist.sample(rng)).map(|&(value, _)| value)
}

/// Variant weights for the next spawn. Hazard weight drops to zero once
/// `active_hazards` reaches the tier cap.
pub fn variant_table(score: u32, tier: &TierParams, active_hazards: usize) -> [(Variant, f64); 3] {
    let hazard = if active_hazards >= tier.max_hazards {
        0.0
    } else {
        hazard_probability(score, tier)
    };
    let golden = tier.golden_chance;
    let normal = (1.0 - golden - hazard).max(0.0);
    [(Variant::Normal, normal), (Variant::Golden, golden), (Variant::Hazard, hazard)]
}

pub fn pick_variant<R: Rng + ?Sized>(
    rng: &mut R,
    score: u32,
    tier: &TierParams,
    active_hazards: usize,
) -> Variant {
    pick_weighted(rng, &variant_table(score, tier, active_hazards)).unwrap_or(Variant::Normal)
}

// --- Clocks -------------------------------------------------------------------

/// Elapsed-time trigger in host milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnClock {
    last_ms: f64,
}

impl SpawnClock {
    /// Fires on the first check.
    pub const fn immediate() -> Self {
        Self { last_ms: f64::NEG_INFINITY }
    }

    /// First fires one full interval after `now`.
    pub const fn starting_at(now: f64) -> Self {
        Self { last_ms: now }
    }

    /// True (and resets) when at least `interval_ms` has passed since the last fire.
    pub fn fire(&mut self, now: f64, interval_ms: f64) -> bool {
        if now - self.last_ms >= interval_ms {
            self.last_ms = now;
            true
        } else {
            false
        }
    }

    /// Push the clock forward, e.g. by the length of a pause.
    pub fn shift(&mut self, delta_ms: f64) {
        self.last_ms += delta_ms;
    }
}

/// The three independent spawn clocks of a running game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnSchedule {
    pub falling: SpawnClock,
    pub power_up: SpawnClock,
    pub bonus_life: SpawnClock,
}

impl SpawnSchedule {
    pub const fn starting_at(now: f64) -> Self {
        Self {
            falling: SpawnClock::immediate(),
            power_up: SpawnClock::starting_at(now),
            bonus_life: SpawnClock::starting_at(now),
        }
    }

    pub fn shift(&mut self, delta_ms: f64) {
        self.falling.shift(delta_ms);
        self.power_up.shift(delta_ms);
        self.bonus_life.shift(delta_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    #[rstest]
    #[case(Difficulty::Easy)]
    #[case(Difficulty::Medium)]
    #[case(Difficulty::Hard)]
    fn interval_shrinks_to_floor(#[case] d: Difficulty) {
        let p = d.params();
        assert_eq!(spawn_interval(0, &p), p.base_interval_ms);
        assert!(spawn_interval(50, &p) < spawn_interval(0, &p));
        assert_eq!(spawn_interval(100_000, &p), p.interval_floor_ms);
    }

    #[test]
    fn medium_matches_classic_pacing() {
        let p = Difficulty::Medium.params();
        assert_eq!(spawn_interval(100, &p), 1000.0);
        assert_eq!(fall_speed(0, &p), 3.5);
        assert_eq!(fall_speed(70, &p), 5.5);
        assert_eq!(fall_speed(10_000, &p), 8.0);
    }

    #[rstest]
    #[case(Difficulty::Easy)]
    #[case(Difficulty::Medium)]
    #[case(Difficulty::Hard)]
    fn hazard_probability_is_capped(#[case] d: Difficulty) {
        let p = d.params();
        assert!(hazard_probability(0, &p) <= hazard_probability(500, &p));
        assert_eq!(hazard_probability(u32::MAX, &p), p.hazard_max);
    }

    #[test]
    fn hazard_weight_zero_at_cap() {
        let p = Difficulty::Hard.params();
        let open = variant_table(0, &p, 0);
        let capped = variant_table(0, &p, p.max_hazards);
        assert!(open[2].1 > 0.0);
        assert_eq!(capped[2].1, 0.0);
        let total: f64 = capped.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn capped_sampler_never_yields_hazard() {
        let p = Difficulty::Hard.params();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2_000 {
            assert_ne!(pick_variant(&mut rng, 10_000, &p, p.max_hazards), Variant::Hazard);
        }
    }

    #[test]
    fn sampler_follows_weights_roughly() {
        let mut rng = SmallRng::seed_from_u64(11);
        let table = [("a", 0.8), ("b", 0.2), ("c", 0.0)];
        let mut a = 0;
        for _ in 0..10_000 {
            match pick_weighted(&mut rng, &table) {
                Some("a") => a += 1,
                Some("b") => {}
                other => panic!("unexpected pick {other:?}"),
            }
        }
        assert!((7_500..8_500).contains(&a), "a picked {a} times");
    }

    #[test]
    fn empty_or_weightless_table_picks_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(pick_weighted::<u8, _>(&mut rng, &[]), None);
        assert_eq!(pick_weighted(&mut rng, &[(1u8, 0.0), (2u8, -1.0)]), None);
    }

    #[test]
    fn immediate_clock_fires_first_then_waits() {
        let mut c = SpawnClock::immediate();
        assert!(c.fire(100.0, 1500.0));
        assert!(!c.fire(1_000.0, 1500.0));
        assert!(c.fire(1_600.0, 1500.0));
    }

    #[test]
    fn shifted_schedule_delays_spawns() {
        let mut s = SpawnSchedule::starting_at(0.0);
        s.shift(5_000.0);
        assert!(!s.power_up.fire(15_000.0, 15_000.0));
        assert!(s.power_up.fire(20_000.0, 15_000.0));
    }
}
