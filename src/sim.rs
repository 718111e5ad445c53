//! The frame simulation.
//!
//! [`Simulation`] owns every mutable piece of game state. The browser shell
//! calls [`Simulation::step`] once per animation frame with the host timestamp
//! and the latest input snapshot, then renders what is left. Nothing in here
//! touches the DOM, so the whole loop runs natively under `cargo test`.

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{Difficulty, GameConfig, TierParams};
use crate::entities::{
    Actor, BonusLife, Bounds, FallingEntity, Particle, ParticleShape, ParticleTint, Pickup,
    PowerUp, Variant,
};
use crate::input::InputState;
use crate::spawn::{SpawnSchedule, fall_speed, pick_variant, spawn_interval};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    GameOver,
}

impl Status {
    /// A round is in progress, running or paused.
    pub const fn is_active(self) -> bool {
        matches!(self, Status::Playing | Status::Paused)
    }
}

/// Outcome raised during a frame. Consumers (sound, HUD, persistence) only
/// observe these; nothing flows back into the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Caught { variant: Variant, points: u32 },
    Missed,
    HazardHit,
    PowerUp,
    ExtraLife,
    MultiplierExpired,
    GameOver { score: u32 },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub events: Vec<GameEvent>,
}

impl FrameReport {
    pub fn game_over(&self) -> bool {
        self.events.iter().any(|e| matches!(e, GameEvent::GameOver { .. }))
    }
}

/// Where an entity ends up after this frame's motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fate {
    Caught,
    Missed,
    Alive,
}

fn fate(entity: &Bounds, actor: &Bounds, area_height: f64) -> Fate {
    if actor.overlaps(entity) {
        Fate::Caught
    } else if entity.y > area_height {
        Fate::Missed
    } else {
        Fate::Alive
    }
}

pub struct Simulation {
    config: GameConfig,
    difficulty: Difficulty,
    tier: TierParams,
    width: f64,
    height: f64,
    rng: SmallRng,
    status: Status,
    paused_at: Option<f64>,
    /// Created on the first step so clocks start at the first frame's timestamp.
    schedule: Option<SpawnSchedule>,
    actor: Actor,
    falling: Vec<FallingEntity>,
    power_ups: Vec<PowerUp>,
    bonus_lives: Vec<BonusLife>,
    particles: Vec<Particle>,
    score: u32,
    lives: u32,
    combo: u32,
    best_combo: u32,
    multiplier_frames: u32,
    frame: u64,
}

impl Simulation {
    /// New game seeded from system entropy.
    pub fn new(config: GameConfig, difficulty: Difficulty, width: f64, height: f64) -> Self {
        Self::with_rng(config, difficulty, width, height, SmallRng::from_entropy())
    }

    /// Deterministic game for replays and tests.
    pub fn with_seed(
        config: GameConfig,
        difficulty: Difficulty,
        width: f64,
        height: f64,
        seed: u64,
    ) -> Self {
        Self::with_rng(config, difficulty, width, height, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: GameConfig,
        difficulty: Difficulty,
        width: f64,
        height: f64,
        rng: SmallRng,
    ) -> Self {
        let actor = Actor::centered(
            width,
            height,
            config.actor_width,
            config.actor_height,
            config.actor_bottom_offset,
        );
        debug!("new game: tier={difficulty} area={width}x{height}");
        Self {
            lives: config.starting_lives,
            tier: difficulty.params(),
            config,
            difficulty,
            width,
            height,
            rng,
            status: Status::Playing,
            paused_at: None,
            schedule: None,
            actor,
            falling: Vec::new(),
            power_ups: Vec::new(),
            bonus_lives: Vec::new(),
            particles: Vec::new(),
            score: 0,
            combo: 0,
            best_combo: 0,
            multiplier_frames: 0,
            frame: 0,
        }
    }

    // --- Frame ----------------------------------------------------------------

    /// Advance one frame. A paused or finished game does nothing.
    pub fn step(&mut self, now: f64, input: &InputState) -> FrameReport {
        let mut report = FrameReport::default();
        if self.status != Status::Playing {
            return report;
        }
        self.frame += 1;
        self.animate_actor();
        self.steer(input);
        self.spawn(now);

        self.resolve_falling(&mut report.events);
        if self.status == Status::GameOver {
            self.tick_particles();
            return report;
        }
        self.resolve_power_ups(&mut report.events);
        self.resolve_bonus_lives(&mut report.events);
        self.tick_particles();
        self.tick_multiplier(&mut report.events);
        report
    }

    fn animate_actor(&mut self) {
        let f = self.frame as f64;
        self.actor.wing_flap = (f * 0.15).sin() * 5.0;
        self.actor.bounce = (f * 0.1).sin() * 3.0;
        self.actor.catch_animation = self.actor.catch_animation.saturating_sub(1);
    }

    /// Pointer wins over keys. Target and position stay inside the play area.
    fn steer(&mut self, input: &InputState) {
        let max_x = self.actor.max_x(self.width);
        if let Some(px) = input.pointer_x {
            self.actor.target_x = px - self.actor.width / 2.0;
        } else if input.direction != 0 {
            self.actor.target_x += f64::from(input.direction) * self.config.key_step;
        }
        self.actor.target_x = self.actor.target_x.clamp(0.0, max_x);
        self.actor.x += (self.actor.target_x - self.actor.x) * self.config.smoothing;
        self.actor.x = self.actor.x.clamp(0.0, max_x);
    }

    fn spawn(&mut self, now: f64) {
        let interval = spawn_interval(self.score, &self.tier);
        let lives_open = self.lives < self.config.max_lives;
        let schedule = self.schedule.get_or_insert_with(|| SpawnSchedule::starting_at(now));
        let falling_due = schedule.falling.fire(now, interval);
        let power_up_due = schedule.power_up.fire(now, self.tier.power_up_interval_ms);
        let life_due =
            lives_open && schedule.bonus_life.fire(now, self.tier.bonus_life_interval_ms);

        if falling_due {
            self.spawn_falling();
        }
        if power_up_due {
            let spec = self.config.power_up;
            let p = self.spawn_pickup(spec.width, spec.height, spec.speed);
            self.power_ups.push(p);
        }
        if life_due {
            let spec = self.config.bonus_life;
            let p = self.spawn_pickup(spec.width, spec.height, spec.speed);
            self.bonus_lives.push(p);
        }
    }

    fn spawn_falling(&mut self) {
        let size = self.config.falling_size;
        let hazards = self.hazards_on_screen();
        let variant = pick_variant(&mut self.rng, self.score, &self.tier, hazards);
        let x = self.rng.gen_range(0.0..=(self.width - size).max(0.0));
        self.falling.push(FallingEntity {
            x,
            y: -size,
            size,
            speed: fall_speed(self.score, &self.tier),
            variant,
            rotation: 0.0,
            wobble: self.rng.gen_range(0.0..TAU),
        });
    }

    fn spawn_pickup(&mut self, width: f64, height: f64, speed: f64) -> Pickup {
        let x = self.rng.gen_range(0.0..=(self.width - width).max(0.0));
        Pickup { x, y: -height, width, height, speed }
    }

    /// Single pass over falling entities: each resolves to exactly one fate.
    /// Once the game ends mid-pass the remaining entities are left as they are.
    fn resolve_falling(&mut self, events: &mut Vec<GameEvent>) {
        let mut falling = std::mem::take(&mut self.falling);
        let actor = self.actor.bounds();
        falling.retain_mut(|e| {
            if self.status == Status::GameOver {
                return true;
            }
            e.advance(self.config.wobble_amplitude);
            match fate(&e.bounds(), &actor, self.height) {
                Fate::Caught => {
                    self.on_caught(e, events);
                    false
                }
                Fate::Missed => {
                    if !e.variant.is_hazard() {
                        self.combo = 0;
                        events.push(GameEvent::Missed);
                        self.lose_life(events);
                    }
                    false
                }
                Fate::Alive => true,
            }
        });
        self.falling = falling;
    }

    fn on_caught(&mut self, entity: &FallingEntity, events: &mut Vec<GameEvent>) {
        let center = entity.bounds().center();
        match entity.variant {
            Variant::Hazard => {
                self.combo = 0;
                self.burst(center, ParticleTint::Smoke);
                events.push(GameEvent::HazardHit);
                self.lose_life(events);
            }
            variant => {
                let points = self.points_for(variant);
                self.score = self.score.saturating_add(points);
                self.combo += 1;
                self.best_combo = self.best_combo.max(self.combo);
                self.actor.catch_animation = self.config.catch_animation_frames;
                let tint = if variant == Variant::Golden {
                    ParticleTint::Gold
                } else {
                    ParticleTint::Pink
                };
                self.burst(center, tint);
                events.push(GameEvent::Caught { variant, points });
            }
        }
    }

    /// Points a catch of `variant` is worth right now.
    pub fn points_for(&self, variant: Variant) -> u32 {
        let base = match variant {
            Variant::Normal => self.config.normal_points,
            Variant::Golden => self.config.golden_points,
            Variant::Hazard => 0,
        };
        if self.multiplier_active() {
            base.saturating_mul(self.config.score_multiplier)
        } else {
            base
        }
    }

    fn lose_life(&mut self, events: &mut Vec<GameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 && self.status != Status::GameOver {
            self.status = Status::GameOver;
            debug!("game over: score={} best_combo={}", self.score, self.best_combo);
            events.push(GameEvent::GameOver { score: self.score });
        }
    }

    fn resolve_power_ups(&mut self, events: &mut Vec<GameEvent>) {
        let actor = self.actor.bounds();
        let mut picked = false;
        let height = self.height;
        self.power_ups.retain_mut(|p| {
            p.advance();
            match fate(&p.bounds(), &actor, height) {
                Fate::Caught => {
                    picked = true;
                    false
                }
                Fate::Missed => false,
                Fate::Alive => true,
            }
        });
        if picked {
            self.multiplier_frames = self.config.power_up_frames;
            events.push(GameEvent::PowerUp);
        }
    }

    fn resolve_bonus_lives(&mut self, events: &mut Vec<GameEvent>) {
        let actor = self.actor.bounds();
        let height = self.height;
        let mut picked = 0u32;
        self.bonus_lives.retain_mut(|h| {
            h.advance();
            match fate(&h.bounds(), &actor, height) {
                Fate::Caught => {
                    picked += 1;
                    false
                }
                Fate::Missed => false,
                Fate::Alive => true,
            }
        });
        for _ in 0..picked {
            self.lives = (self.lives + 1).min(self.config.max_lives);
            events.push(GameEvent::ExtraLife);
        }
    }

    fn tick_particles(&mut self) {
        let gravity = self.config.particle_gravity;
        self.particles.retain_mut(|p| p.tick(gravity));
    }

    fn tick_multiplier(&mut self, events: &mut Vec<GameEvent>) {
        if self.multiplier_frames > 0 {
            self.multiplier_frames -= 1;
            if self.multiplier_frames == 0 {
                events.push(GameEvent::MultiplierExpired);
            }
        }
    }

    fn burst(&mut self, (cx, cy): (f64, f64), tint: ParticleTint) {
        let life = self.config.particle_life;
        for _ in 0..self.config.particle_burst {
            let shape = if self.rng.gen_bool(0.5) {
                ParticleShape::Star
            } else {
                ParticleShape::Circle
            };
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: self.rng.gen_range(-5.0..5.0),
                vy: self.rng.gen_range(-5.0..5.0),
                life,
                max_life: life,
                size: self.rng.gen_range(2.0..6.0),
                tint,
                shape,
            });
        }
    }

    // --- Control ----------------------------------------------------------------

    pub fn pause(&mut self, now: f64) {
        if self.status == Status::Playing {
            self.status = Status::Paused;
            self.paused_at = Some(now);
        }
    }

    /// Resume play; spawn clocks skip the paused interval.
    pub fn resume(&mut self, now: f64) {
        if self.status != Status::Paused {
            return;
        }
        self.status = Status::Playing;
        if let (Some(at), Some(schedule)) = (self.paused_at.take(), self.schedule.as_mut()) {
            schedule.shift((now - at).max(0.0));
        }
    }

    pub fn toggle_pause(&mut self, now: f64) -> Status {
        match self.status {
            Status::Playing => self.pause(now),
            Status::Paused => self.resume(now),
            Status::GameOver => {}
        }
        self.status
    }

    /// Adopt a new play-area size, keeping the actor anchored and in bounds.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.actor.y = height - self.config.actor_bottom_offset;
        let max_x = self.actor.max_x(width);
        self.actor.x = self.actor.x.clamp(0.0, max_x);
        self.actor.target_x = self.actor.target_x.clamp(0.0, max_x);
    }

    // --- Scripted spawns ------------------------------------------------------

    pub fn push_falling(&mut self, entity: FallingEntity) {
        self.falling.push(entity);
    }

    pub fn push_power_up(&mut self, pickup: PowerUp) {
        self.power_ups.push(pickup);
    }

    pub fn push_bonus_life(&mut self, pickup: BonusLife) {
        self.bonus_lives.push(pickup);
    }

    // --- Read access ------------------------------------------------------------

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    pub fn multiplier_active(&self) -> bool {
        self.multiplier_frames > 0
    }

    pub fn multiplier_frames(&self) -> u32 {
        self.multiplier_frames
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn area(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn falling(&self) -> &[FallingEntity] {
        &self.falling
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn bonus_lives(&self) -> &[BonusLife] {
        &self.bonus_lives
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn hazards_on_screen(&self) -> usize {
        self.falling.iter().filter(|e| e.variant.is_hazard()).count()
    }
}
