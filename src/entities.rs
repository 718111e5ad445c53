//! Game entity types: plain data plus the tiny bits of motion each one owns.

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// The player-controlled flyer.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub x: f64,
    pub y: f64,
    pub target_x: f64,
    pub width: f64,
    pub height: f64,
    pub bounce: f64,
    pub wing_flap: f64,
    /// Frames left on the catch "pop" animation.
    pub catch_animation: u32,
}

impl Actor {
    /// Centred horizontally, `bottom_offset` px above the bottom edge.
    pub fn centered(
        area_width: f64,
        area_height: f64,
        width: f64,
        height: f64,
        bottom_offset: f64,
    ) -> Self {
        let x = (area_width / 2.0 - width / 2.0).max(0.0);
        Self {
            x,
            y: area_height - bottom_offset,
            target_x: x,
            width,
            height,
            bounce: 0.0,
            wing_flap: 0.0,
            catch_animation: 0,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.width, height: self.height }
    }

    /// Largest legal `x` for a play area of the given width.
    pub fn max_x(&self, area_width: f64) -> f64 {
        (area_width - self.width).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Normal,
    /// Bonus catch worth more points.
    Golden,
    /// Costs a life when caught, harmless when it falls past.
    Hazard,
}

impl Variant {
    pub const fn is_hazard(self) -> bool {
        matches!(self, Variant::Hazard)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallingEntity {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub variant: Variant,
    pub rotation: f64,
    pub wobble: f64,
}

impl FallingEntity {
    /// One frame of motion: fall, spin, and sway sideways.
    pub fn advance(&mut self, wobble_amplitude: f64) {
        self.y += self.speed;
        self.rotation += 0.05;
        self.wobble += 0.1;
        self.x += self.wobble.sin() * wobble_amplitude;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.size, height: self.size }
    }
}

/// Simple straight-falling pickup. Used for both the multiplier power-up and
/// the bonus life.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Pickup {
    pub fn advance(&mut self) {
        self.y += self.speed;
    }

    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

pub type PowerUp = Pickup;
pub type BonusLife = Pickup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleShape {
    Star,
    Circle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleTint {
    Gold,
    Pink,
    Smoke,
}

impl ParticleTint {
    pub const fn css(self) -> &'static str {
        match self {
            ParticleTint::Gold => "#FFD700",
            ParticleTint::Pink => "#FF69B4",
            ParticleTint::Smoke => "#4B4453",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: u32,
    pub max_life: u32,
    pub size: f64,
    pub tint: ParticleTint,
    pub shape: ParticleShape,
}

impl Particle {
    /// Advance one frame. Returns `false` once the particle has expired.
    pub fn tick(&mut self, gravity: f64) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += gravity;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    /// Remaining life as 0..=1, used for fading.
    pub fn alpha(&self) -> f64 {
        if self.max_life == 0 {
            0.0
        } else {
            f64::from(self.life) / f64::from(self.max_life)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bx(x: f64, y: f64, w: f64, h: f64) -> Bounds {
        Bounds { x, y, width: w, height: h }
    }

    #[test]
    fn overlapping_boxes_collide() {
        assert!(bx(0.0, 0.0, 10.0, 10.0).overlaps(&bx(5.0, 5.0, 10.0, 10.0)));
        assert!(bx(5.0, 5.0, 10.0, 10.0).overlaps(&bx(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        assert!(!bx(0.0, 0.0, 10.0, 10.0).overlaps(&bx(10.0, 0.0, 10.0, 10.0)));
        assert!(!bx(0.0, 0.0, 10.0, 10.0).overlaps(&bx(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn actor_starts_centered_above_bottom() {
        let a = Actor::centered(800.0, 600.0, 90.0, 90.0, 140.0);
        assert_eq!(a.x, 355.0);
        assert_eq!(a.y, 460.0);
        assert_eq!(a.target_x, a.x);
        assert_eq!(a.max_x(800.0), 710.0);
    }

    #[test]
    fn narrow_area_pins_actor_at_zero() {
        let a = Actor::centered(50.0, 600.0, 90.0, 90.0, 140.0);
        assert_eq!(a.x, 0.0);
        assert_eq!(a.max_x(50.0), 0.0);
    }

    #[test]
    fn falling_entity_moves_down_by_speed() {
        let mut e = FallingEntity {
            x: 100.0,
            y: -60.0,
            size: 60.0,
            speed: 4.0,
            variant: Variant::Normal,
            rotation: 0.0,
            wobble: 0.0,
        };
        e.advance(1.5);
        assert_eq!(e.y, -56.0);
        assert!((e.rotation - 0.05).abs() < 1e-12);
        assert!((e.x - (100.0 + 0.1f64.sin() * 1.5)).abs() < 1e-12);
    }

    #[test]
    fn particle_expires_after_its_life() {
        let mut p = Particle {
            x: 0.0,
            y: 0.0,
            vx: 1.0,
            vy: -2.0,
            life: 2,
            max_life: 2,
            size: 3.0,
            tint: ParticleTint::Pink,
            shape: ParticleShape::Circle,
        };
        assert!(p.tick(0.3));
        assert_eq!(p.alpha(), 0.5);
        assert!(!p.tick(0.3));
        assert_eq!(p.x, 2.0);
        assert!((p.vy - (-2.0 + 0.6)).abs() < 1e-12);
    }
}
