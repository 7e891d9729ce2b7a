//! The particle model: spawn sampling and the per-tick update rule.
//!
//! Particles are advanced with explicit Euler integration:
//!
//! | Step | Update |
//! |------|--------|
//! | 1 | `vy += gravity` |
//! | 2 | `x += vx`, `y += vy` |
//! | 3 | `life -= 1`, saturating at `i32::MIN` |
//! | 4 | `alpha = clamp(0, 255, floor(255 * life / 100))` |
//!
//! There is no boundary handling. A particle that leaves the canvas is still
//! tracked until its life runs out.

use crate::params::{ColorMode, Direction, SimParams};
use crate::render::CanvasConfig;
use glam::Vec2;
use rand::Rng;

/// Divisor of the alpha fade. Independent of the configured life, so long
/// lived particles stay opaque for a while and short lived ones start dimmed.
pub const ALPHA_DIVISOR: i64 = 100;

/// Alpha for a given remaining life.
#[inline]
pub fn alpha_for_life(life: i32) -> u8 {
    (255 * life as i64).div_euclid(ALPHA_DIVISOR).clamp(0, 255) as u8
}

/// One emitted point with its own physics state.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Canvas-space position.
    pub position: Vec2,
    /// Units per tick.
    pub velocity: Vec2,
    /// Drawn diameter in pixels.
    pub size: u32,
    /// Remaining ticks.
    pub life: i32,
    pub gravity: f32,
    pub fade: f32,
    pub color: [u8; 3],
    pub alpha: u8,
    pub direction: Direction,
}

impl Particle {
    /// Sample a new particle from the parameters.
    pub fn spawn<R: Rng + ?Sized>(params: &SimParams, canvas: &CanvasConfig, rng: &mut R) -> Self {
        let (size_lo, size_hi) = if params.size_min <= params.size_max {
            (params.size_min, params.size_max)
        } else {
            (params.size_max, params.size_min)
        };
        let size = rng.gen_range(size_lo..=size_hi);

        let position = Vec2::new(
            rng.gen::<f32>() * canvas.width as f32,
            rng.gen::<f32>() * canvas.height as f32,
        );

        // Direction is not consulted here: the full ranges are always sampled.
        let velocity = Vec2::new(
            uniform(rng, params.vx_min, params.vx_max) + params.wind,
            uniform(rng, params.vy_min, params.vy_max),
        );

        let color = match params.color_mode() {
            ColorMode::Fixed(rgb) => rgb,
            ColorMode::Random => rng.gen::<[u8; 3]>(),
            ColorMode::White => [255, 255, 255],
        };

        Self {
            position,
            velocity,
            size,
            life: params.life,
            gravity: params.gravity,
            fade: params.fade,
            color,
            alpha: 255,
            direction: params.direction,
        }
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.velocity.y += self.gravity;
        self.position += self.velocity;
        self.life = self.life.saturating_sub(1);
        self.alpha = alpha_for_life(self.life);
    }

    /// Whether the particle should be removed from the live set.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.life <= 0
    }

    #[inline]
    pub fn rgba(&self) -> [u8; 4] {
        [self.color[0], self.color[1], self.color[2], self.alpha]
    }
}

/// Uniform sample between `a` and `b`. Tolerates `a > b` and `a == b`.
fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    a + (b - a) * rng.gen::<f32>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_alpha_for_life() {
        assert_eq!(alpha_for_life(100), 255);
        assert_eq!(alpha_for_life(50), 127);
        assert_eq!(alpha_for_life(1), 2);
        assert_eq!(alpha_for_life(0), 0);
        assert_eq!(alpha_for_life(-3), 0);
        // Saturates instead of exceeding 255
        assert_eq!(alpha_for_life(400), 255);
    }

    #[test]
    fn test_spawn_size_within_range() {
        let params = SimParams {
            size_min: 2,
            size_max: 6,
            ..Default::default()
        };
        let canvas = CanvasConfig::default();
        let mut rng = rng();
        for _ in 0..200 {
            let p = Particle::spawn(&params, &canvas, &mut rng);
            assert!((2..=6).contains(&p.size));
        }
    }

    #[test]
    fn test_spawn_reversed_size_range() {
        let params = SimParams {
            size_min: 8,
            size_max: 4,
            ..Default::default()
        };
        let canvas = CanvasConfig::default();
        let mut rng = rng();
        for _ in 0..100 {
            let p = Particle::spawn(&params, &canvas, &mut rng);
            assert!((4..=8).contains(&p.size));
        }
    }

    #[test]
    fn test_spawn_position_on_canvas() {
        let params = SimParams::default();
        let canvas = CanvasConfig {
            width: 64,
            height: 32,
            ..Default::default()
        };
        let mut rng = rng();
        for _ in 0..200 {
            let p = Particle::spawn(&params, &canvas, &mut rng);
            assert!(p.position.x >= 0.0 && p.position.x < 64.0);
            assert!(p.position.y >= 0.0 && p.position.y < 32.0);
        }
    }

    #[test]
    fn test_spawn_initial_state() {
        let params = SimParams {
            life: 37,
            gravity: 0.25,
            fade: 0.9,
            color: [1, 2, 3],
            direction: Direction::Down,
            ..Default::default()
        };
        let p = Particle::spawn(&params, &CanvasConfig::default(), &mut rng());
        assert_eq!(p.life, 37);
        assert_eq!(p.alpha, 255);
        assert_eq!(p.color, [1, 2, 3]);
        assert_eq!(p.gravity, 0.25);
        assert_eq!(p.fade, 0.9);
        assert_eq!(p.direction, Direction::Down);
    }

    #[test]
    fn test_reset_color_spawns_white() {
        let params = SimParams {
            color: [9, 9, 9],
            reset_color: true,
            ..Default::default()
        };
        let p = Particle::spawn(&params, &CanvasConfig::default(), &mut rng());
        assert_eq!(p.color, [255, 255, 255]);
    }

    #[test]
    fn test_direction_does_not_change_sampling() {
        let base = SimParams::default();
        let up = SimParams {
            direction: Direction::Up,
            ..base.clone()
        };
        let canvas = CanvasConfig::default();
        let a = Particle::spawn(&base, &canvas, &mut rng());
        let b = Particle::spawn(&up, &canvas, &mut rng());
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn test_advance_at_minimum_life_saturates() {
        let params = SimParams {
            life: i32::MIN,
            ..Default::default()
        };
        let mut p = Particle::spawn(&params, &CanvasConfig::default(), &mut rng());
        p.advance();
        assert_eq!(p.life, i32::MIN);
        assert_eq!(p.alpha, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn test_advance_integrates() {
        let mut p = Particle {
            position: Vec2::new(10.0, 20.0),
            velocity: Vec2::new(1.0, -2.0),
            size: 3,
            life: 60,
            gravity: 0.5,
            fade: 0.5,
            color: [255, 0, 0],
            alpha: 255,
            direction: Direction::Random,
        };
        p.advance();
        assert_eq!(p.velocity, Vec2::new(1.0, -1.5));
        assert_eq!(p.position, Vec2::new(11.0, 18.5));
        assert_eq!(p.life, 59);
        assert_eq!(p.alpha, alpha_for_life(59));
        assert!(!p.is_dead());
        assert_eq!(p.rgba(), [255, 0, 0, 150]);
    }
}
