//! Spawn context for particle initialization.
//!
//! Wraps the field's RNG with the sampling helpers needed to populate a
//! surface: uniform spans, inset positions and whole particles of a kind.

use crate::config::{KindConfig, Span};
use crate::particle::{Particle, ParticleKind, Rgba};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Random source used when (re)populating a field.
///
/// With a fixed seed the sequence of generated fields is reproducible,
/// including across resizes.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context. `None` seeds from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random value in `[span.min, span.max)`.
    ///
    /// A collapsed or inverted span never panics; it interpolates the same
    /// way, so `min == max` always yields `min`.
    #[inline]
    pub fn random_in(&mut self, span: Span) -> f32 {
        span.lerp(self.random())
    }

    // ========== Position helpers ==========

    /// Random point inside `width` x `height`, kept `inset` away from every edge.
    ///
    /// When the surface is narrower than `2 * inset` the sample falls back
    /// to interpolating across the inverted range rather than failing.
    pub fn random_in_inset(&mut self, width: f32, height: f32, inset: f32) -> Vec2 {
        let x = Span::new(inset, width - inset);
        let y = Span::new(inset, height - inset);
        Vec2::new(self.random_in(x), self.random_in(y))
    }

    // ========== Particles ==========

    /// Draw one particle of `kind` for a `width` x `height` surface.
    ///
    /// Positions are inset by twice the particle's radius so nothing spawns
    /// clipped at the boundary.
    pub fn particle(
        &mut self,
        kind: ParticleKind,
        ranges: &KindConfig,
        base_color: Rgba,
        width: f32,
        height: f32,
    ) -> Particle {
        let radius = self.random_in(ranges.radius);
        let position = self.random_in_inset(width, height, radius * 2.0);
        let velocity = Vec2::new(
            self.random_in(ranges.velocity_x),
            self.random_in(ranges.velocity_y),
        );
        let color = base_color.with_alpha(self.random_in(ranges.alpha));
        Particle::new(position, velocity, radius, color, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_in_span() {
        let mut ctx = SpawnContext::new(Some(1));
        let span = Span::new(0.1, 0.3);
        for _ in 0..1000 {
            let v = ctx.random_in(span);
            assert!(v >= 0.1 && v < 0.3);
        }
    }

    #[test]
    fn test_collapsed_span() {
        let mut ctx = SpawnContext::new(Some(1));
        assert_eq!(ctx.random_in(Span::new(2.0, 2.0)), 2.0);
    }

    #[test]
    fn test_inset_position() {
        let mut ctx = SpawnContext::new(Some(5));
        for _ in 0..1000 {
            let p = ctx.random_in_inset(200.0, 100.0, 6.0);
            assert!(p.x >= 6.0 && p.x < 194.0);
            assert!(p.y >= 6.0 && p.y < 94.0);
        }
    }

    #[test]
    fn test_tiny_surface_does_not_panic() {
        let mut ctx = SpawnContext::new(Some(5));
        let p = ctx.random_in_inset(3.0, 3.0, 6.0);
        assert!(p.x.is_finite() && p.y.is_finite());
    }

    #[test]
    fn test_particle_ranges() {
        let mut ctx = SpawnContext::new(Some(11));
        let base = Rgba::new(88, 166, 255, 1.0);
        for _ in 0..500 {
            let p = ctx.particle(ParticleKind::Ambient, &KindConfig::AMBIENT, base, 640.0, 480.0);
            assert_eq!(p.kind, ParticleKind::Ambient);
            assert!(p.radius >= 0.5 && p.radius < 2.0);
            assert!(p.velocity.x >= 0.05 && p.velocity.x < 0.15);
            assert!(p.velocity.y >= -0.1 && p.velocity.y < 0.1);
            assert!(p.color.a >= 0.05 && p.color.a < 0.25);
            assert_eq!((p.color.r, p.color.g, p.color.b), (88, 166, 255));
            assert!(p.position.x >= p.radius * 2.0);
            assert!(p.position.x < 640.0 - p.radius * 2.0);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let mut a = SpawnContext::new(Some(42));
        let mut b = SpawnContext::new(Some(42));
        for _ in 0..10 {
            assert_eq!(a.random(), b.random());
        }
    }
}
