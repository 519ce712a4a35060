//! Particle data.
//!
//! A [`Particle`] is plain state. Stepping lives in [`crate::field`] and
//! drawing goes through [`crate::surface::Surface`], so the data here can be
//! built and inspected freely in tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which group a particle belongs to.
///
/// Only [`ParticleKind::Primary`] particles react to the pointer and take
/// part in proximity links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Steerable node, linked to nearby nodes.
    Primary,
    /// Faint background dust that only drifts.
    Ambient,
}

/// An RGB color with a floating point alpha, as used by canvas style strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Create a color. Alpha is clamped to `[0, 1]`.
    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// Same hue, different opacity.
    pub fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// CSS `rgba(...)` form for canvas fill/stroke styles.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A single point mass of the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Constant drift per tick. Steering moves `position`, never this.
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Rgba,
    pub kind: ParticleKind,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, color: Rgba, kind: ParticleKind) -> Self {
        Self {
            position,
            velocity,
            radius,
            color,
            kind,
        }
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.kind == ParticleKind::Primary
    }
}
