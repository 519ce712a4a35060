//! # nodefield - Particle Field Background
//!
//! A drifting field of nodes and dust for page backgrounds. Nodes shy away
//! from the pointer and are joined by faint lines when they come close to
//! each other.
//!
//! The simulation is plain CPU code over a flat `Vec` of particles. It
//! draws through a small [`Surface`] trait, so the same field can render to
//! a browser canvas (`web` feature), to a PNG ([`RasterSurface`]), or into a
//! [`RecordingSurface`] in tests.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nodefield::prelude::*;
//!
//! let pointer = PointerState::new();
//! let mut driver = FrameDriver::new(FieldConfig::default(), pointer.clone());
//! driver.start(1280, 720);
//!
//! let mut surface = RasterSurface::new(1280, 720);
//! pointer.set(Vec2::new(640.0, 360.0));
//! for _ in 0..120 {
//!     driver.tick(&mut surface);
//! }
//! surface.save_png("field.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Every [`Particle`] has a position, a constant velocity, a radius and a
//! color. Two kinds exist:
//! - [`ParticleKind::Primary`] - one per 15000 px² of surface. Steered by
//!   the pointer and linked to nearby primaries.
//! - [`ParticleKind::Ambient`] - a fixed 100 faint dust motes that only drift.
//!
//! ### Stepping
//!
//! Once per tick each particle is nudged 2 px per axis away from the pointer
//! (primaries inside a 150 px bubble only, and never past a margin of ten
//! radii from the edge), moved by its velocity, then wrapped to the opposite
//! edge if it left the viewport by more than its radius.
//!
//! ### Links
//!
//! Every pair of primaries with squared distance below
//! `(W / 9) * (H / 9)` is joined by a 1 px line at opacity
//! `1 - d² / 20000`, clamped to `[0, 1]`.
//!
//! ### Driving
//!
//! [`FrameDriver`] is what a host talks to: `start`, `resize`,
//! `update_pointer`, `tick` once per display refresh, and `stop`.
//!
//! ## Feature Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`field`] | [`Field`], [`step_particle`], [`Link`] |
//! | [`config`] | [`FieldConfig`] with JSON load/save |
//! | [`driver`] | [`FrameDriver`], [`DriverState`] |
//! | [`surface`] | [`Surface`], [`RecordingSurface`] |
//! | [`raster`] | [`RasterSurface`] over `image` |
//! | [`tilt`] | Card tilt/glare transform |
//! | `web` | Canvas host for wasm32 (feature `web`) |

pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod raster;
mod spawn;
pub mod surface;
pub mod tilt;
pub mod time;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use config::{FieldConfig, KindConfig, Span};
pub use driver::{DriverState, FrameDriver};
pub use error::{ConfigError, RenderError};
pub use field::{step_particle, Field, Link};
pub use glam::Vec2;
pub use particle::{Particle, ParticleKind, Rgba};
pub use pointer::PointerState;
pub use raster::RasterSurface;
pub use spawn::SpawnContext;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use tilt::Tilt;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use nodefield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FieldConfig;
    pub use crate::driver::{DriverState, FrameDriver};
    pub use crate::field::Field;
    pub use crate::particle::{Particle, ParticleKind, Rgba};
    pub use crate::pointer::PointerState;
    pub use crate::raster::RasterSurface;
    pub use crate::surface::Surface;
    pub use crate::Vec2;
}
