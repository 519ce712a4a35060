//! Card tilt and glare.
//!
//! Hovered cards rotate towards the pointer by up to half the tilt
//! strength on each axis and grow slightly; a glare highlight follows the
//! pointer through the `--mouse-x` / `--mouse-y` custom properties.

use glam::Vec2;

/// Default maximum tilt in degrees, edge to edge.
pub const TILT_STRENGTH: f32 = 12.0;

/// Transform applied when the pointer leaves the card.
pub const RESTING_TRANSFORM: &str =
    "perspective(1000px) rotateX(0deg) rotateY(0deg) scale3d(1, 1, 1)";

/// Rotation and glare position for one pointer position over a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    /// Degrees around the X axis. Positive tips the top edge away.
    pub rotate_x: f32,
    /// Degrees around the Y axis. Positive turns the right edge away.
    pub rotate_y: f32,
    /// Pointer position relative to the card's top-left corner.
    pub glare: Vec2,
}

impl Tilt {
    /// Tilt for a pointer at `local` inside a card of `size`, with `strength` degrees.
    ///
    /// A zero-sized card yields no rotation.
    pub fn new(local: Vec2, size: Vec2, strength: f32) -> Self {
        let rotate_y = if size.x > 0.0 {
            strength * (local.x / size.x - 0.5)
        } else {
            0.0
        };
        let rotate_x = if size.y > 0.0 {
            -strength * (local.y / size.y - 0.5)
        } else {
            0.0
        };
        Self {
            rotate_x,
            rotate_y,
            glare: local,
        }
    }

    /// Tilt from a pointer in page coordinates and the card's bounding box.
    pub fn from_client(pointer: Vec2, rect_origin: Vec2, rect_size: Vec2) -> Self {
        Self::new(pointer - rect_origin, rect_size, TILT_STRENGTH)
    }

    /// CSS transform for the hovered card.
    pub fn css_transform(&self) -> String {
        format!(
            "perspective(1000px) rotateX({}deg) rotateY({}deg) scale3d(1.05, 1.05, 1.05)",
            self.rotate_x, self.rotate_y
        )
    }
}
