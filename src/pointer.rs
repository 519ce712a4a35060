//! Shared pointer position.
//!
//! The host owns a [`PointerState`] and writes to it from its pointer-move
//! handler; the field holds a clone and only reads. Both sides run on the
//! same thread, so a `Cell` is all the synchronization needed.
//!
//! ```ignore
//! let pointer = PointerState::new();
//! let mut field = Field::new(800, 600, FieldConfig::default(), pointer.clone());
//!
//! // in the host's mousemove handler
//! pointer.set(Vec2::new(e.client_x() as f32, e.client_y() as f32));
//! ```

use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

/// Most recent known pointer position, or nothing before the first event.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    position: Rc<Cell<Option<Vec2>>>,
}

impl PointerState {
    /// A pointer that has not been observed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new absolute position in surface pixels.
    pub fn set(&self, position: Vec2) {
        self.position.set(Some(position));
    }

    /// Forget the position, e.g. when the pointer leaves the page.
    pub fn clear(&self) {
        self.position.set(None);
    }

    /// Current position, `None` if the pointer has never been seen.
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position.get()
    }
}
