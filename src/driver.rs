//! Frame driver.
//!
//! [`FrameDriver`] is the engine surface a host talks to. The host calls
//! [`start`](FrameDriver::start) once it knows the surface size, forwards
//! pointer and resize notifications, and calls [`tick`](FrameDriver::tick)
//! from its refresh callback, rescheduling for as long as `tick` returns
//! `true`:
//!
//! ```ignore
//! let mut driver = FrameDriver::new(FieldConfig::default(), PointerState::new());
//! driver.start(width, height);
//!
//! // from requestAnimationFrame or an equivalent loop
//! if driver.tick(&mut surface) {
//!     schedule_next_frame();
//! }
//! ```

use crate::config::FieldConfig;
use crate::field::Field;
use crate::pointer::PointerState;
use crate::surface::Surface;
use crate::time::Time;
use glam::Vec2;

/// Whether the driver is producing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    /// Not started, or stopped. Ticks draw nothing.
    #[default]
    Stopped,
    /// Every tick steps and draws the field.
    Running,
}

/// Owns the field and runs it once per display refresh.
#[derive(Debug)]
pub struct FrameDriver {
    field: Field,
    pointer: PointerState,
    state: DriverState,
    time: Time,
}

impl FrameDriver {
    /// Create a stopped driver. The field stays empty until [`start`](Self::start).
    pub fn new(config: FieldConfig, pointer: PointerState) -> Self {
        Self {
            field: Field::new(0, 0, config, pointer.clone()),
            pointer,
            state: DriverState::Stopped,
            time: Time::new(),
        }
    }

    /// Bind to a `width` x `height` surface, populate the field and run.
    ///
    /// Starting an already running driver repopulates it for the new size.
    pub fn start(&mut self, width: u32, height: u32) {
        self.field.resize(width, height);
        self.time.reset();
        self.state = DriverState::Running;
        log::info!(
            "Particle field running at {}x{} ({} particles)",
            width,
            height,
            self.field.particles().len()
        );
    }

    /// The surface changed size: repopulate for the new dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("Surface resized to {}x{}", width, height);
        self.field.resize(width, height);
    }

    /// Record a pointer-move notification in surface pixels.
    pub fn update_pointer(&self, position: Vec2) {
        self.pointer.set(position);
    }

    /// Produce one frame. Returns whether the host should schedule another.
    ///
    /// While running: clear, step every particle, draw dots, draw links.
    /// While stopped nothing is drawn.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.state == DriverState::Stopped {
            return false;
        }

        surface.clear();
        self.field.step();
        self.field.render(surface);

        if self.time.update() {
            log::trace!(
                "frame {}: {:.1} fps, {} particles",
                self.time.frame(),
                self.time.fps(),
                self.field.particles().len()
            );
        }
        true
    }

    /// Stop producing frames. The field is kept so the driver can be restarted.
    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            log::info!("Particle field stopped after {} frames", self.time.frame());
        }
        self.state = DriverState::Stopped;
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn time(&self) -> &Time {
        &self.time
    }
}
