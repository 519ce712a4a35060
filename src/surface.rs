//! Drawing surface abstraction.
//!
//! The field renders through the [`Surface`] trait, which covers exactly the
//! immediate-mode calls a 2D canvas offers it: clear, filled circle and
//! stroked line. Hosts implement it over a real canvas (the `web` module,
//! behind the `web` feature) or a pixel buffer
//! ([`crate::raster::RasterSurface`]).
//!
//! [`RecordingSurface`] captures the calls instead of drawing them, which is
//! how rendering is asserted in tests.

use crate::particle::Rgba;
use glam::Vec2;

/// A 2D immediate-mode drawing target of fixed pixel size.
pub trait Surface {
    /// Erase the whole surface.
    fn clear(&mut self);

    /// Fill a circle of `radius` centered at `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight line from `from` to `to`.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba, width: f32 },
}

/// A surface that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands drawn since the most recent clear.
    pub fn current_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.current_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.current_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }
}
