//! Software rendering into an `image::RgbaImage`.
//!
//! [`RasterSurface`] lets the field run with no browser at all: circles are
//! filled by pixel-center coverage, lines are stepped along their major
//! axis, and every write is source-over blended so overlapping translucent
//! dots and links accumulate the way they do on a canvas.

use crate::error::RenderError;
use crate::particle::Rgba;
use crate::surface::Surface;
use glam::Vec2;
use image::{ImageFormat, Rgba as Pixel, RgbaImage};
use std::path::Path;

/// A pixel buffer implementing [`Surface`].
pub struct RasterSurface {
    image: RgbaImage,
    background: Pixel<u8>,
}

impl RasterSurface {
    /// Create a transparent surface of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0, 0, 0, 0])
    }

    /// Create a surface that clears to `background` (straight RGBA).
    pub fn with_background(width: u32, height: u32, background: [u8; 4]) -> Self {
        let background = Pixel(background);
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the current contents as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Source-over blend `color` onto the pixel at (`x`, `y`), if inside.
    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        if color.a <= 0.0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let sa = color.a;
        let da = dst[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }

        let mix = |s: u8, d: u8| -> u8 {
            let s = s as f32 / 255.0;
            let d = d as f32 / 255.0;
            let c = (s * sa + d * da * (1.0 - sa)) / out_a;
            (c * 255.0).round().clamp(0.0, 255.0) as u8
        };

        *dst = Pixel([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]);
    }
}

impl Surface for RasterSurface {
    fn clear(&mut self) {
        let bg = self.background;
        for px in self.image.pixels_mut() {
            *px = bg;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r_sq = radius * radius;
        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let y1 = (center.y + radius).ceil() as i64;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if pixel_center.distance_squared(center) <= r_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil() as i64;
        if steps == 0 {
            self.blend(from.x.floor() as i64, from.y.floor() as i64, color);
            return;
        }

        // Thicken perpendicular to the major axis for widths above one pixel.
        let half = ((width.max(1.0) - 1.0) / 2.0).round() as i64;
        let x_major = delta.x.abs() >= delta.y.abs();
        let inc = delta / steps as f32;

        let mut p = from;
        for _ in 0..=steps {
            let (x, y) = (p.x.floor() as i64, p.y.floor() as i64);
            for o in -half..=half {
                if x_major {
                    self.blend(x, y + o, color);
                } else {
                    self.blend(x + o, y, color);
                }
            }
            p += inc;
        }
    }
}
