//! Field configuration.
//!
//! [`FieldConfig::default`] reproduces the portfolio background exactly:
//! one node per 15000 px², 100 dust motes, a 150 px pointer bubble and a
//! link threshold of a ninth of the viewport on each axis.
//!
//! Configs serialize to JSON so a tuned field can be saved and replayed:
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_pointer_radius(200.0)
//!     .with_seed(7);
//! config.save("field.json")?;
//!
//! let loaded = FieldConfig::load("field.json")?;
//! assert_eq!(loaded, config);
//! ```

use crate::error::ConfigError;
use crate::particle::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Half-open sampling interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Value at `t` in `[0, 1)` along the span.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Sampling ranges for one particle kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KindConfig {
    pub radius: Span,
    pub velocity_x: Span,
    pub velocity_y: Span,
    pub alpha: Span,
}

impl KindConfig {
    /// Ranges used for linked, steerable nodes.
    pub const PRIMARY: KindConfig = KindConfig {
        radius: Span::new(1.0, 3.0),
        velocity_x: Span::new(0.1, 0.3),
        velocity_y: Span::new(-0.2, 0.2),
        alpha: Span::new(0.2, 0.8),
    };

    /// Ranges used for background dust.
    pub const AMBIENT: KindConfig = KindConfig {
        radius: Span::new(0.5, 2.0),
        velocity_x: Span::new(0.05, 0.15),
        velocity_y: Span::new(-0.1, 0.1),
        alpha: Span::new(0.05, 0.25),
    };

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let spans = [
            ("radius", self.radius),
            ("velocity_x", self.velocity_x),
            ("velocity_y", self.velocity_y),
            ("alpha", self.alpha),
        ];
        for (field, span) in spans {
            if !span.is_ordered() {
                return Err(ConfigError::Invalid(format!(
                    "{}.{} has min {} above max {}",
                    name, field, span.min, span.max
                )));
            }
        }
        if self.radius.min <= 0.0 {
            return Err(ConfigError::Invalid(format!("{}.radius must be positive", name)));
        }
        Ok(())
    }
}

/// Complete particle field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface area (px²) per primary particle.
    pub density_area: f32,
    /// Number of ambient particles, independent of surface size.
    pub ambient_count: u32,
    pub primary: KindConfig,
    pub ambient: KindConfig,
    /// Radius of the pointer's repulsion bubble in pixels.
    pub pointer_radius: f32,
    /// Pixels moved per axis per tick while inside the bubble.
    pub nudge_step: f32,
    /// Inner margin as a multiple of particle radius.
    pub inner_margin_factor: f32,
    /// Links form below `(W / divisor) * (H / divisor)` squared distance.
    pub link_divisor: f32,
    /// Squared distance at which link opacity reaches zero.
    pub link_falloff: f32,
    pub link_width: f32,
    /// Hue shared by every particle and link. Alpha is ignored.
    pub base_color: Rgba,
    /// Fixed RNG seed. `None` draws a fresh field every time.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_area: 15_000.0,
            ambient_count: 100,
            primary: KindConfig::PRIMARY,
            ambient: KindConfig::AMBIENT,
            pointer_radius: 150.0,
            nudge_step: 2.0,
            inner_margin_factor: 10.0,
            link_divisor: 9.0,
            link_falloff: 20_000.0,
            link_width: 1.0,
            base_color: Rgba::new(88, 166, 255, 1.0),
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn with_density_area(mut self, area: f32) -> Self {
        self.density_area = area;
        self
    }

    pub fn with_ambient_count(mut self, count: u32) -> Self {
        self.ambient_count = count;
        self
    }

    pub fn with_pointer_radius(mut self, radius: f32) -> Self {
        self.pointer_radius = radius.max(0.0);
        self
    }

    pub fn with_nudge_step(mut self, step: f32) -> Self {
        self.nudge_step = step;
        self
    }

    pub fn with_link_falloff(mut self, falloff: f32) -> Self {
        self.link_falloff = falloff;
        self
    }

    pub fn with_base_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.base_color = Rgba::new(r, g, b, 1.0);
        self
    }

    /// Make the generated field reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of primary particles for a `width` x `height` surface.
    ///
    /// Zero whenever either dimension is zero.
    pub fn primary_count(&self, width: u32, height: u32) -> usize {
        if width == 0 || height == 0 || self.density_area <= 0.0 {
            return 0;
        }
        let area = width as f64 * height as f64;
        (area / self.density_area as f64).floor() as usize
    }

    /// Squared distance below which two primaries are linked.
    pub fn link_threshold_sq(&self, width: u32, height: u32) -> f32 {
        (width as f32 / self.link_divisor) * (height as f32 / self.link_divisor)
    }

    /// Check the configuration describes a usable field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.density_area > 0.0) {
            return Err(ConfigError::Invalid("density_area must be positive".into()));
        }
        if !(self.link_divisor > 0.0) {
            return Err(ConfigError::Invalid("link_divisor must be positive".into()));
        }
        if !(self.link_falloff > 0.0) {
            return Err(ConfigError::Invalid("link_falloff must be positive".into()));
        }
        if self.pointer_radius < 0.0 || self.nudge_step < 0.0 || self.inner_margin_factor < 0.0 {
            return Err(ConfigError::Invalid(
                "pointer_radius, nudge_step and inner_margin_factor must not be negative".into(),
            ));
        }
        self.primary.validate("primary")?;
        self.ambient.validate("ambient")?;
        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing keys fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_primary_count() {
        let config = FieldConfig::default();
        assert_eq!(config.primary_count(300, 150), 3);
        assert_eq!(config.primary_count(400, 300), 8);
        assert_eq!(config.primary_count(800, 600), 32);
        assert_eq!(config.primary_count(0, 600), 0);
        assert_eq!(config.primary_count(800, 0), 0);
        // 14999 px² rounds down to nothing
        assert_eq!(config.primary_count(1, 14_999), 0);
    }

    #[test]
    fn test_link_threshold() {
        let config = FieldConfig::default();
        let t = config.link_threshold_sq(900, 450);
        assert!((t - 5000.0).abs() < 0.001);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = FieldConfig::default().with_pointer_radius(90.0).with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let back = FieldConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FieldConfig::from_json(r#"{ "ambient_count": 5 }"#).unwrap();
        assert_eq!(config.ambient_count, 5);
        assert_eq!(config.pointer_radius, 150.0);
        assert_eq!(config.primary, KindConfig::PRIMARY);
    }

    #[test]
    fn test_rejects_bad_density() {
        let err = FieldConfig::from_json(r#"{ "density_area": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_span() {
        let mut config = FieldConfig::default();
        config.ambient.alpha = Span::new(0.5, 0.1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ambient.alpha"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("nodefield-config-{}.json", std::process::id()));
        let config = FieldConfig::default().with_ambient_count(12).with_seed(99);
        config.save(&path).unwrap();
        let loaded = FieldConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FieldConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
