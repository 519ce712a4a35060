//! Error types for nodefield.
//!
//! The simulation itself cannot fail. Errors only come from the edges:
//! loading configuration, writing rendered frames, and binding to a browser
//! canvas.

use std::fmt;

/// Errors that can occur while loading or saving a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Json(serde_json::Error),
    /// The configuration parsed but describes an unusable field.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse config JSON: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid field config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

/// Errors that can occur when saving a rasterized frame.
#[derive(Debug)]
pub enum RenderError {
    /// Failed to encode the image.
    Image(image::ImageError),
    /// Failed to write the output file.
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Image(e) => write!(f, "Failed to encode image: {}", e),
            RenderError::Io(e) => write!(f, "Failed to write image file: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Image(e) => Some(e),
            RenderError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Image(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Errors that can occur while binding the engine to a browser page.
#[cfg(feature = "web")]
#[derive(Debug)]
pub enum HostError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// No element with the given id.
    CanvasNotFound(String),
    /// The element exists but is not a `<canvas>`.
    NotACanvas(String),
    /// The canvas refused to provide a 2D context.
    ContextUnavailable,
    /// A JavaScript call threw.
    Js(String),
}

#[cfg(feature = "web")]
impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NoWindow => write!(f, "No global window object available"),
            HostError::NoDocument => write!(f, "Window has no document"),
            HostError::CanvasNotFound(id) => write!(f, "No element with id '{}'", id),
            HostError::NotACanvas(id) => write!(f, "Element '{}' is not a canvas", id),
            HostError::ContextUnavailable => write!(f, "Canvas 2D context unavailable"),
            HostError::Js(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}

#[cfg(feature = "web")]
impl std::error::Error for HostError {}

#[cfg(feature = "web")]
impl From<wasm_bindgen::JsValue> for HostError {
    fn from(e: wasm_bindgen::JsValue) -> Self {
        HostError::Js(format!("{:?}", e))
    }
}

#[cfg(feature = "web")]
impl From<HostError> for wasm_bindgen::JsValue {
    fn from(e: HostError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
