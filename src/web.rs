//! Browser host.
//!
//! Binds a [`FrameDriver`] to an HTML canvas: the canvas is sized to the
//! window, window `mousemove` feeds the pointer, window `resize` resizes the
//! canvas and repopulates the field, and `requestAnimationFrame` drives the
//! ticks.
//!
//! ```js
//! import init, { ParticleBackground, attachTilt } from "./pkg/nodefield.js";
//!
//! await init();
//! const background = new ParticleBackground("particle-canvas");
//! background.start();
//! attachTilt(".welcome-card, .project-card");
//! ```

use crate::config::FieldConfig;
use crate::driver::FrameDriver;
use crate::error::HostError;
use crate::particle::Rgba;
use crate::pointer::PointerState;
use crate::surface::Surface;
use crate::tilt::{Tilt, RESTING_TRANSFORM};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, Window};

/// Install the panic hook and console logger. Safe to call repeatedly.
fn init_logging() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn window() -> Result<Window, HostError> {
    web_sys::window().ok_or(HostError::NoWindow)
}

/// Current window inner size in CSS pixels.
fn window_size(window: &Window) -> Result<(u32, u32), HostError> {
    let w = window.inner_width()?.as_f64().unwrap_or(0.0);
    let h = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((w.max(0.0) as u32, h.max(0.0) as u32))
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `canvas_id` in the document and acquire its 2D context.
    pub fn from_id(canvas_id: &str) -> Result<Self, HostError> {
        let document = window()?.document().ok_or(HostError::NoDocument)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| HostError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::NotACanvas(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(HostError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    /// Match the canvas backing size to the window. Returns the new size.
    fn fit_to(&self, window: &Window) -> Result<(u32, u32), HostError> {
        let (w, h) = window_size(window)?;
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
        Ok((w, h))
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.begin_path();
        // arc only throws for a negative radius
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }
}

struct Host {
    driver: FrameDriver,
    surface: CanvasSurface,
    frame_id: Option<i32>,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// The animated particle background, exported to JavaScript.
#[wasm_bindgen]
pub struct ParticleBackground {
    window: Window,
    host: Rc<RefCell<Host>>,
    frame: FrameCallback,
    on_pointer: Closure<dyn FnMut(MouseEvent)>,
    on_resize: Closure<dyn FnMut()>,
    listening: bool,
}

#[wasm_bindgen]
impl ParticleBackground {
    /// Bind to the canvas with id `canvas_id` using the default field.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<ParticleBackground, JsValue> {
        Ok(Self::with_config(canvas_id, FieldConfig::default())?)
    }

    /// Bind to a canvas with a field configuration given as JSON.
    #[wasm_bindgen(js_name = withConfigJson)]
    pub fn with_config_json(canvas_id: &str, json: &str) -> Result<ParticleBackground, JsValue> {
        let config = FieldConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::with_config(canvas_id, config)?)
    }

    /// Size the canvas, populate the field and start animating.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.host.borrow().driver.is_running() {
            return Ok(());
        }

        {
            let mut host = self.host.borrow_mut();
            let (w, h) = host.surface.fit_to(&self.window)?;
            host.driver.start(w, h);
        }
        self.listen()?;
        self.install_frame_callback();
        self.request_frame()?;
        Ok(())
    }

    /// Stop animating, cancel the pending frame and detach listeners.
    pub fn stop(&mut self) {
        {
            let mut host = self.host.borrow_mut();
            host.driver.stop();
            if let Some(id) = host.frame_id.take() {
                let _ = self.window.cancel_animation_frame(id);
            }
        }
        // Safe to drop here: stop is never called from inside the frame callback.
        self.frame.borrow_mut().take();
        self.unlisten();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.host.borrow().driver.is_running()
    }

    #[wasm_bindgen(getter, js_name = particleCount)]
    pub fn particle_count(&self) -> usize {
        self.host.borrow().driver.field().particles().len()
    }
}

impl ParticleBackground {
    pub fn with_config(canvas_id: &str, config: FieldConfig) -> Result<Self, HostError> {
        init_logging();

        let window = window()?;
        let surface = CanvasSurface::from_id(canvas_id)?;
        let pointer = PointerState::new();
        let host = Rc::new(RefCell::new(Host {
            driver: FrameDriver::new(config, pointer.clone()),
            surface,
            frame_id: None,
        }));

        let on_pointer = Closure::wrap(Box::new(move |e: MouseEvent| {
            pointer.set(Vec2::new(e.client_x() as f32, e.client_y() as f32));
        }) as Box<dyn FnMut(MouseEvent)>);

        let on_resize = {
            let host = host.clone();
            let window = window.clone();
            Closure::wrap(Box::new(move || {
                let mut host = host.borrow_mut();
                match host.surface.fit_to(&window) {
                    Ok((w, h)) => host.driver.resize(w, h),
                    Err(e) => log::error!("Resize failed: {}", e),
                }
            }) as Box<dyn FnMut()>)
        };

        Ok(Self {
            window,
            host,
            frame: Rc::new(RefCell::new(None)),
            on_pointer,
            on_resize,
            listening: false,
        })
    }

    fn listen(&mut self) -> Result<(), HostError> {
        if self.listening {
            return Ok(());
        }
        self.window.add_event_listener_with_callback(
            "mousemove",
            self.on_pointer.as_ref().unchecked_ref(),
        )?;
        self.window
            .add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())?;
        self.listening = true;
        Ok(())
    }

    fn unlisten(&mut self) {
        if !self.listening {
            return;
        }
        let _ = self.window.remove_event_listener_with_callback(
            "mousemove",
            self.on_pointer.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
        self.listening = false;
    }

    /// Create the self-rescheduling frame closure.
    ///
    /// The closure holds a clone of the slot it lives in so it can pass
    /// itself back to `requestAnimationFrame`; `stop` empties the slot to
    /// break the cycle.
    fn install_frame_callback(&self) {
        let host = self.host.clone();
        let slot = self.frame.clone();
        let window = self.window.clone();

        *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut host = host.borrow_mut();
            host.frame_id = None;

            let Host { driver, surface, .. } = &mut *host;
            if !driver.tick(surface) {
                return;
            }

            if let Some(callback) = slot.borrow().as_ref() {
                match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                    Ok(id) => host.frame_id = Some(id),
                    Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
                }
            }
        }) as Box<dyn FnMut()>));
    }

    fn request_frame(&self) -> Result<(), HostError> {
        let id = match self.frame.borrow().as_ref() {
            Some(callback) => self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())?,
            None => return Ok(()),
        };
        self.host.borrow_mut().frame_id = Some(id);
        Ok(())
    }
}

impl Drop for ParticleBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Install the tilt and glare hover effect on every element matching `selector`.
///
/// Listeners live for the rest of the page.
#[wasm_bindgen(js_name = attachTilt)]
pub fn attach_tilt(selector: &str) -> Result<(), JsValue> {
    init_logging();

    let document = window()?.document().ok_or(HostError::NoDocument)?;
    let cards = document.query_selector_all(selector)?;

    for i in 0..cards.length() {
        let Some(card) = cards.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };

        let hovered = card.clone();
        let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
            let rect = hovered.get_bounding_client_rect();
            let tilt = Tilt::from_client(
                Vec2::new(e.client_x() as f32, e.client_y() as f32),
                Vec2::new(rect.left() as f32, rect.top() as f32),
                Vec2::new(rect.width() as f32, rect.height() as f32),
            );
            let style = hovered.style();
            let _ = style.set_property("--mouse-x", &format!("{}px", tilt.glare.x));
            let _ = style.set_property("--mouse-y", &format!("{}px", tilt.glare.y));
            let _ = style.set_property("transform", &tilt.css_transform());
        }) as Box<dyn FnMut(MouseEvent)>);

        let left = card.clone();
        let on_leave = Closure::wrap(Box::new(move || {
            let _ = left.style().set_property("transform", RESTING_TRANSFORM);
        }) as Box<dyn FnMut()>);

        card.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        card.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
        on_move.forget();
        on_leave.forget();
    }

    log::debug!("Tilt attached to {} elements matching '{}'", cards.length(), selector);
    Ok(())
}
