use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use scrollscape_core::{
    parse_layout_json, Camera, DrawList, FrameToken, Gallery, GalleryConfig, GalleryError,
    RenderError, Renderer, Scene, SourceElement,
};

mod dom;
mod driver;

use dom::Listener;

#[wasm_bindgen]
pub struct ScrollscapeGallery {
    core: Rc<RefCell<Gallery>>,
    listeners: Vec<Listener>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Best-effort message for a thrown JS value.
pub(crate) fn describe_js(v: &JsValue) -> String {
    if let Some(err) = v.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    v.as_string().unwrap_or_else(|| format!("{v:?}"))
}

fn gallery_error(context: &str, e: GalleryError) -> JsError {
    JsError::new(&format!("{context}: {e}"))
}

/// Renderer backed by a JS `draw(list)` callback.
///
/// The callback receives a `DrawList` (camera matrices plus per-object position
/// and uniforms). Returning `false` reports a lost context; throwing is reported
/// as a host error. Either stops the loop.
pub(crate) struct JsRenderer {
    f: Function,
}

impl JsRenderer {
    pub(crate) fn new(f: Function) -> Self {
        Self { f }
    }
}

impl Renderer for JsRenderer {
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        let list = DrawList::capture(scene, camera);
        let arg = swb::to_value(&list)
            .map_err(|e| RenderError::Host(format!("draw list encode: {e}")))?;
        match self.f.call1(&JsValue::UNDEFINED, &arg) {
            Ok(v) if v.as_bool() == Some(false) => Err(RenderError::ContextLost),
            Ok(_) => Ok(()),
            Err(e) => Err(RenderError::Host(describe_js(&e))),
        }
    }
}

impl ScrollscapeGallery {
    fn with_core<T>(&self, f: impl FnOnce(&mut Gallery) -> T) -> Result<T, JsError> {
        // A draw callback calling back into the gallery would land here mid-frame.
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| JsError::new("gallery is busy drawing a frame"))?;
        Ok(f(&mut core))
    }

    fn build(&mut self, elements: Vec<SourceElement>) -> Result<JsValue, JsError> {
        let report = self
            .with_core(|g| g.build_scene(elements))?
            .map_err(|e| gallery_error("build_scene", e))?;
        swb::to_value(&report).map_err(|e| JsError::new(&format!("build report error: {e}")))
    }
}

#[wasm_bindgen]
impl ScrollscapeGallery {
    /// Create a gallery for a `width × height` viewport. Pass a JSON config
    /// object or undefined/null for defaults.
    /// Example:
    ///   new ScrollscapeGallery({ scroll_ease: 0.08 }, innerWidth, innerHeight)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, width: f32, height: f32) -> Result<ScrollscapeGallery, JsError> {
        console_error_panic_hook::set_once();

        let cfg: GalleryConfig = if jsvalue_is_undefined_or_null(&config) {
            GalleryConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        let core = Gallery::new(cfg, width, height).map_err(|e| gallery_error("config", e))?;

        Ok(ScrollscapeGallery {
            core: Rc::new(RefCell::new(core)),
            listeners: Vec::new(),
        })
    }

    /// Report one preload signal, e.g. `"font:Open Sans"` or `"images"`.
    /// Returns the gate status (`"opened"`, `{ waiting: { remaining } }`, ...).
    #[wasm_bindgen]
    pub fn signal_ready(&mut self, name: String) -> Result<JsValue, JsError> {
        let status = self.with_core(|g| g.signal_ready(&name))?;
        swb::to_value(&status).map_err(|e| JsError::new(&format!("gate status error: {e}")))
    }

    #[wasm_bindgen]
    pub fn is_ready(&self) -> Result<bool, JsError> {
        self.with_core(|g| g.is_ready())
    }

    /// Build the scene from an array of measured source elements.
    /// Returns the build report (object count, placeholder and degenerate ids).
    #[wasm_bindgen]
    pub fn build_scene(&mut self, layout: JsValue) -> Result<JsValue, JsError> {
        if jsvalue_is_undefined_or_null(&layout) {
            return Err(JsError::new("build_scene: layout is null/undefined"));
        }
        // Stringify so the core parser handles both plain objects and JSON-compatible classes
        let s = JSON::stringify(&layout)
            .map_err(|e| {
                JsError::new(&format!(
                    "build_scene stringify error: {}",
                    describe_js(&e)
                ))
            })?
            .as_string()
            .ok_or_else(|| JsError::new("build_scene: stringify produced non-string"))?;
        self.build_scene_json(s)
    }

    /// Same as `build_scene` but takes the layout as a JSON string.
    #[wasm_bindgen]
    pub fn build_scene_json(&mut self, json: String) -> Result<JsValue, JsError> {
        let elements = parse_layout_json(&json)
            .map_err(|e| JsError::new(&format!("layout parse error: {e}")))?;
        self.build(elements)
    }

    /// Measure every `<img>` matching `selector` in the current document and
    /// build the scene from them.
    #[wasm_bindgen]
    pub fn build_scene_from_document(&mut self, selector: String) -> Result<JsValue, JsError> {
        let elements = dom::measure_images(&selector)
            .map_err(|e| JsError::new(&format!("measure images: {}", describe_js(&e))))?;
        self.build(elements)
    }

    #[wasm_bindgen]
    pub fn record_scroll(&mut self, offset: f32) -> Result<(), JsError> {
        self.with_core(|g| g.record_scroll(offset))
    }

    /// Set raw and rendered scroll together, skipping the ease. Use it before
    /// the first frame when the page opens already scrolled.
    #[wasm_bindgen]
    pub fn jump_scroll(&mut self, offset: f32) -> Result<(), JsError> {
        self.with_core(|g| g.jump_scroll(offset))
    }

    #[wasm_bindgen]
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    ) -> Result<(), JsError> {
        self.with_core(|g| g.resize(width, height, device_pixel_ratio))
    }

    /// Pointer moved to client pixel `(x, y)`. Returns `{ hit, events }`.
    #[wasm_bindgen]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        let out = self.with_core(|g| g.pointer_move(x, y))?;
        swb::to_value(&out).map_err(|e| JsError::new(&format!("pick outcome error: {e}")))
    }

    #[wasm_bindgen]
    pub fn pointer_leave(&mut self) -> Result<JsValue, JsError> {
        let out = self.with_core(|g| g.pointer_leave())?;
        swb::to_value(&out).map_err(|e| JsError::new(&format!("pick outcome error: {e}")))
    }

    /// Start the loop for a host that schedules frames itself.
    /// Returns the first frame token, or null when already running.
    #[wasm_bindgen]
    pub fn start(&mut self) -> Result<JsValue, JsError> {
        match self.with_core(|g| g.start())? {
            Some(tok) => {
                swb::to_value(&tok).map_err(|e| JsError::new(&format!("token error: {e}")))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Stop the loop. Any frame already scheduled becomes a no-op.
    #[wasm_bindgen]
    pub fn stop(&mut self) -> Result<(), JsError> {
        self.with_core(|g| g.stop())
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> Result<bool, JsError> {
        self.with_core(|g| g.is_running())
    }

    /// Run one frame for `token` and draw through `draw(list)`.
    /// Returns the next token, or null when the token was stale or the loop stopped.
    #[wasm_bindgen]
    pub fn tick(&mut self, token: JsValue, dt: f32, draw: Function) -> Result<JsValue, JsError> {
        let token: FrameToken =
            swb::from_value(token).map_err(|e| JsError::new(&format!("token error: {e}")))?;
        let mut renderer = JsRenderer::new(draw);
        let next = self
            .with_core(|g| g.tick(token, dt, &mut renderer))?
            .map_err(|e| gallery_error("tick", e))?;
        match next {
            Some(tok) => {
                swb::to_value(&tok).map_err(|e| JsError::new(&format!("token error: {e}")))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// Start the loop on `requestAnimationFrame`, drawing through `draw(list)`.
    /// Returns false when the loop was already running.
    #[wasm_bindgen]
    pub fn run(&mut self, draw: Function) -> Result<bool, JsError> {
        let Some(token) = self.with_core(|g| g.start())? else {
            return Ok(false);
        };
        let frames = driver::FrameDriver::new(Rc::clone(&self.core), JsRenderer::new(draw));
        driver::schedule(frames, token)
            .map_err(|e| JsError::new(&format!("requestAnimationFrame: {}", describe_js(&e))))?;
        Ok(true)
    }

    /// Feed window scroll, mouse and resize events into the gallery.
    /// Calling it again replaces the previous bindings.
    #[wasm_bindgen]
    pub fn bind_window(&mut self) -> Result<(), JsError> {
        self.listeners.clear();
        self.listeners = dom::bind_window(&self.core)
            .map_err(|e| JsError::new(&format!("bind_window: {}", describe_js(&e))))?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn unbind_window(&mut self) {
        self.listeners.clear();
    }

    /// Current frame snapshot (camera, scroll, objects).
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsError> {
        let snap = self.with_core(|g| g.snapshot())?;
        swb::to_value(&snap).map_err(|e| JsError::new(&format!("snapshot error: {e}")))
    }
}

/// Install the console logger at `level` ("error" .. "trace", default "info").
#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    let level = match level.as_deref() {
        None => log::Level::Info,
        Some(s) => s
            .parse::<log::Level>()
            .map_err(|_| JsError::new(&format!("unknown log level '{s}'")))?,
    };
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
    Ok(())
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
