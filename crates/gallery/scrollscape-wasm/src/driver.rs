//! `requestAnimationFrame` driver.
//!
//! Every scheduled callback carries the token it was issued for. The core
//! loop ignores stale tokens, so a stop followed by a restart leaves at most
//! one live chain even if an old callback is still queued.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use scrollscape_core::{FrameToken, Gallery};

use crate::JsRenderer;

/// Used for the first frame of a chain, before there is a previous timestamp.
const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

pub(crate) struct FrameDriver {
    gallery: Rc<RefCell<Gallery>>,
    renderer: RefCell<JsRenderer>,
    last_ts: Cell<Option<f64>>,
}

impl FrameDriver {
    pub(crate) fn new(gallery: Rc<RefCell<Gallery>>, renderer: JsRenderer) -> Rc<Self> {
        Rc::new(Self {
            gallery,
            renderer: RefCell::new(renderer),
            last_ts: Cell::new(None),
        })
    }

    fn delta_seconds(&self, ts: f64) -> f32 {
        match self.last_ts.replace(Some(ts)) {
            Some(prev) => ((ts - prev) / 1000.0).max(0.0) as f32,
            None => FIRST_FRAME_DT,
        }
    }
}

/// Queue one animation frame for `token`. The closure releases itself when it fires.
pub(crate) fn schedule(driver: Rc<FrameDriver>, token: FrameToken) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |ts: f64| {
        holder_for_cb.borrow_mut().take();
        if let Err(msg) = on_frame(&driver, token, ts) {
            wasm_bindgen::throw_str(&msg);
        }
    }) as Box<dyn FnMut(f64)>);

    window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    *holder.borrow_mut() = Some(cb);
    Ok(())
}

fn on_frame(driver: &Rc<FrameDriver>, token: FrameToken, ts: f64) -> Result<(), String> {
    let dt = driver.delta_seconds(ts);
    let result = {
        let Ok(mut gallery) = driver.gallery.try_borrow_mut() else {
            // Host code holds the gallery; retry on the next frame with the same token.
            log::warn!("gallery busy at frame {}; deferring", token.frame);
            return schedule(Rc::clone(driver), token).map_err(|e| crate::describe_js(&e));
        };
        let mut renderer = driver.renderer.borrow_mut();
        gallery.tick(token, dt, &mut *renderer)
    };
    match result {
        Ok(Some(next)) => schedule(Rc::clone(driver), next)
            .map_err(|e| format!("requestAnimationFrame: {}", crate::describe_js(&e))),
        Ok(None) => {
            log::debug!(
                "frame chain {} ended at frame {}",
                token.generation,
                token.frame
            );
            Ok(())
        }
        Err(e) => Err(format!("render loop stopped: {e}")),
    }
}
