//! Browser side of the adapter: measuring gallery images and feeding window
//! events into the gallery.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlImageElement, MouseEvent, Window};

use scrollscape_core::{Bounds, Gallery, ImageStatus, SourceElement};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

/// Measure every `<img>` matching `selector`, in document coordinates.
/// Images that are not complete or have no natural size are reported as failed.
pub(crate) fn measure_images(selector: &str) -> Result<Vec<SourceElement>, JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let scroll_x = window.scroll_x()? as f32;
    let scroll_y = window.scroll_y()? as f32;

    let nodes = document.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else {
            continue;
        };
        let Ok(img) = node.dyn_into::<HtmlImageElement>() else {
            log::warn!("'{selector}' matched a non-image element at index {i}; skipped");
            continue;
        };

        let rect = img.get_bounding_client_rect();
        let id = match img.id() {
            s if s.is_empty() => format!("img-{i}"),
            s => s,
        };
        let src = match img.current_src() {
            s if s.is_empty() => img.src(),
            s => s,
        };
        let image = if img.complete() && img.natural_width() > 0 {
            ImageStatus::Decoded {
                natural_width: img.natural_width(),
                natural_height: img.natural_height(),
            }
        } else {
            ImageStatus::Failed
        };

        out.push(SourceElement {
            id,
            src,
            bounds: Bounds::new(
                rect.top() as f32 + scroll_y,
                rect.left() as f32 + scroll_x,
                rect.width() as f32,
                rect.height() as f32,
            ),
            image,
        });
    }
    log::debug!("measured {} images for '{selector}'", out.len());
    Ok(out)
}

/// An attached DOM listener. Dropping it detaches the callback.
pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        f: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

fn with_gallery(gallery: &Rc<RefCell<Gallery>>, event: &str, f: impl FnOnce(&mut Gallery)) {
    match gallery.try_borrow_mut() {
        Ok(mut g) => f(&mut g),
        Err(_) => log::warn!("gallery busy; dropped {event} event"),
    }
}

fn viewport_size(window: &Window) -> Option<(f32, f32, f32)> {
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some((w as f32, h as f32, window.device_pixel_ratio() as f32))
}

/// Attach scroll, mousemove, mouseleave and resize listeners, then jump to the
/// current scroll offset and push the viewport size once.
pub(crate) fn bind_window(gallery: &Rc<RefCell<Gallery>>) -> Result<Vec<Listener>, JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let root: EventTarget = match document.document_element() {
        Some(el) => el.into(),
        None => document.into(),
    };

    let mut listeners = Vec::with_capacity(4);

    let g = Rc::clone(gallery);
    let w = window.clone();
    listeners.push(Listener::attach(window.clone().into(), "scroll", move |_| {
        if let Ok(y) = w.scroll_y() {
            with_gallery(&g, "scroll", |g| g.record_scroll(y as f32));
        }
    })?);

    let g = Rc::clone(gallery);
    listeners.push(Listener::attach(
        window.clone().into(),
        "mousemove",
        move |ev: Event| {
            if let Some(m) = ev.dyn_ref::<MouseEvent>() {
                let (x, y) = (m.client_x() as f32, m.client_y() as f32);
                with_gallery(&g, "mousemove", |g| {
                    g.pointer_move(x, y);
                });
            }
        },
    )?);

    let g = Rc::clone(gallery);
    listeners.push(Listener::attach(root, "mouseleave", move |_| {
        with_gallery(&g, "mouseleave", |g| {
            g.pointer_leave();
        });
    })?);

    let g = Rc::clone(gallery);
    let w = window.clone();
    listeners.push(Listener::attach(window.clone().into(), "resize", move |_| {
        if let Some((width, height, dpr)) = viewport_size(&w) {
            with_gallery(&g, "resize", |g| g.resize(width, height, dpr));
        }
    })?);

    let scroll = window.scroll_y().unwrap_or(0.0) as f32;
    let size = viewport_size(&window);
    // images were measured in document coordinates; start on the page's current offset
    with_gallery(gallery, "bind", |g| {
        g.jump_scroll(scroll);
        if let Some((width, height, dpr)) = size {
            g.resize(width, height, dpr);
        }
    });

    Ok(listeners)
}
