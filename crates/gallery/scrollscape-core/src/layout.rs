//! DOM bounds + rendered scroll → world-space mesh translation.
//!
//! World origin is the viewport center with y up; one unit is one CSS pixel.
//! Horizontal layout is assumed scroll-invariant.

use crate::scene::{Bounds, Scene};
use crate::viewport::Viewport;

/// World-space (x, y) center for an element at the given rendered scroll.
#[inline]
pub fn world_xy(bounds: &Bounds, rendered_scroll: f32, viewport: &Viewport) -> [f32; 2] {
    let x = bounds.left - viewport.width / 2.0 + bounds.width / 2.0;
    let y = rendered_scroll - bounds.top + viewport.height / 2.0 - bounds.height / 2.0;
    [x, y]
}

/// Rewrite every object's x/y from its source bounds. Pure in its inputs:
/// nothing carries over from the previous call. z is left as is.
pub fn project(scene: &mut Scene, rendered_scroll: f32, viewport: &Viewport) {
    for obj in scene.iter_mut() {
        let [x, y] = world_xy(&obj.source.bounds, rendered_scroll, viewport);
        obj.position[0] = x;
        obj.position[1] = y;
    }
}
