//! Core configuration for scrollscape-core.

use serde::{Deserialize, Serialize};

use crate::ease::Ease;
use crate::error::GalleryError;

/// Tunables for the camera, scroll smoothing, uniform clocks and geometry.
/// Every field has a default so hosts can pass partial JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Distance of the camera from the image plane (z = 0), in pixels.
    pub camera_distance: f32,
    pub near: f32,
    pub far: f32,
    /// Upper bound applied to the device pixel ratio reported by the host.
    pub max_pixel_ratio: f32,

    /// Fraction of the remaining distance covered by the rendered scroll each frame.
    pub scroll_ease: f32,
    /// Rendered scroll snaps to the raw offset once closer than this.
    pub scroll_snap_epsilon: f32,
    /// Scroll delta (pixels) mapped to a speed of 1.0.
    pub speed_clamp: f32,
    pub speed_smoothing: f32,

    /// Amount added to every object's `time` uniform per rendered frame.
    pub time_step: f32,
    /// Seconds for a hover enter/leave transition.
    pub hover_duration: f32,
    pub hover_ease: Ease,

    /// Subdivisions per side of each image plane.
    pub plane_segments: u32,
    /// Key of the GPU program every material uses.
    pub program: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            camera_distance: 600.0,
            near: 0.001,
            far: 1000.0,
            max_pixel_ratio: 2.0,
            scroll_ease: 0.1,
            scroll_snap_epsilon: 0.01,
            speed_clamp: 200.0,
            speed_smoothing: 0.2,
            time_step: 0.05,
            hover_duration: 1.0,
            hover_ease: Ease::Power1Out,
            plane_segments: 1,
            program: "gallery-hover".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Reject values that would make the camera or the smoothing degenerate.
    pub fn validate(&self) -> Result<(), GalleryError> {
        let invalid = |reason: &str| Err(GalleryError::InvalidConfig(reason.to_string()));

        if !(self.camera_distance.is_finite() && self.camera_distance > 0.0) {
            return invalid("camera_distance must be finite and > 0");
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return invalid("near must be > 0 and far must exceed near");
        }
        if !(self.max_pixel_ratio >= 1.0) {
            return invalid("max_pixel_ratio must be >= 1");
        }
        if !(self.scroll_ease > 0.0 && self.scroll_ease <= 1.0) {
            return invalid("scroll_ease must be in (0, 1]");
        }
        if !(self.scroll_snap_epsilon >= 0.0) {
            return invalid("scroll_snap_epsilon must be >= 0");
        }
        if !(self.speed_clamp > 0.0) {
            return invalid("speed_clamp must be > 0");
        }
        if !(self.speed_smoothing > 0.0 && self.speed_smoothing <= 1.0) {
            return invalid("speed_smoothing must be in (0, 1]");
        }
        if !(self.hover_duration >= 0.0) {
            return invalid("hover_duration must be >= 0");
        }
        if self.plane_segments == 0 {
            return invalid("plane_segments must be >= 1");
        }
        Ok(())
    }
}
