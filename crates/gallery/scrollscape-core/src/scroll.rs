//! Raw vs. rendered scroll offsets.
//!
//! `raw` is whatever the host last reported; `rendered` is what layout consumes
//! and only moves inside `advance()`, once per frame, toward `raw`.

use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;
use crate::ease::lerp_f32;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollSettings {
    pub ease: f32,
    pub snap_epsilon: f32,
    pub speed_clamp: f32,
    pub speed_smoothing: f32,
}

impl From<&GalleryConfig> for ScrollSettings {
    fn from(cfg: &GalleryConfig) -> Self {
        Self {
            ease: cfg.scroll_ease,
            snap_epsilon: cfg.scroll_snap_epsilon,
            speed_clamp: cfg.speed_clamp,
            speed_smoothing: cfg.speed_smoothing,
        }
    }
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScrollModel {
    settings: ScrollSettings,
    raw: f32,
    rendered: f32,
    speed: f32,
    speed_target: f32,
}

impl ScrollModel {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Store the latest native vertical offset. Cheap; call from every scroll event.
    pub fn record_native_scroll(&mut self, offset: f32) {
        if !offset.is_finite() {
            log::warn!("ignoring non-finite scroll offset {offset}");
            return;
        }
        self.raw = offset;
    }

    /// Move `rendered` one step toward `raw` and return it. Call once per frame.
    pub fn advance(&mut self) -> f32 {
        let s = &self.settings;
        let delta = (self.raw - self.rendered).abs();
        self.speed = delta.min(s.speed_clamp) / s.speed_clamp;
        self.speed_target += (self.speed - self.speed_target) * s.speed_smoothing;

        self.rendered = lerp_f32(self.rendered, self.raw, s.ease);
        if (self.raw - self.rendered).abs() <= s.snap_epsilon {
            self.rendered = self.raw;
        }
        self.rendered
    }

    /// Set both offsets at once, e.g. when the host restores a scroll position
    /// before the first frame. Skips smoothing entirely.
    pub fn jump_to(&mut self, offset: f32) {
        if !offset.is_finite() {
            log::warn!("ignoring non-finite scroll jump {offset}");
            return;
        }
        self.raw = offset;
        self.rendered = offset;
        self.speed = 0.0;
        self.speed_target = 0.0;
    }

    #[inline]
    pub fn raw(&self) -> f32 {
        self.raw
    }

    #[inline]
    pub fn rendered(&self) -> f32 {
        self.rendered
    }

    /// Normalized scroll velocity in [0,1] for this frame.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Smoothed `speed`, suitable for driving a shader.
    #[inline]
    pub fn speed_target(&self) -> f32 {
        self.speed_target
    }

    #[inline]
    pub fn settings(&self) -> &ScrollSettings {
        &self.settings
    }
}
