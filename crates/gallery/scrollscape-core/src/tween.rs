//! Time-based eased transition of a single scalar.
//!
//! A tween captures its start value when created, so retargeting mid-flight
//! starts a fresh transition from wherever the value currently is.

use serde::{Deserialize, Serialize};

use crate::ease::{lerp_f32, Ease};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl Tween {
    /// A tween already resting at `value`.
    pub fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            duration: 0.0,
            elapsed: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn new(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            ease,
        }
    }

    /// Start a new transition toward `to` from the current value.
    pub fn retarget(&mut self, to: f32, duration: f32, ease: Ease) {
        *self = Tween::new(self.value(), to, duration, ease);
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed = (self.elapsed + dt).min(self.duration);
        }
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        lerp_f32(self.from, self.to, self.ease.apply(self.elapsed / self.duration))
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl Default for Tween {
    fn default() -> Self {
        Tween::settled(0.0)
    }
}
