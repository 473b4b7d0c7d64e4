//! Easing curves and scalar interpolation helpers.
//!
//! Named curves follow the usual "powerN" family; `CubicBezier` takes CSS-style
//! control points (x1, y1, x2, y2) and is inverted numerically.

use serde::{Deserialize, Serialize};

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
    Power2Out,
    CubicBezier([f32; 4]),
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power1Out
    }
}

impl Ease {
    /// Map normalized progress `t` (clamped to [0,1]) through the curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Ease::Power2Out => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Ease::CubicBezier([x1, y1, x2, y2]) => bezier_ease_t(t, x1, y1, x2, y2),
        }
    }
}

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
fn bezier_ease_t(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x1 == 0.0 && y1 == 0.0 && x2 == 1.0 && y2 == 1.0 {
        return t;
    }
    // Monotonic X in [0,1] assumed for x1/x2 in [0,1]
    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    let mut mid = t;
    for _ in 0..24 {
        let x = cubic_bezier(0.0, x1, x2, 1.0, mid);
        if (x - t).abs() < 1e-6 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(0.0, y1, y2, 1.0, mid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::Power1In,
            Ease::Power1Out,
            Ease::Power1InOut,
            Ease::Power2Out,
            Ease::CubicBezier([0.25, 0.1, 0.25, 1.0]),
        ] {
            assert!(ease.apply(0.0).abs() < 1e-4, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-4, "{ease:?} at 1");
        }
    }

    #[test]
    fn out_curves_lead_linear() {
        assert!(Ease::Power1Out.apply(0.5) > 0.5);
        assert!(Ease::Power1In.apply(0.5) < 0.5);
        assert!((Ease::Power1InOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn linear_bezier_is_identity() {
        let e = Ease::CubicBezier([0.0, 0.0, 1.0, 1.0]);
        assert_eq!(e.apply(0.3), 0.3);
    }

    #[test]
    fn clamps_progress() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::Linear.apply(2.0), 1.0);
    }
}
