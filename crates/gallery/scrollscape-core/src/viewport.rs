//! Render surface dimensions and the pixel-matched perspective camera.

use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;

#[inline]
pub(crate) fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn add_scaled3(a: [f32; 3], d: [f32; 3], t: f32) -> [f32; 3] {
    [a[0] + d[0] * t, a[1] + d[1] * t, a[2] + d[2] * t]
}

#[inline]
fn normalize3(v: [f32; 3]) -> [f32; 3] {
    let len2 = v[0] * v[0] + v[1] * v[1] + v[2] * v[2];
    if len2 > 0.0 {
        let inv = len2.sqrt().recip();
        [v[0] * inv, v[1] * inv, v[2] * inv]
    } else {
        v
    }
}

/// Size of the render surface in CSS pixels plus the effective pixel ratio.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    /// Viewport with the host's device pixel ratio clamped to `max_pixel_ratio`.
    pub fn with_device_pixel_ratio(width: f32, height: f32, dpr: f32, max_pixel_ratio: f32) -> Self {
        let pixel_ratio = if dpr.is_finite() && dpr > 0.0 {
            dpr.min(max_pixel_ratio)
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// False while the surface has no drawable area, e.g. a collapsed canvas.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Drawing-buffer size in device pixels.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round().max(0.0) as u32,
            (self.height * self.pixel_ratio).round().max(0.0) as u32,
        )
    }

    /// Pointer pixel coordinates (origin top-left) to normalized device
    /// coordinates in [-1, 1], y up.
    pub fn to_ndc(&self, px: f32, py: f32) -> [f32; 2] {
        if self.width <= 0.0 || self.height <= 0.0 {
            return [0.0, 0.0];
        }
        [(px / self.width) * 2.0 - 1.0, -(py / self.height) * 2.0 + 1.0]
    }
}

/// A ray in world space. `direction` is unit length.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: [f32; 3],
    pub direction: [f32; 3],
}

impl Ray {
    pub fn new(origin: [f32; 3], direction: [f32; 3]) -> Self {
        Self {
            origin,
            direction: normalize3(direction),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> [f32; 3] {
        add_scaled3(self.origin, self.direction, t)
    }
}

/// Perspective camera on the +Z axis looking at the origin. Its vertical field
/// of view is chosen so that one world unit spans one CSS pixel at z = 0.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(viewport: &Viewport, cfg: &GalleryConfig) -> Self {
        let mut cam = Self {
            position: [0.0, 0.0, cfg.camera_distance],
            fov: 0.0,
            aspect: 1.0,
            near: cfg.near,
            far: cfg.far,
        };
        cam.fit(viewport);
        cam
    }

    /// Recompute fov and aspect for a resized viewport.
    pub fn fit(&mut self, viewport: &Viewport) {
        let dist = self.distance();
        self.fov = 2.0 * ((viewport.height / 2.0) / dist).atan().to_degrees();
        self.aspect = viewport.aspect();
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.position[2]
    }

    /// Ray from the camera through a point given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: [f32; 2]) -> Ray {
        let half_h = (self.fov.to_radians() * 0.5).tan();
        let half_w = half_h * self.aspect;
        Ray::new(self.position, [ndc[0] * half_w, ndc[1] * half_h, -1.0])
    }

    /// Column-major projection matrix (OpenGL clip conventions).
    #[rustfmt::skip]
    pub fn projection_matrix(&self) -> [f32; 16] {
        let f = 1.0 / (self.fov.to_radians() * 0.5).tan();
        let nf = 1.0 / (self.near - self.far);
        [
            f / self.aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (self.far + self.near) * nf, -1.0,
            0.0, 0.0, 2.0 * self.far * self.near * nf, 0.0,
        ]
    }

    /// Column-major view matrix (inverse of the camera translation).
    #[rustfmt::skip]
    pub fn view_matrix(&self) -> [f32; 16] {
        let p = self.position;
        [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -p[0], -p[1], -p[2], 1.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "{a} != {b}");
    }

    #[test]
    fn fov_matches_pixels_at_image_plane() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = Camera::new(&vp, &GalleryConfig::default());
        let visible_h = 2.0 * cam.distance() * (cam.fov.to_radians() * 0.5).tan();
        approx(visible_h, 600.0, 1e-2);
        approx(cam.aspect, 800.0 / 600.0, 1e-6);
    }

    #[test]
    fn ndc_corners() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(vp.to_ndc(800.0, 600.0), [1.0, -1.0]);
        assert_eq!(vp.to_ndc(400.0, 300.0), [0.0, 0.0]);
    }

    #[test]
    fn corner_ray_hits_viewport_corner_on_plane() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = Camera::new(&vp, &GalleryConfig::default());
        let ray = cam.ray_from_ndc([1.0, 1.0]);
        let t = -ray.origin[2] / ray.direction[2];
        let hit = ray.at(t);
        approx(hit[0], 400.0, 1e-2);
        approx(hit[1], 300.0, 1e-2);
    }

    #[test]
    fn pixel_ratio_is_clamped() {
        let vp = Viewport::with_device_pixel_ratio(100.0, 50.0, 3.0, 2.0);
        assert_eq!(vp.pixel_ratio, 2.0);
        assert_eq!(vp.drawing_buffer_size(), (200, 100));
        let bad = Viewport::with_device_pixel_ratio(100.0, 50.0, f32::NAN, 2.0);
        assert_eq!(bad.pixel_ratio, 1.0);
    }

    #[test]
    fn projection_maps_near_plane_to_minus_one() {
        let vp = Viewport::new(800.0, 600.0);
        let cam = Camera::new(&vp, &GalleryConfig::default());
        let m = cam.projection_matrix();
        // view-space point on the near plane, on axis
        let z = -cam.near;
        let clip_z = m[10] * z + m[14];
        let clip_w = m[11] * z;
        approx(clip_z / clip_w, -1.0, 1e-3);
    }
}
