//! Pointer → camera ray → nearest scene object, plus enter/leave tracking.
//!
//! Each object remembers whether the pointer is inside it. Transitions are only
//! requested on boundary crossings, so a stream of moves inside one object
//! yields a single Enter.

use serde::{Deserialize, Serialize};

use crate::config::GalleryConfig;
use crate::ease::Ease;
use crate::ids::ObjectId;
use crate::scene::Scene;
use crate::viewport::{sub3, Camera, Ray, Viewport};

/// Nearest intersection of a ray with a scene object.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub object: ObjectId,
    pub distance: f32,
    pub point: [f32; 3],
    pub uv: [f32; 2],
}

/// Transition request issued on a boundary crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "object")]
pub enum HoverEvent {
    Enter(ObjectId),
    Leave(ObjectId),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PickOutcome {
    pub hit: Option<Hit>,
    /// Leaves first, then at most one Enter.
    pub events: Vec<HoverEvent>,
}

/// Intersect `ray` with every object's plane and return the closest hit.
/// Ties keep the object that comes first in traversal order.
pub fn pick(ray: &Ray, scene: &Scene) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for obj in scene.iter() {
        let dz = ray.direction[2];
        if dz.abs() < 1e-9 {
            continue;
        }
        let t = (obj.position[2] - ray.origin[2]) / dz;
        if !(t > 0.0) {
            continue;
        }
        if best.map_or(false, |b| t >= b.distance) {
            continue;
        }

        let (w, h) = (obj.geometry.width, obj.geometry.height);
        if !(w > 0.0 && h > 0.0) {
            continue;
        }
        let point = ray.at(t);
        let local = sub3(point, obj.position);
        let (hw, hh) = (w * 0.5, h * 0.5);
        if local[0].abs() > hw || local[1].abs() > hh {
            continue;
        }

        best = Some(Hit {
            object: obj.id,
            distance: t,
            point,
            uv: [(local[0] + hw) / w, (local[1] + hh) / h],
        });
    }
    best
}

/// Hover transition parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoverSettings {
    pub duration: f32,
    pub ease: Ease,
}

impl From<&GalleryConfig> for HoverSettings {
    fn from(cfg: &GalleryConfig) -> Self {
        Self {
            duration: cfg.hover_duration,
            ease: cfg.hover_ease,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointerPicker {
    settings: HoverSettings,
    /// Latest pointer sample in normalized device coordinates.
    pointer: Option<[f32; 2]>,
}

impl PointerPicker {
    pub fn new(settings: HoverSettings) -> Self {
        Self {
            settings,
            pointer: None,
        }
    }

    #[inline]
    pub fn pointer_ndc(&self) -> Option<[f32; 2]> {
        self.pointer
    }

    /// Handle one pointer-move sample given in viewport pixels.
    pub fn on_pointer_move(
        &mut self,
        px: f32,
        py: f32,
        viewport: &Viewport,
        camera: &Camera,
        scene: &mut Scene,
    ) -> PickOutcome {
        let ndc = viewport.to_ndc(px, py);
        self.pointer = Some(ndc);
        let ray = camera.ray_from_ndc(ndc);
        self.apply_hit(pick(&ray, scene), scene)
    }

    /// The pointer left the render surface: release whatever is hovered.
    pub fn on_pointer_leave(&mut self, scene: &mut Scene) -> PickOutcome {
        self.pointer = None;
        self.apply_hit(None, scene)
    }

    fn apply_hit(&self, hit: Option<Hit>, scene: &mut Scene) -> PickOutcome {
        let HoverSettings { duration, ease } = self.settings;
        let hit_id = hit.map(|h| h.object);
        let mut events = Vec::new();

        for obj in scene.iter_mut() {
            if obj.pointer_inside && Some(obj.id) != hit_id {
                obj.pointer_inside = false;
                obj.hover_tween.retarget(0.0, duration, ease);
                events.push(HoverEvent::Leave(obj.id));
            }
        }

        if let Some(h) = hit {
            if let Some(obj) = scene.get_mut(h.object) {
                obj.material.uniforms.hover = h.uv;
                if !obj.pointer_inside {
                    obj.pointer_inside = true;
                    obj.hover_tween.retarget(1.0, duration, ease);
                    events.push(HoverEvent::Enter(h.object));
                }
            }
        }

        for ev in &events {
            log::debug!("hover {ev:?}");
        }
        PickOutcome { hit, events }
    }
}
