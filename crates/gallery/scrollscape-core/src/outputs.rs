//! Output contracts for hosts.
//!
//! A `FrameSnapshot` carries everything a host renderer needs to draw the
//! current frame without reaching into core types: per-object transforms and
//! uniforms plus camera matrices. Adapters (web/Bevy) serialize or apply it.

use serde::{Deserialize, Serialize};

use crate::ids::ObjectId;
use crate::scene::{Scene, Uniforms};
use crate::scroll::ScrollModel;
use crate::viewport::{Camera, Viewport};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectFrame {
    pub id: ObjectId,
    pub source_id: String,
    pub position: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub uniforms: Uniforms,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrollFrame {
    pub raw: f32,
    pub rendered: f32,
    pub speed: f32,
    pub speed_target: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub position: [f32; 3],
    pub fov: f32,
    pub aspect: f32,
    pub projection: [f32; 16],
    pub view: [f32; 16],
}

/// What a renderer needs for one draw: camera matrices and every object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub camera: CameraFrame,
    #[serde(default)]
    pub objects: Vec<ObjectFrame>,
}

impl DrawList {
    pub fn capture(scene: &Scene, camera: &Camera) -> Self {
        Self {
            camera: CameraFrame {
                position: camera.position,
                fov: camera.fov,
                aspect: camera.aspect,
                projection: camera.projection_matrix(),
                view: camera.view_matrix(),
            },
            objects: scene
                .iter()
                .map(|o| ObjectFrame {
                    id: o.id,
                    source_id: o.source.id.clone(),
                    position: o.position,
                    width: o.geometry.width,
                    height: o.geometry.height,
                    uniforms: o.material.uniforms.clone(),
                })
                .collect(),
        }
    }
}

/// Draw list plus frame counter, viewport and scroll state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub viewport: Viewport,
    pub scroll: ScrollFrame,
    #[serde(flatten)]
    pub draw: DrawList,
}

impl FrameSnapshot {
    pub fn capture(
        frame: u64,
        scene: &Scene,
        scroll: &ScrollModel,
        viewport: &Viewport,
        camera: &Camera,
    ) -> Self {
        Self {
            frame,
            viewport: *viewport,
            scroll: ScrollFrame {
                raw: scroll.raw(),
                rendered: scroll.rendered(),
                speed: scroll.speed(),
                speed_target: scroll.speed_target(),
            },
            draw: DrawList::capture(scene, camera),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draw.objects.is_empty()
    }
}
