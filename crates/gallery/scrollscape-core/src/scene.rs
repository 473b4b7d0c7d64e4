//! Scene objects and the registry that builds them from source images.
//!
//! The registry is the only place scene objects are created. It is built once,
//! after the preload gate opens, and traversal order is insertion order.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::ids::{IdAllocator, ObjectId};
use crate::tween::Tween;

/// Bounding box of a DOM image in viewport pixels, measured once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Decode outcome for a source image, reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageStatus {
    Decoded {
        natural_width: u32,
        natural_height: u32,
    },
    Failed,
}

/// One DOM image captured before scrolling starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceElement {
    pub id: String,
    pub src: String,
    pub bounds: Bounds,
    pub image: ImageStatus,
}

/// Texture bound to a material's image sampler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureBinding {
    Image {
        src: String,
        width: u32,
        height: u32,
    },
    /// The image failed to decode; the host draws whatever it uses for a missing texture.
    Placeholder { src: String },
}

impl TextureBinding {
    fn for_element(el: &SourceElement) -> Self {
        match el.image {
            ImageStatus::Decoded {
                natural_width,
                natural_height,
            } => TextureBinding::Image {
                src: el.src.clone(),
                width: natural_width,
                height: natural_height,
            },
            ImageStatus::Failed => TextureBinding::Placeholder {
                src: el.src.clone(),
            },
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TextureBinding::Placeholder { .. })
    }
}

/// Per-object shader inputs. Field names on the wire match the GPU program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Uniforms {
    pub time: f32,
    #[serde(rename = "hoverState")]
    pub hover_state: f32,
    /// Focal point of the hover effect in UV space.
    pub hover: [f32; 2],
    #[serde(rename = "uImage")]
    pub texture: Option<TextureBinding>,
}

impl Uniforms {
    /// Uniform names the GPU program must declare.
    pub const NAMES: [&'static str; 4] = ["time", "hoverState", "hover", "uImage"];
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            hover_state: 0.0,
            hover: [0.5, 0.5],
            texture: None,
        }
    }
}

/// Shared prototype every object's material is cloned from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialTemplate {
    pub program: String,
    pub double_sided: bool,
    pub wireframe: bool,
    pub transparent: bool,
    pub uniforms: Uniforms,
}

impl MaterialTemplate {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            double_sided: true,
            wireframe: false,
            transparent: true,
            uniforms: Uniforms::default(),
        }
    }
}

/// A private material instance; writes never leak to other objects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub program: String,
    pub double_sided: bool,
    pub wireframe: bool,
    pub transparent: bool,
    pub uniforms: Uniforms,
}

impl Material {
    fn instantiate(template: &MaterialTemplate, texture: TextureBinding) -> Self {
        let mut uniforms = template.uniforms.clone();
        uniforms.texture = Some(texture);
        Self {
            program: template.program.clone(),
            double_sided: template.double_sided,
            wireframe: template.wireframe,
            transparent: template.transparent,
            uniforms,
        }
    }
}

/// Indexed plane in the XY plane, centered at the origin, facing +Z.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaneGeometry {
    pub width: f32,
    pub height: f32,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    pub fn new(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let gx = width_segments.max(1);
        let gy = height_segments.max(1);
        let seg_w = width / gx as f32;
        let seg_h = height / gy as f32;
        let half_w = width * 0.5;
        let half_h = height * 0.5;

        let mut positions = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);
        let mut uvs = Vec::with_capacity(positions.capacity());
        for iy in 0..=gy {
            let y = iy as f32 * seg_h - half_h;
            for ix in 0..=gx {
                let x = ix as f32 * seg_w - half_w;
                positions.push([x, -y, 0.0]);
                uvs.push([ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32]);
            }
        }

        let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
        for iy in 0..gy {
            for ix in 0..gx {
                let a = ix + (gx + 1) * iy;
                let b = ix + (gx + 1) * (iy + 1);
                let c = (ix + 1) + (gx + 1) * (iy + 1);
                let d = (ix + 1) + (gx + 1) * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            width,
            height,
            positions,
            uvs,
            indices,
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A drawable mesh + material pair standing in for one source image.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub id: ObjectId,
    pub source: SourceElement,
    pub geometry: PlaneGeometry,
    pub material: Material,
    /// World-space translation, rewritten every frame by the layout pass.
    pub position: [f32; 3],
    pub(crate) hover_tween: Tween,
    pub(crate) pointer_inside: bool,
}

impl SceneObject {
    #[inline]
    pub fn hover_state(&self) -> f32 {
        self.material.uniforms.hover_state
    }

    /// Value the hover transition is currently heading to (0 or 1).
    #[inline]
    pub fn hover_target(&self) -> f32 {
        self.hover_tween.target()
    }

    #[inline]
    pub fn is_pointer_inside(&self) -> bool {
        self.pointer_inside
    }

    /// Step the per-object clocks: `time` by a fixed increment, hover by `dt` seconds.
    pub(crate) fn advance_uniforms(&mut self, time_step: f32, dt: f32) {
        let u = &mut self.material.uniforms;
        u.time += time_step;
        u.hover_state = self.hover_tween.advance(dt);
    }
}

/// Summary of a registry build.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub objects: usize,
    /// Ids of sources bound to a placeholder texture.
    pub placeholders: Vec<String>,
    /// Ids of sources with zero or negative size.
    pub degenerate: Vec<String>,
}

/// Registry of scene objects in traversal order.
#[derive(Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    ids: IdAllocator,
    plane_segments: u32,
    built: bool,
}

impl Scene {
    pub fn new(plane_segments: u32) -> Self {
        Self {
            objects: Vec::new(),
            ids: IdAllocator::new(),
            plane_segments: plane_segments.max(1),
            built: false,
        }
    }

    /// Create one object per source element. Allowed exactly once.
    /// Decode failures and degenerate bounds are tolerated per object.
    pub fn build(
        &mut self,
        elements: Vec<SourceElement>,
        template: &MaterialTemplate,
    ) -> Result<BuildReport, SceneError> {
        if self.built {
            return Err(SceneError::AlreadyBuilt {
                count: self.objects.len(),
            });
        }

        let mut report = BuildReport::default();
        self.objects.reserve(elements.len());
        for el in elements {
            if el.bounds.is_degenerate() {
                log::warn!(
                    "source '{}' has degenerate bounds {:?}; was it measured before preload?",
                    el.id,
                    el.bounds
                );
                report.degenerate.push(el.id.clone());
            }
            let texture = TextureBinding::for_element(&el);
            if texture.is_placeholder() {
                log::warn!("image '{}' ({}) failed to decode; using placeholder", el.id, el.src);
                report.placeholders.push(el.id.clone());
            }

            let geometry = PlaneGeometry::new(
                el.bounds.width.max(0.0),
                el.bounds.height.max(0.0),
                self.plane_segments,
                self.plane_segments,
            );
            let material = Material::instantiate(template, texture);
            let hover_tween = Tween::settled(material.uniforms.hover_state);

            self.objects.push(SceneObject {
                id: self.ids.alloc_object(),
                source: el,
                geometry,
                material,
                position: [0.0, 0.0, 0.0],
                hover_tween,
                pointer_inside: false,
            });
        }

        self.built = true;
        report.objects = self.objects.len();
        log::debug!(
            "scene built: {} objects, {} placeholders",
            report.objects,
            report.placeholders.len()
        );
        Ok(report)
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.built
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0 as usize).filter(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0 as usize).filter(|o| o.id == id)
    }

    /// Look up an object by its source element id.
    pub fn find_by_source(&self, source_id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.source.id == source_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    /// Place an object at a fixed depth. Layout never touches z.
    pub fn set_depth(&mut self, id: ObjectId, z: f32) -> Result<(), SceneError> {
        let obj = self.get_mut(id).ok_or(SceneError::UnknownObject(id))?;
        obj.position[2] = z;
        Ok(())
    }
}
