//! Scrollscape Core (engine-agnostic)
//!
//! Keeps a 3D scene of image planes in sync with native document scroll:
//! eased scroll, DOM-bounds → world layout, ray-cast hover picking and a
//! cancellable per-frame loop. Hosts (web/Bevy) supply the draw call.

pub mod config;
pub mod ease;
pub mod error;
pub mod gallery;
pub mod ids;
pub mod layout;
pub mod outputs;
pub mod picking;
pub mod preload;
pub mod render_loop;
pub mod scene;
pub mod scroll;
pub mod tween;
pub mod viewport;

// Re-exports for consumers (adapters)
pub use config::GalleryConfig;
pub use ease::Ease;
pub use error::{GalleryError, RenderError, SceneError};
pub use gallery::Gallery;
pub use ids::{FrameToken, ObjectId};
pub use layout::{project, world_xy};
pub use outputs::{DrawList, FrameSnapshot, ObjectFrame};
pub use picking::{pick, Hit, HoverEvent, PickOutcome, PointerPicker};
pub use preload::{GateStatus, PreloadGate};
pub use render_loop::{FrameContext, LoopState, RenderLoop, Renderer};
pub use scene::{
    Bounds, BuildReport, ImageStatus, Material, MaterialTemplate, PlaneGeometry, Scene,
    SceneObject, SourceElement, TextureBinding, Uniforms,
};
pub use scroll::{ScrollModel, ScrollSettings};
pub use tween::Tween;
pub use viewport::{Camera, Ray, Viewport};

/// Parse a JSON array of source elements as produced by a host measuring pass.
pub fn parse_layout_json(json: &str) -> Result<Vec<SourceElement>, serde_json::Error> {
    serde_json::from_str(json)
}
