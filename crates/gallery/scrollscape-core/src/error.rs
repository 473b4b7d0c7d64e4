//! Error types for the gallery core.

use crate::ids::ObjectId;

/// Failures while building or addressing the scene.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SceneError {
    #[error("scene has already been built ({count} objects)")]
    AlreadyBuilt { count: usize },

    #[error("unknown scene object: {0:?}")]
    UnknownObject(ObjectId),
}

/// Failures reported by a host renderer. These are fatal to the render loop.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum RenderError {
    #[error("rendering context lost")]
    ContextLost,

    #[error("viewport unavailable")]
    ViewportUnavailable,

    #[error("draw failed: {0}")]
    Host(String),
}

/// Top-level error for the composition root.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GalleryError {
    #[error("preload gate still waiting on: {pending:?}")]
    PreloadPending { pending: Vec<String> },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl GalleryError {
    /// Fatal errors stop the render loop; the rest are caller mistakes the host may retry.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Render(_))
    }
}
