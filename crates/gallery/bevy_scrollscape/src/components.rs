use bevy::prelude::*;
use scrollscape_core::{ObjectId, Uniforms};

/// Entity mirroring one scene object. Its Transform follows the object's
/// world position every frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GalleryTile {
    pub id: ObjectId,
}

/// Latest shader inputs for a tile, for custom materials to read.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TileUniforms(pub Uniforms);

/// Marker for the camera entity the gallery camera drives (translation and perspective).
#[derive(Component)]
pub struct GalleryCamera;
