use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResized};

use scrollscape_core::{Camera, GateStatus, RenderError, Scene};

use crate::components::{GalleryCamera, GalleryTile, TileUniforms};
use crate::resources::{FrameChain, PendingLayout, ScrollscapeGallery, WheelScroll};
use crate::{GalleryControl, GalleryFault, HoverChanged, PreloadSignal};

/// Forward readiness signals (fonts, images) to the preload gate.
pub fn preload_signal_system(
    mut signals: EventReader<PreloadSignal>,
    mut gallery: ResMut<ScrollscapeGallery>,
) {
    for PreloadSignal(name) in signals.read() {
        if gallery.0.signal_ready(name) == GateStatus::Unknown {
            log::warn!("ignoring unknown preload signal '{name}'");
        }
    }
}

/// Once the gate is open, build the scene from the pending layout, spawn one
/// tile entity per object and start the frame chain. The primary window's
/// current size replaces the plugin's initial size first.
pub fn build_scene_system(
    mut commands: Commands,
    mut gallery: ResMut<ScrollscapeGallery>,
    mut pending: ResMut<PendingLayout>,
    mut chain: ResMut<FrameChain>,
    primary: Query<&Window, With<PrimaryWindow>>,
    mut faults: EventWriter<GalleryFault>,
) {
    if pending.0.is_none() || !gallery.0.is_ready() {
        return;
    }
    let Some(elements) = pending.0.take() else {
        return;
    };

    // no WindowResized is sent for the window's starting size
    if let Ok(window) = primary.get_single() {
        gallery
            .0
            .resize(window.width(), window.height(), window.scale_factor());
    }

    match gallery.0.build_scene(elements) {
        Ok(report) => {
            for obj in gallery.0.scene().iter() {
                commands.spawn((
                    GalleryTile { id: obj.id },
                    TileUniforms(obj.material.uniforms.clone()),
                    Name::new(obj.source.id.clone()),
                    SpatialBundle::from_transform(Transform::from_translation(Vec3::from_array(
                        obj.position,
                    ))),
                ));
            }
            log::info!("spawned {} gallery tiles", report.objects);
            if chain.next.is_none() {
                chain.next = gallery.0.start();
            }
        }
        Err(e) => {
            log::error!("scene build failed: {e}");
            faults.send(GalleryFault(e));
        }
    }
}

/// Window events → scroll, viewport and pointer updates. Resizes are applied
/// before pointer moves so picking uses the new camera.
#[allow(clippy::too_many_arguments)]
pub fn window_input_system(
    mut gallery: ResMut<ScrollscapeGallery>,
    mut wheel_scroll: ResMut<WheelScroll>,
    mut wheel: EventReader<MouseWheel>,
    mut resized: EventReader<WindowResized>,
    mut moved: EventReader<CursorMoved>,
    mut left: EventReader<CursorLeft>,
    windows: Query<&Window>,
    mut hover: EventWriter<HoverChanged>,
) {
    let mut scrolled = false;
    for ev in wheel.read() {
        let px = match ev.unit {
            MouseScrollUnit::Line => ev.y * wheel_scroll.line_height,
            MouseScrollUnit::Pixel => ev.y,
        };
        // wheel down reports negative y and moves the document up
        wheel_scroll.scroll_by(-px);
        scrolled = true;
    }
    if scrolled {
        gallery.0.record_scroll(wheel_scroll.offset);
    }

    for ev in resized.read() {
        let dpr = windows
            .get(ev.window)
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);
        gallery.0.resize(ev.width, ev.height, dpr);
    }

    for ev in moved.read() {
        let out = gallery.0.pointer_move(ev.position.x, ev.position.y);
        hover.send_batch(out.events.into_iter().map(HoverChanged));
    }
    for _ in left.read() {
        let out = gallery.0.pointer_leave();
        hover.send_batch(out.events.into_iter().map(HoverChanged));
    }
}

pub fn loop_control_system(
    mut control: EventReader<GalleryControl>,
    mut gallery: ResMut<ScrollscapeGallery>,
    mut chain: ResMut<FrameChain>,
) {
    for ev in control.read() {
        match ev {
            GalleryControl::Start => {
                if chain.next.is_none() {
                    chain.next = gallery.0.start();
                }
            }
            GalleryControl::Stop => {
                gallery.0.stop();
                chain.next = None;
            }
        }
    }
}

/// Run the pending frame. Drawing here means copying object positions and
/// uniforms onto tile entities and the camera onto the `GalleryCamera`.
pub fn frame_system(
    time: Res<Time>,
    mut gallery: ResMut<ScrollscapeGallery>,
    mut chain: ResMut<FrameChain>,
    mut tiles: Query<
        (&GalleryTile, &mut Transform, Option<&mut TileUniforms>),
        Without<GalleryCamera>,
    >,
    mut cameras: Query<
        (&mut Transform, Option<&mut Projection>),
        (With<GalleryCamera>, Without<GalleryTile>),
    >,
    mut faults: EventWriter<GalleryFault>,
) {
    let Some(token) = chain.next.take() else {
        return;
    };

    let mut draw = |scene: &Scene, camera: &Camera| -> Result<(), RenderError> {
        for (tile, mut tf, uniforms) in tiles.iter_mut() {
            let Some(obj) = scene.get(tile.id) else {
                continue;
            };
            tf.translation = Vec3::from_array(obj.position);
            if let Some(mut u) = uniforms {
                u.0.clone_from(&obj.material.uniforms);
            }
        }
        for (mut tf, projection) in cameras.iter_mut() {
            tf.translation = Vec3::from_array(camera.position);
            if let Some(mut p) = projection {
                *p = Projection::Perspective(PerspectiveProjection {
                    fov: camera.fov.to_radians(),
                    aspect_ratio: camera.aspect,
                    near: camera.near,
                    far: camera.far,
                });
            }
        }
        Ok(())
    };

    match gallery.0.tick(token, time.delta_seconds(), &mut draw) {
        Ok(next) => chain.next = next,
        Err(e) => {
            faults.send(GalleryFault(e));
        }
    }
}
