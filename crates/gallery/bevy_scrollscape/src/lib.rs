use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, WindowResized};
use scrollscape_core::{Gallery, GalleryConfig, GalleryError, HoverEvent};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{GalleryCamera, GalleryTile, TileUniforms};
pub use resources::{FrameChain, PendingLayout, ScrollscapeGallery, WheelScroll};

/// A readiness signal for the preload gate, e.g. `"font:Open Sans"` or `"images"`.
#[derive(Event, Debug, Clone)]
pub struct PreloadSignal(pub String);

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryControl {
    Start,
    Stop,
}

/// Hover boundary crossing reported by the picker.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChanged(pub HoverEvent);

/// A build or frame failed. Frame failures leave the loop stopped until a
/// `GalleryControl::Start` arrives.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GalleryFault(pub GalleryError);

/// Set ordering for the gallery systems in `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrollscapeSet {
    /// Preload signals and scene build.
    Setup,
    /// Scroll, resize and pointer input.
    Input,
    /// Loop control and the frame itself.
    Frame,
}

pub struct ScrollscapePlugin {
    pub config: GalleryConfig,
    /// Initial viewport size in logical pixels; window resizes replace it.
    pub width: f32,
    pub height: f32,
}

impl Default for ScrollscapePlugin {
    fn default() -> Self {
        Self {
            config: GalleryConfig::default(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Plugin for ScrollscapePlugin {
    fn build(&self, app: &mut App) {
        let gallery = match Gallery::new(self.config.clone(), self.width, self.height) {
            Ok(g) => g,
            Err(e) => {
                log::error!("invalid gallery config ({e}); using defaults");
                match Gallery::new(GalleryConfig::default(), self.width, self.height) {
                    Ok(g) => g,
                    Err(e) => {
                        log::error!("scrollscape plugin disabled: {e}");
                        return;
                    }
                }
            }
        };

        app.insert_resource(ScrollscapeGallery(gallery))
            .init_resource::<PendingLayout>()
            .init_resource::<FrameChain>()
            .init_resource::<WheelScroll>()
            .add_event::<PreloadSignal>()
            .add_event::<GalleryControl>()
            .add_event::<HoverChanged>()
            .add_event::<GalleryFault>()
            // registered by the input/window plugins in a full app; harmless when present
            .add_event::<MouseWheel>()
            .add_event::<CursorMoved>()
            .add_event::<CursorLeft>()
            .add_event::<WindowResized>()
            .configure_sets(
                Update,
                (
                    ScrollscapeSet::Setup,
                    ScrollscapeSet::Input,
                    ScrollscapeSet::Frame,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (systems::preload_signal_system, systems::build_scene_system)
                    .chain()
                    .in_set(ScrollscapeSet::Setup),
            )
            .add_systems(
                Update,
                systems::window_input_system.in_set(ScrollscapeSet::Input),
            )
            .add_systems(
                Update,
                (systems::loop_control_system, systems::frame_system)
                    .chain()
                    .in_set(ScrollscapeSet::Frame),
            );
    }
}
