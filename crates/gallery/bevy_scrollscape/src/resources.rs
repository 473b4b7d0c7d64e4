use bevy::prelude::*;
use scrollscape_core::{FrameToken, Gallery, SourceElement};

#[derive(Resource)]
pub struct ScrollscapeGallery(pub Gallery);

/// Measured layout waiting for the preload gate. Consumed once by the build system.
#[derive(Resource, Default)]
pub struct PendingLayout(pub Option<Vec<SourceElement>>);

/// The single frame token the next Update may run. `None` means no frame is scheduled.
#[derive(Resource, Default)]
pub struct FrameChain {
    pub next: Option<FrameToken>,
}

/// Scroll offset synthesized from mouse wheel input (there is no document to scroll).
#[derive(Resource, Debug, Clone)]
pub struct WheelScroll {
    pub offset: f32,
    /// Pixels per wheel line for `MouseScrollUnit::Line` events.
    pub line_height: f32,
    /// Upper bound for the offset, usually document height minus viewport height.
    pub max: Option<f32>,
}

impl Default for WheelScroll {
    fn default() -> Self {
        Self {
            offset: 0.0,
            line_height: 40.0,
            max: None,
        }
    }
}

impl WheelScroll {
    pub fn scroll_by(&mut self, delta: f32) {
        let mut next = (self.offset + delta).max(0.0);
        if let Some(max) = self.max {
            next = next.min(max.max(0.0));
        }
        self.offset = next;
    }
}
