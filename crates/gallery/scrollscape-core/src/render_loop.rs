//! Per-frame driver with an explicit run flag.
//!
//! The host owns the actual scheduler (requestAnimationFrame, a Bevy schedule,
//! a test loop). `start()` hands out a `FrameToken`; the host schedules one
//! callback for it and passes it back to `tick()`, which returns the token for
//! the next frame. Only the single outstanding token is honored, so stopping
//! invalidates in-flight callbacks and restarting never duplicates the chain.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;
use crate::ids::FrameToken;
use crate::layout;
use crate::scene::Scene;
use crate::scroll::ScrollModel;
use crate::viewport::{Camera, Viewport};

/// Draw seam implemented by the host.
pub trait Renderer {
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;
}

impl<F> Renderer for F
where
    F: FnMut(&Scene, &Camera) -> Result<(), RenderError>,
{
    fn draw(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError> {
        self(scene, camera)
    }
}

/// Everything one frame reads or writes.
pub struct FrameContext<'a> {
    pub scroll: &'a mut ScrollModel,
    pub scene: &'a mut Scene,
    pub viewport: &'a Viewport,
    pub camera: &'a Camera,
    pub time_step: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Stopped,
    Running,
}

#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    generation: u64,
    pending: Option<FrameToken>,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            generation: 0,
            pending: None,
            frames: 0,
        }
    }

    /// Begin a frame chain. Returns the token to schedule, or `None` when a
    /// chain is already running.
    pub fn start(&mut self) -> Option<FrameToken> {
        if self.state == LoopState::Running {
            return None;
        }
        self.state = LoopState::Running;
        self.generation = self.generation.wrapping_add(1);
        let token = FrameToken {
            generation: self.generation,
            frame: self.frames,
        };
        self.pending = Some(token);
        log::debug!("render loop started (generation {})", self.generation);
        Some(token)
    }

    /// Halt scheduling. Any token already handed out becomes stale.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::debug!("render loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
        self.pending = None;
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames drawn so far across all runs.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame for `token`: advance scroll, project layout, advance
    /// uniforms by `dt` seconds, draw. Stale tokens do nothing. A draw
    /// failure or a zero-area viewport stops the loop and is returned to
    /// the host.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        token: FrameToken,
        dt: f32,
        ctx: FrameContext<'_>,
        renderer: &mut R,
    ) -> Result<Option<FrameToken>, RenderError> {
        if self.pending != Some(token) {
            return Ok(None);
        }
        if !ctx.viewport.is_available() {
            log::error!(
                "viewport {}x{} has no drawable area, stopping render loop",
                ctx.viewport.width,
                ctx.viewport.height
            );
            self.stop();
            return Err(RenderError::ViewportUnavailable);
        }

        let rendered = ctx.scroll.advance();
        layout::project(ctx.scene, rendered, ctx.viewport);
        for obj in ctx.scene.iter_mut() {
            obj.advance_uniforms(ctx.time_step, dt);
        }

        if let Err(err) = renderer.draw(ctx.scene, ctx.camera) {
            log::error!("draw failed, stopping render loop: {err}");
            self.stop();
            return Err(err);
        }

        self.frames = self.frames.wrapping_add(1);
        let next = FrameToken {
            generation: self.generation,
            frame: self.frames,
        };
        self.pending = Some(next);
        Ok(Some(next))
    }
}
