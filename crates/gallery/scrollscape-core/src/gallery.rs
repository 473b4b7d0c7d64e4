//! Gallery: the composition root that owns scroll, viewport, scene, picker and
//! loop state and passes them by reference into each component.
//!
//! Host sequence: construct → signal preload readiness → `build_scene` →
//! `resize` on size changes → `record_scroll` / `pointer_move` from events →
//! `start` and feed tokens back through `tick` once per displayed frame.

use crate::config::GalleryConfig;
use crate::error::GalleryError;
use crate::ids::FrameToken;
use crate::layout;
use crate::outputs::FrameSnapshot;
use crate::picking::{HoverSettings, PickOutcome, PointerPicker};
use crate::preload::{GateStatus, PreloadGate};
use crate::render_loop::{FrameContext, RenderLoop, Renderer};
use crate::scene::{BuildReport, MaterialTemplate, Scene, SourceElement};
use crate::scroll::{ScrollModel, ScrollSettings};
use crate::viewport::{Camera, Viewport};

#[derive(Debug)]
pub struct Gallery {
    cfg: GalleryConfig,
    gate: PreloadGate,
    template: MaterialTemplate,
    scroll: ScrollModel,
    viewport: Viewport,
    camera: Camera,
    scene: Scene,
    picker: PointerPicker,
    render_loop: RenderLoop,
}

impl Gallery {
    /// Create a gallery for a `width × height` surface with the default preload gate.
    pub fn new(cfg: GalleryConfig, width: f32, height: f32) -> Result<Self, GalleryError> {
        cfg.validate()?;
        let viewport = Viewport::new(width, height);
        let camera = Camera::new(&viewport, &cfg);
        Ok(Self {
            gate: PreloadGate::default(),
            template: MaterialTemplate::new(cfg.program.clone()),
            scroll: ScrollModel::new(ScrollSettings::from(&cfg)),
            scene: Scene::new(cfg.plane_segments),
            picker: PointerPicker::new(HoverSettings::from(&cfg)),
            render_loop: RenderLoop::new(),
            viewport,
            camera,
            cfg,
        })
    }

    /// Replace the preload gate (e.g. different font families).
    pub fn with_gate(mut self, gate: PreloadGate) -> Self {
        self.gate = gate;
        self
    }

    /// Replace the shared material template objects are cloned from.
    pub fn with_template(mut self, template: MaterialTemplate) -> Self {
        self.template = template;
        self
    }

    /// Forward one readiness signal to the preload gate.
    pub fn signal_ready(&mut self, name: &str) -> GateStatus {
        self.gate.signal(name)
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.gate.is_open()
    }

    /// Build scene objects from measured source elements and place them.
    /// Refused until the preload gate has opened.
    pub fn build_scene(&mut self, elements: Vec<SourceElement>) -> Result<BuildReport, GalleryError> {
        if !self.gate.is_open() {
            return Err(GalleryError::PreloadPending {
                pending: self.gate.pending(),
            });
        }
        let report = self.scene.build(elements, &self.template)?;
        self.reproject();
        Ok(report)
    }

    /// Latest native scroll offset from the host.
    pub fn record_scroll(&mut self, offset: f32) {
        self.scroll.record_native_scroll(offset);
    }

    /// Viewport size changed: recompute the camera and re-place objects now.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        self.viewport = Viewport::with_device_pixel_ratio(
            width,
            height,
            device_pixel_ratio,
            self.cfg.max_pixel_ratio,
        );
        self.camera.fit(&self.viewport);
        self.reproject();
        log::debug!(
            "resized to {}x{} @{} (fov {:.3})",
            width,
            height,
            self.viewport.pixel_ratio,
            self.camera.fov
        );
    }

    pub fn pointer_move(&mut self, px: f32, py: f32) -> PickOutcome {
        self.picker
            .on_pointer_move(px, py, &self.viewport, &self.camera, &mut self.scene)
    }

    pub fn pointer_leave(&mut self) -> PickOutcome {
        self.picker.on_pointer_leave(&mut self.scene)
    }

    pub fn start(&mut self) -> Option<FrameToken> {
        self.render_loop.start()
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    /// One scheduled frame. Returns the next token to schedule, or `None` when
    /// the token was stale or the loop is stopped.
    pub fn tick<R: Renderer + ?Sized>(
        &mut self,
        token: FrameToken,
        dt: f32,
        renderer: &mut R,
    ) -> Result<Option<FrameToken>, GalleryError> {
        let ctx = FrameContext {
            scroll: &mut self.scroll,
            scene: &mut self.scene,
            viewport: &self.viewport,
            camera: &self.camera,
            time_step: self.cfg.time_step,
        };
        Ok(self.render_loop.tick(token, dt, ctx, renderer)?)
    }

    /// Serializable view of the current frame for host renderers.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(
            self.render_loop.frame_count(),
            &self.scene,
            &self.scroll,
            &self.viewport,
            &self.camera,
        )
    }

    fn reproject(&mut self) {
        layout::project(&mut self.scene, self.scroll.rendered(), &self.viewport);
    }

    #[inline]
    pub fn config(&self) -> &GalleryConfig {
        &self.cfg
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    pub fn scroll(&self) -> &ScrollModel {
        &self.scroll
    }

    /// Restore a scroll position without easing (before first paint).
    pub fn jump_scroll(&mut self, offset: f32) {
        self.scroll.jump_to(offset);
        self.reproject();
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }
}
