use scrollscape_core::{
    preload::DEFAULT_SIGNALS, Bounds, Camera, Gallery, GalleryConfig, GalleryError, ImageStatus,
    ObjectId, RenderError, Renderer, Scene, SourceElement,
};

/// Records what the scene looked like at each draw.
#[derive(Default)]
struct RecordingRenderer {
    draws: Vec<Vec<[f32; 3]>>,
    times: Vec<f32>,
    fail_on: Option<usize>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), RenderError> {
        if self.fail_on == Some(self.draws.len()) {
            return Err(RenderError::ContextLost);
        }
        self.draws.push(scene.iter().map(|o| o.position).collect());
        self.times
            .push(scene.iter().next().map_or(0.0, |o| o.material.uniforms.time));
        Ok(())
    }
}

fn gallery() -> Gallery {
    let mut g = Gallery::new(GalleryConfig::default(), 800.0, 600.0).unwrap();
    for s in DEFAULT_SIGNALS {
        g.signal_ready(s);
    }
    g.build_scene(vec![SourceElement {
        id: "hero".into(),
        src: "img/hero.jpg".into(),
        bounds: Bounds::new(100.0, 50.0, 200.0, 150.0),
        image: ImageStatus::Decoded {
            natural_width: 800,
            natural_height: 600,
        },
    }])
    .unwrap();
    g
}

#[test]
fn stopped_until_first_start() {
    let mut g = gallery();
    assert!(!g.is_running());
    let mut r = RecordingRenderer::default();
    let bogus = scrollscape_core::FrameToken {
        generation: 0,
        frame: 0,
    };
    assert_eq!(g.tick(bogus, 0.016, &mut r).unwrap(), None);
    assert!(r.draws.is_empty());
}

#[test]
fn scroll_advances_before_projection_before_draw() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();
    g.record_scroll(100.0);

    let tok = g.start().unwrap();
    g.tick(tok, 0.016, &mut r).unwrap().unwrap();

    // rendered scroll moved 10% toward 100 and the drawn position already reflects it
    assert!((g.scroll().rendered() - 10.0).abs() < 1e-4);
    let drawn = r.draws[0][0];
    assert!((drawn[1] - (10.0 - 100.0 + 300.0 - 75.0)).abs() < 1e-3);
    assert!((drawn[0] + 250.0).abs() < 1e-4);
}

#[test]
fn time_uniform_advances_per_frame() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();
    let mut tok = g.start();
    for _ in 0..4 {
        tok = g.tick(tok.unwrap(), 0.016, &mut r).unwrap();
    }
    assert_eq!(r.times.len(), 4);
    assert!((r.times[3] - 0.2).abs() < 1e-5);
    assert_eq!(g.render_loop().frame_count(), 4);
}

#[test]
fn restart_does_not_duplicate_the_chain() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();

    let first = g.start().unwrap();
    assert!(g.start().is_none());
    g.stop();
    let second = g.start().unwrap();

    // the callback scheduled for the first run fires late: ignored
    assert_eq!(g.tick(first, 0.016, &mut r).unwrap(), None);
    assert!(r.draws.is_empty());

    let next = g.tick(second, 0.016, &mut r).unwrap().unwrap();
    // replaying an already consumed token is also ignored
    assert_eq!(g.tick(second, 0.016, &mut r).unwrap(), None);
    assert!(g.tick(next, 0.016, &mut r).unwrap().is_some());
    assert_eq!(r.draws.len(), 2);
}

#[test]
fn stop_cancels_pending_frame() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();
    let tok = g.start().unwrap();
    g.stop();
    assert_eq!(g.tick(tok, 0.016, &mut r).unwrap(), None);
    assert!(r.draws.is_empty());
}

#[test]
fn draw_failure_stops_the_loop() {
    let mut g = gallery();
    let mut r = RecordingRenderer {
        fail_on: Some(1),
        ..RecordingRenderer::default()
    };
    let tok = g.start().unwrap();
    let next = g.tick(tok, 0.016, &mut r).unwrap().unwrap();
    let err = g.tick(next, 0.016, &mut r).unwrap_err();
    assert_eq!(err, GalleryError::Render(RenderError::ContextLost));
    assert!(err.is_fatal());
    assert!(!g.is_running());

    // nothing runs until the host explicitly restarts
    assert_eq!(g.tick(next, 0.016, &mut r).unwrap(), None);
    assert!(g.start().is_some());
}

#[test]
fn snapshot_reflects_the_last_frame() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();
    g.pointer_move(150.0, 175.0);
    let tok = g.start().unwrap();
    g.tick(tok, 0.25, &mut r).unwrap();

    let snap = g.snapshot();
    assert_eq!(snap.frame, 1);
    assert_eq!(snap.draw.objects.len(), 1);
    let obj = &snap.draw.objects[0];
    assert_eq!(obj.id, ObjectId(0));
    assert_eq!(obj.source_id, "hero");
    assert!(obj.uniforms.hover_state > 0.0);
    assert!((snap.draw.camera.aspect - 800.0 / 600.0).abs() < 1e-6);

    let json = serde_json::to_value(&snap).unwrap();
    assert!(json["objects"][0]["uniforms"]["hoverState"].is_number());
}

#[test]
fn collapsed_viewport_stops_the_loop() {
    let mut g = gallery();
    let mut r = RecordingRenderer::default();
    let tok = g.start().unwrap();
    let next = g.tick(tok, 0.016, &mut r).unwrap().unwrap();

    g.resize(800.0, 0.0, 1.0);
    let err = g.tick(next, 0.016, &mut r).unwrap_err();
    assert_eq!(err, GalleryError::Render(RenderError::ViewportUnavailable));
    assert!(err.is_fatal());
    assert!(!g.is_running());
    assert_eq!(r.draws.len(), 1);

    // a real size again plus an explicit restart resumes drawing
    g.resize(800.0, 600.0, 1.0);
    let tok = g.start().unwrap();
    assert!(g.tick(tok, 0.016, &mut r).unwrap().is_some());
    assert_eq!(r.draws.len(), 2);
}

#[test]
fn restored_scroll_is_on_screen_from_the_first_frame() {
    // measured while the page was scrolled to 500: viewport top 100 → document top 600
    let mut g = Gallery::new(GalleryConfig::default(), 800.0, 600.0).unwrap();
    for s in DEFAULT_SIGNALS {
        g.signal_ready(s);
    }
    g.jump_scroll(500.0);
    g.build_scene(vec![SourceElement {
        id: "hero".into(),
        src: "img/hero.jpg".into(),
        bounds: Bounds::new(600.0, 50.0, 200.0, 150.0),
        image: ImageStatus::Decoded {
            natural_width: 800,
            natural_height: 600,
        },
    }])
    .unwrap();

    let mut r = RecordingRenderer::default();
    let tok = g.start().unwrap();
    g.tick(tok, 0.016, &mut r).unwrap();
    let first = r.draws[0][0];
    assert!((first[0] + 250.0).abs() < 1e-3);
    assert!((first[1] - 125.0).abs() < 1e-3, "first frame y = {}", first[1]);
}
