use scrollscape_core::{
    preload::DEFAULT_SIGNALS, Bounds, Gallery, GalleryConfig, GalleryError, ImageStatus,
    ObjectId, SourceElement,
};

fn element(id: &str, bounds: Bounds) -> SourceElement {
    SourceElement {
        id: id.into(),
        src: format!("img/{id}.jpg"),
        bounds,
        image: ImageStatus::Decoded {
            natural_width: 800,
            natural_height: 600,
        },
    }
}

fn ready_gallery(width: f32, height: f32) -> Gallery {
    let mut g = Gallery::new(GalleryConfig::default(), width, height).expect("gallery");
    for s in DEFAULT_SIGNALS {
        g.signal_ready(s);
    }
    g
}

fn approx(a: f32, b: f32) {
    assert!((a - b).abs() <= 1e-4, "{a} != {b}");
}

#[test]
fn reference_scenario_at_rest_and_scrolled() {
    let mut g = ready_gallery(800.0, 600.0);
    g.build_scene(vec![element("hero", Bounds::new(100.0, 50.0, 200.0, 150.0))])
        .unwrap();

    let pos = g.scene().get(ObjectId(0)).unwrap().position;
    approx(pos[0], -250.0);
    approx(pos[1], 125.0);

    g.jump_scroll(50.0);
    let pos = g.scene().get(ObjectId(0)).unwrap().position;
    approx(pos[0], -250.0);
    approx(pos[1], 175.0);
}

#[test]
fn x_identity_holds_for_every_object() {
    let mut g = ready_gallery(1280.0, 720.0);
    g.build_scene(vec![
        element("a", Bounds::new(0.0, 0.0, 300.0, 200.0)),
        element("b", Bounds::new(250.0, 640.0, 420.0, 280.0)),
        element("c", Bounds::new(900.0, 1100.0, 180.0, 90.0)),
    ])
    .unwrap();
    g.jump_scroll(333.0);

    let vw = g.viewport().width;
    for obj in g.scene().iter() {
        let b = obj.source.bounds;
        approx(obj.position[0] + b.width / 2.0, b.left - vw / 2.0 + b.width);
    }
}

#[test]
fn projection_is_idempotent() {
    let mut g = ready_gallery(800.0, 600.0);
    g.build_scene(vec![
        element("a", Bounds::new(10.0, 20.0, 100.0, 100.0)),
        element("b", Bounds::new(700.0, 300.0, 100.0, 50.0)),
    ])
    .unwrap();
    g.jump_scroll(120.0);

    let before: Vec<[f32; 3]> = g.scene().iter().map(|o| o.position).collect();
    let (rendered, viewport) = (g.scroll().rendered(), *g.viewport());
    scrollscape_core::project(g.scene_mut(), rendered, &viewport);
    scrollscape_core::project(g.scene_mut(), rendered, &viewport);
    let after: Vec<[f32; 3]> = g.scene().iter().map(|o| o.position).collect();
    assert_eq!(before, after);
}

#[test]
fn resize_updates_camera_and_layout_immediately() {
    let mut g = ready_gallery(800.0, 600.0);
    g.build_scene(vec![element("hero", Bounds::new(100.0, 50.0, 200.0, 150.0))])
        .unwrap();

    g.resize(400.0, 300.0, 1.0);
    approx(g.camera().aspect, 400.0 / 300.0);
    let pos = g.scene().get(ObjectId(0)).unwrap().position;
    approx(pos[0], 50.0 - 200.0 + 100.0);
    approx(pos[1], 0.0 - 100.0 + 150.0 - 75.0);

    // one world unit is still one pixel at the image plane
    let cam = g.camera();
    let visible_h = 2.0 * cam.distance() * (cam.fov.to_radians() * 0.5).tan();
    assert!((visible_h - 300.0).abs() < 1e-2);
}

#[test]
fn build_before_preload_is_refused() {
    let mut g = Gallery::new(GalleryConfig::default(), 800.0, 600.0).unwrap();
    g.signal_ready("images");
    let err = g
        .build_scene(vec![element("a", Bounds::new(0.0, 0.0, 1.0, 1.0))])
        .unwrap_err();
    match err {
        GalleryError::PreloadPending { pending } => assert_eq!(pending.len(), 2),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(g.scene().is_empty());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = GalleryConfig {
        camera_distance: 0.0,
        ..GalleryConfig::default()
    };
    assert!(matches!(
        Gallery::new(cfg, 800.0, 600.0),
        Err(GalleryError::InvalidConfig(_))
    ));
}
