use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResolution};
use bevy_scrollscape::{
    GalleryCamera, GalleryControl, GalleryTile, HoverChanged, PendingLayout, PreloadSignal,
    ScrollscapeGallery, ScrollscapePlugin, TileUniforms,
};
use scrollscape_core::{preload::DEFAULT_SIGNALS, HoverEvent, ObjectId, SourceElement};

fn app_with_layout(name: &str) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(ScrollscapePlugin {
        width: 800.0,
        height: 600.0,
        ..Default::default()
    });
    let layout: Vec<SourceElement> =
        scrollscape_test_fixtures::layouts::load(name).expect("layout fixture");
    app.world_mut().insert_resource(PendingLayout(Some(layout)));
    app
}

fn signal_all(app: &mut App) {
    for s in DEFAULT_SIGNALS {
        app.world_mut().send_event(PreloadSignal(s.to_string()));
    }
}

fn tile_translations(app: &mut App) -> Vec<(ObjectId, Vec3)> {
    let mut q = app.world_mut().query::<(&GalleryTile, &Transform)>();
    let mut out: Vec<_> = q
        .iter(app.world())
        .map(|(tile, tf)| (tile.id, tf.translation))
        .collect();
    out.sort_by_key(|(id, _)| *id);
    out
}

#[test]
fn plugin_inserts_gallery_resource() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(ScrollscapePlugin::default());
    assert!(app.world().get_resource::<ScrollscapeGallery>().is_some());
}

#[test]
fn tiles_wait_for_preload_then_spawn_in_place() {
    let mut app = app_with_layout("single");
    app.update();
    assert!(tile_translations(&mut app).is_empty());

    signal_all(&mut app);
    app.update();

    let tiles = tile_translations(&mut app);
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].0, ObjectId(0));
    assert!((tiles[0].1 - Vec3::new(-250.0, 125.0, 0.0)).length() < 1e-3);
    assert!(app.world().resource::<ScrollscapeGallery>().0.is_running());
}

#[test]
fn primary_window_size_replaces_plugin_size_at_build() {
    let mut app = app_with_layout("single");
    app.world_mut().spawn((
        Window {
            resolution: WindowResolution::new(400.0, 300.0),
            ..default()
        },
        PrimaryWindow,
    ));
    signal_all(&mut app);
    app.update();

    let viewport = app.world().resource::<ScrollscapeGallery>().0.viewport();
    assert_eq!((viewport.width, viewport.height), (400.0, 300.0));
    let tiles = tile_translations(&mut app);
    assert!((tiles[0].1 - Vec3::new(-50.0, -25.0, 0.0)).length() < 1e-3);
}

#[test]
fn wheel_scroll_moves_tiles_up_the_screen() {
    let mut app = app_with_layout("single");
    signal_all(&mut app);
    app.update();

    app.world_mut().send_event(MouseWheel {
        unit: MouseScrollUnit::Pixel,
        x: 0.0,
        y: -100.0,
        window: Entity::PLACEHOLDER,
    });
    app.update();

    let gallery = &app.world().resource::<ScrollscapeGallery>().0;
    assert_eq!(gallery.scroll().raw(), 100.0);
    let rendered = gallery.scroll().rendered();
    assert!(rendered > 0.0 && rendered < 100.0);

    let tiles = tile_translations(&mut app);
    assert!((tiles[0].1.y - (125.0 + rendered)).abs() < 1e-3);
}

#[test]
fn cursor_over_tile_reports_enter_and_sets_uniforms() {
    let mut app = app_with_layout("single");
    signal_all(&mut app);
    app.update();
    app.world_mut()
        .resource_mut::<Events<HoverChanged>>()
        .clear();

    app.world_mut().send_event(CursorMoved {
        window: Entity::PLACEHOLDER,
        position: Vec2::new(150.0, 175.0),
        delta: None,
    });
    app.update();

    let events: Vec<HoverChanged> = app
        .world_mut()
        .resource_mut::<Events<HoverChanged>>()
        .drain()
        .collect();
    assert_eq!(events, vec![HoverChanged(HoverEvent::Enter(ObjectId(0)))]);

    let mut q = app.world_mut().query::<&TileUniforms>();
    let uniforms = q.single(app.world());
    assert!((uniforms.0.hover[0] - 0.5).abs() < 1e-3);
}

#[test]
fn stop_and_start_control_the_frame_chain() {
    let mut app = app_with_layout("single");
    signal_all(&mut app);
    app.update();
    let frames = |app: &App| {
        app.world()
            .resource::<ScrollscapeGallery>()
            .0
            .render_loop()
            .frame_count()
    };
    let before = frames(&app);
    assert!(before >= 1);

    app.world_mut().send_event(GalleryControl::Stop);
    app.update();
    app.update();
    assert_eq!(frames(&app), before);

    app.world_mut().send_event(GalleryControl::Start);
    app.update();
    assert_eq!(frames(&app), before + 1);
}

#[test]
fn gallery_camera_follows_core_camera() {
    let mut app = app_with_layout("single");
    let cam = app
        .world_mut()
        .spawn((GalleryCamera, Transform::default(), Projection::default()))
        .id();
    signal_all(&mut app);
    app.update();

    let tf = app.world().get::<Transform>(cam).unwrap();
    assert_eq!(tf.translation, Vec3::new(0.0, 0.0, 600.0));
    match app.world().get::<Projection>(cam).unwrap() {
        Projection::Perspective(p) => {
            let expected = 2.0 * (300.0f32 / 600.0).atan();
            assert!((p.fov - expected).abs() < 1e-4);
        }
        other => panic!("expected perspective projection, got {other:?}"),
    }
}
