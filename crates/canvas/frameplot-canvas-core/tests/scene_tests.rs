use frameplot_canvas_core::{
    Artist, ArtistUpdate, AxesKind, Canvas, CanvasError, Capture, ControlSlot, Scene, Style,
};
use ndarray::array;

fn line(y: f64) -> Artist {
    Artist::Line {
        x: array![0.0, 1.0],
        y: array![y, y],
        style: Style::default(),
    }
}

/// it should keep artists in creation order per axes and drop them on clear
#[test]
fn artists_ordered_and_cleared() {
    let (mut scene, ax) = Scene::with_axes();
    let a = scene.add_artist(ax, line(1.0)).unwrap();
    let b = scene.add_artist(ax, line(2.0)).unwrap();
    assert_ne!(a, b);
    assert_eq!(scene.artists(ax), vec![&line(1.0), &line(2.0)]);

    scene.set_title(ax, "hello", &Style::default()).unwrap();
    scene.clear(ax).unwrap();
    assert!(scene.artists(ax).is_empty());
    assert_eq!(scene.title(ax), None);
    assert_eq!(
        scene.update_artist(a, ArtistUpdate::LineData { x: array![0.0], y: array![0.0] }),
        Err(CanvasError::ArtistNotFound(a))
    );
}

/// it should produce equal snapshots when an artist is removed and recreated identically
#[test]
fn snapshot_ignores_artist_ids() {
    let mut scene = Scene::new();
    let ax = scene.add_axes(AxesKind::Plot3d).unwrap();
    let a = scene.add_artist(ax, line(3.0)).unwrap();
    let before = scene.snapshot();
    scene.remove_artist(a).unwrap();
    scene.add_artist(ax, line(3.0)).unwrap();
    assert_eq!(before, scene.snapshot());
}

/// it should reject z-limits on 2-D axes and record them on 3-D axes
#[test]
fn zlim_only_on_3d() {
    let (mut scene, ax2) = Scene::with_axes();
    assert!(matches!(
        scene.set_zlim(ax2, 0.0, 1.0),
        Err(CanvasError::Unsupported(_))
    ));
    let ax3 = scene.add_axes(AxesKind::Plot3d).unwrap();
    scene.set_zlim(ax3, -1.0, 2.0).unwrap();
    assert_eq!(scene.zlim(ax3), Some((-1.0, 2.0)));
}

/// it should allocate control axes and capture itself as a snapshot
#[test]
fn control_axes_and_capture() {
    let (mut scene, _) = Scene::with_axes();
    let slider = scene.add_control_axes(ControlSlot::Slider).unwrap();
    let snap = scene.axes_snapshot(slider).unwrap();
    assert_eq!(snap.kind, AxesKind::Control(ControlSlot::Slider));

    scene.draw().unwrap();
    scene.draw().unwrap();
    assert_eq!(scene.draw_count(), 2);

    match scene.capture().unwrap() {
        Capture::Snapshot(s) => assert_eq!(s.axes.len(), 2),
        Capture::Pixels(_) => panic!("scene does not rasterize"),
    }
}

/// it should round-trip a snapshot through JSON
#[test]
fn snapshot_serializes() {
    let (mut scene, ax) = Scene::with_axes();
    scene.add_artist(ax, line(0.5)).unwrap();
    let snap = scene.snapshot();
    let text = serde_json::to_string(&snap).unwrap();
    assert!(text.contains("\"kind\":\"line\""));
    let back: frameplot_canvas_core::SceneSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(back, snap);
}
