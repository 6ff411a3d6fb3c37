//! Tick-loop benchmarks against the in-memory scene.
//!
//! Run with: `cargo bench --bench animation_tick`

#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use frameplot_animation_core::{
    Animation, AnyBlock, Line, LineOptions, Pcolormesh, PcolormeshOptions, SliderConfig,
    TimelineSource,
};
use frameplot_canvas_core::Scene;
use ndarray::{Array2, Array3};

const FRAMES: usize = 64;

fn build(points: usize) -> (Scene, Animation) {
    let (mut scene, ax) = Scene::with_axes();
    let y = Array2::from_shape_fn((FRAMES, points), |(t, j)| ((t + j) as f64 * 0.1).sin());
    let c = Array3::from_shape_fn((FRAMES, 16, 16), |(t, i, j)| (t * i + j) as f64);
    let blocks: Vec<AnyBlock> = vec![
        Line::from_y(&mut scene, ax, y, LineOptions::default())
            .unwrap()
            .into(),
        Pcolormesh::new(&mut scene, ax, c, PcolormeshOptions::default())
            .unwrap()
            .into(),
    ];
    let mut anim = Animation::new(blocks, TimelineSource::Default).unwrap();
    anim.timeline_slider(&mut scene, SliderConfig::default())
        .unwrap();
    (scene, anim)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for points in [100, 1_000, 10_000] {
        let (mut scene, mut anim) = build(points);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{points}_points")),
            &points,
            |bench, _| {
                bench.iter(|| {
                    anim.tick(black_box(&mut scene)).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_scrub_paused(c: &mut Criterion) {
    let (mut scene, mut anim) = build(1_000);
    anim.press_toggle(&mut scene).unwrap();
    let mut frame = 0;
    c.bench_function("scrub_paused", |bench| {
        bench.iter(|| {
            frame = (frame + 7) % FRAMES;
            anim.scrub(black_box(frame), &mut scene).unwrap();
        });
    });
}

criterion_group!(benches, bench_tick, bench_scrub_paused);
criterion_main!(benches);
