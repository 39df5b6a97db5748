//! Benchmarks for the per-frame hot paths: level arc, pointer and level color.
//!
//! Run with: cargo bench --bench gauge_paths

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rg_gauge::{GaugeConfig, GaugeDisplayer, ManualTicker, SvgSurface};
use rg_gauge_core::{
    build_arc_path, build_pointer_path, compute_geometry, ColorSource, GaugeMode,
    PointerDimensions, ANIMATION_FRAME_INTERVAL,
};
use rg_gauge_types::{display_configs::default_level_colors, ratio_of, PointerOptions};
use std::rc::Rc;

fn benchmark_arc_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("arc_path");
    for mode in [GaugeMode::Standard, GaugeMode::Donut, GaugeMode::Differential] {
        let geometry = compute_geometry(400.0, 320.0, mode, 1.0);
        group.bench_function(format!("{:?}", mode), |b| {
            let mut value = 0.0f64;
            b.iter(|| {
                value = (value + 0.7) % 100.0;
                black_box(build_arc_path(black_box(value), 0.0, 100.0, &geometry, mode))
            });
        });
    }
    group.finish();
}

fn benchmark_pointer_path(c: &mut Criterion) {
    let geometry = compute_geometry(400.0, 320.0, GaugeMode::Standard, 1.0);
    let dims = PointerDimensions::resolve(&PointerOptions::default(), &geometry);

    c.bench_function("pointer_path", |b| {
        let mut value = 0.0f64;
        b.iter(|| {
            value = (value + 0.7) % 100.0;
            black_box(build_pointer_path(
                black_box(value),
                0.0,
                100.0,
                &geometry,
                GaugeMode::Standard,
                &dims,
            ))
        });
    });
}

fn benchmark_level_color(c: &mut Criterion) {
    let smooth = ColorSource::new(&default_level_colors(), false, None);
    let stepped = ColorSource::new(&default_level_colors(), true, None);

    let mut group = c.benchmark_group("level_color");
    group.throughput(Throughput::Elements(1000));
    for (name, source) in [("gradient", smooth), ("stepped", stepped)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                for i in 0..1000 {
                    let value = i as f64 / 10.0;
                    black_box(source.resolve(value, ratio_of(value, 0.0, 100.0)));
                }
            });
        });
    }
    group.finish();
}

fn benchmark_full_animation(c: &mut Criterion) {
    let mut group = c.benchmark_group("animation");
    group.sample_size(20);

    group.bench_function("refresh_700ms", |b| {
        let ticker = Rc::new(ManualTicker::new());
        let displayer = GaugeDisplayer::new(
            GaugeConfig {
                pointer: true,
                start_animation_time: 0.0,
                ..Default::default()
            },
            SvgSurface::new(400.0, 320.0),
            ticker.clone(),
        )
        .unwrap();

        let mut target = 0.0;
        b.iter(|| {
            target = if target > 50.0 { 10.0 } else { 90.0 };
            displayer.refresh(target, None, None, None).unwrap();
            black_box(ticker.run_until_idle(ANIMATION_FRAME_INTERVAL, 100))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_arc_paths,
    benchmark_pointer_path,
    benchmark_level_color,
    benchmark_full_animation
);
criterion_main!(benches);
