//! Benchmarks for the renderer crate - stamping, colorize passes and export.
//!
//! Run with: cargo bench --package renderer -- colorize
//! Or: cargo bench --package renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heatmap_common::{default_gradient, DataPoint};
use rand::Rng;
use renderer::png::create_png_auto;
use renderer::{BufferSurface, Palette, PixmapSurface, Region, Renderer, Surface};
use test_utils::clustered_points;

/// Uniformly scattered points with counts in `1..=max`.
fn random_points(count: usize, width: u32, height: u32, max: u32) -> Vec<DataPoint> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            DataPoint::new(
                rng.gen_range(0..width),
                rng.gen_range(0..height),
                rng.gen_range(1..=max) as f64,
            )
        })
        .collect()
}

fn new_renderer<S: Surface>(width: u32, height: u32, radius: u32) -> Renderer<S> {
    Renderer::new(width, height, radius, &default_gradient(), 180).unwrap()
}

/// Stamp every point, then colorize once.
fn render_all<S: Surface>(r: &mut Renderer<S>, points: &[DataPoint], max: f64) {
    r.clear();
    for p in points {
        r.stamp(p.x, p.y, p.count, max, false).unwrap();
    }
    r.colorize(Region::Full).unwrap();
}

// =============================================================================
// STAMP BENCHMARKS
// =============================================================================

fn bench_stamp(c: &mut Criterion) {
    let mut group = c.benchmark_group("stamp");

    for radius in [10u32, 40, 80] {
        let mut r = new_renderer::<BufferSurface>(512, 512, radius);
        group.throughput(Throughput::Elements(1));

        group.bench_with_input(BenchmarkId::new("deferred", radius), &radius, |b, _| {
            b.iter(|| r.stamp(black_box(256), black_box(256), 1.0, 10.0, false))
        });

        group.bench_with_input(BenchmarkId::new("immediate", radius), &radius, |b, _| {
            b.iter(|| r.stamp(black_box(256), black_box(256), 1.0, 10.0, true))
        });
    }

    group.finish();
}

// =============================================================================
// COLORIZE BENCHMARKS
// =============================================================================

fn bench_colorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("colorize");

    let sizes = [(256u32, 256u32), (512, 512), (1024, 1024)];

    for (width, height) in sizes {
        let points = clustered_points(width, height, 6, 2000, 50, 1);
        let mut buffer = new_renderer::<BufferSurface>(width, height, 25);
        let mut pixmap = new_renderer::<PixmapSurface>(width, height, 25);
        render_all(&mut buffer, &points, 50.0);
        render_all(&mut pixmap, &points, 50.0);

        group.throughput(Throughput::Elements((width * height) as u64));

        group.bench_function(BenchmarkId::new("buffer", format!("{}x{}", width, height)), |b| {
            b.iter(|| buffer.colorize(black_box(Region::Full)))
        });

        group.bench_function(BenchmarkId::new("pixmap", format!("{}x{}", width, height)), |b| {
            b.iter(|| pixmap.colorize(black_box(Region::Full)))
        });
    }

    group.finish();
}

// =============================================================================
// FULL REPLAY BENCHMARKS
// =============================================================================

fn bench_full_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_replay");
    group.sample_size(20);

    for count in [100usize, 1000, 5000] {
        let points = random_points(count, 800, 600, 100);
        let mut r = new_renderer::<BufferSurface>(800, 600, 40);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("800x600", count), &points, |b, points| {
            b.iter(|| render_all(&mut r, black_box(points), 100.0))
        });
    }

    group.finish();
}

// =============================================================================
// PALETTE AND EXPORT BENCHMARKS
// =============================================================================

fn bench_palette(c: &mut Criterion) {
    let stops = default_gradient();
    c.bench_function("palette_build", |b| {
        b.iter(|| Palette::from_stops(black_box(&stops)).unwrap())
    });
}

fn bench_png_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_export");

    for (width, height) in [(256u32, 256u32), (800, 600)] {
        let points = clustered_points(width, height, 4, 500, 20, 9);
        let mut r = new_renderer::<BufferSurface>(width, height, 30);
        render_all(&mut r, &points, 20.0);
        let pixels = r.display().pixels().to_vec();

        group.throughput(Throughput::Bytes((width * height * 4) as u64));
        group.bench_with_input(
            BenchmarkId::new("auto", format!("{}x{}", width, height)),
            &pixels,
            |b, pixels| b.iter(|| create_png_auto(black_box(pixels), width as usize, height as usize)),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_stamp,
    bench_colorize,
    bench_full_replay,
    bench_palette,
    bench_png_export,
);
criterion_main!(benches);
