//! Tests for the stamping and colorize pipeline, palettes and legends.

use heatmap_common::{default_gradient, ColorStop, HeatmapConfig};
use renderer::legend::{STRIP_HEIGHT, STRIP_WIDTH};
use renderer::png::create_png;
use renderer::{
    BufferSurface, LegendScale, MaxObserver, Palette, PixmapSurface, Rect, Region, Renderer, Surface,
};
use test_utils::{clustered_points, grid_points};

// ============================================================================
// Helper functions
// ============================================================================

fn renderer(width: u32, height: u32, radius: u32) -> Renderer {
    Renderer::new(width, height, radius, &default_gradient(), 180).unwrap()
}

fn opaque_pixels(r: &Renderer) -> usize {
    r.display().pixels().chunks_exact(4).filter(|px| px[3] > 0).count()
}

// ============================================================================
// Palette
// ============================================================================

#[test]
fn test_palette_identical_across_builds_and_hosts() {
    let a: Renderer<BufferSurface> = Renderer::new(8, 8, 4, &default_gradient(), 180).unwrap();
    let b: Renderer<PixmapSurface> = Renderer::new(8, 8, 4, &default_gradient(), 180).unwrap();
    assert_eq!(a.palette(), b.palette());
    assert_eq!(a.palette(), &Palette::from_stops(&default_gradient()).unwrap());
}

#[test]
fn test_palette_rebuild_changes_colors() {
    let mut r = renderer(40, 40, 6);
    r.stamp(20, 20, 1.0, 1.0, true).unwrap();
    let before = r.display().read_pixel(20, 20).unwrap();

    r.build_palette(&[ColorStop::new(0.0, "black"), ColorStop::new(1.0, "white")])
        .unwrap();
    // Existing pixels keep their colors until recolorized
    assert_eq!(r.display().read_pixel(20, 20).unwrap(), before);

    r.colorize(Region::Full).unwrap();
    let after = r.display().read_pixel(20, 20).unwrap();
    assert_eq!(after[0], after[1]);
    assert_eq!(after[1], after[2]);
    assert_ne!(after, before);
}

#[test]
fn test_bad_gradient_rejected() {
    let result: Result<Renderer, _> = Renderer::new(8, 8, 4, &[], 180);
    assert!(result.is_err());
    let mut r = renderer(8, 8, 4);
    assert!(r.build_palette(&[ColorStop::new(0.5, "#12")]).is_err());
}

// ============================================================================
// Colorize regions
// ============================================================================

#[test]
fn test_dirty_and_full_passes_agree_inside_dirty_rect() {
    let points = clustered_points(120, 90, 3, 60, 5, 21);
    let mut dirty = renderer(120, 90, 9);
    let mut full = renderer(120, 90, 9);
    for p in &points {
        dirty.stamp(p.x, p.y, p.count, 5.0, false).unwrap();
        full.stamp(p.x, p.y, p.count, 5.0, false).unwrap();
    }
    let rect = dirty.dirty_bounds().unwrap();
    dirty.colorize(Region::Dirty).unwrap();
    full.colorize(Region::Full).unwrap();

    // Same colors inside the stamped boxes; the faint edges outside them stay
    // uncolorized by a dirty pass
    for y in 0..90 {
        for x in 0..120 {
            let a = dirty.display().read_pixel(x, y).unwrap();
            let b = full.display().read_pixel(x, y).unwrap();
            if rect.contains(x, y) {
                assert_eq!(a, b, "({}, {})", x, y);
            } else {
                assert_eq!(a, [0, 0, 0, 0]);
            }
        }
    }
}

#[test]
fn test_dirty_pass_only_touches_dirty_rect() {
    let mut r = renderer(100, 100, 10);
    r.stamp(20, 20, 1.0, 1.0, false).unwrap();
    r.colorize(Region::Dirty).unwrap();
    let first = opaque_pixels(&r);

    r.stamp(80, 80, 1.0, 1.0, false).unwrap();
    assert_eq!(r.dirty_bounds(), Some(Rect::new(65, 65, 96, 96)));
    r.colorize(Region::Dirty).unwrap();
    assert!(opaque_pixels(&r) > first);
    assert_eq!(r.dirty_bounds(), None);
}

#[test]
fn test_zero_intensity_pixels_untouched() {
    let mut r = renderer(30, 30, 4);
    r.colorize(Region::Full).unwrap();
    assert!(r.display().pixels().iter().all(|&b| b == 0));

    r.stamp(15, 15, 1.0, 1.0, true).unwrap();
    assert_eq!(r.display().read_pixel(0, 0).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn test_area_outside_surface_is_noop() {
    let mut r = renderer(50, 50, 5);
    r.stamp(25, 25, 1.0, 1.0, false).unwrap();
    r.colorize(Region::Area(Rect::new(60, 60, 90, 90))).unwrap();
    assert_eq!(opaque_pixels(&r), 0);
    assert!(r.dirty_bounds().is_some());
}

#[test]
fn test_large_and_small_passes_match() {
    // 100x100 crosses the parallel threshold; a per-row area pass does not
    let points = grid_points(100, 100, 25, 3.0);
    let mut whole = renderer(100, 100, 8);
    let mut rows = renderer(100, 100, 8);
    for p in &points {
        whole.stamp(p.x, p.y, p.count, 4.0, false).unwrap();
        rows.stamp(p.x, p.y, p.count, 4.0, false).unwrap();
    }
    whole.colorize(Region::Full).unwrap();
    for y in 0..100 {
        rows.colorize(Region::Area(Rect::new(0, y, 100, y + 1))).unwrap();
    }
    assert_eq!(whole.display().pixels(), rows.display().pixels());
}

// ============================================================================
// Stamping
// ============================================================================

#[test]
fn test_soft_falloff() {
    let mut r = renderer(200, 200, 40);
    r.stamp(100, 100, 1.0, 1.0, false).unwrap();
    let i = r.intensity();

    // Flat core, soft rim, nothing past the box
    assert!(i.get(100, 100) >= 250);
    assert!(i.get(120, 100) >= 250);
    let rim = i.get(140, 100);
    assert!(rim > 80 && rim < 180, "rim intensity {}", rim);
    assert!(i.get(150, 100) < rim);
    assert_eq!(i.get(170, 100), 0);

    // Symmetric around the center
    assert_eq!(i.get(80, 100), i.get(119, 100));
}

#[test]
fn test_overlapping_stamps_accumulate() {
    let mut r = renderer(100, 100, 10);
    r.stamp(50, 50, 1.0, 4.0, false).unwrap();
    let once = r.intensity().get(50, 50);
    r.stamp(50, 50, 1.0, 4.0, false).unwrap();
    let twice = r.intensity().get(50, 50);
    assert!(twice > once);
    assert!(twice < once * 2);
}

#[test]
fn test_from_config_uses_opacity() {
    let config = HeatmapConfig::from_json(r#"{"radius": 5, "opacity": 50}"#).unwrap();
    let r: Renderer = Renderer::from_config(&config, 20, 10).unwrap();
    assert_eq!((r.width(), r.height(), r.radius()), (20, 10, 5));
    assert_eq!(r.opacity_cap(), 127);
}

#[test]
fn test_resize_drops_intensity() {
    let mut r = renderer(50, 50, 5);
    r.stamp(10, 10, 1.0, 1.0, true).unwrap();
    r.resize(80, 20).unwrap();
    assert_eq!(r.intensity().data().len(), 80 * 20);
    assert!(r.intensity().data().iter().all(|&v| v == 0));
    assert_eq!(opaque_pixels(&r), 0);
}

// ============================================================================
// Legend
// ============================================================================

#[test]
fn test_legend_strip_encodes() {
    let mut legend = LegendScale::new(&default_gradient()).unwrap();
    legend.update(1000.0);
    let strip = legend.gradient_strip();

    let png = create_png(&strip, STRIP_WIDTH as usize, STRIP_HEIGHT as usize).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (STRIP_WIDTH, STRIP_HEIGHT));
    assert_eq!(decoded.as_raw(), &strip);
}

#[test]
fn test_legend_with_explicit_zero_stop() {
    let stops = vec![
        ColorStop::new(0.0, "white"),
        ColorStop::new(0.5, "gray"),
        ColorStop::new(1.0, "black"),
    ];
    let mut legend = LegendScale::new(&stops).unwrap();
    legend.update(10.0);
    let values: Vec<i64> = legend.ticks().iter().map(|t| t.value).collect();
    assert_eq!(values, vec![0, 5, 10]);
    let xs: Vec<u32> = legend.ticks().iter().map(|t| t.x).collect();
    assert_eq!(xs, vec![0, 128, 256]);
}
