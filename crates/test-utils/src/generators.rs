//! Point set generators for heatmap tests and benchmarks.
//!
//! Every generator is deterministic so that rendered output can be compared
//! across runs without a random number generator.

use heatmap_common::DataPoint;

/// Creates points on a regular lattice.
///
/// Points start at `(step / 2, step / 2)` and advance by `step` in both
/// directions while they stay inside `width` x `height`. Each point has
/// `count`.
///
/// # Example
///
/// ```
/// use test_utils::grid_points;
///
/// let points = grid_points(100, 50, 25, 1.0);
/// assert_eq!(points.len(), 8); // 4 columns x 2 rows
/// assert_eq!((points[0].x, points[0].y), (12, 12));
/// ```
pub fn grid_points(width: u32, height: u32, step: u32, count: f64) -> Vec<DataPoint> {
    let step = step.max(1);
    let mut points = Vec::new();
    let mut y = step / 2;
    while y < height {
        let mut x = step / 2;
        while x < width {
            points.push(DataPoint::new(x, y, count));
            x += step;
        }
        y += step;
    }
    points
}

/// Creates points scattered around a few cluster centers.
///
/// Centers and offsets come from a hash of `seed`, so the same arguments
/// always give the same points. Offsets shrink with distance so that
/// clusters look like hot spots. Counts range over `1..=max_count`.
///
/// # Arguments
///
/// * `width` - Surface width; every point satisfies `x < width`
/// * `height` - Surface height; every point satisfies `y < height`
/// * `clusters` - Number of hot spots
/// * `points` - Total number of points
/// * `max_count` - Largest count a point may get
/// * `seed` - Seed value for deterministic generation
pub fn clustered_points(
    width: u32,
    height: u32,
    clusters: u32,
    points: usize,
    max_count: u32,
    seed: u32,
) -> Vec<DataPoint> {
    let clusters = clusters.max(1);
    let width = width.max(1);
    let height = height.max(1);
    let spread = (width.min(height) / 8).max(1);

    let centers: Vec<(u32, u32)> = (0..clusters)
        .map(|c| {
            (
                simple_hash(c, 0, seed) % width,
                simple_hash(c, 1, seed) % height,
            )
        })
        .collect();

    (0..points as u32)
        .map(|i| {
            let (cx, cy) = centers[(i % clusters) as usize];
            let h = simple_hash(i, 2, seed);
            // Product of two uniform draws biases offsets toward the center
            let radius = (h % spread) * ((h >> 8) % spread) / spread;
            let dx = offset(radius, h >> 16);
            let dy = offset(radius, h >> 20);
            let x = (cx as i64 + dx).clamp(0, width as i64 - 1) as u32;
            let y = (cy as i64 + dy).clamp(0, height as i64 - 1) as u32;
            let count = 1 + simple_hash(i, 3, seed) % max_count.max(1);
            DataPoint::new(x, y, count as f64)
        })
        .collect()
}

/// Signed offset of up to `radius` selected by `bits`.
fn offset(radius: u32, bits: u32) -> i64 {
    let magnitude = (bits % (radius + 1)) as i64;
    if bits & 0x8 == 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_points() {
        let points = grid_points(100, 100, 50, 2.0);
        let coords: Vec<(u32, u32)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(25, 25), (75, 25), (25, 75), (75, 75)]);
        assert!(points.iter().all(|p| p.count == 2.0));
    }

    #[test]
    fn test_grid_points_zero_step() {
        assert_eq!(grid_points(3, 1, 0, 1.0).len(), 3);
    }

    #[test]
    fn test_clustered_points_in_bounds() {
        let points = clustered_points(200, 120, 4, 1000, 10, 42);
        assert_eq!(points.len(), 1000);
        for p in &points {
            assert!(p.x < 200 && p.y < 120);
            assert!(p.count >= 1.0 && p.count <= 10.0);
        }
    }

    #[test]
    fn test_clustered_points_deterministic() {
        let a = clustered_points(64, 64, 3, 50, 5, 7);
        let b = clustered_points(64, 64, 3, 50, 5, 7);
        let c = clustered_points(64, 64, 3, 50, 5, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
