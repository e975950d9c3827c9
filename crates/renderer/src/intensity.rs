//! Single-channel accumulation surface.
//!
//! Every point is stamped as a black disc whose edge is blurred like a
//! canvas drop shadow: alpha falls off as a Gaussian across the disc's rim.
//! Stamps are composited source-over, so intensity only ever grows until
//! the surface is cleared.

use crate::bounds::Rect;

/// Blur radius of the disc edge in pixels.
pub const SHADOW_BLUR: f64 = 15.0;

/// Alpha used for points with a zero count.
pub const BASELINE_ALPHA: f64 = 0.1;

/// Gaussian widths past the rim a stamp still writes to; the edge is below
/// half a level by then.
const EDGE_SIGMAS: f64 = 3.0;

/// Distance from a disc's center beyond which its blurred edge no longer
/// changes any pixel.
pub fn disc_reach(radius: f64, blur: f64) -> f64 {
    radius + EDGE_SIGMAS * blur_sigma(blur)
}

// Canvas shadows use a Gaussian with sigma = blur / 2
fn blur_sigma(blur: f64) -> f64 {
    (blur / 2.0).max(f64::EPSILON)
}

/// Per-pixel intensity (0-255), never displayed directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensitySurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl IntensitySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Intensities of row `y` between `left` (inclusive) and `right` (exclusive).
    pub fn row(&self, y: u32, left: u32, right: u32) -> &[u8] {
        let start = y as usize * self.width as usize;
        &self.data[start + left as usize..start + right as usize]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Composite a soft-edged disc of `alpha` centered on `(cx, cy)`.
    ///
    /// Only pixels inside `clip` are touched; `clip` must lie on the surface.
    pub fn fill_soft_disc(&mut self, cx: f64, cy: f64, radius: f64, blur: f64, alpha: f64, clip: Rect) {
        debug_assert!(clip.fits(self.width, self.height));
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }

        let sigma = blur_sigma(blur);
        let width = self.width as usize;

        for y in clip.top..clip.bottom {
            let dy = y as f64 + 0.5 - cy;
            let row = &mut self.data[y as usize * width..(y as usize + 1) * width];
            for x in clip.left..clip.right {
                let dx = x as f64 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt();
                let src = alpha * edge_coverage(dist, radius, sigma);
                if src <= 0.0 {
                    continue;
                }
                let dst = row[x as usize] as f64 / 255.0;
                let out = src + dst * (1.0 - src);
                row[x as usize] = (out * 255.0).round().min(255.0) as u8;
            }
        }
    }
}

/// Fraction of a blurred disc's alpha reaching distance `dist` from its center.
fn edge_coverage(dist: f64, radius: f64, sigma: f64) -> f64 {
    0.5 * erfc((dist - radius) / (sigma * std::f64::consts::SQRT_2))
}

/// Complementary error function (Abramowitz & Stegun 7.1.26, |err| < 1.5e-7).
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * z);
    let poly = t
        * (0.254829592 + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let r = poly * (-z * z).exp();
    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}
