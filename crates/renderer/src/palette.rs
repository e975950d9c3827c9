//! Intensity-to-color lookup table.
//!
//! The palette is a 256-sample linear gradient over the configured stops,
//! indexed by intensity. Interpolation happens on premultiplied colors the
//! way a canvas gradient does, so the ramp from the implicit transparent
//! stop keeps the first stop's hue instead of fading through black.

use heatmap_common::{resolve_stops, Color, ColorStop, HeatmapResult};

use crate::surface::Surface;

/// Number of palette entries, one per intensity level.
pub const PALETTE_SIZE: usize = 256;

/// Probe pixel: 25% red at 25% alpha.
const PROBE_PIXEL: [u8; 4] = [64, 0, 0, 64];

/// Accepted read-back range for the probe's red channel.
const PROBE_TOLERANCE: std::ops::RangeInclusive<u8> = 60..=70;

/// Precomputed 256-entry RGBA lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    /// Build a palette from gradient stops.
    ///
    /// A transparent stop is inserted at 0 unless one of the stops already
    /// sits there.
    pub fn from_stops(stops: &[ColorStop]) -> HeatmapResult<Self> {
        let mut resolved = resolve_stops(stops)?;
        if resolved[0].0 > 0.0 {
            resolved.insert(0, (0.0, Color::TRANSPARENT));
        }
        Ok(Self::from_resolved(&resolved))
    }

    /// Build a palette from parsed stops sorted by position.
    pub fn from_resolved(stops: &[(f64, Color)]) -> Self {
        let mut colors = [Color::TRANSPARENT; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate() {
            let t = (i as f64 + 0.5) / PALETTE_SIZE as f64;
            *color = sample(stops, t);
        }
        Self { colors }
    }

    pub fn get(&self, intensity: u8) -> Color {
        self.colors[intensity as usize]
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }
}

/// Color of a gradient at position `t`.
fn sample(stops: &[(f64, Color)], t: f64) -> Color {
    let Some(first) = stops.first() else {
        return Color::TRANSPARENT;
    };

    match stops.iter().position(|(pos, _)| *pos >= t) {
        Some(0) => first.1,
        Some(hi) => {
            let (lo_pos, lo) = stops[hi - 1];
            let (hi_pos, hi) = stops[hi];
            let span = hi_pos - lo_pos;
            if span <= 0.0 {
                return hi;
            }
            lerp_premultiplied(lo, hi, (t - lo_pos) / span)
        }
        None => stops[stops.len() - 1].1,
    }
}

fn lerp_premultiplied(lo: Color, hi: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let a_lo = lo.a as f64 / 255.0;
    let a_hi = hi.a as f64 / 255.0;
    let alpha = a_lo * (1.0 - t) + a_hi * t;
    if alpha <= 0.0 {
        return Color::TRANSPARENT;
    }

    let channel = |c_lo: u8, c_hi: u8| -> u8 {
        let premul = c_lo as f64 * a_lo * (1.0 - t) + c_hi as f64 * a_hi * t;
        (premul / alpha).round().clamp(0.0, 255.0) as u8
    };

    Color::new(
        channel(lo.r, hi.r),
        channel(lo.g, hi.g),
        channel(lo.b, hi.b),
        (alpha * 255.0).round() as u8,
    )
}

/// Check whether the host premultiplies written pixels.
///
/// Writes one semi-transparent pixel to a scratch surface and reads it back;
/// a host that mangles it needs the colorize pass to scale RGB by alpha.
pub fn probe_premultiply<S: Surface>() -> HeatmapResult<bool> {
    let mut scratch = S::with_size(1, 1)?;
    scratch.write_pixel(0, 0, PROBE_PIXEL)?;
    let [red, ..] = scratch.read_pixel(0, 0)?;
    Ok(!PROBE_TOLERANCE.contains(&red))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{BufferSurface, PixmapSurface};
    use heatmap_common::default_gradient;

    #[test]
    fn test_default_palette_shape() {
        let palette = Palette::from_stops(&default_gradient()).unwrap();

        // Below the first stop: blue hue with growing alpha
        let low = palette.get(10);
        assert_eq!((low.r, low.g, low.b), (0, 0, 255));
        assert!(low.a > 0 && low.a < 30);
        assert!(palette.get(100).a > low.a);

        // Between cyan (0.55) and green (0.65)
        let mid = palette.get(153);
        assert_eq!(mid.r, 0);
        assert_eq!(mid.g, 255);
        assert!(mid.b > 0 && mid.b < 255);

        // Last sample sits just short of the red stop
        let top = palette.get(255);
        assert_eq!((top.r, top.b, top.a), (255, 0, 255));
        assert!(top.g < 20);
    }

    #[test]
    fn test_explicit_zero_stop_is_kept() {
        let stops = vec![ColorStop::new(0.0, "white"), ColorStop::new(1.0, "black")];
        let palette = Palette::from_stops(&stops).unwrap();
        let first = palette.get(0);
        assert_eq!(first.a, 255);
        assert!(first.r > 250);
        assert!(palette.get(255).r < 5);
    }

    #[test]
    fn test_palette_is_deterministic() {
        let a = Palette::from_stops(&default_gradient()).unwrap();
        let b = Palette::from_stops(&default_gradient()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_stop_palette() {
        let palette = Palette::from_stops(&[ColorStop::new(1.0, "red")]).unwrap();
        let top = palette.get(255);
        assert_eq!((top.r, top.g, top.b), (255, 0, 0));
        assert!(top.a > 250);
    }

    #[test]
    fn test_malformed_stops_rejected() {
        assert!(Palette::from_stops(&[]).is_err());
        assert!(Palette::from_stops(&[ColorStop::new(2.0, "red")]).is_err());
    }

    #[test]
    fn test_probe() {
        assert!(!probe_premultiply::<BufferSurface>().unwrap());
        assert!(probe_premultiply::<PixmapSurface>().unwrap());
    }
}
