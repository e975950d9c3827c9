//! Heat accumulation and colorization.
//!
//! The renderer owns two equally sized surfaces:
//!
//! ```text
//!   stamp(x, y, count)          colorize(region)
//!  ───────────────────►  IntensitySurface  ───────────────────►  display (S)
//!   soft disc, alpha =     (0-255, hidden)    palette[intensity],
//!   count / max                               alpha = min(intensity, cap)
//! ```
//!
//! Stamps either colorize their own box right away or grow the dirty bounds
//! for a later `colorize(Region::Dirty)`.

use heatmap_common::{ColorStop, HeatmapConfig, HeatmapResult};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::bounds::{clamp_extent, extent_around, point_extent, DirtyBounds, Rect};
use crate::intensity::{disc_reach, IntensitySurface, BASELINE_ALPHA, SHADOW_BLUR};
use crate::palette::{probe_premultiply, Palette};
use crate::png::to_data_url;
use crate::surface::{BufferSurface, Surface};

/// Minimum pixels to benefit from a parallel colorize pass
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// Area to colorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// The whole surface.
    Full,
    /// Everything stamped since the last full or dirty pass.
    Dirty,
    /// An explicit rectangle, clamped to the surface. Leaves the dirty
    /// bounds pending.
    Area(Rect),
}

/// Two-surface heatmap renderer.
pub struct Renderer<S: Surface = BufferSurface> {
    radius: u32,
    intensity: IntensitySurface,
    display: S,
    palette: Palette,
    premultiply_correction: bool,
    opacity_cap: u8,
    dirty: DirtyBounds,
}

impl<S: Surface> Renderer<S> {
    /// Create a renderer and build its palette.
    pub fn new(
        width: u32,
        height: u32,
        radius: u32,
        gradient: &[ColorStop],
        opacity_cap: u8,
    ) -> HeatmapResult<Self> {
        let display = S::with_size(width, height)?;
        let mut renderer = Self {
            radius,
            intensity: IntensitySurface::new(width, height),
            display,
            palette: Palette::from_resolved(&[]),
            premultiply_correction: false,
            opacity_cap,
            dirty: DirtyBounds::empty(),
        };
        renderer.build_palette(gradient)?;
        Ok(renderer)
    }

    /// Create a renderer from a validated configuration and a resolved size.
    pub fn from_config(config: &HeatmapConfig, width: u32, height: u32) -> HeatmapResult<Self> {
        config.validate()?;
        Self::new(width, height, config.radius, &config.gradient, config.opacity_cap())
    }

    /// Rebuild the palette and re-probe the host's alpha handling.
    ///
    /// Already colorized pixels keep their old colors until recolorized.
    pub fn build_palette(&mut self, gradient: &[ColorStop]) -> HeatmapResult<()> {
        let palette = Palette::from_stops(gradient)?;
        let premultiply = probe_premultiply::<S>()?;
        debug!(
            stops = gradient.len(),
            premultiply_correction = premultiply,
            "Built palette"
        );
        self.palette = palette;
        self.premultiply_correction = premultiply;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.intensity.width()
    }

    pub fn height(&self) -> u32 {
        self.intensity.height()
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn opacity_cap(&self) -> u8 {
        self.opacity_cap
    }

    pub fn premultiply_correction(&self) -> bool {
        self.premultiply_correction
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn intensity(&self) -> &IntensitySurface {
        &self.intensity
    }

    pub fn display(&self) -> &S {
        &self.display
    }

    /// Pending dirty rectangle, clamped to the surface.
    pub fn dirty_bounds(&self) -> Option<Rect> {
        self.dirty.clamped(self.width(), self.height())
    }

    /// Box a point at `(x, y)` affects, clamped to the surface.
    pub fn point_bounds(&self, x: u32, y: u32) -> Option<Rect> {
        clamp_extent(point_extent(x, y, self.radius), self.width(), self.height())
    }

    /// Stamp one point's contribution onto the intensity surface.
    ///
    /// The disc's alpha is `count / max` (at most 1), or a small baseline
    /// for zero counts. Its blurred edge is written out to where it fades
    /// to nothing, past the point's box. With `colorize_now` the point's box
    /// is colorized immediately; otherwise it is added to the dirty bounds.
    pub fn stamp(&mut self, x: u32, y: u32, count: f64, max: f64, colorize_now: bool) -> HeatmapResult<()> {
        let alpha = if count > 0.0 {
            (count / max).min(1.0)
        } else {
            BASELINE_ALPHA
        };

        let radius = self.radius as f64;
        let reach = extent_around(x, y, disc_reach(radius, SHADOW_BLUR));
        let Some(clip) = clamp_extent(reach, self.width(), self.height()) else {
            trace!(x, y, "Point is off the surface");
            return Ok(());
        };

        self.intensity
            .fill_soft_disc(x as f64, y as f64, radius, SHADOW_BLUR, alpha, clip);
        trace!(x, y, count, alpha, "Stamped point");

        let extent = point_extent(x, y, self.radius);
        if colorize_now {
            match clamp_extent(extent, self.width(), self.height()) {
                Some(rect) => self.colorize(Region::Area(rect)),
                None => Ok(()),
            }
        } else {
            self.dirty.include(extent);
            Ok(())
        }
    }

    /// Map accumulated intensity to palette colors on the display surface.
    ///
    /// Pixels with zero intensity are left as they are. `Full` and `Dirty`
    /// passes reset the dirty bounds; an `Area` pass leaves them alone since
    /// pending stamps elsewhere are still uncolorized.
    pub fn colorize(&mut self, region: Region) -> HeatmapResult<()> {
        let (width, height) = (self.width(), self.height());
        let rect = match region {
            Region::Full => Some(Rect::full(width, height)),
            Region::Dirty => self.dirty.clamped(width, height),
            Region::Area(rect) => clamp_extent(
                [
                    rect.left as i64,
                    rect.top as i64,
                    rect.right as i64 - 1,
                    rect.bottom as i64 - 1,
                ],
                width,
                height,
            ),
        };

        if matches!(region, Region::Full | Region::Dirty) {
            self.dirty.reset();
        }

        let Some(rect) = rect else {
            return Ok(());
        };

        let mut block = self.display.read_rgba(rect)?;
        let row_len = rect.width() as usize * 4;
        let pass = ColorizePass {
            intensity: &self.intensity,
            palette: &self.palette,
            opacity_cap: self.opacity_cap,
            premultiply: self.premultiply_correction,
            rect,
        };

        if rect.area() >= PARALLEL_THRESHOLD {
            block
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(row, out)| pass.colorize_row(row, out));
        } else {
            block
                .chunks_mut(row_len)
                .enumerate()
                .for_each(|(row, out)| pass.colorize_row(row, out));
        }

        self.display.write_rgba(rect, &block)?;
        debug!(?region, ?rect, "Colorized");
        Ok(())
    }

    /// Reset both surfaces and the dirty bounds.
    pub fn clear(&mut self) {
        self.intensity.clear();
        self.display.clear();
        self.dirty.reset();
    }

    /// Reallocate both surfaces. Accumulated intensity is lost.
    pub fn resize(&mut self, width: u32, height: u32) -> HeatmapResult<()> {
        self.display = S::with_size(width, height)?;
        self.intensity = IntensitySurface::new(width, height);
        self.dirty.reset();
        debug!(width, height, "Resized surfaces");
        Ok(())
    }

    /// Encode the display surface as PNG.
    pub fn export_png(&self) -> HeatmapResult<Vec<u8>> {
        self.display.encode_png()
    }

    /// Display surface as a `data:image/png;base64,...` URL.
    pub fn image_data_url(&self) -> HeatmapResult<String> {
        Ok(to_data_url(&self.export_png()?))
    }
}

/// Shared state for colorizing the rows of one block.
struct ColorizePass<'a> {
    intensity: &'a IntensitySurface,
    palette: &'a Palette,
    opacity_cap: u8,
    premultiply: bool,
    rect: Rect,
}

impl ColorizePass<'_> {
    fn colorize_row(&self, row: usize, out: &mut [u8]) {
        let y = self.rect.top + row as u32;
        let src = self.intensity.row(y, self.rect.left, self.rect.right);

        for (px, &level) in out.chunks_exact_mut(4).zip(src) {
            if level == 0 {
                continue;
            }

            let color = self.palette.get(level);
            let alpha = level.min(self.opacity_cap);
            let mut rgb = [color.r, color.g, color.b];
            if self.premultiply {
                // Host multiplies by alpha again on read; hand it pre-scaled values
                for c in &mut rgb {
                    *c = ((*c as u32 * alpha as u32 + 127) / 255) as u8;
                }
            }

            px[..3].copy_from_slice(&rgb);
            px[3] = alpha;
        }
    }
}
