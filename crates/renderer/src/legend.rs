//! Legend scale for the heatmap gradient.
//!
//! The legend shows the configured stops evenly spaced on a 256 px strip,
//! each labelled with the count it stands for at the current maximum.

use heatmap_common::{resolve_stops, Color, ColorStop, HeatmapResult, LegendConfig};

use crate::palette::{Palette, PALETTE_SIZE};
use crate::png::create_png_with_text;

/// Legend strip width in pixels.
pub const STRIP_WIDTH: u32 = PALETTE_SIZE as u32;

/// Legend strip height in pixels: tick area on top, gradient below.
pub const STRIP_HEIGHT: u32 = 15;

/// Rows reserved for tick marks above the gradient.
const TICK_ROWS: u32 = 5;

/// Receives the running maximum whenever it changes.
pub trait MaxObserver {
    fn update(&mut self, max: f64);
}

/// One labelled tick on the legend strip.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendTick {
    /// Position of the stop in `[0, 1]`
    pub stop: f64,
    /// Horizontal pixel offset on the strip
    pub x: u32,
    /// Count this stop represents, rounded down
    pub value: i64,
}

/// Legend labels that follow the heatmap's maximum.
#[derive(Debug, Clone)]
pub struct LegendScale {
    title: String,
    stops: Vec<(f64, Color)>,
    max: f64,
    ticks: Vec<LegendTick>,
}

impl LegendScale {
    /// Sorted stops with a transparent stop at 0 unless one is configured.
    pub fn new(gradient: &[ColorStop]) -> HeatmapResult<Self> {
        let mut stops = resolve_stops(gradient)?;
        if stops[0].0 > 0.0 {
            stops.insert(0, (0.0, Color::TRANSPARENT));
        }
        let mut scale = Self {
            title: LegendConfig::default().title,
            stops,
            max: 1.0,
            ticks: Vec::new(),
        };
        scale.update(1.0);
        Ok(scale)
    }

    /// Scale for a configured legend.
    pub fn from_config(config: &LegendConfig, gradient: &[ColorStop]) -> HeatmapResult<Self> {
        Ok(Self::new(gradient)?.with_title(config.title.clone()))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn ticks(&self) -> &[LegendTick] {
        &self.ticks
    }

    /// Horizontal offset of the i-th stop when stops are spread evenly.
    fn tick_x(&self, index: usize) -> u32 {
        let last = self.stops.len().saturating_sub(1).max(1);
        (index as f64 / last as f64 * STRIP_WIDTH as f64) as u32
    }

    /// RGBA image of the strip: evenly spaced gradient with black ticks.
    pub fn gradient_strip(&self) -> Vec<u8> {
        let last = self.stops.len().saturating_sub(1).max(1) as f64;
        let even: Vec<(f64, Color)> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, &(_, color))| (i as f64 / last, color))
            .collect();
        let palette = Palette::from_resolved(&even);

        let width = STRIP_WIDTH as usize;
        let mut pixels = vec![0u8; width * STRIP_HEIGHT as usize * 4];
        for y in TICK_ROWS..STRIP_HEIGHT {
            for x in 0..STRIP_WIDTH {
                let offset = (y as usize * width + x as usize) * 4;
                pixels[offset..offset + 4].copy_from_slice(&palette.get(x as u8).to_array());
            }
        }

        let black = [0, 0, 0, 255];
        let mut put = |x: u32, y: u32| {
            let offset = (y as usize * width + x.min(STRIP_WIDTH - 1) as usize) * 4;
            pixels[offset..offset + 4].copy_from_slice(&black);
        };

        // Baseline under the ticks, then one tick per stop; the first spans the strip
        for x in 0..STRIP_WIDTH {
            put(x, TICK_ROWS - 1);
        }
        for i in 0..self.stops.len() {
            let rows = if i == 0 { STRIP_HEIGHT } else { TICK_ROWS };
            for y in 0..rows {
                put(self.tick_x(i), y);
            }
        }
        for y in 0..STRIP_HEIGHT {
            put(STRIP_WIDTH - 1, y);
        }

        pixels
    }

    /// The gradient strip as PNG, titled through a `tEXt` chunk.
    pub fn encode_png(&self) -> HeatmapResult<Vec<u8>> {
        create_png_with_text(
            &self.gradient_strip(),
            STRIP_WIDTH as usize,
            STRIP_HEIGHT as usize,
            &[("Title", &self.title)],
        )
    }
}

impl MaxObserver for LegendScale {
    fn update(&mut self, max: f64) {
        self.max = max;
        self.ticks = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, &(stop, _))| LegendTick {
                stop,
                x: self.tick_x(i),
                value: (max * stop).floor() as i64,
            })
            .collect();
    }
}
