//! Pixel pipeline for density heatmaps.
//!
//! - Soft-disc intensity stamping with dirty-rectangle tracking
//! - Gradient palette with host premultiply detection
//! - Colorize pass from intensity to display RGBA
//! - PNG / data URL export
//! - Legend scale

pub mod bounds;
pub mod heat;
pub mod intensity;
pub mod legend;
pub mod palette;
pub mod png;
pub mod surface;

pub use bounds::{DirtyBounds, Rect};
pub use heat::{Region, Renderer};
pub use intensity::IntensitySurface;
pub use legend::{LegendScale, LegendTick, MaxObserver};
pub use palette::Palette;
pub use surface::{BufferSurface, PixmapSurface, Surface};
