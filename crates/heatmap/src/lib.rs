//! Density heatmaps from weighted 2-D points.
//!
//! [`PointStore`] keeps the counts and the running maximum and decides when
//! a full replay is needed; [`Heatmap`] binds it to a [`renderer::Renderer`]
//! and an optional legend.

pub mod heatmap;
pub mod random;
pub mod store;

pub use heatmap::Heatmap;
pub use random::RandomDataSet;
pub use store::{HeatSink, PointStore, Target, Update, INITIAL_MAX};

pub use heatmap_common::{DataPoint, DataSet, HeatmapConfig, HeatmapError, HeatmapResult};
pub use renderer::{BufferSurface, PixmapSurface, Surface};
