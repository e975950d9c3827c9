//! A store and a renderer wired together.

use heatmap_common::{DataSet, HeatmapConfig, HeatmapResult};
use rand::Rng;
use renderer::{BufferSurface, LegendScale, Renderer, Surface};
use tracing::{debug, info};

use crate::random::RandomDataSet;
use crate::store::{PointStore, Target, Update};

/// Density heatmap over a host surface.
///
/// ```
/// use heatmap::Heatmap;
/// use heatmap_common::HeatmapConfig;
///
/// let config = HeatmapConfig { width: 200, height: 200, ..Default::default() };
/// let mut map: Heatmap = Heatmap::new(config).unwrap();
/// map.add_point(50, 50).unwrap();
/// assert!(map.export_png().unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
/// ```
pub struct Heatmap<S: Surface = BufferSurface> {
    config: HeatmapConfig,
    store: PointStore,
    renderer: Renderer<S>,
    legend: Option<LegendScale>,
    visible: bool,
}

impl<S: Surface> Heatmap<S> {
    /// Create a heatmap whose size comes entirely from the configuration.
    pub fn new(config: HeatmapConfig) -> HeatmapResult<Self> {
        Self::with_host_size(config, 0, 0)
    }

    /// Create a heatmap, taking any zero dimension from the host's size.
    pub fn with_host_size(config: HeatmapConfig, host_width: u32, host_height: u32) -> HeatmapResult<Self> {
        config.validate()?;
        let (width, height) = config.resolve_size(host_width, host_height)?;
        let renderer = Renderer::from_config(&config, width, height)?;
        let legend = match &config.legend {
            Some(legend) => Some(LegendScale::from_config(legend, &config.gradient)?),
            None => None,
        };

        info!(
            width,
            height,
            radius = config.radius,
            opacity_cap = renderer.opacity_cap(),
            legend = legend.is_some(),
            "Created heatmap"
        );

        Ok(Self {
            store: PointStore::new(config.max_on_clear),
            visible: config.visible,
            config,
            renderer,
            legend,
        })
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn legend(&self) -> Option<&LegendScale> {
        self.legend.as_ref()
    }

    /// Running maximum count.
    pub fn max(&self) -> f64 {
        self.store.max()
    }

    /// Add one occurrence at `(x, y)`.
    pub fn add_point(&mut self, x: i64, y: i64) -> HeatmapResult<Update> {
        self.add_weighted_point(x, y, 1.0)
    }

    /// Add `weight` occurrences at `(x, y)`.
    pub fn add_weighted_point(&mut self, x: i64, y: i64, weight: f64) -> HeatmapResult<Update> {
        let mut target = Target {
            renderer: &mut self.renderer,
            legend: self.legend.as_mut(),
        };
        self.store.add_point(&mut target, x, y, weight)
    }

    /// Replace all data and redraw.
    pub fn set_dataset(&mut self, dataset: &DataSet) -> HeatmapResult<()> {
        let mut target = Target {
            renderer: &mut self.renderer,
            legend: self.legend.as_mut(),
        };
        self.store.replace_all(&mut target, dataset)
    }

    pub fn export_dataset(&self) -> DataSet {
        self.store.export_all()
    }

    /// Replace the data with `points` random points sized to the surface.
    pub fn generate_random<R: Rng + ?Sized>(&mut self, points: usize, rng: &mut R) -> HeatmapResult<()> {
        let dataset = DataSet::random(points, self.renderer.width(), self.renderer.height(), rng);
        self.set_dataset(&dataset)
    }

    /// Remove every point and blank both surfaces.
    pub fn clear(&mut self) {
        let mut target = Target {
            renderer: &mut self.renderer,
            legend: self.legend.as_mut(),
        };
        self.store.clear(&mut target);
    }

    /// Reallocate the surfaces and redraw the current points on them.
    pub fn resize(&mut self, width: u32, height: u32) -> HeatmapResult<()> {
        self.renderer.resize(width, height)?;
        self.store.replay(&mut self.renderer)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the display surface. Returns the new state.
    pub fn toggle_display(&mut self) -> bool {
        self.visible = !self.visible;
        debug!(visible = self.visible, "Toggled display");
        self.visible
    }

    /// Display surface as PNG bytes.
    pub fn export_png(&self) -> HeatmapResult<Vec<u8>> {
        self.renderer.export_png()
    }

    /// Display surface as a `data:image/png;base64,...` URL.
    pub fn image_data_url(&self) -> HeatmapResult<String> {
        self.renderer.image_data_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::{DataPoint, LegendConfig, MaxResetPolicy};
    use renderer::MaxObserver;

    fn config(size: u32) -> HeatmapConfig {
        HeatmapConfig {
            width: size,
            height: size,
            radius: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_size_from_host() {
        let config = HeatmapConfig {
            width: 120,
            ..Default::default()
        };
        let map: Heatmap = Heatmap::with_host_size(config.clone(), 300, 80).unwrap();
        assert_eq!((map.renderer().width(), map.renderer().height()), (120, 80));

        assert!(Heatmap::<BufferSurface>::new(config).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config(50);
        config.gradient.clear();
        assert!(Heatmap::<BufferSurface>::new(config).is_err());
    }

    #[test]
    fn test_legend_follows_max() {
        let mut config = config(100);
        config.legend = Some(LegendConfig::default());
        let mut map: Heatmap = Heatmap::new(config).unwrap();

        map.add_weighted_point(10, 10, 200.0).unwrap();
        let legend = map.legend().unwrap();
        assert_eq!(legend.max(), 200.0);
        assert_eq!(legend.ticks().last().map(|t| t.value), Some(200));

        map.set_dataset(&DataSet::new(40.0, vec![DataPoint::new(1, 1, 4.0)]))
            .unwrap();
        assert_eq!(map.legend().unwrap().max(), 40.0);
    }

    #[test]
    fn test_legend_reset_on_clear() {
        let mut config = config(100);
        config.legend = Some(LegendConfig::default());
        config.max_on_clear = MaxResetPolicy::Reset;
        let mut map: Heatmap = Heatmap::new(config).unwrap();

        map.add_weighted_point(10, 10, 8.0).unwrap();
        map.clear();
        assert_eq!(map.max(), 1.0);
        assert_eq!(map.legend().unwrap().max(), 1.0);

        // A standalone scale behaves the same way
        let mut scale = LegendScale::new(&map.config().gradient).unwrap();
        scale.update(1.0);
        assert_eq!(scale.ticks(), map.legend().unwrap().ticks());
    }

    #[test]
    fn test_toggle_display() {
        let mut map: Heatmap = Heatmap::new(config(20)).unwrap();
        assert!(map.is_visible());
        assert!(!map.toggle_display());
        assert!(map.toggle_display());
    }

    #[test]
    fn test_resize_replays_points() {
        let mut map: Heatmap = Heatmap::new(config(100)).unwrap();
        map.add_weighted_point(30, 30, 3.0).unwrap();
        let before = map.renderer().display().read_pixel(30, 30).unwrap();

        map.resize(60, 60).unwrap();
        assert_eq!(map.renderer().width(), 60);
        assert_eq!(map.renderer().display().read_pixel(30, 30).unwrap(), before);
        assert_eq!(map.store().count(30, 30), 3.0);
    }
}
