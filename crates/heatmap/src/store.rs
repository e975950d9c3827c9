//! Sparse point grid with a running maximum.
//!
//! The store decides between the two rendering paths. A point that keeps the
//! maximum where it was is stamped and colorized on its own; a point that
//! raises it makes every earlier stamp stale, so the whole grid is replayed.

use std::collections::BTreeMap;

use heatmap_common::{DataPoint, DataSet, HeatmapError, HeatmapResult, MaxResetPolicy};
use renderer::{LegendScale, MaxObserver, Region, Renderer, Surface};
use tracing::{debug, trace, warn};

/// Maximum of an empty store.
pub const INITIAL_MAX: f64 = 1.0;

/// Receiver of the store's drawing commands.
pub trait HeatSink {
    /// Reset both surfaces.
    fn clear(&mut self);

    /// Stamp one cell. With `colorize_now` its box is colorized right away.
    fn stamp(&mut self, x: u32, y: u32, count: f64, max: f64, colorize_now: bool) -> HeatmapResult<()>;

    /// Colorize the whole surface after a replay.
    fn colorize_all(&mut self) -> HeatmapResult<()>;

    /// Called whenever the running maximum changes.
    fn max_changed(&mut self, _max: f64) {}
}

impl<S: Surface> HeatSink for Renderer<S> {
    fn clear(&mut self) {
        Renderer::clear(self);
    }

    fn stamp(&mut self, x: u32, y: u32, count: f64, max: f64, colorize_now: bool) -> HeatmapResult<()> {
        Renderer::stamp(self, x, y, count, max, colorize_now)
    }

    fn colorize_all(&mut self) -> HeatmapResult<()> {
        self.colorize(Region::Full)
    }
}

/// A renderer plus an optional legend that follows the maximum.
pub struct Target<'a, S: Surface> {
    pub renderer: &'a mut Renderer<S>,
    pub legend: Option<&'a mut LegendScale>,
}

impl<S: Surface> HeatSink for Target<'_, S> {
    fn clear(&mut self) {
        self.renderer.clear();
    }

    fn stamp(&mut self, x: u32, y: u32, count: f64, max: f64, colorize_now: bool) -> HeatmapResult<()> {
        self.renderer.stamp(x, y, count, max, colorize_now)
    }

    fn colorize_all(&mut self) -> HeatmapResult<()> {
        self.renderer.colorize(Region::Full)
    }

    fn max_changed(&mut self, max: f64) {
        if let Some(legend) = self.legend.as_deref_mut() {
            legend.update(max);
        }
    }
}

/// Rendering path taken by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// Coordinates were negative or out of range; nothing changed.
    Ignored,
    /// One point was stamped and its box colorized.
    Incremental,
    /// The maximum rose; surfaces were cleared and every point replayed.
    Replayed,
}

/// Occurrence counts keyed by `(x, y)`.
///
/// Cells iterate in `(x, y)` order, so two replays of the same grid stamp
/// in the same order and produce identical pixels.
#[derive(Debug, Clone)]
pub struct PointStore {
    grid: BTreeMap<(u32, u32), f64>,
    max: f64,
    policy: MaxResetPolicy,
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new(MaxResetPolicy::default())
    }
}

impl PointStore {
    pub fn new(policy: MaxResetPolicy) -> Self {
        Self {
            grid: BTreeMap::new(),
            max: INITIAL_MAX,
            policy,
        }
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn policy(&self) -> MaxResetPolicy {
        self.policy
    }

    /// Count at a cell; absent cells count 0.
    pub fn count(&self, x: u32, y: u32) -> f64 {
        self.grid.get(&(x, y)).copied().unwrap_or(0.0)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Occupied cells in `(x, y)` order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, f64)> + '_ {
        self.grid.iter().map(|(&(x, y), &count)| (x, y, count))
    }

    /// Add `weight` to the cell at `(x, y)`.
    ///
    /// Negative coordinates and zero weights are silently ignored. A weight
    /// that is negative or not finite is rejected before anything is touched.
    pub fn add_point<H: HeatSink>(
        &mut self,
        sink: &mut H,
        x: i64,
        y: i64,
        weight: f64,
    ) -> HeatmapResult<Update> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(HeatmapError::InvalidInput(format!(
                "point weight must be a non-negative number, got {}",
                weight
            )));
        }

        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            trace!(x, y, "Ignoring point outside the grid");
            return Ok(Update::Ignored);
        };
        if weight == 0.0 {
            trace!(x, y, "Ignoring zero-weight point");
            return Ok(Update::Ignored);
        }

        let cell = self.grid.entry((x, y)).or_insert(0.0);
        *cell += weight;
        let count = *cell;

        if count > self.max {
            self.max = count;
            sink.max_changed(count);
            self.replay(sink)?;
            return Ok(Update::Replayed);
        }

        sink.stamp(x, y, count, self.max, true)?;
        Ok(Update::Incremental)
    }

    /// Replace the grid and maximum with a dataset and redraw everything.
    ///
    /// The declared `max` is trusted even when a count exceeds it; those
    /// points simply saturate. Repeated coordinates are summed.
    pub fn replace_all<H: HeatSink>(&mut self, sink: &mut H, dataset: &DataSet) -> HeatmapResult<()> {
        dataset.validate()?;

        if let Some(largest) = dataset.largest_count() {
            if largest > dataset.max {
                warn!(
                    declared = dataset.max,
                    largest, "Dataset max is below its largest count"
                );
            }
        }

        let mut grid = BTreeMap::new();
        for point in &dataset.data {
            *grid.entry((point.x, point.y)).or_insert(0.0) += point.count;
        }

        self.grid = grid;
        self.max = dataset.max;
        sink.max_changed(self.max);
        self.replay(sink)
    }

    /// Snapshot of the store in interchange form, absent cells omitted.
    pub fn export_all(&self) -> DataSet {
        let data = self
            .cells()
            .map(|(x, y, count)| DataPoint::new(x, y, count))
            .collect();
        DataSet::new(self.max, data)
    }

    /// Empty the grid and both surfaces.
    ///
    /// Whether the maximum returns to 1 depends on the reset policy.
    pub fn clear<H: HeatSink>(&mut self, sink: &mut H) {
        self.grid.clear();
        if self.policy == MaxResetPolicy::Reset && self.max != INITIAL_MAX {
            self.max = INITIAL_MAX;
            sink.max_changed(INITIAL_MAX);
        }
        sink.clear();
        debug!(max = self.max, policy = ?self.policy, "Cleared store");
    }

    /// Clear the sink and stamp every cell, then colorize once.
    pub fn replay<H: HeatSink>(&self, sink: &mut H) -> HeatmapResult<()> {
        sink.clear();
        for (&(x, y), &count) in &self.grid {
            sink.stamp(x, y, count, self.max, false)?;
        }
        sink.colorize_all()?;
        debug!(points = self.grid.len(), max = self.max, "Replayed store");
        Ok(())
    }
}
