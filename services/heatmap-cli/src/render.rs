//! One rendering run: load data, draw it, write the results.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use heatmap::{DataSet, Heatmap, Update};
use heatmap_common::HeatmapConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// A single `x,y[,weight]` point from the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointArg {
    pub x: i64,
    pub y: i64,
    pub weight: f64,
}

/// Parse `x,y` or `x,y,weight`.
pub fn parse_point(s: &str) -> Result<PointArg, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let coord = |v: &str| v.parse::<i64>().map_err(|e| format!("bad coordinate '{}': {}", v, e));
    match parts.as_slice() {
        [x, y] => Ok(PointArg {
            x: coord(x)?,
            y: coord(y)?,
            weight: 1.0,
        }),
        [x, y, w] => Ok(PointArg {
            x: coord(x)?,
            y: coord(y)?,
            weight: w.parse().map_err(|e| format!("bad weight '{}': {}", w, e))?,
        }),
        _ => Err(format!("expected x,y or x,y,weight, got '{}'", s)),
    }
}

/// Everything one run needs, resolved from arguments and environment.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub config: HeatmapConfig,
    /// Size used for any dimension the configuration leaves at 0
    pub host_size: (u32, u32),
    pub dataset: Option<PathBuf>,
    pub random: Option<usize>,
    pub seed: Option<u64>,
    pub points: Vec<PointArg>,
    pub output: Option<PathBuf>,
    pub data_url: bool,
    pub export: Option<PathBuf>,
    pub legend: Option<PathBuf>,
    pub force: bool,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct Outcome {
    pub cells: usize,
    pub max: f64,
    pub replays: usize,
    pub ignored: usize,
    pub written: Vec<PathBuf>,
    pub data_url: Option<String>,
}

pub fn run(job: &RenderJob) -> Result<Outcome> {
    let (host_width, host_height) = job.host_size;
    let mut map: Heatmap = Heatmap::with_host_size(job.config.clone(), host_width, host_height)
        .context("Failed to create heatmap")?;

    let wants_image = job.output.is_some() || job.data_url || job.legend.is_some();
    if wants_image && !map.is_visible() && !job.force {
        bail!("heatmap is hidden (visible = false); pass --force to render it anyway");
    }

    if let Some(path) = &job.dataset {
        let dataset = DataSet::from_file(path)
            .with_context(|| format!("Failed to load dataset {}", path.display()))?;
        info!(path = %path.display(), points = dataset.data.len(), max = dataset.max, "Loaded dataset");
        map.set_dataset(&dataset)?;
    }

    if let Some(points) = job.random {
        let mut rng = match job.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        map.generate_random(points, &mut rng)?;
        info!(points, max = map.max(), "Generated random dataset");
    }

    let mut outcome = Outcome::default();
    for point in &job.points {
        match map.add_weighted_point(point.x, point.y, point.weight)? {
            Update::Replayed => outcome.replays += 1,
            Update::Ignored => outcome.ignored += 1,
            Update::Incremental => {}
        }
    }
    debug!(
        added = job.points.len(),
        replays = outcome.replays,
        ignored = outcome.ignored,
        "Applied command-line points"
    );

    if let Some(path) = &job.output {
        std::fs::write(path, map.export_png()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote heatmap PNG");
        outcome.written.push(path.clone());
    }

    if job.data_url {
        outcome.data_url = Some(map.image_data_url()?);
    }

    if let Some(path) = &job.legend {
        let Some(legend) = map.legend() else {
            bail!("no legend configured; add a \"legend\" section to the configuration");
        };
        std::fs::write(path, legend.encode_png()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        let labels: Vec<i64> = legend.ticks().iter().map(|t| t.value).collect();
        info!(path = %path.display(), title = legend.title(), ?labels, "Wrote legend strip");
        outcome.written.push(path.clone());
    }

    if let Some(path) = &job.export {
        std::fs::write(path, map.export_dataset().to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Exported dataset");
        outcome.written.push(path.clone());
    }

    outcome.cells = map.store().len();
    outcome.max = map.max();
    Ok(outcome)
}
