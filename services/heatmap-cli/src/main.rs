//! Heatmap renderer CLI.
//!
//! Loads a configuration and a dataset (or generates random points), draws
//! the heatmap and writes it as PNG, data URL or re-exported dataset JSON.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use heatmap_common::HeatmapConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use render::{parse_point, PointArg, RenderJob};

#[derive(Parser, Debug)]
#[command(name = "heatmap-cli")]
#[command(about = "Render density heatmaps from weighted points")]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset to load: {"max": .., "data": [{"x": .., "y": .., "count": ..}]}
    #[arg(short, long, conflicts_with = "random")]
    dataset: Option<PathBuf>,

    /// Generate this many random points instead of loading a dataset
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, requires = "random")]
    seed: Option<u64>,

    /// Extra point as x,y or x,y,weight (repeatable)
    #[arg(short, long = "point", value_parser = parse_point)]
    points: Vec<PointArg>,

    /// PNG output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the image as a data URL on stdout
    #[arg(long)]
    data_url: bool,

    /// Write the final dataset as JSON
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write the legend gradient strip as PNG
    #[arg(long)]
    legend: Option<PathBuf>,

    /// Surface width override
    #[arg(long)]
    width: Option<u32>,

    /// Surface height override
    #[arg(long)]
    height: Option<u32>,

    /// Stamping radius override
    #[arg(long)]
    radius: Option<u32>,

    /// Maximum opacity in percent
    #[arg(long)]
    opacity: Option<f32>,

    /// Host size used when the configuration leaves width or height at 0
    #[arg(long, default_value_t = 800)]
    host_width: u32,

    #[arg(long, default_value_t = 600)]
    host_height: u32,

    /// Render even when the configuration hides the heatmap
    #[arg(long)]
    force: bool,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Configuration from file (or defaults), then `HEATMAP_*` variables,
    /// then command-line overrides.
    fn load_config(&self) -> Result<HeatmapConfig> {
        let mut config = match &self.config {
            Some(path) => HeatmapConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => HeatmapConfig::default(),
        };
        config.apply_env();

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(opacity) = self.opacity {
            config.opacity = Some(opacity);
        }

        config.validate()?;
        Ok(config)
    }

    fn into_job(self) -> Result<RenderJob> {
        Ok(RenderJob {
            config: self.load_config()?,
            host_size: (self.host_width, self.host_height),
            dataset: self.dataset,
            random: self.random,
            seed: self.seed,
            points: self.points,
            output: self.output,
            data_url: self.data_url,
            export: self.export,
            legend: self.legend,
            force: self.force,
        })
    }
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so --data-url output stays clean
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    info!("Starting heatmap renderer");

    let job = args.into_job()?;
    info!(
        radius = job.config.radius,
        width = job.config.width,
        height = job.config.height,
        "Loaded configuration"
    );

    let outcome = render::run(&job)?;
    if let Some(url) = &outcome.data_url {
        println!("{}", url);
    }

    info!(
        cells = outcome.cells,
        max = outcome.max,
        replays = outcome.replays,
        ignored = outcome.ignored,
        files = outcome.written.len(),
        "Done"
    );
    Ok(())
}
