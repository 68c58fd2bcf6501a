// ./src/main.rs
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pip_partition::{
    io::{BoundaryInput, PointCloud, XyzRegionWriter, write_cell_set},
    partition::{PartitionConfig, PartitionPipeline},
};

/// pip-partition - clips a LIDAR point cloud against urban cells
#[derive(Parser, Debug)]
#[command(name = "pip-partition", version, about)]
struct Cli {
    /// Boundary JSON with outer ring, building holes and cut lines
    #[arg(short = 'p', long, value_name = "FILE")]
    boundary: PathBuf,

    /// ASCII XYZ point cloud
    #[arg(short = 'l', long, value_name = "FILE")]
    points: PathBuf,

    /// Output directory; each cell is written to <DIR>/<cell>/<cell>.xyz
    #[arg(short = 'L', long, value_name = "DIR")]
    output: PathBuf,

    /// JSON configuration file, overridden by the flags below
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of classification workers (default: all cores)
    #[arg(long)]
    workers: Option<usize>,

    /// Progress granularity in percent
    #[arg(long)]
    progress_step: Option<u8>,

    /// Disable progress messages
    #[arg(long)]
    no_progress: bool,

    /// Abort classification after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Write the cell set as JSON
    #[arg(long, value_name = "FILE")]
    cells_out: Option<PathBuf>,

    /// Write a debug SVG of the cells
    #[arg(long, value_name = "FILE")]
    svg: Option<PathBuf>,

    /// Write the run report as JSON
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Cli {
    fn partition_config(&self) -> eyre::Result<PartitionConfig> {
        let mut config = match &self.config {
            Some(path) => PartitionConfig::from_json_file(path)?,
            None => PartitionConfig::default(),
        };

        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(step) = self.progress_step {
            config = config.with_progress_step(step);
        }
        if self.no_progress {
            config = config.with_report_progress(false);
        }
        if let Some(deadline_ms) = self.deadline_ms {
            config = config.with_deadline_ms(deadline_ms);
        }
        if let Some(svg) = &self.svg {
            config = config.with_svg_debug(svg);
        }

        config.validate()?;
        Ok(config)
    }
}

/// RUST_LOG hat Vorrang; fehlt die Variable oder ist sie ungültig, gilt `pip_partition=info`.
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("pip_partition=info"))
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    let cli = Cli::parse();
    let config = cli.partition_config()?;

    let boundary = BoundaryInput::from_json_file(&cli.boundary)?;
    let input = boundary.to_domain_input()?;
    let cloud = PointCloud::read_xyz(&cli.points)?;
    info!(
        "Boundary: {} outer vertices, {} holes, {} cut lines; {} points",
        input.outer.len(),
        input.holes.len(),
        input.cuts.len(),
        cloud.points().len()
    );

    let pipeline = PartitionPipeline::new(config);
    let mut writer = XyzRegionWriter::new(&cli.output);
    let outcome = pipeline.run(&input, &cloud, &mut writer)?;

    if let Some(path) = &cli.cells_out {
        write_cell_set(path, &outcome.cells, boundary.epsg)?;
    }
    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&outcome.report)?)?;
        info!("Report written to {}", path.display());
    }

    for failure in &outcome.report.emit.failures {
        warn!("Region {} was not written: {}", failure.cell, failure.message);
    }
    info!(
        "{} cells, {} regions written, {} points unassigned",
        outcome.cells.len(),
        outcome.report.emit.written.len(),
        outcome.report.unassigned_points
    );

    Ok(())
}
