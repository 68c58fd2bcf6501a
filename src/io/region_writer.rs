// src/io/region_writer.rs

use crate::partition::emitter::{RegionView, RegionWriter};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Schreibt jede Zelle nach `<root>/<cell>/<cell>.xyz`.
#[derive(Debug, Clone)]
pub struct XyzRegionWriter {
    root: PathBuf,
}

impl XyzRegionWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn region_path(&self, cell: usize) -> PathBuf {
        self.root.join(cell.to_string()).join(format!("{}.xyz", cell))
    }
}

impl RegionWriter for XyzRegionWriter {
    fn write_region(&mut self, region: &RegionView<'_>) -> io::Result<()> {
        let path = self.region_path(region.cell);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut writer = BufWriter::new(File::create(&path)?);
        for p in region.points() {
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }
        writer.flush()?;

        debug!("Wrote {} points to {}", region.len(), path.display());
        Ok(())
    }
}
