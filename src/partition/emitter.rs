// src/partition/emitter.rs

use crate::math::types::Point3D;
use crate::partition::{
    assignment::AssignmentTable,
    error::{PartitionError, PartitionResult},
    source::PointSource,
};
use serde::Serialize;
use std::io;
use tracing::{error, info};

/// Punkte einer Zelle, wie sie an den Writer übergeben werden
pub struct RegionView<'a> {
    pub cell: usize,
    /// Aufsteigende Punktindizes
    pub indices: &'a [usize],
    pub source: &'a dyn PointSource,
}

impl RegionView<'_> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.indices.iter().map(|&i| self.source.point(i))
    }
}

/// Ausgabe-Kollaborateur: wird einmal pro nichtleerer Zelle aufgerufen.
pub trait RegionWriter {
    fn write_region(&mut self, region: &RegionView<'_>) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenRegion {
    pub cell: usize,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriterFailure {
    pub cell: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmitReport {
    pub written: Vec<WrittenRegion>,
    pub empty_cells: Vec<usize>,
    pub failures: Vec<WriterFailure>,
    pub unassigned: usize,
}

impl EmitReport {
    pub fn written_points(&self) -> usize {
        self.written.iter().map(|w| w.points).sum()
    }
}

/// Gruppiert die Zuordnung nach Zellen und übergibt jede nichtleere Gruppe dem Writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionEmitter;

impl PartitionEmitter {
    pub fn new() -> Self {
        Self
    }

    pub fn emit<P, W>(
        &self,
        table: &AssignmentTable,
        cell_count: usize,
        source: &P,
        writer: &mut W,
    ) -> PartitionResult<EmitReport>
    where
        P: PointSource,
        W: RegionWriter + ?Sized,
    {
        if table.len() != source.len() {
            return Err(PartitionError::InvalidConfiguration {
                message: format!(
                    "Assignment table has {} slots but the point cloud has {} points",
                    table.len(),
                    source.len()
                ),
            });
        }

        let buckets = table.buckets(cell_count);
        let mut report = EmitReport {
            unassigned: table.unassigned_count(),
            ..Default::default()
        };

        for cell in 0..cell_count {
            let indices = buckets.bucket(cell);
            if indices.is_empty() {
                info!("Region {} has no points.", cell);
                report.empty_cells.push(cell);
                continue;
            }

            let view = RegionView {
                cell,
                indices,
                source,
            };
            match writer.write_region(&view) {
                Ok(()) => report.written.push(WrittenRegion {
                    cell,
                    points: indices.len(),
                }),
                Err(e) => {
                    error!("Failed to write region {}: {}", cell, e);
                    report.failures.push(WriterFailure {
                        cell,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Emitted {} regions ({} points), {} empty, {} failed, {} points unassigned",
            report.written.len(),
            report.written_points(),
            report.empty_cells.len(),
            report.failures.len(),
            report.unassigned
        );
        Ok(report)
    }
}
