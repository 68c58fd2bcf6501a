// src/partition/pipeline.rs

use crate::debug::svg::write_cell_svg;
use crate::math::{
    error::MathError,
    geometry::{
        mesh::DomainMesh,
        polygon::CellPolygon,
        triangulation::{DomainInput, SpadeTriangulator, TriangulationOracle},
    },
};
use crate::partition::{
    config::PartitionConfig,
    decomposer::{Decomposition, DecompositionReport, RegionDecomposer},
    emitter::{EmitReport, PartitionEmitter, RegionWriter},
    error::PartitionResult,
    progress::ProgressSink,
    scheduler::PartitionScheduler,
    source::PointSource,
};
use serde::Serialize;
use std::sync::{Arc, atomic::AtomicBool};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Maximale Anzahl Punkte in der Debug-SVG
const SVG_POINT_SAMPLE: usize = 2000;

/// Laufzeit pro Phase in Millisekunden
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub triangulation_ms: f64,
    pub decomposition_ms: f64,
    pub classification_ms: f64,
    pub emission_ms: f64,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Gesamtbericht eines Laufs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionReport {
    pub decomposition: DecompositionReport,
    pub total_points: usize,
    pub assigned_points: usize,
    pub unassigned_points: usize,
    pub emit: EmitReport,
    pub timings: PhaseTimings,
}

/// Ergebnis eines Laufs: die Zellmenge (für den Boundary-Writer) und der Bericht
#[derive(Debug, Clone, Default)]
pub struct PartitionOutcome {
    pub cells: Vec<CellPolygon>,
    pub report: PartitionReport,
}

/// Verkettet Triangulation, Zerlegung, Klassifikation und Ausgabe.
///
/// Die Zerlegung läuft vollständig single-threaded vor der Klassifikation; die
/// Ausgabe beginnt erst, wenn alle Worker fertig sind.
pub struct PartitionPipeline<O = SpadeTriangulator> {
    oracle: O,
    decomposer: RegionDecomposer,
    scheduler: PartitionScheduler,
    emitter: PartitionEmitter,
}

impl PartitionPipeline<SpadeTriangulator> {
    pub fn new(config: PartitionConfig) -> Self {
        Self::with_oracle(config, SpadeTriangulator::new())
    }
}

impl<O: TriangulationOracle> PartitionPipeline<O> {
    pub fn with_oracle(config: PartitionConfig, oracle: O) -> Self {
        Self {
            oracle,
            decomposer: RegionDecomposer::new(),
            scheduler: PartitionScheduler::new(config),
            emitter: PartitionEmitter::new(),
        }
    }

    pub fn with_decomposer(mut self, decomposer: RegionDecomposer) -> Self {
        self.decomposer = decomposer;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.scheduler = self.scheduler.with_cancel_flag(flag);
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.scheduler = self.scheduler.with_progress_sink(sink);
        self
    }

    pub fn config(&self) -> &PartitionConfig {
        self.scheduler.config()
    }

    /// Trianguliert die Domäne und zerlegt sie in die geordnete Zellmenge.
    ///
    /// Eine Domäne ohne Dreiecke (zu wenige Vertices, keine Fläche) ergibt eine
    /// leere Zellmenge. Ein Skelett aus der Eingabe ergänzt das des Decomposers.
    pub fn decompose(&self, input: &DomainInput) -> PartitionResult<(Decomposition, PhaseTimings)> {
        let started = Instant::now();
        let mesh = match self.oracle.triangulate(input) {
            Ok(mesh) => mesh,
            Err(
                e @ (MathError::InsufficientPoints { .. } | MathError::GeometricFailure { .. }),
            ) => {
                warn!("Domain has no triangles, continuing with an empty cell set: {}", e);
                DomainMesh::default()
            }
            Err(e) => return Err(e.into()),
        };
        let triangulated = Instant::now();
        let decomposition = if input.skeleton.is_empty() {
            self.decomposer.decompose(&mesh)
        } else {
            self.decomposer
                .clone()
                .with_skeleton(&input.skeleton)
                .decompose(&mesh)
        };

        let timings = PhaseTimings {
            triangulation_ms: millis(triangulated - started),
            decomposition_ms: millis(triangulated.elapsed()),
            ..Default::default()
        };
        Ok((decomposition, timings))
    }

    /// Kompletter Lauf von der Domäne bis zu den geschriebenen Regionen.
    pub fn run<P, W>(
        &self,
        input: &DomainInput,
        points: &P,
        writer: &mut W,
    ) -> PartitionResult<PartitionOutcome>
    where
        P: PointSource,
        W: RegionWriter + ?Sized,
    {
        self.config().validate()?;
        let (decomposition, mut timings) = self.decompose(input)?;

        if let Some(path) = &self.config().svg_debug {
            let sample: Vec<_> = (0..points.len().min(SVG_POINT_SAMPLE))
                .map(|i| points.point(i))
                .collect();
            if let Err(e) = write_cell_svg(
                path,
                &decomposition.cells,
                Some(&decomposition.dual_graph),
                &sample,
            ) {
                warn!("Could not write debug SVG {}: {}", path.display(), e);
            }
        }

        let cells = decomposition.cells;
        let started = Instant::now();
        let table = self.scheduler.classify(&cells, points)?;
        timings.classification_ms = millis(started.elapsed());

        let started = Instant::now();
        let emit = self.emitter.emit(&table, cells.len(), points, writer)?;
        timings.emission_ms = millis(started.elapsed());

        let report = PartitionReport {
            decomposition: decomposition.report,
            total_points: table.len(),
            assigned_points: table.assigned_count(),
            unassigned_points: table.unassigned_count(),
            emit,
            timings,
        };

        info!(
            "Partitioned {} points into {} cells ({} unassigned) in {:.1} ms",
            report.total_points,
            cells.len(),
            report.unassigned_points,
            report.timings.triangulation_ms
                + report.timings.decomposition_ms
                + report.timings.classification_ms
                + report.timings.emission_ms
        );

        Ok(PartitionOutcome { cells, report })
    }
}
