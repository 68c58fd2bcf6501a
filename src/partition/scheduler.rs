// src/partition/scheduler.rs

use crate::math::{
    geometry::polygon::{CellPolygon, PolygonProperties},
    types::Point3D,
};
use crate::partition::{
    assignment::{AssignmentTable, UNASSIGNED},
    config::PartitionConfig,
    error::{PartitionError, PartitionResult},
    progress::{ProgressSink, ProgressTracker, TracingProgressSink},
    source::PointSource,
};
use rayon::prelude::*;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU8, Ordering},
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Punkte, die ein Worker lokal sammelt, bevor er den Fortschrittszähler erhöht
const PROGRESS_BATCH: usize = 1024;

const STOP_NONE: u8 = 0;
const STOP_CANCELLED: u8 = 1;
const STOP_DEADLINE: u8 = 2;

/// Index der ersten Zelle (in Zellreihenfolge), die den Punkt enthält.
///
/// Niedrigster Index gewinnt; das ist die Tie-Break-Regel für überlappende Zellen.
#[inline]
pub fn first_match(cells: &[CellPolygon], point: &Point3D) -> Option<usize> {
    cells.iter().position(|cell| cell.contains_point(point))
}

/// Parallele Klassifikation einer Punktwolke gegen die Zellmenge.
///
/// Der Indexbereich wird statisch und ordnungserhaltend in zusammenhängende
/// Blöcke pro Worker geteilt. Jeder Worker schreibt nur die Slots seines Blocks.
pub struct PartitionScheduler {
    config: PartitionConfig,
    cancel: Option<Arc<AtomicBool>>,
    sink: Arc<dyn ProgressSink>,
}

impl PartitionScheduler {
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            config,
            cancel: None,
            sink: Arc::new(TracingProgressSink),
        }
    }

    /// Kooperativer Abbruch: wird alle `cancel_check_interval` Punkte pro Worker geprüft
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Erzeugt die Zuordnungstabelle.
    ///
    /// Entartete Zellen treffen nie, eine leere Zellmenge ergibt eine vollständig
    /// unzugeordnete Tabelle, eine leere Punktwolke eine leere Tabelle.
    pub fn classify<P>(&self, cells: &[CellPolygon], points: &P) -> PartitionResult<AssignmentTable>
    where
        P: PointSource + ?Sized,
    {
        self.config.validate()?;
        if cells.len() >= UNASSIGNED as usize {
            return Err(PartitionError::InvalidConfiguration {
                message: format!("Too many cells for the assignment table: {}", cells.len()),
            });
        }

        for (index, cell) in cells.iter().enumerate() {
            if cell.is_degenerate() {
                warn!(
                    "Cell {} is degenerate ({} vertices) and will never match a point",
                    index,
                    cell.len()
                );
            }
        }

        let total = points.len();
        if total == 0 {
            debug!("Point cloud is empty, nothing to classify");
            return Ok(AssignmentTable::unassigned(0));
        }
        if cells.is_empty() {
            info!("Cell set is empty, all {} points stay unassigned", total);
            return Ok(AssignmentTable::unassigned(total));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers.unwrap_or(0))
            .build()
            .map_err(|e| PartitionError::ThreadPool {
                message: e.to_string(),
            })?;
        let workers = pool.current_num_threads().max(1);
        let chunk_size = total.div_ceil(workers);

        info!(
            "Classifying {} points against {} cells with {} workers",
            total,
            cells.len(),
            workers
        );

        let sink = self.config.report_progress.then_some(self.sink.as_ref());
        let tracker = ProgressTracker::new(total, self.config.progress_step, sink);
        let stop = AtomicU8::new(STOP_NONE);
        let deadline = self.config.deadline().map(|d| Instant::now() + d);
        let interval = self.config.cancel_check_interval;

        let mut slots = vec![UNASSIGNED; total];
        let outcome = pool.install(|| {
            slots
                .par_chunks_mut(chunk_size)
                .enumerate()
                .try_for_each(|(chunk_index, chunk)| {
                    let base = chunk_index * chunk_size;
                    let mut pending = 0usize;

                    for (offset, slot) in chunk.iter_mut().enumerate() {
                        if offset % interval == 0 && self.should_stop(&stop, deadline) {
                            tracker.advance(pending);
                            return Err(());
                        }

                        let point = points.point(base + offset);
                        *slot = first_match(cells, &point).map_or(UNASSIGNED, |c| c as u32);

                        pending += 1;
                        if pending == PROGRESS_BATCH {
                            tracker.advance(pending);
                            pending = 0;
                        }
                    }

                    tracker.advance(pending);
                    Ok(())
                })
        });

        if outcome.is_err() {
            let processed = tracker.processed();
            return Err(match stop.load(Ordering::Acquire) {
                STOP_DEADLINE => {
                    warn!("Deadline exceeded after {} of {} points", processed, total);
                    PartitionError::DeadlineExceeded { processed, total }
                }
                _ => {
                    warn!("Classification cancelled after {} of {} points", processed, total);
                    PartitionError::Cancelled { processed, total }
                }
            });
        }

        let table = AssignmentTable::from_slots(slots);
        info!(
            "Classification finished: {} assigned, {} unassigned",
            table.assigned_count(),
            table.unassigned_count()
        );
        Ok(table)
    }

    /// Prüft Abbruchflag und Deadline. Der erste Worker, der einen Grund findet,
    /// legt ihn fest; alle anderen sehen danach nur noch den gesetzten Grund.
    fn should_stop(&self, stop: &AtomicU8, deadline: Option<Instant>) -> bool {
        if stop.load(Ordering::Acquire) != STOP_NONE {
            return true;
        }

        let reason = if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            STOP_CANCELLED
        } else if deadline.is_some_and(|at| Instant::now() >= at) {
            STOP_DEADLINE
        } else {
            return false;
        };

        let _ = stop.compare_exchange(STOP_NONE, reason, Ordering::AcqRel, Ordering::Acquire);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::types::*;
    use crate::partition::progress::ProgressReport;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::sync::Mutex;

    fn unit_square(offset: f64) -> CellPolygon {
        CellPolygon::rectangle(
            Point2D::new(offset, offset),
            Point2D::new(offset + 1.0, offset + 1.0),
        )
    }

    fn random_points(count: usize, seed: u64, min: f64, max: f64) -> Vec<Point3D> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| point3(rng.random_range(min..max), rng.random_range(min..max), 0.0))
            .collect()
    }

    fn quiet(workers: usize) -> PartitionScheduler {
        PartitionScheduler::new(
            PartitionConfig::new()
                .with_workers(workers)
                .with_report_progress(false),
        )
    }

    #[derive(Default)]
    struct CollectingSink {
        reports: Mutex<Vec<ProgressReport>>,
    }

    impl ProgressSink for CollectingSink {
        fn report(&self, report: ProgressReport) {
            self.reports.lock().unwrap().push(report);
        }
    }

    #[test]
    fn test_overlap_goes_to_lowest_index() {
        let cells = vec![unit_square(0.0), unit_square(0.5)];
        let points = vec![point3(0.75, 0.75, 0.0), point3(1.25, 1.25, 0.0), point3(3.0, 3.0, 0.0)];

        for workers in [1, 3] {
            let table = quiet(workers).classify(&cells, &points).unwrap();
            assert_eq!(table.get(0), Some(0));
            assert_eq!(table.get(1), Some(1));
            assert_eq!(table.get(2), None);
        }
    }

    #[test]
    fn test_empty_cell_set() {
        let points = random_points(10, 1, 0.0, 1.0);
        let table = quiet(2).classify(&[], &points).unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.unassigned_count(), 10);
        assert_eq!(table.buckets(0).nonempty().count(), 0);
    }

    #[test]
    fn test_empty_point_cloud() {
        let points: Vec<Point3D> = Vec::new();
        let table = quiet(2).classify(&[unit_square(0.0)], &points).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_degenerate_cell_never_matches() {
        let degenerate = CellPolygon::new(vec![point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0)]);
        let cells = vec![degenerate, unit_square(0.0)];
        let table = quiet(1).classify(&cells, &vec![point3(0.5, 0.5, 0.0)]).unwrap();
        assert_eq!(table.get(0), Some(1));
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let cells: Vec<CellPolygon> = (0..4)
            .map(|i| {
                let o = i as f64 * 2.0;
                CellPolygon::rectangle(Point2D::new(o, 0.0), Point2D::new(o + 2.5, 8.0))
            })
            .collect();
        let points = random_points(20_000, 42, -1.0, 9.0);

        let reference = quiet(1).classify(&cells, &points).unwrap();
        for workers in [2, 3, 7, 16] {
            assert_eq!(quiet(workers).classify(&cells, &points).unwrap(), reference);
        }
        for (i, p) in points.iter().enumerate() {
            assert_eq!(reference.get(i), first_match(&cells, p));
        }
    }

    #[test]
    fn test_progress_milestones() {
        let cells = vec![unit_square(0.0)];
        let points = random_points(1_000_000, 3, 0.0, 2.0);
        let sink = Arc::new(CollectingSink::default());

        let scheduler = PartitionScheduler::new(PartitionConfig::new().with_workers(1))
            .with_progress_sink(sink.clone());
        scheduler.classify(&cells, &points).unwrap();

        let percents: Vec<u8> = sink.reports.lock().unwrap().iter().map(|r| r.percent).collect();
        assert_eq!(percents, (0..=100).step_by(5).collect::<Vec<u8>>());

        let sink = Arc::new(CollectingSink::default());
        let scheduler = PartitionScheduler::new(PartitionConfig::new().with_workers(4))
            .with_progress_sink(sink.clone());
        scheduler.classify(&cells, &points).unwrap();
        let mut percents: Vec<u8> =
            sink.reports.lock().unwrap().iter().map(|r| r.percent).collect();
        let reported = percents.len();
        percents.dedup();
        assert!(reported <= 21);
        assert_eq!(percents.len(), reported);
    }

    #[test]
    fn test_cancellation() {
        let flag = Arc::new(AtomicBool::new(true));
        let scheduler = quiet(2).with_cancel_flag(flag);
        let points = random_points(1000, 5, 0.0, 1.0);
        let result = scheduler.classify(&[unit_square(0.0)], &points);
        assert!(matches!(
            result,
            Err(PartitionError::Cancelled { processed: 0, total: 1000 })
        ));
    }

    #[test]
    fn test_deadline() {
        let scheduler = PartitionScheduler::new(
            PartitionConfig::new()
                .with_workers(2)
                .with_report_progress(false)
                .with_deadline_ms(0),
        );
        let points = random_points(1000, 6, 0.0, 1.0);
        let result = scheduler.classify(&[unit_square(0.0)], &points);
        assert!(matches!(result, Err(PartitionError::DeadlineExceeded { total: 1000, .. })));
    }

    #[test]
    fn test_invalid_config() {
        let scheduler = PartitionScheduler::new(PartitionConfig::new().with_cancel_check_interval(0));
        let points = random_points(10, 1, 0.0, 1.0);
        assert!(matches!(
            scheduler.classify(&[unit_square(0.0)], &points),
            Err(PartitionError::InvalidConfiguration { .. })
        ));
    }
}
