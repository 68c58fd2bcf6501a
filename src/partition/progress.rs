// src/partition/progress.rs

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use tracing::info;

/// Eine Fortschrittsmeldung an einer Meilensteingrenze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    pub processed: usize,
    pub total: usize,
    /// Meilenstein in Prozent (Vielfaches der Schrittweite, oder 100)
    pub percent: u8,
}

impl ProgressReport {
    pub fn is_done(&self) -> bool {
        self.percent >= 100
    }
}

/// Empfänger von Fortschrittsmeldungen; wird von mehreren Workern gleichzeitig aufgerufen.
pub trait ProgressSink: Send + Sync {
    fn report(&self, report: ProgressReport);
}

/// Schreibt Fortschritt über `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn report(&self, report: ProgressReport) {
        if report.is_done() {
            info!(
                "Processed {} points / {} total points ({}%)... - done!",
                report.processed, report.total, report.percent
            );
        } else {
            info!(
                "Processed {} points / {} total points ({}%)...",
                report.processed, report.total, report.percent
            );
        }
    }
}

/// Zählt verarbeitete Punkte eines Laufs und meldet jeden Meilenstein höchstens einmal.
///
/// Lebt nur für einen Lauf. Pro Kandidat genau ein Compare-Exchange; verliert ein
/// Worker das Rennen, entfällt seine Meldung. Das Ergebnis der Klassifikation
/// hängt nie davon ab.
pub struct ProgressTracker<'a> {
    total: usize,
    step: u8,
    processed: AtomicUsize,
    last_milestone: AtomicI64,
    sink: Option<&'a dyn ProgressSink>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(total: usize, step: u8, sink: Option<&'a dyn ProgressSink>) -> Self {
        Self {
            total,
            step: step.clamp(1, 100),
            processed: AtomicUsize::new(0),
            last_milestone: AtomicI64::new(-1),
            sink,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed.load(Ordering::Acquire)
    }

    /// Verbucht `count` weitere verarbeitete Punkte
    pub fn advance(&self, count: usize) {
        if count == 0 || self.total == 0 {
            return;
        }
        let processed = self.processed.fetch_add(count, Ordering::AcqRel) + count;

        let Some(sink) = self.sink else {
            return;
        };
        let milestone = self.milestone(processed);
        let last = self.last_milestone.load(Ordering::Acquire);
        if milestone > last
            && self
                .last_milestone
                .compare_exchange(last, milestone, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            sink.report(ProgressReport {
                processed,
                total: self.total,
                percent: milestone as u8,
            });
        }
    }

    fn milestone(&self, processed: usize) -> i64 {
        if processed >= self.total {
            return 100;
        }
        let percent = (processed as u128 * 100 / self.total as u128) as i64;
        percent / self.step as i64 * self.step as i64
    }
}
