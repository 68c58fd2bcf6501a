// src/partition/mod.rs

// Räumliche Partitionierung: Zerlegung der Domäne in Zellen und Klassifikation der Punktwolke
pub mod assignment;
pub mod config;
pub mod decomposer;
pub mod dual_graph;
pub mod emitter;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod scheduler;
pub mod source;

pub use assignment::{AssignmentTable, RegionBuckets, UNASSIGNED};
pub use config::PartitionConfig;
pub use decomposer::{Decomposition, DecompositionReport, RegionDecomposer};
pub use dual_graph::{DualEdge, DualGraph};
pub use emitter::{EmitReport, PartitionEmitter, RegionView, RegionWriter};
pub use error::{PartitionError, PartitionResult};
pub use pipeline::{PartitionOutcome, PartitionPipeline, PartitionReport, PhaseTimings};
pub use progress::{ProgressReport, ProgressSink, ProgressTracker, TracingProgressSink};
pub use scheduler::{PartitionScheduler, first_match};
pub use source::PointSource;
