// src/io/mod.rs

// Dünne Ein-/Ausgabe-Kollaborateure rund um den Partitionierungskern
pub mod boundary;
pub mod point_cloud;
pub mod region_writer;

pub use boundary::{BoundaryInput, write_cell_set};
pub use point_cloud::PointCloud;
pub use region_writer::XyzRegionWriter;
