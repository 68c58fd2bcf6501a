// src/math/types/mod.rs
pub mod bounds;
pub mod point;

pub use bounds::*;
pub use point::*;

// Re-export häufig verwendete externe Typen
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul
pub type Point2D = nalgebra::Point2<f64>;
pub type Point3D = nalgebra::Point3<f64>;
pub type SpadePoint = Point2<f64>;
