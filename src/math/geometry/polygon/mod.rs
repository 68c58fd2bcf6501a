// src/math/geometry/polygon/mod.rs

pub mod core; // Enthält die CellPolygon-Struktur selbst
pub mod properties; // Enthält den PolygonProperties-Trait und den Punkt-in-Ring-Test

pub use self::core::CellPolygon;
pub use self::properties::{
    Orientation, PolygonProperties, point_in_ring, ring_interior_point, ring_orientation,
};
