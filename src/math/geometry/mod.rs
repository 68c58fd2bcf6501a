// src/math/geometry/mod.rs

// Deklaration der Haupt-Geometriemodule
pub mod mesh;
pub mod polygon;
pub mod triangulation;

// Polygon-Exporte
pub use self::polygon::{CellPolygon, Orientation, PolygonProperties, point_in_ring};

// Mesh- und Triangulations-Exporte
pub use self::mesh::{BoundaryMesh, DomainMesh, EdgeFlags};
pub use self::triangulation::{DomainInput, SpadeTriangulator, TriangulationOracle};
