// src/math/geometry/mesh/mod.rs

pub mod domain;

pub use self::domain::DomainMesh;

use crate::math::types::*;
use bitflags::bitflags;

bitflags! {
    /// Markierungen einer Dreieckskante
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EdgeFlags: u8 {
        /// Kante mit Domänen-Dreieck nur auf einer Seite (Außenrand oder Lochrand)
        const BOUNDARY = 1 << 0;
        /// Gewollte Zellgrenze im Inneren der Domäne
        const CUT = 1 << 1;
    }
}

/// Adjazenz-Schnittstelle eines triangulierten Gebiets.
///
/// Alle Ids sind dichte Arena-Indizes. Kante `k` eines Dreiecks verläuft von
/// `triangle_vertices(t)[k]` nach `triangle_vertices(t)[(k + 1) % 3]`.
pub trait BoundaryMesh {
    fn num_vertices(&self) -> usize;
    fn num_triangles(&self) -> usize;
    fn num_edges(&self) -> usize;

    fn vertex(&self, v: u32) -> Point3D;
    fn triangle_vertices(&self, t: u32) -> [u32; 3];
    fn triangle_edges(&self, t: u32) -> [u32; 3];
    fn edge_vertices(&self, e: u32) -> [u32; 2];
    /// Die (höchstens zwei) Dreiecke an einer Kante
    fn edge_triangles(&self, e: u32) -> [Option<u32>; 2];
    fn edge_flags(&self, e: u32) -> EdgeFlags;
    /// Dreieck gehört zu einem Loch (Gebäudegrundriss) und wird nicht partitioniert
    fn is_hole(&self, t: u32) -> bool;

    fn is_cut(&self, e: u32) -> bool {
        self.edge_flags(e).contains(EdgeFlags::CUT)
    }

    fn is_boundary(&self, e: u32) -> bool {
        self.edge_flags(e).contains(EdgeFlags::BOUNDARY)
    }

    /// Nachbardreiecke über Kante `k`, jeweils mit der Id der gemeinsamen Kante
    fn triangle_neighbors(&self, t: u32) -> [Option<(u32, u32)>; 3] {
        self.triangle_edges(t).map(|e| {
            let [a, b] = self.edge_triangles(e);
            let other = if a == Some(t) { b } else { a };
            other.map(|n| (n, e))
        })
    }

    fn triangle_centroid(&self, t: u32) -> Point3D {
        let [a, b, c] = self.triangle_vertices(t).map(|v| self.vertex(v));
        Point3D::new(
            (a.x + b.x + c.x) / 3.0,
            (a.y + b.y + c.y) / 3.0,
            (a.z + b.z + c.z) / 3.0,
        )
    }

    fn edge_midpoint(&self, e: u32) -> Point3D {
        let [a, b] = self.edge_vertices(e);
        edge_center(&self.vertex(a), &self.vertex(b))
    }
}
