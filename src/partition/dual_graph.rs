// src/partition/dual_graph.rs

use crate::math::{geometry::mesh::BoundaryMesh, types::*};

/// Kante des Dualgraphen: verbindet zwei Dreiecke über eine gemeinsame Netzkante.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualEdge {
    /// Nachbardreieck
    pub target: u32,
    /// Gemeinsame Kante im Domain Mesh
    pub edge: u32,
    /// Schnittkante: beim Labeling nicht passierbar
    pub cut: bool,
    /// Mittelpunkt der gemeinsamen Kante
    pub midpoint: Point3D,
}

/// Dualgraph über den Dreiecken eines Domain Mesh (CSR-Layout).
///
/// Ein Knoten pro Dreieck mit dessen Schwerpunkt. Lochdreiecke sind Knoten
/// ohne Nachbarn; Randkanten erzeugen keine Dualkanten.
#[derive(Debug, Clone, Default)]
pub struct DualGraph {
    offsets: Vec<usize>,
    targets: Vec<DualEdge>,
    centroids: Vec<Point3D>,
}

impl DualGraph {
    /// Baut den Dualgraphen. `is_cut` entscheidet pro Netzkante, ob sie eine Zellgrenze ist.
    pub fn build<M, F>(mesh: &M, is_cut: F) -> Self
    where
        M: BoundaryMesh + ?Sized,
        F: Fn(u32) -> bool,
    {
        let n = mesh.num_triangles();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut targets = Vec::with_capacity(n * 3);
        let mut centroids = Vec::with_capacity(n);

        offsets.push(0);
        for t in 0..n as u32 {
            centroids.push(mesh.triangle_centroid(t));
            if !mesh.is_hole(t) {
                for (neighbor, edge) in mesh.triangle_neighbors(t).into_iter().flatten() {
                    if mesh.is_hole(neighbor) || mesh.is_boundary(edge) {
                        continue;
                    }
                    targets.push(DualEdge {
                        target: neighbor,
                        edge,
                        cut: is_cut(edge),
                        midpoint: mesh.edge_midpoint(edge),
                    });
                }
            }
            offsets.push(targets.len());
        }

        Self {
            offsets,
            targets,
            centroids,
        }
    }

    pub fn node_count(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Anzahl der ungerichteten Dualkanten
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Anzahl der ungerichteten Dualkanten über Schnittkanten
    pub fn cut_edge_count(&self) -> usize {
        self.targets.iter().filter(|e| e.cut).count() / 2
    }

    pub fn neighbors(&self, t: u32) -> &[DualEdge] {
        let t = t as usize;
        &self.targets[self.offsets[t]..self.offsets[t + 1]]
    }

    pub fn centroid(&self, t: u32) -> Point3D {
        self.centroids[t as usize]
    }
}
