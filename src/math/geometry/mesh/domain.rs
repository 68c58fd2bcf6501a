// src/math/geometry/mesh/domain.rs

use super::{BoundaryMesh, EdgeFlags};
use crate::math::{error::*, types::*, utils::simple_geometry::cross};
use std::collections::HashMap;

/// Triangulierte Domäne mit Löchern, als Arena gespeichert.
///
/// Kanten sind eindeutig (ungerichtet, `(lo, hi)`), jedes Dreieck kennt seine
/// drei Kanten und jede Kante ihre höchstens zwei Dreiecke.
#[derive(Debug, Clone, Default)]
pub struct DomainMesh {
    vertices: Vec<Point3D>,
    triangles: Vec<[u32; 3]>,
    triangle_edges: Vec<[u32; 3]>,
    edges: Vec<[u32; 2]>,
    edge_triangles: Vec<[Option<u32>; 2]>,
    edge_flags: Vec<EdgeFlags>,
    holes: Vec<bool>,
    edge_lookup: HashMap<(u32, u32), u32>,
}

impl DomainMesh {
    /// Erstellt das Mesh und leitet die Adjazenz her.
    ///
    /// Dreiecke werden gegen den Uhrzeigersinn ausgerichtet. Kanten mit nur einem
    /// Dreieck erhalten `BOUNDARY`.
    pub fn from_triangles(vertices: Vec<Point3D>, triangles: Vec<[u32; 3]>) -> MathResult<Self> {
        let vertex_count = vertices.len();
        if vertex_count > u32::MAX as usize || triangles.len() > u32::MAX as usize {
            return Err(MathError::InvalidConfiguration {
                message: "Mesh exceeds u32 index range".to_string(),
            });
        }

        let mut mesh = Self {
            vertices,
            triangles: Vec::with_capacity(triangles.len()),
            triangle_edges: Vec::with_capacity(triangles.len()),
            holes: vec![false; triangles.len()],
            ..Default::default()
        };

        for (t, mut tri) in triangles.into_iter().enumerate() {
            if tri.iter().any(|&v| v as usize >= vertex_count) {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Triangle {} references a missing vertex: {:?}", t, tri),
                });
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Triangle {} repeats a vertex: {:?}", t, tri),
                });
            }

            let [a, b, c] = tri.map(|v| xy(&mesh.vertices[v as usize]));
            if cross(a, b, c) < 0.0 {
                tri.swap(1, 2);
            }

            let mut tri_edges = [0u32; 3];
            for k in 0..3 {
                tri_edges[k] = mesh.attach_edge(tri[k], tri[(k + 1) % 3], t as u32)?;
            }
            mesh.triangles.push(tri);
            mesh.triangle_edges.push(tri_edges);
        }

        for e in 0..mesh.edges.len() {
            mesh.refresh_boundary(e as u32);
        }

        Ok(mesh)
    }

    fn attach_edge(&mut self, a: u32, b: u32, t: u32) -> MathResult<u32> {
        let key = (a.min(b), a.max(b));
        let e = match self.edge_lookup.get(&key) {
            Some(&e) => e,
            None => {
                let e = self.edges.len() as u32;
                self.edges.push([key.0, key.1]);
                self.edge_triangles.push([None, None]);
                self.edge_flags.push(EdgeFlags::empty());
                self.edge_lookup.insert(key, e);
                e
            }
        };

        let slots = &mut self.edge_triangles[e as usize];
        match *slots {
            [None, _] => slots[0] = Some(t),
            [Some(_), None] => slots[1] = Some(t),
            [Some(_), Some(_)] => {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Edge ({}, {}) is shared by more than two triangles", a, b),
                });
            }
        }
        Ok(e)
    }

    /// BOUNDARY genau dann, wenn nur auf einer Seite ein Nicht-Loch-Dreieck liegt
    fn refresh_boundary(&mut self, e: u32) {
        let domain_sides = self.edge_triangles[e as usize]
            .iter()
            .flatten()
            .filter(|&&t| !self.holes[t as usize])
            .count();
        self.edge_flags[e as usize].set(EdgeFlags::BOUNDARY, domain_sides == 1);
    }

    /// Sucht die Kante zwischen zwei Vertices
    pub fn find_edge(&self, a: u32, b: u32) -> Option<u32> {
        self.edge_lookup.get(&(a.min(b), a.max(b))).copied()
    }

    /// Markiert die Kante zwischen zwei Vertices als Schnittkante.
    /// Gibt `false` zurück, wenn es keine solche Kante gibt.
    pub fn mark_cut(&mut self, a: u32, b: u32) -> bool {
        match self.find_edge(a, b) {
            Some(e) => {
                self.mark_cut_edge(e);
                true
            }
            None => false,
        }
    }

    pub fn mark_cut_edge(&mut self, e: u32) {
        self.edge_flags[e as usize].insert(EdgeFlags::CUT);
    }

    /// Markiert ein Dreieck als Loch und aktualisiert die Randflags seiner Kanten
    pub fn mark_hole(&mut self, t: u32) {
        self.holes[t as usize] = true;
        for e in self.triangle_edges[t as usize] {
            self.refresh_boundary(e);
        }
    }

    pub fn vertices(&self) -> &[Point3D] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn hole_count(&self) -> usize {
        self.holes.iter().filter(|&&h| h).count()
    }

    /// Prüft ob ein Punkt im (geschlossenen) Dreieck `t` liegt
    pub fn triangle_contains_xy(&self, t: u32, p: Point2D) -> bool {
        let [a, b, c] = self.triangles[t as usize].map(|v| xy(&self.vertices[v as usize]));
        cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
    }
}

impl BoundaryMesh for DomainMesh {
    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    fn vertex(&self, v: u32) -> Point3D {
        self.vertices[v as usize]
    }

    fn triangle_vertices(&self, t: u32) -> [u32; 3] {
        self.triangles[t as usize]
    }

    fn triangle_edges(&self, t: u32) -> [u32; 3] {
        self.triangle_edges[t as usize]
    }

    fn edge_vertices(&self, e: u32) -> [u32; 2] {
        self.edges[e as usize]
    }

    fn edge_triangles(&self, e: u32) -> [Option<u32>; 2] {
        self.edge_triangles[e as usize]
    }

    fn edge_flags(&self, e: u32) -> EdgeFlags {
        self.edge_flags[e as usize]
    }

    fn is_hole(&self, t: u32) -> bool {
        self.holes[t as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Einheitsquadrat aus zwei Dreiecken, Diagonale (0, 2)
    fn unit_square() -> DomainMesh {
        let vertices = vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(1.0, 1.0, 0.0),
            point3(0.0, 1.0, 0.0),
        ];
        DomainMesh::from_triangles(vertices, vec![[0, 1, 2], [0, 3, 2]]).unwrap()
    }

    #[test]
    fn test_adjacency() {
        let mesh = unit_square();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_edges(), 5);

        let diagonal = mesh.find_edge(2, 0).unwrap();
        assert_eq!(mesh.edge_triangles(diagonal), [Some(0), Some(1)]);
        assert!(!mesh.is_boundary(diagonal));

        let neighbors: Vec<_> = mesh.triangle_neighbors(0).into_iter().flatten().collect();
        assert_eq!(neighbors, vec![(1, diagonal)]);

        let boundary = (0..mesh.num_edges() as u32).filter(|&e| mesh.is_boundary(e)).count();
        assert_eq!(boundary, 4);
    }

    #[test]
    fn test_orientation_is_normalized() {
        let mesh = unit_square();
        // [0, 3, 2] ist im Uhrzeigersinn angegeben
        assert_eq!(mesh.triangle_vertices(1), [0, 2, 3]);
        assert!(mesh.triangle_contains_xy(1, Point2D::new(0.2, 0.7)));
        assert!(!mesh.triangle_contains_xy(1, Point2D::new(0.7, 0.2)));
    }

    #[test]
    fn test_mark_cut_and_hole() {
        let mut mesh = unit_square();
        assert!(mesh.mark_cut(0, 2));
        assert!(!mesh.mark_cut(1, 3));
        let diagonal = mesh.find_edge(0, 2).unwrap();
        assert!(mesh.is_cut(diagonal));

        mesh.mark_hole(1);
        assert!(mesh.is_hole(1));
        assert!(mesh.is_boundary(diagonal));
        let top = mesh.find_edge(2, 3).unwrap();
        assert!(!mesh.is_boundary(top));
        assert_eq!(mesh.hole_count(), 1);
    }

    #[test]
    fn test_malformed_triangles_rejected() {
        let vertices = vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0), point3(0.0, 1.0, 0.0)];
        assert!(matches!(
            DomainMesh::from_triangles(vertices.clone(), vec![[0, 1, 1]]),
            Err(MathError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            DomainMesh::from_triangles(vertices, vec![[0, 1, 7]]),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_non_manifold_edge_rejected() {
        let vertices = vec![
            point3(0.0, 0.0, 0.0),
            point3(1.0, 0.0, 0.0),
            point3(0.5, 1.0, 0.0),
            point3(0.5, -1.0, 0.0),
            point3(0.5, 2.0, 0.0),
        ];
        let result = DomainMesh::from_triangles(vertices, vec![[0, 1, 2], [0, 3, 1], [0, 1, 4]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = DomainMesh::from_triangles(Vec::new(), Vec::new()).unwrap();
        assert_eq!(mesh.num_triangles(), 0);
        assert_eq!(mesh.num_edges(), 0);
    }
}
