// src/math/geometry/triangulation.rs

use crate::math::{
    error::*,
    geometry::{
        mesh::{BoundaryMesh, DomainMesh},
        polygon::{CellPolygon, point_in_ring, ring_interior_point},
    },
    types::*,
    utils::{
        constants::{EPSILON_F64, SKELETON_TOLERANCE},
        simple_geometry::{distance_to_segment, signed_ring_area},
    },
};
use spade::{ConstrainedDelaunayTriangulation, HasPosition, Triangulation};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Eingabe für die Triangulation: Domänenrand, Gebäudelöcher und grobes Skelett.
#[derive(Debug, Clone, Default)]
pub struct DomainInput {
    /// Äußerer Rand der Domäne
    pub outer: Vec<Point3D>,
    /// Lochringe (z.B. Gebäudegrundrisse)
    pub holes: Vec<Vec<Point3D>>,
    /// Offene Polylinien, die zu Zellgrenzen werden
    pub cuts: Vec<Vec<Point3D>>,
    /// Explizite Saatpunkte für Löcher; `None` = ein innerer Punkt pro Lochring
    pub hole_seeds: Option<Vec<Point2D>>,
    /// Grobes Skelett: markiert vorhandene Netzkanten als Zellgrenzen, ohne Constraints einzufügen
    pub skeleton: Vec<Vec<Point3D>>,
}

impl DomainInput {
    pub fn new(outer: Vec<Point3D>) -> Self {
        Self {
            outer,
            ..Default::default()
        }
    }

    pub fn with_holes(mut self, holes: Vec<Vec<Point3D>>) -> Self {
        self.holes = holes;
        self
    }

    pub fn with_cuts(mut self, cuts: Vec<Vec<Point3D>>) -> Self {
        self.cuts = cuts;
        self
    }

    pub fn with_hole_seeds(mut self, seeds: Vec<Point2D>) -> Self {
        self.hole_seeds = Some(seeds);
        self
    }

    pub fn with_skeleton(mut self, skeleton: Vec<Vec<Point3D>>) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// Saatpunkte der Löcher, explizit oder aus den Lochringen bestimmt
    pub fn resolved_hole_seeds(&self) -> Vec<Point2D> {
        match &self.hole_seeds {
            Some(seeds) => seeds.clone(),
            None => self
                .holes
                .iter()
                .filter_map(|ring| ring_interior_point(ring))
                .collect(),
        }
    }
}

/// Liefert zu einer Domäne ein konformes Dreiecksnetz.
///
/// Alle Randsegmente und Schnittlinien erscheinen als Kanten des Ergebnisses,
/// Lochdreiecke sind markiert, Schnittkanten tragen `CUT`.
pub trait TriangulationOracle {
    fn triangulate(&self, input: &DomainInput) -> MathResult<DomainMesh>;
}

/// Vertex der Triangulation mit mitgeführter Höhe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainVertex {
    pub position: SpadePoint,
    pub z: f64,
}

impl DomainVertex {
    pub fn from_point(point: &Point3D) -> Self {
        Self {
            position: SpadePoint::new(point.x, point.y),
            z: point.z,
        }
    }
}

impl HasPosition for DomainVertex {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Constrained Delaunay Triangulation über `spade`
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeTriangulator;

impl SpadeTriangulator {
    pub fn new() -> Self {
        Self
    }

    /// Fügt eine Polylinie als Folge von Constraints ein.
    /// Schnitte mit vorhandenen Constraints werden aufgeteilt, Z wird linear interpoliert.
    fn insert_polyline(
        cdt: &mut ConstrainedDelaunayTriangulation<DomainVertex>,
        points: &[Point3D],
        closed: bool,
    ) -> MathResult<()> {
        let handles = points
            .iter()
            .map(|p| {
                cdt.insert(DomainVertex::from_point(p))
                    .map_err(|e| MathError::TriangulationFailed {
                        reason: format!("Cannot insert vertex ({}, {}): {:?}", p.x, p.y, e),
                    })
            })
            .collect::<MathResult<Vec<_>>>()?;

        let n = points.len();
        let segments = if closed { n } else { n.saturating_sub(1) };
        for i in 0..segments {
            let j = (i + 1) % n;
            if handles[i] == handles[j] {
                continue;
            }
            let (a, b) = (points[i], points[j]);
            cdt.add_constraint_and_split(handles[i], handles[j], |position| DomainVertex {
                position,
                z: interpolate_z(&a, &b, position),
            });
        }
        Ok(())
    }
}

impl TriangulationOracle for SpadeTriangulator {
    fn triangulate(&self, input: &DomainInput) -> MathResult<DomainMesh> {
        let domain = CellPolygon::with_interiors(input.outer.clone(), input.holes.clone());
        if domain.is_degenerate() {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: domain.len(),
            });
        }

        let projected: Vec<Point2D> = domain.exterior().iter().map(xy).collect();
        if signed_ring_area(&projected).abs() <= EPSILON_F64 {
            return Err(MathError::GeometricFailure {
                operation: "outer ring encloses no area".to_string(),
            });
        }

        let mut cdt = ConstrainedDelaunayTriangulation::<DomainVertex>::new();
        Self::insert_polyline(&mut cdt, domain.exterior(), true)?;
        for ring in domain.interiors() {
            Self::insert_polyline(&mut cdt, ring, true)?;
        }
        for cut in &input.cuts {
            Self::insert_polyline(&mut cdt, cut, false)?;
        }

        let vertices: Vec<Point3D> = cdt
            .vertices()
            .map(|v| {
                let data = v.data();
                point3(data.position.x, data.position.y, data.z)
            })
            .collect();

        // Dreiecke außerhalb des äußeren Rings verwerfen. Die Constraints
        // garantieren, dass kein Dreieck den Rand schneidet.
        let mut triangles = Vec::with_capacity(cdt.num_inner_faces());
        for face in cdt.inner_faces() {
            let tri = face.vertices().map(|v| v.fix().index() as u32);
            let [a, b, c] = tri.map(|v| vertices[v as usize]);
            let cx = (a.x + b.x + c.x) / 3.0;
            let cy = (a.y + b.y + c.y) / 3.0;
            if point_in_ring(domain.exterior(), cx, cy) {
                triangles.push(tri);
            }
        }
        if triangles.is_empty() {
            return Err(MathError::GeometricFailure {
                operation: format!(
                    "no triangle inside the outer ring ({} vertices)",
                    domain.len()
                ),
            });
        }

        let constraints: HashSet<(u32, u32)> = cdt
            .undirected_edges()
            .filter(|edge| cdt.is_constraint_edge(edge.fix()))
            .map(|edge| {
                let [a, b] = edge.vertices().map(|v| v.fix().index() as u32);
                (a.min(b), a.max(b))
            })
            .collect();

        let mut mesh = DomainMesh::from_triangles(vertices, triangles)?;
        let is_constraint = |mesh: &DomainMesh, e: u32| {
            let [a, b] = mesh.edge_vertices(e);
            constraints.contains(&(a, b))
        };

        // Die Flutung stoppt nur an Ringsegmenten; Schnittlinien dürfen ein Loch kreuzen
        let ring_segments: Vec<[Point2D; 2]> = domain
            .rings()
            .flat_map(|ring| {
                (0..ring.len()).map(move |i| [xy(&ring[i]), xy(&ring[(i + 1) % ring.len()])])
            })
            .collect();
        let ring_edges: HashSet<u32> = (0..mesh.num_edges() as u32)
            .filter(|&e| is_constraint(&mesh, e))
            .filter(|&e| {
                let [a, b] = mesh.edge_vertices(e).map(|v| xy(&mesh.vertex(v)));
                ring_segments.iter().any(|&[s0, s1]| {
                    distance_to_segment(a, s0, s1) <= SKELETON_TOLERANCE
                        && distance_to_segment(b, s0, s1) <= SKELETON_TOLERANCE
                })
            })
            .collect();

        for seed in input.resolved_hole_seeds() {
            let start = (0..mesh.num_triangles() as u32)
                .find(|&t| !mesh.is_hole(t) && mesh.triangle_contains_xy(t, seed));
            let Some(start) = start else {
                warn!("Hole seed ({}, {}) does not hit a domain triangle", seed.x, seed.y);
                continue;
            };

            let mut queue = VecDeque::from([start]);
            mesh.mark_hole(start);
            while let Some(t) = queue.pop_front() {
                for (neighbor, e) in mesh.triangle_neighbors(t).into_iter().flatten() {
                    if !mesh.is_hole(neighbor) && !ring_edges.contains(&e) {
                        mesh.mark_hole(neighbor);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        for e in 0..mesh.num_edges() as u32 {
            if !is_constraint(&mesh, e) {
                continue;
            }
            if let [Some(a), Some(b)] = mesh.edge_triangles(e) {
                if !mesh.is_hole(a) && !mesh.is_hole(b) {
                    mesh.mark_cut_edge(e);
                }
            }
        }

        debug!(
            "Triangulated domain: {} vertices, {} triangles ({} hole), {} constraint edges",
            mesh.num_vertices(),
            mesh.num_triangles(),
            mesh.hole_count(),
            constraints.len()
        );

        Ok(mesh)
    }
}

/// Höhe eines Punktes auf dem Segment [a, b] (Projektion, geklemmt)
fn interpolate_z(a: &Point3D, b: &Point3D, position: SpadePoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a.z;
    }
    let t = (((position.x - a.x) * dx + (position.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    a.z + t * (b.z - a.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(min: f64, max: f64) -> Vec<Point3D> {
        vec![
            point3(min, min, 0.0),
            point3(max, min, 0.0),
            point3(max, max, 0.0),
            point3(min, max, 0.0),
        ]
    }

    fn triangle_area(mesh: &DomainMesh, t: u32) -> f64 {
        let [a, b, c] = mesh.triangle_vertices(t).map(|v| mesh.vertex(v));
        ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() * 0.5
    }

    #[test]
    fn test_square_with_hole() {
        let input = DomainInput::new(square(0.0, 10.0)).with_holes(vec![square(4.0, 6.0)]);
        let mesh = SpadeTriangulator::new().triangulate(&input).unwrap();

        let (mut domain_area, mut hole_area) = (0.0, 0.0);
        for t in 0..mesh.num_triangles() as u32 {
            if mesh.is_hole(t) {
                hole_area += triangle_area(&mesh, t);
            } else {
                domain_area += triangle_area(&mesh, t);
            }
        }
        assert_relative_eq!(domain_area, 96.0, epsilon = 1e-9);
        assert_relative_eq!(hole_area, 4.0, epsilon = 1e-9);

        // Außen- und Lochrand: 4 + 4 Randkanten, keine Schnittkanten
        let boundary = (0..mesh.num_edges() as u32).filter(|&e| mesh.is_boundary(e)).count();
        let cuts = (0..mesh.num_edges() as u32).filter(|&e| mesh.is_cut(e)).count();
        assert_eq!(boundary, 8);
        assert_eq!(cuts, 0);
    }

    #[test]
    fn test_cuts_become_cut_edges() {
        let input = DomainInput::new(square(0.0, 10.0))
            .with_cuts(vec![vec![point3(5.0, 0.0, 0.0), point3(5.0, 10.0, 0.0)]]);
        let mesh = SpadeTriangulator::new().triangulate(&input).unwrap();

        let cut_length: f64 = (0..mesh.num_edges() as u32)
            .filter(|&e| mesh.is_cut(e))
            .map(|e| {
                let [a, b] = mesh.edge_vertices(e).map(|v| mesh.vertex(v));
                assert_relative_eq!(a.x, 5.0);
                assert_relative_eq!(b.x, 5.0);
                (b.y - a.y).abs()
            })
            .sum();
        assert_relative_eq!(cut_length, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cuts_through_hole_keep_the_hole_whole() {
        let input = DomainInput::new(square(0.0, 10.0))
            .with_holes(vec![square(4.0, 6.0)])
            .with_cuts(vec![
                vec![point3(5.0, 0.0, 0.0), point3(5.0, 10.0, 0.0)],
                vec![point3(0.0, 5.0, 0.0), point3(10.0, 5.0, 0.0)],
            ]);
        let mesh = SpadeTriangulator::new().triangulate(&input).unwrap();

        let hole_area: f64 = (0..mesh.num_triangles() as u32)
            .filter(|&t| mesh.is_hole(t))
            .map(|t| triangle_area(&mesh, t))
            .sum();
        assert_relative_eq!(hole_area, 4.0, epsilon = 1e-9);

        // Lochrand ist Rand, nie Schnittkante; innerhalb des Lochs gibt es keine Schnittkanten
        for e in 0..mesh.num_edges() as u32 {
            if mesh.is_cut(e) {
                let [a, b] = mesh.edge_triangles(e);
                assert!(!mesh.is_hole(a.unwrap()) && !mesh.is_hole(b.unwrap()));
                let mid = mesh.edge_midpoint(e);
                assert!(!(mid.x > 4.0 && mid.x < 6.0 && mid.y > 4.0 && mid.y < 6.0));
            }
        }
    }

    #[test]
    fn test_z_is_carried() {
        let outer = vec![
            point3(0.0, 0.0, 1.0),
            point3(4.0, 0.0, 2.0),
            point3(4.0, 4.0, 3.0),
            point3(0.0, 4.0, 4.0),
        ];
        let mesh = SpadeTriangulator::new()
            .triangulate(&DomainInput::new(outer.clone()))
            .unwrap();
        for p in &outer {
            assert!(mesh.vertices().contains(p));
        }
    }

    #[test]
    fn test_insufficient_points() {
        let input = DomainInput::new(vec![point3(0.0, 0.0, 0.0), point3(1.0, 0.0, 0.0)]);
        assert!(matches!(
            SpadeTriangulator::new().triangulate(&input),
            Err(MathError::InsufficientPoints { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_invalid_coordinates() {
        let mut outer = square(0.0, 1.0);
        outer[2].x = f64::NAN;
        let result = SpadeTriangulator::new().triangulate(&DomainInput::new(outer));
        assert!(matches!(result, Err(MathError::TriangulationFailed { .. })));
    }

    #[test]
    fn test_collinear_outline() {
        let outer = vec![point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0), point3(2.0, 2.0, 0.0)];
        assert!(matches!(
            SpadeTriangulator::new().triangulate(&DomainInput::new(outer)),
            Err(MathError::GeometricFailure { .. })
        ));
    }

    #[test]
    fn test_interpolate_z() {
        let a = point3(0.0, 0.0, 0.0);
        let b = point3(10.0, 0.0, 10.0);
        assert_relative_eq!(interpolate_z(&a, &b, SpadePoint::new(2.5, 0.0)), 2.5);
        assert_relative_eq!(interpolate_z(&a, &a, SpadePoint::new(2.5, 0.0)), 0.0);
    }
}
