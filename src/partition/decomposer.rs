// src/partition/decomposer.rs

use crate::math::{
    geometry::{mesh::BoundaryMesh, polygon::CellPolygon},
    types::*,
    utils::{
        constants::SKELETON_TOLERANCE,
        simple_geometry::{distance_to_segment, signed_ring_area},
    },
};
use crate::partition::dual_graph::DualGraph;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Zusammenfassung einer Zerlegung
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecompositionReport {
    pub triangle_count: usize,
    pub hole_triangle_count: usize,
    pub dual_edge_count: usize,
    pub cut_dual_edge_count: usize,
    pub cell_count: usize,
    /// Dreiecke pro Zelle, in Zellreihenfolge
    pub cell_triangle_counts: Vec<usize>,
}

/// Ergebnis der Zerlegung: geordnete Zellen plus Label pro Dreieck
#[derive(Debug, Clone, Default)]
pub struct Decomposition {
    pub cells: Vec<CellPolygon>,
    /// Zellindex pro Dreieck; `None` für Lochdreiecke
    pub labels: Vec<Option<u32>>,
    /// Dualgraph, über den gelabelt wurde
    pub dual_graph: DualGraph,
    pub report: DecompositionReport,
}

/// Zerlegt eine triangulierte Domäne in disjunkte Zellen.
///
/// Zusammenhangskomponenten des Dualgraphen ohne Schnittkanten werden per
/// Breitensuche gelabelt, Saat in aufsteigender Dreiecksreihenfolge. Die
/// Reihenfolge der Entdeckung ist die Zellreihenfolge.
#[derive(Debug, Clone)]
pub struct RegionDecomposer {
    skeleton: Vec<[Point2D; 2]>,
    tolerance: f64,
}

impl Default for RegionDecomposer {
    fn default() -> Self {
        Self {
            skeleton: Vec::new(),
            tolerance: SKELETON_TOLERANCE,
        }
    }
}

impl RegionDecomposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grobes Skelett: Netzkanten, deren Endpunkte auf einem Segment liegen, werden Schnittkanten.
    /// Ergänzt die bereits im Mesh markierten `CUT`-Kanten; mehrfache Aufrufe sammeln Segmente.
    pub fn with_skeleton(mut self, polylines: &[Vec<Point3D>]) -> Self {
        self.skeleton.extend(
            polylines
                .iter()
                .flat_map(|line| line.windows(2).map(|w| [xy(&w[0]), xy(&w[1])])),
        );
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    fn on_skeleton(&self, a: Point2D, b: Point2D) -> bool {
        self.skeleton.iter().any(|&[s0, s1]| {
            distance_to_segment(a, s0, s1) <= self.tolerance
                && distance_to_segment(b, s0, s1) <= self.tolerance
        })
    }

    fn is_cut_edge<M: BoundaryMesh + ?Sized>(&self, mesh: &M, e: u32) -> bool {
        if mesh.is_cut(e) {
            return true;
        }
        if self.skeleton.is_empty() {
            return false;
        }
        let [a, b] = mesh.edge_vertices(e).map(|v| xy(&mesh.vertex(v)));
        self.on_skeleton(a, b)
    }

    pub fn decompose<M: BoundaryMesh + ?Sized>(&self, mesh: &M) -> Decomposition {
        let triangle_count = mesh.num_triangles();
        if triangle_count == 0 {
            warn!("Domain mesh has no triangles, cell set is empty");
            return Decomposition::default();
        }

        let graph = DualGraph::build(mesh, |e| self.is_cut_edge(mesh, e));
        let labels = label_components(mesh, &graph);
        let cell_count = labels.iter().flatten().map(|&l| l as usize + 1).max().unwrap_or(0);

        let mut members: Vec<Vec<u32>> = vec![Vec::new(); cell_count];
        for (t, label) in labels.iter().enumerate() {
            if let Some(label) = label {
                members[*label as usize].push(t as u32);
            }
        }

        let cells: Vec<CellPolygon> = members
            .iter()
            .enumerate()
            .map(|(cell, triangles)| extract_cell_polygon(mesh, &labels, cell as u32, triangles))
            .collect();

        let report = DecompositionReport {
            triangle_count,
            hole_triangle_count: (0..triangle_count as u32).filter(|&t| mesh.is_hole(t)).count(),
            dual_edge_count: graph.edge_count(),
            cut_dual_edge_count: graph.cut_edge_count(),
            cell_count,
            cell_triangle_counts: members.iter().map(Vec::len).collect(),
        };

        info!(
            "Decomposed {} triangles ({} hole) into {} cells, {} of {} dual edges cut",
            report.triangle_count,
            report.hole_triangle_count,
            report.cell_count,
            report.cut_dual_edge_count,
            report.dual_edge_count
        );

        Decomposition {
            cells,
            labels,
            dual_graph: graph,
            report,
        }
    }
}

/// Breitensuche über nicht geschnittene Dualkanten.
fn label_components<M: BoundaryMesh + ?Sized>(mesh: &M, graph: &DualGraph) -> Vec<Option<u32>> {
    let n = graph.node_count();
    let mut labels: Vec<Option<u32>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    let mut next_label = 0u32;

    for seed in 0..n as u32 {
        if visited[seed as usize] || mesh.is_hole(seed) {
            continue;
        }

        visited[seed as usize] = true;
        queue.push_back(seed);
        while let Some(t) = queue.pop_front() {
            labels[t as usize] = Some(next_label);
            for edge in graph.neighbors(t) {
                if !edge.cut && !visited[edge.target as usize] {
                    visited[edge.target as usize] = true;
                    queue.push_back(edge.target);
                }
            }
        }
        next_label += 1;
    }

    labels
}

/// Rand einer Komponente: gerichtete Dreieckskanten, deren Gegenseite nicht zur Zelle gehört,
/// zu geschlossenen Schleifen verkettet. Größte Schleife = äußerer Ring (CCW), Rest = innere Ringe (CW).
fn extract_cell_polygon<M: BoundaryMesh + ?Sized>(
    mesh: &M,
    labels: &[Option<u32>],
    cell: u32,
    triangles: &[u32],
) -> CellPolygon {
    let mut half_edges: Vec<[u32; 2]> = Vec::new();
    for &t in triangles {
        let vertices = mesh.triangle_vertices(t);
        for (k, neighbor) in mesh.triangle_neighbors(t).into_iter().enumerate() {
            let inside = neighbor.is_some_and(|(n, _)| labels[n as usize] == Some(cell));
            if !inside {
                half_edges.push([vertices[k], vertices[(k + 1) % 3]]);
            }
        }
    }

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, [from, _]) in half_edges.iter().enumerate() {
        outgoing.entry(*from).or_default().push(i);
    }

    let mut used = vec![false; half_edges.len()];
    let mut loops: Vec<Vec<Point3D>> = Vec::new();
    for start in 0..half_edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;

        let [first, mut current] = half_edges[start];
        let mut ring = vec![mesh.vertex(first)];
        let mut closed = true;
        while current != first {
            ring.push(mesh.vertex(current));
            let next = outgoing
                .get(&current)
                .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
            match next {
                Some(i) => {
                    used[i] = true;
                    current = half_edges[i][1];
                }
                None => {
                    closed = false;
                    break;
                }
            }
        }

        if closed && ring.len() >= 3 {
            loops.push(ring);
        } else {
            warn!("Cell {}: dropped an open boundary chain of {} vertices", cell, ring.len());
        }
    }

    let areas: Vec<f64> = loops
        .iter()
        .map(|ring| signed_ring_area(&ring.iter().map(xy).collect::<Vec<_>>()))
        .collect();
    let Some(outer_index) = (0..loops.len()).max_by(|&a, &b| areas[a].abs().total_cmp(&areas[b].abs()))
    else {
        return CellPolygon::new(Vec::new());
    };

    let mut exterior = Vec::new();
    let mut interiors = Vec::new();
    for (i, mut ring) in loops.into_iter().enumerate() {
        if i == outer_index {
            if areas[i] < 0.0 {
                ring.reverse();
            }
            exterior = ring;
        } else {
            if areas[i] > 0.0 {
                ring.reverse();
            }
            interiors.push(ring);
        }
    }

    if !interiors.is_empty() {
        debug!("Cell {} has {} inner rings", cell, interiors.len());
    }
    CellPolygon::with_interiors(exterior, interiors)
}
