// src/debug/svg.rs
use crate::math::{geometry::polygon::CellPolygon, types::*};
use crate::partition::dual_graph::DualGraph;
use std::io;
use std::path::Path;
use svg::Document;
use svg::node::element::{Circle, Group, Path as SvgPath, Rectangle, path::Data};
use tracing::info;

/// Füllfarben der Zellen, zyklisch nach Zellindex
const PALETTE: [&str; 8] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
];

// ===================================================================================
// HILFS-STRUCT für die SVG-Erstellung
// ===================================================================================
/// Ein Helfer zum Erstellen einer SVG-Datei in Weltkoordinaten (Y nach oben).
struct SvgBuilder {
    document: Document,
    layer: Group,
    // Relative Größen, die vom Builder berechnet werden
    stroke_w_normal: f64,
    stroke_w_thin: f64,
    point_radius: f64,
}

impl SvgBuilder {
    /// Erstellt ein neues SVG-Grundgerüst mit Hintergrund.
    fn new(display_bounds: &Bounds2D, svg_pixel_size: f64) -> Self {
        let width = display_bounds.width().max(1e-9);
        let height = display_bounds.height().max(1e-9);
        let scale = (width + height) / 2.0;

        // Y wird gespiegelt, die ViewBox liegt daher bei -max.y
        let document = Document::new()
            .set("width", svg_pixel_size)
            .set("height", svg_pixel_size * height / width)
            .set(
                "viewBox",
                (display_bounds.min.x, -display_bounds.max.y, width, height),
            )
            .add(
                Rectangle::new()
                    .set("x", display_bounds.min.x)
                    .set("y", -display_bounds.max.y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", "#f0f0f0"),
            );

        Self {
            document,
            layer: Group::new().set("transform", "scale(1,-1)"),
            stroke_w_normal: scale * 0.003,
            stroke_w_thin: scale * 0.001,
            point_radius: scale * 0.002,
        }
    }

    fn push(&mut self, node: impl Into<Box<dyn svg::Node>>) {
        let layer = std::mem::replace(&mut self.layer, Group::new());
        self.layer = layer.add(node);
    }

    /// Zeichnet eine Zelle mit allen Ringen (Even-Odd-Füllung).
    fn draw_cell(&mut self, index: usize, cell: &CellPolygon) {
        if cell.is_degenerate() {
            return;
        }
        let mut data = Data::new();
        for ring in cell.rings() {
            let Some((first, rest)) = ring.split_first() else {
                continue;
            };
            data = data.move_to((first.x, first.y));
            for p in rest {
                data = data.line_to((p.x, p.y));
            }
            data = data.close();
        }

        let path = SvgPath::new()
            .set("id", format!("cell-{}", index))
            .set("d", data)
            .set("fill", PALETTE[index % PALETTE.len()])
            .set("fill-opacity", 0.7)
            .set("fill-rule", "evenodd")
            .set("stroke", "#333333")
            .set("stroke-width", self.stroke_w_normal);
        self.push(path);
    }

    /// Zeichnet den Dualgraphen: Schwerpunkt, Kantenmitte, Schwerpunkt.
    /// Schnittkanten rot gestrichelt.
    fn draw_dual_graph(&mut self, graph: &DualGraph) {
        let mut open = (Data::new(), 0usize);
        let mut cut = (Data::new(), 0usize);
        for t in 0..graph.node_count() as u32 {
            let from = graph.centroid(t);
            for edge in graph.neighbors(t).iter().filter(|e| e.target > t) {
                let to = graph.centroid(edge.target);
                let (data, count) = if edge.cut { &mut cut } else { &mut open };
                *data = std::mem::replace(data, Data::new())
                    .move_to((from.x, from.y))
                    .line_to((edge.midpoint.x, edge.midpoint.y))
                    .line_to((to.x, to.y));
                *count += 1;
            }
        }

        let mut group = Group::new().set("id", "dual-graph");
        if open.1 > 0 {
            group = group.add(
                SvgPath::new()
                    .set("d", open.0)
                    .set("fill", "none")
                    .set("stroke", "#1f78b4")
                    .set("stroke-width", self.stroke_w_thin),
            );
        }
        if cut.1 > 0 {
            group = group.add(
                SvgPath::new()
                    .set("d", cut.0)
                    .set("fill", "none")
                    .set("stroke", "#e31a1c")
                    .set("stroke-dasharray", "2,2")
                    .set("stroke-width", self.stroke_w_thin),
            );
        }
        self.push(group);
    }

    /// Zeichnet einen Punkt.
    fn draw_point(&mut self, point: &Point3D) {
        let circle = Circle::new()
            .set("cx", point.x)
            .set("cy", point.y)
            .set("r", self.point_radius)
            .set("fill", "#cc0000")
            .set("stroke", "none");
        self.push(circle);
    }

    /// Zeichnet einen Rahmen um die Bounding Box.
    fn draw_bounds(&mut self, bounds: &Bounds2D) {
        let rect = Rectangle::new()
            .set("x", bounds.min.x)
            .set("y", bounds.min.y)
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", "none")
            .set("stroke", "#888888")
            .set("stroke-dasharray", "2,2")
            .set("stroke-width", self.stroke_w_thin);
        self.push(rect);
    }

    /// Speichert die SVG-Datei.
    fn save(self, filename: &Path) -> io::Result<()> {
        let document = self.document.add(self.layer);
        svg::save(filename, &document)?;
        info!("Debug SVG '{}' written", filename.display());
        Ok(())
    }
}

/// Erstellt eine SVG-Datei mit allen Zellen, optional dem Dualgraphen und einer
/// Auswahl der Punkte.
pub fn write_cell_svg(
    filename: impl AsRef<Path>,
    cells: &[CellPolygon],
    dual_graph: Option<&DualGraph>,
    points: &[Point3D],
) -> io::Result<()> {
    let filename = filename.as_ref();
    if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut bounds = cells
        .iter()
        .filter_map(CellPolygon::bounds)
        .fold(Bounds2D::empty(), |acc, b| acc.union(b));
    if let Some(point_bounds) = Bounds2D::from_points_iter(points.iter()) {
        bounds = bounds.union(&point_bounds);
    }
    if bounds.is_empty() {
        bounds = Bounds2D {
            min: Point2D::new(0.0, 0.0),
            max: Point2D::new(1.0, 1.0),
        };
    }

    let display_bounds = bounds.expand((bounds.width() + bounds.height()) * 0.025);
    let mut svg = SvgBuilder::new(&display_bounds, 1024.0);
    svg.draw_bounds(&bounds);
    for (index, cell) in cells.iter().enumerate() {
        svg.draw_cell(index, cell);
    }
    if let Some(graph) = dual_graph {
        svg.draw_dual_graph(graph);
    }
    for p in points {
        svg.draw_point(p);
    }
    svg.save(filename)
}
