// src/math/geometry/polygon/properties.rs

use crate::math::geometry::polygon::CellPolygon;
use crate::math::types::*;
use crate::math::utils::{constants::EPSILON_F64, simple_geometry::signed_ring_area};
use geo::Area;

/// Trait für Polygon-Eigenschaften
pub trait PolygonProperties {
    /// Fläche des Polygons (äußerer Ring minus Löcher)
    fn area(&self) -> f64;

    /// Prüft ob ein Punkt innerhalb des Polygons liegt (Even-Odd / Crossing Number).
    ///
    /// Z wird ignoriert. Punkte außerhalb der Bounding Box werden sofort verworfen,
    /// das Ergebnis ist identisch zum vollständigen Test.
    ///
    /// Randpunkte: jede Kante ist in y halboffen (`(vi.y > y) != (vj.y > y)`) und
    /// zählt nur Schnitte echt rechts vom Punkt. Punkte auf linken und unteren
    /// Kanten gelten daher meist als innen, Punkte auf rechten und oberen Kanten
    /// als außen. Es gibt bewusst keine Epsilon-Behandlung.
    fn contains_point(&self, point: &Point3D) -> bool;

    /// Orientierung des äußeren Rings
    fn orientation(&self) -> Orientation;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

impl PolygonProperties for CellPolygon {
    fn area(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.to_geo().unsigned_area()
    }

    fn contains_point(&self, point: &Point3D) -> bool {
        if self.is_degenerate() {
            return false;
        }
        match self.bounds() {
            Some(bounds) if bounds.contains_xy(point.x, point.y) => {}
            _ => return false,
        }

        let mut inside = false;
        for ring in self.rings() {
            if point_in_ring(ring, point.x, point.y) {
                inside = !inside;
            }
        }
        inside
    }

    fn orientation(&self) -> Orientation {
        ring_orientation(self.exterior())
    }
}

/// Crossing-Number-Test gegen einen einzelnen offenen Ring.
/// Ringe mit weniger als 3 Vertices enthalten keinen Punkt.
#[inline]
pub fn point_in_ring(ring: &[Point3D], x: f64, y: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = &ring[i];
        let vj = &ring[j];

        if ((vi.y > y) != (vj.y > y)) && (x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Orientierung eines offenen Rings über die vorzeichenbehaftete Fläche
pub fn ring_orientation(ring: &[Point3D]) -> Orientation {
    let projected: Vec<Point2D> = ring.iter().map(xy).collect();
    let area = signed_ring_area(&projected);
    if area > EPSILON_F64 {
        Orientation::CounterClockwise
    } else if area < -EPSILON_F64 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Bestimmt einen inneren Punkt eines Rings.
///
/// Scanline durch die Mitte der größten Lücke zwischen den sortierten
/// Y-Koordinaten der Vertices; dort liegt kein Vertex, die Schnittpunkte
/// sind also eindeutig. Der Mittelpunkt des breitesten Innenintervalls wird genommen.
pub fn ring_interior_point(ring: &[Point3D]) -> Option<Point2D> {
    if ring.len() < 3 {
        return None;
    }

    let mut ys: Vec<f64> = ring.iter().map(|p| p.y).collect();
    ys.sort_by(f64::total_cmp);
    ys.dedup();

    let scan_y = ys
        .windows(2)
        .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])))
        .map(|w| (w[0] + w[1]) * 0.5)?;

    let n = ring.len();
    let mut crossings: Vec<f64> = Vec::new();
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if (a.y > scan_y) != (b.y > scan_y) {
            crossings.push(a.x + (scan_y - a.y) * (b.x - a.x) / (b.y - a.y));
        }
    }
    crossings.sort_by(f64::total_cmp);

    crossings
        .chunks_exact(2)
        .filter(|pair| pair[1] - pair[0] > EPSILON_F64)
        .max_by(|a, b| (a[1] - a[0]).total_cmp(&(b[1] - b[0])))
        .map(|pair| Point2D::new((pair[0] + pair[1]) * 0.5, scan_y))
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

    #[test]
    fn test_contains_point_basic() {
        let polygon = CellPolygon::new(square(0.0, 1.0));
        assert!(polygon.contains_point(&point3(0.5, 0.5, 100.0)));
        assert!(!polygon.contains_point(&point3(1.5, 0.5, 0.0)));
        assert!(!polygon.contains_point(&point3(0.5, -0.1, 0.0)));
    }

    #[test]
    fn test_degenerate_polygon_never_contains() {
        let line = CellPolygon::new(vec![point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0)]);
        assert!(!line.contains_point(&point3(0.5, 0.5, 0.0)));
        assert!(!CellPolygon::new(Vec::new()).contains_point(&point3(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_half_open_boundary_convention() {
        let polygon = CellPolygon::new(square(0.0, 1.0));
        // linke Kante innen, rechte Kante außen
        assert!(polygon.contains_point(&point3(0.0, 0.5, 0.0)));
        assert!(!polygon.contains_point(&point3(1.0, 0.5, 0.0)));
        // untere Kante innen, obere Kante außen
        assert!(polygon.contains_point(&point3(0.5, 0.0, 0.0)));
        assert!(!polygon.contains_point(&point3(0.5, 1.0, 0.0)));
    }

    #[test]
    fn test_bbox_prefilter_does_not_change_result() {
        use rand::{Rng, SeedableRng, rngs::StdRng};

        let star = CellPolygon::new(vec![
            point3(0.0, 3.0, 0.0),
            point3(1.0, 1.0, 0.0),
            point3(3.0, 0.5, 0.0),
            point3(1.2, -0.5, 0.0),
            point3(2.0, -3.0, 0.0),
            point3(0.0, -1.2, 0.0),
            point3(-2.0, -3.0, 0.0),
            point3(-1.2, -0.5, 0.0),
            point3(-3.0, 0.5, 0.0),
            point3(-1.0, 1.0, 0.0),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5000 {
            let p = point3(rng.random_range(-5.0..5.0), rng.random_range(-5.0..5.0), 0.0);
            let exact = point_in_ring(star.exterior(), p.x, p.y);
            assert_eq!(star.contains_point(&p), exact, "mismatch at {:?}", p);
        }
    }

    #[test]
    fn test_inner_rings_are_outside() {
        let polygon = CellPolygon::with_interiors(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        assert!(polygon.contains_point(&point3(2.0, 2.0, 0.0)));
        assert!(!polygon.contains_point(&point3(5.0, 5.0, 0.0)));
        assert_relative_eq!(polygon.area(), 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_orientation() {
        let ccw = square(0.0, 1.0);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_eq!(ring_orientation(&ccw), Orientation::CounterClockwise);
        assert_eq!(ring_orientation(&cw), Orientation::Clockwise);
        assert_eq!(
            ring_orientation(&[point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 0.0), point3(2.0, 2.0, 0.0)]),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_interior_point_concave() {
        // U-Form: der Schwerpunkt liegt außerhalb
        let u_shape = vec![
            point3(0.0, 0.0, 0.0),
            point3(3.0, 0.0, 0.0),
            point3(3.0, 3.0, 0.0),
            point3(2.0, 3.0, 0.0),
            point3(2.0, 1.0, 0.0),
            point3(1.0, 1.0, 0.0),
            point3(1.0, 3.0, 0.0),
            point3(0.0, 3.0, 0.0),
        ];
        let p = ring_interior_point(&u_shape).unwrap();
        assert!(point_in_ring(&u_shape, p.x, p.y));
        assert!(ring_interior_point(&u_shape[..2]).is_none());
    }
}
