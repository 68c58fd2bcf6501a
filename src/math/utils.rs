// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON_F64: f64 = 1e-10;
    /// Toleranz für "Punkt liegt auf Segment"-Tests beim Markieren von Schnittkanten.
    pub const SKELETON_TOLERANCE: f64 = 1e-7;
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::types::Point2D;

    /// Berechnet das Kreuzprodukt (b - a) x (c - a)
    pub fn cross(a: Point2D, b: Point2D, c: Point2D) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }

    /// Abstand eines Punktes zum Segment [a, b]
    pub fn distance_to_segment(p: Point2D, a: Point2D, b: Point2D) -> f64 {
        let ab = b - a;
        let len_sq = ab.norm_squared();
        if len_sq == 0.0 {
            return (p - a).norm();
        }
        let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        (p - (a + ab * t)).norm()
    }

    /// Vorzeichenbehaftete Fläche eines offenen Rings (Shoelace), positiv für CCW
    pub fn signed_ring_area(ring: &[Point2D]) -> f64 {
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = ring[i];
            let p2 = ring[(i + 1) % n];
            sum += p1.x * p2.y - p2.x * p1.y;
        }
        sum * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::simple_geometry::*;
    use crate::math::types::Point2D;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_to_segment() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(10.0, 0.0);
        assert_relative_eq!(distance_to_segment(Point2D::new(5.0, 3.0), a, b), 3.0);
        assert_relative_eq!(distance_to_segment(Point2D::new(-4.0, 3.0), a, b), 5.0);
        assert_relative_eq!(distance_to_segment(Point2D::new(1.0, 1.0), a, a), 2f64.sqrt());
    }

    #[test]
    fn test_signed_ring_area() {
        let ccw = [
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(0.0, 2.0),
        ];
        assert_relative_eq!(signed_ring_area(&ccw), 4.0);
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_relative_eq!(signed_ring_area(&cw), -4.0);
        assert!(cross(ccw[0], ccw[1], ccw[2]) > 0.0);
    }
}
