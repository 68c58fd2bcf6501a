// src/math/types/point.rs
use super::*;

/// Erzeugt einen 3D-Punkt (x, y, z) in doppelter Genauigkeit.
pub fn point3(x: f64, y: f64, z: f64) -> Point3D {
    Point3D::new(x, y, z)
}

/// Projiziert einen 3D-Punkt auf die XY-Ebene.
pub fn xy(point: &Point3D) -> Point2D {
    Point2D::new(point.x, point.y)
}

/// Mittelpunkt einer Kante (wird u.a. als Position der Dualkanten genutzt).
pub fn edge_center(a: &Point3D, b: &Point3D) -> Point3D {
    Point3D::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0, (a.z + b.z) / 2.0)
}

/// Liest einen Punkt aus einem Koordinaten-Array `[x, y]` oder `[x, y, z]`.
/// Fehlendes Z wird als 0.0 angenommen.
pub fn from_coords(coords: &[f64]) -> Option<Point3D> {
    match *coords {
        [x, y] => Some(Point3D::new(x, y, 0.0)),
        [x, y, z, ..] => Some(Point3D::new(x, y, z)),
        _ => None,
    }
}

/// Konvertiert einen Ring in eine `geo::LineString` (XY-Projektion).
pub fn to_line_string(ring: &[Point3D]) -> geo::LineString<f64> {
    ring.iter()
        .map(|p| geo::Coord { x: p.x, y: p.y })
        .collect::<Vec<_>>()
        .into()
}
