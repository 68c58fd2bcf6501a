// src/math/geometry/polygon/core.rs

use crate::math::{error::*, types::*};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polygon einer Zelle der finalen Partition.
///
/// Ein äußerer Ring plus null oder mehr innere Ringe (Löcher). Die Ringe werden
/// offen gespeichert: ein duplizierter Schlusspunkt wird beim Erstellen entfernt.
/// Z wird mitgeführt (2.5-D), für Punkt-in-Polygon-Tests aber ignoriert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RingSet", try_from = "RingSet")]
pub struct CellPolygon {
    exterior: Vec<Point3D>,
    interiors: Vec<Vec<Point3D>>,
    /// Einmal beim Erstellen berechnet; `None` bei leerem äußeren Ring.
    bounds: Option<Bounds2D>,
}

impl CellPolygon {
    /// Erstellt ein Polygon aus einem äußeren Ring ohne Löcher.
    /// Entartete Ringe (< 3 Vertices) werden akzeptiert; sie enthalten nie einen Punkt.
    pub fn new(exterior: Vec<Point3D>) -> Self {
        Self::with_interiors(exterior, Vec::new())
    }

    /// Erstellt ein Polygon mit inneren Ringen.
    pub fn with_interiors(exterior: Vec<Point3D>, interiors: Vec<Vec<Point3D>>) -> Self {
        let exterior = open_ring(exterior);
        let interiors = interiors.into_iter().map(open_ring).collect();
        let bounds = Bounds2D::from_points_iter(exterior.iter());

        Self {
            exterior,
            interiors,
            bounds,
        }
    }

    /// Wie `new`, lehnt aber entartete Ringe ab.
    pub fn try_new(exterior: Vec<Point3D>) -> MathResult<Self> {
        let polygon = Self::new(exterior);
        if polygon.is_degenerate() {
            return Err(MathError::DegeneratePolygon {
                vertices: polygon.exterior.len(),
            });
        }
        Ok(polygon)
    }

    /// Rechteck aus zwei Ecken (z = 0), gegen den Uhrzeigersinn.
    pub fn rectangle(min: Point2D, max: Point2D) -> Self {
        Self::new(vec![
            point3(min.x, min.y, 0.0),
            point3(max.x, min.y, 0.0),
            point3(max.x, max.y, 0.0),
            point3(min.x, max.y, 0.0),
        ])
    }

    pub fn exterior(&self) -> &[Point3D] {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Vec<Point3D>] {
        &self.interiors
    }

    /// Alle Ringe, äußerer zuerst.
    pub fn rings(&self) -> impl Iterator<Item = &[Point3D]> {
        std::iter::once(self.exterior.as_slice()).chain(self.interiors.iter().map(Vec::as_slice))
    }

    /// Anzahl der Vertices des äußeren Rings.
    pub fn len(&self) -> usize {
        self.exterior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    /// Weniger als 3 Vertices: kann keine Fläche umschließen.
    pub fn is_degenerate(&self) -> bool {
        self.exterior.len() < 3
    }

    /// Gecachte Bounding Box des äußeren Rings.
    pub fn bounds(&self) -> Option<&Bounds2D> {
        self.bounds.as_ref()
    }

    /// Ringe geschlossen (erster Vertex am Ende wiederholt), wie sie Vektorformate erwarten.
    pub fn closed_rings(&self) -> Vec<Vec<Point3D>> {
        self.rings()
            .filter(|ring| !ring.is_empty())
            .map(|ring| {
                let mut closed = ring.to_vec();
                closed.push(ring[0]);
                closed
            })
            .collect()
    }

    /// Konvertiert in ein `geo::Polygon` (XY-Projektion).
    pub fn to_geo(&self) -> geo::Polygon<f64> {
        geo::Polygon::new(
            to_line_string(&self.exterior),
            self.interiors.iter().map(|r| to_line_string(r)).collect(),
        )
    }
}

impl fmt::Display for CellPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CellPolygon({} vertices, {} holes",
            self.exterior.len(),
            self.interiors.len()
        )?;
        match &self.bounds {
            Some(bounds) => write!(f, ", {})", bounds),
            None => write!(f, ")"),
        }
    }
}

/// Entfernt einen duplizierten Schlusspunkt.
fn open_ring(mut ring: Vec<Point3D>) -> Vec<Point3D> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Serialisierte Form: Ringe als Koordinaten-Arrays.
#[derive(Serialize, Deserialize)]
struct RingSet {
    outer: Vec<[f64; 3]>,
    #[serde(default)]
    inner: Vec<Vec<[f64; 3]>>,
}

impl From<CellPolygon> for RingSet {
    fn from(polygon: CellPolygon) -> Self {
        let to_coords =
            |ring: &[Point3D]| -> Vec<[f64; 3]> { ring.iter().map(|p| [p.x, p.y, p.z]).collect() };
        Self {
            outer: to_coords(&polygon.exterior),
            inner: polygon.interiors.iter().map(|r| to_coords(r)).collect(),
        }
    }
}

impl TryFrom<RingSet> for CellPolygon {
    type Error = MathError;

    fn try_from(set: RingSet) -> MathResult<Self> {
        let to_points = |ring: Vec<[f64; 3]>| -> Vec<Point3D> {
            ring.into_iter().map(|[x, y, z]| point3(x, y, z)).collect()
        };
        let exterior = to_points(set.outer);
        if exterior.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(MathError::InvalidConfiguration {
                message: "Cell polygon contains non-finite coordinates".to_string(),
            });
        }
        Ok(Self::with_interiors(
            exterior,
            set.inner.into_iter().map(to_points).collect(),
        ))
    }
}
