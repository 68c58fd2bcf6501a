// src/math/types/bounds.rs

use crate::math::{error::*, types::*};
use std::fmt;

/// 2D Bounding Box (Axis-Aligned Bounding Box) in der XY-Ebene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine neue Bounding Box
    pub fn new(min: Point2D, max: Point2D) -> MathResult<Self> {
        if min.x > max.x || min.y > max.y {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid bounds: min {:?} > max {:?}", min, max),
            });
        }

        Ok(Self { min, max })
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt (Z wird ignoriert)
    pub fn from_points_iter<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut points_iter = points.into_iter();
        let first = points_iter.next()?;

        let mut bounds = Self {
            min: Point2D::new(first.x, first.y),
            max: Point2D::new(first.x, first.y),
        };
        for point in points_iter {
            bounds.expand_to_include_xy(point.x, point.y);
        }

        Some(bounds)
    }

    /// Leere Bounding Box (ungültig)
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Prüft ob die Bounding Box leer ist
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Prüft ob eine XY-Koordinate in der (geschlossenen) Bounding Box liegt
    #[inline]
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }

    /// Erweitert die Bounding Box um eine XY-Koordinate
    pub fn expand_to_include_xy(&mut self, x: f64, y: f64) {
        self.min.x = self.min.x.min(x);
        self.min.y = self.min.y.min(y);
        self.max.x = self.max.x.max(x);
        self.max.y = self.max.y.max(y);
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds2D) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self {
            min: Point2D::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2D::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Erweitert die Bounding Box um einen Margin
    pub fn expand(&self, margin: f64) -> Self {
        if self.is_empty() {
            return *self;
        }

        Self {
            min: Point2D::new(self.min.x - margin, self.min.y - margin),
            max: Point2D::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Bounds2D(empty)")
        } else {
            write!(
                f,
                "Bounds2D(({}, {}) to ({}, {}))",
                self.min.x, self.min.y, self.max.x, self.max.y
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let pts = [point3(1.0, 5.0, 9.0), point3(-2.0, 3.0, 0.0), point3(4.0, -1.0, 2.0)];
        let b = Bounds2D::from_points_iter(pts.iter()).unwrap();
        assert_eq!(b.min, Point2D::new(-2.0, -1.0));
        assert_eq!(b.max, Point2D::new(4.0, 5.0));
        assert!(b.contains_xy(4.0, 5.0));
        assert!(!b.contains_xy(4.0001, 5.0));
    }

    #[test]
    fn test_empty_bounds() {
        let empty = Bounds2D::empty();
        assert!(empty.is_empty());
        assert!(Bounds2D::from_points_iter(std::iter::empty::<&Point3D>()).is_none());

        let b = Bounds2D::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)).unwrap();
        assert_eq!(empty.union(&b), b);
        assert!(Bounds2D::new(Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)).is_err());
    }
}
