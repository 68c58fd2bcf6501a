// src/partition/source.rs

use crate::math::types::Point3D;

/// Lesezugriff auf eine Punktwolke. Wird während der Klassifikation von allen Workern geteilt.
pub trait PointSource: Sync {
    fn len(&self) -> usize;

    fn point(&self, index: usize) -> Point3D;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PointSource for [Point3D] {
    fn len(&self) -> usize {
        <[Point3D]>::len(self)
    }

    fn point(&self, index: usize) -> Point3D {
        self[index]
    }
}

impl PointSource for Vec<Point3D> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn point(&self, index: usize) -> Point3D {
        self[index]
    }
}
