// src/io/point_cloud.rs

use crate::math::types::*;
use crate::partition::source::PointSource;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Punktwolke im Speicher, gelesen aus einer ASCII-XYZ-Datei
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3D>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points_iter(self.points.iter())
    }

    /// Liest `x y z` pro Zeile (Whitespace oder Komma). Leerzeilen und `#`-Kommentare
    /// werden übersprungen, weitere Spalten ignoriert, fehlendes Z ist 0.
    pub fn read_xyz(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let cloud = Self::parse_xyz(BufReader::new(File::open(path)?))?;
        info!("Read {} points from {}", cloud.len(), path.display());
        Ok(cloud)
    }

    pub fn parse_xyz<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut points = Vec::new();
        let mut coords = Vec::with_capacity(4);

        for (line_index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            coords.clear();
            for token in line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .take(3)
            {
                let value: f64 = token.parse().map_err(|_| {
                    invalid_line(line_index, &format!("'{}' is not a number", token))
                })?;
                coords.push(value);
            }

            let point = from_coords(&coords)
                .ok_or_else(|| invalid_line(line_index, "expected at least x and y"))?;
            points.push(point);
        }

        Ok(Self { points })
    }
}

fn invalid_line(line_index: usize, message: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("line {}: {}", line_index + 1, message),
    )
}

impl PointSource for PointCloud {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Point3D {
        self.points[index]
    }
}
