// src/io/boundary.rs

use crate::math::{
    geometry::{polygon::CellPolygon, triangulation::DomainInput},
    types::*,
};
use crate::partition::error::PartitionResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Boundary-Datei: Domänenrand, Gebäudelöcher und Schnittlinien als Koordinaten-Arrays.
///
/// ```json
/// { "epsg": 25832, "outer": [[0, 0], [10, 0], [10, 10], [0, 10]],
///   "holes": [[[4, 4], [6, 4], [6, 6], [4, 6]]], "cuts": [[[5, 0], [5, 4]]] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsg: Option<u32>,
    pub outer: Vec<Vec<f64>>,
    #[serde(default)]
    pub holes: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub cuts: Vec<Vec<Vec<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole_seeds: Option<Vec<[f64; 2]>>,
    /// Optionales grobes Skelett; markiert Netzkanten, fügt aber keine Constraints ein
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skeleton: Vec<Vec<Vec<f64>>>,
}

impl BoundaryInput {
    pub fn from_json_file(path: impl AsRef<Path>) -> PartitionResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_str(text: &str) -> PartitionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Konvertiert in die Eingabe der Triangulation
    pub fn to_domain_input(&self) -> PartitionResult<DomainInput> {
        let outer = parse_ring(&self.outer, "outer")?;
        let holes = self
            .holes
            .iter()
            .enumerate()
            .map(|(i, ring)| parse_ring(ring, &format!("holes[{}]", i)))
            .collect::<io::Result<Vec<_>>>()?;
        let cuts = self
            .cuts
            .iter()
            .enumerate()
            .map(|(i, line)| parse_ring(line, &format!("cuts[{}]", i)))
            .collect::<io::Result<Vec<_>>>()?;

        let skeleton = self
            .skeleton
            .iter()
            .enumerate()
            .map(|(i, line)| parse_ring(line, &format!("skeleton[{}]", i)))
            .collect::<io::Result<Vec<_>>>()?;

        let mut input = DomainInput::new(outer)
            .with_holes(holes)
            .with_cuts(cuts)
            .with_skeleton(skeleton);
        if let Some(seeds) = &self.hole_seeds {
            input = input.with_hole_seeds(seeds.iter().map(|[x, y]| Point2D::new(*x, *y)).collect());
        }
        Ok(input)
    }
}

fn parse_ring(coords: &[Vec<f64>], name: &str) -> io::Result<Vec<Point3D>> {
    coords
        .iter()
        .enumerate()
        .map(|(i, c)| {
            from_coords(c)
                .filter(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("{}[{}]: expected 2 or 3 finite coordinates, got {:?}", name, i, c),
                    )
                })
        })
        .collect()
}

#[derive(Serialize)]
struct CellRecord {
    index: usize,
    outer: Vec<[f64; 3]>,
    inner: Vec<Vec<[f64; 3]>>,
}

#[derive(Serialize)]
struct CellSetDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    epsg: Option<u32>,
    cells: Vec<CellRecord>,
}

fn to_document(cells: &[CellPolygon], epsg: Option<u32>) -> CellSetDocument {
    let to_coords = |ring: &Vec<Point3D>| -> Vec<[f64; 3]> {
        ring.iter().map(|p| [p.x, p.y, p.z]).collect()
    };
    CellSetDocument {
        epsg,
        cells: cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let rings = cell.closed_rings();
                CellRecord {
                    index,
                    outer: rings.first().map(to_coords).unwrap_or_default(),
                    inner: rings.iter().skip(1).map(to_coords).collect(),
                }
            })
            .collect(),
    }
}

/// Schreibt die Zellmenge als JSON; Ringe geschlossen, Reihenfolge = Zellindex.
pub fn write_cell_set(
    path: impl AsRef<Path>,
    cells: &[CellPolygon],
    epsg: Option<u32>,
) -> PartitionResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &to_document(cells, epsg))?;
    writer.flush()?;
    info!("Wrote {} cells to {}", cells.len(), path.display());
    Ok(())
}
