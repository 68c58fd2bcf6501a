// src/partition/assignment.rs

/// Markierung für Punkte ohne Zelle
pub const UNASSIGNED: u32 = u32::MAX;

/// Zuordnung Punktindex → Zellindex.
///
/// Jeder Slot wird genau einmal von genau einem Worker geschrieben.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentTable {
    slots: Vec<u32>,
}

impl AssignmentTable {
    /// Tabelle mit `len` unzugeordneten Punkten
    pub fn unassigned(len: usize) -> Self {
        Self {
            slots: vec![UNASSIGNED; len],
        }
    }

    pub(crate) fn from_slots(slots: Vec<u32>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Zellindex eines Punktes, `None` wenn unzugeordnet
    pub fn get(&self, point: usize) -> Option<usize> {
        match self.slots.get(point) {
            Some(&cell) if cell != UNASSIGNED => Some(cell as usize),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|&&c| c != UNASSIGNED).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.len() - self.assigned_count()
    }

    /// Gruppiert die Punktindizes nach Zelle (Counting Sort, stabil).
    /// Zuordnungen zu Zellen `>= cell_count` werden ignoriert.
    pub fn buckets(&self, cell_count: usize) -> RegionBuckets {
        let mut offsets = vec![0usize; cell_count + 1];
        for &cell in &self.slots {
            if (cell as usize) < cell_count {
                offsets[cell as usize + 1] += 1;
            }
        }
        for c in 0..cell_count {
            offsets[c + 1] += offsets[c];
        }

        let mut cursor = offsets.clone();
        let mut indices = vec![0usize; offsets[cell_count]];
        for (point, &cell) in self.slots.iter().enumerate() {
            if (cell as usize) < cell_count {
                indices[cursor[cell as usize]] = point;
                cursor[cell as usize] += 1;
            }
        }

        RegionBuckets { offsets, indices }
    }
}

/// Punktindizes pro Zelle, jeweils aufsteigend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBuckets {
    offsets: Vec<usize>,
    indices: Vec<usize>,
}

impl RegionBuckets {
    pub fn cell_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn bucket(&self, cell: usize) -> &[usize] {
        &self.indices[self.offsets[cell]..self.offsets[cell + 1]]
    }

    /// Summe aller Bucket-Größen
    pub fn total(&self) -> usize {
        self.indices.len()
    }

    /// Zellen mit mindestens einem Punkt, in Zellreihenfolge
    pub fn nonempty(&self) -> impl Iterator<Item = (usize, &[usize])> {
        (0..self.cell_count())
            .map(|cell| (cell, self.bucket(cell)))
            .filter(|(_, bucket)| !bucket.is_empty())
    }
}
