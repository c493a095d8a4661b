//! Sparse, serializable form of a [`Dsm`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Dsm;

/// A matrix stored as its vertex labels plus the non-empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsmData {
    /// Vertex labels in matrix order
    pub vertices: Vec<String>,
    /// Non-empty cells, by ascending offset
    pub cells: Vec<DsmDataCell>,
}

/// One non-empty cell of a [`DsmData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsmDataCell {
    /// `to * dimension + from`: the position in display order, where row
    /// `to` lists the vertices it is used by
    pub offset: usize,
    /// Edge weight
    pub weight: u32,
    /// Whether the edge is a feedback edge
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub feedback: bool,
}

impl DsmData {
    /// Number of vertices.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vertices.len()
    }

    /// `(from, to)` positions of a cell offset.
    #[must_use]
    pub fn position(&self, offset: usize) -> Option<(usize, usize)> {
        let n = self.dimension();
        (offset < n * n).then(|| (offset % n, offset / n))
    }
}

impl<V: fmt::Display> Dsm<V> {
    /// Export the non-empty cells with their display offsets.
    #[must_use]
    pub fn to_data(&self) -> DsmData {
        let n = self.dimension();
        let mut cells: Vec<DsmDataCell> = self
            .occupied_cells()
            .map(|(from, to, cell)| DsmDataCell {
                offset: to * n + from,
                weight: cell.weight(),
                feedback: cell.is_feedback(),
            })
            .collect();
        cells.sort_by_key(|cell| cell.offset);

        DsmData {
            vertices: self.vertices().iter().map(ToString::to_string).collect(),
            cells,
        }
    }
}
