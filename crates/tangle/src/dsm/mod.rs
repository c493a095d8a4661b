//! Design Structure Matrix.
//!
//! A [`Dsm`] projects a graph onto an explicit vertex order. Cell `(x, y)`
//! holds the edge from vertex `x` to vertex `y`, if there is one, and whether
//! that edge belongs to the feedback edge set.
//!
//! The only mutation is [`Dsm::permute`], which moves labels, rows and
//! columns together so every cell keeps its meaning. The sorters in [`sort`]
//! are built on it.
//!
//! The text form in [`text`] and the sparse export in [`data`] both display
//! the matrix transposed: row `r`, column `c` shows the edge from `c` to `r`,
//! so a vertex's dependencies read along its row.

pub mod data;
pub mod sort;
pub mod text;

use std::fmt;
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::graph::{DirectedGraphAccessor, Edge};
use crate::types::EdgeSet;

pub use data::{DsmData, DsmDataCell};
pub use sort::{manual_sort, topological_sort};
pub use text::{scan, scan_graph, DsmPrinter};

/// One cell of a [`Dsm`].
#[derive(Debug, Clone)]
pub struct DsmCell<V> {
    edge: Option<Edge<V>>,
    feedback: bool,
}

impl<V> DsmCell<V> {
    fn empty() -> Self {
        Self {
            edge: None,
            feedback: false,
        }
    }

    /// The edge shown by this cell.
    pub fn edge(&self) -> Option<&Edge<V>> {
        self.edge.as_ref()
    }

    /// Weight of the edge, or 0 for an empty cell.
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.edge.as_ref().map_or(0, Edge::weight)
    }

    /// Whether the edge belongs to the feedback edge set.
    #[must_use]
    pub fn is_feedback(&self) -> bool {
        self.feedback
    }

    /// Whether the cell counts as a dependency for sorting.
    fn is_retained(&self) -> bool {
        self.weight() > 0 && !self.feedback
    }
}

// Unlike `Edge`, cells compare weights too
impl<V: PartialEq> PartialEq for DsmCell<V> {
    fn eq(&self, other: &Self) -> bool {
        self.edge == other.edge
            && self.weight() == other.weight()
            && self.feedback == other.feedback
    }
}

impl<V: Eq> Eq for DsmCell<V> {}

/// Square matrix view of a graph over an ordered vertex list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dsm<V> {
    vertices: Vec<V>,
    /// Row-major, `cells[from * dimension + to]`
    cells: Vec<DsmCell<V>>,
}

impl<V> Dsm<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Build a matrix over every vertex of `graph`, in the graph's order.
    pub fn new<G>(graph: &G, feedback: &EdgeSet<V>) -> Self
    where
        G: DirectedGraphAccessor<V>,
    {
        Self::with_vertices(graph, graph.vertices().cloned(), feedback)
    }

    /// Build a matrix over `vertices`, in the given order.
    ///
    /// Edges of `graph` leaving the vertex list are not shown. Cells whose
    /// edge is in `feedback` are marked.
    pub fn with_vertices<G, I>(graph: &G, vertices: I, feedback: &EdgeSet<V>) -> Self
    where
        G: DirectedGraphAccessor<V>,
        I: IntoIterator<Item = V>,
    {
        let vertices: Vec<V> = vertices.into_iter().collect();
        let mut cells = Vec::with_capacity(vertices.len() * vertices.len());
        for from in &vertices {
            for to in &vertices {
                cells.push(match graph.get_edge(from, to) {
                    Some(edge) => DsmCell {
                        edge: Some(edge.clone()),
                        feedback: feedback.contains(edge),
                    },
                    None => DsmCell::empty(),
                });
            }
        }
        Self { vertices, cells }
    }

    /// Swap vertices `i` and `j`, with their rows and columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if either index is not below the
    /// dimension, even when `i == j`.
    pub fn permute(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_index(i)?;
        self.check_index(j)?;
        if i == j {
            return Ok(());
        }

        let n = self.dimension();
        self.vertices.swap(i, j);
        for k in 0..n {
            self.cells.swap(i * n + k, j * n + k);
        }
        for k in 0..n {
            self.cells.swap(k * n + i, k * n + j);
        }
        Ok(())
    }

    /// Position of `vertex`, if present.
    pub fn index_of(&self, vertex: &V) -> Option<usize> {
        self.vertices.iter().position(|v| v == vertex)
    }

    /// The vertex at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index beyond the dimension.
    pub fn vertex(&self, index: usize) -> Result<&V> {
        self.check_index(index)?;
        Ok(&self.vertices[index])
    }

    /// The cell for the edge from vertex `from` to vertex `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index beyond the dimension.
    pub fn cell(&self, from: usize, to: usize) -> Result<&DsmCell<V>> {
        self.check_index(from)?;
        self.check_index(to)?;
        Ok(&self.cells[from * self.dimension() + to])
    }

    /// Number of retained edges into `vertex` from positions `first..=last`.
    ///
    /// Empty cells and feedback edges are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index beyond the dimension.
    pub fn incoming_edge_count(&self, vertex: usize, first: usize, last: usize) -> Result<usize> {
        self.check_index(vertex)?;
        self.check_range(first, last)?;
        let n = self.dimension();
        Ok((first..=last)
            .filter(|&from| self.cells[from * n + vertex].is_retained())
            .count())
    }

    /// Number of retained edges from `vertex` into positions `first..=last`.
    ///
    /// Empty cells and feedback edges are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index beyond the dimension.
    pub fn outgoing_edge_count(&self, vertex: usize, first: usize, last: usize) -> Result<usize> {
        self.check_index(vertex)?;
        self.check_range(first, last)?;
        let row = vertex * self.dimension();
        Ok((first..=last)
            .filter(|&to| self.cells[row + to].is_retained())
            .count())
    }

    fn check_range(&self, first: usize, last: usize) -> Result<()> {
        self.check_index(first)?;
        if last >= first {
            self.check_index(last)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.dimension() {
            return Ok(());
        }
        Err(Error::IndexOutOfBounds {
            index,
            dimension: self.dimension(),
            vertices: self
                .vertices
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(" | "),
        })
    }
}

impl<V> Dsm<V> {
    /// Number of vertices.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices in matrix order.
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Whether any cell is marked as a feedback edge.
    #[must_use]
    pub fn has_feedback_edges(&self) -> bool {
        self.cells.iter().any(DsmCell::is_feedback)
    }

    /// Every non-empty cell as `(from, to, cell)` positions.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, &DsmCell<V>)> {
        let n = self.dimension();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.edge.is_some())
            .map(move |(offset, cell)| (offset / n, offset % n, cell))
    }

    /// Cell lookup for callers that already checked the bounds.
    fn cell_at(&self, from: usize, to: usize) -> &DsmCell<V> {
        &self.cells[from * self.dimension() + to]
    }
}

impl<V: fmt::Display> fmt::Display for Dsm<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DsmPrinter::default().write_to(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DirectedGraph;

    fn cycle_graph() -> DirectedGraph<&'static str> {
        DirectedGraph::from_edges([("a", "b", 1), ("b", "c", 2), ("c", "a", 3)])
            .expect("distinct edges")
    }

    fn weights(dsm: &Dsm<&str>) -> Vec<Vec<u32>> {
        (0..dsm.dimension())
            .map(|from| {
                (0..dsm.dimension())
                    .map(|to| dsm.cell(from, to).expect("in range").weight())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn cells_hold_edges_from_row_to_column() {
        let mut feedback = EdgeSet::default();
        feedback.insert(Edge::new("c", "a", 3));
        let dsm = Dsm::new(&cycle_graph(), &feedback);

        assert_eq!(dsm.vertices(), &["a", "b", "c"]);
        assert_eq!(weights(&dsm), vec![vec![0, 1, 0], vec![0, 0, 2], vec![3, 0, 0]]);
        assert!(dsm.cell(2, 0).expect("in range").is_feedback());
        assert!(!dsm.cell(0, 1).expect("in range").is_feedback());
        assert!(dsm.has_feedback_edges());
    }

    #[test]
    fn with_vertices_restricts_and_orders_the_matrix() {
        let dsm = Dsm::with_vertices(&cycle_graph(), ["c", "a"], &EdgeSet::default());

        assert_eq!(dsm.dimension(), 2);
        assert_eq!(weights(&dsm), vec![vec![0, 3], vec![0, 0]]);
        assert!(!dsm.has_feedback_edges());
    }

    #[test]
    fn permute_moves_rows_and_columns_together() {
        let mut dsm = Dsm::new(&cycle_graph(), &EdgeSet::default());
        dsm.permute(0, 2).expect("in range");

        assert_eq!(dsm.vertices(), &["c", "b", "a"]);
        let cell = dsm.cell(0, 2).expect("in range");
        let edge = cell.edge().expect("c -> a is present");
        assert_eq!((*edge.from(), *edge.to(), edge.weight()), ("c", "a", 3));
    }

    #[test]
    fn permute_twice_restores_the_matrix() {
        let original = Dsm::new(&cycle_graph(), &EdgeSet::default());
        let mut dsm = original.clone();

        dsm.permute(0, 1).expect("in range");
        assert_ne!(dsm, original);
        dsm.permute(1, 0).expect("in range");
        assert_eq!(dsm, original);

        dsm.permute(1, 1).expect("in range");
        assert_eq!(dsm, original);
    }

    #[test]
    fn out_of_range_permute_lists_every_vertex() {
        let mut dsm = Dsm::new(&cycle_graph(), &EdgeSet::default());

        let err = dsm.permute(0, 3).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::IndexOutOfBounds { index: 3, dimension: 3, .. }));
        assert!(message.contains("\"a\" | \"b\" | \"c\""), "got: {message}");

        // Bounds are checked before the no-op shortcut
        assert!(dsm.permute(5, 5).is_err());
    }

    #[test]
    fn edge_counts_skip_feedback_cells_and_respect_the_band() {
        let mut feedback = EdgeSet::default();
        feedback.insert(Edge::new("c", "a", 3));
        let dsm = Dsm::new(&cycle_graph(), &feedback);

        assert_eq!(dsm.incoming_edge_count(0, 0, 2).expect("in range"), 0);
        assert_eq!(dsm.incoming_edge_count(1, 0, 2).expect("in range"), 1);
        assert_eq!(dsm.incoming_edge_count(1, 1, 2).expect("in range"), 0);
        assert_eq!(dsm.outgoing_edge_count(1, 0, 2).expect("in range"), 1);
        assert_eq!(dsm.outgoing_edge_count(2, 0, 2).expect("in range"), 0);
        assert!(dsm.outgoing_edge_count(0, 0, 3).is_err());
    }

    /// Dependencies kept outside [`DirectedGraph`].
    struct AdjacencyList {
        vertices: Vec<String>,
        edges: Vec<Edge<String>>,
    }

    impl DirectedGraphAccessor<String> for AdjacencyList {
        fn get_edge(&self, from: &String, to: &String) -> Option<&Edge<String>> {
            self.edges.iter().find(|e| e.from() == from && e.to() == to)
        }

        fn vertices<'a>(&'a self) -> impl Iterator<Item = &'a String>
        where
            String: 'a,
        {
            self.vertices.iter()
        }

        fn outgoing_edges<'a>(&'a self, from: &String) -> impl Iterator<Item = &'a Edge<String>>
        where
            String: 'a,
        {
            let from = from.clone();
            self.edges.iter().filter(move |e| *e.from() == from)
        }

        fn incoming_edges<'a>(&'a self, to: &String) -> impl Iterator<Item = &'a Edge<String>>
        where
            String: 'a,
        {
            let to = to.clone();
            self.edges.iter().filter(move |e| *e.to() == to)
        }
    }

    #[test]
    fn matrix_is_built_from_any_accessor() {
        let list = AdjacencyList {
            vertices: vec!["api".to_string(), "core".to_string()],
            edges: vec![Edge::new("api".to_string(), "core".to_string(), 2)],
        };
        assert!(list.has_edge(&"api".to_string(), &"core".to_string()));
        assert_eq!(list.outgoing_edges(&"api".to_string()).count(), 1);
        assert_eq!(list.incoming_edges(&"api".to_string()).count(), 0);

        let dsm = Dsm::new(&list, &EdgeSet::default());

        assert_eq!(dsm.vertex(1).expect("in range"), "core");
        assert!(matches!(
            dsm.vertex(2),
            Err(Error::IndexOutOfBounds { index: 2, dimension: 2, .. })
        ));
        assert_eq!(dsm.cell(0, 1).expect("in range").weight(), 2);
    }

    #[test]
    fn occupied_cells_report_positions() {
        let dsm = Dsm::new(&cycle_graph(), &EdgeSet::default());
        let positions: Vec<(usize, usize)> =
            dsm.occupied_cells().map(|(from, to, _)| (from, to)).collect();
        assert_eq!(positions, vec![(0, 1), (1, 2), (2, 0)]);
    }
}
