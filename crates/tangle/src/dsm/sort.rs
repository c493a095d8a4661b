//! Reordering a [`Dsm`].
//!
//! [`topological_sort`] orders the matrix so that every retained dependency
//! points forward. [`manual_sort`] applies an order chosen by the caller.

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use super::Dsm;
use crate::error::{Error, Result};

/// Sort `dsm` so that every non-feedback edge goes from a lower to a higher
/// position.
///
/// Works on the unsorted band between two boundaries. Vertices with no
/// incoming edge from the band move to its left end, vertices with no
/// outgoing edge into the band move to its right end, and both passes repeat
/// until neither moves anything.
///
/// # Errors
///
/// Returns [`Error::CyclicGraph`] if vertices are left in the band: the
/// matrix still has a cycle made of edges not marked as feedback.
pub fn topological_sort<V>(dsm: &mut Dsm<V>) -> Result<()>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    let mut band = Band {
        left: 0,
        end: dsm.dimension(),
    };

    loop {
        let pushed_left = band.push_left(dsm)?;
        let pushed_right = band.push_right(dsm)?;
        if !pushed_left && !pushed_right {
            break;
        }
    }

    if band.left < band.end {
        return Err(Error::CyclicGraph {
            remaining: band.end - band.left,
        });
    }

    debug!(vertices = dsm.dimension(), "DSM sorted topologically");
    Ok(())
}

/// Reorder `dsm` so that `order[k]` ends up at position `k`.
///
/// Vertices not named in `order` keep the positions left over after the
/// named ones were moved.
///
/// # Errors
///
/// Returns [`Error::VertexNotInDsm`] for a vertex the matrix does not hold,
/// and [`Error::IndexOutOfBounds`] if `order` is longer than the matrix.
pub fn manual_sort<V>(dsm: &mut Dsm<V>, order: &[V]) -> Result<()>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    for (position, vertex) in order.iter().enumerate() {
        let current = dsm
            .index_of(vertex)
            .ok_or_else(|| Error::VertexNotInDsm(format!("{vertex:?}")))?;
        dsm.permute(current, position)?;
    }
    Ok(())
}

/// Unsorted positions `left..end`.
struct Band {
    left: usize,
    end: usize,
}

impl Band {
    fn push_left<V>(&mut self, dsm: &mut Dsm<V>) -> Result<bool>
    where
        V: Eq + Hash + Clone + fmt::Debug,
    {
        let mut moved = false;
        let mut i = self.left;
        while i < self.end {
            if dsm.incoming_edge_count(i, self.left, self.end - 1)? == 0 {
                dsm.permute(i, self.left)?;
                self.left += 1;
                moved = true;
            }
            i += 1;
        }
        Ok(moved)
    }

    fn push_right<V>(&mut self, dsm: &mut Dsm<V>) -> Result<bool>
    where
        V: Eq + Hash + Clone + fmt::Debug,
    {
        let mut moved = false;
        let mut i = self.left;
        while i < self.end {
            if dsm.outgoing_edge_count(i, self.left, self.end - 1)? == 0 {
                dsm.permute(i, self.end - 1)?;
                self.end -= 1;
                moved = true;
            }
            i += 1;
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedGraph, Edge};
    use crate::types::EdgeSet;
    use rstest::rstest;

    fn dsm(
        edges: &[(&'static str, &'static str, u32)],
        feedback: &[(&'static str, &'static str)],
    ) -> Dsm<&'static str> {
        let graph = DirectedGraph::from_edges(edges.iter().copied()).expect("distinct edges");
        let feedback: EdgeSet<_> = feedback.iter().map(|&(f, t)| Edge::new(f, t, 0)).collect();
        Dsm::new(&graph, &feedback)
    }

    fn assert_forward(dsm: &Dsm<&str>) {
        for (from, to, cell) in dsm.occupied_cells() {
            if !cell.is_feedback() {
                assert!(from < to, "edge {from} -> {to} points backwards in {:?}", dsm.vertices());
            }
        }
    }

    #[rstest]
    #[case::chain(&[("c", "b", 1), ("b", "a", 1)], &[], &["c", "b", "a"])]
    #[case::broken_triangle(
        &[("a", "b", 1), ("b", "c", 1), ("c", "a", 1)],
        &[("c", "a")],
        &["a", "b", "c"]
    )]
    #[case::diamond(
        &[("d", "b", 1), ("d", "c", 1), ("b", "a", 1), ("c", "a", 1)],
        &[],
        &["d", "b", "c", "a"]
    )]
    fn sorts_acyclic_matrices(
        #[case] edges: &[(&'static str, &'static str, u32)],
        #[case] feedback: &[(&'static str, &'static str)],
        #[case] expected: &[&str],
    ) {
        let mut dsm = dsm(edges, feedback);
        topological_sort(&mut dsm).expect("acyclic once feedback is ignored");

        assert_eq!(dsm.vertices(), expected);
        assert_forward(&dsm);
    }

    #[test]
    fn unbroken_cycle_is_an_error() {
        let mut dsm = dsm(&[("x", "a", 1), ("a", "b", 1), ("b", "a", 1)], &[]);
        let err = topological_sort(&mut dsm).unwrap_err();
        assert!(matches!(err, Error::CyclicGraph { remaining: 2 }), "got {err:?}");
    }

    #[test]
    fn empty_matrix_sorts_trivially() {
        let mut dsm = dsm(&[], &[]);
        topological_sort(&mut dsm).expect("nothing to sort");
        assert_eq!(dsm.dimension(), 0);
    }

    #[test]
    fn manual_sort_applies_the_requested_order() {
        let mut dsm = dsm(&[("a", "b", 1), ("b", "c", 2)], &[]);
        manual_sort(&mut dsm, &["c", "a", "b"]).expect("all present");

        assert_eq!(dsm.vertices(), &["c", "a", "b"]);
        assert_eq!(dsm.cell(1, 2).expect("in range").weight(), 1);
        assert_eq!(dsm.cell(2, 0).expect("in range").weight(), 2);
    }

    #[test]
    fn manual_sort_with_a_prefix_moves_only_named_vertices() {
        let mut dsm = dsm(&[("a", "b", 1), ("b", "c", 2)], &[]);
        manual_sort(&mut dsm, &["c"]).expect("present");
        assert_eq!(dsm.vertices()[0], "c");
    }

    #[test]
    fn manual_sort_rejects_unknown_vertices() {
        let mut dsm = dsm(&[("a", "b", 1)], &[]);
        let err = manual_sort(&mut dsm, &["a", "zz"]).unwrap_err();
        assert!(matches!(err, Error::VertexNotInDsm(ref v) if v == "\"zz\""), "got {err:?}");
    }
}
