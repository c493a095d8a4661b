//! Cycle and edge collections shared by the detector and the solvers.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use indexmap::IndexSet;

use crate::graph::Edge;

/// Insertion-ordered set of edges. Membership is by `(from, to)`.
pub type EdgeSet<V> = IndexSet<Edge<V>>;

/// Insertion-ordered set of cycles. Membership is by edge-set equality.
pub type CycleSet<V> = IndexSet<Cycle<V>>;

/// A closed walk through the graph, stored as its edges in walk order.
///
/// Two cycles are equal when they hold the same edges, whatever the order:
/// `a -> b -> c -> a` and `b -> c -> a -> b` are the same cycle.
#[derive(Debug, Clone)]
pub struct Cycle<V> {
    edges: Vec<Edge<V>>,
    fingerprint: u64,
}

impl<V: Hash> Cycle<V> {
    /// Create a cycle from its edges in walk order.
    ///
    /// Returns `None` if `edges` is empty.
    #[must_use]
    pub fn new(edges: Vec<Edge<V>>) -> Option<Self> {
        if edges.is_empty() {
            return None;
        }
        // Order-independent, so rotations of the same walk hash alike
        let fingerprint = edges.iter().fold(0u64, |acc, edge| {
            let mut hasher = DefaultHasher::new();
            edge.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        Some(Self { edges, fingerprint })
    }
}

impl<V> Cycle<V> {
    /// The edges of the cycle, in walk order.
    pub fn edges(&self) -> &[Edge<V>] {
        &self.edges
    }

    /// Number of edges (equivalently, of vertices) in the cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Always `false`: a cycle has at least one edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Vertices in walk order, starting from the first edge's source.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.edges.iter().map(|edge| edge.from())
    }
}

impl<V: PartialEq> Cycle<V> {
    /// Whether `edge` is part of the cycle.
    pub fn contains(&self, edge: &Edge<V>) -> bool {
        self.edges.contains(edge)
    }
}

impl<V: PartialEq> PartialEq for Cycle<V> {
    fn eq(&self, other: &Self) -> bool {
        self.edges.len() == other.edges.len() && self.edges.iter().all(|e| other.contains(e))
    }
}

impl<V: Eq> Eq for Cycle<V> {}

impl<V> Hash for Cycle<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.edges.len());
        state.write_u64(self.fingerprint);
    }
}

impl<V: fmt::Display> fmt::Display for Cycle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edge in &self.edges {
            write!(f, "{} → ", edge.from())?;
        }
        match self.edges.first() {
            Some(first) => write!(f, "{}", first.from()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(pairs: &[(&'static str, &'static str)]) -> Cycle<&'static str> {
        Cycle::new(pairs.iter().map(|&(f, t)| Edge::new(f, t, 1)).collect())
            .expect("non-empty cycle")
    }

    #[test]
    fn cycle_new_returns_none_for_empty_edges() {
        assert!(Cycle::<&str>::new(vec![]).is_none());
    }

    #[test]
    fn rotations_are_the_same_cycle() {
        let first = cycle(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let rotated = cycle(&[("b", "c"), ("c", "a"), ("a", "b")]);

        assert_eq!(first, rotated);

        let mut set = CycleSet::default();
        assert!(set.insert(first));
        assert!(!set.insert(rotated), "rotation must deduplicate");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn opposite_directions_are_different_cycles() {
        let forward = cycle(&[("a", "b"), ("b", "a")]);
        let longer = cycle(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let reversed = cycle(&[("a", "c"), ("c", "b"), ("b", "a")]);

        assert_ne!(forward, longer);
        assert_ne!(longer, reversed);
    }

    #[test]
    fn display_closes_the_walk() {
        let c = cycle(&[("a", "b"), ("b", "c"), ("c", "a")]);
        assert_eq!(c.to_string(), "a → b → c → a");
    }

    #[test]
    fn vertices_follow_walk_order() {
        let c = cycle(&[("x", "y"), ("y", "x")]);
        assert_eq!(c.vertices().copied().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(c.len(), 2);
        assert!(c.contains(&Edge::new("y", "x", 99)));
    }
}
