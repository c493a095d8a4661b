//! Ranking of cycles and their edges for the feedback edge set search.

use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::graph::Edge;
use crate::types::{Cycle, CycleSet};

/// An edge annotated with how many of the input cycles it belongs to.
#[derive(Debug, Clone)]
pub struct FeedbackEdge<'c, V> {
    edge: &'c Edge<V>,
    occurrences: usize,
    relative_weight: f64,
    /// Dense index shared by every occurrence of the same edge.
    pub(crate) id: usize,
}

impl<'c, V> FeedbackEdge<'c, V> {
    fn new(edge: &'c Edge<V>, occurrences: usize, id: usize) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let relative_weight = f64::from(edge.weight()) / occurrences as f64;
        Self {
            edge,
            occurrences,
            relative_weight,
            id,
        }
    }

    /// The underlying edge.
    pub fn edge(&self) -> &'c Edge<V> {
        self.edge
    }

    /// Number of input cycles containing this edge.
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Weight divided by occurrences: the cost of cutting this edge per cycle
    /// it breaks.
    #[must_use]
    pub fn relative_weight(&self) -> f64 {
        self.relative_weight
    }

    /// Raw edge weight.
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.edge.weight()
    }

    fn cmp_relative(&self, other: &Self) -> Ordering {
        self.relative_weight.total_cmp(&other.relative_weight)
    }
}

/// A cycle whose edges are sorted cheapest-to-cut first.
#[derive(Debug, Clone)]
pub struct FeedbackCycle<'c, V> {
    cycle: &'c Cycle<V>,
    edges: Vec<FeedbackEdge<'c, V>>,
    total_occurrences: usize,
}

impl<'c, V> FeedbackCycle<'c, V> {
    /// The cycle this ranking was built from.
    pub fn cycle(&self) -> &'c Cycle<V> {
        self.cycle
    }

    /// Edges by ascending relative weight. Ties keep walk order.
    pub fn edges(&self) -> &[FeedbackEdge<'c, V>] {
        &self.edges
    }

    /// The cheapest edge to cut.
    pub fn cheapest(&self) -> Option<&FeedbackEdge<'c, V>> {
        self.edges.first()
    }

    /// Sum of the occurrence counts of the cycle's edges.
    #[must_use]
    pub fn total_occurrences(&self) -> usize {
        self.total_occurrences
    }

    fn search_order(&self, other: &Self) -> Ordering {
        self.total_occurrences
            .cmp(&other.total_occurrences)
            .then(self.edges.len().cmp(&other.edges.len()))
            .then_with(|| match (self.cheapest(), other.cheapest()) {
                (Some(a), Some(b)) => a.cmp_relative(b),
                _ => Ordering::Equal,
            })
    }
}

/// Annotate every edge of `cycles` with its occurrence count and return the
/// cycles in search order: ascending total occurrences, then ascending
/// length, then ascending relative weight of the cheapest edge.
///
/// Sorting is stable, so equal cycles keep their discovery order.
pub fn rank_cycles<V>(cycles: &CycleSet<V>) -> Vec<FeedbackCycle<'_, V>>
where
    V: Eq + Hash,
{
    let mut occurrences: IndexMap<&Edge<V>, usize> = IndexMap::new();
    for cycle in cycles {
        for edge in cycle.edges() {
            *occurrences.entry(edge).or_default() += 1;
        }
    }

    let mut ranked: Vec<FeedbackCycle<'_, V>> = cycles
        .iter()
        .map(|cycle| {
            let mut edges: Vec<FeedbackEdge<'_, V>> = cycle
                .edges()
                .iter()
                .filter_map(|edge| {
                    let (id, _, &count) = occurrences.get_full(edge)?;
                    Some(FeedbackEdge::new(edge, count, id))
                })
                .collect();
            edges.sort_by(FeedbackEdge::cmp_relative);
            let total_occurrences = edges.iter().map(FeedbackEdge::occurrences).sum();
            FeedbackCycle {
                cycle,
                edges,
                total_occurrences,
            }
        })
        .collect();

    ranked.sort_by(FeedbackCycle::search_order);
    ranked
}
