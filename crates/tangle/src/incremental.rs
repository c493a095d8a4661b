//! Interleaved cycle detection and feedback edge set solving.
//!
//! Enumerating every cycle up front is hopeless on dense graphs, so
//! [`IncrementalSolver`] grows the cycle set a batch at a time:
//!
//! 1. find the short cycles with a depth-bounded search
//! 2. solve for a feedback edge set over the cycles known so far
//! 3. search again with that set excluded, stopping after a batch of cycles
//! 4. merge the new cycles, re-solve, and repeat 3 until a search finds none
//!
//! When the loop ends, the graph restricted to the searched vertices is
//! acyclic once the final feedback edges are removed: the last search ran with
//! exactly those edges excluded and found nothing.

use std::fmt;
use std::hash::Hash;

use tracing::{debug, info, trace};

use crate::cycles::{CycleDetector, SearchLimit};
use crate::feedback::{FeedbackSolution, FeedbackSolver};
use crate::graph::DirectedGraph;
use crate::types::{CycleSet, EdgeSet};

/// Depth bound of the first, cheap search round.
pub const DEFAULT_INITIAL_SEARCH_DEPTH: usize = 3;

/// Cycle bound of every later search round.
pub const DEFAULT_MAX_CYCLES_PER_ROUND: usize = 100;

/// Incremental cycle and feedback edge set solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncrementalSolver {
    initial_search_depth: usize,
    max_cycles_per_round: usize,
    feedback: FeedbackSolver,
}

impl Default for IncrementalSolver {
    fn default() -> Self {
        Self {
            initial_search_depth: DEFAULT_INITIAL_SEARCH_DEPTH,
            max_cycles_per_round: DEFAULT_MAX_CYCLES_PER_ROUND,
            feedback: FeedbackSolver::default(),
        }
    }
}

/// Result of an incremental solve.
#[derive(Debug, Clone)]
pub struct IncrementalOutcome<V> {
    cycles: CycleSet<V>,
    solution: FeedbackSolution<V>,
    search_calls: u64,
    solver_calls: u64,
    rounds: usize,
}

impl<V> IncrementalOutcome<V> {
    /// Every cycle discovered along the way.
    pub fn cycles(&self) -> &CycleSet<V> {
        &self.cycles
    }

    /// The final feedback edge set.
    pub fn feedback_edges(&self) -> &EdgeSet<V> {
        self.solution.edges()
    }

    /// Total weight of the final feedback edge set.
    #[must_use]
    pub fn feedback_weight(&self) -> u64 {
        self.solution.weight()
    }

    /// The final solution, including its own search counter.
    pub fn solution(&self) -> &FeedbackSolution<V> {
        &self.solution
    }

    /// Vertices entered by every cycle search, summed over all rounds.
    #[must_use]
    pub fn search_calls(&self) -> u64 {
        self.search_calls
    }

    /// Exact-search visits, summed over all rounds.
    #[must_use]
    pub fn solver_calls(&self) -> u64 {
        self.solver_calls
    }

    /// Number of cycle searches run.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Split into the discovered cycles and the final feedback edges.
    pub fn into_parts(self) -> (CycleSet<V>, EdgeSet<V>) {
        (self.cycles, self.solution.into_edges())
    }
}

impl IncrementalSolver {
    /// Create a solver with explicit bounds.
    #[must_use]
    pub fn new(
        initial_search_depth: usize,
        max_cycles_per_round: usize,
        feedback: FeedbackSolver,
    ) -> Self {
        Self {
            initial_search_depth,
            max_cycles_per_round,
            feedback,
        }
    }

    /// The feedback edge set solver run after every round.
    #[must_use]
    pub fn feedback_solver(&self) -> FeedbackSolver {
        self.feedback
    }

    /// Find the cycles of the subgraph induced by `vertices` and a feedback
    /// edge set breaking all of them.
    pub fn solve<'a, V, I>(&self, graph: &DirectedGraph<V>, vertices: I) -> IncrementalOutcome<V>
    where
        I: IntoIterator<Item = &'a V>,
        V: Eq + Hash + Clone + fmt::Debug + 'a,
    {
        let vertices: Vec<&V> = vertices.into_iter().collect();
        debug!(
            vertices = vertices.len(),
            initial_search_depth = self.initial_search_depth,
            max_cycles_per_round = self.max_cycles_per_round,
            "Starting incremental cycle analysis"
        );

        let first = CycleDetector::with_vertices(graph, vertices.iter().copied())
            .detect(SearchLimit::MaxDepth(self.initial_search_depth));
        let mut search_calls = first.search_calls();
        let mut cycles = first.into_cycles();
        let mut solution = self.feedback.solve(&cycles);
        let mut solver_calls = solution.search_calls();
        let mut rounds = 1;

        trace!(
            round = rounds,
            cycles = cycles.len(),
            weight = solution.weight(),
            "Depth-bounded round complete"
        );

        loop {
            rounds += 1;
            let found = CycleDetector::with_vertices(graph, vertices.iter().copied())
                .excluding(solution.edges())
                .detect(SearchLimit::MaxCycles(self.max_cycles_per_round));
            search_calls += found.search_calls();

            if found.cycles().is_empty() {
                break;
            }

            let new_cycles = found.cycles().len();
            cycles.extend(found.into_cycles());
            solution = self.feedback.solve(&cycles);
            solver_calls += solution.search_calls();

            trace!(
                round = rounds,
                new_cycles,
                cycles = cycles.len(),
                weight = solution.weight(),
                "Round complete"
            );
        }

        info!(
            cycles = cycles.len(),
            feedback_edges = solution.edges().len(),
            weight = solution.weight(),
            rounds,
            search_calls,
            "Incremental cycle analysis complete"
        );

        IncrementalOutcome {
            cycles,
            solution,
            search_calls,
            solver_calls,
            rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DirectedGraphAccessor, Edge};

    fn graph(edges: &[(&'static str, &'static str, u32)]) -> DirectedGraph<&'static str> {
        DirectedGraph::from_edges(edges.iter().copied()).expect("distinct edges")
    }

    fn all(g: &DirectedGraph<&'static str>) -> Vec<&'static str> {
        g.vertices().copied().collect()
    }

    #[test]
    fn acyclic_graph_needs_nothing() {
        let g = graph(&[("a", "b", 1), ("b", "c", 1), ("a", "c", 1)]);
        let outcome = IncrementalSolver::default().solve(&g, &all(&g));

        assert!(outcome.cycles().is_empty());
        assert!(outcome.feedback_edges().is_empty());
        assert_eq!(outcome.feedback_weight(), 0);
        assert_eq!(outcome.rounds(), 2);
    }

    #[test]
    fn cycles_beyond_the_initial_depth_are_found_in_later_rounds() {
        let g = graph(&[
            ("a", "b", 1),
            ("b", "c", 1),
            ("c", "d", 1),
            ("d", "e", 1),
            ("e", "a", 4),
        ]);
        let outcome = IncrementalSolver::default().solve(&g, &all(&g));

        assert_eq!(outcome.cycles().len(), 1);
        assert_eq!(outcome.feedback_weight(), 1);
        assert!(outcome.rounds() >= 3);
        assert!(g.is_acyclic_without(&all(&g), outcome.feedback_edges()));
    }

    #[test]
    fn complete_graph_keeps_one_direction_per_pair() {
        let names = ["a", "b", "c", "d"];
        let mut g = DirectedGraph::new();
        for from in names {
            for to in names {
                if from != to {
                    g.add_edge(from, to, 1).expect("distinct edges");
                }
            }
        }

        let outcome = IncrementalSolver::default().solve(&g, &names);

        assert_eq!(outcome.feedback_weight(), 6);
        assert!(outcome.solution().hits_every(outcome.cycles()));
        assert!(g.is_acyclic_without(&names, outcome.feedback_edges()));
        assert!(outcome.search_calls() > 0);
        assert!(outcome.solver_calls() > 0);
    }

    #[test]
    fn only_the_requested_vertices_are_analyzed() {
        let g = graph(&[("a", "b", 1), ("b", "a", 1), ("c", "d", 1), ("d", "c", 1)]);
        let outcome = IncrementalSolver::default().solve(&g, &["c", "d"]);

        assert_eq!(outcome.cycles().len(), 1);
        let (_, edges) = outcome.into_parts();
        assert!(edges.iter().all(|e: &Edge<_>| *e.from() != "a" && *e.from() != "b"));
    }
}
