//! Minimum-weight feedback edge set over a set of cycles.
//!
//! Picking the cheapest set of edges that hits every cycle is NP-hard, so the
//! solver has two strategies:
//!
//! - **Exact** (fewer cycles than `max_cycles_for_exact_search`): depth-first
//!   branch-and-bound over the ranked cycles. A cycle already hit by the
//!   pending edges costs nothing; otherwise each of its edges is tried in turn.
//!   Branches whose weight reaches the best complete solution are pruned, and
//!   the whole search stops after `max_search_calls` visits, keeping the best
//!   solution found so far.
//! - **Heuristic** (otherwise): the cheapest edge of every cycle.
//!
//! Within one cycle, edges that occur in no other cycle are interchangeable
//! except for their weight, and edges are ranked by relative weight, so only
//! the first of them is ever branched on.
//!
//! The exact search runs on an explicit stack: its depth equals the number of
//! cycles, which is routinely in the thousands.

use std::hash::Hash;

use tracing::{debug, warn};

use super::ranking::{rank_cycles, FeedbackCycle};
use crate::graph::Edge;
use crate::types::{CycleSet, EdgeSet};

/// Cycle count from which the heuristic replaces the exact search.
pub const DEFAULT_MAX_CYCLES_FOR_EXACT_SEARCH: usize = 1500;

/// Maximum number of visits made by one exact search.
pub const DEFAULT_MAX_SEARCH_CALLS: u64 = 1_000_000;

/// Feedback edge set solver and its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackSolver {
    max_cycles_for_exact_search: usize,
    max_search_calls: u64,
}

impl Default for FeedbackSolver {
    fn default() -> Self {
        Self {
            max_cycles_for_exact_search: DEFAULT_MAX_CYCLES_FOR_EXACT_SEARCH,
            max_search_calls: DEFAULT_MAX_SEARCH_CALLS,
        }
    }
}

/// A set of edges hitting every input cycle.
#[derive(Debug, Clone)]
pub struct FeedbackSolution<V> {
    edges: EdgeSet<V>,
    weight: u64,
    search_calls: u64,
}

impl<V> FeedbackSolution<V> {
    /// The chosen edges.
    pub fn edges(&self) -> &EdgeSet<V> {
        &self.edges
    }

    /// Consume the solution, keeping the edges.
    pub fn into_edges(self) -> EdgeSet<V> {
        self.edges
    }

    /// Total weight of the chosen edges.
    #[must_use]
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Visits made by the exact search; zero on the heuristic path.
    #[must_use]
    pub fn search_calls(&self) -> u64 {
        self.search_calls
    }

    /// Whether no edge needs to be cut.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<V: Eq + Hash> FeedbackSolution<V> {
    /// Whether every cycle in `cycles` contains at least one chosen edge.
    pub fn hits_every(&self, cycles: &CycleSet<V>) -> bool {
        cycles
            .iter()
            .all(|cycle| cycle.edges().iter().any(|edge| self.edges.contains(edge)))
    }
}

impl FeedbackSolver {
    /// Create a solver with explicit bounds.
    ///
    /// `max_cycles_for_exact_search` of zero always takes the heuristic path.
    #[must_use]
    pub fn new(max_cycles_for_exact_search: usize, max_search_calls: u64) -> Self {
        Self {
            max_cycles_for_exact_search,
            max_search_calls,
        }
    }

    /// Cycle count from which the heuristic is used.
    #[must_use]
    pub fn max_cycles_for_exact_search(&self) -> usize {
        self.max_cycles_for_exact_search
    }

    /// Visit budget of the exact search.
    #[must_use]
    pub fn max_search_calls(&self) -> u64 {
        self.max_search_calls
    }

    /// Find a minimum-weight (or, past the bounds, a cheap) set of edges
    /// that hits every cycle in `cycles`.
    pub fn solve<V>(&self, cycles: &CycleSet<V>) -> FeedbackSolution<V>
    where
        V: Eq + Hash + Clone,
    {
        let ranked = rank_cycles(cycles);

        if cycles.len() >= self.max_cycles_for_exact_search {
            if !cycles.is_empty() {
                warn!(
                    cycles = cycles.len(),
                    threshold = self.max_cycles_for_exact_search,
                    "Too many cycles for an exact search, using the cheapest edge of each cycle"
                );
            }
            return cheapest_edge_per_cycle(&ranked);
        }

        let mut search = BranchAndBound::new(&ranked, self.max_search_calls);
        search.run();

        if search.calls > self.max_search_calls {
            warn!(
                max_search_calls = self.max_search_calls,
                "Search call limit reached, keeping the best feedback edge set found so far"
            );
        }

        let Some(best) = search.best else {
            warn!(
                "No complete solution within the call limit, using the cheapest edge of each cycle"
            );
            let mut fallback = cheapest_edge_per_cycle(&ranked);
            fallback.search_calls = search.calls;
            return fallback;
        };

        let edges: EdgeSet<V> = best
            .iter()
            .map(|&id| search.edge_table[id].clone())
            .collect();
        debug!(
            cycles = cycles.len(),
            edges = edges.len(),
            weight = search.best_weight,
            search_calls = search.calls,
            "Exact feedback edge set search complete"
        );

        FeedbackSolution {
            edges,
            weight: search.best_weight,
            search_calls: search.calls,
        }
    }
}

/// The heuristic: the cheapest edge of every cycle, deduplicated.
fn cheapest_edge_per_cycle<V>(ranked: &[FeedbackCycle<'_, V>]) -> FeedbackSolution<V>
where
    V: Eq + Hash + Clone,
{
    let edges: EdgeSet<V> = ranked
        .iter()
        .filter_map(FeedbackCycle::cheapest)
        .map(|fe| fe.edge().clone())
        .collect();
    let weight = edges.iter().map(|e| u64::from(e.weight())).sum();
    FeedbackSolution {
        edges,
        weight,
        search_calls: 0,
    }
}

/// One level of the branch-and-bound: a cycle not yet hit by pending edges.
struct Frame {
    level: usize,
    /// Next position in the cycle's ranked edges.
    cursor: usize,
    used_singleton: bool,
    /// Edge id added to the pending set by the current branch.
    chosen: Option<usize>,
}

struct BranchAndBound<'r, 'c, V> {
    cycles: &'r [FeedbackCycle<'c, V>],
    /// Edges by id.
    edge_table: Vec<&'c Edge<V>>,
    pending: Vec<bool>,
    pending_weight: u64,
    best: Option<Vec<usize>>,
    best_weight: u64,
    calls: u64,
    max_calls: u64,
}

impl<'r, 'c, V> BranchAndBound<'r, 'c, V> {
    fn new(cycles: &'r [FeedbackCycle<'c, V>], max_calls: u64) -> Self {
        let mut edge_table: Vec<Option<&'c Edge<V>>> = Vec::new();
        for fe in cycles.iter().flat_map(FeedbackCycle::edges) {
            if edge_table.len() <= fe.id {
                edge_table.resize(fe.id + 1, None);
            }
            edge_table[fe.id] = Some(fe.edge());
        }
        let edge_table: Vec<&'c Edge<V>> = edge_table.into_iter().flatten().collect();

        Self {
            cycles,
            pending: vec![false; edge_table.len()],
            edge_table,
            pending_weight: 0,
            best: None,
            best_weight: u64::MAX,
            calls: 0,
            max_calls,
        }
    }

    fn run(&mut self) {
        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = self.visit(0, &stack) {
            stack.push(frame);
        }

        while let Some(frame) = stack.last_mut() {
            if let Some(id) = frame.chosen.take() {
                self.pending[id] = false;
                self.pending_weight -= u64::from(self.edge_table[id].weight());
            }
            if self.calls > self.max_calls {
                break;
            }

            let Some(id) = next_branch(&self.cycles[frame.level], frame) else {
                stack.pop();
                continue;
            };

            frame.chosen = Some(id);
            self.pending[id] = true;
            self.pending_weight += u64::from(self.edge_table[id].weight());
            let level = frame.level + 1;

            if let Some(child) = self.visit(level, &stack) {
                stack.push(child);
            }
        }
    }

    /// Enter `level`, skipping cycles the pending edges already hit.
    ///
    /// Returns the frame to branch on, or `None` when this path is pruned,
    /// complete, or out of budget.
    fn visit(&mut self, mut level: usize, stack: &[Frame]) -> Option<Frame> {
        loop {
            self.calls += 1;
            if self.calls > self.max_calls || self.pending_weight >= self.best_weight {
                return None;
            }
            if level == self.cycles.len() {
                self.best_weight = self.pending_weight;
                self.best = Some(stack.iter().filter_map(|f| f.chosen).collect());
                return None;
            }
            let hit = self.cycles[level]
                .edges()
                .iter()
                .any(|fe| self.pending[fe.id]);
            if !hit {
                return Some(Frame {
                    level,
                    cursor: 0,
                    used_singleton: false,
                    chosen: None,
                });
            }
            level += 1;
        }
    }
}

/// The next edge of `cycle` to branch on, skipping every edge that occurs in
/// this cycle only once one such edge has been tried.
fn next_branch<V>(cycle: &FeedbackCycle<'_, V>, frame: &mut Frame) -> Option<usize> {
    while let Some(fe) = cycle.edges().get(frame.cursor) {
        frame.cursor += 1;
        if fe.occurrences() == 1 {
            if frame.used_singleton {
                continue;
            }
            frame.used_singleton = true;
        }
        return Some(fe.id);
    }
    None
}
