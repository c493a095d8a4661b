//! Elementary cycle enumeration.
//!
//! [`CycleDetector`] walks the graph depth-first from every start vertex,
//! keeping the current path. An edge that leads back onto the path closes a
//! cycle made of the path suffix plus that edge. Cycles are collected into a
//! [`CycleSet`], so the same cycle found from several start vertices is only
//! kept once.
//!
//! ## Bounds
//!
//! Graphs with many overlapping cycles have exponentially many of them, so
//! the search can be bounded with a [`SearchLimit`]:
//!
//! - `MaxCycles(n)` stops the whole search as soon as `n` cycles are held
//! - `MaxDepth(d)` never extends the path beyond `d` vertices
//!
//! Without a depth bound, every vertex reached from a finished start vertex is
//! marked analyzed: all cycles through it are known, so it is neither used as
//! a start vertex nor entered again. A depth-bounded search cannot make that
//! guarantee, so it retries every vertex as a start vertex and never skips
//! neighbours.
//!
//! The detector is consumed by [`CycleDetector::detect`]; a second run needs a
//! new detector.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::ops::ControlFlow;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::{debug, trace};

use crate::graph::{DirectedGraph, Edge};
use crate::types::{Cycle, CycleSet, EdgeSet};

/// How far a cycle search may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchLimit {
    /// Enumerate every elementary cycle.
    #[default]
    Unbounded,
    /// Stop once this many distinct cycles have been found.
    MaxCycles(usize),
    /// Never extend a search path beyond this many vertices.
    MaxDepth(usize),
}

/// Outcome of one cycle search.
#[derive(Debug, Clone)]
pub struct CycleSearch<V> {
    cycles: CycleSet<V>,
    search_calls: u64,
}

impl<V> CycleSearch<V> {
    /// The distinct cycles found, in discovery order.
    pub fn cycles(&self) -> &CycleSet<V> {
        &self.cycles
    }

    /// Consume the result, keeping the cycles.
    pub fn into_cycles(self) -> CycleSet<V> {
        self.cycles
    }

    /// Number of vertices entered during the search. Diagnostic only.
    #[must_use]
    pub fn search_calls(&self) -> u64 {
        self.search_calls
    }
}

/// Single-use cycle search over (a subset of) a [`DirectedGraph`].
pub struct CycleDetector<'g, V> {
    graph: &'g DirectedGraph<V>,
    start_order: Vec<NodeIndex>,
    scope: HashSet<NodeIndex>,
    excluded: HashSet<EdgeIndex>,
}

impl<'g, V> CycleDetector<'g, V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Search over every vertex of `graph`.
    pub fn new(graph: &'g DirectedGraph<V>) -> Self {
        let start_order: Vec<NodeIndex> = graph.inner().node_indices().collect();
        let scope = start_order.iter().copied().collect();
        Self {
            graph,
            start_order,
            scope,
            excluded: HashSet::new(),
        }
    }

    /// Search only the subgraph induced by `vertices`.
    ///
    /// Start vertices are tried in the given order. Vertices unknown to the
    /// graph are ignored.
    pub fn with_vertices<'a, I>(graph: &'g DirectedGraph<V>, vertices: I) -> Self
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let mut scope = HashSet::new();
        let start_order = vertices
            .into_iter()
            .filter_map(|v| graph.node_index(v))
            .filter(|&index| scope.insert(index))
            .collect();
        Self {
            graph,
            start_order,
            scope,
            excluded: HashSet::new(),
        }
    }

    /// Treat `edges` as absent from the graph.
    #[must_use]
    pub fn excluding(mut self, edges: &EdgeSet<V>) -> Self {
        self.excluded = self.graph.edge_indices(edges);
        self
    }

    /// Run the search.
    pub fn detect(self, limit: SearchLimit) -> CycleSearch<V> {
        debug!(
            vertices = self.start_order.len(),
            excluded_edges = self.excluded.len(),
            ?limit,
            "Starting cycle detection"
        );

        let (max_cycles, max_depth) = match limit {
            SearchLimit::Unbounded => (usize::MAX, usize::MAX),
            SearchLimit::MaxCycles(n) => (n, usize::MAX),
            SearchLimit::MaxDepth(d) => (usize::MAX, d),
        };
        let depth_bounded = matches!(limit, SearchLimit::MaxDepth(_));

        let mut search = Search {
            graph: self.graph.inner(),
            scope: &self.scope,
            excluded: &self.excluded,
            max_cycles,
            max_depth,
            analyzed: HashSet::new(),
            path: Vec::new(),
            path_edges: Vec::new(),
            positions: HashMap::new(),
            cycles: CycleSet::default(),
            search_calls: 0,
        };

        for &start in &self.start_order {
            if !depth_bounded && search.analyzed.contains(&start) {
                continue;
            }
            let mut reached = HashSet::new();
            if search.search_from(start, &mut reached).is_break() {
                trace!(max_cycles, "Cycle limit reached, stopping search");
                break;
            }
            if !depth_bounded {
                search.analyzed.extend(reached);
            }
        }

        debug!(
            cycles = search.cycles.len(),
            search_calls = search.search_calls,
            "Cycle detection complete"
        );

        CycleSearch {
            cycles: search.cycles,
            search_calls: search.search_calls,
        }
    }
}

/// Mutable state of a running search.
struct Search<'a, V> {
    graph: &'a DiGraph<V, Edge<V>>,
    scope: &'a HashSet<NodeIndex>,
    excluded: &'a HashSet<EdgeIndex>,
    max_cycles: usize,
    max_depth: usize,
    analyzed: HashSet<NodeIndex>,
    /// Vertices of the current path.
    path: Vec<NodeIndex>,
    /// `path_edges[i]` links `path[i]` to `path[i + 1]`.
    path_edges: Vec<EdgeIndex>,
    /// Position of each path vertex in `path`.
    positions: HashMap<NodeIndex, usize>,
    cycles: CycleSet<V>,
    search_calls: u64,
}

impl<V> Search<'_, V>
where
    V: Eq + Hash + Clone,
{
    /// Depth-first walk from `start` on an explicit stack of edge iterators.
    fn search_from(
        &mut self,
        start: NodeIndex,
        reached: &mut HashSet<NodeIndex>,
    ) -> ControlFlow<()> {
        let graph = self.graph;
        self.enter(start, None, reached);
        let mut stack = vec![graph.edges_directed(start, Direction::Outgoing)];

        while let Some(edges) = stack.last_mut() {
            let Some(edge) = edges.next() else {
                stack.pop();
                self.leave();
                continue;
            };

            let target = edge.target();
            if self.excluded.contains(&edge.id())
                || !self.scope.contains(&target)
                || self.analyzed.contains(&target)
            {
                continue;
            }

            if let Some(&position) = self.positions.get(&target) {
                self.record(position, edge.id());
                if self.cycles.len() >= self.max_cycles {
                    return ControlFlow::Break(());
                }
            } else if self.path.len() < self.max_depth {
                self.enter(target, Some(edge.id()), reached);
                stack.push(graph.edges_directed(target, Direction::Outgoing));
            }
        }

        ControlFlow::Continue(())
    }

    fn enter(&mut self, node: NodeIndex, via: Option<EdgeIndex>, reached: &mut HashSet<NodeIndex>) {
        self.search_calls += 1;
        self.positions.insert(node, self.path.len());
        self.path.push(node);
        if let Some(edge) = via {
            self.path_edges.push(edge);
        }
        reached.insert(node);
    }

    fn leave(&mut self) {
        if let Some(node) = self.path.pop() {
            self.positions.remove(&node);
        }
        self.path_edges.truncate(self.path.len().saturating_sub(1));
    }

    /// Record the cycle running from `path[position]` to the path's end and
    /// back through `closing`.
    fn record(&mut self, position: usize, closing: EdgeIndex) {
        let edges = self.path_edges[position..]
            .iter()
            .chain(std::iter::once(&closing))
            .map(|&index| self.graph[index].clone())
            .collect();
        if let Some(cycle) = Cycle::new(edges) {
            self.cycles.insert(cycle);
        }
    }
}
