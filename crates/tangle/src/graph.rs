//! Directed, weighted dependency graph.
//!
//! [`DirectedGraph`] owns the vertices and edges that every other component
//! works on. Storage is a `petgraph` [`DiGraph`] whose node weights are the
//! caller's vertices and whose edge weights are the [`Edge`] values
//! themselves, plus two hash indices:
//!
//! - `node_map`: vertex -> node index
//! - `edge_map`: (source node, target node) -> edge index
//!
//! so that `get_edge`/`has_edge` are O(1) and adjacency queries in both
//! directions come straight from petgraph's adjacency lists.
//!
//! Vertices keep their insertion order. Nothing in this crate relies on that
//! order for correctness, but it makes results reproducible for a given input.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use petgraph::algo;
use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::types::EdgeSet;

/// A directed, weighted dependency arc.
///
/// Equality and hashing only look at `(from, to)`. Two edges between the same
/// ordered pair are the same edge whatever their weights.
#[derive(Debug, Clone)]
pub struct Edge<V> {
    from: V,
    to: V,
    weight: u32,
}

impl<V> Edge<V> {
    /// Create an edge from `from` to `to`.
    pub fn new(from: V, to: V, weight: u32) -> Self {
        Self { from, to, weight }
    }

    /// The depending vertex.
    pub fn from(&self) -> &V {
        &self.from
    }

    /// The vertex depended upon.
    pub fn to(&self) -> &V {
        &self.to
    }

    /// Number of references this edge stands for.
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }
}

impl<V: PartialEq> PartialEq for Edge<V> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl<V: Eq> Eq for Edge<V> {}

impl<V: Hash> Hash for Edge<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl<V: fmt::Display> fmt::Display for Edge<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.weight)
    }
}

/// Read access to a directed graph.
///
/// [`Dsm`](crate::dsm::Dsm) is built from any implementor, so callers holding
/// their dependencies in another structure can still project them into a
/// matrix.
pub trait DirectedGraphAccessor<V> {
    /// The edge from `from` to `to`, if any.
    fn get_edge(&self, from: &V, to: &V) -> Option<&Edge<V>>;

    /// Whether an edge from `from` to `to` exists.
    fn has_edge(&self, from: &V, to: &V) -> bool {
        self.get_edge(from, to).is_some()
    }

    /// All vertices, in the graph's iteration order.
    fn vertices<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a;

    /// Edges leaving `from`.
    fn outgoing_edges<'a>(&'a self, from: &V) -> impl Iterator<Item = &'a Edge<V>>
    where
        V: 'a;

    /// Edges arriving at `to`.
    fn incoming_edges<'a>(&'a self, to: &V) -> impl Iterator<Item = &'a Edge<V>>
    where
        V: 'a;
}

/// The graph store: vertices plus at most one weighted edge per ordered pair.
#[derive(Debug, Clone)]
pub struct DirectedGraph<V> {
    graph: DiGraph<V, Edge<V>>,
    node_map: HashMap<V, NodeIndex>,
    edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl<V> Default for DirectedGraph<V> {
    fn default() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            edge_map: HashMap::new(),
        }
    }
}

impl<V> DirectedGraph<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to, weight)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEdge`] if two triples share an ordered pair.
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (V, V, u32)>,
    {
        let mut graph = Self::new();
        for (from, to, weight) in edges {
            graph.add_edge(from, to, weight)?;
        }
        Ok(graph)
    }

    /// Add a vertex. Adding a vertex twice is a no-op.
    pub fn add_vertex(&mut self, vertex: V) {
        self.ensure_node(vertex);
    }

    /// Add an edge, adding either endpoint if it is not yet a vertex.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEdge`] if an edge from `from` to `to`
    /// already exists, whatever its weight.
    pub fn add_edge(&mut self, from: V, to: V, weight: u32) -> Result<&Edge<V>> {
        let source = self.ensure_node(from.clone());
        let target = self.ensure_node(to.clone());

        if self.edge_map.contains_key(&(source, target)) {
            return Err(Error::DuplicateEdge {
                from: format!("{from:?}"),
                to: format!("{to:?}"),
            });
        }

        let index = self
            .graph
            .add_edge(source, target, Edge::new(from, to, weight));
        self.edge_map.insert((source, target), index);
        Ok(&self.graph[index])
    }

    /// Whether `vertex` belongs to the graph.
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.node_map.contains_key(vertex)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every edge, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<V>> {
        self.graph.edge_weights()
    }

    /// Total weight of the edges whose endpoints both lie in `vertices`.
    pub fn edges_weight<'a, I>(&self, vertices: I) -> u64
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let scope = self.node_set(vertices);
        self.graph
            .edge_references()
            .filter(|e| scope.contains(&e.source()) && scope.contains(&e.target()))
            .map(|e| u64::from(e.weight().weight()))
            .sum()
    }

    /// Whether the subgraph induced by `vertices` is acyclic once the
    /// `excluded` edges are removed.
    pub fn is_acyclic_without<'a, I>(&self, vertices: I, excluded: &EdgeSet<V>) -> bool
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        let scope = self.node_set(vertices);
        let excluded = self.edge_indices(excluded);
        let filtered = EdgeFiltered::from_fn(&self.graph, |e: EdgeReference<'_, Edge<V>>| {
            !excluded.contains(&e.id())
                && scope.contains(&e.source())
                && scope.contains(&e.target())
        });
        !algo::is_cyclic_directed(&filtered)
    }

    /// Node indices of the given vertices. Unknown vertices are skipped.
    pub(crate) fn node_set<'a, I>(&self, vertices: I) -> HashSet<NodeIndex>
    where
        I: IntoIterator<Item = &'a V>,
        V: 'a,
    {
        vertices
            .into_iter()
            .filter_map(|v| self.node_map.get(v).copied())
            .collect()
    }

    /// Edge indices of the given edges. Edges absent from the graph are skipped.
    pub(crate) fn edge_indices(&self, edges: &EdgeSet<V>) -> HashSet<EdgeIndex> {
        edges
            .iter()
            .filter_map(|edge| {
                let source = self.node_map.get(edge.from())?;
                let target = self.node_map.get(edge.to())?;
                self.edge_map.get(&(*source, *target)).copied()
            })
            .collect()
    }

    pub(crate) fn node_index(&self, vertex: &V) -> Option<NodeIndex> {
        self.node_map.get(vertex).copied()
    }

    pub(crate) fn inner(&self) -> &DiGraph<V, Edge<V>> {
        &self.graph
    }

    fn ensure_node(&mut self, vertex: V) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&vertex) {
            return index;
        }
        let index = self.graph.add_node(vertex.clone());
        self.node_map.insert(vertex, index);
        index
    }

    fn edges_directed(&self, vertex: &V, direction: Direction) -> impl Iterator<Item = &Edge<V>> {
        self.node_map
            .get(vertex)
            .into_iter()
            .flat_map(move |&index| self.graph.edges_directed(index, direction))
            .map(|e| e.weight())
    }
}

impl<V> DirectedGraphAccessor<V> for DirectedGraph<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    fn get_edge(&self, from: &V, to: &V) -> Option<&Edge<V>> {
        let source = self.node_map.get(from)?;
        let target = self.node_map.get(to)?;
        self.edge_map
            .get(&(*source, *target))
            .map(|&index| &self.graph[index])
    }

    fn vertices<'a>(&'a self) -> impl Iterator<Item = &'a V>
    where
        V: 'a,
    {
        self.graph.node_weights()
    }

    fn outgoing_edges<'a>(&'a self, from: &V) -> impl Iterator<Item = &'a Edge<V>>
    where
        V: 'a,
    {
        self.edges_directed(from, Direction::Outgoing)
    }

    fn incoming_edges<'a>(&'a self, to: &V) -> impl Iterator<Item = &'a Edge<V>>
    where
        V: 'a,
    {
        self.edges_directed(to, Direction::Incoming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DirectedGraph<&'static str> {
        DirectedGraph::from_edges([("a", "b", 1), ("b", "c", 2), ("c", "a", 3), ("a", "c", 4)])
            .expect("edges are distinct")
    }

    #[test]
    fn add_edge_adds_missing_endpoints() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b", 1).expect("first edge");

        assert!(graph.contains_vertex(&"a"));
        assert!(graph.contains_vertex(&"b"));
        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn add_edge_rejects_duplicate_pair_regardless_of_weight() {
        let mut graph = DirectedGraph::new();
        graph.add_edge("a", "b", 1).expect("first edge");

        let err = graph.add_edge("a", "b", 9).unwrap_err();
        assert!(matches!(err, Error::DuplicateEdge { .. }), "got {err:?}");

        // The reverse direction is a different edge
        graph.add_edge("b", "a", 1).expect("reverse edge is distinct");
    }

    #[test]
    fn get_edge_returns_weight_for_ordered_pair() {
        let graph = sample();

        assert_eq!(graph.get_edge(&"b", &"c").map(Edge::weight), Some(2));
        assert!(graph.get_edge(&"c", &"b").is_none());
        assert!(graph.has_edge(&"a", &"c"));
        assert!(!graph.has_edge(&"a", &"missing"));
    }

    #[test]
    fn adjacency_is_available_in_both_directions() {
        let graph = sample();

        let mut outgoing: Vec<_> = graph.outgoing_edges(&"a").map(|e| *e.to()).collect();
        outgoing.sort_unstable();
        assert_eq!(outgoing, vec!["b", "c"]);

        let mut incoming: Vec<_> = graph.incoming_edges(&"c").map(|e| *e.from()).collect();
        incoming.sort_unstable();
        assert_eq!(incoming, vec!["a", "b"]);

        assert_eq!(graph.outgoing_edges(&"missing").count(), 0);
    }

    #[test]
    fn vertices_keep_insertion_order() {
        let mut graph = DirectedGraph::new();
        graph.add_vertex("z");
        graph.add_edge("m", "a", 1).expect("edge");
        graph.add_vertex("z");

        let vertices: Vec<_> = graph.vertices().copied().collect();
        assert_eq!(vertices, vec!["z", "m", "a"]);
    }

    #[test]
    fn edge_equality_ignores_weight() {
        assert_eq!(Edge::new("a", "b", 1), Edge::new("a", "b", 5));
        assert_ne!(Edge::new("a", "b", 1), Edge::new("b", "a", 1));
    }

    #[test]
    fn edges_weight_only_counts_edges_inside_the_subset() {
        let graph = sample();

        assert_eq!(graph.edges_weight(&["a", "b", "c"]), 10);
        assert_eq!(graph.edges_weight(&["a", "b"]), 1);
        assert_eq!(graph.edges_weight(&["a"]), 0);
    }

    #[test]
    fn is_acyclic_without_honours_exclusions_and_scope() {
        let graph = sample();
        let all = ["a", "b", "c"];

        assert!(!graph.is_acyclic_without(&all, &EdgeSet::default()));

        let mut cut = EdgeSet::default();
        cut.insert(Edge::new("c", "a", 0));
        assert!(graph.is_acyclic_without(&all, &cut));

        // Leaving `c` out of scope removes every cycle
        assert!(graph.is_acyclic_without(&["a", "b"], &EdgeSet::default()));
    }
}
