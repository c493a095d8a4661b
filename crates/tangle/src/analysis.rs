//! Dependency analysis of one component.
//!
//! [`analyze`] chains the pieces of the crate the way a design review
//! consumes them: solve for cycles and feedback edges, lay the vertices out
//! as a DSM, sort it so that every remaining dependency points one way, and
//! summarize how tangled the component is.
//!
//! The matrix grows with the square of the component, so it is only built
//! for components of at most `max-dsm-vertices` vertices. Larger components
//! still get their cycles, feedback edges and metrics.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::dsm::{topological_sort, Dsm};
use crate::error::Result;
use crate::graph::DirectedGraph;
use crate::incremental::IncrementalOutcome;
use crate::types::{CycleSet, EdgeSet};

/// Largest component laid out as a matrix.
pub const DEFAULT_MAX_DSM_VERTICES: usize = 200;

/// Summary numbers for a dependency analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TangleMetrics {
    /// Distinct cycles found.
    pub cycles: usize,
    /// Dependencies to cut.
    pub feedback_edges: usize,
    /// Total weight of the dependencies to cut.
    pub tangles: u64,
    /// Total weight of the dependencies between analyzed vertices.
    pub edges_weight: u64,
    /// `2 * tangles / edges_weight` as a percentage, within `0..=100`.
    pub tangle_index: f64,
}

impl TangleMetrics {
    fn new(cycles: usize, feedback_edges: usize, tangles: u64, edges_weight: u64) -> Self {
        let tangle_index = if edges_weight == 0 {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let ratio = 2.0 * tangles as f64 / edges_weight as f64;
            (ratio * 100.0).clamp(0.0, 100.0)
        };
        Self {
            cycles,
            feedback_edges,
            tangles,
            edges_weight,
            tangle_index,
        }
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone)]
pub struct DependencyAnalysis<V> {
    outcome: IncrementalOutcome<V>,
    dsm: Option<Dsm<V>>,
    metrics: TangleMetrics,
}

impl<V> DependencyAnalysis<V> {
    /// Cycles found while solving.
    pub fn cycles(&self) -> &CycleSet<V> {
        self.outcome.cycles()
    }

    /// The dependencies to cut.
    pub fn feedback_edges(&self) -> &EdgeSet<V> {
        self.outcome.feedback_edges()
    }

    /// Solver outcome with its diagnostic counters.
    pub fn outcome(&self) -> &IncrementalOutcome<V> {
        &self.outcome
    }

    /// The topologically sorted matrix, feedback edges marked, or `None`
    /// when the component has more than `max-dsm-vertices` vertices.
    pub fn dsm(&self) -> Option<&Dsm<V>> {
        self.dsm.as_ref()
    }

    /// Consume the analysis, keeping the matrix if one was built.
    pub fn into_dsm(self) -> Option<Dsm<V>> {
        self.dsm
    }

    /// Summary numbers.
    #[must_use]
    pub fn metrics(&self) -> TangleMetrics {
        self.metrics
    }
}

/// Analyze the subgraph of `graph` induced by `vertices`.
///
/// Vertices keep the given order in the matrix until the topological sort
/// moves them. Repeated vertices are analyzed once. No matrix is built for
/// more than [`AnalysisConfig::max_dsm_vertices`] vertices.
///
/// # Errors
///
/// Returns [`Error::CyclicGraph`](crate::Error::CyclicGraph) if the feedback
/// edges found do not make the matrix sortable. This means the configured
/// bounds cut the search short.
pub fn analyze<'a, V, I>(
    graph: &DirectedGraph<V>,
    vertices: I,
    config: &AnalysisConfig,
) -> Result<DependencyAnalysis<V>>
where
    I: IntoIterator<Item = &'a V>,
    V: Eq + Hash + Clone + fmt::Debug + 'a,
{
    let vertices: IndexSet<&V> = vertices.into_iter().collect();

    let outcome = config
        .incremental_solver()
        .solve(graph, vertices.iter().copied());

    let dsm = if vertices.len() > config.max_dsm_vertices {
        debug!(
            vertices = vertices.len(),
            max_dsm_vertices = config.max_dsm_vertices,
            "Component too large for a matrix"
        );
        None
    } else {
        let mut dsm = Dsm::with_vertices(
            graph,
            vertices.iter().map(|&v| v.clone()),
            outcome.feedback_edges(),
        );
        topological_sort(&mut dsm)?;
        Some(dsm)
    };

    let metrics = TangleMetrics::new(
        outcome.cycles().len(),
        outcome.feedback_edges().len(),
        outcome.feedback_weight(),
        graph.edges_weight(vertices.iter().copied()),
    );

    info!(
        vertices = vertices.len(),
        cycles = metrics.cycles,
        tangles = metrics.tangles,
        tangle_index = metrics.tangle_index,
        "Dependency analysis complete"
    );

    Ok(DependencyAnalysis {
        outcome,
        dsm,
        metrics,
    })
}
