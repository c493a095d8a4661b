//! # Tangle: Dependency Cycle Analysis
//!
//! Tangle finds the dependency cycles of a component, picks the cheapest set
//! of dependencies to cut so that none remain, and lays the result out as a
//! Design Structure Matrix (DSM) that reads top to bottom.
//!
//! ## Design Philosophy
//!
//! - **Bounded, never stuck** - Exponential searches carry hard bounds and
//!   return their best result when a bound is hit
//! - **Deterministic** - Insertion order is kept everywhere it is visible
//! - **Generic vertices** - Any `Eq + Hash + Clone + Debug` type identifies a
//!   vertex; no ordering is required
//! - **Library first, CLI second**
//!
//! ## Quick Start
//!
//! ```
//! use tangle::{analyze, AnalysisConfig, DirectedGraph, DirectedGraphAccessor};
//!
//! let graph = DirectedGraph::from_edges([("a", "b", 1), ("b", "c", 1), ("c", "a", 1)])?;
//! let vertices: Vec<_> = graph.vertices().copied().collect();
//!
//! let analysis = analyze(&graph, &vertices, &AnalysisConfig::default())?;
//! assert_eq!(analysis.metrics().cycles, 1);
//! assert_eq!(analysis.feedback_edges().len(), 1);
//! if let Some(dsm) = analysis.dsm() {
//!     println!("{dsm}");
//! }
//! # Ok::<(), tangle::Error>(())
//! ```
//!
//! The pieces can also be used on their own: [`CycleDetector`] enumerates
//! cycles, [`FeedbackSolver`] solves for a minimum feedback edge set over a
//! known cycle set, [`IncrementalSolver`] interleaves the two, and [`Dsm`]
//! with [`topological_sort`] and [`manual_sort`] orders the matrix.

pub mod analysis;
pub mod config;
pub mod cycles;
pub mod dsm;
mod error;
pub mod feedback;
pub mod graph;
pub mod incremental;
mod types;

pub use analysis::{analyze, DependencyAnalysis, TangleMetrics};
pub use config::AnalysisConfig;
pub use cycles::{CycleDetector, CycleSearch, SearchLimit};
pub use dsm::{
    manual_sort, scan, scan_graph, topological_sort, Dsm, DsmCell, DsmData, DsmDataCell,
    DsmPrinter,
};
pub use error::{Error, Result};
pub use feedback::{FeedbackSolution, FeedbackSolver};
pub use graph::{DirectedGraph, DirectedGraphAccessor, Edge};
pub use incremental::{IncrementalOutcome, IncrementalSolver};
pub use types::{Cycle, CycleSet, EdgeSet};
