//! Error types for tangle operations.
//!
//! Every failure in this crate is fatal to the operation that raised it and is
//! propagated straight to the caller. Nothing is retried internally.
//!
//! ## Error Categorization
//!
//! - Configuration problems (caller's fault): duplicate edges, DSM indices out
//!   of range, manual-sort vertices that are not in the matrix, invalid bounds
//! - Unsatisfiable input: a topological sort that still finds cycles after the
//!   supplied feedback edges are ignored
//! - Input/output problems: malformed DSM text, unreadable files
//!
//! Hitting one of the search bounds (maximum cycles, maximum depth, maximum
//! search calls) is not an error. The bounded components return their best
//! result and expose counters for diagnostics.

use thiserror::Error;

/// Result type for tangle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for tangle operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The graph already holds an edge for this ordered vertex pair.
    #[error("the graph already contains the edge {from} -> {to}")]
    DuplicateEdge {
        /// Source vertex, rendered with `Debug`.
        from: String,
        /// Target vertex, rendered with `Debug`.
        to: String,
    },

    /// A DSM index was outside `0..dimension`.
    #[error("DSM contains the following vertices: {vertices}. Trying to reach index {index} (dimension {dimension})")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Dimension of the matrix.
        dimension: usize,
        /// Every vertex of the matrix, in current order.
        vertices: String,
    },

    /// The manual sorter was asked to place a vertex the DSM does not hold.
    #[error("vertex {0} is not contained in the DSM")]
    VertexNotInDsm(String),

    /// The topological sorter found cycles that the feedback edges do not break.
    #[error("cannot sort a cyclic graph: {remaining} vertices remain in a cycle")]
    CyclicGraph {
        /// Number of vertices left in the unsorted band.
        remaining: usize,
    },

    /// DSM text could not be parsed.
    #[error("DSM parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for errors caused by the caller's input or setup.
    ///
    /// The remaining categories are I/O failures, which the caller may retry.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
