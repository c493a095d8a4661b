//! Analysis configuration.
//!
//! Analysis bounds are read from a YAML file such as:
//!
//! ```yaml
//! initial-search-depth: 3
//! max-cycles-per-round: 100
//! max-cycles-for-exact-search: 1500
//! max-search-calls: 1000000
//! max-dsm-vertices: 200
//! ```
//!
//! Every key is optional and falls back to the defaults above.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_MAX_DSM_VERTICES;
use crate::error::{Error, Result};
use crate::feedback::{
    FeedbackSolver, DEFAULT_MAX_CYCLES_FOR_EXACT_SEARCH, DEFAULT_MAX_SEARCH_CALLS,
};
use crate::incremental::{
    IncrementalSolver, DEFAULT_INITIAL_SEARCH_DEPTH, DEFAULT_MAX_CYCLES_PER_ROUND,
};

/// Name of the configuration file looked up by the CLI
pub const CONFIG_FILE_NAME: &str = "tangle.yaml";

/// Bounds for cycle detection, feedback edge set solving and matrix layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Path length bound of the first search round
    pub initial_search_depth: usize,

    /// Cycle bound of every later search round
    pub max_cycles_per_round: usize,

    /// Cycle count from which the heuristic replaces the exact search
    /// (0 always uses the heuristic)
    pub max_cycles_for_exact_search: usize,

    /// Visit budget of one exact search
    pub max_search_calls: u64,

    /// Largest component laid out as a matrix by
    /// [`analyze`](crate::analysis::analyze)
    pub max_dsm_vertices: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            initial_search_depth: DEFAULT_INITIAL_SEARCH_DEPTH,
            max_cycles_per_round: DEFAULT_MAX_CYCLES_PER_ROUND,
            max_cycles_for_exact_search: DEFAULT_MAX_CYCLES_FOR_EXACT_SEARCH,
            max_search_calls: DEFAULT_MAX_SEARCH_CALLS,
            max_dsm_vertices: DEFAULT_MAX_DSM_VERTICES,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::Config`] if it is not valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| match e {
            Error::Config(message) => Error::Config(format!("{}: {message}", path.display())),
            other => other,
        })
    }

    /// Parse and validate configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for malformed YAML, unknown keys, or
    /// invalid values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Check that every bound lets the analysis make progress.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.initial_search_depth == 0 {
            return Err(Error::Config(
                "initial-search-depth must be at least 1".to_string(),
            ));
        }
        if self.max_cycles_per_round == 0 {
            return Err(Error::Config(
                "max-cycles-per-round must be at least 1".to_string(),
            ));
        }
        if self.max_search_calls == 0 {
            return Err(Error::Config(
                "max-search-calls must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The feedback edge set solver for these bounds.
    #[must_use]
    pub fn feedback_solver(&self) -> FeedbackSolver {
        FeedbackSolver::new(self.max_cycles_for_exact_search, self.max_search_calls)
    }

    /// The incremental solver for these bounds.
    #[must_use]
    pub fn incremental_solver(&self) -> IncrementalSolver {
        IncrementalSolver::new(
            self.initial_search_depth,
            self.max_cycles_per_round,
            self.feedback_solver(),
        )
    }
}
