//! CLI command implementations.

mod display;
mod input;

pub mod cycles;
pub mod dsm;
pub mod export;

use std::path::Path;

use anyhow::Context;
use clap::Args;
use tangle::config::CONFIG_FILE_NAME;
use tangle::AnalysisConfig;
use tracing::debug;

/// Analysis bounds that override the configuration file.
#[derive(Args, Debug, Default)]
pub struct SolverArgs {
    /// Path length bound of the first search round
    #[arg(long, global = true)]
    depth: Option<usize>,

    /// Cycles collected per later search round
    #[arg(long, global = true)]
    round_cycles: Option<usize>,

    /// Cycle count from which the heuristic replaces the exact search (0: always)
    #[arg(long, global = true)]
    exact_threshold: Option<usize>,

    /// Visit budget of the exact search
    #[arg(long, global = true)]
    max_calls: Option<u64>,

    /// Largest component exported as a matrix
    #[arg(long, global = true)]
    max_dsm_vertices: Option<usize>,
}

impl SolverArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(depth) = self.depth {
            config.initial_search_depth = depth;
        }
        if let Some(round_cycles) = self.round_cycles {
            config.max_cycles_per_round = round_cycles;
        }
        if let Some(threshold) = self.exact_threshold {
            config.max_cycles_for_exact_search = threshold;
        }
        if let Some(max_calls) = self.max_calls {
            config.max_search_calls = max_calls;
        }
        if let Some(max_dsm_vertices) = self.max_dsm_vertices {
            config.max_dsm_vertices = max_dsm_vertices;
        }
    }
}

/// Build the analysis configuration: defaults, then the configuration file,
/// then command-line overrides.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &SolverArgs,
) -> anyhow::Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None if Path::new(CONFIG_FILE_NAME).is_file() => {
            debug!(file = CONFIG_FILE_NAME, "Using configuration from current directory");
            AnalysisConfig::load(Path::new(CONFIG_FILE_NAME))
                .with_context(|| format!("failed to load configuration from {CONFIG_FILE_NAME}"))?
        }
        None => AnalysisConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate().context("invalid solver bounds")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_the_configuration_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "initial-search-depth: 5\nmax-cycles-per-round: 7").expect("write config");

        let overrides = SolverArgs {
            round_cycles: Some(9),
            max_dsm_vertices: Some(50),
            ..SolverArgs::default()
        };
        let config = resolve_config(Some(file.path()), &overrides).expect("valid config");

        assert_eq!(config.initial_search_depth, 5);
        assert_eq!(config.max_cycles_per_round, 9);
        assert_eq!(config.max_dsm_vertices, 50);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let overrides = SolverArgs {
            depth: Some(0),
            ..SolverArgs::default()
        };
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tangle.yaml");
        std::fs::write(&path, "").expect("write config");

        assert!(resolve_config(Some(&path), &overrides).is_err());
    }

    #[test]
    fn missing_configuration_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = resolve_config(Some(&dir.path().join("absent.yaml")), &SolverArgs::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to load configuration"));
    }
}
