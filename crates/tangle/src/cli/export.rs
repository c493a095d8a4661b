//! `tangle export` command implementation.

use std::path::Path;

use anyhow::bail;
use tangle::{analyze, AnalysisConfig};

use super::input;

/// Run the export command: the sorted matrix as `DsmData` JSON on stdout.
pub fn run(file: &Path, config: &AnalysisConfig) -> anyhow::Result<()> {
    let input = input::load(file)?;
    let analysis = analyze(&input.graph, &input.vertices, config)?;

    let Some(dsm) = analysis.dsm() else {
        bail!(
            "{} has {} vertices, more than max-dsm-vertices ({})",
            file.display(),
            input.vertices.len(),
            config.max_dsm_vertices
        );
    };
    let json = serde_json::to_string_pretty(&dsm.to_data())?;
    println!("{json}");
    Ok(())
}
