//! `tangle cycles` command implementation.

use std::path::Path;

use colored::Colorize;
use tangle::{analyze, AnalysisConfig};

use super::display::{print_feedback_edges, print_metrics};
use super::input;

/// Run the cycles command.
pub fn run(file: &Path, config: &AnalysisConfig, limit: usize) -> anyhow::Result<()> {
    let input = input::load(file)?;
    let analysis = analyze(&input.graph, &input.vertices, config)?;
    let cycles = analysis.cycles();

    if cycles.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular dependencies:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().take(limit).enumerate() {
        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);
        println!("    {}", cycle.to_string().dimmed());
    }
    if cycles.len() > limit {
        println!("  ... and {} more", cycles.len() - limit);
    }

    println!();
    println!("{}", "Dependencies to cut:".white().bold());
    print_feedback_edges(analysis.feedback_edges());

    println!();
    print_metrics(&analysis.metrics());

    let outcome = analysis.outcome();
    tracing::info!(
        rounds = outcome.rounds(),
        search_calls = outcome.search_calls(),
        solver_calls = outcome.solver_calls(),
        "Solver counters"
    );

    Ok(())
}
