//! Common display utilities for CLI commands.

use colored::Colorize;
use tangle::{Edge, TangleMetrics};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Display the dependencies to cut, heaviest first, with truncation.
pub fn print_feedback_edges<'a, I>(edges: I)
where
    I: IntoIterator<Item = &'a Edge<String>>,
{
    let mut edges: Vec<&Edge<String>> = edges.into_iter().collect();
    if edges.is_empty() {
        println!("    {}", "nothing to cut".dimmed());
        return;
    }
    edges.sort_by(|a, b| b.weight().cmp(&a.weight()));

    for edge in edges.iter().take(MAX_DISPLAY_ITEMS) {
        println!(
            "    {} {} {} {} {}",
            "•".dimmed(),
            edge.from(),
            "→".dimmed(),
            edge.to(),
            format!("({})", edge.weight()).dimmed()
        );
    }

    if edges.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            edges.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Display the tangle metrics block.
pub fn print_metrics(metrics: &TangleMetrics) {
    println!("{}", "Metrics:".white().bold());
    println!("  cycles            {}", metrics.cycles);
    println!("  dependencies cut  {}", metrics.feedback_edges);
    println!("  tangles           {}", metrics.tangles);
    println!("  edges weight      {}", metrics.edges_weight);

    let index = format!("{:.1}%", metrics.tangle_index);
    let index = if metrics.tangle_index > 0.0 {
        index.red().bold()
    } else {
        index.green()
    };
    println!("  tangle index      {index}");
}
