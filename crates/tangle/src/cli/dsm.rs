//! `tangle dsm` command implementation.

use std::path::Path;

use tangle::{manual_sort, topological_sort, AnalysisConfig, Dsm, DsmPrinter};

use super::input;

/// Run the dsm command.
///
/// Feedback edges are always solved for and marked. The matrix keeps the
/// file's vertex order unless `sort` or `order` reorders it; `order` is
/// applied last.
pub fn run(
    file: &Path,
    config: &AnalysisConfig,
    order: &[String],
    headers: bool,
    sort: bool,
) -> anyhow::Result<()> {
    let input = input::load(file)?;
    let outcome = config
        .incremental_solver()
        .solve(&input.graph, &input.vertices);

    let mut dsm = Dsm::with_vertices(
        &input.graph,
        input.vertices.iter().cloned(),
        outcome.feedback_edges(),
    );
    if sort {
        topological_sort(&mut dsm)?;
    }
    if !order.is_empty() {
        manual_sort(&mut dsm, order)?;
    }

    let printer = if headers {
        DsmPrinter::default()
    } else {
        DsmPrinter::without_headers()
    };
    print!("{}", printer.print(&dsm));
    Ok(())
}
