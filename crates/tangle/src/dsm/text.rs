//! Bordered text form of a [`Dsm`].
//!
//! ```text
//!  | a | b | c |
//! a |   |   | 3*|
//! b | 1 |   |   |
//! c |   | 2 |   |
//! ```
//!
//! The first line lists the column labels. Each following line starts with
//! its row label, then one cell per column. Row `r`, column `c` shows the
//! weight of the edge from `c` to `r`, so the row above for `b` reads "b is
//! used by a once". A `*` after the weight marks a feedback edge.

use std::fmt::{self, Write};

use super::{manual_sort, Dsm};
use crate::error::{Error, Result};
use crate::graph::{DirectedGraph, Edge};
use crate::types::EdgeSet;

const CELL_SEPARATOR: &str = "| ";
const COLUMN_SEPARATOR: char = '|';
const FEEDBACK_FLAG: char = '*';

/// Renders a [`Dsm`] as text.
#[derive(Debug, Clone, Copy)]
pub struct DsmPrinter {
    headers: bool,
}

impl Default for DsmPrinter {
    fn default() -> Self {
        Self { headers: true }
    }
}

impl DsmPrinter {
    /// A printer that omits the column label line.
    ///
    /// Its output cannot be read back by [`scan`].
    #[must_use]
    pub fn without_headers() -> Self {
        Self { headers: false }
    }

    /// Render `dsm` to a string.
    pub fn print<V: fmt::Display>(&self, dsm: &Dsm<V>) -> String {
        Rendered { printer: self, dsm }.to_string()
    }

    /// Render `dsm` into any formatter.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn write_to<V, W>(&self, dsm: &Dsm<V>, out: &mut W) -> fmt::Result
    where
        V: fmt::Display,
        W: Write,
    {
        if self.headers {
            write!(out, " {CELL_SEPARATOR}")?;
            for vertex in dsm.vertices() {
                write!(out, "{vertex} {CELL_SEPARATOR}")?;
            }
            out.write_char('\n')?;
        }

        for (row, vertex) in dsm.vertices().iter().enumerate() {
            write!(out, "{vertex} {CELL_SEPARATOR}")?;
            for column in 0..dsm.dimension() {
                let cell = dsm.cell_at(column, row);
                match cell.weight() {
                    0 => out.write_char(' ')?,
                    weight => write!(out, "{weight}")?,
                }
                out.write_char(if cell.is_feedback() { FEEDBACK_FLAG } else { ' ' })?;
                out.write_str(CELL_SEPARATOR)?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

/// A matrix bound to the printer that renders it.
struct Rendered<'p, V> {
    printer: &'p DsmPrinter,
    dsm: &'p Dsm<V>,
}

impl<V: fmt::Display> fmt::Display for Rendered<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.printer.write_to(self.dsm, f)
    }
}

/// Parse DSM text back into a graph and its feedback edges.
///
/// Every header label becomes a vertex, in header order. A cell becomes an
/// edge when it is off the diagonal and its weight, with the feedback flag
/// stripped, is a positive number. Anything else in a cell reads as "no
/// edge".
///
/// # Errors
///
/// Returns [`Error::Parse`] for a missing header, duplicate labels, a row
/// whose label or cell count does not match the header, or a row count
/// different from the column count.
pub fn scan_graph(text: &str) -> Result<(DirectedGraph<String>, EdgeSet<String>)> {
    let scanned = Scanned::parse(text)?;
    Ok((scanned.graph, scanned.feedback))
}

/// Parse DSM text into a matrix in header order.
///
/// # Errors
///
/// Fails like [`scan_graph`].
pub fn scan(text: &str) -> Result<Dsm<String>> {
    let scanned = Scanned::parse(text)?;
    let mut dsm = Dsm::new(&scanned.graph, &scanned.feedback);
    manual_sort(&mut dsm, &scanned.labels)?;
    Ok(dsm)
}

struct Scanned {
    labels: Vec<String>,
    graph: DirectedGraph<String>,
    feedback: EdgeSet<String>,
}

impl Scanned {
    fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| Error::parse(1, "missing header line"))?;
        let labels: Vec<String> = inner_tokens(header_line, header)?
            .iter()
            .map(|label| label.trim().to_string())
            .collect();
        for (index, label) in labels.iter().enumerate() {
            if labels[..index].contains(label) {
                return Err(Error::parse(header_line, format!("duplicate vertex '{label}'")));
            }
        }

        let mut graph = DirectedGraph::new();
        let mut feedback = EdgeSet::default();
        let mut rows = 0;

        for (line_number, line) in lines {
            let Some(target) = labels.get(rows) else {
                return Err(Error::parse(
                    line_number,
                    format!("more rows than the {} header columns", labels.len()),
                ));
            };
            let tokens: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
            if tokens.len() != labels.len() + 2 {
                return Err(Error::parse(
                    line_number,
                    format!(
                        "expected {} cells, found {}",
                        labels.len(),
                        tokens.len().saturating_sub(2)
                    ),
                ));
            }
            if tokens[0].trim() != target.as_str() {
                return Err(Error::parse(
                    line_number,
                    format!("expected row '{target}', found '{}'", tokens[0].trim()),
                ));
            }

            for (column, token) in tokens[1..=labels.len()].iter().enumerate() {
                let weight = cell_weight(token);
                if column == rows || weight == 0 {
                    continue;
                }
                let source = labels[column].clone();
                graph
                    .add_edge(source.clone(), target.clone(), weight)
                    .map_err(|e| Error::parse(line_number, e.to_string()))?;
                if token.contains(FEEDBACK_FLAG) {
                    feedback.insert(Edge::new(source, target.clone(), weight));
                }
            }
            rows += 1;
        }

        if rows != labels.len() {
            return Err(Error::parse(
                text.lines().count().max(1),
                format!("expected {} rows, found {rows}", labels.len()),
            ));
        }

        // Isolated vertices only come from the header
        for label in &labels {
            graph.add_vertex(label.clone());
        }

        Ok(Self {
            labels,
            graph,
            feedback,
        })
    }
}

/// The tokens between the leading and trailing border.
fn inner_tokens(line_number: usize, line: &str) -> Result<Vec<&str>> {
    let tokens: Vec<&str> = line.split(COLUMN_SEPARATOR).collect();
    if tokens.len() < 2 {
        return Err(Error::parse(line_number, "missing column separators"));
    }
    Ok(tokens[1..tokens.len() - 1].to_vec())
}

fn cell_weight(token: &str) -> u32 {
    token
        .replace(FEEDBACK_FLAG, "")
        .trim()
        .parse()
        .unwrap_or(0)
}
