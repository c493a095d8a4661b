//! Loading graphs from disk.
//!
//! `.json` files hold vertices and weighted edges:
//!
//! ```json
//! { "vertices": ["a", "b"], "edges": [{ "from": "a", "to": "b", "weight": 2 }] }
//! ```
//!
//! Every other file is read as DSM text. Its `*` feedback markings are not
//! kept: the marked edges stay in the graph and the feedback edge set is
//! solved for again.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tangle::{scan, DirectedGraph, DirectedGraphAccessor, Dsm};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphFile {
    /// Listed first, so isolated vertices and the matrix order can be given
    #[serde(default)]
    vertices: Vec<String>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeRecord {
    from: String,
    to: String,
    #[serde(default = "default_weight")]
    weight: u32,
}

fn default_weight() -> u32 {
    1
}

/// A graph read from disk, with its vertices in file order.
pub struct GraphInput {
    pub graph: DirectedGraph<String>,
    pub vertices: Vec<String>,
}

/// Load a graph file, choosing the format by extension.
pub fn load(path: &Path) -> anyhow::Result<GraphInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let graph = if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        from_json(&content).with_context(|| format!("invalid graph file {}", path.display()))?
    } else {
        let dsm =
            scan(&content).with_context(|| format!("invalid DSM file {}", path.display()))?;
        if dsm.has_feedback_edges() {
            info!(
                file = %path.display(),
                "Ignoring feedback markings, the feedback edge set is solved again"
            );
        }
        from_dsm(&dsm)?
    };

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        file = %path.display(),
        "Loaded graph"
    );

    let vertices = graph.vertices().cloned().collect();
    Ok(GraphInput { graph, vertices })
}

fn from_json(content: &str) -> tangle::Result<DirectedGraph<String>> {
    let file: GraphFile = serde_json::from_str(content)?;

    let mut graph = DirectedGraph::new();
    for vertex in file.vertices {
        graph.add_vertex(vertex);
    }
    for edge in file.edges {
        graph.add_edge(edge.from, edge.to, edge.weight)?;
    }
    Ok(graph)
}

/// Rebuild the graph shown by a matrix, vertices in matrix order.
fn from_dsm(dsm: &Dsm<String>) -> tangle::Result<DirectedGraph<String>> {
    let mut graph = DirectedGraph::new();
    for vertex in dsm.vertices() {
        graph.add_vertex(vertex.clone());
    }
    for (_, _, cell) in dsm.occupied_cells() {
        if let Some(edge) = cell.edge() {
            graph.add_edge(edge.from().clone(), edge.to().clone(), edge.weight())?;
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn json_vertices_come_before_edge_endpoints() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.json");
        fs::write(
            &path,
            r#"{
                "vertices": ["z"],
                "edges": [{"from": "a", "to": "z"}, {"from": "z", "to": "a", "weight": 3}]
            }"#,
        )
        .expect("write graph");

        let input = load(&path).expect("valid graph");

        assert_eq!(input.vertices, vec!["z", "a"]);
        let edge = input
            .graph
            .get_edge(&"a".to_string(), &"z".to_string())
            .expect("a -> z present");
        assert_eq!(edge.weight(), 1);
    }

    #[test]
    fn other_extensions_are_read_as_dsm_text() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.dsm");
        fs::write(&path, " | a | b | \na |   | 2 | \nb |   |   | \n").expect("write graph");

        let input = load(&path).expect("valid DSM");

        assert_eq!(input.vertices, vec!["a", "b"]);
        assert!(input.graph.has_edge(&"b".to_string(), &"a".to_string()));
    }

    #[test]
    fn dsm_feedback_markings_keep_their_edges() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.dsm");
        fs::write(&path, " | a | b | \na |   | 2*| \nb | 3 |   | \n").expect("write graph");

        let input = load(&path).expect("valid DSM");

        let marked = input
            .graph
            .get_edge(&"b".to_string(), &"a".to_string())
            .expect("marked edge is still a dependency");
        assert_eq!(marked.weight(), 2);
        assert!(input.graph.has_edge(&"a".to_string(), &"b".to_string()));
        assert!(!input.graph.is_acyclic_without(&input.vertices, &tangle::EdgeSet::default()));
    }

    #[test]
    fn duplicate_json_edges_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("graph.json");
        fs::write(
            &path,
            r#"{"edges": [{"from": "a", "to": "b"}, {"from": "a", "to": "b"}]}"#,
        )
        .expect("write graph");

        let err = load(&path).err().expect("duplicate edge");
        let cause = err.root_cause().to_string();
        assert!(cause.contains("already contains the edge"), "got: {cause}");
    }
}
