//! Dataset JSON parsing.
//!
//! # Format
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 4,
//!   "nodes": [{"id": 0, "duration": 3}],
//!   "edges": [{"u": 0, "v": 1, "w": 2}],
//!   "source": 0,
//!   "weight_model": "edge"
//! }
//! ```
//!
//! `nodes` may be partial or absent; missing ids up to `n` are filled in
//! without a duration. The edge weight key may be spelled `w` or `weight`.
//! No range checks happen here: out-of-range endpoints and sources are
//! the analysis stages' business. The one exception is `n` itself, which is
//! capped at [`MAX_NODES`] because every later stage allocates per node.
//!
//! [`render_graph_str`] writes the same format back out.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AnalysisError;
use crate::model::{Edge, Graph, Node, WeightModel};

#[derive(Debug, Serialize, Deserialize)]
struct NodeDto {
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeDto {
    u: i64,
    v: i64,
    #[serde(default, alias = "weight", skip_serializing_if = "Option::is_none")]
    w: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DatasetDto {
    #[serde(default = "default_directed")]
    directed: bool,
    n: usize,
    #[serde(default)]
    nodes: Option<Vec<NodeDto>>,
    #[serde(default)]
    edges: Option<Vec<EdgeDto>>,
    #[serde(default)]
    source: Option<i64>,
    #[serde(default)]
    weight_model: Option<String>,
}

const fn default_directed() -> bool {
    true
}

/// Largest `n` a dataset may declare.
pub const MAX_NODES: usize = 1 << 24;

/// Parse a dataset from a JSON string.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] for malformed JSON, a negative `n` or
/// duration, an `n` above [`MAX_NODES`], or an unknown weight model.
pub fn parse_graph_str(input: &str) -> Result<Graph, AnalysisError> {
    let dto: DatasetDto = serde_json::from_str(input)?;
    if dto.n > MAX_NODES {
        return Err(AnalysisError::Parse(format!(
            "n = {} exceeds the supported maximum of {MAX_NODES} nodes",
            dto.n
        )));
    }

    let weight_model = match dto.weight_model.as_deref() {
        None => WeightModel::default(),
        Some(raw) => raw.parse::<WeightModel>().map_err(AnalysisError::Parse)?,
    };

    let mut nodes: Vec<Node> = dto
        .nodes
        .unwrap_or_default()
        .into_iter()
        .map(|nd| Node::new(nd.id, nd.duration))
        .collect();
    for id in nodes.len()..dto.n {
        nodes.push(Node::new(i64::try_from(id).unwrap_or(i64::MAX), None));
    }

    let edges: Vec<Edge> = dto
        .edges
        .unwrap_or_default()
        .into_iter()
        .map(|e| Edge::new(e.u, e.v, e.w))
        .collect();

    debug!(
        n = dto.n,
        nodes = nodes.len(),
        edges = edges.len(),
        weight_model = %weight_model,
        "parsed dataset"
    );

    Ok(Graph::new(
        dto.directed,
        dto.n,
        nodes,
        edges,
        dto.source,
        weight_model,
    ))
}

/// Render `graph` as pretty-printed dataset JSON.
///
/// # Errors
///
/// Returns [`AnalysisError::Parse`] if serialization fails.
pub fn render_graph_str(graph: &Graph) -> Result<String, AnalysisError> {
    let dto = DatasetDto {
        directed: graph.is_directed(),
        n: graph.node_count(),
        nodes: Some(
            graph
                .nodes()
                .iter()
                .map(|node| NodeDto {
                    id: node.id,
                    duration: node.duration,
                })
                .collect(),
        ),
        edges: Some(
            graph
                .edges()
                .iter()
                .map(|edge| EdgeDto {
                    u: edge.from,
                    v: edge.to,
                    w: edge.weight,
                })
                .collect(),
        ),
        source: graph.source(),
        weight_model: Some(graph.weight_model().as_str().to_string()),
    };
    Ok(serde_json::to_string_pretty(&dto)?)
}

/// Read and parse a dataset file.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] when the file cannot be read and
/// [`AnalysisError::Parse`] when its content is not a valid dataset.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn parse_graph_file(path: &Path) -> Result<Graph, AnalysisError> {
    let content = std::fs::read_to_string(path)?;
    parse_graph_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "directed": true,
        "n": 8,
        "edges": [
            {"u": 0, "v": 1, "w": 3},
            {"u": 1, "v": 2, "w": 2},
            {"u": 2, "v": 3, "w": 4},
            {"u": 3, "v": 1, "w": 1},
            {"u": 4, "v": 5, "w": 2},
            {"u": 5, "v": 6, "w": 5},
            {"u": 6, "v": 7, "w": 1}
        ],
        "source": 4,
        "weight_model": "edge"
    }"#;

    #[test]
    fn parses_sample_dataset() {
        let g = parse_graph_str(SAMPLE).expect("parse");
        assert_eq!(g.node_count(), 8);
        assert!(g.is_directed());
        assert_eq!(g.weight_model(), WeightModel::Edge);
        assert_eq!(g.edge_count(), 7);
        assert_eq!(g.source(), Some(4));
        assert_eq!(g.edges()[0], Edge::new(0, 1, Some(3)));
    }

    #[test]
    fn missing_nodes_are_created_without_duration() {
        let g = parse_graph_str(SAMPLE).expect("parse");
        assert_eq!(g.nodes().len(), 8);
        assert!(g.nodes().iter().all(|n| n.duration.is_none()));
        assert_eq!(g.nodes()[7].id, 7);
    }

    #[test]
    fn partial_node_list_is_padded_to_n() {
        let g = parse_graph_str(
            r#"{"n": 3, "nodes": [{"id": 0, "duration": 4}], "edges": [], "source": 0}"#,
        )
        .expect("parse");
        assert_eq!(g.nodes().len(), 3);
        assert_eq!(g.durations(), vec![4, 0, 0]);
        assert_eq!(g.weight_model(), WeightModel::Node);
        assert!(g.is_directed());
    }

    #[test]
    fn weight_alias_is_accepted() {
        let g = parse_graph_str(r#"{"n": 2, "edges": [{"u": 0, "v": 1, "weight": 7}]}"#)
            .expect("parse");
        assert_eq!(g.edges()[0].weight, Some(7));
        assert_eq!(g.source(), None);
    }

    #[test]
    fn weight_model_is_case_insensitive() {
        let g = parse_graph_str(r#"{"n": 1, "weight_model": "EDGE"}"#).expect("parse");
        assert_eq!(g.weight_model(), WeightModel::Edge);
    }

    #[test]
    fn unknown_weight_model_is_rejected() {
        let err = parse_graph_str(r#"{"n": 1, "weight_model": "hops"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(ref msg) if msg.contains("hops")));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = parse_graph_str(r#"{"n": 1, "nodes": [{"id": 0, "duration": -2}]}"#)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(_)));
    }

    #[test]
    fn oversized_node_count_is_rejected_before_allocation() {
        let err = parse_graph_str(r#"{"n": 4000000000}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Parse(ref msg) if msg.contains("4000000000")));
        assert_eq!(err.error_code().code(), "E1004");

        let at_cap = format!(r#"{{"n": {}}}"#, MAX_NODES + 1);
        assert!(parse_graph_str(&at_cap).is_err());
    }

    #[test]
    fn out_of_range_edges_survive_parsing() {
        let g = parse_graph_str(r#"{"n": 2, "edges": [{"u": -1, "v": 5}], "source": 9}"#)
            .expect("parse");
        assert_eq!(g.edges()[0], Edge::plain(-1, 5));
        assert_eq!(g.source(), Some(9));
    }

    #[test]
    fn file_round_trip_through_tempdir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.json");
        std::fs::write(&path, SAMPLE).expect("write");
        let g = parse_graph_file(&path).expect("parse file");
        assert_eq!(g.edge_count(), 7);

        let missing = parse_graph_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, AnalysisError::Io(_)));
    }

    #[test]
    fn rendered_dataset_parses_back_to_the_same_graph() {
        let g = parse_graph_str(SAMPLE).expect("parse");
        let rendered = render_graph_str(&g).expect("render");
        assert!(rendered.contains("\"weight_model\": \"edge\""));
        assert_eq!(parse_graph_str(&rendered).expect("reparse"), g);
    }
}
