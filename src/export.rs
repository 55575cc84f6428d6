//! Diagram Export
//!
//! The versioned JSON interchange format for positioned graphs, and a
//! GraphViz DOT rendering for debugging. Image encoding (PNG/SVG) is the
//! presentation layer's concern.
//!
//! The JSON format is a stable contract: version `"1.0"` carries
//! `metadata` (export date, node/edge counts, view mode, theme) and
//! `diagram.nodes[]` / `diagram.edges[]` mirroring the in-memory graph
//! shape, so callers can round-trip diagrams through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::graph::{Attribute, Cardinality, EntityType, Graph, Position};
use crate::layout::ViewMode;

/// Current export format version.
pub const EXPORT_VERSION: &str = "1.0";

/// A complete export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramExport {
    pub version: String,
    pub metadata: ExportMetadata,
    pub diagram: DiagramBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub node_count: usize,
    pub edge_count: usize,
    pub view_mode: String,
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramBody {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub domain: String,
    pub attributes: Vec<Attribute>,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub cardinality: Cardinality,
}

impl DiagramExport {
    /// Snapshot a (typically already laid-out) graph into the interchange
    /// format.
    pub fn from_graph(graph: &Graph, view_mode: ViewMode, theme: &str) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            metadata: ExportMetadata {
                export_date: Utc::now(),
                node_count: graph.nodes.len(),
                edge_count: graph.edges.len(),
                view_mode: view_mode.as_str().to_string(),
                theme: theme.to_string(),
            },
            diagram: DiagramBody {
                nodes: graph
                    .nodes
                    .iter()
                    .map(|node| ExportNode {
                        id: node.id.clone(),
                        label: node.label.clone(),
                        entity_type: node.entity_type,
                        domain: node.domain.clone(),
                        attributes: node.attributes.clone(),
                        position: node.position,
                    })
                    .collect(),
                edges: graph
                    .edges
                    .iter()
                    .map(|edge| ExportEdge {
                        id: edge.id.clone(),
                        source: edge.source.clone(),
                        target: edge.target.clone(),
                        label: edge.label.clone(),
                        cardinality: edge.cardinality,
                    })
                    .collect(),
            },
        }
    }

    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        let json = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}

/// Export the graph to GraphViz DOT format.
pub fn to_dot(graph: &Graph) -> String {
    let mut output = String::new();

    output.push_str("digraph SchemaGraph {\n");
    output.push_str("  rankdir=TB;\n");
    output.push_str("  bgcolor=\"#1e1e1e\";\n");
    output.push_str("  node [shape=box, style=\"filled,rounded\", fontname=\"Helvetica\", fontsize=10, fontcolor=\"white\", color=\"#404040\"];\n");
    output.push_str("  edge [fontname=\"Helvetica\", fontsize=8, fontcolor=\"#808080\"];\n");
    output.push('\n');

    for node in &graph.nodes {
        output.push_str(&format!(
            "  \"{}\" [label=\"{}\", fillcolor=\"{}\"];\n",
            dot_id(&node.id),
            node.label,
            entity_color(node.entity_type)
        ));
    }

    output.push('\n');

    for edge in &graph.edges {
        output.push_str(&format!(
            "  \"{}\" -> \"{}\" [label=\"{}\"];\n",
            dot_id(&edge.source),
            dot_id(&edge.target),
            edge.label
        ));
    }

    output.push_str("}\n");
    output
}

fn entity_color(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Core => "#00BCD4",
        EntityType::Relationship => "#FF9800",
        EntityType::Metadata => "#9C27B0",
        EntityType::Experimental => "#4CAF50",
        EntityType::Enum => "#FF5722",
    }
}

fn dot_id(id: &str) -> String {
    id.replace(['/', '.', '-', ' '], "_")
}
