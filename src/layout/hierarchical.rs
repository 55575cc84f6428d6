//! Hierarchical (rank-based) layout
//!
//! Layered graph drawing with uniform node boxes: nodes are assigned
//! discrete ranks along the flow direction, separated by fixed gaps within
//! and between ranks, and the computed centers are mapped back to top-left
//! positions.
//!
//! Class graphs can contain cycles through multi-hop foreign keys, so
//! ranking runs on the SCC condensation of the edge set: every member of a
//! cycle shares a rank and back-edges cannot affect layering. Disconnected
//! nodes land on rank zero.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use crate::config::LayoutConfig;
use crate::graph::{Entity, Position, Relationship};

use super::FlowDirection;

/// Compute positions for a rank-based layout. Deterministic: the same
/// nodes, edges, and direction always produce identical positions.
pub fn hierarchical_layout(
    nodes: &[Entity],
    edges: &[Relationship],
    direction: FlowDirection,
    params: &LayoutConfig,
) -> Vec<Entity> {
    if nodes.is_empty() {
        return Vec::new();
    }

    let ranks = compute_ranks(nodes, edges);
    let max_rank = ranks.iter().copied().max().unwrap_or(0);

    // Group node indices by rank; within a rank, input order is kept.
    let mut rank_members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, &rank) in ranks.iter().enumerate() {
        rank_members.entry(rank).or_default().push(index);
    }

    let half_width = params.node_width / 2.0;
    let half_height = params.node_height / 2.0;

    let mut placed = nodes.to_vec();
    for (&rank, members) in &rank_members {
        // BT and RL reverse the rank axis
        let level = match direction {
            FlowDirection::TopBottom | FlowDirection::LeftRight => rank,
            FlowDirection::BottomTop | FlowDirection::RightLeft => max_rank - rank,
        } as f64;

        for (offset, &index) in members.iter().enumerate() {
            let offset = offset as f64;

            let (center_x, center_y) = match direction {
                FlowDirection::TopBottom | FlowDirection::BottomTop => (
                    params.margin_x + offset * (params.node_width + params.node_sep) + half_width,
                    params.margin_y + level * (params.node_height + params.rank_sep) + half_height,
                ),
                FlowDirection::LeftRight | FlowDirection::RightLeft => (
                    params.margin_x + level * (params.node_width + params.rank_sep) + half_width,
                    params.margin_y + offset * (params.node_height + params.node_sep) + half_height,
                ),
            };

            placed[index].position = Position::new(center_x - half_width, center_y - half_height);
        }
    }

    placed
}

/// Rank assignment via longest-path layering on the SCC condensation.
///
/// Edges whose endpoints are not both in the node set are ignored, as are
/// self-references.
fn compute_ranks(nodes: &[Entity], edges: &[Relationship]) -> Vec<usize> {
    let mut graph = DiGraph::<usize, ()>::with_capacity(nodes.len(), edges.len());
    let mut index_of: HashMap<&str, petgraph::graph::NodeIndex> =
        HashMap::with_capacity(nodes.len());

    for (index, node) in nodes.iter().enumerate() {
        let graph_index = graph.add_node(index);
        index_of.insert(node.id.as_str(), graph_index);
    }

    for edge in edges {
        if let (Some(&source), Some(&target)) = (
            index_of.get(edge.source.as_str()),
            index_of.get(edge.target.as_str()),
        ) {
            if source != target {
                graph.add_edge(source, target, ());
            }
        }
    }

    // kosaraju_scc yields components in reverse topological order, so
    // iterating the list backwards visits sources first and a single
    // relaxation pass per component suffices.
    let sccs = kosaraju_scc(&graph);

    let mut scc_of = vec![0usize; graph.node_count()];
    for (scc_index, members) in sccs.iter().enumerate() {
        for &member in members {
            scc_of[member.index()] = scc_index;
        }
    }

    let mut scc_rank = vec![0usize; sccs.len()];
    for scc_index in (0..sccs.len()).rev() {
        for &member in &sccs[scc_index] {
            for edge in graph.edges(member) {
                let target_scc = scc_of[edge.target().index()];
                if target_scc != scc_index {
                    scc_rank[target_scc] = scc_rank[target_scc].max(scc_rank[scc_index] + 1);
                }
            }
        }
    }

    nodes
        .iter()
        .map(|node| scc_rank[scc_of[index_of[node.id.as_str()].index()]])
        .collect()
}
