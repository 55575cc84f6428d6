//! Connectivity-aware grid layout
//!
//! Splits the node set into nodes touched by at least one edge and nodes
//! with no edges at all. The connected cluster is laid out hierarchically;
//! the unconnected remainder is grouped by domain (largest domains first,
//! relationship entities leading within each group) and packed row-major
//! into a grid placed entirely to the right of the connected cluster, so
//! the two regions can never overlap.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::graph::{Entity, Relationship};

use super::domain::partition_by_domain;
use super::{hierarchical_layout, rightmost_extent, FlowDirection, CLUSTER_GAP};

/// Horizontal spacing between grid cells
const GRID_H_SPACING: f64 = 120.0;
/// Vertical spacing between grid cells
const GRID_V_SPACING: f64 = 100.0;

/// Lay out connected nodes hierarchically and pack the rest into a grid on
/// the right.
pub fn grid_layout(nodes: &[Entity], edges: &[Relationship], params: &LayoutConfig) -> Vec<Entity> {
    let touched: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    let (connected, unconnected): (Vec<Entity>, Vec<Entity>) = nodes
        .iter()
        .cloned()
        .partition(|n| touched.contains(n.id.as_str()));

    let internal: Vec<Relationship> = {
        let connected_ids: HashSet<&str> = connected.iter().map(|n| n.id.as_str()).collect();
        edges
            .iter()
            .filter(|e| {
                connected_ids.contains(e.source.as_str())
                    && connected_ids.contains(e.target.as_str())
            })
            .cloned()
            .collect()
    };

    let mut placed = hierarchical_layout(&connected, &internal, FlowDirection::TopBottom, params);

    let grid_start_x = if placed.is_empty() {
        params.margin_x
    } else {
        rightmost_extent(&placed, params.node_width) + CLUSTER_GAP
    };

    placed.extend(pack_grid(&unconnected, grid_start_x, params));
    placed
}

/// Pack unconnected nodes into a grid starting at `start_x`.
///
/// Domains are ordered by descending member count (name as tiebreak);
/// within a domain, relationship entities come first. Column count is
/// `ceil(sqrt(1.5 n))` — slightly wider than square.
fn pack_grid(unconnected: &[Entity], start_x: f64, params: &LayoutConfig) -> Vec<Entity> {
    if unconnected.is_empty() {
        return Vec::new();
    }

    let mut groups = partition_by_domain(unconnected);
    groups.sort_by(|(a_domain, a), (b_domain, b)| {
        b.len().cmp(&a.len()).then_with(|| a_domain.cmp(b_domain))
    });

    let mut ordered: Vec<Entity> = Vec::with_capacity(unconnected.len());
    for (_, mut members) in groups {
        members.sort_by_key(|n| !n.is_relationship);
        ordered.extend(members);
    }

    let columns = ((ordered.len() as f64 * 1.5).sqrt().ceil() as usize).max(1);

    for (index, node) in ordered.iter_mut().enumerate() {
        let row = index / columns;
        let column = index % columns;
        node.position.x = start_x + column as f64 * (params.node_width + GRID_H_SPACING);
        node.position.y = row as f64 * (params.node_height + GRID_V_SPACING);
    }

    ordered
}
