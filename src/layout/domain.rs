//! Domain-clustered layout
//!
//! Partitions nodes by domain label, lays each partition out independently
//! with the hierarchical strategy over the edges internal to it, and
//! concatenates the partitions left to right. Each partition starts past
//! the previous ones' rightmost extent plus a fixed gap, so partitions
//! never overlap horizontally.

use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::graph::{Entity, Relationship};

use super::{hierarchical_layout, rightmost_extent, FlowDirection, CLUSTER_GAP};

/// Lay out each domain as its own hierarchical cluster.
pub fn domain_layout(
    nodes: &[Entity],
    edges: &[Relationship],
    params: &LayoutConfig,
) -> Vec<Entity> {
    let mut placed = Vec::with_capacity(nodes.len());
    let mut x_offset = 0.0;

    for (_, group) in partition_by_domain(nodes) {
        let member_ids: HashSet<&str> = group.iter().map(|n| n.id.as_str()).collect();
        let internal: Vec<Relationship> = edges
            .iter()
            .filter(|e| {
                member_ids.contains(e.source.as_str()) && member_ids.contains(e.target.as_str())
            })
            .cloned()
            .collect();

        let mut cluster = hierarchical_layout(&group, &internal, FlowDirection::TopBottom, params);
        for node in &mut cluster {
            node.position.x += x_offset;
        }

        x_offset = rightmost_extent(&cluster, params.node_width) + CLUSTER_GAP;
        placed.extend(cluster);
    }

    placed
}

/// Group nodes by domain in first-seen order.
pub(crate) fn partition_by_domain(nodes: &[Entity]) -> Vec<(String, Vec<Entity>)> {
    let mut groups: Vec<(String, Vec<Entity>)> = Vec::new();

    for node in nodes {
        match groups.iter_mut().find(|(domain, _)| *domain == node.domain) {
            Some((_, members)) => members.push(node.clone()),
            None => groups.push((node.domain.clone(), vec![node.clone()])),
        }
    }

    groups
}
