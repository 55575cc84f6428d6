//! Layout Engine
//!
//! Four interchangeable strategies computing 2-D positions for a graph:
//! hierarchical (rank-based), force-directed, domain-clustered, and a
//! connectivity-aware grid. All strategies are pure functions from
//! `(nodes, edges, params)` to a new node list with positions filled in;
//! edges are never mutated and input nodes are never modified.
//!
//! Every strategy is total over valid graphs: empty node lists, isolated
//! nodes, self-references, and cycles all lay out without failure. Callers
//! are expected to hand in graphs that uphold the no-dangling-edges
//! invariant; unknown edge endpoints are ignored rather than trusted.

pub mod domain;
pub mod force;
pub mod grid;
pub mod hierarchical;

pub use domain::domain_layout;
pub use force::{force_layout, ForceParams};
pub use grid::grid_layout;
pub use hierarchical::hierarchical_layout;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::graph::{Entity, Relationship};

/// Horizontal gap separating independently laid-out clusters (domain
/// partitions, and the unconnected grid region).
pub const CLUSTER_GAP: f64 = 300.0;

/// Flow direction for rank-based layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowDirection {
    /// Top to bottom (ranks grow downward)
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

/// High-level view modes, each mapped to one layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Overview,
    Detailed,
    Compact,
    Domain,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Overview => "overview",
            ViewMode::Detailed => "detailed",
            ViewMode::Compact => "compact",
            ViewMode::Domain => "domain",
        }
    }
}

/// Lay out a graph under the strategy its view mode selects:
/// overview → grid, detailed/compact → hierarchical, domain → clustered.
pub fn layout_for_mode(
    mode: ViewMode,
    nodes: &[Entity],
    edges: &[Relationship],
    params: &LayoutConfig,
) -> Vec<Entity> {
    match mode {
        ViewMode::Overview => grid_layout(nodes, edges, params),
        ViewMode::Detailed | ViewMode::Compact => {
            hierarchical_layout(nodes, edges, FlowDirection::TopBottom, params)
        }
        ViewMode::Domain => domain_layout(nodes, edges, params),
    }
}

/// Rightmost extent (max x + node width) of a placed node set; 0 when empty.
pub(crate) fn rightmost_extent(nodes: &[Entity], node_width: f64) -> f64 {
    nodes
        .iter()
        .map(|n| n.position.x + node_width)
        .fold(0.0, f64::max)
}
