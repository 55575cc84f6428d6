//! Force-directed layout
//!
//! A small physical simulation: every node pair repels with force k²/d,
//! every edge pulls its endpoints together with a spring force d²/k, for a
//! fixed number of iterations. Positions are refined from wherever the
//! nodes already are — callers typically run this after another strategy —
//! and there is no cooling schedule.
//!
//! Each iteration visits every node pair, so the cost is O(n²) per
//! iteration. That is a known scaling limit, acceptable for the expected
//! graph sizes of tens to low hundreds of nodes.

use std::collections::HashMap;

use crate::graph::{Entity, Relationship};

/// Simulation parameters.
#[derive(Debug, Clone)]
pub struct ForceParams {
    pub iterations: usize,
    /// Ideal spring length between connected nodes
    pub ideal_length: f64,
    pub repulsion_scale: f64,
    pub attraction_scale: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            iterations: 50,
            ideal_length: 100.0,
            repulsion_scale: 0.01,
            attraction_scale: 0.01,
        }
    }
}

/// Run the simulation and return repositioned copies of the nodes.
///
/// Coincident node pairs exert no force on each other, and edges whose
/// endpoints are missing from the node set are skipped, so the function is
/// total over degenerate input.
pub fn force_layout(nodes: &[Entity], edges: &[Relationship], params: &ForceParams) -> Vec<Entity> {
    let mut placed = nodes.to_vec();

    let index_of: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (node.id.as_str(), index))
        .collect();

    let k = params.ideal_length;

    for _ in 0..params.iterations {
        // Repulsion between every node pair
        for i in 0..placed.len() {
            for j in 0..placed.len() {
                if i == j {
                    continue;
                }

                let dx = placed[j].position.x - placed[i].position.x;
                let dy = placed[j].position.y - placed[i].position.y;
                let distance = (dx * dx + dy * dy).sqrt();
                if distance <= 0.0 {
                    continue;
                }

                let force = (k * k) / distance;
                placed[i].position.x -= (dx / distance) * force * params.repulsion_scale;
                placed[i].position.y -= (dy / distance) * force * params.repulsion_scale;
            }
        }

        // Spring attraction along edges
        for edge in edges {
            let (Some(&source), Some(&target)) = (
                index_of.get(edge.source.as_str()),
                index_of.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if source == target {
                continue;
            }

            let dx = placed[target].position.x - placed[source].position.x;
            let dy = placed[target].position.y - placed[source].position.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= 0.0 {
                continue;
            }

            let force = (distance * distance) / k;
            let fx = (dx / distance) * force * params.attraction_scale;
            let fy = (dy / distance) * force * params.attraction_scale;

            placed[source].position.x += fx;
            placed[source].position.y += fy;
            placed[target].position.x -= fx;
            placed[target].position.y -= fy;
        }
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Cardinality, EntityType, Position};

    fn entity_at(id: &str, x: f64, y: f64) -> Entity {
        Entity {
            id: id.to_string(),
            label: id.to_string(),
            description: None,
            entity_type: EntityType::Core,
            domain: "general".to_string(),
            attributes: Vec::new(),
            is_relationship: false,
            parent_class: None,
            is_expanded: false,
            position: Position::new(x, y),
        }
    }

    fn edge(source: &str, target: &str) -> Relationship {
        Relationship::new(source, "rel", target, Cardinality::OneToOne)
    }

    #[test]
    fn test_empty_input() {
        assert!(force_layout(&[], &[], &ForceParams::default()).is_empty());
    }

    #[test]
    fn test_repulsion_pushes_nodes_apart() {
        let nodes = vec![entity_at("A", 0.0, 0.0), entity_at("B", 10.0, 0.0)];
        let placed = force_layout(&nodes, &[], &ForceParams::default());

        let ax = placed.iter().find(|n| n.id == "A").unwrap().position.x;
        let bx = placed.iter().find(|n| n.id == "B").unwrap().position.x;
        assert!(bx - ax > 10.0, "nodes should spread: {} {}", ax, bx);
    }

    #[test]
    fn test_spring_pulls_distant_neighbors_closer() {
        let nodes = vec![entity_at("A", 0.0, 0.0), entity_at("B", 5000.0, 0.0)];
        let edges = vec![edge("A", "B")];
        let placed = force_layout(&nodes, &edges, &ForceParams::default());

        let ax = placed.iter().find(|n| n.id == "A").unwrap().position.x;
        let bx = placed.iter().find(|n| n.id == "B").unwrap().position.x;
        assert!((bx - ax).abs() < 5000.0);
    }

    #[test]
    fn test_coincident_nodes_do_not_panic() {
        let nodes = vec![entity_at("A", 100.0, 100.0), entity_at("B", 100.0, 100.0)];
        let placed = force_layout(&nodes, &[edge("A", "B")], &ForceParams::default());
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|n| n.position.x.is_finite() && n.position.y.is_finite()));
    }

    #[test]
    fn test_starts_from_existing_positions() {
        let nodes = vec![entity_at("A", 400.0, 250.0)];
        // A single node feels no force at all
        let placed = force_layout(&nodes, &[], &ForceParams::default());
        assert_eq!(placed[0].position, Position::new(400.0, 250.0));
    }

    #[test]
    fn test_input_nodes_not_mutated() {
        let nodes = vec![entity_at("A", 0.0, 0.0), entity_at("B", 10.0, 0.0)];
        let _ = force_layout(&nodes, &[], &ForceParams::default());
        assert_eq!(nodes[0].position, Position::new(0.0, 0.0));
    }
}
