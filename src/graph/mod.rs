//! Entity/Relationship Graph
//!
//! The typed graph derived from a merged schema: entities (one per
//! non-excluded class) and relationships (inheritance, explicit join
//! classes, inferred foreign keys). Nodes and edges are plain data; edges
//! reference nodes by id only, and every edge's endpoints are guaranteed to
//! exist in the node set.
//!
//! Construction lives in [`builder`], classification rules in [`classify`].
//! After construction the core never mutates a graph; presentation state
//! (expansion, selection) is the caller's concern.

pub mod builder;
pub mod classify;

pub use builder::{build_graph, resolve_entity_for_id_slot, GraphOptions};
pub use classify::{classify, infer_domain};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Coarse semantic type of an entity.
///
/// `Enum` exists for filters and exports; classification never produces it
/// because enumerations stay in the merged schema rather than becoming
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Core,
    Relationship,
    Metadata,
    Experimental,
    Enum,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Core,
        EntityType::Relationship,
        EntityType::Metadata,
        EntityType::Experimental,
        EntityType::Enum,
    ];
}

/// Relationship multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// A 2-D position (top-left corner of a node box).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A resolved entity attribute (from a declared slot or inline attribute).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,

    /// Declared type or referenced class name
    #[serde(rename = "type")]
    pub range: String,

    pub required: bool,

    #[serde(rename = "isIdentifier", default)]
    pub identifier: bool,

    #[serde(rename = "isMultivalued", default)]
    pub multivalued: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A graph node: one schema class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Class name; unique across the graph
    pub id: String,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Inferred domain label; "general" when no rule matched
    pub domain: String,

    /// Slots first in declared order, then inline attributes
    pub attributes: Vec<Attribute>,

    #[serde(default)]
    pub is_relationship: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_class: Option<String>,

    /// UI expansion state; not structural, owned by the presentation layer
    #[serde(default)]
    pub is_expanded: bool,

    pub position: Position,
}

/// A graph edge. Endpoints are node ids; the id is derived from
/// source, label, and target so the same logical relationship keeps the
/// same id across rebuilds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
    pub cardinality: Cardinality,
}

impl Relationship {
    /// Deterministic edge identity from endpoints and label.
    pub fn make_id(source: &str, label: &str, target: &str) -> String {
        format!("{}-{}-{}", source, label, target)
    }

    pub fn new(source: &str, label: &str, target: &str, cardinality: Cardinality) -> Self {
        Self {
            id: Self::make_id(source, label, target),
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
            cardinality,
        }
    }
}

/// Graph-level metadata for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub entity_count: usize,
    pub relationship_count: usize,

    /// Unique domains in first-seen node order
    pub domains: Vec<String>,

    pub last_updated: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// The derived schema graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Entity>,
    pub edges: Vec<Relationship>,
    pub metadata: GraphMetadata,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Entity> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Unique domains in first-seen node order.
    pub(crate) fn collect_domains(nodes: &[Entity]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut domains = Vec::new();
        for node in nodes {
            if seen.insert(node.domain.as_str()) {
                domains.push(node.domain.clone());
            }
        }
        domains
    }

    /// Fuzzy-search entities by label, best matches first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<EntitySearchResult> {
        use fuzzy_matcher::skim::SkimMatcherV2;
        use fuzzy_matcher::FuzzyMatcher;

        let matcher = SkimMatcherV2::default();
        let mut results: Vec<EntitySearchResult> = self
            .nodes
            .iter()
            .filter_map(|node| {
                matcher
                    .fuzzy_match(&node.label, query)
                    .map(|score| EntitySearchResult {
                        id: node.id.clone(),
                        label: node.label.clone(),
                        entity_type: node.entity_type,
                        domain: node.domain.clone(),
                        score,
                    })
            })
            .collect();

        results.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        results.truncate(limit);
        results
    }
}

/// One fuzzy-search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySearchResult {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub domain: String,
    pub score: i64,
}

/// Presentation-owned view filter, passed in explicitly — the core holds no
/// view state of its own.
#[derive(Debug, Clone)]
pub struct ViewFilter {
    /// Entity types to keep
    pub types: Vec<EntityType>,
    /// Case-insensitive substring over label, description, attribute names
    pub query: Option<String>,
    /// When false, the filtered graph has no edges at all
    pub show_relationships: bool,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self {
            types: EntityType::ALL.to_vec(),
            query: None,
            show_relationships: true,
        }
    }
}

impl ViewFilter {
    fn matches(&self, node: &Entity) -> bool {
        if !self.types.contains(&node.entity_type) {
            return false;
        }

        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            return node.label.to_lowercase().contains(&query)
                || node
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
                || node
                    .attributes
                    .iter()
                    .any(|a| a.name.to_lowercase().contains(&query));
        }

        true
    }
}

/// Apply a view filter, keeping only edges whose endpoints both survive.
///
/// The returned graph upholds the same no-dangling-edges invariant as a
/// freshly built one, so it can be handed to any layout strategy directly.
pub fn filter_graph(graph: &Graph, filter: &ViewFilter) -> Graph {
    let nodes: Vec<Entity> = graph
        .nodes
        .iter()
        .filter(|n| filter.matches(n))
        .cloned()
        .collect();

    let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let edges: Vec<Relationship> = if filter.show_relationships {
        graph
            .edges
            .iter()
            .filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
            .cloned()
            .collect()
    } else {
        Vec::new()
    };

    let domains = Graph::collect_domains(&nodes);
    Graph {
        metadata: GraphMetadata {
            entity_count: nodes.len(),
            relationship_count: edges.len(),
            domains,
            last_updated: graph.metadata.last_updated,
            source: graph.metadata.source.clone(),
            commit: graph.metadata.commit.clone(),
        },
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, entity_type: EntityType, domain: &str) -> Entity {
        Entity {
            id: id.to_string(),
            label: id.to_string(),
            description: None,
            entity_type,
            domain: domain.to_string(),
            attributes: Vec::new(),
            is_relationship: entity_type == EntityType::Relationship,
            parent_class: None,
            is_expanded: false,
            position: Position::default(),
        }
    }

    fn graph(nodes: Vec<Entity>, edges: Vec<Relationship>) -> Graph {
        let domains = Graph::collect_domains(&nodes);
        Graph {
            metadata: GraphMetadata {
                entity_count: nodes.len(),
                relationship_count: edges.len(),
                domains,
                last_updated: Utc::now(),
                source: None,
                commit: None,
            },
            nodes,
            edges,
        }
    }

    #[test]
    fn test_filter_drops_edges_with_hidden_endpoints() {
        let g = graph(
            vec![
                entity("Sample", EntityType::Core, "environmental"),
                entity("Project", EntityType::Metadata, "metadata"),
            ],
            vec![Relationship::new(
                "Sample",
                "project",
                "Project",
                Cardinality::OneToOne,
            )],
        );

        let filter = ViewFilter {
            types: vec![EntityType::Core],
            ..ViewFilter::default()
        };
        let filtered = filter_graph(&g, &filter);

        assert_eq!(filtered.nodes.len(), 1);
        assert!(filtered.edges.is_empty());
        assert_eq!(filtered.metadata.entity_count, 1);
        assert_eq!(filtered.metadata.relationship_count, 0);
    }

    #[test]
    fn test_filter_query_matches_attribute_names() {
        let mut sample = entity("Sample", EntityType::Core, "environmental");
        sample.attributes.push(Attribute {
            name: "collection_date".to_string(),
            range: "string".to_string(),
            required: false,
            identifier: false,
            multivalued: false,
            description: None,
        });
        let g = graph(
            vec![sample, entity("Project", EntityType::Metadata, "metadata")],
            vec![],
        );

        let filter = ViewFilter {
            query: Some("COLLECTION".to_string()),
            ..ViewFilter::default()
        };
        let filtered = filter_graph(&g, &filter);
        assert_eq!(filtered.nodes.len(), 1);
        assert_eq!(filtered.nodes[0].id, "Sample");
    }

    #[test]
    fn test_hide_relationships_empties_edges() {
        let g = graph(
            vec![
                entity("Sample", EntityType::Core, "environmental"),
                entity("Contig", EntityType::Core, "genomics"),
            ],
            vec![Relationship::new(
                "Contig",
                "sample",
                "Sample",
                Cardinality::OneToOne,
            )],
        );

        let filter = ViewFilter {
            show_relationships: false,
            ..ViewFilter::default()
        };
        assert!(filter_graph(&g, &filter).edges.is_empty());
    }

    #[test]
    fn test_search_ranks_and_limits() {
        let g = graph(
            vec![
                entity("Sample", EntityType::Core, "environmental"),
                entity("SampleSet", EntityType::Core, "environmental"),
                entity("Contig", EntityType::Core, "genomics"),
            ],
            vec![],
        );

        let hits = g.search("sample", 10);
        assert!(hits.len() >= 2);
        assert_eq!(hits[0].id, "Sample");

        assert_eq!(g.search("sample", 1).len(), 1);
        assert!(g.search("zzzz", 10).is_empty());
    }

    #[test]
    fn test_edge_id_is_deterministic() {
        let a = Relationship::new("Contig", "sample", "Sample", Cardinality::OneToOne);
        let b = Relationship::new("Contig", "sample", "Sample", Cardinality::OneToOne);
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, "Contig-sample-Sample");
    }
}
