//! Graph Construction
//!
//! Two-pass transformation of a merged schema into the entity/relationship
//! graph. Pass 1 creates one node per non-excluded class with resolved
//! attributes; pass 2 derives edges from inheritance, explicit join
//! classes, and inferred foreign keys, then drops any edge whose endpoint
//! is missing from the node set.
//!
//! Resolution failures are tolerated by design: a foreign-key slot that
//! maps to no class drops its edge, a declared slot missing from the global
//! slot table drops its attribute. Neither is an error.

use chrono::Utc;
use std::collections::HashSet;

use crate::config::{AppConfig, ClassifierConfig, GraphConfig};
use crate::schema::{ClassDef, Schema};

use super::classify::classify;
use super::{Attribute, Cardinality, Entity, Graph, GraphMetadata, Position, Relationship};

/// Options for one graph build.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Collapse attribute-less join classes into direct many-to-many edges
    pub hide_junction_tables: bool,

    /// Classes that never become nodes (abstract bases)
    pub excluded_classes: Vec<String>,

    pub classifier: ClassifierConfig,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl GraphOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            hide_junction_tables: config.graph.hide_junction_tables,
            excluded_classes: config.graph.excluded_classes.clone(),
            classifier: config.classifier.clone(),
        }
    }
}

impl From<&GraphConfig> for GraphOptions {
    fn from(graph: &GraphConfig) -> Self {
        Self {
            hide_junction_tables: graph.hide_junction_tables,
            excluded_classes: graph.excluded_classes.clone(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Build the entity/relationship graph for a merged schema.
///
/// Total over its input: an empty schema yields an empty graph. The result
/// upholds the edge invariant — every edge's source and target id exists in
/// the node set.
pub fn build_graph(schema: &Schema, options: &GraphOptions) -> Graph {
    let excluded: HashSet<&str> = options.excluded_classes.iter().map(|s| s.as_str()).collect();

    // Pass 1: one node per non-excluded class
    let mut nodes: Vec<Entity> = Vec::with_capacity(schema.classes.len());
    for (class_name, class) in &schema.classes {
        if excluded.contains(class_name.as_str()) {
            continue;
        }

        let (entity_type, domain) = classify(class, class_name, &options.classifier);

        nodes.push(Entity {
            id: class_name.clone(),
            label: class_name.clone(),
            description: class.description.clone(),
            entity_type,
            domain,
            attributes: extract_attributes(class, schema),
            is_relationship: class.represents_relationship,
            parent_class: class.is_a.clone(),
            is_expanded: false,
            position: Position::default(),
        });
    }

    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    // Pass 2: edges
    let mut edges: Vec<Relationship> = Vec::new();
    let mut collapsed: HashSet<String> = HashSet::new();

    for (class_name, class) in &schema.classes {
        if excluded.contains(class_name.as_str()) {
            continue;
        }

        // Inheritance
        if let Some(parent) = &class.is_a {
            if node_ids.contains(parent.as_str()) {
                edges.push(Relationship::new(
                    class_name,
                    "is_a",
                    parent,
                    Cardinality::OneToOne,
                ));
            }
        }

        if class.represents_relationship {
            // Explicit join class: connect the entities behind its first
            // two id slots
            let id_slots: Vec<&String> =
                class.slots.iter().filter(|s| s.ends_with("_id")).collect();
            if id_slots.len() < 2 {
                continue;
            }

            let source = resolve_entity_for_id_slot(schema, id_slots[0]);
            let target = resolve_entity_for_id_slot(schema, id_slots[1]);
            let (Some(source), Some(target)) = (source, target) else {
                tracing::debug!(class = %class_name, "dropping join edge with unresolved endpoint");
                continue;
            };

            if options.hide_junction_tables && is_bare_junction(class) {
                collapsed.insert(class_name.clone());
                edges.push(Relationship::new(
                    &source,
                    &humanize_label(class_name),
                    &target,
                    Cardinality::ManyToMany,
                ));
            } else {
                let source_multivalued = usage_multivalued(class, id_slots[0]);
                let target_multivalued = usage_multivalued(class, id_slots[1]);
                let cardinality = match (source_multivalued, target_multivalued) {
                    (true, true) => Cardinality::ManyToMany,
                    (true, false) | (false, true) => Cardinality::OneToMany,
                    (false, false) => Cardinality::OneToOne,
                };
                edges.push(Relationship::new(&source, class_name, &target, cardinality));
            }
        } else {
            // Inferred foreign keys
            for slot_name in &class.slots {
                if !slot_name.ends_with("_id") || slot_name.contains("self") {
                    continue;
                }

                let Some(target) = resolve_entity_for_id_slot(schema, slot_name) else {
                    tracing::debug!(class = %class_name, slot = %slot_name, "unresolvable foreign key, dropping edge");
                    continue;
                };
                if target == *class_name {
                    continue;
                }

                let multivalued = class
                    .slot_usage
                    .get(slot_name)
                    .and_then(|u| u.multivalued)
                    .unwrap_or_else(|| {
                        schema.slots.get(slot_name).is_some_and(|s| s.multivalued)
                    });
                let cardinality = if multivalued {
                    Cardinality::OneToMany
                } else {
                    Cardinality::OneToOne
                };

                let label = slot_name.strip_suffix("_id").unwrap_or(slot_name.as_str());
                edges.push(Relationship::new(class_name, label, &target, cardinality));
            }
        }
    }

    if !collapsed.is_empty() {
        nodes.retain(|n| !collapsed.contains(&n.id));
    }

    // Invariant pass: no dangling edges, no duplicate edge ids
    let surviving: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen_ids: HashSet<String> = HashSet::with_capacity(edges.len());
    edges.retain(|e| {
        surviving.contains(e.source.as_str())
            && surviving.contains(e.target.as_str())
            && seen_ids.insert(e.id.clone())
    });

    let domains = Graph::collect_domains(&nodes);

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        domains = domains.len(),
        "built schema graph"
    );

    Graph {
        metadata: GraphMetadata {
            entity_count: nodes.len(),
            relationship_count: edges.len(),
            domains,
            last_updated: Utc::now(),
            source: schema.source.clone(),
            commit: schema.commit.clone(),
        },
        nodes,
        edges,
    }
}

/// Resolve an `_id` slot to the class it references.
///
/// Strips the `_id` suffix and tries the capitalized form as a direct class
/// lookup, then a small set of case variants and two fixed irregular
/// compound-name exceptions, and finally scans for a class that declares
/// the slot and marks it as an identifier. The exception list is a known
/// coverage boundary: naming conventions outside it silently resolve to
/// `None`, and callers drop the edge.
pub fn resolve_entity_for_id_slot(schema: &Schema, slot_name: &str) -> Option<String> {
    let base = slot_name.strip_suffix("_id").unwrap_or(slot_name);
    let capitalized = capitalize(base);

    if schema.classes.contains_key(&capitalized) {
        return Some(capitalized);
    }

    let mut variations = vec![base.to_string(), capitalized, base.to_uppercase()];
    match base {
        "contig_collection" => variations.push("ContigCollection".to_string()),
        "encoded_feature" => variations.push("EncodedFeature".to_string()),
        _ => {}
    }

    for variation in variations {
        if schema.classes.contains_key(&variation) {
            return Some(variation);
        }
    }

    // Last resort: the first class (in iteration order) declaring this slot
    // as its identifier
    for (class_name, class) in &schema.classes {
        if !class.slots.iter().any(|s| s == slot_name) {
            continue;
        }
        let is_identifier = class
            .slot_usage
            .get(slot_name)
            .and_then(|u| u.identifier)
            .unwrap_or(false)
            || schema.slots.get(slot_name).is_some_and(|s| s.identifier);
        if is_identifier {
            return Some(class_name.clone());
        }
    }

    None
}

/// Resolve a class's attributes: declared slots first (in declared order,
/// with `slot_usage` overrides winning field-by-field), then inline
/// attributes. A slot missing from the global table is omitted.
fn extract_attributes(class: &ClassDef, schema: &Schema) -> Vec<Attribute> {
    let mut attributes = Vec::with_capacity(class.slots.len() + class.attributes.len());

    for slot_name in &class.slots {
        let Some(slot) = schema.slots.get(slot_name) else {
            tracing::debug!(slot = %slot_name, "slot missing from global table, omitting attribute");
            continue;
        };
        let usage = class.slot_usage.get(slot_name);

        attributes.push(Attribute {
            name: slot_name.clone(),
            range: usage
                .and_then(|u| u.range.clone())
                .or_else(|| slot.range.clone())
                .unwrap_or_else(|| "string".to_string()),
            required: usage.and_then(|u| u.required).unwrap_or(slot.required),
            identifier: usage.and_then(|u| u.identifier).unwrap_or(slot.identifier),
            multivalued: usage.and_then(|u| u.multivalued).unwrap_or(slot.multivalued),
            description: usage
                .and_then(|u| u.description.clone())
                .or_else(|| slot.description.clone()),
        });
    }

    for (name, attr) in &class.attributes {
        attributes.push(Attribute {
            name: name.clone(),
            range: attr.range.clone().unwrap_or_else(|| "string".to_string()),
            required: attr.required,
            identifier: false,
            multivalued: attr.multivalued,
            description: attr.description.clone(),
        });
    }

    attributes
}

/// A junction class carries nothing beyond its id slots: every declared
/// slot is an `_id` slot and there are no inline attributes.
fn is_bare_junction(class: &ClassDef) -> bool {
    class.attributes.is_empty() && class.slots.iter().all(|s| s.ends_with("_id"))
}

fn usage_multivalued(class: &ClassDef, slot_name: &str) -> bool {
    class
        .slot_usage
        .get(slot_name)
        .and_then(|u| u.multivalued)
        .unwrap_or(false)
}

/// Insert a space before each interior capital: "ContigFeature" becomes
/// "Contig Feature".
fn humanize_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() && index > 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
