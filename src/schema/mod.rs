//! LinkML Schema Model
//!
//! Serde types for parsed LinkML schema documents (classes, slots, enums)
//! and the merger that folds an ordered sequence of documents into one
//! logical [`Schema`]. Unknown/extra YAML fields are ignored, not forwarded.
//!
//! Maps are `BTreeMap` so iteration is deterministic; keys are unique within
//! a single document, so only the cross-document sequence order matters for
//! merging (later documents win). Inline class attributes are the one place
//! declaration order is semantic, so they are kept as an ordered list.

pub mod loader;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// One parsed schema document, as fetched and YAML-decoded by a collaborator
/// or by [`loader`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub classes: BTreeMap<String, ClassDef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, SlotDef>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub enums: BTreeMap<String, EnumDef>,
}

/// A LinkML class definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Single-inheritance parent class reference. No cycle check is
    /// performed here; downstream layout is cycle-tolerant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Slot name references in declared order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<String>,

    /// Per-slot overrides; a present field beats the global slot's value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slot_usage: BTreeMap<String, SlotUsage>,

    /// Inline attributes in declaration order
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_ordered_map",
        deserialize_with = "deserialize_ordered_map"
    )]
    pub attributes: Vec<(String, AttributeDef)>,

    /// Marks explicit join/association classes
    #[serde(default)]
    pub represents_relationship: bool,
}

/// A global slot definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Target type or referenced class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub multivalued: bool,

    #[serde(default)]
    pub identifier: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Class-level slot override. Every field is optional so overrides apply
/// field-by-field: a present value wins even when it is `false`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multivalued: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<bool>,
}

/// An inline class attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub multivalued: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A LinkML enumeration definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnumDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permissible_values: BTreeMap<String, PermissibleValue>,
}

/// One permissible value of an enum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissibleValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
}

/// The merged logical schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,

    pub classes: BTreeMap<String, ClassDef>,
    pub slots: BTreeMap<String, SlotDef>,
    pub enums: BTreeMap<String, EnumDef>,

    /// Where the documents came from ("remote", "fallback", a path, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Upstream commit the documents were fetched at, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,

    /// Content hash over the raw input documents; together with the build
    /// options this is a stable memoization key for rebuilt graphs.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bundle_hash: String,
}

impl Schema {
    /// Number of classes in the merged schema.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.slots.is_empty() && self.enums.is_empty()
    }
}

/// Merge an ordered sequence of schema documents into one logical schema.
///
/// Top-level scalar fields take the first document's values when present.
/// `classes`, `slots`, and `enums` are shallow-merged key-by-key in document
/// order: a later document's entry for the same key fully replaces the
/// earlier one. No deep merge of sub-fields is attempted.
///
/// An empty input yields a schema with empty maps, not an error; callers
/// decide how to surface "no entities".
pub fn merge_documents(documents: &[SchemaDocument]) -> Schema {
    let first = documents.first();

    let mut schema = Schema {
        id: first
            .and_then(|d| d.id.clone())
            .unwrap_or_else(|| "cdm-schema".to_string()),
        name: first
            .and_then(|d| d.name.clone())
            .unwrap_or_else(|| "CDM Schema".to_string()),
        description: first
            .and_then(|d| d.description.clone())
            .unwrap_or_else(|| "KBase Common Data Model".to_string()),
        version: first
            .and_then(|d| d.version.clone())
            .unwrap_or_else(|| "0.0.1".to_string()),
        ..Schema::default()
    };

    for document in documents {
        for (name, class) in &document.classes {
            schema.classes.insert(name.clone(), class.clone());
        }
        for (name, slot) in &document.slots {
            schema.slots.insert(name.clone(), slot.clone());
        }
        for (name, enum_def) in &document.enums {
            schema.enums.insert(name.clone(), enum_def.clone());
        }
    }

    tracing::debug!(
        documents = documents.len(),
        classes = schema.classes.len(),
        slots = schema.slots.len(),
        enums = schema.enums.len(),
        "merged schema documents"
    );

    schema
}

// Ordered-map (de)serialization for inline attributes: YAML mappings carry
// declaration order, and attribute order is part of the graph contract.

fn serialize_ordered_map<S>(
    entries: &[(String, AttributeDef)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn deserialize_ordered_map<'de, D>(deserializer: D) -> Result<Vec<(String, AttributeDef)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedMapVisitor;

    impl<'de> Visitor<'de> for OrderedMapVisitor {
        type Value = Vec<(String, AttributeDef)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of attribute definitions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, AttributeDef>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedMapVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_class(name: &str, description: &str) -> SchemaDocument {
        let mut doc = SchemaDocument::default();
        doc.classes.insert(
            name.to_string(),
            ClassDef {
                description: Some(description.to_string()),
                ..ClassDef::default()
            },
        );
        doc
    }

    #[test]
    fn test_merge_empty_input() {
        let schema = merge_documents(&[]);
        assert!(schema.is_empty());
        assert_eq!(schema.id, "cdm-schema");
        assert_eq!(schema.version, "0.0.1");
    }

    #[test]
    fn test_merge_last_document_wins() {
        let first = doc_with_class("Sample", "from base");
        let second = doc_with_class("Sample", "from components");
        let schema = merge_documents(&[first, second]);

        assert_eq!(schema.classes.len(), 1);
        assert_eq!(
            schema.classes["Sample"].description.as_deref(),
            Some("from components")
        );
    }

    #[test]
    fn test_merge_scalar_fields_from_first_document() {
        let mut first = SchemaDocument::default();
        first.id = Some("cdm".to_string());
        first.version = Some("1.2.3".to_string());
        let mut second = SchemaDocument::default();
        second.id = Some("other".to_string());

        let schema = merge_documents(&[first, second]);
        assert_eq!(schema.id, "cdm");
        assert_eq!(schema.version, "1.2.3");
    }

    #[test]
    fn test_attribute_declaration_order_preserved() {
        let yaml = r#"
description: a class
attributes:
  zebra:
    range: string
  alpha:
    range: integer
  middle:
    required: true
"#;
        let class: ClassDef = serde_yaml_ng::from_str(yaml).unwrap();
        let names: Vec<&str> = class.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let yaml = r#"
id: https://example.org/test
name: test
prefixes:
  linkml: https://w3id.org/linkml/
classes:
  Sample:
    description: a sample
    class_uri: schema:Thing
"#;
        let doc: SchemaDocument = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(doc.classes.len(), 1);
    }
}
