//! Entity Classification
//!
//! Rule-table classification of schema classes into a coarse entity type
//! and a domain label. The tables live in [`ClassifierConfig`] so alternate
//! naming conventions can swap them out; the logic here only evaluates
//! them.
//!
//! Both functions are pure: same inputs, same outputs, no I/O.

use crate::config::ClassifierConfig;
use crate::schema::ClassDef;

use super::EntityType;

/// Classify a class into (entity type, domain).
///
/// An explicit `represents_relationship` flag wins outright. Otherwise the
/// lowercased class name is tested for exact membership against the core,
/// metadata, and experimental keyword lists in that order; anything
/// unmatched defaults to core.
pub fn classify(class: &ClassDef, class_name: &str, config: &ClassifierConfig) -> (EntityType, String) {
    let domain = infer_domain(class_name, config);

    if class.represents_relationship {
        return (EntityType::Relationship, domain);
    }

    let name = class_name.to_lowercase();

    let entity_type = if config.core_keywords.iter().any(|k| *k == name) {
        EntityType::Core
    } else if config.metadata_keywords.iter().any(|k| *k == name) {
        EntityType::Metadata
    } else if config.experimental_keywords.iter().any(|k| *k == name) {
        EntityType::Experimental
    } else {
        EntityType::Core
    };

    (entity_type, domain)
}

/// Infer a domain label from the class name.
///
/// Domain rules are tested in table order; within a rule, keywords match as
/// substrings of the lowercased name. The first matching rule wins; no
/// match yields "general".
pub fn infer_domain(class_name: &str, config: &ClassifierConfig) -> String {
    let name = class_name.to_lowercase();

    for rule in &config.domain_rules {
        if rule.keywords.iter().any(|k| name.contains(k.as_str())) {
            return rule.domain.clone();
        }
    }

    "general".to_string()
}
