//! Configuration for classification and graph construction
//!
//! The classifier keyword tables, domain rules, and the abstract-base
//! exclusion set are configuration constants, not user-facing parameters,
//! but they are exposed here as swappable configuration so alternate naming
//! conventions (and tests) can supply their own rule tables.
//!
//! Supports loading from:
//! - Default values (the CDM rule tables)
//! - Config file (cdm-graph.toml)
//! - Environment variables (CDM_GRAPH_*)
//!
//! ## Example config file (cdm-graph.toml):
//! ```toml
//! [graph]
//! excluded_classes = ["Any", "Table"]
//! hide_junction_tables = true
//!
//! [classifier]
//! core_keywords = ["contig", "sample"]
//!
//! [export]
//! output_format = "compact"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for the schema graph core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Graph construction settings
    #[serde(default)]
    pub graph: GraphConfig,

    /// Entity classification rule tables
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Layout geometry settings
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Graph construction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Abstract base classes that never become graph nodes
    #[serde(default = "default_excluded_classes")]
    pub excluded_classes: Vec<String>,

    /// Collapse attribute-less join classes into direct many-to-many edges
    #[serde(default)]
    pub hide_junction_tables: bool,
}

/// Rule tables driving entity type and domain classification.
///
/// Type keywords match the whole lowercased class name; domain keywords
/// match as substrings. Rule order is significant: the first matching
/// domain rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_core_keywords")]
    pub core_keywords: Vec<String>,

    #[serde(default = "default_metadata_keywords")]
    pub metadata_keywords: Vec<String>,

    #[serde(default = "default_experimental_keywords")]
    pub experimental_keywords: Vec<String>,

    /// Domain rules in priority order
    #[serde(default = "default_domain_rules")]
    pub domain_rules: Vec<DomainRule>,
}

/// A single domain inference rule: substring keywords mapped to a domain label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRule {
    pub domain: String,
    pub keywords: Vec<String>,
}

impl DomainRule {
    pub fn new(domain: &str, keywords: &[&str]) -> Self {
        Self {
            domain: domain.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Layout geometry configuration.
///
/// Node boxes are assumed uniform; these are the spacing constants the
/// layout strategies share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_node_width")]
    pub node_width: f64,

    #[serde(default = "default_node_height")]
    pub node_height: f64,

    /// Gap between nodes within a rank
    #[serde(default = "default_node_sep")]
    pub node_sep: f64,

    /// Gap between ranks
    #[serde(default = "default_rank_sep")]
    pub rank_sep: f64,

    #[serde(default = "default_margin")]
    pub margin_x: f64,

    #[serde(default = "default_margin")]
    pub margin_y: f64,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

// Default value functions

fn default_excluded_classes() -> Vec<String> {
    vec!["Any".to_string(), "Table".to_string()]
}

fn default_core_keywords() -> Vec<String> {
    ["contig", "contigcollection", "feature", "protein", "sample"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_metadata_keywords() -> Vec<String> {
    ["contributor", "publication", "project", "datasource"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_experimental_keywords() -> Vec<String> {
    ["experiment", "protocol", "event"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_domain_rules() -> Vec<DomainRule> {
    vec![
        DomainRule::new("genomics", &["contig", "feature", "protein", "sequence"]),
        DomainRule::new("environmental", &["sample", "environmental", "gold", "mixs"]),
        DomainRule::new("experimental", &["experiment", "protocol", "event"]),
        DomainRule::new(
            "metadata",
            &["contributor", "publication", "project", "datasource"],
        ),
        DomainRule::new("analysis", &["cluster", "association", "measurement"]),
    ]
}

fn default_node_width() -> f64 {
    250.0
}

fn default_node_height() -> f64 {
    150.0
}

fn default_node_sep() -> f64 {
    80.0
}

fn default_rank_sep() -> f64 {
    120.0
}

fn default_margin() -> f64 {
    50.0
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            excluded_classes: default_excluded_classes(),
            hide_junction_tables: false,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            core_keywords: default_core_keywords(),
            metadata_keywords: default_metadata_keywords(),
            experimental_keywords: default_experimental_keywords(),
            domain_rules: default_domain_rules(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: default_node_width(),
            node_height: default_node_height(),
            node_sep: default_node_sep(),
            rank_sep: default_rank_sep(),
            margin_x: default_margin(),
            margin_y: default_margin(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["cdm-graph.toml", ".cdm-graph.toml", "config/cdm-graph.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (CDM_GRAPH_*)
        builder = builder.add_source(
            Environment::with_prefix("CDM_GRAPH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.graph.excluded_classes.contains(&"Any".to_string()));
        assert!(!config.graph.hide_junction_tables);
        assert_eq!(config.classifier.domain_rules.len(), 5);
        assert_eq!(config.classifier.domain_rules[0].domain, "genomics");
    }

    #[test]
    fn test_serialize_config() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[graph]"));
        assert!(toml_str.contains("[classifier]"));
        assert!(toml_str.contains("[layout]"));
    }

    #[test]
    fn test_domain_rule_priority_is_declaration_order() {
        let config = ClassifierConfig::default();
        let domains: Vec<&str> = config
            .domain_rules
            .iter()
            .map(|r| r.domain.as_str())
            .collect();
        assert_eq!(
            domains,
            vec![
                "genomics",
                "environmental",
                "experimental",
                "metadata",
                "analysis"
            ]
        );
    }
}
