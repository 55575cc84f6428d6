//! CDM Schema Graph
//!
//! The schema-to-graph transformation and layout core of the CDM schema
//! visualizer: merges LinkML YAML schema documents, classifies entities by
//! rule tables, derives a typed entity/relationship graph, and computes
//! deterministic 2-D layouts for it.
//!
//! ## Features
//!
//! - **Document Merging**: last-wins, key-by-key merge of multiple schema
//!   documents into one logical schema
//! - **Heuristic Classification**: entity types and domains inferred from
//!   naming conventions via swappable rule tables
//! - **Graph Derivation**: inheritance, explicit join classes, and inferred
//!   foreign keys, with optional junction-table collapsing
//! - **Layout Strategies**: hierarchical, force-directed, domain-clustered,
//!   and connectivity-aware grid — all pure and cycle-tolerant
//! - **Stable Export**: versioned JSON interchange format plus GraphViz DOT
//!
//! ## Pipeline
//!
//! ```text
//! raw YAML documents
//!   └─ schema::loader ──► Vec<SchemaDocument>
//!        └─ schema::merge_documents ──► Schema
//!             └─ graph::build_graph ──► Graph (nodes + edges)
//!                  └─ layout::layout_for_mode ──► positioned Graph
//!                       └─ export::DiagramExport / export::to_dot
//! ```
//!
//! Everything past loading is synchronous, single-threaded, and total:
//! empty or partially broken schema sets produce empty or partial graphs,
//! never errors. Rebuilds are idempotent, keyed by the schema bundle hash
//! and the build options.

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod layout;
pub mod schema;

pub use config::{AppConfig, ClassifierConfig, GraphConfig, LayoutConfig};
pub use error::{Result, SchemaGraphError};
pub use export::{to_dot, DiagramExport};
pub use graph::{
    build_graph, filter_graph, Cardinality, Entity, EntityType, Graph, GraphOptions, Relationship,
    ViewFilter,
};
pub use layout::{
    domain_layout, force_layout, grid_layout, hierarchical_layout, layout_for_mode, FlowDirection,
    ViewMode,
};
pub use schema::{merge_documents, Schema, SchemaDocument};
