use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use cdm_schema_graph::layout::{layout_for_mode, ViewMode};
use cdm_schema_graph::schema::loader;
use cdm_schema_graph::{build_graph, to_dot, AppConfig, DiagramExport, GraphOptions};

#[derive(Parser)]
#[command(name = "cdm-graph-export")]
#[command(about = "Build the CDM schema graph from LinkML YAML and export it as JSON or DOT")]
struct Cli {
    /// Path to the schema document directory
    #[arg(short, long, default_value = ".")]
    schema_dir: PathBuf,

    /// Output file (defaults to schema-graph.json / schema-graph.dot)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json or dot
    #[arg(short, long, default_value = "json")]
    format: String,

    /// View mode selecting the layout: overview, detailed, compact, domain
    #[arg(short, long, default_value = "overview")]
    mode: String,

    /// Collapse attribute-less junction tables into direct edges
    #[arg(long)]
    hide_junction_tables: bool,

    /// Optional config file overriding the rule tables (cdm-graph.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if cli.hide_junction_tables {
        config.graph.hide_junction_tables = true;
    }

    let mode = match cli.mode.as_str() {
        "overview" => ViewMode::Overview,
        "detailed" => ViewMode::Detailed,
        "compact" => ViewMode::Compact,
        "domain" => ViewMode::Domain,
        other => anyhow::bail!("invalid view mode '{}': use overview, detailed, compact, or domain", other),
    };

    println!("Loading schema documents from: {:?}", cli.schema_dir);
    let bundle = loader::load_from_directory(&cli.schema_dir)
        .with_context(|| format!("loading schemas from {:?}", cli.schema_dir))?;
    let schema = bundle.into_schema("local");

    if schema.is_empty() {
        println!("⚠️  No schema entities found under {:?}", cli.schema_dir);
    }

    let mut graph = build_graph(&schema, &GraphOptions::from_config(&config));
    println!(
        "Graph built: {} entities, {} relationships, {} domains",
        graph.metadata.entity_count,
        graph.metadata.relationship_count,
        graph.metadata.domains.len()
    );

    graph.nodes = layout_for_mode(mode, &graph.nodes, &graph.edges, &config.layout);

    match cli.format.as_str() {
        "json" => {
            let output_path = cli
                .output
                .unwrap_or_else(|| PathBuf::from("schema-graph.json"));
            let export = DiagramExport::from_graph(&graph, mode, "light");
            let json = export.to_json(config.export.output_format)?;
            std::fs::write(&output_path, json)?;
            println!("✅ Exported JSON to: {:?}", output_path);
        }
        "dot" => {
            let output_path = cli
                .output
                .unwrap_or_else(|| PathBuf::from("schema-graph.dot"));
            std::fs::write(&output_path, to_dot(&graph))?;
            println!("✅ Exported DOT to: {:?}", output_path);
        }
        other => {
            anyhow::bail!("invalid format '{}': use json or dot", other);
        }
    }

    Ok(())
}
