//! Trialgraph CLI
//!
//! Command-line interface for:
//! - Converting tidy-table CSV exports into graph document JSON
//! - Applying category filters (the two reserved whole-graph modes or a
//!   named category)
//! - Replaying click sequences against a filtered render session
//! - Validating documents and printing summary statistics

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use trialgraph_core::{RenderSession, FULLY_EXPANDED_TOKEN};
use trialgraph_ingest_csv::{build_document, build_document_stubbed, read_tidy_csv};
use trialgraph_model::GraphDoc;

#[derive(Parser)]
#[command(name = "trialgraph")]
#[command(
    author,
    version,
    about = "Trial lineage graphs: category filtering and visibility tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a tidy-table CSV into a graph document JSON.
    Convert {
        /// Input CSV file
        input: PathBuf,
        /// Output document JSON
        #[arg(short, long)]
        out: PathBuf,
        /// Replace branches without trials by "No Trials Available" markers
        #[arg(long)]
        stub_empty_branches: bool,
    },

    /// Apply a category filter and write the annotated document.
    Filter {
        /// Input document JSON
        input: PathBuf,
        /// Category token, e.g. "Melanoma_Cutaneous" or "All (active trials)"
        category: String,
        /// Output document JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the diagnostic event log to stderr
        #[arg(long)]
        events: bool,
    },

    /// Filter a document, then replay a sequence of node clicks.
    Toggle {
        /// Input document JSON
        input: PathBuf,
        /// Node ids to click, in order
        #[arg(required = true)]
        nodes: Vec<String>,
        /// Category token for the initial render
        #[arg(short, long, default_value = FULLY_EXPANDED_TOKEN)]
        category: String,
        /// Output document JSON (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print the diagnostic event log to stderr
        #[arg(long)]
        events: bool,
    },

    /// Validate a document and print summary statistics.
    Check {
        /// Input document JSON
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            input,
            out,
            stub_empty_branches,
        } => convert(&input, &out, stub_empty_branches),
        Commands::Filter {
            input,
            category,
            out,
            events,
        } => filter(&input, &category, out.as_deref(), events),
        Commands::Toggle {
            input,
            nodes,
            category,
            out,
            events,
        } => toggle(&input, &category, &nodes, out.as_deref(), events),
        Commands::Check { input } => check(&input),
    }
}

fn convert(input: &Path, out: &Path, stub_empty_branches: bool) -> Result<()> {
    let rows = read_tidy_csv(input)?;
    let doc = if stub_empty_branches {
        build_document_stubbed(&rows)
    } else {
        build_document(&rows)
    };
    doc.validate()
        .context("generated document failed validation")?;

    fs::write(out, doc.to_json()?)
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "{} {} rows -> {} nodes, {} edges -> {}",
        "converted".green().bold(),
        rows.len(),
        doc.elements.nodes.len(),
        doc.elements.edges.len(),
        out.display()
    );
    Ok(())
}

fn load_document(input: &Path) -> Result<GraphDoc> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    GraphDoc::from_json(&text).with_context(|| format!("invalid document: {}", input.display()))
}

fn filter(input: &Path, category: &str, out: Option<&Path>, events: bool) -> Result<()> {
    let doc = load_document(input)?;
    let session = RenderSession::new(doc, category)?;
    if events {
        print_events(session.events());
    }
    emit(session.document(), out)
}

fn toggle(
    input: &Path,
    category: &str,
    nodes: &[String],
    out: Option<&Path>,
    events: bool,
) -> Result<()> {
    let doc = load_document(input)?;
    let mut session = RenderSession::new(doc, category)?;
    for node in nodes {
        session.toggle(node);
    }
    if events {
        print_events(session.events());
    }
    emit(session.document(), out)
}

fn check(input: &Path) -> Result<()> {
    let doc = load_document(input)?;

    let visible_nodes = doc.elements.nodes.iter().filter(|n| !n.is_hidden()).count();
    let visible_edges = doc.elements.edges.iter().filter(|e| !e.is_hidden()).count();
    println!("{}", "document OK".green().bold());
    println!(
        "  nodes: {} ({} visible)",
        doc.elements.nodes.len(),
        visible_nodes
    );
    println!(
        "  edges: {} ({} visible)",
        doc.elements.edges.len(),
        visible_edges
    );

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &doc.elements.nodes {
        *by_type.entry(node.data.node_type.as_str()).or_default() += 1;
    }
    for (node_type, count) in by_type {
        println!("  {}: {}", node_type.cyan(), count);
    }
    Ok(())
}

fn emit(doc: &GraphDoc, out: Option<&Path>) -> Result<()> {
    let json = doc.to_json()?;
    match out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "wrote".green().bold(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_events(events: &[String]) {
    for event in events {
        eprintln!("{} {}", "event".dimmed(), event);
    }
}
