//! Tidy-table CSV → graph document ingestion.
//!
//! The source of truth is a tidy table with one row per trial lineage:
//! `oncology_category, study_type, trial_phase, therapy_line, trial_code`
//! plus optional `hyperlink` and `trial_description` columns. Each level
//! becomes a node; ids of intermediate levels are suffixed with their full
//! ancestor path so that, say, two categories' `Interventional` study types
//! stay distinct. Trial codes are used verbatim and may be shared across
//! branches.
//!
//! Freshly built documents start with category nodes visible and everything
//! else hidden; the category filter assigns real visibility per render.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use trialgraph_model::{EdgeData, EdgeElement, Elements, GraphDoc, NodeData, NodeElement, NodeType};

/// Hyperlink used when a trial row has none.
pub const DEFAULT_HYPERLINK: &str = "https://default-link.com";

/// Description used when a trial row has none.
pub const DEFAULT_DESCRIPTION: &str = "No description available";

/// House palette, one color per hierarchy level.
mod palette {
    pub const CATEGORY: &str = "#A9A9A9";
    pub const STUDY_TYPE: &str = "#D2B48C";
    pub const TRIAL_PHASE: &str = "#ADD8E6";
    pub const THERAPY_LINE: &str = "#90EE90";
    pub const TRIAL_CODE: &str = "#FFA07A";
    pub const NO_TRIALS: &str = "#FFFF00";
}

const OUTLINE: &str = "black";

// ============================================================================
// Tidy rows
// ============================================================================

/// One row of the tidy table. Every field is optional: rows may describe
/// partial lineages (a category with no trials yet).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TidyRow {
    #[serde(default)]
    pub oncology_category: Option<String>,
    #[serde(default)]
    pub study_type: Option<String>,
    #[serde(default)]
    pub trial_phase: Option<String>,
    #[serde(default)]
    pub therapy_line: Option<String>,
    #[serde(default)]
    pub trial_code: Option<String>,
    #[serde(default)]
    pub hyperlink: Option<String>,
    #[serde(default)]
    pub trial_description: Option<String>,
}

/// Read tidy rows from a CSV file.
pub fn read_tidy_csv(path: &Path) -> Result<Vec<TidyRow>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open CSV file: {}", path.display()))?;
    collect_rows(reader).with_context(|| format!("malformed tidy table: {}", path.display()))
}

/// Read tidy rows from any reader (in-memory CSV, stdin).
pub fn read_tidy_rows<R: io::Read>(input: R) -> Result<Vec<TidyRow>> {
    collect_rows(csv::Reader::from_reader(input))
}

fn collect_rows<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<TidyRow>> {
    let mut rows = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        let row: TidyRow = result.with_context(|| format!("bad row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

// ============================================================================
// Document building
// ============================================================================

#[derive(Debug, Default)]
struct DocBuilder {
    nodes: Vec<NodeElement>,
    node_ids: HashSet<String>,
    edges: Vec<EdgeElement>,
    edge_pairs: HashSet<(String, String)>,
}

impl DocBuilder {
    /// First occurrence of an id wins; repeats across rows are expected.
    fn add_node(&mut self, node: NodeElement) {
        if self.node_ids.insert(node.data.id.clone()) {
            self.nodes.push(node);
        }
    }

    fn add_edge(&mut self, source: &str, target: &str) {
        let pair = (source.to_string(), target.to_string());
        if self.edge_pairs.insert(pair) {
            self.edges.push(EdgeElement {
                data: EdgeData {
                    id: None,
                    source: source.to_string(),
                    target: target.to_string(),
                    arrow: Some(true),
                },
                classes: None,
            });
        }
    }

    fn finish(self) -> GraphDoc {
        let mut doc = GraphDoc {
            elements: Elements {
                nodes: self.nodes,
                edges: self.edges,
            },
        };
        for edge in &mut doc.elements.edges {
            edge.set_hidden(true);
        }
        doc
    }
}

fn mk_node(id: &str, label: &str, node_type: NodeType, color: &str, hidden: bool) -> NodeElement {
    let mut node = NodeElement {
        data: NodeData {
            id: id.to_string(),
            node_type,
            label: label.to_string(),
            color: color.to_string(),
            outline: OUTLINE.to_string(),
            description: None,
            hyperlink: None,
        },
        classes: None,
    };
    node.set_hidden(hidden);
    node
}

/// Build a graph document from tidy rows. Category roots start visible;
/// every other node and all edges start hidden.
pub fn build_document(rows: &[TidyRow]) -> GraphDoc {
    let mut builder = DocBuilder::default();

    for row in rows {
        let category = row.oncology_category.as_deref();
        let study = row.study_type.as_deref();
        let phase = row.trial_phase.as_deref();
        let line = row.therapy_line.as_deref();
        let trial = row.trial_code.as_deref();

        // Composite ids: each level is suffixed with its ancestor path.
        let category_id = category.map(str::to_string);
        let study_id = study.map(|s| format!("{s}_{}", category.unwrap_or_default()));
        let phase_id = phase.map(|p| {
            format!(
                "{p}_{}_{}",
                study.unwrap_or_default(),
                category.unwrap_or_default()
            )
        });
        let line_id = line.map(|l| {
            format!(
                "{l}_{}_{}_{}",
                phase.unwrap_or_default(),
                study.unwrap_or_default(),
                category.unwrap_or_default()
            )
        });

        if let (Some(category), Some(id)) = (category, &category_id) {
            builder.add_node(mk_node(
                id,
                category,
                NodeType::OncologyCategory,
                palette::CATEGORY,
                false,
            ));
        }
        if let (Some(study), Some(id)) = (study, &study_id) {
            builder.add_node(mk_node(
                id,
                study,
                NodeType::StudyType,
                palette::STUDY_TYPE,
                true,
            ));
        }
        if let (Some(phase), Some(id)) = (phase, &phase_id) {
            builder.add_node(mk_node(
                id,
                phase,
                NodeType::TrialPhase,
                palette::TRIAL_PHASE,
                true,
            ));
        }
        if let (Some(line), Some(id)) = (line, &line_id) {
            builder.add_node(mk_node(
                id,
                line,
                NodeType::TherapyLine,
                palette::THERAPY_LINE,
                true,
            ));
        }
        if let Some(trial) = trial {
            // Trial codes are shared across branches: verbatim id, no suffix.
            let mut node = mk_node(trial, trial, NodeType::TrialCode, palette::TRIAL_CODE, true);
            node.data.description = Some(
                row.trial_description
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            );
            node.data.hyperlink = Some(
                row.hyperlink
                    .clone()
                    .unwrap_or_else(|| DEFAULT_HYPERLINK.to_string()),
            );
            builder.add_node(node);
        }

        if let (Some(src), Some(dst)) = (&category_id, &study_id) {
            builder.add_edge(src, dst);
        }
        if let (Some(src), Some(dst)) = (&study_id, &phase_id) {
            builder.add_edge(src, dst);
        }
        if let (Some(src), Some(dst)) = (&phase_id, &line_id) {
            builder.add_edge(src, dst);
        }
        if let (Some(src), Some(dst)) = (&line_id, &trial) {
            builder.add_edge(src, dst);
        }
    }

    let doc = builder.finish();
    tracing::debug!(
        target: "trialgraph",
        nodes = doc.elements.nodes.len(),
        edges = doc.elements.edges.len(),
        "built document from tidy rows"
    );
    doc
}

// ============================================================================
// Stubbing branches without trials
// ============================================================================

/// Build a document and replace every branch with no trial-code descendant by
/// a single "No Trials Available" marker under the branch root.
pub fn build_document_stubbed(rows: &[TidyRow]) -> GraphDoc {
    stub_empty_branches(build_document(rows))
}

/// Prune each non-trial node's downstream closure when it contains no
/// `trial_code` node, attaching a hidden `no_trials_available` marker in its
/// place.
pub fn stub_empty_branches(doc: GraphDoc) -> GraphDoc {
    let snapshot: Vec<String> = doc
        .elements
        .nodes
        .iter()
        .map(|n| n.data.id.clone())
        .collect();

    let mut removed: HashSet<String> = HashSet::new();
    let mut stubs: Vec<(String, NodeElement)> = Vec::new();

    for id in &snapshot {
        if removed.contains(id) {
            continue;
        }
        let Some(node) = doc.elements.nodes.iter().find(|n| &n.data.id == id) else {
            continue;
        };
        if node.data.node_type == NodeType::TrialCode {
            continue;
        }

        let descendants = descendants_of(&doc, id, &removed);
        let has_trial = descendants.iter().any(|d| {
            doc.elements
                .nodes
                .iter()
                .any(|n| &n.data.id == d && n.data.node_type == NodeType::TrialCode)
        });
        if has_trial {
            continue;
        }

        tracing::debug!(target: "trialgraph", node = %id, "branch has no trials, stubbing");
        removed.extend(descendants);

        let stub_id = format!("{id}_no_trials_available");
        stubs.push((
            id.clone(),
            mk_node(
                &stub_id,
                "No Trials Available",
                NodeType::NoTrialsAvailable,
                palette::NO_TRIALS,
                true,
            ),
        ));
    }

    let mut out = GraphDoc::default();
    out.elements.nodes = doc
        .elements
        .nodes
        .into_iter()
        .filter(|n| !removed.contains(&n.data.id))
        .collect();
    out.elements.edges = doc
        .elements
        .edges
        .into_iter()
        .filter(|e| !removed.contains(&e.data.source) && !removed.contains(&e.data.target))
        .collect();

    for (parent, stub) in stubs {
        let stub_id = stub.data.id.clone();
        out.elements.nodes.push(stub);
        let mut edge = EdgeElement {
            data: EdgeData {
                id: None,
                source: parent,
                target: stub_id,
                arrow: Some(true),
            },
            classes: None,
        };
        edge.set_hidden(true);
        out.elements.edges.push(edge);
    }

    out
}

/// Strict descendants of `start`, skipping already-removed nodes.
fn descendants_of(doc: &GraphDoc, start: &str, removed: &HashSet<String>) -> HashSet<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut frontier = vec![start.to_string()];
    while let Some(id) = frontier.pop() {
        for edge in &doc.elements.edges {
            if edge.data.source != id {
                continue;
            }
            let target = &edge.data.target;
            if removed.contains(target) || seen.contains(target) {
                continue;
            }
            seen.insert(target.clone());
            frontier.push(target.clone());
        }
    }
    seen
}
