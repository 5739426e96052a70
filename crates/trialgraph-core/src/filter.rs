//! Category Filter: initial visible subset for a category token.
//!
//! The token arrives verbatim from the category selector. Two reserved
//! multi-word tokens select whole-graph modes; anything else names a category
//! matched by substring containment against edge source ids, after
//! underscore→slash normalization (ids embed category paths like
//! `Melanoma/Cutaneous`, but selector values cannot carry slashes).
//!
//! No token is an error: an unmatched category yields an empty visible
//! subgraph, which is a valid, if unhelpful, result.

use roaring::RoaringBitmap;
use trialgraph_model::{GraphDoc, NodeElement};

use crate::events::EventLog;
use crate::index::GraphIndex;
use crate::lineage::collect_active_lineage;

/// Reserved token: show every active trial with its full lineage.
pub const ACTIVE_TRIALS_TOKEN: &str = "All (active trials)";

/// Reserved token: show the entire graph.
pub const FULLY_EXPANDED_TOKEN: &str = "All_fully_expanded";

/// Labels containing this marker get a space inserted after each slash so the
/// renderer can wrap them.
const WRAP_LABEL_MARKER: &str = "Melanoma/Cutaneous/Sarcoma";

/// A parsed category token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    AllActiveTrials,
    AllFullyExpanded,
    /// Named category, already normalized for substring matching.
    Named(String),
}

impl Category {
    /// Parse a selector token. Reserved mode tokens are matched verbatim and
    /// never normalized; `Tumor_Agnostic` aliases to its display form (the id
    /// scheme spells it with a space, not a slash); everything else has each
    /// underscore replaced with a slash.
    pub fn parse(raw: &str) -> Self {
        match raw {
            ACTIVE_TRIALS_TOKEN => Category::AllActiveTrials,
            FULLY_EXPANDED_TOKEN => Category::AllFullyExpanded,
            "Tumor_Agnostic" => Category::Named("Tumor Agnostic".to_string()),
            other => Category::Named(other.replace('_', "/")),
        }
    }
}

fn rewrap_label(node: &mut NodeElement) {
    if node.data.label.contains(WRAP_LABEL_MARKER) {
        node.data.label = node.data.label.replace('/', "/ ");
    }
}

/// Assign fresh visibility to every node and edge of `doc` for `raw_category`.
///
/// Mutates visibility flags in place (plus label text for the wrapping rule);
/// ids and topology are untouched, so `index` stays valid. Callers filtering
/// several categories from one dataset must give each call its own copy.
pub fn filter_by_category(
    doc: &mut GraphDoc,
    index: &GraphIndex,
    raw_category: &str,
    log: &mut EventLog,
) {
    let category = Category::parse(raw_category);
    log.record(format!("filter: selected category `{raw_category}`"));

    match category {
        Category::AllActiveTrials => {
            let visible = collect_active_lineage(doc, index, log);
            apply_node_set(doc, index, &visible, false);
            // An edge survives iff both endpoints did.
            for (edge_ix, edge) in doc.elements.edges.iter_mut().enumerate() {
                let keep = index
                    .edge_endpoints(edge_ix as u32)
                    .is_some_and(|(s, t)| visible.contains(s) && visible.contains(t));
                edge.set_hidden(!keep);
            }
            log.record(format!(
                "filter: active trials view, {} node(s) visible",
                visible.len()
            ));
        }
        Category::AllFullyExpanded => {
            for node in &mut doc.elements.nodes {
                rewrap_label(node);
                node.set_hidden(false);
            }
            for edge in &mut doc.elements.edges {
                edge.set_hidden(false);
            }
            log.record("filter: fully expanded view, everything visible");
        }
        Category::Named(needle) => {
            // Edges are enumerated explicitly: only edges whose source id
            // contains the needle survive, even where both endpoints happen
            // to be visible through some other selected edge.
            let mut selected_edges = RoaringBitmap::new();
            let mut visible_nodes = RoaringBitmap::new();
            for (edge_ix, edge) in doc.elements.edges.iter().enumerate() {
                let Some((src, dst)) = index.edge_endpoints(edge_ix as u32) else {
                    continue;
                };
                if edge.data.source.contains(&needle) {
                    selected_edges.insert(edge_ix as u32);
                    visible_nodes.insert(src);
                    visible_nodes.insert(dst);
                }
            }

            apply_node_set(doc, index, &visible_nodes, true);
            for (edge_ix, edge) in doc.elements.edges.iter_mut().enumerate() {
                edge.set_hidden(!selected_edges.contains(edge_ix as u32));
            }
            log.record(format!(
                "filter: category `{needle}` matched {} edge(s), {} node(s)",
                selected_edges.len(),
                visible_nodes.len()
            ));
        }
    }
}

fn apply_node_set(
    doc: &mut GraphDoc,
    index: &GraphIndex,
    visible: &RoaringBitmap,
    rewrap_visible: bool,
) {
    for node in &mut doc.elements.nodes {
        let keep = index
            .node_ix(&node.data.id)
            .is_some_and(|ix| visible.contains(ix));
        if keep && rewrap_visible {
            rewrap_label(node);
        }
        node.set_hidden(!keep);
    }
}
