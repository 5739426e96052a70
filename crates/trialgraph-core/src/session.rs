//! Render session: live visibility state for one rendered graph.
//!
//! A session is constructed fresh per render (validate → filter → index) and
//! discarded on re-render. Clicks arrive as [`RenderSession::toggle`] calls
//! and mutate only the session's document; the source dataset is never
//! touched.
//!
//! Toggle intent is tracked as explicit per-node state instead of inferring
//! it from the first outgoing edge's flag: the proxy only holds while all
//! outgoing edges of a node share one visibility state, and an explicit tag
//! survives features that stop guaranteeing that. The tags are seeded from
//! exactly what the proxy would have read, so observable behavior matches.

use roaring::RoaringBitmap;
use std::collections::HashMap;
use trialgraph_model::{DocumentError, GraphDoc};

use crate::events::EventLog;
use crate::filter::filter_by_category;
use crate::index::GraphIndex;

/// Whether a node's children are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    Expanded,
}

/// Owned per-render visibility state: the filtered document, its index, the
/// per-node toggle tags, and the diagnostic log.
#[derive(Debug)]
pub struct RenderSession {
    doc: GraphDoc,
    index: GraphIndex,
    state: HashMap<u32, NodeState>,
    log: EventLog,
}

impl RenderSession {
    /// Validate `doc`, apply the category filter, and index the result.
    pub fn new(mut doc: GraphDoc, category: &str) -> Result<Self, DocumentError> {
        doc.validate()?;
        let index = GraphIndex::build(&doc);
        let mut log = EventLog::new();
        filter_by_category(&mut doc, &index, category, &mut log);

        let mut state = HashMap::new();
        for ix in 0..index.node_count() {
            let Some(&first_edge) = index.outgoing_edges(ix).first() else {
                continue;
            };
            let seeded = if doc.elements.edges[first_edge as usize].is_hidden() {
                NodeState::Collapsed
            } else {
                NodeState::Expanded
            };
            state.insert(ix, seeded);
        }

        Ok(Self {
            doc,
            index,
            state,
            log,
        })
    }

    /// Handle a click on `node_id`.
    ///
    /// Collapsed → reveal one level (deeper descendants keep whatever state
    /// they were left in); expanded → hide the entire downstream closure.
    /// Unknown ids and nodes without outgoing edges are no-ops.
    pub fn toggle(&mut self, node_id: &str) {
        let Some(ix) = self.index.node_ix(node_id) else {
            self.log.record(format!("toggle: unknown node `{node_id}`"));
            return;
        };
        if self.index.outgoing_edges(ix).is_empty() {
            self.log
                .record(format!("toggle: `{node_id}` has no downstream nodes"));
            return;
        }

        self.log.record(format!("toggle: node `{node_id}`"));
        match self.state.get(&ix).copied().unwrap_or(NodeState::Collapsed) {
            NodeState::Collapsed => self.reveal_children(ix),
            NodeState::Expanded => self.collapse_subtree(ix),
        }
    }

    /// Current toggle state of a node, if it has outgoing edges.
    pub fn node_state(&self, node_id: &str) -> Option<NodeState> {
        let ix = self.index.node_ix(node_id)?;
        self.state.get(&ix).copied()
    }

    /// The live document, for the rendering surface to reapply.
    pub fn document(&self) -> &GraphDoc {
        &self.doc
    }

    pub fn into_document(self) -> GraphDoc {
        self.doc
    }

    pub fn events(&self) -> &[String] {
        self.log.entries()
    }

    fn reveal_children(&mut self, ix: u32) {
        for &edge_ix in self.index.outgoing_edges(ix) {
            let edge = &mut self.doc.elements.edges[edge_ix as usize];
            edge.set_hidden(false);
            self.log.record(format!("showing edge: {}", edge.display_id()));

            let Some((_, dst)) = self.index.edge_endpoints(edge_ix) else {
                continue;
            };
            let node = &mut self.doc.elements.nodes[dst as usize];
            node.set_hidden(false);
            self.log.record(format!("showing node: {}", node.data.id));
        }
        self.state.insert(ix, NodeState::Expanded);
    }

    /// Hide the full downstream closure. Explicit work stack with a visited
    /// guard: bounded depth, and terminates even on accidental cycles.
    fn collapse_subtree(&mut self, root: u32) {
        let mut stack = vec![root];
        let mut visited = RoaringBitmap::new();
        visited.insert(root);

        while let Some(node_ix) = stack.pop() {
            for &edge_ix in self.index.outgoing_edges(node_ix) {
                let edge = &mut self.doc.elements.edges[edge_ix as usize];
                edge.set_hidden(true);
                self.log.record(format!("hiding edge: {}", edge.display_id()));

                let Some((_, dst)) = self.index.edge_endpoints(edge_ix) else {
                    continue;
                };
                let node = &mut self.doc.elements.nodes[dst as usize];
                node.set_hidden(true);
                self.log.record(format!("hiding node: {}", node.data.id));

                if visited.insert(dst) {
                    stack.push(dst);
                }
            }
            // Collapsed descendants reveal level by level on later clicks.
            self.state.insert(node_ix, NodeState::Collapsed);
        }
    }
}
