//! GraphIndex: adjacency and type lookups over a graph document.
//!
//! Built once per render session. Node ids are interned to dense `u32`
//! indices (positions in the document's node sequence) so that set work can
//! run on Roaring bitmaps instead of string sets. The index holds topology
//! only; visibility lives on the document and never invalidates the index.

use roaring::RoaringBitmap;
use std::collections::HashMap;
use trialgraph_model::{GraphDoc, NodeType};

/// Read-only adjacency/type index for one document.
#[derive(Debug)]
pub struct GraphIndex {
    /// Node id -> dense node index.
    id_to_ix: HashMap<String, u32>,
    /// Node index -> edge indices with that node as source, in edge
    /// enumeration order. Edge indices are positions in the document's edge
    /// sequence.
    outgoing: HashMap<u32, Vec<u32>>,
    /// Edge position -> (source, target) node indices. `None` for edges whose
    /// endpoints are missing from the node sequence.
    endpoints: Vec<Option<(u32, u32)>>,
    /// Node type -> bitmap of node indices.
    type_index: HashMap<NodeType, RoaringBitmap>,
    node_count: u32,
}

impl GraphIndex {
    /// Build the index. Edges whose endpoints are missing from the node
    /// sequence are skipped; callers that validated the document first will
    /// never hit that path.
    pub fn build(doc: &GraphDoc) -> Self {
        let mut id_to_ix = HashMap::with_capacity(doc.elements.nodes.len());
        let mut type_index: HashMap<NodeType, RoaringBitmap> = HashMap::new();

        for (ix, node) in doc.elements.nodes.iter().enumerate() {
            let ix = ix as u32;
            id_to_ix.entry(node.data.id.clone()).or_insert(ix);
            type_index
                .entry(node.data.node_type.clone())
                .or_default()
                .insert(ix);
        }

        let mut outgoing: HashMap<u32, Vec<u32>> = HashMap::new();
        let mut endpoints = Vec::with_capacity(doc.elements.edges.len());
        for (edge_ix, edge) in doc.elements.edges.iter().enumerate() {
            let resolved = id_to_ix
                .get(edge.data.source.as_str())
                .copied()
                .zip(id_to_ix.get(edge.data.target.as_str()).copied());
            if let Some((src, _)) = resolved {
                outgoing.entry(src).or_default().push(edge_ix as u32);
            }
            endpoints.push(resolved);
        }

        Self {
            id_to_ix,
            outgoing,
            endpoints,
            type_index,
            node_count: doc.elements.nodes.len() as u32,
        }
    }

    /// Dense index of a node id, if present.
    pub fn node_ix(&self, id: &str) -> Option<u32> {
        self.id_to_ix.get(id).copied()
    }

    /// Edge indices whose source is `node_ix`, in enumeration order. Empty
    /// for leaves and unknown indices.
    pub fn outgoing_edges(&self, node_ix: u32) -> &[u32] {
        self.outgoing
            .get(&node_ix)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// `(source, target)` node indices of an edge position, if both resolved.
    pub fn edge_endpoints(&self, edge_ix: u32) -> Option<(u32, u32)> {
        self.endpoints.get(edge_ix as usize).copied().flatten()
    }

    /// Bitmap of node indices with the given type.
    pub fn by_type(&self, node_type: &NodeType) -> Option<&RoaringBitmap> {
        self.type_index.get(node_type)
    }

    pub fn node_count(&self) -> u32 {
        self.node_count
    }

    pub fn edge_count(&self) -> u32 {
        self.endpoints.len() as u32
    }
}
