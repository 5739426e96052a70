//! Lineage Collector: the node set for the "all active trials" view.
//!
//! Seeds every `trial_code` node, then pulls in ancestors along reversed
//! edges until the set stops growing. The original renderer stopped after two
//! ancestor passes, which the five-level hierarchy (category → study type →
//! trial phase → therapy line → trial code) outgrows; the fixed point is
//! depth-independent and terminates because the set only grows and is bounded
//! by the node count. Scaffolding levels (`oncology_category`, `study_type`)
//! are always included, reachable or not.

use roaring::RoaringBitmap;
use trialgraph_model::{GraphDoc, NodeType};

use crate::events::EventLog;
use crate::index::GraphIndex;

/// Collect the visible node set for the active-trials view, as dense node
/// indices into `index`.
pub fn collect_active_lineage(
    doc: &GraphDoc,
    index: &GraphIndex,
    log: &mut EventLog,
) -> RoaringBitmap {
    let mut lineage = index
        .by_type(&NodeType::TrialCode)
        .cloned()
        .unwrap_or_default();
    log.record(format!(
        "lineage: seeded {} trial_code node(s)",
        lineage.len()
    ));

    loop {
        let before = lineage.len();
        for edge in &doc.elements.edges {
            let (Some(src), Some(dst)) = (
                index.node_ix(&edge.data.source),
                index.node_ix(&edge.data.target),
            ) else {
                continue;
            };
            if lineage.contains(dst) && lineage.insert(src) {
                log.record(format!("lineage: ancestor added: {}", edge.data.source));
            }
        }
        if lineage.len() == before {
            break;
        }
    }

    for node_type in [NodeType::OncologyCategory, NodeType::StudyType] {
        if let Some(nodes) = index.by_type(&node_type) {
            lineage |= nodes;
        }
    }
    log.record(format!("lineage: {} node(s) total", lineage.len()));

    lineage
}
