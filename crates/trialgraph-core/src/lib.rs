//! Trialgraph core: category filtering and visibility propagation
//!
//! The rendering surface (Cytoscape or anything shaped like it) is an external
//! collaborator. It supplies the raw document and user events (category
//! selection, node clicks) and consumes one visibility decision per node/edge.
//! This crate owns the part with real invariants:
//!
//! 1. **Graph Index**: id interning and O(1) outgoing-edge lookup.
//! 2. **Category Filter**: initial visible subset for a category token,
//!    including the two reserved whole-graph modes.
//! 3. **Lineage Collector**: ancestor closure of active trials, run to a
//!    fixed point, plus always-shown scaffolding levels.
//! 4. **Render Session**: live per-render visibility state with explicit
//!    per-node collapsed/expanded toggling.
//!
//! Invariants maintained: every visible edge has both endpoints visible after
//! filtering; toggling is cycle-safe (explicit work stack with a visited
//! guard); unknown ids and leaf nodes are no-ops.

pub mod events;
pub mod filter;
pub mod index;
pub mod lineage;
pub mod session;

pub use events::EventLog;
pub use filter::{filter_by_category, Category, ACTIVE_TRIALS_TOKEN, FULLY_EXPANDED_TOKEN};
pub use index::GraphIndex;
pub use lineage::collect_active_lineage;
pub use session::{NodeState, RenderSession};
