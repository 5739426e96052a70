//! Trialgraph wire document model
//!
//! The rendering surface speaks a Cytoscape-style JSON document:
//!
//! ```text
//! { "elements": { "nodes": [ { "data": {...}, "classes": "hidden" }, ... ],
//!                 "edges": [ { "data": {...} }, ... ] } }
//! ```
//!
//! Presence of the `hidden` token in an element's `classes` string is the
//! on-the-wire encoding of the visibility flag; absence means visible. This
//! crate owns that encoding plus structural validation (no dangling edge
//! endpoints, unique node ids, unique `(source, target)` pairs).

pub mod document;

pub use document::{
    DocumentError, EdgeData, EdgeElement, Elements, GraphDoc, NodeData, NodeElement, NodeType,
    HIDDEN_CLASS,
};
