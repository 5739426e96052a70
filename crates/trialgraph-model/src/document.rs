//! Graph document: nodes, edges, and the `classes`-based visibility encoding.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Class token marking an element as hidden on the wire.
pub const HIDDEN_CLASS: &str = "hidden";

// ============================================================================
// Node types
// ============================================================================

/// Domain type of a node in the trial lineage hierarchy.
///
/// The known hierarchy runs oncology category → study type → trial phase →
/// therapy line → trial code. Unrecognized types are preserved verbatim so
/// documents from newer producers still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    OncologyCategory,
    StudyType,
    TrialPhase,
    TherapyLine,
    TrialCode,
    NoTrialsAvailable,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::OncologyCategory => "oncology_category",
            NodeType::StudyType => "study_type",
            NodeType::TrialPhase => "trial_phase",
            NodeType::TherapyLine => "therapy_line",
            NodeType::TrialCode => "trial_code",
            NodeType::NoTrialsAvailable => "no_trials_available",
            NodeType::Other(s) => s,
        }
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "oncology_category" => NodeType::OncologyCategory,
            "study_type" => NodeType::StudyType,
            "trial_phase" => NodeType::TrialPhase,
            "therapy_line" => NodeType::TherapyLine,
            "trial_code" => NodeType::TrialCode,
            "no_trials_available" => NodeType::NoTrialsAvailable,
            _ => NodeType::Other(s),
        }
    }
}

impl From<NodeType> for String {
    fn from(t: NodeType) -> Self {
        t.as_str().to_string()
    }
}

// ============================================================================
// Wire elements
// ============================================================================

/// Payload of a node element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeData {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    pub color: String,
    pub outline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
}

/// A node element: payload plus the visibility class string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeElement {
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

/// Payload of an edge element.
///
/// `id` is optional on the wire: the original producer let the renderer
/// auto-assign edge ids. `(source, target)` is the stable identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<bool>,
}

/// An edge element: payload plus the visibility class string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeElement {
    pub data: EdgeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
}

/// Ordered node and edge sequences.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Elements {
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
}

/// The full graph document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphDoc {
    pub elements: Elements,
}

// ============================================================================
// Visibility encoding
// ============================================================================

fn classes_hidden(classes: &Option<String>) -> bool {
    classes
        .as_deref()
        .is_some_and(|c| c.split_whitespace().any(|t| t == HIDDEN_CLASS))
}

fn set_classes_hidden(classes: &mut Option<String>, hidden: bool) {
    if hidden {
        if !classes_hidden(classes) {
            *classes = Some(HIDDEN_CLASS.to_string());
        }
    } else {
        *classes = None;
    }
}

impl NodeElement {
    pub fn is_hidden(&self) -> bool {
        classes_hidden(&self.classes)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        set_classes_hidden(&mut self.classes, hidden);
    }
}

impl EdgeElement {
    pub fn is_hidden(&self) -> bool {
        classes_hidden(&self.classes)
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        set_classes_hidden(&mut self.classes, hidden);
    }

    /// Display identity used in diagnostic events when the wire `id` is absent.
    pub fn display_id(&self) -> String {
        match &self.data.id {
            Some(id) => id.clone(),
            None => format!("{}->{}", self.data.source, self.data.target),
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Malformed-document conditions. These are non-fatal "invalid data" signals:
/// the caller reports them and renders nothing.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid document JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate node id `{id}`")]
    DuplicateNode { id: String },

    #[error("duplicate edge `{src}` -> `{target}`")]
    DuplicateEdge { src: String, target: String },

    #[error("edge `{edge}` references unknown {end} node `{id}`")]
    DanglingEndpoint {
        edge: String,
        end: &'static str,
        id: String,
    },
}

impl GraphDoc {
    /// Parse a document from JSON and validate its structure.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let doc: GraphDoc = serde_json::from_str(text)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serialize back to wire JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural invariants: unique node ids, unique `(source, target)`
    /// pairs, and no dangling edge endpoints.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut ids: HashSet<&str> = HashSet::with_capacity(self.elements.nodes.len());
        for node in &self.elements.nodes {
            if !ids.insert(node.data.id.as_str()) {
                return Err(DocumentError::DuplicateNode {
                    id: node.data.id.clone(),
                });
            }
        }

        let mut pairs: HashSet<(&str, &str)> = HashSet::with_capacity(self.elements.edges.len());
        for edge in &self.elements.edges {
            let source = edge.data.source.as_str();
            let target = edge.data.target.as_str();
            if !ids.contains(source) {
                return Err(DocumentError::DanglingEndpoint {
                    edge: edge.display_id(),
                    end: "source",
                    id: source.to_string(),
                });
            }
            if !ids.contains(target) {
                return Err(DocumentError::DanglingEndpoint {
                    edge: edge.display_id(),
                    end: "target",
                    id: target.to_string(),
                });
            }
            if !pairs.insert((source, target)) {
                return Err(DocumentError::DuplicateEdge {
                    src: source.to_string(),
                    target: target.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Count nodes of a given type.
    pub fn count_by_type(&self, node_type: &NodeType) -> usize {
        self.elements
            .nodes
            .iter()
            .filter(|n| &n.data.node_type == node_type)
            .count()
    }
}
