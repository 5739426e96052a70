//! Render session toggling: reveal one level, collapse whole subtrees.

use trialgraph_core::{NodeState, RenderSession, FULLY_EXPANDED_TOKEN};
use trialgraph_model::{EdgeData, EdgeElement, Elements, GraphDoc, NodeData, NodeElement, NodeType};

fn node(id: &str, node_type: &str) -> NodeElement {
    NodeElement {
        data: NodeData {
            id: id.to_string(),
            node_type: NodeType::from(node_type.to_string()),
            label: id.to_string(),
            color: "#ccc".to_string(),
            outline: "black".to_string(),
            description: None,
            hyperlink: None,
        },
        classes: None,
    }
}

fn edge(source: &str, target: &str) -> EdgeElement {
    EdgeElement {
        data: EdgeData {
            id: None,
            source: source.to_string(),
            target: target.to_string(),
            arrow: Some(true),
        },
        classes: None,
    }
}

fn doc(nodes: Vec<NodeElement>, edges: Vec<EdgeElement>) -> GraphDoc {
    GraphDoc {
        elements: Elements { nodes, edges },
    }
}

/// Root with two children, each child with one grandchild.
fn two_level_tree() -> GraphDoc {
    doc(
        vec![
            node("R", "oncology_category"),
            node("C1", "study_type"),
            node("C2", "study_type"),
            node("G1", "trial_code"),
            node("G2", "trial_code"),
        ],
        vec![
            edge("R", "C1"),
            edge("R", "C2"),
            edge("C1", "G1"),
            edge("C2", "G2"),
        ],
    )
}

fn hidden_ids(d: &GraphDoc) -> Vec<&str> {
    d.elements
        .nodes
        .iter()
        .filter(|n| n.is_hidden())
        .map(|n| n.data.id.as_str())
        .collect()
}

#[test]
fn collapse_hides_the_entire_downstream_closure() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    session.toggle("R");

    let d = session.document();
    assert_eq!(hidden_ids(d), vec!["C1", "C2", "G1", "G2"]);
    assert!(d.elements.edges.iter().all(|e| e.is_hidden()));
    assert_eq!(session.node_state("R"), Some(NodeState::Collapsed));
}

#[test]
fn second_click_reveals_exactly_the_direct_children() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    session.toggle("R");
    session.toggle("R");

    let d = session.document();
    // Grandchildren stay hidden: reveal goes one level at a time.
    assert_eq!(hidden_ids(d), vec!["G1", "G2"]);
    let visible_edges: Vec<String> = d
        .elements
        .edges
        .iter()
        .filter(|e| !e.is_hidden())
        .map(|e| e.display_id())
        .collect();
    assert_eq!(visible_edges, vec!["R->C1", "R->C2"]);
    assert_eq!(session.node_state("R"), Some(NodeState::Expanded));
    assert_eq!(session.node_state("C1"), Some(NodeState::Collapsed));
}

#[test]
fn children_reveal_their_own_levels_on_later_clicks() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    session.toggle("R");
    session.toggle("R");
    session.toggle("C1");

    let d = session.document();
    assert_eq!(hidden_ids(d), vec!["G2"]);
}

#[test]
fn reveal_then_collapse_round_trips() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    let before = session.document().clone();

    session.toggle("R"); // collapse
    session.toggle("R"); // reveal one level
    session.toggle("C1");
    session.toggle("C2"); // back to fully expanded

    assert_eq!(session.document(), &before);
}

#[test]
fn toggle_on_leaf_is_a_noop() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    let before = session.document().clone();
    session.toggle("G1");
    assert_eq!(session.document(), &before);
    assert_eq!(session.node_state("G1"), None);
}

#[test]
fn toggle_on_unknown_id_is_a_noop() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    let before = session.document().clone();
    session.toggle("nope");
    assert_eq!(session.document(), &before);
}

#[test]
fn collapse_terminates_on_cyclic_input() {
    let d = doc(
        vec![
            node("A", "therapy_line"),
            node("B", "therapy_line"),
            node("C", "trial_code"),
        ],
        vec![edge("A", "B"), edge("B", "A"), edge("B", "C")],
    );
    let mut session = RenderSession::new(d, FULLY_EXPANDED_TOKEN).unwrap();
    session.toggle("A");

    let doc = session.document();
    assert!(doc.elements.edges.iter().all(|e| e.is_hidden()));
    // A is hidden too here: it sits on the cycle it collapsed.
    assert_eq!(hidden_ids(doc), vec!["A", "B", "C"]);
}

#[test]
fn states_seed_from_filtered_visibility() {
    // Unknown category hides everything, so every non-leaf seeds collapsed.
    let session = RenderSession::new(two_level_tree(), "NoSuchCategory").unwrap();
    assert_eq!(session.node_state("R"), Some(NodeState::Collapsed));
    assert_eq!(session.node_state("C1"), Some(NodeState::Collapsed));
}

#[test]
fn rejects_invalid_documents() {
    let d = doc(vec![node("A", "oncology_category")], vec![edge("A", "missing")]);
    assert!(RenderSession::new(d, FULLY_EXPANDED_TOKEN).is_err());
}

#[test]
fn toggle_emits_one_event_per_visibility_change() {
    let mut session = RenderSession::new(two_level_tree(), FULLY_EXPANDED_TOKEN).unwrap();
    let before = session.events().len();
    session.toggle("R");
    let events = &session.events()[before..];
    // 1 click + 4 hidden edges + 4 hidden nodes.
    assert_eq!(events.len(), 9);
    assert!(events.iter().any(|e| e.contains("hiding node: G2")));
}
