//! Tidy-table conversion: composite ids, dedup, defaults, stub pruning.

use trialgraph_ingest_csv::{
    build_document, build_document_stubbed, read_tidy_rows, DEFAULT_DESCRIPTION, DEFAULT_HYPERLINK,
};
use trialgraph_model::NodeType;

const TIDY: &str = "\
oncology_category,study_type,trial_phase,therapy_line,trial_code,hyperlink,trial_description
Breast,Interventional,Phase 1,First Line,NCT-001,https://example.org/1,Dose escalation
Breast,Interventional,Phase 1,Second Line,NCT-002,,
Breast,Observational,,,,,
Melanoma/Cutaneous,Interventional,Phase 2,First Line,NCT-001,,
";

#[test]
fn builds_composite_ids_per_level() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document(&rows);
    doc.validate().unwrap();

    let ids: Vec<&str> = doc
        .elements
        .nodes
        .iter()
        .map(|n| n.data.id.as_str())
        .collect();
    assert!(ids.contains(&"Breast"));
    assert!(ids.contains(&"Interventional_Breast"));
    assert!(ids.contains(&"Phase 1_Interventional_Breast"));
    assert!(ids.contains(&"First Line_Phase 1_Interventional_Breast"));
    // Trial codes stay verbatim and are shared across branches.
    assert_eq!(ids.iter().filter(|id| **id == "NCT-001").count(), 1);
}

#[test]
fn labels_are_the_raw_level_values() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document(&rows);
    let study = doc
        .elements
        .nodes
        .iter()
        .find(|n| n.data.id == "Interventional_Breast")
        .unwrap();
    assert_eq!(study.data.label, "Interventional");
    assert_eq!(study.data.node_type, NodeType::StudyType);
}

#[test]
fn repeated_levels_are_deduplicated() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document(&rows);

    let study_nodes = doc
        .elements
        .nodes
        .iter()
        .filter(|n| n.data.id == "Interventional_Breast")
        .count();
    assert_eq!(study_nodes, 1);

    let chain_edges = doc
        .elements
        .edges
        .iter()
        .filter(|e| e.data.source == "Breast" && e.data.target == "Interventional_Breast")
        .count();
    assert_eq!(chain_edges, 1);
}

#[test]
fn missing_trial_columns_get_defaults() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document(&rows);
    let trial = doc
        .elements
        .nodes
        .iter()
        .find(|n| n.data.id == "NCT-002")
        .unwrap();
    assert_eq!(trial.data.hyperlink.as_deref(), Some(DEFAULT_HYPERLINK));
    assert_eq!(trial.data.description.as_deref(), Some(DEFAULT_DESCRIPTION));

    let documented = doc
        .elements
        .nodes
        .iter()
        .find(|n| n.data.id == "NCT-001")
        .unwrap();
    assert_eq!(documented.data.description.as_deref(), Some("Dose escalation"));
}

#[test]
fn fresh_documents_show_only_category_roots() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document(&rows);

    for node in &doc.elements.nodes {
        let expect_visible = node.data.node_type == NodeType::OncologyCategory;
        assert_eq!(!node.is_hidden(), expect_visible, "node {}", node.data.id);
    }
    assert!(doc.elements.edges.iter().all(|e| e.is_hidden()));
}

#[test]
fn stubbing_replaces_branches_without_trials() {
    let rows = read_tidy_rows(TIDY.as_bytes()).unwrap();
    let doc = build_document_stubbed(&rows);
    doc.validate().unwrap();

    // The Observational study under Breast has no trials: it keeps a single
    // marker child and nothing else downstream.
    let stub = doc
        .elements
        .nodes
        .iter()
        .find(|n| n.data.node_type == NodeType::NoTrialsAvailable)
        .expect("stub node");
    assert_eq!(stub.data.id, "Observational_Breast_no_trials_available");
    assert_eq!(stub.data.label, "No Trials Available");

    assert!(doc
        .elements
        .edges
        .iter()
        .any(|e| e.data.source == "Observational_Breast" && e.data.target == stub.data.id));

    // Healthy branches are untouched.
    assert!(doc.elements.nodes.iter().any(|n| n.data.id == "NCT-001"));
    assert!(doc
        .elements
        .nodes
        .iter()
        .any(|n| n.data.id == "First Line_Phase 1_Interventional_Breast"));
}

#[test]
fn rejects_malformed_csv() {
    // Row with a stray quote in the middle of a field.
    let bad = "oncology_category,study_type\n\"Breast,Interventional\n";
    assert!(read_tidy_rows(bad.as_bytes()).is_err());
}
