//! Collections: snapshots, set algebra, traversal and removal.

use compound_graph::{
    EdgeSpec, Graph, GraphBuilder, GraphConfig, GraphOptions, GraphSpec, NodeSpec, ParentCheck,
    RemovalPolicy,
};

/// ```text
/// top
/// └── mid
///     ├── leaf1
///     └── leaf2
/// other
/// edges: leaf1 -> leaf2 (e1), mid -> other (e2)
/// ```
fn nested(policy: RemovalPolicy) -> Graph {
    let mut builder = GraphBuilder::with_options(GraphOptions {
        removal_policy: policy,
        ..GraphOptions::default()
    });
    builder
        .node("top")
        .child("mid", "top")
        .child("leaf1", "mid")
        .child("leaf2", "mid")
        .node("other")
        .element(EdgeSpec::new("leaf1", "leaf2").id("e1"))
        .element(EdgeSpec::new("mid", "other").id("e2"));
    builder.build()
}

// ==================== Snapshots ====================

#[test]
fn test_collection_survives_mutation() {
    let mut graph = nested(RemovalPolicy::Detach);
    let before = graph.elements();
    graph.add(NodeSpec::new("late"));
    graph.remove("other").unwrap();

    assert_eq!(before.len(), 7);
    assert!(before.contains("other"));
    assert!(!before.contains("late"));
    assert_eq!(graph.size(), 6);
}

#[test]
fn test_collection_survives_destroy() {
    let graph = nested(RemovalPolicy::Detach);
    let leaves = graph.select("node:childless").unwrap();
    graph.destroy();
    assert_eq!(leaves.ids(), vec!["leaf1", "leaf2", "other"]);
    assert_eq!(leaves.parent().ids(), vec!["mid"]);
}

#[test]
fn test_equality_is_per_instance() {
    let one = nested(RemovalPolicy::Detach);
    let two = nested(RemovalPolicy::Detach);
    assert_eq!(one.elements(), one.elements());
    assert_ne!(one.elements(), two.elements());
}

// ==================== Set Algebra ====================

#[test]
fn test_algebra_over_selections() {
    let graph = nested(RemovalPolicy::Detach);
    let nodes = graph.nodes();
    let leaves = graph.select("#mid > node").unwrap();

    assert_eq!(nodes.difference(&leaves).ids(), vec!["top", "mid", "other"]);
    assert_eq!(nodes.intersection(&leaves).ids(), vec!["leaf1", "leaf2"]);
    assert_eq!(leaves.union(&graph.edges()).len(), 4);
    assert_eq!(leaves.complement().len(), 5);
}

// ==================== Traversal ====================

#[test]
fn test_hierarchy_traversal() {
    let graph = nested(RemovalPolicy::Detach);
    let leaf = graph.get_element_by_id("leaf1");
    assert_eq!(leaf.ancestors().ids(), vec!["mid", "top"]);
    assert_eq!(leaf.siblings().ids(), vec!["leaf2"]);
    assert_eq!(
        graph.get_element_by_id("top").descendants().ids(),
        vec!["mid", "leaf1", "leaf2"]
    );
}

#[test]
fn test_edge_traversal() {
    let graph = nested(RemovalPolicy::Detach);
    let mid = graph.get_element_by_id("mid");
    assert_eq!(mid.outgoers().ids(), vec!["e2", "other"]);
    assert_eq!(graph.get_element_by_id("other").incomers().ids(), vec!["e2", "mid"]);
    assert_eq!(graph.get_element_by_id("e1").connected_nodes().ids(), vec!["leaf1", "leaf2"]);
}

#[test]
fn test_traversal_over_empty_collection() {
    let graph = nested(RemovalPolicy::Detach);
    let none = graph.get_element_by_id("missing");
    assert!(none.is_empty());
    assert!(none.parent().is_empty());
    assert!(none.neighborhood().is_empty());
    assert_eq!(none.degree(), 0);
}

// ==================== Removal Policies ====================

#[test]
fn test_remove_detaches_children() {
    let mut graph = nested(RemovalPolicy::Detach);
    let removed = graph.remove("mid").unwrap();
    assert_eq!(removed.ids(), vec!["mid", "e2"]);
    assert!(graph.get_element_by_id("leaf1").parent().is_empty());
    assert!(graph.element("e1").is_some());
}

#[test]
fn test_remove_reparents_children() {
    let mut graph = nested(RemovalPolicy::Reparent);
    graph.remove("mid").unwrap();
    assert_eq!(graph.get_element_by_id("leaf1").parent().ids(), vec!["top"]);
    assert_eq!(
        graph.get_element_by_id("top").children().ids(),
        vec!["leaf1", "leaf2"]
    );
}

#[test]
fn test_remove_cascades_to_descendants() {
    let mut graph = nested(RemovalPolicy::Cascade);
    let removed = graph.remove("mid").unwrap();
    assert_eq!(removed.ids(), vec!["mid", "leaf1", "leaf2", "e1", "e2"]);
    assert_eq!(graph.elements().ids(), vec!["top", "other"]);
}

#[test]
fn test_remove_unknown_is_error() {
    let mut graph = nested(RemovalPolicy::Detach);
    assert!(graph.remove("ghost").is_err());
}

// ==================== Live Mutation ====================

#[test]
fn test_set_parent_stays_acyclic() {
    let mut graph = nested(RemovalPolicy::Detach);
    assert_eq!(
        graph.set_parent("top", Some("leaf1")).unwrap(),
        ParentCheck::RejectedCycle
    );
    assert_eq!(
        graph.set_parent("top", Some("top")).unwrap(),
        ParentCheck::RejectedSelf
    );
    assert_eq!(
        graph.set_parent("other", Some("top")).unwrap(),
        ParentCheck::Accepted
    );
    assert_eq!(graph.get_element_by_id("other").parent().ids(), vec!["top"]);
    assert!(graph.set_parent("e1", Some("top")).is_err());
}

#[test]
fn test_data_updates() {
    let mut graph = Graph::from_config(GraphConfig::new(
        GraphSpec::new().node(NodeSpec::new("a").with("w", 1)),
    ));
    let old = graph.set_data("a", "w", serde_json::json!(2)).unwrap();
    assert_eq!(old, Some(serde_json::json!(1)));
    assert!(graph.set_data("a", "id", serde_json::json!("b")).is_err());
    assert_eq!(graph.select("[w = 2]").unwrap().ids(), vec!["a"]);
    assert_eq!(graph.remove_data("a", "w").unwrap(), Some(serde_json::json!(2)));
}
