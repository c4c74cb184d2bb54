//! Selector matching against built graphs.

use compound_graph::{Graph, GraphConfig, GraphError, Selector};

/// ```text
/// region (kind=area)
/// ├── city-a (pop=120, name="Alpha")
/// └── city-b (pop=80, name="Beta", capital=true)
///     └── district (pop=5)
/// lone (pop=0)
/// road: city-a -> city-b (lanes=4), ring: lone -> lone
/// ```
fn fixture() -> Graph {
    let config = GraphConfig::from_json_str(
        r#"{
            "nodes": [
                { "data": { "id": "region", "kind": "area" } },
                { "data": { "id": "city-a", "parent": "region", "pop": 120, "name": "Alpha" } },
                { "data": { "id": "city-b", "parent": "region", "pop": 80, "name": "Beta", "capital": true } },
                { "data": { "id": "district", "parent": "city-b", "pop": 5 } },
                { "data": { "id": "lone", "pop": 0 } }
            ],
            "edges": [
                { "data": { "id": "road", "source": "city-a", "target": "city-b", "lanes": 4 } },
                { "data": { "id": "ring", "source": "lone", "target": "lone" } }
            ]
        }"#,
    )
    .unwrap();
    Graph::from_config(config)
}

fn ids(graph: &Graph, selector: &str) -> Vec<String> {
    graph
        .select(selector)
        .unwrap()
        .ids()
        .into_iter()
        .map(String::from)
        .collect()
}

// ==================== Groups and Identifiers ====================

#[test]
fn test_group_selectors() {
    let g = fixture();
    assert_eq!(ids(&g, "node").len(), 5);
    assert_eq!(ids(&g, "edges"), vec!["road", "ring"]);
    assert_eq!(ids(&g, "*").len(), 7);
}

#[test]
fn test_id_selector() {
    let g = fixture();
    assert_eq!(ids(&g, "#city-a"), vec!["city-a"]);
    assert!(ids(&g, "edge#city-a").is_empty());
    assert!(ids(&g, "#nowhere").is_empty());
}

#[test]
fn test_results_in_store_order() {
    let g = fixture();
    assert_eq!(ids(&g, "#lone, #region"), vec!["region", "lone"]);
}

// ==================== Attributes ====================

#[test]
fn test_numeric_attributes() {
    let g = fixture();
    assert_eq!(ids(&g, "node[pop > 50]"), vec!["city-a", "city-b"]);
    assert_eq!(ids(&g, "[pop <= 5]"), vec!["district", "lone"]);
    assert_eq!(ids(&g, "[lanes = 4]"), vec!["road"]);
}

#[test]
fn test_string_attributes() {
    let g = fixture();
    assert_eq!(ids(&g, r#"[name = "Alpha"]"#), vec!["city-a"]);
    assert_eq!(ids(&g, "[name ^= B]"), vec!["city-b"]);
    assert_eq!(ids(&g, "[name *= lph]"), vec!["city-a"]);
    assert_eq!(ids(&g, "node[name != Alpha]").len(), 4);
}

#[test]
fn test_presence_and_truthiness() {
    let g = fixture();
    assert_eq!(ids(&g, "[kind]"), vec!["region"]);
    assert_eq!(ids(&g, "[?capital]"), vec!["city-b"]);
    assert_eq!(ids(&g, "node[!pop]"), vec!["region", "lone"]);
}

#[test]
fn test_parent_field() {
    let g = fixture();
    assert_eq!(ids(&g, "[parent = region]"), vec!["city-a", "city-b"]);
}

// ==================== Pseudo-classes ====================

#[test]
fn test_structural_pseudo_classes() {
    let g = fixture();
    assert_eq!(ids(&g, ":parent"), vec!["region", "city-b"]);
    assert_eq!(ids(&g, ":orphan"), vec!["region", "lone"]);
    assert_eq!(ids(&g, ":child"), vec!["city-a", "city-b", "district"]);
    assert_eq!(ids(&g, "node:childless").len(), 3);
    assert_eq!(ids(&g, ":loop"), vec!["ring"]);
    assert_eq!(ids(&g, ":simple"), vec!["road"]);
}

// ==================== Combinators ====================

#[test]
fn test_child_combinator() {
    let g = fixture();
    assert_eq!(ids(&g, "#region > node"), vec!["city-a", "city-b"]);
    assert!(ids(&g, "#region > #district").is_empty());
}

#[test]
fn test_descendant_combinator() {
    let g = fixture();
    assert_eq!(ids(&g, "#region node"), vec!["city-a", "city-b", "district"]);
    assert_eq!(ids(&g, "[kind] [pop < 10]"), vec!["district"]);
}

#[test]
fn test_subject_marker() {
    let g = fixture();
    assert_eq!(ids(&g, "$node > #district"), vec!["city-b"]);
    assert_eq!(ids(&g, "$[kind] node[?capital]"), vec!["region"]);
}

// ==================== Errors ====================

#[test]
fn test_malformed_selector_is_error() {
    let g = fixture();
    for bad in ["", "node[", "#", "node >", ":bogus", "[a ~= 1]"] {
        let err = g.select(bad).unwrap_err();
        assert!(matches!(err, GraphError::Selector(_)), "{bad:?}");
    }
}

#[test]
fn test_selector_roundtrips_text() {
    let s: Selector = " node > #a ".parse().unwrap();
    assert_eq!(s.to_string(), "node > #a");
    assert_eq!(s.alternatives().len(), 1);
}
