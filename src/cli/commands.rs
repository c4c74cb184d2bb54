//! CLI command implementations.
//!
//! Every command loads the element file, builds a graph, and writes its
//! result to `out` as text or JSON.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};

use crate::collection::Collection;
use crate::format::{to_json, GraphReader, GraphWriter};
use crate::graph::Graph;
use crate::types::{Element, GraphElement, GraphError, GraphResult};

/// Load a graph from an element file. `diagnostics` forces the discard list
/// on regardless of the file's options.
pub fn load_graph(path: &Path, diagnostics: bool) -> GraphResult<Graph> {
    let mut config = GraphReader::read_from_file(path)?;
    if diagnostics {
        config.options.collect_diagnostics = true;
    }
    let graph = Graph::from_config(config);
    let report = graph.build_report();
    if !report.is_clean() {
        log::warn!(
            "{}: {} elements discarded, {} parent links dropped",
            path.display(),
            report.discarded,
            report.parents_dropped
        );
    }
    Ok(graph)
}

fn find(graph: &Graph, id: &str) -> GraphResult<Collection> {
    let found = graph.get_element_by_id(id);
    if found.is_empty() {
        return Err(GraphError::ElementNotFound(id.to_string()));
    }
    Ok(found)
}

fn print_json(out: &mut impl Write, value: &Value) -> GraphResult<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn print_ids(out: &mut impl Write, label: &str, elements: &Collection) -> GraphResult<()> {
    writeln!(out, "{} ({}):", label, elements.len())?;
    for element in elements {
        let kind = if element.is_node() { "node" } else { "edge" };
        writeln!(out, "  {} [{}]", element.id(), kind)?;
    }
    Ok(())
}

/// Summary counts for an element file.
pub fn cmd_info(path: &Path, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    let nodes = graph.nodes();
    let compound = nodes.filter_selector(":parent")?.len();
    let orphans = nodes.orphans().len();
    let loops = graph.edges().filter_selector(":loop")?.len();
    let report = graph.build_report();

    if json {
        let info = json!({
            "file": path.display().to_string(),
            "nodes": nodes.len(),
            "edges": graph.edges().len(),
            "compound_nodes": compound,
            "top_level_nodes": orphans,
            "loops": loops,
            "discarded": report.discarded,
            "parents_dropped": report.parents_dropped,
        });
        print_json(out, &info)?;
    } else {
        writeln!(out, "File: {}", path.display())?;
        writeln!(out, "Nodes: {}", nodes.len())?;
        writeln!(out, "Edges: {}", graph.edges().len())?;
        writeln!(out, "Compound nodes: {}", compound)?;
        writeln!(out, "Top-level nodes: {}", orphans)?;
        writeln!(out, "Loops: {}", loops)?;
        writeln!(out, "Discarded: {}", report.discarded)?;
        writeln!(out, "Parents dropped: {}", report.parents_dropped)?;
    }
    Ok(())
}

/// Show one element.
pub fn cmd_get(path: &Path, id: &str, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    let found = find(&graph, id)?;
    let Some(element) = found.first() else {
        return Err(GraphError::ElementNotFound(id.to_string()));
    };

    if json {
        let exported = to_json(&found);
        let entry = exported[element.group().name()][0].clone();
        print_json(out, &entry)?;
        return Ok(());
    }

    match element {
        Element::Node(_) => {
            writeln!(out, "Node {}", element.id())?;
            let parent = found.parent();
            writeln!(out, "  Parent: {}", parent.ids().first().copied().unwrap_or("-"))?;
            writeln!(out, "  Children: {}", found.children().len())?;
            writeln!(out, "  Degree: {}", found.degree())?;
        }
        Element::Edge(edge) => {
            writeln!(out, "Edge {}", element.id())?;
            writeln!(out, "  Source: {}", edge.source())?;
            writeln!(out, "  Target: {}", edge.target())?;
        }
    }
    for (key, value) in element.data() {
        writeln!(out, "  {}: {}", key, value)?;
    }
    Ok(())
}

/// Elements matching a selector.
pub fn cmd_query(path: &Path, selector: &str, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    let matched = graph.select(selector)?;
    if json {
        print_json(out, &to_json(&matched))
    } else {
        print_ids(out, "Matches", &matched)
    }
}

/// Ancestor chain of a node, nearest first.
pub fn cmd_parents(path: &Path, id: &str, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    let ancestors = find(&graph, id)?.ancestors();
    if json {
        print_json(out, &json!({ "id": id, "ancestors": ancestors.ids() }))
    } else {
        print_ids(out, &format!("Ancestors of {id}"), &ancestors)
    }
}

/// Adjacent nodes and connecting edges.
pub fn cmd_neighbors(path: &Path, id: &str, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    let neighborhood = find(&graph, id)?.neighborhood();
    if json {
        print_json(
            out,
            &json!({
                "id": id,
                "nodes": neighborhood.nodes().ids(),
                "edges": neighborhood.edges().ids(),
            }),
        )
    } else {
        print_ids(out, &format!("Neighborhood of {id}"), &neighborhood)
    }
}

/// Validate an element file and list everything the builder repaired.
pub fn cmd_check(path: &Path, json: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, true)?;
    let report = graph.build_report();
    if json {
        let discards: Vec<String> = report.discards.iter().map(|d| d.to_string()).collect();
        print_json(
            out,
            &json!({
                "clean": report.is_clean(),
                "nodes_added": report.nodes_added,
                "edges_added": report.edges_added,
                "parents_assigned": report.parents_assigned,
                "discarded": report.discarded,
                "parents_dropped": report.parents_dropped,
                "discards": discards,
            }),
        )?;
    } else {
        writeln!(
            out,
            "Added {} nodes, {} edges, {} parent links",
            report.nodes_added, report.edges_added, report.parents_assigned
        )?;
        if report.is_clean() {
            writeln!(out, "No problems found")?;
        } else {
            writeln!(
                out,
                "{} discarded, {} parent links dropped:",
                report.discarded, report.parents_dropped
            )?;
            for discard in &report.discards {
                writeln!(out, "  {}", discard)?;
            }
        }
    }
    Ok(())
}

/// Write the normalized element description.
pub fn cmd_export(path: &Path, pretty: bool, out: &mut impl Write) -> GraphResult<()> {
    let graph = load_graph(path, false)?;
    GraphWriter::new(pretty).write_to(&graph.elements(), out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn run<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> GraphResult<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    const SAMPLE: &str = r#"{
        "nodes": [
            { "data": { "id": "p" } },
            { "data": { "id": "c", "parent": "p", "label": "inner" } }
        ],
        "edges": [
            { "data": { "id": "e", "source": "c", "target": "p" } }
        ]
    }"#;

    #[test]
    fn test_info_text() {
        let file = fixture(SAMPLE);
        let text = run(|out| cmd_info(file.path(), false, out));
        assert!(text.contains("Nodes: 2"));
        assert!(text.contains("Compound nodes: 1"));
    }

    #[test]
    fn test_get_missing_element() {
        let file = fixture(SAMPLE);
        let mut out = Vec::new();
        let err = cmd_get(file.path(), "zzz", false, &mut out).unwrap_err();
        assert!(matches!(err, GraphError::ElementNotFound(_)));
    }

    #[test]
    fn test_get_json_includes_parent() {
        let file = fixture(SAMPLE);
        let text = run(|out| cmd_get(file.path(), "c", true, out));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["data"]["parent"], "p");
        assert_eq!(value["data"]["label"], "inner");
    }

    #[test]
    fn test_query_bad_selector() {
        let file = fixture(SAMPLE);
        let mut out = Vec::new();
        let err = cmd_query(file.path(), "node[", false, &mut out).unwrap_err();
        assert!(matches!(err, GraphError::Selector(_)));
    }

    #[test]
    fn test_check_lists_discards() {
        let file = fixture(
            r#"[
                { "group": "nodes", "data": { "id": "a", "parent": "ghost" } },
                { "group": "nodes", "data": { "id": "a" } }
            ]"#,
        );
        let text = run(|out| cmd_check(file.path(), false, out));
        assert!(text.contains("duplicate id 'a'"));
        assert!(text.contains("unknown parent 'ghost'"));
    }
}
