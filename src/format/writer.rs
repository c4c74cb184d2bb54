//! Writes collections as JSON element descriptions.

use std::io::Write;
use std::path::Path;

use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::types::{Element, GraphElement, GraphResult};

/// Export a collection as `{ "nodes": [...], "edges": [...] }`.
///
/// Each entry is `{ "data": { ... } }` holding `id`, `parent` for nested
/// nodes or `source`/`target` for edges, and the element's own data. Members
/// appear in collection order. The output loads back into an equal graph.
pub fn to_json(elements: &Collection) -> Value {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for &key in elements.keys() {
        let Some(element) = elements.state().element(key) else {
            continue;
        };
        let mut data = Map::new();
        data.insert("id".to_string(), Value::String(element.id().to_string()));
        match element {
            Element::Node(_) => {
                if let Some(parent) = elements.state().data_value(key, "parent") {
                    data.insert("parent".to_string(), parent);
                }
            }
            Element::Edge(edge) => {
                data.insert("source".to_string(), Value::String(edge.source().to_string()));
                data.insert("target".to_string(), Value::String(edge.target().to_string()));
            }
        }
        for (k, v) in element.data() {
            data.entry(k.clone()).or_insert_with(|| v.clone());
        }
        let entry = serde_json::json!({ "data": Value::Object(data) });
        if element.is_node() {
            nodes.push(entry);
        } else {
            edges.push(entry);
        }
    }
    serde_json::json!({ "nodes": nodes, "edges": edges })
}

/// Writer for JSON element files.
pub struct GraphWriter {
    pretty: bool,
}

impl GraphWriter {
    /// Create a writer; `pretty` selects indented output.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Write a collection to a file.
    pub fn write_to_file(&self, elements: &Collection, path: &Path) -> GraphResult<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(elements, &mut writer)?;
        writer.flush()?;
        log::debug!("Wrote {} elements to {}", elements.len(), path.display());
        Ok(())
    }

    /// Write a collection to any writer.
    pub fn write_to(&self, elements: &Collection, writer: &mut impl Write) -> GraphResult<()> {
        let value = to_json(elements);
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &value)?;
        } else {
            serde_json::to_writer(&mut *writer, &value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::types::{EdgeSpec, GraphConfig, NodeSpec};
    use serde_json::json;

    #[test]
    fn test_export_shape() {
        let mut builder = GraphBuilder::new();
        builder
            .element(NodeSpec::new("p").with("label", "outer"))
            .child("c", "p")
            .element(EdgeSpec::new("c", "p").id("e").with("w", 1));
        let graph = builder.build();
        let value = to_json(&graph.elements());
        assert_eq!(
            value,
            json!({
                "nodes": [
                    { "data": { "id": "p", "label": "outer" } },
                    { "data": { "id": "c", "parent": "p" } }
                ],
                "edges": [
                    { "data": { "id": "e", "source": "c", "target": "p", "w": 1 } }
                ]
            })
        );
    }

    #[test]
    fn test_export_reloads() {
        let mut builder = GraphBuilder::new();
        builder.node("a").child("b", "a").edge("a", "b");
        let graph = builder.build();
        let exported = graph.to_json();

        let config = GraphConfig::from_json_str(&exported.to_string()).unwrap();
        let again = crate::graph::Graph::from_config(config);
        assert_eq!(again.to_json(), exported);
    }

    #[test]
    fn test_write_to_buffer() {
        let mut builder = GraphBuilder::new();
        builder.node("a");
        let graph = builder.build();
        let mut out = Vec::new();
        GraphWriter::new(false)
            .write_to(&graph.elements(), &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim(), r#"{"edges":[],"nodes":[{"data":{"id":"a"}}]}"#);
    }
}
