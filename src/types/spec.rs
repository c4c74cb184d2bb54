//! Declarative element descriptions consumed by the graph builder.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{DataBag, Group};
use crate::types::error::{GraphError, GraphResult};

/// Description of one node to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSpec {
    /// Requested identifier; generated when absent.
    pub id: Option<String>,
    /// Identifier of the requested parent node.
    pub parent: Option<String>,
    /// Remaining data fields.
    pub data: DataBag,
}

impl NodeSpec {
    /// A node with the given identifier and no data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the requested parent.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Add a data field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Description of one edge to create.
///
/// Endpoints are optional here so that incomplete descriptions can be
/// discarded by the builder instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeSpec {
    /// Requested identifier; generated when absent.
    pub id: Option<String>,
    /// Source node identifier.
    pub source: Option<String>,
    /// Target node identifier.
    pub target: Option<String>,
    /// Remaining data fields.
    pub data: DataBag,
}

impl EdgeSpec {
    /// An edge without an explicit identifier.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: Some(source.into()),
            target: Some(target.into()),
            data: DataBag::new(),
        }
    }

    /// Set the requested identifier.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a data field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

/// Either kind of element description.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    /// A node description.
    Node(NodeSpec),
    /// An edge description.
    Edge(EdgeSpec),
}

impl ElementSpec {
    /// Build a description from a group and a raw data bag, lifting the
    /// structural keys out of the bag.
    pub fn from_data(group: Group, mut data: DataBag) -> Self {
        let id = take_identifier(&mut data, "id");
        match group {
            Group::Nodes => Self::Node(NodeSpec {
                id,
                parent: take_identifier(&mut data, "parent"),
                data,
            }),
            Group::Edges => Self::Edge(EdgeSpec {
                id,
                source: take_identifier(&mut data, "source"),
                target: take_identifier(&mut data, "target"),
                data,
            }),
        }
    }

    /// The group this description belongs to.
    pub fn group(&self) -> Group {
        match self {
            Self::Node(_) => Group::Nodes,
            Self::Edge(_) => Group::Edges,
        }
    }

    /// The explicitly requested identifier, if any.
    pub fn requested_id(&self) -> Option<&str> {
        match self {
            Self::Node(n) => n.id.as_deref(),
            Self::Edge(e) => e.id.as_deref(),
        }
    }

    /// Parse one `{ "group": ..., "data": {...} }` entry. A missing group is
    /// inferred: entries naming a source or target are edges.
    pub fn from_json(value: &Value) -> GraphResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| GraphError::InvalidSpec(format!("element is not an object: {value}")))?;

        let data = match obj.get("data") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(d)) => d.clone(),
            Some(other) => {
                return Err(GraphError::InvalidSpec(format!(
                    "element data is not an object: {other}"
                )))
            }
        };

        let group = match obj.get("group") {
            Some(Value::String(g)) => Group::from_name(g)
                .ok_or_else(|| GraphError::InvalidSpec(format!("unknown group '{g}'")))?,
            Some(other) => {
                return Err(GraphError::InvalidSpec(format!(
                    "element group is not a string: {other}"
                )))
            }
            None if data.contains_key("source") || data.contains_key("target") => Group::Edges,
            None => Group::Nodes,
        };

        Ok(Self::from_data(group, data))
    }
}

impl From<NodeSpec> for ElementSpec {
    fn from(spec: NodeSpec) -> Self {
        Self::Node(spec)
    }
}

impl From<EdgeSpec> for ElementSpec {
    fn from(spec: EdgeSpec) -> Self {
        Self::Edge(spec)
    }
}

/// A declarative batch: nodes and edges, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct GraphSpec {
    /// Node descriptions.
    pub nodes: Vec<NodeSpec>,
    /// Edge descriptions.
    pub edges: Vec<EdgeSpec>,
}

impl GraphSpec {
    /// An empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node description.
    pub fn node(mut self, spec: NodeSpec) -> Self {
        self.nodes.push(spec);
        self
    }

    /// Append an edge description.
    pub fn edge(mut self, spec: EdgeSpec) -> Self {
        self.edges.push(spec);
        self
    }

    /// Split an interleaved sequence into nodes and edges, keeping the
    /// relative order within each group.
    pub fn from_elements(elements: impl IntoIterator<Item = ElementSpec>) -> Self {
        let mut spec = Self::new();
        for element in elements {
            match element {
                ElementSpec::Node(n) => spec.nodes.push(n),
                ElementSpec::Edge(e) => spec.edges.push(e),
            }
        }
        spec
    }

    /// Total number of descriptions.
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// Whether the batch has no descriptions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse either `{ "nodes": [...], "edges": [...] }` or a flat array of
    /// grouped entries.
    pub fn from_json(value: &Value) -> GraphResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Array(entries) => {
                let elements = entries
                    .iter()
                    .map(ElementSpec::from_json)
                    .collect::<GraphResult<Vec<_>>>()?;
                Ok(Self::from_elements(elements))
            }
            Value::Object(obj) => {
                let mut spec = Self::new();
                for (field, group) in [("nodes", Group::Nodes), ("edges", Group::Edges)] {
                    for entry in group_entries(obj, field)? {
                        let mut entry = entry.clone();
                        if let Value::Object(o) = &mut entry {
                            o.insert("group".into(), Value::from(group.name()));
                        }
                        match ElementSpec::from_json(&entry)? {
                            ElementSpec::Node(n) => spec.nodes.push(n),
                            ElementSpec::Edge(e) => spec.edges.push(e),
                        }
                    }
                }
                Ok(spec)
            }
            other => Err(GraphError::InvalidSpec(format!(
                "elements must be an object or an array, got {other}"
            ))),
        }
    }
}

impl TryFrom<Value> for GraphSpec {
    type Error = GraphError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

fn group_entries<'a>(obj: &'a Map<String, Value>, field: &str) -> GraphResult<&'a [Value]> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(entries)) => Ok(entries),
        Some(other) => Err(GraphError::InvalidSpec(format!(
            "'{field}' must be an array, got {other}"
        ))),
    }
}

/// Remove a structural key from the bag. Strings are taken as-is and numbers
/// are stringified; anything else is treated as absent.
fn take_identifier(data: &mut DataBag, key: &str) -> Option<String> {
    match data.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
