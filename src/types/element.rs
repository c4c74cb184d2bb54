//! Node and edge records and the element abstraction over them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DataBag;

/// Stable arena slot of an element within one store.
///
/// Slots are never reused, so ascending key order is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementKey(pub(crate) usize);

impl ElementKey {
    /// The raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Which of the two element variants a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// Node records.
    Nodes,
    /// Edge records.
    Edges,
}

impl Group {
    /// Return the plural group name used in element descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nodes => "nodes",
            Self::Edges => "edges",
        }
    }

    /// Parse a group from its singular or plural name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "node" | "nodes" => Some(Self::Nodes),
            "edge" | "edges" => Some(Self::Edges),
            _ => None,
        }
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Capabilities shared by every element variant.
pub trait GraphElement {
    /// Unique identifier within the store.
    fn id(&self) -> &str;

    /// The free-form data bag.
    fn data(&self) -> &DataBag;

    /// The element's group.
    fn group(&self) -> Group;
}

/// A node record. Its parent lives in the store's hierarchy, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) data: DataBag,
}

impl Node {
    pub(crate) fn new(id: String, data: DataBag) -> Self {
        Self { id, data }
    }
}

impl GraphElement for Node {
    fn id(&self) -> &str {
        &self.id
    }

    fn data(&self) -> &DataBag {
        &self.data
    }

    fn group(&self) -> Group {
        Group::Nodes
    }
}

/// A directed edge between two nodes of the same store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub(crate) id: String,
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) data: DataBag,
    #[serde(skip)]
    pub(crate) source_key: ElementKey,
    #[serde(skip)]
    pub(crate) target_key: ElementKey,
}

impl Edge {
    /// Identifier of the source node.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Identifier of the target node.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the edge starts and ends at the same node.
    pub fn is_loop(&self) -> bool {
        self.source_key == self.target_key
    }

    pub(crate) fn endpoints(&self) -> (ElementKey, ElementKey) {
        (self.source_key, self.target_key)
    }
}

impl GraphElement for Edge {
    fn id(&self) -> &str {
        &self.id
    }

    fn data(&self) -> &DataBag {
        &self.data
    }

    fn group(&self) -> Group {
        Group::Edges
    }
}

/// A record held in the store: either a node or an edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Element {
    /// A node.
    Node(Node),
    /// An edge.
    Edge(Edge),
}

impl Element {
    /// Whether this element is a node.
    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// Whether this element is an edge.
    pub fn is_edge(&self) -> bool {
        matches!(self, Self::Edge(_))
    }

    /// The node record, if this is a node.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    /// The edge record, if this is an edge.
    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }

    /// Read a data field. `id`, `source` and `target` come from the typed
    /// fields; `parent` is resolved by the store, not here.
    pub fn data_value(&self, key: &str) -> Option<Value> {
        match (key, self) {
            ("id", _) => Some(Value::String(self.id().to_string())),
            ("source", Self::Edge(e)) => Some(Value::String(e.source.clone())),
            ("target", Self::Edge(e)) => Some(Value::String(e.target.clone())),
            _ => self.data().get(key).cloned(),
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut DataBag {
        match self {
            Self::Node(n) => &mut n.data,
            Self::Edge(e) => &mut e.data,
        }
    }
}

impl GraphElement for Element {
    fn id(&self) -> &str {
        match self {
            Self::Node(n) => n.id(),
            Self::Edge(e) => e.id(),
        }
    }

    fn data(&self) -> &DataBag {
        match self {
            Self::Node(n) => n.data(),
            Self::Edge(e) => e.data(),
        }
    }

    fn group(&self) -> Group {
        match self {
            Self::Node(_) => Group::Nodes,
            Self::Edge(_) => Group::Edges,
        }
    }
}
