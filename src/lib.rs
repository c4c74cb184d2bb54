//! CompoundGraph: an in-memory compound graph model.
//!
//! Nodes may nest inside other nodes; edges connect any two nodes. Graphs are
//! built from declarative element descriptions that are validated and
//! repaired on the way in, queried through immutable snapshot collections,
//! and filtered with a small selector language.

pub mod cli;
pub mod collection;
pub mod format;
pub mod graph;
pub mod host;
pub mod selector;
pub mod types;

// Re-export commonly used types at the crate root
pub use collection::Collection;
pub use format::{to_json, GraphReader, GraphWriter};
pub use graph::{
    Admission, BuildReport, Discard, ElementStore, Graph, GraphBuilder, Hierarchy, ParentCheck,
};
pub use host::ContainerRegistry;
pub use selector::{Selector, SelectorError};
pub use types::{
    DataBag, Edge, EdgeSpec, Element, ElementKey, ElementSpec, GraphConfig, GraphElement,
    GraphError, GraphOptions, GraphResult, GraphSpec, Group, InstanceId, Node, NodeSpec,
    RemovalPolicy, DEFAULT_ID_PREFIX,
};
