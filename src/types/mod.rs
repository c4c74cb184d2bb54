//! Data types shared across the library.

pub mod element;
pub mod error;
pub mod options;
pub mod spec;

pub use element::{Edge, Element, ElementKey, GraphElement, Group, Node};
pub use error::{GraphError, GraphResult};
pub use options::{GraphConfig, GraphOptions, RemovalPolicy};
pub use spec::{EdgeSpec, ElementSpec, GraphSpec, NodeSpec};

use std::sync::atomic::{AtomicU64, Ordering};

/// Free-form key/value data attached to every element.
pub type DataBag = serde_json::Map<String, serde_json::Value>;

/// Default prefix for generated element identifiers.
pub const DEFAULT_ID_PREFIX: &str = "ele";

/// Data keys backed by structural fields rather than the data bag.
pub const RESERVED_KEYS: [&str; 4] = ["id", "source", "target", "parent"];

/// Identity of one graph instance. Two instances never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}
