//! A graph instance: the element store plus query and lifecycle entry points.

use serde_json::Value;

use crate::collection::Collection;
use crate::format;
use crate::selector::Selector;
use crate::types::{
    Element, ElementSpec, GraphConfig, GraphOptions, GraphResult, GraphSpec, InstanceId,
};

use super::builder::{Admission, BuildReport};
use super::hierarchy::ParentCheck;
use super::store::ElementStore;

/// One graph instance. All operations complete synchronously; collections
/// returned from queries are snapshots and stay valid after mutation or
/// after the instance is destroyed.
#[derive(Debug)]
pub struct Graph {
    store: ElementStore,
    initial_report: BuildReport,
}

impl Graph {
    /// Create an empty graph.
    pub fn new(options: GraphOptions) -> Self {
        let store = ElementStore::new(options);
        log::debug!("Created {}", store.owner());
        Self {
            store,
            initial_report: BuildReport::default(),
        }
    }

    /// Create a graph and apply the config's elements.
    pub fn from_config(config: GraphConfig) -> Self {
        let mut graph = Self::new(config.options);
        graph.initial_report = graph.store.load(config.elements);
        graph
    }

    /// Build a graph, then fire `ready` exactly once with the live instance.
    /// An empty config still fires.
    pub fn init<F>(config: GraphConfig, ready: F) -> Self
    where
        F: FnOnce(&Graph),
    {
        let graph = Self::from_config(config);
        graph.fire_ready(ready);
        graph
    }

    pub(crate) fn fire_ready<F>(&self, ready: F)
    where
        F: FnOnce(&Graph),
    {
        log::debug!("{} ready with {} elements", self.instance_id(), self.size());
        ready(self);
    }

    /// Identity of this instance.
    pub fn instance_id(&self) -> InstanceId {
        self.store.owner()
    }

    /// Whether both handles refer to the same instance.
    pub fn same_instance(&self, other: &Graph) -> bool {
        self.instance_id() == other.instance_id()
    }

    /// Report of the initial build.
    pub fn build_report(&self) -> &BuildReport {
        &self.initial_report
    }

    /// The instance options.
    pub fn options(&self) -> &GraphOptions {
        self.store.options()
    }

    /// The underlying store.
    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Mutable access to the underlying store.
    pub fn store_mut(&mut self) -> &mut ElementStore {
        &mut self.store
    }

    /// Number of live elements.
    pub fn size(&self) -> usize {
        self.store.size()
    }

    /// Whether the graph holds no elements.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// All elements, in insertion order.
    pub fn elements(&self) -> Collection {
        self.store.all()
    }

    /// All nodes.
    pub fn nodes(&self) -> Collection {
        self.elements().nodes()
    }

    /// All edges.
    pub fn edges(&self) -> Collection {
        self.elements().edges()
    }

    /// A collection holding the element with this identifier, or nothing.
    pub fn get_element_by_id(&self, id: &str) -> Collection {
        let all = self.elements();
        let key = self.store.key_of(id);
        all.with_keys(key)
    }

    /// Borrow the element with this identifier.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.store.get(id)
    }

    /// Evaluate a selector against the whole graph.
    pub fn select(&self, selector: &str) -> GraphResult<Collection> {
        let selector = Selector::parse(selector)?;
        Ok(selector.filter(&self.elements()))
    }

    /// Insert one element.
    pub fn add(&mut self, spec: impl Into<ElementSpec>) -> Admission {
        self.store.add(spec)
    }

    /// Apply a declarative batch.
    pub fn add_batch(&mut self, spec: GraphSpec) -> BuildReport {
        self.store.load(spec)
    }

    /// Remove an element with cascade; returns what was removed.
    pub fn remove(&mut self, id: &str) -> GraphResult<Collection> {
        self.store.remove(id)
    }

    /// Remove every element of a collection taken from this graph.
    pub fn remove_collection(&mut self, elements: &Collection) -> Collection {
        if elements.owner() != self.instance_id() {
            log::warn!(
                "Ignoring removal of {} elements owned by {}",
                elements.len(),
                elements.owner()
            );
            return Collection::new(std::sync::Arc::clone(self.store.state()), []);
        }
        let keys: Vec<_> = elements.keys().to_vec();
        self.store.remove_keys(keys)
    }

    /// Set or clear a node's parent.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> GraphResult<ParentCheck> {
        self.store.set_parent(child, parent)
    }

    /// Set a data field on an element.
    pub fn set_data(&mut self, id: &str, key: &str, value: Value) -> GraphResult<Option<Value>> {
        self.store.set_data(id, key, value)
    }

    /// Remove a data field from an element.
    pub fn remove_data(&mut self, id: &str, key: &str) -> GraphResult<Option<Value>> {
        self.store.remove_data(id, key)
    }

    /// Export all elements as `{ "nodes": [...], "edges": [...] }`.
    pub fn to_json(&self) -> Value {
        format::to_json(&self.elements())
    }

    /// Tear the instance down. Collections taken from it remain readable.
    pub fn destroy(self) {
        log::debug!("Destroyed {} ({} elements)", self.instance_id(), self.size());
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}
