//! Element store holding the canonical set of node and edge records.
//!
//! The state sits behind an `Arc` and is copied on write: collections keep
//! the snapshot they were produced from, and a mutation made while such a
//! snapshot is alive detaches the store onto a fresh copy.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::collection::Collection;
use crate::types::{
    DataBag, Edge, Element, ElementKey, ElementSpec, GraphElement, GraphError, GraphOptions,
    GraphResult, GraphSpec, InstanceId, Node, RemovalPolicy, RESERVED_KEYS,
};

use super::builder::{self, Admission, BuildReport};
use super::hierarchy::{Hierarchy, ParentCheck};

/// Arena of element records plus the indexes over them.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    owner: InstanceId,
    generation: u64,
    /// Slot per element ever inserted; `None` once removed.
    slots: Vec<Option<Element>>,
    /// Identifier -> slot, live elements only.
    index: HashMap<String, ElementKey>,
    /// Node -> connected edges, ascending.
    incident: HashMap<ElementKey, Vec<ElementKey>>,
    hierarchy: Hierarchy,
    live: usize,
    next_generated: u64,
}

impl StoreState {
    fn new(owner: InstanceId) -> Self {
        Self {
            owner,
            generation: 0,
            slots: Vec::new(),
            index: HashMap::new(),
            incident: HashMap::new(),
            hierarchy: Hierarchy::new(),
            live: 0,
            next_generated: 0,
        }
    }

    pub(crate) fn owner(&self) -> InstanceId {
        self.owner
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn element(&self, key: ElementKey) -> Option<&Element> {
        self.slots.get(key.0).and_then(|s| s.as_ref())
    }

    pub(crate) fn is_live(&self, key: ElementKey) -> bool {
        self.element(key).is_some()
    }

    pub(crate) fn key_of(&self, id: &str) -> Option<ElementKey> {
        self.index.get(id).copied()
    }

    /// Slot of a live node with this identifier.
    pub(crate) fn node_key(&self, id: &str) -> Option<ElementKey> {
        self.key_of(id)
            .filter(|&k| self.element(k).is_some_and(Element::is_node))
    }

    pub(crate) fn live_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| ElementKey(i))
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub(crate) fn incident_edges(&self, node: ElementKey) -> &[ElementKey] {
        self.incident
            .get(&node)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Read a data field of an element, resolving `parent` through the
    /// hierarchy.
    pub(crate) fn data_value(&self, key: ElementKey, name: &str) -> Option<Value> {
        let element = self.element(key)?;
        if name == "parent" && element.is_node() {
            let parent = self.hierarchy.parent_of(key)?;
            return self
                .element(parent)
                .map(|p| Value::String(p.id().to_string()));
        }
        element.data_value(name)
    }

    pub(crate) fn generate_id(&mut self, prefix: &str, reserved: &HashSet<String>) -> String {
        loop {
            let candidate = format!("{prefix}{}", self.next_generated);
            self.next_generated += 1;
            if !self.index.contains_key(&candidate) && !reserved.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub(crate) fn insert_node(&mut self, id: String, data: DataBag) -> ElementKey {
        let key = ElementKey(self.slots.len());
        self.index.insert(id.clone(), key);
        self.slots.push(Some(Element::Node(Node::new(id, data))));
        self.live += 1;
        key
    }

    pub(crate) fn insert_edge(
        &mut self,
        id: String,
        source_key: ElementKey,
        target_key: ElementKey,
        data: DataBag,
    ) -> ElementKey {
        let key = ElementKey(self.slots.len());
        let endpoint_id = |k: ElementKey| {
            self.element(k)
                .map(|e| e.id().to_string())
                .unwrap_or_default()
        };
        let edge = Edge {
            source: endpoint_id(source_key),
            target: endpoint_id(target_key),
            id: id.clone(),
            data,
            source_key,
            target_key,
        };
        self.index.insert(id, key);
        self.slots.push(Some(Element::Edge(edge)));
        self.incident.entry(source_key).or_default().push(key);
        if target_key != source_key {
            self.incident.entry(target_key).or_default().push(key);
        }
        self.live += 1;
        key
    }

    pub(crate) fn hierarchy_mut(&mut self) -> &mut Hierarchy {
        &mut self.hierarchy
    }

    fn take(&mut self, key: ElementKey) -> Option<Element> {
        let element = self.slots.get_mut(key.0)?.take()?;
        self.index.remove(element.id());
        self.live -= 1;
        Some(element)
    }

    fn remove_edge(&mut self, key: ElementKey) {
        if let Some(Element::Edge(edge)) = self.take(key) {
            let (source, target) = edge.endpoints();
            for endpoint in [source, target] {
                if let Some(list) = self.incident.get_mut(&endpoint) {
                    list.retain(|&e| e != key);
                    if list.is_empty() {
                        self.incident.remove(&endpoint);
                    }
                }
            }
        }
    }

    fn remove_node(&mut self, key: ElementKey) {
        if self.take(key).is_some() {
            self.incident.remove(&key);
        }
    }
}

/// The element store owned by one graph instance.
///
/// Cloning yields an independent store under a fresh [`InstanceId`], so
/// collections taken from the copy never mix with the original's.
#[derive(Debug)]
pub struct ElementStore {
    state: Arc<StoreState>,
    options: GraphOptions,
}

impl Clone for ElementStore {
    fn clone(&self) -> Self {
        let mut state = StoreState::clone(&self.state);
        state.owner = InstanceId::next();
        log::debug!("Cloned store {} as {}", self.owner(), state.owner);
        Self {
            state: Arc::new(state),
            options: self.options.clone(),
        }
    }
}

impl ElementStore {
    /// Create an empty store with its own identity.
    pub fn new(options: GraphOptions) -> Self {
        Self::with_owner(InstanceId::next(), options)
    }

    pub(crate) fn with_owner(owner: InstanceId, options: GraphOptions) -> Self {
        Self {
            state: Arc::new(StoreState::new(owner)),
            options,
        }
    }

    /// Identity of the instance owning this store.
    pub fn owner(&self) -> InstanceId {
        self.state.owner()
    }

    /// The options this store applies.
    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub(crate) fn state(&self) -> &Arc<StoreState> {
        &self.state
    }

    /// Mutable access to the state, detaching from outstanding snapshots.
    pub(crate) fn state_mut(&mut self) -> &mut StoreState {
        let state = Arc::make_mut(&mut self.state);
        state.generation += 1;
        state
    }

    /// Insert one element. Duplicate identifiers and unresolvable endpoints
    /// are discarded, never raised.
    pub fn add(&mut self, spec: impl Into<ElementSpec>) -> Admission {
        builder::admit_one(self, spec.into())
    }

    /// Apply a declarative batch with the builder's validation rules.
    pub fn load(&mut self, spec: GraphSpec) -> BuildReport {
        let collect = self.options.collect_diagnostics;
        builder::load_batch(self, spec, collect)
    }

    /// Look up a live element by identifier.
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.state.key_of(id).and_then(|k| self.state.element(k))
    }

    /// Look up a live element by slot.
    pub fn element(&self, key: ElementKey) -> Option<&Element> {
        self.state.element(key)
    }

    /// Slot of a live element.
    pub fn key_of(&self, id: &str) -> Option<ElementKey> {
        self.state.key_of(id)
    }

    /// Whether an element with this identifier is live.
    pub fn contains(&self, id: &str) -> bool {
        self.state.key_of(id).is_some()
    }

    /// Number of live elements.
    pub fn size(&self) -> usize {
        self.state.len()
    }

    /// Whether the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.iter().filter(|e| e.is_node()).count()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.size() - self.node_count()
    }

    /// Live elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.state.live_keys().filter_map(|k| self.state.element(k))
    }

    /// All live elements as a collection.
    pub fn all(&self) -> Collection {
        Collection::new(Arc::clone(&self.state), self.state.live_keys())
    }

    /// Identifier of the parent of a node.
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        let key = self.state.node_key(id)?;
        let parent = self.state.hierarchy().parent_of(key)?;
        self.state.element(parent).map(|p| p.id())
    }

    /// Set or clear a node's parent. Both identifiers must name live nodes;
    /// self and cyclic assignments come back as rejections and change nothing.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> GraphResult<ParentCheck> {
        let child_key = self.require_node(child)?;
        let parent_key = parent.map(|p| self.require_node(p)).transpose()?;

        if let Some(p) = parent_key {
            let check = self.state.hierarchy().check(child_key, p);
            if !check.is_accepted() {
                log::debug!("Parent {:?} rejected for '{}': {:?}", parent, child, check);
                return Ok(check);
            }
        }
        Ok(self.state_mut().hierarchy_mut().set_parent(child_key, parent_key))
    }

    /// Set a data field, returning the previous value.
    pub fn set_data(&mut self, id: &str, key: &str, value: Value) -> GraphResult<Option<Value>> {
        let slot = self.require(id)?;
        if RESERVED_KEYS.contains(&key) {
            return Err(GraphError::ReservedKey(key.to_string()));
        }
        Ok(self
            .element_mut(slot)
            .and_then(|e| e.data_mut().insert(key.to_string(), value)))
    }

    /// Remove a data field, returning the previous value.
    pub fn remove_data(&mut self, id: &str, key: &str) -> GraphResult<Option<Value>> {
        let slot = self.require(id)?;
        if RESERVED_KEYS.contains(&key) {
            return Err(GraphError::ReservedKey(key.to_string()));
        }
        Ok(self.element_mut(slot).and_then(|e| e.data_mut().remove(key)))
    }

    /// Remove an element and everything the removal cascades to. The returned
    /// collection holds the removed elements as they were.
    pub fn remove(&mut self, id: &str) -> GraphResult<Collection> {
        let key = self.require(id)?;
        Ok(self.remove_keys([key]))
    }

    /// Remove a set of elements with the same cascade rules as [`remove`].
    ///
    /// [`remove`]: ElementStore::remove
    pub fn remove_keys(&mut self, keys: impl IntoIterator<Item = ElementKey>) -> Collection {
        let before = Arc::clone(&self.state);
        let policy = self.options.removal_policy;

        let mut doomed: BTreeSet<ElementKey> = BTreeSet::new();
        for key in keys {
            let Some(element) = before.element(key) else {
                continue;
            };
            doomed.insert(key);
            if element.is_node() && policy == RemovalPolicy::Cascade {
                doomed.extend(before.hierarchy().descendants(key));
            }
        }
        let doomed_nodes: Vec<ElementKey> = doomed
            .iter()
            .copied()
            .filter(|&k| before.element(k).is_some_and(Element::is_node))
            .collect();
        for &node in &doomed_nodes {
            doomed.extend(before.incident_edges(node).iter().copied());
        }

        if doomed.is_empty() {
            return Collection::new(before, []);
        }

        // New parent for each surviving child of a removed node.
        let mut adoptions: Vec<(ElementKey, Option<ElementKey>)> = Vec::new();
        for &node in &doomed_nodes {
            for &child in before.hierarchy().children_of(node) {
                if doomed.contains(&child) {
                    continue;
                }
                let new_parent = match policy {
                    RemovalPolicy::Reparent => before
                        .hierarchy()
                        .ancestors(child)
                        .find(|a| !doomed.contains(a)),
                    RemovalPolicy::Detach | RemovalPolicy::Cascade => None,
                };
                adoptions.push((child, new_parent));
            }
        }

        let state = self.state_mut();
        for &key in &doomed {
            if doomed_nodes.binary_search(&key).is_err() {
                state.remove_edge(key);
            }
        }
        for &node in &doomed_nodes {
            state.hierarchy_mut().forget(node);
            state.remove_node(node);
        }
        for (child, parent) in adoptions {
            state.hierarchy_mut().set_parent(child, parent);
        }

        log::debug!(
            "Removed {} elements ({} nodes) with policy {:?}",
            doomed.len(),
            doomed_nodes.len(),
            policy
        );
        Collection::new(before, doomed)
    }

    fn element_mut(&mut self, key: ElementKey) -> Option<&mut Element> {
        self.state_mut().slots.get_mut(key.0).and_then(|s| s.as_mut())
    }

    fn require(&self, id: &str) -> GraphResult<ElementKey> {
        self.state
            .key_of(id)
            .ok_or_else(|| GraphError::ElementNotFound(id.to_string()))
    }

    fn require_node(&self, id: &str) -> GraphResult<ElementKey> {
        let key = self.require(id)?;
        match self.state.element(key) {
            Some(Element::Node(_)) => Ok(key),
            _ => Err(GraphError::NotANode(id.to_string())),
        }
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}
