//! Collections: immutable, ordered, duplicate-free sets of elements.
//!
//! A collection pins the store snapshot it was produced from, so later
//! mutations of the graph never change it.

pub mod algebra;
pub mod traversal;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::graph::store::StoreState;
use crate::selector::Selector;
use crate::types::{Element, ElementKey, GraphElement, GraphResult, InstanceId};

/// An immutable, ordered, duplicate-free set of elements.
#[derive(Clone)]
pub struct Collection {
    state: Arc<StoreState>,
    keys: Vec<ElementKey>,
    members: HashSet<ElementKey>,
}

impl Collection {
    /// Build a collection over `state`, keeping the first occurrence of each
    /// key and skipping keys that are not live in that snapshot.
    pub(crate) fn new(state: Arc<StoreState>, keys: impl IntoIterator<Item = ElementKey>) -> Self {
        let mut members = HashSet::new();
        let keys = keys
            .into_iter()
            .filter(|&k| state.is_live(k) && members.insert(k))
            .collect();
        Self {
            state,
            keys,
            members,
        }
    }

    /// A new collection over the same snapshot.
    pub(crate) fn with_keys(&self, keys: impl IntoIterator<Item = ElementKey>) -> Self {
        Self::new(Arc::clone(&self.state), keys)
    }

    pub(crate) fn state(&self) -> &Arc<StoreState> {
        &self.state
    }

    /// Slots of the members, in collection order.
    pub fn keys(&self) -> &[ElementKey] {
        &self.keys
    }

    /// Identity of the graph instance this collection was taken from.
    pub fn owner(&self) -> InstanceId {
        self.state.owner()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Alias of [`len`](Collection::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Whether the collection has no elements.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.keys.iter().filter_map(|&k| self.state.element(k))
    }

    /// Member with this identifier.
    pub fn get(&self, id: &str) -> Option<&Element> {
        let key = self.state.key_of(id)?;
        if self.members.contains(&key) {
            self.state.element(key)
        } else {
            None
        }
    }

    /// Whether a member has this identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn contains_key(&self, key: ElementKey) -> bool {
        self.members.contains(&key)
    }

    /// Member at a position.
    pub fn at(&self, index: usize) -> Option<&Element> {
        self.keys.get(index).and_then(|&k| self.state.element(k))
    }

    /// First member.
    pub fn first(&self) -> Option<&Element> {
        self.at(0)
    }

    /// Last member.
    pub fn last(&self) -> Option<&Element> {
        self.keys.last().and_then(|&k| self.state.element(k))
    }

    /// Identifiers of the members, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|e| e.id()).collect()
    }

    /// A data field of the first member. `parent` resolves to the parent's
    /// identifier.
    pub fn data(&self, key: &str) -> Option<Value> {
        let first = *self.keys.first()?;
        self.state.data_value(first, key)
    }

    /// The node members.
    pub fn nodes(&self) -> Collection {
        self.filter(Element::is_node)
    }

    /// The edge members.
    pub fn edges(&self) -> Collection {
        self.filter(Element::is_edge)
    }

    /// Members for which the predicate holds.
    pub fn filter<P>(&self, predicate: P) -> Collection
    where
        P: Fn(&Element) -> bool,
    {
        self.filter_keys(|_, e| predicate(e))
    }

    /// Members matching a selector.
    pub fn filter_selector(&self, selector: &str) -> GraphResult<Collection> {
        Ok(Selector::parse(selector)?.filter(self))
    }

    /// Members not matching a selector.
    pub fn not(&self, selector: &str) -> GraphResult<Collection> {
        let matched = self.filter_selector(selector)?;
        Ok(self.filter_keys(|k, _| !matched.contains_key(k)))
    }

    /// Whether any member matches a selector.
    pub fn is(&self, selector: &str) -> GraphResult<bool> {
        Ok(!self.filter_selector(selector)?.is_empty())
    }

    /// Whether the predicate holds for any member.
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Element) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Whether the predicate holds for every member.
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Element) -> bool,
    {
        self.iter().all(predicate)
    }

    /// Map each member to a value.
    pub fn map<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&Element) -> T,
    {
        self.iter().map(f).collect()
    }

    /// A reordered copy.
    pub fn sort_by<F>(&self, mut compare: F) -> Collection
    where
        F: FnMut(&Element, &Element) -> std::cmp::Ordering,
    {
        let mut keys = self.keys.clone();
        keys.sort_by(|&a, &b| match (self.state.element(a), self.state.element(b)) {
            (Some(x), Some(y)) => compare(x, y),
            _ => std::cmp::Ordering::Equal,
        });
        self.with_keys(keys)
    }

    pub(crate) fn filter_keys<P>(&self, predicate: P) -> Collection
    where
        P: Fn(ElementKey, &Element) -> bool,
    {
        let keys: Vec<ElementKey> = self
            .keys
            .iter()
            .copied()
            .filter(|&k| self.state.element(k).is_some_and(|e| predicate(k, e)))
            .collect();
        self.with_keys(keys)
    }
}

impl PartialEq for Collection {
    /// Same instance, same members, same order.
    fn eq(&self, other: &Self) -> bool {
        self.owner() == other.owner() && self.keys == other.keys
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("owner", &self.owner())
            .field("ids", &self.ids())
            .finish()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Element;
    type IntoIter = Box<dyn Iterator<Item = &'a Element> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
