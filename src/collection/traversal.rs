//! Structural traversal over hierarchy and edge connectivity.
//!
//! Every method returns a new collection over the same snapshot. Results are
//! in discovery order with duplicates dropped; elements without the relation
//! asked for contribute nothing.

use std::collections::{HashSet, VecDeque};

use crate::types::{Element, ElementKey};

use super::Collection;

impl Collection {
    /// Parents of the member nodes.
    pub fn parent(&self) -> Collection {
        self.expand_nodes(|c, key, out| out.extend(c.state().hierarchy().parent_of(key)))
    }

    /// All ancestors of the member nodes, nearest first for each node.
    pub fn ancestors(&self) -> Collection {
        self.expand_nodes(|c, key, out| out.extend(c.state().hierarchy().ancestors(key)))
    }

    /// Alias of [`ancestors`](Collection::ancestors).
    pub fn parents(&self) -> Collection {
        self.ancestors()
    }

    /// Direct children of the member nodes.
    pub fn children(&self) -> Collection {
        self.expand_nodes(|c, key, out| {
            out.extend_from_slice(c.state().hierarchy().children_of(key))
        })
    }

    /// All nodes nested below the member nodes.
    pub fn descendants(&self) -> Collection {
        self.expand_nodes(|c, key, out| out.extend(c.state().hierarchy().descendants(key)))
    }

    /// Nodes sharing a parent with a member node, excluding the members.
    /// Parentless nodes are siblings of each other.
    pub fn siblings(&self) -> Collection {
        let all = self.with_keys(self.state().live_keys());
        let orphans = all.orphans();
        let found = self.expand_nodes(|c, key, out| {
            match c.state().hierarchy().parent_of(key) {
                Some(parent) => out.extend_from_slice(c.state().hierarchy().children_of(parent)),
                None => out.extend_from_slice(orphans.keys()),
            }
        });
        found.filter_keys(|k, _| !self.contains_key(k))
    }

    /// Member nodes without a parent.
    pub fn orphans(&self) -> Collection {
        let hierarchy = self.state().hierarchy();
        self.filter_keys(|k, e| e.is_node() && hierarchy.parent_of(k).is_none())
    }

    /// Member nodes with a parent.
    pub fn nonorphans(&self) -> Collection {
        let hierarchy = self.state().hierarchy();
        self.filter_keys(|k, e| e.is_node() && hierarchy.parent_of(k).is_some())
    }

    /// Source nodes of the member edges.
    pub fn source(&self) -> Collection {
        self.expand_edges(|(source, _), out| out.push(source))
    }

    /// Target nodes of the member edges.
    pub fn target(&self) -> Collection {
        self.expand_edges(|(_, target), out| out.push(target))
    }

    /// Endpoints of the member edges.
    pub fn connected_nodes(&self) -> Collection {
        self.expand_edges(|(source, target), out| out.extend([source, target]))
    }

    /// Edges touching the member nodes.
    pub fn connected_edges(&self) -> Collection {
        self.expand_nodes(|c, key, out| out.extend_from_slice(c.state().incident_edges(key)))
    }

    /// Edges between the member nodes and the nodes of `other`, either way.
    pub fn edges_with(&self, other: &Collection) -> Collection {
        self.connected_edges().filter(|e| {
            e.as_edge().is_some_and(|edge| {
                let (s, t) = edge.endpoints();
                (self.contains_key(s) && other.contains_key(t))
                    || (self.contains_key(t) && other.contains_key(s))
            })
        })
    }

    /// Edges from the member nodes to the nodes of `other`.
    pub fn edges_to(&self, other: &Collection) -> Collection {
        self.connected_edges().filter(|e| {
            e.as_edge().is_some_and(|edge| {
                let (s, t) = edge.endpoints();
                self.contains_key(s) && other.contains_key(t)
            })
        })
    }

    /// Adjacent nodes and the edges reaching them, excluding the members.
    pub fn neighborhood(&self) -> Collection {
        let found = self.expand_nodes(|c, key, out| {
            for &edge in c.state().incident_edges(key) {
                out.push(edge);
                if let Some((s, t)) = c.endpoints(edge) {
                    out.push(if s == key { t } else { s });
                }
            }
        });
        found.filter_keys(|k, _| !self.contains_key(k))
    }

    /// The neighborhood together with the members themselves.
    pub fn closed_neighborhood(&self) -> Collection {
        let neighborhood = self.neighborhood();
        let keys: Vec<ElementKey> = self
            .keys()
            .iter()
            .chain(neighborhood.keys())
            .copied()
            .collect();
        self.with_keys(keys)
    }

    /// Outgoing edges of the member nodes and their targets.
    pub fn outgoers(&self) -> Collection {
        self.directed_step(true)
    }

    /// Incoming edges of the member nodes and their sources.
    pub fn incomers(&self) -> Collection {
        self.directed_step(false)
    }

    /// Everything reachable by repeatedly following outgoing edges.
    pub fn successors(&self) -> Collection {
        self.directed_closure(true)
    }

    /// Everything reachable by repeatedly following incoming edges.
    pub fn predecessors(&self) -> Collection {
        self.directed_closure(false)
    }

    /// Sum of the member nodes' degrees; a loop counts twice.
    pub fn degree(&self) -> usize {
        self.keys()
            .iter()
            .filter(|&&k| self.state().element(k).is_some_and(Element::is_node))
            .map(|&k| {
                self.state()
                    .incident_edges(k)
                    .iter()
                    .map(|&e| match self.endpoints(e) {
                        Some((s, t)) if s == t => 2,
                        _ => 1,
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    fn endpoints(&self, edge: ElementKey) -> Option<(ElementKey, ElementKey)> {
        self.state()
            .element(edge)
            .and_then(Element::as_edge)
            .map(|e| e.endpoints())
    }

    fn expand_nodes<F>(&self, step: F) -> Collection
    where
        F: Fn(&Collection, ElementKey, &mut Vec<ElementKey>),
    {
        let mut out = Vec::new();
        for &key in self.keys() {
            if self.state().element(key).is_some_and(Element::is_node) {
                step(self, key, &mut out);
            }
        }
        self.with_keys(out)
    }

    fn expand_edges<F>(&self, step: F) -> Collection
    where
        F: Fn((ElementKey, ElementKey), &mut Vec<ElementKey>),
    {
        let mut out = Vec::new();
        for &key in self.keys() {
            if let Some(ends) = self.endpoints(key) {
                step(ends, &mut out);
            }
        }
        self.with_keys(out)
    }

    fn directed_step(&self, outgoing: bool) -> Collection {
        self.expand_nodes(|c, key, out| {
            for &edge in c.state().incident_edges(key) {
                if let Some((s, t)) = c.endpoints(edge) {
                    let (from, to) = if outgoing { (s, t) } else { (t, s) };
                    if from == key {
                        out.extend([edge, to]);
                    }
                }
            }
        })
    }

    /// Breadth-first closure of [`directed_step`].
    ///
    /// [`directed_step`]: Collection::directed_step
    fn directed_closure(&self, outgoing: bool) -> Collection {
        let mut seen: HashSet<ElementKey> = HashSet::new();
        let mut order: Vec<ElementKey> = Vec::new();
        let mut queue: VecDeque<ElementKey> = self.nodes().keys().iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            let step = self.with_keys([current]).directed_step(outgoing);
            for &key in step.keys() {
                if seen.insert(key) {
                    order.push(key);
                    if step.state().element(key).is_some_and(Element::is_node) {
                        queue.push_back(key);
                    }
                }
            }
        }
        self.with_keys(order)
    }
}
