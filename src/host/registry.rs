//! Mapping from container handles to their current graph instance.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::graph::Graph;
use crate::types::GraphConfig;

/// Holds at most one graph per container. Binding a new graph to an occupied
/// container destroys the previous one.
#[derive(Debug)]
pub struct ContainerRegistry<C> {
    graphs: HashMap<C, Graph>,
}

impl<C> Default for ContainerRegistry<C> {
    fn default() -> Self {
        Self {
            graphs: HashMap::new(),
        }
    }
}

impl<C> ContainerRegistry<C>
where
    C: Eq + Hash + Clone + Debug,
{
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `config`, bind it to `container` (destroying any
    /// previous instance there), then fire `ready` once with the new graph.
    pub fn mount<F>(&mut self, container: C, config: GraphConfig, ready: F) -> &mut Graph
    where
        F: FnOnce(&Graph),
    {
        let graph = Graph::from_config(config);
        let id = graph.instance_id();
        let bound = match self.graphs.entry(container) {
            Entry::Occupied(mut slot) => {
                let previous = std::mem::replace(slot.get_mut(), graph);
                log::info!(
                    "Container {:?}: {} replaced by {}",
                    slot.key(),
                    previous.instance_id(),
                    id
                );
                previous.destroy();
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                log::debug!("Container {:?}: bound {}", slot.key(), id);
                slot.insert(graph)
            }
        };
        bound.fire_ready(ready);
        bound
    }

    /// Bind an existing graph, returning the instance it displaced. The
    /// caller decides what to do with the old one.
    pub fn replace(&mut self, container: C, graph: Graph) -> Option<Graph> {
        let id = graph.instance_id();
        let previous = self.graphs.insert(container.clone(), graph);
        match &previous {
            Some(old) => log::info!(
                "Container {:?}: {} replaced by {}",
                container,
                old.instance_id(),
                id
            ),
            None => log::debug!("Container {:?}: bound {}", container, id),
        }
        previous
    }

    /// The graph bound to `container`.
    pub fn get(&self, container: &C) -> Option<&Graph> {
        self.graphs.get(container)
    }

    /// The graph bound to `container`, mutably.
    pub fn get_mut(&mut self, container: &C) -> Option<&mut Graph> {
        self.graphs.get_mut(container)
    }

    /// Unbind and return the graph bound to `container`.
    pub fn unmount(&mut self, container: &C) -> Option<Graph> {
        let graph = self.graphs.remove(container);
        if let Some(g) = &graph {
            log::debug!("Container {:?}: unbound {}", container, g.instance_id());
        }
        graph
    }

    /// Whether `container` has a graph.
    pub fn contains(&self, container: &C) -> bool {
        self.graphs.contains_key(container)
    }

    /// Number of bound containers.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether no container is bound.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GraphSpec, NodeSpec};

    fn config(ids: &[&str]) -> GraphConfig {
        let spec = ids
            .iter()
            .fold(GraphSpec::new(), |s, id| s.node(NodeSpec::new(*id)));
        GraphConfig::new(spec)
    }

    #[test]
    fn test_mount_fires_ready_once() {
        let mut registry = ContainerRegistry::new();
        let mut seen = Vec::new();
        registry.mount("main", config(&["a", "b"]), |g| seen.push(g.size()));
        assert_eq!(seen, vec![2]);
        assert_eq!(registry.get(&"main").map(Graph::size), Some(2));
    }

    #[test]
    fn test_remount_replaces_instance() {
        let mut registry = ContainerRegistry::new();
        let first = registry.mount("main", config(&["a"]), |_| {}).instance_id();
        let snapshot = registry.get(&"main").map(Graph::elements);

        let second = registry.mount("main", config(&["x", "y"]), |_| {}).instance_id();
        assert_ne!(first, second);
        assert_eq!(registry.get(&"main").map(Graph::instance_id), Some(second));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&"main").map(Graph::size), Some(2));

        // Collections from the destroyed instance stay readable.
        let snapshot = snapshot.unwrap();
        assert_eq!(snapshot.ids(), vec!["a"]);
        assert_eq!(snapshot.owner(), first);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut registry = ContainerRegistry::new();
        assert!(registry.replace(1u32, Graph::default()).is_none());
        let old = registry.replace(1u32, Graph::default());
        assert!(old.is_some());
        assert!(registry.unmount(&1).is_some());
        assert!(registry.is_empty());
        assert!(!registry.contains(&1));
    }

    #[test]
    fn test_remount_fires_ready_with_new_graph() {
        let mut registry = ContainerRegistry::new();
        registry.mount("main", config(&["a"]), |_| {});
        let mut seen = Vec::new();
        let bound = registry
            .mount("main", config(&["x", "y", "z"]), |g| {
                seen.push((g.instance_id(), g.size()))
            })
            .instance_id();
        assert_eq!(seen, vec![(bound, 3)]);
        assert_eq!(registry.get(&"main").map(Graph::instance_id), Some(bound));
    }
}
