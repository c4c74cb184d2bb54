//! Set algebra over collections.
//!
//! Results keep first-occurrence order across the operands. Operands taken
//! at different times from the same graph are evaluated against the newer
//! snapshot; members no longer present there drop out. An operand from a
//! different graph instance contributes nothing.

use std::sync::Arc;

use crate::graph::store::StoreState;
use crate::types::ElementKey;

use super::Collection;

impl Collection {
    /// Members of either collection.
    pub fn union(&self, other: &Collection) -> Collection {
        let (state, other) = self.align(other);
        let other_keys = other.map(|o| o.keys()).unwrap_or_default();
        let keys: Vec<ElementKey> = self.keys().iter().chain(other_keys).copied().collect();
        Collection::new(state, keys)
    }

    /// Members of both collections, in this collection's order.
    pub fn intersection(&self, other: &Collection) -> Collection {
        let (state, other) = self.align(other);
        let keys: Vec<ElementKey> = self
            .keys()
            .iter()
            .copied()
            .filter(|&k| other.is_some_and(|o| o.contains_key(k)))
            .collect();
        Collection::new(state, keys)
    }

    /// Members of this collection that are not in `other`.
    pub fn difference(&self, other: &Collection) -> Collection {
        let (state, other) = self.align(other);
        let keys: Vec<ElementKey> = self
            .keys()
            .iter()
            .copied()
            .filter(|&k| !other.is_some_and(|o| o.contains_key(k)))
            .collect();
        Collection::new(state, keys)
    }

    /// Members of exactly one of the two collections.
    pub fn symmetric_difference(&self, other: &Collection) -> Collection {
        let (state, other) = self.align(other);
        let Some(other) = other else {
            return Collection::new(state, self.keys().to_vec());
        };
        let left = self.keys().iter().filter(|&&k| !other.contains_key(k));
        let right = other.keys().iter().filter(|&&k| !self.contains_key(k));
        let keys: Vec<ElementKey> = left.chain(right).copied().collect();
        Collection::new(state, keys)
    }

    /// Every live element of the snapshot that is not a member.
    pub fn complement(&self) -> Collection {
        let keys: Vec<ElementKey> = self
            .state()
            .live_keys()
            .filter(|&k| !self.contains_key(k))
            .collect();
        self.with_keys(keys)
    }

    /// Pick the snapshot to evaluate against; a foreign operand comes back
    /// as `None`.
    fn align<'a>(&self, other: &'a Collection) -> (Arc<StoreState>, Option<&'a Collection>) {
        if self.owner() != other.owner() {
            log::warn!(
                "Set operation between {} and {} treats the foreign operand as empty",
                self.owner(),
                other.owner()
            );
            return (Arc::clone(self.state()), None);
        }
        let state = if other.state().generation() > self.state().generation() {
            Arc::clone(other.state())
        } else {
            Arc::clone(self.state())
        };
        (state, Some(other))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Graph, GraphBuilder};
    use crate::types::NodeSpec;

    fn abc() -> Graph {
        let mut builder = GraphBuilder::new();
        builder.node("a").node("b").node("c").node("d");
        builder.build()
    }

    #[test]
    fn test_union_keeps_first_occurrence_order() {
        let g = abc();
        let left = g.select("#c, #a").unwrap();
        let right = g.select("#b, #c").unwrap();
        // Selector output is in store order.
        assert_eq!(left.ids(), vec!["a", "c"]);
        assert_eq!(right.union(&left).ids(), vec!["b", "c", "a"]);
        assert_eq!(left.union(&right).ids(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_intersection_difference_symmetric() {
        let g = abc();
        let left = g.select("#a, #b, #c").unwrap();
        let right = g.select("#b, #c, #d").unwrap();
        assert_eq!(left.intersection(&right).ids(), vec!["b", "c"]);
        assert_eq!(left.difference(&right).ids(), vec!["a"]);
        assert_eq!(left.symmetric_difference(&right).ids(), vec!["a", "d"]);
    }

    #[test]
    fn test_complement() {
        let g = abc();
        let some = g.select("#b").unwrap();
        assert_eq!(some.complement().ids(), vec!["a", "c", "d"]);
        assert!(g.elements().complement().is_empty());
    }

    #[test]
    fn test_foreign_operand_is_empty() {
        let one = abc();
        let two = abc();
        let union = one.elements().union(&two.elements());
        assert_eq!(union.len(), 4);
        assert_eq!(union.owner(), one.instance_id());
        assert!(one.elements().intersection(&two.elements()).is_empty());
    }

    #[test]
    fn test_newer_snapshot_wins() {
        let mut g = abc();
        let old = g.elements();
        g.remove("a").unwrap();
        let fresh = g.select("#b").unwrap();
        let union = old.union(&fresh);
        assert_eq!(union.ids(), vec!["b", "c", "d"]);
        // The old snapshot itself is untouched.
        assert_eq!(old.len(), 4);
    }

    #[test]
    fn test_cloned_store_is_a_foreign_instance() {
        let mut builder = GraphBuilder::new();
        builder.node("a");
        let mut g = builder.build();
        let mut other = g.store().clone();
        other.add(NodeSpec::new("from_clone"));
        other.add(NodeSpec::new("x2"));
        g.add(NodeSpec::new("from_graph"));

        assert_ne!(other.owner(), g.instance_id());
        assert!(g.elements().intersection(&other.all()).is_empty());
        assert_eq!(g.elements().union(&other.all()).ids(), vec!["a", "from_graph"]);
        assert_eq!(other.all().ids(), vec!["a", "from_clone", "x2"]);
    }
}
