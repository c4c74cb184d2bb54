//! Parent/child relation among nodes, kept acyclic.

use std::collections::HashMap;

use crate::types::ElementKey;

/// Outcome of a parent assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentCheck {
    /// The assignment was (or would be) committed.
    Accepted,
    /// The node was asked to be its own parent.
    RejectedSelf,
    /// The node is already an ancestor of the requested parent.
    RejectedCycle,
}

impl ParentCheck {
    /// Whether the assignment is allowed.
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Child -> parent mapping with a reverse index of children.
///
/// Child lists are kept in ascending key order, which is store order.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    parents: HashMap<ElementKey, ElementKey>,
    children: HashMap<ElementKey, Vec<ElementKey>>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `child -> parent` may be added, without committing it.
    ///
    /// Walks the ancestor chain of `parent`; finding `child` there means the
    /// new link would close a cycle.
    pub fn check(&self, child: ElementKey, parent: ElementKey) -> ParentCheck {
        if child == parent {
            return ParentCheck::RejectedSelf;
        }
        if self.ancestors(parent).any(|a| a == child) {
            return ParentCheck::RejectedCycle;
        }
        ParentCheck::Accepted
    }

    /// Assign or clear the parent of `child`. A rejected assignment leaves
    /// the hierarchy untouched.
    pub fn set_parent(&mut self, child: ElementKey, parent: Option<ElementKey>) -> ParentCheck {
        let Some(parent) = parent else {
            self.detach(child);
            return ParentCheck::Accepted;
        };
        let check = self.check(child, parent);
        if check.is_accepted() {
            self.detach(child);
            self.parents.insert(child, parent);
            let siblings = self.children.entry(parent).or_default();
            let pos = siblings.binary_search(&child).unwrap_or_else(|p| p);
            siblings.insert(pos, child);
        }
        check
    }

    /// The parent of `child`, if any.
    pub fn parent_of(&self, child: ElementKey) -> Option<ElementKey> {
        self.parents.get(&child).copied()
    }

    /// Direct children of `parent`, in store order.
    pub fn children_of(&self, parent: ElementKey) -> &[ElementKey] {
        self.children
            .get(&parent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `node` has at least one child.
    pub fn has_children(&self, node: ElementKey) -> bool {
        !self.children_of(node).is_empty()
    }

    /// Lazy walk up the parent chain, nearest first.
    pub fn ancestors(&self, child: ElementKey) -> Ancestors<'_> {
        Ancestors {
            hierarchy: self,
            current: child,
        }
    }

    /// Every node below `node`, depth-first in store order.
    pub fn descendants(&self, node: ElementKey) -> Vec<ElementKey> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementKey> = self.children_of(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev().copied());
        }
        out
    }

    /// Make `child` parentless.
    pub fn detach(&mut self, child: ElementKey) {
        if let Some(old) = self.parents.remove(&child) {
            if let Some(list) = self.children.get_mut(&old) {
                if let Ok(pos) = list.binary_search(&child) {
                    list.remove(pos);
                }
                if list.is_empty() {
                    self.children.remove(&old);
                }
            }
        }
    }

    /// Drop `node` from the hierarchy and return its former children, which
    /// are left parentless.
    pub(crate) fn forget(&mut self, node: ElementKey) -> Vec<ElementKey> {
        self.detach(node);
        let orphans = self.children.remove(&node).unwrap_or_default();
        for child in &orphans {
            self.parents.remove(child);
        }
        orphans
    }

    /// Number of parent links.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    /// Whether no node has a parent.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

/// Iterator over the ancestors of a node. Finite because the mapping is
/// acyclic; borrowing the hierarchy rules out mutation mid-walk.
pub struct Ancestors<'a> {
    hierarchy: &'a Hierarchy,
    current: ElementKey,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementKey;

    fn next(&mut self) -> Option<Self::Item> {
        let parent = self.hierarchy.parent_of(self.current)?;
        self.current = parent;
        Some(parent)
    }
}
