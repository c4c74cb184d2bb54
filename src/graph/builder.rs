//! Batch construction with validation and repair, plus a fluent builder.
//!
//! A batch is applied in three passes: nodes, then parent links, then edges.
//! Parents and edges may therefore name any node of the same batch regardless
//! of declaration order. Bad individual elements are discarded; the batch as
//! a whole never fails.

use std::collections::HashSet;

use crate::types::{
    EdgeSpec, ElementKey, ElementSpec, GraphConfig, GraphElement, GraphOptions, GraphSpec, Group,
    NodeSpec,
};

use super::hierarchy::ParentCheck;
use super::store::{ElementStore, StoreState};
use super::Graph;

/// Why an element or a parent link was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    /// The identifier is already used by another element.
    DuplicateId { group: Group, id: String },
    /// The edge description lacks a source or target.
    MissingEndpoint { id: Option<String> },
    /// The edge names an endpoint that is not a known node.
    UnknownEndpoint { id: Option<String>, endpoint: String },
    /// The requested parent is not a known node; the node stays parentless.
    UnknownParent { node: String, parent: String },
    /// The node named itself as parent; it stays parentless.
    SelfParent { node: String },
    /// The parent link would close a cycle; the node stays parentless.
    ParentCycle { node: String, parent: String },
}

impl Discard {
    /// Whether the element itself was dropped, as opposed to only its parent
    /// link.
    pub fn drops_element(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. } | Self::MissingEndpoint { .. } | Self::UnknownEndpoint { .. }
        )
    }
}

impl std::fmt::Display for Discard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let edge_name = |id: &Option<String>| id.clone().unwrap_or_else(|| "<unnamed>".into());
        match self {
            Self::DuplicateId { group, id } => write!(f, "duplicate id '{id}' in {group}"),
            Self::MissingEndpoint { id } => {
                write!(f, "edge {} has no source or target", edge_name(id))
            }
            Self::UnknownEndpoint { id, endpoint } => {
                write!(f, "edge {} references unknown node '{endpoint}'", edge_name(id))
            }
            Self::UnknownParent { node, parent } => {
                write!(f, "node '{node}' references unknown parent '{parent}'")
            }
            Self::SelfParent { node } => write!(f, "node '{node}' is its own parent"),
            Self::ParentCycle { node, parent } => {
                write!(f, "parent '{parent}' of node '{node}' would close a cycle")
            }
        }
    }
}

/// Outcome of a single-element insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The element was inserted at this slot.
    Added(ElementKey),
    /// The element was dropped.
    Discarded(Discard),
}

impl Admission {
    /// Whether the element entered the store.
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// Slot of the inserted element.
    pub fn key(&self) -> Option<ElementKey> {
        match self {
            Self::Added(key) => Some(*key),
            Self::Discarded(_) => None,
        }
    }
}

/// Summary of one batch application.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Slots of inserted elements, nodes first, each group in input order.
    pub added: Vec<ElementKey>,
    /// Number of nodes inserted.
    pub nodes_added: usize,
    /// Number of edges inserted.
    pub edges_added: usize,
    /// Number of parent links committed.
    pub parents_assigned: usize,
    /// Number of element descriptions dropped.
    pub discarded: usize,
    /// Number of parent links dropped.
    pub parents_dropped: usize,
    /// Every drop, in processing order. Only filled when diagnostics are on.
    pub discards: Vec<Discard>,
}

impl BuildReport {
    /// Whether nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.discarded == 0 && self.parents_dropped == 0
    }
}

/// Apply one batch to the store.
pub(crate) fn load_batch(store: &mut ElementStore, spec: GraphSpec, collect: bool) -> BuildReport {
    if spec.is_empty() {
        return BuildReport::default();
    }
    let prefix = store.options().id_prefix.clone();
    let reserved: HashSet<String> = spec
        .nodes
        .iter()
        .filter_map(|n| n.id.clone())
        .chain(spec.edges.iter().filter_map(|e| e.id.clone()))
        .collect();

    let mut loader = Loader {
        state: store.state_mut(),
        prefix: &prefix,
        reserved,
        collect,
        report: BuildReport::default(),
    };

    let mut pending: Vec<(ElementKey, String)> = Vec::new();
    for node in spec.nodes {
        match loader.admit_node(node) {
            Ok((key, parent)) => {
                if let Some(parent) = parent {
                    pending.push((key, parent));
                }
            }
            Err(discard) => loader.record(discard),
        }
    }

    for (key, parent) in pending {
        if let Err(discard) = loader.resolve_parent(key, parent) {
            loader.record(discard);
        }
    }

    for edge in spec.edges {
        if let Err(discard) = loader.admit_edge(edge) {
            loader.record(discard);
        }
    }

    let report = loader.report;
    log::debug!(
        "Batch applied: {} nodes, {} edges, {} parents; dropped {} elements, {} parents",
        report.nodes_added,
        report.edges_added,
        report.parents_assigned,
        report.discarded,
        report.parents_dropped
    );
    report
}

/// Insert a single element; a node's parent must already be in the store.
pub(crate) fn admit_one(store: &mut ElementStore, spec: ElementSpec) -> Admission {
    let prefix = store.options().id_prefix.clone();
    let mut loader = Loader {
        state: store.state_mut(),
        prefix: &prefix,
        reserved: HashSet::new(),
        collect: true,
        report: BuildReport::default(),
    };
    let outcome = match spec {
        ElementSpec::Node(node) => loader.admit_node(node).map(|(key, parent)| {
            if let Some(parent) = parent {
                if let Err(discard) = loader.resolve_parent(key, parent) {
                    loader.record(discard);
                }
            }
            key
        }),
        ElementSpec::Edge(edge) => loader.admit_edge(edge),
    };
    match outcome {
        Ok(key) => Admission::Added(key),
        Err(discard) => {
            log::debug!("Discarded: {discard}");
            Admission::Discarded(discard)
        }
    }
}

struct Loader<'a> {
    state: &'a mut StoreState,
    prefix: &'a str,
    /// Explicit identifiers of the batch; generated ids avoid them.
    reserved: HashSet<String>,
    collect: bool,
    report: BuildReport,
}

impl Loader<'_> {
    fn admit_node(&mut self, spec: NodeSpec) -> Result<(ElementKey, Option<String>), Discard> {
        let id = match spec.id {
            Some(id) if self.state.key_of(&id).is_some() => {
                return Err(Discard::DuplicateId {
                    group: Group::Nodes,
                    id,
                })
            }
            Some(id) => id,
            None => self.state.generate_id(self.prefix, &self.reserved),
        };
        let key = self.state.insert_node(id, spec.data);
        self.report.added.push(key);
        self.report.nodes_added += 1;
        Ok((key, spec.parent))
    }

    fn resolve_parent(&mut self, key: ElementKey, parent: String) -> Result<(), Discard> {
        let node = self
            .state
            .element(key)
            .map(|e| e.id().to_string())
            .unwrap_or_default();
        let Some(parent_key) = self.state.node_key(&parent) else {
            return Err(Discard::UnknownParent { node, parent });
        };
        match self
            .state
            .hierarchy_mut()
            .set_parent(key, Some(parent_key))
        {
            ParentCheck::Accepted => {
                self.report.parents_assigned += 1;
                Ok(())
            }
            ParentCheck::RejectedSelf => Err(Discard::SelfParent { node }),
            ParentCheck::RejectedCycle => Err(Discard::ParentCycle { node, parent }),
        }
    }

    fn admit_edge(&mut self, spec: EdgeSpec) -> Result<ElementKey, Discard> {
        if let Some(id) = &spec.id {
            if self.state.key_of(id).is_some() {
                return Err(Discard::DuplicateId {
                    group: Group::Edges,
                    id: id.clone(),
                });
            }
        }
        let (Some(source), Some(target)) = (&spec.source, &spec.target) else {
            return Err(Discard::MissingEndpoint {
                id: spec.id.clone(),
            });
        };
        let resolve = |endpoint: &String| {
            self.state
                .node_key(endpoint)
                .ok_or_else(|| Discard::UnknownEndpoint {
                    id: spec.id.clone(),
                    endpoint: endpoint.clone(),
                })
        };
        let source_key = resolve(source)?;
        let target_key = resolve(target)?;

        let id = match spec.id {
            Some(id) => id,
            None => self.state.generate_id(self.prefix, &self.reserved),
        };
        let key = self.state.insert_edge(id, source_key, target_key, spec.data);
        self.report.added.push(key);
        self.report.edges_added += 1;
        Ok(key)
    }

    fn record(&mut self, discard: Discard) {
        log::debug!("Discarded: {discard}");
        if discard.drops_element() {
            self.report.discarded += 1;
        } else {
            self.report.parents_dropped += 1;
        }
        if self.collect {
            self.report.discards.push(discard);
        }
    }
}

/// Fluent builder for constructing a [`Graph`].
pub struct GraphBuilder {
    options: GraphOptions,
    spec: GraphSpec,
}

impl GraphBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::with_options(GraphOptions::default())
    }

    /// Create a new builder with specific options.
    pub fn with_options(options: GraphOptions) -> Self {
        Self {
            options,
            spec: GraphSpec::new(),
        }
    }

    /// Add a parentless node.
    pub fn node(&mut self, id: &str) -> &mut Self {
        self.spec.nodes.push(NodeSpec::new(id));
        self
    }

    /// Add a node nested under `parent`.
    pub fn child(&mut self, id: &str, parent: &str) -> &mut Self {
        self.spec.nodes.push(NodeSpec::new(id).parent(parent));
        self
    }

    /// Add an edge with a generated identifier.
    pub fn edge(&mut self, source: &str, target: &str) -> &mut Self {
        self.spec.edges.push(EdgeSpec::new(source, target));
        self
    }

    /// Add any element description.
    pub fn element(&mut self, spec: impl Into<ElementSpec>) -> &mut Self {
        match spec.into() {
            ElementSpec::Node(n) => self.spec.nodes.push(n),
            ElementSpec::Edge(e) => self.spec.edges.push(e),
        }
        self
    }

    /// Build the final graph.
    pub fn build(self) -> Graph {
        Graph::from_config(GraphConfig {
            elements: self.spec,
            options: self.options,
        })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
