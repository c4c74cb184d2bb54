//! In-memory graph: element store, hierarchy and batch construction.

pub mod builder;
pub mod compound_graph;
pub mod hierarchy;
pub mod store;

pub use builder::{Admission, BuildReport, Discard, GraphBuilder};
pub use compound_graph::Graph;
pub use hierarchy::{Ancestors, Hierarchy, ParentCheck};
pub use store::ElementStore;
