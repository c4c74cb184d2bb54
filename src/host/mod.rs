//! Host-side binding of graph instances to containers.
//!
//! The core never looks up "the instance for a container" itself; hosts own
//! a [`ContainerRegistry`] and hand the resolved [`Graph`](crate::Graph) to
//! whatever needs it.

pub mod registry;

pub use registry::ContainerRegistry;
