//! Error types for the compound graph library.

use thiserror::Error;

use crate::selector::SelectorError;

/// Errors surfaced to callers that misuse the API.
///
/// Structural rejections during construction (duplicate identifiers, dangling
/// edge endpoints, self or cyclic parents) are not errors; they are discarded
/// and reported through [`BuildReport`](crate::graph::BuildReport).
#[derive(Error, Debug)]
pub enum GraphError {
    /// No element with this identifier exists in the store.
    #[error("Element '{0}' not found")]
    ElementNotFound(String),

    /// The identifier refers to an edge where a node is required.
    #[error("Element '{0}' is not a node")]
    NotANode(String),

    /// Attempt to write a key that is backed by a structural field.
    #[error("Data key '{0}' is reserved")]
    ReservedKey(String),

    /// Malformed selector text.
    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// The element description does not have a recognised shape.
    #[error("Invalid element description: {0}")]
    InvalidSpec(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
