//! Graph options and the initialization config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{GraphResult, GraphSpec, DEFAULT_ID_PREFIX};

/// What happens to the children of a node when the node is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalPolicy {
    /// Children become parentless.
    #[default]
    Detach,
    /// Children move up to the removed node's parent.
    Reparent,
    /// Descendants are removed along with the node.
    Cascade,
}

/// Behavioural options of a graph instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphOptions {
    /// Hierarchy policy applied by node removal.
    pub removal_policy: RemovalPolicy,
    /// Record every discarded element in the build report.
    pub collect_diagnostics: bool,
    /// Prefix for generated element identifiers.
    pub id_prefix: String,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            collect_diagnostics: false,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

/// Everything needed to initialize a graph instance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Initial elements.
    pub elements: GraphSpec,
    /// Instance options.
    pub options: GraphOptions,
}

impl GraphConfig {
    /// A config with the given elements and default options.
    pub fn new(elements: GraphSpec) -> Self {
        Self {
            elements,
            options: GraphOptions::default(),
        }
    }

    /// Replace the options.
    pub fn with_options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a JSON document. A document with neither `elements` nor
    /// `options` at the top level is read as a bare element description.
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let is_config = value
            .as_object()
            .map(|o| o.contains_key("elements") || o.contains_key("options"))
            .unwrap_or(false);
        if is_config {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(Self::new(GraphSpec::from_json(&value)?))
        }
    }

    /// Read and parse a JSON document from disk.
    pub fn from_file(path: &Path) -> GraphResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
