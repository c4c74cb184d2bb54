//! Selector language for filtering collections.
//!
//! Supports group names (`node`, `edge`, `*`), `#id`, attribute tests,
//! pseudo-classes, child (`>`) and descendant combinators, `$` subject
//! marks, and comma-separated alternatives.

pub mod ast;
mod matcher;
mod parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::collection::Collection;

pub use ast::{AttrOp, AttrTest, Combinator, CompareOp, Complex, Compound, Literal, Pseudo};

/// A selector that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct SelectorError {
    /// Byte offset into the selector text.
    pub position: usize,
    pub message: String,
}

impl SelectorError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    text: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse selector text. Empty or malformed text is an error.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        let alternatives = parser::parse_selector(text)?;
        Ok(Self {
            text: text.trim().to_string(),
            alternatives,
        })
    }

    /// The source text, trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The comma-separated alternatives.
    pub fn alternatives(&self) -> &[Complex] {
        &self.alternatives
    }

    /// Members of `elements` matching any alternative, in store order.
    ///
    /// Combinators are checked against the whole snapshot, so `#a > node`
    /// filters a collection holding only children of `a` correctly even when
    /// `a` itself is not a member.
    pub fn filter(&self, elements: &Collection) -> Collection {
        let state = elements.state();
        let mut keys: Vec<_> = elements
            .keys()
            .iter()
            .copied()
            .filter(|&k| self.alternatives.iter().any(|c| c.matches(state, k)))
            .collect();
        keys.sort_unstable();
        elements.with_keys(keys)
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
