//! Parsed form of a selector.

use crate::types::Group;

/// One comma-separated alternative: compounds joined by combinators.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    pub(crate) compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    pub(crate) combinators: Vec<Combinator>,
    /// Index of the compound whose matches are returned.
    pub(crate) subject: usize,
}

/// Conditions on a single element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    pub(crate) group: Option<Group>,
    pub(crate) ids: Vec<String>,
    pub(crate) attrs: Vec<AttrTest>,
    pub(crate) pseudos: Vec<Pseudo>,
    pub(crate) subject: bool,
}

/// Hierarchy relation between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A > B`: B's parent matches A.
    Child,
    /// `A B`: some ancestor of B matches A.
    Descendant,
}

/// Test against one data field.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrTest {
    pub(crate) key: String,
    pub(crate) op: AttrOp,
}

/// What an attribute test checks.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrOp {
    /// `[key]`
    Exists,
    /// `[?key]`
    Truthy,
    /// `[!key]`
    Falsy,
    /// `[key op value]`
    Compare(CompareOp, Literal),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    StartsWith,
    EndsWith,
    Contains,
}

/// Literal value on the right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Literal {
    /// Textual form, used for string comparisons.
    pub fn text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Num(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

/// Structural state tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pseudo {
    /// Node with at least one child.
    Parent,
    /// Node without children.
    Childless,
    /// Node with a parent.
    Child,
    /// Node without a parent.
    Orphan,
    /// Edge whose source is its target.
    Loop,
    /// Edge that is not a loop.
    Simple,
}

impl Pseudo {
    /// Parse a pseudo-class name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parent" => Some(Self::Parent),
            "childless" => Some(Self::Childless),
            "child" | "nonorphan" => Some(Self::Child),
            "orphan" => Some(Self::Orphan),
            "loop" => Some(Self::Loop),
            "simple" => Some(Self::Simple),
            _ => None,
        }
    }
}
