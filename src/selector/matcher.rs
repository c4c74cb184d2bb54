//! Matching parsed selectors against store elements.

use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{AttrOp, AttrTest, Combinator, CompareOp, Complex, Compound, Literal, Pseudo};
use crate::graph::store::StoreState;
use crate::types::{Element, ElementKey, GraphElement};

impl Complex {
    /// Whether the element at `key` is matched as this selector's subject.
    pub(crate) fn matches(&self, state: &StoreState, key: ElementKey) -> bool {
        let Some(subject) = self.compounds.get(self.subject) else {
            return false;
        };
        subject.matches(state, key)
            && self.matches_left(state, self.subject, key)
            && self.matches_right(state, self.subject, key)
    }

    /// Compounds before `index` hold for some chain of ancestors of `key`.
    fn matches_left(&self, state: &StoreState, index: usize, key: ElementKey) -> bool {
        if index == 0 {
            return true;
        }
        let previous = &self.compounds[index - 1];
        let hierarchy = state.hierarchy();
        let accept = |candidate: ElementKey| {
            previous.matches(state, candidate) && self.matches_left(state, index - 1, candidate)
        };
        match self.combinators[index - 1] {
            Combinator::Child => hierarchy.parent_of(key).is_some_and(accept),
            Combinator::Descendant => hierarchy.ancestors(key).any(accept),
        }
    }

    /// Compounds after `index` hold for some chain of descendants of `key`.
    fn matches_right(&self, state: &StoreState, index: usize, key: ElementKey) -> bool {
        if index + 1 >= self.compounds.len() {
            return true;
        }
        let next = &self.compounds[index + 1];
        let hierarchy = state.hierarchy();
        let accept = |candidate: ElementKey| {
            next.matches(state, candidate) && self.matches_right(state, index + 1, candidate)
        };
        match self.combinators[index] {
            Combinator::Child => hierarchy.children_of(key).iter().copied().any(accept),
            Combinator::Descendant => hierarchy.descendants(key).into_iter().any(accept),
        }
    }
}

impl Compound {
    pub(crate) fn matches(&self, state: &StoreState, key: ElementKey) -> bool {
        let Some(element) = state.element(key) else {
            return false;
        };
        if self.group.is_some_and(|g| g != element.group()) {
            return false;
        }
        if self.ids.iter().any(|id| id != element.id()) {
            return false;
        }
        if !self
            .pseudos
            .iter()
            .all(|&p| pseudo_holds(state, key, element, p))
        {
            return false;
        }
        self.attrs
            .iter()
            .all(|attr| attr.matches(state.data_value(key, &attr.key).as_ref()))
    }
}

fn pseudo_holds(state: &StoreState, key: ElementKey, element: &Element, pseudo: Pseudo) -> bool {
    let hierarchy = state.hierarchy();
    match pseudo {
        Pseudo::Parent => element.is_node() && hierarchy.has_children(key),
        Pseudo::Childless => element.is_node() && !hierarchy.has_children(key),
        Pseudo::Child => element.is_node() && hierarchy.parent_of(key).is_some(),
        Pseudo::Orphan => element.is_node() && hierarchy.parent_of(key).is_none(),
        Pseudo::Loop => element.as_edge().is_some_and(|e| e.is_loop()),
        Pseudo::Simple => element.as_edge().is_some_and(|e| !e.is_loop()),
    }
}

impl AttrTest {
    /// Evaluate against a field value; `None` and `null` both mean absent.
    pub(crate) fn matches(&self, value: Option<&Value>) -> bool {
        let value = value.filter(|v| !v.is_null());
        match &self.op {
            AttrOp::Exists => value.is_some(),
            AttrOp::Truthy => value.is_some_and(truthy),
            AttrOp::Falsy => !value.is_some_and(truthy),
            AttrOp::Compare(op, literal) => match value {
                None => *op == CompareOp::Ne,
                Some(v) => compare(v, *op, literal),
            },
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn equals(value: &Value, literal: &Literal) -> bool {
    match (value, literal) {
        (Value::Number(n), Literal::Num(x)) => n.as_f64() == Some(*x),
        (Value::Bool(b), Literal::Bool(x)) => b == x,
        (Value::String(s), Literal::Str(x)) => s == x,
        _ => text_of(value) == literal.text(),
    }
}

/// Ordering between a value and a literal, when both are numbers or both
/// are strings.
fn ordering(value: &Value, literal: &Literal) -> Option<Ordering> {
    match (value, literal) {
        (Value::Number(n), Literal::Num(x)) => n.as_f64()?.partial_cmp(x),
        (Value::String(s), Literal::Str(x)) => Some(s.as_str().cmp(x.as_str())),
        _ => None,
    }
}

fn compare(value: &Value, op: CompareOp, literal: &Literal) -> bool {
    match op {
        CompareOp::Eq => equals(value, literal),
        CompareOp::Ne => !equals(value, literal),
        CompareOp::Gt => ordering(value, literal) == Some(Ordering::Greater),
        CompareOp::Ge => matches!(
            ordering(value, literal),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::Lt => ordering(value, literal) == Some(Ordering::Less),
        CompareOp::Le => matches!(
            ordering(value, literal),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::StartsWith => text_of(value).starts_with(&literal.text()),
        CompareOp::EndsWith => text_of(value).ends_with(&literal.text()),
        CompareOp::Contains => text_of(value).contains(&literal.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attr(key: &str, op: AttrOp) -> AttrTest {
        AttrTest {
            key: key.to_string(),
            op,
        }
    }

    #[test]
    fn test_absent_values() {
        let eq = attr("k", AttrOp::Compare(CompareOp::Eq, Literal::Num(1.0)));
        let ne = attr("k", AttrOp::Compare(CompareOp::Ne, Literal::Num(1.0)));
        assert!(!eq.matches(None));
        assert!(ne.matches(None));
        assert!(ne.matches(Some(&Value::Null)));
        assert!(!attr("k", AttrOp::Exists).matches(Some(&Value::Null)));
        assert!(attr("k", AttrOp::Falsy).matches(None));
    }

    #[test]
    fn test_numeric_comparison() {
        let gt = attr("w", AttrOp::Compare(CompareOp::Gt, Literal::Num(2.0)));
        assert!(gt.matches(Some(&json!(3))));
        assert!(!gt.matches(Some(&json!(2))));
        assert!(!gt.matches(Some(&json!("3"))));
        let le = attr("w", AttrOp::Compare(CompareOp::Le, Literal::Num(2.5)));
        assert!(le.matches(Some(&json!(2.5))));
    }

    #[test]
    fn test_string_operators() {
        let starts = attr(
            "name",
            AttrOp::Compare(CompareOp::StartsWith, Literal::Str("ab".into())),
        );
        let ends = attr(
            "name",
            AttrOp::Compare(CompareOp::EndsWith, Literal::Str("yz".into())),
        );
        let contains = attr(
            "name",
            AttrOp::Compare(CompareOp::Contains, Literal::Str("mn".into())),
        );
        assert!(starts.matches(Some(&json!("abc"))));
        assert!(ends.matches(Some(&json!("xyz"))));
        assert!(contains.matches(Some(&json!("lmno"))));
        assert!(!contains.matches(Some(&json!("lmo"))));
    }

    #[test]
    fn test_mixed_equality_uses_text() {
        let eq = attr("k", AttrOp::Compare(CompareOp::Eq, Literal::Num(5.0)));
        assert!(eq.matches(Some(&json!("5"))));
        assert!(eq.matches(Some(&json!(5))));
        let flag = attr("k", AttrOp::Compare(CompareOp::Eq, Literal::Bool(true)));
        assert!(flag.matches(Some(&json!(true))));
        assert!(!flag.matches(Some(&json!(false))));
    }

    #[test]
    fn test_truthiness() {
        let t = attr("k", AttrOp::Truthy);
        assert!(t.matches(Some(&json!(1))));
        assert!(t.matches(Some(&json!("x"))));
        assert!(!t.matches(Some(&json!(0))));
        assert!(!t.matches(Some(&json!(""))));
        assert!(!t.matches(Some(&json!(false))));
    }
}
