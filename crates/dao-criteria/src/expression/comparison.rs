//! Single-property leaf predicates: comparisons, IN lists, NULL tests, bit masks.

use std::cmp::Ordering;

use crate::core::Value;

use super::eval::{like_match, Record};
use super::Invertible;

/// Operator of a property/value comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equal,
    Greater,
    GreaterOrEqual,
    Lesser,
    LesserOrEqual,
    /// SQL `LIKE` with `%` and `_` wildcards.
    Like,
    /// `LIKE` after case folding both sides.
    LikeIgnoreCase,
}

impl CompareOp {
    /// SQL operator token (the case-folding wrapper is the renderer's job).
    pub fn sql_operator(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::Greater => ">",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::Lesser => "<",
            CompareOp::LesserOrEqual => "<=",
            CompareOp::Like | CompareOp::LikeIgnoreCase => "LIKE",
        }
    }

    fn test(self, actual: Option<&Value>, expected: &Value) -> bool {
        match self {
            CompareOp::Equal if expected.is_null() => actual.map_or(true, Value::is_null),
            CompareOp::Like | CompareOp::LikeIgnoreCase => {
                match (actual.and_then(Value::as_text), expected.as_text()) {
                    (Some(text), Some(pattern)) => {
                        like_match(text, pattern, self == CompareOp::LikeIgnoreCase)
                    }
                    _ => false,
                }
            }
            _ => {
                let Some(ordering) = actual.and_then(|a| a.compare(expected)) else {
                    return false;
                };
                match self {
                    CompareOp::Equal => ordering == Ordering::Equal,
                    CompareOp::Greater => ordering == Ordering::Greater,
                    CompareOp::GreaterOrEqual => ordering != Ordering::Less,
                    CompareOp::Lesser => ordering == Ordering::Less,
                    CompareOp::LesserOrEqual => ordering != Ordering::Greater,
                    CompareOp::Like | CompareOp::LikeIgnoreCase => false,
                }
            }
        }
    }
}

/// Compares one property of the returned object against a literal.
///
/// Not-equal is `Equal` with `true_or_not == false`; there is no separate operator.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValueExpression {
    property: String,
    value: Value,
    op: CompareOp,
    true_or_not: bool,
}

impl PropertyValueExpression {
    pub fn new(
        op: CompareOp,
        property: impl Into<String>,
        value: impl Into<Value>,
        true_or_not: bool,
    ) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            op,
            true_or_not,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Evaluate against an in-memory record.
    pub fn matches(&self, record: &dyn Record) -> bool {
        self.op.test(record.value(&self.property), &self.value) == self.true_or_not
    }
}

impl Invertible for PropertyValueExpression {
    fn true_or_not(&self) -> bool {
        self.true_or_not
    }

    fn invert(&self) -> Self {
        Self {
            true_or_not: !self.true_or_not,
            ..self.clone()
        }
    }
}

/// Property is one of a list of values (`IN (...)`).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInListExpression {
    property: String,
    values: Vec<Value>,
    true_or_not: bool,
}

impl PropertyInListExpression {
    pub fn new<I, V>(property: impl Into<String>, values: I, true_or_not: bool) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
            true_or_not,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        let hit = record.value(&self.property).is_some_and(|actual| {
            self.values
                .iter()
                .any(|v| actual.compare(v) == Some(Ordering::Equal))
        });
        hit == self.true_or_not
    }
}

impl Invertible for PropertyInListExpression {
    fn true_or_not(&self) -> bool {
        self.true_or_not
    }

    fn invert(&self) -> Self {
        Self {
            true_or_not: !self.true_or_not,
            ..self.clone()
        }
    }
}

/// Property is NULL (or, inverted, is not NULL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNullExpression {
    property: String,
    true_or_not: bool,
}

impl PropertyNullExpression {
    pub fn new(property: impl Into<String>, true_or_not: bool) -> Self {
        Self {
            property: property.into(),
            true_or_not,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        record.value(&self.property).map_or(true, Value::is_null) == self.true_or_not
    }
}

impl Invertible for PropertyNullExpression {
    fn true_or_not(&self) -> bool {
        self.true_or_not
    }

    fn invert(&self) -> Self {
        Self {
            true_or_not: !self.true_or_not,
            ..self.clone()
        }
    }
}

/// Every bit of `mask` is set in the integer property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitwiseAndExpression {
    property: String,
    mask: i64,
    true_or_not: bool,
}

impl BitwiseAndExpression {
    pub fn new(property: impl Into<String>, mask: i64, true_or_not: bool) -> Self {
        Self {
            property: property.into(),
            mask,
            true_or_not,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn mask(&self) -> i64 {
        self.mask
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        let set = record
            .value(&self.property)
            .and_then(Value::as_i64)
            .is_some_and(|v| v & self.mask == self.mask);
        set == self.true_or_not
    }
}

impl Invertible for BitwiseAndExpression {
    fn true_or_not(&self) -> bool {
        self.true_or_not
    }

    fn invert(&self) -> Self {
        Self {
            true_or_not: !self.true_or_not,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn row(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_ordering_ops() {
        let r = row(&[("age", Value::Int(30))]);
        let check = |op, v: i64| PropertyValueExpression::new(op, "age", v, true).matches(&r);
        assert!(check(CompareOp::Equal, 30));
        assert!(check(CompareOp::Greater, 29));
        assert!(!check(CompareOp::Greater, 30));
        assert!(check(CompareOp::GreaterOrEqual, 30));
        assert!(check(CompareOp::Lesser, 31));
        assert!(check(CompareOp::LesserOrEqual, 30));
        assert!(!check(CompareOp::LesserOrEqual, 29));
    }

    #[test]
    fn test_not_equal_is_inverted_equal() {
        let r = row(&[("status", Value::from("open"))]);
        let eq = PropertyValueExpression::new(CompareOp::Equal, "status", "open", true);
        let ne = eq.invert();
        assert_eq!(ne.op(), CompareOp::Equal);
        assert!(!ne.true_or_not());
        assert!(eq.matches(&r));
        assert!(!ne.matches(&r));
        assert_eq!(ne.invert(), eq);
    }

    #[test]
    fn test_equal_null_matches_missing_and_null() {
        let eq_null = PropertyValueExpression::new(CompareOp::Equal, "x", Value::Null, true);
        assert!(eq_null.matches(&row(&[])));
        assert!(eq_null.matches(&row(&[("x", Value::Null)])));
        assert!(!eq_null.matches(&row(&[("x", Value::Int(1))])));
    }

    #[test]
    fn test_missing_property_never_satisfies_comparison() {
        let gt = PropertyValueExpression::new(CompareOp::Greater, "age", 1, true);
        assert!(!gt.matches(&row(&[])));
        assert!(gt.invert().matches(&row(&[])));
    }

    #[test]
    fn test_like() {
        let r = row(&[("name", Value::from("Alice Smith"))]);
        assert!(PropertyValueExpression::new(CompareOp::Like, "name", "Ali%", true).matches(&r));
        assert!(!PropertyValueExpression::new(CompareOp::Like, "name", "ali%", true).matches(&r));
        assert!(
            PropertyValueExpression::new(CompareOp::LikeIgnoreCase, "name", "ali%", true)
                .matches(&r)
        );
    }

    #[test]
    fn test_in_list_null_and_bitwise() {
        let r = row(&[("id", Value::Int(4)), ("flags", Value::Int(0b1011))]);
        assert!(PropertyInListExpression::new("id", [1i64, 4, 9], true).matches(&r));
        assert!(!PropertyInListExpression::new("id", [1i64, 9], true).matches(&r));
        assert!(PropertyNullExpression::new("missing", true).matches(&r));
        assert!(!PropertyNullExpression::new("id", true).matches(&r));
        assert!(BitwiseAndExpression::new("flags", 0b0011, true).matches(&r));
        assert!(!BitwiseAndExpression::new("flags", 0b0100, true).matches(&r));
        assert!(BitwiseAndExpression::new("flags", 0b0100, false).matches(&r));
    }

    #[test]
    fn test_sql_operator() {
        assert_eq!(CompareOp::GreaterOrEqual.sql_operator(), ">=");
        assert_eq!(CompareOp::LikeIgnoreCase.sql_operator(), "LIKE");
    }
}
