//! Predicates relating a left and a right data source.

use std::cmp::Ordering;
use std::fmt;

use crate::core::Value;

use super::eval::Record;
use super::{Flippable, Invertible};

/// Comparison operator of a join predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinOp {
    Equal,
    Lesser,
    Greater,
    LesserOrEqual,
    GreaterOrEqual,
}

impl JoinOp {
    /// Operator that keeps the relation true once the operands trade places.
    ///
    /// `a < b` holds exactly when `b > a` does, so ordering operators mirror
    /// while equality stays put.
    pub fn flipped(self) -> Self {
        match self {
            JoinOp::Equal => JoinOp::Equal,
            JoinOp::Lesser => JoinOp::Greater,
            JoinOp::Greater => JoinOp::Lesser,
            JoinOp::LesserOrEqual => JoinOp::GreaterOrEqual,
            JoinOp::GreaterOrEqual => JoinOp::LesserOrEqual,
        }
    }

    pub fn sql_operator(self) -> &'static str {
        match self {
            JoinOp::Equal => "=",
            JoinOp::Lesser => "<",
            JoinOp::Greater => ">",
            JoinOp::LesserOrEqual => "<=",
            JoinOp::GreaterOrEqual => ">=",
        }
    }

    /// Whether `left <op> right` holds. NULL or incomparable operands never hold.
    pub fn holds(self, left: Option<&Value>, right: Option<&Value>) -> bool {
        let Some(ordering) = left.zip(right).and_then(|(l, r)| l.compare(r)) else {
            return false;
        };
        match self {
            JoinOp::Equal => ordering == Ordering::Equal,
            JoinOp::Lesser => ordering == Ordering::Less,
            JoinOp::Greater => ordering == Ordering::Greater,
            JoinOp::LesserOrEqual => ordering != Ordering::Greater,
            JoinOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for JoinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_operator())
    }
}

/// One operand side of a two-source join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinSide {
    Left,
    Right,
}

impl JoinSide {
    pub fn other(self) -> Self {
        match self {
            JoinSide::Left => JoinSide::Right,
            JoinSide::Right => JoinSide::Left,
        }
    }
}

/// A join predicate between the left and right sources of a join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinExpression {
    /// A property of one side compared with a literal.
    PropertyValue {
        side: JoinSide,
        property: String,
        value: Value,
        op: JoinOp,
        true_or_not: bool,
    },
    /// A property of the left side compared with a property of the right side.
    Property {
        left_property: String,
        right_property: String,
        op: JoinOp,
        true_or_not: bool,
    },
}

impl JoinExpression {
    /// `left.left_property <op> right.right_property`.
    pub fn properties(
        op: JoinOp,
        left_property: impl Into<String>,
        right_property: impl Into<String>,
    ) -> Self {
        JoinExpression::Property {
            left_property: left_property.into(),
            right_property: right_property.into(),
            op,
            true_or_not: true,
        }
    }

    /// `side.property <op> value`.
    pub fn property_value(
        side: JoinSide,
        op: JoinOp,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        JoinExpression::PropertyValue {
            side,
            property: property.into(),
            value: value.into(),
            op,
            true_or_not: true,
        }
    }

    pub fn equal(left_property: impl Into<String>, right_property: impl Into<String>) -> Self {
        Self::properties(JoinOp::Equal, left_property, right_property)
    }

    pub fn lesser(left_property: impl Into<String>, right_property: impl Into<String>) -> Self {
        Self::properties(JoinOp::Lesser, left_property, right_property)
    }

    pub fn greater(left_property: impl Into<String>, right_property: impl Into<String>) -> Self {
        Self::properties(JoinOp::Greater, left_property, right_property)
    }

    pub fn lesser_or_equal(
        left_property: impl Into<String>,
        right_property: impl Into<String>,
    ) -> Self {
        Self::properties(JoinOp::LesserOrEqual, left_property, right_property)
    }

    pub fn greater_or_equal(
        left_property: impl Into<String>,
        right_property: impl Into<String>,
    ) -> Self {
        Self::properties(JoinOp::GreaterOrEqual, left_property, right_property)
    }

    pub fn op(&self) -> JoinOp {
        match self {
            JoinExpression::PropertyValue { op, .. } | JoinExpression::Property { op, .. } => *op,
        }
    }

    /// Evaluate against one record from each side.
    pub fn matches(&self, left: &dyn Record, right: &dyn Record) -> bool {
        let (base, true_or_not) = match self {
            JoinExpression::PropertyValue {
                side,
                property,
                value,
                op,
                true_or_not,
            } => {
                let record = match side {
                    JoinSide::Left => left,
                    JoinSide::Right => right,
                };
                let actual = record.value(property);
                let base = if *op == JoinOp::Equal && value.is_null() {
                    actual.map_or(true, Value::is_null)
                } else {
                    op.holds(actual, Some(value))
                };
                (base, *true_or_not)
            }
            JoinExpression::Property {
                left_property,
                right_property,
                op,
                true_or_not,
            } => (
                op.holds(left.value(left_property), right.value(right_property)),
                *true_or_not,
            ),
        };
        base == true_or_not
    }
}

impl Invertible for JoinExpression {
    fn true_or_not(&self) -> bool {
        match self {
            JoinExpression::PropertyValue { true_or_not, .. }
            | JoinExpression::Property { true_or_not, .. } => *true_or_not,
        }
    }

    fn invert(&self) -> Self {
        let mut inverted = self.clone();
        match &mut inverted {
            JoinExpression::PropertyValue { true_or_not, .. }
            | JoinExpression::Property { true_or_not, .. } => *true_or_not = !*true_or_not,
        }
        inverted
    }
}

impl Flippable for JoinExpression {
    fn flip(&self) -> Self {
        match self {
            // The literal never moves, so only the property changes sides.
            JoinExpression::PropertyValue {
                side,
                property,
                value,
                op,
                true_or_not,
            } => JoinExpression::PropertyValue {
                side: side.other(),
                property: property.clone(),
                value: value.clone(),
                op: *op,
                true_or_not: *true_or_not,
            },
            JoinExpression::Property {
                left_property,
                right_property,
                op,
                true_or_not,
            } => JoinExpression::Property {
                left_property: right_property.clone(),
                right_property: left_property.clone(),
                op: op.flipped(),
                true_or_not: *true_or_not,
            },
        }
    }
}
