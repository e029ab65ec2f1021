//! Joins against an externally identified "other" source.
//!
//! A multi-join relates the primary source of a join to any registered
//! mapping. Several multi-joins may target the same mapping; the SQL layer
//! tells them apart by [`MultiJoinExpression::other_alias`].

use crate::core::MappingId;

use super::eval::Record;
use super::join::JoinOp;
use super::{Flippable, Invertible};

/// Compares a property of the primary source with a property of another source.
///
/// When `other_is_left` is true, `left_property` belongs to the other source
/// and `right_property` to the primary one; otherwise the reverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiJoinExpression {
    left_property: String,
    right_property: String,
    op: JoinOp,
    other_mapping: MappingId,
    other_is_left: bool,
    true_or_not: bool,
    other_alias: Option<String>,
}

impl MultiJoinExpression {
    /// New multi-join with the defaults: other source on the left, matching, no alias.
    pub fn new(
        op: JoinOp,
        left_property: impl Into<String>,
        right_property: impl Into<String>,
        other_mapping: MappingId,
    ) -> Self {
        Self {
            left_property: left_property.into(),
            right_property: right_property.into(),
            op,
            other_mapping,
            other_is_left: true,
            true_or_not: true,
            other_alias: None,
        }
    }

    #[must_use]
    pub fn with_other_is_left(mut self, other_is_left: bool) -> Self {
        self.other_is_left = other_is_left;
        self
    }

    #[must_use]
    pub fn with_true_or_not(mut self, true_or_not: bool) -> Self {
        self.true_or_not = true_or_not;
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.other_alias = Some(alias.into());
        self
    }

    pub fn left_property(&self) -> &str {
        &self.left_property
    }

    pub fn right_property(&self) -> &str {
        &self.right_property
    }

    pub fn op(&self) -> JoinOp {
        self.op
    }

    pub fn other_mapping(&self) -> MappingId {
        self.other_mapping
    }

    pub fn other_is_left(&self) -> bool {
        self.other_is_left
    }

    pub fn other_alias(&self) -> Option<&str> {
        self.other_alias.as_deref()
    }

    /// Property read from the other source.
    pub fn other_property(&self) -> &str {
        if self.other_is_left {
            &self.left_property
        } else {
            &self.right_property
        }
    }

    /// Property read from the primary source.
    pub fn primary_property(&self) -> &str {
        if self.other_is_left {
            &self.right_property
        } else {
            &self.left_property
        }
    }

    /// Evaluate against a record of the primary source and one of the other source.
    pub fn matches(&self, primary: &dyn Record, other: &dyn Record) -> bool {
        let (left, right) = if self.other_is_left {
            (other, primary)
        } else {
            (primary, other)
        };
        let base = self.op.holds(
            left.value(&self.left_property),
            right.value(&self.right_property),
        );
        base == self.true_or_not
    }
}

impl Invertible for MultiJoinExpression {
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

impl Flippable for MultiJoinExpression {
    fn flip(&self) -> Self {
        Self {
            left_property: self.right_property.clone(),
            right_property: self.left_property.clone(),
            op: self.op.flipped(),
            other_mapping: self.other_mapping,
            other_is_left: !self.other_is_left,
            true_or_not: self.true_or_not,
            other_alias: self.other_alias.clone(),
        }
    }
}
