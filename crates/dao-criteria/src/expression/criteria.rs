//! Boolean combination of expressions and join criteria.

use crate::core::MappingId;

use super::eval::Record;
use super::join::JoinExpression;
use super::multi_join::MultiJoinExpression;
use super::Expression;

/// How the expressions of a criteria are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BooleanOperator {
    #[default]
    And,
    Or,
}

impl BooleanOperator {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            BooleanOperator::And => "AND",
            BooleanOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: SortDirection,
}

/// A list of expressions combined with a single boolean operator.
///
/// An empty criteria matches everything. Mixed AND/OR trees are built by
/// nesting: push an [`Expression::nested`] holding the inner criteria.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DaoCriteria {
    operator: BooleanOperator,
    expressions: Vec<Expression>,
    orders: Vec<SortOrder>,
}

impl DaoCriteria {
    /// Empty criteria whose expressions are AND-ed together.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty criteria whose expressions are OR-ed together.
    pub fn or() -> Self {
        Self {
            operator: BooleanOperator::Or,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn add(mut self, expression: impl Into<Expression>) -> Self {
        self.push(expression);
        self
    }

    pub fn push(&mut self, expression: impl Into<Expression>) {
        self.expressions.push(expression.into());
    }

    #[must_use]
    pub fn order_by(mut self, property: impl Into<String>, direction: SortDirection) -> Self {
        self.orders.push(SortOrder {
            property: property.into(),
            direction,
        });
        self
    }

    pub fn operator(&self) -> BooleanOperator {
        self.operator
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        if self.expressions.is_empty() {
            return true;
        }
        match self.operator {
            BooleanOperator::And => self.expressions.iter().all(|e| e.matches(record)),
            BooleanOperator::Or => self.expressions.iter().any(|e| e.matches(record)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    #[default]
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

/// Criteria relating a left and a right mapping.
///
/// The left source is the primary source of every multi-join. All join
/// expressions, the per-side criteria and the multi-joins are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub struct DaoJoinCriteria {
    join_type: JoinType,
    left: MappingId,
    right: MappingId,
    expressions: Vec<JoinExpression>,
    multi_joins: Vec<MultiJoinExpression>,
    left_criteria: DaoCriteria,
    right_criteria: DaoCriteria,
}

impl DaoJoinCriteria {
    pub fn new(join_type: JoinType, left: MappingId, right: MappingId) -> Self {
        Self {
            join_type,
            left,
            right,
            expressions: Vec::new(),
            multi_joins: Vec::new(),
            left_criteria: DaoCriteria::new(),
            right_criteria: DaoCriteria::new(),
        }
    }

    pub fn inner(left: MappingId, right: MappingId) -> Self {
        Self::new(JoinType::Inner, left, right)
    }

    #[must_use]
    pub fn on(mut self, expression: JoinExpression) -> Self {
        self.expressions.push(expression);
        self
    }

    #[must_use]
    pub fn multi_join(mut self, expression: MultiJoinExpression) -> Self {
        self.multi_joins.push(expression);
        self
    }

    #[must_use]
    pub fn with_left_criteria(mut self, criteria: DaoCriteria) -> Self {
        self.left_criteria = criteria;
        self
    }

    #[must_use]
    pub fn with_right_criteria(mut self, criteria: DaoCriteria) -> Self {
        self.right_criteria = criteria;
        self
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn left(&self) -> MappingId {
        self.left
    }

    pub fn right(&self) -> MappingId {
        self.right
    }

    pub fn expressions(&self) -> &[JoinExpression] {
        &self.expressions
    }

    pub fn multi_joins(&self) -> &[MultiJoinExpression] {
        &self.multi_joins
    }

    pub fn left_criteria(&self) -> &DaoCriteria {
        &self.left_criteria
    }

    pub fn right_criteria(&self) -> &DaoCriteria {
        &self.right_criteria
    }

    /// Evaluate the two-source part of the join against one record per side.
    ///
    /// Multi-joins need a third record and are not considered here; use
    /// [`MultiJoinExpression::matches`] for them.
    pub fn matches(&self, left: &dyn Record, right: &dyn Record) -> bool {
        self.expressions.iter().all(|e| e.matches(left, right))
            && self.left_criteria.matches(left)
            && self.right_criteria.matches(right)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::{ClassMapping, MappingRegistry, Value};
    use crate::expression::Invertible;

    fn row(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        assert!(DaoCriteria::new().matches(&row(&[])));
        assert!(DaoCriteria::or().matches(&row(&[])));
        assert!(DaoCriteria::new().is_empty());
    }

    #[test]
    fn test_and_or() {
        let r = row(&[("age", Value::Int(30)), ("name", Value::from("Bob"))]);
        let and = DaoCriteria::new()
            .add(Expression::greater("age", 18))
            .add(Expression::equal("name", "Alice"));
        assert!(!and.matches(&r));

        let or = DaoCriteria::or()
            .add(Expression::greater("age", 18))
            .add(Expression::equal("name", "Alice"));
        assert!(or.matches(&r));
        assert_eq!(or.operator(), BooleanOperator::Or);
    }

    #[test]
    fn test_negated_nested_criteria() {
        let r = row(&[("age", Value::Int(30))]);
        let inner = DaoCriteria::new().add(Expression::greater("age", 18));
        let criteria = DaoCriteria::new().add(Expression::nested(inner).invert());
        assert!(!criteria.matches(&r));
    }

    #[test]
    fn test_order_by() {
        let criteria = DaoCriteria::new()
            .order_by("name", SortDirection::Ascending)
            .order_by("age", SortDirection::Descending);
        assert_eq!(criteria.orders().len(), 2);
        assert_eq!(criteria.orders()[1].direction, SortDirection::Descending);
    }

    #[test]
    fn test_join_criteria_matches() {
        let mut registry = MappingRegistry::new();
        let people = registry.register(ClassMapping::new("Person", "people").unwrap());
        let orders = registry.register(ClassMapping::new("Order", "orders").unwrap());

        let join = DaoJoinCriteria::inner(people, orders)
            .on(JoinExpression::equal("id", "personId"))
            .with_right_criteria(DaoCriteria::new().add(Expression::greater("total", 100)));

        let person = row(&[("id", Value::Int(7))]);
        let big = row(&[("personId", Value::Int(7)), ("total", Value::Int(500))]);
        let small = row(&[("personId", Value::Int(7)), ("total", Value::Int(5))]);
        let other = row(&[("personId", Value::Int(8)), ("total", Value::Int(500))]);

        assert!(join.matches(&person, &big));
        assert!(!join.matches(&person, &small));
        assert!(!join.matches(&person, &other));
        assert_eq!(join.join_type(), JoinType::Inner);
        assert_eq!(join.left(), people);
    }
}
