//! The criteria object model.
//!
//! Leaves are plain values. [`Invertible::invert`] and [`Flippable::flip`]
//! build new values and never touch the receiver, so criteria trees can be
//! shared freely across threads.
//!
//! - [`comparison`]: property/value comparisons, IN lists, NULL tests, bit masks
//! - [`spatial`]: distance and intersection predicates
//! - [`join`]: predicates between the left and right source of a join
//! - [`multi_join`]: predicates against an arbitrary other source
//! - [`criteria`]: AND/OR combination and join criteria
//! - [`eval`]: in-memory evaluation for non-SQL stores
//!
//! Every predicate carries a `true_or_not` flag: `true` selects the rows the
//! predicate describes, `false` selects every other row. Inversion only ever
//! toggles that flag; operators are never rewritten.

pub mod comparison;
pub mod criteria;
pub mod eval;
pub mod join;
pub mod multi_join;
pub mod spatial;

pub use comparison::{
    BitwiseAndExpression, CompareOp, PropertyInListExpression, PropertyNullExpression,
    PropertyValueExpression,
};
pub use criteria::{BooleanOperator, DaoCriteria, DaoJoinCriteria, JoinType, SortDirection, SortOrder};
pub use eval::Record;
pub use join::{JoinExpression, JoinOp, JoinSide};
pub use multi_join::MultiJoinExpression;
pub use spatial::{DistanceDirection, SpatialExpression, SpatialPredicate};

use crate::core::Value;

/// A predicate that can produce its exact complement.
pub trait Invertible: Sized {
    /// `true` if the predicate selects matches, `false` if it selects non-matches.
    fn true_or_not(&self) -> bool;

    /// A new predicate matching exactly the rows this one does not.
    #[must_use]
    fn invert(&self) -> Self;
}

/// A two-sided predicate whose operands can trade places.
pub trait Flippable: Sized {
    /// A new predicate with left and right swapped and the same matched pairs.
    #[must_use]
    fn flip(&self) -> Self;
}

/// A sub-criteria used as a single predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedExpression {
    criteria: DaoCriteria,
    true_or_not: bool,
}

impl NestedExpression {
    pub fn new(criteria: DaoCriteria, true_or_not: bool) -> Self {
        Self {
            criteria,
            true_or_not,
        }
    }

    pub fn criteria(&self) -> &DaoCriteria {
        &self.criteria
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        self.criteria.matches(record) == self.true_or_not
    }
}

impl Invertible for NestedExpression {
    fn true_or_not(&self) -> bool {
        self.true_or_not
    }

    fn invert(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            true_or_not: !self.true_or_not,
        }
    }
}

/// Any single-source predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Compare(PropertyValueExpression),
    InList(PropertyInListExpression),
    Null(PropertyNullExpression),
    BitwiseAnd(BitwiseAndExpression),
    Spatial(SpatialExpression),
    Nested(NestedExpression),
}

impl Expression {
    pub fn equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::Equal, property, value, true).into()
    }

    pub fn not_equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::Equal, property, value, false).into()
    }

    pub fn greater(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::Greater, property, value, true).into()
    }

    pub fn greater_or_equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::GreaterOrEqual, property, value, true).into()
    }

    pub fn lesser(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::Lesser, property, value, true).into()
    }

    pub fn lesser_or_equal(property: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyValueExpression::new(CompareOp::LesserOrEqual, property, value, true).into()
    }

    pub fn like(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        PropertyValueExpression::new(CompareOp::Like, property, pattern.into(), true).into()
    }

    pub fn like_ignore_case(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        PropertyValueExpression::new(CompareOp::LikeIgnoreCase, property, pattern.into(), true)
            .into()
    }

    pub fn in_list<I, V>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        PropertyInListExpression::new(property, values, true).into()
    }

    pub fn is_null(property: impl Into<String>) -> Self {
        PropertyNullExpression::new(property, true).into()
    }

    pub fn bitwise_and(property: impl Into<String>, mask: i64) -> Self {
        BitwiseAndExpression::new(property, mask, true).into()
    }

    pub fn nested(criteria: DaoCriteria) -> Self {
        NestedExpression::new(criteria, true).into()
    }

    /// Evaluate against an in-memory record.
    pub fn matches(&self, record: &dyn Record) -> bool {
        match self {
            Expression::Compare(e) => e.matches(record),
            Expression::InList(e) => e.matches(record),
            Expression::Null(e) => e.matches(record),
            Expression::BitwiseAnd(e) => e.matches(record),
            Expression::Spatial(e) => e.matches(record),
            Expression::Nested(e) => e.matches(record),
        }
    }
}

impl Invertible for Expression {
    fn true_or_not(&self) -> bool {
        match self {
            Expression::Compare(e) => e.true_or_not(),
            Expression::InList(e) => e.true_or_not(),
            Expression::Null(e) => e.true_or_not(),
            Expression::BitwiseAnd(e) => e.true_or_not(),
            Expression::Spatial(e) => e.true_or_not(),
            Expression::Nested(e) => e.true_or_not(),
        }
    }

    fn invert(&self) -> Self {
        match self {
            Expression::Compare(e) => Expression::Compare(e.invert()),
            Expression::InList(e) => Expression::InList(e.invert()),
            Expression::Null(e) => Expression::Null(e.invert()),
            Expression::BitwiseAnd(e) => Expression::BitwiseAnd(e.invert()),
            Expression::Spatial(e) => Expression::Spatial(e.invert()),
            Expression::Nested(e) => Expression::Nested(e.invert()),
        }
    }
}

impl From<PropertyValueExpression> for Expression {
    fn from(e: PropertyValueExpression) -> Self {
        Expression::Compare(e)
    }
}

impl From<PropertyInListExpression> for Expression {
    fn from(e: PropertyInListExpression) -> Self {
        Expression::InList(e)
    }
}

impl From<PropertyNullExpression> for Expression {
    fn from(e: PropertyNullExpression) -> Self {
        Expression::Null(e)
    }
}

impl From<BitwiseAndExpression> for Expression {
    fn from(e: BitwiseAndExpression) -> Self {
        Expression::BitwiseAnd(e)
    }
}

impl From<SpatialExpression> for Expression {
    fn from(e: SpatialExpression) -> Self {
        Expression::Spatial(e)
    }
}

impl From<NestedExpression> for Expression {
    fn from(e: NestedExpression) -> Self {
        Expression::Nested(e)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::core::{ClassMapping, Geometry, MappingRegistry};

    const FIELDS: [&str; 3] = ["a", "b", "c"];

    fn arb_field() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(FIELDS[0].to_string()),
            Just(FIELDS[1].to_string()),
            Just(FIELDS[2].to_string()),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            (-5i64..5).prop_map(Value::Int),
            (-5.0f64..5.0).prop_map(Value::Float),
            "[ab%_]{0,3}".prop_map(Value::Text),
            any::<bool>().prop_map(Value::Bool),
            Just(Value::Null),
        ]
    }

    fn arb_record() -> impl Strategy<Value = BTreeMap<String, Value>> {
        prop::collection::btree_map(arb_field(), arb_value(), 0..3)
    }

    fn arb_compare_op() -> impl Strategy<Value = CompareOp> {
        prop_oneof![
            Just(CompareOp::Equal),
            Just(CompareOp::Greater),
            Just(CompareOp::GreaterOrEqual),
            Just(CompareOp::Lesser),
            Just(CompareOp::LesserOrEqual),
            Just(CompareOp::Like),
            Just(CompareOp::LikeIgnoreCase),
        ]
    }

    fn arb_join_op() -> impl Strategy<Value = JoinOp> {
        prop_oneof![
            Just(JoinOp::Equal),
            Just(JoinOp::Lesser),
            Just(JoinOp::Greater),
            Just(JoinOp::LesserOrEqual),
            Just(JoinOp::GreaterOrEqual),
        ]
    }

    fn arb_leaf() -> impl Strategy<Value = Expression> {
        prop_oneof![
            (arb_compare_op(), arb_field(), arb_value(), any::<bool>())
                .prop_map(|(op, f, v, t)| Expression::from(PropertyValueExpression::new(op, f, v, t))),
            (arb_field(), prop::collection::vec(arb_value(), 0..3), any::<bool>())
                .prop_map(|(f, vs, t)| Expression::from(PropertyInListExpression::new(f, vs, t))),
            (arb_field(), any::<bool>())
                .prop_map(|(f, t)| Expression::from(PropertyNullExpression::new(f, t))),
            (arb_field(), 0i64..8, any::<bool>())
                .prop_map(|(f, m, t)| Expression::from(BitwiseAndExpression::new(f, m, t))),
        ]
    }

    fn arb_expression() -> impl Strategy<Value = Expression> {
        arb_leaf().prop_recursive(2, 8, 3, |inner| {
            (prop::collection::vec(inner, 0..3), any::<bool>(), any::<bool>()).prop_map(
                |(children, or, t)| {
                    let mut criteria = if or {
                        DaoCriteria::or()
                    } else {
                        DaoCriteria::new()
                    };
                    for child in children {
                        criteria.push(child);
                    }
                    Expression::from(NestedExpression::new(criteria, t))
                },
            )
        })
    }

    fn arb_join() -> impl Strategy<Value = JoinExpression> {
        prop_oneof![
            (arb_join_op(), arb_field(), arb_field(), any::<bool>()).prop_map(|(op, l, r, t)| {
                let join = JoinExpression::properties(op, l, r);
                if t {
                    join
                } else {
                    join.invert()
                }
            }),
            (arb_join_op(), any::<bool>(), arb_field(), arb_value()).prop_map(
                |(op, left, f, v)| {
                    let side = if left { JoinSide::Left } else { JoinSide::Right };
                    JoinExpression::property_value(side, op, f, v)
                }
            ),
        ]
    }

    proptest! {
        #[test]
        fn double_invert_is_identity(expr in arb_expression()) {
            prop_assert_eq!(expr.invert().invert(), expr);
        }

        #[test]
        fn invert_is_exact_complement(expr in arb_expression(), record in arb_record()) {
            prop_assert_ne!(expr.matches(&record), expr.invert().matches(&record));
        }

        #[test]
        fn join_flip_is_involution(join in arb_join()) {
            prop_assert_eq!(join.flip().flip(), join);
        }

        #[test]
        fn join_flip_preserves_pairs(join in arb_join(), l in arb_record(), r in arb_record()) {
            prop_assert_eq!(join.matches(&l, &r), join.flip().matches(&r, &l));
        }

        #[test]
        fn join_invert_is_complement(join in arb_join(), l in arb_record(), r in arb_record()) {
            prop_assert_ne!(join.matches(&l, &r), join.invert().matches(&l, &r));
        }

        #[test]
        fn multi_join_flip_laws(
            op in arb_join_op(),
            lp in arb_field(),
            rp in arb_field(),
            other_is_left in any::<bool>(),
            alias in prop::option::of("[a-z]{1,4}"),
            primary in arb_record(),
            other in arb_record(),
        ) {
            let mapping = MappingRegistry::new()
                .register(ClassMapping::new("Other", "others").unwrap());
            let mut join = MultiJoinExpression::new(op, lp, rp, mapping)
                .with_other_is_left(other_is_left);
            if let Some(alias) = alias {
                join = join.with_alias(alias);
            }
            let flipped = join.flip();
            prop_assert_eq!(flipped.other_is_left(), !join.other_is_left());
            prop_assert_eq!(flipped.other_alias(), join.other_alias());
            prop_assert_eq!(flipped.other_mapping(), join.other_mapping());
            prop_assert_eq!(&flipped.flip(), &join);
            prop_assert_eq!(flipped.matches(&primary, &other), join.matches(&primary, &other));
        }
    }

    #[test]
    fn test_constructors_map_to_variants() {
        assert!(matches!(Expression::equal("a", 1), Expression::Compare(_)));
        assert!(!Expression::not_equal("a", 1).true_or_not());
        assert!(matches!(Expression::in_list("a", [1, 2]), Expression::InList(_)));
        assert!(matches!(Expression::is_null("a"), Expression::Null(_)));
        assert!(matches!(Expression::bitwise_and("a", 4), Expression::BitwiseAnd(_)));
        let spatial: Expression =
            SpatialExpression::lesser_than_distance("geom", Arc::new(Geometry::point(0.0, 0.0)), 1.0)
                .into();
        assert!(matches!(spatial.invert(), Expression::Spatial(_)));
    }

    #[test]
    fn test_nested_negation() {
        let inner = DaoCriteria::new()
            .add(Expression::greater("a", 1))
            .add(Expression::lesser("a", 5));
        let outside = Expression::nested(inner).invert();

        let mut record = BTreeMap::new();
        record.insert("a".to_string(), Value::Int(3));
        assert!(!outside.matches(&record));
        record.insert("a".to_string(), Value::Int(9));
        assert!(outside.matches(&record));
    }
}
