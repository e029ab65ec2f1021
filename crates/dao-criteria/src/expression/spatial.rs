//! Spatial predicates against a geometry value.

use std::sync::Arc;

use crate::core::Geometry;

use super::eval::Record;
use super::Invertible;

/// Which side of the distance threshold matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceDirection {
    /// Farther than the distance.
    Greater,
    /// Closer than the distance.
    Lesser,
}

impl DistanceDirection {
    pub fn sql_operator(self) -> &'static str {
        match self {
            DistanceDirection::Greater => ">",
            DistanceDirection::Lesser => "<",
        }
    }
}

/// The spatial relation being tested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialPredicate {
    Distance {
        distance: f64,
        direction: DistanceDirection,
    },
    Intersects,
}

/// Compares a geometry property against a shape.
///
/// Inverting a distance predicate only toggles the flag: "not greater than d"
/// already means "lesser than or equal to d".
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialExpression {
    property: String,
    shape: Arc<Geometry>,
    predicate: SpatialPredicate,
    true_or_not: bool,
}

impl SpatialExpression {
    /// Distance predicate. Negative distances are stored as given.
    pub fn distance(
        property: impl Into<String>,
        shape: impl Into<Arc<Geometry>>,
        distance: f64,
        direction: DistanceDirection,
        true_or_not: bool,
    ) -> Self {
        Self {
            property: property.into(),
            shape: shape.into(),
            predicate: SpatialPredicate::Distance {
                distance,
                direction,
            },
            true_or_not,
        }
    }

    /// Property geometry is farther than `distance` from `shape`.
    pub fn greater_than_distance(
        property: impl Into<String>,
        shape: impl Into<Arc<Geometry>>,
        distance: f64,
    ) -> Self {
        Self::distance(property, shape, distance, DistanceDirection::Greater, true)
    }

    /// Property geometry is closer than `distance` to `shape`.
    pub fn lesser_than_distance(
        property: impl Into<String>,
        shape: impl Into<Arc<Geometry>>,
        distance: f64,
    ) -> Self {
        Self::distance(property, shape, distance, DistanceDirection::Lesser, true)
    }

    /// Property geometry intersects `shape`.
    pub fn intersects(
        property: impl Into<String>,
        shape: impl Into<Arc<Geometry>>,
        true_or_not: bool,
    ) -> Self {
        Self {
            property: property.into(),
            shape: shape.into(),
            predicate: SpatialPredicate::Intersects,
            true_or_not,
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn shape(&self) -> &Arc<Geometry> {
        &self.shape
    }

    pub fn predicate(&self) -> SpatialPredicate {
        self.predicate
    }

    pub fn matches(&self, record: &dyn Record) -> bool {
        let base = match self.predicate {
            SpatialPredicate::Distance {
                distance,
                direction,
            } => record
                .distance_to(&self.property, &self.shape)
                .is_some_and(|d| match direction {
                    DistanceDirection::Greater => d > distance,
                    DistanceDirection::Lesser => d < distance,
                }),
            SpatialPredicate::Intersects => record
                .intersects(&self.property, &self.shape)
                .unwrap_or(false),
        };
        base == self.true_or_not
    }
}

impl Invertible for SpatialExpression {
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
    use crate::core::Value;

    /// A record whose `location` is a point on the x axis.
    struct OnAxis(f64);

    impl Record for OnAxis {
        fn value(&self, _property: &str) -> Option<&Value> {
            None
        }

        fn distance_to(&self, property: &str, _shape: &Geometry) -> Option<f64> {
            (property == "location").then_some(self.0.abs())
        }
    }

    #[test]
    fn test_distance_directions() {
        let origin = Arc::new(Geometry::point(0.0, 0.0));
        let far = SpatialExpression::greater_than_distance("location", origin.clone(), 10.0);
        let near = SpatialExpression::lesser_than_distance("location", origin, 10.0);

        assert!(far.matches(&OnAxis(15.0)));
        assert!(!far.matches(&OnAxis(10.0)));
        assert!(near.matches(&OnAxis(5.0)));

        // not-greater is lesser-or-equal
        assert!(far.invert().matches(&OnAxis(10.0)));
        assert_eq!(far.invert().predicate(), far.predicate());
    }

    #[test]
    fn test_invert_keeps_shared_shape() {
        let shape = Arc::new(Geometry::point(1.0, 2.0));
        let expr = SpatialExpression::greater_than_distance("location", shape.clone(), 3.0);
        let inverted = expr.invert();
        assert!(Arc::ptr_eq(inverted.shape(), &shape));
        assert_eq!(inverted.invert(), expr);
    }

    #[test]
    fn test_no_spatial_support_fails_base_test() {
        let expr = SpatialExpression::intersects("location", Geometry::point(0.0, 0.0), true);
        let plain: HashMap<String, Value> = HashMap::new();
        assert!(!expr.matches(&plain));
        assert!(expr.invert().matches(&plain));
    }
}
