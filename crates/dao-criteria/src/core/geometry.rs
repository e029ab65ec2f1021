//! Opaque geometry payload for spatial predicates.

use std::fmt;

/// A geometry in well-known-text form.
///
/// The criteria engine never interprets the shape: it stores it, hands the WKT
/// to the descriptor's spatial clause as a bound parameter, and passes it to
/// [`Record::distance_to`](crate::expression::Record::distance_to) during
/// in-memory evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Geometry {
    wkt: String,
    srid: Option<i32>,
}

impl Geometry {
    /// Wrap a WKT string without a spatial reference id.
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: wkt.into(),
            srid: None,
        }
    }

    /// Attach a spatial reference id.
    #[must_use]
    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Convenience constructor for a 2D point.
    pub fn point(x: f64, y: f64) -> Self {
        Self::from_wkt(format!("POINT({} {})", x, y))
    }

    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    pub fn srid(&self) -> Option<i32> {
        self.srid
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.srid {
            Some(srid) => write!(f, "SRID={};{}", srid, self.wkt),
            None => f.write_str(&self.wkt),
        }
    }
}
