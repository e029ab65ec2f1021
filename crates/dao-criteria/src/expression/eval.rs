//! In-memory evaluation support for non-SQL stores.
//!
//! Every predicate evaluates to a plain boolean "base" result (NULL, missing or
//! incomparable operands make it false) which is then compared with the
//! expression's `true_or_not` flag. That keeps [`invert`] an exact complement,
//! unlike SQL's three-valued logic.
//!
//! [`invert`]: super::Invertible::invert

use std::collections::{BTreeMap, HashMap};

use crate::core::{Geometry, Value};

/// An object whose properties can be read by name.
pub trait Record {
    /// Value of a property, `None` when the record has no such property.
    fn value(&self, property: &str) -> Option<&Value>;

    /// Distance from a geometry-valued property to `shape`.
    ///
    /// Records without spatial support return `None`, which fails every
    /// spatial predicate's base test.
    fn distance_to(&self, property: &str, shape: &Geometry) -> Option<f64> {
        let _ = (property, shape);
        None
    }

    /// Whether a geometry-valued property intersects `shape`.
    fn intersects(&self, property: &str, shape: &Geometry) -> Option<bool> {
        let _ = (property, shape);
        None
    }
}

impl Record for HashMap<String, Value> {
    fn value(&self, property: &str) -> Option<&Value> {
        self.get(property)
    }
}

impl Record for BTreeMap<String, Value> {
    fn value(&self, property: &str) -> Option<&Value> {
        self.get(property)
    }
}

/// SQL `LIKE` matching: `%` matches any run of characters, `_` exactly one.
pub fn like_match(text: &str, pattern: &str, ignore_case: bool) -> bool {
    let (text, pattern): (Vec<char>, Vec<char>) = if ignore_case {
        (
            text.to_lowercase().chars().collect(),
            pattern.to_lowercase().chars().collect(),
        )
    } else {
        (text.chars().collect(), pattern.chars().collect())
    };

    // Greedy two-pointer walk with backtracking to the last '%'.
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && pattern[p] == '%' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_match() {
        assert!(like_match("hello", "hello", false));
        assert!(like_match("hello", "h%", false));
        assert!(like_match("hello", "%llo", false));
        assert!(like_match("hello", "h_llo", false));
        assert!(like_match("hello", "%", false));
        assert!(like_match("", "%", false));
        assert!(like_match("abcabc", "%b%c", false));
        assert!(!like_match("hello", "h_lo", false));
        assert!(!like_match("hello", "Hello", false));
        assert!(like_match("hello", "HE%", true));
        assert!(!like_match("", "_", false));
    }

    #[test]
    fn test_like_wildcards_over_literal_wildcard_characters() {
        assert!(like_match("%x", "%", false));
        assert!(like_match("50%off", "%off", false));
        assert!(like_match("50%off", "50%", false));
        assert!(like_match("a_b", "%_b", false));
        assert!(like_match("100%", "1%%", false));
        assert!(!like_match("50%off", "%on", false));
    }

    #[test]
    fn test_map_records() {
        let mut h = HashMap::new();
        h.insert("a".to_string(), Value::Int(1));
        assert_eq!(Record::value(&h, "a"), Some(&Value::Int(1)));
        assert_eq!(Record::value(&h, "b"), None);
        assert_eq!(h.distance_to("a", &Geometry::point(0.0, 0.0)), None);
    }
}
