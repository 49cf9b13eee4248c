// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Property predicates

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{EstimatorError, EstimatorResult};
use crate::stats::hash::{number_hash, string_hash};

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn infinity() -> f64 {
    f64::INFINITY
}

fn is_unbounded(v: &f64) -> bool {
    v.is_infinite()
}

/// Condition on a single property value
///
/// Either equality with a string, or membership of a numeric value in the
/// closed range `[low, high]`. Numeric equality is the point range `[v, v]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyPredicate {
    Value(String),
    Range {
        #[serde(default = "neg_infinity", skip_serializing_if = "is_unbounded")]
        low: f64,
        #[serde(default = "infinity", skip_serializing_if = "is_unbounded")]
        high: f64,
    },
}

impl PropertyPredicate {
    pub fn value<S: Into<String>>(value: S) -> Self {
        Self::Value(value.into())
    }

    /// Fails for `low > high` or NaN bounds
    pub fn range(low: f64, high: f64) -> EstimatorResult<Self> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(EstimatorError::predicate(format!(
                "broken range [{}, {}]",
                low, high
            )));
        }
        Ok(Self::Range { low, high })
    }

    pub fn equals_number(value: f64) -> EstimatorResult<Self> {
        Self::range(value, value)
    }

    /// Predicate for `property <op> value` with `op` one of `<`, `>`, `=`
    pub fn compare(op: &str, value: f64) -> EstimatorResult<Self> {
        match op {
            "<" => Self::range(f64::NEG_INFINITY, value),
            ">" => Self::range(value, f64::INFINITY),
            "=" => Self::range(value, value),
            other => Err(EstimatorError::predicate(format!(
                "unknown comparison operator '{}'",
                other
            ))),
        }
    }

    /// Conjunction of two predicates on the same property
    ///
    /// String values must be equal; ranges are intersected.
    pub fn merge(&self, other: &Self) -> EstimatorResult<Self> {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) if a == b => Ok(self.clone()),
            (Self::Value(a), Self::Value(b)) => Err(EstimatorError::predicate(format!(
                "values don't match: '{}' vs. '{}'",
                a, b
            ))),
            (Self::Range { low: l1, high: h1 }, Self::Range { low: l2, high: h2 }) => {
                Self::range(l1.max(*l2), h1.min(*h2))
            }
            _ => Err(EstimatorError::predicate(
                "cannot merge a string and a numeric predicate",
            )),
        }
    }

    /// Hash of the compared value, `None` for proper ranges
    pub fn value_hash(&self) -> Option<i32> {
        match self {
            Self::Value(v) => Some(string_hash(v)),
            Self::Range { low, high } if low == high => Some(number_hash(*low)),
            Self::Range { .. } => None,
        }
    }
}

impl PartialEq for PropertyPredicate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Range { low: l1, high: h1 }, Self::Range { low: l2, high: h2 }) => {
                l1.to_bits() == l2.to_bits() && h1.to_bits() == h2.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for PropertyPredicate {}

impl Hash for PropertyPredicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Value(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            Self::Range { low, high } => {
                1u8.hash(state);
                low.to_bits().hash(state);
                high.to_bits().hash(state);
            }
        }
    }
}

impl fmt::Display for PropertyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "='{}'", v),
            Self::Range { low, high } if low == high => write!(f, "={}", low),
            Self::Range { low, high } if low.is_infinite() => write!(f, "<{}", high),
            Self::Range { low, high } if high.is_infinite() => write!(f, ">{}", low),
            Self::Range { low, high } => write!(f, " in [{}, {}]", low, high),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broken_range_rejected() {
        assert!(PropertyPredicate::range(2.0, 1.0).is_err());
        assert!(PropertyPredicate::range(f64::NAN, 1.0).is_err());
        assert!(PropertyPredicate::compare("!=", 1.0).is_err());
    }

    #[test]
    fn test_compare_ops() {
        assert_eq!(
            PropertyPredicate::compare("<", 5.0).unwrap(),
            PropertyPredicate::Range {
                low: f64::NEG_INFINITY,
                high: 5.0
            }
        );
        assert_eq!(
            PropertyPredicate::compare("=", 5.0).unwrap(),
            PropertyPredicate::equals_number(5.0).unwrap()
        );
    }

    #[test]
    fn test_merge() {
        let a = PropertyPredicate::compare(">", 1.0).unwrap();
        let b = PropertyPredicate::compare("<", 3.0).unwrap();
        assert_eq!(a.merge(&b).unwrap(), PropertyPredicate::range(1.0, 3.0).unwrap());

        let disjoint = PropertyPredicate::compare(">", 5.0).unwrap();
        assert!(b.merge(&disjoint).is_err());

        let x = PropertyPredicate::value("x");
        assert_eq!(x.merge(&x).unwrap(), x);
        assert!(x.merge(&PropertyPredicate::value("y")).is_err());
        assert!(x.merge(&a).is_err());
    }

    #[test]
    fn test_value_hash() {
        assert_eq!(PropertyPredicate::value("a").value_hash(), Some(97));
        assert_eq!(
            PropertyPredicate::equals_number(1.0).unwrap().value_hash(),
            Some(1_072_693_248)
        );
        assert_eq!(PropertyPredicate::range(0.0, 1.0).unwrap().value_hash(), None);
    }

    #[test]
    fn test_serde_open_bounds() {
        let p = PropertyPredicate::compare(">", 4.0).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"range":{"low":4.0}}"#);
        let back: PropertyPredicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let v: PropertyPredicate = serde_json::from_str(r#"{"value":"Alice"}"#).unwrap();
        assert_eq!(v, PropertyPredicate::value("Alice"));
    }

    #[test]
    fn test_display() {
        assert_eq!(PropertyPredicate::value("a").to_string(), "='a'");
        assert_eq!(PropertyPredicate::compare("<", 2.0).unwrap().to_string(), "<2");
        assert_eq!(PropertyPredicate::range(1.0, 2.0).unwrap().to_string(), " in [1, 2]");
    }
}
