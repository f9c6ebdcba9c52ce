//! Feature keys: named, typed slots bound to their computing functions.
//!
//! A [`MagicKey`] describes one column of a feature vector: its name (the
//! output header), how the value should be interpreted downstream
//! ([`KeyKind`]), and the function that computes it. The function type is
//! left generic so that callers can declare one `fn`-pointer alias per
//! call signature (single-unit features, pair features, ...) and still
//! share the same group machinery.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a feature slot is interpreted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Identifying information: carried through the output but excluded
    /// from the learnable feature semantics.
    Meta,
    /// Categorical feature.
    Discrete,
    /// Numeric feature.
    Continuous,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Meta => write!(f, "meta"),
            KeyKind::Discrete => write!(f, "discrete"),
            KeyKind::Continuous => write!(f, "continuous"),
        }
    }
}

/// A single feature value.
///
/// `Missing` is the explicit sentinel for features that have no defined
/// value on a degenerate input (for example the first word of an EDU
/// whose text normalizes to zero tokens). It is a value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Missing,
}

impl FeatureValue {
    /// Returns true if this is the missing-value sentinel.
    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureValue::Missing)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Str(s) => write!(f, "{}", s),
            FeatureValue::Int(n) => write!(f, "{}", n),
            FeatureValue::Bool(b) => write!(f, "{}", b),
            FeatureValue::Missing => Ok(()),
        }
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Str(s)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Str(s.to_string())
    }
}

impl From<i64> for FeatureValue {
    fn from(n: i64) -> Self {
        FeatureValue::Int(n)
    }
}

impl From<usize> for FeatureValue {
    fn from(n: usize) -> Self {
        FeatureValue::Int(n as i64)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Bool(b)
    }
}

impl<T: Into<FeatureValue>> From<Option<T>> for FeatureValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => FeatureValue::Missing,
        }
    }
}

/// A named, typed feature slot bound to its computing function.
///
/// Names are explicit and must be unique within the group (and within
/// the flattened namespace of a merged group); duplicates are rejected
/// when the group is assembled.
#[derive(Debug, Clone, Copy)]
pub struct MagicKey<F> {
    name: &'static str,
    kind: KeyKind,
    function: F,
}

impl<F> MagicKey<F> {
    /// An identifying key (present in output, not an ML feature).
    pub fn meta(name: &'static str, function: F) -> Self {
        Self {
            name,
            kind: KeyKind::Meta,
            function,
        }
    }

    /// A categorical key.
    pub fn discrete(name: &'static str, function: F) -> Self {
        Self {
            name,
            kind: KeyKind::Discrete,
            function,
        }
    }

    /// A numeric key.
    pub fn continuous(name: &'static str, function: F) -> Self {
        Self {
            name,
            kind: KeyKind::Continuous,
            function,
        }
    }

    /// The output column header for this key.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// How the value is interpreted downstream.
    pub fn kind(&self) -> KeyKind {
        self.kind
    }
}

impl<F: Copy> MagicKey<F> {
    /// The bound computing function.
    pub fn function(&self) -> F {
        self.function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_kind_display() {
        assert_eq!(KeyKind::Meta.to_string(), "meta");
        assert_eq!(KeyKind::Discrete.to_string(), "discrete");
        assert_eq!(KeyKind::Continuous.to_string(), "continuous");
    }

    #[test]
    fn feature_value_display() {
        assert_eq!(FeatureValue::Str("hello".into()).to_string(), "hello");
        assert_eq!(FeatureValue::Int(-3).to_string(), "-3");
        assert_eq!(FeatureValue::Bool(true).to_string(), "true");
        assert_eq!(FeatureValue::Bool(false).to_string(), "false");
        assert_eq!(FeatureValue::Missing.to_string(), "");
    }

    #[test]
    fn feature_value_from_impls() {
        assert_eq!(FeatureValue::from("abc"), FeatureValue::Str("abc".into()));
        assert_eq!(FeatureValue::from(7usize), FeatureValue::Int(7));
        assert_eq!(FeatureValue::from(-1i64), FeatureValue::Int(-1));
        assert_eq!(FeatureValue::from(true), FeatureValue::Bool(true));
        assert_eq!(FeatureValue::from(None::<i64>), FeatureValue::Missing);
        assert_eq!(FeatureValue::from(Some(2i64)), FeatureValue::Int(2));
    }

    #[test]
    fn missing_sentinel() {
        assert!(FeatureValue::Missing.is_missing());
        assert!(!FeatureValue::Int(0).is_missing());
    }

    #[test]
    fn magic_key_constructors() {
        type NullaryFn = fn() -> FeatureValue;

        let meta = MagicKey::<NullaryFn>::meta("id", || FeatureValue::Int(1));
        assert_eq!(meta.name(), "id");
        assert_eq!(meta.kind(), KeyKind::Meta);
        assert_eq!((meta.function())(), FeatureValue::Int(1));

        let discrete = MagicKey::<NullaryFn>::discrete("word", || FeatureValue::Missing);
        assert_eq!(discrete.kind(), KeyKind::Discrete);

        let continuous = MagicKey::<NullaryFn>::continuous("count", || FeatureValue::Int(0));
        assert_eq!(continuous.kind(), KeyKind::Continuous);
    }
}
