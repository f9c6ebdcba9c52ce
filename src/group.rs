//! Key groups: ordered collections of feature keys with a shared
//! description, and merged groups that concatenate sub-groups into one
//! flat namespace.
//!
//! A group doubles as the schema and the storage for one filled vector:
//! `csv_headers()` and `csv_values()` stay in declaration order and are
//! always the same length (values start out as [`FeatureValue::Missing`]
//! until a fill runs). Help text needs only the schema, so groups can be
//! assembled and documented with no data in hand.

use crate::key::{FeatureValue, MagicKey};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while assembling key groups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Two keys in one flattened namespace share a name.
    #[error("duplicate feature key name: {name}")]
    DuplicateName { name: String },
}

/// An ordered collection of keys plus a human-readable description.
#[derive(Debug, Clone)]
pub struct KeyGroup<F> {
    description: &'static str,
    keys: Vec<MagicKey<F>>,
}

impl<F> KeyGroup<F> {
    /// Assemble a group, rejecting duplicate key names.
    pub fn new(description: &'static str, keys: Vec<MagicKey<F>>) -> Result<Self, KeyError> {
        let mut seen = HashSet::new();
        for key in &keys {
            if !seen.insert(key.name()) {
                return Err(KeyError::DuplicateName {
                    name: key.name().to_string(),
                });
            }
        }
        Ok(Self { description, keys })
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn keys(&self) -> &[MagicKey<F>] {
        &self.keys
    }

    /// Number of keys (= output columns) in this group.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Column headers in declaration order.
    pub fn csv_headers(&self) -> Vec<&'static str> {
        self.keys.iter().map(|key| key.name()).collect()
    }

    /// The group's description followed by its keys, one per line.
    pub fn help_text(&self) -> String {
        let mut out = self.description.to_string();
        for key in &self.keys {
            out.push_str(&format!("\n  [{}] {}", key.kind(), key.name()));
        }
        out
    }

    /// Evaluate every key in declaration order into `target`, which must
    /// be exactly this group's width. This is the sub-group half of the
    /// fill protocol: a merged group hands each sub-group its slice of
    /// the shared value buffer.
    pub fn fill_into<E>(&self, target: &mut [FeatureValue], mut eval: E)
    where
        E: FnMut(&MagicKey<F>) -> FeatureValue,
    {
        debug_assert_eq!(target.len(), self.keys.len());
        for (slot, key) in target.iter_mut().zip(&self.keys) {
            *slot = eval(key);
        }
    }
}

/// A key group composed of an ordered list of sub-groups.
///
/// Headers and values are the concatenation, in sub-group order, of each
/// sub-group's headers and values; the flattened name set must be
/// duplicate-free.
#[derive(Debug, Clone)]
pub struct MergedKeyGroup<F> {
    description: &'static str,
    groups: Vec<KeyGroup<F>>,
    values: Vec<FeatureValue>,
}

impl<F> MergedKeyGroup<F> {
    /// Assemble a merged group, rejecting duplicates across the
    /// flattened namespace.
    pub fn new(description: &'static str, groups: Vec<KeyGroup<F>>) -> Result<Self, KeyError> {
        let mut seen = HashSet::new();
        for group in &groups {
            for key in group.keys() {
                if !seen.insert(key.name()) {
                    return Err(KeyError::DuplicateName {
                        name: key.name().to_string(),
                    });
                }
            }
        }
        let width = groups.iter().map(KeyGroup::len).sum();
        Ok(Self {
            description,
            groups,
            values: vec![FeatureValue::Missing; width],
        })
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn groups(&self) -> &[KeyGroup<F>] {
        &self.groups
    }

    /// Total number of keys across all sub-groups.
    pub fn key_count(&self) -> usize {
        self.values.len()
    }

    /// Flattened column headers: sub-group order, then key order.
    pub fn csv_headers(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .flat_map(|group| group.keys().iter().map(|key| key.name()))
            .collect()
    }

    /// Values matching `csv_headers()` position for position.
    pub fn csv_values(&self) -> &[FeatureValue] {
        &self.values
    }

    /// Look up a filled value by header name.
    pub fn value(&self, name: &str) -> Option<&FeatureValue> {
        self.groups
            .iter()
            .flat_map(|group| group.keys())
            .position(|key| key.name() == name)
            .map(|idx| &self.values[idx])
    }

    /// The merged description, then each sub-group's help text.
    ///
    /// Works from the schema alone; no fill is required.
    pub fn help_text(&self) -> String {
        let mut sections = vec![self.description.to_string()];
        sections.extend(self.groups.iter().map(KeyGroup::help_text));
        sections.join("\n\n")
    }

    /// Evaluate every key, delegating to each sub-group in turn against
    /// the shared value buffer.
    pub fn fill_with<E>(&mut self, mut eval: E)
    where
        E: FnMut(&MagicKey<F>) -> FeatureValue,
    {
        let mut offset = 0;
        for group in &self.groups {
            let width = group.len();
            group.fill_into(&mut self.values[offset..offset + width], &mut eval);
            offset += width;
        }
    }
}
