//! Declarative feature-key groups for assembling ML feature vectors.
//!
//! A feature vector is described as named, typed slots ([`MagicKey`])
//! gathered into ordered groups ([`KeyGroup`]) and composed into one
//! flat record ([`MergedKeyGroup`]). The same declaration drives the
//! output headers, the fill pass that computes the values, and the
//! human-readable help text. Domain crates supply the feature functions
//! and the things they run over; this crate knows nothing about either.
//!
//! The companion [`vocabulary`] module serializes name-to-index feature
//! vocabularies in the tab-separated, one-based format expected by
//! libsvm-style consumers.

mod group;
mod key;
pub mod vocabulary;

pub use group::{KeyError, KeyGroup, MergedKeyGroup};
pub use key::{FeatureValue, KeyKind, MagicKey};
