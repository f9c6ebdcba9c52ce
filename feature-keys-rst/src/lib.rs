//! RST discourse-corpus pair feature extraction.
//!
//! Turns a corpus of RST-annotated documents into per-pair training
//! records for a discourse-parsing classifier. Feature vectors are
//! declared as `feature-keys` key groups: [`SingleEduKeys`] describes
//! one discourse unit, [`PairKeys`] an ordered pair of units (composing
//! the cached single-unit vectors rather than recomputing them), and
//! [`extract_pair_features`] drives the per-document extraction as a
//! lazy iterator of attachment- and relation-labeled records.

mod corpus;
mod extract;
mod pair;
mod single;
mod tree;

pub use corpus::{Corpus, DocKey, Edu, TextSpan};
pub use extract::{
    extract_pair_features, preprocess, simplify_deptree, ClassedVector, DocumentPlus,
    ExtractError, FeatureInput, Label, PairFeatures, RelationTable, SingleCache, UNRELATED,
};
pub use pair::{PairFeatureFn, PairKeys};
pub use single::{clean_edu_text, edu_tokens, SingleEduKeys, SingleFeatureFn};
pub use tree::{rst_to_deptree, DepTree, Nuclearity, RstTree, ROOT_REL};
