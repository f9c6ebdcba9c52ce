//! Pair feature extraction driver.
//!
//! [`extract_pair_features`] walks the corpus one document at a time:
//! derive the document's tree representations, flatten the dependency
//! tree into a ground-truth relation table, cache one filled single-EDU
//! vector per unit, then enumerate every ordered pair of distinct units
//! and yield its attachment-labeled and relation-labeled records. The
//! whole thing is a lazy iterator; only one document's cache is resident
//! at a time, and dropping the iterator mid-corpus has no side effects.

use crate::corpus::{Corpus, DocKey, Edu};
use crate::pair::PairKeys;
use crate::single::SingleEduKeys;
use crate::tree::{rst_to_deptree, DepTree, RstTree};
use feature_keys::{FeatureValue, KeyError};
use std::collections::{btree_map, HashMap};
use std::rc::Rc;
use thiserror::Error;

/// Process-wide, read-only inputs for feature extraction.
#[derive(Debug, Clone)]
pub struct FeatureInput {
    /// The loaded corpus.
    pub corpus: Corpus,
    /// Extra diagnostic output was requested.
    pub debug: bool,
}

/// One corpus document bundled with its derived representations, built
/// once per document at the start of its extraction pass.
#[derive(Debug)]
pub struct DocumentPlus<'c> {
    /// Identity of the document within the corpus.
    pub key: &'c DocKey,
    /// The constituency tree as stored in the corpus.
    pub rst_tree: &'c RstTree,
    /// Its dependency projection.
    pub dep_tree: DepTree,
}

/// Ground truth: `(parent num, child num)` to relation label.
pub type RelationTable = HashMap<(usize, usize), String>;

/// Per-document cache of filled single-EDU vectors, keyed by `Edu::num`.
pub type SingleCache = HashMap<usize, Rc<SingleEduKeys>>;

/// Relation label for pairs the ground-truth table does not cover.
pub const UNRELATED: &str = "UNRELATED";

/// Errors raised during feature extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("feature key assembly failed: {0}")]
    Key(#[from] KeyError),

    /// The requested document is not in the corpus.
    #[error("unknown document: {doc}")]
    UnknownDocument { doc: String },

    /// A unit was absent from the per-document cache. The cache is built
    /// from the exact unit list used for pair enumeration, so this is an
    /// invariant violation, never defaulted over.
    #[error("EDU {edu} of document {doc} is missing from the single-EDU cache")]
    CacheMiss { doc: String, edu: usize },

    /// `fill` was called on a pair vector constructed without a cache
    /// (such instances exist only to generate help text).
    #[error("pair vector was constructed without a cache and cannot be filled")]
    FilledWithoutCache,
}

/// Bundle up a document with its derived representations.
pub fn preprocess<'c>(
    inputs: &'c FeatureInput,
    key: &DocKey,
) -> Result<DocumentPlus<'c>, ExtractError> {
    let (key, tree) = inputs
        .corpus
        .get_entry(key)
        .ok_or_else(|| ExtractError::UnknownDocument {
            doc: key.doc.clone(),
        })?;
    Ok(DocumentPlus {
        key,
        rst_tree: tree,
        dep_tree: rst_to_deptree(tree),
    })
}

/// Boil a dependency tree down to its one-level edges: every node
/// contributes one entry per direct child, labeled with the child's own
/// relation tag.
pub fn simplify_deptree(dtree: &DepTree) -> RelationTable {
    let mut relations = RelationTable::new();
    let mut stack = vec![dtree];
    while let Some(node) = stack.pop() {
        for child in &node.children {
            relations.insert((node.edu.num, child.edu.num), child.rel.clone());
            stack.push(child);
        }
    }
    relations
}

/// Target class attached to an output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Whether the two units are directly related in the gold tree.
    Attachment(bool),
    /// The relation name, or [`UNRELATED`].
    Relation(String),
}

impl Label {
    /// The label as it appears in the output's `class` column.
    pub fn as_feature_value(&self) -> FeatureValue {
        match self {
            Label::Attachment(attached) => FeatureValue::Bool(*attached),
            Label::Relation(rel) => FeatureValue::Str(rel.clone()),
        }
    }
}

/// A pair vector annotated with its target class.
///
/// The attachment and relation records for one pair share the same
/// underlying [`PairKeys`]; only the label differs.
#[derive(Debug, Clone)]
pub struct ClassedVector {
    vector: Rc<PairKeys>,
    label: Option<Label>,
}

impl ClassedVector {
    /// A record with no target class (live mode).
    pub fn unlabelled(vector: Rc<PairKeys>) -> Self {
        Self {
            vector,
            label: None,
        }
    }

    pub fn labelled(vector: Rc<PairKeys>, label: Label) -> Self {
        Self {
            vector,
            label: Some(label),
        }
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    pub fn vector(&self) -> &PairKeys {
        &self.vector
    }

    /// True when both records wrap the same underlying pair vector.
    pub fn same_vector(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.vector, &b.vector)
    }

    /// `class`, then the pair vector's columns.
    pub fn csv_headers(&self) -> Vec<String> {
        let mut headers = vec!["class".to_string()];
        headers.extend(self.vector.csv_headers());
        headers
    }

    /// Values matching `csv_headers()` position for position; the class
    /// slot is missing when the record is unlabelled.
    pub fn csv_values(&self) -> Vec<FeatureValue> {
        let class = self
            .label
            .as_ref()
            .map_or(FeatureValue::Missing, Label::as_feature_value);
        let mut values = vec![class];
        values.extend(self.vector.csv_values());
        values
    }
}

/// Lazily extract labeled pair-feature records from every corpus
/// document.
///
/// In corpus mode each ordered pair of distinct units yields an
/// attachment-labeled record and a relation-labeled record sharing one
/// pair vector. With `live` set there is no ground truth: the relation
/// table is left empty and the same unlabelled record is yielded for
/// both slots.
pub fn extract_pair_features(inputs: &FeatureInput, live: bool) -> PairFeatures<'_> {
    PairFeatures {
        inputs,
        live,
        docs: inputs.corpus.iter(),
        state: None,
    }
}

/// Iterator returned by [`extract_pair_features`].
pub struct PairFeatures<'a> {
    inputs: &'a FeatureInput,
    live: bool,
    docs: btree_map::Iter<'a, DocKey, RstTree>,
    state: Option<DocState<'a>>,
}

impl<'a> Iterator for PairFeatures<'a> {
    type Item = Result<(ClassedVector, ClassedVector), ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state.is_none() {
                let (key, tree) = self.docs.next()?;
                match DocState::prepare(self.inputs, key, tree, self.live) {
                    Ok(state) => self.state = Some(state),
                    Err(err) => return Some(Err(err)),
                }
            }
            if let Some(state) = self.state.as_mut() {
                if let Some((i, j)) = state.next_pair() {
                    return Some(state.emit(self.inputs, self.live, i, j));
                }
            }
            // document exhausted; its cache is dropped with the state
            self.state = None;
        }
    }
}

/// Extraction state for the document currently being walked.
struct DocState<'a> {
    current: DocumentPlus<'a>,
    edus: Vec<&'a Edu>,
    relations: RelationTable,
    cache: Rc<SingleCache>,
    i: usize,
    j: usize,
}

impl<'a> DocState<'a> {
    fn prepare(
        inputs: &'a FeatureInput,
        key: &'a DocKey,
        tree: &'a RstTree,
        live: bool,
    ) -> Result<Self, ExtractError> {
        let current = DocumentPlus {
            key,
            rst_tree: tree,
            dep_tree: rst_to_deptree(tree),
        };
        let edus = tree.leaves();
        let relations = if live {
            RelationTable::new()
        } else {
            simplify_deptree(&current.dep_tree)
        };

        let mut cache = SingleCache::new();
        for &edu in &edus {
            let mut vec = SingleEduKeys::new()?;
            vec.fill(inputs, &current, edu);
            cache.insert(edu.num, Rc::new(vec));
        }

        Ok(Self {
            current,
            edus,
            relations,
            cache: Rc::new(cache),
            i: 0,
            j: 0,
        })
    }

    /// Advance to the next ordered pair of distinct units, if any.
    fn next_pair(&mut self) -> Option<(usize, usize)> {
        let n = self.edus.len();
        while self.i < n {
            if self.j >= n {
                self.i += 1;
                self.j = 0;
                continue;
            }
            let (i, j) = (self.i, self.j);
            self.j += 1;
            if i != j {
                return Some((i, j));
            }
        }
        None
    }

    fn emit(
        &self,
        inputs: &FeatureInput,
        live: bool,
        i: usize,
        j: usize,
    ) -> Result<(ClassedVector, ClassedVector), ExtractError> {
        let edu1 = self.edus[i];
        let edu2 = self.edus[j];
        let mut vec = PairKeys::new(Some(Rc::clone(&self.cache)))?;
        vec.fill(inputs, &self.current, edu1, edu2)?;
        let vec = Rc::new(vec);

        if live {
            Ok((
                ClassedVector::unlabelled(Rc::clone(&vec)),
                ClassedVector::unlabelled(vec),
            ))
        } else {
            let pair = (edu1.num, edu2.num);
            let attachment = Label::Attachment(self.relations.contains_key(&pair));
            let relation = Label::Relation(
                self.relations
                    .get(&pair)
                    .cloned()
                    .unwrap_or_else(|| UNRELATED.to_string()),
            );
            Ok((
                ClassedVector::labelled(Rc::clone(&vec), attachment),
                ClassedVector::labelled(vec, relation),
            ))
        }
    }
}
