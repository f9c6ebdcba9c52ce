//! Features computed over a single EDU.
//!
//! Two sub-groups: identification metadata (span offsets, a globally
//! unique id) and properties of the normalized unit text. [`SingleEduKeys`]
//! merges them, in that order, into the per-unit vector the pair
//! extractor caches.

use crate::corpus::Edu;
use crate::extract::{DocumentPlus, FeatureInput};
use feature_keys::{FeatureValue, KeyError, KeyGroup, MagicKey, MergedKeyGroup};
use once_cell::sync::Lazy;
use regex::Regex;

/// Uniform call signature for single-EDU feature functions.
pub type SingleFeatureFn = fn(&FeatureInput, &DocumentPlus<'_>, &Edu) -> FeatureValue;

static TRAILING_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.|<P>|,)*$").expect("trailing markup pattern"));
static LEADING_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^\"").expect("leading quote pattern"));

/// Strip annotation metadata from EDU text: the trailing run of
/// sentence-final punctuation and `<P>` markers, and a single leading
/// quote.
pub fn clean_edu_text(text: &str) -> String {
    let cleaned = TRAILING_MARKUP.replace_all(text, "");
    LEADING_QUOTE.replace(&cleaned, "").into_owned()
}

/// Normalized tokens of an EDU: cleaned text, whitespace-split,
/// lower-cased. May be empty when the text is all markup.
pub fn edu_tokens(edu: &Edu) -> Vec<String> {
    clean_edu_text(&edu.text)
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Globally unique identifier for the EDU.
fn feat_id(_inputs: &FeatureInput, current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    FeatureValue::Str(format!("{}_{}", current.key, edu.num))
}

/// Character-span start offset.
fn feat_start(_inputs: &FeatureInput, _current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    edu.span.char_start.into()
}

/// Character-span end offset.
fn feat_end(_inputs: &FeatureInput, _current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    edu.span.char_end.into()
}

/// First normalized token, or missing when there is none.
fn word_first(_inputs: &FeatureInput, _current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    edu_tokens(edu).into_iter().next().into()
}

/// Last normalized token, or missing when there is none.
fn word_last(_inputs: &FeatureInput, _current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    let mut tokens = edu_tokens(edu);
    tokens.pop().into()
}

/// Number of normalized tokens.
fn num_tokens(_inputs: &FeatureInput, _current: &DocumentPlus<'_>, edu: &Edu) -> FeatureValue {
    edu_tokens(edu).len().into()
}

fn meta_subgroup() -> Result<KeyGroup<SingleFeatureFn>, KeyError> {
    KeyGroup::new(
        "basic EDU identification features",
        vec![
            MagicKey::meta("id", feat_id as SingleFeatureFn),
            MagicKey::meta("start", feat_start),
            MagicKey::meta("end", feat_end),
        ],
    )
}

fn text_subgroup() -> Result<KeyGroup<SingleFeatureFn>, KeyError> {
    KeyGroup::new(
        "properties of the EDU text itself",
        vec![
            MagicKey::discrete("word_first", word_first as SingleFeatureFn),
            MagicKey::discrete("word_last", word_last),
            MagicKey::continuous("num_tokens", num_tokens),
        ],
    )
}

/// The merged single-EDU feature vector: identification metadata, then
/// text properties.
#[derive(Debug, Clone)]
pub struct SingleEduKeys {
    merged: MergedKeyGroup<SingleFeatureFn>,
}

impl SingleEduKeys {
    pub fn new() -> Result<Self, KeyError> {
        let merged = MergedKeyGroup::new(
            "single EDU features",
            vec![meta_subgroup()?, text_subgroup()?],
        )?;
        Ok(Self { merged })
    }

    /// Evaluate every key against the given EDU, each sub-group in turn.
    pub fn fill(&mut self, inputs: &FeatureInput, current: &DocumentPlus<'_>, edu: &Edu) {
        self.merged
            .fill_with(|key| (key.function())(inputs, current, edu));
    }

    pub fn csv_headers(&self) -> Vec<&'static str> {
        self.merged.csv_headers()
    }

    pub fn csv_values(&self) -> &[FeatureValue] {
        self.merged.csv_values()
    }

    /// Look up a filled value by header name.
    pub fn value(&self, name: &str) -> Option<&FeatureValue> {
        self.merged.value(name)
    }

    pub fn help_text(&self) -> String {
        self.merged.help_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Corpus, DocKey};
    use crate::extract::preprocess;
    use crate::tree::RstTree;

    fn inputs_with_one_edu(text: &str) -> FeatureInput {
        let mut corpus = Corpus::new();
        corpus.insert(
            DocKey::new("doc1.out"),
            RstTree::leaf(Edu::new(1, text, 4, 4 + text.len())),
        );
        FeatureInput {
            corpus,
            debug: false,
        }
    }

    #[test]
    fn clean_text_strips_markup_and_quote() {
        assert_eq!(clean_edu_text("Hello there.<P>"), "Hello there");
        assert_eq!(clean_edu_text("\"Quoted start"), "Quoted start");
        assert_eq!(clean_edu_text("no markup"), "no markup");
        assert_eq!(clean_edu_text(",,,"), "");
    }

    #[test]
    fn tokens_are_normalized() {
        let edu = Edu::new(1, "Hello there.<P>", 0, 15);
        assert_eq!(edu_tokens(&edu), vec!["hello", "there"]);
    }

    #[test]
    fn all_markup_text_has_no_tokens() {
        let edu = Edu::new(1, ",,,", 0, 3);
        assert!(edu_tokens(&edu).is_empty());
    }

    #[test]
    fn headers_follow_subgroup_then_key_order() {
        let vec = SingleEduKeys::new().unwrap();
        insta::assert_debug_snapshot!(vec.csv_headers(), @r###"
        [
            "id",
            "start",
            "end",
            "word_first",
            "word_last",
            "num_tokens",
        ]
        "###);
        assert_eq!(vec.csv_headers().len(), vec.csv_values().len());
    }

    #[test]
    fn fill_computes_every_feature() {
        let inputs = inputs_with_one_edu("Hello there.<P>");
        let key = DocKey::new("doc1.out");
        let current = preprocess(&inputs, &key).unwrap();
        let edu = current.rst_tree.leaves()[0];

        let mut vec = SingleEduKeys::new().unwrap();
        vec.fill(&inputs, &current, edu);

        assert_eq!(vec.value("id"), Some(&FeatureValue::Str("doc1.out_1".into())));
        assert_eq!(vec.value("start"), Some(&FeatureValue::Int(4)));
        assert_eq!(vec.value("end"), Some(&FeatureValue::Int(19)));
        assert_eq!(
            vec.value("word_first"),
            Some(&FeatureValue::Str("hello".into()))
        );
        assert_eq!(
            vec.value("word_last"),
            Some(&FeatureValue::Str("there".into()))
        );
        assert_eq!(vec.value("num_tokens"), Some(&FeatureValue::Int(2)));
    }

    #[test]
    fn degenerate_text_yields_missing_words_not_errors() {
        let inputs = inputs_with_one_edu(",,,");
        let key = DocKey::new("doc1.out");
        let current = preprocess(&inputs, &key).unwrap();
        let edu = current.rst_tree.leaves()[0];

        let mut vec = SingleEduKeys::new().unwrap();
        vec.fill(&inputs, &current, edu);

        assert_eq!(vec.value("word_first"), Some(&FeatureValue::Missing));
        assert_eq!(vec.value("word_last"), Some(&FeatureValue::Missing));
        assert_eq!(vec.value("num_tokens"), Some(&FeatureValue::Int(0)));
    }

    #[test]
    fn help_text_available_without_data() {
        let vec = SingleEduKeys::new().unwrap();
        let help = vec.help_text();
        assert!(help.starts_with("single EDU features"));
        assert!(help.contains("basic EDU identification features"));
        assert!(help.contains("[discrete] word_first"));
        assert!(help.contains("[continuous] num_tokens"));
    }
}
