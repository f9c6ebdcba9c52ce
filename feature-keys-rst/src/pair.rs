//! Features computed over an ordered pair of EDUs.
//!
//! Pair-level sub-groups (grouping key, gap features) are evaluated
//! directly; the two per-unit sub-vectors are *not* recomputed but
//! looked up from the per-document cache built by the extraction driver.
//! Output appends the unit sub-vectors after the pair-level columns,
//! suffixed `_EDU1` / `_EDU2`.

use crate::corpus::Edu;
use crate::extract::{DocumentPlus, ExtractError, FeatureInput, SingleCache};
use crate::single::SingleEduKeys;
use feature_keys::{FeatureValue, KeyError, KeyGroup, MagicKey, MergedKeyGroup};
use std::rc::Rc;

/// Uniform call signature for pair feature functions.
pub type PairFeatureFn = fn(&FeatureInput, &DocumentPlus<'_>, &Edu, &Edu) -> FeatureValue;

/// Which corpus document this pair appears in. Downstream consumers
/// partition output records by this key.
fn feat_grouping(
    _inputs: &FeatureInput,
    current: &DocumentPlus<'_>,
    _edu1: &Edu,
    _edu2: &Edu,
) -> FeatureValue {
    FeatureValue::Str(current.key.doc.clone())
}

/// Number of EDUs strictly between the two, in document order.
/// Direction-insensitive.
fn num_edus_between(
    _inputs: &FeatureInput,
    _current: &DocumentPlus<'_>,
    edu1: &Edu,
    edu2: &Edu,
) -> FeatureValue {
    FeatureValue::Int((edu2.num as i64 - edu1.num as i64).abs() - 1)
}

fn core_subgroup() -> Result<KeyGroup<PairFeatureFn>, KeyError> {
    KeyGroup::new(
        "core features",
        vec![MagicKey::meta("grouping", feat_grouping as PairFeatureFn)],
    )
}

fn gap_subgroup() -> Result<KeyGroup<PairFeatureFn>, KeyError> {
    KeyGroup::new(
        "the gap between EDUs",
        vec![MagicKey::continuous(
            "num_edus_between",
            num_edus_between as PairFeatureFn,
        )],
    )
}

/// The merged pair feature vector.
///
/// Composes the core and gap sub-groups plus the two cached unit
/// sub-vectors. Construct with `cache: None` only to generate headers or
/// help text; filling such an instance is an invariant violation.
#[derive(Debug, Clone)]
pub struct PairKeys {
    merged: MergedKeyGroup<PairFeatureFn>,
    cache: Option<Rc<SingleCache>>,
    /// Unfilled schema standing in for the unit sub-vectors until a fill
    /// resolves them; keeps headers, values, and help text available.
    edu_schema: SingleEduKeys,
    edu1: Option<Rc<SingleEduKeys>>,
    edu2: Option<Rc<SingleEduKeys>>,
}

impl PairKeys {
    pub fn new(cache: Option<Rc<SingleCache>>) -> Result<Self, KeyError> {
        let merged = MergedKeyGroup::new("pair features", vec![core_subgroup()?, gap_subgroup()?])?;
        Ok(Self {
            merged,
            cache,
            edu_schema: SingleEduKeys::new()?,
            edu1: None,
            edu2: None,
        })
    }

    /// Evaluate the pair-level keys and resolve both unit sub-vectors
    /// from the cache.
    pub fn fill(
        &mut self,
        inputs: &FeatureInput,
        current: &DocumentPlus<'_>,
        edu1: &Edu,
        edu2: &Edu,
    ) -> Result<(), ExtractError> {
        let cache = self
            .cache
            .as_ref()
            .ok_or(ExtractError::FilledWithoutCache)?;
        self.edu1 = Some(lookup(cache, current, edu1)?);
        self.edu2 = Some(lookup(cache, current, edu2)?);
        self.merged
            .fill_with(|key| (key.function())(inputs, current, edu1, edu2));
        Ok(())
    }

    /// Pair-level columns, then the unit sub-vectors' columns suffixed
    /// `_EDU1` and `_EDU2`.
    pub fn csv_headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = self
            .merged
            .csv_headers()
            .iter()
            .map(|header| header.to_string())
            .collect();
        let unit = self.edu_schema.csv_headers();
        headers.extend(unit.iter().map(|header| format!("{}_EDU1", header)));
        headers.extend(unit.iter().map(|header| format!("{}_EDU2", header)));
        headers
    }

    /// Values matching `csv_headers()` position for position.
    pub fn csv_values(&self) -> Vec<FeatureValue> {
        let mut values: Vec<FeatureValue> = self.merged.csv_values().to_vec();
        let unit1 = self.edu1.as_deref().unwrap_or(&self.edu_schema);
        let unit2 = self.edu2.as_deref().unwrap_or(&self.edu_schema);
        values.extend(unit1.csv_values().iter().cloned());
        values.extend(unit2.csv_values().iter().cloned());
        values
    }

    /// Look up a filled pair-level value by header name.
    pub fn value(&self, name: &str) -> Option<&FeatureValue> {
        self.merged.value(name)
    }

    /// The cached sub-vector for the first unit, once filled.
    pub fn edu1(&self) -> Option<&SingleEduKeys> {
        self.edu1.as_deref()
    }

    /// The cached sub-vector for the second unit, once filled.
    pub fn edu2(&self) -> Option<&SingleEduKeys> {
        self.edu2.as_deref()
    }

    pub fn help_text(&self) -> String {
        format!(
            "{}\n\n{}",
            self.merged.help_text(),
            self.edu_schema.help_text()
        )
    }
}

fn lookup(
    cache: &SingleCache,
    current: &DocumentPlus<'_>,
    edu: &Edu,
) -> Result<Rc<SingleEduKeys>, ExtractError> {
    cache
        .get(&edu.num)
        .cloned()
        .ok_or_else(|| ExtractError::CacheMiss {
            doc: current.key.doc.clone(),
            edu: edu.num,
        })
}
