//! Loader and dumper for feature vocabularies.
//!
//! A vocabulary maps feature names to zero-based indices. The on-disk
//! format is one `name<TAB>index` line per feature, ordered by index and
//! written one-based (the convention of libsvm-style consumers).

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a vocabulary file.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// A line that is not `name<TAB>one-based-index`.
    #[error("malformed vocabulary line {line}: {text:?}")]
    Malformed { line: usize, text: String },
}

/// Dump the vocabulary as tab-separated `name<TAB>index` lines, ordered
/// by recorded index. Indices are written one-based.
pub fn dump_vocabulary<W: Write>(
    vocabulary: &HashMap<String, usize>,
    writer: &mut W,
) -> io::Result<()> {
    let mut entries: Vec<(&str, usize)> = vocabulary
        .iter()
        .map(|(name, idx)| (name.as_str(), *idx))
        .collect();
    entries.sort_by_key(|(_, idx)| *idx);
    for (name, idx) in entries {
        writeln!(writer, "{}\t{}", name, idx + 1)?;
    }
    Ok(())
}

/// Dump the vocabulary to a file at `path`.
pub fn dump_vocabulary_to_path(
    vocabulary: &HashMap<String, usize>,
    path: &Path,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    dump_vocabulary(vocabulary, &mut writer)?;
    writer.flush()
}

/// Load a vocabulary dumped by [`dump_vocabulary`], converting the
/// one-based file indices back to zero-based.
pub fn load_vocabulary<R: BufRead>(reader: R) -> Result<HashMap<String, usize>, VocabularyError> {
    let mut vocabulary = HashMap::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let malformed = || VocabularyError::Malformed {
            line: line_no + 1,
            text: line.clone(),
        };
        let (name, idx) = line.split_once('\t').ok_or_else(malformed)?;
        let idx: usize = idx.parse().map_err(|_| malformed())?;
        if idx == 0 {
            // indices on disk are one-based
            return Err(malformed());
        }
        vocabulary.insert(name.to_string(), idx - 1);
    }
    Ok(vocabulary)
}

/// Load a vocabulary from a file at `path`.
pub fn load_vocabulary_from_path(path: &Path) -> Result<HashMap<String, usize>, VocabularyError> {
    load_vocabulary(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vocabulary() -> HashMap<String, usize> {
        let mut vocabulary = HashMap::new();
        vocabulary.insert("word_first".to_string(), 2);
        vocabulary.insert("num_tokens".to_string(), 0);
        vocabulary.insert("word_last".to_string(), 1);
        vocabulary
    }

    #[test]
    fn dump_orders_by_index_one_based() {
        let mut out = Vec::new();
        dump_vocabulary(&sample_vocabulary(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "num_tokens\t1\nword_last\t2\nword_first\t3\n");
    }

    #[test]
    fn round_trip_restores_zero_based_indices() {
        let vocabulary = sample_vocabulary();
        let mut out = Vec::new();
        dump_vocabulary(&vocabulary, &mut out).unwrap();
        let loaded = load_vocabulary(out.as_slice()).unwrap();
        assert_eq!(loaded, vocabulary);
    }

    #[test]
    fn load_rejects_missing_tab() {
        let err = load_vocabulary("word_first 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabularyError::Malformed { line: 1, .. }));
    }

    #[test]
    fn load_rejects_zero_index() {
        let err = load_vocabulary("word_first\t0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabularyError::Malformed { line: 1, .. }));
    }

    #[test]
    fn load_rejects_non_numeric_index() {
        let err = load_vocabulary("word_first\tone\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabularyError::Malformed { line: 1, .. }));
    }

    #[test]
    fn path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.tsv");
        let vocabulary = sample_vocabulary();

        dump_vocabulary_to_path(&vocabulary, &path).unwrap();
        let loaded = load_vocabulary_from_path(&path).unwrap();
        assert_eq!(loaded, vocabulary);
    }
}
