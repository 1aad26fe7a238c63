//! Load the two Danish lexical resources into indexed, queryable tables.
//!
//! Both resources are tab-separated files without a header row:
//!
//! - flexikon rows: `category_code \t lemma \t inflected_form`
//! - frequency corpus: `category_code \t lemma \t relative_frequency`
//!
//! [`ReferenceTables::load`] reads both once, decodes the category codes
//! through the static tables in `korpus-types`, and builds hash indices so
//! the per-token lookups of the matching pipeline are average O(1) rather
//! than a scan per query. The loaded tables are immutable for the lifetime
//! of a run.
//!
//! A row that does not split into exactly three fields, or whose frequency
//! field does not parse, is a [`LoadError::Format`] naming the file and
//! line. An unknown category code is *not* an error; it decodes to
//! `PartOfSpeech::Unclassified`.
//!
//! # Example
//! ```no_run
//! use korpus_db::ReferenceTables;
//! use korpus_types::{CaseVariant, ReferenceLookup};
//!
//! # fn main() -> Result<(), korpus_db::LoadError> {
//! let tables = ReferenceTables::load("flexikon_rows.txt", "lemma-30k-2017.txt")?;
//! for entry in tables.lookup_by_inflected_form("hunden") {
//!     println!("{} -> {} ({})", entry.inflected_form, entry.lemma, entry.part_of_speech);
//! }
//! for row in tables.lookup_by_lemma("peter", CaseVariant::Capitalized) {
//!     println!("{}: {}", row.lemma, row.relative_frequency);
//! }
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use korpus_types::{CaseVariant, CorpusEntry, LexiconEntry, PartOfSpeech, ReferenceLookup, capitalize};
use thiserror::Error;

pub mod convert;

pub use convert::convert_flexikon;

/// Fatal problems while loading a reference resource.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("{file}:{line}: {message}")]
    Format {
        file: String,
        line: usize,
        message: String,
    },
}

/// The two reference resources, loaded once and indexed for lookup.
#[derive(Debug)]
pub struct ReferenceTables {
    lexicon_rows: usize,
    corpus_rows: usize,
    by_inflected_form: HashMap<String, Vec<LexiconEntry>>,
    by_lemma: HashMap<String, Vec<CorpusEntry>>,
}

impl ReferenceTables {
    /// Load and index both resources from disk.
    pub fn load(
        lexicon_path: impl AsRef<Path>,
        corpus_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let lexicon_text = read_utf8(lexicon_path.as_ref())?;
        let corpus_text = read_utf8(corpus_path.as_ref())?;
        Self::from_strs(
            &lexicon_text,
            &file_label(lexicon_path.as_ref()),
            &corpus_text,
            &file_label(corpus_path.as_ref()),
        )
    }

    /// Parse and index both resources from already-read text. The labels
    /// only appear in error messages.
    pub fn from_strs(
        lexicon_text: &str,
        lexicon_label: &str,
        corpus_text: &str,
        corpus_label: &str,
    ) -> Result<Self, LoadError> {
        let mut by_inflected_form: HashMap<String, Vec<LexiconEntry>> = HashMap::new();
        let mut lexicon_rows = 0usize;
        for (lineno, line) in lexicon_text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (code, lemma, inflected_form) = split_row(line, lexicon_label, lineno + 1)?;
            let entry = LexiconEntry {
                part_of_speech: PartOfSpeech::from_flexikon_code(code),
                lemma: lemma.to_string(),
                inflected_form: inflected_form.to_string(),
            };
            lexicon_rows += 1;
            by_inflected_form
                .entry(entry.inflected_form.clone())
                .or_default()
                .push(entry);
        }

        let mut by_lemma: HashMap<String, Vec<CorpusEntry>> = HashMap::new();
        let mut corpus_rows = 0usize;
        for (lineno, line) in corpus_text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let (code, lemma, frequency) = split_row(line, corpus_label, lineno + 1)?;
            let relative_frequency: f64 = frequency.parse().map_err(|_| LoadError::Format {
                file: corpus_label.to_string(),
                line: lineno + 1,
                message: format!("relative frequency is not a number: {frequency:?}"),
            })?;
            let entry = CorpusEntry {
                part_of_speech: PartOfSpeech::from_corpus_code(code),
                lemma: lemma.to_string(),
                relative_frequency,
            };
            corpus_rows += 1;
            by_lemma.entry(entry.lemma.clone()).or_default().push(entry);
        }

        Ok(Self {
            lexicon_rows,
            corpus_rows,
            by_inflected_form,
            by_lemma,
        })
    }

    /// Number of lexicon rows loaded.
    pub fn lexicon_row_count(&self) -> usize {
        self.lexicon_rows
    }

    /// Number of corpus rows loaded.
    pub fn corpus_row_count(&self) -> usize {
        self.corpus_rows
    }

    /// Number of distinct inflected forms indexed.
    pub fn inflected_form_count(&self) -> usize {
        self.by_inflected_form.len()
    }

    /// Number of distinct corpus lemmas indexed.
    pub fn lemma_count(&self) -> usize {
        self.by_lemma.len()
    }

    /// Whether any lexicon row carries this inflected form.
    pub fn contains_inflected_form(&self, form: &str) -> bool {
        self.by_inflected_form.contains_key(form)
    }

    /// Whether the corpus lists this lemma, as given or capitalized.
    pub fn contains_lemma(&self, lemma: &str) -> bool {
        self.by_lemma.contains_key(lemma) || self.by_lemma.contains_key(&capitalize(lemma))
    }
}

impl ReferenceLookup for ReferenceTables {
    fn lookup_by_inflected_form(&self, form: &str) -> &[LexiconEntry] {
        static EMPTY: [LexiconEntry; 0] = [];
        self.by_inflected_form
            .get(form)
            .map(|v| v.as_slice())
            .unwrap_or(&EMPTY)
    }

    fn lookup_by_lemma(&self, lemma: &str, case: CaseVariant) -> &[CorpusEntry] {
        static EMPTY: [CorpusEntry; 0] = [];
        let entries = match case {
            CaseVariant::Exact => self.by_lemma.get(lemma),
            CaseVariant::Capitalized => self.by_lemma.get(&capitalize(lemma)),
        };
        entries.map(|v| v.as_slice()).unwrap_or(&EMPTY)
    }
}

fn read_utf8(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        file: file_label(path),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        file: file_label(path),
    })
}

fn file_label(path: &Path) -> String {
    path.display().to_string()
}

fn split_row<'a>(
    line: &'a str,
    file: &str,
    lineno: usize,
) -> Result<(&'a str, &'a str, &'a str), LoadError> {
    let mut fields = line.split('\t');
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(a), Some(b), Some(c), None) => Ok((a, b, c)),
        _ => Err(LoadError::Format {
            file: file.to_string(),
            line: lineno,
            message: format!(
                "expected 3 tab-separated fields, got {}",
                line.split('\t').count()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEXICON: &str = "S\thund\thunden\nS\thund\thunde\nV\tvære\ter\nS\ten\ter\n";
    const CORPUS: &str = "NC\thund\t120.5\nV\tvære\t9000.0\nNP\tPeter\t33.2\n";

    fn tables() -> ReferenceTables {
        ReferenceTables::from_strs(LEXICON, "lexicon", CORPUS, "corpus").expect("parse fixtures")
    }

    #[test]
    fn indexes_inflected_forms_with_ambiguity() {
        let t = tables();
        assert_eq!(t.lexicon_row_count(), 4);
        assert_eq!(t.lookup_by_inflected_form("hunden").len(), 1);
        let ambiguous = t.lookup_by_inflected_form("er");
        assert_eq!(ambiguous.len(), 2);
        assert!(ambiguous.iter().any(|e| e.lemma == "være"));
        assert!(ambiguous.iter().any(|e| e.lemma == "en"));
        assert!(t.lookup_by_inflected_form("løb").is_empty());
    }

    #[test]
    fn lemma_lookup_tries_both_case_variants() {
        let t = tables();
        assert_eq!(t.lookup_by_lemma("hund", CaseVariant::Exact).len(), 1);
        assert!(t.lookup_by_lemma("peter", CaseVariant::Exact).is_empty());
        let capitalized = t.lookup_by_lemma("peter", CaseVariant::Capitalized);
        assert_eq!(capitalized.len(), 1);
        assert_eq!(capitalized[0].lemma, "Peter");
        assert_eq!(capitalized[0].part_of_speech, PartOfSpeech::ProperNoun);
    }

    #[test]
    fn unknown_category_codes_load_as_unclassified() {
        let t = ReferenceTables::from_strs("Q\tfoo\tfoos\n", "lexicon", "ZZ\tbar\t1.0\n", "corpus")
            .expect("unknown codes must not abort the load");
        assert_eq!(
            t.lookup_by_inflected_form("foos")[0].part_of_speech,
            PartOfSpeech::Unclassified
        );
        assert_eq!(
            t.lookup_by_lemma("bar", CaseVariant::Exact)[0].part_of_speech,
            PartOfSpeech::Unclassified
        );
    }

    #[test]
    fn malformed_rows_are_format_errors() {
        let err = ReferenceTables::from_strs("S\thund\n", "lexicon", CORPUS, "corpus")
            .expect_err("two fields");
        assert!(matches!(err, LoadError::Format { line: 1, .. }));
        assert!(err.to_string().contains("lexicon:1"));

        let err = ReferenceTables::from_strs(LEXICON, "lexicon", "NC\thund\toften\n", "corpus")
            .expect_err("non-numeric frequency");
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let t = ReferenceTables::from_strs("S\thund\thunden\n\n", "lexicon", "\n", "corpus")
            .expect("trailing blank lines");
        assert_eq!(t.lexicon_row_count(), 1);
        assert_eq!(t.corpus_row_count(), 0);
    }
}
