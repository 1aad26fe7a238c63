//! The word-resolution pipeline for Danish corpus annotation.
//!
//! Free text is tokenized into position-ordered lowercase words, every token
//! is classified against the two reference tables (inflection lexicon and
//! lemma-frequency corpus), and the per-token results are reconciled into a
//! deduplicated table of annotation candidates plus a set of missing words.
//! The pipeline is pure: it operates on any [`ReferenceLookup`]
//! implementation and owns no state between runs, so a run on identical
//! input always produces byte-identical exports.
//!
//! The stages compose as `tokenize -> classify -> reconcile -> export`;
//! [`analyze`] runs them end to end and throws in the LIX readability score
//! of the raw text. Output from an external part-of-speech tagger can be
//! merged through the same reconciler via [`tagged::analyze_tagged`].
//!
//! # Example
//! ```
//! use korpus_analyze::analyze;
//! use korpus_db::ReferenceTables;
//!
//! let tables = ReferenceTables::from_strs(
//!     "S\thund\thunden\n",
//!     "lexicon",
//!     "NC\thund\t120.5\n",
//!     "corpus",
//! ).unwrap();
//!
//! let analysis = analyze("Hunden løb.", &tables);
//! assert_eq!(analysis.token_count, 2);
//! assert_eq!(analysis.reconciled.resolved_records().len(), 1);
//! assert!(analysis.reconciled.missing_words().contains("løb"));
//! ```

use korpus_types::ReferenceLookup;

pub mod classify;
pub mod export;
pub mod lix;
pub mod reconcile;
pub mod tagged;
pub mod tokenize;

pub use classify::{MatchResult, classify};
pub use export::{export_missing, export_resolved};
pub use lix::lix;
pub use reconcile::{Occurrence, OccurrenceKind, Reconciled, reconcile};
pub use tokenize::{Token, tokenize};

/// Everything one pipeline run produces.
pub struct Analysis {
    /// Tokens found in the text, multiplicity included. Zero means the
    /// input was empty; callers report that but treat it as an empty result,
    /// not a failure.
    pub token_count: usize,
    /// LIX readability score of the raw text, when it contains any words.
    pub lix: Option<u32>,
    pub reconciled: Reconciled,
}

/// Run the full pipeline on raw text.
pub fn analyze(text: &str, tables: &impl ReferenceLookup) -> Analysis {
    let tokens = tokenize(text);
    let token_count = tokens.len();
    let pairs = tokens
        .into_iter()
        .map(|token| {
            let result = classify(&token, tables);
            (token, result)
        })
        .collect();
    Analysis {
        token_count,
        lix: lix(text),
        reconciled: reconcile(pairs),
    }
}
