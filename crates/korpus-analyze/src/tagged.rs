//! Merging output from an external part-of-speech tagger.
//!
//! The tagger path replaces tokenization and the lexicon half of matching:
//! the tagger already split the text and proposed a lemma and a Universal
//! Dependencies tag per word. What remains is attaching corpus frequencies
//! to those lemmas, which reuses the same [`MatchResult`] shape and the
//! same reconciler as the lexicon path.

use korpus_types::{AnnotationRecord, CaseVariant, PartOfSpeech, ReferenceLookup};

use crate::classify::MatchResult;
use crate::reconcile::{Reconciled, reconcile};
use crate::tokenize::Token;

/// One word as emitted by the external tagger.
#[derive(Clone, Debug, PartialEq)]
pub struct TaggedWord {
    pub surface_form: String,
    pub lemma: String,
    pub part_of_speech: PartOfSpeech,
}

impl TaggedWord {
    /// Build from raw tagger output: surface text, proposed lemma, and the
    /// Universal Dependencies tag string. Surface and lemma are lowercased
    /// the same way the tokenizer lowercases running text.
    pub fn new(surface_form: &str, lemma: &str, ud_tag: &str) -> Self {
        Self {
            surface_form: surface_form.to_lowercase(),
            lemma: lemma.to_lowercase(),
            part_of_speech: PartOfSpeech::from_ud_tag(ud_tag),
        }
    }

    /// Whether this word carries linguistic content. Punctuation and
    /// whitespace tokens from the tagger are dropped before matching.
    pub fn is_content(&self) -> bool {
        !matches!(
            self.part_of_speech,
            PartOfSpeech::Punctuation | PartOfSpeech::Space
        )
    }
}

/// Classify one tagged word against the corpus.
///
/// A corpus row counts as a match only when both the lemma and the part of
/// speech agree with the tagger. A lemma the corpus lists solely under a
/// different category is reported missing rather than dropped, so the
/// missing set still accounts for every word.
pub fn classify_tagged(word: &TaggedWord, tables: &impl ReferenceLookup) -> MatchResult {
    let candidates: Vec<AnnotationRecord> = tables
        .lookup_by_lemma(&word.lemma, CaseVariant::Exact)
        .iter()
        .filter(|row| row.part_of_speech == word.part_of_speech)
        .map(|row| AnnotationRecord {
            lemma: row.lemma.clone(),
            inflected_form: word.surface_form.clone(),
            part_of_speech: row.part_of_speech,
            relative_frequency: row.relative_frequency,
        })
        .collect();

    if candidates.is_empty() {
        MatchResult::Missing {
            surface_form: word.lemma.clone(),
        }
    } else {
        MatchResult::Resolved { candidates }
    }
}

/// Run the tagger-path pipeline: drop non-content words, classify the rest
/// in order, and reconcile. Positions are assigned over the content words
/// so they line up with what the annotation interface displays.
pub fn analyze_tagged(words: &[TaggedWord], tables: &impl ReferenceLookup) -> Reconciled {
    let pairs = words
        .iter()
        .filter(|word| word.is_content())
        .enumerate()
        .map(|(position, word)| {
            let token = Token {
                surface_form: word.surface_form.clone(),
                position,
            };
            let result = classify_tagged(word, tables);
            (token, result)
        })
        .collect();
    reconcile(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use korpus_db::ReferenceTables;

    fn tables() -> ReferenceTables {
        ReferenceTables::from_strs(
            "",
            "lexicon",
            "NC\thund\t120.5\nV\tløbe\t87.1\nNC\tløbe\t1.0\n",
            "corpus",
        )
        .expect("fixture tables")
    }

    #[test]
    fn matches_on_lemma_and_category_together() {
        let word = TaggedWord::new("løb", "løbe", "VERB");
        let result = classify_tagged(&word, &tables());
        let MatchResult::Resolved { candidates } = result else {
            panic!("expected Resolved");
        };
        // Only the verb row joins; the noun reading of the lemma does not.
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].relative_frequency, 87.1);
        assert_eq!(candidates[0].inflected_form, "løb");
    }

    #[test]
    fn category_mismatch_is_missing_not_dropped() {
        let word = TaggedWord::new("hundene", "hund", "VERB");
        assert_eq!(
            classify_tagged(&word, &tables()),
            MatchResult::Missing {
                surface_form: "hund".to_string()
            }
        );
    }

    #[test]
    fn punctuation_and_space_are_filtered() {
        let words = vec![
            TaggedWord::new("Hunden", "hund", "NOUN"),
            TaggedWord::new(".", ".", "PUNCT"),
            TaggedWord::new("\n", "\n", "SPACE"),
            TaggedWord::new("løb", "løbe", "VERB"),
        ];
        let reconciled = analyze_tagged(&words, &tables());
        assert_eq!(reconciled.occurrences().len(), 2);
        let positions: Vec<usize> = reconciled.occurrences().iter().map(|o| o.position).collect();
        assert_eq!(positions, [0, 1]);
        assert_eq!(reconciled.occurrences()[1].surface_form, "løb");
    }

    #[test]
    fn tagged_results_feed_the_shared_reconciler() {
        let words = vec![
            TaggedWord::new("Hunden", "hund", "NOUN"),
            TaggedWord::new("plaskede", "plaske", "VERB"),
        ];
        let reconciled = analyze_tagged(&words, &tables());
        assert_eq!(reconciled.resolved_records().len(), 1);
        assert!(reconciled.missing_words().contains("plaske"));
        assert_eq!(reconciled.candidates_at(0).unwrap().len(), 1);
    }
}
