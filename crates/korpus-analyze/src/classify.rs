//! Per-token classification against the reference tables.

use korpus_types::{AnnotationRecord, CaseVariant, ReferenceLookup};

use crate::tokenize::Token;

/// Outcome of looking one token up across both reference tables. Exactly one
/// variant per token; "no match" is the [`MatchResult::Missing`] value, not
/// an error.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchResult {
    /// The token is a known inflected form and at least one corpus row
    /// supplies a frequency for its lemma. Ambiguous inflections yield one
    /// candidate per (lexicon row, corpus row) pair; downstream manual
    /// annotation picks between them.
    Resolved { candidates: Vec<AnnotationRecord> },
    /// Not in the lexicon, but the corpus lists the surface form as a lemma
    /// (capitalized rows win over exact ones when both exist, since
    /// proper-noun lemmas are stored capitalized).
    CorpusOnly { candidates: Vec<AnnotationRecord> },
    /// Found in neither table, or found in the lexicon with no corpus row to
    /// supply a frequency. A record without a frequency is useless to the
    /// annotator, so those land in the missing set too.
    Missing { surface_form: String },
}

/// Classify one token. Pure function of the token and the immutable tables,
/// so per-token classification may be reordered or parallelized freely.
pub fn classify(token: &Token, tables: &impl ReferenceLookup) -> MatchResult {
    let lexicon_entries = tables.lookup_by_inflected_form(&token.surface_form);

    if lexicon_entries.is_empty() {
        let capitalized = tables.lookup_by_lemma(&token.surface_form, CaseVariant::Capitalized);
        let corpus_entries = if capitalized.is_empty() {
            tables.lookup_by_lemma(&token.surface_form, CaseVariant::Exact)
        } else {
            capitalized
        };
        if corpus_entries.is_empty() {
            return MatchResult::Missing {
                surface_form: token.surface_form.clone(),
            };
        }
        let candidates = corpus_entries
            .iter()
            .map(|row| AnnotationRecord {
                lemma: row.lemma.clone(),
                // The corpus row is its own inflected form, lowercased to
                // line up with the surface form it matched.
                inflected_form: row.lemma.to_lowercase(),
                part_of_speech: row.part_of_speech,
                relative_frequency: row.relative_frequency,
            })
            .collect();
        return MatchResult::CorpusOnly { candidates };
    }

    // Cross-join every lexicon candidate with the corpus rows sharing its
    // lemma; the frequency and the category both come from the corpus side.
    let mut candidates = Vec::new();
    for entry in lexicon_entries {
        for row in tables.lookup_by_lemma(&entry.lemma, CaseVariant::Exact) {
            candidates.push(AnnotationRecord {
                lemma: row.lemma.clone(),
                inflected_form: entry.inflected_form.clone(),
                part_of_speech: row.part_of_speech,
                relative_frequency: row.relative_frequency,
            });
        }
    }

    if candidates.is_empty() {
        MatchResult::Missing {
            surface_form: token.surface_form.clone(),
        }
    } else {
        MatchResult::Resolved { candidates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korpus_db::ReferenceTables;
    use korpus_types::PartOfSpeech;

    fn token(surface: &str) -> Token {
        Token {
            surface_form: surface.to_string(),
            position: 0,
        }
    }

    fn tables() -> ReferenceTables {
        ReferenceTables::from_strs(
            concat!(
                "S\thund\thunden\n",
                "V\tvære\ter\n",
                "S\ten\ter\n",
                "S\tsjælden\tsjældne\n", // lemma absent from the corpus
            ),
            "lexicon",
            concat!(
                "NC\thund\t120.5\n",
                "V\tvære\t9000.0\n",
                "NC\ten\t15.0\n",
                "NP\tPeter\t33.2\n",
                "NC\tfisk\t55.0\n",
                "NP\tFisk\t2.5\n", // surname; collides with the common noun
            ),
            "corpus",
        )
        .expect("fixture tables")
    }

    #[test]
    fn lexicon_hit_joins_corpus_frequency() {
        let result = classify(&token("hunden"), &tables());
        let MatchResult::Resolved { candidates } = result else {
            panic!("expected Resolved, got {result:?}");
        };
        assert_eq!(candidates.len(), 1);
        let record = &candidates[0];
        assert_eq!(record.lemma, "hund");
        assert_eq!(record.inflected_form, "hunden");
        assert_eq!(record.part_of_speech, PartOfSpeech::Noun);
        assert_eq!(record.relative_frequency, 120.5);
    }

    #[test]
    fn ambiguous_inflection_keeps_all_candidates() {
        let result = classify(&token("er"), &tables());
        let MatchResult::Resolved { candidates } = result else {
            panic!("expected Resolved");
        };
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().any(|r| r.lemma == "være"));
        assert!(candidates.iter().any(|r| r.lemma == "en"));
    }

    #[test]
    fn corpus_only_prefers_capitalized_lemma() {
        let result = classify(&token("peter"), &tables());
        let MatchResult::CorpusOnly { candidates } = result else {
            panic!("expected CorpusOnly");
        };
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lemma, "Peter");
        assert_eq!(candidates[0].inflected_form, "peter");
        assert_eq!(candidates[0].part_of_speech, PartOfSpeech::ProperNoun);
    }

    #[test]
    fn capitalized_wins_when_both_case_variants_match() {
        // "fisk" exists both as the common noun and as the capitalized
        // surname. Policy: the capitalized rows are taken.
        let result = classify(&token("fisk"), &tables());
        let MatchResult::CorpusOnly { candidates } = result else {
            panic!("expected CorpusOnly");
        };
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lemma, "Fisk");
        assert_eq!(candidates[0].part_of_speech, PartOfSpeech::ProperNoun);
    }

    #[test]
    fn absent_everywhere_is_missing() {
        assert_eq!(
            classify(&token("løb"), &tables()),
            MatchResult::Missing {
                surface_form: "løb".to_string()
            }
        );
    }

    #[test]
    fn lexicon_hit_without_frequency_is_missing() {
        // "sjældne" resolves in the lexicon, but no corpus row carries the
        // lemma "sjælden", so there is no frequency to attach.
        assert_eq!(
            classify(&token("sjældne"), &tables()),
            MatchResult::Missing {
                surface_form: "sjældne".to_string()
            }
        );
    }
}
