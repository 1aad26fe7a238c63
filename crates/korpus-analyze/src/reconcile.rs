//! Merging per-token match results into the final annotated dataset.

use std::collections::{BTreeSet, HashMap, HashSet};

use korpus_types::{AnnotationRecord, PartOfSpeech};

use crate::classify::MatchResult;
use crate::tokenize::Token;

/// How one token occurrence came out of matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OccurrenceKind {
    Resolved,
    CorpusOnly,
    Missing,
}

/// One token occurrence in original text order, tagged with its outcome.
#[derive(Clone, Debug)]
pub struct Occurrence {
    pub position: usize,
    pub surface_form: String,
    pub kind: OccurrenceKind,
}

/// The reconciled result of a run: occurrences in positional order, the
/// deduplicated resolved table, the per-surface candidate sets the
/// annotation interface queries, and the missing-word set.
///
/// Invariants: no surface form is both resolved and missing, and together
/// they cover every distinct surface form that was tokenized.
#[derive(Debug, Default)]
pub struct Reconciled {
    occurrences: Vec<Occurrence>,
    resolved: Vec<AnnotationRecord>,
    by_surface: HashMap<String, Vec<AnnotationRecord>>,
    missing: BTreeSet<String>,
}

impl Reconciled {
    /// Every token occurrence, sorted by position.
    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// The resolved lookup table: byte-identical records collapsed, ordered
    /// by first appearance in the text.
    pub fn resolved_records(&self) -> &[AnnotationRecord] {
        &self.resolved
    }

    /// Distinct surface forms found in neither reference table. Ordered, so
    /// exports are reproducible.
    pub fn missing_words(&self) -> &BTreeSet<String> {
        &self.missing
    }

    /// Candidate records for a surface form; empty for missing or unseen
    /// words.
    pub fn candidates_for(&self, surface_form: &str) -> &[AnnotationRecord] {
        static EMPTY: [AnnotationRecord; 0] = [];
        self.by_surface
            .get(surface_form)
            .map(|v| v.as_slice())
            .unwrap_or(&EMPTY)
    }

    /// Candidate records for the occurrence at a token position, or `None`
    /// for a position that was never tokenized. This is the per-position
    /// retrieval the annotation interface is built on.
    pub fn candidates_at(&self, position: usize) -> Option<&[AnnotationRecord]> {
        let occurrence = self.occurrences.get(position)?;
        Some(self.candidates_for(&occurrence.surface_form))
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Reconcile classified tokens into a [`Reconciled`] dataset.
///
/// Pairs are re-sorted by token position first, so callers that classified
/// out of order (or in parallel) still get deterministic output. Every
/// occurrence ends up either with candidate records or in the missing set;
/// nothing is dropped.
pub fn reconcile(mut pairs: Vec<(Token, MatchResult)>) -> Reconciled {
    pairs.sort_by_key(|(token, _)| token.position);

    let mut out = Reconciled::default();
    let mut seen: HashSet<(String, String, PartOfSpeech, u64)> = HashSet::new();

    for (token, result) in pairs {
        let (kind, candidates) = match result {
            MatchResult::Resolved { candidates } => (OccurrenceKind::Resolved, candidates),
            MatchResult::CorpusOnly { candidates } => (OccurrenceKind::CorpusOnly, candidates),
            MatchResult::Missing { surface_form } => {
                out.missing.insert(surface_form);
                out.occurrences.push(Occurrence {
                    position: token.position,
                    surface_form: token.surface_form,
                    kind: OccurrenceKind::Missing,
                });
                continue;
            }
        };

        for record in candidates {
            if seen.insert(record.dedup_key()) {
                out.resolved.push(record.clone());
            }
            let per_surface = out.by_surface.entry(token.surface_form.clone()).or_default();
            if !per_surface.contains(&record) {
                per_surface.push(record);
            }
        }
        out.occurrences.push(Occurrence {
            position: token.position,
            surface_form: token.surface_form,
            kind,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(surface: &str, position: usize) -> Token {
        Token {
            surface_form: surface.to_string(),
            position,
        }
    }

    fn record(lemma: &str, inflected: &str, freq: f64) -> AnnotationRecord {
        AnnotationRecord {
            lemma: lemma.to_string(),
            inflected_form: inflected.to_string(),
            part_of_speech: PartOfSpeech::Noun,
            relative_frequency: freq,
        }
    }

    #[test]
    fn repeated_words_collapse_in_the_resolved_table() {
        let pairs = vec![
            (
                token("hunden", 0),
                MatchResult::Resolved {
                    candidates: vec![record("hund", "hunden", 120.5)],
                },
            ),
            (
                token("hunden", 1),
                MatchResult::Resolved {
                    candidates: vec![record("hund", "hunden", 120.5)],
                },
            ),
        ];
        let reconciled = reconcile(pairs);
        assert_eq!(reconciled.resolved_records().len(), 1);
        assert_eq!(reconciled.occurrences().len(), 2);
        assert_eq!(reconciled.candidates_for("hunden").len(), 1);
    }

    #[test]
    fn out_of_order_input_is_resorted_by_position() {
        let pairs = vec![
            (
                token("anden", 1),
                MatchResult::Missing {
                    surface_form: "anden".to_string(),
                },
            ),
            (
                token("første", 0),
                MatchResult::Resolved {
                    candidates: vec![record("første", "første", 1.0)],
                },
            ),
        ];
        let reconciled = reconcile(pairs);
        let order: Vec<usize> = reconciled.occurrences().iter().map(|o| o.position).collect();
        assert_eq!(order, [0, 1]);
        assert_eq!(reconciled.occurrences()[0].kind, OccurrenceKind::Resolved);
    }

    #[test]
    fn missing_is_a_set_not_a_list() {
        let pairs = vec![
            (
                token("xyzzy", 0),
                MatchResult::Missing {
                    surface_form: "xyzzy".to_string(),
                },
            ),
            (
                token("xyzzy", 1),
                MatchResult::Missing {
                    surface_form: "xyzzy".to_string(),
                },
            ),
        ];
        let reconciled = reconcile(pairs);
        assert_eq!(reconciled.missing_words().len(), 1);
        assert_eq!(reconciled.occurrences().len(), 2);
    }

    #[test]
    fn resolved_and_missing_are_disjoint() {
        let pairs = vec![
            (
                token("hunden", 0),
                MatchResult::Resolved {
                    candidates: vec![record("hund", "hunden", 120.5)],
                },
            ),
            (
                token("løb", 1),
                MatchResult::Missing {
                    surface_form: "løb".to_string(),
                },
            ),
        ];
        let reconciled = reconcile(pairs);
        for word in reconciled.missing_words() {
            assert!(reconciled.candidates_for(word).is_empty());
        }
        assert!(!reconciled.missing_words().contains("hunden"));
    }

    #[test]
    fn candidates_at_follows_positions() {
        let pairs = vec![
            (
                token("er", 0),
                MatchResult::Resolved {
                    candidates: vec![record("være", "er", 9000.0), record("en", "er", 15.0)],
                },
            ),
            (
                token("plusk", 1),
                MatchResult::Missing {
                    surface_form: "plusk".to_string(),
                },
            ),
        ];
        let reconciled = reconcile(pairs);
        assert_eq!(reconciled.candidates_at(0).unwrap().len(), 2);
        assert!(reconciled.candidates_at(1).unwrap().is_empty());
        assert!(reconciled.candidates_at(2).is_none());
    }
}
