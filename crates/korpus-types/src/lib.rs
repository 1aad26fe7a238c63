//! Shared types for the Danish lexical resources this workspace consumes.
//!
//! Two differently-shaped reference tables exist: the flexikon inflection
//! lexicon (category, lemma, inflected form) and the lemma-frequency corpus
//! (category, lemma, relative frequency). Each encodes its grammatical
//! category with its own single- or two-letter code scheme, and the external
//! tagger speaks Universal Dependencies tags; all three are folded into one
//! [`PartOfSpeech`] enum here. Unknown codes map to
//! [`PartOfSpeech::Unclassified`] instead of failing, so a newer resource
//! file never aborts a load.
//!
//! ```rust
//! use korpus_types::PartOfSpeech;
//!
//! assert_eq!(PartOfSpeech::from_flexikon_code("S"), PartOfSpeech::Noun);
//! assert_eq!(PartOfSpeech::from_corpus_code("NP"), PartOfSpeech::ProperNoun);
//! assert_eq!(PartOfSpeech::from_corpus_code("??"), PartOfSpeech::Unclassified);
//! ```

use std::fmt;

/// Grammatical category, unified across the flexikon, corpus, and Universal
/// Dependencies code schemes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Adjective,
    Verb,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Numeral,
    Unique,
    Abbreviation,
    Onomatopoeia,
    Prefix,
    /// Corpus `NW`: nominal part of a multiword item.
    NounPart,
    /// Corpus `LW`: numeral part of a multiword item.
    NumeralPart,
    /// Corpus `M`: bound morphological item.
    MorphPart,
    /// Corpus `EW`: lexicalised part of a multiword item.
    LexPart,
    /// Flexikon `X`: listed in the lexicon but not categorised there.
    Unidentified,
    Adposition,
    Auxiliary,
    CoordConjunction,
    SubConjunction,
    Determiner,
    Particle,
    Punctuation,
    Symbol,
    Space,
    Other,
    /// Fallback for any code not covered by a scheme's table.
    Unclassified,
}

impl PartOfSpeech {
    /// Decode a category code from the flexikon inflection lexicon.
    pub fn from_flexikon_code(code: &str) -> Self {
        match code {
            "S" => PartOfSpeech::Noun,
            "A" => PartOfSpeech::Adjective,
            "V" => PartOfSpeech::Verb,
            "D" => PartOfSpeech::Adverb,
            "F" => PartOfSpeech::Abbreviation,
            "K" => PartOfSpeech::Conjunction,
            "L" => PartOfSpeech::Onomatopoeia,
            "O" => PartOfSpeech::Pronoun,
            "P" => PartOfSpeech::ProperNoun,
            "I" => PartOfSpeech::Prefix,
            "Æ" => PartOfSpeech::Preposition,
            "T" => PartOfSpeech::Numeral,
            "U" => PartOfSpeech::Interjection,
            "X" => PartOfSpeech::Unidentified,
            _ => PartOfSpeech::Unclassified,
        }
    }

    /// Decode a category code from the lemma-frequency corpus.
    pub fn from_corpus_code(code: &str) -> Self {
        match code {
            "A" => PartOfSpeech::Adjective,
            "C" => PartOfSpeech::Conjunction,
            "D" => PartOfSpeech::Adverb,
            "I" => PartOfSpeech::Interjection,
            "L" => PartOfSpeech::Numeral,
            "NC" => PartOfSpeech::Noun,
            "NP" => PartOfSpeech::ProperNoun,
            "P" => PartOfSpeech::Pronoun,
            "T" => PartOfSpeech::Preposition,
            "V" => PartOfSpeech::Verb,
            "U" => PartOfSpeech::Unique,
            "NW" => PartOfSpeech::NounPart,
            "LW" => PartOfSpeech::NumeralPart,
            "M" => PartOfSpeech::MorphPart,
            "EW" => PartOfSpeech::LexPart,
            _ => PartOfSpeech::Unclassified,
        }
    }

    /// Decode a Universal Dependencies tag as emitted by the external tagger.
    pub fn from_ud_tag(tag: &str) -> Self {
        match tag {
            "ADJ" => PartOfSpeech::Adjective,
            "ADP" => PartOfSpeech::Adposition,
            "ADV" => PartOfSpeech::Adverb,
            "AUX" => PartOfSpeech::Auxiliary,
            "CONJ" => PartOfSpeech::Conjunction,
            "CCONJ" => PartOfSpeech::CoordConjunction,
            "DET" => PartOfSpeech::Determiner,
            "INTJ" => PartOfSpeech::Interjection,
            "NOUN" => PartOfSpeech::Noun,
            "NUM" => PartOfSpeech::Numeral,
            "PART" => PartOfSpeech::Particle,
            "PRON" => PartOfSpeech::Pronoun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "PUNCT" => PartOfSpeech::Punctuation,
            "SCONJ" => PartOfSpeech::SubConjunction,
            "SYM" => PartOfSpeech::Symbol,
            "VERB" => PartOfSpeech::Verb,
            "X" => PartOfSpeech::Other,
            "SPACE" => PartOfSpeech::Space,
            _ => PartOfSpeech::Unclassified,
        }
    }

    /// Stable label used in exported tables.
    pub fn as_str(self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPER_NOUN",
            PartOfSpeech::Adjective => "ADJECTIVE",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Adverb => "ADVERB",
            PartOfSpeech::Pronoun => "PRONOUN",
            PartOfSpeech::Preposition => "PREPOSITION",
            PartOfSpeech::Conjunction => "CONJUNCTION",
            PartOfSpeech::Interjection => "INTERJECTION",
            PartOfSpeech::Numeral => "NUMERAL",
            PartOfSpeech::Unique => "UNIQUE",
            PartOfSpeech::Abbreviation => "ABBREVIATION",
            PartOfSpeech::Onomatopoeia => "ONOMATOPOEIC_WORD",
            PartOfSpeech::Prefix => "PREFIX",
            PartOfSpeech::NounPart => "POW_NOUN",
            PartOfSpeech::NumeralPart => "POW_NUMERAL",
            PartOfSpeech::MorphPart => "POW_MORPH_ITEM",
            PartOfSpeech::LexPart => "POW_LEX_ITEM",
            PartOfSpeech::Unidentified => "UNIDENTIFIED",
            PartOfSpeech::Adposition => "ADPOSITION",
            PartOfSpeech::Auxiliary => "AUXILIARY",
            PartOfSpeech::CoordConjunction => "COORDINATING_CONJUNCTION",
            PartOfSpeech::SubConjunction => "SUBORDINATING_CONJUNCTION",
            PartOfSpeech::Determiner => "DETERMINER",
            PartOfSpeech::Particle => "PARTICLE",
            PartOfSpeech::Punctuation => "PUNCTUATION",
            PartOfSpeech::Symbol => "SYMBOL",
            PartOfSpeech::Space => "SPACE",
            PartOfSpeech::Other => "OTHER",
            PartOfSpeech::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the flexikon inflection lexicon: a lemma, one of its inflected
/// forms, and the lexicon's category for it. A lemma maps to many inflected
/// forms, and the same inflected form may appear under several lemmas or
/// categories.
#[derive(Clone, Debug, PartialEq)]
pub struct LexiconEntry {
    pub part_of_speech: PartOfSpeech,
    pub lemma: String,
    pub inflected_form: String,
}

/// One row of the lemma-frequency corpus. Lemmas are unique per category;
/// proper-noun lemmas are stored capitalized.
#[derive(Clone, Debug, PartialEq)]
pub struct CorpusEntry {
    pub part_of_speech: PartOfSpeech,
    pub lemma: String,
    pub relative_frequency: f64,
}

/// The final exported unit: an inflected form tied to a lemma, with the
/// category and relative frequency taken from the corpus row it joined.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationRecord {
    pub lemma: String,
    pub inflected_form: String,
    pub part_of_speech: PartOfSpeech,
    pub relative_frequency: f64,
}

impl AnnotationRecord {
    /// Hashable identity for byte-for-byte deduplication (`f64` compared by
    /// bit pattern).
    pub fn dedup_key(&self) -> (String, String, PartOfSpeech, u64) {
        (
            self.lemma.clone(),
            self.inflected_form.clone(),
            self.part_of_speech,
            self.relative_frequency.to_bits(),
        )
    }
}

/// How a lemma lookup treats the first letter. Running text is lowercased
/// while proper-noun lemmas are stored capitalized, so callers probe both.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CaseVariant {
    Exact,
    Capitalized,
}

/// Read-only view over the two loaded reference tables.
///
/// The matching pipeline is written against this trait rather than a
/// concrete loader, so tests can substitute hand-built tables and the
/// algorithms stay ignorant of any storage layout.
pub trait ReferenceLookup {
    /// All lexicon rows whose inflected form equals `form` (possibly several,
    /// for true morphological ambiguity; possibly none).
    fn lookup_by_inflected_form(&self, form: &str) -> &[LexiconEntry];

    /// All corpus rows for `lemma`, either as given or with the first letter
    /// uppercased.
    fn lookup_by_lemma(&self, lemma: &str, case: CaseVariant) -> &[CorpusEntry];
}

/// Uppercase the first letter of a word, leaving the rest untouched.
/// Handles Danish æ/ø/å like any other alphabetic character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
