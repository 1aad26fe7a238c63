//! Splitting raw text into position-ordered, normalized word tokens.

/// A single word occurrence in the source text. Repeated words produce
/// repeated tokens; `position` is the 0-based index in the token stream and
/// is what the annotation interface uses to highlight the occurrence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub surface_form: String,
    pub position: usize,
}

/// Tokenize text into lowercase, punctuation-free words.
///
/// Sentence-ending punctuation and line breaks bound word runs first, then
/// each run splits on whitespace, then every remaining punctuation character
/// is stripped from the fragment and the rest lowercased. Fragments that end
/// up empty (consecutive delimiters, stray punctuation) are discarded, so
/// positions come out gapless.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for run in text.split(['.', '!', '?', '\n', '\r']) {
        for fragment in run.split_whitespace() {
            let word: String = fragment
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            tokens.push(Token {
                surface_form: word,
                position: tokens.len(),
            });
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str) -> Vec<String> {
        tokenize(text).into_iter().map(|t| t.surface_form).collect()
    }

    #[test]
    fn splits_sentences_and_lowercases() {
        assert_eq!(surfaces("Hunden løb. Katten sov!"), ["hunden", "løb", "katten", "sov"]);
    }

    #[test]
    fn strips_punctuation_inside_words() {
        assert_eq!(surfaces("\"Nej,\" sagde han - måske."), ["nej", "sagde", "han", "måske"]);
    }

    #[test]
    fn newlines_bound_word_runs() {
        assert_eq!(surfaces("første afsnit\r\nandet afsnit"), [
            "første", "afsnit", "andet", "afsnit"
        ]);
    }

    #[test]
    fn positions_are_gapless_from_zero() {
        let tokens = tokenize("En... to?? tre! \n\n fire");
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
    }

    #[test]
    fn repeated_words_keep_multiplicity() {
        let tokens = tokenize("ja ja ja");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.iter().all(|t| t.surface_form == "ja"));
    }

    #[test]
    fn empty_and_punctuation_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("?! ... --- \n").is_empty());
    }

    #[test]
    fn danish_letters_survive_normalization() {
        assert_eq!(surfaces("Åen løber ØSTPÅ."), ["åen", "løber", "østpå"]);
    }
}
