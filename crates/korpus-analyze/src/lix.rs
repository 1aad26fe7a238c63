//! LIX readability score.
//!
//! LIX = average sentence length + percentage of words longer than six
//! characters, rounded to the nearest whole number. Sentences are bounded
//! by `.`, `!` and `?`; word lengths are counted after stripping
//! punctuation, in characters rather than bytes so Danish letters count
//! once.

/// Compute the LIX score, or `None` for text containing no words.
pub fn lix(text: &str) -> Option<u32> {
    let mut sentences = 0usize;
    let mut words = 0usize;
    let mut long_words = 0usize;

    for sentence in text.split(['.', '!', '?']) {
        let mut any_word = false;
        for fragment in sentence.split_whitespace() {
            let len = fragment.chars().filter(|c| c.is_alphanumeric()).count();
            if len == 0 {
                continue;
            }
            any_word = true;
            words += 1;
            if len > 6 {
                long_words += 1;
            }
        }
        if any_word {
            sentences += 1;
        }
    }

    if words == 0 {
        return None;
    }
    let average_sentence_len = words as f64 / sentences as f64;
    let long_word_pct = long_words as f64 / words as f64 * 100.0;
    Some((average_sentence_len + long_word_pct).round() as u32)
}
