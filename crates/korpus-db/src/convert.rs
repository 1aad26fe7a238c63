//! One-time conversion of the raw flexikon distribution into the row format
//! [`crate::ReferenceTables`] consumes.
//!
//! The raw file is a sequence of blocks separated by `*` lines. Each block
//! starts with the lemma on its own line, then the category code, then one
//! inflection per line where the inflected form is the second tab-separated
//! field:
//!
//! ```text
//! *
//! hund
//! S
//! 1\thund
//! 2\thunden
//! 3\thunde
//! ```
//!
//! The output is the flat `code \t lemma \t inflected_form` table.

use crate::LoadError;

/// Convert raw flexikon text to the three-column rows format.
pub fn convert_flexikon(raw: &str) -> Result<String, LoadError> {
    let body = raw.strip_prefix("*\n").unwrap_or(raw);
    let mut out = String::new();
    let mut lineno = 1usize; // the stripped leading "*" line

    for block in body.split("\n*\n") {
        let mut lines = block.lines();
        let lemma = match lines.next() {
            Some(l) if !l.is_empty() => l,
            _ => {
                // Trailing separator or empty block at end of file.
                lineno += block.lines().count() + 1;
                continue;
            }
        };
        let code = lines.next().ok_or_else(|| LoadError::Format {
            file: "flexikon".to_string(),
            line: lineno + 1,
            message: format!("block for {lemma:?} has no category line"),
        })?;
        for (offset, inflection) in lines.enumerate() {
            let form = inflection
                .split('\t')
                .nth(1)
                .ok_or_else(|| LoadError::Format {
                    file: "flexikon".to_string(),
                    line: lineno + 2 + offset,
                    message: format!("inflection row has no tab-separated form: {inflection:?}"),
                })?;
            out.push_str(code);
            out.push('\t');
            out.push_str(lemma);
            out.push('\t');
            out.push_str(form);
            out.push('\n');
        }
        lineno += block.lines().count() + 1;
    }

    Ok(out)
}
