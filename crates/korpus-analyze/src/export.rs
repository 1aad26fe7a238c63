//! Serializing reconciled results to their stable on-the-wire form.
//!
//! Both exporters build the complete output in memory and hand back one
//! buffer; callers write it in a single operation so a failed write never
//! leaves a partial file behind.

use std::collections::BTreeSet;

use korpus_types::AnnotationRecord;

/// Render the resolved lookup table as tab-separated text with a header row.
pub fn export_resolved(records: &[AnnotationRecord]) -> String {
    let mut out = String::from("lemma\tinflected_form\tpart_of_speech\trelative_frequency\n");
    for record in records {
        out.push_str(&record.lemma);
        out.push('\t');
        out.push_str(&record.inflected_form);
        out.push('\t');
        out.push_str(record.part_of_speech.as_str());
        out.push('\t');
        out.push_str(&record.relative_frequency.to_string());
        out.push('\n');
    }
    out
}

/// Render the missing-word set, one lowercase surface form per line. The
/// set is ordered, so repeated runs emit identical bytes.
pub fn export_missing(missing: &BTreeSet<String>) -> String {
    let mut out = String::new();
    for word in missing {
        out.push_str(word);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use korpus_types::PartOfSpeech;

    #[test]
    fn resolved_table_has_header_and_rows() {
        let records = vec![AnnotationRecord {
            lemma: "hund".into(),
            inflected_form: "hunden".into(),
            part_of_speech: PartOfSpeech::Noun,
            relative_frequency: 120.5,
        }];
        assert_eq!(
            export_resolved(&records),
            "lemma\tinflected_form\tpart_of_speech\trelative_frequency\nhund\thunden\tNOUN\t120.5\n"
        );
    }

    #[test]
    fn empty_inputs_export_cleanly() {
        assert_eq!(
            export_resolved(&[]),
            "lemma\tinflected_form\tpart_of_speech\trelative_frequency\n"
        );
        assert_eq!(export_missing(&BTreeSet::new()), "");
    }

    #[test]
    fn missing_words_are_sorted_one_per_line() {
        let missing: BTreeSet<String> = ["øv", "ak", "ve"].iter().map(|s| s.to_string()).collect();
        assert_eq!(export_missing(&missing), "ak\nve\nøv\n");
    }
}
