use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use korpus_db::ReferenceTables;
use korpus_types::{CaseVariant, ReferenceLookup};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let usage = "usage: cargo run -p korpus-db --example stats -- <flexikon-rows> <corpus> [word...]";
    let lexicon = args.next().map(PathBuf::from).context(usage)?;
    let corpus = args.next().map(PathBuf::from).context(usage)?;

    let tables = ReferenceTables::load(&lexicon, &corpus)
        .with_context(|| format!("loading {} / {}", lexicon.display(), corpus.display()))?;

    println!("Lexicon rows   : {}", tables.lexicon_row_count());
    println!("Inflected forms: {}", tables.inflected_form_count());
    println!("Corpus rows    : {}", tables.corpus_row_count());
    println!("Corpus lemmas  : {}", tables.lemma_count());

    // Spot-check any words given on the command line.
    for word in args {
        println!("\nWord: {word}");
        let entries = tables.lookup_by_inflected_form(&word);
        if entries.is_empty() {
            println!("  not an inflected form in the lexicon");
        }
        for entry in entries {
            println!(
                "  lexicon: {} -> {} ({})",
                entry.inflected_form, entry.lemma, entry.part_of_speech
            );
        }
        for case in [CaseVariant::Exact, CaseVariant::Capitalized] {
            for row in tables.lookup_by_lemma(&word, case) {
                println!(
                    "  corpus ({case:?}): {} {} {}",
                    row.lemma, row.part_of_speech, row.relative_frequency
                );
            }
        }
    }

    Ok(())
}
