use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use korpus_analyze::{analyze, export_missing, export_resolved};
use korpus_db::ReferenceTables;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let usage =
        "usage: cargo run -p korpus-analyze --example pipeline -- <flexikon-rows> <corpus> <text-file>";
    let lexicon = args.next().map(PathBuf::from).context(usage)?;
    let corpus = args.next().map(PathBuf::from).context(usage)?;
    let text_path = args.next().map(PathBuf::from).context(usage)?;

    let tables = ReferenceTables::load(&lexicon, &corpus)
        .with_context(|| format!("loading {} / {}", lexicon.display(), corpus.display()))?;
    let text = fs::read_to_string(&text_path)
        .with_context(|| format!("reading {}", text_path.display()))?;

    let analysis = analyze(&text, &tables);
    println!("Tokens : {}", analysis.token_count);
    match analysis.lix {
        Some(score) => println!("LIX    : {score}"),
        None => println!("LIX    : n/a (no words)"),
    }
    println!(
        "Resolved records: {} ({} missing words)",
        analysis.reconciled.resolved_records().len(),
        analysis.reconciled.missing_words().len()
    );

    println!("\n{}", export_resolved(analysis.reconciled.resolved_records()));
    println!("Missing:\n{}", export_missing(analysis.reconciled.missing_words()));

    Ok(())
}
