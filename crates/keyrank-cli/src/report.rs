//! Console rendering of pipeline results.

use keyrank_core::Stage;
use keyrank_runtime::{BatchReport, DocumentReport, StageReport};
use keyrank_store::ArtifactStore;

pub fn print_document(report: &DocumentReport) {
    println!("=== {} ===", report.path.display());
    println!("Artifacts:          {}", report.output_dir.display());
    for stage in &report.stages {
        println!(
            "  {:<12} {:>5} candidates  {:>6}ms",
            stage.stage.as_str(),
            stage.candidate_count,
            stage.duration_ms
        );
    }

    println!();
    println!("Keywords:");
    if report.keywords.is_empty() {
        println!("  (none)");
    }
    for (i, keyword) in report.keywords.iter().enumerate() {
        println!("  {:>2}. {}\t{:.4}", i + 1, keyword.word, keyword.score);
    }

    if !report.keyphrases.is_empty() {
        println!();
        println!("Key phrases:");
        for phrase in &report.keyphrases {
            println!("  - {}\t{:.4}", phrase.word, phrase.score);
        }
    }
    println!();
}

pub fn print_batch(report: &BatchReport) {
    for doc in &report.documents {
        print_document(doc);
    }

    if !report.failures.is_empty() {
        println!("Errors:");
        for failure in &report.failures {
            println!("  - {}: {}", failure.path.display(), failure.error);
        }
        println!();
    }

    println!(
        "Status: {} succeeded, {} failed ({}ms)",
        report.documents.len(),
        report.failures.len(),
        report.duration_ms
    );
}

pub fn print_stage(path: &std::path::Path, report: &StageReport) {
    println!(
        "{}: {} stage wrote {} ({} candidates, {}ms)",
        path.display(),
        report.stage,
        report.artifacts.join(", "),
        report.candidate_count,
        report.duration_ms
    );
}

/// Print the persisted keyword and key-phrase text artifacts.
/// Returns `false` when the document has no scoring output yet.
pub fn print_persisted(store: &ArtifactStore) -> bool {
    let Some(keywords) = store.read_text(Stage::Scoring, "keywords") else {
        return false;
    };
    println!("Keywords ({}):", store.root().display());
    print!("{}", keywords);

    if let Some(phrases) = store.read_text(Stage::Scoring, "keyphrases") {
        if !phrases.is_empty() {
            println!();
            println!("Key phrases:");
            print!("{}", phrases);
        }
    }
    true
}
