//! keyrank: semantic keyword extraction for Chinese documents.

use std::path::PathBuf;

use anyhow::{bail, Context};
use keyrank_core::{KeyrankConfig, Stage};
use keyrank_ingest::BackendKind;
use keyrank_runtime::Pipeline;
use keyrank_semantic::Thesaurus;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod report;

fn resolve_dict_dir() -> PathBuf {
    std::env::var("KEYRANK_DICT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_dict = dir.join("../dict");
                if parent_dict.exists() {
                    return parent_dict;
                }
            }
            PathBuf::from("dict")
        })
}

/// Options and files following `run` or `stage <name>`.
#[derive(Debug)]
struct Inputs {
    backend: BackendKind,
    json: bool,
    files: Vec<PathBuf>,
}

/// `[--pretagged] [--json] <file>...`
fn parse_inputs(args: &[String]) -> anyhow::Result<Inputs> {
    let mut inputs = Inputs {
        backend: BackendKind::Jieba,
        json: false,
        files: Vec::new(),
    };
    for arg in args {
        match arg.as_str() {
            "--pretagged" => inputs.backend = BackendKind::Pretagged,
            "--json" => inputs.json = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            path => inputs.files.push(PathBuf::from(path)),
        }
    }
    if inputs.files.is_empty() {
        bail!("No input files given");
    }
    Ok(inputs)
}

fn print_help() {
    println!("keyrank: semantic keyword extraction");
    println!();
    println!("Usage: keyrank <command> [args]");
    println!();
    println!("Commands:");
    println!("  run [--pretagged] [--json] <file>...   Run every stage and print keywords");
    println!("  stage <name> [--pretagged] <file>...   Run one stage (preprocess, semantic, statistical, scoring)");
    println!("  show <file>                            Print persisted keywords and key phrases");
    println!("  similarity <word1> <word2>             Thesaurus similarity of two words");
    println!("  help                                   Show this help message");
    println!();
    println!("Environment:");
    println!("  KEYRANK_DICT_DIR      dictionary directory (cilin.txt, stop_words.txt, dict.txt.big, user_dict.txt)");
    println!("  KEYRANK_OUTPUT_DIR    root for artifact directories (default: next to each document)");
    println!("  KEYRANK_TOP_K         keywords per document (default 20)");
    println!("  KEYRANK_SCORE_FLOOR   minimum keyword score (default 0.1)");
    println!("  RUST_LOG              log filter (default info)");
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        print_help();
        std::process::exit(1);
    };

    let dict_dir = resolve_dict_dir();
    let config = KeyrankConfig::from_env(&dict_dir);

    match command.as_str() {
        "run" => {
            let inputs = parse_inputs(&args[2..])?;
            info!("Dictionary directory: {}", dict_dir.display());
            let pipeline = Pipeline::load(config, inputs.backend)?;
            let batch = pipeline.run_batch(&inputs.files);
            if inputs.json {
                println!("{}", serde_json::to_string_pretty(&batch)?);
            } else {
                report::print_batch(&batch);
            }
            if !batch.failures.is_empty() {
                std::process::exit(1);
            }
        }
        "stage" => {
            let Some(name) = args.get(2) else {
                bail!("Usage: keyrank stage <preprocess|semantic|statistical|scoring> [--pretagged] <file>...");
            };
            let stage: Stage = name.parse()?;
            let inputs = parse_inputs(&args[3..])?;
            let pipeline = Pipeline::load(config, inputs.backend)?;
            for file in &inputs.files {
                let stage_report = pipeline
                    .run_stage(stage, file)
                    .with_context(|| format!("{} stage failed for {}", stage, file.display()))?;
                if inputs.json {
                    println!("{}", serde_json::to_string_pretty(&stage_report)?);
                } else {
                    report::print_stage(file, &stage_report);
                }
            }
        }
        "show" => {
            let Some(file) = args.get(2) else {
                bail!("Usage: keyrank show <file>");
            };
            let path = PathBuf::from(file);
            let store = keyrank_store::ArtifactStore::for_document(&path, config.output_root.as_deref());
            if !report::print_persisted(&store) {
                eprintln!("No keywords for {}; run `keyrank run {}` first.", path.display(), file);
                std::process::exit(1);
            }
        }
        "similarity" => {
            let (Some(a), Some(b)) = (args.get(2), args.get(3)) else {
                bail!("Usage: keyrank similarity <word1> <word2>");
            };
            let thesaurus = Thesaurus::load(&config.dict_paths.thesaurus);
            for word in [a, b] {
                let codes: Vec<&str> = thesaurus.codes_of(word).iter().map(|c| c.as_str()).collect();
                if codes.is_empty() {
                    println!("{}: (not in thesaurus)", word);
                } else {
                    println!("{}: {}", word, codes.join(" "));
                }
            }
            println!("similarity: {:.6}", thesaurus.similarity(a, b));
        }
        "--help" | "-h" | "help" => print_help(),
        other => {
            eprintln!("Unknown command: {}. Use 'keyrank help' for usage.", other);
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_inputs() {
        let inputs = parse_inputs(&args(&["--pretagged", "a.txt", "--json", "b.txt"])).unwrap();
        assert_eq!(inputs.backend, BackendKind::Pretagged);
        assert!(inputs.json);
        assert_eq!(inputs.files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);

        let inputs = parse_inputs(&args(&["a.txt"])).unwrap();
        assert_eq!(inputs.backend, BackendKind::Jieba);
        assert!(!inputs.json);
    }

    #[test]
    fn test_parse_inputs_rejects_bad_args() {
        assert!(parse_inputs(&args(&[])).is_err());
        assert!(parse_inputs(&args(&["--pretagged"])).is_err());
        assert!(parse_inputs(&args(&["--verbose", "a.txt"])).is_err());
    }
}
