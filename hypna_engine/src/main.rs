// Hypnagnosis prompt generator — CLI entry point.
//
// Loads a form (JSON file, starter preset, or blank form), optionally loads a
// symbol lexicon, generates the series, and writes the documents to stdout or
// a file. Logs go to stderr so stdout carries only the document.
//
// Usage:
//   cargo run -p hypna_engine --bin generate -- [form.json] [--starter]
//     [--lexicon PATH] [--seed N] [--output PATH] [--full-doc]
//   cargo run -p hypna_engine --bin generate -- --print-starter
//   cargo run -p hypna_engine --bin generate -- --list
//   cargo run -p hypna_engine --bin generate -- --import doc.txt
//
// --import reads a saved prompt document (or series export) back into form
// JSON, one form per state, printed to stdout.
//
// RUST_LOG controls verbosity (default "info"); RUST_LOG=debug shows each
// resolved step.

use hypna_engine::export::{full_document, join_series};
use hypna_engine::form::Form;
use hypna_engine::import::{ImportedDocument, import_series};
use hypna_engine::series;
use hypna_engine::tables::{HumanizerQuality, PAINTING_INFLUENCES, STYLE_TOKENS};
use hypna_lexicon::SymbolLexicon;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read form {}: {source}", path.display())]
    ReadForm {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid form JSON in {}: {source}", path.display())]
    ParseForm {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read document {}: {source}", path.display())]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize form: {0}")]
    SerializeForm(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    if has_flag(args, "--print-starter") {
        println!("{}", Form::starter().to_json_pretty()?);
        return Ok(());
    }
    if has_flag(args, "--list") {
        print_tables();
        return Ok(());
    }
    if let Some(path) = parse_flag::<PathBuf>(args, "--import") {
        return import(&path);
    }

    let form_path = args
        .get(1)
        .filter(|s| !s.starts_with("--"))
        .map(PathBuf::from);
    let lexicon_path: Option<PathBuf> = parse_flag(args, "--lexicon");
    let output_path: Option<PathBuf> = parse_flag(args, "--output");
    let seed: Option<u64> = parse_flag(args, "--seed");
    let full_doc = has_flag(args, "--full-doc");

    let form = match &form_path {
        Some(path) => load_form(path)?,
        None if has_flag(args, "--starter") => Form::starter(),
        None => Form::default(),
    };
    tracing::info!(
        form = %form_path.as_deref().map_or("<preset>".into(), |p| p.display().to_string()),
        mode = %form.mode,
        "loaded form"
    );

    let lexicon = match &lexicon_path {
        Some(path) => SymbolLexicon::load_or_empty(path),
        None => SymbolLexicon::empty(),
    };
    if form.symbols.inject && lexicon.is_empty() {
        tracing::warn!("symbol injection is on but the lexicon is empty; no symbols will be injected");
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => {
            if has_flag(args, "--seed") {
                tracing::warn!("--seed given without a usable value; series will not be reproducible");
            }
            StdRng::from_os_rng()
        }
    };

    let docs = series::run(&form, &lexicon, &mut rng);
    for doc in &docs {
        tracing::info!(
            step = doc.index,
            phase = %doc.record.phase,
            intensity = doc.record.intensity,
            transition = doc.record.phase.transition(),
            time = doc.record.phase.time_quality(),
            "generated state"
        );
    }

    let text = if full_doc {
        full_document(&docs)
    } else {
        join_series(&docs)
    };

    match output_path {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|source| CliError::WriteOutput {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), states = docs.len(), "saved");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn load_form(path: &Path) -> Result<Form, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::ReadForm {
        path: path.to_path_buf(),
        source,
    })?;
    Form::from_json(&json).map_err(|source| CliError::ParseForm {
        path: path.to_path_buf(),
        source,
    })
}

fn import(path: &Path) -> Result<(), CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadDocument {
        path: path.to_path_buf(),
        source,
    })?;
    let docs = import_series(&text);
    for (i, doc) in docs.iter().enumerate() {
        report_import(i + 1, doc);
    }
    let json = match docs.as_slice() {
        [only] => serde_json::to_string_pretty(&only.form)?,
        many => {
            let forms: Vec<&Form> = many.iter().map(|d| &d.form).collect();
            serde_json::to_string_pretty(&forms)?
        }
    };
    println!("{json}");
    tracing::info!(path = %path.display(), states = docs.len(), "imported");
    Ok(())
}

fn report_import(state: usize, doc: &ImportedDocument) {
    if !doc.complete {
        tracing::info!(state, "no HANDRAW-HUMAN header; importing as a fragment");
    }
    for issue in &doc.issues {
        tracing::warn!(state, "{issue}");
    }
    for unknown in &doc.unknown {
        let section = unknown.section.map_or("<root>", |s| s.as_str());
        tracing::warn!(
            state,
            line = unknown.line,
            section,
            key = %unknown.key,
            "unrecognized key kept out of the form"
        );
    }
}

fn print_tables() {
    println!("Style tokens:");
    let mut tokens: Vec<_> = STYLE_TOKENS.iter().collect();
    tokens.sort();
    for (token, expansion) in tokens {
        println!("  {token}: {expansion}");
    }
    println!();
    println!("Painting influences:");
    for influence in PAINTING_INFLUENCES {
        println!("  {influence}");
    }
    println!();
    println!("Humanizer qualities:");
    for quality in HumanizerQuality::ALL {
        // serde key next to the display label
        let key = serde_json::to_string(&quality).unwrap_or_default();
        println!("  {key}: {}", quality.label());
    }
}

/// Value following `flag`, parsed. A present but unparseable value is logged
/// and treated as absent.
fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    let value = args
        .iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(flag, value = %value, "ignoring unparseable flag value");
            None
        }
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flag_reads_following_value() {
        let a = args(&["generate", "form.json", "--seed", "42", "--full-doc"]);
        assert_eq!(parse_flag::<u64>(&a, "--seed"), Some(42));
        assert_eq!(parse_flag::<u64>(&a, "--missing"), None);
        assert!(has_flag(&a, "--full-doc"));
    }

    #[test]
    fn test_parse_flag_rejects_bad_seed() {
        let a = args(&["generate", "--seed", "abc"]);
        assert_eq!(parse_flag::<u64>(&a, "--seed"), None);
        assert!(has_flag(&a, "--seed"));
        let a = args(&["generate", "--seed"]);
        assert_eq!(parse_flag::<u64>(&a, "--seed"), None);
    }

    #[test]
    fn test_parse_flag_paths() {
        let a = args(&["generate", "--output", "out.txt"]);
        assert_eq!(parse_flag::<PathBuf>(&a, "--output"), Some(PathBuf::from("out.txt")));
    }
}
