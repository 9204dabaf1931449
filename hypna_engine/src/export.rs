// Host-side export conventions: how a series is laid out in a saved file.

use crate::series::StepDocument;
use crate::tables::{BOOTLOADER_TEXT, SYSTEM_FILE_TEXT};
use std::fmt::Write;

/// Join a series into one text. A single document is emitted as-is; several
/// are each emitted as `=== STATE <index> ===`, the document, and a blank line.
pub fn join_series(docs: &[StepDocument]) -> String {
    if let [only] = docs {
        return only.text.clone();
    }
    let mut out = String::new();
    for doc in docs {
        // Writing into a String cannot fail.
        let _ = write!(out, "=== STATE {} ===\n{}\n\n", doc.index, doc.text);
    }
    out
}

/// Bootloader and system file texts followed by the joined series.
pub fn full_document(docs: &[StepDocument]) -> String {
    format!(
        "{BOOTLOADER_TEXT}\n\n{SYSTEM_FILE_TEXT}\n\n{}",
        join_series(docs)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Form, Mode};
    use crate::series::run;
    use hypna_lexicon::SymbolLexicon;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn series(mode: Mode) -> Vec<StepDocument> {
        let form = Form {
            mode,
            ..Form::default()
        };
        run(&form, &SymbolLexicon::empty(), &mut StdRng::seed_from_u64(5))
    }

    #[test]
    fn test_single_document_unwrapped() {
        let docs = series(Mode::Full);
        assert_eq!(docs.len(), 1);
        assert_eq!(join_series(&docs), docs[0].text);
    }

    #[test]
    fn test_multi_document_headers() {
        let docs = series(Mode::Live);
        let joined = join_series(&docs);
        assert!(joined.starts_with("=== STATE 1 ===\nHANDRAW-HUMAN\n"));
        assert!(joined.contains("\n\n=== STATE 6 ===\nHANDRAW-HUMAN\n"));
        assert!(joined.ends_with("\n\n"));
        assert_eq!(joined.matches("=== STATE ").count(), 6);
    }

    #[test]
    fn test_full_document_preamble() {
        let docs = series(Mode::Full);
        let full = full_document(&docs);
        assert!(full.starts_with(BOOTLOADER_TEXT));
        let rest = &full[BOOTLOADER_TEXT.len()..];
        assert!(rest.starts_with(&format!("\n\n{SYSTEM_FILE_TEXT}\n\n")));
        assert!(full.ends_with(&docs[0].text));
    }

    #[test]
    fn test_empty_series_joins_to_nothing() {
        assert_eq!(join_series(&[]), "");
    }
}
