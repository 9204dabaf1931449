// Error type for lexicon loading.
//
// Only the strict loaders (`from_json`, `load`) surface these. The engine
// itself goes through `load_or_empty` and never sees an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    /// The lexicon file could not be read.
    #[error("cannot read lexicon {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid JSON.
    #[error("lexicon is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Valid JSON, but the top level is not an object.
    #[error("lexicon must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}
