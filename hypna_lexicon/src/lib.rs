// Symbol lexicon for the Hypnagnosis prompt engine.
//
// A lexicon is a flat name→value mapping supplied by the host (usually a JSON
// object on disk). The engine never edits it; it only samples a few distinct
// entries per series step and renders them into the symbol-injection line of
// the prompt document.
//
// Loading follows the same pattern as the rest of the workspace: JSON string
// in, typed struct out (`SymbolLexicon::from_json()`), with a file-path
// convenience on top. Hosts that want the "never fail" policy call
// `SymbolLexicon::load_or_empty()`, which logs the problem and hands back an
// empty lexicon so symbol injection silently becomes a no-op.
//
// Entries are kept in a `BTreeMap`, so iteration order is the sorted key order
// regardless of the file layout. Sampling with a seeded `StdRng` is therefore
// reproducible across runs and platforms.
//
// See also: `hypna_engine::resolve`, the only caller of `sample()`.

pub mod error;

pub use error::LexiconError;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// A loaded symbol lexicon: read-only mapping of symbol names to values.
///
/// Values are arbitrary JSON primitives. Textual values render as
/// `name=value`; anything else (numbers, booleans, nested data) renders as the
/// bare name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolLexicon {
    entries: BTreeMap<String, Value>,
}

impl SymbolLexicon {
    /// An empty lexicon. Sampling from it always yields nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a lexicon from a JSON string. The top-level value must be an
    /// object; any other shape is rejected with `LexiconError::NotAnObject`.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(LexiconError::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Read and parse a lexicon file.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Read a lexicon file, treating any failure as an empty lexicon.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(lexicon) => {
                tracing::debug!(path = %path.display(), entries = lexicon.len(), "loaded symbol lexicon");
                lexicon
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "symbol lexicon unreadable, injection disabled");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Pick up to `k` distinct entries without replacement and render each as
    /// `name=value` (textual values) or `name` (everything else).
    ///
    /// Returns fewer than `k` symbols only when the lexicon is smaller than
    /// `k`. The order of the returned symbols is the shuffled draw order.
    pub fn sample<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Vec<String> {
        if self.entries.is_empty() || k == 0 {
            return Vec::new();
        }
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.shuffle(rng);
        names.truncate(k.min(names.len()));
        names
            .into_iter()
            .map(|name| match &self.entries[name] {
                Value::String(text) => format!("{name}={text}"),
                _ => name.clone(),
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for SymbolLexicon {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
