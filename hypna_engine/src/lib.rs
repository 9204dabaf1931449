// Hypnagnosis prompt engine.
//
// Turns a partially filled configuration form into one or more structured,
// human-readable image-generation prompt documents. Every parameter left blank
// is derived from a single intensity scalar (the hallucination percentage), the
// step's position along a six-phase series arc, and the output mode; the user
// can also skip a line or disable a parameter outright. Multi-step series walk
// the intensity along an easing curve.
//
// Architecture:
// - tristate.rs: Cell grammar (blank / skip / none / literal) and the merge
//   with derived defaults
// - curve.rs: Easing curves for intensity interpolation
// - phase.rs: The six structural phases and their phase-driven defaults
// - derive.rs: Intensity-driven default derivation
// - tables.rs: Style tokens, painting influences, humanizer qualities, and the
//   bootloader/system texts
// - form.rs: The configuration record, its JSON loading, and presets
// - resolve.rs: One form + step position → one fully resolved record
// - compiler.rs: Resolved record → prompt document text
// - series.rs: Step count and parallel series generation
// - export.rs: Joining a series into a saved file's layout
// - import.rs: Prompt document text → form (the compiler's inverse)
//
// The core is pure and infallible: any `Form` value produces a document. The
// only randomness is symbol sampling, drawn from a caller-supplied RNG, so a
// seeded RNG gives reproducible output. The symbol lexicon itself lives in the
// `hypna_lexicon` crate.

pub mod compiler;
pub mod curve;
pub mod derive;
pub mod export;
pub mod form;
pub mod import;
pub mod phase;
pub mod resolve;
pub mod series;
pub mod tables;
pub mod tristate;

pub use hypna_lexicon::SymbolLexicon;
