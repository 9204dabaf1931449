// Document import: prompt document text → form.
//
// Reads the grammar `compiler::render` writes (and hand-written fragments in
// the same grammar) back into a `Form`. Lines are `key: value` pairs, either
// at the root of the document or under a section title; a blank line closes
// the current section. Keys are matched case-insensitively with `_` and runs
// of whitespace read as `-`, and a trailing `(0-100)` range hint is ignored.
// Lines starting with `#` or `//` are comments.
//
// Two readings:
// - A complete document (one containing the HANDRAW-HUMAN header) states a
//   whole step. A module whose section is missing is switched off, and a
//   compiled key missing from its section is imported as SKIP, so
//   re-rendering the imported form reproduces the document.
// - A fragment (no header) only sets what it names. A section that appears
//   switches its module on; everything else keeps the blank-form default.
//
// Values are read with the cell grammar ("skip" / "none" / literal). Steps
// are clamped to 1..=20 and percentages to 0..=100 on the way in. Keys that
// map to no form field are collected, not rejected, and malformed lines are
// reported as `ImportIssue`s; import itself never fails.
//
// Multi-state exports (`=== STATE n ===` blocks, optionally behind the
// bootloader and system-file preamble) are split by `import_series`.

use crate::compiler::{DOCUMENT_HEADER, SectionTitle};
use crate::form::Form;
use crate::resolve::MAX_SYMBOLS_PER_STATE;
use crate::series::MAX_STEPS;
use crate::tables::{BOOTLOADER_TEXT, HumanizerQuality, SYSTEM_FILE_TEXT, collapse_style_text};
use crate::tristate::{Cell, IntCell, TextCell, parse_cell, parse_int_cell};
use std::collections::BTreeSet;
use thiserror::Error;

/// A line the importer could not place. Line numbers are 1-based within the
/// imported document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportIssue {
    #[error("line {line}: expected `key: value`")]
    NotKeyValue { line: usize },
    #[error("line {line}: `{key}` is outside any known section")]
    OutsideSection { line: usize, key: String },
}

/// A `key: value` line that maps to no form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// `None` for root-level lines.
    pub section: Option<SectionTitle>,
    pub key: String,
    pub value: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDocument {
    pub form: Form,
    /// Whether the text carried the document header.
    pub complete: bool,
    pub unknown: Vec<UnknownKey>,
    pub issues: Vec<ImportIssue>,
}

// ---------------------------------------------------------------------------
// Field slots
// ---------------------------------------------------------------------------

/// Where a section key lands in the form.
enum Slot<'a> {
    Text(&'a mut TextCell),
    Int(&'a mut IntCell),
    /// Integer cell clamped to an inclusive range.
    Bounded(&'a mut IntCell, i64, i64),
    Plain(&'a mut String),
    Toggle(&'a mut bool),
    Qualities(&'a mut BTreeSet<HumanizerQuality>),
    /// Known key with no form field: fixed rule text or a derived value.
    Ignored,
}

fn slot<'a>(form: &'a mut Form, section: SectionTitle, key: &str) -> Option<Slot<'a>> {
    use SectionTitle as S;
    let pct = |cell: &'a mut IntCell| Slot::Bounded(cell, 0, 100);
    let slot = match (section, key) {
        (S::Vibe, "vibe-description" | "description") => Slot::Plain(&mut form.vibe.description),
        (S::Vibe, "vibe-images-to-attach" | "images") => Slot::Plain(&mut form.vibe.image_list),
        (S::Vibe | S::Painting, "rule") => Slot::Ignored,

        (S::Matrix, "hallucination") => pct(&mut form.matrix.hallucination),
        (S::Matrix, "temporal") => Slot::Int(&mut form.matrix.temporal),
        (S::Matrix, "material") => Slot::Int(&mut form.matrix.material),
        (S::Matrix, "space") => Slot::Int(&mut form.matrix.space),
        (S::Matrix, "symbol") => Slot::Int(&mut form.matrix.symbol),
        (S::Matrix, "agency") => Slot::Int(&mut form.matrix.agency),
        (S::Matrix, "saturation") => Slot::Text(&mut form.matrix.saturation),
        (S::Matrix, "motion") => Slot::Text(&mut form.matrix.motion),
        (S::Matrix, "form") => Slot::Text(&mut form.matrix.form),
        (S::Matrix, "media") => Slot::Text(&mut form.matrix.media),
        (S::Matrix, "palette") => Slot::Text(&mut form.matrix.palette),
        (S::Matrix, "surface") => Slot::Text(&mut form.matrix.surface),
        (S::Matrix, "coherence") => Slot::Int(&mut form.matrix.coherence),
        (S::Matrix, "recursion") => Slot::Int(&mut form.matrix.recursion),
        (S::Matrix, "grain") => Slot::Int(&mut form.matrix.grain),
        (S::Matrix, "line-wobble") => Slot::Int(&mut form.matrix.line_wobble),
        (S::Matrix, "erasure") => Slot::Int(&mut form.matrix.erasure),
        (S::Matrix, "annotation") => Slot::Int(&mut form.matrix.annotation),
        (S::Matrix, "auto-color") => Slot::Ignored,

        (S::StateMap, "state-name") => Slot::Text(&mut form.state_map.name_override),
        (S::StateMap, "state-geometry") => Slot::Text(&mut form.state_map.geometry),
        (S::StateMap, "transition-mode") => Slot::Text(&mut form.state_map.transition_mode),

        (S::Composition, "comp-mode") => Slot::Text(&mut form.composition.comp_mode),
        (S::Composition, "composition") => Slot::Text(&mut form.composition.composition),
        (S::Composition, "tension") => Slot::Text(&mut form.composition.tension),
        (S::Composition, "flow") => Slot::Text(&mut form.composition.flow),
        (S::Composition, "framing") => Slot::Text(&mut form.composition.framing),
        (S::Composition, "horizon") => Slot::Text(&mut form.composition.horizon),
        (S::Composition, "scale-logic") => Slot::Text(&mut form.composition.scale_logic),

        (S::Gesture, "gesture-mode" | "mode") => Slot::Text(&mut form.gesture.gesture_mode),
        (S::Gesture, "pressure") => Slot::Text(&mut form.gesture.pressure),
        (S::Gesture, "tempo") => Slot::Text(&mut form.gesture.tempo),
        (S::Gesture, "jitter") => Slot::Text(&mut form.gesture.jitter),
        (S::Gesture, "stroke-memory") => Slot::Text(&mut form.gesture.stroke_memory),
        (S::Gesture, "interruption") => Slot::Text(&mut form.gesture.interruption),
        (S::Gesture, "hatch-density") => Slot::Text(&mut form.gesture.hatch_density),

        (S::Arcane, "enabled") => Slot::Toggle(&mut form.arcane.enabled),
        (S::Arcane, "arcane-mode") => Slot::Text(&mut form.arcane.mode),

        (S::Sleep, "enabled") => Slot::Toggle(&mut form.sleep.enabled),
        (S::Sleep, "neuro-state") => Slot::Text(&mut form.sleep.neuro_state),
        (S::Sleep, "motor") => pct(&mut form.sleep.motor),
        (S::Sleep, "presence") => pct(&mut form.sleep.presence),
        (S::Sleep, "visual-drift") => pct(&mut form.sleep.visual_drift),
        (S::Sleep, "auditory") => Slot::Text(&mut form.sleep.auditory),
        (S::Sleep, "affect") => Slot::Text(&mut form.sleep.affect),

        (S::Color, "enabled") => Slot::Toggle(&mut form.color.enabled),
        (S::Color, "mode") => Slot::Text(&mut form.color.mode),
        (S::Color, "evolution") => Slot::Text(&mut form.color.evolution),
        (S::Color, "palette-lock") => Slot::Text(&mut form.color.palette_lock),
        (S::Color, "contrast") => Slot::Text(&mut form.color.contrast),
        (S::Color, "whiteness") => Slot::Text(&mut form.color.whiteness),

        (S::Humanizer, "humanizer-level") => pct(&mut form.humanizer.level),
        (S::Humanizer, "qualities") => Slot::Qualities(&mut form.humanizer.qualities),
        (S::Humanizer, "humanizer-notes") => Slot::Text(&mut form.humanizer.notes),

        (S::Painting, "influence") => Slot::Text(&mut form.painting.influence),
        (S::Painting, "strength") => pct(&mut form.painting.strength),
        (S::Painting, "notes") => Slot::Text(&mut form.painting.notes),

        (S::Evolve, "enabled") => Slot::Toggle(&mut form.evolve.enabled),
        (S::Evolve, "steps") => Slot::Bounded(&mut form.evolve.steps, 1, MAX_STEPS),
        (S::Evolve, "path") => Slot::Text(&mut form.evolve.path),
        (S::Evolve, "curve") => Slot::Text(&mut form.evolve.curve),
        (S::Evolve, "start-h" | "start-intensity") => pct(&mut form.evolve.start_intensity),
        (S::Evolve, "end-h" | "end-intensity") => pct(&mut form.evolve.end_intensity),

        (S::Mutate, "enabled") => Slot::Toggle(&mut form.mutate.enabled),
        (S::Mutate, "strength") => pct(&mut form.mutate.strength),
        (S::Mutate, "drift") => Slot::Text(&mut form.mutate.drift),
        (S::Mutate, "velocity") => Slot::Text(&mut form.mutate.velocity),
        (S::Mutate, "scope") => Slot::Text(&mut form.mutate.scope),
        (S::Mutate, "mode") => Slot::Text(&mut form.mutate.mode),

        (S::Print, "enabled") => Slot::Toggle(&mut form.print.print_enabled),
        (S::Print, "print-mode") => Slot::Text(&mut form.print.print_mode),
        (S::Print, "registration") => Slot::Text(&mut form.print.registration),
        (S::Print, "texture") => Slot::Text(&mut form.print.texture),

        (S::Plates, "enabled") => Slot::Toggle(&mut form.print.plates_enabled),
        (S::Plates, "plate-count") => Slot::Int(&mut form.print.plate_count),
        (S::Plates, "plate-logic") => Slot::Text(&mut form.print.plate_logic),
        (S::Plates, "registration-map") => Slot::Text(&mut form.print.registration_map),
        (S::Plates, "overprint") => Slot::Text(&mut form.print.overprint),
        _ => return None,
    };
    Some(slot)
}

/// Cell keys the compiler writes for each section, in render order.
fn compiled_keys(section: SectionTitle) -> &'static [&'static str] {
    use SectionTitle as S;
    match section {
        S::Vibe => &[],
        S::Matrix => &[
            "hallucination",
            "temporal",
            "material",
            "space",
            "symbol",
            "agency",
            "saturation",
            "motion",
            "form",
            "media",
            "palette",
            "surface",
            "coherence",
            "recursion",
            "grain",
            "line-wobble",
            "erasure",
            "annotation",
        ],
        S::StateMap => &["state-geometry", "transition-mode"],
        S::Composition => &[
            "comp-mode",
            "composition",
            "tension",
            "flow",
            "framing",
            "horizon",
            "scale-logic",
        ],
        S::Gesture => &[
            "gesture-mode",
            "pressure",
            "tempo",
            "jitter",
            "stroke-memory",
            "interruption",
            "hatch-density",
        ],
        S::Arcane => &["arcane-mode"],
        S::Sleep => &["neuro-state", "motor", "presence", "visual-drift", "auditory", "affect"],
        S::Color => &["mode", "evolution", "palette-lock", "contrast", "whiteness"],
        S::Humanizer => &["humanizer-level", "humanizer-notes"],
        S::Painting => &["influence", "strength", "notes"],
        S::Evolve => &["steps", "path"],
        S::Mutate => &["strength", "drift", "velocity", "scope", "mode"],
        S::Print => &["print-mode", "registration", "texture"],
        S::Plates => &["plate-count", "plate-logic", "registration-map", "overprint"],
    }
}

/// The form toggle a section's presence stands for, if it has one.
fn toggle(form: &mut Form, section: SectionTitle) -> Option<&mut bool> {
    use SectionTitle as S;
    match section {
        S::Arcane => Some(&mut form.arcane.enabled),
        S::Sleep => Some(&mut form.sleep.enabled),
        S::Color => Some(&mut form.color.enabled),
        S::Evolve => Some(&mut form.evolve.enabled),
        S::Mutate => Some(&mut form.mutate.enabled),
        S::Print => Some(&mut form.print.print_enabled),
        S::Plates => Some(&mut form.print.plates_enabled),
        S::Vibe | S::Matrix | S::StateMap | S::Composition | S::Gesture | S::Humanizer => None,
        S::Painting => None,
    }
}

fn bounded(raw: &str, lo: i64, hi: i64) -> IntCell {
    match parse_int_cell(raw) {
        Cell::Literal(n) => Cell::Literal(n.clamp(lo, hi)),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Lowercase, `_` and whitespace runs to `-`, range hint dropped.
fn normalize_key(raw: &str) -> String {
    let key = raw.trim();
    let key = key.strip_suffix("(0-100)").unwrap_or(key).trim_end();
    key.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

#[derive(Default)]
struct Importer {
    form: Form,
    complete: bool,
    unknown: Vec<UnknownKey>,
    issues: Vec<ImportIssue>,
    seen: BTreeSet<SectionTitle>,
    /// Sections that set their toggle with an explicit `enabled:` line.
    toggled: BTreeSet<SectionTitle>,
    /// (section, normalized key) pairs assigned so far.
    assigned: BTreeSet<(SectionTitle, String)>,
}

impl Importer {
    fn root(&mut self, line: usize, key: String, value: &str) {
        match key.as_str() {
            "subject" => self.form.subject = value.to_string(),
            "style" => self.form.style_tokens = collapse_style_text(value),
            "notes" => self.form.notes = value.to_string(),
            "symbol-lexicon-injection" => {
                let count = value.split(',').filter(|s| !s.trim().is_empty()).count();
                self.form.symbols.inject = true;
                self.form.symbols.per_state = (count as i64).min(MAX_SYMBOLS_PER_STATE);
            }
            _ => {
                self.issues.push(ImportIssue::OutsideSection {
                    line,
                    key: key.clone(),
                });
                self.unknown.push(UnknownKey {
                    section: None,
                    key,
                    value: value.to_string(),
                    line,
                });
            }
        }
    }

    fn field(&mut self, section: SectionTitle, line: usize, key: String, value: &str) {
        let known = match slot(&mut self.form, section, &key) {
            Some(Slot::Text(cell)) => {
                *cell = parse_cell(value);
                true
            }
            Some(Slot::Int(cell)) => {
                *cell = parse_int_cell(value);
                true
            }
            Some(Slot::Bounded(cell, lo, hi)) => {
                *cell = bounded(value, lo, hi);
                true
            }
            Some(Slot::Plain(text)) => {
                *text = value.to_string();
                true
            }
            Some(Slot::Toggle(flag)) => {
                *flag = value.eq_ignore_ascii_case("true");
                self.toggled.insert(section);
                true
            }
            Some(Slot::Qualities(qualities)) => {
                for label in value.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                    match HumanizerQuality::from_label(label) {
                        Some(quality) => {
                            qualities.insert(quality);
                        }
                        None => self.unknown.push(UnknownKey {
                            section: Some(section),
                            key: key.clone(),
                            value: label.to_string(),
                            line,
                        }),
                    }
                }
                true
            }
            Some(Slot::Ignored) => true,
            None => false,
        };
        if known {
            self.assigned.insert((section, key));
        } else {
            self.unknown.push(UnknownKey {
                section: Some(section),
                key,
                value: value.to_string(),
                line,
            });
        }
    }

    fn finish(mut self) -> ImportedDocument {
        for section in SectionTitle::ALL {
            let seen = self.seen.contains(&section);
            let explicit = self.toggled.contains(&section);
            if let Some(flag) = toggle(&mut self.form, section).filter(|_| !explicit) {
                if seen {
                    *flag = true;
                } else if self.complete {
                    *flag = false;
                }
            }
            if !self.complete {
                continue;
            }
            // The painting section is also absent when the influence is the
            // sentinel, so its absence says nothing about its keys.
            let untoggled = toggle(&mut self.form, section).is_none();
            if !(seen || (untoggled && section != SectionTitle::Painting)) {
                continue;
            }
            for key in compiled_keys(section) {
                if self.assigned.contains(&(section, key.to_string())) {
                    continue;
                }
                match slot(&mut self.form, section, key) {
                    Some(Slot::Text(cell)) => *cell = Cell::Omit,
                    Some(Slot::Int(cell) | Slot::Bounded(cell, _, _)) => *cell = Cell::Omit,
                    _ => {}
                }
            }
        }
        ImportedDocument {
            form: self.form,
            complete: self.complete,
            unknown: self.unknown,
            issues: self.issues,
        }
    }
}

/// Import one document or fragment.
pub fn import_document(text: &str) -> ImportedDocument {
    let mut imp = Importer::default();
    let mut section: Option<SectionTitle> = None;
    let mut in_plate_map = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            section = None;
            in_plate_map = false;
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        if in_plate_map && raw.starts_with(char::is_whitespace) {
            if !imp.form.print.plate_map.is_empty() {
                imp.form.print.plate_map.push('\n');
            }
            imp.form.print.plate_map.push_str(trimmed);
            continue;
        }
        in_plate_map = false;

        if trimmed == DOCUMENT_HEADER {
            imp.complete = true;
            section = None;
            continue;
        }
        if let Some(title) = SectionTitle::from_line(trimmed) {
            imp.seen.insert(title);
            section = Some(title);
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            imp.issues.push(ImportIssue::NotKeyValue { line });
            continue;
        };
        let key = normalize_key(key);
        let value = value.trim();
        match section {
            Some(SectionTitle::Plates) if key == "plate-map" => {
                in_plate_map = true;
                imp.form.print.plate_map = value.to_string();
            }
            Some(title) => imp.field(title, line, key, value),
            None => imp.root(line, key, value),
        }
    }

    let doc = imp.finish();
    for issue in &doc.issues {
        tracing::debug!(%issue, "document import");
    }
    doc
}

/// Import every state of an exported series. The bootloader and system-file
/// preamble of a full export is skipped; text without state markers is one
/// document.
pub fn import_series(text: &str) -> Vec<ImportedDocument> {
    let mut body = text;
    for preamble in [BOOTLOADER_TEXT, SYSTEM_FILE_TEXT] {
        body = body.trim_start_matches('\n');
        body = body.strip_prefix(preamble).unwrap_or(body);
    }
    let body = body.trim_start_matches('\n');

    let mut states: Vec<String> = Vec::new();
    let mut current: Option<String> = None;
    for raw in body.lines() {
        let trimmed = raw.trim();
        if trimmed.starts_with("=== STATE ") && trimmed.ends_with("===") {
            states.extend(current.take());
            current = Some(String::new());
            continue;
        }
        if let Some(state) = current.as_mut() {
            state.push_str(raw);
            state.push('\n');
        }
    }
    states.extend(current);

    if states.is_empty() {
        vec![import_document(body)]
    } else {
        states.iter().map(|s| import_document(s)).collect()
    }
}
