// Document compiler: one resolved record → one plain-text prompt document.
//
// The output grammar is fixed. A document is a sequence of blocks separated by
// a blank line. A block is either a single `key: value` line or a titled
// section (a title line followed by `key: value` lines). A line is emitted only
// when its value renders (not Omit, not Disable, not empty), and a section
// with no remaining lines is dropped entirely, title included. HANDRAW-HUMAN
// always opens the document.
//
// Section order and key names are part of the output format; downstream
// prompt libraries match on them.

use crate::resolve::ResolvedRecord;
use crate::tristate::Resolved;
use std::fmt::{self, Display};

/// Opening line of every document.
pub const DOCUMENT_HEADER: &str = "HANDRAW-HUMAN";

const VIBE_RULE: &str = "rule: use vibe images for texture/mark/palette/atmosphere only — do not copy composition, figures, or layout.";
const PAINTING_RULE: &str =
    "rule: influence is about mark-energy + material behavior, not copying any single painting.";

/// Titled sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionTitle {
    Vibe,
    Matrix,
    StateMap,
    Composition,
    Gesture,
    Arcane,
    Sleep,
    Color,
    Humanizer,
    Painting,
    Evolve,
    Mutate,
    Print,
    Plates,
}

impl SectionTitle {
    pub const ALL: [SectionTitle; 14] = [
        SectionTitle::Vibe,
        SectionTitle::Matrix,
        SectionTitle::StateMap,
        SectionTitle::Composition,
        SectionTitle::Gesture,
        SectionTitle::Arcane,
        SectionTitle::Sleep,
        SectionTitle::Color,
        SectionTitle::Humanizer,
        SectionTitle::Painting,
        SectionTitle::Evolve,
        SectionTitle::Mutate,
        SectionTitle::Print,
        SectionTitle::Plates,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionTitle::Vibe => "VIBE-REFERENCE",
            SectionTitle::Matrix => "HYPNA-MATRIX",
            SectionTitle::StateMap => "STATE-MAP",
            SectionTitle::Composition => "COMPOSITION",
            SectionTitle::Gesture => "GESTURE",
            SectionTitle::Arcane => "ARCANE-LAYER",
            SectionTitle::Sleep => "SLEEP-STATE",
            SectionTitle::Color => "AUTO-COLOR",
            SectionTitle::Humanizer => "HUMANIZER",
            SectionTitle::Painting => "PAINTING-INFLUENCE",
            SectionTitle::Evolve => "AUTO-EVOLVE",
            SectionTitle::Mutate => "AUTO-MUTATE",
            SectionTitle::Print => "PRINT-LAYER",
            SectionTitle::Plates => "PLATE-GEN",
        }
    }

    /// Exact, case-sensitive match on a title line.
    pub fn from_line(line: &str) -> Option<SectionTitle> {
        SectionTitle::ALL.into_iter().find(|t| t.as_str() == line)
    }
}

impl Display for SectionTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates the lines of one titled section.
struct Section {
    title: &'static str,
    lines: Vec<String>,
}

impl Section {
    fn new(title: SectionTitle) -> Self {
        Section {
            title: title.as_str(),
            lines: Vec::new(),
        }
    }

    /// Add `key: value` if the value renders.
    fn kv<T: Display>(mut self, key: &str, value: &Resolved<T>) -> Self {
        if let Some(text) = value.rendered() {
            self.lines.push(format!("{key}: {text}"));
        }
        self
    }

    /// Add `key: value` for a plain string unless it is blank.
    fn kv_str(mut self, key: &str, value: &str) -> Self {
        if !value.trim().is_empty() {
            self.lines.push(format!("{key}: {value}"));
        }
        self
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        if !line.trim().is_empty() {
            self.lines.push(line);
        }
        self
    }

    /// The finished block, or `None` when no line survived.
    fn finish(self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let mut out = String::from(self.title);
        for line in self.lines {
            out.push('\n');
            out.push_str(&line);
        }
        Some(out)
    }
}

/// Render a resolved record as a prompt document.
pub fn render(rec: &ResolvedRecord) -> String {
    let mut blocks: Vec<String> = vec![DOCUMENT_HEADER.to_string()];
    let mut push = |block: Option<String>| {
        if let Some(b) = block {
            blocks.push(b);
        }
    };

    push(rec.subject.as_ref().map(|s| format!("subject: {s}")));
    push((!rec.style.is_empty()).then(|| format!("style: {}", rec.style)));

    let vibe = Section::new(SectionTitle::Vibe)
        .kv_str("vibe-description", &rec.vibe.description)
        .kv_str("vibe-images-to-attach", &rec.vibe.images);
    if !vibe.lines.is_empty() {
        push(vibe.line(VIBE_RULE).finish());
    }

    push(
        (!rec.injected_symbols.is_empty())
            .then(|| format!("symbol-lexicon-injection: {}", rec.injected_symbols.join(", "))),
    );

    let m = &rec.matrix;
    push(
        Section::new(SectionTitle::Matrix)
            .kv("hallucination", &m.hallucination)
            .kv("temporal", &m.temporal)
            .kv("material", &m.material)
            .kv("space", &m.space)
            .kv("symbol", &m.symbol)
            .kv("agency", &m.agency)
            .kv("saturation", &m.saturation)
            .kv("motion", &m.motion)
            .kv("form", &m.form)
            .kv("media", &m.media)
            .kv("palette", &m.palette)
            .kv("surface", &m.surface)
            .kv("coherence", &m.coherence)
            .kv("recursion", &m.recursion)
            .kv("grain", &m.grain)
            .kv("line-wobble", &m.line_wobble)
            .kv("erasure", &m.erasure)
            .kv("annotation", &m.annotation)
            .kv_str("auto-color", &m.auto_color)
            .finish(),
    );

    let sm = &rec.state_map;
    push(
        Section::new(SectionTitle::StateMap)
            .kv_str("state-name", &sm.name)
            .kv("state-geometry", &sm.geometry)
            .kv("transition-mode", &sm.transition_mode)
            .finish(),
    );

    let c = &rec.composition;
    push(
        Section::new(SectionTitle::Composition)
            .kv("comp-mode", &c.comp_mode)
            .kv("composition", &c.composition)
            .kv("tension", &c.tension)
            .kv("flow", &c.flow)
            .kv("framing", &c.framing)
            .kv("horizon", &c.horizon)
            .kv("scale-logic", &c.scale_logic)
            .finish(),
    );

    let g = &rec.gesture;
    push(
        Section::new(SectionTitle::Gesture)
            .kv("gesture-mode", &g.gesture_mode)
            .kv("pressure", &g.pressure)
            .kv("tempo", &g.tempo)
            .kv("jitter", &g.jitter)
            .kv("stroke-memory", &g.stroke_memory)
            .kv("interruption", &g.interruption)
            .kv("hatch-density", &g.hatch_density)
            .finish(),
    );

    if rec.arcane.enabled {
        push(
            Section::new(SectionTitle::Arcane)
                .kv("arcane-mode", &rec.arcane.mode)
                .finish(),
        );
    }

    let s = &rec.sleep;
    if s.enabled {
        push(
            Section::new(SectionTitle::Sleep)
                .kv("neuro-state", &s.neuro_state)
                .kv("motor", &s.motor)
                .kv("presence", &s.presence)
                .kv("visual-drift", &s.visual_drift)
                .kv("auditory", &s.auditory)
                .kv("affect", &s.affect)
                .finish(),
        );
    }

    let col = &rec.color;
    if col.enabled {
        push(
            Section::new(SectionTitle::Color)
                .kv("mode", &col.mode)
                .kv("evolution", &col.evolution)
                .kv("palette-lock", &col.palette_lock)
                .kv("contrast", &col.contrast)
                .kv("whiteness", &col.whiteness)
                .finish(),
        );
    }

    let hu = &rec.humanizer;
    let qualities: Vec<&str> = hu.qualities.iter().map(|q| q.label()).collect();
    let mut humanizer =
        Section::new(SectionTitle::Humanizer).kv("humanizer-level(0-100)", &hu.level);
    if !qualities.is_empty() {
        humanizer = humanizer.line(format!("qualities: {}", qualities.join(", ")));
    }
    push(humanizer.kv("humanizer-notes", &hu.notes).finish());

    let p = &rec.painting;
    if p.is_active() {
        push(
            Section::new(SectionTitle::Painting)
                .kv("influence", &p.influence)
                .kv("strength(0-100)", &p.strength)
                .kv("notes", &p.notes)
                .line(PAINTING_RULE)
                .finish(),
        );
    }

    if rec.evolve.enabled {
        push(
            Section::new(SectionTitle::Evolve)
                .kv("steps", &rec.evolve.steps)
                .kv("path", &rec.evolve.path)
                .finish(),
        );
    }

    let mu = &rec.mutate;
    if mu.enabled {
        push(
            Section::new(SectionTitle::Mutate)
                .kv("strength(0-100)", &mu.strength)
                .kv("drift", &mu.drift)
                .kv("velocity", &mu.velocity)
                .kv("scope", &mu.scope)
                .kv("mode", &mu.mode)
                .finish(),
        );
    }

    let pr = &rec.print;
    if pr.enabled {
        push(
            Section::new(SectionTitle::Print)
                .kv("print-mode", &pr.mode)
                .kv("registration", &pr.registration)
                .kv("texture", &pr.texture)
                .finish(),
        );
    }

    let pl = &rec.plates;
    if pl.enabled {
        let mut plates = Section::new(SectionTitle::Plates)
            .kv("plate-count", &pl.count)
            .kv("plate-logic", &pl.logic)
            .kv("registration-map", &pl.registration_map)
            .kv("overprint", &pl.overprint);
        if !pl.map.is_empty() {
            plates = plates.line("plate-map:");
            for line in pl.map.lines().map(str::trim).filter(|l| !l.is_empty()) {
                plates = plates.line(format!("  {line}"));
            }
        }
        push(plates.finish());
    }

    push((!rec.notes.is_empty()).then(|| format!("notes: {}", rec.notes)));

    blocks.join("\n\n")
}
