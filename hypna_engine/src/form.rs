// The configuration record ("form") supplied by the host.
//
// A `Form` is everything a user can set: a mode, a few free-text fields, and
// around seventy tri-state cells grouped by the module they feed. Groups are
// nested structs, mirroring how the document compiler lays out its sections.
// Every struct is `#[serde(default)]`, so a sparse JSON object such as
// `{"mode": "LIVE", "matrix": {"hallucination": 40}}` is a complete form.
//
// Two presets exist: `Form::default()` is the blank form (every cell
// Autofill), and `Form::starter()` is the pre-filled form hosts show on first
// launch.
//
// Boolean toggles and the mode are plain values, not cells. A toggle decides
// whether a module's section is rendered; the module's parameters still
// resolve independently of it.
//
// See also: `tristate.rs` for the cell grammar, `resolve.rs` which consumes
// the form.

use crate::tables::HumanizerQuality;
use crate::tristate::{Cell, IntCell, TextCell};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Output mode. Selects which parts of the document are forced on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Full stack.
    #[default]
    Full,
    /// Style-only: no subject line.
    Style,
    /// Gesture-only: no subject line.
    Gesture,
    /// Print/plates-only: no subject line, print and plate modules forced on.
    Print,
    /// Live evolving series: mutation forced on, six steps by default.
    Live,
}

impl Mode {
    /// Parse a mode name, case-insensitively. Unknown names are `Full`.
    pub fn from_name(name: &str) -> Mode {
        match name.trim().to_ascii_uppercase().as_str() {
            "STYLE" => Mode::Style,
            "GESTURE" => Mode::Gesture,
            "PRINT" => Mode::Print,
            "LIVE" => Mode::Live,
            _ => Mode::Full,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Full => "FULL",
            Mode::Style => "STYLE",
            Mode::Gesture => "GESTURE",
            Mode::Print => "PRINT",
            Mode::Live => "LIVE",
        }
    }

    /// Whether documents in this mode carry a subject line.
    pub fn shows_subject(self) -> bool {
        !matches!(self, Mode::Style | Mode::Gesture | Mode::Print)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map_or(Mode::Full, Mode::from_name))
    }
}

// ---------------------------------------------------------------------------
// Field groups
// ---------------------------------------------------------------------------

/// Vibe reference: free-text description and a list of images the user will
/// attach alongside the prompt.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeFields {
    pub description: String,
    pub image_list: String,
}

/// The hypna matrix: the intensity plus its sibling attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixFields {
    /// The intensity scalar (0–100) that drives most defaults.
    pub hallucination: IntCell,
    pub temporal: IntCell,
    pub material: IntCell,
    pub space: IntCell,
    pub symbol: IntCell,
    pub agency: IntCell,
    pub saturation: TextCell,
    pub motion: TextCell,
    pub form: TextCell,
    pub media: TextCell,
    pub palette: TextCell,
    pub surface: TextCell,
    pub coherence: IntCell,
    pub recursion: IntCell,
    pub grain: IntCell,
    pub line_wobble: IntCell,
    pub erasure: IntCell,
    pub annotation: IntCell,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMapFields {
    pub geometry: TextCell,
    pub transition_mode: TextCell,
    /// Replaces the phase label as the state name when a literal is given.
    pub name_override: TextCell,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionFields {
    pub comp_mode: TextCell,
    pub composition: TextCell,
    pub tension: TextCell,
    pub flow: TextCell,
    pub framing: TextCell,
    pub horizon: TextCell,
    pub scale_logic: TextCell,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureFields {
    pub gesture_mode: TextCell,
    pub pressure: TextCell,
    pub tempo: TextCell,
    pub jitter: TextCell,
    pub stroke_memory: TextCell,
    pub interruption: TextCell,
    pub hatch_density: TextCell,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcaneFields {
    pub enabled: bool,
    pub mode: TextCell,
}

impl Default for ArcaneFields {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: Cell::Autofill,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepFields {
    pub enabled: bool,
    pub neuro_state: TextCell,
    pub motor: IntCell,
    pub presence: IntCell,
    pub visual_drift: IntCell,
    pub auditory: TextCell,
    pub affect: TextCell,
}

impl Default for SleepFields {
    fn default() -> Self {
        Self {
            enabled: true,
            neuro_state: Cell::Autofill,
            motor: Cell::Autofill,
            presence: Cell::Autofill,
            visual_drift: Cell::Autofill,
            auditory: Cell::Autofill,
            affect: Cell::Autofill,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorFields {
    pub enabled: bool,
    pub mode: TextCell,
    pub evolution: TextCell,
    pub palette_lock: TextCell,
    pub contrast: TextCell,
    pub whiteness: TextCell,
}

impl Default for ColorFields {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: Cell::Autofill,
            evolution: Cell::Autofill,
            palette_lock: Cell::Autofill,
            contrast: Cell::Autofill,
            whiteness: Cell::Autofill,
        }
    }
}

/// Humanizer: how visibly hand-made the result should look.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizerFields {
    pub level: IntCell,
    /// Qualities switched on. Rendered in canonical order regardless of the
    /// order given.
    pub qualities: BTreeSet<HumanizerQuality>,
    pub notes: TextCell,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintingFields {
    /// One of `tables::PAINTING_INFLUENCES`, or any free text.
    pub influence: TextCell,
    pub strength: IntCell,
    pub notes: TextCell,
}

/// Evolution: multi-step series with interpolated intensity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolveFields {
    pub enabled: bool,
    /// Number of steps (1–20).
    pub steps: IntCell,
    pub path: TextCell,
    pub start_intensity: IntCell,
    pub end_intensity: IntCell,
    /// Easing curve name, see `curve.rs`.
    pub curve: TextCell,
}

impl Default for EvolveFields {
    fn default() -> Self {
        Self {
            enabled: true,
            steps: Cell::Autofill,
            path: Cell::Autofill,
            start_intensity: Cell::Autofill,
            end_intensity: Cell::Autofill,
            curve: Cell::Autofill,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutateFields {
    pub enabled: bool,
    pub strength: IntCell,
    pub drift: TextCell,
    pub velocity: TextCell,
    pub scope: TextCell,
    pub mode: TextCell,
}

/// Print layer and plate generator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintFields {
    pub print_enabled: bool,
    pub plates_enabled: bool,
    pub print_mode: TextCell,
    pub registration: TextCell,
    pub texture: TextCell,
    pub plate_count: IntCell,
    pub plate_logic: TextCell,
    pub registration_map: TextCell,
    pub overprint: TextCell,
    /// Free-form multi-line plate map, rendered indented under PLATE-GEN.
    pub plate_map: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolFields {
    pub inject: bool,
    /// Symbols sampled per step; clamped to [0, 10] at resolution time.
    pub per_state: i64,
}

impl Default for SymbolFields {
    fn default() -> Self {
        Self {
            inject: false,
            per_state: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// The form
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    pub mode: Mode,
    pub subject: String,
    /// Comma-separated style tokens, see `tables::expand_style_tokens`.
    pub style_tokens: String,
    pub notes: String,
    pub vibe: VibeFields,
    pub matrix: MatrixFields,
    pub state_map: StateMapFields,
    pub composition: CompositionFields,
    pub gesture: GestureFields,
    pub arcane: ArcaneFields,
    pub sleep: SleepFields,
    pub color: ColorFields,
    pub humanizer: HumanizerFields,
    pub painting: PaintingFields,
    pub evolve: EvolveFields,
    pub mutate: MutateFields,
    pub print: PrintFields,
    pub symbols: SymbolFields,
}

impl Form {
    /// The pre-filled form hosts present on first launch.
    pub fn starter() -> Self {
        let mut form = Form {
            subject: "NEW ORIGINAL IMAGE — do not copy refs; follow system behavior.".into(),
            style_tokens: "STYLE.HYPNAGOGIC, STYLE.NEWWEIRD, STYLE.PRINT".into(),
            ..Form::default()
        };
        form.matrix.hallucination = Cell::Literal(72);
        form.composition.comp_mode = Cell::text("auto");
        form.gesture.gesture_mode = Cell::text("auto");
        form.arcane.mode = Cell::text("occult, mythological, symbolic, new weird system");
        form.sleep.neuro_state = Cell::text("cataplexy + sleep paralysis + hypnagogia");
        form.color.mode = Cell::text("adaptive");
        form.evolve.steps = Cell::Literal(6);
        form.evolve.curve = Cell::text("s-curve");
        form
    }

    /// Parse a form from JSON. Missing fields take their blank defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_is_lenient() {
        assert_eq!(Mode::from_name("live"), Mode::Live);
        assert_eq!(Mode::from_name(" Print "), Mode::Print);
        assert_eq!(Mode::from_name("collage"), Mode::Full);
        let form = Form::from_json(r#"{"mode": "gesture"}"#).unwrap();
        assert_eq!(form.mode, Mode::Gesture);
        let form = Form::from_json(r#"{"mode": null}"#).unwrap();
        assert_eq!(form.mode, Mode::Full);
    }

    #[test]
    fn test_mode_subject_rule() {
        assert!(Mode::Full.shows_subject());
        assert!(Mode::Live.shows_subject());
        assert!(!Mode::Style.shows_subject());
        assert!(!Mode::Gesture.shows_subject());
        assert!(!Mode::Print.shows_subject());
    }

    #[test]
    fn test_blank_form_defaults() {
        let form = Form::default();
        assert_eq!(form.mode, Mode::Full);
        assert_eq!(form.matrix.hallucination, Cell::Autofill);
        assert!(form.arcane.enabled && form.sleep.enabled && form.color.enabled);
        assert!(form.evolve.enabled);
        assert!(!form.mutate.enabled);
        assert!(!form.print.print_enabled && !form.print.plates_enabled);
        assert!(!form.symbols.inject);
        assert_eq!(form.symbols.per_state, 3);
    }

    #[test]
    fn test_sparse_json_fills_defaults() {
        let form = Form::from_json(
            r#"{
                "mode": "LIVE",
                "subject": "stairwell lantern",
                "matrix": {"hallucination": "55", "grain": "skip", "palette": "none"},
                "humanizer": {"qualities": ["smudge", "wobble_lines"]},
                "evolve": {"curve": "pulse"}
            }"#,
        )
        .unwrap();
        assert_eq!(form.mode, Mode::Live);
        assert_eq!(form.matrix.hallucination, Cell::Literal(55));
        assert_eq!(form.matrix.grain, Cell::Omit);
        assert_eq!(form.matrix.palette, Cell::Disable);
        assert_eq!(form.matrix.temporal, Cell::Autofill);
        assert!(form.evolve.enabled, "group default survives a partial group");
        assert_eq!(form.evolve.curve, Cell::text("pulse"));
        assert!(form.sleep.enabled);
        let qualities: Vec<HumanizerQuality> = form.humanizer.qualities.into_iter().collect();
        assert_eq!(
            qualities,
            vec![HumanizerQuality::WobbleLines, HumanizerQuality::Smudge]
        );
    }

    #[test]
    fn test_json_roundtrip_preserves_cells() {
        let mut form = Form::starter();
        form.matrix.grain = Cell::Omit;
        form.painting.influence = Cell::Disable;
        form.print.plate_map = "K: key plate\nR: red drift".into();
        let json = form.to_json_pretty().unwrap();
        let restored = Form::from_json(&json).unwrap();
        assert_eq!(restored, form);
    }

    #[test]
    fn test_starter_preset() {
        let form = Form::starter();
        assert_eq!(form.matrix.hallucination, Cell::Literal(72));
        assert_eq!(form.evolve.steps, Cell::Literal(6));
        assert_eq!(form.evolve.curve, Cell::text("s-curve"));
        assert!(form.style_tokens.contains("STYLE.NEWWEIRD"));
    }
}
