// State resolution: form + step position → one fully concrete record.
//
// `compute()` is the heart of the engine. For step `index` of a `total`-step
// series it:
//   1. reads the base intensity from the hallucination cell (70 if it is not
//      an integer literal),
//   2. interpolates the effective intensity along the evolution curve when
//      evolution is on and both endpoints resolve to integers,
//   3. derives the intensity defaults (derive.rs) and the phase (phase.rs),
//   4. merges every user cell with its default through `tristate::resolve`,
//   5. applies the mode's forced module flags and the subject rule,
//   6. samples injected symbols from the lexicon with the caller's RNG.
//
// The result is a plain immutable value. Nothing in a record refers back to the
// form, so records for different steps are fully independent; series.rs relies
// on that to evaluate steps in parallel.
//
// Module enable flags only decide whether a section is rendered. Each module's
// parameters are resolved whether or not the module is on.

use crate::curve::Curve;
use crate::derive::{DerivedDefaults, default_from_h};
use crate::form::{Form, Mode};
use crate::phase::Phase;
use crate::tables::{HumanizerQuality, NO_INFLUENCE, expand_style_tokens};
use crate::tristate::{Cell, Resolved, TextCell, clamp, resolve, resolve_pct};
use hypna_lexicon::SymbolLexicon;
use rand::Rng;

/// Intensity used when the hallucination cell holds no integer.
pub const FALLBACK_INTENSITY: i64 = 70;
/// Curve used when the curve cell is left blank.
pub const DEFAULT_CURVE: &str = "s-curve";
/// Upper bound on symbols sampled per step.
pub const MAX_SYMBOLS_PER_STATE: i64 = 10;

const DEFAULT_ARCANE_MODE: &str = "occult, mythological, symbolic, new weird system";
const DEFAULT_NEURO_STATE: &str = "cataplexy + sleep paralysis + hypnagogia";

// ---------------------------------------------------------------------------
// Resolved record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVibe {
    pub description: String,
    pub images: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatrix {
    pub hallucination: Resolved<i64>,
    pub temporal: Resolved<i64>,
    pub material: Resolved<i64>,
    pub space: Resolved<i64>,
    pub symbol: Resolved<i64>,
    pub agency: Resolved<i64>,
    pub saturation: Resolved<String>,
    pub motion: Resolved<String>,
    pub form: Resolved<String>,
    pub media: Resolved<String>,
    pub palette: Resolved<String>,
    pub surface: Resolved<String>,
    pub coherence: Resolved<i64>,
    pub recursion: Resolved<i64>,
    pub grain: Resolved<i64>,
    pub line_wobble: Resolved<i64>,
    pub erasure: Resolved<i64>,
    pub annotation: Resolved<i64>,
    /// Palette description for the intensity; not user-configurable.
    pub auto_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStateMap {
    pub name: String,
    pub geometry: Resolved<String>,
    pub transition_mode: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComposition {
    pub comp_mode: Resolved<String>,
    pub composition: Resolved<String>,
    pub tension: Resolved<String>,
    pub flow: Resolved<String>,
    pub framing: Resolved<String>,
    pub horizon: Resolved<String>,
    pub scale_logic: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGesture {
    pub gesture_mode: Resolved<String>,
    pub pressure: Resolved<String>,
    pub tempo: Resolved<String>,
    pub jitter: Resolved<String>,
    pub stroke_memory: Resolved<String>,
    pub interruption: Resolved<String>,
    pub hatch_density: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArcane {
    pub enabled: bool,
    pub mode: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSleep {
    pub enabled: bool,
    pub neuro_state: Resolved<String>,
    pub motor: Resolved<i64>,
    pub presence: Resolved<i64>,
    pub visual_drift: Resolved<i64>,
    pub auditory: Resolved<String>,
    pub affect: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    pub enabled: bool,
    pub mode: Resolved<String>,
    pub evolution: Resolved<String>,
    pub palette_lock: Resolved<String>,
    pub contrast: Resolved<String>,
    pub whiteness: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHumanizer {
    pub level: Resolved<i64>,
    /// Qualities switched on, in canonical order.
    pub qualities: Vec<HumanizerQuality>,
    pub notes: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPainting {
    pub influence: Resolved<String>,
    /// Disabled whenever the influence is the "NONE" sentinel.
    pub strength: Resolved<i64>,
    pub notes: Resolved<String>,
}

impl ResolvedPainting {
    /// The painting section renders unless the influence is disabled or is
    /// the "NONE" sentinel.
    pub fn is_active(&self) -> bool {
        match &self.influence {
            Resolved::Disable => false,
            Resolved::Omit => true,
            Resolved::Value(v) => !v.is_empty() && v != NO_INFLUENCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvolve {
    pub enabled: bool,
    pub steps: Resolved<i64>,
    pub path: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMutate {
    pub enabled: bool,
    pub strength: Resolved<i64>,
    pub drift: Resolved<String>,
    pub velocity: Resolved<String>,
    pub scope: Resolved<String>,
    pub mode: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrint {
    pub enabled: bool,
    pub mode: Resolved<String>,
    pub registration: Resolved<String>,
    pub texture: Resolved<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlates {
    pub enabled: bool,
    pub count: Resolved<i64>,
    pub logic: Resolved<String>,
    pub registration_map: Resolved<String>,
    pub overprint: Resolved<String>,
    /// Trimmed free-form plate map; empty when not supplied.
    pub map: String,
}

/// One fully resolved series step. Every configurable field is a concrete
/// value, Omit, or Disable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    /// 1-based step index.
    pub index: usize,
    pub mode: Mode,
    pub phase: Phase,
    /// Effective (clamped) intensity for this step.
    pub intensity: i64,
    /// Present only when the mode shows a subject and one was given.
    pub subject: Option<String>,
    /// Expanded style tokens; empty when none were given.
    pub style: String,
    pub injected_symbols: Vec<String>,
    pub vibe: ResolvedVibe,
    pub matrix: ResolvedMatrix,
    pub state_map: ResolvedStateMap,
    pub composition: ResolvedComposition,
    pub gesture: ResolvedGesture,
    pub arcane: ResolvedArcane,
    pub sleep: ResolvedSleep,
    pub color: ResolvedColor,
    pub humanizer: ResolvedHumanizer,
    pub painting: ResolvedPainting,
    pub evolve: ResolvedEvolve,
    pub mutate: ResolvedMutate,
    pub print: ResolvedPrint,
    pub plates: ResolvedPlates,
    pub notes: String,
}

// ---------------------------------------------------------------------------
// Intensity
// ---------------------------------------------------------------------------

/// Base intensity: the hallucination literal, or `FALLBACK_INTENSITY`.
/// Not clamped here; callers clamp where the value is used.
pub fn base_intensity(form: &Form) -> i64 {
    match form.matrix.hallucination {
        Cell::Literal(h) => h,
        _ => FALLBACK_INTENSITY,
    }
}

/// Normalized position of step `index` in a `total`-step series.
pub fn step_position(index: usize, total: usize) -> f64 {
    if total > 1 {
        index as f64 / (total - 1) as f64
    } else {
        0.0
    }
}

/// Effective intensity for one step.
///
/// With evolution on, more than one step, and both endpoints resolving to
/// integers (blank endpoints default to base ∓ 20), the intensity is
/// `clamp(round(start + (end − start) · curve(t)))`. Otherwise it is the
/// clamped base intensity.
pub fn step_intensity(form: &Form, index: usize, total: usize) -> i64 {
    let base = base_intensity(form);
    let start = resolve(&form.evolve.start_intensity, clamp(base.saturating_sub(20)));
    let end = resolve(&form.evolve.end_intensity, clamp(base.saturating_add(20)));

    match (form.evolve.enabled && total > 1, start, end) {
        (true, Resolved::Value(start), Resolved::Value(end)) => {
            let curve = match resolve(&form.evolve.curve, DEFAULT_CURVE.to_string()) {
                Resolved::Value(name) => Curve::from_name(&name),
                Resolved::Omit | Resolved::Disable => Curve::Linear,
            };
            let shaped = curve.value(step_position(index, total));
            // Endpoints are raw literals; the span is taken in f64 so any pair fits.
            let h = start as f64 + (end as f64 - start as f64) * shaped;
            clamp(h.round() as i64)
        }
        _ => clamp(base),
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn text(cell: &TextCell, default: &str) -> Resolved<String> {
    resolve(cell, default.to_string())
}

/// Resolve step `index` (0-based) of a `total`-step series.
///
/// `rng` is only consulted when symbol injection is on and the lexicon is
/// non-empty.
pub fn compute<R: Rng + ?Sized>(
    form: &Form,
    index: usize,
    total: usize,
    lexicon: &SymbolLexicon,
    rng: &mut R,
) -> ResolvedRecord {
    let h = step_intensity(form, index, total);
    let d: DerivedDefaults = default_from_h(h);
    let phase = Phase::classify(index, total);
    let multi_step = total > 1;

    let state_name = match &form.state_map.name_override {
        Cell::Literal(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => phase.label().to_string(),
    };

    let subject = form.subject.trim();
    let subject = (form.mode.shows_subject() && !subject.is_empty()).then(|| subject.to_string());

    let injected_symbols = if form.symbols.inject && !lexicon.is_empty() {
        let k = form.symbols.per_state.clamp(0, MAX_SYMBOLS_PER_STATE) as usize;
        lexicon.sample(k, rng)
    } else {
        Vec::new()
    };

    let m = &form.matrix;
    let matrix = ResolvedMatrix {
        hallucination: resolve_pct(&m.hallucination, h),
        temporal: resolve_pct(&m.temporal, d.temporal),
        material: resolve_pct(&m.material, d.material),
        space: resolve_pct(&m.space, d.space),
        symbol: resolve_pct(&m.symbol, d.symbol),
        agency: resolve_pct(&m.agency, d.agency),
        saturation: text(&m.saturation, d.saturation),
        motion: text(&m.motion, d.motion),
        form: text(&m.form, d.form),
        media: text(&m.media, d.media),
        palette: text(&m.palette, d.palette),
        surface: text(&m.surface, d.surface),
        coherence: resolve_pct(&m.coherence, d.coherence),
        recursion: resolve_pct(&m.recursion, d.recursion),
        grain: resolve_pct(&m.grain, d.grain),
        line_wobble: resolve_pct(&m.line_wobble, d.line_wobble),
        erasure: resolve_pct(&m.erasure, d.erasure),
        annotation: resolve_pct(&m.annotation, d.annotation),
        auto_color: d.palette_desc.to_string(),
    };

    let state_map = ResolvedStateMap {
        name: state_name,
        geometry: text(
            &form.state_map.geometry,
            if multi_step { "spiral" } else { "linear" },
        ),
        transition_mode: text(
            &form.state_map.transition_mode,
            if multi_step { "drift" } else { "continuous" },
        ),
    };

    let c = &form.composition;
    let composition = ResolvedComposition {
        comp_mode: text(&c.comp_mode, "auto"),
        composition: text(&c.composition, phase.composition()),
        tension: text(&c.tension, d.tension),
        flow: text(&c.flow, phase.flow()),
        framing: text(&c.framing, if phase.is_constricted() { "tight" } else { "open" }),
        horizon: text(&c.horizon, if phase.is_unstable() { "tilted" } else { "stable" }),
        scale_logic: text(&c.scale_logic, d.scale_logic),
    };

    let g = &form.gesture;
    let gesture = ResolvedGesture {
        gesture_mode: text(&g.gesture_mode, "auto"),
        pressure: text(&g.pressure, if phase.is_unstable() { "spike" } else { "pulse" }),
        tempo: text(&g.tempo, d.tempo),
        jitter: text(&g.jitter, d.jitter),
        stroke_memory: text(&g.stroke_memory, d.stroke_memory),
        interruption: text(
            &g.interruption,
            if phase.is_constricted() { "stutter" } else { "soft" },
        ),
        hatch_density: text(&g.hatch_density, d.hatch_density),
    };

    let arcane = ResolvedArcane {
        enabled: form.arcane.enabled,
        mode: text(&form.arcane.mode, DEFAULT_ARCANE_MODE),
    };

    let s = &form.sleep;
    let sleep = ResolvedSleep {
        enabled: s.enabled,
        neuro_state: text(&s.neuro_state, DEFAULT_NEURO_STATE),
        motor: resolve_pct(&s.motor, d.motor),
        presence: resolve_pct(&s.presence, d.presence),
        visual_drift: resolve_pct(&s.visual_drift, d.visual_drift),
        auditory: text(&s.auditory, d.auditory),
        affect: text(&s.affect, d.affect),
    };

    let col = &form.color;
    let color = ResolvedColor {
        enabled: col.enabled,
        mode: text(&col.mode, "adaptive"),
        evolution: text(&col.evolution, if multi_step { "deepening" } else { "phase" }),
        palette_lock: text(&col.palette_lock, ""),
        contrast: text(&col.contrast, d.contrast),
        whiteness: text(&col.whiteness, d.whiteness),
    };

    let humanizer = ResolvedHumanizer {
        level: resolve_pct(&form.humanizer.level, d.humanizer_level),
        qualities: form.humanizer.qualities.iter().copied().collect(),
        notes: text(&form.humanizer.notes, ""),
    };

    let influence = text(&form.painting.influence, NO_INFLUENCE);
    let strength = match influence.value() {
        Some(v) if v == NO_INFLUENCE => Resolved::Disable,
        _ => resolve_pct(&form.painting.strength, d.painting_strength),
    };
    let painting = ResolvedPainting {
        influence,
        strength,
        notes: text(&form.painting.notes, ""),
    };

    let live = form.mode == Mode::Live;
    let evolve = ResolvedEvolve {
        enabled: form.evolve.enabled,
        steps: resolve(&form.evolve.steps, if live { 6 } else { 1 }),
        path: text(&form.evolve.path, if live { "collapse" } else { "spiral" }),
    };

    let mu = &form.mutate;
    let progress = step_position(index, total);
    let mutate = ResolvedMutate {
        enabled: mu.enabled || live,
        strength: resolve_pct(
            &mu.strength,
            clamp((20.0 + 0.70 * h as f64 + 10.0 * progress) as i64),
        ),
        drift: text(&mu.drift, d.mutate_drift),
        velocity: text(&mu.velocity, d.mutate_velocity),
        scope: text(&mu.scope, d.mutate_scope),
        mode: text(&mu.mode, d.mutate_mode),
    };

    let p = &form.print;
    let print_mode_forced = form.mode == Mode::Print;
    let print = ResolvedPrint {
        enabled: p.print_enabled || print_mode_forced,
        mode: text(&p.print_mode, d.print_mode),
        registration: text(&p.registration, d.registration),
        texture: text(&p.texture, "paper tooth"),
    };
    let plates = ResolvedPlates {
        enabled: p.plates_enabled || print_mode_forced,
        count: resolve(&p.plate_count, d.plate_palette.default_plate_count()),
        logic: text(&p.plate_logic, d.plate_logic),
        registration_map: text(&p.registration_map, "progressive-drift"),
        overprint: text(&p.overprint, "unstable"),
        map: p.plate_map.trim().to_string(),
    };

    tracing::debug!(
        step = index + 1,
        total,
        intensity = h,
        phase = %phase,
        symbols = injected_symbols.len(),
        "resolved step"
    );

    ResolvedRecord {
        index: index + 1,
        mode: form.mode,
        phase,
        intensity: h,
        subject,
        style: expand_style_tokens(&form.style_tokens),
        injected_symbols,
        vibe: ResolvedVibe {
            description: form.vibe.description.trim().to_string(),
            images: form.vibe.image_list.trim().to_string(),
        },
        matrix,
        state_map,
        composition,
        gesture,
        arcane,
        sleep,
        color,
        humanizer,
        painting,
        evolve,
        mutate,
        print,
        plates,
        notes: form.notes.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn resolve_step(form: &Form, index: usize, total: usize) -> ResolvedRecord {
        compute(form, index, total, &SymbolLexicon::empty(), &mut StdRng::seed_from_u64(0))
    }

    fn evolving_form(start: i64, end: i64, curve: &str) -> Form {
        let mut form = Form::default();
        form.evolve.start_intensity = Cell::Literal(start);
        form.evolve.end_intensity = Cell::Literal(end);
        form.evolve.curve = Cell::text(curve);
        form
    }

    #[test]
    fn test_base_intensity_fallback() {
        let mut form = Form::default();
        assert_eq!(base_intensity(&form), 70);
        form.matrix.hallucination = Cell::Omit;
        assert_eq!(base_intensity(&form), 70);
        form.matrix.hallucination = Cell::Literal(33);
        assert_eq!(base_intensity(&form), 33);
    }

    #[test]
    fn test_single_step_uses_clamped_base() {
        let mut form = Form::default();
        form.matrix.hallucination = Cell::Literal(140);
        assert_eq!(step_intensity(&form, 0, 1), 100);
        form.matrix.hallucination = Cell::Literal(-10);
        assert_eq!(step_intensity(&form, 0, 1), 0);
    }

    #[test]
    fn test_linear_interpolation_endpoints() {
        let form = evolving_form(20, 80, "linear");
        assert_eq!(step_intensity(&form, 0, 5), 20);
        assert_eq!(step_intensity(&form, 2, 5), 50);
        assert_eq!(step_intensity(&form, 4, 5), 80);
    }

    #[test]
    fn test_interpolation_rounds() {
        // 10 + 25 * (1/3) = 18.33 → 18; 10 + 25 * (2/3) = 26.67 → 27
        let form = evolving_form(10, 35, "linear");
        assert_eq!(step_intensity(&form, 1, 4), 18);
        assert_eq!(step_intensity(&form, 2, 4), 27);
    }

    #[test]
    fn test_pulse_returns_to_start() {
        let form = evolving_form(30, 90, "pulse");
        assert_eq!(step_intensity(&form, 0, 3), 30);
        assert_eq!(step_intensity(&form, 1, 3), 90);
        assert_eq!(step_intensity(&form, 2, 3), 30);
    }

    #[test]
    fn test_blank_endpoints_default_around_base() {
        let mut form = Form::default();
        form.matrix.hallucination = Cell::Literal(50);
        form.evolve.curve = Cell::text("linear");
        assert_eq!(step_intensity(&form, 0, 3), 30);
        assert_eq!(step_intensity(&form, 2, 3), 70);
    }

    #[test]
    fn test_omitted_endpoint_disables_interpolation() {
        let mut form = evolving_form(10, 90, "linear");
        form.matrix.hallucination = Cell::Literal(44);
        form.evolve.end_intensity = Cell::Omit;
        assert_eq!(step_intensity(&form, 3, 4), 44);
    }

    #[test]
    fn test_extreme_literals_saturate_instead_of_overflowing() {
        let mut form = Form::default();
        form.matrix.hallucination = Cell::Literal(i64::MAX);
        assert_eq!(step_intensity(&form, 0, 3), 100);
        assert_eq!(step_intensity(&form, 2, 3), 100);
        form.matrix.hallucination = Cell::Literal(i64::MIN);
        assert_eq!(step_intensity(&form, 1, 3), 0);

        let form = evolving_form(i64::MIN, i64::MAX, "linear");
        assert_eq!(step_intensity(&form, 0, 5), 0);
        assert_eq!(step_intensity(&form, 4, 5), 100);
        let rec = resolve_step(&form, 2, 5);
        assert!((0..=100).contains(&rec.intensity));
    }

    #[test]
    fn test_evolution_off_keeps_base() {
        let mut form = evolving_form(10, 90, "linear");
        form.evolve.enabled = false;
        assert_eq!(step_intensity(&form, 3, 4), 70);
    }

    #[test]
    fn test_literal_overrides_and_omit_suppresses() {
        let mut form = Form::default();
        form.matrix.hallucination = Cell::Literal(72);
        form.matrix.temporal = Cell::Literal(5);
        form.matrix.grain = Cell::Omit;
        form.matrix.motion = Cell::Disable;
        let rec = resolve_step(&form, 0, 1);
        assert_eq!(rec.matrix.hallucination, Resolved::Value(72));
        assert_eq!(rec.matrix.temporal, Resolved::Value(5));
        assert_eq!(rec.matrix.grain, Resolved::Omit);
        assert_eq!(rec.matrix.motion, Resolved::Disable);
        // Autofill falls back to the derived default for h=72.
        assert_eq!(rec.matrix.material, Resolved::Value(57));
        assert_eq!(rec.matrix.saturation, Resolved::Value("dense".to_string()));
    }

    #[test]
    fn test_percentage_literals_are_clamped() {
        let mut form = Form::default();
        form.matrix.hallucination = Cell::Literal(150);
        form.sleep.motor = Cell::Literal(-20);
        let rec = resolve_step(&form, 0, 1);
        assert_eq!(rec.matrix.hallucination, Resolved::Value(100));
        assert_eq!(rec.sleep.motor, Resolved::Value(0));
    }

    #[test]
    fn test_phase_defaults_flow_into_composition() {
        let form = Form::default();
        let watcher = resolve_step(&form, 2, 6);
        assert_eq!(watcher.phase, Phase::Watcher);
        assert_eq!(watcher.state_map.name, "WATCHER");
        assert_eq!(watcher.composition.composition.value().unwrap(), "top-down pressure");
        assert_eq!(watcher.composition.framing.value().unwrap(), "tight");
        assert_eq!(watcher.composition.horizon.value().unwrap(), "stable");
        assert_eq!(watcher.gesture.interruption.value().unwrap(), "stutter");
        assert_eq!(watcher.gesture.pressure.value().unwrap(), "pulse");

        let bloom = resolve_step(&form, 4, 6);
        assert_eq!(bloom.composition.horizon.value().unwrap(), "tilted");
        assert_eq!(bloom.gesture.pressure.value().unwrap(), "spike");
        assert_eq!(bloom.composition.framing.value().unwrap(), "open");
    }

    #[test]
    fn test_series_shape_defaults() {
        let form = Form::default();
        let single = resolve_step(&form, 0, 1);
        assert_eq!(single.state_map.geometry.value().unwrap(), "linear");
        assert_eq!(single.state_map.transition_mode.value().unwrap(), "continuous");
        assert_eq!(single.color.evolution.value().unwrap(), "phase");

        let multi = resolve_step(&form, 0, 3);
        assert_eq!(multi.state_map.geometry.value().unwrap(), "spiral");
        assert_eq!(multi.state_map.transition_mode.value().unwrap(), "drift");
        assert_eq!(multi.color.evolution.value().unwrap(), "deepening");
    }

    #[test]
    fn test_state_name_override() {
        let mut form = Form::default();
        form.state_map.name_override = Cell::text("THE STAIRWELL");
        assert_eq!(resolve_step(&form, 0, 1).state_map.name, "THE STAIRWELL");
        form.state_map.name_override = Cell::Omit;
        assert_eq!(resolve_step(&form, 0, 1).state_map.name, "ANCHOR");
    }

    #[test]
    fn test_subject_rule() {
        let mut form = Form::default();
        form.subject = "  moth at the window ".into();
        assert_eq!(
            resolve_step(&form, 0, 1).subject.as_deref(),
            Some("moth at the window")
        );
        for mode in [Mode::Style, Mode::Gesture, Mode::Print] {
            form.mode = mode;
            assert_eq!(resolve_step(&form, 0, 1).subject, None, "{mode}");
        }
        form.mode = Mode::Live;
        form.subject = "   ".into();
        assert_eq!(resolve_step(&form, 0, 1).subject, None);
    }

    #[test]
    fn test_mode_forces_modules() {
        let mut form = Form::default();
        let rec = resolve_step(&form, 0, 1);
        assert!(!rec.print.enabled && !rec.plates.enabled && !rec.mutate.enabled);

        form.mode = Mode::Print;
        let rec = resolve_step(&form, 0, 1);
        assert!(rec.print.enabled && rec.plates.enabled);

        form.mode = Mode::Live;
        let rec = resolve_step(&form, 0, 1);
        assert!(rec.mutate.enabled);
        assert_eq!(rec.evolve.steps, Resolved::Value(6));
        assert_eq!(rec.evolve.path.value().unwrap(), "collapse");
    }

    #[test]
    fn test_disabled_module_still_resolves_parameters() {
        let form = Form::default();
        let rec = resolve_step(&form, 0, 1);
        assert!(!rec.print.enabled);
        assert_eq!(rec.print.texture.value().unwrap(), "paper tooth");
        assert_eq!(rec.plates.count, Resolved::Value(3));
    }

    #[test]
    fn test_mutation_strength_grows_along_series() {
        let mut form = Form::default();
        form.evolve.enabled = false;
        form.matrix.hallucination = Cell::Literal(40);
        // 20 + 28 + 10 * t
        assert_eq!(resolve_step(&form, 0, 3).mutate.strength, Resolved::Value(48));
        assert_eq!(resolve_step(&form, 1, 3).mutate.strength, Resolved::Value(53));
        assert_eq!(resolve_step(&form, 2, 3).mutate.strength, Resolved::Value(58));
    }

    #[test]
    fn test_painting_sentinel_disables_strength() {
        let mut form = Form::default();
        let rec = resolve_step(&form, 0, 1);
        assert_eq!(rec.painting.influence.value().unwrap(), NO_INFLUENCE);
        assert_eq!(rec.painting.strength, Resolved::Disable);
        assert!(!rec.painting.is_active());

        form.painting.influence = Cell::text("Rothko-like fields (not imitation)");
        form.matrix.hallucination = Cell::Literal(50);
        let rec = resolve_step(&form, 0, 1);
        assert!(rec.painting.is_active());
        assert_eq!(rec.painting.strength, Resolved::Value(35));

        form.painting.influence = Cell::Disable;
        assert!(!resolve_step(&form, 0, 1).painting.is_active());
    }

    #[test]
    fn test_symbol_injection_respects_toggle_and_cap() {
        let lexicon: SymbolLexicon = (0..15)
            .map(|i| (format!("sym{i:02}"), serde_json::Value::String(format!("v{i}"))))
            .collect();
        let mut form = Form::default();
        let mut rng = StdRng::seed_from_u64(9);
        assert!(compute(&form, 0, 1, &lexicon, &mut rng).injected_symbols.is_empty());

        form.symbols.inject = true;
        form.symbols.per_state = 3;
        assert_eq!(compute(&form, 0, 1, &lexicon, &mut rng).injected_symbols.len(), 3);

        form.symbols.per_state = 50;
        assert_eq!(compute(&form, 0, 1, &lexicon, &mut rng).injected_symbols.len(), 10);

        form.symbols.per_state = -2;
        assert!(compute(&form, 0, 1, &lexicon, &mut rng).injected_symbols.is_empty());

        form.symbols.per_state = 3;
        let empty = SymbolLexicon::empty();
        assert!(compute(&form, 0, 1, &empty, &mut rng).injected_symbols.is_empty());
    }

    #[test]
    fn test_no_autofill_survives_resolution() {
        // Resolved<T> has no Autofill variant; check that every blank cell got
        // a concrete value.
        let rec = resolve_step(&Form::default(), 0, 1);
        assert!(rec.matrix.hallucination.value().is_some());
        assert!(rec.matrix.annotation.value().is_some());
        assert!(rec.composition.scale_logic.value().is_some());
        assert!(rec.gesture.hatch_density.value().is_some());
        assert!(rec.sleep.visual_drift.value().is_some());
        assert!(rec.mutate.mode.value().is_some());
        assert!(rec.plates.overprint.value().is_some());
    }
}
