// Intensity-driven default derivation.
//
// A single scalar, the hallucination intensity h in [0, 100], drives most of
// the defaults a blank form resolves to. Numeric attributes follow linear
// formulas `clamp(trunc(base + slope * h))`; categorical attributes are picked
// from threshold bands on h.
//
// These numbers are part of the output format: existing prompt libraries and
// the compatibility tests depend on every coefficient and band edge, including
// the truncation toward zero (not rounding) of the linear formulas.
//
// Phase-driven and series-shape defaults are not here; resolve.rs combines
// them with these.

use crate::tristate::clamp;

/// Plate palette for the plate generator, banded like the color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatePalette {
    Mono,
    Duotone,
    Tritone,
    Quad,
}

impl PlatePalette {
    /// Default plate count: three plates for duotone and tritone work, four
    /// otherwise.
    pub fn default_plate_count(self) -> i64 {
        match self {
            PlatePalette::Duotone | PlatePalette::Tritone => 3,
            PlatePalette::Mono | PlatePalette::Quad => 4,
        }
    }
}

/// Every default that depends only on the intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedDefaults {
    // Hypna matrix, numeric.
    pub temporal: i64,
    pub material: i64,
    pub space: i64,
    pub symbol: i64,
    pub agency: i64,
    pub coherence: i64,
    pub recursion: i64,
    pub grain: i64,
    pub line_wobble: i64,
    pub erasure: i64,
    pub annotation: i64,

    // Hypna matrix, categorical.
    pub saturation: &'static str,
    pub motion: &'static str,
    pub form: &'static str,
    pub media: &'static str,
    pub palette: &'static str,
    pub surface: &'static str,

    // Color.
    pub palette_desc: &'static str,
    pub plate_palette: PlatePalette,
    pub contrast: &'static str,
    pub whiteness: &'static str,

    // Composition and gesture.
    pub tension: &'static str,
    pub scale_logic: &'static str,
    pub tempo: &'static str,
    pub jitter: &'static str,
    pub stroke_memory: &'static str,
    pub hatch_density: &'static str,

    // Sleep state.
    pub motor: i64,
    pub presence: i64,
    pub visual_drift: i64,
    pub auditory: &'static str,
    pub affect: &'static str,

    // Humanizer and painting.
    pub humanizer_level: i64,
    pub painting_strength: i64,

    // Print and plates.
    pub print_mode: &'static str,
    pub registration: &'static str,
    pub plate_logic: &'static str,

    // Mutation.
    pub mutate_drift: &'static str,
    pub mutate_velocity: &'static str,
    pub mutate_scope: &'static str,
    pub mutate_mode: &'static str,
}

/// `clamp(trunc(base + slope * h))`.
fn linear(base: f64, slope: f64, h: i64) -> i64 {
    clamp((base + slope * h as f64) as i64)
}

/// Pick from ascending threshold bands: the first band whose (exclusive) upper
/// edge exceeds `h`, or `last` when `h` is past every edge.
fn band<T: Copy>(h: i64, bands: &[(i64, T)], last: T) -> T {
    bands
        .iter()
        .find(|(edge, _)| h < *edge)
        .map_or(last, |&(_, value)| value)
}

/// Palette description and plate palette, banded at 25/50/75.
pub fn auto_color_map(h: i64) -> (&'static str, PlatePalette) {
    band(
        h,
        &[
            (25, ("monochrome graphite + faint wash", PlatePalette::Mono)),
            (50, ("limited 2–3 ink palette", PlatePalette::Duotone)),
            (75, ("riso overprint + visible misregistration", PlatePalette::Tritone)),
        ],
        ("unstable spectral overprint (still physical ink)", PlatePalette::Quad),
    )
}

/// Derive every intensity-driven default. `h` is clamped into [0, 100] first.
pub fn default_from_h(h: i64) -> DerivedDefaults {
    let h = clamp(h);
    let (palette_desc, plate_palette) = auto_color_map(h);
    let two_way = |edge: i64, below: &'static str, above: &'static str| {
        if h < edge { below } else { above }
    };

    DerivedDefaults {
        temporal: linear(30.0, 0.60, h),
        material: linear(75.0, -0.25, h),
        space: linear(35.0, 0.45, h),
        symbol: linear(12.0, 0.78, h),
        agency: linear(65.0, -0.30, h),
        coherence: linear(90.0, -0.70, h),
        recursion: linear(5.0, 0.85, h),
        grain: linear(18.0, 0.55, h),
        line_wobble: linear(12.0, 0.70, h),
        erasure: linear(10.0, 0.35, h),
        annotation: linear(8.0, 0.45, h),

        saturation: band(h, &[(25, "sparse"), (50, "balanced"), (75, "dense")], "overload"),
        motion: band(h, &[(20, "still"), (45, "flowing"), (75, "kinetic")], "explosive"),
        form: band(h, &[(30, "figurative"), (70, "hybrid")], "field"),
        media: band(h, &[(25, "graphite"), (45, "ink"), (80, "mixed")], "print"),
        palette: band(h, &[(25, "mono"), (50, "limited"), (75, "riso")], "unstable"),
        surface: band(h, &[(20, "clean"), (55, "paper"), (85, "aged")], "fractured"),

        palette_desc,
        plate_palette,
        contrast: two_way(60, "medium", "high"),
        whiteness: two_way(70, "more white", "white breaks"),

        tension: two_way(55, "medium", "high"),
        scale_logic: two_way(60, "single-plane", "nested"),
        tempo: two_way(70, "moderate", "erratic"),
        jitter: two_way(60, "micro", "high"),
        stroke_memory: two_way(55, "light", "echo"),
        hatch_density: two_way(55, "balanced", "dense"),

        motor: linear(20.0, 0.55, h),
        presence: linear(12.0, 0.70, h),
        visual_drift: linear(15.0, 0.60, h),
        auditory: two_way(70, "low hum", "intrusive signal"),
        affect: two_way(55, "uncanny", "dread"),

        humanizer_level: linear(25.0, 0.60, h),
        painting_strength: linear(15.0, 0.40, h),

        print_mode: two_way(50, "hybrid-print", "riso"),
        registration: two_way(55, "slight", "loose"),
        plate_logic: two_way(60, "structural", "symbolic"),

        mutate_drift: two_way(55, "medium", "high"),
        mutate_velocity: two_way(70, "moderate", "erratic"),
        mutate_scope: two_way(60, "spatial", "total"),
        mutate_mode: two_way(70, "organic", "recursive"),
    }
}
