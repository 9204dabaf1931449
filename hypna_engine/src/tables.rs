// Static lookup data: style-token expansions, painting influences, humanizer
// qualities, and the bootloader/system-file texts prepended by the full
// document export.
//
// Nothing here has behavior beyond lookup. The tables are built once on first
// use and shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Style tokens
// ---------------------------------------------------------------------------

const STYLE_TOKEN_LIST: [(&str, &str); 6] = [
    (
        "STYLE.HYPNAGOGIC",
        "porous perception, threshold drift, waking/dream seam, sensory instability",
    ),
    (
        "STYLE.OCCULT",
        "sigil-grammar, ritual diagram logic, correspondence pressure, symbolic recursion",
    ),
    (
        "STYLE.NEWWEIRD",
        "ontology fracture, non-human logic, liminal infrastructures, wrongness-without-reveal",
    ),
    (
        "STYLE.PRINT",
        "overprint thinking, misregistration drift, plate logic, physical ink behavior",
    ),
    (
        "STYLE.GRAPHIC_SCORE",
        "score-as-image, performable reading paths, time/intensity vectors, instructional ambiguity",
    ),
    (
        "STYLE.CONSPIRACY_DIAGRAM",
        "Lombardi-like map logic: arcs, nodes, annotations, evidence lines, ambiguity without resolution",
    ),
];

/// Known style tokens and their expansions.
pub static STYLE_TOKENS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STYLE_TOKEN_LIST.into_iter().collect());

/// Expand a comma-separated token list. Known tokens are replaced by their
/// expansion, unknown ones pass through verbatim; the results are joined with
/// "; ". Returns an empty string when there are no tokens.
pub fn expand_style_tokens(token_csv: &str) -> String {
    token_csv
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| STYLE_TOKENS.get(t).copied().unwrap_or(t))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Inverse of `expand_style_tokens`: each "; "-separated part that is a known
/// expansion turns back into its token, other parts pass through. Joined with
/// ", ".
pub fn collapse_style_text(style: &str) -> String {
    style
        .split("; ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|part| {
            STYLE_TOKEN_LIST
                .iter()
                .find(|(_, expansion)| *expansion == part)
                .map_or(part, |(token, _)| *token)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Painting influences
// ---------------------------------------------------------------------------

/// Sentinel influence meaning "no painting influence".
pub const NO_INFLUENCE: &str = "NONE";

/// The influence choices offered to hosts, sentinel first.
pub const PAINTING_INFLUENCES: [&str; 9] = [
    NO_INFLUENCE,
    "Bacon-like corporeal pressure (not imitation)",
    "Basquiat-like raw mark language (not imitation)",
    "Brus-like gestural abrasion (not imitation)",
    "De Kooning-like smears (not imitation)",
    "Goya-like chiaroscuro dread (not imitation)",
    "Turner-like atmospheric wash (not imitation)",
    "Rothko-like fields (not imitation)",
    "Abstract expressionist scrape (not imitation)",
];

// ---------------------------------------------------------------------------
// Humanizer qualities
// ---------------------------------------------------------------------------

/// A visible human artifact the humanizer can ask for. Declaration order is the
/// render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanizerQuality {
    WobbleLines,
    Hesitation,
    Redraws,
    Smudge,
    Drybrush,
    Misregistration,
    PaperTooth,
    Ghosting,
    Overpaint,
    TapeEdges,
    StippleNoise,
    Bleed,
}

impl HumanizerQuality {
    pub const ALL: [HumanizerQuality; 12] = [
        HumanizerQuality::WobbleLines,
        HumanizerQuality::Hesitation,
        HumanizerQuality::Redraws,
        HumanizerQuality::Smudge,
        HumanizerQuality::Drybrush,
        HumanizerQuality::Misregistration,
        HumanizerQuality::PaperTooth,
        HumanizerQuality::Ghosting,
        HumanizerQuality::Overpaint,
        HumanizerQuality::TapeEdges,
        HumanizerQuality::StippleNoise,
        HumanizerQuality::Bleed,
    ];

    /// Display label used in rendered documents.
    pub fn label(self) -> &'static str {
        match self {
            HumanizerQuality::WobbleLines => "Wobble lines",
            HumanizerQuality::Hesitation => "Hesitation marks",
            HumanizerQuality::Redraws => "Visible redraws",
            HumanizerQuality::Smudge => "Smudge / rub",
            HumanizerQuality::Drybrush => "Drybrush / broken ink",
            HumanizerQuality::Misregistration => "Misregistration drift",
            HumanizerQuality::PaperTooth => "Paper tooth / grain",
            HumanizerQuality::Ghosting => "Ghosting / plate memory",
            HumanizerQuality::Overpaint => "Overpaint / correction",
            HumanizerQuality::TapeEdges => "Tape edges / masking",
            HumanizerQuality::StippleNoise => "Stipple / noise fill",
            HumanizerQuality::Bleed => "Ink bleed / feather",
        }
    }

    /// Quality with the given display label, ignoring case.
    pub fn from_label(label: &str) -> Option<HumanizerQuality> {
        let label = label.trim();
        HumanizerQuality::ALL
            .into_iter()
            .find(|q| q.label().eq_ignore_ascii_case(label))
    }
}

// ---------------------------------------------------------------------------
// Export preamble
// ---------------------------------------------------------------------------

pub const BOOTLOADER_TEXT: &str = "===============================
HYPNAGNOSIS SYSTEM — BOOTLOADER
===============================
HANDRAW-HUMAN is always enforced:
- human-made drawing/print; pressure variation; wobble; redraws; imperfect edges; no sterile vector sheen.

Input conventions:
- blank = AUTOFILL
- SKIP = omit that parameter line
- NONE = neutralize / disable that module or parameter

If user did not specify required minimums, ask for:
1) MODE (FULL/STYLE/GESTURE/PRINT/LIVE)
2) Subject (unless STYLE/GESTURE/PRINT only)
3) Hallucination % (0–100)

END BOOTLOADER
";

pub const SYSTEM_FILE_TEXT: &str = "=========================================
HYPNAGNOSIS SYSTEM FILE — v2
=========================================
MODES
- [HYPNA/FULL]     Full stack
- [HYPNA/STYLE]    Style-only
- [HYPNA/GESTURE]  Gesture-only
- [HYPNA/PRINT]    Print/plates-only
- [HYPNA/LIVE]     Live evolving series

VIBE REFERENCES
- Provide a vibe description and optionally attached images.
- Images are vibe-only; never copy composition or elements.

HUMANIZER
- Humanizer range controls how visibly human/physical the making is.
- Qualities toggle specific human artifacts (smudge, redraws, hesitation, etc.)

EXPORTS
- Every module has Copy/Save exports (no export tab).

END SYSTEM FILE
";
