// Structural phases of a series.
//
// Each step of a series sits somewhere along a fixed six-phase arc, from a
// centered ANCHOR through POROUS seepage, WATCHER pressure, COLLAPSE and BLOOM
// to a closing RETURN. The phase depends only on the step's normalized
// position t = i/(n-1) (0 for a single-step series) and supplies defaults for
// composition, flow, framing, gesture pressure and friends.
//
// Used by resolve.rs. The band edges are fixed; changing them changes every
// rendered series.

use std::fmt;

/// One of the six ordered structural phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Anchor,
    Porous,
    Watcher,
    Collapse,
    Bloom,
    Return,
}

/// Upper (exclusive) band edges on t. Anything at or past the last edge is
/// `Return`.
const BANDS: [(f64, Phase); 5] = [
    (0.17, Phase::Anchor),
    (0.33, Phase::Porous),
    (0.50, Phase::Watcher),
    (0.67, Phase::Collapse),
    (0.84, Phase::Bloom),
];

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Anchor,
        Phase::Porous,
        Phase::Watcher,
        Phase::Collapse,
        Phase::Bloom,
        Phase::Return,
    ];

    /// Classify step `index` of a `total`-step series.
    pub fn classify(index: usize, total: usize) -> Phase {
        let t = if total > 1 {
            index as f64 / (total - 1) as f64
        } else {
            0.0
        };
        Phase::at(t)
    }

    /// Classify a normalized position directly.
    pub fn at(t: f64) -> Phase {
        BANDS
            .iter()
            .find(|(edge, _)| t < *edge)
            .map_or(Phase::Return, |&(_, phase)| phase)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Anchor => "ANCHOR",
            Phase::Porous => "POROUS",
            Phase::Watcher => "WATCHER",
            Phase::Collapse => "COLLAPSE",
            Phase::Bloom => "BLOOM",
            Phase::Return => "RETURN",
        }
    }

    pub fn composition(self) -> &'static str {
        match self {
            Phase::Anchor => "centered",
            Phase::Porous => "radial seep",
            Phase::Watcher => "top-down pressure",
            Phase::Collapse => "diagonal fall-lines",
            Phase::Bloom => "spiral recursion",
            Phase::Return => "evidence grid",
        }
    }

    pub fn flow(self) -> &'static str {
        match self {
            Phase::Anchor => "stable horizon",
            Phase::Porous => "soft drift",
            Phase::Watcher => "compression",
            Phase::Collapse => "gravity vectors",
            Phase::Bloom => "nested rings",
            Phase::Return => "partial closure",
        }
    }

    /// How this phase hands over to the next one.
    pub fn transition(self) -> &'static str {
        match self {
            Phase::Anchor => "slip",
            Phase::Porous => "drift",
            Phase::Watcher => "paralysis",
            Phase::Collapse => "collapse",
            Phase::Bloom => "loop",
            Phase::Return => "return",
        }
    }

    /// Subjective time quality within the phase.
    pub fn time_quality(self) -> &'static str {
        match self {
            Phase::Anchor | Phase::Return => "normal",
            Phase::Porous => "slowed",
            Phase::Watcher => "stretched",
            Phase::Collapse => "fragmented",
            Phase::Bloom => "suspended",
        }
    }

    /// WATCHER and COLLAPSE close the frame in and stutter the line.
    pub fn is_constricted(self) -> bool {
        matches!(self, Phase::Watcher | Phase::Collapse)
    }

    /// COLLAPSE and BLOOM tilt the horizon and spike the pressure.
    pub fn is_unstable(self) -> bool {
        matches!(self, Phase::Collapse | Phase::Bloom)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step_is_anchor() {
        assert_eq!(Phase::classify(0, 1), Phase::Anchor);
        assert_eq!(Phase::classify(0, 0), Phase::Anchor);
    }

    #[test]
    fn test_six_steps_visit_every_phase_in_order() {
        let phases: Vec<Phase> = (0..6).map(|i| Phase::classify(i, 6)).collect();
        assert_eq!(phases, Phase::ALL.to_vec());
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(Phase::at(0.0), Phase::Anchor);
        assert_eq!(Phase::at(0.1699), Phase::Anchor);
        assert_eq!(Phase::at(0.17), Phase::Porous);
        assert_eq!(Phase::at(0.33), Phase::Watcher);
        assert_eq!(Phase::at(0.50), Phase::Collapse);
        assert_eq!(Phase::at(0.67), Phase::Bloom);
        assert_eq!(Phase::at(0.84), Phase::Return);
        assert_eq!(Phase::at(1.0), Phase::Return);
    }

    #[test]
    fn test_two_steps_anchor_then_return() {
        assert_eq!(Phase::classify(0, 2), Phase::Anchor);
        assert_eq!(Phase::classify(1, 2), Phase::Return);
    }

    #[test]
    fn test_phase_table() {
        assert_eq!(Phase::Watcher.composition(), "top-down pressure");
        assert_eq!(Phase::Watcher.flow(), "compression");
        assert_eq!(Phase::Watcher.transition(), "paralysis");
        assert_eq!(Phase::Watcher.time_quality(), "stretched");
        assert_eq!(Phase::Bloom.composition(), "spiral recursion");
        assert_eq!(Phase::Return.flow(), "partial closure");
        assert_eq!(Phase::Return.time_quality(), "normal");
    }

    #[test]
    fn test_phase_traits() {
        assert!(Phase::Collapse.is_constricted() && Phase::Collapse.is_unstable());
        assert!(Phase::Watcher.is_constricted() && !Phase::Watcher.is_unstable());
        assert!(!Phase::Bloom.is_constricted() && Phase::Bloom.is_unstable());
        assert!(!Phase::Anchor.is_constricted() && !Phase::Anchor.is_unstable());
    }
}
