// Easing curves for intensity interpolation across a series.
//
// A series with evolution enabled walks from a start intensity to an end
// intensity. The step position t = i/(n-1) is shaped by one of these curves
// before interpolating. Curve names come straight from user input, so
// unknown names quietly behave as linear.

use std::f64::consts::PI;

/// Named easing curve. All curves map [0,1] onto [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Curve {
    Linear,
    /// t²
    EaseIn,
    /// 1 − (1 − t)²
    EaseOut,
    /// Smoothstep, 3t² − 2t³. Also accepted as "sigmoid".
    SCurve,
    /// One full raised-cosine cycle: 0 at both ends, 1 at the midpoint.
    Pulse,
}

impl Curve {
    /// Look up a curve by name (case-insensitive, surrounding whitespace
    /// ignored). Unrecognized names fall back to `Linear`.
    pub fn from_name(name: &str) -> Curve {
        match name.trim().to_ascii_lowercase().as_str() {
            "ease-in" => Curve::EaseIn,
            "ease-out" => Curve::EaseOut,
            "s-curve" | "sigmoid" => Curve::SCurve,
            "pulse" => Curve::Pulse,
            _ => Curve::Linear,
        }
    }

    /// Evaluate the curve at `t`, which is clamped to [0,1] first.
    pub fn value(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t,
            Curve::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Curve::SCurve => t * t * (3.0 - 2.0 * t),
            Curve::Pulse => 0.5 - 0.5 * (2.0 * PI * t).cos(),
        }
    }
}

/// Evaluate a curve given by name.
pub fn curve_value(name: &str, t: f64) -> f64 {
    Curve::from_name(name).value(t)
}
