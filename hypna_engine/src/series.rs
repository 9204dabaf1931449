// Series generation: resolve and render every step of a form.
//
// The step count comes from the evolution settings (see `step_count`). Steps
// are independent of each other once their random seeds are fixed, so the
// generator draws one u64 per step from the caller's RNG up front (in step
// order, on the calling thread), then resolves and renders the steps in
// parallel with rayon, each step driving its own `StdRng`. Output is always in
// step order, and a given caller seed produces the same series regardless of
// thread count.

use crate::compiler::render;
use crate::form::{Form, Mode};
use crate::resolve::{ResolvedRecord, compute};
use crate::tristate::Cell;
use hypna_lexicon::SymbolLexicon;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Maximum number of steps in one series.
pub const MAX_STEPS: i64 = 20;

/// One generated step: the resolved record and its rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDocument {
    /// 1-based step index.
    pub index: usize,
    pub record: ResolvedRecord,
    pub text: String,
}

/// Number of steps the form asks for.
///
/// Evolution off: 1. An integer steps literal is clamped to [1, 20]. Anything
/// else (blank, skip, none): 6 in LIVE mode, otherwise 1.
pub fn step_count(form: &Form) -> usize {
    if !form.evolve.enabled {
        return 1;
    }
    match form.evolve.steps {
        Cell::Literal(n) => n.clamp(1, MAX_STEPS) as usize,
        _ if form.mode == Mode::Live => 6,
        _ => 1,
    }
}

/// Resolve and render every step of `form`. Always returns at least one step.
pub fn run<R: Rng + ?Sized>(form: &Form, lexicon: &SymbolLexicon, rng: &mut R) -> Vec<StepDocument> {
    let total = step_count(form);
    let seeds: Vec<u64> = (0..total).map(|_| rng.random()).collect();

    tracing::debug!(steps = total, mode = %form.mode, "generating series");

    seeds
        .into_par_iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut step_rng = StdRng::seed_from_u64(seed);
            let record = compute(form, i, total, lexicon, &mut step_rng);
            let text = render(&record);
            StepDocument {
                index: i + 1,
                record,
                text,
            }
        })
        .collect()
}
