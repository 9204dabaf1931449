// Series generation benchmarks.
//
// Measures the full form → documents pipeline for a single FULL step, the
// default six-step LIVE series, and a twenty-step series with symbol
// injection (the largest series a form can ask for).

use criterion::{Criterion, criterion_group, criterion_main};
use hypna_engine::compiler::render;
use hypna_engine::form::{Form, Mode};
use hypna_engine::resolve::compute;
use hypna_engine::series::run;
use hypna_engine::tristate::Cell;
use hypna_lexicon::SymbolLexicon;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn bench_lexicon() -> SymbolLexicon {
    (0..200)
        .map(|i| (format!("glyph{i:03}"), serde_json::Value::String(format!("mark {i}"))))
        .collect()
}

fn bench_single_step(c: &mut Criterion) {
    let form = Form::starter();
    let lexicon = SymbolLexicon::empty();
    c.bench_function("resolve_and_render_one_step", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| render(&compute(black_box(&form), 0, 1, &lexicon, &mut rng)))
    });
}

fn bench_live_series(c: &mut Criterion) {
    let form = Form {
        mode: Mode::Live,
        ..Form::starter()
    };
    let lexicon = SymbolLexicon::empty();
    c.bench_function("live_series_6", |b| {
        let mut rng = StdRng::seed_from_u64(2);
        b.iter(|| run(black_box(&form), &lexicon, &mut rng))
    });
}

fn bench_max_series_with_symbols(c: &mut Criterion) {
    let mut form = Form::starter();
    form.evolve.steps = Cell::Literal(20);
    form.symbols.inject = true;
    form.symbols.per_state = 10;
    let lexicon = bench_lexicon();
    c.bench_function("series_20_with_symbols", |b| {
        let mut rng = StdRng::seed_from_u64(3);
        b.iter(|| run(black_box(&form), &lexicon, &mut rng))
    });
}

criterion_group!(
    benches,
    bench_single_step,
    bench_live_series,
    bench_max_series_with_symbols
);
criterion_main!(benches);
