use criterion::{criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use std::io::Cursor;
use vsm_core::tokenizer::normalize;
use vsm_core::{Boosts, SearchEngine};

const ABSTRACT: &str = "an experimental study of a wing in a propeller slipstream was made in order to \
determine the spanwise distribution of the lift increase due to slipstream at different angles of attack \
of the wing and at different free stream to slipstream velocity ratios";

const TITLES: &[&str] = &[
    "experimental investigation of the aerodynamics of a wing in a slipstream",
    "simple shear flow past a flat plate in an incompressible fluid of small viscosity",
    "the boundary layer in simple shear flow past a flat plate",
    "approximate solutions of the incompressible laminar boundary layer equations",
    "one-dimensional transient heat conduction into a double-layer slab",
];

fn synthetic_corpus(docs: usize) -> String {
    let mut out = String::new();
    for id in 1..=docs {
        let title = TITLES[id % TITLES.len()];
        let _ = write!(out, ".I {id}\n.T\n{title}\n.A\nanon\n.B\nreport {id}\n.W\n{ABSTRACT} {title}\n");
    }
    out
}

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_abstract", |b| b.iter(|| normalize(ABSTRACT)));
}

fn bench_search(c: &mut Criterion) {
    let mut engine = SearchEngine::new();
    engine.load_corpus(Cursor::new(synthetic_corpus(1400))).unwrap();
    c.bench_function("search_1400_docs", |b| {
        b.iter(|| engine.search("incompressible boundary layer on a flat plate", Boosts::default()).len())
    });
}

criterion_group!(benches, bench_normalize, bench_search);
criterion_main!(benches);
