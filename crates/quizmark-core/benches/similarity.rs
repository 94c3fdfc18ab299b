use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizmark_core::evaluator::evaluate;
use quizmark_core::similarity::{compare, similarity};
use quizmark_core::text::normalize;

const REFERENCE: &str = "This is a common line and it absolutely does not mean a short life. \
It suggests your life is dynamic and feels full of frequent changes or that you are easily \
influenced by outside events.";

const CLOSE: &str = "this is a common line, it does not mean a short life; your life is \
dynamic and full of frequent changes, and you are easily influenced by outside events";

const FAR: &str = "I honestly cannot remember what the short life line is supposed to mean.";

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    group.bench_function("reference", |b| b.iter(|| normalize(black_box(REFERENCE))));

    let noisy = "  You've   GOT -- 19 reasons!!\t\n to   smile  ".repeat(20);
    group.bench_function("noisy_repeated", |b| b.iter(|| normalize(black_box(&noisy))));

    group.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    group.bench_function("identical", |b| {
        b.iter(|| similarity(black_box(REFERENCE), black_box(REFERENCE)))
    });

    group.bench_function("close", |b| {
        b.iter(|| similarity(black_box(CLOSE), black_box(REFERENCE)))
    });

    group.bench_function("far", |b| {
        b.iter(|| similarity(black_box(FAR), black_box(REFERENCE)))
    });

    group.bench_function("compare_breakdown", |b| {
        b.iter(|| compare(black_box(CLOSE), black_box(REFERENCE)))
    });

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    c.bench_function("evaluate_default_threshold", |b| {
        b.iter(|| evaluate(black_box(CLOSE), black_box(REFERENCE), black_box(0.75)))
    });
}

criterion_group!(benches, bench_normalize, bench_similarity, bench_evaluate);
criterion_main!(benches);
