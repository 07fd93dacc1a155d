//! Benchmarks for noise generation and perturbed objective evaluation
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vector_mechanism::{DpMechanism, Evaluation, Vector};

fn quadratic(w: &[f64]) -> Evaluation {
    let value = 0.5 * w.iter().map(|x| x * x).sum::<f64>();
    Evaluation::ValueAndGradient(value, w.to_vec())
}

fn configured(d: usize) -> Vector {
    let mut mech = Vector::with_seed(42);
    mech.set_epsilon_delta(1.0, 0.0)
        .unwrap()
        .set_sensitivity(0.25, 1.0)
        .unwrap()
        .set_dimension(d as f64)
        .unwrap();
    mech
}

fn bench_randomise(c: &mut Criterion) {
    let mut group = c.benchmark_group("randomise");

    for d in [10usize, 100, 1_000, 10_000] {
        let mut mech = configured(d);
        group.bench_with_input(BenchmarkId::new("draw_noise", d), &d, |b, _| {
            b.iter(|| mech.randomise(black_box(quadratic)).unwrap())
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for d in [10usize, 100, 1_000, 10_000] {
        let wrapped = configured(d).randomise(quadratic).unwrap();
        let w: Vec<f64> = (0..d).map(|i| (i as f64).sin()).collect();

        group.bench_with_input(BenchmarkId::new("value_and_gradient", d), &w, |b, w| {
            b.iter(|| wrapped.evaluate(black_box(w)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_randomise, bench_evaluate);
criterion_main!(benches);
