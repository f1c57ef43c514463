//! Spin Benchmarks
//!
//! Outcome generation alone, and full spins under each reveal preset.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ps_core::{
    GameConfig, OutcomeGenerator, OutcomeModel, RevealTiming, SlotMachine, SymbolCatalog,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Benchmark outcome draws per model
fn bench_outcome_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("outcome_generation");
    group.throughput(Throughput::Elements(1));
    let catalog = SymbolCatalog::piano();

    for (name, model) in [
        ("biased_payline", OutcomeModel::BiasedPayline),
        ("row_echo", OutcomeModel::RowEcho),
    ] {
        let generator = OutcomeGenerator::new(0.8, model).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        group.bench_function(name, |b| {
            b.iter(|| black_box(generator.generate(&catalog, &mut rng)))
        });
    }

    group.finish();
}

/// Benchmark spin → settle, reveal played frame by frame
fn bench_full_spin(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_spin");
    group.throughput(Throughput::Elements(1));

    for (name, timing) in [
        ("instant", RevealTiming::instant()),
        ("ticks", RevealTiming::ticks()),
        ("continuous", RevealTiming::continuous()),
    ] {
        let config = GameConfig {
            starting_balance: u64::MAX / 2,
            timing,
            ..Default::default()
        };
        let mut machine = SlotMachine::seeded(config, 42).unwrap();
        group.bench_with_input(BenchmarkId::new("reveal", name), &name, |b, _| {
            b.iter(|| {
                machine.spin();
                black_box(machine.finish_spin())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_outcome_generation, bench_full_spin);
criterion_main!(benches);
