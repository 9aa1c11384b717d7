use arcade_core::*;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for tier in Difficulty::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(tier), &tier, |b, &tier| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                RandomMinefieldGenerator::new(seed).generate(black_box(tier.config()))
            })
        });
    }
    group.finish();
}

fn flood_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_reveal");
    let config = GameConfig::new((128, 128), 0);
    group.bench_function("empty_128x128", |b| {
        b.iter_batched(
            || Minesweeper::with_config(config, 0),
            |mut engine| engine.reveal(black_box((64, 64))),
            criterion::BatchSize::LargeInput,
        )
    });
    for tier in Difficulty::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(tier), &tier, |b, &tier| {
            b.iter_batched(
                || Minesweeper::new(tier, 42),
                |mut engine| {
                    let (rows, cols) = engine.size();
                    for row in 0..rows {
                        for col in 0..cols {
                            if !engine.layout().contains_mine((row, col)) {
                                let _ = engine.reveal((row, col));
                            }
                        }
                    }
                    engine
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, generate, flood_reveal);
criterion_main!(benches);
