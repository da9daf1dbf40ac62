//! Criterion benchmarks for the hot paths of both cores.
//!
//! Uses synthetic inputs to measure tree evaluation, parallel fitness, and
//! GAP assignment independent of any real dataset.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evopt::aco::{gap, select_medians, PMedianInstance, Point};
use evopt::gp::{self, Dataset, GpConfig};
use evopt::parallel::EvalPool;
use evopt::random::create_rng;

fn synthetic_dataset(samples: usize) -> Dataset {
    (0..samples)
        .map(|i| {
            let x0 = 1.0 + i as f64 * 0.25;
            let x1 = 2.0 + i as f64 * 0.5;
            (vec![x0, x1], x0 * x1 + x0)
        })
        .collect()
}

fn bench_population_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("population_fitness");
    let dataset = synthetic_dataset(200);

    for &population_size in &[48usize, 96] {
        let mut rng = create_rng(42);
        let config = GpConfig::default()
            .with_max_height(7)
            .with_population_size(population_size)
            .with_variables(2);
        let population = gp::ramped_half_and_half(&mut rng, &config);
        let pool = EvalPool::new();

        group.bench_with_input(
            BenchmarkId::from_parameter(population_size),
            &population,
            |b, population| {
                b.iter(|| gp::population_fitness(black_box(population), &dataset, &pool));
            },
        );
    }
    group.finish();
}

fn bench_new_generation(c: &mut Criterion) {
    let mut rng = create_rng(7);
    let config = GpConfig::default()
        .with_max_height(7)
        .with_population_size(96)
        .with_variables(2);
    let dataset = synthetic_dataset(50);
    let pool = EvalPool::new();

    let population = gp::ramped_half_and_half(&mut rng, &config);
    let fitnesses = gp::population_fitness(&population, &dataset, &pool);
    let sizes = gp::population_sizes(&population);
    let stats = gp::Statistics::new(
        &population,
        &fitnesses,
        &sizes,
        &gp::ImprovementMetadata::default(),
    );

    c.bench_function("new_generation_96", |b| {
        b.iter(|| {
            gp::new_generation(
                &mut rng,
                &config,
                black_box(&population),
                &fitnesses,
                &sizes,
                &stats,
            )
        });
    });
}

fn grid_instance(side: usize) -> PMedianInstance {
    let points = (0..side * side)
        .map(|i| Point {
            x: (i % side) as f64,
            y: (i / side) as f64,
            capacity: 50.0,
            demand: 1.0,
        })
        .collect();
    PMedianInstance::new(points, side)
}

fn bench_gap(c: &mut Criterion) {
    let instance = grid_instance(10);
    let distances = instance.distance_matrix();
    let mut rng = create_rng(3);
    let pheromones = vec![0.5; instance.num_points()];
    let (clients, medians) = select_medians(&mut rng, &pheromones, instance.num_medians());

    c.bench_function("gap_100_points", |b| {
        b.iter(|| {
            gap(
                black_box(&instance),
                &clients,
                &medians,
                &distances,
            )
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_population_fitness,
    bench_new_generation,
    bench_gap
);
criterion_main!(benches);
