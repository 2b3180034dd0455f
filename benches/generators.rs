use criterion::{criterion_group, criterion_main, Criterion};
use mazes::generators;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_32", |b| {
        b.iter(|| generators::generate_seeded(32, 1))
    });
}

fn bench_recursive_backtracker_maze_128(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_maze_128", |b| {
        b.iter(|| generators::generate_seeded(128, 1))
    });
}

fn bench_injected_rng_maze_32(c: &mut Criterion) {
    let mut rng = XorShiftRng::seed_from_u64(7);
    c.bench_function("injected_rng_maze_32", move |b| {
        b.iter(|| generators::generate(32, &mut rng))
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_128,
    bench_injected_rng_maze_32
);
criterion_main!(benches);
