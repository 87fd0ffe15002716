use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use transpose_mt::{Algorithm, SquareMatrix, TransposeConfig, transpose};

fn random_matrix(n: usize) -> SquareMatrix {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let mut m = SquareMatrix::new(n).unwrap();
    m.randomize_with(&mut rng);
    m
}

fn algorithms_benchmark(c: &mut Criterion) {
    let config = TransposeConfig::default();
    let mut group = c.benchmark_group("transpose");

    for n in [256, 1024, 2048] {
        let mut m = random_matrix(n);
        for algorithm in Algorithm::ALL {
            group.bench_with_input(BenchmarkId::new(algorithm.name(), n), &n, |b, _| {
                // each iteration flips the same matrix back and forth
                b.iter(|| transpose(black_box(&mut m), algorithm, &config).unwrap())
            });
        }
    }
    group.finish();
}

fn tile_size_benchmark(c: &mut Criterion) {
    let n = 2048;
    let mut m = random_matrix(n);
    let mut group = c.benchmark_group("transpose_block_tile");

    for tile in [8, 16, 32, 64, 128] {
        let config = TransposeConfig::default().with_tile_size(tile);
        group.bench_function(format!("{}", tile), |b| {
            b.iter(|| transpose(black_box(&mut m), Algorithm::Block, &config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, algorithms_benchmark, tile_size_benchmark);
criterion_main!(benches);
