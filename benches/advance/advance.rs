use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use epigrid::{Grid, GridConfig, NeighborhoodModel};

static SEED: u64 = 123;
static DAYS: u64 = 10;

fn run_days(neighborhood: NeighborhoodModel, radius: usize) -> Grid {
    let config = GridConfig {
        width: 100,
        height: 100,
        contagion_radius: radius,
        neighborhood,
        ..GridConfig::default()
    };
    let mut grid = Grid::new(config, SEED).expect("valid grid configuration");
    grid.populate_uniform_resistance(0.01)
        .expect("fresh grid can be populated");
    for _ in 0..DAYS {
        grid.advance();
    }
    grid
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance 100x100 for 10 days");
    for neighborhood in [NeighborhoodModel::VonNeumann, NeighborhoodModel::Moore] {
        for radius in [1, 3] {
            group.bench_with_input(
                BenchmarkId::new(format!("{neighborhood:?}"), radius),
                &radius,
                |bencher, &radius| bencher.iter_with_large_drop(|| run_days(neighborhood, radius)),
            );
        }
    }
    group.finish();
}

criterion_group!(advance_benches, criterion_benchmark);
criterion_main!(advance_benches);
