use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use vrptw_matrix::travel_matrices::TravelMatrices;

struct LonLat(f64, f64);

impl From<&LonLat> for geo_types::Point {
    fn from(value: &LonLat) -> Self {
        geo_types::Point::new(value.0, value.1)
    }
}

fn grid(size: usize) -> Vec<LonLat> {
    (0..size)
        .map(|i| {
            let row = (i / 32) as f64;
            let col = (i % 32) as f64;
            LonLat(-77.7 + col * 0.01, 43.0 + row * 0.01)
        })
        .collect()
}

fn haversine_matrix_benchmark(c: &mut Criterion) {
    for size in [30, 200, 1000] {
        let points = grid(size);
        c.bench_function(&format!("haversine matrix {size}"), |b| {
            b.iter(|| TravelMatrices::haversine(black_box(&points), black_box(30.0)))
        });
    }
}

criterion_group!(benches, haversine_matrix_benchmark);
criterion_main!(benches);
