use agglo::{Clustering, HierarchicalClustering, Kmeans, Linkage};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

fn synthetic(n: usize, d: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (0..d).map(|_| rng.random::<f64>()).collect())
        .collect()
}

fn bench_kmeans(c: &mut Criterion) {
    let mut group = c.benchmark_group("kmeans");

    let data = synthetic(1000, 16);

    group.bench_function("fit_predict_n1000_d16_k10", |b| {
        b.iter(|| {
            let model = Kmeans::new(10).with_max_iter(10).with_seed(42);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

fn bench_linkage(c: &mut Criterion) {
    let mut group = c.benchmark_group("linkage");

    let data = synthetic(200, 8);

    group.bench_function("single_n200_d8_r5", |b| {
        b.iter(|| {
            let model = HierarchicalClustering::new(5).with_linkage(Linkage::Single);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.bench_function("complete_n200_d8_r5", |b| {
        b.iter(|| {
            let model = HierarchicalClustering::new(5).with_linkage(Linkage::Complete);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.bench_function("average_n200_d8_r5", |b| {
        b.iter(|| {
            let model = HierarchicalClustering::new(5).with_linkage(Linkage::Average);
            model.fit_predict(black_box(&data)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_kmeans, bench_linkage);
criterion_main!(benches);
