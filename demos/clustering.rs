//! All five algorithm variants on a simple 2D dataset, with quality metrics.

use agglo::metrics::{hamming_distance, silhouette_score};
use agglo::{HierarchicalClustering, Kmeans, Linkage, PointStore, Seeding};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Two well-separated clusters in 2D, with a ground-truth labeling.
    let data: Vec<Vec<f64>> = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.5, 0.5],
        vec![10.0, 10.0],
        vec![10.0, 11.0],
        vec![11.0, 10.0],
        vec![10.5, 10.5],
    ];
    let truth: Vec<usize> = vec![0, 0, 0, 0, 1, 1, 1, 1];

    let store = PointStore::from_rows(data.clone()).expect("valid rows");

    // --- Lloyd's with plain random seeding ---
    let fit = Kmeans::new(2)
        .with_seeding(Seeding::Random)
        .with_seed(42)
        .fit(&store)
        .expect("kmeans fit");
    report("Lloyd's (random seeding)", fit.labels(), &truth, fit.store());
    println!("  aggregate cost = {:.3}", fit.aggregate_cost());

    // --- k-means++ ---
    let fit = Kmeans::new(2).with_seed(42).fit(&store).expect("kmeans fit");
    report("k-means++", fit.labels(), &truth, fit.store());
    println!("  aggregate cost = {:.3}", fit.aggregate_cost());

    // --- Linkage variants ---
    for linkage in [Linkage::Single, Linkage::Complete, Linkage::Average] {
        let fit = HierarchicalClustering::new(2)
            .with_linkage(linkage)
            .fit(&store)
            .expect("linkage fit");
        report(&format!("{linkage:?} linkage"), fit.labels(), &truth, fit.store());
        for step in fit.merges() {
            println!("  merged <{},{}> at {:.3}, size {}", step.a, step.b, step.distance, step.size);
        }
    }
}

fn report(name: &str, labels: &[usize], truth: &[usize], store: &PointStore) {
    println!("\n=== {name} ===");
    for (id, label) in labels.iter().enumerate() {
        let dims = store.point(id).expect("point").dims();
        println!("  point {id:2} ({:5.1}, {:5.1}) => cluster {label}", dims[0], dims[1]);
    }
    let hamming = hamming_distance(truth, labels).expect("same length");
    match silhouette_score(store) {
        Ok(silhouette) => println!("  hamming = {hamming:.3}, silhouette = {silhouette:.3}"),
        Err(_) => println!("  hamming = {hamming:.3}, silhouette = n/a (single cluster)"),
    }
}
