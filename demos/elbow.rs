//! Elbow-method sweep over a dataset with three natural groups.

use agglo::{ElbowSearch, PointStore};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Three blobs of four points each.
    let mut rows = Vec::new();
    for (cx, cy) in [(0.0, 0.0), (8.0, 8.0), (16.0, 0.0)] {
        for (dx, dy) in [(0.0, 0.0), (0.5, 0.1), (0.1, 0.5), (0.4, 0.4)] {
            rows.push(vec![cx + dx, cy + dy]);
        }
    }
    let store = PointStore::from_rows(rows).expect("valid rows");

    let rows = ElbowSearch::new()
        .with_max_k(10)
        .with_seed(42)
        .run(&store)
        .expect("sweep");

    println!("{:>3} {:>12} {:>12}", "k", "cost", "decline");
    for row in rows {
        println!("{:>3} {:>12.4} {:>12.4}", row.k, row.cost, row.decline);
    }
}
