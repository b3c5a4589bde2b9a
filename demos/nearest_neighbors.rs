//! Build a KDTree over a handful of 3D points and query it with different metrics.

use kd_index::kdtree::{Euclidean, KDTree, KDTreeBuilder, KDTreeIndex, Manhattan};

fn main() {
    let stations = [
        [0.0, 0.0, 0.0],
        [3.0, 4.0, 0.0],
        [6.0, 8.0, 1.0],
        [1.0, 1.0, 1.0],
        [-2.0, 5.0, 3.0],
        [7.0, -1.0, 2.0],
    ];

    println!("1. Nearest neighbors (Euclidean):");
    let tree = KDTree::<f64, _>::try_new(3, stations, Euclidean).unwrap();
    let query = [2.0, 2.0, 0.0];
    for neighbor in tree.nearest_neighbors_with_distance(&query, 3).unwrap() {
        println!(
            "  #{} {:?} at {:.3}",
            neighbor.id, neighbor.point, neighbor.distance
        );
    }

    println!("\n2. Everything within 5.0 (Manhattan):");
    let mut builder = KDTreeBuilder::<f64>::new(3).with_bounds(-10.0, 10.0);
    builder.extend(stations).unwrap();
    let tree = builder.finish(Manhattan).unwrap();
    for point in tree.radial_search(&query, 5.0, None).unwrap() {
        println!("  {:?}", point);
    }

    println!("\n3. Custom metric, ignoring height:");
    let planar = |a: &[f64], b: &[f64]| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
    let tree = KDTree::<f64, _>::try_new(3, stations, planar).unwrap();
    let root = tree.root();
    println!(
        "  root {:?} splits axis {} ({} levels of slots: {})",
        root.point(),
        root.axis(),
        tree.slots().len().trailing_zeros(),
        tree.slots().len()
    );
    println!("  closest: {:?}", tree.nearest_neighbors(&query, 1).unwrap());
}
