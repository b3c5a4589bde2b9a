//! An implementation of an immutable, balanced K-D Tree stored in level order.

#![warn(missing_docs)]

mod builder;
pub mod distance;
mod index;
mod queue;
mod region;
mod r#trait;
mod traversal;

pub use builder::KDTreeBuilder;
pub use distance::{Chebyshev, DistanceMetric, Euclidean, Manhattan, SquaredEuclidean};
pub use index::{KDTree, KDTreeMetadata};
pub use queue::BoundedPriorityQueue;
pub use r#trait::{KDTreeIndex, Neighbor};
pub use region::HyperRect;
pub use traversal::Node;
