use geo_traits::CoordTrait;
use tinyvec::TinyVec;

use crate::error::{KdIndexError, Result};
use crate::indices::{left_child, right_child, Slots};
use crate::kdtree::distance::DistanceMetric;
use crate::kdtree::queue::BoundedPriorityQueue;
use crate::kdtree::region::HyperRect;
use crate::kdtree::traversal::Node;
use crate::kdtree::{KDTree, KDTreeMetadata};
use crate::r#type::IndexableNum;

/// A point found by a query, with its distance to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, N> {
    /// The insertion index of the point.
    pub id: u32,
    /// The coordinates of the point.
    pub point: &'a [N],
    /// The distance to the query point, as measured by the tree's metric.
    pub distance: f64,
}

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: IndexableNum>: Sized {
    /// The metric distances are measured with.
    type Metric: DistanceMetric<N>;

    /// Read-only view of the level-order storage of this tree.
    fn slots(&self) -> Slots<'_, N>;

    /// The metric distances are measured with.
    fn metric(&self) -> &Self::Metric;

    /// Access the metadata describing this KDTree
    fn metadata(&self) -> &KDTreeMetadata<N>;

    /// The number of items in this KDTree
    fn num_items(&self) -> usize {
        self.metadata().num_items()
    }

    /// The number of dimensions of every point in this KDTree
    fn dimensions(&self) -> usize {
        self.metadata().dimensions()
    }

    /// Find the `k` points closest to `target`, closest first.
    ///
    /// Returns every point when the tree holds fewer than `k`.
    fn nearest_neighbors(&self, target: &[N], k: usize) -> Result<Vec<&[N]>> {
        Ok(points(self.nearest_neighbors_with_distance(target, k)?))
    }

    /// Find the `k` points closest to `target`, closest first, along with their distances.
    fn nearest_neighbors_with_distance(
        &self,
        target: &[N],
        k: usize,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        search(self, target, k, f64::INFINITY)
    }

    /// Find the `k` points closest to a query coordinate, closest first.
    fn nearest_neighbors_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        k: usize,
    ) -> Result<Vec<&[N]>> {
        self.nearest_neighbors(&coord_to_vec(coord), k)
    }

    /// Find the points within `radius` of `center`, closest first.
    ///
    /// - center: query point
    /// - radius: maximum distance, inclusive, on the scale of the tree's metric
    /// - max_results: keep only this many of the closest points. `None` returns all of them.
    ///
    /// A negative or `NaN` radius matches nothing.
    fn radial_search(
        &self,
        center: &[N],
        radius: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<&[N]>> {
        Ok(points(
            self.radial_search_with_distance(center, radius, max_results)?,
        ))
    }

    /// Find the points within `radius` of `center`, closest first, along with their distances.
    fn radial_search_with_distance(
        &self,
        center: &[N],
        radius: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<Neighbor<'_, N>>> {
        let k = max_results.unwrap_or(self.num_items());
        search(self, center, k, radius)
    }

    /// Find the points within `radius` of a query coordinate, closest first.
    fn radial_search_coord(
        &self,
        coord: &impl CoordTrait<T = N>,
        radius: f64,
        max_results: Option<usize>,
    ) -> Result<Vec<&[N]>> {
        self.radial_search(&coord_to_vec(coord), radius, max_results)
    }

    /// Access the root node of the KDTree for manual traversal.
    fn root(&self) -> Node<'_, N, Self> {
        Node::from_root(self)
    }
}

impl<N: IndexableNum, M: DistanceMetric<N>> KDTreeIndex<N> for KDTree<N, M> {
    type Metric = M;

    fn slots(&self) -> Slots<'_, N> {
        Slots::new(&self.ids, &self.coords, self.metadata.dims)
    }

    fn metric(&self) -> &M {
        &self.metric
    }

    fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }
}

/// One unit of pending work of a search.
#[derive(Debug, Clone)]
enum Step<N> {
    /// Search the subtree rooted at `slot`.
    Visit {
        slot: usize,
        depth: usize,
        region: HyperRect<N>,
    },
    /// Search the subtree rooted at `slot` only if `region` could hold a better candidate.
    Far {
        slot: usize,
        depth: usize,
        region: HyperRect<N>,
    },
    /// Offer the point stored at `slot` to the results.
    Evaluate { slot: usize },
}

impl<N> Default for Step<N> {
    fn default() -> Self {
        Self::Evaluate { slot: 0 }
    }
}

/// Collect the `k` best points within `max_radius` of `target`.
///
/// For each node the near child is searched first, then the far child if the closest point of
/// its region is within reach, then the node itself.
fn search<'a, N: IndexableNum, T: KDTreeIndex<N>>(
    tree: &'a T,
    target: &[N],
    k: usize,
    max_radius: f64,
) -> Result<Vec<Neighbor<'a, N>>> {
    let metadata = tree.metadata();
    let dims = metadata.dimensions();
    if target.len() != dims {
        return Err(KdIndexError::DimensionMismatch {
            expected: dims,
            actual: target.len(),
        });
    }
    if k == 0 {
        return Ok(vec![]);
    }

    let slots = tree.slots();
    let metric = tree.metric();
    let mut results = BoundedPriorityQueue::new(k);
    let mut closest = Vec::with_capacity(dims);
    let mut visited = 0;

    // Use TinyVec to avoid heap allocations for shallow trees
    let mut stack: TinyVec<[Step<N>; 16]> = TinyVec::new();
    stack.push(Step::Visit {
        slot: 0,
        depth: 0,
        region: HyperRect::infinite(dims, metadata.max_value(), metadata.min_value()),
    });

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit {
                slot,
                depth,
                region,
            } => {
                let Some(point) = slots.get(slot) else {
                    continue;
                };
                visited += 1;

                let axis = depth % dims;
                let split = point[axis];
                let (left, right) = region.split(axis, split);
                let ((near, near_region), (far, far_region)) = if target[axis] <= split {
                    ((left_child(slot), left), (right_child(slot), right))
                } else {
                    ((right_child(slot), right), (left_child(slot), left))
                };

                // Note: these are pushed in backwards order to what gets popped
                stack.push(Step::Evaluate { slot });
                stack.push(Step::Far {
                    slot: far,
                    depth: depth + 1,
                    region: far_region,
                });
                stack.push(Step::Visit {
                    slot: near,
                    depth: depth + 1,
                    region: near_region,
                });
            }
            Step::Far {
                slot,
                depth,
                region,
            } => {
                if slots.id(slot).is_none() {
                    continue;
                }

                region.closest_point_into(target, &mut closest);
                let dist = checked_distance(metric.distance(target, &closest))?;
                let improves = !results.is_full()
                    || results.max_priority().is_some_and(|max| dist < max);
                if dist <= max_radius && improves {
                    stack.push(Step::Visit {
                        slot,
                        depth,
                        region,
                    });
                }
            }
            Step::Evaluate { slot } => {
                let Some(id) = slots.id(slot) else {
                    continue;
                };
                let point = slots.point(id);
                let distance = checked_distance(metric.distance(target, point))?;
                if distance <= max_radius {
                    results.push(
                        Neighbor {
                            id,
                            point,
                            distance,
                        },
                        distance,
                    );
                }
            }
        }
    }

    log::trace!(
        "KDTree search visited {} of {} nodes, found {}",
        visited,
        metadata.num_items(),
        results.len()
    );

    Ok(results.into_sorted_vec(true))
}

/// Reject distances that would break the ordering pruning depends on.
#[inline]
fn checked_distance(distance: f64) -> Result<f64> {
    if distance >= 0.0 {
        Ok(distance)
    } else {
        Err(KdIndexError::MetricContractViolation(distance))
    }
}

#[inline]
fn points<N>(neighbors: Vec<Neighbor<'_, N>>) -> Vec<&[N]> {
    neighbors.into_iter().map(|n| n.point).collect()
}

/// Collect the coordinates of a [`CoordTrait`] into a point.
pub(crate) fn coord_to_vec<N: IndexableNum>(coord: &impl CoordTrait<T = N>) -> Vec<N> {
    (0..coord.dim().size())
        .map(|axis| coord.nth_or_panic(axis))
        .collect()
}
