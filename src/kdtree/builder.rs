use std::cmp::Ordering;

use geo_traits::CoordTrait;

use crate::error::{KdIndexError, Result};
use crate::indices::{left_child, right_child};
use crate::kdtree::distance::DistanceMetric;
use crate::kdtree::index::{KDTree, KDTreeMetadata};
use crate::kdtree::r#trait::coord_to_vec;
use crate::r#type::IndexableNum;

/// A builder to create a [`KDTree`].
///
/// ```
/// use kd_index::kdtree::{KDTreeBuilder, KDTreeIndex, SquaredEuclidean};
///
/// let mut builder = KDTreeBuilder::<f64>::new(2);
/// builder.add(&[0., 0.]).unwrap();
/// builder.add(&[1., 1.]).unwrap();
/// builder.add(&[2., 2.]).unwrap();
/// let tree = builder.finish(SquaredEuclidean).unwrap();
///
/// assert_eq!(tree.nearest_neighbors(&[1.8, 1.9], 1).unwrap(), vec![&[2., 2.][..]]);
/// ```
#[derive(Debug, Clone)]
pub struct KDTreeBuilder<N: IndexableNum> {
    /// Point coordinates in insertion order, `dims` values per point.
    coords: Vec<N>,
    dims: usize,
    num_items: usize,
    bounds: Option<(N, N)>,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder for points with `dims` dimensions.
    pub fn new(dims: usize) -> Self {
        Self::with_capacity(dims, 0)
    }

    /// Create a new builder, preallocating room for `num_items` points.
    pub fn with_capacity(dims: usize, num_items: usize) -> Self {
        Self {
            coords: Vec::with_capacity(dims * num_items),
            dims,
            num_items: 0,
            bounds: None,
        }
    }

    /// Use `min_value` and `max_value` as the bounds of the search space instead of the limits
    /// of the coordinate type.
    ///
    /// Every indexed coordinate must lie within these bounds, or [`finish`][Self::finish] fails
    /// with [`OutOfBounds`][KdIndexError::OutOfBounds]. Query points may lie anywhere.
    pub fn with_bounds(mut self, min_value: N, max_value: N) -> Self {
        self.bounds = Some((min_value, max_value));
        self
    }

    /// The number of points added so far.
    pub fn len(&self) -> usize {
        self.num_items
    }

    /// Returns `true` if no points were added yet.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// Add a point to the index, returning its insertion index.
    pub fn add(&mut self, point: &[N]) -> Result<u32> {
        if point.len() != self.dims {
            return Err(KdIndexError::DimensionMismatch {
                expected: self.dims,
                actual: point.len(),
            });
        }
        if let Some(axis) = point.iter().position(|c| c.partial_cmp(c).is_none()) {
            return Err(KdIndexError::InvalidCoordinate { axis });
        }
        if self.num_items >= u32::MAX as usize {
            return Err(KdIndexError::TooManyItems);
        }
        let index = self.num_items as u32;

        self.coords.extend_from_slice(point);
        self.num_items += 1;
        Ok(index)
    }

    /// Add a point from any [`CoordTrait`] implementation, returning its insertion index.
    pub fn add_coord(&mut self, coord: &impl CoordTrait<T = N>) -> Result<u32> {
        self.add(&coord_to_vec(coord))
    }

    /// Add every point of `points`, stopping at the first invalid one.
    pub fn extend<P: AsRef<[N]>>(&mut self, points: impl IntoIterator<Item = P>) -> Result<()> {
        for point in points {
            self.add(point.as_ref())?;
        }
        Ok(())
    }

    /// Consume this builder, sorting the points into a balanced tree that measures distances with
    /// `metric`.
    pub fn finish<M: DistanceMetric<N>>(self, metric: M) -> Result<KDTree<N, M>> {
        if self.dims == 0 {
            return Err(KdIndexError::InvalidDimensions);
        }
        if self.num_items == 0 {
            return Err(KdIndexError::EmptyInput);
        }

        let (min_value, max_value) = self.bounds.unwrap_or((N::min_value(), N::max_value()));
        if !matches!(
            min_value.partial_cmp(&max_value),
            Some(Ordering::Less | Ordering::Equal)
        ) {
            return Err(KdIndexError::InvalidBounds);
        }
        // The root search region is seeded from the bounds, so every point must lie inside them.
        for (i, &c) in self.coords.iter().enumerate() {
            if c < min_value || c > max_value {
                return Err(KdIndexError::OutOfBounds {
                    id: (i / self.dims) as u32,
                    axis: i % self.dims,
                });
            }
        }

        let capacity = slot_capacity(self.num_items);
        let mut ids = vec![None; capacity];
        let mut order: Vec<u32> = (0..self.num_items as u32).collect();
        let mut partitioner = Partitioner {
            ids: &mut ids,
            coords: &self.coords,
            dims: self.dims,
        };
        partitioner.sort(&mut order, 0, 0)?;

        log::debug!(
            "Built KDTree of {} points in {} dimensions ({} slots, {} levels)",
            self.num_items,
            self.dims,
            capacity,
            capacity.trailing_zeros()
        );

        Ok(KDTree {
            coords: self.coords,
            ids,
            metric,
            metadata: KDTreeMetadata {
                dims: self.dims,
                num_items: self.num_items,
                min_value,
                max_value,
            },
        })
    }
}

/// The smallest power of two strictly greater than `num_items`.
///
/// Medians are picked by position, so sibling subtrees differ in size by at most one point and
/// the tree has exactly `floor(log2(n)) + 1` levels, which always fit.
#[inline]
pub(crate) fn slot_capacity(num_items: usize) -> usize {
    (num_items + 1).next_power_of_two()
}

/// Writes points into level-order slots by recursive median splits.
struct Partitioner<'a, N> {
    ids: &'a mut [Option<u32>],
    coords: &'a [N],
    dims: usize,
}

impl<N: IndexableNum> Partitioner<'_, N> {
    #[inline]
    fn coord(&self, id: u32, axis: usize) -> N {
        self.coords[id as usize * self.dims + axis]
    }

    fn place(&mut self, slot: usize, id: u32) -> Result<()> {
        let capacity = self.ids.len();
        let entry = self
            .ids
            .get_mut(slot)
            .ok_or(KdIndexError::CapacityExceeded { slot, capacity })?;
        *entry = Some(id);
        Ok(())
    }

    /// Store the median of `subset` along `axis` at `slot` and recurse into both halves on the
    /// next axis.
    fn sort(&mut self, subset: &mut [u32], slot: usize, axis: usize) -> Result<()> {
        if subset.is_empty() {
            return Ok(());
        }

        // Stable, so equal coordinates keep their insertion order.
        subset.sort_by(|a, b| {
            self.coord(*a, axis)
                .partial_cmp(&self.coord(*b, axis))
                .unwrap_or(Ordering::Equal)
        });

        let m = subset.len() / 2;
        self.place(slot, subset[m])?;

        let (before, rest) = subset.split_at_mut(m);
        let after = &mut rest[1..];
        let next_axis = (axis + 1) % self.dims;

        for (child, half) in [(left_child(slot), before), (right_child(slot), after)] {
            match half.len() {
                0 => {}
                1 => self.place(child, half[0])?,
                _ => self.sort(half, child, next_axis)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kdtree::{KDTreeIndex, SquaredEuclidean};

    #[test]
    fn capacity_is_next_power_of_two_above_count() {
        assert_eq!(slot_capacity(1), 2);
        assert_eq!(slot_capacity(2), 4);
        assert_eq!(slot_capacity(3), 4);
        assert_eq!(slot_capacity(4), 8);
        assert_eq!(slot_capacity(7), 8);
        assert_eq!(slot_capacity(8), 16);
        assert_eq!(slot_capacity(1000), 1024);
    }

    #[test]
    fn rejects_wrong_dimensions() {
        let mut builder = KDTreeBuilder::<f64>::new(3);
        assert_eq!(
            builder.add(&[1., 2.]),
            Err(KdIndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn rejects_nan_coordinates() {
        let mut builder = KDTreeBuilder::<f64>::new(2);
        builder.add(&[1., 2.]).unwrap();
        assert_eq!(
            builder.add(&[f64::NAN, 2.]),
            Err(KdIndexError::InvalidCoordinate { axis: 0 })
        );
        assert_eq!(builder.len(), 1);

        let points: Vec<[f64; 2]> = (0..2000)
            .map(|i| {
                let x = if i % 3 == 0 { f64::NAN } else { i as f64 };
                [x, (i * 7 % 13) as f64]
            })
            .collect();
        assert_eq!(
            KDTree::<f64, _>::try_new(2, &points, SquaredEuclidean).unwrap_err(),
            KdIndexError::InvalidCoordinate { axis: 0 }
        );
    }

    #[test]
    fn rejects_points_outside_bounds() {
        let mut builder = KDTreeBuilder::<i32>::new(2).with_bounds(0, 100);
        builder.extend([[0, 0], [50, 100], [20, 101]]).unwrap();
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::OutOfBounds { id: 2, axis: 1 }
        );

        // Bounds set after the points are checked all the same.
        let mut builder = KDTreeBuilder::<i32>::new(1);
        builder.add(&[-5]).unwrap();
        let builder = builder.with_bounds(0, 10);
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::OutOfBounds { id: 0, axis: 0 }
        );
    }

    #[test]
    fn infinite_coordinates_exceed_default_bounds() {
        let mut builder = KDTreeBuilder::<f64>::new(1);
        builder.extend([[0.], [f64::INFINITY]]).unwrap();
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::OutOfBounds { id: 1, axis: 0 }
        );
    }

    #[test]
    fn rejects_empty_input() {
        let builder = KDTreeBuilder::<f64>::new(2);
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::EmptyInput
        );
    }

    #[test]
    fn rejects_zero_dimensions() {
        let mut builder = KDTreeBuilder::<f64>::new(0);
        builder.add(&[]).unwrap();
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::InvalidDimensions
        );
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut builder = KDTreeBuilder::<i32>::new(1).with_bounds(10, -10);
        builder.add(&[0]).unwrap();
        assert_eq!(
            builder.finish(SquaredEuclidean).unwrap_err(),
            KdIndexError::InvalidBounds
        );
    }

    #[test]
    fn stores_medians_in_level_order() {
        let mut builder = KDTreeBuilder::<i32>::new(2);
        builder
            .extend([[0, 0], [1, 1], [2, 2], [3, 3], [4, 4]])
            .unwrap();
        let tree = builder.finish(SquaredEuclidean).unwrap();
        let slots = tree.slots();

        assert_eq!(slots.len(), 8);
        assert_eq!(slots.get(0), Some(&[2, 2][..]));
        // [0, 0], [1, 1] split on y: median [1, 1], [0, 0] goes left.
        assert_eq!(slots.get(1), Some(&[1, 1][..]));
        assert_eq!(slots.get(3), Some(&[0, 0][..]));
        assert_eq!(slots.get(4), None);
        assert_eq!(slots.get(2), Some(&[4, 4][..]));
        assert_eq!(slots.get(5), Some(&[3, 3][..]));
        assert_eq!(slots.occupied().count(), 5);
    }

    #[test]
    fn duplicates_stay_balanced() {
        let mut builder = KDTreeBuilder::<u8>::new(1);
        builder.extend(std::iter::repeat([7u8]).take(100)).unwrap();
        let tree = builder.finish(SquaredEuclidean).unwrap();

        assert_eq!(tree.slots().len(), 128);
        assert_eq!(tree.slots().occupied().count(), 100);
        // Ties keep insertion order, so the median of the full set is insertion index 50.
        assert_eq!(tree.slots().id(0), Some(50));
    }

    #[test]
    fn add_coord() {
        let mut builder = KDTreeBuilder::<f64>::new(2);
        assert_eq!(builder.add_coord(&(1.0, 2.0)).unwrap(), 0);
        assert_eq!(builder.add_coord(&(3.0, 4.0)).unwrap(), 1);
        let tree = builder.finish(SquaredEuclidean).unwrap();
        assert_eq!(tree.num_items(), 2);
    }
}
