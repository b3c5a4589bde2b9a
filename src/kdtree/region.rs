//! Axis-aligned bounding regions used to prune subtrees during a search.

use crate::r#type::IndexableNum;

/// An axis-aligned box in `D`-dimensional space.
///
/// Every node of a KDTree owns the region of space its subtree can occupy. The root owns the
/// whole representable space; each split tightens one bound along the node's axis.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperRect<N> {
    min: Vec<N>,
    max: Vec<N>,
}


impl<N: IndexableNum> HyperRect<N> {
    /// A region covering `[min_value, max_value]` along every one of `dims` axes.
    pub fn infinite(dims: usize, max_value: N, min_value: N) -> Self {
        Self {
            min: vec![min_value; dims],
            max: vec![max_value; dims],
        }
    }

    /// The number of dimensions of this region.
    pub fn dims(&self) -> usize {
        self.min.len()
    }

    /// The lower corner.
    pub fn min(&self) -> &[N] {
        &self.min
    }

    /// The upper corner.
    pub fn max(&self) -> &[N] {
        &self.max
    }

    /// A copy of this region with the upper bound on `axis` moved to `value`.
    pub(crate) fn with_max(&self, axis: usize, value: N) -> Self {
        let mut region = self.clone();
        region.max[axis] = value;
        region
    }

    /// A copy of this region with the lower bound on `axis` moved to `value`.
    pub(crate) fn with_min(&self, axis: usize, value: N) -> Self {
        let mut region = self.clone();
        region.min[axis] = value;
        region
    }

    /// Split this region at `value` along `axis` into its `(left, right)` halves.
    pub fn split(&self, axis: usize, value: N) -> (Self, Self) {
        (self.with_max(axis, value), self.with_min(axis, value))
    }

    /// Whether `point` lies inside this region, boundaries included.
    pub fn contains(&self, point: &[N]) -> bool {
        point
            .iter()
            .zip(self.min.iter().zip(&self.max))
            .all(|(p, (min, max))| p >= min && p <= max)
    }

    /// The point inside this region closest to `target`, i.e. `target` clamped into the region
    /// along every axis.
    pub fn closest_point(&self, target: &[N]) -> Vec<N> {
        let mut out = Vec::with_capacity(self.dims());
        self.closest_point_into(target, &mut out);
        out
    }

    /// Like [`closest_point`][Self::closest_point], reusing `out` as the output buffer.
    pub(crate) fn closest_point_into(&self, target: &[N], out: &mut Vec<N>) {
        debug_assert_eq!(target.len(), self.dims());
        out.clear();
        out.extend(
            target
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .map(|(&t, (&min, &max))| clamp(t, min, max)),
        );
    }
}

/// Clamp for `PartialOrd` values.
#[inline]
fn clamp<N: PartialOrd>(value: N, min: N, max: N) -> N {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
