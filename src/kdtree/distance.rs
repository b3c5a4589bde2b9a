//! Distance metrics for spatial queries.
//!
//! Any `Fn(&[N], &[N]) -> f64` closure is a metric. This module also provides the common
//! coordinate-wise metrics for numeric coordinate types.
//!
//! The tree prunes a subtree by measuring the distance from the query point to the closest point
//! of the subtree's bounding box. For that to be correct, the metric must never report a point
//! inside the box as closer than the clamped point, which holds for all of the metrics below.

use num_traits::ToPrimitive;

use crate::r#type::IndexableNum;

/// A trait for calculating the distance between two points.
///
/// Distances must be non-negative and never `NaN`; queries fail with
/// [`MetricContractViolation`][crate::KdIndexError::MetricContractViolation] otherwise.
pub trait DistanceMetric<N: IndexableNum> {
    /// Distance between `a` and `b`. Both slices have the tree's number of dimensions.
    fn distance(&self, a: &[N], b: &[N]) -> f64;
}

impl<N: IndexableNum, F> DistanceMetric<N> for F
where
    F: Fn(&[N], &[N]) -> f64,
{
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        self(a, b)
    }
}

/// Squared Euclidean distance.
///
/// Cheapest of the Euclidean metrics and ranks points identically, but radii passed to radial
/// searches must be squared too.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl<N: IndexableNum + ToPrimitive> DistanceMetric<N> for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(a, b)| {
                let d = axis_delta(*a, *b);
                d * d
            })
            .sum()
    }
}

/// Euclidean (straight-line) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl<N: IndexableNum + ToPrimitive> DistanceMetric<N> for Euclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        SquaredEuclidean.distance(a, b).sqrt()
    }
}

/// Manhattan (taxicab) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<N: IndexableNum + ToPrimitive> DistanceMetric<N> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        a.iter().zip(b).map(|(a, b)| axis_delta(*a, *b).abs()).sum()
    }
}

/// Chebyshev (maximum coordinate difference) distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chebyshev;

impl<N: IndexableNum + ToPrimitive> DistanceMetric<N> for Chebyshev {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(a, b)| axis_delta(*a, *b).abs())
            .fold(0.0, f64::max)
    }
}

/// Signed difference along one axis, computed in `f64` so unsigned and narrow integer types
/// cannot overflow.
#[inline]
fn axis_delta<N: ToPrimitive>(a: N, b: N) -> f64 {
    a.to_f64().unwrap_or(f64::NAN) - b.to_f64().unwrap_or(f64::NAN)
}
