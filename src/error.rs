use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KdIndexError {
    /// A point handed to the tree does not have the tree's number of dimensions.
    #[error("Expected a point with {expected} dimensions, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A tree cannot be built from zero points.
    #[error("Cannot build a KDTree without any points.")]
    EmptyInput,

    /// A coordinate is not comparable to itself, such as a float `NaN`.
    #[error("Coordinate on axis {axis} is not comparable (NaN?).")]
    InvalidCoordinate { axis: usize },

    /// A point lies outside of the bounds of the search space.
    #[error("Point {id} lies outside of the search bounds on axis {axis}.")]
    OutOfBounds { id: u32, axis: usize },

    /// A tree must have at least one dimension.
    #[error("A KDTree needs at least one dimension.")]
    InvalidDimensions,

    /// The explicit search window has its minimum above its maximum.
    #[error("Minimum bound is greater than maximum bound.")]
    InvalidBounds,

    /// The distance metric returned a negative or NaN distance.
    #[error("Distance metric returned {0}; distances must be non-negative numbers.")]
    MetricContractViolation(f64),

    /// A skewed input tried to write past the end of the level-order storage.
    #[error("Slot {slot} is outside of the storage capacity {capacity}.")]
    CapacityExceeded { slot: usize, capacity: usize },

    /// Item ids are stored as `u32`.
    #[error("Cannot index more than {} points.", u32::MAX)]
    TooManyItems,
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
