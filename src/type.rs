use std::fmt::Debug;

use num_traits::Bounded;

/// A trait for types that can be used for indexed coordinates.
///
/// The only requirements are a (partial) order and the [`Bounded`] sentinels, which seed the
/// unbounded search region of every query when the tree is built without explicit bounds. Every
/// type meeting those bounds implements this trait, so custom fixed-point or wrapper types can be
/// indexed too.
///
/// Indexed coordinates must be comparable to each other: a coordinate that is not comparable to
/// itself, such as a float `NaN`, is rejected with
/// [`InvalidCoordinate`][crate::KdIndexError::InvalidCoordinate].
pub trait IndexableNum: Bounded + PartialOrd + Copy + Debug + Send + Sync {}

impl<T> IndexableNum for T where T: Bounded + PartialOrd + Copy + Debug + Send + Sync {}

#[cfg(test)]
mod test {
    use super::IndexableNum;

    fn sentinels<N: IndexableNum>() -> (N, N) {
        (N::min_value(), N::max_value())
    }

    #[test]
    fn sentinels_come_from_the_type() {
        assert_eq!(sentinels::<i32>(), (i32::MIN, i32::MAX));
        assert_eq!(sentinels::<u8>(), (0, u8::MAX));
        assert_eq!(sentinels::<f64>(), (f64::MIN, f64::MAX));
    }
}
