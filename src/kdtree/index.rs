use crate::error::Result;
use crate::kdtree::builder::KDTreeBuilder;
use crate::kdtree::distance::DistanceMetric;
use crate::r#type::IndexableNum;

/// Common metadata to describe a KDTree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDTreeMetadata<N: IndexableNum> {
    pub(crate) dims: usize,
    pub(crate) num_items: usize,
    pub(crate) min_value: N,
    pub(crate) max_value: N,
}

impl<N: IndexableNum> KDTreeMetadata<N> {
    /// The number of dimensions of every point in the tree.
    pub fn dimensions(&self) -> usize {
        self.dims
    }

    /// The number of points in the tree.
    pub fn num_items(&self) -> usize {
        self.num_items
    }

    /// The lower bound of the search space along every axis.
    pub fn min_value(&self) -> N {
        self.min_value
    }

    /// The upper bound of the search space along every axis.
    pub fn max_value(&self) -> N {
        self.max_value
    }
}

/// An immutable, balanced k-d tree over points of a fixed number of dimensions.
///
/// Usually this will be created via [`KDTreeBuilder`], or in one go with [`KDTree::try_new`].
/// Queries are provided by the [`KDTreeIndex`][crate::kdtree::KDTreeIndex] trait and only borrow
/// the tree, so a built tree can be shared across threads and queried concurrently.
#[derive(Debug, Clone)]
pub struct KDTree<N: IndexableNum, M> {
    /// Point coordinates in insertion order.
    pub(crate) coords: Vec<N>,
    /// Level-order slots, holding the insertion index of the point stored there.
    pub(crate) ids: Vec<Option<u32>>,
    pub(crate) metric: M,
    pub(crate) metadata: KDTreeMetadata<N>,
}

impl<N: IndexableNum, M: DistanceMetric<N>> KDTree<N, M> {
    /// Build a tree over `points`, each of which must have `dims` coordinates.
    ///
    /// The search space is bounded by the limits of `N`; use [`KDTreeBuilder::with_bounds`] to
    /// pick other bounds.
    pub fn try_new<P: AsRef<[N]>>(
        dims: usize,
        points: impl IntoIterator<Item = P>,
        metric: M,
    ) -> Result<Self> {
        let points = points.into_iter();
        let mut builder = KDTreeBuilder::with_capacity(dims, points.size_hint().0);
        builder.extend(points)?;
        builder.finish(metric)
    }
}

impl<N: IndexableNum, M> KDTree<N, M> {
    /// The coordinates of the point with insertion index `id`.
    pub fn point(&self, id: u32) -> Option<&[N]> {
        let start = (id as usize).checked_mul(self.metadata.dims)?;
        self.coords.get(start..start + self.metadata.dims)
    }

    /// Consume the tree, returning its points in insertion order as one flat buffer.
    pub fn into_inner(self) -> Vec<N> {
        self.coords
    }
}
