//! Index arithmetic and a read-only view over the level-order slot storage of a KDTree.
//!
//! The tree is laid out as an implicit complete binary tree, in the same way as a binary heap:
//! the root lives in slot `0` and the children of slot `i` live in slots `2i + 1` and `2i + 2`.
//! None of the functions here check bounds; compare the result against [`Slots::len`] before
//! dereferencing.

/// The slot of the left child of `slot`.
#[inline]
pub const fn left_child(slot: usize) -> usize {
    2 * slot + 1
}

/// The slot of the right child of `slot`.
#[inline]
pub const fn right_child(slot: usize) -> usize {
    2 * slot + 2
}

/// The slot of the parent of `slot`, or `None` for the root.
#[inline]
pub const fn parent(slot: usize) -> Option<usize> {
    if slot == 0 {
        None
    } else {
        Some((slot - 1) / 2)
    }
}

/// A read-only view over the level-order storage of a tree.
///
/// Each slot is either empty or refers to one of the indexed points by its insertion index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slots<'a, N> {
    ids: &'a [Option<u32>],
    coords: &'a [N],
    dims: usize,
}

impl<'a, N> Slots<'a, N> {
    pub(crate) fn new(ids: &'a [Option<u32>], coords: &'a [N], dims: usize) -> Self {
        debug_assert_eq!(coords.len() % dims, 0);
        Self { ids, coords, dims }
    }

    /// The number of slots, empty or not. This is the storage capacity of the tree.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The insertion index of the point stored in `slot`.
    ///
    /// Returns `None` when the slot is empty or out of bounds.
    #[inline]
    pub fn id(&self, slot: usize) -> Option<u32> {
        self.ids.get(slot).copied().flatten()
    }

    /// The point stored in `slot`.
    ///
    /// Returns `None` when the slot is empty or out of bounds.
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&'a [N]> {
        self.id(slot).map(|id| self.point(id))
    }

    /// The coordinates of the point with insertion index `id`.
    #[inline]
    pub(crate) fn point(&self, id: u32) -> &'a [N] {
        let start = id as usize * self.dims;
        &self.coords[start..start + self.dims]
    }

    /// Iterate over every slot in level order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'a [N]>> + '_ {
        (0..self.len()).map(move |slot| self.get(slot))
    }

    /// Iterate over the occupied slots in level order, as `(slot, point)` pairs.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &'a [N])> + '_ {
        self.ids
            .iter()
            .enumerate()
            .filter_map(move |(slot, id)| id.map(|id| (slot, self.point(id))))
    }
}
