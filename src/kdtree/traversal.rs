//! Utilities to traverse the KDTree structure.

use crate::indices::{left_child, right_child};
use crate::kdtree::region::HyperRect;
use crate::kdtree::KDTreeIndex;
use crate::r#type::IndexableNum;
use std::marker::PhantomData;

/// An occupied node in the KDTree.
#[derive(Debug, Clone)]
pub struct Node<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    /// Position of this node in the level-order storage.
    slot: usize,

    depth: usize,

    /// Insertion index of the point held by this node.
    id: u32,

    /// The part of space this node's subtree covers.
    region: HyperRect<N>,

    phantom: PhantomData<N>,
}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Node<'a, N, T> {
    fn new(tree: &'a T, slot: usize, depth: usize, region: HyperRect<N>) -> Option<Self> {
        let id = tree.slots().id(slot)?;
        Some(Self {
            tree,
            slot,
            depth,
            id,
            region,
            phantom: PhantomData,
        })
    }

    pub(crate) fn from_root(tree: &'a T) -> Self {
        let metadata = tree.metadata();
        let region = HyperRect::infinite(
            metadata.dimensions(),
            metadata.max_value(),
            metadata.min_value(),
        );
        // A built tree holds at least one point, and the first one always lands in slot 0.
        let id = tree.slots().id(0).unwrap_or_default();
        Self {
            tree,
            slot: 0,
            depth: 0,
            id,
            region,
            phantom: PhantomData,
        }
    }

    /// The position of this node in [`KDTreeIndex::slots`].
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The depth of this node; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The axis that the children of this node are split over.
    pub fn axis(&self) -> usize {
        self.depth % self.tree.dimensions()
    }

    /// The insertion index of the point held by this node.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The point held by this node.
    pub fn point(&self) -> &'a [N] {
        self.tree.slots().point(self.id)
    }

    /// The region of space covered by this node and all of its descendants.
    pub fn region(&self) -> &HyperRect<N> {
        &self.region
    }

    /// The child node holding points at or below this node's coordinate on [`axis`][Self::axis].
    pub fn left_child(&self) -> Option<Node<'a, N, T>> {
        let axis = self.axis();
        let region = self.region.with_max(axis, self.point()[axis]);
        Node::new(self.tree, left_child(self.slot), self.depth + 1, region)
    }

    /// The child node holding points at or above this node's coordinate on [`axis`][Self::axis].
    pub fn right_child(&self) -> Option<Node<'a, N, T>> {
        let axis = self.axis();
        let region = self.region.with_min(axis, self.point()[axis]);
        Node::new(self.tree, right_child(self.slot), self.depth + 1, region)
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        let slots = self.tree.slots();
        slots.id(left_child(self.slot)).is_none() && slots.id(right_child(self.slot)).is_none()
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }
}
