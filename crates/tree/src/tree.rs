//! Syntax trees and mounted sub-trees.
//!
//! A [`Tree`] is an immutable node: a [`NodeType`], child trees with start
//! positions relative to the parent, and a total length. Trees are shared
//! (`Arc`-backed), so cloning a handle is cheap and sub-trees can appear in
//! several places.
//!
//! A node may carry a [`MountedTree`]: another tree standing in for some or
//! all of its content. Without overlay ranges the mount replaces the node's
//! children entirely; with overlay ranges the inner tree covers only those
//! slices and the host children fill the gaps between them.

use crate::cursor::TreeCursor;
use crate::node::NodeType;
use std::sync::Arc;

/// An immutable syntax tree node.
#[derive(Clone)]
pub struct Tree {
    inner: Arc<TreeData>,
}

struct TreeData {
    ty: NodeType,
    children: Vec<Tree>,
    positions: Vec<usize>,
    len: usize,
    mounted: Option<MountedTree>,
}

impl Tree {
    /// Creates a node with the given children.
    ///
    /// `positions` holds each child's start offset relative to this node's
    /// start and must have one entry per child.
    pub fn new(ty: NodeType, children: Vec<Tree>, positions: Vec<usize>, len: usize) -> Self {
        assert_eq!(
            children.len(),
            positions.len(),
            "every child needs a start position"
        );
        Self {
            inner: Arc::new(TreeData {
                ty,
                children,
                positions,
                len,
                mounted: None,
            }),
        }
    }

    /// Creates a childless node of the given length.
    pub fn leaf(ty: NodeType, len: usize) -> Self {
        Self::new(ty, Vec::new(), Vec::new(), len)
    }

    /// Returns a copy of this node carrying a mount.
    pub fn with_mount(&self, mounted: MountedTree) -> Self {
        Self {
            inner: Arc::new(TreeData {
                ty: self.inner.ty.clone(),
                children: self.inner.children.clone(),
                positions: self.inner.positions.clone(),
                len: self.inner.len,
                mounted: Some(mounted),
            }),
        }
    }

    /// The node's type.
    pub fn node_type(&self) -> &NodeType {
        &self.inner.ty
    }

    /// The node's total length.
    pub fn len(&self) -> usize {
        self.inner.len
    }

    /// Whether the node spans no text.
    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// Child trees, in order.
    pub fn children(&self) -> &[Tree] {
        &self.inner.children
    }

    /// Child start offsets, relative to this node's start.
    pub fn positions(&self) -> &[usize] {
        &self.inner.positions
    }

    /// The mount attached to this node, if any.
    pub fn mounted(&self) -> Option<&MountedTree> {
        self.inner.mounted.as_ref()
    }

    /// A cursor positioned at this tree's root.
    pub fn cursor(&self) -> TreeCursor<'_> {
        TreeCursor::new(self)
    }
}

/// A sub-tree mounted onto a host node.
#[derive(Clone)]
pub struct MountedTree {
    tree: Tree,
    overlay: Option<Vec<OverlayRange>>,
}

impl MountedTree {
    /// A full mount: the inner tree replaces the host node's content.
    pub fn new(tree: Tree) -> Self {
        Self {
            tree,
            overlay: None,
        }
    }

    /// An overlay mount: the inner tree covers only the given ranges,
    /// expressed relative to the host node's start and ordered ascending.
    pub fn overlaid(tree: Tree, overlay: Vec<OverlayRange>) -> Self {
        Self {
            tree,
            overlay: Some(overlay),
        }
    }

    /// The mounted tree. Its positions are relative to the host node's
    /// start.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The overlay ranges, or `None` for a full mount.
    pub fn overlay(&self) -> Option<&[OverlayRange]> {
        self.overlay.as_deref()
    }
}

/// One overlay slice, relative to the host node's start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRange {
    pub from: usize,
    pub to: usize,
}

impl OverlayRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_has_no_children() {
        let word = Tree::leaf(NodeType::new("Word"), 4);
        assert_eq!(word.len(), 4);
        assert!(word.children().is_empty());
        assert!(word.mounted().is_none());
    }

    #[test]
    #[should_panic(expected = "every child needs a start position")]
    fn test_positions_must_match_children() {
        let word = Tree::leaf(NodeType::new("Word"), 4);
        Tree::new(NodeType::top("Doc"), vec![word], vec![], 4);
    }

    #[test]
    fn test_with_mount_preserves_shape() {
        let inner = Tree::leaf(NodeType::top("Inner"), 4);
        let host = Tree::leaf(NodeType::new("Host"), 4).with_mount(MountedTree::new(inner));
        assert_eq!(host.len(), 4);
        assert!(host.mounted().is_some());
        assert!(host.mounted().unwrap().overlay().is_none());
    }

    #[test]
    fn test_overlay_ranges_kept_in_order() {
        let inner = Tree::leaf(NodeType::top("Inner"), 10);
        let mount = MountedTree::overlaid(
            inner,
            vec![OverlayRange::new(2, 4), OverlayRange::new(6, 9)],
        );
        let ranges = mount.overlay().unwrap();
        assert_eq!(ranges[0], OverlayRange::new(2, 4));
        assert_eq!(ranges[1], OverlayRange::new(6, 9));
    }
}
