//! Stateful traversal over a [`Tree`].
//!
//! The cursor keeps an explicit stack of (sub-tree, absolute start) frames.
//! Every successful [`TreeCursor::first_child`] must eventually be paired
//! with a [`TreeCursor::parent`] by the caller; the walker in the highlight
//! crate relies on that discipline to keep the cursor balanced across early
//! exits.
//!
//! Positions reported by the cursor are offsets within the tree the cursor
//! was created from. Mounted inner trees carry host-relative positions, so
//! a cursor over an inner tree reports host-relative offsets.

use crate::node::NodeType;
use crate::tree::Tree;

/// A cursor over a tree, positioned at one node at a time.
pub struct TreeCursor<'a> {
    frames: Vec<Frame<'a>>,
}

#[derive(Clone, Copy)]
struct Frame<'a> {
    tree: &'a Tree,
    start: usize,
    /// Index within the parent's children; `None` for the root frame and
    /// for a mounted tree's root, which have no siblings.
    index: Option<usize>,
}

impl<'a> TreeCursor<'a> {
    pub(crate) fn new(root: &'a Tree) -> Self {
        Self {
            frames: vec![Frame {
                tree: root,
                start: 0,
                index: None,
            }],
        }
    }

    fn top(&self) -> Frame<'a> {
        self.frames[self.frames.len() - 1]
    }

    /// The type of the current node.
    pub fn node_type(&self) -> &'a NodeType {
        self.top().tree.node_type()
    }

    /// Start offset of the current node.
    pub fn from(&self) -> usize {
        self.top().start
    }

    /// End offset of the current node.
    pub fn to(&self) -> usize {
        let top = self.top();
        top.start + top.tree.len()
    }

    /// The sub-tree rooted at the current node.
    pub fn tree(&self) -> &'a Tree {
        self.top().tree
    }

    /// Moves to the current node's first child.
    ///
    /// A node carrying a full mount (no overlay) has the mounted tree's
    /// root as its single child; its own children are shadowed. Overlay
    /// mounts do not affect traversal here: the host children are iterated
    /// and the caller is expected to drive the inner tree itself.
    pub fn first_child(&mut self) -> bool {
        let top = self.top();
        if let Some(mounted) = top.tree.mounted() {
            if mounted.overlay().is_none() {
                self.frames.push(Frame {
                    tree: mounted.tree(),
                    start: top.start,
                    index: None,
                });
                return true;
            }
        }
        match top.tree.children().first() {
            Some(child) => {
                self.frames.push(Frame {
                    tree: child,
                    start: top.start + top.tree.positions()[0],
                    index: Some(0),
                });
                true
            }
            None => false,
        }
    }

    /// Moves to the next sibling, if there is one.
    pub fn next_sibling(&mut self) -> bool {
        if self.frames.len() < 2 {
            return false;
        }
        let cur = self.top();
        let Some(index) = cur.index else {
            return false;
        };
        let parent = self.frames[self.frames.len() - 2];
        let next = index + 1;
        if next >= parent.tree.children().len() {
            return false;
        }
        let last = self.frames.len() - 1;
        self.frames[last] = Frame {
            tree: &parent.tree.children()[next],
            start: parent.start + parent.tree.positions()[next],
            index: Some(next),
        };
        true
    }

    /// Moves back up to the parent node.
    pub fn parent(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Matches the current node's ancestors against a context path.
    ///
    /// The last piece is compared against the immediate parent, the one
    /// before it against the grandparent, and so on. An empty piece matches
    /// any ancestor; running out of ancestors fails the match.
    pub fn match_context(&self, context: &[String]) -> bool {
        let mut level = self.frames.len().checked_sub(2);
        for piece in context.iter().rev() {
            let Some(at) = level else {
                return false;
            };
            let name = self.frames[at].tree.node_type().name();
            if !piece.is_empty() && piece != name {
                return false;
            }
            level = at.checked_sub(1);
        }
        true
    }
}
