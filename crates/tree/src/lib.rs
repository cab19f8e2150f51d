//! glint-tree: the syntax-tree side of the glint highlighter.
//!
//! This crate provides the tree structures the highlighting core walks. It
//! deliberately knows nothing about parsing: trees are built directly from
//! node types and lengths, by a parser integration or by tests.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`NodeType`]: an interned grammar node type with a name, a top-node
//!   flag, and attachable typed properties ([`NodeProp`]).
//!
//! - [`NodeSet`]: a grammar's node types, extendable with [`PropSource`]
//!   values that attach properties per type (this is how compiled style
//!   rules reach the grammar).
//!
//! - [`Tree`]: an immutable node with positioned children, optionally
//!   carrying a [`MountedTree`] that replaces part or all of its content
//!   with another language's tree.
//!
//! - [`TreeCursor`]: a stateful walk over a tree with context matching.
//!
//! # Example
//!
//! ```
//! use glint_tree::{NodeType, Tree};
//!
//! let word = NodeType::new("Word");
//! let doc = NodeType::top("Document");
//! let tree = Tree::new(doc, vec![Tree::leaf(word, 5)], vec![2], 10);
//!
//! let mut cursor = tree.cursor();
//! assert!(cursor.first_child());
//! assert_eq!(cursor.node_type().name(), "Word");
//! assert_eq!((cursor.from(), cursor.to()), (2, 7));
//! ```

mod cursor;
mod node;
mod tree;

pub use cursor::TreeCursor;
pub use node::{NodeProp, NodeSet, NodeType, PropEntry, PropSource};
pub use tree::{MountedTree, OverlayRange, Tree};
