//! glint-highlight: style resolution for parsed syntax trees.
//!
//! This crate maps syntax-tree node types to a closed vocabulary of
//! highlight tags and turns those tags into class strings over a span of
//! source. It does not parse anything: trees come from the `glint-tree`
//! collaborator, built by whatever produced the parse.
//!
//! # Overview
//!
//! The pieces, in the order a language definition uses them:
//!
//! - [`Tag`] / [`Modifier`]: the tag lattice. Tags are interned and carry
//!   their full fallback chain; modifiers derive tags idempotently and
//!   commutatively. The standard vocabulary lives behind [`tags()`].
//!
//! - [`style_tags`]: compiles a selector-to-tag map into per-node-name
//!   [`Rule`] chains, attached to a grammar's node types under
//!   [`rule_prop`].
//!
//! - [`Highlighter`] / [`tag_highlighter`] / [`class_highlighter`]: turn
//!   tag sequences into class strings, with fallback through each tag's
//!   specificity chain and optional per-language scoping.
//!
//! - [`highlight_tree`]: walks a tree over a byte range and emits
//!   coalesced, non-overlapping styled spans. [`highlight_code`] wraps it
//!   to emit text split on line breaks.
//!
//! # Example
//!
//! ```
//! use glint_highlight::{
//!     class_highlighter, highlight_tree, style_tags, tags,
//! };
//! use glint_tree::{NodeSet, NodeType, Tree};
//!
//! let t = tags();
//! let rules = style_tags(&[
//!     ("Keyword", &[t.keyword.clone()]),
//!     ("String/Escape", &[t.escape.clone()]),
//! ])?;
//! let set = NodeSet::new(vec![
//!     NodeType::top("Doc"),
//!     NodeType::new("Keyword"),
//!     NodeType::new("String"),
//!     NodeType::new("Escape"),
//! ])
//! .extend(&rules);
//!
//! let keyword = set.get("Keyword").unwrap().clone();
//! let doc = set.get("Doc").unwrap().clone();
//! let tree = Tree::new(doc, vec![Tree::leaf(keyword, 2)], vec![0], 6);
//!
//! let mut spans = Vec::new();
//! highlight_tree(&tree, &[class_highlighter()], 0, 6, |from, to, cls| {
//!     spans.push((from, to, cls.to_string()));
//! });
//! assert_eq!(spans, [(0, 2, "hl-keyword".to_string())]);
//! # Ok::<(), glint_highlight::HighlightError>(())
//! ```

mod emit;
mod error;
mod highlighter;
mod selector;
mod tag;
mod tags;
mod walk;

pub use emit::highlight_code;
pub use error::{HighlightError, Result};
pub use highlighter::{
    class_highlighter, tag_highlighter, Highlighter, StyleEntry, TagHighlighterOptions,
};
pub use selector::{matched_rule, rule_prop, style_tags, Rule, RuleMode, StyleTags};
pub use tag::{Modifier, Tag};
pub use tags::{tags, Tags};
pub use walk::highlight_tree;
